//! Channel configuration.
//!
//! There are two parts to this module. [`ChannelOptions`] is what a caller
//! fills in when creating a channel. Every field is optional and only the
//! ones actually set are handed to the engine. [`EngineOptions`] is what
//! the engine receives: the values of all fields plus an [`OptMask`]
//! telling it which of them to honour. All other settings keep the
//! engine’s defaults.
//!
//! Both are modeled along the lines of the C resolver’s `ares_options`.

use crate::sock::{SockStateBridge, SocketFd};
use std::ops;
use std::time::Duration;

//------------ Bit sets ------------------------------------------------------

/// Defines a newtype over an integer with named single-bit values.
macro_rules! bit_set {
    ( $(#[$attr:meta])* $name:ident;
      $( $(#[$bit_attr:meta])* $bit:ident = $value:expr; )* ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize)
        )]
        pub struct $name(u32);

        impl $name {
            $(
                $(#[$bit_attr])*
                pub const $bit: $name = $name($value);
            )*

            /// Returns an empty set.
            #[must_use]
            pub const fn empty() -> Self {
                $name(0)
            }

            /// Creates a set from its raw bits.
            #[must_use]
            pub const fn from_bits(bits: u32) -> Self {
                $name(bits)
            }

            /// Returns the raw bits of the set.
            #[must_use]
            pub const fn bits(self) -> u32 {
                self.0
            }

            /// Returns whether all bits of `other` are set.
            #[must_use]
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// Returns whether no bit is set.
            #[must_use]
            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }
        }

        impl ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, other: Self) -> Self {
                $name(self.0 | other.0)
            }
        }

        impl ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, other: Self) {
                self.0 |= other.0
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                let mut set = f.debug_set();
                $(
                    if $value != 0 && self.contains($name::$bit) {
                        set.entry(&format_args!(stringify!($bit)));
                    }
                )*
                set.finish()
            }
        }
    }
}

bit_set! {
    /// Behaviour flags for the engine.
    Flags;

    /// Always use TCP.
    USEVC = 1 << 0;

    /// Only query the first server in the list.
    PRIMARY = 1 << 1;

    /// Ignore the truncation bit instead of retrying over TCP.
    IGNTC = 1 << 2;

    /// Do not set the recursion desired bit.
    NORECURSE = 1 << 3;

    /// Keep TCP connections open between queries.
    STAYOPEN = 1 << 4;

    /// Do not apply the search domains.
    NOSEARCH = 1 << 5;

    /// Do not honour the `HOSTALIASES` environment variable.
    NOALIASES = 1 << 6;

    /// Do not discard responses with a failure response code.
    NOCHECKRESP = 1 << 7;

    /// Include an EDNS pseudo-record in queries.
    EDNS = 1 << 8;

    /// Do not fall back to a default server if none is configured.
    NO_DFLT_SVR = 1 << 9;
}

bit_set! {
    /// Flags for reverse service name resolution.
    NameInfoFlags;

    /// Only return the host part of local names.
    NOFQDN = 1 << 0;

    /// Return the numeric host instead of a name.
    NUMERICHOST = 1 << 1;

    /// Fail if the host has no name.
    NAMEREQD = 1 << 2;

    /// Return the numeric service instead of a name.
    NUMERICSERV = 1 << 3;

    /// The service is a datagram service.
    DGRAM = 1 << 4;

    /// The service is a TCP service.
    TCP = 0;

    /// The service is a UDP service.
    UDP = 1 << 4;

    /// The service is an SCTP service.
    SCTP = 1 << 5;

    /// The service is a DCCP service.
    DCCP = 1 << 6;

    /// Return the numeric scope identifier.
    NUMERICSCOPE = 1 << 7;

    /// Look up the host name.
    LOOKUPHOST = 1 << 8;

    /// Look up the service name.
    LOOKUPSERVICE = 1 << 9;

    /// Convert the returned name from IDN.
    IDN = 1 << 10;

    /// Allow unassigned code points in IDN conversion.
    IDN_ALLOW_UNASSIGNED = 1 << 11;

    /// Use STD3 ASCII rules in IDN conversion.
    IDN_USE_STD3_ASCII_RULES = 1 << 12;
}

bit_set! {
    /// The set of options explicitly supplied to the engine.
    OptMask;

    /// `EngineOptions::flags` is set.
    FLAGS = 1 << 0;

    /// `EngineOptions::tries` is set.
    TRIES = 1 << 2;

    /// `EngineOptions::ndots` is set.
    NDOTS = 1 << 3;

    /// `EngineOptions::udp_port` is set.
    UDP_PORT = 1 << 4;

    /// `EngineOptions::tcp_port` is set.
    TCP_PORT = 1 << 5;

    /// `EngineOptions::domains` is set.
    DOMAINS = 1 << 7;

    /// `EngineOptions::lookups` is set.
    LOOKUPS = 1 << 8;

    /// `EngineOptions::sock_state` is set.
    SOCK_STATE_CB = 1 << 9;

    /// `EngineOptions::socket_send_buffer_size` is set.
    SOCK_SNDBUF = 1 << 11;

    /// `EngineOptions::socket_receive_buffer_size` is set.
    SOCK_RCVBUF = 1 << 12;

    /// `EngineOptions::timeout` is set.
    TIMEOUTMS = 1 << 13;

    /// Servers are selected round-robin.
    ROTATE = 1 << 14;

    /// `EngineOptions::resolvconf_path` is set.
    RESOLVCONF = 1 << 17;
}

//------------ ChannelOptions ------------------------------------------------

/// Options for creating a channel.
///
/// All options are unset by default, in which case the engine’s defaults
/// apply. The setters consume and return the options so they can be
/// chained:
///
/// ```
/// # use domain_channel::options::{ChannelOptions, Flags};
/// # use std::time::Duration;
/// let options = ChannelOptions::new()
///     .timeout(Duration::from_millis(1500))
///     .tries(2)
///     .flags(Flags::EDNS | Flags::STAYOPEN)
///     .servers(["8.8.8.8", "2001:4860:4860::8888"]);
/// ```
#[derive(Clone, Default)]
pub struct ChannelOptions {
    pub(crate) flags: Option<Flags>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) tries: Option<u32>,
    pub(crate) ndots: Option<u32>,
    pub(crate) tcp_port: Option<u16>,
    pub(crate) udp_port: Option<u16>,
    pub(crate) servers: Option<Vec<String>>,
    pub(crate) domains: Option<Vec<String>>,
    pub(crate) lookups: Option<String>,
    pub(crate) sock_state: Option<SockStateBridge>,
    pub(crate) socket_send_buffer_size: Option<u32>,
    pub(crate) socket_receive_buffer_size: Option<u32>,
    pub(crate) rotate: bool,
    pub(crate) local_ip: Option<String>,
    pub(crate) local_dev: Option<String>,
    pub(crate) resolvconf_path: Option<String>,
}

impl ChannelOptions {
    /// Creates a new set of options with nothing set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the behaviour flags.
    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = Some(flags);
        self
    }

    /// Sets the time to wait for a response before trying again.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the number of tries per server.
    pub fn tries(mut self, tries: u32) -> Self {
        self.tries = Some(tries);
        self
    }

    /// Sets the number of dots before a name is tried as absolute first.
    pub fn ndots(mut self, ndots: u32) -> Self {
        self.ndots = Some(ndots);
        self
    }

    /// Sets the server port for TCP.
    pub fn tcp_port(mut self, port: u16) -> Self {
        self.tcp_port = Some(port);
        self
    }

    /// Sets the server port for UDP.
    pub fn udp_port(mut self, port: u16) -> Self {
        self.udp_port = Some(port);
        self
    }

    /// Sets the name servers as IP address literals.
    ///
    /// The servers are applied once the engine session exists. An address
    /// that fails to parse makes channel creation fail.
    pub fn servers<I, S>(mut self, servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.servers = Some(servers.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the search domains.
    ///
    /// An empty list leaves the engine’s default search domains in place.
    pub fn domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domains = Some(domains.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the lookup order, e.g., `"fb"` for hosts file before DNS.
    pub fn lookups(mut self, lookups: impl Into<String>) -> Self {
        self.lookups = Some(lookups.into());
        self
    }

    /// Registers a socket state observer.
    ///
    /// The closure is called with a socket descriptor and whether the
    /// engine is interested in it becoming readable and writable. It is
    /// called on whatever thread drives the channel.
    pub fn sock_state_cb<F>(mut self, callback: F) -> Self
    where
        F: Fn(SocketFd, bool, bool) + Send + Sync + 'static,
    {
        self.sock_state = Some(SockStateBridge::new(callback));
        self
    }

    /// Sets the send buffer size for the engine’s sockets.
    pub fn socket_send_buffer_size(mut self, size: u32) -> Self {
        self.socket_send_buffer_size = Some(size);
        self
    }

    /// Sets the receive buffer size for the engine’s sockets.
    pub fn socket_receive_buffer_size(mut self, size: u32) -> Self {
        self.socket_receive_buffer_size = Some(size);
        self
    }

    /// Selects servers round-robin instead of always starting at the first.
    pub fn rotate(mut self, rotate: bool) -> Self {
        self.rotate = rotate;
        self
    }

    /// Sets the local address outgoing queries originate from.
    pub fn local_ip(mut self, ip: impl Into<String>) -> Self {
        self.local_ip = Some(ip.into());
        self
    }

    /// Sets the local device outgoing queries are bound to.
    pub fn local_dev(mut self, dev: impl Into<String>) -> Self {
        self.local_dev = Some(dev.into());
        self
    }

    /// Sets the path of the resolver configuration file to read.
    pub fn resolvconf_path(mut self, path: impl Into<String>) -> Self {
        self.resolvconf_path = Some(path.into());
        self
    }

    /// Converts the options into what the engine is initialized with.
    ///
    /// Servers, local address, and local device are not part of the result.
    /// The channel applies them to the session after initialization.
    pub(crate) fn to_engine_options(&self) -> EngineOptions {
        let mut res = EngineOptions::default();
        if let Some(flags) = self.flags {
            res.flags = flags;
            res.mask |= OptMask::FLAGS;
        }
        if let Some(timeout) = self.timeout {
            res.timeout = timeout;
            res.mask |= OptMask::TIMEOUTMS;
        }
        if let Some(tries) = self.tries {
            res.tries = tries;
            res.mask |= OptMask::TRIES;
        }
        if let Some(ndots) = self.ndots {
            res.ndots = ndots;
            res.mask |= OptMask::NDOTS;
        }
        if let Some(port) = self.tcp_port {
            res.tcp_port = port;
            res.mask |= OptMask::TCP_PORT;
        }
        if let Some(port) = self.udp_port {
            res.udp_port = port;
            res.mask |= OptMask::UDP_PORT;
        }
        if let Some(size) = self.socket_send_buffer_size {
            res.socket_send_buffer_size = size;
            res.mask |= OptMask::SOCK_SNDBUF;
        }
        if let Some(size) = self.socket_receive_buffer_size {
            res.socket_receive_buffer_size = size;
            res.mask |= OptMask::SOCK_RCVBUF;
        }
        if let Some(ref bridge) = self.sock_state {
            res.sock_state = Some(bridge.clone());
            res.mask |= OptMask::SOCK_STATE_CB;
        }
        if let Some(ref lookups) = self.lookups {
            res.lookups = lookups.clone();
            res.mask |= OptMask::LOOKUPS;
        }
        match self.domains {
            Some(ref domains) if !domains.is_empty() => {
                res.domains = domains.clone();
                res.mask |= OptMask::DOMAINS;
            }
            _ => {}
        }
        if self.rotate {
            res.mask |= OptMask::ROTATE;
        }
        if let Some(ref path) = self.resolvconf_path {
            res.resolvconf_path = path.clone();
            res.mask |= OptMask::RESOLVCONF;
        }
        res
    }
}

//------------ EngineOptions -------------------------------------------------

/// The options an engine session is initialized with.
///
/// Only the fields whose bit is set in `mask` carry a value the caller
/// asked for. All other fields are zero or empty and must be ignored.
#[derive(Clone, Debug, Default)]
pub struct EngineOptions {
    /// Which of the other fields were supplied.
    pub mask: OptMask,
    pub flags: Flags,
    pub timeout: Duration,
    pub tries: u32,
    pub ndots: u32,
    pub tcp_port: u16,
    pub udp_port: u16,
    pub domains: Vec<String>,
    pub lookups: String,
    pub sock_state: Option<SockStateBridge>,
    pub socket_send_buffer_size: u32,
    pub socket_receive_buffer_size: u32,
    pub resolvconf_path: String,
}

//============ Tests =========================================================
