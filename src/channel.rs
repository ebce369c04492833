//! The resolution channel.
//!
//! A [`Channel`] owns one engine session and is the only way requests
//! reach it. Requests are submitted together with a callback that is
//! invoked once the request is done. The channel does not run an event
//! loop of its own. Instead, the caller’s loop learns which sockets to wait
//! on either through the socket state observer registered via
//! [`ChannelOptions::sock_state_cb`] or by asking
//! [`Channel::active_sockets`], waits for at most [`Channel::timeout`],
//! and then hands ready sockets to [`Channel::process`].
//!
//! # Callbacks and re-entrancy
//!
//! Completion callbacks and the socket state observer are called from
//! within [`query`], [`search`], the other lookup methods, [`process`],
//! [`cancel`], and [`destroy`], on the thread calling them. The engine may
//! also complete a request right away, before the submitting method
//! returns.
//!
//! All these methods take the channel by mutable reference. A callback
//! therefore cannot call back into the channel that invoked it. Callbacks
//! that want to submit follow-up requests have to queue them and submit
//! them once the driving method has returned.
//!
//! A channel can be moved to another thread but is not synchronized. If
//! several threads need to use the same channel, the caller has to wrap it
//! in a mutex.
//!
//! [`ChannelOptions::sock_state_cb`]: crate::options::ChannelOptions::sock_state_cb
//! [`query`]: Channel::query
//! [`search`]: Channel::search
//! [`process`]: Channel::process
//! [`cancel`]: Channel::cancel
//! [`destroy`]: Channel::destroy

use crate::addr::{parse_ip, AddrFamily};
use crate::dispatch::{
    AddrInfoCompletion, HostCompletion, NameInfoCompletion, QueryCompletion,
};
use crate::engine::{AddrInfoHints, Backend, Session};
use crate::error::Error;
use crate::iana::{Class, Rtype, Status};
use crate::library::{Library, LibraryGuard};
use crate::options::{ChannelOptions, NameInfoFlags};
use crate::result::{AddrInfoResult, HostResult, NameInfoResult, QueryResult};
use crate::sock::{ActiveSockets, SockStateBridge, SocketFd};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing::{debug, trace};

//------------ Channel -------------------------------------------------------

/// A DNS resolution channel.
///
/// See the [module documentation](crate::channel) for how to drive a channel.
///
/// Dropping the channel destroys it.
pub struct Channel<B: Backend> {
    state: State<B>,

    /// The socket state observer if one was registered.
    sock_state: Option<SockStateBridge>,
}

enum State<B: Backend> {
    Active {
        /// The engine session.
        ///
        /// This must be dropped before the library guard.
        session: B::Session,

        _library: LibraryGuard<B>,
    },
    Destroyed,
}

impl<B: Backend> Channel<B> {
    /// Creates a new channel.
    ///
    /// Initializes the engine library if this is the first channel using
    /// it. Fails with [`Error::EngineInit`] if that fails and with
    /// [`Error::EngineConfig`] if the engine does not accept the options
    /// or the configured servers or local address are malformed. The
    /// socket state observer is released in both cases.
    pub fn new(
        library: &Library<B>,
        mut options: ChannelOptions,
    ) -> Result<Self, Error> {
        let guard = library.acquire()?;

        let servers = match options.servers.take() {
            Some(servers) => parse_servers(&servers)
                .map_err(|_| Error::EngineConfig(Status::EBADSTR))?,
            None => Vec::new(),
        };
        let local_ip = match options.local_ip.take() {
            Some(ip) => Some(
                parse_ip(&ip)
                    .map_err(|_| Error::EngineConfig(Status::EBADSTR))?,
            ),
            None => None,
        };

        let engine_options = options.to_engine_options();
        debug!("creating channel with options {:?}", engine_options.mask);
        let mut session = guard
            .backend()
            .init(engine_options)
            .map_err(Error::EngineConfig)?;

        if !servers.is_empty() {
            session
                .set_servers(&servers)
                .map_err(Error::EngineConfig)?;
        }
        if let Some(ip) = local_ip {
            set_local_ip(&mut session, ip);
        }
        if let Some(ref dev) = options.local_dev {
            session.set_local_dev(dev);
        }

        Ok(Channel {
            state: State::Active {
                session,
                _library: guard,
            },
            sock_state: options.sock_state.take(),
        })
    }

    fn session(&self) -> Result<&B::Session, Error> {
        match self.state {
            State::Active { ref session, .. } => Ok(session),
            State::Destroyed => Err(Error::ChannelClosed),
        }
    }

    fn session_mut(&mut self) -> Result<&mut B::Session, Error> {
        match self.state {
            State::Active {
                ref mut session, ..
            } => Ok(session),
            State::Destroyed => Err(Error::ChannelClosed),
        }
    }
}

/// # Submitting requests
///
/// None of the methods in this section invokes the callback if it returns
/// an error. If a method succeeds, the callback is invoked exactly once,
/// possibly before the method returns.
impl<B: Backend> Channel<B> {
    /// Queries for records of the given type in the Internet class.
    ///
    /// The record type has to be one of the ten types listed in
    /// [`Rtype::KNOWN`].
    pub fn query<F>(
        &mut self,
        name: &str,
        rtype: Rtype,
        callback: F,
    ) -> Result<(), Error>
    where
        F: FnOnce(Result<QueryResult, Status>) + Send + 'static,
    {
        self.query_with_class(name, rtype, Class::IN, callback)
    }

    /// Queries for records of the given type and class.
    pub fn query_with_class<F>(
        &mut self,
        name: &str,
        rtype: Rtype,
        class: Class,
        callback: F,
    ) -> Result<(), Error>
    where
        F: FnOnce(Result<QueryResult, Status>) + Send + 'static,
    {
        let session = self.session_mut()?;
        check_question(rtype, class)?;
        trace!("query {} {} {}", name, class, rtype);
        session.query(
            name,
            class,
            rtype,
            QueryCompletion::new(rtype, Box::new(callback)),
        );
        Ok(())
    }

    /// Queries for records, applying the configured search domains.
    pub fn search<F>(
        &mut self,
        name: &str,
        rtype: Rtype,
        class: Class,
        callback: F,
    ) -> Result<(), Error>
    where
        F: FnOnce(Result<QueryResult, Status>) + Send + 'static,
    {
        let session = self.session_mut()?;
        check_question(rtype, class)?;
        trace!("search {} {} {}", name, class, rtype);
        session.search(
            name,
            class,
            rtype,
            QueryCompletion::new(rtype, Box::new(callback)),
        );
        Ok(())
    }

    /// Resolves a host name into its addresses.
    pub fn get_host_by_name<F>(
        &mut self,
        name: &str,
        family: AddrFamily,
        callback: F,
    ) -> Result<(), Error>
    where
        F: FnOnce(Result<HostResult, Status>) + Send + 'static,
    {
        let session = self.session_mut()?;
        trace!("host by name {} ({:?})", name, family);
        session.host_by_name(
            name,
            family,
            HostCompletion::new(Box::new(callback)),
        );
        Ok(())
    }

    /// Resolves an IPv4 or IPv6 address literal into host names.
    pub fn get_host_by_addr<F>(
        &mut self,
        addr: &str,
        callback: F,
    ) -> Result<(), Error>
    where
        F: FnOnce(Result<HostResult, Status>) + Send + 'static,
    {
        let session = self.session_mut()?;
        let addr = parse_ip(addr)?;
        trace!("host by addr {}", addr);
        session.host_by_addr(addr, HostCompletion::new(Box::new(callback)));
        Ok(())
    }

    /// Resolves an address and port into a host and service name.
    ///
    /// The port has to be in the range of 0 to 65535.
    pub fn get_name_info<F>(
        &mut self,
        addr: &str,
        port: u32,
        flags: NameInfoFlags,
        callback: F,
    ) -> Result<(), Error>
    where
        F: FnOnce(Result<NameInfoResult, Status>) + Send + 'static,
    {
        let session = self.session_mut()?;
        let port = u16::try_from(port)
            .map_err(|_| Error::InvalidArgument("port must be 0-65535"))?;
        let addr = SocketAddr::new(parse_ip(addr)?, port);
        trace!("name info {} {:?}", addr, flags);
        session.name_info(
            addr,
            flags,
            NameInfoCompletion::new(Box::new(callback)),
        );
        Ok(())
    }

    /// Resolves a host and optional service into socket addresses.
    pub fn get_addr_info<F>(
        &mut self,
        host: &str,
        service: Option<&str>,
        hints: AddrInfoHints,
        callback: F,
    ) -> Result<(), Error>
    where
        F: FnOnce(Result<AddrInfoResult, Status>) + Send + 'static,
    {
        let session = self.session_mut()?;
        trace!("addr info {} {:?}", host, service);
        session.addr_info(
            host,
            service,
            &hints,
            AddrInfoCompletion::new(Box::new(callback)),
        );
        Ok(())
    }
}

/// # Driving the channel
impl<B: Backend> Channel<B> {
    /// Cancels all outstanding requests.
    ///
    /// The callback of each of them receives [`Status::ECANCELLED`], either
    /// during this call or during later processing.
    pub fn cancel(&mut self) -> Result<(), Error> {
        debug!("cancelling outstanding requests");
        self.session_mut()?.cancel();
        Ok(())
    }

    /// Re-reads the system configuration.
    pub fn reinit(&mut self) -> Result<(), Error> {
        debug!("re-reading system configuration");
        self.session_mut()?.reinit().map_err(Error::Status)
    }

    /// Destroys the channel.
    ///
    /// The callbacks of all outstanding requests receive
    /// [`Status::EDESTRUCTION`]. The socket state observer is released.
    /// Afterwards, all methods fail with [`Error::ChannelClosed`].
    /// Destroying a channel a second time does nothing.
    pub fn destroy(&mut self) {
        if let State::Destroyed = self.state {
            return;
        }
        debug!("destroying channel");
        self.state = State::Destroyed;
        self.sock_state = None;
    }

    /// Returns whether the channel has been destroyed.
    pub fn is_destroyed(&self) -> bool {
        matches!(self.state, State::Destroyed)
    }

    /// Returns how long to wait at most before calling [`process`].
    ///
    /// If `max` is given, the result is never longer. Returns `None` if
    /// the engine has nothing to wait for and no `max` was given.
    ///
    /// [`process`]: Self::process
    pub fn timeout(
        &self,
        max: Option<Duration>,
    ) -> Result<Option<Duration>, Error> {
        let next = self.session()?.timeout(max);
        Ok(match (next, max) {
            (Some(next), Some(max)) => Some(next.min(max)),
            (next, max) => next.or(max),
        })
    }

    /// Returns the timeout in seconds.
    ///
    /// This is like [`timeout`] but with fractional seconds. No deadline
    /// is returned as zero. `max` must be a non-negative, finite number.
    ///
    /// [`timeout`]: Self::timeout
    pub fn timeout_secs(&self, max: Option<f64>) -> Result<f64, Error> {
        let max = match max {
            Some(max) => Some(Duration::try_from_secs_f64(max).map_err(
                |_| Error::InvalidArgument("timeout must be non-negative"),
            )?),
            None => None,
        };
        Ok(self
            .timeout(max)?
            .map(|timeout| timeout.as_secs_f64())
            .unwrap_or(0.0))
    }

    /// Returns the sockets the engine currently waits on.
    ///
    /// Calling this repeatedly without processing in between returns the
    /// same sets.
    pub fn active_sockets(&self) -> Result<ActiveSockets, Error> {
        Ok(self.session()?.active_sockets())
    }

    /// Processes sockets that became ready and any expired timeouts.
    ///
    /// Either socket may be `None`, in which case only timeouts are
    /// processed for that direction.
    pub fn process(
        &mut self,
        read: Option<SocketFd>,
        write: Option<SocketFd>,
    ) -> Result<(), Error> {
        let session = self.session_mut()?;
        trace!("processing read={:?} write={:?}", read, write);
        session.process(read, write);
        Ok(())
    }

    /// Processes a socket that became readable.
    pub fn process_read(&mut self, fd: SocketFd) -> Result<(), Error> {
        self.process(Some(fd), None)
    }

    /// Processes a socket that became writable.
    pub fn process_write(&mut self, fd: SocketFd) -> Result<(), Error> {
        self.process(None, Some(fd))
    }
}

/// # Configuration
impl<B: Backend> Channel<B> {
    /// Sets the local address outgoing queries originate from.
    pub fn set_local_ip(&mut self, ip: &str) -> Result<(), Error> {
        let session = self.session_mut()?;
        set_local_ip(session, parse_ip(ip)?);
        Ok(())
    }

    /// Sets the local device outgoing queries are sent through.
    pub fn set_local_dev(&mut self, dev: &str) -> Result<(), Error> {
        self.session_mut()?.set_local_dev(dev);
        Ok(())
    }

    /// Returns the configured name servers as address literals.
    pub fn servers(&self) -> Result<Vec<String>, Error> {
        let servers = self.session()?.servers().map_err(Error::Status)?;
        Ok(servers.into_iter().map(|addr| addr.to_string()).collect())
    }

    /// Replaces the configured name servers.
    ///
    /// An empty list leaves the servers unchanged. If any of the entries
    /// is not an address literal, nothing is changed.
    pub fn set_servers<I, S>(&mut self, servers: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let session = self.session_mut()?;
        let servers = parse_servers(servers)?;
        if servers.is_empty() {
            return Ok(());
        }
        debug!("setting servers {:?}", servers);
        session.set_servers(&servers).map_err(Error::Status)
    }
}

impl<B: Backend> Drop for Channel<B> {
    fn drop(&mut self) {
        self.destroy()
    }
}

impl<B: Backend> fmt::Debug for Channel<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Channel")
            .field("destroyed", &self.is_destroyed())
            .field("sock_state", &self.sock_state)
            .finish()
    }
}

//------------ Helpers -------------------------------------------------------

fn check_question(rtype: Rtype, class: Class) -> Result<(), Error> {
    if !rtype.is_known() {
        return Err(Error::InvalidArgument("unsupported query type"));
    }
    if !class.is_known() {
        return Err(Error::InvalidArgument("unsupported query class"));
    }
    Ok(())
}

fn parse_servers<I, S>(servers: I) -> Result<Vec<IpAddr>, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    servers
        .into_iter()
        .map(|server| parse_ip(server.as_ref()))
        .collect()
}

fn set_local_ip<S: Session>(session: &mut S, ip: IpAddr) {
    match ip {
        IpAddr::V4(ip) => session.set_local_ip4(ip),
        IpAddr::V6(ip) => session.set_local_ip6(ip),
    }
}
