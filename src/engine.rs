//! The boundary to the resolver engine.
//!
//! The channel does not speak the DNS wire protocol. All of that – building
//! queries, sending and retransmitting them, caching, server rotation,
//! falling back to TCP – is the job of a resolver engine. This module
//! defines what the channel requires of such an engine.
//!
//! An engine is represented by a [`Backend`], which takes care of any
//! process-wide library state and creates sessions, and the [`Session`]
//! itself, which is owned by exactly one channel. Dropping a session
//! destroys it.
//!
//! Queries are handed to the session together with a completion object
//! from the [`dispatch`] module. The session keeps the completion until
//! the query is done and then consumes it, passing along its status and,
//! for record queries, an [`Answer`] through which the reply can be
//! parsed. Completions may be consumed from within any session method,
//! including the one that submitted the query.
//!
//! [`dispatch`]: crate::dispatch

use crate::addr::AddrFamily;
use crate::dispatch::{
    AddrInfoCompletion, HostCompletion, NameInfoCompletion, QueryCompletion,
};
use crate::iana::{Class, Rtype, Status};
use crate::options::{EngineOptions, NameInfoFlags};
use crate::sock::{ActiveSockets, SocketFd};
use bytes::Bytes;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

//------------ Backend -------------------------------------------------------

/// A resolver engine implementation.
///
/// A backend value represents the engine library as a whole. It is
/// wrapped in a [`Library`] which makes sure that `library_init` and
/// `library_cleanup` are called once for every span of time during which
/// channels exist.
///
/// [`Library`]: crate::library::Library
pub trait Backend: Send + Sync + 'static {
    /// The type of a session created by this engine.
    type Session: Session;

    /// Performs process-wide initialization of the engine library.
    fn library_init(&self) -> Result<(), Status>;

    /// Releases process-wide state of the engine library.
    fn library_cleanup(&self);

    /// Creates a new session using the given options.
    ///
    /// Only the options whose bit is set in `options.mask` must be
    /// honoured. If the session cannot be created, the options, including
    /// the socket state bridge, must be dropped.
    fn init(&self, options: EngineOptions) -> Result<Self::Session, Status>;
}

//------------ Session -------------------------------------------------------

/// A resolver engine session.
///
/// All methods that submit a request take a completion object. The
/// session must eventually consume each of them exactly once, either
/// because the request finished, failed, or was cancelled. A completion
/// the session drops without consuming it, for instance because the
/// session itself is dropped, reports [`Status::EDESTRUCTION`] to its
/// callback.
pub trait Session: Send {
    /// Sends a query for a name, record type, and class.
    fn query(
        &mut self,
        name: &str,
        class: Class,
        rtype: Rtype,
        done: QueryCompletion,
    );

    /// Sends a query, applying the search domains to the name.
    fn search(
        &mut self,
        name: &str,
        class: Class,
        rtype: Rtype,
        done: QueryCompletion,
    );

    /// Resolves a host name into its addresses.
    fn host_by_name(
        &mut self,
        name: &str,
        family: AddrFamily,
        done: HostCompletion,
    );

    /// Resolves an address into its host names.
    fn host_by_addr(&mut self, addr: IpAddr, done: HostCompletion);

    /// Resolves a socket address into a host and service name.
    fn name_info(
        &mut self,
        addr: SocketAddr,
        flags: NameInfoFlags,
        done: NameInfoCompletion,
    );

    /// Resolves a host and service into socket addresses.
    fn addr_info(
        &mut self,
        name: &str,
        service: Option<&str>,
        hints: &AddrInfoHints,
        done: AddrInfoCompletion,
    );

    /// Cancels all outstanding requests.
    ///
    /// Each of their completions is consumed with [`Status::ECANCELLED`],
    /// either right away or during later processing.
    fn cancel(&mut self);

    /// Re-reads the system configuration.
    fn reinit(&mut self) -> Result<(), Status>;

    /// Returns the time until the session next needs to be processed.
    ///
    /// If `max` is given, the result must not exceed it. Returns `None`
    /// if there is no deadline at all.
    fn timeout(&self, max: Option<Duration>) -> Option<Duration>;

    /// Returns the sockets the session currently waits on.
    fn active_sockets(&self) -> ActiveSockets;

    /// Processes sockets that became ready and any expired timeouts.
    fn process(&mut self, read: Option<SocketFd>, write: Option<SocketFd>);

    /// Returns the configured servers in order.
    fn servers(&self) -> Result<Vec<IpAddr>, Status>;

    /// Replaces the configured servers.
    ///
    /// The channel never calls this with an empty list.
    fn set_servers(&mut self, servers: &[IpAddr]) -> Result<(), Status>;

    /// Sets the IPv4 address outgoing queries are sent from.
    fn set_local_ip4(&mut self, addr: Ipv4Addr);

    /// Sets the IPv6 address outgoing queries are sent from.
    fn set_local_ip6(&mut self, addr: Ipv6Addr);

    /// Sets the device outgoing queries are sent through.
    fn set_local_dev(&mut self, dev: &str);
}

//------------ Answer --------------------------------------------------------

/// A successful reply to a record query as received by the engine.
///
/// The engine parses the reply for the record type that was asked for.
/// Each method returns the status of that parse step if it fails. This
/// is independent from the status of the query itself, which already
/// succeeded when an answer is handed out.
pub trait Answer {
    /// Parses A records into `out`, returning how many were stored.
    ///
    /// At most `out.len()` records are stored. Further records are
    /// silently skipped.
    fn parse_a(&self, out: &mut [AddrTtl<Ipv4Addr>]) -> Result<usize, Status>;

    /// Parses AAAA records into `out`, returning how many were stored.
    fn parse_aaaa(
        &self,
        out: &mut [AddrTtl<Ipv6Addr>],
    ) -> Result<usize, Status>;

    /// Parses the reply as a CNAME chain.
    ///
    /// The `name` field of the host entry holds the canonical name.
    fn parse_cname(&self) -> Result<HostEnt, Status>;

    /// Parses NS records, returning the servers as aliases.
    fn parse_ns(&self) -> Result<HostEnt, Status>;

    /// Parses a PTR reply.
    fn parse_ptr(&self) -> Result<HostEnt, Status>;

    /// Parses MX records.
    fn parse_mx(&self) -> Result<Vec<MxReply>, Status>;

    /// Parses an SOA record.
    fn parse_soa(&self) -> Result<SoaReply, Status>;

    /// Parses SRV records.
    fn parse_srv(&self) -> Result<Vec<SrvReply>, Status>;

    /// Parses TXT records into their character string chunks.
    fn parse_txt(&self) -> Result<Vec<TxtChunk>, Status>;

    /// Parses NAPTR records.
    fn parse_naptr(&self) -> Result<Vec<NaptrReply>, Status>;
}

//------------ Raw reply structures ------------------------------------------

/// An address along with the TTL of its record.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AddrTtl<A> {
    pub addr: A,
    pub ttl: u32,
}

impl AddrTtl<Ipv4Addr> {
    /// An empty slot for the address buffer.
    pub const EMPTY_V4: Self = AddrTtl {
        addr: Ipv4Addr::UNSPECIFIED,
        ttl: 0,
    };
}

impl AddrTtl<Ipv6Addr> {
    /// An empty slot for the address buffer.
    pub const EMPTY_V6: Self = AddrTtl {
        addr: Ipv6Addr::UNSPECIFIED,
        ttl: 0,
    };
}

/// A host entry.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HostEnt {
    /// The official name of the host.
    pub name: String,

    /// Alternative names.
    pub aliases: Vec<String>,

    /// The addresses of the host.
    pub addrs: Vec<IpAddr>,
}

/// A mail exchange record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MxReply {
    pub host: String,
    pub priority: u16,
    pub ttl: u32,
}

/// A start of authority record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SoaReply {
    pub nsname: String,
    pub hostmaster: String,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minttl: u32,
    pub ttl: u32,
}

/// A server selection record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SrvReply {
    pub host: String,
    pub port: u16,
    pub priority: u16,
    pub weight: u16,
    pub ttl: u32,
}

/// One character string of a TXT record.
///
/// A TXT record consists of one or more character strings. The engine
/// returns the strings of all records as one flat sequence and marks the
/// first string of each record by setting `record_start`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TxtChunk {
    pub txt: Bytes,
    pub record_start: bool,
    pub ttl: u32,
}

/// A naming authority pointer record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NaptrReply {
    pub order: u16,
    pub preference: u16,
    pub flags: Bytes,
    pub service: Bytes,
    pub regexp: Bytes,
    pub replacement: String,
    pub ttl: u32,
}

/// The result of an address info lookup.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AddrInfo {
    pub cnames: Vec<AddrInfoCname>,
    pub nodes: Vec<AddrInfoNode>,
}

/// An alias encountered during an address info lookup.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddrInfoCname {
    pub ttl: u32,
    pub alias: String,
    pub name: String,
}

/// A socket address found by an address info lookup.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddrInfoNode {
    pub ttl: u32,
    pub flags: i32,
    pub socktype: i32,
    pub protocol: i32,
    pub addr: SocketAddr,
}

/// Hints restricting an address info lookup.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddrInfoHints {
    pub flags: i32,
    pub family: AddrFamily,
    pub socktype: i32,
    pub protocol: i32,
}
