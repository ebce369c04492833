//! The results delivered to completion callbacks.
//!
//! Record queries produce one [`QueryResult`] whose variant depends on the
//! record type that was asked for. Record types that can appear more than
//! once in an answer produce a list of records in the order the engine
//! returned them, the others exactly one record.
//!
//! TTLs are optional throughout. The engine does not report them for all
//! record types and a missing TTL is `None` rather than zero.

use crate::iana::Rtype;
use std::net::{IpAddr, SocketAddr};

//------------ Record types --------------------------------------------------

/// An A or AAAA record.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddrRecord {
    pub host: IpAddr,
    pub ttl: Option<u32>,
}

/// The canonical name of a CNAME query.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CnameRecord {
    pub cname: String,
    pub ttl: Option<u32>,
}

/// A mail exchange.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MxRecord {
    pub host: String,
    pub priority: u16,
    pub ttl: Option<u32>,
}

/// An authoritative name server.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NsRecord {
    pub host: String,
    pub ttl: Option<u32>,
}

/// The name an address points to.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PtrRecord {
    pub name: String,

    /// Further names the engine found for the address.
    pub aliases: Vec<String>,

    pub ttl: Option<u32>,
}

/// The start of a zone of authority.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoaRecord {
    pub nsname: String,
    pub hostmaster: String,
    pub serial: u64,
    pub refresh: u64,
    pub retry: u64,
    pub expires: u64,
    pub minttl: u64,
    pub ttl: Option<u32>,
}

/// A service location.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SrvRecord {
    pub host: String,
    pub port: u16,
    pub priority: u16,
    pub weight: u16,
    pub ttl: Option<u32>,
}

/// A text record with all its character strings joined.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxtRecord {
    pub text: String,
    pub ttl: Option<u32>,
}

/// A naming authority pointer.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NaptrRecord {
    pub order: u16,
    pub preference: u16,
    pub flags: String,
    pub service: String,
    pub regexp: String,
    pub replacement: String,
    pub ttl: Option<u32>,
}

//------------ QueryResult ---------------------------------------------------

/// The decoded answer to a record query.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "records")
)]
pub enum QueryResult {
    A(Vec<AddrRecord>),
    Aaaa(Vec<AddrRecord>),
    Cname(CnameRecord),
    Mx(Vec<MxRecord>),
    Ns(Vec<NsRecord>),
    Ptr(PtrRecord),
    Soa(SoaRecord),
    Srv(Vec<SrvRecord>),
    Txt(Vec<TxtRecord>),
    Naptr(Vec<NaptrRecord>),
}

impl QueryResult {
    /// Returns the record type of the result.
    pub fn rtype(&self) -> Rtype {
        match *self {
            QueryResult::A(_) => Rtype::A,
            QueryResult::Aaaa(_) => Rtype::AAAA,
            QueryResult::Cname(_) => Rtype::CNAME,
            QueryResult::Mx(_) => Rtype::MX,
            QueryResult::Ns(_) => Rtype::NS,
            QueryResult::Ptr(_) => Rtype::PTR,
            QueryResult::Soa(_) => Rtype::SOA,
            QueryResult::Srv(_) => Rtype::SRV,
            QueryResult::Txt(_) => Rtype::TXT,
            QueryResult::Naptr(_) => Rtype::NAPTR,
        }
    }

    /// Returns the number of records in the result.
    pub fn len(&self) -> usize {
        match *self {
            QueryResult::A(ref v) | QueryResult::Aaaa(ref v) => v.len(),
            QueryResult::Mx(ref v) => v.len(),
            QueryResult::Ns(ref v) => v.len(),
            QueryResult::Srv(ref v) => v.len(),
            QueryResult::Txt(ref v) => v.len(),
            QueryResult::Naptr(ref v) => v.len(),
            QueryResult::Cname(_)
            | QueryResult::Ptr(_)
            | QueryResult::Soa(_) => 1,
        }
    }

    /// Returns whether the result contains no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//------------ HostResult ----------------------------------------------------

/// The result of a host lookup in either direction.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HostResult {
    /// The canonical name of the host.
    pub name: String,

    /// Other names of the host, not including the canonical name.
    pub aliases: Vec<String>,

    /// The addresses of the host.
    pub addresses: Vec<IpAddr>,
}

//------------ NameInfoResult ------------------------------------------------

/// The result of a reverse service name lookup.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NameInfoResult {
    pub node: String,
    pub service: Option<String>,
}

//------------ AddrInfoResult ------------------------------------------------

/// The result of an address info lookup.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddrInfoResult {
    /// The aliases followed while resolving the host.
    pub cnames: Vec<AddrInfoCname>,

    /// The socket addresses found.
    pub nodes: Vec<AddrInfoNode>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddrInfoCname {
    pub ttl: Option<u32>,
    pub alias: String,
    pub name: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddrInfoNode {
    pub ttl: Option<u32>,
    pub flags: i32,
    pub family: crate::addr::AddrFamily,
    pub socktype: i32,
    pub protocol: i32,
    pub addr: SocketAddr,
}

//============ Tests =========================================================
