//! Addresses and address families.
//!
//! The channel accepts IP addresses as literals because that is what
//! callers typically have at hand. This module parses them, provides the
//! address family type used by host lookups, and synthesizes the reverse
//! lookup name for an address.

use crate::error::Error;
use std::fmt::Write;
use std::net::IpAddr;
use std::str::FromStr;

//------------ AddrFamily ----------------------------------------------------

/// The address family requested by a host lookup.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddrFamily {
    /// Any family the engine finds.
    #[default]
    Unspec,

    /// IPv4 only.
    Inet,

    /// IPv6 only.
    Inet6,
}

impl AddrFamily {
    /// Returns the family of an address.
    pub fn of(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => AddrFamily::Inet,
            IpAddr::V6(_) => AddrFamily::Inet6,
        }
    }

    /// Returns the raw `AF_*` value for the family.
    pub fn to_raw(self) -> libc::c_int {
        match self {
            AddrFamily::Unspec => libc::AF_UNSPEC,
            AddrFamily::Inet => libc::AF_INET,
            AddrFamily::Inet6 => libc::AF_INET6,
        }
    }
}

impl TryFrom<libc::c_int> for AddrFamily {
    type Error = Error;

    fn try_from(raw: libc::c_int) -> Result<Self, Self::Error> {
        match raw {
            libc::AF_UNSPEC => Ok(AddrFamily::Unspec),
            libc::AF_INET => Ok(AddrFamily::Inet),
            libc::AF_INET6 => Ok(AddrFamily::Inet6),
            _ => Err(Error::InvalidArgument("unsupported address family")),
        }
    }
}

//------------ parse_ip ------------------------------------------------------

/// Parses an IPv4 or IPv6 address literal.
pub fn parse_ip(literal: &str) -> Result<IpAddr, Error> {
    IpAddr::from_str(literal)
        .map_err(|_| Error::InvalidArgument("invalid IP address"))
}

//------------ reverse_address -----------------------------------------------

/// Returns the name used for a reverse lookup of an address literal.
///
/// IPv4 addresses map into `in-addr.arpa`, IPv6 addresses into
/// `ip6.arpa` using one label per nibble. The returned name has no
/// trailing dot.
pub fn reverse_address(literal: &str) -> Result<String, Error> {
    Ok(reverse_name(parse_ip(literal)?))
}

/// Translates an IP address into its reverse lookup domain name.
pub fn reverse_name(addr: IpAddr) -> String {
    match addr {
        IpAddr::V4(addr) => {
            let octets = addr.octets();
            format!(
                "{}.{}.{}.{}.in-addr.arpa",
                octets[3], octets[2], octets[1], octets[0]
            )
        }
        IpAddr::V6(addr) => {
            let mut res = String::with_capacity(72);
            for &item in addr.octets().iter().rev() {
                res.push(hexdigit(item));
                res.push('.');
                res.push(hexdigit(item >> 4));
                res.push('.');
            }
            // Writing to a string cannot fail.
            let _ = write!(res, "ip6.arpa");
            res
        }
    }
}

fn hexdigit(nibble: u8) -> char {
    char::from(b"0123456789abcdef"[usize::from(nibble & 0x0F)])
}

//============ Tests =========================================================
