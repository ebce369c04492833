//! Resolver status codes.
//!
//! Every query outcome the engine reports and every failure of the local
//! decoding step is expressed as one of these codes. The mnemonics double
//! as the symbolic names applications use to look codes up, so
//! [`Status::from_mnemonic`] and [`Status::to_mnemonic_str`] together
//! form the complete error code table.

use std::{error, fmt};

//------------ Status --------------------------------------------------------

int_enum! {
    /// A resolver status code.
    ///
    /// The values are fixed by the resolver engine. `SUCCESS` is only ever
    /// seen at the engine boundary: a callback receives either a result or
    /// one of the failure codes, never `SUCCESS` as an error.
    =>
    Status, i32;

    /// Successful completion.
    (SUCCESS => 0, "ARES_SUCCESS")

    /// The server returned an answer with no data.
    (ENODATA => 1, "ARES_ENODATA")

    /// The server claims the query was misformatted.
    (EFORMERR => 2, "ARES_EFORMERR")

    /// The server returned a general failure.
    (ESERVFAIL => 3, "ARES_ESERVFAIL")

    /// The domain name was not found.
    (ENOTFOUND => 4, "ARES_ENOTFOUND")

    /// The server does not implement the requested operation.
    (ENOTIMP => 5, "ARES_ENOTIMP")

    /// The server refused the query.
    (EREFUSED => 6, "ARES_EREFUSED")

    /// The query was misformatted.
    (EBADQUERY => 7, "ARES_EBADQUERY")

    /// The domain name was misformatted.
    (EBADNAME => 8, "ARES_EBADNAME")

    /// The address family is not supported.
    (EBADFAMILY => 9, "ARES_EBADFAMILY")

    /// The reply was misformatted.
    ///
    /// This is the status reported when decoding a reply fails.
    (EBADRESP => 10, "ARES_EBADRESP")

    /// No name server could be contacted.
    (ECONNREFUSED => 11, "ARES_ECONNREFUSED")

    /// Timeout while contacting the name servers.
    (ETIMEOUT => 12, "ARES_ETIMEOUT")

    /// End of file.
    (EOF => 13, "ARES_EOF")

    /// Error reading a file.
    (EFILE => 14, "ARES_EFILE")

    /// Out of memory.
    ///
    /// Reported when allocating the result of a decoder fails.
    (ENOMEM => 15, "ARES_ENOMEM")

    /// The channel is being destroyed.
    (EDESTRUCTION => 16, "ARES_EDESTRUCTION")

    /// A string was misformatted.
    (EBADSTR => 17, "ARES_EBADSTR")

    /// Illegal flags were specified.
    (EBADFLAGS => 18, "ARES_EBADFLAGS")

    /// The given host name is not numeric.
    (ENONAME => 19, "ARES_ENONAME")

    /// Illegal hints flags were specified.
    (EBADHINTS => 20, "ARES_EBADHINTS")

    /// Library initialization has not been performed yet.
    (ENOTINITIALIZED => 21, "ARES_ENOTINITIALIZED")

    /// Error loading the IP helper library.
    (ELOADIPHLPAPI => 22, "ARES_ELOADIPHLPAPI")

    /// The network parameters function could not be found.
    (EADDRGETNETWORKPARAMS => 23, "ARES_EADDRGETNETWORKPARAMS")

    /// The query was cancelled.
    (ECANCELLED => 24, "ARES_ECANCELLED")

    /// Invalid service name or number.
    (ESERVICE => 25, "ARES_ESERVICE")
}

impl Status {
    /// Returns whether this status signals success.
    #[must_use]
    pub fn is_success(self) -> bool {
        self == Status::SUCCESS
    }

    /// Converts the status into a result.
    pub fn into_result(self) -> Result<(), Status> {
        if self.is_success() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Returns the human-readable description of the status.
    #[must_use]
    pub fn strerror(self) -> &'static str {
        match self {
            Status::SUCCESS => "Successful completion",
            Status::ENODATA => "DNS server returned answer with no data",
            Status::EFORMERR => "DNS server claims query was misformatted",
            Status::ESERVFAIL => "DNS server returned general failure",
            Status::ENOTFOUND => "Domain name not found",
            Status::ENOTIMP => {
                "DNS server does not implement requested operation"
            }
            Status::EREFUSED => "DNS server refused query",
            Status::EBADQUERY => "Misformatted DNS query",
            Status::EBADNAME => "Misformatted domain name",
            Status::EBADFAMILY => "Unsupported address family",
            Status::EBADRESP => "Misformatted DNS reply",
            Status::ECONNREFUSED => "Could not contact DNS servers",
            Status::ETIMEOUT => "Timeout while contacting DNS servers",
            Status::EOF => "End of file",
            Status::EFILE => "Error reading file",
            Status::ENOMEM => "Out of memory",
            Status::EDESTRUCTION => "Channel is being destroyed",
            Status::EBADSTR => "Misformatted string",
            Status::EBADFLAGS => "Illegal flags specified",
            Status::ENONAME => "Given hostname is not numeric",
            Status::EBADHINTS => "Illegal hints flags specified",
            Status::ENOTINITIALIZED => {
                "Library initialization not yet performed"
            }
            Status::ELOADIPHLPAPI => "Error loading iphlpapi.dll",
            Status::EADDRGETNETWORKPARAMS => {
                "Could not find GetNetworkParams function"
            }
            Status::ECANCELLED => "DNS query cancelled",
            Status::ESERVICE => "Invalid service name or number",
            _ => "unknown",
        }
    }
}

//--- Display and Error

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.strerror())
    }
}

impl error::Error for Status {}

//--- Serialize and Deserialize

#[cfg(feature = "serde")]
impl serde::Serialize for Status {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.to_int())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Status {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        <i32 as serde::Deserialize>::deserialize(deserializer)
            .map(Status::from_int)
    }
}

//============ Tests =========================================================
