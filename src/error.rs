//! Error type for channel operations.

#![warn(missing_docs)]

use crate::iana::Status;
use std::error;
use std::fmt::{Display, Formatter};

/// Error type for synchronous channel operations.
///
/// Errors of asynchronous operations are never reported through this type.
/// They arrive at the completion callback as a [`Status`] instead. This
/// keeps problems with setting up a channel apart from the failure of an
/// individual query so callers can retry either independently.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// An argument supplied by the caller was malformed.
    ///
    /// The operation was rejected before the engine was involved and no
    /// callback will be invoked.
    InvalidArgument(&'static str),

    /// Process-wide initialization of the engine library failed.
    EngineInit(Status),

    /// The engine rejected the channel configuration.
    EngineConfig(Status),

    /// The channel has already been destroyed.
    ChannelClosed,

    /// The engine rejected a synchronous request.
    Status(Status),
}

impl Error {
    /// Returns the resolver status behind the error if there is one.
    pub fn status(&self) -> Option<Status> {
        match *self {
            Error::EngineInit(status)
            | Error::EngineConfig(status)
            | Error::Status(status) => Some(status),
            Error::InvalidArgument(_) | Error::ChannelClosed => None,
        }
    }
}

impl From<Status> for Error {
    fn from(status: Status) -> Self {
        Error::Status(status)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Error::InvalidArgument(msg) => {
                write!(f, "invalid argument: {}", msg)
            }
            Error::EngineInit(status) => {
                write!(f, "failed to initialize resolver library: {}", status)
            }
            Error::EngineConfig(status) => {
                write!(f, "failed to initialize channel: {}", status)
            }
            Error::ChannelClosed => {
                write!(f, "channel has already been destroyed")
            }
            Error::Status(status) => Display::fmt(status, f),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::InvalidArgument(_) => None,
            Error::EngineInit(status) => Some(status),
            Error::EngineConfig(status) => Some(status),
            Error::ChannelClosed => None,
            Error::Status(_) => None,
        }
    }
}
