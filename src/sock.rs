//! The socket state bridge.
//!
//! The channel never touches sockets itself. The engine opens and closes
//! them and the external event loop waits on them. This module provides
//! the two ways the loop learns which sockets to wait on: a push-style
//! observer, the [`SockStateBridge`], that the engine notifies whenever its
//! interest in a socket changes, and a pull-style snapshot,
//! [`ActiveSockets`], returned by [`Channel::active_sockets`].
//!
//! [`Channel::active_sockets`]: crate::channel::Channel::active_sockets

use smallvec::SmallVec;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::{fmt, slice};
use tracing::{error, trace, trace_span};

//------------ SocketFd ------------------------------------------------------

/// A raw socket descriptor as used by the engine.
pub type SocketFd = libc::c_int;

/// The maximum number of sockets the engine reports interest in at once.
pub const GETSOCK_MAXNUM: usize = 16;

//------------ SockStateBridge -----------------------------------------------

/// The observer notified about changes of socket interest.
///
/// The bridge is shared between the channel and the engine session it
/// was handed to. The caller’s closure stays alive as long as either of
/// them holds on to it. The channel releases its reference when it is
/// destroyed, the session when it is dropped.
#[derive(Clone)]
pub struct SockStateBridge {
    callback: Arc<dyn Fn(SocketFd, bool, bool) + Send + Sync>,
}

impl SockStateBridge {
    /// Creates a new bridge from a closure.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(SocketFd, bool, bool) + Send + Sync + 'static,
    {
        SockStateBridge {
            callback: Arc::new(callback),
        }
    }

    /// Tells the observer about the engine’s interest in a socket.
    ///
    /// A socket for which neither `readable` nor `writable` is set is no
    /// longer of interest and should be removed from the multiplexer.
    ///
    /// If the observer panics, the panic is logged and swallowed so that
    /// the engine’s state stays intact.
    pub fn notify(&self, fd: SocketFd, readable: bool, writable: bool) {
        let span = trace_span!("sock_state", fd, readable, writable);
        let _enter = span.enter();
        trace!("socket interest changed");
        let res = panic::catch_unwind(AssertUnwindSafe(|| {
            (self.callback)(fd, readable, writable)
        }));
        if res.is_err() {
            error!("socket state callback panicked for socket {}", fd);
        }
    }

    /// Returns the number of holders of the observer.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.callback)
    }
}

impl fmt::Debug for SockStateBridge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SockStateBridge")
            .field("ref_count", &self.ref_count())
            .finish()
    }
}

//------------ SocketSet -----------------------------------------------------

/// An ordered set of socket descriptors.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SocketSet(SmallVec<[SocketFd; GETSOCK_MAXNUM]>);

impl SocketSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a socket, keeping the first position of duplicates.
    pub fn insert(&mut self, fd: SocketFd) {
        if !self.contains(fd) {
            self.0.push(fd)
        }
    }

    /// Returns whether the socket is part of the set.
    pub fn contains(&self, fd: SocketFd) -> bool {
        self.0.contains(&fd)
    }

    /// Returns the number of sockets in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the sockets in insertion order.
    pub fn iter(&self) -> slice::Iter<SocketFd> {
        self.0.iter()
    }

    /// Returns the sockets as a slice.
    pub fn as_slice(&self) -> &[SocketFd] {
        self.0.as_slice()
    }
}

impl FromIterator<SocketFd> for SocketSet {
    fn from_iter<I: IntoIterator<Item = SocketFd>>(iter: I) -> Self {
        let mut res = SocketSet::new();
        for fd in iter {
            res.insert(fd)
        }
        res
    }
}

impl<'a> IntoIterator for &'a SocketSet {
    type Item = &'a SocketFd;
    type IntoIter = slice::Iter<'a, SocketFd>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//------------ ActiveSockets -------------------------------------------------

/// A snapshot of the sockets the engine currently waits on.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveSockets {
    /// Sockets that should be watched for becoming readable.
    pub readable: SocketSet,

    /// Sockets that should be watched for becoming writable.
    pub writable: SocketSet,
}

impl ActiveSockets {
    /// Returns whether the engine waits on no socket at all.
    pub fn is_empty(&self) -> bool {
        self.readable.is_empty() && self.writable.is_empty()
    }
}

//============ Tests =========================================================
