//! Process-wide engine library state.
//!
//! Resolver engines typically have some global state that needs to be set
//! up before the first session is created and can be torn down once the
//! last one is gone. A [`Library`] tracks how many channels currently use
//! the engine and performs the initialization and cleanup at the right
//! moments.

use crate::engine::Backend;
use crate::error::Error;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

//------------ Library -------------------------------------------------------

/// A handle to a resolver engine library.
///
/// The handle is cheap to clone. All clones share the same usage count.
pub struct Library<B> {
    inner: Arc<Inner<B>>,
}

struct Inner<B> {
    backend: B,

    /// The number of outstanding guards.
    users: Mutex<usize>,
}

impl<B: Backend> Library<B> {
    /// Creates a new library handle for the given engine.
    ///
    /// This does not yet initialize the engine. That happens when the
    /// first channel is created.
    pub fn new(backend: B) -> Self {
        Library {
            inner: Arc::new(Inner {
                backend,
                users: Mutex::new(0),
            }),
        }
    }

    /// Returns a reference to the engine.
    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    /// Returns the number of channels currently using the library.
    pub fn users(&self) -> usize {
        *self.inner.users.lock()
    }

    /// Registers a new user of the library.
    ///
    /// Initializes the engine library if there are no other users. The
    /// library stays initialized until the returned guard and all other
    /// guards are dropped.
    pub fn acquire(&self) -> Result<LibraryGuard<B>, Error> {
        let mut users = self.inner.users.lock();
        if *users == 0 {
            debug!("initializing resolver library");
            self.inner.backend.library_init().map_err(Error::EngineInit)?;
        }
        *users += 1;
        Ok(LibraryGuard {
            inner: self.inner.clone(),
        })
    }
}

impl<B> Clone for Library<B> {
    fn clone(&self) -> Self {
        Library {
            inner: self.inner.clone(),
        }
    }
}

impl<B> fmt::Debug for Library<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Library")
            .field("users", &*self.inner.users.lock())
            .finish()
    }
}

//------------ LibraryGuard --------------------------------------------------

/// Keeps the engine library initialized while it exists.
pub struct LibraryGuard<B: Backend> {
    inner: Arc<Inner<B>>,
}

impl<B: Backend> LibraryGuard<B> {
    /// Returns a reference to the engine.
    pub fn backend(&self) -> &B {
        &self.inner.backend
    }
}

impl<B: Backend> Drop for LibraryGuard<B> {
    fn drop(&mut self) {
        let mut users = self.inner.users.lock();
        *users -= 1;
        if *users == 0 {
            debug!("cleaning up resolver library");
            self.inner.backend.library_cleanup();
        }
    }
}

impl<B: Backend> fmt::Debug for LibraryGuard<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("LibraryGuard").finish()
    }
}
