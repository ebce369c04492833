//! Completion dispatching.
//!
//! Every request submitted to the engine carries a completion object from
//! this module. The object owns the caller’s callback and whatever context
//! is needed to turn the engine’s result into what the callback expects.
//! Consuming the object runs the callback exactly once.
//!
//! A completion that is dropped without being consumed still runs its
//! callback, reporting [`Status::EDESTRUCTION`]. This way no request ever
//! vanishes silently, even if an engine session is torn down with requests
//! still in flight.
//!
//! Callbacks run inside a tracing span identifying the request and any
//! panic they raise is caught and logged. A misbehaving callback can thus
//! neither unwind through the engine nor affect other requests.

use crate::decode::{decode_addr_info, decode_answer, decode_host};
use crate::engine::{AddrInfo, Answer, HostEnt};
use crate::iana::{Rtype, Status};
use crate::result::{AddrInfoResult, HostResult, NameInfoResult, QueryResult};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug_span, error, trace};

//------------ Callback ------------------------------------------------------

/// The type of a boxed completion callback.
pub type Callback<T> = Box<dyn FnOnce(Result<T, Status>) + Send + 'static>;

//------------ Pending -------------------------------------------------------

/// A callback that has not been run yet.
struct Pending<T> {
    kind: &'static str,
    callback: Option<Callback<T>>,
}

impl<T> Pending<T> {
    fn new(kind: &'static str, callback: Callback<T>) -> Self {
        Pending {
            kind,
            callback: Some(callback),
        }
    }

    /// Runs the callback unless it already ran.
    fn fire(&mut self, res: Result<T, Status>) {
        let callback = match self.callback.take() {
            Some(callback) => callback,
            None => return,
        };
        let span = debug_span!("completion", kind = self.kind);
        let _enter = span.enter();
        match &res {
            Ok(_) => trace!("request succeeded"),
            Err(status) => trace!("request failed: {}", status),
        }
        if panic::catch_unwind(AssertUnwindSafe(move || callback(res)))
            .is_err()
        {
            error!("{} callback panicked", self.kind);
        }
    }
}

impl<T> Drop for Pending<T> {
    fn drop(&mut self) {
        self.fire(Err(Status::EDESTRUCTION))
    }
}

//------------ QueryCompletion -----------------------------------------------

/// The completion of a record query.
pub struct QueryCompletion {
    rtype: Rtype,
    pending: Pending<QueryResult>,
}

impl QueryCompletion {
    pub(crate) fn new(rtype: Rtype, callback: Callback<QueryResult>) -> Self {
        QueryCompletion {
            rtype,
            pending: Pending::new("query", callback),
        }
    }

    /// Returns the record type that was asked for.
    pub fn rtype(&self) -> Rtype {
        self.rtype
    }

    /// Completes the query.
    ///
    /// If `status` is success, `answer` is decoded for the record type
    /// of the query. A missing answer is reported as
    /// [`Status::EBADRESP`]. Otherwise the answer is ignored and the
    /// callback receives `status`.
    pub fn complete(mut self, status: Status, answer: Option<&dyn Answer>) {
        let res = match (status.into_result(), answer) {
            (Err(status), _) => Err(status),
            (Ok(()), None) => Err(Status::EBADRESP),
            (Ok(()), Some(answer)) => decode_answer(self.rtype, answer),
        };
        self.pending.fire(res)
    }

    /// Fails the query with the given status.
    pub fn fail(self, status: Status) {
        self.complete(failure(status), None)
    }
}

impl fmt::Debug for QueryCompletion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("QueryCompletion")
            .field("rtype", &self.rtype)
            .finish()
    }
}

//------------ HostCompletion ------------------------------------------------

/// The completion of a host lookup by name or by address.
pub struct HostCompletion {
    pending: Pending<HostResult>,
}

impl HostCompletion {
    pub(crate) fn new(callback: Callback<HostResult>) -> Self {
        HostCompletion {
            pending: Pending::new("host", callback),
        }
    }

    /// Completes the lookup.
    pub fn complete(mut self, status: Status, host: Option<HostEnt>) {
        let res = match (status.into_result(), host) {
            (Err(status), _) => Err(status),
            (Ok(()), None) => Err(Status::EBADRESP),
            (Ok(()), Some(host)) => Ok(decode_host(host)),
        };
        self.pending.fire(res)
    }

    /// Fails the lookup with the given status.
    pub fn fail(self, status: Status) {
        self.complete(failure(status), None)
    }
}

impl fmt::Debug for HostCompletion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("HostCompletion").finish()
    }
}

//------------ NameInfoCompletion --------------------------------------------

/// The completion of a reverse service name lookup.
pub struct NameInfoCompletion {
    pending: Pending<NameInfoResult>,
}

impl NameInfoCompletion {
    pub(crate) fn new(callback: Callback<NameInfoResult>) -> Self {
        NameInfoCompletion {
            pending: Pending::new("nameinfo", callback),
        }
    }

    /// Completes the lookup.
    ///
    /// The service is only present if it was asked for.
    pub fn complete(
        mut self,
        status: Status,
        node: Option<&str>,
        service: Option<&str>,
    ) {
        let res = match (status.into_result(), node) {
            (Err(status), _) => Err(status),
            (Ok(()), None) => Err(Status::EBADRESP),
            (Ok(()), Some(node)) => Ok(NameInfoResult {
                node: node.into(),
                service: service.map(Into::into),
            }),
        };
        self.pending.fire(res)
    }

    /// Fails the lookup with the given status.
    pub fn fail(self, status: Status) {
        self.complete(failure(status), None, None)
    }
}

impl fmt::Debug for NameInfoCompletion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NameInfoCompletion").finish()
    }
}

//------------ AddrInfoCompletion --------------------------------------------

/// The completion of an address info lookup.
pub struct AddrInfoCompletion {
    pending: Pending<AddrInfoResult>,
}

impl AddrInfoCompletion {
    pub(crate) fn new(callback: Callback<AddrInfoResult>) -> Self {
        AddrInfoCompletion {
            pending: Pending::new("addrinfo", callback),
        }
    }

    /// Completes the lookup.
    pub fn complete(mut self, status: Status, info: Option<AddrInfo>) {
        let res = match (status.into_result(), info) {
            (Err(status), _) => Err(status),
            (Ok(()), None) => Err(Status::EBADRESP),
            (Ok(()), Some(info)) => Ok(decode_addr_info(info)),
        };
        self.pending.fire(res)
    }

    /// Fails the lookup with the given status.
    pub fn fail(self, status: Status) {
        self.complete(failure(status), None)
    }
}

impl fmt::Debug for AddrInfoCompletion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AddrInfoCompletion").finish()
    }
}

//------------ Helpers -------------------------------------------------------

/// Makes sure failing with a success status still fails.
fn failure(status: Status) -> Status {
    if status.is_success() {
        Status::EBADRESP
    } else {
        status
    }
}

//============ Tests =========================================================
