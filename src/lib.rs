//! A callback-driven DNS resolution channel.
//!
//! This crate provides a [`Channel`] through which DNS queries are sent and
//! whose results are delivered to completion callbacks instead of being
//! waited for. The channel does not own an event loop. It tells the caller
//! which sockets to watch and how long to wait at most, and the caller
//! hands back the sockets that became ready. This makes it possible to
//! embed DNS resolution into any existing I/O loop.
//!
//! The DNS protocol itself is left to a resolver engine that sits behind
//! the traits of the [engine] module. The channel takes care of everything
//! between the caller and the engine: it validates arguments, tracks the
//! callback of every outstanding request, turns the engine’s replies into
//! one uniform result type per record type, and manages the process-wide
//! engine state.
//!
//! # Modules
//!
//! * [channel] contains the channel itself,
//! * [options] its configuration,
//! * [result] the types delivered to callbacks,
//! * [dispatch] and [decode] the machinery for completing requests,
//! * [sock] the socket state observer and socket sets,
//! * [library] the process-wide engine state,
//! * [engine] the interface towards the resolver engine, and
//! * [iana] the record types, classes, and status codes.
//!
//! # Reference of Feature Flags
//!
//! * `serde`: Enables serde serialization for the options, results, and
//!   a number of other types.

#![allow(renamed_and_removed_lints)]
#![allow(clippy::unknown_clippy_lints)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use self::channel::Channel;
pub use self::error::Error;
pub use self::iana::{Class, Rtype, Status};
pub use self::library::Library;
pub use self::options::ChannelOptions;
pub use self::result::QueryResult;

pub mod addr;
pub mod channel;
pub mod decode;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod iana;
pub mod library;
pub mod options;
pub mod result;
pub mod sock;
