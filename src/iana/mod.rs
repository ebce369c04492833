//! Registry values used by the channel.
//!
//! All types defined hereunder follow the same basic structure. They are
//! newtypes around a raw integer with associated constants for all
//! well-defined values. Since the engine may hand us values outside of the
//! well-defined set, the full integer range is representable, and the
//! `is_known()` method tells the two apart.
//!
//! There are two methods `from_int()` and `to_int()` to convert from and
//! to raw integer values as well as implementations of the `From` trait
//! for these.

#[macro_use]
mod macros;

pub mod class;
pub mod rtype;
pub mod status;

pub use self::class::Class;
pub use self::rtype::Rtype;
pub use self::status::Status;

use std::{error, fmt};

//------------ FromStrError --------------------------------------------------

/// A string did not name a known value nor contain a decimal number.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FromStrError(&'static str);

impl fmt::Display for FromStrError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown {} value", self.0)
    }
}

impl error::Error for FromStrError {}
