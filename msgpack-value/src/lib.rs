//! Dynamic value model and wire-level pack/unpack for a MessagePack dialect
//! that carries a closed set of host-language extensions on top of the
//! primary MessagePack types.
//!
//! This crate is registry-free: `Class`, `SingletonRef` and `Reduced` values
//! decode into plain structural data. Resolving them against a live class
//! and singleton registry is the concern of a layer built on top of this
//! one.

mod error;
mod number;
mod pack;
mod timestamp;
mod unpack;
mod value;

pub use error::Error;
pub use number::Number;
pub use pack::{pack, pack_into};
pub use timestamp::{Timestamp, NANOS_MAX};
pub use unpack::{unpack, unpack_with_limits};
pub use value::{Construct, Limits, Value};
