//! Byte-level MessagePack primitives.
//!
//! This crate provides the growable writer, bounds-checked reader and
//! format-tag table that `msgpack-value` and `msgpack-ext` build on. It has
//! no notion of a `Value`, an extension, or a registry — those live one
//! layer up.

mod error;
pub mod io;
mod formats;

pub use error::Error;
pub use formats::Format;
pub use io::{ByteReader, ByteWriter};
