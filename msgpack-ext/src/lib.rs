//! Class/singleton registry and registry-aware resolution of decoded
//! MessagePack values built on top of `msgpack-value`.
//!
//! `msgpack-value` decodes `Class`/`SingletonRef`/`Reduced` wire values
//! structurally, without needing a registry. This crate adds the layer
//! that gives those structural values meaning: [`Registry`] holds the
//! class/singleton bindings, and [`resolve`] walks a decoded tree turning
//! `Reduced` nodes into reconstructed instances and validating that
//! `Class`/`SingletonRef` nodes refer to something registered.

mod error;
mod reduce;
mod registry;
mod resolve;

pub use error::Error;
pub use reduce::{to_value, Reduced, Reducible};
pub use registry::{ClassHandle, Constructor, Registry};
pub use resolve::resolve;

use msgpack_value::{Limits, Value};

/// Unpack `bytes` and resolve the result against `registry` in one step.
pub fn unpack_resolved(bytes: &[u8], registry: &Registry) -> Result<Value, Error> {
    let (value, _) = msgpack_value::unpack(bytes)?;
    resolve(value, registry)
}

/// Like [`unpack_resolved`], but with an explicit recursion-depth limit.
pub fn unpack_resolved_with_limits(
    bytes: &[u8],
    limits: Limits,
    registry: &Registry,
) -> Result<Value, Error> {
    let (value, _) = msgpack_value::unpack_with_limits(bytes, limits)?;
    resolve(value, registry)
}
