//! Errors produced while packing or unpacking a [`crate::Value`].

use std::fmt;

/// Error surface for [`crate::pack`] and [`crate::unpack`].
///
/// Covers structural failures only. Registry-aware failures
/// (`UnknownClass`, `UnknownSingleton`, `ReduceFailed`) are produced one
/// layer up, by the registry-aware resolution pass that runs after this
/// crate's decoding, and are not constructed here.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A length or integer magnitude exceeds what the wire format can carry.
    Overflow {
        /// What was too large: `"int"`, `"string"`, `"bytes"`, `"array"`, `"map"`, or `"extension"`.
        what: &'static str,
    },
    /// The reader ran past the end of the input.
    Truncation {
        /// Offset at which the failing read started.
        offset: usize,
    },
    /// The input started with a reserved tag (`0xc1`) or an otherwise malformed header.
    InvalidType {
        /// The offending tag byte.
        tag: u8,
    },
    /// An extension tag fell outside the reserved range `{0x01..=0x7f, 0xff}`.
    InvalidExtension {
        /// The offending extension type byte.
        tag: i8,
    },
    /// A payload's shape did not match what its format requires (bad UTF-8,
    /// a malformed reduced-object tuple, a mis-sized timestamp payload, ...).
    Decode {
        /// What was wrong with the payload.
        reason: &'static str,
    },
    /// Recursion depth exceeded the configured [`crate::Limits::max_depth`].
    DepthExceeded {
        /// The configured cap that was exceeded.
        max_depth: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Overflow { what } => write!(f, "{what} exceeds what MessagePack can encode"),
            Error::Truncation { offset } => write!(f, "truncated input at offset {offset}"),
            Error::InvalidType { tag } => write!(f, "invalid type tag 0x{tag:02x}"),
            Error::InvalidExtension { tag } => write!(f, "invalid extension tag 0x{tag:02x}"),
            Error::Decode { reason } => write!(f, "malformed payload: {reason}"),
            Error::DepthExceeded { max_depth } => {
                write!(f, "recursion depth exceeded the configured limit ({max_depth})")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<msgpack_core::Error> for Error {
    fn from(value: msgpack_core::Error) -> Self {
        match value {
            msgpack_core::Error::Truncation { offset, .. } => Error::Truncation { offset },
        }
    }
}
