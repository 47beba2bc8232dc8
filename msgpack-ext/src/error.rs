//! Errors produced while registering classes/singletons or resolving a
//! decoded value tree against a [`crate::Registry`].

use std::fmt;

/// Error surface for [`crate::Registry`] and [`crate::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Packing or unpacking the underlying bytes failed.
    Value(msgpack_value::Error),
    /// A `Class` reference named a `(module, name)` pair no handle is registered for.
    UnknownClass {
        /// The class's module/namespace.
        module: String,
        /// The class's qualified name within `module`.
        name: String,
    },
    /// A `SingletonRef` named a qualified name no value is registered for.
    UnknownSingleton {
        /// The singleton's qualified name.
        name: String,
    },
    /// A registered class's constructor rejected a `Reduced` value's arguments.
    ReduceFailed {
        /// The class being reconstructed.
        module: String,
        /// The class being reconstructed.
        name: String,
        /// What went wrong.
        reason: String,
    },
    /// Registering a class under a `(module, name)` already bound to a
    /// different handle.
    ClassConflict {
        /// The class's module/namespace.
        module: String,
        /// The class's qualified name within `module`.
        name: String,
    },
    /// Registering a singleton under a qualified name already bound to a
    /// different value.
    SingletonConflict {
        /// The singleton's qualified name.
        name: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Value(e) => write!(f, "{e}"),
            Error::UnknownClass { module, name } => {
                write!(f, "no class registered for {module}.{name}")
            }
            Error::UnknownSingleton { name } => write!(f, "no singleton registered for {name}"),
            Error::ReduceFailed {
                module,
                name,
                reason,
            } => write!(f, "failed to reconstruct {module}.{name}: {reason}"),
            Error::ClassConflict { module, name } => {
                write!(f, "{module}.{name} is already registered to a different class")
            }
            Error::SingletonConflict { name } => {
                write!(f, "{name} is already registered to a different value")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<msgpack_value::Error> for Error {
    fn from(value: msgpack_value::Error) -> Self {
        Error::Value(value)
    }
}
