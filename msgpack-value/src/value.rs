//! The dynamic value type this codec packs and unpacks.

use crate::Number;

/// Any value this codec can pack or unpack.
///
/// Covers the primary MessagePack categories (`Nil`..`Map`) plus the closed
/// set of host-language extensions this system carries (`Complex`..`Reduced`).
/// The extension variants hold exactly the data their wire shape carries;
/// `Class`/`SingletonRef`/`Reduced` are *structural* here — they do not
/// reference a live registry entry. Resolving `Class`/`SingletonRef` by name
/// against a registry, and reconstructing a `Reduced` object via a
/// registered class handle, is a job for a layer above this one.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absence of a value.
    Nil,
    /// `true` / `false`.
    Bool(bool),
    /// Any integer or float.
    Number(Number),
    /// An immutable byte sequence (`bin8`/`bin16`/`bin32`).
    Bytes(Vec<u8>),
    /// UTF-8 text (`fixstr`/`str8`/`str16`/`str32`).
    Str(String),
    /// An ordered, finite sequence of values.
    Array(Vec<Value>),
    /// An ordered set of `(key, value)` pairs, in iteration order.
    Map(Vec<(Value, Value)>),
    /// A complex number (ext tag `0x01`): two consecutive binary64 values.
    Complex {
        /// Real part.
        re: f64,
        /// Imaginary part.
        im: f64,
    },
    /// A mutable byte buffer (ext tag `0x02`), distinct from the immutable `Bytes`.
    Buffer(Vec<u8>),
    /// A mutable sequence (ext tag `0x03`), distinct from the plain `Array`.
    List(Vec<Value>),
    /// An unordered set (ext tag `0x04`).
    Set(Vec<Value>),
    /// A frozen (immutable) unordered set (ext tag `0x05`).
    FrozenSet(Vec<Value>),
    /// A point in time (ext tag `0xff`); see [`crate::Timestamp`].
    Timestamp(crate::Timestamp),
    /// A reference to a registered class (ext tag `0x06`).
    Class {
        /// The class's module/namespace.
        module: String,
        /// The class's qualified name within `module`.
        name: String,
    },
    /// A reference to a registered singleton, by qualified name (ext tag `0x07`).
    SingletonRef(String),
    /// A generic reducible object (ext tag `0x7f`): `(class, args, state?, list_items?, dict_items?)`.
    Reduced(Box<Construct>),
}

/// The wire shape carried by ext tag `0x7f`: a class reference plus the
/// pieces needed to reconstruct an instance of it. This is only half of the
/// host reducer protocol's result — the other half, a reducer that names a
/// singleton instead of reconstructing an object, has no payload beyond the
/// name and is carried directly as [`Value::SingletonRef`] (ext tag `0x07`).
/// The full `Singleton | Construct` sum lives one layer up, in
/// `msgpack-ext`'s `Reduced`, since only that layer has a registry to
/// resolve a singleton name against.
#[derive(Debug, Clone, PartialEq)]
pub struct Construct {
    /// The class used to reconstruct the object.
    pub class: (String, String),
    /// Positional constructor arguments.
    pub args: Vec<Value>,
    /// Optional state to apply after construction (e.g. `__setstate__`).
    pub state: Option<Value>,
    /// Items to append to the reconstructed object, if it is list-like.
    pub list_items: Vec<Value>,
    /// Items to insert into the reconstructed object, if it is dict-like.
    pub dict_items: Vec<(Value, Value)>,
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Number> for Value {
    fn from(v: Number) -> Self {
        Value::Number(v)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Number(Number::from(v))
                }
            }
        )*
    };
}
impl_from_number!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

/// Recursion-depth cap applied while unpacking containers.
///
/// Modeled as an explicit parameter rather than a hidden global so callers
/// can tighten or loosen it per input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum container nesting depth `unpack` will descend into.
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_depth: 512 }
    }
}
