//! Any MessagePack integer or float.

use crate::Error;

/// Represents a MessagePack integer or float.
///
/// Split into an unsigned and a signed variant (rather than one `i128`)
/// because that is exactly the range MessagePack's int family can carry:
/// `[-2^63, 2^64 - 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// An integer that fits in `u64` (encoded as uint8/16/32/64 or a positive fixint).
    UInt(u64),
    /// An integer that needs its sign bit (encoded as int8/16/32/64 or a negative fixint).
    Int(i64),
    /// A float, always encoded as binary64 (no narrowing to float32 on encode).
    Float(f64),
}

impl Number {
    /// If this is an integer, returns it as `i64` when it fits.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::UInt(v) => i64::try_from(v).ok(),
            Number::Int(v) => Some(v),
            Number::Float(_) => None,
        }
    }

    /// If this is an integer, returns it as `u64` when it fits.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Number::UInt(v) => Some(v),
            Number::Int(v) => u64::try_from(v).ok(),
            Number::Float(_) => None,
        }
    }

    /// If this is a float, returns it.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Number::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl From<u64> for Number {
    fn from(v: u64) -> Self {
        Number::UInt(v)
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        u64::try_from(v).map(Number::UInt).unwrap_or(Number::Int(v))
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Float(v)
    }
}

macro_rules! impl_from_small_int {
    ($($ty:ty => $via:ty),* $(,)?) => {
        $(
            impl From<$ty> for Number {
                fn from(v: $ty) -> Self {
                    Self::from(v as $via)
                }
            }
        )*
    };
}

impl_from_small_int! {
    u8 => u64, u16 => u64, u32 => u64,
    i8 => i64, i16 => i64, i32 => i64,
    f32 => f64,
}

/// Values outside `[-2^63, 2^64 - 1]` cannot be represented. The bound is
/// enforced here, at construction time, rather than inside `pack()` — a
/// `Number` is always in range once it exists.
impl TryFrom<i128> for Number {
    type Error = Error;

    fn try_from(v: i128) -> Result<Self, Error> {
        if let Ok(u) = u64::try_from(v) {
            Ok(Number::UInt(u))
        } else if let Ok(i) = i64::try_from(v) {
            Ok(Number::Int(i))
        } else {
            Err(Error::Overflow { what: "int" })
        }
    }
}
