//! MessagePack format markers.
//!
//! See <https://github.com/msgpack/msgpack/blob/master/spec.md#formats>

const FIX_MAP: u8 = 0x80;
const FIX_ARRAY: u8 = 0x90;
const FIX_STR: u8 = 0xa0;

const NIL: u8 = 0xc0;
const NEVER_USED: u8 = 0xc1;
const FALSE: u8 = 0xc2;
const TRUE: u8 = 0xc3;
const BIN8: u8 = 0xc4;
const BIN16: u8 = 0xc5;
const BIN32: u8 = 0xc6;
const EXT8: u8 = 0xc7;
const EXT16: u8 = 0xc8;
const EXT32: u8 = 0xc9;
const FLOAT32: u8 = 0xca;
const FLOAT64: u8 = 0xcb;
const UINT8: u8 = 0xcc;
const UINT16: u8 = 0xcd;
const UINT32: u8 = 0xce;
const UINT64: u8 = 0xcf;
const INT8: u8 = 0xd0;
const INT16: u8 = 0xd1;
const INT32: u8 = 0xd2;
const INT64: u8 = 0xd3;
const FIXEXT1: u8 = 0xd4;
const FIXEXT2: u8 = 0xd5;
const FIXEXT4: u8 = 0xd6;
const FIXEXT8: u8 = 0xd7;
const FIXEXT16: u8 = 0xd8;
const STR8: u8 = 0xd9;
const STR16: u8 = 0xda;
const STR32: u8 = 0xdb;
const ARRAY16: u8 = 0xdc;
const ARRAY32: u8 = 0xdd;
const MAP16: u8 = 0xde;
const MAP32: u8 = 0xdf;

/// A MessagePack format marker, decoded from (or about to be encoded as) a
/// single leading tag byte.
///
/// Unlike the wire layout, which spends two disjoint bit patterns
/// (`0xxxxxxx` and `111xxxxx`) on "small integer in the marker byte",
/// [`Format`] collapses both into one [`Format::FixInt`] carrying the full
/// signed byte: this codec's [`Value`](crate) model only cares whether the
/// decoded magnitude is negative, and `i8` already answers that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Fixint: a 7-bit unsigned or 5-bit signed value stored in the marker,
    /// widened to `i8` (`0x00..=0x7f` and `0xe0..=0xff` on the wire).
    FixInt(i8),
    /// Fixmap (1000xxxx): a map whose length (0..16) is stored in the marker.
    FixMap(u8),
    /// Fixarray (1001xxxx): an array whose length (0..16) is stored in the marker.
    FixArray(u8),
    /// Fixstr (101xxxxx): a string whose byte length (0..32) is stored in the marker.
    FixStr(u8),
    /// Nil (0xc0).
    Nil,
    /// Reserved (0xc1), never emitted by a conforming encoder.
    NeverUsed,
    /// False (0xc2).
    False,
    /// True (0xc3).
    True,
    /// Binary with an 8-bit length prefix (0xc4).
    Bin8,
    /// Binary with a 16-bit length prefix (0xc5).
    Bin16,
    /// Binary with a 32-bit length prefix (0xc6).
    Bin32,
    /// Extension with an 8-bit length prefix (0xc7).
    Ext8,
    /// Extension with a 16-bit length prefix (0xc8).
    Ext16,
    /// Extension with a 32-bit length prefix (0xc9).
    Ext32,
    /// IEEE-754 binary32 (0xca).
    Float32,
    /// IEEE-754 binary64 (0xcb).
    Float64,
    /// Unsigned 8-bit integer (0xcc).
    Uint8,
    /// Unsigned 16-bit integer (0xcd).
    Uint16,
    /// Unsigned 32-bit integer (0xce).
    Uint32,
    /// Unsigned 64-bit integer (0xcf).
    Uint64,
    /// Signed 8-bit integer (0xd0).
    Int8,
    /// Signed 16-bit integer (0xd1).
    Int16,
    /// Signed 32-bit integer (0xd2).
    Int32,
    /// Signed 64-bit integer (0xd3).
    Int64,
    /// Fixext1 (0xd4): extension with a 1-byte payload.
    FixExt1,
    /// Fixext2 (0xd5): extension with a 2-byte payload.
    FixExt2,
    /// Fixext4 (0xd6): extension with a 4-byte payload.
    FixExt4,
    /// Fixext8 (0xd7): extension with an 8-byte payload.
    FixExt8,
    /// Fixext16 (0xd8): extension with a 16-byte payload.
    FixExt16,
    /// Str8: UTF-8 string with an 8-bit length prefix (0xd9).
    Str8,
    /// Str16: UTF-8 string with a 16-bit length prefix (0xda).
    Str16,
    /// Str32: UTF-8 string with a 32-bit length prefix (0xdb).
    Str32,
    /// Array16: array with a 16-bit length prefix (0xdc).
    Array16,
    /// Array32: array with a 32-bit length prefix (0xdd).
    Array32,
    /// Map16: map with a 16-bit length prefix (0xde).
    Map16,
    /// Map32: map with a 32-bit length prefix (0xdf).
    Map32,
}

impl Format {
    /// Return the marker byte for this format.
    pub const fn as_byte(&self) -> u8 {
        match self {
            Format::FixInt(v) => *v as u8,
            Format::FixMap(l) => FIX_MAP | *l,
            Format::FixArray(l) => FIX_ARRAY | *l,
            Format::FixStr(l) => FIX_STR | *l,
            Format::Nil => NIL,
            Format::NeverUsed => NEVER_USED,
            Format::False => FALSE,
            Format::True => TRUE,
            Format::Bin8 => BIN8,
            Format::Bin16 => BIN16,
            Format::Bin32 => BIN32,
            Format::Ext8 => EXT8,
            Format::Ext16 => EXT16,
            Format::Ext32 => EXT32,
            Format::Float32 => FLOAT32,
            Format::Float64 => FLOAT64,
            Format::Uint8 => UINT8,
            Format::Uint16 => UINT16,
            Format::Uint32 => UINT32,
            Format::Uint64 => UINT64,
            Format::Int8 => INT8,
            Format::Int16 => INT16,
            Format::Int32 => INT32,
            Format::Int64 => INT64,
            Format::FixExt1 => FIXEXT1,
            Format::FixExt2 => FIXEXT2,
            Format::FixExt4 => FIXEXT4,
            Format::FixExt8 => FIXEXT8,
            Format::FixExt16 => FIXEXT16,
            Format::Str8 => STR8,
            Format::Str16 => STR16,
            Format::Str32 => STR32,
            Format::Array16 => ARRAY16,
            Format::Array32 => ARRAY32,
            Format::Map16 => MAP16,
            Format::Map32 => MAP32,
        }
    }

    /// Parse a marker byte into a [`Format`].
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0x00..=0x7f => Self::FixInt(byte as i8),
            0x80..=0x8f => Self::FixMap(byte - FIX_MAP),
            0x90..=0x9f => Self::FixArray(byte - FIX_ARRAY),
            0xa0..=0xbf => Self::FixStr(byte - FIX_STR),
            NIL => Self::Nil,
            NEVER_USED => Self::NeverUsed,
            FALSE => Self::False,
            TRUE => Self::True,
            BIN8 => Self::Bin8,
            BIN16 => Self::Bin16,
            BIN32 => Self::Bin32,
            EXT8 => Self::Ext8,
            EXT16 => Self::Ext16,
            EXT32 => Self::Ext32,
            FLOAT32 => Self::Float32,
            FLOAT64 => Self::Float64,
            UINT8 => Self::Uint8,
            UINT16 => Self::Uint16,
            UINT32 => Self::Uint32,
            UINT64 => Self::Uint64,
            INT8 => Self::Int8,
            INT16 => Self::Int16,
            INT32 => Self::Int32,
            INT64 => Self::Int64,
            FIXEXT1 => Self::FixExt1,
            FIXEXT2 => Self::FixExt2,
            FIXEXT4 => Self::FixExt4,
            FIXEXT8 => Self::FixExt8,
            FIXEXT16 => Self::FixExt16,
            STR8 => Self::Str8,
            STR16 => Self::Str16,
            STR32 => Self::Str32,
            ARRAY16 => Self::Array16,
            ARRAY32 => Self::Array32,
            MAP16 => Self::Map16,
            MAP32 => Self::Map32,
            0xe0..=0xff => Self::FixInt(byte as i8),
        }
    }

    /// Pick the marker for a length-prefixed payload of `len` bytes, given
    /// the markers for the 8/16/32-bit length-prefix forms. Returns `None`
    /// when `len` does not fit a `u32` length prefix.
    ///
    /// Collapses the repeated "does it fit in a `u8`? a `u16`? else `u32`"
    /// ladder that `bin`/`ext`/`str`/`array`/`map` framing all share once a
    /// format has no short (fixed-in-marker) form left to consider.
    pub const fn for_len_prefix(len: usize, narrow: Self, medium: Self, wide: Self) -> Option<Self> {
        if len <= u8::MAX as usize {
            Some(narrow)
        } else if len <= u16::MAX as usize {
            Some(medium)
        } else if len <= u32::MAX as usize {
            Some(wide)
        } else {
            None
        }
    }
}
