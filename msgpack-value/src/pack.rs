//! The packer: type-dispatches a [`Value`] and emits minimal-width framed
//! MessagePack bytes.

use msgpack_core::{ByteWriter, Format};

use crate::{Construct, Error, Number, Value};

/// Pack `value` into a fresh byte buffer.
pub fn pack(value: &Value) -> Result<Vec<u8>, Error> {
    let mut writer = ByteWriter::new();
    pack_into(value, &mut writer)?;
    Ok(writer.into_vec())
}

/// Pack `value`, appending to an existing writer. Exposed so callers (and
/// `msgpack-ext`) can pack several values back to back without re-allocating.
pub fn pack_into(value: &Value, writer: &mut ByteWriter) -> Result<(), Error> {
    match value {
        Value::Nil => writer.write_format(Format::Nil),
        Value::Bool(false) => writer.write_format(Format::False),
        Value::Bool(true) => writer.write_format(Format::True),
        Value::Number(n) => pack_number(*n, writer),
        Value::Bytes(b) => pack_bytes(b, writer)?,
        Value::Str(s) => pack_str(s, writer)?,
        Value::Array(items) => pack_array(items, writer)?,
        Value::Map(entries) => pack_map(entries, writer)?,
        Value::Complex { re, im } => {
            let mut payload = Vec::with_capacity(16);
            payload.extend_from_slice(&re.to_be_bytes());
            payload.extend_from_slice(&im.to_be_bytes());
            write_ext(writer, 0x01, &payload)?;
        }
        Value::Buffer(bytes) => write_ext(writer, 0x02, bytes)?,
        Value::List(items) => {
            let payload = pack(&Value::Array(items.clone()))?;
            write_ext(writer, 0x03, &payload)?;
        }
        Value::Set(items) => {
            let payload = pack(&Value::Array(items.clone()))?;
            write_ext(writer, 0x04, &payload)?;
        }
        Value::FrozenSet(items) => {
            let payload = pack(&Value::Array(items.clone()))?;
            write_ext(writer, 0x05, &payload)?;
        }
        Value::Timestamp(ts) => write_ext(writer, -1, &ts.to_payload())?,
        Value::Class { module, name } => {
            let payload = pack_class_payload(module, name)?;
            write_ext(writer, 0x06, &payload)?;
        }
        Value::SingletonRef(name) => {
            let payload = pack(&Value::Str(name.clone()))?;
            write_ext(writer, 0x07, &payload)?;
        }
        Value::Reduced(reduced) => {
            let payload = pack_reduced(reduced)?;
            write_ext(writer, 0x7f, &payload)?;
        }
    }
    Ok(())
}

fn pack_class_payload(module: &str, name: &str) -> Result<Vec<u8>, Error> {
    let mut w = ByteWriter::new();
    pack_str(module, &mut w)?;
    pack_str(name, &mut w)?;
    Ok(w.into_vec())
}

fn pack_reduced(construct: &Construct) -> Result<Vec<u8>, Error> {
    let mut items = vec![Value::Class {
        module: construct.class.0.clone(),
        name: construct.class.1.clone(),
    }];
    items.push(Value::Array(construct.args.clone()));
    items.push(construct.state.clone().unwrap_or(Value::Nil));
    items.push(Value::Array(construct.list_items.clone()));
    items.push(Value::Map(construct.dict_items.clone()));
    pack(&Value::Array(items))
}

fn pack_number(n: Number, writer: &mut ByteWriter) {
    match n {
        Number::UInt(v) => pack_uint(v, writer),
        Number::Int(v) => pack_int(v, writer),
        Number::Float(v) => {
            writer.write_format(Format::Float64);
            writer.write_f64(v);
        }
    }
}

/// Minimal-width signed integer encoding. The non-negative half of the
/// range is handled by [`pack_uint`] so that, e.g., 128 encodes as `uint8`
/// rather than `int16`.
fn pack_int(v: i64, writer: &mut ByteWriter) {
    if v >= 0 {
        return pack_uint(v as u64, writer);
    }
    match v {
        -32..=-1 => writer.write_format(Format::FixInt(v as i8)),
        -128..=-33 => {
            writer.write_format(Format::Int8);
            writer.write_i8(v as i8);
        }
        -32768..=-129 => {
            writer.write_format(Format::Int16);
            writer.write_i16(v as i16);
        }
        _ if v >= i32::MIN as i64 => {
            writer.write_format(Format::Int32);
            writer.write_i32(v as i32);
        }
        _ => {
            writer.write_format(Format::Int64);
            writer.write_i64(v);
        }
    }
}

fn pack_uint(v: u64, writer: &mut ByteWriter) {
    match v {
        0..=127 => writer.write_format(Format::FixInt(v as i8)),
        128..=0xff => {
            writer.write_format(Format::Uint8);
            writer.write_u8(v as u8);
        }
        0x100..=0xffff => {
            writer.write_format(Format::Uint16);
            writer.write_u16(v as u16);
        }
        0x1_0000..=0xffff_ffff => {
            writer.write_format(Format::Uint32);
            writer.write_u32(v as u32);
        }
        _ => {
            writer.write_format(Format::Uint64);
            writer.write_u64(v);
        }
    }
}

fn pack_bytes(bytes: &[u8], writer: &mut ByteWriter) -> Result<(), Error> {
    write_len_prefixed(
        bytes.len(),
        (Format::Bin8, Format::Bin16, Format::Bin32),
        "bytes",
        writer,
    )?;
    writer.write_bytes(bytes);
    Ok(())
}

/// Write the minimal-width marker and length prefix for a payload that has
/// no short (fixed-in-marker) form — just `narrow`/`medium`/`wide` by byte
/// count. Shared by `bin`, `ext` framing, and by `str` framing above its
/// 32-byte fixstr cutoff.
fn write_len_prefixed(
    len: usize,
    (narrow, medium, wide): (Format, Format, Format),
    what: &'static str,
    writer: &mut ByteWriter,
) -> Result<(), Error> {
    let format = Format::for_len_prefix(len, narrow, medium, wide).ok_or(Error::Overflow { what })?;
    writer.write_format(format);
    if len <= u8::MAX as usize {
        writer.write_u8(len as u8);
    } else if len <= u16::MAX as usize {
        writer.write_u16(len as u16);
    } else {
        writer.write_u32(len as u32);
    }
    Ok(())
}

/// Like [`write_len_prefixed`], for formats with only 16/32-bit length
/// prefixes (`array`, `map` — their 8-bit-length-equivalent range is already
/// covered by a fixed-in-marker short form, so there is no 8-bit form here).
fn write_len_prefixed16_32(
    len: usize,
    (medium, wide): (Format, Format),
    what: &'static str,
    writer: &mut ByteWriter,
) -> Result<(), Error> {
    if len <= u16::MAX as usize {
        writer.write_format(medium);
        writer.write_u16(len as u16);
    } else if len <= u32::MAX as usize {
        writer.write_format(wide);
        writer.write_u32(len as u32);
    } else {
        return Err(Error::Overflow { what });
    }
    Ok(())
}

fn pack_str(s: &str, writer: &mut ByteWriter) -> Result<(), Error> {
    let bytes = s.as_bytes();
    match bytes.len() {
        len @ 0..=31 => writer.write_format(Format::FixStr(len as u8)),
        len => write_len_prefixed(
            len,
            (Format::Str8, Format::Str16, Format::Str32),
            "string",
            writer,
        )?,
    }
    writer.write_bytes(bytes);
    Ok(())
}

fn pack_array(items: &[Value], writer: &mut ByteWriter) -> Result<(), Error> {
    match items.len() {
        len @ 0..=15 => writer.write_format(Format::FixArray(len as u8)),
        len => write_len_prefixed16_32(len, (Format::Array16, Format::Array32), "array", writer)?,
    }
    for item in items {
        pack_into(item, writer)?;
    }
    Ok(())
}

fn pack_map(entries: &[(Value, Value)], writer: &mut ByteWriter) -> Result<(), Error> {
    match entries.len() {
        len @ 0..=15 => writer.write_format(Format::FixMap(len as u8)),
        len => write_len_prefixed16_32(len, (Format::Map16, Format::Map32), "map", writer)?,
    }
    for (k, v) in entries {
        pack_into(k, writer)?;
        pack_into(v, writer)?;
    }
    Ok(())
}

/// Frame an extension payload by size: `fixext1/2/4/8/16` when the payload
/// is exactly one of those widths, else `ext8/16/32`.
fn write_ext(writer: &mut ByteWriter, tag: i8, payload: &[u8]) -> Result<(), Error> {
    match payload.len() {
        1 => writer.write_format(Format::FixExt1),
        2 => writer.write_format(Format::FixExt2),
        4 => writer.write_format(Format::FixExt4),
        8 => writer.write_format(Format::FixExt8),
        16 => writer.write_format(Format::FixExt16),
        len => write_len_prefixed(
            len,
            (Format::Ext8, Format::Ext16, Format::Ext32),
            "extension",
            writer,
        )?,
    }
    writer.write_i8(tag);
    writer.write_bytes(payload);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Nil, & [0xc0])]
    #[case(Value::Bool(true), & [0xc3])]
    #[case(Value::Bool(false), & [0xc2])]
    #[case(Value::from(127i64), & [0x7f])]
    #[case(Value::from(128i64), & [0xcc, 0x80])]
    #[case(Value::from(-32i64), & [0xe0])]
    #[case(Value::from(-33i64), & [0xd0, 0xdf])]
    #[case(Value::Str(String::new()), & [0xa0])]
    #[case(Value::Str("a".into()), & [0xa1, 0x61])]
    #[case(Value::Bytes(vec![0x00, 0x01]), & [0xc4, 0x02, 0x00, 0x01])]
    #[case(Value::Array(vec![]), & [0x90])]
    #[case(Value::Map(vec![]), & [0x80])]
    fn matches_scenario_bytes(#[case] value: Value, #[case] expected: &[u8]) {
        assert_eq!(pack(&value).unwrap(), expected);
    }

    #[test]
    fn packs_array_of_two_ints() {
        let v = Value::Array(vec![Value::from(1i64), Value::from(2i64)]);
        assert_eq!(pack(&v).unwrap(), [0x92, 0x01, 0x02]);
    }

    #[test]
    fn packs_float_as_binary64() {
        let v = Value::from(1.0f64);
        assert_eq!(pack(&v).unwrap(), [0xcb, 0x3f, 0xf0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn packs_complex_as_fixext16() {
        let v = Value::Complex { re: 1.0, im: 2.0 };
        let bytes = pack(&v).unwrap();
        assert_eq!(bytes[0], 0xd8);
        assert_eq!(bytes[1] as i8, 0x01);
        assert_eq!(bytes.len(), 18);
    }

    #[test]
    fn rejects_integer_magnitude_overflow() {
        // Number itself cannot be built out of range; this checks the
        // conversion boundary instead (see number.rs).
        assert!(Number::try_from(1i128 << 64).is_err());
        assert!(Number::try_from(-(1i128 << 63) - 1).is_err());
    }
}
