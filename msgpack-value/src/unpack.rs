//! The unpacker: decodes bytes into a [`Value`], enforcing the recursion cap
//! from [`Limits`] and the closed extension-tag table.

use msgpack_core::{ByteReader, Format};

use crate::{Construct, Error, Limits, Number, Timestamp, Value};

/// Unpack a single value from `bytes` using the default limits.
///
/// Returns the decoded value and the number of bytes consumed; trailing
/// bytes are not an error, since a stream may hold more than one value.
pub fn unpack(bytes: &[u8]) -> Result<(Value, usize), Error> {
    unpack_with_limits(bytes, Limits::default())
}

/// Unpack a single value from `bytes`, enforcing `limits`.
pub fn unpack_with_limits(bytes: &[u8], limits: Limits) -> Result<(Value, usize), Error> {
    let mut reader = ByteReader::new(bytes);
    let value = unpack_value(&mut reader, &limits, 0)?;
    Ok((value, reader.offset()))
}

fn unpack_value(reader: &mut ByteReader, limits: &Limits, depth: usize) -> Result<Value, Error> {
    let tag = reader.read_u8()?;
    let format = Format::from_byte(tag);
    match format {
        Format::FixInt(v) => Ok(Value::Number(if v >= 0 {
            Number::UInt(v as u64)
        } else {
            Number::Int(v as i64)
        })),
        Format::Nil => Ok(Value::Nil),
        Format::NeverUsed => Err(Error::InvalidType { tag }),
        Format::False => Ok(Value::Bool(false)),
        Format::True => Ok(Value::Bool(true)),
        Format::Uint8 => Ok(Value::Number(Number::UInt(reader.read_u8()? as u64))),
        Format::Uint16 => Ok(Value::Number(Number::UInt(reader.read_u16()? as u64))),
        Format::Uint32 => Ok(Value::Number(Number::UInt(reader.read_u32()? as u64))),
        Format::Uint64 => Ok(Value::Number(Number::UInt(reader.read_u64()?))),
        Format::Int8 => Ok(Value::Number(Number::Int(reader.read_i8()? as i64))),
        Format::Int16 => Ok(Value::Number(Number::Int(reader.read_i16()? as i64))),
        Format::Int32 => Ok(Value::Number(Number::Int(reader.read_i32()? as i64))),
        Format::Int64 => Ok(Value::Number(Number::Int(reader.read_i64()?))),
        Format::Float32 => Ok(Value::Number(Number::Float(reader.read_f32()? as f64))),
        Format::Float64 => Ok(Value::Number(Number::Float(reader.read_f64()?))),
        Format::FixStr(len) => unpack_str(reader, len as usize),
        Format::Str8 => {
            let len = reader.read_u8()? as usize;
            unpack_str(reader, len)
        }
        Format::Str16 => {
            let len = reader.read_u16()? as usize;
            unpack_str(reader, len)
        }
        Format::Str32 => {
            let len = reader.read_u32()? as usize;
            unpack_str(reader, len)
        }
        Format::Bin8 => {
            let len = reader.read_u8()? as usize;
            Ok(Value::Bytes(reader.read_bytes(len)?.to_vec()))
        }
        Format::Bin16 => {
            let len = reader.read_u16()? as usize;
            Ok(Value::Bytes(reader.read_bytes(len)?.to_vec()))
        }
        Format::Bin32 => {
            let len = reader.read_u32()? as usize;
            Ok(Value::Bytes(reader.read_bytes(len)?.to_vec()))
        }
        Format::FixArray(len) => unpack_array(reader, len as usize, limits, depth),
        Format::Array16 => {
            let len = reader.read_u16()? as usize;
            unpack_array(reader, len, limits, depth)
        }
        Format::Array32 => {
            let len = reader.read_u32()? as usize;
            unpack_array(reader, len, limits, depth)
        }
        Format::FixMap(len) => unpack_map(reader, len as usize, limits, depth),
        Format::Map16 => {
            let len = reader.read_u16()? as usize;
            unpack_map(reader, len, limits, depth)
        }
        Format::Map32 => {
            let len = reader.read_u32()? as usize;
            unpack_map(reader, len, limits, depth)
        }
        Format::FixExt1 => unpack_ext(reader, 1, limits, depth),
        Format::FixExt2 => unpack_ext(reader, 2, limits, depth),
        Format::FixExt4 => unpack_ext(reader, 4, limits, depth),
        Format::FixExt8 => unpack_ext(reader, 8, limits, depth),
        Format::FixExt16 => unpack_ext(reader, 16, limits, depth),
        Format::Ext8 => {
            let len = reader.read_u8()? as usize;
            unpack_ext(reader, len, limits, depth)
        }
        Format::Ext16 => {
            let len = reader.read_u16()? as usize;
            unpack_ext(reader, len, limits, depth)
        }
        Format::Ext32 => {
            let len = reader.read_u32()? as usize;
            unpack_ext(reader, len, limits, depth)
        }
    }
}

fn unpack_str(reader: &mut ByteReader, len: usize) -> Result<Value, Error> {
    let bytes = reader.read_bytes(len)?;
    let s = std::str::from_utf8(bytes).map_err(|_| Error::Decode {
        reason: "string payload is not valid UTF-8",
    })?;
    Ok(Value::Str(s.to_owned()))
}

fn enter(limits: &Limits, depth: usize) -> Result<usize, Error> {
    if depth >= limits.max_depth {
        return Err(Error::DepthExceeded {
            max_depth: limits.max_depth,
        });
    }
    Ok(depth + 1)
}

fn unpack_array(
    reader: &mut ByteReader,
    len: usize,
    limits: &Limits,
    depth: usize,
) -> Result<Value, Error> {
    let depth = enter(limits, depth)?;
    let mut items = Vec::with_capacity(len.min(4096));
    for _ in 0..len {
        items.push(unpack_value(reader, limits, depth)?);
    }
    Ok(Value::Array(items))
}

fn unpack_map(
    reader: &mut ByteReader,
    len: usize,
    limits: &Limits,
    depth: usize,
) -> Result<Value, Error> {
    let depth = enter(limits, depth)?;
    let mut entries = Vec::with_capacity(len.min(4096));
    for _ in 0..len {
        let key = unpack_value(reader, limits, depth)?;
        let value = unpack_value(reader, limits, depth)?;
        entries.push((key, value));
    }
    Ok(Value::Map(entries))
}

/// Dispatch on the closed extension-tag table. Tags outside
/// `{0x01..=0x7f, 0xff}`, including the reserved `0x00`, are rejected here;
/// resolving `0x06`/`0x07`/`0x7f` against a class/singleton registry happens
/// one layer up.
fn unpack_ext(
    reader: &mut ByteReader,
    len: usize,
    limits: &Limits,
    depth: usize,
) -> Result<Value, Error> {
    let tag = reader.read_i8()?;
    let payload = reader.read_bytes(len)?;
    match tag {
        0x01 => {
            if payload.len() != 16 {
                return Err(Error::Decode {
                    reason: "complex payload must be 16 bytes",
                });
            }
            let re = f64::from_be_bytes(
                payload[..8]
                    .try_into()
                    .map_err(|_| Error::Decode { reason: "complex payload must be 16 bytes" })?,
            );
            let im = f64::from_be_bytes(
                payload[8..]
                    .try_into()
                    .map_err(|_| Error::Decode { reason: "complex payload must be 16 bytes" })?,
            );
            Ok(Value::Complex { re, im })
        }
        0x02 => Ok(Value::Buffer(payload.to_vec())),
        0x03 => Ok(Value::List(unpack_ext_array(payload, limits, depth)?)),
        0x04 => Ok(Value::Set(unpack_ext_array(payload, limits, depth)?)),
        0x05 => Ok(Value::FrozenSet(unpack_ext_array(payload, limits, depth)?)),
        0x06 => unpack_class(payload),
        0x07 => {
            let (name, _) = unpack(payload)?;
            match name {
                Value::Str(s) => Ok(Value::SingletonRef(s)),
                _ => Err(Error::Decode {
                    reason: "singleton reference payload must be a string",
                }),
            }
        }
        0x7f => unpack_reduced(payload, limits, depth),
        -1 => Ok(Value::Timestamp(Timestamp::from_payload(payload)?)),
        _ => Err(Error::InvalidExtension { tag }),
    }
}

fn unpack_ext_array(payload: &[u8], limits: &Limits, depth: usize) -> Result<Vec<Value>, Error> {
    let depth = enter(limits, depth)?;
    let mut reader = ByteReader::new(payload);
    match unpack_value(&mut reader, limits, depth)? {
        Value::Array(items) => Ok(items),
        _ => Err(Error::Decode {
            reason: "extension payload must encode an array",
        }),
    }
}

fn unpack_class(payload: &[u8]) -> Result<Value, Error> {
    let mut reader = ByteReader::new(payload);
    let module = expect_str(&mut reader)?;
    let name = expect_str(&mut reader)?;
    Ok(Value::Class { module, name })
}

fn expect_str(reader: &mut ByteReader) -> Result<String, Error> {
    match unpack_value(reader, &Limits::default(), 0)? {
        Value::Str(s) => Ok(s),
        _ => Err(Error::Decode {
            reason: "class reference payload must hold two strings",
        }),
    }
}

fn unpack_reduced(payload: &[u8], limits: &Limits, depth: usize) -> Result<Value, Error> {
    let depth = enter(limits, depth)?;
    let mut reader = ByteReader::new(payload);
    let items = match unpack_value(&mut reader, limits, depth)? {
        Value::Array(items) => items,
        _ => {
            return Err(Error::Decode {
                reason: "reduced-object payload must be a 5-element array",
            });
        }
    };
    let [class, args, state, list_items, dict_items]: [Value; 5] =
        items.try_into().map_err(|_| Error::Decode {
            reason: "reduced-object payload must have exactly 5 elements",
        })?;
    let class = match class {
        Value::Class { module, name } => (module, name),
        _ => {
            return Err(Error::Decode {
                reason: "reduced-object's first element must be a class reference",
            });
        }
    };
    let args = match args {
        Value::Array(a) => a,
        _ => {
            return Err(Error::Decode {
                reason: "reduced-object's args element must be an array",
            });
        }
    };
    let state = match state {
        Value::Nil => None,
        other => Some(other),
    };
    let list_items = match list_items {
        Value::Array(a) => a,
        _ => {
            return Err(Error::Decode {
                reason: "reduced-object's list_items element must be an array",
            });
        }
    };
    let dict_items = match dict_items {
        Value::Map(m) => m,
        _ => {
            return Err(Error::Decode {
                reason: "reduced-object's dict_items element must be a map",
            });
        }
    };
    Ok(Value::Reduced(Box::new(Construct {
        class,
        args,
        state,
        list_items,
        dict_items,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::pack;

    #[test]
    fn roundtrips_every_primary_category() {
        let values = [
            Value::Nil,
            Value::Bool(true),
            Value::from(42i64),
            Value::from(-5i64),
            Value::from(3.25f64),
            Value::Str("hello".into()),
            Value::Bytes(vec![1, 2, 3]),
            Value::Array(vec![Value::from(1i64), Value::from(2i64)]),
            Value::Map(vec![(Value::Str("k".into()), Value::from(1i64))]),
        ];
        for value in values {
            let bytes = pack(&value).unwrap();
            let (decoded, consumed) = unpack(&bytes).unwrap();
            assert_eq!(decoded, value);
            assert_eq!(consumed, bytes.len());
        }
    }

    #[test]
    fn roundtrips_every_extension_category() {
        let values = [
            Value::Complex { re: 1.5, im: -2.0 },
            Value::Buffer(vec![9, 8, 7]),
            Value::List(vec![Value::from(1i64)]),
            Value::Set(vec![Value::from(1i64)]),
            Value::FrozenSet(vec![]),
            Value::Class {
                module: "pkg.mod".into(),
                name: "Thing".into(),
            },
            Value::SingletonRef("pkg.mod.SENTINEL".into()),
            Value::Timestamp(Timestamp::from_components(1_700_000_000, 250).unwrap()),
        ];
        for value in values {
            let bytes = pack(&value).unwrap();
            let (decoded, _) = unpack(&bytes).unwrap();
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn roundtrips_reduced_object() {
        let reduced = Construct {
            class: ("pkg.mod".into(), "Point".into()),
            args: vec![Value::from(1i64), Value::from(2i64)],
            state: Some(Value::Map(vec![(
                Value::Str("label".into()),
                Value::Str("origin".into()),
            )])),
            list_items: vec![],
            dict_items: vec![],
        };
        let value = Value::Reduced(Box::new(reduced));
        let bytes = pack(&value).unwrap();
        let (decoded, _) = unpack(&bytes).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn rejects_reserved_tag_0xc1() {
        let err = unpack(&[0xc1]).unwrap_err();
        assert!(matches!(err, Error::InvalidType { tag: 0xc1 }));
    }

    #[test]
    fn rejects_reserved_extension_tag_zero() {
        // fixext1 with extension type 0x00, one payload byte.
        let bytes = [0xd4, 0x00, 0xff];
        let err = unpack(&bytes).unwrap_err();
        assert!(matches!(err, Error::InvalidExtension { tag: 0 }));
    }

    #[test]
    fn rejects_truncated_input() {
        let err = unpack(&[0xcc]).unwrap_err();
        assert!(matches!(err, Error::Truncation { offset: 1 }));
    }

    #[test]
    fn rejects_invalid_utf8_in_str() {
        let bytes = [0xa1, 0xff];
        let err = unpack(&bytes).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn enforces_recursion_depth_cap() {
        let mut bytes = Vec::new();
        for _ in 0..600 {
            bytes.push(0x91); // fixarray, len 1
        }
        bytes.push(0xc0); // nil
        let limits = Limits { max_depth: 512 };
        let err = unpack_with_limits(&bytes, limits).unwrap_err();
        assert!(matches!(err, Error::DepthExceeded { max_depth: 512 }));
    }
}
