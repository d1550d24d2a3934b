//! Encoding: `Value` → wire bytes.
//!
//! Every function takes a caller-supplied [`Write`] sink and returns the
//! number of bytes written. Integer encoders cascade downward so the wire
//! always carries the smallest representation that holds the value.

use std::io::Write;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::Error;
use crate::marker;
use crate::value::Value;

/// Encodes nil (one byte).
pub fn encode_nil<W: Write>(writer: &mut W) -> Result<usize, Error> {
    writer.write_all(&[marker::NIL])?;
    Ok(1)
}

/// Encodes a boolean (one byte).
pub fn encode_bool<W: Write>(writer: &mut W, value: bool) -> Result<usize, Error> {
    let m = if value { marker::TRUE } else { marker::FALSE };
    writer.write_all(&[m])?;
    Ok(1)
}

/// Encodes a u8: positive fixnum below 128, explicit uint8 otherwise.
pub fn encode_uint8<W: Write>(writer: &mut W, value: u8) -> Result<usize, Error> {
    if value > marker::POS_FIXNUM_MAX {
        writer.write_all(&[marker::UINT_8, value])?;
        return Ok(2);
    }
    writer.write_all(&[value])?;
    Ok(1)
}

/// Encodes a u16 using the smallest representation that holds it.
pub fn encode_uint16<W: Write>(writer: &mut W, value: u16) -> Result<usize, Error> {
    if value > u16::from(u8::MAX) {
        let be = value.to_be_bytes();
        writer.write_all(&[marker::UINT_16, be[0], be[1]])?;
        return Ok(3);
    }
    encode_uint8(writer, value as u8)
}

/// Encodes a u32 using the smallest representation that holds it.
pub fn encode_uint32<W: Write>(writer: &mut W, value: u32) -> Result<usize, Error> {
    if value > u32::from(u16::MAX) {
        writer.write_all(&[marker::UINT_32])?;
        writer.write_all(&value.to_be_bytes())?;
        return Ok(5);
    }
    encode_uint16(writer, value as u16)
}

/// Encodes a u64 using the smallest representation that holds it.
pub fn encode_uint64<W: Write>(writer: &mut W, value: u64) -> Result<usize, Error> {
    if value > u64::from(u32::MAX) {
        writer.write_all(&[marker::UINT_64])?;
        writer.write_all(&value.to_be_bytes())?;
        return Ok(9);
    }
    encode_uint32(writer, value as u32)
}

/// Encodes an i8: a single fixnum byte for -32..=127, explicit int8 below.
pub fn encode_int8<W: Write>(writer: &mut W, value: i8) -> Result<usize, Error> {
    if value < -32 {
        writer.write_all(&[marker::INT_8, value as u8])?;
        return Ok(2);
    }
    // Negative fixnum and positive fixnum share the bare-byte space.
    writer.write_all(&[value as u8])?;
    Ok(1)
}

/// Encodes an i16 using the smallest representation that holds it.
pub fn encode_int16<W: Write>(writer: &mut W, value: i16) -> Result<usize, Error> {
    if value < i16::from(i8::MIN) || value > i16::from(i8::MAX) {
        let be = value.to_be_bytes();
        writer.write_all(&[marker::INT_16, be[0], be[1]])?;
        return Ok(3);
    }
    encode_int8(writer, value as i8)
}

/// Encodes an i32 using the smallest representation that holds it.
pub fn encode_int32<W: Write>(writer: &mut W, value: i32) -> Result<usize, Error> {
    if value < i32::from(i16::MIN) || value > i32::from(i16::MAX) {
        writer.write_all(&[marker::INT_32])?;
        writer.write_all(&value.to_be_bytes())?;
        return Ok(5);
    }
    encode_int16(writer, value as i16)
}

/// Encodes an i64 using the smallest representation that holds it.
pub fn encode_int64<W: Write>(writer: &mut W, value: i64) -> Result<usize, Error> {
    if value < i64::from(i32::MIN) || value > i64::from(i32::MAX) {
        writer.write_all(&[marker::INT_64])?;
        writer.write_all(&value.to_be_bytes())?;
        return Ok(9);
    }
    encode_int32(writer, value as i32)
}

/// Encodes an f32 at fixed width: float32 marker + 4 IEEE-754 bytes.
///
/// Floats never take part in the minimal-width cascade; a float whose bit
/// pattern happens to be small must still decode as a float.
pub fn encode_float32<W: Write>(writer: &mut W, value: f32) -> Result<usize, Error> {
    writer.write_all(&[marker::FLOAT_32])?;
    writer.write_all(&value.to_be_bytes())?;
    Ok(5)
}

/// Encodes an f64 at fixed width: float64 marker + 8 IEEE-754 bytes.
pub fn encode_float64<W: Write>(writer: &mut W, value: f64) -> Result<usize, Error> {
    writer.write_all(&[marker::FLOAT_64])?;
    writer.write_all(&value.to_be_bytes())?;
    Ok(9)
}

/// Encodes a raw byte-string header for `len` payload bytes.
pub fn encode_raw_header<W: Write>(writer: &mut W, len: usize) -> Result<usize, Error> {
    if len < marker::MAX_FIXRAW {
        writer.write_all(&[marker::FIXRAW | len as u8])?;
        Ok(1)
    } else if len <= u16::MAX as usize {
        let be = (len as u16).to_be_bytes();
        writer.write_all(&[marker::RAW_16, be[0], be[1]])?;
        Ok(3)
    } else {
        writer.write_all(&[marker::RAW_32])?;
        writer.write_all(&(len as u32).to_be_bytes())?;
        Ok(5)
    }
}

/// Encodes a raw byte string: length header then the bytes verbatim.
pub fn encode_bytes<W: Write>(writer: &mut W, value: &[u8]) -> Result<usize, Error> {
    let n = encode_raw_header(writer, value.len())?;
    writer.write_all(value)?;
    Ok(n + value.len())
}

/// Encodes a string as a raw byte string of its UTF-8 bytes.
///
/// The wire format has a single raw family; text and binary are not
/// distinguished, and decoding yields `Bytes`.
pub fn encode_str<W: Write>(writer: &mut W, value: &str) -> Result<usize, Error> {
    encode_bytes(writer, value.as_bytes())
}

/// Encodes an array header for `len` elements.
pub fn encode_array_header<W: Write>(writer: &mut W, len: usize) -> Result<usize, Error> {
    if len < marker::MAX_FIXARRAY {
        writer.write_all(&[marker::FIXARRAY | len as u8])?;
        Ok(1)
    } else if len <= u16::MAX as usize {
        let be = (len as u16).to_be_bytes();
        writer.write_all(&[marker::ARRAY_16, be[0], be[1]])?;
        Ok(3)
    } else {
        writer.write_all(&[marker::ARRAY_32])?;
        writer.write_all(&(len as u32).to_be_bytes())?;
        Ok(5)
    }
}

/// Encodes a map header for `len` key-value entries.
pub fn encode_map_header<W: Write>(writer: &mut W, len: usize) -> Result<usize, Error> {
    if len < marker::MAX_FIXMAP {
        writer.write_all(&[marker::FIXMAP | len as u8])?;
        Ok(1)
    } else if len <= u16::MAX as usize {
        let be = (len as u16).to_be_bytes();
        writer.write_all(&[marker::MAP_16, be[0], be[1]])?;
        Ok(3)
    } else {
        writer.write_all(&[marker::MAP_32])?;
        writer.write_all(&(len as u32).to_be_bytes())?;
        Ok(5)
    }
}

/// Encodes an array of values, preserving element order.
pub fn encode_array<W: Write>(writer: &mut W, items: &[Value]) -> Result<usize, Error> {
    let mut n = encode_array_header(writer, items.len())?;
    for item in items {
        n += encode_value(writer, item)?;
    }
    Ok(n)
}

/// Encodes a typed slice as an array, using `elem` for each element.
///
/// This covers what would otherwise need one encoder per element type:
/// `encode_array_with(w, &lens, |w, v| encode_uint16(w, *v))` writes a
/// wire array of minimal-width integers without building a `Value` tree.
pub fn encode_array_with<W, T, F>(
    writer: &mut W,
    items: &[T],
    mut elem: F,
) -> Result<usize, Error>
where
    W: Write,
    F: FnMut(&mut W, &T) -> Result<usize, Error>,
{
    let mut n = encode_array_header(writer, items.len())?;
    for item in items {
        n += elem(writer, item)?;
    }
    Ok(n)
}

/// Encodes map entries in the order given, each as adjacent key and value.
pub fn encode_map<W: Write>(writer: &mut W, entries: &[(Value, Value)]) -> Result<usize, Error> {
    let mut n = encode_map_header(writer, entries.len())?;
    for (key, value) in entries {
        n += encode_value(writer, key)?;
        n += encode_value(writer, value)?;
    }
    Ok(n)
}

/// Encodes any `Value` by dispatching on its category.
///
/// Nested array and map elements recurse through this function; everything
/// else delegates straight to the per-category encoder.
pub fn encode_value<W: Write>(writer: &mut W, value: &Value) -> Result<usize, Error> {
    match value {
        Value::Nil => encode_nil(writer),
        Value::Bool(b) => encode_bool(writer, *b),
        Value::UInt8(v) => encode_uint8(writer, *v),
        Value::UInt16(v) => encode_uint16(writer, *v),
        Value::UInt32(v) => encode_uint32(writer, *v),
        Value::UInt64(v) => encode_uint64(writer, *v),
        Value::Int8(v) => encode_int8(writer, *v),
        Value::Int16(v) => encode_int16(writer, *v),
        Value::Int32(v) => encode_int32(writer, *v),
        Value::Int64(v) => encode_int64(writer, *v),
        Value::Float32(v) => encode_float32(writer, *v),
        Value::Float64(v) => encode_float64(writer, *v),
        Value::Str(s) => encode_str(writer, s),
        Value::Bytes(b) => encode_bytes(writer, b),
        Value::Array(items) => encode_array(writer, items),
        Value::Map(entries) => encode_map(writer, entries),
    }
}

/// Encodes any host value convertible into a `Value`.
pub fn encode<W: Write, T: Into<Value>>(writer: &mut W, value: T) -> Result<usize, Error> {
    encode_value(writer, &value.into())
}

/// Encodes a `Value` into a freshly allocated [`Bytes`] buffer.
pub fn encode_to_bytes(value: &Value) -> Result<Bytes, Error> {
    let mut writer = BytesMut::new().writer();
    encode_value(&mut writer, value)?;
    Ok(writer.into_inner().freeze())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes_of<F>(f: F) -> Vec<u8>
    where
        F: FnOnce(&mut Vec<u8>) -> Result<usize, Error>,
    {
        let mut buf = Vec::new();
        let n = f(&mut buf).expect("encode failed");
        assert_eq!(n, buf.len(), "reported byte count must match bytes written");
        buf
    }

    #[test]
    fn nil_and_bool_markers() {
        assert_eq!(bytes_of(encode_nil), [0xC0]);
        assert_eq!(bytes_of(|w| encode_bool(w, false)), [0xC2]);
        assert_eq!(bytes_of(|w| encode_bool(w, true)), [0xC3]);
    }

    #[test]
    fn unsigned_width_boundaries() {
        assert_eq!(bytes_of(|w| encode_uint64(w, 0)), [0x00]);
        assert_eq!(bytes_of(|w| encode_uint64(w, 127)), [0x7F]);
        assert_eq!(bytes_of(|w| encode_uint64(w, 128)), [0xCC, 0x80]);
        assert_eq!(bytes_of(|w| encode_uint64(w, 255)), [0xCC, 0xFF]);
        assert_eq!(bytes_of(|w| encode_uint64(w, 256)), [0xCD, 0x01, 0x00]);
        assert_eq!(bytes_of(|w| encode_uint64(w, 65535)), [0xCD, 0xFF, 0xFF]);
        assert_eq!(
            bytes_of(|w| encode_uint64(w, 65536)),
            [0xCE, 0x00, 0x01, 0x00, 0x00]
        );
        assert_eq!(
            bytes_of(|w| encode_uint64(w, u64::from(u32::MAX))),
            [0xCE, 0xFF, 0xFF, 0xFF, 0xFF]
        );
        assert_eq!(
            bytes_of(|w| encode_uint64(w, u64::from(u32::MAX) + 1)),
            [0xCF, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn narrow_unsigned_entry_points_agree() {
        // Every width's encoder cascades to the same minimal bytes.
        assert_eq!(bytes_of(|w| encode_uint8(w, 5)), [0x05]);
        assert_eq!(bytes_of(|w| encode_uint16(w, 5)), [0x05]);
        assert_eq!(bytes_of(|w| encode_uint32(w, 5)), [0x05]);
        assert_eq!(bytes_of(|w| encode_uint16(w, 200)), [0xCC, 0xC8]);
        assert_eq!(bytes_of(|w| encode_uint32(w, 200)), [0xCC, 0xC8]);
    }

    #[test]
    fn signed_width_boundaries() {
        // Inline fixnum space: -32..=127.
        assert_eq!(bytes_of(|w| encode_int64(w, 0)), [0x00]);
        assert_eq!(bytes_of(|w| encode_int64(w, 127)), [0x7F]);
        assert_eq!(bytes_of(|w| encode_int64(w, -1)), [0xFF]);
        assert_eq!(bytes_of(|w| encode_int64(w, -32)), [0xE0]);
        // int8: -128..=-33.
        assert_eq!(bytes_of(|w| encode_int64(w, -33)), [0xD0, 0xDF]);
        assert_eq!(bytes_of(|w| encode_int64(w, -128)), [0xD0, 0x80]);
        // int16 escalation at the i8 range on both sides.
        assert_eq!(bytes_of(|w| encode_int64(w, 128)), [0xD1, 0x00, 0x80]);
        assert_eq!(bytes_of(|w| encode_int64(w, -129)), [0xD1, 0xFF, 0x7F]);
        assert_eq!(bytes_of(|w| encode_int64(w, 32767)), [0xD1, 0x7F, 0xFF]);
        assert_eq!(bytes_of(|w| encode_int64(w, -32768)), [0xD1, 0x80, 0x00]);
        // int32 escalation at the i16 range.
        assert_eq!(
            bytes_of(|w| encode_int64(w, 32768)),
            [0xD2, 0x00, 0x00, 0x80, 0x00]
        );
        assert_eq!(
            bytes_of(|w| encode_int64(w, -32769)),
            [0xD2, 0xFF, 0xFF, 0x7F, 0xFF]
        );
        // int64 escalation at the i32 range.
        let above = i64::from(i32::MAX) + 1;
        let mut expected = vec![0xD3];
        expected.extend_from_slice(&above.to_be_bytes());
        assert_eq!(bytes_of(|w| encode_int64(w, above)), expected);
        let below = i64::from(i32::MIN) - 1;
        let mut expected = vec![0xD3];
        expected.extend_from_slice(&below.to_be_bytes());
        assert_eq!(bytes_of(|w| encode_int64(w, below)), expected);
    }

    #[test]
    fn encoded_size_is_minimal() {
        assert_eq!(bytes_of(|w| encode_int64(w, 100)).len(), 1);
        assert_eq!(bytes_of(|w| encode_int64(w, 1000)).len(), 3);
        assert_eq!(bytes_of(|w| encode_uint64(w, 100)).len(), 1);
        assert_eq!(bytes_of(|w| encode_uint64(w, 1000)).len(), 3);
        assert_eq!(bytes_of(|w| encode_uint64(w, 100_000)).len(), 5);
        assert_eq!(bytes_of(|w| encode_int64(w, i64::MIN)).len(), 9);
    }

    #[test]
    fn floats_are_fixed_width() {
        // A float with a small bit pattern keeps its float marker.
        assert_eq!(
            bytes_of(|w| encode_float32(w, 0.0)),
            [0xCA, 0x00, 0x00, 0x00, 0x00]
        );
        let mut expected = vec![0xCA];
        expected.extend_from_slice(&1.5f32.to_be_bytes());
        assert_eq!(bytes_of(|w| encode_float32(w, 1.5)), expected);

        let mut expected = vec![0xCB];
        expected.extend_from_slice(&3.14159f64.to_be_bytes());
        assert_eq!(bytes_of(|w| encode_float64(w, 3.14159)), expected);
    }

    #[test]
    fn raw_tier_boundaries() {
        assert_eq!(bytes_of(|w| encode_bytes(w, &[])), [0xA0]);
        assert_eq!(bytes_of(|w| encode_str(w, "A")), [0xA1, 0x41]);

        let raw31 = bytes_of(|w| encode_bytes(w, &[0xEE; 31]));
        assert_eq!(raw31[0], 0xBF);
        assert_eq!(raw31.len(), 1 + 31);

        let raw32 = bytes_of(|w| encode_bytes(w, &[0xEE; 32]));
        assert_eq!(&raw32[..3], [0xDA, 0x00, 0x20]);
        assert_eq!(raw32.len(), 3 + 32);

        assert_eq!(bytes_of(|w| encode_raw_header(w, 65535)), [0xDA, 0xFF, 0xFF]);
        assert_eq!(
            bytes_of(|w| encode_raw_header(w, 65536)),
            [0xDB, 0x00, 0x01, 0x00, 0x00]
        );
    }

    #[test]
    fn array_tier_boundaries() {
        assert_eq!(bytes_of(|w| encode_array_header(w, 0)), [0x90]);
        assert_eq!(bytes_of(|w| encode_array_header(w, 15)), [0x9F]);
        assert_eq!(bytes_of(|w| encode_array_header(w, 16)), [0xDC, 0x00, 0x10]);
        assert_eq!(
            bytes_of(|w| encode_array_header(w, 65535)),
            [0xDC, 0xFF, 0xFF]
        );
        assert_eq!(
            bytes_of(|w| encode_array_header(w, 65536)),
            [0xDD, 0x00, 0x01, 0x00, 0x00]
        );
    }

    #[test]
    fn map_tier_boundaries() {
        assert_eq!(bytes_of(|w| encode_map_header(w, 0)), [0x80]);
        assert_eq!(bytes_of(|w| encode_map_header(w, 15)), [0x8F]);
        assert_eq!(bytes_of(|w| encode_map_header(w, 16)), [0xDE, 0x00, 0x10]);
        assert_eq!(
            bytes_of(|w| encode_map_header(w, 65536)),
            [0xDF, 0x00, 0x01, 0x00, 0x00]
        );
    }

    #[test]
    fn fixarray_at_boundary_counts() {
        let items: Vec<Value> = (0..15i64).map(Value::Int64).collect();
        let encoded = bytes_of(|w| encode_array(w, &items));
        assert_eq!(encoded[0], 0x9F);

        let items: Vec<Value> = (0..16i64).map(Value::Int64).collect();
        let encoded = bytes_of(|w| encode_array(w, &items));
        assert_eq!(&encoded[..3], [0xDC, 0x00, 0x10]);
    }

    #[test]
    fn typed_slice_array() {
        let lens: [u16; 3] = [1, 300, 70];
        let encoded = bytes_of(|w| encode_array_with(w, &lens, |w, v| encode_uint16(w, *v)));
        assert_eq!(encoded, [0x93, 0x01, 0xCD, 0x01, 0x2C, 0x46]);
    }

    #[test]
    fn sample_map_wire_bytes() {
        let value = Value::Map(vec![
            (Value::from("a"), Value::Int64(1)),
            (Value::from("b"), Value::Array(vec![
                Value::Int64(1),
                Value::Int64(2),
                Value::Int64(3),
            ])),
        ]);
        let encoded = bytes_of(|w| encode_value(w, &value));
        assert_eq!(
            encoded,
            [
                0x82, // fixmap, 2 entries
                0xA1, 0x61, // fixraw "a"
                0x01, // fixnum 1
                0xA1, 0x62, // fixraw "b"
                0x93, 0x01, 0x02, 0x03, // fixarray [1, 2, 3]
            ]
        );
    }

    #[test]
    fn encode_host_values_directly() {
        let mut buf = Vec::new();
        encode(&mut buf, 1000u32).unwrap();
        encode(&mut buf, "hi").unwrap();
        encode(&mut buf, None::<bool>).unwrap();
        assert_eq!(buf, [0xCD, 0x03, 0xE8, 0xA2, 0x68, 0x69, 0xC0]);
    }

    #[test]
    fn encode_to_bytes_buffer() {
        let encoded = encode_to_bytes(&Value::Bool(true)).unwrap();
        assert_eq!(&encoded[..], [0xC3]);
    }

    #[test]
    fn write_failure_propagates() {
        struct FailingSink;
        impl std::io::Write for FailingSink {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("sink closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let err = encode_int64(&mut FailingSink, 1).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
