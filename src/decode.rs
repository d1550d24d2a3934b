//! Decoding: wire bytes → `Value`.

use std::io::{self, Read};

use crate::error::{DecodeError, Error};
use crate::marker;
use crate::value::Value;

/// Decodes values from a [`Read`] source, tracking bytes consumed.
///
/// Each decode call is independent: the decoder holds no parse state
/// between calls, so concatenated payloads are decoded simply by calling
/// [`decode`](Self::decode) repeatedly until the source is exhausted. The
/// consumed count keeps advancing across calls, and it remains valid after
/// a failure, which is where a truncated payload actually ended.
pub struct Decoder<R> {
    reader: R,
    consumed: usize,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            consumed: 0,
        }
    }

    /// Total bytes read from the source so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Consumes the decoder, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Decodes one value, converting raw map keys to text.
    ///
    /// A map key that decodes as a raw byte string becomes `Value::Str`
    /// when its bytes are valid UTF-8; other key categories pass through
    /// unchanged. This suits callers consuming maps through string-keyed
    /// host collections. Values are never converted, only keys.
    pub fn decode(&mut self) -> Result<Value, Error> {
        let value = self.decode_value(true)?;
        tracing::trace!(consumed = self.consumed, "decoded value");
        Ok(value)
    }

    /// Decodes one value, keeping every element in its wire-level form.
    ///
    /// Raw map keys stay `Value::Bytes`. The parse is otherwise identical
    /// to [`decode`](Self::decode).
    pub fn decode_verbatim(&mut self) -> Result<Value, Error> {
        let value = self.decode_value(false)?;
        tracing::trace!(consumed = self.consumed, "decoded value");
        Ok(value)
    }

    fn decode_value(&mut self, text_keys: bool) -> Result<Value, Error> {
        let m = self.read_u8()?;
        match m {
            marker::NIL => Ok(Value::Nil),
            marker::FALSE => Ok(Value::Bool(false)),
            marker::TRUE => Ok(Value::Bool(true)),

            marker::FLOAT_32 => Ok(Value::Float32(f32::from_be_bytes(self.read_array()?))),
            marker::FLOAT_64 => Ok(Value::Float64(f64::from_be_bytes(self.read_array()?))),

            marker::UINT_8 => Ok(Value::UInt8(self.read_u8()?)),
            marker::UINT_16 => Ok(Value::UInt16(u16::from_be_bytes(self.read_array()?))),
            marker::UINT_32 => Ok(Value::UInt32(u32::from_be_bytes(self.read_array()?))),
            marker::UINT_64 => Ok(Value::UInt64(u64::from_be_bytes(self.read_array()?))),

            marker::INT_8 => Ok(Value::Int8(self.read_u8()? as i8)),
            marker::INT_16 => Ok(Value::Int16(i16::from_be_bytes(self.read_array()?))),
            marker::INT_32 => Ok(Value::Int32(i32::from_be_bytes(self.read_array()?))),
            marker::INT_64 => Ok(Value::Int64(i64::from_be_bytes(self.read_array()?))),

            marker::RAW_16 => {
                let len = u16::from_be_bytes(self.read_array()?) as usize;
                Ok(Value::Bytes(self.read_raw(len)?))
            }
            marker::RAW_32 => {
                let len = u32::from_be_bytes(self.read_array()?) as usize;
                Ok(Value::Bytes(self.read_raw(len)?))
            }

            marker::ARRAY_16 => {
                let count = u16::from_be_bytes(self.read_array()?) as usize;
                self.decode_array(count, text_keys)
            }
            marker::ARRAY_32 => {
                let count = u32::from_be_bytes(self.read_array()?) as usize;
                self.decode_array(count, text_keys)
            }

            marker::MAP_16 => {
                let count = u16::from_be_bytes(self.read_array()?) as usize;
                self.decode_map(count, text_keys)
            }
            marker::MAP_32 => {
                let count = u32::from_be_bytes(self.read_array()?) as usize;
                self.decode_map(count, text_keys)
            }

            // Fixed encodings and the unassigned gaps.
            _ => {
                if m <= marker::POS_FIXNUM_MAX || m >= marker::NEG_FIXNUM_MIN {
                    // The marker byte is the value, two's complement.
                    Ok(Value::Int8(m as i8))
                } else if m <= marker::FIXMAP_MAX {
                    self.decode_map(usize::from(m & marker::NIBBLE_MASK), text_keys)
                } else if m <= marker::FIXARRAY_MAX {
                    self.decode_array(usize::from(m & marker::NIBBLE_MASK), text_keys)
                } else if m <= marker::FIXRAW_MAX {
                    let len = usize::from(m & marker::FIVE_BIT_MASK);
                    Ok(Value::Bytes(self.read_raw(len)?))
                } else {
                    tracing::debug!(marker = m, offset = self.consumed - 1, "unknown wire marker");
                    Err(Error::UnknownMarker(m))
                }
            }
        }
    }

    fn decode_array(&mut self, count: usize, text_keys: bool) -> Result<Value, Error> {
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(self.decode_value(text_keys)?);
        }
        Ok(Value::Array(items))
    }

    fn decode_map(&mut self, count: usize, text_keys: bool) -> Result<Value, Error> {
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let mut key = self.decode_value(text_keys)?;
            if text_keys {
                // Invalid UTF-8 keys stay as bytes rather than losing data.
                if let Value::Bytes(b) = key {
                    key = match String::from_utf8(b) {
                        Ok(s) => Value::Str(s),
                        Err(e) => Value::Bytes(e.into_bytes()),
                    };
                }
            }
            let value = self.decode_value(text_keys)?;
            entries.push((key, value));
        }
        Ok(Value::Map(entries))
    }

    fn read_raw(&mut self, len: usize) -> Result<Vec<u8>, Error> {
        let mut data = vec![0u8; len];
        self.fill(&mut data)?;
        Ok(data)
    }

    fn read_u8(&mut self) -> Result<u8, Error> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf)?;
        Ok(buf[0])
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut buf = [0u8; N];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    /// Reads exactly `buf.len()` bytes, counting every byte actually
    /// obtained so the consumed total is accurate even on a short read.
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(Error::Io(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("source exhausted, needed {} more byte(s)", buf.len() - filled),
                    )));
                }
                Ok(n) => {
                    filled += n;
                    self.consumed += n;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(Error::Io(e)),
            }
        }
        Ok(())
    }
}

/// Decodes one value from the source, converting raw map keys to text.
///
/// Returns the value and the number of bytes consumed. On failure the
/// consumed count is carried in the error.
pub fn decode<R: Read>(reader: R) -> Result<(Value, usize), DecodeError> {
    let mut decoder = Decoder::new(reader);
    match decoder.decode() {
        Ok(value) => Ok((value, decoder.consumed())),
        Err(source) => Err(DecodeError {
            consumed: decoder.consumed(),
            source,
        }),
    }
}

/// Decodes one value from the source, keeping raw map keys as bytes.
pub fn decode_verbatim<R: Read>(reader: R) -> Result<(Value, usize), DecodeError> {
    let mut decoder = Decoder::new(reader);
    match decoder.decode_verbatim() {
        Ok(value) => Ok((value, decoder.consumed())),
        Err(source) => Err(DecodeError {
            consumed: decoder.consumed(),
            source,
        }),
    }
}
