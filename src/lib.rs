//! mpackr — A pure-Rust codec for the classic MessagePack wire format.
//!
//! This crate implements the original MessagePack encoding: a compact,
//! self-describing binary format for nil, booleans, integers, floats, raw
//! byte strings, arrays, and maps. Integers always take the smallest wire
//! representation that holds them, and small values pack directly into the
//! marker byte. This is the pre-str8/bin/ext revision of the format: one
//! raw family carries both text and binary.
//!
//! # Architecture
//!
//! - **`marker`** — wire marker bytes and fixed-encoding ranges
//! - **`value`** — the `Value` tree produced by decode and consumed by encode
//! - **`encode`** — per-category encoders and dynamic dispatch over `Write`
//! - **`decode`** — `Decoder` marker-dispatch over `Read`, with byte accounting
//! - **`error`** — I/O failures vs. format violations
//!
//! Encoding walks a caller-supplied value and writes to any [`std::io::Write`]
//! sink; decoding reads from any [`std::io::Read`] source and reports the
//! bytes consumed, so concatenated payloads decode sequentially from one
//! stream. The codec is synchronous and holds no state between calls.

pub mod decode;
pub mod encode;
pub mod error;
pub mod marker;
pub mod value;

pub use decode::{Decoder, decode, decode_verbatim};
pub use encode::{encode, encode_to_bytes, encode_value};
pub use error::{DecodeError, Error};
pub use value::Value;
