//! Wire marker byte constants.
//!
//! This is the classic MessagePack marker table: a single raw family serves
//! both text and binary, and there are no str8/bin/ext markers.

// Nil
pub const NIL: u8 = 0xC0;

// Boolean
pub const FALSE: u8 = 0xC2;
pub const TRUE: u8 = 0xC3;

// Float (IEEE 754, big-endian)
pub const FLOAT_32: u8 = 0xCA;
pub const FLOAT_64: u8 = 0xCB;

// Unsigned integer (beyond the positive fixnum range)
pub const UINT_8: u8 = 0xCC;
pub const UINT_16: u8 = 0xCD;
pub const UINT_32: u8 = 0xCE;
pub const UINT_64: u8 = 0xCF;

// Signed integer (beyond the fixnum ranges)
pub const INT_8: u8 = 0xD0;
pub const INT_16: u8 = 0xD1;
pub const INT_32: u8 = 0xD2;
pub const INT_64: u8 = 0xD3;

// Raw byte string, explicit length tiers
pub const RAW_16: u8 = 0xDA;
pub const RAW_32: u8 = 0xDB;

// Array, explicit count tiers
pub const ARRAY_16: u8 = 0xDC;
pub const ARRAY_32: u8 = 0xDD;

// Map, explicit count tiers
pub const MAP_16: u8 = 0xDE;
pub const MAP_32: u8 = 0xDF;

// Fixed encodings pack a small magnitude into the marker byte itself.
// POS_FIXNUM: 0x00..=0x7F (the byte is the value, 0..127)
// NEG_FIXNUM: 0xE0..=0xFF (the byte is the value in two's complement, -32..-1)
// FIXMAP:     0x80..=0x8F (entry count in the low nibble)
// FIXARRAY:   0x90..=0x9F (element count in the low nibble)
// FIXRAW:     0xA0..=0xBF (byte length in the low five bits)
pub const FIXMAP: u8 = 0x80;
pub const FIXARRAY: u8 = 0x90;
pub const FIXRAW: u8 = 0xA0;

pub const POS_FIXNUM_MAX: u8 = 0x7F;
pub const NEG_FIXNUM_MIN: u8 = 0xE0;
pub const FIXMAP_MAX: u8 = 0x8F;
pub const FIXARRAY_MAX: u8 = 0x9F;
pub const FIXRAW_MAX: u8 = 0xBF;

// Largest count/length each fixed encoding can carry, plus one.
pub const MAX_FIXMAP: usize = 16;
pub const MAX_FIXARRAY: usize = 16;
pub const MAX_FIXRAW: usize = 32;

// Low-bit masks for extracting counts from fixed markers.
pub const NIBBLE_MASK: u8 = 0x0F;
pub const FIVE_BIT_MASK: u8 = 0x1F;
