//! Error types for the codec.

/// Errors that can occur while encoding or decoding.
///
/// The two variants are distinct failure classes: `Io` is an expected,
/// recoverable condition inherited from the caller's sink or source
/// (including a short read). `UnknownMarker` means the byte stream is not
/// valid wire data at all: a corrupt stream, not something a caller can
/// retry its way out of.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown wire marker: 0x{0:02X}")]
    UnknownMarker(u8),
}

/// A decode failure paired with the number of bytes consumed before it.
///
/// A failed decode does not consume zero bytes; callers interleaving other
/// reads on the same source need the true offset.
#[derive(Debug, thiserror::Error)]
#[error("{source} (after {consumed} byte(s))")]
pub struct DecodeError {
    /// Bytes actually read from the source before the failure.
    pub consumed: usize,
    #[source]
    pub source: Error,
}
