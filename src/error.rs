use core::convert::Infallible;

use thiserror::Error;

/// Canonical codec errors.
///
/// Offsets are positions in the packet stream handed to the decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// A run control byte (`0x81..=0xFF`) was the last byte of the stream,
    /// so there was no byte to repeat.
    #[error("run control byte at offset {offset} has no payload byte")]
    TruncatedRun { offset: usize },

    /// A literal control byte (`0x00..=0x7F`) announced more bytes than the
    /// stream still holds.
    #[error("literal at offset {offset} needs {expected} bytes, only {available} left")]
    TruncatedLiteral {
        offset: usize,
        expected: usize,
        available: usize,
    },

    /// The output would grow past a caller-imposed capacity.
    #[error("output buffer exhausted (capacity {capacity} bytes)")]
    OutputBufferExhausted { capacity: usize },

    /// The reserved control byte `0x80` was found while the decoder rejects it.
    #[error("reserved control byte 0x80 at offset {offset}")]
    InvalidControlByte { offset: usize },
}

impl From<Infallible> for Error {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
