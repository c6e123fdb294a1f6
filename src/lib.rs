//! PackBits: byte-oriented run-length encoding.
//!
//! A packet stream is a sequence of segments, each introduced by one control
//! byte:
//!
//! - `0x00..=0x7F` (`n`): the next `n + 1` bytes are copied verbatim.
//! - `0x81..=0xFF` (`n`): the next byte is repeated `257 - n` times.
//! - `0x80`: reserved. Never emitted; skipped by default when decoding
//!   (see [`ReservedPolicy`]).
//!
//! This is the format used by TIFF (compression 32773), Apple's PackBits and
//! PDF's `RunLengthDecode` filter.
//!
//! ```
//! let raw = [0xAA, 0xAA, 0xAA, 0x80, 0x00, 0x2A, 0x22, 0xF7];
//! let packed = packbits::encode(&raw);
//! assert_eq!(packed, [0xFE, 0xAA, 0x04, 0x80, 0x00, 0x2A, 0x22, 0xF7]);
//! assert_eq!(packbits::decode(&packed).unwrap(), raw);
//! ```
//!
//! [`Encoder`] and [`Decoder`] carry the tunables (run threshold, run cap,
//! reserved-byte policy, hard output capacity) and the fixed-buffer variants.
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
extern crate alloc;

use alloc::vec::Vec;

mod decode;
mod encode;
mod error;
mod segment;
mod sink;

pub use decode::{Decoder, ReservedPolicy};
pub use encode::{Encoder, Scanner};
pub use error::Error;
pub use segment::{Segment, Segments};

pub const MAX_LITERAL_LEN: usize = 128; // control 0x7F
pub const MAX_RUN_LEN: usize = 128;     // control 0x81
pub const DEFAULT_MAX_RUN: usize = 127; // control 0x82
pub const RESERVED_CONTROL: u8 = 0x80;

/// Encodes `input` with the default [`Encoder`]. Never fails.
pub fn encode(input: &[u8]) -> Vec<u8> {
    let encoder = Encoder::new();
    let mut out = Vec::with_capacity(encoder.max_encoded_len(input.len()));
    match encoder.encode_to(input, &mut out) {
        Ok(()) => out,
        Err(never) => match never {},
    }
}

/// Encodes `input` into `out` and returns the number of bytes written.
///
/// Errors:
/// - OutputBufferExhausted  (`out` too short; size it with [`max_encoded_len`])
pub fn encode_into(input: &[u8], out: &mut [u8]) -> Result<usize, Error> {
    Encoder::new().encode_into(input, out)
}

/// Worst-case output size of [`encode`] for `input_len` bytes.
pub fn max_encoded_len(input_len: usize) -> usize {
    Encoder::new().max_encoded_len(input_len)
}

/// Decodes a packet stream with the default [`Decoder`].
/// Errors:
/// - TruncatedRun      (run control byte as final byte)
/// - TruncatedLiteral  (literal longer than what is left)
pub fn decode(input: &[u8]) -> Result<Vec<u8>, Error> {
    Decoder::new().decode(input)
}

/// Decodes into `out` and returns the number of bytes written.
pub fn decode_into(input: &[u8], out: &mut [u8]) -> Result<usize, Error> {
    Decoder::new().decode_into(input, out)
}

/// Exact size [`decode`] would produce, after validating the stream.
pub fn decoded_len(input: &[u8]) -> Result<usize, Error> {
    Decoder::new().decoded_len(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    fn rt(v: &[u8]) {
        let c = encode(v);
        let d = decode(&c).unwrap();
        assert_eq!(v, d.as_slice(), "in:{:x?} cmp:{:x?} dec:{:x?}", v, c, d);
        assert!(c.len() <= max_encoded_len(v.len()));
    }

    #[test] fn empty() {
        rt(&[]);
        assert!(encode(&[]).is_empty());
    }
    #[test] fn single() { assert_eq!(encode(&[0xAB]), [0x00, 0xAB]); }
    #[test] fn literals() { rt(&[1,2,3,4,5]); }
    #[test] fn runs() {
        rt(&vec![0xF0; 2]);
        rt(&vec![0xF0; 3]);
        rt(&vec![0xF0; 127]);
        rt(&vec![0xF0; 128]); // 127 + 1
        rt(&vec![0xF0; 1000]);
    }
    #[test] fn mixed() {
        rt(&[0xff,0xff,0xff,0xf0,0xf0,0xf0]);
        rt(&[0,0,0,0, 42, 0xFF,0xFF,0xFF, 1,2,3, 0, 0xFF, 0, 0xAA,0xBB, 0, 0xFF]);
        rt(&[1,2,2,3,4,4,5,6,6]);
    }
    #[test] fn long_literals() {
        let v: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
        rt(&v);
        assert_eq!(encode(&v).len(), 1000 + 8); // ceil(1000 / 128) control bytes
    }
    #[test] fn err_truncated_run() {
        assert_eq!(decode(&[0xFE]), Err(Error::TruncatedRun { offset: 0 }));
    }
    #[test] fn err_truncated_literal() {
        assert!(matches!(decode(&[0x05, 0x01, 0x02]), Err(Error::TruncatedLiteral { .. })));
    }
    #[test] fn into_helpers() {
        let raw = [7, 7, 7, 7, 7, 1, 2];
        let mut packed = [0u8; 16];
        let n = encode_into(&raw, &mut packed).unwrap();
        assert_eq!(&packed[..n], &[0xFC, 7, 0x01, 1, 2]);
        assert_eq!(decoded_len(&packed[..n]), Ok(7));
        let mut out = [0u8; 7];
        assert_eq!(decode_into(&packed[..n], &mut out), Ok(7));
        assert_eq!(out, raw);
    }
    #[test] fn error_messages() {
        assert_eq!(
            Error::TruncatedRun { offset: 4 }.to_string(),
            "run control byte at offset 4 has no payload byte"
        );
        assert_eq!(
            Error::TruncatedLiteral { offset: 0, expected: 6, available: 2 }.to_string(),
            "literal at offset 0 needs 6 bytes, only 2 left"
        );
    }
}
