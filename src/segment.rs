//! The PackBits wire format: one control byte followed by its payload.
//!
//! | control       | meaning                                   | payload        |
//! |---------------|-------------------------------------------|----------------|
//! | `0x00..=0x7F` | literal of `n + 1` bytes (1..=128)        | `n + 1` bytes  |
//! | `0x80`        | reserved, never emitted                   | none           |
//! | `0x81..=0xFF` | run of `257 - n` copies (2..=128)         | 1 byte         |

use core::iter::FusedIterator;

use crate::sink::Sink;
use crate::{Error, MAX_LITERAL_LEN, MAX_RUN_LEN, RESERVED_CONTROL};

/// One packet of a PackBits stream.
///
/// `Literal` holds 1..=128 bytes and `Run::len` is in 2..=128. Values outside
/// those ranges have no wire representation; [`Segment::literal`] and
/// [`Segment::run`] only build valid ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a [u8]),
    Run { byte: u8, len: usize },
    /// The `0x80` control byte.
    Reserved,
}

impl<'a> Segment<'a> {
    /// A literal over `bytes`, or `None` unless `1 <= bytes.len() <= 128`.
    pub fn literal(bytes: &'a [u8]) -> Option<Self> {
        (1..=MAX_LITERAL_LEN).contains(&bytes.len()).then_some(Segment::Literal(bytes))
    }

    /// `len` copies of `byte`, or `None` unless `2 <= len <= 128`.
    pub fn run(byte: u8, len: usize) -> Option<Self> {
        (2..=MAX_RUN_LEN).contains(&len).then_some(Segment::Run { byte, len })
    }

    /// The control byte that introduces this segment on the wire.
    ///
    /// # Panics
    ///
    /// If a literal is empty or longer than 128 bytes, or a run length is
    /// outside `2..=128`.
    #[inline]
    pub fn control_byte(&self) -> u8 {
        match *self {
            Segment::Literal(bytes) => {
                assert!(
                    (1..=MAX_LITERAL_LEN).contains(&bytes.len()),
                    "literal length {} outside 1..=128",
                    bytes.len()
                );
                (bytes.len() - 1) as u8
            }
            Segment::Run { len, .. } => {
                assert!((2..=MAX_RUN_LEN).contains(&len), "run length {len} outside 2..=128");
                // 257 - len in a wider type, then narrowed: 2 -> 0xFF, 128 -> 0x81.
                (257u16 - len as u16) as u8
            }
            Segment::Reserved => RESERVED_CONTROL,
        }
    }

    /// Number of raw bytes this segment stands for.
    #[inline]
    pub fn decoded_len(&self) -> usize {
        match *self {
            Segment::Literal(bytes) => bytes.len(),
            Segment::Run { len, .. } => len,
            Segment::Reserved => 0,
        }
    }

    /// Number of wire bytes, control byte included.
    #[inline]
    pub fn encoded_len(&self) -> usize {
        match *self {
            Segment::Literal(bytes) => 1 + bytes.len(),
            Segment::Run { .. } => 2,
            Segment::Reserved => 1,
        }
    }

    /// Append the wire form (control byte + payload).
    ///
    /// Panics like [`Segment::control_byte`] on out-of-range lengths.
    #[inline]
    pub(crate) fn write_to<S: Sink>(&self, sink: &mut S) -> Result<(), S::Error> {
        match *self {
            Segment::Literal(bytes) => {
                sink.push(self.control_byte())?;
                sink.extend_from_slice(bytes)
            }
            Segment::Run { byte, .. } => sink.extend_from_slice(&[self.control_byte(), byte]),
            Segment::Reserved => sink.push(RESERVED_CONTROL),
        }
    }

    /// Append the raw bytes this segment stands for.
    #[inline]
    pub(crate) fn expand_into<S: Sink>(&self, sink: &mut S) -> Result<(), S::Error> {
        match *self {
            Segment::Literal(bytes) => sink.extend_from_slice(bytes),
            Segment::Run { byte, len } => sink.fill(byte, len),
            Segment::Reserved => Ok(()),
        }
    }
}

/// Parser over a packet stream.
///
/// Yields each segment together with the offset of its control byte. The first
/// malformed segment is reported once and ends the iteration.
#[derive(Clone, Debug)]
pub struct Segments<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Segments<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Offset of the next control byte to be read.
    pub fn offset(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Result<(usize, Segment<'a>), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.pos;
        let &control = self.input.get(offset)?;
        let rest = &self.input[offset + 1..];

        let parsed = match control {
            0x00..=0x7F => {
                let n = control as usize + 1;
                match rest.get(..n) {
                    Some(bytes) => Ok((Segment::Literal(bytes), 1 + n)),
                    None => Err(Error::TruncatedLiteral {
                        offset,
                        expected: n,
                        available: rest.len(),
                    }),
                }
            }
            RESERVED_CONTROL => Ok((Segment::Reserved, 1)),
            _ => match rest.first() {
                Some(&byte) => Ok((Segment::Run { byte, len: 257 - control as usize }, 2)),
                None => Err(Error::TruncatedRun { offset }),
            },
        };

        match parsed {
            Ok((segment, consumed)) => {
                self.pos += consumed;
                Some(Ok((offset, segment)))
            }
            Err(e) => {
                self.pos = self.input.len();
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.input.len() - self.pos;
        (usize::from(left > 0), Some(left))
    }
}

impl FusedIterator for Segments<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn parse(stream: &[u8]) -> Result<Vec<(usize, Segment<'_>)>, Error> {
        Segments::new(stream).collect()
    }

    #[test]
    fn control_bytes() {
        assert_eq!(Segment::Literal(&[0xAB]).control_byte(), 0x00);
        assert_eq!(Segment::Literal(&[0u8; 128]).control_byte(), 0x7F);
        assert_eq!(Segment::Run { byte: 0, len: 2 }.control_byte(), 0xFF);
        assert_eq!(Segment::Run { byte: 0, len: 3 }.control_byte(), 0xFE);
        assert_eq!(Segment::Run { byte: 0, len: 127 }.control_byte(), 0x82);
        assert_eq!(Segment::Run { byte: 0, len: 128 }.control_byte(), 0x81);
        assert_eq!(Segment::Reserved.control_byte(), 0x80);
    }

    #[test]
    fn checked_constructors() {
        assert_eq!(Segment::literal(&[]), None);
        assert_eq!(Segment::literal(&[0u8; 129]), None);
        assert_eq!(Segment::literal(&[7]), Some(Segment::Literal(&[7])));
        assert_eq!(Segment::run(1, 1), None);
        assert_eq!(Segment::run(1, 129), None);
        assert_eq!(Segment::run(1, 300), None);
        assert_eq!(Segment::run(1, 128).map(|s| s.control_byte()), Some(0x81));
    }

    #[test]
    #[should_panic(expected = "literal length 0")]
    fn empty_literal_has_no_control_byte() {
        Segment::Literal(&[]).control_byte();
    }

    #[test]
    #[should_panic(expected = "run length 300")]
    fn oversized_run_has_no_control_byte() {
        Segment::Run { byte: 0, len: 300 }.control_byte();
    }

    #[test]
    fn lengths() {
        let lit = Segment::Literal(&[1, 2, 3]);
        assert_eq!((lit.decoded_len(), lit.encoded_len()), (3, 4));
        let run = Segment::Run { byte: 9, len: 100 };
        assert_eq!((run.decoded_len(), run.encoded_len()), (100, 2));
        assert_eq!((Segment::Reserved.decoded_len(), Segment::Reserved.encoded_len()), (0, 1));
    }

    #[test]
    fn parses_every_kind() {
        let stream = [0x01, 0xAA, 0xBB, 0x80, 0xFE, 0x11, 0x81, 0x22];
        assert_eq!(
            parse(&stream).unwrap(),
            [
                (0, Segment::Literal(&[0xAA, 0xBB])),
                (3, Segment::Reserved),
                (4, Segment::Run { byte: 0x11, len: 3 }),
                (6, Segment::Run { byte: 0x22, len: 128 }),
            ]
        );
    }

    #[test]
    fn empty_stream_has_no_segments() {
        assert!(parse(&[]).unwrap().is_empty());
    }

    #[test]
    fn truncated_run() {
        assert_eq!(parse(&[0x00, 0x01, 0xFE]), Err(Error::TruncatedRun { offset: 2 }));
    }

    #[test]
    fn truncated_literal() {
        assert_eq!(
            parse(&[0x05, 0x01, 0x02]),
            Err(Error::TruncatedLiteral { offset: 0, expected: 6, available: 2 })
        );
    }

    #[test]
    fn stops_after_first_error() {
        let mut it = Segments::new(&[0xFF, 0x01, 0x7F]);
        assert_eq!(it.next(), Some(Ok((0, Segment::Run { byte: 0x01, len: 2 }))));
        assert!(matches!(it.next(), Some(Err(Error::TruncatedLiteral { offset: 2, .. }))));
        assert_eq!(it.next(), None);
        assert_eq!(it.offset(), 3);
    }

    #[test]
    fn write_and_expand() {
        let mut wire: Vec<u8> = Vec::new();
        let mut raw: Vec<u8> = Vec::new();
        for seg in [Segment::Literal(&[7, 8]), Segment::Run { byte: 5, len: 4 }, Segment::Reserved] {
            let _ = seg.write_to(&mut wire);
            let _ = seg.expand_into(&mut raw);
        }
        assert_eq!(wire, [0x01, 7, 8, 0xFD, 5, 0x80]);
        assert_eq!(raw, [7, 8, 5, 5, 5, 5]);
    }
}
