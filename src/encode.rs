//! Greedy PackBits encoder.
//!
//! At every position the encoder takes the longest run it is allowed to emit,
//! otherwise the longest literal span that does not swallow the start of a run.

use alloc::vec::Vec;
use core::iter::FusedIterator;

use crate::segment::Segment;
use crate::sink::{Sink, SliceSink, VecSink};
use crate::{Error, DEFAULT_MAX_RUN, MAX_LITERAL_LEN, MAX_RUN_LEN};

/// Encoder configuration.
///
/// By default three or more equal bytes start a run, runs are capped at 127
/// and the output grows without limit. `min_run(2)` reproduces the classic
/// encoder that also turns equal pairs into runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Encoder {
    min_run: usize,
    max_run: usize,
    capacity: Option<usize>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub const fn new() -> Self {
        Self { min_run: 3, max_run: DEFAULT_MAX_RUN, capacity: None }
    }

    /// Shortest sequence of equal bytes encoded as a run, 2 or 3.
    ///
    /// With 3 (the default), a pair of equal bytes stays inside the surrounding
    /// literal, so any input costs at most one control byte per 128 bytes.
    pub fn min_run(mut self, len: usize) -> Self {
        self.min_run = len.clamp(2, 3);
        self
    }

    /// Longest run emitted as one segment, clamped to `2..=128`.
    ///
    /// 128 uses control byte `0x81`, which some older decoders mishandle.
    pub fn max_run(mut self, len: usize) -> Self {
        self.max_run = len.clamp(2, MAX_RUN_LEN);
        self
    }

    /// Fail with [`Error::OutputBufferExhausted`] instead of growing the output
    /// past `capacity` bytes.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Upper bound on the encoded size of any `input_len` bytes.
    ///
    /// Every literal costs one control byte. With `min_run == 2` a literal can
    /// be as short as one byte between two-byte runs (`a bb c dd ...`), so the
    /// overhead is one byte in three. With `min_run == 3` each run saves at
    /// least the control byte of the literal before it, leaving one control
    /// byte per started 128-byte chunk. Saturates at `usize::MAX`.
    pub fn max_encoded_len(&self, input_len: usize) -> usize {
        let overhead = if self.min_run <= 2 {
            input_len.div_ceil(3)
        } else {
            input_len.div_ceil(MAX_LITERAL_LEN)
        };
        input_len.saturating_add(overhead)
    }

    /// The segments this encoder would emit for `input`, in order.
    pub fn scan<'a>(&self, input: &'a [u8]) -> Scanner<'a> {
        Scanner {
            input,
            pos: 0,
            min_run: self.min_run,
            // A cap below min_run would split runs into segments that cost more
            // than the bytes they cover.
            max_run: self.max_run.max(self.min_run),
        }
    }

    /// Encode into a freshly allocated buffer.
    pub fn encode(&self, input: &[u8]) -> Result<Vec<u8>, Error> {
        let mut sink = VecSink::with_capacity(self.max_encoded_len(input.len()), self.capacity);
        self.encode_to(input, &mut sink)?;
        Ok(sink.into_inner())
    }

    /// Encode into `out`, returning the number of bytes written.
    ///
    /// `out.len()` acts as the capacity; a smaller configured capacity wins.
    pub fn encode_into(&self, input: &[u8], out: &mut [u8]) -> Result<usize, Error> {
        let limit = self.capacity.map_or(out.len(), |c| c.min(out.len()));
        let mut sink = SliceSink::new(&mut out[..limit]);
        self.encode_to(input, &mut sink)?;
        Ok(sink.len())
    }

    pub(crate) fn encode_to<S: Sink>(&self, input: &[u8], sink: &mut S) -> Result<(), S::Error> {
        let start = sink.len();
        let mut segments = 0usize;
        for segment in self.scan(input) {
            segment.write_to(sink)?;
            segments += 1;
        }
        log::debug!(
            "packbits: encoded {} bytes into {} bytes ({} segments)",
            input.len(),
            sink.len() - start,
            segments
        );
        Ok(())
    }
}

/// Iterator over the segments chosen by an [`Encoder`].
///
/// Only yields [`Segment::Literal`] and [`Segment::Run`].
#[derive(Clone, Debug)]
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
    min_run: usize,
    max_run: usize,
}

/// True if `bytes` starts with `min_run` equal bytes.
#[inline]
fn starts_run(bytes: &[u8], min_run: usize) -> bool {
    match bytes.get(..min_run) {
        Some(window) => window.iter().all(|&b| b == window[0]),
        None => false,
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        let rest = &self.input[self.pos..];
        let &first = rest.first()?;

        if starts_run(rest, self.min_run) {
            let len = rest.iter().take(self.max_run).take_while(|&&b| b == first).count();
            self.pos += len;
            return Some(Segment::Run { byte: first, len });
        }

        let mut len = 1;
        while len < MAX_LITERAL_LEN && len < rest.len() && !starts_run(&rest[len..], self.min_run) {
            len += 1;
        }
        self.pos += len;
        Some(Segment::Literal(&rest[..len]))
    }
}

impl FusedIterator for Scanner<'_> {}
