//! PackBits decoder.

use alloc::vec::Vec;

use crate::segment::{Segment, Segments};
use crate::sink::{Sink, SliceSink, VecSink};
use crate::Error;

/// What to do with the reserved control byte `0x80`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReservedPolicy {
    /// Zero-length segment: no payload consumed, nothing written.
    #[default]
    Skip,
    /// Fail with [`Error::InvalidControlByte`].
    Reject,
}

/// Decoder configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Decoder {
    reserved: ReservedPolicy,
    capacity: Option<usize>,
}

impl Decoder {
    pub const fn new() -> Self {
        Self { reserved: ReservedPolicy::Skip, capacity: None }
    }

    pub fn reserved(mut self, policy: ReservedPolicy) -> Self {
        self.reserved = policy;
        self
    }

    /// Fail with [`Error::OutputBufferExhausted`] instead of producing more
    /// than `capacity` bytes.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Segments of `input`, with the reserved-byte policy applied.
    fn segments<'a>(&self, input: &'a [u8]) -> impl Iterator<Item = Result<Segment<'a>, Error>> {
        let policy = self.reserved;
        Segments::new(input).map(move |parsed| -> Result<Segment<'a>, Error> {
            match parsed? {
                (offset, Segment::Reserved) if policy == ReservedPolicy::Reject => {
                    Err(Error::InvalidControlByte { offset })
                }
                (_, segment) => Ok(segment),
            }
        })
    }

    /// Validate `input` and return its exact decoded size, without allocating.
    pub fn decoded_len(&self, input: &[u8]) -> Result<usize, Error> {
        self.segments(input)
            .try_fold(0usize, |total, segment| -> Result<usize, Error> {
                Ok(total + segment?.decoded_len())
            })
    }

    /// Validate `input` and check its decoded size against `capacity`.
    ///
    /// Malformed streams are reported before capacity, so both decode
    /// entry points fail the same way on the same input.
    fn checked_len(&self, input: &[u8], capacity: Option<usize>) -> Result<usize, Error> {
        let total = self.decoded_len(input).inspect_err(|e| {
            log::warn!("packbits: rejecting {}-byte stream: {e}", input.len())
        })?;
        match capacity {
            Some(capacity) if total > capacity => {
                log::debug!("packbits: {total} decoded bytes exceed capacity {capacity}");
                Err(Error::OutputBufferExhausted { capacity })
            }
            _ => Ok(total),
        }
    }

    /// Decode into a freshly allocated buffer sized exactly to the output.
    pub fn decode(&self, input: &[u8]) -> Result<Vec<u8>, Error> {
        let total = self.checked_len(input, self.capacity)?;
        let mut sink = VecSink::with_capacity(total, None);
        self.decode_to(input, &mut sink)?;
        Ok(sink.into_inner())
    }

    /// Decode into `out`, returning the number of bytes written.
    ///
    /// `out.len()` acts as the capacity; a smaller configured capacity wins.
    /// Errors are the same as [`Decoder::decode`] and leave `out` untouched.
    pub fn decode_into(&self, input: &[u8], out: &mut [u8]) -> Result<usize, Error> {
        let limit = self.capacity.map_or(out.len(), |c| c.min(out.len()));
        let total = self.checked_len(input, Some(limit))?;
        let mut sink = SliceSink::new(&mut out[..total]);
        self.decode_to(input, &mut sink)?;
        Ok(sink.len())
    }

    pub(crate) fn decode_to<S: Sink>(&self, input: &[u8], sink: &mut S) -> Result<(), Error> {
        let start = sink.len();
        for segment in self.segments(input) {
            if let Err(e) = segment?.expand_into(sink) {
                return Err(e.into());
            }
        }
        log::debug!("packbits: decoded {} bytes into {} bytes", input.len(), sink.len() - start);
        Ok(())
    }
}
