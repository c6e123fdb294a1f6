//! Output targets shared by the encoder and the decoder.
//!
//! Both sides only ever append, so a sink is an append-only buffer: a plain
//! `Vec<u8>` that cannot fail, a `Vec<u8>` with a hard limit, or a
//! caller-owned slice whose length is the limit.

use alloc::vec::Vec;
use core::convert::Infallible;

use crate::Error;

pub(crate) trait Sink {
    type Error: Into<Error>;

    /// Bytes written so far.
    fn len(&self) -> usize;

    fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Append `n` copies of `byte`.
    fn fill(&mut self, byte: u8, n: usize) -> Result<(), Self::Error>;

    #[inline]
    fn push(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.fill(byte, 1)
    }
}

impl Sink for Vec<u8> {
    type Error = Infallible;

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<(), Infallible> {
        Vec::extend_from_slice(self, bytes);
        Ok(())
    }

    #[inline]
    fn fill(&mut self, byte: u8, n: usize) -> Result<(), Infallible> {
        let base = Vec::len(self);
        self.resize(base + n, byte);
        Ok(())
    }
}

/// Growable output, optionally capped at `limit` bytes.
pub(crate) struct VecSink {
    buf: Vec<u8>,
    limit: Option<usize>,
}

impl VecSink {
    pub(crate) fn with_capacity(hint: usize, limit: Option<usize>) -> Self {
        let hint = limit.map_or(hint, |l| hint.min(l));
        Self { buf: Vec::with_capacity(hint), limit }
    }

    pub(crate) fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    #[inline]
    fn check(&self, extra: usize) -> Result<(), Error> {
        match self.limit {
            Some(capacity) if capacity - self.buf.len() < extra => {
                Err(Error::OutputBufferExhausted { capacity })
            }
            _ => Ok(()),
        }
    }
}

impl Sink for VecSink {
    type Error = Error;

    #[inline]
    fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.check(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    #[inline]
    fn fill(&mut self, byte: u8, n: usize) -> Result<(), Error> {
        self.check(n)?;
        let base = self.buf.len();
        self.buf.resize(base + n, byte);
        Ok(())
    }
}

/// Fixed-capacity output over a caller-owned slice.
pub(crate) struct SliceSink<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceSink<'a> {
    pub(crate) fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    fn reserve(&mut self, n: usize) -> Result<&mut [u8], Error> {
        let capacity = self.buf.len();
        if capacity - self.pos < n {
            return Err(Error::OutputBufferExhausted { capacity });
        }
        let start = self.pos;
        self.pos += n;
        Ok(&mut self.buf[start..start + n])
    }
}

impl Sink for SliceSink<'_> {
    type Error = Error;

    #[inline]
    fn len(&self) -> usize {
        self.pos
    }

    #[inline]
    fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.reserve(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    #[inline]
    fn fill(&mut self, byte: u8, n: usize) -> Result<(), Error> {
        self.reserve(n)?.fill(byte);
        Ok(())
    }
}
