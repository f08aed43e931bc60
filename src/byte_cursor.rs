//! Forward-only reader for IPD fields.
//!
//! IPD mixes byte orders: table and record lengths are little-endian, while
//! the database count and record uid are big-endian. Each read names its
//! order explicitly so call sites document the wire format.

use crate::error::{IpdError, Result};
use std::io::{self, Read};

/// Sequential reader over any byte source.
///
/// Every read either yields a complete value or fails with
/// [`IpdError::EndOfStream`](crate::IpdError::EndOfStream). After a failed
/// read the bytes that were available are gone; the cursor never rewinds.
pub struct ByteCursor<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> ByteCursor<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    /// Like `read_exact`, but bytes consumed by a short read still count
    /// towards `position()`.
    #[inline]
    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        let mut filled = 0;
        while filled < N {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.offset += filled as u64;
                    return Err(IpdError::EndOfStream);
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.offset += filled as u64;
                    return Err(e.into());
                }
            }
        }
        self.offset += N as u64;
        Ok(buf)
    }

    #[inline]
    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    #[inline]
    pub fn u16_le(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    #[inline]
    pub fn u16_be(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    #[inline]
    pub fn u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    #[inline]
    pub fn u32_be(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    /// Read exactly `count` bytes.
    pub fn bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        // Allocation follows the bytes actually read, never the declared count
        let mut buf = Vec::new();
        let read = (&mut self.inner).take(count as u64).read_to_end(&mut buf)?;
        self.offset += read as u64;
        if read < count {
            return Err(IpdError::EndOfStream);
        }
        Ok(buf)
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.offset
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

/// Reader that yields `data` up to `fail_at`, then fails with
/// `PermissionDenied`.
#[cfg(test)]
pub(crate) struct FailingReader {
    data: Vec<u8>,
    pos: usize,
    fail_at: usize,
}

#[cfg(test)]
impl FailingReader {
    pub(crate) fn new(data: Vec<u8>, fail_at: usize) -> Self {
        Self {
            data,
            pos: 0,
            fail_at,
        }
    }
}

#[cfg(test)]
impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.fail_at {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        let end = self.fail_at.min(self.data.len()).min(self.pos + buf.len());
        let n = end - self.pos;
        buf[..n].copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(n)
    }
}
