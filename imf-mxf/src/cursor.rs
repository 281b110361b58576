//! Sequential big-endian reader over a materialized byte range
//!
//! A cursor remembers the absolute resource offset of its first byte so that
//! decode errors can report where in the file they happened.

use crate::error::{MxfError, Result};
use byteorder::{BigEndian, ByteOrder};

/// Bounds-checked cursor over a byte slice
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
    base_offset: u64,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor whose first byte sits at resource offset 0
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_base_offset(data, 0)
    }

    /// Create a cursor whose first byte sits at `base_offset` in the resource
    pub fn with_base_offset(data: &'a [u8], base_offset: u64) -> Self {
        ByteCursor {
            data,
            position: 0,
            base_offset,
        }
    }

    /// Position relative to the start of the slice
    pub fn position(&self) -> usize {
        self.position
    }

    /// Position in the underlying resource
    pub fn absolute_position(&self) -> u64 {
        self.base_offset + self.position as u64
    }

    /// Resource offset of the first byte of the slice
    pub fn base_offset(&self) -> u64 {
        self.base_offset
    }

    /// Total slice length
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the slice is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left after the current position
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if the cursor reached the end
    pub fn is_eof(&self) -> bool {
        self.remaining() == 0
    }

    /// Move to a slice-relative position (clamped to the end)
    pub fn seek(&mut self, position: usize) {
        self.position = position.min(self.data.len());
    }

    /// Skip `n` bytes
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.position += n;
        Ok(())
    }

    /// The unread part of the slice
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(MxfError::InsufficientData {
                offset: self.absolute_position(),
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Read `n` bytes as a borrowed slice
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let bytes = &self.data[self.position..self.position + n];
        self.position += n;
        Ok(bytes)
    }

    /// Read a fixed-size array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let array = self.peek_array::<N>()?;
        self.position += N;
        Ok(array)
    }

    /// Peek at a fixed-size array without consuming it
    pub fn peek_array<const N: usize>(&self) -> Result<[u8; N]> {
        self.ensure(N)?;
        let mut array = [0u8; N];
        array.copy_from_slice(&self.data[self.position..self.position + N]);
        Ok(array)
    }

    /// Peek at the next byte
    pub fn peek_u8(&self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.data[self.position])
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = self.peek_u8()?;
        self.position += 1;
        Ok(byte)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(BigEndian::read_u64(self.read_bytes(8)?))
    }
}
