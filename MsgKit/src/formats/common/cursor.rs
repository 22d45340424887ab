//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! Bounds-checked, endian-aware reading and writing over in-memory buffers

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// First byte of the byte-order mark that selects little-endian.
pub const LITTLE_ENDIAN_MARKER: u8 = 0xFF;

/// Byte order of a container, chosen once from the header marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Endian {
    #[default]
    Big,
    Little,
}

impl Endian {
    /// Pick the byte order from the first byte of the byte-order mark.
    #[must_use]
    pub fn from_marker(marker: u8) -> Self {
        if marker == LITTLE_ENDIAN_MARKER {
            Self::Little
        } else {
            Self::Big
        }
    }

    /// The two-byte byte-order mark as it appears on disk.
    #[must_use]
    pub const fn bom(self) -> [u8; 2] {
        match self {
            Self::Big => [0xFE, 0xFF],
            Self::Little => [0xFF, 0xFE],
        }
    }
}

/// Read-only view over a byte slice with an explicit position.
///
/// Every read checks the remaining length first and fails with
/// [`Error::TruncatedInput`] instead of reading past the end.
#[derive(Debug, Clone)]
pub struct ByteView<'a> {
    data: &'a [u8],
    pos: usize,
    endian: Endian,
}

impl<'a> ByteView<'a> {
    #[must_use]
    pub fn new(data: &'a [u8], endian: Endian) -> Self {
        Self { data, pos: 0, endian }
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[must_use]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// Move to an absolute position. Seeking to the very end is allowed.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(self.truncated(pos, 0));
        }
        self.pos = pos;
        Ok(())
    }

    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.take(count).map(|_| ())
    }

    /// A new view over `len` bytes starting at the current position.
    ///
    /// The parent advances past the sub-range; the child starts at 0.
    pub fn sub_view(&mut self, len: usize) -> Result<ByteView<'a>> {
        let data = self.take(len)?;
        Ok(ByteView::new(data, self.endian))
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        self.take(count)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(match self.endian {
            Endian::Big => BigEndian::read_u16(bytes),
            Endian::Little => LittleEndian::read_u16(bytes),
        })
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(match self.endian {
            Endian::Big => BigEndian::read_u32(bytes),
            Endian::Little => LittleEndian::read_u32(bytes),
        })
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        let bytes = self.take(4)?;
        Ok(match self.endian {
            Endian::Big => BigEndian::read_f32(bytes),
            Endian::Little => LittleEndian::read_f32(bytes),
        })
    }

    /// Read a `u16` without advancing.
    pub fn peek_u16(&self) -> Result<u16> {
        let mut ahead = self.clone();
        ahead.read_u16()
    }

    /// Read a 1-byte length followed by that many bytes.
    pub fn read_length_prefixed_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u8()? as usize;
        self.take(len)
    }

    /// Read up to `max_units` UTF-16 code units, stopping early at a zero unit.
    ///
    /// The terminator is consumed but not returned. With `None` the run must
    /// be zero-terminated before the end of the buffer.
    pub fn read_null_or_count_terminated_run(&mut self, max_units: Option<usize>) -> Result<Vec<u16>> {
        let mut units = Vec::new();
        while max_units.is_none_or(|max| units.len() < max) {
            let unit = self.read_u16()?;
            if unit == 0 {
                break;
            }
            units.push(unit);
        }
        Ok(units)
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(count)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| self.truncated(self.pos, count))?;
        let data = self.data;
        let bytes = &data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn truncated(&self, offset: usize, wanted: usize) -> Error {
        Error::TruncatedInput {
            offset,
            wanted,
            len: self.data.len(),
        }
    }
}

/// Growable output buffer that writes in a fixed byte order.
#[derive(Debug, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
    endian: Endian,
}

impl ByteWriter {
    #[must_use]
    pub fn new(endian: Endian) -> Self {
        Self::with_capacity(endian, 0)
    }

    #[must_use]
    pub fn with_capacity(endian: Endian, capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            endian,
        }
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        let mut bytes = [0u8; 2];
        match self.endian {
            Endian::Big => BigEndian::write_u16(&mut bytes, value),
            Endian::Little => LittleEndian::write_u16(&mut bytes, value),
        }
        self.buf.extend_from_slice(&bytes);
    }

    pub fn write_u32(&mut self, value: u32) {
        let mut bytes = [0u8; 4];
        Self::encode_u32(self.endian, &mut bytes, value);
        self.buf.extend_from_slice(&bytes);
    }

    pub fn write_f32(&mut self, value: f32) {
        let mut bytes = [0u8; 4];
        match self.endian {
            Endian::Big => BigEndian::write_f32(&mut bytes, value),
            Endian::Little => LittleEndian::write_f32(&mut bytes, value),
        }
        self.buf.extend_from_slice(&bytes);
    }

    /// Overwrite a previously written `u32` (size and offset backfills).
    pub fn patch_u32(&mut self, at: usize, value: u32) -> Result<()> {
        let len = self.buf.len();
        let slot = self
            .buf
            .get_mut(at..at + 4)
            .ok_or(Error::TruncatedInput { offset: at, wanted: 4, len })?;
        Self::encode_u32(self.endian, slot, value);
        Ok(())
    }

    /// Pad with `fill` until the length is a multiple of `alignment`.
    pub fn align(&mut self, alignment: usize, fill: u8) {
        let padded = self.buf.len().next_multiple_of(alignment);
        self.buf.resize(padded, fill);
    }

    fn encode_u32(endian: Endian, slot: &mut [u8], value: u32) {
        match endian {
            Endian::Big => BigEndian::write_u32(slot, value),
            Endian::Little => LittleEndian::write_u32(slot, value),
        }
    }
}
