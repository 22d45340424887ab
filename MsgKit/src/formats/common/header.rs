//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! File header and tagged section framing shared by MSBT and MSBF

use serde::{Deserialize, Serialize};

use super::cursor::{ByteView, ByteWriter, Endian};
use crate::error::{Error, Result};

/// Size of the file header in bytes
pub const HEADER_SIZE: usize = 0x20;

/// Size of a section header (tag + size + 8 reserved bytes)
pub const SECTION_HEADER_SIZE: usize = 0x10;

/// Every section boundary sits on this alignment
pub const SECTION_ALIGNMENT: usize = 16;

/// Filler written between a section's data and the next boundary
pub const PADDING_BYTE: u8 = 0xAB;

/// Offset of the total file size field within the header
const FILE_SIZE_OFFSET: usize = 0x12;

/// Text encoding byte for UTF-16
pub const ENCODING_UTF16: u8 = 1;

/// Format version written into new containers
pub const DEFAULT_VERSION: u8 = 3;

/// Container file header (0x20 bytes, after which the first section begins).
///
/// Fields the codec does not interpret are kept so re-encoding reproduces them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHeader {
    pub endian: Endian,
    pub reserved_0a: u16,
    pub encoding: u8,
    pub version: u8,
    pub section_count: u16,
    pub reserved_10: u16,
    /// Total file size as read. Recomputed on every encode.
    pub file_size: u32,
    pub reserved_tail: [u8; 10],
}

impl FileHeader {
    #[must_use]
    pub fn new(endian: Endian, section_count: u16) -> Self {
        Self {
            endian,
            reserved_0a: 0,
            encoding: ENCODING_UTF16,
            version: DEFAULT_VERSION,
            section_count,
            reserved_10: 0,
            file_size: 0,
            reserved_tail: [0; 10],
        }
    }

    /// Validate the magic, pick the byte order and parse the header.
    ///
    /// Returns the header plus a view over the whole buffer in the detected
    /// byte order, positioned just past the header.
    pub fn read<'a>(data: &'a [u8], magic: &[u8; 8]) -> Result<(Self, ByteView<'a>)> {
        let mut view = ByteView::new(data, Endian::Big);

        let found: [u8; 8] = view.read_array()?;
        if &found != magic {
            return Err(Error::BadMagic {
                expected: *magic,
                found,
            });
        }

        let bom: [u8; 2] = view.read_array()?;
        let endian = Endian::from_marker(bom[0]);
        view.set_endian(endian);

        let header = Self {
            endian,
            reserved_0a: view.read_u16()?,
            encoding: view.read_u8()?,
            version: view.read_u8()?,
            section_count: view.read_u16()?,
            reserved_10: view.read_u16()?,
            file_size: view.read_u32()?,
            reserved_tail: view.read_array()?,
        };

        tracing::debug!(
            "Header: {:?}, {} sections, declared size {}",
            endian,
            header.section_count,
            header.file_size
        );

        Ok((header, view))
    }

    /// Write the header with a zero size field; see [`patch_file_size`].
    pub fn write(&self, writer: &mut ByteWriter, magic: &[u8; 8], section_count: u16) {
        writer.write_bytes(magic);
        writer.write_bytes(&self.endian.bom());
        writer.write_u16(self.reserved_0a);
        writer.write_u8(self.encoding);
        writer.write_u8(self.version);
        writer.write_u16(section_count);
        writer.write_u16(self.reserved_10);
        writer.write_u32(0);
        writer.write_bytes(&self.reserved_tail);
    }
}

/// Backfill the total file size once every section has been written.
pub fn patch_file_size(writer: &mut ByteWriter) -> Result<()> {
    let size = writer.position() as u32;
    writer.patch_u32(FILE_SIZE_OFFSET, size)
}

/// A section as found in the file, borrowing its data.
#[derive(Debug, Clone, Copy)]
pub struct RawSection<'a> {
    pub tag: [u8; 4],
    pub data: &'a [u8],
}

/// A section this codec does not model, carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownSection {
    pub tag: [u8; 4],
    pub data: Vec<u8>,
}

/// Walk `count` sections starting at the view's position.
pub fn read_sections<'a>(view: &mut ByteView<'a>, count: u16) -> Result<Vec<RawSection<'a>>> {
    let mut sections = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let tag: [u8; 4] = view.read_array()?;
        let size = view.read_u32()? as usize;
        view.skip(SECTION_HEADER_SIZE - 8)?;
        let data = view.read_bytes(size)?;

        tracing::debug!("Section {}: {} bytes", String::from_utf8_lossy(&tag), size);
        sections.push(RawSection { tag, data });

        // The final section's padding may be cut off by some tools
        let aligned = view.position().next_multiple_of(SECTION_ALIGNMENT);
        view.seek(aligned.min(view.len()))?;
    }

    Ok(sections)
}

/// Write one tagged section and pad it to the next boundary.
pub fn write_section(writer: &mut ByteWriter, tag: &[u8; 4], data: &[u8]) {
    writer.write_bytes(tag);
    writer.write_u32(data.len() as u32);
    writer.write_bytes(&[0u8; SECTION_HEADER_SIZE - 8]);
    writer.write_bytes(data);
    writer.align(SECTION_ALIGNMENT, PADDING_BYTE);
}

/// The first section carrying `tag`, if any.
pub fn find_section<'a>(sections: &[RawSection<'a>], tag: &[u8; 4]) -> Option<RawSection<'a>> {
    sections.iter().find(|s| &s.tag == tag).copied()
}

/// Sections whose tag is not one of `known`, copied out for re-encoding.
pub fn unknown_sections(sections: &[RawSection<'_>], known: &[&[u8; 4]]) -> Vec<UnknownSection> {
    sections
        .iter()
        .filter(|s| !known.contains(&&s.tag))
        .map(|s| {
            tracing::debug!("Keeping unmodelled section {}", String::from_utf8_lossy(&s.tag));
            UnknownSection {
                tag: s.tag,
                data: s.data.to_vec(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAGIC: &[u8; 8] = b"TestMagc";

    #[test]
    fn test_header_round_trip() {
        let header = FileHeader::new(Endian::Little, 2);
        let mut writer = ByteWriter::new(Endian::Little);
        header.write(&mut writer, MAGIC, 2);
        assert_eq!(writer.position(), HEADER_SIZE);
        patch_file_size(&mut writer).unwrap();

        let bytes = writer.into_inner();
        assert_eq!(&bytes[8..10], &[0xFF, 0xFE]);

        let (parsed, view) = FileHeader::read(&bytes, MAGIC).unwrap();
        assert_eq!(parsed.endian, Endian::Little);
        assert_eq!(parsed.section_count, 2);
        assert_eq!(parsed.file_size, HEADER_SIZE as u32);
        assert_eq!(view.position(), HEADER_SIZE);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes[..8].copy_from_slice(b"MsgFlwBn");
        let err = FileHeader::read(&bytes, b"MsgStdBn").unwrap_err();
        assert!(matches!(err, Error::BadMagic { .. }));
    }

    #[test]
    fn test_short_header_is_truncated() {
        let err = FileHeader::read(b"Test", MAGIC).unwrap_err();
        assert!(matches!(err, Error::TruncatedInput { .. }));
    }

    #[test]
    fn test_sections_are_padded() {
        let mut writer = ByteWriter::new(Endian::Big);
        write_section(&mut writer, b"AAA1", &[1, 2, 3]);
        write_section(&mut writer, b"BBB1", &[]);
        let bytes = writer.into_inner();

        // 16 header + 3 data + 13 padding, then a bare 16-byte header
        assert_eq!(bytes.len(), 48);
        assert!(bytes[19..32].iter().all(|&b| b == PADDING_BYTE));

        let mut view = ByteView::new(&bytes, Endian::Big);
        let sections = read_sections(&mut view, 2).unwrap();
        assert_eq!(sections[0].tag, *b"AAA1");
        assert_eq!(sections[0].data, &[1, 2, 3]);
        assert_eq!(sections[1].tag, *b"BBB1");
        assert!(sections[1].data.is_empty());

        let unknown = unknown_sections(&sections, &[b"AAA1"]);
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].tag, *b"BBB1");
        assert!(find_section(&sections, b"CCC1").is_none());
    }
}
