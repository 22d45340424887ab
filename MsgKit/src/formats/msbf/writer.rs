//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! `.msbf` encoding

use std::collections::HashSet;
use std::path::Path;

use super::{MSBF_MAGIC, MSBF_SECTION_COUNT, MsbfFile, NODE_FIELDS};
use crate::error::{Error, Result};
use crate::formats::common::{
    BucketOrder, ByteWriter, FLOW_HASH, patch_file_size, write_label_table, write_section,
};
use crate::source::{ByteSource, FileSource};

/// Write a .msbf file to disk
pub fn write_msbf<P: AsRef<Path>>(path: P, file: &MsbfFile) -> Result<()> {
    let mut source = FileSource::create(path);
    source.set_contents(serialize_msbf(file)?);
    source.save()
}

/// Encode an MSBF container to bytes
///
/// # Errors
/// Returns [`Error::InconsistentModel`] if the node or branch table exceeds
/// the 16-bit counts, [`Error::DuplicateLabel`] if two nodes share a label,
/// and [`Error::LabelTooLong`] for an oversized label.
pub fn serialize_msbf(file: &MsbfFile) -> Result<Vec<u8>> {
    let endian = file.header.endian;

    let labels = file.labels();
    let mut seen = HashSet::with_capacity(labels.len());
    for label in &labels {
        if !seen.insert(label.text.as_str()) {
            return Err(Error::DuplicateLabel(label.text.clone()));
        }
    }

    let node_count = u16::try_from(file.nodes.len())
        .map_err(|_| Error::InconsistentModel(format!("{} flow nodes", file.nodes.len())))?;
    let branch_count = u16::try_from(file.branches.len())
        .map_err(|_| Error::InconsistentModel(format!("{} branch entries", file.branches.len())))?;

    let mut flw = ByteWriter::with_capacity(
        endian,
        8 + file.nodes.len() * NODE_FIELDS * 2 + file.branches.len() * 2,
    );
    flw.write_u16(node_count);
    flw.write_u16(branch_count);
    flw.write_u32(file.flow_reserved);
    for node in &file.nodes {
        for &field in &node.fields {
            flw.write_u16(field);
        }
    }
    for &branch in &file.branches {
        flw.write_u16(branch);
    }

    let mut fen = ByteWriter::new(endian);
    write_label_table(
        &mut fen,
        &labels,
        FLOW_HASH.multiplier,
        file.bucket_count,
        BucketOrder::Descending,
    )?;

    tracing::debug!(
        "Encoding MSBF: FLW2 {} bytes, FEN1 {} bytes",
        flw.position(),
        fen.position()
    );

    let section_count = MSBF_SECTION_COUNT + file.extra_sections.len() as u16;
    let mut out = ByteWriter::new(endian);
    file.header.write(&mut out, MSBF_MAGIC, section_count);
    write_section(&mut out, b"FLW2", flw.as_slice());
    write_section(&mut out, b"FEN1", fen.as_slice());
    for section in &file.extra_sections {
        write_section(&mut out, &section.tag, &section.data);
    }
    patch_file_size(&mut out)?;

    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::common::Endian;
    use crate::formats::msbf::{FlowNode, parse_msbf_bytes};

    #[test]
    fn test_round_trip_little_endian() {
        let mut file = MsbfFile::new();
        file.header.endian = Endian::Little;
        file.push_node(FlowNode::new([1, 2, 3, 4, 5, 6])).unwrap();
        file.push_node(FlowNode::empty()).unwrap();
        file.set_label(0, "Entry").unwrap();
        file.branches = vec![7, 8, 9];

        let bytes = serialize_msbf(&file).unwrap();
        assert_eq!(&bytes[8..10], &[0xFF, 0xFE]);

        let mut parsed = parse_msbf_bytes(&bytes).unwrap();
        assert_eq!(parsed.header.file_size as usize, bytes.len());
        parsed.header.file_size = file.header.file_size;
        assert_eq!(parsed, file);
        assert_eq!(serialize_msbf(&parsed).unwrap(), bytes);
    }

    #[test]
    fn test_shared_label_fails_to_encode() {
        let mut file = MsbfFile::new();
        file.push_node(FlowNode::new([1, 0, 0, 0, 0, 0])).unwrap();
        file.set_label(0, "Start").unwrap();
        // Written straight into the public field, past set_label
        let mut copy = FlowNode::new([2, 0, 0, 0, 0, 0]);
        copy.label = Some("Start".to_string());
        file.nodes.push(copy);

        assert!(matches!(serialize_msbf(&file), Err(Error::DuplicateLabel(label)) if label == "Start"));
    }

    #[test]
    fn test_flw2_layout() {
        let mut file = MsbfFile::new();
        file.push_node(FlowNode::new([0x0102, 0, 0, 0, 0, 0x0304])).unwrap();
        file.branches = vec![0xBEEF];
        let bytes = serialize_msbf(&file).unwrap();

        // FLW2 header at 0x20, data at 0x30
        assert_eq!(&bytes[0x20..0x24], b"FLW2");
        assert_eq!(&bytes[0x24..0x28], &22u32.to_be_bytes());
        assert_eq!(&bytes[0x30..0x34], &[0x00, 0x01, 0x00, 0x01]);
        assert_eq!(&bytes[0x38..0x3A], &[0x01, 0x02]);
        assert_eq!(&bytes[0x42..0x44], &[0x03, 0x04]);
        assert_eq!(&bytes[0x44..0x46], &[0xBE, 0xEF]);
        assert!(bytes[0x46..0x50].iter().all(|&b| b == 0xAB));
        assert_eq!(&bytes[0x50..0x54], b"FEN1");
    }
}
