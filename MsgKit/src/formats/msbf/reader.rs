//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! `.msbf` decoding

use std::path::Path;

use super::{FlowNode, MSBF_MAGIC, MsbfFile, NODE_FIELDS};
use crate::error::{Error, Result};
use crate::formats::common::{
    ByteView, FileHeader, find_section, read_label_table, read_sections, unknown_sections,
};
use crate::source::{ByteSource, FileSource};

const KNOWN_SECTIONS: [&[u8; 4]; 2] = [b"FLW2", b"FEN1"];

/// Read a .msbf file from disk
pub fn read_msbf<P: AsRef<Path>>(path: P) -> Result<MsbfFile> {
    let source = FileSource::open(path)?;
    parse_msbf_bytes(&source.contents()?)
}

/// Parse .msbf data from bytes
///
/// # Errors
///
/// Returns [`Error::BadMagic`] for a foreign signature, [`Error::TruncatedInput`]
/// when a section runs past the buffer, and [`Error::InconsistentModel`] when a
/// label points outside the node table or two labels share a node.
///
/// [`Error::BadMagic`]: crate::Error::BadMagic
/// [`Error::TruncatedInput`]: crate::Error::TruncatedInput
/// [`Error::InconsistentModel`]: crate::Error::InconsistentModel
pub fn parse_msbf_bytes(data: &[u8]) -> Result<MsbfFile> {
    let (header, mut view) = FileHeader::read(data, MSBF_MAGIC)?;
    let sections = read_sections(&mut view, header.section_count)?;
    let endian = header.endian;

    let flw = find_section(&sections, b"FLW2").ok_or(Error::MissingSection("FLW2"))?;
    let fen = find_section(&sections, b"FEN1").ok_or(Error::MissingSection("FEN1"))?;

    let mut flw = ByteView::new(flw.data, endian);
    let node_count = flw.read_u16()? as usize;
    let branch_count = flw.read_u16()? as usize;
    let flow_reserved = flw.read_u32()?;

    let mut nodes = Vec::with_capacity(node_count.min(flw.remaining() / (NODE_FIELDS * 2)));
    for _ in 0..node_count {
        let mut fields = [0u16; NODE_FIELDS];
        for field in &mut fields {
            *field = flw.read_u16()?;
        }
        nodes.push(FlowNode::new(fields));
    }

    let mut branches = Vec::with_capacity(branch_count.min(flw.remaining() / 2));
    for _ in 0..branch_count {
        branches.push(flw.read_u16()?);
    }

    let (bucket_count, labels) = read_label_table(&mut ByteView::new(fen.data, endian))?;
    for label in labels {
        let node = nodes.get_mut(label.index as usize).ok_or_else(|| {
            Error::InconsistentModel(format!(
                "flow label {} points at node {} of {}",
                label.text, label.index, node_count
            ))
        })?;
        if let Some(existing) = &node.label {
            return Err(Error::InconsistentModel(format!(
                "node {} is labelled both {} and {}",
                label.index, existing, label.text
            )));
        }
        node.label = Some(label.text);
    }

    tracing::debug!(
        "Decoded MSBF with {} nodes, {} branches",
        nodes.len(),
        branches.len()
    );

    Ok(MsbfFile {
        header,
        bucket_count,
        nodes,
        branches,
        flow_reserved,
        extra_sections: unknown_sections(&sections, &KNOWN_SECTIONS),
    })
}
