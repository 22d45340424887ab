//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! MSBF (`MsgFlwBn`) message-flow container
//!
//! Two sections, each 16-byte aligned:
//! - `FLW2` - fixed-stride flow node table followed by a `u16` branch table
//! - `FEN1` - hash-bucket label index mapping entry labels to node indices

mod reader;
mod writer;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use reader::{parse_msbf_bytes, read_msbf};
pub use writer::{serialize_msbf, write_msbf};

use crate::config::CodecOptions;
use crate::error::{Error, Result};
use crate::formats::common::{
    FLOW_HASH, FileHeader, Label, UnknownSection, check_label_len, label_hash,
};

/// "MsgFlwBn" signature at offset 0
pub const MSBF_MAGIC: &[u8; 8] = b"MsgFlwBn";

/// Number of sections this codec writes
pub const MSBF_SECTION_COUNT: u16 = 2;

/// Number of `u16` fields in one flow node
pub const NODE_FIELDS: usize = 6;

/// One record of the flow graph. The fields have no recovered meaning and
/// are stored as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowNode {
    pub fields: [u16; NODE_FIELDS],
    /// Entry label from FEN1, if one points at this node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FlowNode {
    #[must_use]
    pub fn new(fields: [u16; NODE_FIELDS]) -> Self {
        Self { fields, label: None }
    }

    /// A placeholder node: all fields zero
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(|&f| f == 0)
    }
}

/// A decoded MSBF container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsbfFile {
    pub header: FileHeader,
    /// FEN1 bucket count; also the modulus of the flow label hash
    pub bucket_count: u32,
    pub nodes: Vec<FlowNode>,
    /// Trailing `u16` table of FLW2, not interpreted
    pub branches: Vec<u16>,
    /// The 4 bytes after the FLW2 counts
    #[serde(default)]
    pub flow_reserved: u32,
    #[serde(default)]
    pub extra_sections: Vec<UnknownSection>,
}

impl Default for MsbfFile {
    fn default() -> Self {
        Self::new()
    }
}

impl MsbfFile {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(&CodecOptions::default())
    }

    #[must_use]
    pub fn with_options(options: &CodecOptions) -> Self {
        Self {
            header: FileHeader::new(options.byte_order, MSBF_SECTION_COUNT),
            bucket_count: options.flow_buckets,
            nodes: Vec::new(),
            branches: Vec::new(),
            flow_reserved: 0,
            extra_sections: Vec::new(),
        }
    }

    /// Like [`MsbfFile::with_options`], rejecting invalid options
    ///
    /// # Errors
    /// Returns [`Error::InvalidOptions`] from [`CodecOptions::validate`].
    pub fn try_with_options(options: &CodecOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::with_options(options))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        read_msbf(path)
    }

    /// The node an entry label points at
    #[must_use]
    pub fn resolve_label(&self, label: &str) -> Option<&FlowNode> {
        self.node_index(label).map(|i| &self.nodes[i])
    }

    #[must_use]
    pub fn node_index(&self, label: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.label.as_deref() == Some(label))
    }

    #[must_use]
    pub fn label_of(&self, node_index: usize) -> Option<&str> {
        self.nodes.get(node_index)?.label.as_deref()
    }

    /// Point `label` at a node, replacing any label it had
    ///
    /// # Errors
    /// Returns [`Error::InconsistentModel`] if the node does not exist, or
    /// [`Error::DuplicateLabel`] if another node already uses the label, or
    /// [`Error::LabelTooLong`] if it does not fit the label record.
    pub fn set_label(&mut self, node_index: usize, label: impl Into<String>) -> Result<()> {
        let label = label.into();
        check_label_len(&label)?;
        if let Some(existing) = self.node_index(&label) {
            if existing != node_index {
                return Err(Error::DuplicateLabel(label));
            }
        }
        let count = self.nodes.len();
        let node = self.nodes.get_mut(node_index).ok_or_else(|| {
            Error::InconsistentModel(format!("node {node_index} of {count} does not exist"))
        })?;
        node.label = Some(label);
        Ok(())
    }

    /// Remove a label, leaving its node anonymous
    pub fn clear_label(&mut self, label: &str) -> Option<usize> {
        let index = self.node_index(label)?;
        self.nodes[index].label = None;
        Some(index)
    }

    /// Append a node and return its index
    ///
    /// # Errors
    /// Returns [`Error::DuplicateLabel`] if the node carries a label another
    /// node already uses, or [`Error::LabelTooLong`] for an oversized label.
    pub fn push_node(&mut self, node: FlowNode) -> Result<usize> {
        if let Some(label) = &node.label {
            check_label_len(label)?;
            if self.node_index(label).is_some() {
                return Err(Error::DuplicateLabel(label.clone()));
            }
        }
        self.nodes.push(node);
        Ok(self.nodes.len() - 1)
    }

    /// Labels with their node index, as FEN1 stores them
    #[must_use]
    pub fn labels(&self) -> Vec<Label> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.label.as_ref().map(|l| Label::new(l.clone(), i as u32)))
            .collect()
    }

    /// Hash bucket a label would be stored in
    #[must_use]
    pub fn bucket_of(&self, label: &str) -> u32 {
        label_hash(label, FLOW_HASH.multiplier, self.bucket_count)
    }
}
