//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! Binary message containers
//!
//! Both formats share the header, section and label-table layout in
//! [`common`]; [`msbt`] holds message text and [`msbf`] holds message flow.

pub mod common;
pub mod msbf;
pub mod msbt;

pub use common::{Endian, Label};

// Re-export main document types
pub use msbf::{FlowNode, MsbfFile, parse_msbf_bytes, read_msbf, serialize_msbf, write_msbf};
pub use msbt::{
    AttributeRecord, Command, CommandKind, FontSize, Message, MsbtFile, RawCommand, RichText,
    parse_msbt_bytes, parse_msbt_bytes_with_options, read_msbt, serialize_msbt, write_msbt,
};
