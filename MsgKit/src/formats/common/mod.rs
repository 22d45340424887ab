//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! Building blocks shared by the MSBT and MSBF containers

pub mod cursor;
pub mod hash;
pub mod header;

pub use cursor::{ByteView, ByteWriter, Endian, LITTLE_ENDIAN_MARKER};
pub use hash::{
    BucketOrder, FLOW_HASH, HashParams, Label, TEXT_HASH, check_label_len, label_hash,
    read_label_table, write_label_table,
};
pub use header::{
    FileHeader, PADDING_BYTE, RawSection, SECTION_ALIGNMENT, UnknownSection, find_section,
    patch_file_size, read_sections, unknown_sections, write_section,
};
