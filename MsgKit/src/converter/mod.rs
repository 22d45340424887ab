//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! Format conversion utilities
//!
//! - MSBT ↔ JSON
//! - MSBF ↔ JSON

pub mod json;

/// Progress callback type for conversion operations.
/// The callback receives a message describing the current step.
pub type ProgressCallback<'a> = &'a dyn Fn(&str);

pub use json::{
    convert_json_to_msbf, convert_json_to_msbt, convert_json_to_msbt_with_progress,
    convert_msbf_to_json, convert_msbt_to_json, convert_msbt_to_json_with_progress,
    msbf_from_json, msbf_to_json, msbt_from_json, msbt_to_json,
};
