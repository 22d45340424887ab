//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! Options controlling how containers are decoded and created

use crate::error::{Error, Result};
use crate::formats::common::{Endian, FLOW_HASH, TEXT_HASH};

/// Codec options shared by the MSBT and MSBF entry points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// Fail decoding on an unrecognized inline command instead of keeping it
    /// as an unparsed record
    pub strict_commands: bool,
    /// Byte order for containers created from scratch
    pub byte_order: Endian,
    /// LBL1 bucket count for new MSBT containers
    pub text_buckets: u32,
    /// FEN1 bucket count for new MSBF containers
    pub flow_buckets: u32,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            strict_commands: false,
            // Wii-era files are big-endian
            byte_order: Endian::Big,
            text_buckets: TEXT_HASH.buckets,
            flow_buckets: FLOW_HASH.buckets,
        }
    }
}

impl CodecOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_commands = strict;
        self
    }

    #[must_use]
    pub fn with_byte_order(mut self, endian: Endian) -> Self {
        self.byte_order = endian;
        self
    }

    #[must_use]
    pub fn with_text_buckets(mut self, buckets: u32) -> Self {
        self.text_buckets = buckets;
        self
    }

    #[must_use]
    pub fn with_flow_buckets(mut self, buckets: u32) -> Self {
        self.flow_buckets = buckets;
        self
    }

    /// Validate the options
    ///
    /// # Errors
    /// Returns [`Error::InvalidOptions`] if a bucket count is zero.
    pub fn validate(&self) -> Result<()> {
        if self.text_buckets == 0 {
            return Err(Error::InvalidOptions("text_buckets must be non-zero".to_string()));
        }
        if self.flow_buckets == 0 {
            return Err(Error::InvalidOptions("flow_buckets must be non-zero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = CodecOptions::new();
        assert!(options.validate().is_ok());
        assert!(!options.strict_commands);
        assert_eq!(options.text_buckets, 101);
        assert_eq!(options.flow_buckets, 59);
    }

    #[test]
    fn test_zero_buckets_rejected() {
        let options = CodecOptions::new().with_text_buckets(0);
        assert!(matches!(options.validate(), Err(Error::InvalidOptions(_))));

        let options = CodecOptions::new().with_flow_buckets(0);
        assert!(options.validate().is_err());
    }
}
