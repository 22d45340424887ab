//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! Error types for `MsgKit`

use thiserror::Error;

/// The error type for `MsgKit` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Container Errors ====================
    /// The 8-byte signature does not match the expected container.
    #[error("invalid magic: expected {expected:?}, found {found:?}")]
    BadMagic {
        /// The signature this decoder accepts.
        expected: [u8; 8],
        /// The signature found at offset 0.
        found: [u8; 8],
    },

    /// A read ran past the end of the supplied buffer.
    #[error("truncated input: wanted {wanted} bytes at offset {offset:#x}, buffer is {len} bytes")]
    TruncatedInput {
        /// Offset the read started at.
        offset: usize,
        /// Number of bytes requested.
        wanted: usize,
        /// Total length of the buffer.
        len: usize,
    },

    /// A required section is absent from the container.
    #[error("missing {0} section")]
    MissingSection(&'static str),

    /// The ATR1 record size is not the one this codec models.
    #[error("unexpected attribute record size: {found} (expected {expected})")]
    UnexpectedAttributeSize {
        /// Record size this codec understands.
        expected: u32,
        /// Record size declared in the file.
        found: u32,
    },

    // ==================== Command Errors ====================
    /// An inline command tag/parameter pair is not recognized.
    #[error("unknown inline command: type {kind}, param {param}")]
    UnknownCommand {
        /// The command type tag.
        kind: u16,
        /// The command parameter.
        param: u16,
    },

    /// A color, icon or font size name is not present in its lookup table.
    #[error("unknown {table} name: {name:?}")]
    UnknownName {
        /// Which table was consulted.
        table: &'static str,
        /// The name that failed to resolve.
        name: String,
    },

    // ==================== Model Errors ====================
    /// Labels, attributes and texts no longer line up.
    #[error("inconsistent model: {0}")]
    InconsistentModel(String),

    /// Label text does not fit the 1-byte length prefix.
    #[error("label too long ({len} bytes, max 255): {label}")]
    LabelTooLong {
        /// The offending label.
        label: String,
        /// Its byte length.
        len: usize,
    },

    /// A label with this text already exists in the container.
    #[error("duplicate label: {0}")]
    DuplicateLabel(String),

    /// No entry carries the requested label.
    #[error("label not found: {0}")]
    LabelNotFound(String),

    /// Codec options failed validation.
    #[error("invalid codec options: {0}")]
    InvalidOptions(String),

    // ==================== Parsing Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// Whether this error was raised while reading bytes rather than by the model.
    #[must_use]
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Error::BadMagic { .. }
                | Error::TruncatedInput { .. }
                | Error::MissingSection(_)
                | Error::UnexpectedAttributeSize { .. }
                | Error::Utf8Error(_)
        )
    }
}

/// A specialized Result type for `MsgKit` operations.
pub type Result<T> = std::result::Result<T, Error>;
