//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! MSBT (`MsgStdBn`) message-text container
//!
//! Three sections, each 16-byte aligned:
//! - `LBL1` - hash-bucket label index mapping label text to message index
//! - `ATR1` - one fixed-size attribute record per message
//! - `TXT2` - UTF-16 message bodies with inline command records

mod commands;
mod editor;
mod reader;
pub mod tables;
mod writer;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use commands::{CommandOutcome, COMMAND_MARKER, decode_command, encode_command, encoded_len};
pub use reader::{parse_msbt_bytes, parse_msbt_bytes_with_options, read_msbt};
pub use writer::{serialize_msbt, write_msbt};

use crate::config::CodecOptions;
use crate::formats::common::{FileHeader, TEXT_HASH, UnknownSection};

/// "MsgStdBn" signature at offset 0
pub const MSBT_MAGIC: &[u8; 8] = b"MsgStdBn";

/// Size of one ATR1 record in bytes
pub const ATTRIBUTE_SIZE: u32 = 12;

/// Number of sections this codec writes
pub const MSBT_SECTION_COUNT: u16 = 3;

/// Font size selected by a size command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    Normal,
    Large,
}

impl FontSize {
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::Small),
            1 => Some(Self::Normal),
            2 => Some(Self::Large),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_u16(self) -> u16 {
        match self {
            Self::Small => 0,
            Self::Normal => 1,
            Self::Large => 2,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Normal => "normal",
            Self::Large => "large",
        }
    }
}

/// An inline command record that did not match any known kind.
///
/// Kept verbatim so the message re-encodes to the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawCommand {
    pub kind: u16,
    pub param: u16,
    pub payload: Vec<u8>,
}

/// What an inline command does
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CommandKind {
    /// Change the font color (name from [`tables::COLOR_NAMES`] or `"none"`)
    Color(String),
    /// Pause for a number of frames
    Wait(u16),
    /// Start a new text box page
    NewPage,
    /// Play a named sound effect
    Sound(String),
    /// Inline icon (name from [`tables::ICON_NAMES`])
    Icon(String),
    FontSize(FontSize),
    /// Insert the speaking character's name
    Character,
    /// A record that could not be decoded
    Unparsed(RawCommand),
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color(name) => write!(f, "[color:{name}]"),
            Self::Wait(ticks) => write!(f, "[wait:{ticks}]"),
            Self::NewPage => f.write_str("[newpage]"),
            Self::Sound(name) => write!(f, "[sound:{name}]"),
            Self::Icon(name) => write!(f, "[icon:{name}]"),
            Self::FontSize(size) => write!(f, "[size:{}]", size.name()),
            Self::Character => f.write_str("[character]"),
            Self::Unparsed(raw) => write!(f, "[raw:{},{}]", raw.kind, raw.param),
        }
    }
}

/// A command anchored before the character at `index`.
///
/// `index` counts decoded characters only; placeholder markers are not part
/// of [`RichText::characters`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Command {
    pub index: usize,
    pub kind: CommandKind,
}

impl Command {
    #[must_use]
    pub fn new(index: usize, kind: CommandKind) -> Self {
        Self { index, kind }
    }
}

/// Message body: UTF-16 code units plus the commands interleaved with them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(with = "utf16_units")]
    pub characters: Vec<u16>,
    pub commands: Vec<Command>,
}

/// One fixed-size ATR1 record. Only the trigger field has a known meaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRecord {
    pub trigger: u8,
    pub field1: u8,
    pub field2: u8,
    pub field3: u8,
    pub field4: u16,
    pub field5: u16,
    pub field6: u32,
}

/// A single message: label, attributes and body kept together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub label: String,
    pub attributes: AttributeRecord,
    pub body: RichText,
}

impl Message {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            attributes: AttributeRecord::default(),
            body: RichText::default(),
        }
    }
}

/// A decoded MSBT container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsbtFile {
    pub header: FileHeader,
    /// LBL1 bucket count; also the modulus of the label hash
    pub bucket_count: u32,
    /// Messages in TXT2 order; a message's position is its label target
    pub messages: Vec<Message>,
    /// ATR1 bytes following the fixed-size records
    #[serde(default)]
    pub attribute_pool: Vec<u8>,
    #[serde(default)]
    pub extra_sections: Vec<UnknownSection>,
}

impl Default for MsbtFile {
    fn default() -> Self {
        Self::new()
    }
}

impl MsbtFile {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(&CodecOptions::default())
    }

    #[must_use]
    pub fn with_options(options: &CodecOptions) -> Self {
        Self {
            header: FileHeader::new(options.byte_order, MSBT_SECTION_COUNT),
            bucket_count: options.text_buckets,
            messages: Vec::new(),
            attribute_pool: Vec::new(),
            extra_sections: Vec::new(),
        }
    }

    /// Like [`MsbtFile::with_options`], rejecting invalid options
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidOptions`] from [`CodecOptions::validate`].
    pub fn try_with_options(options: &CodecOptions) -> crate::error::Result<Self> {
        options.validate()?;
        Ok(Self::with_options(options))
    }

    /// Load and decode a file through [`crate::source::FileSource`]
    pub fn open<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        read_msbt(path)
    }

    /// Labels with their message index, as LBL1 stores them
    #[must_use]
    pub fn labels(&self) -> Vec<crate::formats::common::Label> {
        self.messages
            .iter()
            .enumerate()
            .map(|(i, m)| crate::formats::common::Label::new(m.label.clone(), i as u32))
            .collect()
    }

    /// Hash bucket a label would be stored in
    #[must_use]
    pub fn bucket_of(&self, label: &str) -> u32 {
        crate::formats::common::label_hash(label, TEXT_HASH.multiplier, self.bucket_count)
    }
}

/// Serialize code units as a string when they are valid UTF-16, otherwise
/// as a raw array, so lone surrogates survive a JSON round trip.
mod utf16_units {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Units {
        Text(String),
        Raw(Vec<u16>),
    }

    pub fn serialize<S: Serializer>(units: &[u16], serializer: S) -> Result<S::Ok, S::Error> {
        match String::from_utf16(units) {
            Ok(text) => Units::Text(text).serialize(serializer),
            Err(_) => Units::Raw(units.to_vec()).serialize(serializer),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u16>, D::Error> {
        Ok(match Units::deserialize(deserializer)? {
            Units::Text(text) => text.encode_utf16().collect(),
            Units::Raw(units) => units,
        })
    }
}
