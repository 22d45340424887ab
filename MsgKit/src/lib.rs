//! # MsgKit
//!
//! A pure-Rust library for reading, editing and writing MSBT message text
//! and MSBF message flow containers.
//!
//! ## Supported Formats
//!
//! - **MSBT** (`MsgStdBn`) - Labelled UTF-16 messages with inline commands
//!   (color, wait, new page, sound, icon, font size, character name)
//! - **MSBF** (`MsgFlwBn`) - Flow node tables with labelled entry points
//! - **JSON** - Lossless export and import of both containers
//!
//! ## Quick Start
//!
//! ### Editing Messages
//!
//! ```no_run
//! use msgkit::formats::msbt::{CommandKind, MsbtFile, write_msbt};
//!
//! let mut file = MsbtFile::open("Common.msbt")?;
//! let message = file.add_empty_message("Greeting")?;
//! message.body.push_str("Hello")?;
//! message.body.push_command(CommandKind::Wait(30))?;
//! message.body.push_str("!")?;
//! write_msbt("Common.msbt", &file)?;
//! # Ok::<(), msgkit::Error>(())
//! ```
//!
//! ### Converting to JSON
//!
//! ```no_run
//! use msgkit::converter::convert_msbt_to_json;
//!
//! convert_msbt_to_json("Common.msbt", "Common.json")?;
//! # Ok::<(), msgkit::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use msgkit::prelude::*;
//!
//! let mut flow = MsbfFile::new();
//! let node = flow.push_node(FlowNode::new([1, 0, 0, 0, 0, 0]))?;
//! flow.set_label(node, "Start")?;
//! assert_eq!(flow.resolve_label("Start"), Some(&flow.nodes[node]));
//! # Ok::<(), msgkit::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `msgkit` command-line binary

pub mod config;
pub mod converter;
pub mod error;
pub mod formats;
pub mod source;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::CodecOptions;
    pub use crate::error::{Error, Result};
    pub use crate::formats::common::Endian;
    pub use crate::formats::msbf::{FlowNode, MsbfFile, read_msbf, write_msbf};
    pub use crate::formats::msbt::{
        AttributeRecord, Command, CommandKind, FontSize, Message, MsbtFile, RichText, read_msbt,
        write_msbt,
    };
    pub use crate::source::{ByteSource, FileSource, MemorySource};

    pub use crate::converter;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
