//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! Subcommand definitions

use clap::Subcommand;
use std::path::PathBuf;

/// MSBT commands
#[derive(Subcommand)]
pub enum MsbtCommands {
    /// List every message with its label
    List {
        /// Source .msbt file
        file: PathBuf,

        /// Print plain text instead of markup
        #[arg(long)]
        plain: bool,

        /// Reject unknown inline commands instead of keeping them
        #[arg(long)]
        strict: bool,
    },

    /// Print one message
    Get {
        /// Source .msbt file
        file: PathBuf,

        /// Message label
        label: String,

        /// Print plain text instead of markup
        #[arg(long)]
        plain: bool,
    },

    /// Replace a message's text (inline commands are dropped)
    Set {
        /// .msbt file to modify in place
        file: PathBuf,

        /// Message label
        label: String,

        /// New text
        text: String,

        /// Add the message if the label does not exist
        #[arg(short, long)]
        create: bool,
    },

    /// Delete a message by label
    Delete {
        /// .msbt file to modify in place
        file: PathBuf,

        /// Message label
        label: String,
    },

    /// Show container statistics
    Stats {
        /// Source .msbt file
        file: PathBuf,
    },

    /// Export to JSON
    Export {
        /// Source .msbt file
        source: PathBuf,

        /// Output .json file
        destination: PathBuf,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Build a .msbt file from JSON
    Import {
        /// Source .json file
        source: PathBuf,

        /// Output .msbt file
        destination: PathBuf,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },
}

/// MSBF commands
#[derive(Subcommand)]
pub enum MsbfCommands {
    /// List flow nodes and their labels
    List {
        /// Source .msbf file
        file: PathBuf,

        /// Only show labelled nodes
        #[arg(short, long)]
        labelled: bool,
    },

    /// Find the node an entry label points at
    Resolve {
        /// Source .msbf file
        file: PathBuf,

        /// Entry label
        label: String,
    },

    /// Export to JSON
    Export {
        /// Source .msbf file
        source: PathBuf,

        /// Output .json file
        destination: PathBuf,
    },
}
