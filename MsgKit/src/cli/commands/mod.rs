//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT

use clap::Subcommand;

pub mod definitions;
mod execute;
pub mod msbf;
pub mod msbt;

pub use definitions::{MsbfCommands, MsbtCommands};

#[derive(Subcommand)]
pub enum Commands {
    /// Message text container (.msbt) operations
    Msbt {
        #[command(subcommand)]
        command: MsbtCommands,
    },

    /// Message flow container (.msbf) operations
    Msbf {
        #[command(subcommand)]
        command: MsbfCommands,
    },
}
