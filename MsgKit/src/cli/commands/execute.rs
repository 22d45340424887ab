//! Command execution implementations

use super::Commands;
use super::definitions::{MsbfCommands, MsbtCommands};
use super::{msbf, msbt};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Msbt { command } => command.execute(),
            Commands::Msbf { command } => command.execute(),
        }
    }
}

impl MsbtCommands {
    /// Execute the selected MSBT command.
    ///
    /// # Errors
    /// Returns an error if reading, editing or writing the container fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            MsbtCommands::List { file, plain, strict } => msbt::list(file, *plain, *strict),
            MsbtCommands::Get { file, label, plain } => msbt::get(file, label, *plain),
            MsbtCommands::Set {
                file,
                label,
                text,
                create,
            } => msbt::set(file, label, text, *create),
            MsbtCommands::Delete { file, label } => msbt::delete(file, label),
            MsbtCommands::Stats { file } => msbt::stats(file),
            MsbtCommands::Export {
                source,
                destination,
                quiet,
            } => msbt::export(source, destination, *quiet),
            MsbtCommands::Import {
                source,
                destination,
                quiet,
            } => msbt::import(source, destination, *quiet),
        }
    }
}

impl MsbfCommands {
    /// Execute the selected MSBF command.
    ///
    /// # Errors
    /// Returns an error if reading or converting the container fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            MsbfCommands::List { file, labelled } => msbf::list(file, *labelled),
            MsbfCommands::Resolve { file, label } => msbf::resolve(file, label),
            MsbfCommands::Export {
                source,
                destination,
            } => msbf::export(source, destination),
        }
    }
}
