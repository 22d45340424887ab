//! CLI commands for MSBT message text containers

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::CodecOptions;
use crate::converter::{convert_json_to_msbt_with_progress, convert_msbt_to_json_with_progress};
use crate::formats::msbt::{
    CommandKind, Message, MsbtFile, RichText, parse_msbt_bytes_with_options, serialize_msbt,
};
use crate::source::{ByteSource, FileSource};

fn open(path: &Path, options: &CodecOptions) -> anyhow::Result<(FileSource, MsbtFile)> {
    let source = FileSource::open(path)?;
    let file = parse_msbt_bytes_with_options(&source.contents()?, options)?;
    Ok((source, file))
}

fn save(mut source: FileSource, file: &MsbtFile) -> anyhow::Result<()> {
    source.set_contents(serialize_msbt(file)?);
    source.save()?;
    source.close();
    Ok(())
}

fn render(message: &Message, plain: bool) -> String {
    if plain {
        message.body.text()
    } else {
        message.body.to_markup()
    }
}

/// List every message in file order
pub fn list(path: &Path, plain: bool, strict: bool) -> anyhow::Result<()> {
    let (_, file) = open(path, &CodecOptions::new().strict(strict))?;

    for message in &file.messages {
        println!("{}: {}", message.label, render(message, plain));
    }
    println!("\n{} messages", file.len());
    Ok(())
}

/// Print a single message by label
pub fn get(path: &Path, label: &str, plain: bool) -> anyhow::Result<()> {
    let (_, file) = open(path, &CodecOptions::default())?;
    let Some(message) = file.get(label) else {
        anyhow::bail!("No message labelled '{label}' in {}", path.display());
    };
    println!("{}", render(message, plain));
    Ok(())
}

/// Replace a message's text and write the file back
pub fn set(path: &Path, label: &str, text: &str, create: bool) -> anyhow::Result<()> {
    let (source, mut file) = open(path, &CodecOptions::default())?;

    if let Some(message) = file.get_mut(label) {
        message.body.set_text(text)?;
    } else if create {
        let body = RichText::plain(text)?;
        file.add_empty_message(label)?.body = body;
        println!("Added message '{label}'");
    } else {
        anyhow::bail!(
            "No message labelled '{label}' in {} (use --create to add it)",
            path.display()
        );
    }

    save(source, &file)?;
    println!("Updated {}", path.display());
    Ok(())
}

/// Remove a message and write the file back
pub fn delete(path: &Path, label: &str) -> anyhow::Result<()> {
    let (source, mut file) = open(path, &CodecOptions::default())?;
    if file.remove_message(label).is_none() {
        anyhow::bail!("No message labelled '{label}' in {}", path.display());
    }
    save(source, &file)?;
    println!("Deleted '{label}', {} messages remain", file.len());
    Ok(())
}

/// Print container statistics
pub fn stats(path: &Path) -> anyhow::Result<()> {
    let (_, file) = open(path, &CodecOptions::default())?;

    let mut commands: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut characters = 0;
    let mut empty = 0;
    for message in &file.messages {
        characters += message.body.characters.len();
        if message.body.is_empty() {
            empty += 1;
        }
        for command in &message.body.commands {
            *commands.entry(command_name(&command.kind)).or_default() += 1;
        }
    }

    println!("File: {}", path.display());
    println!("Byte order: {:?}", file.header.endian);
    println!("Version: {}", file.header.version);
    println!("Label buckets: {}", file.bucket_count);
    println!("Messages: {} ({empty} empty)", file.len());
    println!("Characters: {characters}");
    if !file.attribute_pool.is_empty() {
        println!("Attribute pool: {} bytes", file.attribute_pool.len());
    }
    for section in &file.extra_sections {
        println!(
            "Extra section: {} ({} bytes)",
            String::from_utf8_lossy(&section.tag),
            section.data.len()
        );
    }
    if !commands.is_empty() {
        println!("Commands:");
        for (name, count) in &commands {
            println!("  {name:<10} {count}");
        }
    }
    Ok(())
}

fn command_name(kind: &CommandKind) -> &'static str {
    match kind {
        CommandKind::Color(_) => "color",
        CommandKind::Wait(_) => "wait",
        CommandKind::NewPage => "newpage",
        CommandKind::Sound(_) => "sound",
        CommandKind::Icon(_) => "icon",
        CommandKind::FontSize(_) => "size",
        CommandKind::Character => "character",
        CommandKind::Unparsed(_) => "unparsed",
    }
}

/// Export a .msbt file to JSON
pub fn export(source: &Path, destination: &Path, quiet: bool) -> anyhow::Result<()> {
    convert_msbt_to_json_with_progress(source, destination, &|step| {
        if !quiet {
            println!("{step}");
        }
    })?;
    if !quiet {
        println!("Exported {}", destination.display());
    }
    Ok(())
}

/// Build a .msbt file from JSON
pub fn import(source: &Path, destination: &Path, quiet: bool) -> anyhow::Result<()> {
    convert_json_to_msbt_with_progress(source, destination, &|step| {
        if !quiet {
            println!("{step}");
        }
    })?;
    if !quiet {
        println!("Imported {}", destination.display());
    }
    Ok(())
}
