//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! Container ↔ JSON conversion
//!
//! The JSON form is the serde view of the decoded model, so a container that
//! goes through JSON and back encodes to the same bytes.

use std::path::Path;

use super::ProgressCallback;
use crate::error::Result;
use crate::formats::msbf::{MsbfFile, read_msbf, write_msbf};
use crate::formats::msbt::{MsbtFile, read_msbt, write_msbt};
use crate::source::{ByteSource, FileSource};

/// Render an MSBT container as pretty-printed JSON
///
/// # Errors
/// Returns an error if serialization fails.
pub fn msbt_to_json(file: &MsbtFile) -> Result<String> {
    Ok(serde_json::to_string_pretty(file)?)
}

/// Parse an MSBT container from its JSON form
///
/// # Errors
/// Returns [`Error::JsonError`](crate::Error::JsonError) for malformed input.
pub fn msbt_from_json(json: &str) -> Result<MsbtFile> {
    Ok(serde_json::from_str(json)?)
}

/// Render an MSBF container as pretty-printed JSON
///
/// # Errors
/// Returns an error if serialization fails.
pub fn msbf_to_json(file: &MsbfFile) -> Result<String> {
    Ok(serde_json::to_string_pretty(file)?)
}

/// Parse an MSBF container from its JSON form
///
/// # Errors
/// Returns [`Error::JsonError`](crate::Error::JsonError) for malformed input.
pub fn msbf_from_json(json: &str) -> Result<MsbfFile> {
    Ok(serde_json::from_str(json)?)
}

/// Convert a .msbt file to JSON
///
/// # Errors
/// Returns an error if reading, decoding or writing fails.
pub fn convert_msbt_to_json<P: AsRef<Path>>(source: P, dest: P) -> Result<()> {
    convert_msbt_to_json_with_progress(source, dest, &|_| {})
}

/// Convert a .msbt file to JSON with progress callback
///
/// # Errors
/// Returns an error if reading, decoding or writing fails.
pub fn convert_msbt_to_json_with_progress<P: AsRef<Path>>(
    source: P,
    dest: P,
    progress: ProgressCallback,
) -> Result<()> {
    tracing::info!(
        "Converting MSBT→JSON: {:?} → {:?}",
        source.as_ref(),
        dest.as_ref()
    );

    progress("Reading MSBT file...");
    let file = read_msbt(&source)?;

    progress(&format!("Converting {} messages to JSON...", file.messages.len()));
    let json = msbt_to_json(&file)?;

    progress("Writing JSON file...");
    write_text(dest, json)?;

    tracing::info!("Conversion complete");
    Ok(())
}

/// Convert a JSON file back to .msbt
///
/// # Errors
/// Returns an error if the JSON is malformed or the model cannot be encoded.
pub fn convert_json_to_msbt<P: AsRef<Path>>(source: P, dest: P) -> Result<()> {
    convert_json_to_msbt_with_progress(source, dest, &|_| {})
}

/// Convert a JSON file back to .msbt with progress callback
///
/// # Errors
/// Returns an error if the JSON is malformed or the model cannot be encoded.
pub fn convert_json_to_msbt_with_progress<P: AsRef<Path>>(
    source: P,
    dest: P,
    progress: ProgressCallback,
) -> Result<()> {
    tracing::info!(
        "Converting JSON→MSBT: {:?} → {:?}",
        source.as_ref(),
        dest.as_ref()
    );

    progress("Reading JSON file...");
    let json = read_text(source)?;

    progress("Parsing JSON...");
    let file = msbt_from_json(&json)?;

    progress(&format!("Writing {} messages to MSBT...", file.messages.len()));
    write_msbt(dest, &file)?;

    tracing::info!("Conversion complete");
    Ok(())
}

/// Convert a .msbf file to JSON
///
/// # Errors
/// Returns an error if reading, decoding or writing fails.
pub fn convert_msbf_to_json<P: AsRef<Path>>(source: P, dest: P) -> Result<()> {
    tracing::info!(
        "Converting MSBF→JSON: {:?} → {:?}",
        source.as_ref(),
        dest.as_ref()
    );
    let file = read_msbf(&source)?;
    write_text(dest, msbf_to_json(&file)?)?;
    tracing::info!("Conversion complete");
    Ok(())
}

/// Convert a JSON file back to .msbf
///
/// # Errors
/// Returns an error if the JSON is malformed or the model cannot be encoded.
pub fn convert_json_to_msbf<P: AsRef<Path>>(source: P, dest: P) -> Result<()> {
    tracing::info!(
        "Converting JSON→MSBF: {:?} → {:?}",
        source.as_ref(),
        dest.as_ref()
    );
    let file = msbf_from_json(&read_text(source)?)?;
    write_msbf(dest, &file)?;
    tracing::info!("Conversion complete");
    Ok(())
}

fn read_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let source = FileSource::open(path)?;
    Ok(String::from_utf8(source.contents()?)?)
}

fn write_text<P: AsRef<Path>>(path: P, text: String) -> Result<()> {
    let mut dest = FileSource::create(path);
    dest.set_contents(text.into_bytes());
    dest.save()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::msbf::FlowNode;
    use crate::formats::msbt::{CommandKind, RichText, serialize_msbt};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    fn sample_msbt() -> MsbtFile {
        let mut file = MsbtFile::new();
        let message = file.add_empty_message("Greeting").unwrap();
        message.body = RichText::plain("Hello").unwrap();
        message.body.push_command(CommandKind::Color("red".to_string())).unwrap();
        message.body.push_str("!").unwrap();
        message.attributes.trigger = 3;
        file.add_empty_message("Empty").unwrap();
        file
    }

    #[test]
    fn test_msbt_json_round_trip() {
        let file = sample_msbt();
        let json = msbt_to_json(&file).unwrap();
        assert!(json.contains("\"Greeting\""));
        assert!(json.contains("\"Hello!\""));

        let back = msbt_from_json(&json).unwrap();
        assert_eq!(back, file);
        assert_eq!(serialize_msbt(&back).unwrap(), serialize_msbt(&file).unwrap());
    }

    #[test]
    fn test_msbf_json_round_trip() {
        let mut file = MsbfFile::new();
        file.push_node(FlowNode::new([1, 2, 3, 4, 5, 6])).unwrap();
        file.set_label(0, "Start").unwrap();
        let back = msbf_from_json(&msbf_to_json(&file).unwrap()).unwrap();
        assert_eq!(back, file);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            msbt_from_json("{ not json"),
            Err(crate::Error::JsonError(_))
        ));
    }

    #[test]
    fn test_convert_files_with_progress() {
        let dir = tempfile::tempdir().unwrap();
        let msbt = dir.path().join("text.msbt");
        let json = dir.path().join("text.json");
        let rebuilt = dir.path().join("rebuilt.msbt");
        write_msbt(&msbt, &sample_msbt()).unwrap();

        let steps = RefCell::new(Vec::new());
        convert_msbt_to_json_with_progress(&msbt, &json, &|s| steps.borrow_mut().push(s.to_string()))
            .unwrap();
        assert_eq!(steps.borrow().len(), 3);

        convert_json_to_msbt(&json, &rebuilt).unwrap();
        assert_eq!(std::fs::read(&msbt).unwrap(), std::fs::read(&rebuilt).unwrap());
    }
}
