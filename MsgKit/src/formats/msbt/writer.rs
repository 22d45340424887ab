//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! `.msbt` encoding

use std::collections::HashSet;
use std::path::Path;

use super::commands::{COMMAND_MARKER, encode_command};
use super::{ATTRIBUTE_SIZE, MSBT_MAGIC, MSBT_SECTION_COUNT, MsbtFile, RichText};
use crate::error::{Error, Result};
use crate::formats::common::{
    BucketOrder, ByteWriter, TEXT_HASH, patch_file_size, write_label_table, write_section,
};
use crate::source::{ByteSource, FileSource};

/// Write a .msbt file to disk
///
/// # Errors
/// Returns an error if encoding or file writing fails.
pub fn write_msbt<P: AsRef<Path>>(path: P, file: &MsbtFile) -> Result<()> {
    let mut source = FileSource::create(path);
    source.set_contents(serialize_msbt(file)?);
    source.save()
}

/// Encode an MSBT container to bytes
///
/// Every section size and offset is recomputed from the current messages.
///
/// # Errors
/// Returns [`Error::DuplicateLabel`] or [`Error::LabelTooLong`] for an invalid
/// label, [`Error::UnknownName`] for a color or icon missing from its table,
/// and [`Error::InconsistentModel`] for a command anchored past the end of its
/// text.
pub fn serialize_msbt(file: &MsbtFile) -> Result<Vec<u8>> {
    let endian = file.header.endian;

    let mut seen = HashSet::with_capacity(file.messages.len());
    for message in &file.messages {
        if !seen.insert(message.label.as_str()) {
            return Err(Error::DuplicateLabel(message.label.clone()));
        }
    }

    let mut lbl = ByteWriter::new(endian);
    write_label_table(
        &mut lbl,
        &file.labels(),
        TEXT_HASH.multiplier,
        file.bucket_count,
        BucketOrder::Ascending,
    )?;

    let mut atr = ByteWriter::with_capacity(endian, 8 + file.messages.len() * ATTRIBUTE_SIZE as usize);
    atr.write_u32(file.messages.len() as u32);
    atr.write_u32(ATTRIBUTE_SIZE);
    for message in &file.messages {
        let record = &message.attributes;
        atr.write_u8(record.trigger);
        atr.write_u8(record.field1);
        atr.write_u8(record.field2);
        atr.write_u8(record.field3);
        atr.write_u16(record.field4);
        atr.write_u16(record.field5);
        atr.write_u32(record.field6);
    }
    atr.write_bytes(&file.attribute_pool);

    let text_size: usize = file.messages.iter().map(|m| m.body.encoded_len()).sum();
    let mut txt = ByteWriter::with_capacity(endian, 4 + file.messages.len() * 4 + text_size);
    txt.write_u32(file.messages.len() as u32);
    for _ in &file.messages {
        txt.write_u32(0);
    }
    for (i, message) in file.messages.iter().enumerate() {
        let offset = txt.position() as u32;
        txt.patch_u32(4 + i * 4, offset)?;
        write_rich_text(&mut txt, &message.body, &message.label)?;
    }

    tracing::debug!(
        "Encoding MSBT: LBL1 {} bytes, ATR1 {} bytes, TXT2 {} bytes",
        lbl.position(),
        atr.position(),
        txt.position()
    );

    let section_count = MSBT_SECTION_COUNT + file.extra_sections.len() as u16;
    let mut out = ByteWriter::new(endian);
    file.header.write(&mut out, MSBT_MAGIC, section_count);
    write_section(&mut out, b"LBL1", lbl.as_slice());
    write_section(&mut out, b"ATR1", atr.as_slice());
    write_section(&mut out, b"TXT2", txt.as_slice());
    for section in &file.extra_sections {
        write_section(&mut out, &section.tag, &section.data);
    }
    patch_file_size(&mut out)?;

    Ok(out.into_inner())
}

/// Interleave characters and command records, then the zero terminator.
///
/// Commands sharing an index are written in list order.
fn write_rich_text(writer: &mut ByteWriter, body: &RichText, label: &str) -> Result<()> {
    if let Some(unit) = body.characters.iter().find(|&&u| u == 0 || u == COMMAND_MARKER) {
        return Err(Error::InconsistentModel(format!(
            "message {label} contains reserved code unit {unit:#06x}"
        )));
    }
    if let Some(command) = body.commands.iter().find(|c| c.index > body.characters.len()) {
        return Err(Error::InconsistentModel(format!(
            "message {label}: command at {} past end of {} characters",
            command.index,
            body.characters.len()
        )));
    }

    let mut ordered: Vec<_> = body.commands.iter().collect();
    ordered.sort_by_key(|c| c.index);
    let mut pending = ordered.into_iter().peekable();

    for (i, &unit) in body.characters.iter().enumerate() {
        while let Some(command) = pending.next_if(|c| c.index == i) {
            encode_command(writer, &command.kind)?;
        }
        writer.write_u16(unit);
    }
    for command in pending {
        encode_command(writer, &command.kind)?;
    }
    writer.write_u16(0);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::common::Endian;
    use crate::formats::msbt::{Command, CommandKind, Message};

    #[test]
    fn test_commands_interleave_by_index() {
        let body = RichText {
            characters: "ab".encode_utf16().collect(),
            commands: vec![
                Command::new(2, CommandKind::NewPage),
                Command::new(1, CommandKind::Character),
            ],
        };
        let mut writer = ByteWriter::new(Endian::Big);
        write_rich_text(&mut writer, &body, "test").unwrap();
        assert_eq!(
            writer.as_slice(),
            &[
                0x00, b'a', // a
                0x00, 0x0E, 0x00, 0x05, 0x00, 0x00, 0x00, 0x00, // character
                0x00, b'b', // b
                0x00, 0x0E, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, // newpage
                0x00, 0x00,
            ]
        );
        assert_eq!(writer.position(), body.encoded_len());
    }

    #[test]
    fn test_command_past_end_is_rejected() {
        let body = RichText {
            characters: vec![u16::from(b'a')],
            commands: vec![Command::new(2, CommandKind::NewPage)],
        };
        let err = write_rich_text(&mut ByteWriter::new(Endian::Big), &body, "m").unwrap_err();
        assert!(matches!(err, Error::InconsistentModel(_)));
    }

    #[test]
    fn test_reserved_units_are_rejected() {
        let body = RichText {
            characters: vec![u16::from(b'a'), COMMAND_MARKER],
            commands: vec![],
        };
        assert!(write_rich_text(&mut ByteWriter::new(Endian::Big), &body, "m").is_err());
    }

    #[test]
    fn test_duplicate_labels_fail_to_encode() {
        let mut file = MsbtFile::new();
        file.messages.push(Message::new("same"));
        file.messages.push(Message::new("same"));
        assert!(matches!(serialize_msbt(&file), Err(Error::DuplicateLabel(_))));
    }

    #[test]
    fn test_empty_container_layout() {
        let bytes = serialize_msbt(&MsbtFile::new()).unwrap();
        // header + LBL1 (16 + 4 + 101*8 = 828 -> 832) + ATR1 (16 + 8 -> 32) + TXT2 (16 + 4 -> 32)
        assert_eq!(bytes.len(), 0x20 + 832 + 32 + 32);
        assert_eq!(&bytes[..8], MSBT_MAGIC);
        assert_eq!(&bytes[0x12..0x16], &(bytes.len() as u32).to_be_bytes());
        assert_eq!(bytes.len() % 16, 0);
    }
}
