//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! `.msbt` decoding

use std::path::Path;

use super::commands::{COMMAND_MARKER, CommandOutcome, decode_command};
use super::{
    ATTRIBUTE_SIZE, AttributeRecord, Command, CommandKind, MSBT_MAGIC, Message, MsbtFile, RichText,
};
use crate::config::CodecOptions;
use crate::error::{Error, Result};
use crate::formats::common::{
    ByteView, FileHeader, Label, find_section, read_label_table, read_sections, unknown_sections,
};
use crate::source::{ByteSource, FileSource};

const KNOWN_SECTIONS: [&[u8; 4]; 3] = [b"LBL1", b"ATR1", b"TXT2"];

/// Read a .msbt file from disk
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read, or any
/// decode error from [`parse_msbt_bytes`].
///
/// [`Error::Io`]: crate::Error::Io
pub fn read_msbt<P: AsRef<Path>>(path: P) -> Result<MsbtFile> {
    let source = FileSource::open(path)?;
    parse_msbt_bytes(&source.contents()?)
}

/// Parse .msbt data from bytes
///
/// # Errors
///
/// Returns [`Error::BadMagic`] for a foreign signature, [`Error::TruncatedInput`]
/// when a section runs past the buffer, and [`Error::InconsistentModel`] when
/// label, attribute and text counts disagree.
///
/// [`Error::BadMagic`]: crate::Error::BadMagic
/// [`Error::TruncatedInput`]: crate::Error::TruncatedInput
/// [`Error::InconsistentModel`]: crate::Error::InconsistentModel
pub fn parse_msbt_bytes(data: &[u8]) -> Result<MsbtFile> {
    parse_msbt_bytes_with_options(data, &CodecOptions::default())
}

/// Parse .msbt data from bytes with explicit options
///
/// With `strict_commands` set an unrecognized inline command fails the whole
/// decode with [`Error::UnknownCommand`]; otherwise it is kept as
/// [`CommandKind::Unparsed`].
///
/// [`Error::UnknownCommand`]: crate::Error::UnknownCommand
pub fn parse_msbt_bytes_with_options(data: &[u8], options: &CodecOptions) -> Result<MsbtFile> {
    let (header, mut view) = FileHeader::read(data, MSBT_MAGIC)?;
    let sections = read_sections(&mut view, header.section_count)?;
    let endian = header.endian;

    let lbl = find_section(&sections, b"LBL1").ok_or(Error::MissingSection("LBL1"))?;
    let atr = find_section(&sections, b"ATR1").ok_or(Error::MissingSection("ATR1"))?;
    let txt = find_section(&sections, b"TXT2").ok_or(Error::MissingSection("TXT2"))?;

    let (bucket_count, labels) = read_label_table(&mut ByteView::new(lbl.data, endian))?;
    let (attributes, attribute_pool) = read_attributes(&mut ByteView::new(atr.data, endian))?;
    let bodies = read_texts(&mut ByteView::new(txt.data, endian), options.strict_commands)?;

    if attributes.len() != bodies.len() {
        return Err(Error::InconsistentModel(format!(
            "{} attribute records for {} messages",
            attributes.len(),
            bodies.len()
        )));
    }
    let label_texts = order_labels(labels, bodies.len())?;

    let messages = label_texts
        .into_iter()
        .zip(attributes)
        .zip(bodies)
        .map(|((label, attributes), body)| Message {
            label,
            attributes,
            body,
        })
        .collect::<Vec<_>>();

    tracing::debug!("Decoded MSBT with {} messages", messages.len());

    Ok(MsbtFile {
        header,
        bucket_count,
        messages,
        attribute_pool,
        extra_sections: unknown_sections(&sections, &KNOWN_SECTIONS),
    })
}

/// Arrange labels by target index, requiring exactly one label per message.
fn order_labels(labels: Vec<Label>, count: usize) -> Result<Vec<String>> {
    if labels.len() != count {
        return Err(Error::InconsistentModel(format!(
            "{} labels for {} messages",
            labels.len(),
            count
        )));
    }

    let mut slots: Vec<Option<String>> = vec![None; count];
    for label in labels {
        let slot = slots.get_mut(label.index as usize).ok_or_else(|| {
            Error::InconsistentModel(format!(
                "label {} points at message {} of {}",
                label.text, label.index, count
            ))
        })?;
        if slot.is_some() {
            return Err(Error::InconsistentModel(format!(
                "message {} has more than one label",
                label.index
            )));
        }
        *slot = Some(label.text);
    }

    // Counts match and no slot was filled twice, so every slot is filled
    Ok(slots.into_iter().flatten().collect())
}

fn read_attributes(view: &mut ByteView<'_>) -> Result<(Vec<AttributeRecord>, Vec<u8>)> {
    let count = view.read_u32()? as usize;
    let size = view.read_u32()?;
    if size != ATTRIBUTE_SIZE {
        return Err(Error::UnexpectedAttributeSize {
            expected: ATTRIBUTE_SIZE,
            found: size,
        });
    }

    let mut records = Vec::with_capacity(count.min(view.remaining() / ATTRIBUTE_SIZE as usize));
    for _ in 0..count {
        records.push(AttributeRecord {
            trigger: view.read_u8()?,
            field1: view.read_u8()?,
            field2: view.read_u8()?,
            field3: view.read_u8()?,
            field4: view.read_u16()?,
            field5: view.read_u16()?,
            field6: view.read_u32()?,
        });
    }

    let pool = view.read_bytes(view.remaining())?.to_vec();
    Ok((records, pool))
}

fn read_texts(view: &mut ByteView<'_>, strict: bool) -> Result<Vec<RichText>> {
    let count = view.read_u32()? as usize;
    let mut offsets = Vec::with_capacity(count.min(view.remaining() / 4));
    for _ in 0..count {
        offsets.push(view.read_u32()? as usize);
    }

    let mut bodies = Vec::with_capacity(offsets.len());
    for (index, offset) in offsets.into_iter().enumerate() {
        view.seek(offset)?;
        bodies.push(read_rich_text(view, index, strict)?);
    }
    Ok(bodies)
}

/// Decode one zero-terminated message body.
fn read_rich_text(view: &mut ByteView<'_>, message: usize, strict: bool) -> Result<RichText> {
    let mut body = RichText::default();

    loop {
        match view.peek_u16()? {
            0 => {
                view.skip(2)?;
                break;
            }
            COMMAND_MARKER => {
                let kind = match decode_command(view)? {
                    CommandOutcome::Known(kind) => kind,
                    CommandOutcome::Unknown(raw) if strict => {
                        return Err(Error::UnknownCommand {
                            kind: raw.kind,
                            param: raw.param,
                        });
                    }
                    CommandOutcome::Unknown(raw) => {
                        tracing::warn!(
                            "Message {}: keeping unknown command type {} param {} as unparsed",
                            message,
                            raw.kind,
                            raw.param
                        );
                        CommandKind::Unparsed(raw)
                    }
                };
                body.commands.push(Command::new(body.characters.len(), kind));
            }
            unit => {
                view.skip(2)?;
                body.characters.push(unit);
            }
        }
    }

    Ok(body)
}
