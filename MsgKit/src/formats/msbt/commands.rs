//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! Inline command records embedded in TXT2 text
//!
//! Each record sits in the UTF-16 stream where the command applies:
//!
//! ```text
//! marker: u16 = 0x000E
//! type: u16
//! param: u16
//! payload_size: u16
//! payload: [u8; payload_size]
//! ```

use super::tables::{color_id, color_name, icon_id, icon_name};
use super::{CommandKind, FontSize, RawCommand};
use crate::error::{Error, Result};
use crate::formats::common::{ByteView, ByteWriter, Endian};

/// Code unit that introduces a command record
pub const COMMAND_MARKER: u16 = 0x000E;

/// Size of the fixed part of a record, marker included
pub const RECORD_HEADER_SIZE: usize = 8;

const TYPE_COLOR: u16 = 0;
const TYPE_PAUSE: u16 = 1;
const TYPE_SOUND: u16 = 2;
const TYPE_ICON: u16 = 3;
const TYPE_SIZE: u16 = 4;
const TYPE_CHARACTER: u16 = 5;

const PARAM_COLOR: u16 = 3;
const PARAM_WAIT: u16 = 0;
const PARAM_NEWPAGE: u16 = 1;

/// Result of decoding one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Known(CommandKind),
    /// The `(type, param, payload)` combination is not recognized
    Unknown(RawCommand),
}

/// Decode one command with the view positioned on its marker.
///
/// Fails only when the record itself runs past the buffer. Records that
/// are well-framed but not understood come back as
/// [`CommandOutcome::Unknown`].
pub fn decode_command(view: &mut ByteView<'_>) -> Result<CommandOutcome> {
    let start = view.position();
    let marker = view.read_u16()?;
    if marker != COMMAND_MARKER {
        return Err(Error::InconsistentModel(format!(
            "expected command marker at {start:#x}, found {marker:#06x}"
        )));
    }

    let kind = view.read_u16()?;
    let param = view.read_u16()?;
    let payload_size = view.read_u16()? as usize;
    let mut payload = view.sub_view(payload_size)?;

    let known = match (kind, param, payload_size) {
        (TYPE_COLOR, PARAM_COLOR, 2) => Some(CommandKind::Color(color_name(payload.read_u16()?).to_string())),
        (TYPE_PAUSE, PARAM_WAIT, 2) => Some(CommandKind::Wait(payload.read_u16()?)),
        (TYPE_PAUSE, PARAM_NEWPAGE, 0) => Some(CommandKind::NewPage),
        (TYPE_SOUND, 0, _) => read_sound_name(&mut payload)?.map(CommandKind::Sound),
        (TYPE_ICON, id, 0) => icon_name(id).map(|name| CommandKind::Icon(name.to_string())),
        (TYPE_SIZE, size, 0) => FontSize::from_u16(size).map(CommandKind::FontSize),
        (TYPE_CHARACTER, 0, 0) => Some(CommandKind::Character),
        _ => None,
    };

    Ok(match known {
        Some(command) => CommandOutcome::Known(command),
        None => {
            payload.seek(0)?;
            CommandOutcome::Unknown(RawCommand {
                kind,
                param,
                payload: payload.read_bytes(payload_size)?.to_vec(),
            })
        }
    })
}

/// Sound payload: byte length, then that many bytes of UTF-16 name.
///
/// `None` when the length does not fill the payload exactly.
fn read_sound_name(payload: &mut ByteView<'_>) -> Result<Option<String>> {
    if payload.len() < 2 {
        return Ok(None);
    }
    let name_len = payload.read_u16()? as usize;
    if name_len % 2 != 0 || name_len + 2 != payload.len() {
        return Ok(None);
    }
    let units = payload.read_null_or_count_terminated_run(Some(name_len / 2))?;
    if units.len() * 2 != name_len {
        // Embedded NUL; keep the raw bytes instead
        return Ok(None);
    }
    Ok(String::from_utf16(&units).ok())
}

/// Write the full record for `command`, marker included.
///
/// Fails with [`Error::UnknownName`] for a color or icon missing from its
/// table, or [`Error::InconsistentModel`] for a payload longer than the
/// 16-bit size field; nothing is written in either case.
pub fn encode_command(writer: &mut ByteWriter, command: &CommandKind) -> Result<()> {
    let (kind, param, payload) = record_parts(command, writer.endian())?;
    writer.write_u16(COMMAND_MARKER);
    writer.write_u16(kind);
    writer.write_u16(param);
    writer.write_u16(payload_size(payload.len())?);
    writer.write_bytes(&payload);
    Ok(())
}

/// Check that `command` can be encoded without writing it anywhere
pub fn check_command(command: &CommandKind) -> Result<()> {
    let (_, _, payload) = record_parts(command, Endian::Big)?;
    payload_size(payload.len()).map(|_| ())
}

fn payload_size(len: usize) -> Result<u16> {
    u16::try_from(len)
        .map_err(|_| Error::InconsistentModel(format!("command payload of {len} bytes")))
}

/// Encoded size of a command record, marker included
pub fn encoded_len(command: &CommandKind) -> usize {
    RECORD_HEADER_SIZE
        + match command {
            CommandKind::Color(_) | CommandKind::Wait(_) => 2,
            CommandKind::Sound(name) => 2 + name.encode_utf16().count() * 2,
            CommandKind::Unparsed(raw) => raw.payload.len(),
            CommandKind::NewPage
            | CommandKind::Icon(_)
            | CommandKind::FontSize(_)
            | CommandKind::Character => 0,
        }
}

fn record_parts(command: &CommandKind, endian: Endian) -> Result<(u16, u16, Vec<u8>)> {
    let mut payload = ByteWriter::new(endian);
    let (kind, param) = match command {
        CommandKind::Color(name) => {
            payload.write_u16(color_id(name)?);
            (TYPE_COLOR, PARAM_COLOR)
        }
        CommandKind::Wait(ticks) => {
            payload.write_u16(*ticks);
            (TYPE_PAUSE, PARAM_WAIT)
        }
        CommandKind::NewPage => (TYPE_PAUSE, PARAM_NEWPAGE),
        CommandKind::Sound(name) => {
            let units: Vec<u16> = name.encode_utf16().collect();
            let name_len = u16::try_from(units.len() * 2).map_err(|_| {
                Error::InconsistentModel(format!("sound name of {} code units", units.len()))
            })?;
            payload.write_u16(name_len);
            for unit in units {
                payload.write_u16(unit);
            }
            (TYPE_SOUND, 0)
        }
        CommandKind::Icon(name) => (TYPE_ICON, icon_id(name)?),
        CommandKind::FontSize(size) => (TYPE_SIZE, size.as_u16()),
        CommandKind::Character => (TYPE_CHARACTER, 0),
        CommandKind::Unparsed(raw) => {
            payload.write_bytes(&raw.payload);
            (raw.kind, raw.param)
        }
    };
    Ok((kind, param, payload.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(command: &CommandKind, endian: Endian) -> CommandOutcome {
        let mut writer = ByteWriter::new(endian);
        encode_command(&mut writer, command).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), encoded_len(command));

        let mut view = ByteView::new(&bytes, endian);
        let outcome = decode_command(&mut view).unwrap();
        assert_eq!(view.position(), bytes.len());
        outcome
    }

    #[test]
    fn test_every_kind_round_trips() {
        let commands = [
            CommandKind::Color("red".to_string()),
            CommandKind::Wait(30),
            CommandKind::NewPage,
            CommandKind::Sound("se_test".to_string()),
            CommandKind::Icon("star".to_string()),
            CommandKind::FontSize(FontSize::Large),
            CommandKind::Character,
        ];
        for endian in [Endian::Big, Endian::Little] {
            for command in &commands {
                assert_eq!(
                    round_trip(command, endian),
                    CommandOutcome::Known(command.clone()),
                    "{command} ({endian:?})"
                );
            }
        }
    }

    #[test]
    fn test_wait_wire_format() {
        let mut writer = ByteWriter::new(Endian::Big);
        encode_command(&mut writer, &CommandKind::Wait(30)).unwrap();
        assert_eq!(
            writer.as_slice(),
            &[0x00, 0x0E, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x1E]
        );
    }

    #[test]
    fn test_sound_wire_format() {
        let mut writer = ByteWriter::new(Endian::Little);
        encode_command(&mut writer, &CommandKind::Sound("ab".to_string())).unwrap();
        assert_eq!(
            writer.as_slice(),
            &[0x0E, 0x00, 0x02, 0x00, 0x00, 0x00, 0x06, 0x00, 0x04, 0x00, b'a', 0x00, b'b', 0x00]
        );
    }

    #[test]
    fn test_unmapped_color_decodes_as_none() {
        let bytes = [0x00, 0x0E, 0x00, 0x00, 0x00, 0x03, 0x00, 0x02, 0x01, 0x00];
        let outcome = decode_command(&mut ByteView::new(&bytes, Endian::Big)).unwrap();
        assert_eq!(outcome, CommandOutcome::Known(CommandKind::Color("none".to_string())));
    }

    #[test]
    fn test_unknown_command_is_preserved() {
        // type 9, param 7, two payload bytes
        let bytes = [0x00, 0x0E, 0x00, 0x09, 0x00, 0x07, 0x00, 0x02, 0xCA, 0xFE];
        let mut view = ByteView::new(&bytes, Endian::Big);
        let outcome = decode_command(&mut view).unwrap();
        let raw = RawCommand {
            kind: 9,
            param: 7,
            payload: vec![0xCA, 0xFE],
        };
        assert_eq!(outcome, CommandOutcome::Unknown(raw.clone()));
        assert_eq!(view.position(), bytes.len());

        let mut writer = ByteWriter::new(Endian::Big);
        encode_command(&mut writer, &CommandKind::Unparsed(raw)).unwrap();
        assert_eq!(writer.as_slice(), &bytes);
    }

    #[test]
    fn test_out_of_range_icon_and_size_are_unknown() {
        let icon = [0x00, 0x0E, 0x00, 0x03, 0x03, 0xE7, 0x00, 0x00];
        let outcome = decode_command(&mut ByteView::new(&icon, Endian::Big)).unwrap();
        assert!(matches!(outcome, CommandOutcome::Unknown(RawCommand { kind: 3, param: 999, .. })));

        let size = [0x00, 0x0E, 0x00, 0x04, 0x00, 0x05, 0x00, 0x00];
        let outcome = decode_command(&mut ByteView::new(&size, Endian::Big)).unwrap();
        assert!(matches!(outcome, CommandOutcome::Unknown(_)));
    }

    #[test]
    fn test_truncated_payload() {
        let bytes = [0x00, 0x0E, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00];
        let err = decode_command(&mut ByteView::new(&bytes, Endian::Big)).unwrap_err();
        assert!(matches!(err, Error::TruncatedInput { .. }));
    }

    #[test]
    fn test_unknown_names_fail_to_encode() {
        let mut writer = ByteWriter::new(Endian::Big);
        let err = encode_command(&mut writer, &CommandKind::Icon("banana".to_string())).unwrap_err();
        assert!(matches!(err, Error::UnknownName { table: "icon", .. }));
        assert_eq!(writer.position(), 0);
    }

    #[test]
    fn test_oversized_payloads_fail_to_encode() {
        let long_sound = CommandKind::Sound("x".repeat(40_000));
        let mut writer = ByteWriter::new(Endian::Big);
        assert!(matches!(
            encode_command(&mut writer, &long_sound),
            Err(Error::InconsistentModel(_))
        ));
        assert!(check_command(&long_sound).is_err());
        assert_eq!(writer.position(), 0);

        let long_raw = CommandKind::Unparsed(RawCommand {
            kind: 9,
            param: 0,
            payload: vec![0; 0x1_0000],
        });
        assert!(encode_command(&mut writer, &long_raw).is_err());
        assert_eq!(writer.position(), 0);

        // The largest sound name that still fits the size field
        let max_sound = CommandKind::Sound("x".repeat(0x7FFE));
        check_command(&max_sound).unwrap();
        assert_eq!(round_trip(&max_sound, Endian::Little), CommandOutcome::Known(max_sound.clone()));
    }
}
