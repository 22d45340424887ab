//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! MSBT editing operations
//!
//! Provides functions for modifying MSBT containers:
//! - Add, rename, remove messages by label
//! - Edit message bodies while keeping command anchors in place

use std::ops::Range;

use super::commands::{COMMAND_MARKER, check_command, encoded_len};
use super::{Command, CommandKind, Message, MsbtFile, RichText};
use crate::error::{Error, Result};
use crate::formats::common::check_label_len;

// ============================================================================
// MsbtFile editing methods
// ============================================================================

impl MsbtFile {
    /// Append a message with empty text and default attributes
    ///
    /// # Errors
    /// Returns [`Error::DuplicateLabel`] if the label is already used, or
    /// [`Error::LabelTooLong`] if it does not fit the label record.
    pub fn add_empty_message(&mut self, label: impl Into<String>) -> Result<&mut Message> {
        let label = label.into();
        check_label_len(&label)?;
        if self.contains_label(&label) {
            return Err(Error::DuplicateLabel(label));
        }
        self.messages.push(Message::new(label));
        let last = self.messages.len() - 1;
        Ok(&mut self.messages[last])
    }

    /// Remove a message by label
    ///
    /// Later messages move down one index; their labels follow them.
    ///
    /// # Returns
    /// The removed message if found, `None` otherwise
    pub fn remove_message(&mut self, label: &str) -> Option<Message> {
        let pos = self.position(label)?;
        Some(self.messages.remove(pos))
    }

    /// Change a message's label
    ///
    /// # Errors
    /// Returns [`Error::LabelNotFound`] if `old` is absent, or
    /// [`Error::DuplicateLabel`] if `new` is already taken.
    pub fn rename_label(&mut self, old: &str, new: impl Into<String>) -> Result<()> {
        let new = new.into();
        check_label_len(&new)?;
        if old != new && self.contains_label(&new) {
            return Err(Error::DuplicateLabel(new));
        }
        let message = self
            .get_mut(old)
            .ok_or_else(|| Error::LabelNotFound(old.to_string()))?;
        message.label = new;
        Ok(())
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.label == label)
    }

    pub fn get_mut(&mut self, label: &str) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.label == label)
    }

    /// Index of the message carrying `label`
    #[must_use]
    pub fn position(&self, label: &str) -> Option<usize> {
        self.messages.iter().position(|m| m.label == label)
    }

    #[must_use]
    pub fn contains_label(&self, label: &str) -> bool {
        self.messages.iter().any(|m| m.label == label)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Find messages whose plain text contains `query`
    #[must_use]
    pub fn find_by_text(&self, query: &str, case_sensitive: bool) -> Vec<&Message> {
        if case_sensitive {
            self.messages
                .iter()
                .filter(|m| m.body.text().contains(query))
                .collect()
        } else {
            let query_lower = query.to_lowercase();
            self.messages
                .iter()
                .filter(|m| m.body.text().to_lowercase().contains(&query_lower))
                .collect()
        }
    }
}

/// UTF-16 units for message text; NUL ends a body and U+000E opens a command
fn encode_text(text: &str) -> Result<Vec<u16>> {
    let units: Vec<u16> = text.encode_utf16().collect();
    if let Some(unit) = units.iter().find(|&&u| u == 0 || u == COMMAND_MARKER) {
        return Err(Error::InconsistentModel(format!(
            "text contains reserved code unit {unit:#06x}"
        )));
    }
    Ok(units)
}

// ============================================================================
// RichText editing methods
// ============================================================================

impl RichText {
    /// Plain text with no commands
    ///
    /// # Errors
    /// Returns [`Error::InconsistentModel`] if `text` contains U+0000 or the
    /// command marker U+000E.
    pub fn plain(text: &str) -> Result<Self> {
        Ok(Self {
            characters: encode_text(text)?,
            commands: Vec::new(),
        })
    }

    /// The characters as a string; unpaired surrogates become U+FFFD
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf16_lossy(&self.characters)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty() && self.commands.is_empty()
    }

    /// Replace the whole text, dropping every command
    ///
    /// The body is left untouched when `text` is rejected.
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        self.characters = encode_text(text)?;
        self.commands.clear();
        Ok(())
    }

    pub fn push_str(&mut self, text: &str) -> Result<()> {
        self.characters.extend(encode_text(text)?);
        Ok(())
    }

    /// Anchor a command after the current last character
    ///
    /// # Errors
    /// Returns [`Error::UnknownName`] for a color or icon missing from its
    /// table, or [`Error::InconsistentModel`] for a payload too large to encode.
    pub fn push_command(&mut self, kind: CommandKind) -> Result<()> {
        check_command(&kind)?;
        self.commands.push(Command::new(self.characters.len(), kind));
        Ok(())
    }

    /// Insert text at a character index.
    ///
    /// Commands anchored at `index` stay before the new text; later commands
    /// shift right by the inserted length.
    pub fn insert_str(&mut self, index: usize, text: &str) -> Result<()> {
        if index > self.characters.len() {
            return Err(Error::InconsistentModel(format!(
                "insert at {index} past end of {} characters",
                self.characters.len()
            )));
        }
        let units = encode_text(text)?;
        let added = units.len();
        self.characters.splice(index..index, units);
        for command in &mut self.commands {
            if command.index > index {
                command.index += added;
            }
        }
        Ok(())
    }

    /// Remove a range of characters.
    ///
    /// Commands inside the range collapse to its start; later commands shift
    /// left by the removed length.
    pub fn remove_range(&mut self, range: Range<usize>) -> Result<()> {
        if range.start > range.end || range.end > self.characters.len() {
            return Err(Error::InconsistentModel(format!(
                "remove {range:?} outside {} characters",
                self.characters.len()
            )));
        }
        let removed = range.len();
        self.characters.drain(range.clone());
        for command in &mut self.commands {
            if command.index >= range.end {
                command.index -= removed;
            } else if command.index > range.start {
                command.index = range.start;
            }
        }
        Ok(())
    }

    /// Text with commands rendered inline, e.g. `Hello[wait:30]!`
    #[must_use]
    pub fn to_markup(&self) -> String {
        let mut ordered: Vec<_> = self.commands.iter().collect();
        ordered.sort_by_key(|c| c.index);
        let mut pending = ordered.into_iter().peekable();

        let mut out = String::new();
        let mut start = 0;
        while start <= self.characters.len() {
            let next = pending.peek().map_or(self.characters.len(), |c| c.index.min(self.characters.len()));
            out.push_str(&String::from_utf16_lossy(&self.characters[start..next]));
            start = next;
            match pending.next() {
                Some(command) => out.push_str(&command.kind.to_string()),
                None => break,
            }
        }
        out
    }

    /// Size of this body in TXT2, terminator included
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        self.characters.len() * 2
            + self.commands.iter().map(|c| encoded_len(&c.kind)).sum::<usize>()
            + 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::msbt::FontSize;

    fn hello_wait() -> RichText {
        let mut body = RichText::plain("Hello").unwrap();
        body.push_command(CommandKind::Wait(30)).unwrap();
        body.push_str("!").unwrap();
        body
    }

    #[test]
    fn test_add_empty_message() {
        let mut file = MsbtFile::new();
        file.add_empty_message("Intro").unwrap();
        assert_eq!(file.len(), 1);
        assert!(file.get("Intro").unwrap().body.is_empty());

        assert!(matches!(
            file.add_empty_message("Intro"),
            Err(Error::DuplicateLabel(_))
        ));
        assert!(matches!(
            file.add_empty_message("x".repeat(300)),
            Err(Error::LabelTooLong { .. })
        ));
        assert_eq!(file.len(), 1);
    }

    #[test]
    fn test_remove_and_rename() {
        let mut file = MsbtFile::new();
        file.add_empty_message("A").unwrap();
        file.add_empty_message("B").unwrap();
        file.add_empty_message("C").unwrap();

        let removed = file.remove_message("B").unwrap();
        assert_eq!(removed.label, "B");
        assert_eq!(file.position("C"), Some(1));
        assert!(file.remove_message("B").is_none());

        file.rename_label("C", "D").unwrap();
        assert!(file.contains_label("D"));
        assert!(matches!(file.rename_label("D", "A"), Err(Error::DuplicateLabel(_))));
        assert!(matches!(file.rename_label("Z", "Y"), Err(Error::LabelNotFound(_))));
        // Renaming to itself is allowed
        file.rename_label("A", "A").unwrap();
    }

    #[test]
    fn test_find_by_text() {
        let mut file = MsbtFile::new();
        file.add_empty_message("one").unwrap().body = RichText::plain("Hello there").unwrap();
        file.add_empty_message("two").unwrap().body = RichText::plain("Goodbye").unwrap();

        assert_eq!(file.find_by_text("hello", false).len(), 1);
        assert!(file.find_by_text("hello", true).is_empty());
    }

    #[test]
    fn test_push_command_anchors_at_end() {
        let body = hello_wait();
        assert_eq!(body.text(), "Hello!");
        assert_eq!(body.commands, vec![Command::new(5, CommandKind::Wait(30))]);
        assert_eq!(body.to_markup(), "Hello[wait:30]!");
    }

    #[test]
    fn test_insert_shifts_later_commands() {
        let mut body = hello_wait();
        body.insert_str(0, ">> ").unwrap();
        assert_eq!(body.commands[0].index, 8);
        assert_eq!(body.to_markup(), ">> Hello[wait:30]!");

        // Inserting exactly at the anchor keeps the command in front
        body.insert_str(8, "?").unwrap();
        assert_eq!(body.to_markup(), ">> Hello[wait:30]?!");

        assert!(body.insert_str(100, "x").is_err());
    }

    #[test]
    fn test_remove_range_collapses_commands() {
        let mut body = hello_wait();
        body.remove_range(0..2).unwrap();
        assert_eq!(body.to_markup(), "llo[wait:30]!");

        body.remove_range(1..4).unwrap();
        assert_eq!(body.text(), "l");
        assert_eq!(body.commands[0].index, 1);

        assert!(body.remove_range(0..5).is_err());
    }

    #[test]
    fn test_markup_with_trailing_and_stacked_commands() {
        let mut body = RichText::plain("Hi").unwrap();
        body.push_command(CommandKind::FontSize(FontSize::Small)).unwrap();
        body.push_command(CommandKind::NewPage).unwrap();
        body.commands.push(Command::new(0, CommandKind::Color("red".to_string())));
        assert_eq!(body.to_markup(), "[color:red]Hi[size:small][newpage]");
    }

    #[test]
    fn test_encoded_len() {
        // 6 chars + wait record (8 + 2) + terminator
        assert_eq!(hello_wait().encoded_len(), 12 + 10 + 2);
        assert_eq!(RichText::default().encoded_len(), 2);
    }

    #[test]
    fn test_reserved_units_are_rejected() {
        assert!(RichText::plain("a\0b").is_err());
        assert!(RichText::plain("a\u{E}b").is_err());

        let mut body = hello_wait();
        assert!(matches!(body.push_str("\0"), Err(Error::InconsistentModel(_))));
        assert!(body.insert_str(0, "\u{E}").is_err());
        assert!(body.set_text("bad\0").is_err());
        // Rejected edits leave the body as it was
        assert_eq!(body.to_markup(), "Hello[wait:30]!");
    }

    #[test]
    fn test_unencodable_commands_are_rejected() {
        let mut body = RichText::default();
        assert!(matches!(
            body.push_command(CommandKind::Color("mauve".to_string())),
            Err(Error::UnknownName { .. })
        ));
        assert!(body.push_command(CommandKind::Sound("x".repeat(40_000))).is_err());
        assert!(body.commands.is_empty());
    }

    #[test]
    fn test_edited_model_always_encodes() {
        let mut file = MsbtFile::new();
        let message = file.add_empty_message("Edited").unwrap();
        let _ = message.body.push_str("Line\0");
        let _ = message.body.push_command(CommandKind::Icon("banana".to_string()));
        let _ = message.body.push_command(CommandKind::Sound("x".repeat(40_000)));
        message.body.push_str("Hi").unwrap();
        message.body.push_command(CommandKind::Sound("se_ok".to_string())).unwrap();
        message.body.insert_str(0, ">").unwrap();
        message.body.remove_range(0..1).unwrap();

        let bytes = crate::formats::msbt::serialize_msbt(&file).unwrap();
        let parsed = crate::formats::msbt::parse_msbt_bytes(&bytes).unwrap();
        assert_eq!(parsed.get("Edited").unwrap().body.to_markup(), "Hi[sound:se_ok]");
    }
}
