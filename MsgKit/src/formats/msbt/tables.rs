//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! Fixed id <-> name tables consulted by the inline command codec

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{Error, Result};

/// Color name used for the "reset to default" id and any unmapped id
pub const COLOR_NONE: &str = "none";

/// Id the engine uses to reset the font color
pub const COLOR_NONE_ID: u16 = 0xFFFF;

/// Font colors, indexed by id
pub const COLOR_NAMES: [&str; 8] = [
    "black", "red", "green", "blue", "yellow", "purple", "orange", "gray",
];

/// Inline icons, indexed by id
pub const ICON_NAMES: [&str; 32] = [
    "a_button",
    "b_button",
    "c_button",
    "z_button",
    "star",
    "coin",
    "star_bit",
    "1up",
    "mushroom",
    "pointer",
    "mario",
    "luigi",
    "yoshi",
    "purple_coin",
    "comet_medal",
    "silver_star",
    "grand_star",
    "bell",
    "crown",
    "wii_remote",
    "nunchuk",
    "dpad",
    "stick",
    "plus_button",
    "minus_button",
    "home_button",
    "one_button",
    "two_button",
    "hand_open",
    "hand_grab",
    "arrow_down",
    "letter",
];

fn color_ids() -> &'static HashMap<&'static str, u16> {
    static IDS: OnceLock<HashMap<&'static str, u16>> = OnceLock::new();
    IDS.get_or_init(|| reverse(&COLOR_NAMES))
}

fn icon_ids() -> &'static HashMap<&'static str, u16> {
    static IDS: OnceLock<HashMap<&'static str, u16>> = OnceLock::new();
    IDS.get_or_init(|| reverse(&ICON_NAMES))
}

fn reverse(names: &[&'static str]) -> HashMap<&'static str, u16> {
    names
        .iter()
        .enumerate()
        .map(|(id, &name)| (name, id as u16))
        .collect()
}

/// Color name for an id, falling back to [`COLOR_NONE`]
#[must_use]
pub fn color_name(id: u16) -> &'static str {
    COLOR_NAMES.get(id as usize).copied().unwrap_or(COLOR_NONE)
}

/// Color id for a name; `"none"` maps to [`COLOR_NONE_ID`]
pub fn color_id(name: &str) -> Result<u16> {
    if name == COLOR_NONE {
        return Ok(COLOR_NONE_ID);
    }
    color_ids().get(name).copied().ok_or_else(|| Error::UnknownName {
        table: "color",
        name: name.to_string(),
    })
}

#[must_use]
pub fn icon_name(id: u16) -> Option<&'static str> {
    ICON_NAMES.get(id as usize).copied()
}

pub fn icon_id(name: &str) -> Result<u16> {
    icon_ids().get(name).copied().ok_or_else(|| Error::UnknownName {
        table: "icon",
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_lookup_both_ways() {
        for (id, name) in COLOR_NAMES.iter().enumerate() {
            assert_eq!(color_name(id as u16), *name);
            assert_eq!(color_id(name).unwrap(), id as u16);
        }
    }

    #[test]
    fn test_unmapped_color_falls_back_to_none() {
        assert_eq!(color_name(200), COLOR_NONE);
        assert_eq!(color_name(COLOR_NONE_ID), COLOR_NONE);
        assert_eq!(color_id("none").unwrap(), COLOR_NONE_ID);
        assert!(matches!(
            color_id("magenta"),
            Err(Error::UnknownName { table: "color", .. })
        ));
    }

    #[test]
    fn test_icon_lookup() {
        assert_eq!(icon_id("star").unwrap(), 4);
        assert_eq!(icon_name(4), Some("star"));
        assert_eq!(icon_name(ICON_NAMES.len() as u16), None);
        assert!(icon_id("banana").is_err());
    }

    #[test]
    fn test_names_are_unique() {
        assert_eq!(color_ids().len(), COLOR_NAMES.len());
        assert_eq!(icon_ids().len(), ICON_NAMES.len());
    }
}
