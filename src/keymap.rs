//! # Key Layout
//!
//! Maps target-surface positions to keyboard keys.
//!
//! A layout is six rows, one per string, of up to thirteen entries (frets 0-12). Each
//! entry is a [`KeyBinding`]: the key plus whether shift must be held. Strings can be
//! marked as shift strings, which applies shift to every character key on that row.
//!
//! ## Default Layout
//! ```text
//! string 1 (shift)  ~ 1 2 3 4 5 6 7 8 9 0 - =
//! string 2 (shift)  q w e r t y u i o p [ ] \
//! string 3          ` 1 2 3 4 5 6 7 8 9 0 - =
//! string 4          q w e r t y u i o p [ ] \
//! string 5          a s d f g h j k l ; ' ' shift+'
//! string 6          z x c v b n m , . / left right question
//! ```
//!
//! String 5 fret 12 is shift plus `'`, the only entry that needs shift on a row that
//! otherwise has none. It lives in the table as the `shift+'` token, so a profile that
//! supplies its own `rows` replaces it along with everything else and must write
//! `shift+'` itself to keep it. The last three entries of string 6 are named keys and
//! are sent through the sink's named-key path without a modifier.
//!
//! ## Entry Tokens
//! Profiles write entries as strings:
//! - one character (`"a"`, `"'"`) - a character key
//! - `left`, `right`, `question` - a named key
//! - `shift+X` - `X` with shift forced on
//! - `""` - no key for this fret

use serde::Serialize;

use crate::error::FretError;
use crate::remap::MAX_FRET;
use crate::tuning::TARGET_STRINGS;

const FRETS: usize = MAX_FRET as usize + 1;

/// Rows of the default layout, string 1 first.
pub const DEFAULT_ROWS: [[&str; FRETS]; TARGET_STRINGS] = [
    ["~", "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "-", "="],
    ["q", "w", "e", "r", "t", "y", "u", "i", "o", "p", "[", "]", "\\"],
    ["`", "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "-", "="],
    ["q", "w", "e", "r", "t", "y", "u", "i", "o", "p", "[", "]", "\\"],
    ["a", "s", "d", "f", "g", "h", "j", "k", "l", ";", "'", "'", "shift+'"],
    ["z", "x", "c", "v", "b", "n", "m", ",", ".", "/", "left", "right", "question"],
];

/// Strings whose character keys are played with shift held.
pub const DEFAULT_SHIFT_STRINGS: [u8; 2] = [1, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamedKey {
    Left,
    Right,
    Question,
}

impl NamedKey {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(NamedKey::Left),
            "right" => Some(NamedKey::Right),
            "question" => Some(NamedKey::Question),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NamedKey::Left => "left",
            NamedKey::Right => "right",
            NamedKey::Question => "question",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Key {
    Char(char),
    Named(NamedKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Modifier {
    Shift,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyBinding {
    pub key: Key,
    pub shift: bool,
}

impl KeyBinding {
    pub fn plain(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyLayout {
    rows: Vec<Vec<Option<KeyBinding>>>,
}

impl KeyLayout {
    /// Build a layout from entry tokens, applying shift to character keys on
    /// `shift_strings`.
    ///
    /// # Example
    /// ```
    /// use fretkeys::keymap::{Key, KeyBinding, KeyLayout, DEFAULT_ROWS};
    ///
    /// let rows: Vec<Vec<String>> = DEFAULT_ROWS
    ///     .iter()
    ///     .map(|row| row.iter().map(|s| s.to_string()).collect())
    ///     .collect();
    /// let layout = KeyLayout::from_tokens(&rows, &[1, 2])?;
    ///
    /// assert_eq!(layout.key_for(2, 0), Some(KeyBinding::shifted(Key::Char('q'))));
    /// assert_eq!(layout.key_for(4, 0), Some(KeyBinding::plain(Key::Char('q'))));
    /// # Ok::<(), fretkeys::FretError>(())
    /// ```
    pub fn from_tokens<S: AsRef<str>>(
        rows: &[Vec<S>],
        shift_strings: &[u8],
    ) -> Result<Self, FretError> {
        if rows.len() != TARGET_STRINGS {
            return Err(FretError::ProfileError(format!(
                "layout needs {} rows, got {}",
                TARGET_STRINGS,
                rows.len()
            )));
        }

        let rows = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let string = i as u8 + 1;
                if row.len() > FRETS {
                    return Err(FretError::ProfileError(format!(
                        "string {} has {} entries, at most {} fit",
                        string,
                        row.len(),
                        FRETS
                    )));
                }
                let shift_row = shift_strings.contains(&string);
                row.iter()
                    .map(|token| parse_token(token.as_ref(), shift_row))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rows })
    }

    /// Key for a target position, or `None` when nothing is assigned.
    pub fn key_for(&self, string: u8, fret: u8) -> Option<KeyBinding> {
        let row = self.rows.get(usize::from(string).checked_sub(1)?)?;
        row.get(usize::from(fret)).copied().flatten()
    }
}

impl Default for KeyLayout {
    fn default() -> Self {
        let rows: Vec<Vec<&str>> = DEFAULT_ROWS.iter().map(|row| row.to_vec()).collect();
        Self::from_tokens(&rows, &DEFAULT_SHIFT_STRINGS)
            .expect("default key rows use only known tokens")
    }
}

fn parse_token(token: &str, shift_row: bool) -> Result<Option<KeyBinding>, FretError> {
    if token.is_empty() {
        return Ok(None);
    }
    if let Some(rest) = token.strip_prefix("shift+") {
        let key = parse_key(rest)?;
        return Ok(Some(KeyBinding::shifted(key)));
    }
    let key = parse_key(token)?;
    let shift = shift_row && matches!(key, Key::Char(_));
    Ok(Some(KeyBinding { key, shift }))
}

fn parse_key(token: &str) -> Result<Key, FretError> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Key::Char(c)),
        _ => NamedKey::from_name(token)
            .map(Key::Named)
            .ok_or_else(|| FretError::ProfileError(format!("unknown key: {}", token))),
    }
}
