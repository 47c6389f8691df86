//! # Target Profiles
//!
//! A profile describes the target surface: its tuning, its key layout and how far the
//! remapper may drop a note to make it fit. Profiles are plain values handed to the
//! pipeline, so several can coexist.
//!
//! ## YAML Format
//! Every field is optional; missing fields take the default profile's value.
//! ```yaml
//! name: drop-d
//! tuning: [E4, B3, G3, D3, A2, D2]
//! shift-strings: [1, 2]
//! octave-fallbacks: 1
//! rows:
//!   - ["~", "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "-", "="]
//!   # ... six rows in total, see `keymap` for the token syntax
//! ```

use serde::Deserialize;

use crate::error::FretError;
use crate::keymap::{KeyLayout, DEFAULT_ROWS, DEFAULT_SHIFT_STRINGS};
use crate::remap::Remapper;
use crate::tuning::{resolve_pitches, RawPitch, SourceTuning, TargetTuning};

/// Octave drops tried after the direct mapping fails.
pub const DEFAULT_OCTAVE_FALLBACKS: u8 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub tuning: TargetTuning,
    pub layout: KeyLayout,
    pub octave_fallbacks: u8,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "standard".to_string(),
            tuning: TargetTuning::STANDARD,
            layout: KeyLayout::default(),
            octave_fallbacks: DEFAULT_OCTAVE_FALLBACKS,
        }
    }
}

/// Raw profile for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawProfile {
    name: Option<String>,
    tuning: Option<Vec<RawPitch>>,
    shift_strings: Option<Vec<u8>>,
    rows: Option<Vec<Vec<String>>>,
    octave_fallbacks: Option<u8>,
}

impl Profile {
    /// Read a profile from YAML.
    ///
    /// # Example
    /// ```rust
    /// use fretkeys::{Profile, TargetTuning};
    ///
    /// let profile = Profile::from_yaml("name: drop-d\ntuning: [E4, B3, G3, D3, A2, D2]\n")?;
    /// assert_eq!(profile.name, "drop-d");
    /// assert_eq!(profile.tuning, TargetTuning::new(&[64, 59, 55, 50, 45, 38])?);
    /// # Ok::<(), fretkeys::FretError>(())
    /// ```
    pub fn from_yaml(source: &str) -> Result<Self, FretError> {
        let raw: RawProfile = serde_yaml::from_str(source).map_err(FretError::from_yaml)?;
        let defaults = Profile::default();

        let tuning = match raw.tuning {
            Some(entries) => TargetTuning::new(&resolve_pitches(&entries)?)?,
            None => defaults.tuning,
        };

        let layout = match (raw.rows, raw.shift_strings) {
            (None, None) => defaults.layout,
            (rows, shift_strings) => {
                let rows = rows.unwrap_or_else(|| {
                    DEFAULT_ROWS
                        .iter()
                        .map(|row| row.iter().map(|s| s.to_string()).collect())
                        .collect()
                });
                let shift_strings = shift_strings.unwrap_or_else(|| DEFAULT_SHIFT_STRINGS.to_vec());
                KeyLayout::from_tokens(&rows, &shift_strings)?
            }
        };

        Ok(Self {
            name: raw.name.unwrap_or(defaults.name),
            tuning,
            layout,
            octave_fallbacks: raw.octave_fallbacks.unwrap_or(defaults.octave_fallbacks),
        })
    }

    /// Replace the target tuning with a track's own tuning, which must have six strings.
    pub fn follow_source_tuning(mut self, source: &SourceTuning) -> Result<Self, FretError> {
        self.tuning = TargetTuning::new(source.values())?;
        Ok(self)
    }

    /// Remapper trying the direct position first, then each octave drop in turn.
    pub fn remapper(&self) -> Remapper {
        let transforms: Vec<i32> = (0..=i32::from(self.octave_fallbacks))
            .map(|octaves| -12 * octaves)
            .collect();
        Remapper::with_transforms(self.tuning, &transforms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{Key, KeyBinding};
    use crate::remap::Position;

    #[test]
    fn test_empty_profile_is_default() {
        let profile = Profile::from_yaml("{}").unwrap();
        assert_eq!(profile, Profile::default());
    }

    #[test]
    fn test_profile_shift_strings_only() {
        let profile = Profile::from_yaml("shift-strings: [3]").unwrap();
        assert_eq!(profile.layout.key_for(1, 1), Some(KeyBinding::plain(Key::Char('1'))));
        assert_eq!(profile.layout.key_for(3, 1), Some(KeyBinding::shifted(Key::Char('1'))));
        // Explicit shift entries stay shifted
        assert_eq!(profile.layout.key_for(5, 12), Some(KeyBinding::shifted(Key::Char('\''))));
    }

    #[test]
    fn test_profile_rejects_wrong_tuning_length() {
        let err = Profile::from_yaml("tuning: [E2, A2, D3, G3]").unwrap_err();
        assert!(matches!(err, FretError::TuningError(_)));
    }

    #[test]
    fn test_profile_unknown_field() {
        assert!(matches!(
            Profile::from_yaml("tunning: [E2]"),
            Err(FretError::ParseError { .. })
        ));
    }

    #[test]
    fn test_remapper_octave_fallbacks() {
        let mut profile = Profile::default();
        assert_eq!(profile.remapper().remap(89), None);

        profile.octave_fallbacks = 2;
        assert_eq!(profile.remapper().remap(89), Some(Position { string: 1, fret: 1 }));

        profile.octave_fallbacks = 0;
        assert_eq!(profile.remapper().remap(77), None);
    }

    #[test]
    fn test_follow_source_tuning() {
        let drop_d = SourceTuning::new(vec![64, 59, 55, 50, 45, 38]);
        let profile = Profile::default().follow_source_tuning(&drop_d).unwrap();
        assert_eq!(profile.tuning.pitch_of(6), 38);

        let bass = SourceTuning::new(vec![43, 38, 33, 28]);
        assert!(Profile::default().follow_source_tuning(&bass).is_err());
    }

    #[test]
    fn test_custom_rows_replace_string_five_fret_twelve() {
        let rows = |last: &str| {
            format!(
                "rows:\n  - [\"1\"]\n  - [\"2\"]\n  - [\"3\"]\n  - [\"4\"]\n  - [a, s, d, f, g, h, j, k, l, \";\", \"'\", \"'\", \"{}\"]\n  - [z]\n",
                last
            )
        };

        let kept = Profile::from_yaml(&rows("shift+'")).unwrap();
        assert_eq!(kept.layout.key_for(5, 12), Some(KeyBinding::shifted(Key::Char('\''))));

        let plain = Profile::from_yaml(&rows("'")).unwrap();
        assert_eq!(plain.layout.key_for(5, 12), Some(KeyBinding::plain(Key::Char('\''))));

        let dropped = Profile::from_yaml(&rows("")).unwrap();
        assert_eq!(dropped.layout.key_for(5, 12), None);
    }
}
