//! Tuning tables and absolute pitch arithmetic.
//!
//! Pitches are plain integers on a semitone scale (MIDI numbering when tunings are given
//! as note names). A string's tuning value is the pitch of that string at fret 0, so the
//! pitch of any fretted note is `tuning[string] + fret`.
//!
//! Two tables exist:
//! - [`SourceTuning`] - whatever the tab declares, any number of strings
//! - [`TargetTuning`] - the fixed six-string surface notes are remapped onto

use serde::Deserialize;

use crate::error::FretError;

/// Number of strings on the target surface.
pub const TARGET_STRINGS: usize = 6;

/// Per-string tuning declared by a tab track (string 1 first).
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTuning {
    values: Vec<i32>,
}

impl SourceTuning {
    pub fn new(values: Vec<i32>) -> Self {
        Self { values }
    }

    pub fn string_count(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }

    /// Fret-0 pitch of a 1-based source string.
    ///
    /// # Panics
    /// If `string` is 0 or beyond the declared tuning. Tracks are validated before they
    /// are flattened, so this only happens on a caller bug.
    pub fn pitch_of(&self, string: u8) -> i32 {
        self.values[usize::from(string) - 1]
    }
}

/// Tuning of the six-string target surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetTuning([i32; TARGET_STRINGS]);

impl TargetTuning {
    /// Standard guitar tuning, high E first: E4 B3 G3 D3 A2 E2.
    pub const STANDARD: TargetTuning = TargetTuning([64, 59, 55, 50, 45, 40]);

    /// Build a target tuning from exactly six values.
    ///
    /// # Example
    /// ```
    /// use fretkeys::TargetTuning;
    ///
    /// assert!(TargetTuning::new(&[64, 59, 55, 50, 45, 38]).is_ok());
    /// assert!(TargetTuning::new(&[43, 38, 33, 28]).is_err());
    /// ```
    pub fn new(values: &[i32]) -> Result<Self, FretError> {
        let values: [i32; TARGET_STRINGS] = values.try_into().map_err(|_| {
            FretError::TuningError(format!(
                "target tuning needs exactly {} strings, got {}",
                TARGET_STRINGS,
                values.len()
            ))
        })?;
        Ok(Self(values))
    }

    /// Fret-0 pitch of a 1-based target string (1..=6).
    pub fn pitch_of(&self, string: u8) -> i32 {
        self.0[usize::from(string) - 1]
    }

    /// `(string, open pitch)` pairs in ascending string order.
    pub fn strings(&self) -> impl Iterator<Item = (u8, i32)> + '_ {
        self.0.iter().enumerate().map(|(i, &p)| (i as u8 + 1, p))
    }

    pub fn lowest(&self) -> i32 {
        self.0.iter().copied().min().unwrap_or_default()
    }
}

impl Default for TargetTuning {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// A tuning entry as written in YAML: a MIDI number or a note name like `"F#3"`.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum RawPitch {
    Midi(i32),
    Name(String),
}

impl RawPitch {
    pub fn resolve(&self) -> Result<i32, FretError> {
        match self {
            RawPitch::Midi(value) => Ok(*value),
            RawPitch::Name(name) => parse_pitch(name)
                .ok_or_else(|| FretError::TuningError(format!("unknown pitch name: {}", name))),
        }
    }
}

/// Resolve a list of YAML tuning entries.
pub fn resolve_pitches(raw: &[RawPitch]) -> Result<Vec<i32>, FretError> {
    raw.iter().map(RawPitch::resolve).collect()
}

/// Parse a note name with octave into a MIDI pitch.
///
/// Letter `A`-`G`, optional `#` or `b`, then the octave (`C-1` is 0, `C4` is 60).
///
/// # Example
/// ```
/// use fretkeys::tuning::parse_pitch;
///
/// assert_eq!(parse_pitch("E2"), Some(40));
/// assert_eq!(parse_pitch("F#3"), Some(54));
/// assert_eq!(parse_pitch("Bb1"), Some(34));
/// assert_eq!(parse_pitch("H2"), None);
/// ```
pub fn parse_pitch(name: &str) -> Option<i32> {
    let name = name.trim();
    let mut chars = name.chars();
    let base = match chars.next()? {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let rest = chars.as_str();
    let (accidental, octave) = if let Some(octave) = rest.strip_prefix('#') {
        (1, octave)
    } else if let Some(octave) = rest.strip_prefix('b') {
        (-1, octave)
    } else {
        (0, rest)
    };
    let octave: i32 = octave.parse().ok()?;
    octave
        .checked_add(1)?
        .checked_mul(12)?
        .checked_add(base + accidental)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pitch_names() {
        assert_eq!(parse_pitch("E4"), Some(64));
        assert_eq!(parse_pitch("B3"), Some(59));
        assert_eq!(parse_pitch("C-1"), Some(0));
        assert_eq!(parse_pitch("Db2"), Some(37));
        assert_eq!(parse_pitch(" A2 "), Some(45));
        assert_eq!(parse_pitch("E"), None);
        assert_eq!(parse_pitch("e4"), None);
        assert_eq!(parse_pitch(""), None);
    }

    #[test]
    fn test_standard_tuning_matches_note_names() {
        let names = ["E4", "B3", "G3", "D3", "A2", "E2"];
        let pitches: Vec<i32> = names.iter().filter_map(|n| parse_pitch(n)).collect();
        assert_eq!(TargetTuning::new(&pitches).unwrap(), TargetTuning::STANDARD);
    }

    #[test]
    fn test_target_tuning_cardinality() {
        let err = TargetTuning::new(&[64, 59, 55, 50, 45, 40, 35]).unwrap_err();
        assert!(matches!(err, FretError::TuningError(_)));
        assert!(TargetTuning::new(&[]).is_err());
    }

    #[test]
    fn test_source_tuning_lookup() {
        let bass = SourceTuning::new(vec![43, 38, 33, 28]);
        assert_eq!(bass.string_count(), 4);
        assert_eq!(bass.pitch_of(1), 43);
        assert_eq!(bass.pitch_of(4), 28);
    }

    #[test]
    fn test_target_strings_ascending() {
        let strings: Vec<(u8, i32)> = TargetTuning::STANDARD.strings().collect();
        assert_eq!(strings.first(), Some(&(1, 64)));
        assert_eq!(strings.last(), Some(&(6, 40)));
        assert_eq!(TargetTuning::STANDARD.lowest(), 40);
    }

    #[test]
    fn test_raw_pitch_resolution() {
        let raw = vec![RawPitch::Name("D2".to_string()), RawPitch::Midi(45)];
        assert_eq!(resolve_pitches(&raw).unwrap(), vec![38, 45]);
        assert!(RawPitch::Name("X9".to_string()).resolve().is_err());
    }

    #[test]
    fn test_parse_pitch_octave_overflow() {
        assert_eq!(parse_pitch("C200000000"), None);
        assert_eq!(parse_pitch("C-200000000"), None);
        assert_eq!(parse_pitch(&format!("B{}", i32::MAX)), None);
        assert!(matches!(
            RawPitch::Name("C200000000".to_string()).resolve(),
            Err(FretError::TuningError(_))
        ));
    }
}
