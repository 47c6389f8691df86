//! Playback type definitions
//!
//! Notes after remapping, the chord groups built from them, and the session tempo.

use std::time::Duration;

use serde::Serialize;

use crate::error::FretError;
use crate::tab::TICKS_PER_BEAT;

/// A remapped note ready to be grouped and played.
///
/// `string` is 1..=6 and `fret` 0..=12 on the target surface; notes that cannot satisfy
/// this never get built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlayableNote {
    pub tick: u32,
    pub string: u8,
    pub fret: u8,
    pub duration: u32,
    pub slide: bool,
}

/// One note inside a [`NoteGroup`]; the start tick lives on the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupMember {
    pub string: u8,
    pub fret: u8,
    pub duration: u32,
    pub slide: bool,
}

/// Notes struck together at the same tick, in the order they were read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct NoteGroup {
    pub start: u32,
    pub members: Vec<GroupMember>,
}

impl NoteGroup {
    /// Longest member duration, used as the hold time after the final group.
    pub fn longest(&self) -> u32 {
        self.members.iter().map(|m| m.duration).max().unwrap_or(0)
    }
}

/// Playback tempo in quarter-note beats per minute. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tempo(u32);

impl Tempo {
    /// # Example
    /// ```
    /// use fretkeys::Tempo;
    ///
    /// assert!(Tempo::new(0).is_err());
    /// assert_eq!(Tempo::new(120).unwrap().bpm(), 120);
    /// ```
    pub fn new(bpm: u32) -> Result<Self, FretError> {
        if bpm == 0 {
            return Err(FretError::TempoError(bpm));
        }
        Ok(Self(bpm))
    }

    pub fn bpm(&self) -> u32 {
        self.0
    }

    /// Seconds per tick: `(60 / bpm) / 960`.
    pub fn tick_seconds(&self) -> f64 {
        60.0 / f64::from(self.0) / f64::from(TICKS_PER_BEAT)
    }

    /// Wall-clock length of `ticks` at this tempo.
    pub fn ticks_to_duration(&self, ticks: u32) -> Duration {
        Duration::from_secs_f64(f64::from(ticks) * self.tick_seconds())
    }
}
