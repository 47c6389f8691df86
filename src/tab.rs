//! # Tab Model
//!
//! Type structures for a parsed tab document, the input side of the pipeline.
//!
//! ## Type Hierarchy
//! ```text
//! Song
//!   ├── title / artist
//!   ├── tempo (BPM, quarter note = one beat)
//!   └── Vec<Track>
//!         ├── name
//!         ├── tuning: SourceTuning (string 1 first, any number of strings)
//!         └── Vec<Measure>
//!               ├── start (ticks)
//!               └── Vec<Voice>
//!                     └── Vec<Beat>
//!                           ├── duration (ticks)
//!                           └── Vec<TabNote> (string, fret, NoteEffects)
//! ```
//!
//! ## Timing
//! All positions and durations are in ticks, [`TICKS_PER_BEAT`] to the quarter note.
//! A beat without notes is a rest: it still takes up time.
//!
//! ## Related Modules
//! - `parser` - Builds these types from YAML
//! - `semantic` - Validates tracks before flattening
//! - `flatten` - Walks tracks into playable notes

use serde::Deserialize;

use crate::tuning::{RawPitch, SourceTuning};

/// Tick resolution of a quarter note.
pub const TICKS_PER_BEAT: u32 = 960;

/// Tempo used when a document does not declare one.
pub const DEFAULT_TEMPO: u32 = 120;

#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub tempo: u32,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub name: String,
    pub tuning: SourceTuning,
    pub measures: Vec<Measure>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    /// Absolute tick at which the measure begins.
    pub start: u32,
    pub voices: Vec<Voice>,
}

impl Measure {
    /// Length of the longest voice, `None` if a voice overflows the tick range.
    pub fn length(&self) -> Option<u32> {
        self.voices
            .iter()
            .try_fold(0, |longest, voice| Some(longest.max(voice.length()?)))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Voice {
    pub beats: Vec<Beat>,
}

impl Voice {
    pub fn length(&self) -> Option<u32> {
        self.beats
            .iter()
            .try_fold(0u32, |total, beat| total.checked_add(beat.duration))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Beat {
    pub duration: u32,
    pub notes: Vec<TabNote>,
}

impl Beat {
    pub fn rest(duration: u32) -> Self {
        Self {
            duration,
            notes: Vec::new(),
        }
    }
}

/// A note as written in the tab: source string (1-based) and fret.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabNote {
    pub string: u8,
    pub fret: u8,
    pub effects: NoteEffects,
}

impl TabNote {
    pub fn new(string: u8, fret: u8) -> Self {
        Self {
            string,
            fret,
            effects: NoteEffects::default(),
        }
    }

    pub fn with_effects(mut self, effects: NoteEffects) -> Self {
        self.effects = effects;
        self
    }
}

/// Note effects that matter for playback, decoded once when the note is read.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NoteEffects {
    pub palm_mute: bool,
    pub dead_note: bool,
    pub slide_in: bool,
    pub slide_out: bool,
}

impl NoteEffects {
    /// Muted notes produce no key press.
    pub fn is_muted(&self) -> bool {
        self.palm_mute || self.dead_note
    }

    pub fn has_slide(&self) -> bool {
        self.slide_in || self.slide_out
    }

    pub fn from_list(effects: &[Effect]) -> Self {
        let mut decoded = Self::default();
        for effect in effects {
            match effect {
                Effect::PalmMute => decoded.palm_mute = true,
                Effect::DeadNote => decoded.dead_note = true,
                Effect::SlideIn => decoded.slide_in = true,
                Effect::SlideOut => decoded.slide_out = true,
            }
        }
        decoded
    }
}

/// Named note lengths accepted in place of raw tick counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duration {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
}

impl Duration {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "whole" | "w" => Some(Duration::Whole),
            "half" | "h" => Some(Duration::Half),
            "quarter" | "q" => Some(Duration::Quarter),
            "eighth" | "e" => Some(Duration::Eighth),
            "sixteenth" | "s" => Some(Duration::Sixteenth),
            "thirty-second" | "t" => Some(Duration::ThirtySecond),
            _ => None,
        }
    }

    pub fn ticks(&self) -> u32 {
        match self {
            Duration::Whole => TICKS_PER_BEAT * 4,
            Duration::Half => TICKS_PER_BEAT * 2,
            Duration::Quarter => TICKS_PER_BEAT,
            Duration::Eighth => TICKS_PER_BEAT / 2,
            Duration::Sixteenth => TICKS_PER_BEAT / 4,
            Duration::ThirtySecond => TICKS_PER_BEAT / 8,
        }
    }
}

/// Raw song document for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawSong {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub tempo: Option<u32>,
    #[serde(default)]
    pub tracks: Vec<RawTrack>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawTrack {
    pub name: Option<String>,
    pub tuning: Vec<RawPitch>,
    #[serde(default)]
    pub measures: Vec<RawMeasure>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawMeasure {
    pub start: Option<u32>,
    /// Shorthand for a measure with a single voice.
    #[serde(default)]
    pub beats: Vec<RawBeat>,
    #[serde(default)]
    pub voices: Vec<RawVoice>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawVoice {
    #[serde(default)]
    pub beats: Vec<RawBeat>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawBeat {
    pub duration: RawDuration,
    #[serde(default)]
    pub dotted: bool,
    #[serde(default)]
    pub notes: Vec<RawNote>,
}

/// Either a tick count (`480`) or a name (`eighth`).
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum RawDuration {
    Ticks(u32),
    Name(String),
}

/// Either the `"string:fret"` shorthand or a full mapping with effects.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum RawNote {
    Short(String),
    Full {
        string: u8,
        fret: u8,
        #[serde(default)]
        effects: Vec<Effect>,
    },
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum Effect {
    PalmMute,
    DeadNote,
    SlideIn,
    SlideOut,
}
