//! # Note Remapping
//!
//! Maps an absolute pitch onto a playable position of the six-string, 0-12 fret target
//! surface.
//!
//! ## Algorithm
//! For each candidate transform (by default: unchanged, then one octave down) the target
//! strings are scanned in ascending order and the first string whose fret for the
//! shifted pitch lies in `0..=12` wins. Lower-numbered strings are therefore preferred
//! whenever a pitch is reachable on more than one string.
//!
//! The octave fallback is lossy: a note above the surface's range comes out an octave
//! lower rather than not at all.
//!
//! ## Example
//! ```rust
//! use fretkeys::{Position, Remapper, TargetTuning};
//!
//! let remapper = Remapper::new(TargetTuning::STANDARD);
//!
//! // G3 is an open string 3
//! assert_eq!(remapper.remap(55), Some(Position { string: 3, fret: 0 }));
//!
//! // E6 is out of range directly, E5 fits at string 1 fret 12
//! assert_eq!(remapper.remap(88), Some(Position { string: 1, fret: 12 }));
//!
//! // Below the open low string there is nothing to fall back to
//! assert_eq!(remapper.remap(30), None);
//! ```

use serde::Serialize;

use crate::tuning::TargetTuning;

/// Highest fret on the target surface.
pub const MAX_FRET: i32 = 12;

/// Semitone shifts tried in order: as written, then an octave down.
pub const DEFAULT_TRANSFORMS: [i32; 2] = [0, -12];

/// A (string, fret) pair on the target surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub string: u8,
    pub fret: u8,
}

#[derive(Debug, Clone)]
pub struct Remapper {
    tuning: TargetTuning,
    transforms: Vec<i32>,
}

impl Remapper {
    pub fn new(tuning: TargetTuning) -> Self {
        Self::with_transforms(tuning, &DEFAULT_TRANSFORMS)
    }

    /// Use a custom ordered list of semitone shifts, e.g. `[0, -12, -24]`.
    pub fn with_transforms(tuning: TargetTuning, transforms: &[i32]) -> Self {
        Self {
            tuning,
            transforms: transforms.to_vec(),
        }
    }

    pub fn remap(&self, pitch: i32) -> Option<Position> {
        self.remap_with_shift(pitch).map(|(position, _)| position)
    }

    /// Like [`Remapper::remap`], also returning the semitone shift that was applied.
    pub fn remap_with_shift(&self, pitch: i32) -> Option<(Position, i32)> {
        self.transforms.iter().find_map(|&shift| {
            let shifted = pitch.checked_add(shift)?;
            self.scan(shifted).map(|position| (position, shift))
        })
    }

    fn scan(&self, pitch: i32) -> Option<Position> {
        self.tuning.strings().find_map(|(string, open)| {
            let fret = pitch.checked_sub(open)?;
            (0..=MAX_FRET).contains(&fret).then(|| Position {
                string,
                fret: fret as u8,
            })
        })
    }
}
