//! # Public API
//!
//! Entry points that chain the pipeline stages together.
//!
//! ## Functions
//!
//! - [`select_track()`] - Pick a track by its 1-based number
//! - [`arrange()`] - Flatten and group a track for a target profile
//! - [`resolve_tempo()`] - The song's tempo or an operator override, validated
//! - [`perform()`] - Play an arrangement into an input sink
//!
//! ## Typical Usage
//!
//! ```rust
//! use fretkeys::{arrange, parse, perform, resolve_tempo, select_track, Profile, RecordingSink};
//! use fretkeys::playback::Sleeper;
//! use std::time::Duration;
//!
//! struct Instant;
//! impl Sleeper for Instant {
//!     fn sleep(&mut self, _: Duration) {}
//! }
//!
//! let song = parse(r#"
//! tempo: 100
//! tracks:
//!   - name: Lead
//!     tuning: [E4, B3, G3, D3, A2, E2]
//!     measures:
//!       - beats:
//!           - { duration: quarter, notes: ["3:0"] }
//!           - { duration: quarter, notes: ["3:2"] }
//! "#)?;
//!
//! let profile = Profile::default();
//! let arrangement = arrange(select_track(&song, 1)?, &profile)?;
//! let tempo = resolve_tempo(&song, None)?;
//!
//! let mut sink = RecordingSink::new();
//! let report = perform(&arrangement, tempo, &profile, &mut sink, Instant);
//! assert_eq!(report.keys, 2);
//! # Ok::<(), fretkeys::FretError>(())
//! ```

use serde::Serialize;
use tracing::info;

use crate::error::FretError;
use crate::flatten::{flatten_track, SkippedNote};
use crate::playback::{group_notes, NoteGroup, PlaybackReport, Scheduler, Sleeper, Tempo};
use crate::profile::Profile;
use crate::sink::InputSink;
use crate::tab::{Song, Track};

/// A track ready to play: its notes grouped into chords on the target surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Arrangement {
    pub track: String,
    pub groups: Vec<NoteGroup>,
    #[serde(skip)]
    pub skipped: Vec<SkippedNote>,
    pub muted: usize,
}

impl Arrangement {
    pub fn note_count(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }
}

/// Pick a track by 1-based number.
pub fn select_track(song: &Song, number: usize) -> Result<&Track, FretError> {
    number
        .checked_sub(1)
        .and_then(|i| song.tracks.get(i))
        .ok_or_else(|| {
            FretError::TrackError(format!(
                "track {} does not exist, the song has {} tracks",
                number,
                song.tracks.len()
            ))
        })
}

/// Flatten and group a track for the given profile.
///
/// Unplayable notes are left out and listed in [`Arrangement::skipped`].
pub fn arrange(track: &Track, profile: &Profile) -> Result<Arrangement, FretError> {
    let flat = flatten_track(track, &profile.remapper())?;
    let groups = group_notes(&flat.notes);
    info!(
        track = %track.name,
        notes = flat.notes.len(),
        groups = groups.len(),
        skipped = flat.skipped.len(),
        muted = flat.muted,
        "arranged track"
    );
    Ok(Arrangement {
        track: track.name.clone(),
        groups,
        skipped: flat.skipped,
        muted: flat.muted,
    })
}

/// Use `override_bpm` when given, the song's tempo otherwise.
///
/// # Errors
/// [`FretError::TempoError`] when the chosen BPM is zero.
pub fn resolve_tempo(song: &Song, override_bpm: Option<u32>) -> Result<Tempo, FretError> {
    Tempo::new(override_bpm.unwrap_or(song.tempo))
}

/// Play an arrangement. Blocks until the last group's hold time has passed.
pub fn perform<S: InputSink, Z: Sleeper>(
    arrangement: &Arrangement,
    tempo: Tempo,
    profile: &Profile,
    sink: S,
    sleeper: Z,
) -> PlaybackReport {
    Scheduler::new(&profile.layout, sink, sleeper).play(&arrangement.groups, tempo)
}
