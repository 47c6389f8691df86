//! # Tab Document Parser
//!
//! Reads the YAML tab format into a [`Song`].
//!
//! Deserialization goes through the `Raw*` structs in `tab` first, then every value is
//! resolved into the model: note names become pitches, named durations become ticks,
//! `"3:5"` shorthands become notes and effect lists become [`NoteEffects`].
//!
//! ## Document Shape
//! ```yaml
//! title: Example
//! tempo: 96
//! tracks:
//!   - name: Lead
//!     tuning: [E4, B3, G3, D3, A2, E2]
//!     measures:
//!       - beats:
//!           - { duration: quarter, notes: ["3:0", "2:1"] }
//!           - { duration: quarter }
//!           - duration: half
//!             notes: [{ string: 1, fret: 3, effects: [slide-in] }]
//! ```
//!
//! Measures without a `start` begin where the previous measure's longest voice ends.

use crate::error::FretError;
use crate::tab::*;
use crate::tuning::{resolve_pitches, SourceTuning};

/// Parse a YAML tab document.
///
/// # Example
/// ```rust
/// use fretkeys::parse;
///
/// let source = r#"
/// tempo: 90
/// tracks:
///   - tuning: [E4, B3, G3, D3, A2, E2]
///     measures:
///       - beats:
///           - { duration: half, notes: ["6:3"] }
///           - { duration: half }
/// "#;
/// let song = parse(source)?;
/// assert_eq!(song.tempo, 90);
/// assert_eq!(song.tracks[0].measures[0].length(), Some(3840));
/// # Ok::<(), fretkeys::FretError>(())
/// ```
pub fn parse(source: &str) -> Result<Song, FretError> {
    let raw: RawSong = serde_yaml::from_str(source).map_err(FretError::from_yaml)?;

    let tempo = raw.tempo.unwrap_or(DEFAULT_TEMPO);
    if tempo == 0 {
        return Err(FretError::TempoError(tempo));
    }

    let tracks = raw
        .tracks
        .into_iter()
        .enumerate()
        .map(|(i, track)| convert_track(track, i + 1))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Song {
        title: raw.title,
        artist: raw.artist,
        tempo,
        tracks,
    })
}

fn convert_track(raw: RawTrack, track_number: usize) -> Result<Track, FretError> {
    let tuning = SourceTuning::new(resolve_pitches(&raw.tuning)?);
    let name = raw
        .name
        .unwrap_or_else(|| format!("Track {}", track_number));

    let mut measures = Vec::with_capacity(raw.measures.len());
    let mut next_start = 0;
    for (i, raw_measure) in raw.measures.into_iter().enumerate() {
        let at = Location {
            track: &name,
            measure: i + 1,
        };
        let start = raw_measure.start.unwrap_or(next_start);

        let mut voices = Vec::with_capacity(raw_measure.voices.len() + 1);
        if !raw_measure.beats.is_empty() {
            voices.push(convert_voice(raw_measure.beats, at)?);
        }
        for voice in raw_measure.voices {
            voices.push(convert_voice(voice.beats, at)?);
        }

        let measure = Measure { start, voices };
        next_start = measure
            .length()
            .and_then(|length| start.checked_add(length))
            .ok_or_else(|| at.error("measure runs past the last representable tick".to_string()))?;
        measures.push(measure);
    }

    Ok(Track {
        name,
        tuning,
        measures,
    })
}

#[derive(Clone, Copy)]
struct Location<'a> {
    track: &'a str,
    measure: usize,
}

impl Location<'_> {
    fn error(&self, message: String) -> FretError {
        FretError::TabError {
            track: self.track.to_string(),
            measure: self.measure,
            message,
        }
    }
}

fn convert_voice(beats: Vec<RawBeat>, at: Location<'_>) -> Result<Voice, FretError> {
    let beats = beats
        .into_iter()
        .map(|beat| convert_beat(beat, at))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Voice { beats })
}

fn convert_beat(raw: RawBeat, at: Location<'_>) -> Result<Beat, FretError> {
    let base = match raw.duration {
        RawDuration::Ticks(ticks) => ticks,
        RawDuration::Name(name) => Duration::from_name(&name)
            .map(|d| d.ticks())
            .ok_or_else(|| at.error(format!("unknown duration: {}", name)))?,
    };
    let duration = if raw.dotted {
        base.checked_add(base / 2)
            .ok_or_else(|| at.error(format!("dotted duration of {} ticks is too long", base)))?
    } else {
        base
    };

    let notes = raw
        .notes
        .into_iter()
        .map(|note| convert_note(note, at))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Beat { duration, notes })
}

fn convert_note(raw: RawNote, at: Location<'_>) -> Result<TabNote, FretError> {
    match raw {
        RawNote::Short(text) => parse_short_note(&text)
            .ok_or_else(|| at.error(format!("expected \"string:fret\", got \"{}\"", text))),
        RawNote::Full {
            string,
            fret,
            effects,
        } => Ok(TabNote::new(string, fret).with_effects(NoteEffects::from_list(&effects))),
    }
}

fn parse_short_note(text: &str) -> Option<TabNote> {
    let (string, fret) = text.split_once(':')?;
    Some(TabNote::new(
        string.trim().parse().ok()?,
        fret.trim().parse().ok()?,
    ))
}
