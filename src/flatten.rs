//! # Tab Flattening
//!
//! Walks a track's measures, voices and beats into a flat list of [`PlayableNote`]s.
//!
//! ## Tick Cursor
//! Each measure resets the cursor to the measure's `start`. Every beat then advances it
//! by the beat's duration, whether or not the beat has notes, so rests keep their
//! length. Voices of a measure are walked one after the other on the same cursor.
//!
//! ## Per Note
//! - palm-muted and dead notes are skipped
//! - otherwise the source pitch is remapped onto the target surface; the note is emitted
//!   at the beat's start tick with the beat's duration, flagged as a slide if it slides
//!   in or out
//! - pitches that cannot be remapped are dropped and reported in
//!   [`FlattenedTrack::skipped`]
//!
//! ## Example
//! ```rust
//! use fretkeys::{flatten_track, parse, Remapper, TargetTuning};
//!
//! let song = parse(r#"
//! tracks:
//!   - tuning: [E4, B3, G3, D3, A2, E2]
//!     measures:
//!       - beats:
//!           - { duration: quarter }
//!           - { duration: quarter, notes: ["6:0", "5:2"] }
//! "#)?;
//! let flat = flatten_track(&song.tracks[0], &Remapper::new(TargetTuning::STANDARD))?;
//!
//! assert_eq!(flat.notes.len(), 2);
//! assert!(flat.notes.iter().all(|n| n.tick == 960));
//! assert_eq!(flat.end_tick, 1920);
//! # Ok::<(), fretkeys::FretError>(())
//! ```

use tracing::{debug, warn};

use crate::error::FretError;
use crate::playback::PlayableNote;
use crate::remap::Remapper;
use crate::semantic::validate_track;
use crate::tab::Track;

/// A source note that has no position on the target surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedNote {
    /// 1-indexed measure number.
    pub measure: usize,
    pub string: u8,
    pub fret: u8,
    pub pitch: i32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlattenedTrack {
    /// Playable notes in traversal order.
    pub notes: Vec<PlayableNote>,
    pub skipped: Vec<SkippedNote>,
    /// Palm-muted and dead notes left out.
    pub muted: usize,
    /// Cursor position after the last beat.
    pub end_tick: u32,
}

/// Validate and flatten a track.
pub fn flatten_track(track: &Track, remapper: &Remapper) -> Result<FlattenedTrack, FretError> {
    validate_track(track)?;

    let mut out = FlattenedTrack::default();
    for (i, measure) in track.measures.iter().enumerate() {
        let mut cursor = measure.start;

        for beat in measure.voices.iter().flat_map(|voice| &voice.beats) {
            let beat_tick = cursor;
            for note in &beat.notes {
                if note.effects.is_muted() {
                    out.muted += 1;
                    continue;
                }

                let pitch = track
                    .tuning
                    .pitch_of(note.string)
                    .checked_add(i32::from(note.fret))
                    .ok_or_else(|| {
                        FretError::TuningError(format!(
                            "string {} of track '{}' plus fret {} is out of pitch range",
                            note.string, track.name, note.fret
                        ))
                    })?;
                match remapper.remap_with_shift(pitch) {
                    Some((position, shift)) => {
                        if shift != 0 {
                            debug!(
                                measure = i + 1,
                                string = note.string,
                                fret = note.fret,
                                shift,
                                "shifted note to fit the target surface"
                            );
                        }
                        out.notes.push(PlayableNote {
                            tick: beat_tick,
                            string: position.string,
                            fret: position.fret,
                            duration: beat.duration,
                            slide: note.effects.has_slide(),
                        });
                    }
                    None => {
                        warn!(
                            measure = i + 1,
                            string = note.string,
                            fret = note.fret,
                            "skipping note, unplayable in the 0-12 fret range"
                        );
                        out.skipped.push(SkippedNote {
                            measure: i + 1,
                            string: note.string,
                            fret: note.fret,
                            pitch,
                        });
                    }
                }
            }
            cursor = cursor.checked_add(beat.duration).ok_or_else(|| FretError::TabError {
                track: track.name.clone(),
                measure: i + 1,
                message: "beats run past the last representable tick".to_string(),
            })?;
        }

        out.end_tick = cursor;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab::{Beat, Measure, NoteEffects, TabNote, Voice};
    use crate::tuning::{SourceTuning, TargetTuning};

    fn standard_track(measures: Vec<Measure>) -> Track {
        Track {
            name: "Lead".to_string(),
            tuning: SourceTuning::new(vec![64, 59, 55, 50, 45, 40]),
            measures,
        }
    }

    fn remapper() -> Remapper {
        Remapper::new(TargetTuning::STANDARD)
    }

    fn beat(duration: u32, notes: Vec<TabNote>) -> Beat {
        Beat { duration, notes }
    }

    #[test]
    fn test_cursor_advances_over_rests() {
        let measure = Measure {
            start: 0,
            voices: vec![Voice {
                beats: vec![
                    Beat::rest(480),
                    beat(960, vec![TabNote::new(3, 2)]),
                    Beat::rest(240),
                    beat(240, vec![TabNote::new(1, 0)]),
                ],
            }],
        };
        let flat = flatten_track(&standard_track(vec![measure]), &remapper()).unwrap();

        let ticks: Vec<u32> = flat.notes.iter().map(|n| n.tick).collect();
        assert_eq!(ticks, vec![480, 1680]);
        assert_eq!(flat.end_tick, 480 + 960 + 240 + 240);
    }

    #[test]
    fn test_cursor_resets_to_measure_start() {
        let measures = vec![
            Measure {
                start: 0,
                voices: vec![Voice { beats: vec![Beat::rest(960)] }],
            },
            Measure {
                start: 3840,
                voices: vec![Voice {
                    beats: vec![beat(960, vec![TabNote::new(2, 1)])],
                }],
            },
        ];
        let flat = flatten_track(&standard_track(measures), &remapper()).unwrap();
        assert_eq!(flat.notes[0].tick, 3840);
        assert_eq!(flat.end_tick, 4800);
    }

    #[test]
    fn test_muted_notes_skipped() {
        let palm = NoteEffects { palm_mute: true, ..Default::default() };
        let dead = NoteEffects { dead_note: true, ..Default::default() };
        let measure = Measure {
            start: 0,
            voices: vec![Voice {
                beats: vec![beat(
                    960,
                    vec![
                        TabNote::new(6, 0).with_effects(palm),
                        TabNote::new(5, 0).with_effects(dead),
                        TabNote::new(4, 0),
                    ],
                )],
            }],
        };
        let flat = flatten_track(&standard_track(vec![measure]), &remapper()).unwrap();
        assert_eq!(flat.notes.len(), 1);
        assert_eq!(flat.muted, 2);
        assert_eq!(flat.notes[0].string, 4);
    }

    #[test]
    fn test_slide_flag_from_either_direction() {
        let slide_in = NoteEffects { slide_in: true, ..Default::default() };
        let slide_out = NoteEffects { slide_out: true, ..Default::default() };
        let measure = Measure {
            start: 0,
            voices: vec![Voice {
                beats: vec![
                    beat(480, vec![TabNote::new(3, 5).with_effects(slide_in)]),
                    beat(480, vec![TabNote::new(3, 7).with_effects(slide_out)]),
                    beat(480, vec![TabNote::new(3, 9)]),
                ],
            }],
        };
        let flat = flatten_track(&standard_track(vec![measure]), &remapper()).unwrap();
        let slides: Vec<bool> = flat.notes.iter().map(|n| n.slide).collect();
        assert_eq!(slides, vec![true, true, false]);
    }

    #[test]
    fn test_notes_remapped_by_pitch_not_position() {
        // Bass string 4 open is E1 (28), below the surface even before the octave drop.
        // Bass string 1 fret 5 is C3 (48), target string 5 fret 3.
        let track = Track {
            name: "Bass".to_string(),
            tuning: SourceTuning::new(vec![43, 38, 33, 28]),
            measures: vec![Measure {
                start: 0,
                voices: vec![Voice {
                    beats: vec![beat(960, vec![TabNote::new(4, 0), TabNote::new(1, 5)])],
                }],
            }],
        };
        let flat = flatten_track(&track, &remapper()).unwrap();
        assert_eq!(flat.notes.len(), 1);
        assert_eq!((flat.notes[0].string, flat.notes[0].fret), (5, 3));
        assert_eq!(
            flat.skipped,
            vec![SkippedNote { measure: 1, string: 4, fret: 0, pitch: 28 }]
        );
    }

    #[test]
    fn test_high_fret_falls_back_an_octave() {
        // String 1 fret 15 is G5 (79); an octave down it is string 1 fret 3
        let measure = Measure {
            start: 0,
            voices: vec![Voice {
                beats: vec![beat(960, vec![TabNote::new(1, 15)])],
            }],
        };
        let flat = flatten_track(&standard_track(vec![measure]), &remapper()).unwrap();
        assert_eq!((flat.notes[0].string, flat.notes[0].fret), (1, 3));
    }

    #[test]
    fn test_voices_share_one_cursor() {
        let measure = Measure {
            start: 0,
            voices: vec![
                Voice { beats: vec![beat(1920, vec![TabNote::new(1, 0)])] },
                Voice { beats: vec![beat(960, vec![TabNote::new(2, 0)])] },
            ],
        };
        let flat = flatten_track(&standard_track(vec![measure]), &remapper()).unwrap();
        assert_eq!(flat.notes[1].tick, 1920);
        assert_eq!(flat.end_tick, 2880);
    }

    #[test]
    fn test_invalid_track_rejected() {
        let measure = Measure {
            start: 0,
            voices: vec![Voice { beats: vec![beat(960, vec![TabNote::new(9, 0)])] }],
        };
        assert!(flatten_track(&standard_track(vec![measure]), &remapper()).is_err());
    }

    #[test]
    fn test_pitch_overflow_is_a_tuning_error() {
        let track = Track {
            name: "Broken".to_string(),
            tuning: SourceTuning::new(vec![i32::MAX]),
            measures: vec![Measure {
                start: 0,
                voices: vec![Voice {
                    beats: vec![beat(960, vec![TabNote::new(1, 5)])],
                }],
            }],
        };
        assert!(matches!(
            flatten_track(&track, &remapper()),
            Err(FretError::TuningError(_))
        ));
    }

    #[test]
    fn test_cursor_overflow_is_a_tab_error() {
        let measure = Measure {
            start: u32::MAX - 100,
            voices: vec![Voice { beats: vec![Beat::rest(960)] }],
        };
        match flatten_track(&standard_track(vec![measure]), &remapper()) {
            Err(FretError::TabError { track, measure, .. }) => {
                assert_eq!(track, "Lead");
                assert_eq!(measure, 1);
            }
            other => panic!("expected tab error, got {:?}", other),
        }
    }

    #[test]
    fn test_cursor_overflow_across_voices() {
        // Each voice fits on its own; walked one after another they do not
        let voice = || Voice {
            beats: vec![Beat::rest(3_000_000_000)],
        };
        let measure = Measure {
            start: 0,
            voices: vec![voice(), voice()],
        };
        assert_eq!(measure.length(), Some(3_000_000_000));
        assert!(matches!(
            flatten_track(&standard_track(vec![measure]), &remapper()),
            Err(FretError::TabError { .. })
        ));
    }
}
