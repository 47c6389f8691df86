//! # Track Validation
//!
//! A parsed track can be well-formed YAML and still be impossible to walk. This module
//! rejects those tracks up front so flattening never indexes outside the tuning:
//! - The tuning declares at least one string
//! - Every note's string exists in the tuning
//! - Every beat has a positive duration
//! - Measure starts never move backwards
//!
//! Frets that the target surface cannot reach are *not* errors here; they are dropped
//! note by note during flattening.

use crate::error::FretError;
use crate::tab::Track;

/// Validate a track before it is flattened.
pub fn validate_track(track: &Track) -> Result<(), FretError> {
    let strings = track.tuning.string_count();
    if strings == 0 {
        return Err(FretError::TuningError(format!(
            "track '{}' declares no strings",
            track.name
        )));
    }

    let mut previous_start = 0;
    for (i, measure) in track.measures.iter().enumerate() {
        let error = |message: String| FretError::TabError {
            track: track.name.clone(),
            measure: i + 1,
            message,
        };

        if measure.start < previous_start {
            return Err(error(format!(
                "measure starts at tick {}, before the previous measure at tick {}",
                measure.start, previous_start
            )));
        }
        previous_start = measure.start;

        for beat in measure.voices.iter().flat_map(|voice| &voice.beats) {
            if beat.duration == 0 {
                return Err(error("beat has zero duration".to_string()));
            }
            for note in &beat.notes {
                if note.string == 0 || usize::from(note.string) > strings {
                    return Err(error(format!(
                        "note on string {}, but the tuning only has {} strings",
                        note.string, strings
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab::{Beat, Measure, TabNote, Voice};
    use crate::tuning::SourceTuning;

    fn track(tuning: Vec<i32>, measures: Vec<Measure>) -> Track {
        Track {
            name: "Test".to_string(),
            tuning: SourceTuning::new(tuning),
            measures,
        }
    }

    fn measure(start: u32, beats: Vec<Beat>) -> Measure {
        Measure {
            start,
            voices: vec![Voice { beats }],
        }
    }

    #[test]
    fn test_valid_track() {
        let t = track(
            vec![43, 38, 33, 28],
            vec![
                measure(0, vec![Beat { duration: 960, notes: vec![TabNote::new(4, 3)] }]),
                measure(960, vec![Beat::rest(960)]),
            ],
        );
        assert!(validate_track(&t).is_ok());
    }

    #[test]
    fn test_string_outside_tuning() {
        let t = track(
            vec![43, 38, 33, 28],
            vec![measure(0, vec![Beat { duration: 960, notes: vec![TabNote::new(5, 0)] }])],
        );
        let err = validate_track(&t).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Tab error in track 'Test', measure 1: note on string 5, but the tuning only has 4 strings"
        );
    }

    #[test]
    fn test_string_zero_rejected() {
        let t = track(
            vec![64],
            vec![measure(0, vec![Beat { duration: 960, notes: vec![TabNote::new(0, 0)] }])],
        );
        assert!(validate_track(&t).is_err());
    }

    #[test]
    fn test_zero_duration_beat() {
        let t = track(vec![64], vec![measure(0, vec![Beat::rest(0)])]);
        assert!(matches!(
            validate_track(&t),
            Err(FretError::TabError { measure: 1, .. })
        ));
    }

    #[test]
    fn test_measures_out_of_order() {
        let t = track(
            vec![64],
            vec![measure(1920, vec![Beat::rest(960)]), measure(960, vec![Beat::rest(960)])],
        );
        assert!(matches!(
            validate_track(&t),
            Err(FretError::TabError { measure: 2, .. })
        ));
    }

    #[test]
    fn test_empty_tuning() {
        let t = track(vec![], vec![]);
        assert!(matches!(validate_track(&t), Err(FretError::TuningError(_))));
    }
}
