//! # Error Types
//!
//! This module defines all error types for fretkeys.
//!
//! Per-note problems (a pitch that cannot be remapped, a fret with no key) are never
//! errors: they are logged and the note is dropped. Only structural problems that make a
//! whole run meaningless end up here, and they are reported before playback starts.
//!
//! ## Error Types
//! - `ParseError` - YAML syntax or shape errors with line and column information
//! - `TabError` - Structurally invalid tab content (bad string index, zero-length beat)
//! - `TuningError` - Unknown pitch name or a target tuning without exactly six strings
//! - `TempoError` - A BPM of zero
//! - `ProfileError` - Invalid key-layout profile
//! - `TrackError` - Track selection out of range
//!
//! ## Usage
//! ```rust
//! use fretkeys::{parse, FretError};
//!
//! match parse("tracks: 12") {
//!     Ok(song) => println!("{} tracks", song.tracks.len()),
//!     Err(FretError::ParseError { line, column, message }) => {
//!         eprintln!("Parse error at {}:{}: {}", line, column, message);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FretError {
    /// Parse error with location information.
    ///
    /// # Example
    /// ```
    /// # use fretkeys::FretError;
    /// let err = FretError::ParseError {
    ///     line: 4,
    ///     column: 7,
    ///     message: "invalid type: string \"x\", expected u32".to_string(),
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Parse error at line 4, column 7: invalid type: string \"x\", expected u32"
    /// );
    /// ```
    #[error("Parse error at line {line}, column {column}: {message}")]
    ParseError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Tab content that parses but cannot be played back as written.
    ///
    /// `track` is the track name, `measure` is 1-indexed.
    ///
    /// # Example
    /// ```
    /// # use fretkeys::FretError;
    /// let err = FretError::TabError {
    ///     track: "Lead".to_string(),
    ///     measure: 3,
    ///     message: "note on string 7, but the tuning only has 6 strings".to_string(),
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Tab error in track 'Lead', measure 3: note on string 7, but the tuning only has 6 strings"
    /// );
    /// ```
    #[error("Tab error in track '{track}', measure {measure}: {message}")]
    TabError {
        track: String,
        measure: usize,
        message: String,
    },

    #[error("Invalid tuning: {0}")]
    TuningError(String),

    /// BPM must be positive.
    #[error("Invalid tempo: {0} BPM")]
    TempoError(u32),

    #[error("Invalid profile: {0}")]
    ProfileError(String),

    #[error("Invalid track selection: {0}")]
    TrackError(String),
}

impl FretError {
    /// Convert a `serde_yaml` error into a `ParseError`, keeping its location when known.
    pub(crate) fn from_yaml(err: serde_yaml::Error) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((0, 0));
        FretError::ParseError {
            line,
            column,
            message: err.to_string(),
        }
    }
}
