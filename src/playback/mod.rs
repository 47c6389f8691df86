//! # Playback Module
//!
//! Turns flattened notes into timed key actions.
//!
//! ## Sub-modules
//! - `types` - PlayableNote, NoteGroup, Tempo
//! - `grouper` - Collapses notes sharing a start tick into chords
//! - `scheduler` - Sleeps between groups and drives an [`InputSink`](crate::InputSink)
//!
//! ## Timing
//! One quarter note is 960 ticks, so a tick lasts `(60 / bpm) / 960` seconds. At 120 BPM
//! that is about 0.52 ms, and a 480-tick gap waits 0.25 s.
//!
//! ## Example
//! ```rust
//! use fretkeys::playback::{group_notes, PlayableNote, Scheduler};
//! use fretkeys::{KeyLayout, RecordingSink, Tempo};
//! use std::time::Duration;
//!
//! struct NoSleep(Duration);
//! impl fretkeys::playback::Sleeper for NoSleep {
//!     fn sleep(&mut self, d: Duration) { self.0 += d; }
//! }
//!
//! let notes = [
//!     PlayableNote { tick: 1920, string: 6, fret: 0, duration: 480, slide: false },
//!     PlayableNote { tick: 1920, string: 5, fret: 2, duration: 960, slide: false },
//! ];
//! let groups = group_notes(&notes);
//! let layout = KeyLayout::default();
//! let mut scheduler = Scheduler::new(&layout, RecordingSink::new(), NoSleep(Duration::ZERO));
//! let report = scheduler.play(&groups, Tempo::new(120)?);
//!
//! assert_eq!(report.groups, 1);
//! assert_eq!(report.keys, 2);
//! assert_eq!(report.scheduled, Tempo::new(120)?.ticks_to_duration(960));
//! # Ok::<(), fretkeys::FretError>(())
//! ```

mod grouper;
mod scheduler;
mod types;


pub use grouper::{group_notes, ungroup};
pub use scheduler::{plan, PlaybackReport, Scheduler, Sleeper, Step, ThreadSleeper};
pub use types::{GroupMember, NoteGroup, PlayableNote, Tempo};
