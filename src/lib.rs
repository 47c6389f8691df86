pub mod api;
pub mod error;
pub mod flatten;
pub mod keymap;
pub mod parser;
pub mod playback;
pub mod profile;
pub mod remap;
pub mod semantic;
pub mod sink;
pub mod tab;
pub mod tuning;

pub use api::*;
pub use error::*;
pub use flatten::{flatten_track, FlattenedTrack, SkippedNote};
pub use keymap::{Key, KeyBinding, KeyLayout, Modifier, NamedKey};
pub use parser::parse;
pub use playback::{NoteGroup, PlayableNote, Tempo};
pub use profile::Profile;
pub use remap::{Position, Remapper};
pub use semantic::validate_track;
pub use sink::{InputSink, RecordingSink, ScriptSink, SinkEvent};
pub use tab::*;
pub use tuning::{SourceTuning, TargetTuning};
