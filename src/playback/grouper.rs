//! Chord grouping
//!
//! Collapses notes that start on the same tick into one [`NoteGroup`].

use std::collections::BTreeMap;

use super::types::{GroupMember, NoteGroup, PlayableNote};

/// Group notes by start tick, ordered by ascending tick.
///
/// Input order does not matter across ticks; within a tick members keep their input
/// order.
///
/// # Example
/// ```
/// use fretkeys::playback::{group_notes, PlayableNote};
///
/// let notes = [
///     PlayableNote { tick: 1920, string: 3, fret: 2, duration: 480, slide: false },
///     PlayableNote { tick: 0, string: 1, fret: 0, duration: 960, slide: false },
///     PlayableNote { tick: 1920, string: 4, fret: 2, duration: 960, slide: false },
/// ];
/// let groups = group_notes(&notes);
///
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].start, 0);
/// assert_eq!(groups[1].start, 1920);
/// assert_eq!(groups[1].members.len(), 2);
/// assert_eq!(groups[1].longest(), 960);
/// ```
pub fn group_notes(notes: &[PlayableNote]) -> Vec<NoteGroup> {
    let mut by_tick: BTreeMap<u32, Vec<GroupMember>> = BTreeMap::new();
    for note in notes {
        by_tick.entry(note.tick).or_default().push(GroupMember {
            string: note.string,
            fret: note.fret,
            duration: note.duration,
            slide: note.slide,
        });
    }

    by_tick
        .into_iter()
        .map(|(start, members)| NoteGroup { start, members })
        .collect()
}

/// Flatten groups back into notes, group by group.
pub fn ungroup(groups: &[NoteGroup]) -> Vec<PlayableNote> {
    groups
        .iter()
        .flat_map(|group| {
            group.members.iter().map(move |m| PlayableNote {
                tick: group.start,
                string: m.string,
                fret: m.fret,
                duration: m.duration,
                slide: m.slide,
            })
        })
        .collect()
}
