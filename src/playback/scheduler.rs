//! Real-time playback of note groups.
//!
//! Playback is single-threaded and blocking: trigger a group, sleep until the next
//! group's start, repeat. After the final group the scheduler still sleeps for that
//! group's longest note. There is no look-ahead and no drift correction.

use std::thread;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::types::{NoteGroup, Tempo};
use crate::keymap::KeyLayout;
use crate::sink::InputSink;

/// Blocking wait between groups.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

impl<T: Sleeper + ?Sized> Sleeper for &mut T {
    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration);
    }
}

/// A group together with the wait that follows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Step {
    pub group: NoteGroup,
    pub wait_ticks: u32,
    pub wait_seconds: f64,
}

impl Step {
    pub fn wait(&self) -> Duration {
        Duration::from_secs_f64(self.wait_seconds)
    }
}

/// Pair each group with its following wait.
///
/// The wait is the gap to the next group's start, or the longest member duration for
/// the last group.
///
/// # Example
/// ```
/// use fretkeys::playback::{plan, GroupMember, NoteGroup};
/// use fretkeys::Tempo;
///
/// let member = |duration| GroupMember { string: 1, fret: 0, duration, slide: false };
/// let groups = vec![
///     NoteGroup { start: 0, members: vec![member(480)] },
///     NoteGroup { start: 480, members: vec![member(480), member(960)] },
/// ];
/// let steps = plan(&groups, Tempo::new(120)?);
///
/// assert_eq!(steps[0].wait_ticks, 480);
/// assert!((steps[0].wait_seconds - 0.25).abs() < 1e-9);
/// assert_eq!(steps[1].wait_ticks, 960);
/// # Ok::<(), fretkeys::FretError>(())
/// ```
pub fn plan(groups: &[NoteGroup], tempo: Tempo) -> Vec<Step> {
    let tick_seconds = tempo.tick_seconds();
    groups
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let wait_ticks = match groups.get(i + 1) {
                Some(next) => next.start.saturating_sub(group.start),
                None => group.longest(),
            };
            Step {
                group: group.clone(),
                wait_ticks,
                wait_seconds: f64::from(wait_ticks) * tick_seconds,
            }
        })
        .collect()
}

/// Totals for a finished playback session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackReport {
    pub groups: usize,
    pub keys: usize,
    pub unmapped: usize,
    /// Sum of the requested sleeps.
    pub scheduled: Duration,
}

pub struct Scheduler<'a, S: InputSink, Z: Sleeper> {
    layout: &'a KeyLayout,
    sink: S,
    sleeper: Z,
}

impl<'a, S: InputSink, Z: Sleeper> Scheduler<'a, S, Z> {
    pub fn new(layout: &'a KeyLayout, sink: S, sleeper: Z) -> Self {
        Self {
            layout,
            sink,
            sleeper,
        }
    }

    pub fn into_parts(self) -> (S, Z) {
        (self.sink, self.sleeper)
    }

    /// Wait `seconds` whole seconds before playback, logging the countdown.
    pub fn count_in(&mut self, seconds: u32) {
        for remaining in (1..=seconds).rev() {
            info!("starting in {}...", remaining);
            self.sleeper.sleep(Duration::from_secs(1));
        }
    }

    /// Play groups at a fixed tempo. Returns once the last group's hold time has passed.
    pub fn play(&mut self, groups: &[NoteGroup], tempo: Tempo) -> PlaybackReport {
        info!(groups = groups.len(), bpm = tempo.bpm(), "playback started");
        let report = self.run(&plan(groups, tempo));
        info!(
            keys = report.keys,
            unmapped = report.unmapped,
            "playback finished"
        );
        report
    }

    /// Execute a precomputed plan.
    pub fn run(&mut self, steps: &[Step]) -> PlaybackReport {
        let mut report = PlaybackReport::default();
        for step in steps {
            let (keys, unmapped) = self.trigger(&step.group);
            report.groups += 1;
            report.keys += keys;
            report.unmapped += unmapped;

            let wait = step.wait();
            report.scheduled += wait;
            self.sleeper.sleep(wait);
        }
        report
    }

    /// Tap every member of a group. Returns `(tapped, unmapped)` counts.
    pub fn trigger(&mut self, group: &NoteGroup) -> (usize, usize) {
        debug!(tick = group.start, notes = group.members.len(), "trigger");
        let mut tapped = 0;
        let mut unmapped = 0;
        for member in &group.members {
            match self.layout.key_for(member.string, member.fret) {
                Some(binding) => {
                    self.sink.tap(binding);
                    tapped += 1;
                }
                None => {
                    warn!(
                        string = member.string,
                        fret = member.fret,
                        "no key assigned, skipping note"
                    );
                    unmapped += 1;
                }
            }
        }
        (tapped, unmapped)
    }
}
