//! Input sinks: where key actions end up.
//!
//! The scheduler only knows the [`InputSink`] trait. Two sinks ship with the crate:
//! - [`RecordingSink`] keeps every action in memory
//! - [`ScriptSink`] writes one line per action (`down shift`, `down a`, `up a`, ...) for
//!   an external injector to replay

use std::io::{self, Write};

use serde::Serialize;

use crate::keymap::{Key, KeyBinding, Modifier};

/// Receiver of key actions. Calls arrive strictly one at a time.
pub trait InputSink {
    fn press_key(&mut self, key: Key);
    fn release_key(&mut self, key: Key);
    fn press_modifier(&mut self, modifier: Modifier);
    fn release_modifier(&mut self, modifier: Modifier);

    /// Tap a binding: shift down if needed, key down, key up, shift up.
    fn tap(&mut self, binding: KeyBinding) {
        if binding.shift {
            self.press_modifier(Modifier::Shift);
        }
        self.press_key(binding.key);
        self.release_key(binding.key);
        if binding.shift {
            self.release_modifier(Modifier::Shift);
        }
    }
}

impl<T: InputSink + ?Sized> InputSink for &mut T {
    fn press_key(&mut self, key: Key) {
        (**self).press_key(key);
    }

    fn release_key(&mut self, key: Key) {
        (**self).release_key(key);
    }

    fn press_modifier(&mut self, modifier: Modifier) {
        (**self).press_modifier(modifier);
    }

    fn release_modifier(&mut self, modifier: Modifier) {
        (**self).release_modifier(modifier);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SinkEvent {
    KeyDown(Key),
    KeyUp(Key),
    ModifierDown(Modifier),
    ModifierUp(Modifier),
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys pressed, in order, ignoring releases and modifiers.
    pub fn pressed_keys(&self) -> Vec<Key> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SinkEvent::KeyDown(key) => Some(*key),
                _ => None,
            })
            .collect()
    }
}

impl InputSink for RecordingSink {
    fn press_key(&mut self, key: Key) {
        self.events.push(SinkEvent::KeyDown(key));
    }

    fn release_key(&mut self, key: Key) {
        self.events.push(SinkEvent::KeyUp(key));
    }

    fn press_modifier(&mut self, modifier: Modifier) {
        self.events.push(SinkEvent::ModifierDown(modifier));
    }

    fn release_modifier(&mut self, modifier: Modifier) {
        self.events.push(SinkEvent::ModifierUp(modifier));
    }
}

/// Writes actions as text lines, flushing after each so a reader sees them on time.
///
/// Sink methods cannot fail, so the first I/O error is held and later writes are
/// skipped; [`ScriptSink::finish`] reports it.
pub struct ScriptSink<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> ScriptSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }

    fn line(&mut self, action: &str, name: &str) {
        if self.error.is_some() {
            return;
        }
        let result = writeln!(self.out, "{} {}", action, name).and_then(|_| self.out.flush());
        if let Err(err) = result {
            self.error = Some(err);
        }
    }
}

fn key_name(key: Key) -> String {
    match key {
        Key::Char(' ') => "space".to_string(),
        Key::Char(c) => c.to_string(),
        Key::Named(named) => named.name().to_string(),
    }
}

fn modifier_name(modifier: Modifier) -> &'static str {
    match modifier {
        Modifier::Shift => "shift",
    }
}

impl<W: Write> InputSink for ScriptSink<W> {
    fn press_key(&mut self, key: Key) {
        self.line("down", &key_name(key));
    }

    fn release_key(&mut self, key: Key) {
        self.line("up", &key_name(key));
    }

    fn press_modifier(&mut self, modifier: Modifier) {
        self.line("down", modifier_name(modifier));
    }

    fn release_modifier(&mut self, modifier: Modifier) {
        self.line("up", modifier_name(modifier));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::NamedKey;

    #[test]
    fn test_tap_shifted_binding_order() {
        let mut sink = RecordingSink::new();
        sink.tap(KeyBinding::shifted(Key::Char('q')));
        assert_eq!(
            sink.events,
            vec![
                SinkEvent::ModifierDown(Modifier::Shift),
                SinkEvent::KeyDown(Key::Char('q')),
                SinkEvent::KeyUp(Key::Char('q')),
                SinkEvent::ModifierUp(Modifier::Shift),
            ]
        );
    }

    #[test]
    fn test_tap_plain_binding_has_no_modifier() {
        let mut sink = RecordingSink::new();
        sink.tap(KeyBinding::plain(Key::Named(NamedKey::Left)));
        assert_eq!(sink.events.len(), 2);
        assert_eq!(sink.pressed_keys(), vec![Key::Named(NamedKey::Left)]);
    }

    #[test]
    fn test_script_sink_lines() {
        let mut sink = ScriptSink::new(Vec::new());
        sink.tap(KeyBinding::shifted(Key::Char('\'')));
        sink.tap(KeyBinding::plain(Key::Named(NamedKey::Right)));
        let out = String::from_utf8(sink.finish().unwrap()).unwrap();
        assert_eq!(out, "down shift\ndown '\nup '\nup shift\ndown right\nup right\n");
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_script_sink_keeps_first_error() {
        let mut sink = ScriptSink::new(FailingWriter);
        sink.press_key(Key::Char('a'));
        sink.release_key(Key::Char('a'));
        let err = sink.finish().err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
