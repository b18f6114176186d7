//! Keystroke sequences for driving a dispatcher.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use easel_keybinds::{KeyBinder, RawKeyEvent};

/// One step of a [`KeySequence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stroke {
    /// A terminal key event, converted to a [`RawKeyEvent`] on replay.
    Key(KeyEvent),
    /// A chord in `"C-x"` notation, dispatched without a host event.
    Chord(String),
}

/// A sequence of keystrokes for testing.
#[derive(Debug, Clone, Default)]
pub struct KeySequence {
    strokes: Vec<Stroke>,
}

impl KeySequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key event.
    pub fn key(&mut self, key: KeyCode) -> &mut Self {
        self.key_mod(key, KeyModifiers::NONE)
    }

    /// Add a key event with modifiers.
    pub fn key_mod(&mut self, key: KeyCode, modifiers: KeyModifiers) -> &mut Self {
        self.strokes.push(Stroke::Key(KeyEvent::new(key, modifiers)));
        self
    }

    /// Add a chord such as `"C-k"` or `"M-<"`.
    pub fn chord(&mut self, chord: &str) -> &mut Self {
        self.strokes.push(Stroke::Chord(chord.to_string()));
        self
    }

    pub fn char(&mut self, c: char) -> &mut Self {
        self.key(KeyCode::Char(c))
    }

    /// Add a text string as character events. `'\n'` becomes Enter.
    pub fn text(&mut self, s: &str) -> &mut Self {
        for c in s.chars() {
            match c {
                '\n' => self.enter(),
                c => self.char(c),
            };
        }
        self
    }

    pub fn ctrl(&mut self, c: char) -> &mut Self {
        self.key_mod(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn meta(&mut self, c: char) -> &mut Self {
        self.key_mod(KeyCode::Char(c), KeyModifiers::META)
    }

    pub fn alt(&mut self, c: char) -> &mut Self {
        self.key_mod(KeyCode::Char(c), KeyModifiers::ALT)
    }

    pub fn enter(&mut self) -> &mut Self {
        self.key(KeyCode::Enter)
    }

    pub fn esc(&mut self) -> &mut Self {
        self.key(KeyCode::Esc)
    }

    pub fn tab(&mut self) -> &mut Self {
        self.key(KeyCode::Tab)
    }

    pub fn backspace(&mut self) -> &mut Self {
        self.key(KeyCode::Backspace)
    }

    pub fn delete(&mut self) -> &mut Self {
        self.key(KeyCode::Delete)
    }

    pub fn up(&mut self) -> &mut Self {
        self.key(KeyCode::Up)
    }

    pub fn down(&mut self) -> &mut Self {
        self.key(KeyCode::Down)
    }

    pub fn left(&mut self) -> &mut Self {
        self.key(KeyCode::Left)
    }

    pub fn right(&mut self) -> &mut Self {
        self.key(KeyCode::Right)
    }

    pub fn home(&mut self) -> &mut Self {
        self.key(KeyCode::Home)
    }

    pub fn end(&mut self) -> &mut Self {
        self.key(KeyCode::End)
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// The key events as the dispatcher will see them. Chords are skipped.
    pub fn raw_events(&self) -> Vec<RawKeyEvent> {
        self.strokes
            .iter()
            .filter_map(|stroke| match stroke {
                Stroke::Key(event) => Some(RawKeyEvent::from(*event)),
                Stroke::Chord(_) => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn append(&mut self, other: &KeySequence) -> &mut Self {
        self.strokes.extend(other.strokes.iter().cloned());
        self
    }

    /// Repeat the current sequence so it occurs `n` times in total.
    pub fn repeat(&mut self, n: usize) -> &mut Self {
        let strokes = self.strokes.clone();
        for _ in 1..n {
            self.strokes.extend(strokes.iter().cloned());
        }
        self
    }

    /// Dispatch every stroke in order, returning each dispatch result.
    pub fn dispatch(&self, binder: &mut KeyBinder) -> Vec<Option<bool>> {
        self.strokes
            .iter()
            .map(|stroke| match stroke {
                Stroke::Key(event) => binder.dispatch_event(&mut RawKeyEvent::from(*event)),
                Stroke::Chord(chord) => binder.dispatch_chord(chord),
            })
            .collect()
    }
}

/// Builders for common editing gestures.
pub struct InputPatterns;

impl InputPatterns {
    /// Type text and press Enter.
    pub fn type_line(text: &str) -> KeySequence {
        let mut seq = KeySequence::new();
        seq.text(text).enter();
        seq
    }

    /// Kill `n` lines with consecutive `C-k`.
    pub fn kill_lines(n: usize) -> KeySequence {
        let mut seq = KeySequence::new();
        seq.ctrl('k').repeat(n);
        seq
    }

    /// Kill to end of line, then yank it back.
    pub fn kill_and_yank() -> KeySequence {
        let mut seq = KeySequence::new();
        seq.ctrl('k').ctrl('y');
        seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_keybinds::{encode_event, parse_chord, ActionId, Binding};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_text_sequence() {
        let mut seq = KeySequence::new();
        seq.text("hi\nyo");
        assert_eq!(seq.len(), 5);
        assert_eq!(seq.raw_events()[2].key, "Enter");
    }

    #[test]
    fn test_modifiers_encode() {
        let mut seq = KeySequence::new();
        seq.ctrl('k').meta('v').left();
        let codes: Vec<_> = seq
            .raw_events()
            .iter()
            .map(|e| encode_event(e).unwrap())
            .collect();
        assert_eq!(codes[0], parse_chord("C-k").unwrap());
        assert_eq!(codes[1], parse_chord("M-v").unwrap());
        assert_eq!(codes[2], parse_chord("ArrowLeft").unwrap());
    }

    #[test]
    fn test_repeat_and_append() {
        let mut seq = InputPatterns::kill_lines(3);
        assert_eq!(seq.len(), 3);
        seq.append(&InputPatterns::type_line("ab"));
        assert_eq!(seq.len(), 6);
        assert!(!seq.is_empty());
    }

    #[test]
    fn test_dispatch_in_order() {
        let mut binder = KeyBinder::new();
        let log = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&log);
        binder.global_set_pattern(
            easel_keybinds::printable_pattern(),
            Binding::new("record", move |ctx| {
                sink.borrow_mut().push_str(ctx.text());
                Ok(true)
            }),
        );

        let mut seq = KeySequence::new();
        seq.text("ab").chord("c").ctrl('z');
        let results = seq.dispatch(&mut binder);

        assert_eq!(*log.borrow(), "abc");
        assert_eq!(results, vec![Some(true), Some(true), Some(true), None]);
        assert_eq!(
            binder.last_action(easel_keybinds::ScopeId::GLOBAL),
            Some(&ActionId::from("record"))
        );
    }
}
