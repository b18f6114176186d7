//! Property-based testing generators.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use easel_widgets::{KillRing, Motion, TextBuffer};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;

const PREFIXES: [&str; 5] = ["A-", "M-", "C-", "^-", "S-"];

const NAMED: [&str; 13] = [
    "Enter",
    "Tab",
    "Backspace",
    "Delete",
    "Escape",
    "Space",
    "Home",
    "End",
    "PageUp",
    "ArrowLeft",
    "ArrowRight",
    "ArrowUp",
    "ArrowDown",
];

/// Chords such as `"C-M-x"`, `"S-Enter"` or `"^-F5"`, always parseable.
pub fn chord() -> impl Strategy<Value = String> {
    let base = prop_oneof![
        4 => prop::char::range('a', 'z').prop_map(String::from),
        2 => prop::char::range('0', '9').prop_map(String::from),
        2 => prop::sample::select(NAMED.to_vec()).prop_map(String::from),
        1 => (1u8..=12).prop_map(|n| format!("F{n}")),
    ];
    (prop::collection::vec(any::<bool>(), PREFIXES.len()), base).prop_map(|(held, base)| {
        let mut chord: String = PREFIXES
            .iter()
            .zip(held)
            .filter(|(_, on)| *on)
            .map(|(prefix, _)| *prefix)
            .collect();
        chord.push_str(&base);
        chord
    })
}

/// A printable ASCII key press with no modifiers.
pub fn printable_key() -> impl Strategy<Value = KeyEvent> {
    prop::char::range('!', '~').prop_map(|c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

/// Single-line text, spaces allowed.
pub fn plain_text(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(prop::char::range(' ', '~'), 0..=max_len)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Up to `max_lines` lines joined with `'\n'`.
pub fn multiline_text(max_lines: usize, max_width: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(plain_text(max_width), 1..=max_lines.max(1))
        .prop_map(|lines| lines.join("\n"))
}

pub fn motion() -> impl Strategy<Value = Motion> {
    prop_oneof![
        Just(Motion::Start),
        Just(Motion::End),
        Just(Motion::PrevChar),
        Just(Motion::NextChar),
        Just(Motion::LineStart),
        Just(Motion::LineEnd),
        (0usize..64).prop_map(Motion::Absolute),
    ]
}

/// A buffer edit, for driving random editing sessions.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOp {
    Insert(String),
    DeleteBackward,
    DeleteForward,
    Move(Motion),
    KillToEnd { continuation: bool },
    Yank,
    Splice { at: usize, remove: usize, text: String },
}

impl EditOp {
    pub fn apply(&self, buffer: &mut TextBuffer, ring: &KillRing) {
        match self {
            Self::Insert(text) => buffer.insert_before(text),
            Self::DeleteBackward => {
                buffer.delete_backward();
            }
            Self::DeleteForward => {
                buffer.delete_forward();
            }
            Self::Move(motion) => buffer.move_to(*motion),
            Self::KillToEnd { continuation } => {
                buffer.kill_to_end(ring, *continuation);
            }
            Self::Yank => buffer.yank(ring),
            Self::Splice { at, remove, text } => {
                let at = (*at).min(buffer.len());
                let remove = (*remove).min(buffer.len() - at);
                buffer.splice(at, remove, text);
            }
        }
    }
}

pub fn edit_op() -> BoxedStrategy<EditOp> {
    prop_oneof![
        3 => multiline_text(2, 4).prop_map(EditOp::Insert),
        1 => Just(EditOp::DeleteBackward),
        1 => Just(EditOp::DeleteForward),
        2 => motion().prop_map(EditOp::Move),
        1 => any::<bool>().prop_map(|continuation| EditOp::KillToEnd { continuation }),
        1 => Just(EditOp::Yank),
        1 => (0usize..32, 0usize..4, plain_text(3))
            .prop_map(|(at, remove, text)| EditOp::Splice { at, remove, text }),
    ]
    .boxed()
}

pub fn edit_session(len: usize) -> impl Strategy<Value = Vec<EditOp>> {
    prop::collection::vec(edit_op(), 0..=len)
}
