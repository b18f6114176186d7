//! Chord notation parser and key event encoder.

use crate::error::KeyError;
use crate::event::RawKeyEvent;
use crate::keycode::{key_name, named_key_code, KeyCode, Modifiers};

/// Symbols typed with shift held on a US layout, paired with the key that
/// produces them.
const SHIFTED_SYMBOLS: &[(char, char)] = &[
    ('~', '`'),
    ('!', '1'),
    ('@', '2'),
    ('#', '3'),
    ('$', '4'),
    ('%', '5'),
    ('^', '6'),
    ('&', '7'),
    ('*', '8'),
    ('(', '9'),
    (')', '0'),
    ('_', '-'),
    ('+', '='),
    ('{', '['),
    ('}', ']'),
    ('|', '\\'),
    (':', ';'),
    ('"', '\''),
    ('<', ','),
    ('>', '.'),
    ('?', '/'),
];

fn unshifted_symbol(c: char) -> Option<char> {
    SHIFTED_SYMBOLS
        .iter()
        .find(|(shifted, _)| *shifted == c)
        .map(|(_, plain)| *plain)
}

/// Parse chord notation into a [`KeyCode`].
///
/// The notation is any number of prefix markers followed by one character
/// or a named key:
/// - `^-` release, `C-` ctrl, `M-` meta, `A-` alt, `S-` shift
/// - `"x"`, `"X"` (shift implied), `"C-M-x"`, `"S-Enter"`, `"ArrowUp"`
///
/// Shift is always folded into the shift bit: `"A"` and `"S-a"` encode
/// identically. Under meta a shifted symbol is recorded as its unshifted
/// key plus shift (`"M-!"` is `"M-S-1"`).
pub fn parse_chord(s: &str) -> Result<KeyCode, KeyError> {
    if s.is_empty() {
        return Err(KeyError::Empty);
    }

    let mut modifiers = Modifiers::NONE;
    let mut rest = s;
    while let Some((marker, tail)) = split_marker(rest) {
        if tail.is_empty() {
            break;
        }
        match marker {
            '^' => modifiers.release = true,
            'C' => modifiers.ctrl = true,
            'M' => modifiers.meta = true,
            'A' => modifiers.alt = true,
            _ => modifiers.shift = true,
        }
        rest = tail;
    }

    let base = key_base(rest, &mut modifiers)?;
    Ok(KeyCode::new(base, modifiers))
}

fn split_marker(s: &str) -> Option<(char, &str)> {
    let mut chars = s.chars();
    let marker = chars.next()?;
    if !matches!(marker, '^' | 'C' | 'M' | 'A' | 'S') {
        return None;
    }
    let tail = chars.as_str().strip_prefix('-')?;
    Some((marker, tail))
}

/// Resolve the key part of a chord or event, folding shift into `modifiers`.
fn key_base(key: &str, modifiers: &mut Modifiers) -> Result<u32, KeyError> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(fold_char(c, modifiers)),
        (None, _) => Err(KeyError::Empty),
        _ => named_key_code(key).ok_or_else(|| KeyError::UnknownKey(key.to_string())),
    }
}

fn fold_char(c: char, modifiers: &mut Modifiers) -> u32 {
    if modifiers.meta {
        if let Some(plain) = unshifted_symbol(c) {
            modifiers.shift = true;
            return plain as u32;
        }
    }
    if let Some(lower) = single_lowercase(c) {
        modifiers.shift = true;
        return lower as u32;
    }
    c as u32
}

/// The lowercase form of an uppercase letter, when it is a single char.
fn single_lowercase(c: char) -> Option<char> {
    if !c.is_uppercase() {
        return None;
    }
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) if l != c => Some(l),
        _ => None,
    }
}

/// The uppercase glyph for a base letter, if it folds back to that letter.
fn shifted_glyph(c: char) -> Option<char> {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) if single_lowercase(u) == Some(c) => Some(u),
        _ => None,
    }
}

/// Render a [`KeyCode`] in canonical chord notation.
///
/// Prefixes come out in the order `A-`, `M-`, `C-`, `^-`, `S-`. A shifted
/// letter prints as its uppercase glyph (`"C-A"`); any other shifted key
/// keeps the `S-` marker (`"S-Enter"`, `"M-S-1"`).
pub fn chord_string(code: KeyCode) -> String {
    let modifiers = code.modifiers();
    let mut out = String::new();
    for (held, prefix) in [
        (modifiers.alt, "A-"),
        (modifiers.meta, "M-"),
        (modifiers.ctrl, "C-"),
        (modifiers.release, "^-"),
    ] {
        if held {
            out.push_str(prefix);
        }
    }

    let base = code.base();
    if let Some(name) = key_name(base) {
        if modifiers.shift {
            out.push_str("S-");
        }
        out.push_str(&name);
        return out;
    }

    match char::from_u32(base) {
        Some(c) => match shifted_glyph(c) {
            Some(upper) if modifiers.shift => out.push(upper),
            _ => {
                if modifiers.shift {
                    out.push_str("S-");
                }
                out.push(c);
            }
        },
        None => {
            if modifiers.shift {
                out.push_str("S-");
            }
            out.push_str(&format!("#{base}"));
        }
    }
    out
}

/// Encode a raw key event.
///
/// With alt held the physical key (`code`) is used instead of the produced
/// character, which the OS may have replaced with a dead key or composed
/// glyph. The event's modifier flags are OR'd into the result.
pub fn encode_event(event: &RawKeyEvent) -> Result<KeyCode, KeyError> {
    let physical;
    let key = if event.alt && !event.code.is_empty() {
        physical = physical_key(&event.code);
        physical.as_str()
    } else {
        event.key.as_str()
    };

    let mut modifiers = event.modifiers();
    let base = key_base(key, &mut modifiers)?;
    Ok(KeyCode::new(base, modifiers))
}

/// Map a physical key identifier (`"KeyS"`, `"Digit1"`) to a key name.
fn physical_key(code: &str) -> String {
    let single = |rest: &str| {
        let mut chars = rest.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    };
    if let Some(c) = code.strip_prefix("Key").and_then(single) {
        return c.to_ascii_lowercase().to_string();
    }
    if let Some(c) = code.strip_prefix("Digit").and_then(single) {
        return c.to_string();
    }
    code.to_string()
}
