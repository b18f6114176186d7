//! Integer key codes.
//!
//! A [`KeyCode`] packs a base key value and five modifier bits into one
//! comparable integer, so keymaps can be plain hash maps.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shift was held.
pub const SHIFT: u64 = 512;
/// Control was held.
pub const CTRL: u64 = 1024;
/// Meta (Command / Super) was held.
pub const META: u64 = 2048;
/// Alt (Option) was held.
pub const ALT: u64 = 4096;
/// The event is a key release rather than a press.
pub const KEYUP: u64 = 8192;

const MODIFIER_MASK: u64 = SHIFT | CTRL | META | ALT | KEYUP;
const CHORD_MASK: u64 = CTRL | META | ALT | KEYUP;
const LOW_BASE_MASK: u64 = SHIFT - 1;
// Bases that would overlap the modifier bits live above them.
const WIDE_BASE_SHIFT: u32 = 16;

/// Modifier state of a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    /// Key release (`^-` in chord notation)
    pub release: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        meta: false,
        alt: false,
        release: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };

    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };

    /// The modifier bits as they appear in a [`KeyCode`].
    pub fn bits(&self) -> u64 {
        (if self.shift { SHIFT } else { 0 })
            | (if self.ctrl { CTRL } else { 0 })
            | (if self.meta { META } else { 0 })
            | (if self.alt { ALT } else { 0 })
            | (if self.release { KEYUP } else { 0 })
    }

    /// Read modifier bits back out of a raw code.
    pub fn from_bits(bits: u64) -> Self {
        Self {
            shift: bits & SHIFT != 0,
            ctrl: bits & CTRL != 0,
            meta: bits & META != 0,
            alt: bits & ALT != 0,
            release: bits & KEYUP != 0,
        }
    }

    /// True if any modifier other than shift is set.
    pub fn is_chord(&self) -> bool {
        self.ctrl || self.meta || self.alt || self.release
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self::from_bits(self.bits() | rhs.bits())
    }
}

/// A base key plus modifier bits, encoded as a single integer.
///
/// Two codes are equal iff the base and every modifier bit match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyCode(u64);

impl KeyCode {
    /// Combine a base value with modifiers.
    pub fn new(base: u32, modifiers: Modifiers) -> Self {
        let base = u64::from(base);
        let base = if base <= LOW_BASE_MASK {
            base
        } else {
            base << WIDE_BASE_SHIFT
        };
        Self(base | modifiers.bits())
    }

    /// Wrap a raw code without validation.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw integer.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// The base key value with modifiers stripped.
    pub fn base(self) -> u32 {
        let wide = self.0 >> WIDE_BASE_SHIFT;
        if wide != 0 {
            wide as u32
        } else {
            (self.0 & LOW_BASE_MASK) as u32
        }
    }

    pub fn modifiers(self) -> Modifiers {
        Modifiers::from_bits(self.0 & MODIFIER_MASK)
    }

    /// Add modifiers to this code.
    pub fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self(self.0 | modifiers.bits())
    }

    /// A "plain" press: no ctrl, meta, alt or release bit. Shift is allowed.
    pub fn is_plain(self) -> bool {
        self.0 & CHORD_MASK == 0
    }

    /// The base as a character, when it is not a named key.
    pub fn base_char(self) -> Option<char> {
        let base = self.base();
        if key_name(base).is_some() {
            return None;
        }
        char::from_u32(base)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::parser::chord_string(*self))
    }
}

/// Canonical names of non-printable keys.
///
/// Codes sit below 128 where ASCII leaves room, so arrows and the like
/// never collide with printable characters.
const NAMED_KEYS: &[(&str, u32)] = &[
    ("Home", 2),
    ("End", 3),
    ("Bel", 7),
    ("Backspace", 8),
    ("Tab", 9),
    ("PageUp", 11),
    ("PageDown", 12),
    ("Enter", 13),
    ("Insert", 14),
    ("Shift", 16),
    ("Control", 17),
    ("Alt", 18),
    ("AltRight", 19),
    ("Meta", 20),
    ("MetaRight", 21),
    ("Escape", 27),
    ("ArrowLeft", 28),
    ("ArrowRight", 29),
    ("ArrowUp", 30),
    ("ArrowDown", 31),
    ("Space", 32),
    ("Delete", 127),
];

const ALIASES: &[(&str, &str)] = &[
    ("Esc", "Escape"),
    ("Return", "Enter"),
    ("Del", "Delete"),
    ("BS", "Backspace"),
    ("Left", "ArrowLeft"),
    ("Right", "ArrowRight"),
    ("Up", "ArrowUp"),
    ("Down", "ArrowDown"),
    ("PgUp", "PageUp"),
    ("PgDn", "PageDown"),
    ("Spacebar", "Space"),
    ("Ctrl", "Control"),
    ("ControlLeft", "Control"),
    ("ControlRight", "Control"),
    ("ShiftLeft", "Shift"),
    ("ShiftRight", "Shift"),
    ("AltLeft", "Alt"),
    ("MetaLeft", "Meta"),
    ("OS", "Meta"),
];

const FUNCTION_KEY_BASE: u32 = 128;
const FUNCTION_KEYS: u32 = 12;

/// Look up the code of a named key (`"Enter"`, `"ArrowUp"`, `"F5"`, ...).
///
/// Exact spelling wins; otherwise the match is case-insensitive.
pub fn named_key_code(name: &str) -> Option<u32> {
    let exact = |name: &str| {
        NAMED_KEYS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, code)| *code)
            .or_else(|| {
                ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == name)
                    .and_then(|(_, canonical)| NAMED_KEYS.iter().find(|(n, _)| n == canonical))
                    .map(|(_, code)| *code)
            })
    };
    if let Some(code) = exact(name) {
        return Some(code);
    }

    let folded = NAMED_KEYS
        .iter()
        .map(|(n, _)| *n)
        .chain(ALIASES.iter().map(|(alias, _)| *alias))
        .find(|n| n.eq_ignore_ascii_case(name));
    if let Some(n) = folded {
        return exact(n);
    }

    function_key_code(name)
}

fn function_key_code(name: &str) -> Option<u32> {
    let digits = name.strip_prefix('F').or_else(|| name.strip_prefix('f'))?;
    let n: u32 = digits.parse().ok()?;
    (1..=FUNCTION_KEYS)
        .contains(&n)
        .then_some(FUNCTION_KEY_BASE + n)
}

/// Canonical name for a base code, if it is a named key.
pub fn key_name(base: u32) -> Option<String> {
    if let Some((name, _)) = NAMED_KEYS.iter().find(|(_, code)| *code == base) {
        return Some((*name).to_string());
    }
    let n = base.checked_sub(FUNCTION_KEY_BASE)?;
    (1..=FUNCTION_KEYS)
        .contains(&n)
        .then(|| format!("F{n}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_bits() {
        let mods = Modifiers::CTRL | Modifiers::SHIFT;
        assert_eq!(mods.bits(), CTRL | SHIFT);
        assert_eq!(Modifiers::from_bits(mods.bits()), mods);
        assert!(mods.is_chord());
        assert!(!Modifiers::SHIFT.is_chord());
    }

    #[test]
    fn test_code_layout() {
        let code = KeyCode::new('a' as u32, Modifiers::CTRL);
        assert_eq!(code.raw(), 97 | CTRL);
        assert_eq!(code.base(), 97);
        assert!(code.modifiers().ctrl);
        assert!(!code.is_plain());
        assert!(KeyCode::new('a' as u32, Modifiers::SHIFT).is_plain());
    }

    #[test]
    fn test_wide_base_does_not_alias_modifiers() {
        // U+044F would read as CTRL + 'O' if stored in the low bits.
        let ya = KeyCode::new('я' as u32, Modifiers::NONE);
        assert_eq!(ya.base(), 'я' as u32);
        assert_eq!(ya.modifiers(), Modifiers::NONE);
        assert!(ya.is_plain());
        assert_ne!(ya, KeyCode::new('O' as u32, Modifiers::CTRL));

        let chord = ya.with_modifiers(Modifiers::META);
        assert_eq!(chord.base(), 'я' as u32);
        assert!(chord.modifiers().meta);
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(named_key_code("Enter"), Some(13));
        assert_eq!(named_key_code("Return"), Some(13));
        assert_eq!(named_key_code("escape"), Some(27));
        assert_eq!(named_key_code("ArrowLeft"), Some(28));
        assert_eq!(named_key_code("F5"), Some(133));
        assert_eq!(named_key_code("F13"), None);
        assert_eq!(named_key_code("Hyper"), None);

        assert_eq!(key_name(13).as_deref(), Some("Enter"));
        assert_eq!(key_name(32).as_deref(), Some("Space"));
        assert_eq!(key_name(133).as_deref(), Some("F5"));
        assert_eq!(key_name('a' as u32), None);
    }

    #[test]
    fn test_arrows_distinct_from_printables() {
        for name in ["ArrowLeft", "ArrowRight", "ArrowUp", "ArrowDown", "Home", "End"] {
            let code = named_key_code(name).unwrap();
            let c = char::from_u32(code).unwrap();
            assert!(!c.is_ascii_graphic(), "{name} collides with {c:?}");
        }
    }
}
