//! Testing utilities for easel widgets.
//!
//! - Key input sequences replayed through a [`easel_keybinds::KeyBinder`]
//! - A recording [`easel_widgets::Host`] with a controllable clipboard
//! - Property-based testing generators

pub mod fixtures;
pub mod generators;
pub mod input;

pub use fixtures::{Fixtures, RecordingHost};
pub use input::{InputPatterns, KeySequence, Stroke};
