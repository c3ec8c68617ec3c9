//! The shared input-state snapshot.
//!
//! One authoritative snapshot lives in a [`crate::Synchronized`] cell; the
//! dispatch loop folds events into a working copy and publishes it once the
//! tick's backlog is drained. Readers copy, never alias.

use crate::vec2::Vec2;

/// Pointer position and pressed-button flags as of the last processed event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseState {
    pub position: Vec2,
    pub left_button_down: bool,
    pub right_button_down: bool,
    pub middle_button_down: bool,
}

/// What the last fully-processed tick observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub mouse: MouseState,
}
