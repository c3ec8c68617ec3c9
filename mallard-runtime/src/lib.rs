//! # Mallard Runtime
//!
//! The production event backend: a crossterm-based [`TerminalEventSource`]
//! that feeds terminal input into the engine's native event model, plus the
//! key mapping tables it uses.

pub mod backend;
pub mod keymap;

pub use backend::{map_event, TerminalEventSource};
