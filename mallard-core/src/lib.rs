//! # Mallard Core
//!
//! The engine library: typed error propagation, the synchronized input-state
//! cell, the event taxonomy and handler registry, and the dispatch loop that
//! folds native events into shared state once per tick.
//!
//! The UI-facing runtime holds one [`Engine`] and drives it; scripting
//! attaches handlers through [`EventEngine::set_handler`].

pub mod config;
pub mod engine;
pub mod error;
pub mod event_engine;
pub mod events;
pub mod fatal;
pub mod game;
pub mod platform;
pub mod registry;
pub mod state;
pub mod sync;
pub mod vec2;
pub mod version;

// Re-export the main types so users can just use `mallard_core::Engine`
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{EngineError, EngineResult, ErrorKind, FatalUnwrap};
pub use event_engine::EventEngine;
pub use events::{EventKind, EventPayload, EventSource, Key, KeyModifiers, MouseButton, NativeEvent};
pub use registry::DispatchPolicy;
pub use state::{InputState, MouseState};
pub use sync::Synchronized;
pub use vec2::Vec2;
