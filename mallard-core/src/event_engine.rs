//! The event dispatch loop.
//!
//! One [`EventEngine::update`] call is one tick: it drains the entire backlog
//! of the native source, folds every event into a working copy of the input
//! state in arrival order, and invokes at most one registered handler per
//! event with a payload built from the updated copy. The loop is the only
//! writer of the shared state cell.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{error, trace, warn};

use crate::error::EngineResult;
use crate::events::{EventKind, EventPayload, EventSource, MouseButton, NativeEvent};
use crate::registry::{DispatchPolicy, EventHandler, HandlerRegistry};
use crate::state::InputState;
use crate::sync::Synchronized;

/// Polls a native event source once per tick and keeps the shared input
/// state and the script-facing handlers in sync with it.
pub struct EventEngine<S> {
    source: S,
    running: Arc<AtomicBool>,
    state: Arc<Synchronized<InputState>>,
    registry: HandlerRegistry,
}

impl<S: EventSource> EventEngine<S> {
    pub fn new(
        source: S,
        running: Arc<AtomicBool>,
        state: Arc<Synchronized<InputState>>,
    ) -> Self {
        Self {
            source,
            running,
            state,
            registry: HandlerRegistry::new(),
        }
    }

    /// Registers `handler` for `kind`; replaces any existing handler.
    pub fn set_handler(&mut self, kind: EventKind, handler: EventHandler) {
        self.registry.set_handler(kind, handler);
    }

    /// Overrides the handler-failure policy for `kind`.
    pub fn set_policy(&mut self, kind: EventKind, policy: DispatchPolicy) {
        self.registry.set_policy(kind, policy);
    }

    /// Race-free copy of the last published snapshot.
    pub fn copy_state(&self) -> InputState {
        self.state.copy()
    }

    /// Processes the entire currently-available backlog, then returns.
    ///
    /// Events are folded and dispatched in the exact order the source
    /// produced them. A handler error on a `Propagate`-policy kind stops
    /// the drain; the state mutated so far is still published so no event's
    /// fold is lost.
    pub fn update(&mut self) -> EngineResult<()> {
        let mut state = self.state.copy();

        while let Some(event) = self.source.poll_event() {
            let payload = match self.fold(&mut state, event) {
                Some(payload) => payload,
                None => continue,
            };

            let kind = payload.kind();
            if let Err(err) = self.registry.invoke(&payload) {
                match self.registry.policy(kind) {
                    DispatchPolicy::Propagate => {
                        error!(event = %kind, %err, "event handler failed");
                        *self.state.lock() = state;
                        return Err(err);
                    }
                    DispatchPolicy::LogAndContinue => {
                        warn!(event = %kind, %err, "event handler failed, continuing");
                    }
                }
            }
        }

        *self.state.lock() = state;
        Ok(())
    }

    /// Folds one native event into the working state and derives its
    /// payload. `None` means the event produced nothing to dispatch.
    fn fold(&mut self, state: &mut InputState, event: NativeEvent) -> Option<EventPayload> {
        match event {
            NativeEvent::Quit => {
                trace!("quit event");
                // Cleared before the handler runs, so a failing quit handler
                // cannot keep the driver loop alive.
                self.running.store(false, Ordering::SeqCst);
                Some(EventPayload::Quitting)
            }

            NativeEvent::LowMemory => {
                warn!("memory is low");
                Some(EventPayload::LowMemory)
            }

            NativeEvent::MouseMotion { x, y } => {
                state.mouse.position.x = x;
                state.mouse.position.y = y;
                Some(EventPayload::MouseMove {
                    position: state.mouse.position,
                })
            }

            NativeEvent::MouseButtonDown { button } => {
                trace!(button, "mouse button down");
                let button = self.fold_button(state, button, true)?;
                Some(EventPayload::MouseDown {
                    position: state.mouse.position,
                    button,
                })
            }

            NativeEvent::MouseButtonUp { button } => {
                trace!(button, "mouse button up");
                let button = self.fold_button(state, button, false)?;
                Some(EventPayload::MouseUp {
                    position: state.mouse.position,
                    button,
                })
            }

            NativeEvent::KeyDown { key, modifiers } => {
                Some(EventPayload::KeyDown { key, modifiers })
            }
            NativeEvent::KeyUp { key, modifiers } => Some(EventPayload::KeyUp { key, modifiers }),

            NativeEvent::Resized { width, height } => {
                Some(EventPayload::Resized { width, height })
            }

            NativeEvent::MouseEntered => Some(EventPayload::MouseEntered {
                position: state.mouse.position,
            }),
            NativeEvent::MouseLeft => Some(EventPayload::MouseLeft {
                position: state.mouse.position,
            }),

            NativeEvent::MouseScroll { x, y } => Some(EventPayload::MouseScroll { x, y }),
            NativeEvent::TextInput { text } => Some(EventPayload::TextInput { text }),
            NativeEvent::TextEditing { text } => Some(EventPayload::TextEditing { text }),

            NativeEvent::EnteringBackground => Some(EventPayload::EnteringBackground),
            NativeEvent::EnteredBackground => Some(EventPayload::EnteredBackground),
            NativeEvent::EnteringForeground => Some(EventPayload::EnteringForeground),
            NativeEvent::EnteredForeground => Some(EventPayload::EnteredForeground),
            NativeEvent::Minimized => Some(EventPayload::Minimized),
            NativeEvent::Maximized => Some(EventPayload::Maximized),
            NativeEvent::Restored => Some(EventPayload::Restored),
            NativeEvent::FocusGained => Some(EventPayload::FocusGained),
            NativeEvent::FocusLost => Some(EventPayload::FocusLost),
        }
    }

    /// Flips the pressed flag for a recognized button; warns and yields
    /// `None` for unrecognized codes. Extra buttons carry no state flag.
    fn fold_button(&self, state: &mut InputState, code: u8, down: bool) -> Option<MouseButton> {
        let button = match MouseButton::from_raw(code) {
            Some(button) => button,
            None => {
                warn!(code, "unknown mouse button");
                return None;
            }
        };
        match button {
            MouseButton::Left => state.mouse.left_button_down = down,
            MouseButton::Right => state.mouse.right_button_down = down,
            MouseButton::Middle => state.mouse.middle_button_down = down,
            MouseButton::Extra1 | MouseButton::Extra2 => {}
        }
        Some(button)
    }
}

impl<S> std::fmt::Debug for EventEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEngine")
            .field("running", &self.running.load(Ordering::SeqCst))
            .field("registry", &self.registry)
            .finish()
    }
}
