//! The crossterm terminal backend.
//!
//! Owns the terminal mode for the lifetime of the source: raw mode plus
//! mouse, focus, and bracketed-paste reporting are enabled on construction
//! and restored on drop. Terminal happenings the engine's event model cannot
//! express are dropped here, silently.

use std::io;
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, DisableFocusChange, DisableMouseCapture, EnableBracketedPaste,
    EnableFocusChange, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton as CtMouseButton, MouseEvent, MouseEventKind,
};
use crossterm::{execute, terminal};
use tracing::warn;

use mallard_core::{EngineError, EngineResult, ErrorKind, EventSource, NativeEvent};

use crate::keymap::{map_key_code, map_modifiers};

/// A native event source backed by the controlling terminal.
pub struct TerminalEventSource {
    _private: (),
}

impl TerminalEventSource {
    /// Takes over the terminal. Failures map to [`ErrorKind::Native`].
    pub fn new() -> EngineResult<Self> {
        terminal::enable_raw_mode().map_err(native_err)?;
        execute!(
            io::stdout(),
            EnableMouseCapture,
            EnableFocusChange,
            EnableBracketedPaste
        )
        .map_err(native_err)?;
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalEventSource {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableFocusChange,
            DisableMouseCapture
        );
        let _ = terminal::disable_raw_mode();
    }
}

impl EventSource for TerminalEventSource {
    fn poll_event(&mut self) -> Option<NativeEvent> {
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => {}
                Ok(false) => return None,
                Err(err) => {
                    warn!(%err, "terminal poll failed");
                    return None;
                }
            }
            let raw = match event::read() {
                Ok(raw) => raw,
                Err(err) => {
                    warn!(%err, "terminal read failed");
                    return None;
                }
            };
            // Unmappable happenings are skipped, not surfaced.
            if let Some(native) = map_event(raw) {
                return Some(native);
            }
        }
    }
}

fn native_err(err: io::Error) -> EngineError {
    EngineError::with_message(ErrorKind::Native, err.to_string())
}

/// Translates one crossterm event into the engine's native event model.
/// `None` for events the model has no room for.
pub fn map_event(event: Event) -> Option<NativeEvent> {
    match event {
        Event::Key(key) => map_key_event(key),
        Event::Mouse(mouse) => map_mouse_event(mouse),
        Event::Resize(width, height) => Some(NativeEvent::Resized {
            width: width.into(),
            height: height.into(),
        }),
        Event::FocusGained => Some(NativeEvent::FocusGained),
        Event::FocusLost => Some(NativeEvent::FocusLost),
        Event::Paste(text) => Some(NativeEvent::TextInput { text }),
    }
}

fn map_key_event(key: KeyEvent) -> Option<NativeEvent> {
    // The terminal has no window close button; Ctrl+C is the quit request.
    if key.kind != KeyEventKind::Release
        && key.modifiers.contains(event::KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        return Some(NativeEvent::Quit);
    }

    let mapped_key = map_key_code(key.code);
    let modifiers = map_modifiers(key.modifiers);
    match key.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => Some(NativeEvent::KeyDown {
            key: mapped_key,
            modifiers,
        }),
        KeyEventKind::Release => Some(NativeEvent::KeyUp {
            key: mapped_key,
            modifiers,
        }),
    }
}

fn map_mouse_event(mouse: MouseEvent) -> Option<NativeEvent> {
    let (x, y) = (u32::from(mouse.column), u32::from(mouse.row));
    match mouse.kind {
        MouseEventKind::Down(button) => Some(NativeEvent::MouseButtonDown {
            button: button_code(button),
        }),
        MouseEventKind::Up(button) => Some(NativeEvent::MouseButtonUp {
            button: button_code(button),
        }),
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            Some(NativeEvent::MouseMotion { x, y })
        }
        MouseEventKind::ScrollUp => Some(NativeEvent::MouseScroll { x: 0, y: 1 }),
        MouseEventKind::ScrollDown => Some(NativeEvent::MouseScroll { x: 0, y: -1 }),
        MouseEventKind::ScrollLeft => Some(NativeEvent::MouseScroll { x: -1, y: 0 }),
        MouseEventKind::ScrollRight => Some(NativeEvent::MouseScroll { x: 1, y: 0 }),
    }
}

/// Conventional 1-based button numbering, matching what the state fold
/// recognizes.
fn button_code(button: CtMouseButton) -> u8 {
    match button {
        CtMouseButton::Left => 1,
        CtMouseButton::Middle => 2,
        CtMouseButton::Right => 3,
    }
}
