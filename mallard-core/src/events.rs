//! The closed event taxonomy.
//!
//! Native events come out of an [`EventSource`] backend; the dispatch loop
//! classifies each one into exactly one [`EventKind`] and builds the matching
//! [`EventPayload`] variant from the updated state snapshot. Adding a tag
//! means adding one `EventKind` variant and one payload variant — there is
//! no open class hierarchy and no shared mutable base.

use crate::vec2::Vec2;

/// Tag identifying which kind of event a payload represents. Dense range,
/// usable as a registry index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum EventKind {
    Quitting = 0,
    LowMemory,
    EnteringBackground,
    EnteredBackground,
    EnteringForeground,
    EnteredForeground,
    Resized,
    Minimized,
    Maximized,
    Restored,
    MouseEntered,
    MouseLeft,
    FocusGained,
    FocusLost,
    KeyDown,
    KeyUp,
    MouseDown,
    MouseUp,
    MouseMove,
    MouseScroll,
    TextInput,
    TextEditing,
}

impl EventKind {
    /// Number of tags; sizes the handler registry.
    pub const COUNT: usize = 22;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quitting => "quitting",
            Self::LowMemory => "low_memory",
            Self::EnteringBackground => "entering_background",
            Self::EnteredBackground => "entered_background",
            Self::EnteringForeground => "entering_foreground",
            Self::EnteredForeground => "entered_foreground",
            Self::Resized => "resized",
            Self::Minimized => "minimized",
            Self::Maximized => "maximized",
            Self::Restored => "restored",
            Self::MouseEntered => "mouse_entered",
            Self::MouseLeft => "mouse_left",
            Self::FocusGained => "focus_gained",
            Self::FocusLost => "focus_lost",
            Self::KeyDown => "key_down",
            Self::KeyUp => "key_up",
            Self::MouseDown => "mouse_down",
            Self::MouseUp => "mouse_up",
            Self::MouseMove => "mouse_move",
            Self::MouseScroll => "mouse_scroll",
            Self::TextInput => "text_input",
            Self::TextEditing => "text_editing",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventKind {
    type Err = crate::error::EngineError;

    /// Parses the snake_case tag names produced by [`EventKind::as_str`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "quitting" => Self::Quitting,
            "low_memory" => Self::LowMemory,
            "entering_background" => Self::EnteringBackground,
            "entered_background" => Self::EnteredBackground,
            "entering_foreground" => Self::EnteringForeground,
            "entered_foreground" => Self::EnteredForeground,
            "resized" => Self::Resized,
            "minimized" => Self::Minimized,
            "maximized" => Self::Maximized,
            "restored" => Self::Restored,
            "mouse_entered" => Self::MouseEntered,
            "mouse_left" => Self::MouseLeft,
            "focus_gained" => Self::FocusGained,
            "focus_lost" => Self::FocusLost,
            "key_down" => Self::KeyDown,
            "key_up" => Self::KeyUp,
            "mouse_down" => Self::MouseDown,
            "mouse_up" => Self::MouseUp,
            "mouse_move" => Self::MouseMove,
            "mouse_scroll" => Self::MouseScroll,
            "text_input" => Self::TextInput,
            "text_editing" => Self::TextEditing,
            other => {
                return Err(crate::error::EngineError::with_message(
                    crate::error::ErrorKind::UnknownEnumVariant,
                    format!("unknown event name: {other}"),
                ))
            }
        })
    }
}

/// A pointer button. Raw codes follow the conventional 1-based numbering of
/// the native layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Extra1,
    Extra2,
}

impl MouseButton {
    /// Maps a raw native button code; `None` for unrecognized codes (the
    /// dispatch loop warns and skips those).
    pub fn from_raw(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Left),
            2 => Some(Self::Middle),
            3 => Some(Self::Right),
            4 => Some(Self::Extra1),
            5 => Some(Self::Extra2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Middle => "middle",
            Self::Right => "right",
            Self::Extra1 => "extra1",
            Self::Extra2 => "extra2",
        }
    }
}

/// Keyboard keys recognized by the engine. Closed set; backends map their
/// native codes onto it and report everything else as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Unknown,
    Return,
    Escape,
    Backspace,
    Tab,
    Space,
    Exclamation,
    Quotation,
    Hash,
    Percent,
    Dollar,
    Ampersand,
    Quote,
    LeftParenthesis,
    RightParenthesis,
    Asterisk,
    Plus,
    Comma,
    Minus,
    Period,
    Slash,
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Colon,
    Semicolon,
    LessThan,
    Equals,
    GreaterThan,
    Question,
    At,
    LeftBracket,
    Backslash,
    RightBracket,
    Caret,
    Underscore,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    CapsLock,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    PrintScreen,
    ScrollLock,
    Pause,
    Insert,
    Home,
    PageUp,
    Delete,
    End,
    PageDown,
    Right,
    Left,
    Down,
    Up,
    NumLockClear,
    KeypadDivide,
    KeypadMultiply,
    KeypadMinus,
    KeypadPlus,
    KeypadEnter,
    Keypad0,
    Keypad1,
    Keypad2,
    Keypad3,
    Keypad4,
    Keypad5,
    Keypad6,
    Keypad7,
    Keypad8,
    Keypad9,
    KeypadPeriod,
    KeypadEquals,
    Application,
    Power,
    F13,
    F14,
    F15,
    F16,
    F17,
    F18,
    F19,
    F20,
    F21,
    F22,
    F23,
    F24,
    Execute,
    Help,
    Menu,
    Select,
    Stop,
    Again,
    Undo,
    Cut,
    Copy,
    Paste,
    Find,
    Mute,
    VolumeUp,
    VolumeDown,
    LeftAlt,
    RightAlt,
    LeftControl,
    RightControl,
    LeftShift,
    RightShift,
}

/// Modifier flags accompanying a key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub control: bool,
    pub shift: bool,
    pub alt: bool,
}

/// An event as produced by the native source, before classification. Button
/// codes are raw; positions are absolute window coordinates. Happenings the
/// backend cannot express here are dropped at the backend, silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeEvent {
    Quit,
    LowMemory,
    EnteringBackground,
    EnteredBackground,
    EnteringForeground,
    EnteredForeground,
    Resized { width: u32, height: u32 },
    Minimized,
    Maximized,
    Restored,
    MouseEntered,
    MouseLeft,
    FocusGained,
    FocusLost,
    KeyDown { key: Key, modifiers: KeyModifiers },
    KeyUp { key: Key, modifiers: KeyModifiers },
    MouseMotion { x: u32, y: u32 },
    MouseButtonDown { button: u8 },
    MouseButtonUp { button: u8 },
    MouseScroll { x: i32, y: i32 },
    TextInput { text: String },
    TextEditing { text: String },
}

/// The event data passed to a handler, derived from the *updated* state
/// snapshot. Exactly one variant per [`EventKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    Quitting,
    LowMemory,
    EnteringBackground,
    EnteredBackground,
    EnteringForeground,
    EnteredForeground,
    Resized { width: u32, height: u32 },
    Minimized,
    Maximized,
    Restored,
    MouseEntered { position: Vec2 },
    MouseLeft { position: Vec2 },
    FocusGained,
    FocusLost,
    KeyDown { key: Key, modifiers: KeyModifiers },
    KeyUp { key: Key, modifiers: KeyModifiers },
    MouseDown { position: Vec2, button: MouseButton },
    MouseUp { position: Vec2, button: MouseButton },
    MouseMove { position: Vec2 },
    MouseScroll { x: i32, y: i32 },
    TextInput { text: String },
    TextEditing { text: String },
}

impl EventPayload {
    /// The tag this payload belongs to.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Quitting => EventKind::Quitting,
            Self::LowMemory => EventKind::LowMemory,
            Self::EnteringBackground => EventKind::EnteringBackground,
            Self::EnteredBackground => EventKind::EnteredBackground,
            Self::EnteringForeground => EventKind::EnteringForeground,
            Self::EnteredForeground => EventKind::EnteredForeground,
            Self::Resized { .. } => EventKind::Resized,
            Self::Minimized => EventKind::Minimized,
            Self::Maximized => EventKind::Maximized,
            Self::Restored => EventKind::Restored,
            Self::MouseEntered { .. } => EventKind::MouseEntered,
            Self::MouseLeft { .. } => EventKind::MouseLeft,
            Self::FocusGained => EventKind::FocusGained,
            Self::FocusLost => EventKind::FocusLost,
            Self::KeyDown { .. } => EventKind::KeyDown,
            Self::KeyUp { .. } => EventKind::KeyUp,
            Self::MouseDown { .. } => EventKind::MouseDown,
            Self::MouseUp { .. } => EventKind::MouseUp,
            Self::MouseMove { .. } => EventKind::MouseMove,
            Self::MouseScroll { .. } => EventKind::MouseScroll,
            Self::TextInput { .. } => EventKind::TextInput,
            Self::TextEditing { .. } => EventKind::TextEditing,
        }
    }
}

/// A native event source: non-blocking "pop next pending event, or none".
pub trait EventSource {
    fn poll_event(&mut self) -> Option<NativeEvent>;
}

/// A source over a pre-queued list of events. The production backend lives
/// in the runtime crate; this one backs tests and headless use.
#[derive(Debug, Default)]
pub struct QueuedEventSource {
    queue: std::collections::VecDeque<NativeEvent>,
}

impl QueuedEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: NativeEvent) {
        self.queue.push_back(event);
    }
}

impl EventSource for QueuedEventSource {
    fn poll_event(&mut self) -> Option<NativeEvent> {
        self.queue.pop_front()
    }
}

impl Extend<NativeEvent> for QueuedEventSource {
    fn extend<I: IntoIterator<Item = NativeEvent>>(&mut self, iter: I) {
        self.queue.extend(iter);
    }
}
