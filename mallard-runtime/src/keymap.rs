//! Crossterm-to-engine key mapping tables.

use crossterm::event::{KeyCode, KeyModifiers as CtKeyModifiers, ModifierKeyCode};

use mallard_core::{Key, KeyModifiers};

/// Maps a crossterm key code onto the engine's closed key set. Codes with no
/// counterpart map to [`Key::Unknown`].
pub fn map_key_code(code: KeyCode) -> Key {
    match code {
        KeyCode::Enter => Key::Return,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab | KeyCode::BackTab => Key::Tab,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Delete => Key::Delete,
        KeyCode::Insert => Key::Insert,
        KeyCode::CapsLock => Key::CapsLock,
        KeyCode::ScrollLock => Key::ScrollLock,
        KeyCode::NumLock => Key::NumLockClear,
        KeyCode::PrintScreen => Key::PrintScreen,
        KeyCode::Pause => Key::Pause,
        KeyCode::Menu => Key::Menu,
        KeyCode::F(n) => map_function_key(n),
        KeyCode::Char(c) => map_char(c),
        KeyCode::Modifier(code) => map_modifier_key(code),
        _ => Key::Unknown,
    }
}

/// Flattens crossterm's modifier bitflags into the engine's modifier struct.
pub fn map_modifiers(modifiers: CtKeyModifiers) -> KeyModifiers {
    KeyModifiers {
        control: modifiers.contains(CtKeyModifiers::CONTROL),
        shift: modifiers.contains(CtKeyModifiers::SHIFT),
        alt: modifiers.contains(CtKeyModifiers::ALT),
    }
}

fn map_function_key(n: u8) -> Key {
    match n {
        1 => Key::F1,
        2 => Key::F2,
        3 => Key::F3,
        4 => Key::F4,
        5 => Key::F5,
        6 => Key::F6,
        7 => Key::F7,
        8 => Key::F8,
        9 => Key::F9,
        10 => Key::F10,
        11 => Key::F11,
        12 => Key::F12,
        13 => Key::F13,
        14 => Key::F14,
        15 => Key::F15,
        16 => Key::F16,
        17 => Key::F17,
        18 => Key::F18,
        19 => Key::F19,
        20 => Key::F20,
        21 => Key::F21,
        22 => Key::F22,
        23 => Key::F23,
        24 => Key::F24,
        _ => Key::Unknown,
    }
}

fn map_modifier_key(code: ModifierKeyCode) -> Key {
    match code {
        ModifierKeyCode::LeftShift => Key::LeftShift,
        ModifierKeyCode::RightShift => Key::RightShift,
        ModifierKeyCode::LeftControl => Key::LeftControl,
        ModifierKeyCode::RightControl => Key::RightControl,
        ModifierKeyCode::LeftAlt => Key::LeftAlt,
        ModifierKeyCode::RightAlt => Key::RightAlt,
        _ => Key::Unknown,
    }
}

fn map_char(c: char) -> Key {
    match c.to_ascii_lowercase() {
        'a' => Key::A,
        'b' => Key::B,
        'c' => Key::C,
        'd' => Key::D,
        'e' => Key::E,
        'f' => Key::F,
        'g' => Key::G,
        'h' => Key::H,
        'i' => Key::I,
        'j' => Key::J,
        'k' => Key::K,
        'l' => Key::L,
        'm' => Key::M,
        'n' => Key::N,
        'o' => Key::O,
        'p' => Key::P,
        'q' => Key::Q,
        'r' => Key::R,
        's' => Key::S,
        't' => Key::T,
        'u' => Key::U,
        'v' => Key::V,
        'w' => Key::W,
        'x' => Key::X,
        'y' => Key::Y,
        'z' => Key::Z,
        '0' => Key::Zero,
        '1' => Key::One,
        '2' => Key::Two,
        '3' => Key::Three,
        '4' => Key::Four,
        '5' => Key::Five,
        '6' => Key::Six,
        '7' => Key::Seven,
        '8' => Key::Eight,
        '9' => Key::Nine,
        ' ' => Key::Space,
        '!' => Key::Exclamation,
        '"' => Key::Quotation,
        '#' => Key::Hash,
        '$' => Key::Dollar,
        '%' => Key::Percent,
        '&' => Key::Ampersand,
        '\'' => Key::Quote,
        '(' => Key::LeftParenthesis,
        ')' => Key::RightParenthesis,
        '*' => Key::Asterisk,
        '+' => Key::Plus,
        ',' => Key::Comma,
        '-' => Key::Minus,
        '.' => Key::Period,
        '/' => Key::Slash,
        ':' => Key::Colon,
        ';' => Key::Semicolon,
        '<' => Key::LessThan,
        '=' => Key::Equals,
        '>' => Key::GreaterThan,
        '?' => Key::Question,
        '@' => Key::At,
        '[' => Key::LeftBracket,
        '\\' => Key::Backslash,
        ']' => Key::RightBracket,
        '^' => Key::Caret,
        '_' => Key::Underscore,
        _ => Key::Unknown,
    }
}
