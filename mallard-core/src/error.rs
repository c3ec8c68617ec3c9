//! The closed error taxonomy and the uniform result type.
//!
//! Every fallible operation in the engine returns [`EngineResult`]. A caller
//! that cannot recover re-returns the error with `?` (optionally re-wrapped
//! with added context); only a call site that has already established the
//! error branch is impossible may use [`FatalUnwrap::or_fatal`], which
//! terminates the process instead of returning.

use crate::fatal::fatal;

/// What failed. Closed set; numbered so external tooling can match on codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    /// Catch-all for failures with no better classification.
    Unknown = 1,
    /// The native input/window layer reported a failure.
    Native,
    /// Operation invalid in the current lifecycle phase (e.g. loading a game twice).
    InvalidState,
    /// Malformed game data (manifest, resources).
    InvalidGame,
    Io,
    /// A value failed to parse.
    InvalidFormat,
    UnsupportedPlatform,
    /// An externally supplied discriminant had no known mapping.
    UnknownEnumVariant,
    NotImplemented,
    /// Script-layer runtime failure.
    Lua,
    LuaUnexpectedNil,
    LuaWrongType,
    /// Script environment bootstrap failure.
    LuaInit,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Native => "native",
            Self::InvalidState => "invalid state",
            Self::InvalidGame => "invalid game",
            Self::Io => "io",
            Self::InvalidFormat => "invalid format",
            Self::UnsupportedPlatform => "unsupported platform",
            Self::UnknownEnumVariant => "unknown enum variant",
            Self::NotImplemented => "not implemented",
            Self::Lua => "lua",
            Self::LuaUnexpectedNil => "lua unexpected nil",
            Self::LuaWrongType => "lua wrong type",
            Self::LuaInit => "lua init",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An engine failure: a kind from the closed taxonomy plus an optional
/// human-readable message. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} error{}", message_suffix(.message))]
pub struct EngineError {
    kind: ErrorKind,
    message: Option<String>,
}

fn message_suffix(message: &Option<String>) -> String {
    match message {
        Some(msg) => format!(": {msg}"),
        None => String::new(),
    }
}

impl EngineError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Re-wraps the error with added context, keeping the kind.
    pub fn context(self, context: impl std::fmt::Display) -> Self {
        let message = match self.message {
            Some(msg) => format!("{context}: {msg}"),
            None => context.to_string(),
        };
        Self {
            kind: self.kind,
            message: Some(message),
        }
    }
}

impl From<ErrorKind> for EngineError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::with_message(ErrorKind::Io, err.to_string())
    }
}

/// The uniform success-or-error value returned by every fallible operation.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Wrong-branch access as a contract violation.
///
/// `or_fatal` asserts "I have already established this cannot be an error
/// here"; if the assertion is wrong the process terminates through the
/// fatal-abort primitive. This is for programmer errors only — expected
/// failures propagate with `?`.
pub trait FatalUnwrap<T> {
    fn or_fatal(self) -> T;
    fn err_or_fatal(self) -> EngineError;
}

impl<T> FatalUnwrap<T> for EngineResult<T> {
    fn or_fatal(self) -> T {
        match self {
            Ok(val) => val,
            Err(err) => fatal(&format!("result isn't ok, err: {err}")),
        }
    }

    fn err_or_fatal(self) -> EngineError {
        match self {
            Ok(_) => fatal("result is ok"),
            Err(err) => err,
        }
    }
}
