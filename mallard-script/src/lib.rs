//! # Mallard Script
//!
//! The Lua 5.4 scripting layer. A [`ScriptEngine`] owns one Lua state,
//! installs the engine globals (logging, `quit`, `on_event`), runs game
//! scripts, and adapts Lua functions into event handlers the dispatch loop
//! can invoke.
//!
//! Script failures travel back as [`EngineResult`] values in the `Lua*`
//! region of the error taxonomy; only an out-of-memory report from the Lua
//! allocator terminates the process, since no result boundary exists there.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mlua::{Function, Lua, Table};
use tracing::{trace, warn};
use walkdir::WalkDir;

use mallard_core::fatal::fatal_critical;
use mallard_core::registry::EventHandler;
use mallard_core::{EngineError, EngineResult, ErrorKind, EventKind, EventPayload};

/// One Lua state plus the engine bindings installed into it.
///
/// Not `Send`: the Lua state and every handler derived from it stay on the
/// thread that drives the engine.
pub struct ScriptEngine {
    lua: Lua,
    running: Arc<AtomicBool>,
    registrations: Rc<RefCell<Vec<(EventKind, Function)>>>,
}

impl ScriptEngine {
    /// Boots a fresh Lua state and installs the engine globals. Any failure
    /// while installing maps to [`ErrorKind::LuaInit`].
    pub fn new(running: Arc<AtomicBool>) -> EngineResult<Self> {
        let engine = Self {
            lua: Lua::new(),
            running,
            registrations: Rc::new(RefCell::new(Vec::new())),
        };
        engine.install_globals().map_err(|err| {
            EngineError::with_message(ErrorKind::LuaInit, err.to_string())
        })?;
        Ok(engine)
    }

    /// The raw Lua state, for callers that need direct access (tests, the
    /// runtime's script lookups).
    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    fn install_globals(&self) -> mlua::Result<()> {
        let globals = self.lua.globals();

        globals.set(
            "debug",
            self.lua.create_function(|_, message: String| {
                tracing::debug!(target: "lua", "{message}");
                Ok(())
            })?,
        )?;
        globals.set(
            "info",
            self.lua.create_function(|_, message: String| {
                tracing::info!(target: "lua", "{message}");
                Ok(())
            })?,
        )?;
        globals.set(
            "warn",
            self.lua.create_function(|_, message: String| {
                tracing::warn!(target: "lua", "{message}");
                Ok(())
            })?,
        )?;
        globals.set(
            "err",
            self.lua.create_function(|_, message: String| {
                tracing::error!(target: "lua", "{message}");
                Ok(())
            })?,
        )?;

        let running = self.running.clone();
        globals.set(
            "quit",
            self.lua.create_function(move |_, ()| {
                trace!("quit requested from script");
                running.store(false, Ordering::SeqCst);
                Ok(())
            })?,
        )?;

        let registrations = self.registrations.clone();
        globals.set(
            "on_event",
            self.lua
                .create_function(move |_, (name, function): (String, Function)| {
                    let kind: EventKind =
                        name.parse().map_err(mlua::Error::external)?;
                    registrations.borrow_mut().push((kind, function));
                    Ok(())
                })?,
        )?;

        Ok(())
    }

    /// Runs a Lua chunk in the engine's state.
    pub fn execute(&self, source: &str) -> EngineResult<()> {
        self.lua.load(source).exec().map_err(map_lua_error)
    }

    /// Reads and runs a Lua file.
    pub fn execute_file(&self, path: &Path) -> EngineResult<()> {
        trace!(path = %path.display(), "executing lua file");
        let source = std::fs::read_to_string(path)
            .map_err(|err| EngineError::from(err).context(path.display()))?;
        self.execute(&source)
    }

    /// Runs every `.lua` file under `dir`, recursively, in path order. A
    /// missing directory is a warning only; the engine runs without runtime
    /// libraries.
    pub fn load_libs(&self, dir: &Path) -> EngineResult<()> {
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "no script library directory, skipping");
            return Ok(());
        }

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry
                .map_err(|err| EngineError::with_message(ErrorKind::Io, err.to_string()))?;
            let is_lua = entry.path().extension().is_some_and(|ext| ext == "lua");
            if entry.file_type().is_file() && is_lua {
                self.execute_file(entry.path())?;
            }
        }
        Ok(())
    }

    /// Handlers the scripts registered through `on_event` since the last
    /// drain, in registration order. The caller installs them into the
    /// dispatch loop.
    pub fn drain_handler_registrations(&self) -> Vec<(EventKind, EventHandler)> {
        self.registrations
            .borrow_mut()
            .drain(..)
            .map(|(kind, function)| (kind, self.event_handler(function)))
            .collect()
    }

    /// Adapts a Lua function into a dispatch-loop handler. The payload is
    /// marshalled into a table carrying the tag name plus the variant's
    /// fields; a Lua error becomes an engine error of kind `Lua`.
    pub fn event_handler(&self, function: Function) -> EventHandler {
        let lua = self.lua.clone();
        Box::new(move |payload| {
            let table = payload_to_table(&lua, payload).map_err(map_lua_error)?;
            function.call::<()>(table).map_err(map_lua_error)
        })
    }
}

impl std::fmt::Debug for ScriptEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptEngine")
            .field("running", &self.running.load(Ordering::SeqCst))
            .field("pending_registrations", &self.registrations.borrow().len())
            .finish()
    }
}

/// Maps an mlua failure into the engine taxonomy. Allocation failure in the
/// script runtime has no recovery path and terminates the process.
fn map_lua_error(err: mlua::Error) -> EngineError {
    map_lua_error_ref(&err)
}

fn map_lua_error_ref(err: &mlua::Error) -> EngineError {
    match err {
        mlua::Error::MemoryError(message) => fatal_critical(message),
        // An engine error raised inside a Rust callback comes back wrapped;
        // unwrap it so the original kind survives the round trip.
        mlua::Error::CallbackError { cause, .. } => map_lua_error_ref(cause),
        mlua::Error::ExternalError(external) => {
            match external.downcast_ref::<EngineError>() {
                Some(engine_err) => engine_err.clone(),
                None => EngineError::with_message(ErrorKind::Lua, external.to_string()),
            }
        }
        mlua::Error::FromLuaConversionError { from, .. } if *from == "nil" => {
            EngineError::with_message(ErrorKind::LuaUnexpectedNil, err.to_string())
        }
        mlua::Error::FromLuaConversionError { .. }
        | mlua::Error::ToLuaConversionError { .. } => {
            EngineError::with_message(ErrorKind::LuaWrongType, err.to_string())
        }
        _ => EngineError::with_message(ErrorKind::Lua, err.to_string()),
    }
}

fn vec2_table(lua: &Lua, position: mallard_core::Vec2) -> mlua::Result<Table> {
    let table = lua.create_table()?;
    table.set("x", position.x)?;
    table.set("y", position.y)?;
    Ok(table)
}

/// Builds the Lua-side view of an event payload: `event` holds the tag name,
/// the remaining fields mirror the variant.
fn payload_to_table(lua: &Lua, payload: &EventPayload) -> mlua::Result<Table> {
    let table = lua.create_table()?;
    table.set("event", payload.kind().as_str())?;

    match payload {
        EventPayload::Resized { width, height } => {
            table.set("width", *width)?;
            table.set("height", *height)?;
        }
        EventPayload::MouseEntered { position }
        | EventPayload::MouseLeft { position }
        | EventPayload::MouseMove { position } => {
            table.set("position", vec2_table(lua, *position)?)?;
        }
        EventPayload::MouseDown { position, button }
        | EventPayload::MouseUp { position, button } => {
            table.set("position", vec2_table(lua, *position)?)?;
            table.set("button", button.as_str())?;
        }
        EventPayload::KeyDown { key, modifiers } | EventPayload::KeyUp { key, modifiers } => {
            table.set("key", format!("{key:?}"))?;
            let mods = lua.create_table()?;
            mods.set("control", modifiers.control)?;
            mods.set("shift", modifiers.shift)?;
            mods.set("alt", modifiers.alt)?;
            table.set("modifiers", mods)?;
        }
        EventPayload::MouseScroll { x, y } => {
            table.set("x", *x)?;
            table.set("y", *y)?;
        }
        EventPayload::TextInput { text } | EventPayload::TextEditing { text } => {
            table.set("text", text.as_str())?;
        }
        EventPayload::Quitting
        | EventPayload::LowMemory
        | EventPayload::EnteringBackground
        | EventPayload::EnteredBackground
        | EventPayload::EnteringForeground
        | EventPayload::EnteredForeground
        | EventPayload::Minimized
        | EventPayload::Maximized
        | EventPayload::Restored
        | EventPayload::FocusGained
        | EventPayload::FocusLost => {}
    }

    Ok(table)
}
