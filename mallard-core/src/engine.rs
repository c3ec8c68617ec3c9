//! The engine composition root and outer driver loop.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, trace, warn};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult, ErrorKind};
use crate::event_engine::EventEngine;
use crate::events::EventSource;
use crate::game::Game;
use crate::platform::Platform;
use crate::state::InputState;
use crate::sync::Synchronized;

/// How long the driver loop sleeps between ticks. There is no renderer in
/// this build to pace the loop, so pacing lives here.
const FRAME_INTERVAL: Duration = Duration::from_millis(8);

/// The main entry point for the engine. The runtime holds one instance of
/// this and drives it.
///
/// All cross-component wiring is explicit: the running flag and the state
/// cell are created here and handed out as shared handles, never as a web
/// of mutual ownership.
pub struct Engine<S> {
    config: EngineConfig,
    game: Option<Game>,
    running: Arc<AtomicBool>,
    state: Arc<Synchronized<InputState>>,
    events: EventEngine<S>,
}

impl<S: EventSource> Engine<S> {
    pub fn new(config: EngineConfig, source: S) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let state = Arc::new(Synchronized::new(InputState::default()));
        let events = EventEngine::new(source, running.clone(), state.clone());

        Self {
            config,
            game: None,
            running,
            state,
            events,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Shared handle to the running flag: the event loop writes it on quit,
    /// the driver loop and the script layer read or clear it.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// The event engine, for handler and policy registration.
    pub fn events_mut(&mut self) -> &mut EventEngine<S> {
        &mut self.events
    }

    /// Race-free copy of the shared input state.
    pub fn copy_state(&self) -> InputState {
        self.state.copy()
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    /// Loads the game at `path`. Fails with `InvalidState` if a game is
    /// already loaded.
    pub fn load_game(&mut self, path: &Path) -> EngineResult<()> {
        if self.game.is_some() {
            error!("can not load a new game as there already is one loaded");
            return Err(EngineError::with_message(
                ErrorKind::InvalidState,
                "game is already loaded",
            ));
        }

        self.game = Some(Game::load(path)?);
        Ok(())
    }

    /// One tick: drain and dispatch the pending native events.
    pub fn update(&mut self) -> EngineResult<()> {
        self.events.update()
    }

    /// Runs the driver loop until the running flag clears or a tick fails.
    ///
    /// Every iteration calls [`Self::update`] once; an error returned from a
    /// tick is fatal to the run and propagates to the caller. Cancellation
    /// is cooperative: [`Self::shutdown`] takes effect at the top of the
    /// next iteration.
    pub fn start(&mut self) -> EngineResult<()> {
        let game = self.game.as_ref().ok_or_else(|| {
            error!("no game loaded");
            EngineError::with_message(ErrorKind::InvalidState, "no game loaded")
        })?;

        if !game.supports(Platform::current())? {
            error!("platform not supported by this game");
            return Err(EngineError::with_message(
                ErrorKind::UnsupportedPlatform,
                "platform not supported",
            ));
        }

        warn!("omitting lua target check");

        trace!(game = %game.meta.title, engine = %self.config.title, "entering the main loop");

        while self.running.load(Ordering::SeqCst) {
            self.update()?;
            std::thread::sleep(FRAME_INTERVAL);
        }

        Ok(())
    }

    /// Requests cooperative shutdown; honored at the next loop iteration.
    pub fn shutdown(&self) {
        trace!("shutting down");
        self.running.store(false, Ordering::SeqCst);
    }
}

impl<S> std::fmt::Debug for Engine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("game", &self.game.as_ref().map(|g| g.meta.name.as_str()))
            .field("running", &self.running.load(Ordering::SeqCst))
            .finish()
    }
}
