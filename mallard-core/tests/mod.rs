use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mallard_core::{
    DispatchPolicy, Engine, EngineConfig, EngineError, EngineResult, ErrorKind, EventEngine,
    EventKind, EventPayload, FatalUnwrap, InputState, NativeEvent, Synchronized, Vec2,
};
use mallard_core::events::QueuedEventSource;
use mallard_core::game::Game;

fn engine_with_events(events: Vec<NativeEvent>) -> (EventEngine<QueuedEventSource>, Arc<AtomicBool>) {
    let mut source = QueuedEventSource::new();
    source.extend(events);
    let running = Arc::new(AtomicBool::new(true));
    let state = Arc::new(Synchronized::new(InputState::default()));
    (
        EventEngine::new(source, running.clone(), state),
        running,
    )
}

// ============================================================================
// Dispatch Loop Tests
// ============================================================================

#[test]
fn no_handlers_still_folds_state() {
    // pointer-move, button-down(Left), button-up(Left): success, position
    // sticks, left button released.
    let (mut engine, _running) = engine_with_events(vec![
        NativeEvent::MouseMotion { x: 10, y: 20 },
        NativeEvent::MouseButtonDown { button: 1 },
        NativeEvent::MouseButtonUp { button: 1 },
    ]);

    engine.update().unwrap();

    let state = engine.copy_state();
    assert_eq!(state.mouse.position, Vec2::new(10, 20));
    assert!(!state.mouse.left_button_down);
}

#[test]
fn button_down_sets_flag_until_release() {
    let (mut engine, _running) = engine_with_events(vec![
        NativeEvent::MouseButtonDown { button: 3 },
    ]);
    engine.update().unwrap();
    assert!(engine.copy_state().mouse.right_button_down);
}

#[test]
fn unknown_button_code_warns_and_continues() {
    let invoked = Rc::new(RefCell::new(Vec::new()));
    let (mut engine, _running) = engine_with_events(vec![
        NativeEvent::MouseButtonDown { button: 99 },
        NativeEvent::MouseMotion { x: 3, y: 4 },
    ]);

    let log = invoked.clone();
    engine.set_handler(
        EventKind::MouseMove,
        Box::new(move |payload| {
            log.borrow_mut().push(payload.clone());
            Ok(())
        }),
    );

    // Not a failure; the unrecognized button is skipped and the rest of the
    // backlog is processed.
    engine.update().unwrap();

    let state = engine.copy_state();
    assert!(!state.mouse.left_button_down);
    assert!(!state.mouse.right_button_down);
    assert!(!state.mouse.middle_button_down);
    assert_eq!(invoked.borrow().len(), 1);
}

#[test]
fn events_fold_and_dispatch_in_arrival_order() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let (mut engine, _running) = engine_with_events(vec![
        NativeEvent::MouseMotion { x: 1, y: 1 },
        NativeEvent::MouseButtonDown { button: 1 },
        NativeEvent::MouseMotion { x: 2, y: 2 },
        NativeEvent::MouseButtonUp { button: 1 },
    ]);

    let log = order.clone();
    engine.set_handler(
        EventKind::MouseMove,
        Box::new(move |payload| {
            log.borrow_mut().push(payload.clone());
            Ok(())
        }),
    );
    let log = order.clone();
    engine.set_handler(
        EventKind::MouseDown,
        Box::new(move |payload| {
            log.borrow_mut().push(payload.clone());
            Ok(())
        }),
    );
    let log = order.clone();
    engine.set_handler(
        EventKind::MouseUp,
        Box::new(move |payload| {
            log.borrow_mut().push(payload.clone());
            Ok(())
        }),
    );

    engine.update().unwrap();

    // Payload positions prove each handler saw the state *after* its own
    // event's fold, in arrival order.
    let order = order.borrow();
    assert_eq!(order.len(), 4);
    assert!(matches!(
        order[0],
        EventPayload::MouseMove { position } if position == Vec2::new(1, 1)
    ));
    assert!(matches!(
        order[1],
        EventPayload::MouseDown { position, .. } if position == Vec2::new(1, 1)
    ));
    assert!(matches!(
        order[2],
        EventPayload::MouseMove { position } if position == Vec2::new(2, 2)
    ));
    assert!(matches!(
        order[3],
        EventPayload::MouseUp { position, .. } if position == Vec2::new(2, 2)
    ));

    assert_eq!(engine.copy_state().mouse.position, Vec2::new(2, 2));
}

#[test]
fn last_registration_wins_across_updates() {
    let first = Rc::new(RefCell::new(0));
    let second = Rc::new(RefCell::new(0));
    let (mut engine, _running) =
        engine_with_events(vec![NativeEvent::MouseMotion { x: 1, y: 1 }]);

    let counter = first.clone();
    engine.set_handler(
        EventKind::MouseMove,
        Box::new(move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        }),
    );
    let counter = second.clone();
    engine.set_handler(
        EventKind::MouseMove,
        Box::new(move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        }),
    );

    engine.update().unwrap();
    assert_eq!(*first.borrow(), 0);
    assert_eq!(*second.borrow(), 1);
}

// ============================================================================
// Quit Semantics Tests
// ============================================================================

#[test]
fn quit_clears_running_flag_before_handler() {
    let observed = Rc::new(RefCell::new(None));
    let (mut engine, running) = engine_with_events(vec![NativeEvent::Quit]);

    let flag = running.clone();
    let seen = observed.clone();
    engine.set_handler(
        EventKind::Quitting,
        Box::new(move |_| {
            *seen.borrow_mut() = Some(flag.load(Ordering::SeqCst));
            Ok(())
        }),
    );

    engine.update().unwrap();
    assert_eq!(*observed.borrow(), Some(false));
    assert!(!running.load(Ordering::SeqCst));
}

#[test]
fn quit_handler_error_propagates_but_flag_is_cleared() {
    let (mut engine, running) = engine_with_events(vec![NativeEvent::Quit]);

    engine.set_handler(
        EventKind::Quitting,
        Box::new(|_| Err(EngineError::with_message(ErrorKind::Lua, "boom"))),
    );

    let err = engine.update().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lua);
    assert!(!running.load(Ordering::SeqCst));
}

// ============================================================================
// Dispatch Policy Tests
// ============================================================================

#[test]
fn log_and_continue_finishes_the_backlog() {
    let calls = Rc::new(RefCell::new(0));
    let (mut engine, _running) = engine_with_events(vec![
        NativeEvent::MouseMotion { x: 1, y: 1 },
        NativeEvent::MouseMotion { x: 2, y: 2 },
    ]);

    let counter = calls.clone();
    engine.set_handler(
        EventKind::MouseMove,
        Box::new(move |_| {
            *counter.borrow_mut() += 1;
            Err(EngineError::new(ErrorKind::Lua))
        }),
    );

    // MouseMove defaults to log-and-continue: errors are swallowed and the
    // whole backlog is drained.
    engine.update().unwrap();
    assert_eq!(*calls.borrow(), 2);
    assert_eq!(engine.copy_state().mouse.position, Vec2::new(2, 2));
}

#[test]
fn propagate_override_stops_the_tick_and_publishes_partial_state() {
    let calls = Rc::new(RefCell::new(0));
    let (mut engine, _running) = engine_with_events(vec![
        NativeEvent::MouseMotion { x: 1, y: 1 },
        NativeEvent::MouseMotion { x: 5, y: 5 },
    ]);

    engine.set_policy(EventKind::MouseMove, DispatchPolicy::Propagate);
    let counter = calls.clone();
    engine.set_handler(
        EventKind::MouseMove,
        Box::new(move |_| {
            *counter.borrow_mut() += 1;
            Err(EngineError::new(ErrorKind::Lua))
        }),
    );

    let err = engine.update().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lua);
    assert_eq!(*calls.borrow(), 1);
    // The first event's fold was published before returning the error.
    assert_eq!(engine.copy_state().mouse.position, Vec2::new(1, 1));
}

#[test]
fn quit_can_be_downgraded_to_log_and_continue() {
    let (mut engine, running) = engine_with_events(vec![
        NativeEvent::Quit,
        NativeEvent::MouseMotion { x: 7, y: 7 },
    ]);

    engine.set_policy(EventKind::Quitting, DispatchPolicy::LogAndContinue);
    engine.set_handler(
        EventKind::Quitting,
        Box::new(|_| Err(EngineError::new(ErrorKind::Lua))),
    );

    engine.update().unwrap();
    assert!(!running.load(Ordering::SeqCst));
    assert_eq!(engine.copy_state().mouse.position, Vec2::new(7, 7));
}

// ============================================================================
// Manifest Tests
// ============================================================================

const MANIFEST: &str = r#"
[meta]
name = "gloamwood"
title = "Gloamwood"
description = "A test game"
author = "Test Author"
license = "MIT"
version = "1.2.3"

[target]
platforms = ["Linux", "MacOS", "Windows"]
lua = "5.4"

[game]
entry_scene = "main"

[graphics]
resolution = [800, 600]
fullscreen = false
allow_resizing = true

[audio]
volume = 0.8

[[resources]]
type = "Sprite"
key = "hero"
source = "sprites/hero.png"

[[resources]]
type = "Music"
key = "theme"
source = "audio/theme.ogg"
lazy = true
"#;

#[test]
fn manifest_happy_path() {
    let game = Game::from_manifest(MANIFEST).unwrap();
    assert_eq!(game.meta.name, "gloamwood");
    assert_eq!(game.meta.version.to_string(), "1.2.3");
    assert_eq!(game.meta.target.platforms.len(), 3);
    assert_eq!(game.meta.graphics.window_resolution.width, 800);
    assert_eq!(game.resources.len(), 2);
    assert!(!game.resources[0].lazy);
    assert!(game.resources[1].lazy);
}

#[test]
fn manifest_missing_field_is_invalid_game() {
    let broken = MANIFEST.replace("entry_scene = \"main\"", "");
    let err = Game::from_manifest(&broken).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidGame);
}

#[test]
fn manifest_bad_version_is_invalid_game() {
    let broken = MANIFEST.replace("version = \"1.2.3\"", "version = \"1.2\"");
    let err = Game::from_manifest(&broken).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidGame);
}

#[test]
fn manifest_unknown_platform_is_invalid_game() {
    let broken = MANIFEST.replace("\"Windows\"", "\"Amiga\"");
    let err = Game::from_manifest(&broken).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidGame);
}

#[test]
fn manifest_volume_out_of_range_is_invalid_game() {
    let broken = MANIFEST.replace("volume = 0.8", "volume = 1.5");
    let err = Game::from_manifest(&broken).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidGame);
}

#[test]
fn manifest_unknown_resource_type_is_invalid_game() {
    let broken = MANIFEST.replace("type = \"Music\"", "type = \"Hologram\"");
    let err = Game::from_manifest(&broken).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidGame);
}

#[test]
fn load_rejects_missing_directory() {
    let err = Game::load(Path::new("/nonexistent/mallard/game")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidGame);
}

#[test]
fn load_rejects_directory_without_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let err = Game::load(dir.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidGame);
}

#[test]
fn load_reads_manifest_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("game.toml"), MANIFEST).unwrap();
    let game = Game::load(dir.path()).unwrap();
    assert_eq!(game.meta.title, "Gloamwood");
}

// ============================================================================
// Engine Driver Tests
// ============================================================================

#[test]
fn start_without_game_is_invalid_state() {
    let mut engine = Engine::new(EngineConfig::default(), QueuedEventSource::new());
    let err = engine.start().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn loading_a_second_game_is_invalid_state() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("game.toml"), MANIFEST).unwrap();

    let mut engine = Engine::new(EngineConfig::default(), QueuedEventSource::new());
    engine.load_game(dir.path()).unwrap();
    let err = engine.load_game(dir.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn start_runs_until_quit_event() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("game.toml"), MANIFEST).unwrap();

    let mut source = QueuedEventSource::new();
    source.push(NativeEvent::MouseMotion { x: 42, y: 7 });
    source.push(NativeEvent::Quit);

    let mut engine = Engine::new(EngineConfig::default(), source);
    engine.load_game(dir.path()).unwrap();
    engine.start().unwrap();

    assert!(!engine.running_flag().load(Ordering::SeqCst));
    assert_eq!(engine.copy_state().mouse.position, Vec2::new(42, 7));
}

#[test]
fn start_rejects_unsupported_platform() {
    // A manifest that supports no platform at all.
    let manifest = MANIFEST.replace(
        "platforms = [\"Linux\", \"MacOS\", \"Windows\"]",
        "platforms = []",
    );
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("game.toml"), manifest).unwrap();

    let mut engine = Engine::new(EngineConfig::default(), QueuedEventSource::new());
    engine.load_game(dir.path()).unwrap();
    let err = engine.start().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedPlatform);
}

#[test]
fn shutdown_requests_cooperative_stop() {
    let engine = Engine::new(EngineConfig::default(), QueuedEventSource::new());
    assert!(engine.running_flag().load(Ordering::SeqCst));
    engine.shutdown();
    assert!(!engine.running_flag().load(Ordering::SeqCst));
}

// ============================================================================
// Fatal Termination Tests
// ============================================================================
//
// Wrong-branch result access must kill the process, not return a value. The
// terminating half is checked by re-running this test binary filtered down
// to `fatal_case_runner` with the case named in an env var, and asserting
// the child died with the controlled exit status.

const FATAL_CASE_ENV: &str = "MALLARD_FATAL_CASE";

#[test]
fn fatal_case_runner() {
    let Some(case) = std::env::var_os(FATAL_CASE_ENV) else {
        // Not a child run; nothing to do.
        return;
    };

    // The fatal path raises SIGTRAP in debug builds before exiting. With no
    // debugger attached that signal would kill us first, so ignore it and
    // let the exit status speak.
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGTRAP, libc::SIG_IGN);
    }

    match case.to_str() {
        Some("or_fatal_on_err") => {
            let res: EngineResult<u32> = Err(EngineError::new(ErrorKind::Lua));
            let value = res.or_fatal();
            // Unreachable unless the contract is broken; exit cleanly so the
            // parent's status assertion fails loudly.
            eprintln!("or_fatal returned a value: {value}");
            std::process::exit(0);
        }
        Some("err_or_fatal_on_ok") => {
            let res: EngineResult<u32> = Ok(7);
            let err = res.err_or_fatal();
            eprintln!("err_or_fatal returned an error: {err}");
            std::process::exit(0);
        }
        other => panic!("unrecognized fatal case: {other:?}"),
    }
}

fn run_fatal_case(case: &str) -> std::process::Output {
    std::process::Command::new(std::env::current_exe().unwrap())
        .args(["fatal_case_runner", "--exact", "--nocapture"])
        .env(FATAL_CASE_ENV, case)
        .output()
        .unwrap()
}

#[test]
fn or_fatal_on_err_terminates_the_process() {
    let output = run_fatal_case("or_fatal_on_err");
    assert_eq!(output.status.code(), Some(101));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("engine panicked"), "stderr: {stderr}");
}

#[test]
fn err_or_fatal_on_ok_terminates_the_process() {
    let output = run_fatal_case("err_or_fatal_on_ok");
    assert_eq!(output.status.code(), Some(101));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("engine panicked"), "stderr: {stderr}");
}
