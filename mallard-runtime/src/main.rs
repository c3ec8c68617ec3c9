use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info};

use mallard_core::{Engine, EngineConfig};
use mallard_runtime::TerminalEventSource;
use mallard_script::ScriptEngine;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    init_tracing(&args);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(args: &[String]) {
    // Bare "trace"/"debug" arguments raise the log level, everything else
    // stays at info.
    let level = if args.iter().any(|arg| arg == "trace") {
        tracing::Level::TRACE
    } else if args.iter().any(|arg| arg == "debug") {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &[String]) -> anyhow::Result<()> {
    let game_dir: PathBuf = args
        .iter()
        .find(|arg| *arg != "trace" && *arg != "debug")
        .map(PathBuf::from)
        .context("usage: mallard [trace|debug] <game-dir>")?;

    let source = TerminalEventSource::new().context("taking over the terminal")?;
    let mut engine = Engine::new(EngineConfig::default(), source);
    engine
        .load_game(&game_dir)
        .with_context(|| format!("loading game from {}", game_dir.display()))?;

    let entry_scene = engine
        .game()
        .map(|game| game.meta.entry_scene.clone())
        .context("no game after load")?;

    let script = ScriptEngine::new(engine.running_flag()).context("booting the script engine")?;
    script
        .load_libs(&game_dir.join("libs"))
        .context("loading runtime libraries")?;
    script
        .execute_file(&game_dir.join(format!("{entry_scene}.lua")))
        .with_context(|| format!("running entry scene {entry_scene}"))?;

    for (kind, handler) in script.drain_handler_registrations() {
        engine.events_mut().set_handler(kind, handler);
    }

    info!("game loaded, entering the main loop");
    engine.start().context("engine run failed")?;
    Ok(())
}
