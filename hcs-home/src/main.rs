//! hcs-home - console-style home screen in the terminal
//!
//! Startup loads configuration, opens the audio engine (falling back to a
//! silent engine), enters raw mode and runs the session loop until Ctrl+C.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use hcs_common::events::EventBus;
use hcs_home::ambient::AmbientTicker;
use hcs_home::audio::AudioOutput;
use hcs_home::config::{AudioConfig, ConfigOverrides, HomeConfig};
use hcs_home::embedded::PassthroughGame;
use hcs_home::input::{map_terminal_event, spawn_terminal_reader, TerminalInput};
use hcs_home::journal::spawn_event_journal;
use hcs_home::media::{CpalMediaEngine, CueCatalog, MediaEngine, NullMediaEngine};
use hcs_home::render::{Renderer, TerminalGuard, TerminalRenderer};
use hcs_home::HomeSession;
use tokio::signal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Housekeeping period for priming and banner timers
const TICK_INTERVAL: Duration = Duration::from_millis(25);

const EVENT_BUS_CAPACITY: usize = 256;

/// Command-line arguments for hcs-home
#[derive(Parser, Debug)]
#[command(name = "hcs-home")]
#[command(about = "Console-style home screen with sound cues")]
#[command(version)]
struct Args {
    /// Configuration file (overrides HCS_CONFIG and the default locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the cue audio files
    #[arg(long, env = "HCS_SOUNDS_DIR")]
    sounds_dir: Option<PathBuf>,

    /// Run without opening an audio device
    #[arg(long)]
    no_audio: bool,

    /// Log level filter (trace, debug, info, warn, error)
    #[arg(long, env = "HCS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print the available audio output devices and exit
    #[arg(long)]
    list_devices: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.list_devices {
        for device in AudioOutput::list_devices().context("Failed to list audio devices")? {
            println!("{}", device);
        }
        return Ok(());
    }

    let (mut config, source) =
        HomeConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    config.apply_overrides(&ConfigOverrides {
        sounds_dir: args.sounds_dir.clone(),
        log_level: args.log_level.clone(),
        no_audio: args.no_audio,
    });

    init_logging(&config).context("Failed to initialize logging")?;
    info!("Starting {}", hcs_home::build_info());
    match &source {
        Some(path) => info!("Configuration: {}", path.display()),
        None => info!("Configuration: built-in defaults"),
    }
    info!("Sounds directory: {}", config.sounds.resolved_dir().display());

    let catalog = Arc::new(config.catalog().context("Invalid catalogue")?);
    // Opening the device and decoding every cue blocks; keep it off the runtime
    let audio = config.audio.clone();
    let cues = config.sounds.cue_catalog();
    let engine = tokio::task::spawn_blocking(move || select_engine(&audio, &cues))
        .await
        .context("Audio startup task failed")?;

    let bus = EventBus::new(EVENT_BUS_CAPACITY);
    let cancel = CancellationToken::new();
    let journal = config
        .logging
        .event_journal
        .clone()
        .map(|path| spawn_event_journal(bus.subscribe(), path, cancel.clone()));

    let terminal = TerminalGuard::enter().context("Failed to enter terminal mode")?;
    let (width, height) = TerminalGuard::size().context("Failed to read terminal size")?;
    let mut renderer =
        TerminalRenderer::new(std::io::stdout(), config.tile_geometry(), width, height);

    let mut session = HomeSession::from_config(
        &config,
        Arc::clone(&catalog),
        engine,
        Box::new(PassthroughGame::new()),
        bus,
        renderer.viewport_width(),
    )
    .context("Failed to build home session")?;

    let ambient = AmbientTicker::spawn(config.ambient_settings(), cancel.child_token());
    let mut status_rx = ambient.subscribe();
    session.set_status(status_rx.borrow_and_update().clone());

    let (input_tx, mut input_rx) = mpsc::channel(64);
    let reader = spawn_terminal_reader(input_tx, cancel.clone());

    let mut housekeeping = tokio::time::interval(TICK_INTERVAL);
    housekeeping.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    renderer.render(&session.view())?;

    loop {
        let dirty = tokio::select! {
            _ = &mut shutdown => break,
            received = input_rx.recv() => {
                let Some(event) = received else {
                    warn!("Terminal input closed");
                    break;
                };
                match map_terminal_event(event, |column, row| renderer.hit_test(column, row)) {
                    Some(TerminalInput::Interrupt) => {
                        info!("Ctrl+C received, shutting down");
                        break;
                    }
                    Some(TerminalInput::Resize { width, height }) => {
                        renderer.resize(width, height);
                        session.resize(renderer.viewport_width());
                        true
                    }
                    Some(TerminalInput::Raw(input)) => {
                        session.dispatch(input, Instant::now());
                        true
                    }
                    None => false,
                }
            }
            _ = housekeeping.tick() => !session.tick(Instant::now()).is_empty(),
            changed = status_rx.changed() => {
                if changed.is_ok() {
                    session.set_status(status_rx.borrow_and_update().clone());
                }
                changed.is_ok()
            }
        };

        if dirty {
            if let Err(e) = renderer.render(&session.view()) {
                warn!("Render failed: {}", e);
            }
        }
    }

    cancel.cancel();
    session.shutdown();
    ambient.shutdown().await;
    drop(input_rx);
    if let Err(e) = reader.await {
        warn!("Terminal reader ended abnormally: {}", e);
    }
    if let Some(journal) = journal {
        if let Err(e) = journal.await {
            warn!("Event journal ended abnormally: {}", e);
        }
    }
    drop(terminal);

    info!("hcs-home shutdown complete");
    Ok(())
}

/// Tracing goes to the log file; the terminal belongs to the home screen
fn init_logging(config: &HomeConfig) -> Result<()> {
    let log_file = config.log_file();
    if let Some(dir) = log_file.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    let default_filter = format!("hcs_home={},hcs_common={}", config.logging.level, config.logging.level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn select_engine(audio: &AudioConfig, cues: &CueCatalog) -> Box<dyn MediaEngine> {
    if !audio.enabled {
        info!("Audio disabled, cues will be silent");
        return Box::new(NullMediaEngine);
    }
    match CpalMediaEngine::start(audio.device.clone(), cues) {
        Ok(engine) => {
            info!("Audio output: {} at {}Hz", engine.device_name(), engine.sample_rate());
            Box::new(engine)
        }
        Err(e) => {
            warn!("No usable audio output ({}), continuing without sound", e);
            Box::new(NullMediaEngine)
        }
    }
}

/// Resolves on SIGTERM (Unix) or Ctrl+C delivered as a signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}
