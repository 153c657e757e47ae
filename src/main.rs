//! Player State Recorder - headless demo
//!
//! Runs the recorder against the simulated host: two players walk, sprint
//! and jump on a scripted timeline. A scripted keyboard presses the
//! configured hotkey on the first frame and on the last one, and an unrelated
//! key half way through.
//!
//! Usage: `playerstate-recorder [CONFIG_PATH] [SECONDS]`

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use playerstate_recorder::{
    config::{app_data_dir, RecorderConfig},
    messages::LogMessages,
    sim::{SimulatedActor, SimulatedLobby},
    HostStatus, InputEvent, InputKey, Recorder, RecorderEvent,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_SECONDS: f64 = 10.0;

/// Key the scripted keyboard presses mid-run; never toggles recording
const DISTRACTOR_KEY: &str = "F1";

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .map(PathBuf::from)
        .or_else(RecorderConfig::default_path);
    let seconds = match args.next() {
        Some(raw) => raw.parse::<f64>()?,
        None => DEFAULT_SECONDS,
    };

    let loaded = match &config_path {
        Some(path) => RecorderConfig::load(path),
        None => Ok(RecorderConfig::default()),
    };
    let config = loaded.as_ref().cloned().unwrap_or_default();

    // Initialize logging
    let _log_guard = init_logging(config.general.log_to_file);

    if let Err(e) = &loaded {
        tracing::warn!("Failed to load config, using defaults: {}", e);
    }
    tracing::info!("Starting player state recorder demo ({} s)", seconds);

    let mut lobby = SimulatedLobby::new();
    lobby.join(2, "Horse");
    lobby.join(1, "Chicken");

    let dt = config.fixed_delta_seconds();
    let total_ticks = (seconds / dt).ceil().max(2.0) as u64;
    let hotkey = config.general.hotkey.clone();
    let mut recorder = Recorder::new(config, Arc::new(LogMessages));
    let mut held: HashMap<u32, Vec<InputKey>> = HashMap::new();

    for tick in 0..total_ticks {
        let pressed = scripted_keyboard(tick, total_ticks, &hotkey);
        let status = HostStatus {
            game_active: true,
            hotkey_pressed: pressed
                .iter()
                .any(|key| recorder.config().general.is_hotkey(key)),
        };
        match recorder.update(status, &lobby) {
            Some(RecorderEvent::Saved(path)) => println!("{}", path.display()),
            Some(event) => tracing::debug!("Recorder event: {:?}", event),
            None => {}
        }

        let time = tick as f64 * dt;
        for actor in lobby.actors() {
            let now = scripted_keys(actor.network_number(), time, dt);
            let before = held.insert(actor.network_number(), now.clone()).unwrap_or_default();
            emit_changes(actor, &before, &now);
            actor.step(dt as f32, &now);
        }

        recorder.fixed_update()?;
    }

    tracing::info!("Shutting down...");
    Ok(())
}

/// Install the tracing subscriber; the guard must live until exit
fn init_logging(to_file: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let (file_layer, guard) = match app_data_dir().filter(|_| to_file) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir.join("logs"), "recorder.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,playerstate_recorder=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}

/// Host key names pressed at a given tick
fn scripted_keyboard(tick: u64, total_ticks: u64, hotkey: &str) -> Vec<&str> {
    if tick == 0 || tick + 1 == total_ticks {
        vec![hotkey]
    } else if tick == total_ticks / 2 {
        vec![DISTRACTOR_KEY]
    } else {
        Vec::new()
    }
}

/// Keys each demo player holds at `time` seconds, for a tick of `dt` seconds
fn scripted_keys(network_number: u32, time: f64, dt: f64) -> Vec<InputKey> {
    let second = time.floor() as u64;
    // True on the one tick where a repeating period of `period` seconds starts
    let starts = |period: f64| time % period < dt;
    let mut keys = Vec::new();
    match network_number % 2 {
        0 => {
            if second % 4 < 2 {
                keys.push(InputKey::Right);
            } else {
                keys.push(InputKey::Left);
                keys.push(InputKey::Sprint);
            }
            if starts(1.5) {
                keys.push(InputKey::Jump);
            }
        }
        _ => {
            if second % 3 == 1 {
                keys.push(InputKey::Inventory);
            }
            if time % 2.4 < 0.2 {
                keys.push(InputKey::Jump);
            }
        }
    }
    keys
}

fn emit_changes(actor: &SimulatedActor, before: &[InputKey], now: &[InputKey]) {
    for key in now.iter().filter(|key| !before.contains(key)) {
        actor.emit(InputEvent::press(*key));
    }
    for key in before.iter().filter(|key| !now.contains(key)) {
        actor.emit(InputEvent::release(*key));
    }
}
