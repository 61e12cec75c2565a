//! Whack-a-mole controller: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  EvdevInput     LightPanel<SpiApa102|VirtualStrip>           │
//! │  (InputPort)    (LightPanelPort)                             │
//! │  JsonFilePublisher   LogEventSink   MonotonicClock           │
//! │  (StatePublisher)    (EventSink)    (Clock)                  │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ───────────────         │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │            GameService (pure logic)                │      │
//! │  │  FSM · Session · Debounce                          │      │
//! │  └────────────────────────────────────────────────────┘      │
//! │                                                              │
//! │  GameLoop (poll · tick · sleep) · Ctrl-C stop flag           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage:
//!
//! ```text
//! whackamole [CONFIG]              run with the JSON config (defaults if absent)
//! whackamole --init-config PATH    write the default config and exit
//! ```
#![deny(unused_must_use)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use log::{error, info};

use whackamole::adapters::config_file::JsonConfigFile;
use whackamole::app::ports::ConfigPort;
use whackamole::config::GameConfig;
use whackamole::Error;

enum Command {
    Run(Option<PathBuf>),
    InitConfig(PathBuf),
}

fn parse_args() -> Result<Command> {
    let mut args = std::env::args_os().skip(1);
    match args.next() {
        None => Ok(Command::Run(None)),
        Some(arg) if arg == "--init-config" => {
            let path = args
                .next()
                .context("--init-config needs a destination path")?;
            Ok(Command::InitConfig(PathBuf::from(path)))
        }
        Some(arg) => Ok(Command::Run(Some(PathBuf::from(arg)))),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<GameConfig> {
    match path {
        Some(path) => JsonConfigFile::new(&path)
            .load()
            .map_err(Error::from)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(GameConfig::default()),
    }
}

#[cfg(target_os = "linux")]
fn play(config: GameConfig, stop: &AtomicBool) -> Result<()> {
    use whackamole::adapters::evdev::EvdevInput;
    use whackamole::config::PanelBackend;
    use whackamole::drivers::apa102;
    use whackamole::drivers::virtual_strip::VirtualStrip;

    let input = EvdevInput::open(&config.input_device)?;

    match config.panel.clone() {
        PanelBackend::Apa102 { device, speed_hz } => {
            let strip = apa102::open(&device, config.num_pixels(), speed_hz)
                .map_err(whackamole::PanelError::Driver)
                .map_err(Error::from)
                .with_context(|| format!("opening SPI device {}", device.display()))?;
            info!("APA102 strip on {} at {} Hz", device.display(), speed_hz);
            play_on(config, input, strip, stop)
        }
        PanelBackend::Virtual => {
            info!("Virtual panel (frames are logged only)");
            let strip = VirtualStrip::new(config.num_pixels());
            play_on(config, input, strip, stop)
        }
    }
}

#[cfg(target_os = "linux")]
fn play_on<S: whackamole::drivers::PixelStrip>(
    config: GameConfig,
    input: whackamole::adapters::evdev::EvdevInput,
    strip: S,
    stop: &AtomicBool,
) -> Result<()> {
    use whackamole::adapters::log_sink::LogEventSink;
    use whackamole::adapters::panel::LightPanel;
    use whackamole::adapters::state_file::JsonFilePublisher;
    use whackamole::adapters::time::MonotonicClock;
    use whackamole::game_loop::GameLoop;

    let panel = LightPanel::new(
        strip,
        config.num_lights,
        config.pixels_per_button,
        config.brightness,
    );
    let publisher = JsonFilePublisher::new(&config.state_file, config.atomic_publish);
    info!("Publishing state to {}", config.state_file.display());

    let mut game = GameLoop::new(
        config,
        input,
        panel,
        publisher,
        LogEventSink::new(),
        MonotonicClock::new(),
    );
    game.run(stop)?;
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn play(_config: GameConfig, _stop: &AtomicBool) -> Result<()> {
    anyhow::bail!("key input needs the Linux evdev interface")
}

fn run() -> Result<()> {
    let config_path = match parse_args()? {
        Command::InitConfig(path) => {
            JsonConfigFile::new(&path)
                .save(&GameConfig::default())
                .map_err(Error::from)
                .with_context(|| format!("writing config to {}", path.display()))?;
            info!("Default config written to {}", path.display());
            return Ok(());
        }
        Command::Run(path) => path,
    };

    let config = load_config(config_path)?;

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
        .context("installing interrupt handler")?;

    info!("whackamole v{}", env!("CARGO_PKG_VERSION"));
    play(config, &stop)?;
    info!("Exiting, lights cleared");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(Error::DeviceNotFound(path)) = e.downcast_ref::<Error>() {
                error!("Input device {} not found.", path.display());
                error!("Make sure the keypad is connected and the path is correct.");
                error!("You may need to run with sudo for permission to read input devices.");
            } else {
                error!("{:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}
