//! Tail the game state file and log every change.
//!
//! ```text
//! mole-monitor [STATE_FILE]     default: game_state.json
//! ```
//!
//! Reads the file the way the display process does: a missing or torn
//! file is skipped until the next poll.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};

use whackamole::adapters::state_file::read_state_file;
use whackamole::config::GameConfig;
use whackamole::snapshot::{StateView, ViewState};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn describe(view: &StateView) -> String {
    match view.state {
        ViewState::Countdown => format!("countdown {}", view.time.unwrap_or(0)),
        ViewState::Playing => match view.mole_index {
            Some(i) => format!(
                "playing | mole at {} | score {} | {:.1}s left",
                i, view.score, view.time_left
            ),
            None => format!(
                "playing | no mole | score {} | {:.1}s left",
                view.score, view.time_left
            ),
        },
        ViewState::Hit | ViewState::Miss | ViewState::GameOver => {
            format!("{:?} | score {}", view.state, view.score)
        }
        other => format!("{:?}", other),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| GameConfig::default().state_file);

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
        .context("installing interrupt handler")?;

    info!("Watching {}", path.display());
    let mut last: Option<StateView> = None;
    while !stop.load(Ordering::Relaxed) {
        match read_state_file(&path) {
            Some(view) if last.as_ref() != Some(&view) => {
                info!("{}", describe(&view));
                last = Some(view);
            }
            Some(_) => {}
            None => debug!("no readable state yet"),
        }
        thread::sleep(POLL_INTERVAL);
    }
    Ok(())
}
