//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured game events to the `log`
//! facade (stderr via `env_logger` in the binaries).

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(phase) => {
                info!("START | initial_phase={:?}", phase);
            }
            AppEvent::PhaseChanged { from, to } => {
                info!("PHASE | {:?} -> {:?}", from, to);
            }
            AppEvent::MoleSpawned { index } => {
                debug!("MOLE  | up at light {}", index);
            }
            AppEvent::MoleEscaped { index } => {
                info!("MOLE  | escaped from light {}", index);
            }
            AppEvent::Hit { index, score } => {
                info!("HIT   | light {} | score={}", index, score);
            }
            AppEvent::Miss {
                pressed,
                mole,
                score,
            } => {
                info!(
                    "MISS  | pressed {} (mole at {}) | score={}",
                    pressed, mole, score
                );
            }
            AppEvent::RoundOver { score } => {
                info!("ROUND | over, final score={}", score);
            }
        }
    }
}
