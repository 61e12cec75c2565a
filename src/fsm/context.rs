//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that phase handlers read from and
//! write to: the current time, the tick's light presses, the round's
//! [`GameSession`], and three outboxes the service drains after each tick
//! (panel operations, snapshots to publish, application events).  Handlers
//! never touch a port themselves.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::app::events::AppEvent;
use crate::config::{COUNTDOWN_TICKS, GameConfig};
use crate::drivers::Rgb;
use crate::session::GameSession;
use crate::snapshot::StateSnapshot;

// ── Panel colours ─────────────────────────────────────────────

pub const COLOUR_MOLE: Rgb = (0, 255, 0); // Green
pub const COLOUR_START: Rgb = (255, 255, 255); // White
pub const COLOUR_COUNTDOWN: Rgb = (255, 255, 255); // White
pub const COLOUR_READY: Rgb = (0, 0, 255); // Blue
pub const COLOUR_PENALTY: Rgb = (255, 0, 0); // Red
pub const COLOUR_DONE: Rgb = (255, 255, 255); // White

// ---------------------------------------------------------------------------
// Panel operations (written by handlers; applied by the service)
// ---------------------------------------------------------------------------

/// A light panel call requested by a phase handler.  Brightness comes from
/// config when the service applies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelOp {
    Light { index: usize, colour: Rgb },
    Clear(usize),
    LightAll(Rgb),
    ClearAll,
}

// ---------------------------------------------------------------------------
// Countdown plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    ReadyOn,
    ReadyOff,
    TickOn(u8),
    TickOff(u8),
    Go,
}

/// Timed steps of the countdown, offsets measured from entering the phase.
#[derive(Debug, Clone, Default)]
pub struct CountdownPlan {
    steps: Vec<(Duration, CountdownStep)>,
    cursor: usize,
}

impl CountdownPlan {
    pub fn new(config: &GameConfig) -> Self {
        let flash = config.countdown_flash();
        let mut steps = Vec::new();
        let mut at = Duration::ZERO;

        if config.ready_flash {
            steps.push((at, CountdownStep::ReadyOn));
            at += flash * 2;
            steps.push((at, CountdownStep::ReadyOff));
            at += flash;
        }
        for value in (1..=COUNTDOWN_TICKS).rev() {
            steps.push((at, CountdownStep::TickOn(value)));
            at += flash;
            steps.push((at, CountdownStep::TickOff(value)));
            at += flash;
        }
        steps.push((at, CountdownStep::Go));

        Self { steps, cursor: 0 }
    }

    /// Next step whose offset has been reached, in order.  Steps are never
    /// skipped, even when a tick lands after several offsets.
    pub fn next_due(&mut self, elapsed: Duration) -> Option<CountdownStep> {
        let &(offset, step) = self.steps.get(self.cursor)?;
        if elapsed >= offset {
            self.cursor += 1;
            Some(step)
        } else {
            None
        }
    }

    /// Total running time of the plan.
    pub fn total(&self) -> Duration {
        self.steps.last().map_or(Duration::ZERO, |&(at, _)| at)
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every phase handler function.
pub struct FsmContext {
    // -- Timing --
    /// Current monotonic time.  Set by the service before each tick.
    pub now: Duration,
    /// When the current phase was entered.
    pub state_entered_at: Duration,
    /// Expiry of the Hit / Miss feedback overlay.
    pub overlay_until: Duration,
    /// Countdown schedule; rebuilt on every countdown entry.
    pub countdown: CountdownPlan,

    // -- Input --
    /// Debounced light presses received this tick, in arrival order.
    pub presses: Vec<usize>,

    // -- Round --
    pub session: GameSession,

    // -- Outboxes --
    pub panel_ops: Vec<PanelOp>,
    pub outbox: Vec<StateSnapshot>,
    pub events: Vec<AppEvent>,

    // -- Configuration --
    pub config: GameConfig,

    pub rng: StdRng,
}

impl FsmContext {
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            now: Duration::ZERO,
            state_entered_at: Duration::ZERO,
            overlay_until: Duration::ZERO,
            countdown: CountdownPlan::default(),
            presses: Vec::new(),
            session: GameSession::new(),
            panel_ops: Vec::new(),
            outbox: Vec::new(),
            events: Vec::new(),
            config,
            rng,
        }
    }

    /// Time spent in the current phase.
    pub fn elapsed_in_state(&self) -> Duration {
        self.now.saturating_sub(self.state_entered_at)
    }

    /// Whether the round's playing time has run out.
    pub fn round_expired(&self) -> bool {
        self.session.is_over(self.now, self.config.game_duration())
    }

    /// Snapshot of the playing phase at the current time.
    pub fn playing_snapshot(&self) -> StateSnapshot {
        StateSnapshot::Playing {
            mole_index: self.session.active_mole,
            score: self.session.score,
            time_left: self
                .session
                .time_left(self.now, self.config.game_duration()),
        }
    }

    // -- Outbox helpers --

    pub fn light(&mut self, index: usize, colour: Rgb) {
        self.panel_ops.push(PanelOp::Light { index, colour });
    }

    pub fn clear(&mut self, index: usize) {
        self.panel_ops.push(PanelOp::Clear(index));
    }

    pub fn light_all(&mut self, colour: Rgb) {
        self.panel_ops.push(PanelOp::LightAll(colour));
    }

    pub fn clear_all(&mut self) {
        self.panel_ops.push(PanelOp::ClearAll);
    }

    pub fn publish(&mut self, snapshot: StateSnapshot) {
        self.outbox.push(snapshot);
    }

    pub fn emit(&mut self, event: AppEvent) {
        self.events.push(event);
    }
}
