//! Game service: the hexagonal core.
//!
//! [`GameService`] owns the FSM, the key debouncer, and the shared
//! context.  All I/O flows through port traits injected at call sites,
//! making the whole round lifecycle testable with mock adapters.
//!
//! ```text
//!  key events ──▶ ┌────────────────────────┐ ──▶ LightPanelPort
//!                 │      GameService        │ ──▶ StatePublisher
//!        now ───▶ │  Debounce · FSM         │ ──▶ EventSink
//!                 └────────────────────────┘
//! ```

use std::time::Duration;

use log::info;

use crate::config::GameConfig;
use crate::error::Result;
use crate::fsm::context::{FsmContext, PanelOp};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, GamePhase};
use crate::input::{KeyDebouncer, KeyEvent, Keymap};
use crate::session::{GameSession, Score};

use super::events::AppEvent;
use super::ports::{EventSink, LightPanelPort, StatePublisher};

// ───────────────────────────────────────────────────────────────
// GameService
// ───────────────────────────────────────────────────────────────

pub struct GameService {
    fsm: Fsm,
    ctx: FsmContext,
    debouncer: KeyDebouncer,
}

impl GameService {
    /// Construct the service from a validated configuration.
    ///
    /// Does **not** start the FSM: call [`start`](Self::start) next.
    pub fn new(config: GameConfig) -> Self {
        let debouncer = KeyDebouncer::new(Keymap::new(config.keymap.clone()), config.debounce());
        let fsm = Fsm::new(build_state_table(), GamePhase::StartScreen);
        let ctx = FsmContext::new(config);
        Self {
            fsm,
            ctx,
            debouncer,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter the start screen and render it.
    pub fn start(
        &mut self,
        now: Duration,
        panel: &mut impl LightPanelPort,
        publisher: &mut impl StatePublisher,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.ctx.now = now;
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("GameService started in {:?}", self.fsm.current_state());
        self.flush(panel, publisher, sink)
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one tick: debounce input → FSM → panel, snapshots, events.
    ///
    /// Panel faults are returned; publishing is best effort inside the
    /// publisher.
    pub fn tick(
        &mut self,
        now: Duration,
        events: &[KeyEvent],
        panel: &mut impl LightPanelPort,
        publisher: &mut impl StatePublisher,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let prev_state = self.fsm.current_state();

        self.ctx.now = now;
        self.ctx.presses = self.debouncer.filter(events, now);

        self.fsm.tick(&mut self.ctx);

        let new_state = self.fsm.current_state();
        if new_state != prev_state {
            self.ctx.emit(AppEvent::PhaseChanged {
                from: prev_state,
                to: new_state,
            });
        }

        self.flush(panel, publisher, sink)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> GamePhase {
        self.fsm.current_state()
    }

    pub fn session(&self) -> &GameSession {
        &self.ctx.session
    }

    pub fn score(&self) -> Score {
        self.ctx.session.score
    }

    pub fn active_mole(&self) -> Option<usize> {
        self.ctx.session.active_mole
    }

    pub fn config(&self) -> &GameConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────

    /// Drain the context outboxes into the ports, in order: lights first so
    /// the panel never lags the published state.
    fn flush(
        &mut self,
        panel: &mut impl LightPanelPort,
        publisher: &mut impl StatePublisher,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let brightness = self.ctx.config.brightness;
        for op in self.ctx.panel_ops.drain(..) {
            match op {
                PanelOp::Light { index, colour } => panel.light_button(index, colour, brightness)?,
                PanelOp::Clear(index) => panel.clear_button(index)?,
                PanelOp::LightAll(colour) => panel.light_all(colour, brightness)?,
                PanelOp::ClearAll => panel.clear_all()?,
            }
        }
        for snapshot in self.ctx.outbox.drain(..) {
            publisher.publish(&snapshot);
        }
        for event in self.ctx.events.drain(..) {
            sink.emit(&event);
        }
        Ok(())
    }
}
