//! Function-pointer finite state machine engine.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  StateTable                                                 │
//! │  ┌─────────────┬───────────┬──────────┬───────────────────┐ │
//! │  │ GamePhase   │ on_enter  │ on_exit  │ on_update         │ │
//! │  ├─────────────┼───────────┼──────────┼───────────────────┤ │
//! │  │ StartScreen │ fn(ctx)   │ -        │ fn(ctx)->Option<> │ │
//! │  │ Countdown   │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │ │
//! │  │ Playing     │ fn(ctx)   │ -        │ fn(ctx)->Option<> │ │
//! │  │ Hit         │ fn(ctx)   │ -        │ fn(ctx)->Option<> │ │
//! │  │ Miss        │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │ │
//! │  │ GameOver    │ fn(ctx)   │ -        │ fn(ctx)->Option<> │ │
//! │  └─────────────┴───────────┴──────────┴───────────────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** phase.
//! If it returns `Some(next)`, the engine runs `on_exit` for the current
//! phase, stamps the entry time, then runs `on_enter` for the next.  All
//! handlers receive `&mut FsmContext`, which holds the session, the tick's
//! presses, queued panel operations and snapshots, config, and timing.

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;

// ---------------------------------------------------------------------------
// Phase identity
// ---------------------------------------------------------------------------

/// Every phase of a round.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GamePhase {
    StartScreen = 0,
    Countdown = 1,
    Playing = 2,
    Hit = 3,
    Miss = 4,
    GameOver = 5,
}

impl GamePhase {
    /// Total number of phases: used to size the table array.
    pub const COUNT: usize = 6;

    /// Convert a table index back to `GamePhase`.  Asserts on out-of-range
    /// in debug builds; returns `StartScreen` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::StartScreen,
            1 => Self::Countdown,
            2 => Self::Playing,
            3 => Self::Hit,
            4 => Self::Miss,
            5 => Self::GameOver,
            _ => {
                debug_assert!(false, "invalid phase index: {idx}");
                Self::StartScreen
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut FsmContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<GamePhase>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

pub struct StateDescriptor {
    pub id: GamePhase,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
pub struct Fsm {
    /// Fixed-size table indexed by `GamePhase as usize`.
    table: [StateDescriptor; GamePhase::COUNT],
    /// Index of the current phase.
    current: usize,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; GamePhase::COUNT], initial: GamePhase) -> Self {
        debug_assert!(
            table.iter().enumerate().all(|(i, d)| d.id as usize == i),
            "state table out of order"
        );
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting phase.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in phase: {}", self.table[self.current].name);
        ctx.state_entered_at = ctx.now;
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    ///
    /// 1. Call `on_update` for the current phase.
    /// 2. If it returns `Some(next)`, execute the transition:
    ///    `on_exit(current)` → update pointer → `on_enter(next)`.
    pub fn tick(&mut self, ctx: &mut FsmContext) {
        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    pub fn current_state(&self) -> GamePhase {
        GamePhase::from_index(self.current)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: GamePhase, ctx: &mut FsmContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        ctx.state_entered_at = ctx.now;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
