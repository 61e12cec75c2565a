//! Outbound application events.
//!
//! The [`GameService`](super::service::GameService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::fsm::GamePhase;
use crate::session::Score;

/// Structured events emitted by the game core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries initial phase).
    Started(GamePhase),

    /// The state machine moved between phases.
    PhaseChanged { from: GamePhase, to: GamePhase },

    /// A mole popped up.
    MoleSpawned { index: usize },

    /// A mole timed out without being hit.  Neither a hit nor a miss.
    MoleEscaped { index: usize },

    /// The player pressed the mole's light.
    Hit { index: usize, score: Score },

    /// The player pressed a light other than the mole's.
    Miss { pressed: usize, mole: usize, score: Score },

    /// Playing time ran out.
    RoundOver { score: Score },
}
