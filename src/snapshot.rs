//! Published game-state snapshots and the renderer-side view of them.
//!
//! The controller writes one [`StateSnapshot`] as a JSON object per
//! observable change:
//!
//! ```text
//! {"state":"start_screen"}
//! {"state":"countdown","time":3}
//! {"state":"playing","mole_index":4,"score":2.5,"time_left":12.3}
//! {"state":"hit","score":3.0}
//! {"state":"miss","score":2.0}
//! {"state":"game_over","score":7.5}
//! ```
//!
//! Readers go through [`StateView`], which tolerates missing fields and
//! unknown state names the way the display process expects.

use serde::{Deserialize, Serialize};

use crate::session::Score;

/// One published projection of the in-memory game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StateSnapshot {
    StartScreen,
    Countdown {
        /// Remaining countdown value (3, 2, 1).
        time: u8,
    },
    Playing {
        mole_index: Option<usize>,
        score: Score,
        time_left: f64,
    },
    Hit {
        score: Score,
    },
    Miss {
        score: Score,
    },
    GameOver {
        score: Score,
    },
}

impl StateSnapshot {
    /// The `state` tag this snapshot is written with.
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::StartScreen => "start_screen",
            Self::Countdown { .. } => "countdown",
            Self::Playing { .. } => "playing",
            Self::Hit { .. } => "hit",
            Self::Miss { .. } => "miss",
            Self::GameOver { .. } => "game_over",
        }
    }
}

// ---------------------------------------------------------------------------
// Reader side
// ---------------------------------------------------------------------------

/// State names as seen by a reader.  `Waiting` stands in for a file that
/// has no `state` yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Waiting,
    StartScreen,
    Countdown,
    Playing,
    Hit,
    Miss,
    GameOver,
    #[serde(other)]
    Unknown,
}

/// Lenient decoding of the state file with every field defaulted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StateView {
    pub state: ViewState,
    pub mole_index: Option<usize>,
    pub score: f64,
    pub time_left: f64,
    pub time: Option<u8>,
}

impl StateView {
    /// Parse file contents.  A partial or malformed write is an error the
    /// caller is expected to shrug off and retry on its next poll.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
