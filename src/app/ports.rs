//! Port traits: the hexagonal boundary between game logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ GameService (domain)
//! ```
//!
//! Driven adapters (key input, light panel, state file, event log, clock,
//! config storage) implement these traits.  The
//! [`GameService`](super::service::GameService) and the
//! [`GameLoop`](crate::game_loop::GameLoop) consume them via generics, so
//! the state machine never touches a device directly.

use std::time::Duration;

use crate::config::GameConfig;
use crate::drivers::Rgb;
use crate::error::Result;
use crate::input::KeyEvent;
use crate::snapshot::StateSnapshot;

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: key device → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the button surface.
pub trait InputPort {
    /// Drain every pending key event without blocking.  Returns an empty
    /// vector when nothing is pending; errors are device faults.
    fn poll_events(&mut self) -> Result<Vec<KeyEvent>>;
}

// ───────────────────────────────────────────────────────────────
// Light panel port (driven adapter: domain → LEDs)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the button lights.  Every call is flushed to the
/// strip before it returns.
pub trait LightPanelPort {
    /// Light one button.
    fn light_button(&mut self, index: usize, colour: Rgb, brightness: f32) -> Result<()>;

    /// Turn one button off.
    fn clear_button(&mut self, index: usize) -> Result<()>;

    /// Light every button the same colour.
    fn light_all(&mut self, colour: Rgb, brightness: f32) -> Result<()>;

    /// Turn every button off.
    fn clear_all(&mut self) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// State publisher port (driven adapter: domain → renderer)
// ───────────────────────────────────────────────────────────────

/// Best-effort sink for [`StateSnapshot`]s.  Implementations log their own
/// failures; a lost snapshot never stops the game.
pub trait StatePublisher {
    fn publish(&mut self, snapshot: &StateSnapshot);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time source.  The origin is arbitrary; only differences matter.
pub trait Clock {
    fn now(&self) -> Duration;
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists game configuration.
pub trait ConfigPort {
    /// Load configuration.  Returns [`GameConfig::default()`] if no stored
    /// config exists.  Loaded values are validated.
    fn load(&self) -> core::result::Result<GameConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &GameConfig) -> core::result::Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// Stored config is not valid JSON for [`GameConfig`].
    Corrupted(String),
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// I/O error from the storage backend.
    Io(std::io::Error),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted(msg) => write!(f, "config corrupted: {}", msg),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}
