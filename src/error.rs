//! Unified error types for the whack-a-mole controller.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! loop driver's error handling uniform.  Every variant here is fatal to
//! the game loop: recoverable conditions (no pending input, a failed
//! state-file write) never surface as an `Error` at all.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::app::ports::ConfigError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum Error {
    /// The input device node does not exist.  Startup-fatal, never retried.
    DeviceNotFound(PathBuf),
    /// The input device exists but could not be opened or read.
    Device { path: PathBuf, source: io::Error },
    /// The light panel rejected an operation or its driver failed.
    Panel(PanelError),
    /// Configuration could not be loaded or failed validation.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceNotFound(path) => {
                write!(f, "input device not found at {}", path.display())
            }
            Self::Device { path, source } => {
                write!(f, "input device {}: {source}", path.display())
            }
            Self::Panel(e) => write!(f, "light panel: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Device { source, .. } => Some(source),
            Self::Panel(PanelError::Driver(e)) => Some(e),
            Self::Config(ConfigError::Io(e)) => Some(e),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Panel errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum PanelError {
    /// A logical light index beyond the panel's button count.
    IndexOutOfRange { index: usize, lights: usize },
    /// The pixel strip driver failed to flush a frame.
    Driver(io::Error),
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, lights } => {
                write!(f, "light {index} out of range (panel has {lights})")
            }
            Self::Driver(e) => write!(f, "driver: {e}"),
        }
    }
}

impl From<PanelError> for Error {
    fn from(e: PanelError) -> Self {
        Self::Panel(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
