//! JSON state file adapter.
//!
//! Implements [`StatePublisher`] by overwriting one JSON file per snapshot
//! for the display process to poll.  Writes are best effort: a failure is
//! logged and the game carries on, since the in-memory session is the
//! source of truth and the file is only a projection of it.
//!
//! Two write modes:
//!
//! - **in place** (default): truncate and rewrite.  A reader can catch
//!   the file half-written and must retry.
//! - **atomic**: write `<file>.tmp`, then rename over the target.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::app::ports::StatePublisher;
use crate::snapshot::{StateSnapshot, StateView};

pub struct JsonFilePublisher {
    path: PathBuf,
    tmp_path: PathBuf,
    atomic: bool,
    failures: u64,
}

impl JsonFilePublisher {
    pub fn new(path: impl Into<PathBuf>, atomic: bool) -> Self {
        let path = path.into();
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        Self {
            path,
            tmp_path: PathBuf::from(tmp),
            atomic,
            failures: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes that failed since construction.
    pub fn failures(&self) -> u64 {
        self.failures
    }

    fn write(&self, snapshot: &StateSnapshot) -> io::Result<()> {
        let bytes = serde_json::to_vec(snapshot)?;
        if self.atomic {
            fs::write(&self.tmp_path, &bytes)?;
            fs::rename(&self.tmp_path, &self.path)
        } else {
            fs::write(&self.path, &bytes)
        }
    }
}

impl StatePublisher for JsonFilePublisher {
    fn publish(&mut self, snapshot: &StateSnapshot) {
        match self.write(snapshot) {
            Ok(()) => debug!("state file <- {}", snapshot.state_name()),
            Err(e) => {
                self.failures += 1;
                warn!(
                    "Failed to write game state to {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

/// Read the state file the way the display process does.
///
/// `None` covers every "try again next poll" case: no file yet, a read
/// error, or a torn write that does not parse.
pub fn read_state_file(path: &Path) -> Option<StateView> {
    let text = fs::read_to_string(path).ok()?;
    match StateView::parse(&text) {
        Ok(view) => Some(view),
        Err(e) => {
            debug!("state file {} not readable yet: {}", path.display(), e);
            None
        }
    }
}
