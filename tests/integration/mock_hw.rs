//! Mock adapters for integration tests.
//!
//! Records every panel call, snapshot and event so tests can assert on the
//! full history without a keypad or LED strip.

use std::cell::Cell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use whackamole::app::events::AppEvent;
use whackamole::app::ports::{Clock, EventSink, InputPort, LightPanelPort, StatePublisher};
use whackamole::drivers::Rgb;
use whackamole::input::KeyEvent;
use whackamole::snapshot::StateSnapshot;
use whackamole::{Error, PanelError, Result};

// ── Panel call record ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum PanelCall {
    Light { index: usize, colour: Rgb },
    Clear(usize),
    LightAll(Rgb),
    ClearAll,
}

// ── MockPanel ─────────────────────────────────────────────────

pub struct MockPanel {
    pub calls: Vec<PanelCall>,
    /// Fail every call once this many have succeeded.
    pub fail_after: Option<usize>,
}

#[allow(dead_code)]
impl MockPanel {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            fail_after: None,
        }
    }

    pub fn last_call(&self) -> Option<&PanelCall> {
        self.calls.last()
    }

    /// Whether light `index` is currently on, replaying the call history.
    pub fn is_lit(&self, index: usize) -> bool {
        self.colour_of(index).is_some()
    }

    pub fn colour_of(&self, index: usize) -> Option<Rgb> {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                PanelCall::Light { index: i, colour } if *i == index => Some(Some(*colour)),
                PanelCall::Clear(i) if *i == index => Some(None),
                PanelCall::LightAll(colour) => Some(Some(*colour)),
                PanelCall::ClearAll => Some(None),
                _ => None,
            })
            .flatten()
    }

    fn record(&mut self, call: PanelCall) -> Result<()> {
        if self.fail_after.is_some_and(|n| self.calls.len() >= n) {
            return Err(Error::Panel(PanelError::Driver(io::Error::other(
                "strip unplugged",
            ))));
        }
        self.calls.push(call);
        Ok(())
    }
}

impl Default for MockPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl LightPanelPort for MockPanel {
    fn light_button(&mut self, index: usize, colour: Rgb, _brightness: f32) -> Result<()> {
        self.record(PanelCall::Light { index, colour })
    }

    fn clear_button(&mut self, index: usize) -> Result<()> {
        self.record(PanelCall::Clear(index))
    }

    fn light_all(&mut self, colour: Rgb, _brightness: f32) -> Result<()> {
        self.record(PanelCall::LightAll(colour))
    }

    fn clear_all(&mut self) -> Result<()> {
        self.record(PanelCall::ClearAll)
    }
}

// ── ScriptedInput ─────────────────────────────────────────────

/// Hands out one scripted batch per poll, then nothing.
pub struct ScriptedInput {
    pub batches: VecDeque<Vec<KeyEvent>>,
    pub fail: bool,
}

#[allow(dead_code)]
impl ScriptedInput {
    pub fn new() -> Self {
        Self {
            batches: VecDeque::new(),
            fail: false,
        }
    }

    pub fn push(&mut self, batch: Vec<KeyEvent>) {
        self.batches.push_back(batch);
    }
}

impl InputPort for ScriptedInput {
    fn poll_events(&mut self) -> Result<Vec<KeyEvent>> {
        if self.fail {
            return Err(Error::Device {
                path: "/dev/input/event0".into(),
                source: io::Error::other("device unplugged"),
            });
        }
        Ok(self.batches.pop_front().unwrap_or_default())
    }
}

// ── RecordingPublisher ────────────────────────────────────────

pub struct RecordingPublisher {
    pub snapshots: Vec<StateSnapshot>,
}

#[allow(dead_code)]
impl RecordingPublisher {
    pub fn new() -> Self {
        Self {
            snapshots: Vec::new(),
        }
    }

    pub fn last(&self) -> Option<&StateSnapshot> {
        self.snapshots.last()
    }

    pub fn countdown_values(&self) -> Vec<u8> {
        self.snapshots
            .iter()
            .filter_map(|s| match s {
                StateSnapshot::Countdown { time } => Some(*time),
                _ => None,
            })
            .collect()
    }

    pub fn count_game_over(&self) -> usize {
        self.snapshots
            .iter()
            .filter(|s| matches!(s, StateSnapshot::GameOver { .. }))
            .count()
    }
}

impl StatePublisher for RecordingPublisher {
    fn publish(&mut self, snapshot: &StateSnapshot) {
        self.snapshots.push(snapshot.clone());
    }
}

// ── LogSink ───────────────────────────────────────────────────

/// Minimal event sink that records events for assertions.
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── ManualClock ───────────────────────────────────────────────

/// Clock the test advances by hand.  Clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}
