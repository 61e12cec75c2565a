//! Per-round game session: score, active mole and round timers.
//!
//! A fresh [`GameSession`] is created every time the state machine enters
//! the start screen, so nothing from a finished round leaks into the next.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

/// Non-negative score with half-point resolution.
///
/// Stored as a count of half points so the miss penalty (0.5) is exact and
/// the zero floor is enforced by the type rather than by callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score {
    half_points: u32,
}

impl Score {
    pub const ZERO: Self = Self { half_points: 0 };

    pub const fn from_half_points(half_points: u32) -> Self {
        Self { half_points }
    }

    pub const fn half_points(self) -> u32 {
        self.half_points
    }

    pub fn points(self) -> f64 {
        f64::from(self.half_points) / 2.0
    }

    /// +1 point.
    pub fn hit(&mut self) {
        self.half_points = self.half_points.saturating_add(2);
    }

    /// -0.5 points, floored at zero.
    pub fn penalize(&mut self) {
        self.half_points = self.half_points.saturating_sub(1);
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.half_points / 2;
        if self.half_points % 2 == 0 {
            write!(f, "{whole}")
        } else {
            write!(f, "{whole}.5")
        }
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.points())
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let points = f64::deserialize(deserializer)?;
        let halves = points * 2.0;
        if !halves.is_finite() || halves < 0.0 || halves.fract() != 0.0 || halves > f64::from(u32::MAX)
        {
            return Err(serde::de::Error::custom(format!(
                "score must be a non-negative multiple of 0.5, got {points}"
            )));
        }
        Ok(Self::from_half_points(halves as u32))
    }
}

// ---------------------------------------------------------------------------
// GameSession
// ---------------------------------------------------------------------------

/// Mutable state of one round.
#[derive(Debug, Clone, Default)]
pub struct GameSession {
    pub score: Score,
    /// Light index of the mole currently up, if any.
    pub active_mole: Option<usize>,
    /// When the active mole was spawned.
    pub last_spawn_at: Duration,
    /// When the playing phase began; `None` until the countdown finishes.
    pub started_at: Option<Duration>,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time spent playing so far (zero before the round starts).
    pub fn elapsed(&self, now: Duration) -> Duration {
        self.started_at
            .map_or(Duration::ZERO, |start| now.saturating_sub(start))
    }

    /// Whether the round has used up its playing time.
    pub fn is_over(&self, now: Duration, duration: Duration) -> bool {
        self.started_at.is_some() && self.elapsed(now) >= duration
    }

    /// Seconds remaining, rounded to 0.1 s and never negative.
    pub fn time_left(&self, now: Duration, duration: Duration) -> f64 {
        let left = duration.saturating_sub(self.elapsed(now)).as_secs_f64();
        (left * 10.0).round() / 10.0
    }

    /// True when a new mole must be spawned: none is up, or the current one
    /// has outlived `lifetime`.
    pub fn mole_due(&self, now: Duration, lifetime: Duration) -> bool {
        match self.active_mole {
            None => true,
            Some(_) => now.saturating_sub(self.last_spawn_at) > lifetime,
        }
    }

    /// Put a mole up at `index`, replacing any current one.  Returns the
    /// replaced mole.
    pub fn spawn(&mut self, index: usize, now: Duration) -> Option<usize> {
        self.last_spawn_at = now;
        self.active_mole.replace(index)
    }

    /// Score a hit and take the mole down.
    pub fn record_hit(&mut self) -> Option<usize> {
        self.score.hit();
        self.active_mole.take()
    }

    /// Apply the miss penalty and take the mole down.
    pub fn record_miss(&mut self) -> Option<usize> {
        self.score.penalize();
        self.active_mole.take()
    }
}
