//! Key events, keymap lookup and press debouncing.
//!
//! Raw events come from an [`InputPort`](crate::app::ports::InputPort) as
//! `(key code, state)` pairs.  The [`KeyDebouncer`] turns a tick's worth
//! of them into light presses:
//!
//! | Raw event              | Result                                   |
//! |------------------------|------------------------------------------|
//! | key down, mapped       | press of that light, unless debounced    |
//! | key down, unmapped     | dropped                                  |
//! | key up / auto-repeat   | dropped                                  |

use std::time::Duration;

/// Physical key transition as reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Up,
    Down,
    Repeat,
}

impl KeyState {
    /// Decode an evdev `EV_KEY` value.
    pub fn from_raw(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Up),
            1 => Some(Self::Down),
            2 => Some(Self::Repeat),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: u16,
    pub state: KeyState,
}

impl KeyEvent {
    pub fn down(code: u16) -> Self {
        Self {
            code,
            state: KeyState::Down,
        }
    }

    pub fn up(code: u16) -> Self {
        Self {
            code,
            state: KeyState::Up,
        }
    }

    pub fn is_press(&self) -> bool {
        self.state == KeyState::Down
    }
}

/// Key code → light index table.
#[derive(Debug, Clone)]
pub struct Keymap {
    codes: Vec<u16>,
}

impl Keymap {
    pub fn new(codes: Vec<u16>) -> Self {
        Self { codes }
    }

    pub fn light_for(&self, code: u16) -> Option<usize> {
        self.codes.iter().position(|&c| c == code)
    }
}

/// Drops a second press of the same light inside the debounce window.
pub struct KeyDebouncer {
    keymap: Keymap,
    window: Duration,
    /// Time of the last accepted press, per light.
    last_accepted: Vec<Option<Duration>>,
}

impl KeyDebouncer {
    pub fn new(keymap: Keymap, window: Duration) -> Self {
        let lights = keymap.codes.len();
        Self {
            keymap,
            window,
            last_accepted: vec![None; lights],
        }
    }

    /// Translate one tick's raw events into accepted light presses, in
    /// arrival order.
    pub fn filter(&mut self, events: &[KeyEvent], now: Duration) -> Vec<usize> {
        let mut presses = Vec::new();
        for event in events.iter().filter(|e| e.is_press()) {
            let Some(light) = self.keymap.light_for(event.code) else {
                continue;
            };
            let bounced = self.last_accepted[light]
                .is_some_and(|at| !self.window.is_zero() && now.saturating_sub(at) < self.window);
            if bounced {
                log::debug!("debounce: dropped repeat press on light {}", light);
                continue;
            }
            self.last_accepted[light] = Some(now);
            presses.push(light);
        }
        presses
    }
}
