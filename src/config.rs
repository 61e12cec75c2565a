//! Game configuration parameters
//!
//! All tunable parameters for the whack-a-mole panel.
//! Values can be overridden from a JSON file; any field left out of the
//! file keeps its default.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Linux key codes for `KEY_1` .. `KEY_9`.
const DEFAULT_KEYMAP: [u16; 9] = [2, 3, 4, 5, 6, 7, 8, 9, 10];

/// The countdown lights values 3, 2, 1 on lights 2, 1, 0.
pub const COUNTDOWN_TICKS: u8 = 3;

fn default_spi_speed_hz() -> u32 {
    4_000_000
}

/// Upper bound for every seconds-valued field.
const MAX_DURATION_SECS: f32 = 86_400.0;

/// Non-negative, finite, and representable as a `Duration`.
fn fits_duration(secs: f32) -> bool {
    Duration::try_from_secs_f32(secs).is_ok()
}

/// Which pixel strip driver backs the light panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "driver", rename_all = "snake_case")]
pub enum PanelBackend {
    /// APA102 strip fed through an SPI device node.
    Apa102 {
        device: PathBuf,
        /// SPI clock (Hz)
        #[serde(default = "default_spi_speed_hz")]
        speed_hz: u32,
    },
    /// In-memory strip; frames are only logged.
    Virtual,
}

/// Core game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // --- Panel ---
    /// Number of button lights on the panel
    pub num_lights: usize,
    /// Pixels behind each button light
    pub pixels_per_button: usize,
    /// Pixel brightness (0.0 - 1.0)
    pub brightness: f32,
    /// Light whose key starts a round
    pub start_light: usize,
    /// Key code for each light index
    pub keymap: Vec<u16>,
    /// Pixel strip driver
    pub panel: PanelBackend,

    // --- Round timing ---
    /// Length of the playing phase (seconds)
    pub game_duration_secs: f32,
    /// How long a mole stays up before escaping (seconds)
    pub mole_duration_secs: f32,
    /// Red penalty flash after a wrong press (milliseconds)
    pub penalty_flash_ms: u32,
    /// Hit feedback hold before the next mole (milliseconds, 0 = one tick)
    pub hit_feedback_ms: u32,
    /// On and off time of each countdown flash (milliseconds)
    pub countdown_flash_ms: u32,
    /// Flash the whole panel blue before the 3-2-1 countdown
    pub ready_flash: bool,
    /// Final-score display before the next round (seconds)
    pub game_over_delay_secs: f32,

    // --- Loop ---
    /// Sleep between loop iterations (milliseconds)
    pub tick_interval_ms: u32,
    /// Repeated presses of one key inside this window are dropped (milliseconds)
    pub debounce_ms: u32,
    /// Fixed seed for mole placement; entropy when absent
    pub rng_seed: Option<u64>,

    // --- I/O ---
    /// Input event device node
    pub input_device: PathBuf,
    /// Shared state file read by the renderer
    pub state_file: PathBuf,
    /// Write the state file via temp file + rename
    pub atomic_publish: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Panel
            num_lights: 9,
            pixels_per_button: 4,
            brightness: 0.25,
            start_light: 4, // the '5' key, centre of a 3x3 grid
            keymap: DEFAULT_KEYMAP.to_vec(),
            panel: PanelBackend::Apa102 {
                device: PathBuf::from("/dev/spidev0.0"),
                speed_hz: default_spi_speed_hz(),
            },

            // Round timing
            game_duration_secs: 30.0,
            mole_duration_secs: 1.0,
            penalty_flash_ms: 200,
            hit_feedback_ms: 0,
            countdown_flash_ms: 500,
            ready_flash: true,
            game_over_delay_secs: 5.0,

            // Loop
            tick_interval_ms: 5,
            debounce_ms: 20,
            rng_seed: None,

            // I/O
            input_device: PathBuf::from("/dev/input/event0"),
            state_file: PathBuf::from("game_state.json"),
            atomic_publish: false,
        }
    }
}

impl GameConfig {
    /// Reject parameter combinations the game cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_lights < usize::from(COUNTDOWN_TICKS) {
            return Err(ConfigError::ValidationFailed(
                "num_lights must be at least 3 for the countdown",
            ));
        }
        if self.pixels_per_button == 0 {
            return Err(ConfigError::ValidationFailed("pixels_per_button must be > 0"));
        }
        if self.start_light >= self.num_lights {
            return Err(ConfigError::ValidationFailed("start_light must be < num_lights"));
        }
        if self.keymap.len() != self.num_lights {
            return Err(ConfigError::ValidationFailed(
                "keymap must have one key per light",
            ));
        }
        if !(0.0..=1.0).contains(&self.brightness) {
            return Err(ConfigError::ValidationFailed("brightness must be within 0..=1"));
        }
        if !(self.game_duration_secs > 0.0 && fits_duration(self.game_duration_secs)) {
            return Err(ConfigError::ValidationFailed("game_duration_secs must be > 0"));
        }
        if !(self.mole_duration_secs > 0.0 && fits_duration(self.mole_duration_secs)) {
            return Err(ConfigError::ValidationFailed("mole_duration_secs must be > 0"));
        }
        if !fits_duration(self.game_over_delay_secs) {
            return Err(ConfigError::ValidationFailed("game_over_delay_secs must be >= 0"));
        }
        if self.game_duration_secs > MAX_DURATION_SECS
            || self.mole_duration_secs > MAX_DURATION_SECS
            || self.game_over_delay_secs > MAX_DURATION_SECS
        {
            return Err(ConfigError::ValidationFailed("durations must be at most one day"));
        }
        let mut codes = self.keymap.clone();
        codes.sort_unstable();
        if codes.windows(2).any(|w| w[0] == w[1]) {
            return Err(ConfigError::ValidationFailed(
                "keymap must not repeat a key code",
            ));
        }
        if self.countdown_flash_ms == 0 {
            return Err(ConfigError::ValidationFailed("countdown_flash_ms must be > 0"));
        }
        Ok(())
    }

    pub fn num_pixels(&self) -> usize {
        self.num_lights * self.pixels_per_button
    }

    pub fn game_duration(&self) -> Duration {
        Duration::from_secs_f32(self.game_duration_secs)
    }

    pub fn mole_lifetime(&self) -> Duration {
        Duration::from_secs_f32(self.mole_duration_secs)
    }

    pub fn penalty_flash(&self) -> Duration {
        Duration::from_millis(u64::from(self.penalty_flash_ms))
    }

    pub fn hit_feedback(&self) -> Duration {
        Duration::from_millis(u64::from(self.hit_feedback_ms))
    }

    pub fn countdown_flash(&self) -> Duration {
        Duration::from_millis(u64::from(self.countdown_flash_ms))
    }

    pub fn game_over_delay(&self) -> Duration {
        Duration::from_secs_f32(self.game_over_delay_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.tick_interval_ms))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(u64::from(self.debounce_ms))
    }
}
