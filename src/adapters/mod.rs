//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements      | Connects to                   |
//! |---------------|-----------------|-------------------------------|
//! | `config_file` | ConfigPort      | JSON config file              |
//! | `evdev`       | InputPort       | Linux `/dev/input/eventN`     |
//! | `log_sink`    | EventSink       | `log` facade                  |
//! | `panel`       | LightPanelPort  | any [`PixelStrip`](crate::drivers::PixelStrip) |
//! | `state_file`  | StatePublisher  | JSON state file for the display |
//! | `time`        | Clock           | `std::time::Instant`          |

pub mod config_file;
#[cfg(target_os = "linux")]
pub mod evdev;
pub mod log_sink;
pub mod panel;
pub mod state_file;
pub mod time;
