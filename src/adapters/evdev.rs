//! Linux evdev input adapter.
//!
//! Wraps an [`evdev::Device`] opened on `/dev/input/eventN` and switched to
//! non-blocking reads.  Only `EV_KEY` events become [`KeyEvent`]s; sync and
//! scan-code events are dropped.  An empty kernel queue (`EAGAIN`) is a
//! normal, empty result.

use std::io;
use std::path::{Path, PathBuf};

use evdev::{Device, EventType};
use log::info;

use crate::app::ports::InputPort;
use crate::error::{Error, Result};
use crate::input::{KeyEvent, KeyState};

pub struct EvdevInput {
    device: Device,
    path: PathBuf,
}

impl EvdevInput {
    /// Open the device node for non-blocking reads.  A missing node is
    /// reported as [`Error::DeviceNotFound`].
    pub fn open(path: &Path) -> Result<Self> {
        let device_error = |source: io::Error| match source.kind() {
            io::ErrorKind::NotFound => Error::DeviceNotFound(path.to_path_buf()),
            _ => Error::Device {
                path: path.to_path_buf(),
                source,
            },
        };
        let device = Device::open(path).map_err(device_error)?;
        device.set_nonblocking(true).map_err(device_error)?;
        info!(
            "Listening for key events on {} ({})",
            path.display(),
            device.name().unwrap_or("unnamed device")
        );
        Ok(Self {
            device,
            path: path.to_path_buf(),
        })
    }
}

impl InputPort for EvdevInput {
    fn poll_events(&mut self) -> Result<Vec<KeyEvent>> {
        loop {
            match self.device.fetch_events() {
                Ok(batch) => {
                    return Ok(batch
                        .filter_map(|ev| key_event(ev.event_type(), ev.code(), ev.value()))
                        .collect());
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(Vec::new()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    return Err(Error::Device {
                        path: self.path.clone(),
                        source: e,
                    });
                }
            }
        }
    }
}

/// Translate one raw event; anything but a key press, release or repeat
/// yields `None`.
fn key_event(kind: EventType, code: u16, value: i32) -> Option<KeyEvent> {
    if kind != EventType::KEY {
        return None;
    }
    KeyState::from_raw(value).map(|state| KeyEvent { code, state })
}
