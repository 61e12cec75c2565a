//! Application core: game rules, zero I/O.
//!
//! The state machine and its orchestration live here.  All interaction
//! with the panel, the key device and the state file happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real hardware.

pub mod events;
pub mod ports;
pub mod service;
