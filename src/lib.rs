//! Whack-a-mole panel controller library.
//!
//! The round logic (FSM, session, scoring) is pure and driven through the
//! port traits in [`app::ports`]; the device adapters and the loop driver
//! sit around it.  The `whackamole` binary wires everything together.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod fsm;
pub mod game_loop;
pub mod input;
pub mod session;
pub mod snapshot;

mod error;

pub use error::{Error, PanelError, Result};
