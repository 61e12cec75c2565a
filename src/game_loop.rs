//! Game loop driver.
//!
//! Owns the adapters and drives [`GameService`] at a fixed cadence:
//!
//! ```text
//!   loop {
//!       events = input.poll_events()     // non-blocking
//!       now    = clock.now()
//!       service.tick(now, events, ...)
//!       sleep(tick_interval)
//!   }
//! ```
//!
//! The loop exits when the stop flag is raised or an adapter fails.  On
//! every exit path the panel is cleared.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use log::{info, warn};

use crate::app::ports::{Clock, EventSink, InputPort, LightPanelPort, StatePublisher};
use crate::app::service::GameService;
use crate::config::GameConfig;
use crate::error::Result;

pub struct GameLoop<I, P, S, E, C> {
    service: GameService,
    input: I,
    panel: P,
    publisher: S,
    sink: E,
    clock: C,
}

impl<I, P, S, E, C> GameLoop<I, P, S, E, C>
where
    I: InputPort,
    P: LightPanelPort,
    S: StatePublisher,
    E: EventSink,
    C: Clock,
{
    pub fn new(config: GameConfig, input: I, panel: P, publisher: S, sink: E, clock: C) -> Self {
        Self {
            service: GameService::new(config),
            input,
            panel,
            publisher,
            sink,
            clock,
        }
    }

    /// Enter the start screen.
    pub fn start(&mut self) -> Result<()> {
        let now = self.clock.now();
        self.service
            .start(now, &mut self.panel, &mut self.publisher, &mut self.sink)
    }

    /// One iteration without the sleep.  Input is drained before the
    /// clock is read so every press is judged against the current time.
    pub fn step(&mut self) -> Result<()> {
        let events = self.input.poll_events()?;
        let now = self.clock.now();
        self.service.tick(
            now,
            &events,
            &mut self.panel,
            &mut self.publisher,
            &mut self.sink,
        )
    }

    /// Run until `stop` is raised or an adapter fails.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<()> {
        let interval = self.service.config().tick_interval();
        let result = self.start().and_then(|()| {
            while !stop.load(Ordering::Relaxed) {
                self.step()?;
                thread::sleep(interval);
            }
            info!("Stop requested");
            Ok(())
        });
        self.shutdown();
        result
    }

    /// Turn every light off.  Failures are logged; there is nothing
    /// further to do with a dead panel.
    pub fn shutdown(&mut self) {
        if let Err(e) = self.panel.clear_all() {
            warn!("Failed to clear lights on shutdown: {}", e);
        }
    }

    pub fn service(&self) -> &GameService {
        &self.service
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }
}
