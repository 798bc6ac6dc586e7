//! Single-threaded event loop that owns a [`TimerEngine`].
//!
//! Everything that wants to change the timer (keyboard input, signals, the
//! countdown ticker) posts a [`TimerEvent`] into one channel. The driver applies
//! events strictly in arrival order, so commands and ticks never interleave
//! inside the engine.
//!
//! After each event the driver reconciles the ticker with the engine: a ticker
//! runs exactly while [`TimerEngine::wants_ticks`] is true. Pausing cancels it
//! and resuming starts a fresh one, which makes the first tick after a resume
//! land one full interval later.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use super::engine::{TimerCommand, TimerEngine};
use super::scheduler::Ticker;
use crate::common::constants::TICK_INTERVAL;
use crate::time_source::TimeSource;

/// Everything the driver reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown tick from the ticker of the given generation
    Tick(u64),
    Command(TimerCommand),
    /// Leave the loop, leaving the session where it is
    Shutdown,
}

/// What the caller should do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverFlow {
    Continue,
    /// The session ended (completed or stopped)
    Finished,
    Shutdown,
}

pub struct TimerDriver {
    engine: TimerEngine,
    clock: Arc<dyn TimeSource>,
    sender: Sender<TimerEvent>,
    receiver: Receiver<TimerEvent>,
    ticker: Option<Ticker>,
    generation: u64,
    interval: Duration,
}

impl TimerDriver {
    pub fn new(engine: TimerEngine, clock: Arc<dyn TimeSource>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            engine,
            clock,
            sender,
            receiver,
            ticker: None,
            generation: 0,
            interval: TICK_INTERVAL,
        }
    }

    /// Override the tick interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// A handle for posting events from other threads.
    pub fn sender(&self) -> Sender<TimerEvent> {
        self.sender.clone()
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Apply one event and bring the ticker in line with the result.
    pub fn handle(&mut self, event: TimerEvent) -> DriverFlow {
        let was_idle = self.engine.session().is_idle();

        match event {
            TimerEvent::Tick(generation) => {
                // Ticks queued by a cancelled ticker are stale
                if self.ticker.as_ref().map(Ticker::generation) != Some(generation) {
                    return DriverFlow::Continue;
                }
                self.engine.tick();
            }
            TimerEvent::Command(command) => self.engine.apply(&command),
            TimerEvent::Shutdown => {
                self.stop_ticker();
                return DriverFlow::Shutdown;
            }
        }

        self.reconcile_ticker();

        if !was_idle && self.engine.session().is_idle() {
            DriverFlow::Finished
        } else {
            DriverFlow::Continue
        }
    }

    /// Process events until the session ends or a shutdown arrives.
    ///
    /// `on_update` sees the engine after every handled event, which is where a
    /// front end redraws. Returns the engine so the caller can read the final
    /// session.
    pub fn run<F>(mut self, mut on_update: F) -> (TimerEngine, DriverFlow)
    where
        F: FnMut(&TimerEngine),
    {
        self.reconcile_ticker();
        on_update(&self.engine);

        let flow = loop {
            let Ok(event) = self.receiver.recv() else {
                break DriverFlow::Shutdown;
            };
            let flow = self.handle(event);
            on_update(&self.engine);
            if flow != DriverFlow::Continue {
                break flow;
            }
        };

        self.stop_ticker();
        (self.engine, flow)
    }

    fn reconcile_ticker(&mut self) {
        let wants = self.engine.wants_ticks();
        if wants && self.ticker.is_none() {
            self.generation += 1;
            self.ticker = Some(Ticker::start(
                self.clock.clone(),
                self.sender.clone(),
                self.generation,
                self.interval,
            ));
        } else if !wants {
            self.stop_ticker();
        }
    }

    fn stop_ticker(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}
