//! Unix signal handling for a running session.
//!
//! SIGINT, SIGTERM and SIGHUP all end the session: the handler thread posts a
//! single [`TimerEvent::Shutdown`] into the driver's channel and exits. While
//! the live screen has the terminal in raw mode, Ctrl+C arrives as a key press
//! instead and is handled by the keyboard reader.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM},
    iterator::{Handle, Signals},
};
use std::sync::mpsc::Sender;
use std::thread;

use crate::timer::TimerEvent;

/// Keeps the signal thread registered. Dropping it unregisters the handlers.
pub struct SignalGuard {
    handle: Handle,
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
    }
}

/// Spawn the signal thread, forwarding termination requests to `sender`.
pub fn setup_signal_handler(
    sender: Sender<TimerEvent>,
    debug_enabled: bool,
) -> Result<SignalGuard> {
    let mut signals =
        Signals::new([SIGINT, SIGTERM, SIGHUP]).context("failed to register signal handlers")?;
    let handle = signals.handle();

    thread::spawn(move || {
        if let Some(sig) = signals.forever().next() {
            log_pipe!();
            match sig {
                SIGINT if debug_enabled => {
                    log_info!("Received SIGINT (Ctrl+C), stopping session...")
                }
                SIGINT => log_info!("Received interrupt signal, stopping session..."),
                SIGTERM => log_info!("Received termination request, stopping session..."),
                SIGHUP => log_info!("Terminal disconnected, stopping session..."),
                _ => {}
            }

            if let Err(e) = sender.send(TimerEvent::Shutdown) {
                log_warning!("Failed to send shutdown message: {e}");
            }
        }
    });

    Ok(SignalGuard { handle })
}
