//! The workout timer: duration parsing, day navigation, the session state
//! machine and the event loop that drives it once per second.

pub mod driver;
pub mod duration;
pub mod engine;
pub mod navigator;
pub mod scheduler;

pub use driver::{DriverFlow, TimerDriver, TimerEvent};
pub use duration::{parse_rest_time, parse_work_time};
pub use engine::{TimerCommand, TimerEngine, TimerPhase, TimerSession};
pub use navigator::{first_exercise, next_exercise};
pub use scheduler::Ticker;
