mod engine;
mod interval;

pub use engine::{TimerDisplay, TimerEngine, TimerState};
pub use interval::{Interval, StartRequest, TimerConfig, DEEP_WORK_MIN};
