mod engine;

pub use engine::{CountdownTimer, TimerPhase, DEFAULT_TICK_INTERVAL};
