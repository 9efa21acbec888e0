//! Pure timing logic for the Thymer multi-stopwatch.
//! No terminal or platform dependencies; every operation takes the clock
//! reading as an argument so it is testable with a simulated clock.

pub mod clock;
pub mod collection;
pub mod dispatch;
pub mod error;
pub mod timer;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use collection::{
    Direction, Navigation, Snapshot, TimerCollection, TimerView, DEFAULT_MAX_TIMERS,
    MAX_NAME_LEN,
};
pub use dispatch::{dispatch, Action, Flow, Key};
pub use error::CoreError;
pub use timer::{LapRecord, Timer, TimerId, TimerState};

/// Format milliseconds as "HH:MM:SS"
pub fn format_hms(ms: u64) -> String {
    let total_secs = ms / 1000;
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Format milliseconds as "HH:MM:SS.cc" (centiseconds, truncated)
pub fn format_hms_cs(ms: u64) -> String {
    let cs = (ms % 1000) / 10;
    format!("{}.{:02}", format_hms(ms), cs)
}
