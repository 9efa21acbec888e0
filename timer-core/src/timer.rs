use std::fmt;

use crate::error::CoreError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

impl TimerState {
    /// Upper-case label used by status lines.
    pub fn label(self) -> &'static str {
        match self {
            TimerState::Idle => "IDLE",
            TimerState::Running => "RUNNING",
            TimerState::Paused => "PAUSED",
        }
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimerState::Idle => "idle",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct TimerId(pub(crate) u64);

impl TimerId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One recorded split. Plain value, never mutated after creation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LapRecord {
    /// 1-based position within the owning timer.
    pub index: u32,
    /// Clock reading when the lap was taken.
    pub recorded_at_ms: u64,
    pub split_ms: u64,
    pub cumulative_ms: u64,
}

/// A single stopwatch with laps.
///
/// Elapsed time is `accumulated_ms` plus the open running segment, so it is
/// carried exactly across any number of pause/resume cycles.
#[derive(Clone, Debug)]
pub struct Timer {
    id: TimerId,
    name: String,
    state: TimerState,
    accumulated_ms: u64,
    run_started_at: Option<u64>,
    laps: Vec<LapRecord>,
}

impl Timer {
    pub fn new(id: TimerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            state: TimerState::Idle,
            accumulated_ms: 0,
            run_started_at: None,
            laps: Vec::new(),
        }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn laps(&self) -> &[LapRecord] {
        &self.laps
    }

    /// Starts or resumes. Already running is a successful no-op.
    pub fn start(&mut self, now_ms: u64) {
        if self.state == TimerState::Running {
            return;
        }
        self.run_started_at = Some(now_ms);
        self.state = TimerState::Running;
    }

    pub fn pause(&mut self, now_ms: u64) -> Result<(), CoreError> {
        let Some(started) = self.run_started_at.filter(|_| self.is_running()) else {
            return Err(CoreError::InvalidTransition {
                command: "pause",
                state: self.state,
            });
        };
        self.accumulated_ms = self
            .accumulated_ms
            .saturating_add(now_ms.saturating_sub(started));
        self.run_started_at = None;
        self.state = TimerState::Paused;
        Ok(())
    }

    /// Pauses when running, starts otherwise. Returns the resulting state.
    pub fn toggle(&mut self, now_ms: u64) -> TimerState {
        match self.state {
            TimerState::Running => {
                // Cannot fail: we just matched Running.
                let _ = self.pause(now_ms);
            }
            TimerState::Idle | TimerState::Paused => self.start(now_ms),
        }
        self.state
    }

    /// Records a split. Only valid while running.
    pub fn lap(&mut self, now_ms: u64) -> Result<LapRecord, CoreError> {
        if self.state != TimerState::Running {
            return Err(CoreError::InvalidTransition {
                command: "lap",
                state: self.state,
            });
        }
        let elapsed = self.elapsed_ms(now_ms);
        let previous = self.laps.last().map_or(0, |l| l.cumulative_ms);
        let record = LapRecord {
            index: u32::try_from(self.laps.len() + 1).unwrap_or(u32::MAX),
            recorded_at_ms: now_ms,
            split_ms: elapsed.saturating_sub(previous),
            cumulative_ms: elapsed,
        };
        self.laps.push(record);
        Ok(record)
    }

    pub fn reset(&mut self) {
        self.accumulated_ms = 0;
        self.run_started_at = None;
        self.laps.clear();
        self.state = TimerState::Idle;
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        match (self.state, self.run_started_at) {
            (TimerState::Running, Some(started)) => self
                .accumulated_ms
                .saturating_add(now_ms.saturating_sub(started)),
            _ => self.accumulated_ms,
        }
    }
}
