use chrono::{DateTime, Duration as ChronoDuration, Local};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("countdown duration must not be negative (got {0} ms)")]
    InvalidDuration(i64),
}

/// Source of "now" for both the countdown (monotonic) and the segment tracker (wall clock)
pub trait TimeSource {
    fn monotonic_ms(&self) -> u64;
    fn wall_now(&self) -> DateTime<Local>;
}

/// Production time source backed by `Instant` and the local wall clock
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn monotonic_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn wall_now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Hand-driven time source for tests. Clones share the same timeline.
#[derive(Debug, Clone)]
pub struct ManualTimeSource {
    elapsed_ms: Rc<Cell<u64>>,
    wall_origin: DateTime<Local>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::starting_at(Local::now())
    }

    pub fn starting_at(wall_origin: DateTime<Local>) -> Self {
        Self {
            elapsed_ms: Rc::new(Cell::new(0)),
            wall_origin,
        }
    }

    pub fn advance(&self, ms: u64) {
        self.elapsed_ms.set(self.elapsed_ms.get() + ms);
    }
}

impl Default for ManualTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for ManualTimeSource {
    fn monotonic_ms(&self) -> u64 {
        self.elapsed_ms.get()
    }

    fn wall_now(&self) -> DateTime<Local> {
        self.wall_origin + ChronoDuration::milliseconds(self.elapsed_ms.get() as i64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClockState {
    Stopped,
    Running,
    Paused,
}

/// What a single tick observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    Stopped,
    Running { remaining_ms: u64 },
    Paused { remaining_ms: u64 },
    /// Remaining time reached zero on this tick. Reported once; the clock is stopped afterwards.
    Expired,
}

/// Pausable, cancellable countdown.
///
/// The countdown never reads a clock itself: every call that needs the current
/// time takes `now_ms` from the caller's [`TimeSource`], so a test can drive it
/// frame by frame.
#[derive(Debug, Clone)]
pub struct Countdown {
    state: ClockState,
    remaining_ms: u64,
    last_observed_ms: u64,
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            state: ClockState::Stopped,
            remaining_ms: 0,
            last_observed_ms: 0,
        }
    }

    /// Begin counting down. Starting while already running replaces the prior run.
    pub fn start(&mut self, duration_ms: i64, now_ms: u64) -> Result<(), ClockError> {
        if duration_ms < 0 {
            return Err(ClockError::InvalidDuration(duration_ms));
        }
        self.state = ClockState::Running;
        self.remaining_ms = duration_ms as u64;
        self.last_observed_ms = now_ms;
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.state == ClockState::Running {
            self.state = ClockState::Paused;
        }
    }

    /// Resume counting. The tick reference moves to `now_ms` so the paused span is not counted.
    pub fn resume(&mut self, now_ms: u64) {
        if self.state == ClockState::Paused {
            self.state = ClockState::Running;
            self.last_observed_ms = now_ms;
        }
    }

    pub fn cancel(&mut self) {
        self.state = ClockState::Stopped;
        self.remaining_ms = 0;
    }

    pub fn tick(&mut self, now_ms: u64) -> ClockTick {
        match self.state {
            ClockState::Stopped => ClockTick::Stopped,
            ClockState::Paused => {
                self.last_observed_ms = now_ms;
                ClockTick::Paused {
                    remaining_ms: self.remaining_ms,
                }
            }
            ClockState::Running => {
                let delta = now_ms.saturating_sub(self.last_observed_ms);
                self.last_observed_ms = now_ms;
                self.remaining_ms = self.remaining_ms.saturating_sub(delta);

                if self.remaining_ms == 0 {
                    self.state = ClockState::Stopped;
                    ClockTick::Expired
                } else {
                    ClockTick::Running {
                        remaining_ms: self.remaining_ms,
                    }
                }
            }
        }
    }

}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}
