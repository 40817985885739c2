use std::collections::VecDeque;

use crate::clock::{ClockTick, Countdown, TimeSource};
use crate::config::RoundConfig;
use crate::cue::Cue;
use crate::tracker::{SegmentStats, SegmentTracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Status {
    Idle,
    Prep,
    Shoot,
    Between,
    Finished,
}

impl Status {
    /// Prep and Shoot are the timed intervals
    pub fn is_interval(&self) -> bool {
        matches!(self, Status::Prep | Status::Shoot)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Status::Prep | Status::Shoot | Status::Between)
    }
}

/// Why a timed interval is not counting down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Hold {
    #[default]
    Running,
    /// Operator pause
    Paused,
    /// Held at the start of a restarted end, waiting for resume or skip
    Restarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum EndKind {
    Practice,
    #[strum(to_string = "End")]
    Scoring,
}

/// An end's number relative to its phase: practice ends count 1..=practice,
/// scoring ends count 1..=scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndLabel {
    pub kind: EndKind,
    pub number: u32,
    pub total: u32,
}

impl EndLabel {
    pub fn for_end(config: &RoundConfig, end_index: u32) -> Self {
        if config.is_practice(end_index) {
            Self {
                kind: EndKind::Practice,
                number: end_index,
                total: config.practice_ends,
            }
        } else {
            Self {
                kind: EndKind::Scoring,
                number: end_index - config.practice_ends,
                total: config.scoring_ends,
            }
        }
    }
}

/// What follows once the last line of the current end has shot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextUp {
    End(EndLabel),
    Finish,
}

/// The mutable part of a round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    pub status: Status,
    /// 1-based across the whole round, practice first. 0 before the round starts.
    pub current_end_index: u32,
    pub current_line: u8,
    pub hold: Hold,
    pub remaining_ms: u64,
}

impl RoundState {
    fn idle() -> Self {
        Self {
            status: Status::Idle,
            current_end_index: 0,
            current_line: 1,
            hold: Hold::Running,
            remaining_ms: 0,
        }
    }

    pub fn paused(&self) -> bool {
        self.hold != Hold::Running
    }
}

impl Default for RoundState {
    fn default() -> Self {
        Self::idle()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No interval is being timed
    Inactive,
    Counting { remaining_ms: u64 },
    Held,
    /// The interval expired and the round moved to this status
    Advanced(Status),
}

/// Read-only view for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSnapshot {
    pub status: Status,
    pub current_end_index: u32,
    pub current_line: u8,
    pub line_count: u8,
    pub paused: bool,
    pub hold: Hold,
    pub remaining_ms: u64,
    pub display_seconds: u64,
    pub warning: bool,
    pub end_label: Option<EndLabel>,
    pub next_up: Option<NextUp>,
    pub stats: SegmentStats,
    pub total_segments: usize,
    pub can_pause: bool,
    pub can_finish_now: bool,
    pub can_advance: bool,
    pub can_restart: bool,
}

/// One archery round: owns its configuration, countdown, segment tracker and
/// pending cues. Every operation checks its own precondition and returns
/// `false` without side effects when it does not apply.
pub struct Round<T: TimeSource> {
    config: RoundConfig,
    state: RoundState,
    clock: Countdown,
    tracker: SegmentTracker,
    cues: VecDeque<Cue>,
    time: T,
}

impl<T: TimeSource> Round<T> {
    pub fn new(config: RoundConfig, time: T) -> Self {
        Self {
            config,
            state: RoundState::idle(),
            clock: Countdown::new(),
            tracker: SegmentTracker::new(),
            cues: VecDeque::new(),
            time,
        }
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn tracker(&self) -> &SegmentTracker {
        &self.tracker
    }

    /// Replace the configuration. Only accepted before a round starts.
    pub fn configure(&mut self, config: RoundConfig) -> bool {
        if self.state.status != Status::Idle {
            return false;
        }
        self.config = config;
        true
    }

    pub fn can_start(&self) -> bool {
        self.state.status == Status::Idle
    }

    pub fn can_pause(&self) -> bool {
        self.state.status.is_interval()
    }

    pub fn can_finish_now(&self) -> bool {
        self.state.status.is_interval()
    }

    pub fn can_advance(&self) -> bool {
        match self.state.status {
            Status::Between => true,
            Status::Prep | Status::Shoot => self.state.paused(),
            Status::Idle | Status::Finished => false,
        }
    }

    pub fn can_restart(&self) -> bool {
        self.state.status.is_running()
    }

    pub fn can_reset(&self) -> bool {
        self.state.status != Status::Idle
    }

    pub fn start_round(&mut self) -> bool {
        if !self.can_start() {
            return false;
        }
        self.state.current_end_index = 1;
        self.state.current_line = 1;
        self.tracker.begin_round(self.time.wall_now());
        tracing::info!(
            lines = self.config.line_count,
            practice_ends = self.config.practice_ends,
            scoring_ends = self.config.scoring_ends,
            "round started"
        );
        self.enter_interval(self.first_interval());
        true
    }

    /// Advance the countdown to the time source's current time and apply an expiry.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.status.is_interval() {
            return TickOutcome::Inactive;
        }
        match self.clock.tick(self.time.monotonic_ms()) {
            ClockTick::Running { remaining_ms } => {
                self.state.remaining_ms = remaining_ms;
                TickOutcome::Counting { remaining_ms }
            }
            ClockTick::Paused { .. } => TickOutcome::Held,
            ClockTick::Stopped => TickOutcome::Inactive,
            ClockTick::Expired => {
                self.state.remaining_ms = 0;
                match self.state.status {
                    Status::Prep => self.enter_interval(Status::Shoot),
                    Status::Shoot => self.complete_shooting(),
                    _ => {}
                }
                TickOutcome::Advanced(self.state.status)
            }
        }
    }

    /// Operator override: end the interval as if shooting time ran out, even from Prep
    pub fn finish_now(&mut self) -> bool {
        if !self.can_finish_now() {
            return false;
        }
        tracing::debug!(status = %self.state.status, "finish now");
        self.complete_shooting();
        true
    }

    /// Pause or resume the running interval.
    ///
    /// Pausing first catches the clock up to now. If that ends the shoot
    /// interval, the expiry is applied instead of the pause (round in
    /// `Between`, end cue queued) and the call still returns `true`.
    pub fn toggle_pause(&mut self) -> bool {
        if !self.can_pause() {
            return false;
        }
        match self.state.hold {
            Hold::Running => {
                // count the time since the last frame before freezing
                if self.tick() == TickOutcome::Advanced(Status::Between) {
                    return true;
                }
                self.clock.pause();
                self.state.hold = Hold::Paused;
            }
            Hold::Paused | Hold::Restarted => {
                self.clock.resume(self.time.monotonic_ms());
                self.state.hold = Hold::Running;
            }
        }
        tracing::debug!(paused = self.state.paused(), "pause toggled");
        true
    }

    /// Close the current segment and move to the next line, the next end, or Finished.
    pub fn next_segment(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        if let Some(duration_ms) = self.tracker.complete_segment(self.time.wall_now()) {
            tracing::debug!(
                end = self.state.current_end_index,
                line = self.state.current_line,
                duration_ms,
                "segment completed"
            );
        }

        if !self.is_last_line() {
            self.state.current_line = 2;
            self.enter_interval(self.first_interval());
        } else if self.state.current_end_index < self.config.total_ends() {
            self.state.current_end_index += 1;
            self.state.current_line = 1;
            self.enter_interval(self.first_interval());
        } else {
            self.finish();
        }
        true
    }

    /// Go back to line 1 of the current end and hold there. The partial segment is discarded.
    pub fn restart_end(&mut self) -> bool {
        if !self.can_restart() {
            return false;
        }
        self.clock.cancel();
        self.state.current_line = 1;
        self.enter_interval(self.first_interval());
        self.clock.pause();
        self.state.hold = Hold::Restarted;
        self.tracker.begin_segment(self.time.wall_now());
        tracing::info!(end = self.state.current_end_index, "end restarted");
        true
    }

    /// Abandon the round and return to Idle. Confirmation is the caller's job.
    pub fn reset(&mut self) -> bool {
        if !self.can_reset() {
            return false;
        }
        self.clock.cancel();
        self.tracker.reset();
        self.cues.clear();
        self.state = RoundState::idle();
        tracing::info!("round reset");
        true
    }

    pub fn drain_cues(&mut self) -> impl Iterator<Item = Cue> + '_ {
        self.cues.drain(..)
    }

    pub fn end_label(&self) -> Option<EndLabel> {
        match self.state.status {
            Status::Idle => None,
            _ => Some(EndLabel::for_end(&self.config, self.state.current_end_index)),
        }
    }

    /// Only reported between ends, after the last line of the end has shot
    pub fn next_up(&self) -> Option<NextUp> {
        if self.state.status != Status::Between || !self.is_last_line() {
            return None;
        }
        let next = self.state.current_end_index + 1;
        if next <= self.config.total_ends() {
            Some(NextUp::End(EndLabel::for_end(&self.config, next)))
        } else {
            Some(NextUp::Finish)
        }
    }

    pub fn display_seconds(&self) -> u64 {
        self.state.remaining_ms.div_ceil(1000)
    }

    pub fn in_warning(&self) -> bool {
        let shown = self.display_seconds();
        self.state.status == Status::Shoot
            && shown > 0
            && shown <= self.config.warning_threshold_secs as u64
    }

    pub fn stats(&self) -> SegmentStats {
        self.tracker
            .stats(self.config.total_segments(), self.time.wall_now())
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            status: self.state.status,
            current_end_index: self.state.current_end_index,
            current_line: self.state.current_line,
            line_count: self.config.line_count,
            paused: self.state.paused(),
            hold: self.state.hold,
            remaining_ms: self.state.remaining_ms,
            display_seconds: self.display_seconds(),
            warning: self.in_warning(),
            end_label: self.end_label(),
            next_up: self.next_up(),
            stats: self.stats(),
            total_segments: self.config.total_segments(),
            can_pause: self.can_pause(),
            can_finish_now: self.can_finish_now(),
            can_advance: self.can_advance(),
            can_restart: self.can_restart(),
        }
    }

    fn first_interval(&self) -> Status {
        if self.config.prep_secs > 0 {
            Status::Prep
        } else {
            Status::Shoot
        }
    }

    fn is_last_line(&self) -> bool {
        !self.config.is_dual_line() || self.state.current_line == 2
    }

    fn enter_interval(&mut self, status: Status) {
        let (duration_ms, cue, enabled) = match status {
            Status::Prep => (self.config.prep_ms(), Cue::PrepStarted, self.config.beep_on_prep),
            Status::Shoot => (
                self.config.shoot_ms(),
                Cue::ShootStarted,
                self.config.beep_on_shoot,
            ),
            _ => return,
        };

        self.state.status = status;
        self.state.hold = Hold::Running;
        self.state.remaining_ms = duration_ms.max(0) as u64;
        if let Err(err) = self.clock.start(duration_ms, self.time.monotonic_ms()) {
            tracing::warn!(%err, %status, "interval not started");
        }
        if enabled {
            self.cues.push_back(cue);
        }
        tracing::debug!(
            %status,
            end = self.state.current_end_index,
            line = self.state.current_line,
            "entered interval"
        );
    }

    fn complete_shooting(&mut self) {
        if self.config.beep_on_end_complete {
            self.cues.push_back(Cue::EndCompleted);
        }
        self.clock.cancel();
        self.state.status = Status::Between;
        self.state.hold = Hold::Running;
        self.state.remaining_ms = 0;
        tracing::debug!(
            end = self.state.current_end_index,
            line = self.state.current_line,
            "shooting complete"
        );
    }

    fn finish(&mut self) {
        self.clock.cancel();
        self.tracker.finish_round(self.time.wall_now());
        self.state.status = Status::Finished;
        self.state.hold = Hold::Running;
        self.state.remaining_ms = 0;
        tracing::info!(
            segments = self.tracker.durations().len(),
            "round finished"
        );
    }
}
