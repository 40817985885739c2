use chrono::{DateTime, Duration as ChronoDuration, Local};

use crate::util::mean;

/// When the round is expected to finish, based on the average segment so far
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishEstimate {
    /// No segment has completed yet
    Unavailable,
    At(DateTime<Local>),
    /// Every segment of the round has completed
    Done,
}

/// Live round statistics. `None` means "no data yet", never zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentStats {
    pub started_at: Option<DateTime<Local>>,
    pub elapsed_ms: Option<u64>,
    pub last_ms: Option<u64>,
    pub average_ms: Option<f64>,
    pub completed: usize,
    pub finish: FinishEstimate,
}

/// Records wall-clock durations of completed line-passes.
///
/// Segments are contiguous: completing one opens the next at the same instant.
#[derive(Debug, Clone, Default)]
pub struct SegmentTracker {
    round_started_at: Option<DateTime<Local>>,
    round_finished_at: Option<DateTime<Local>>,
    segment_started_at: Option<DateTime<Local>>,
    completed: Vec<u64>,
}

impl SegmentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear previous data, stamp the round start and open its first segment.
    pub fn begin_round(&mut self, at: DateTime<Local>) {
        self.reset();
        self.round_started_at = Some(at);
        self.segment_started_at = Some(at);
    }

    /// Open a segment at `at`, discarding any unclosed one.
    pub fn begin_segment(&mut self, at: DateTime<Local>) {
        self.segment_started_at = Some(at);
    }

    /// Close the open segment and open the next one at the same instant.
    /// Returns `None` when no segment was open.
    pub fn complete_segment(&mut self, at: DateTime<Local>) -> Option<u64> {
        let started = self.segment_started_at?;
        let duration_ms = (at - started).num_milliseconds().max(0) as u64;
        self.completed.push(duration_ms);
        self.segment_started_at = Some(at);
        Some(duration_ms)
    }

    /// Stamp the end of the round. Elapsed time stops at this instant and no
    /// segment stays open.
    pub fn finish_round(&mut self, at: DateTime<Local>) {
        self.round_finished_at = Some(at);
        self.segment_started_at = None;
    }

    pub fn reset(&mut self) {
        self.round_started_at = None;
        self.round_finished_at = None;
        self.segment_started_at = None;
        self.completed.clear();
    }

    pub fn durations(&self) -> &[u64] {
        &self.completed
    }

    pub fn stats(&self, total_segments: usize, now: DateTime<Local>) -> SegmentStats {
        let samples: Vec<f64> = self.completed.iter().map(|&d| d as f64).collect();
        let average_ms = mean(&samples);
        let count = self.completed.len();

        let finish = match average_ms {
            None => FinishEstimate::Unavailable,
            Some(_) if count >= total_segments => FinishEstimate::Done,
            Some(avg) => {
                let remaining = (total_segments - count) as f64 * avg;
                FinishEstimate::At(now + ChronoDuration::milliseconds(remaining.round() as i64))
            }
        };

        let until = self.round_finished_at.unwrap_or(now);
        SegmentStats {
            started_at: self.round_started_at,
            elapsed_ms: self
                .round_started_at
                .map(|start| (until - start).num_milliseconds().max(0) as u64),
            last_ms: self.completed.last().copied(),
            average_ms,
            completed: count,
            finish,
        }
    }
}
