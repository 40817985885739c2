use std::io::Write;

/// Discrete signal emitted on phase boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Cue {
    PrepStarted,
    ShootStarted,
    EndCompleted,
}

impl Cue {
    /// Number of buzzes in the range signal: two to approach, one to shoot, three to stop
    pub fn buzz_count(&self) -> usize {
        match self {
            Cue::PrepStarted => 2,
            Cue::ShootStarted => 1,
            Cue::EndCompleted => 3,
        }
    }
}

pub trait CueSink {
    fn emit(&mut self, cue: Cue);
}

/// Rings the terminal bell once per buzz
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> CueSink for TerminalBell<W> {
    fn emit(&mut self, cue: Cue) {
        let bells = "\x07".repeat(cue.buzz_count());
        if let Err(err) = self
            .out
            .write_all(bells.as_bytes())
            .and_then(|_| self.out.flush())
        {
            tracing::warn!(%cue, %err, "failed to ring terminal bell");
        }
    }
}

/// Collects cues in emission order
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub cues: Vec<Cue>,
}

impl CueSink for RecordingSink {
    fn emit(&mut self, cue: Cue) {
        self.cues.push(cue);
    }
}
