use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Display refresh cadence for the countdown
pub const FRAME_INTERVAL_MS: u64 = 50;

/// What the loop hands to its handler
#[derive(Clone, Debug)]
pub enum TimerEvent {
    Key(KeyEvent),
    Resize,
    /// A frame is due: advance the round and redraw
    Tick,
}

/// Whether the loop keeps going after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Source of terminal input
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for input. `Disconnected` means no
    /// more input will ever arrive.
    fn recv_timeout(&self, timeout: Duration) -> Result<TimerEvent, RecvTimeoutError>;
}

/// Production event source: a reader thread forwarding crossterm events
pub struct CrosstermEventSource {
    rx: Receiver<TimerEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                Ok(CtEvent::Key(key)) => tx.send(TimerEvent::Key(key)),
                Ok(CtEvent::Resize(_, _)) => tx.send(TimerEvent::Resize),
                Ok(_) => Ok(()),
                Err(err) => {
                    tracing::error!(%err, "terminal event stream closed");
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TimerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Frame cadence
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn frames() -> Self {
        Self::new(Duration::from_millis(FRAME_INTERVAL_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-fed event source for tests
pub struct TestEventSource {
    rx: Receiver<TimerEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<TimerEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TimerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Repeating frame task multiplexed with terminal input.
///
/// Frames are scheduled against a deadline rather than an idle timeout, so a
/// burst of keys delays a `Tick` by at most one interval.
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    next_frame: Instant,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        let next_frame = Instant::now() + ticker.interval();
        Self {
            event_source,
            ticker,
            next_frame,
        }
    }

    /// Next input or due frame. `None` once the event source has closed.
    pub fn step(&mut self) -> Option<TimerEvent> {
        let now = Instant::now();
        if now >= self.next_frame {
            self.schedule_after(now);
            return Some(TimerEvent::Tick);
        }

        match self.event_source.recv_timeout(self.next_frame - now) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) => {
                self.schedule_after(Instant::now());
                Some(TimerEvent::Tick)
            }
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Drive `handle` with every event until it asks to quit or input closes.
    pub fn run<F, Err>(&mut self, mut handle: F) -> Result<(), Err>
    where
        F: FnMut(TimerEvent) -> Result<Flow, Err>,
    {
        loop {
            let Some(event) = self.step() else {
                tracing::warn!("event source closed, stopping");
                return Ok(());
            };
            if handle(event)? == Flow::Quit {
                return Ok(());
            }
        }
    }

    // a late frame does not trigger a catch-up burst
    fn schedule_after(&mut self, now: Instant) {
        self.next_frame += self.ticker.interval();
        if self.next_frame <= now {
            self.next_frame = now + self.ticker.interval();
        }
    }
}
