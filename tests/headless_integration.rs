use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use endclock::clock::ManualTimeSource;
use endclock::config::RoundConfig;
use endclock::controls::{action_for, Action, Mode};
use endclock::cue::{Cue, CueSink, RecordingSink};
use endclock::round::{Round, Status, TickOutcome};
use endclock::runtime::{FixedTicker, Flow, Runner, TestEventSource, TimerEvent};

fn key(c: char) -> TimerEvent {
    TimerEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn dispatch(round: &mut Round<ManualTimeSource>, action: Action) {
    match action {
        Action::Start => {
            round.start_round();
        }
        Action::TogglePause => {
            round.toggle_pause();
        }
        Action::FinishNow => {
            round.finish_now();
        }
        Action::NextSegment => {
            round.next_segment();
        }
        Action::RestartEnd => {
            round.restart_end();
        }
        Action::ConfirmReset => {
            round.reset();
        }
        _ => {}
    }
}

fn mode_for(round: &Round<ManualTimeSource>) -> Mode {
    if round.state().status == Status::Idle {
        Mode::Setup
    } else {
        Mode::Running
    }
}

// Headless run of the event loop with a simulated clock: every Tick advances
// simulated time by one frame, keys map to round operations.
#[test]
fn headless_dual_line_round_via_keys() {
    let time = ManualTimeSource::new();
    let cfg = RoundConfig {
        line_count: 2,
        practice_ends: 1,
        scoring_ends: 1,
        prep_secs: 0,
        shoot_secs: 1,
        ..RoundConfig::default()
    };
    let mut round = Round::new(cfg, time.clone());
    let mut sink = RecordingSink::default();

    let (tx, rx) = mpsc::channel();
    tx.send(key('s')).unwrap();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(20)),
    );

    let mut frames = 0u32;
    let result: Result<(), mpsc::SendError<TimerEvent>> = runner.run(|event| {
        match event {
            TimerEvent::Tick => {
                frames += 1;
                time.advance(100);
                // operator presses space once the shooting ends
                if round.tick() == TickOutcome::Advanced(Status::Between) {
                    tx.send(key(' '))?;
                }
            }
            TimerEvent::Resize => {}
            TimerEvent::Key(k) => {
                if let Some(action) = action_for(k, mode_for(&round)) {
                    dispatch(&mut round, action);
                }
            }
        }
        for cue in round.drain_cues() {
            sink.emit(cue);
        }

        let done = round.state().status == Status::Finished || frames >= 500;
        Ok(if done { Flow::Quit } else { Flow::Continue })
    });

    assert!(result.is_ok());
    assert_eq!(round.state().status, Status::Finished);
    let durations = round.tracker().durations();
    assert_eq!(durations.len(), 4);
    assert!(durations.iter().all(|&d| d >= 1_000));
    assert_eq!(sink.cues, [Cue::ShootStarted, Cue::EndCompleted].repeat(4));
}

#[test]
fn headless_pause_blocks_expiry() {
    let time = ManualTimeSource::new();
    let cfg = RoundConfig {
        line_count: 1,
        practice_ends: 0,
        scoring_ends: 1,
        prep_secs: 0,
        shoot_secs: 2,
        ..RoundConfig::default()
    };
    let mut round = Round::new(cfg, time.clone());

    let (tx, rx) = mpsc::channel();
    tx.send(key('s')).unwrap();
    tx.send(key('d')).unwrap();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(20)),
    );

    for _ in 0..50u32 {
        match runner.step() {
            Some(TimerEvent::Tick) => {
                time.advance(100);
                round.tick();
            }
            Some(TimerEvent::Key(k)) => {
                if let Some(action) = action_for(k, mode_for(&round)) {
                    dispatch(&mut round, action);
                }
            }
            Some(TimerEvent::Resize) | None => {}
        }
    }

    // seconds of simulated frames later the paused interval is untouched
    assert_eq!(round.state().status, Status::Shoot);
    assert!(round.state().paused());
    assert_eq!(round.state().remaining_ms, 2_000);
}

#[test]
fn headless_loop_ends_when_input_closes() {
    let time = ManualTimeSource::new();
    let mut round = Round::new(RoundConfig::default(), time);

    let (tx, rx) = mpsc::channel();
    tx.send(key('s')).unwrap();
    drop(tx);
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_secs(5)),
    );

    let result: Result<(), ()> = runner.run(|event| {
        if let TimerEvent::Key(k) = event {
            if let Some(action) = action_for(k, mode_for(&round)) {
                dispatch(&mut round, action);
            }
        }
        Ok(Flow::Continue)
    });

    assert_eq!(result, Ok(()));
    assert_eq!(round.state().status, Status::Prep);
}

#[test]
fn headless_keys_rejected_in_wrong_state_are_noops() {
    let time = ManualTimeSource::new();
    let mut round = Round::new(RoundConfig::default(), time);

    // space / f / d before the round starts
    for c in [' ', 'f', 'd', 'j'] {
        if let TimerEvent::Key(k) = key(c) {
            if let Some(action) = action_for(k, Mode::Running) {
                dispatch(&mut round, action);
            }
        }
    }

    assert_eq!(round.state().status, Status::Idle);
    assert_eq!(round.drain_cues().count(), 0);
}
