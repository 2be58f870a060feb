//! Integration tests for the countdown engine and the phase sequencer.
//!
//! These tests drive the real tick loop on a paused tokio clock:
//! - Full cycle: four work intervals, short breaks in between, then a long break
//! - Stop and resume keep the remaining time
//! - Only one tick loop runs no matter how often start is called
//! - Settings are validated before they reach the engine

use tokio::sync::mpsc;
use tokio::time::{self, Duration};

use good_day_to_learn::settings::{self, SettingsUpdate};
use good_day_to_learn::timer::{CountdownEngine, PhaseTransition, TimerEvent};
use good_day_to_learn::types::{PhaseConfig, PhaseKind};
use good_day_to_learn::MockAudioPlayer;

// ============================================================================
// Test Helpers
// ============================================================================

fn create_engine(config: PhaseConfig) -> (CountdownEngine, mpsc::UnboundedReceiver<TimerEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CountdownEngine::new(config, tx), rx)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn transitions(events: &[TimerEvent]) -> Vec<PhaseTransition> {
    events
        .iter()
        .filter_map(|event| match event {
            TimerEvent::PhaseCompleted(transition) => Some(transition.clone()),
            _ => None,
        })
        .collect()
}

fn ticks(events: &[TimerEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, TimerEvent::Tick { .. }))
        .count()
}

/// Lets the clock run for `seconds` plus a little slack.
async fn advance(seconds: u64) {
    time::sleep(Duration::from_millis(seconds * 1000 + 100)).await;
}

/// Starts the current phase and waits until it completes.
async fn run_phase(engine: &CountdownEngine) {
    let remaining = engine.snapshot().remaining_seconds;
    assert!(engine.start());
    advance(u64::from(remaining)).await;
    assert!(!engine.is_running());
}

// ============================================================================
// Cycle Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_first_work_completion_goes_to_short_break() {
    let (engine, mut rx) = create_engine(PhaseConfig::from_seconds(2, 1, 1));

    run_phase(&engine).await;

    let events = drain(&mut rx);
    let completed = transitions(&events);
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].completed, PhaseKind::Work);
    assert_eq!(completed[0].next, PhaseKind::ShortBreak);
    assert!(completed[0].is_break);
    assert_eq!(completed[0].interval_index, 1);
    assert_eq!(completed[0].remaining_seconds, 1);
    assert_eq!(completed[0].message, "Short Break!");

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.phase, PhaseKind::ShortBreak);
    assert_eq!(snapshot.remaining_seconds, 1);
    assert_eq!(snapshot.status_text(), "Short Break Time");
}

#[tokio::test(start_paused = true)]
async fn test_full_cycle_ends_with_long_break() {
    let (engine, mut rx) = create_engine(PhaseConfig::from_seconds(2, 1, 3));

    // work, break, work, break, work, break, work
    for _ in 0..7 {
        run_phase(&engine).await;
    }

    let completed = transitions(&drain(&mut rx));
    let kinds: Vec<PhaseKind> = completed.iter().map(|t| t.next).collect();
    assert_eq!(
        kinds,
        vec![
            PhaseKind::ShortBreak,
            PhaseKind::Work,
            PhaseKind::ShortBreak,
            PhaseKind::Work,
            PhaseKind::ShortBreak,
            PhaseKind::Work,
            PhaseKind::LongBreak,
        ]
    );

    let last = completed.last().unwrap();
    assert_eq!(last.interval_index, 0);
    assert_eq!(last.remaining_seconds, 3);
    assert_eq!(last.message, "Long Break!");

    // After the long break a new cycle starts at interval 1
    run_phase(&engine).await;
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.phase, PhaseKind::Work);
    assert_eq!(snapshot.interval_index, 0);
    assert_eq!(snapshot.status_text(), "Work Time - Interval 1/4");
}

#[tokio::test(start_paused = true)]
async fn test_interval_index_shown_during_work() {
    let (engine, _rx) = create_engine(PhaseConfig::from_seconds(1, 1, 1));

    run_phase(&engine).await; // work 1
    run_phase(&engine).await; // short break

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.phase, PhaseKind::Work);
    assert_eq!(snapshot.status_text(), "Work Time - Interval 2/4");
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_stop_and_resume_keeps_remaining() {
    let (engine, mut rx) = create_engine(PhaseConfig::from_seconds(10, 1, 1));

    engine.start();
    advance(3).await;
    assert!(engine.stop());
    assert_eq!(engine.snapshot().remaining_seconds, 7);

    advance(5).await;
    assert_eq!(engine.snapshot().remaining_seconds, 7);

    engine.start();
    advance(2).await;
    assert_eq!(engine.snapshot().remaining_seconds, 5);
    assert_eq!(engine.snapshot().time_display(), "00:05");

    let events = drain(&mut rx);
    assert_eq!(ticks(&events), 5);
}

#[tokio::test(start_paused = true)]
async fn test_double_start_counts_once() {
    let (engine, mut rx) = create_engine(PhaseConfig::from_seconds(4, 1, 1));

    assert!(engine.start());
    assert!(!engine.start());
    advance(4).await;

    let events = drain(&mut rx);
    assert_eq!(ticks(&events), 3);
    assert_eq!(transitions(&events).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_quick_stop_start_runs_one_loop() {
    let (engine, mut rx) = create_engine(PhaseConfig::from_seconds(30, 1, 1));

    engine.start();
    time::sleep(Duration::from_millis(500)).await;
    engine.stop();
    engine.start();
    advance(3).await;
    engine.stop();

    // One second per second, never two
    let events = drain(&mut rx);
    assert_eq!(ticks(&events), 3);
    assert_eq!(engine.snapshot().remaining_seconds, 27);
}

#[tokio::test(start_paused = true)]
async fn test_reset_mid_cycle() {
    let (engine, _rx) = create_engine(PhaseConfig::from_seconds(1, 2, 2));

    run_phase(&engine).await;
    engine.start();
    advance(1).await;
    engine.reset();

    let snapshot = engine.snapshot();
    assert!(!snapshot.running);
    assert_eq!(snapshot.phase, PhaseKind::Work);
    assert_eq!(snapshot.interval_index, 0);
    assert_eq!(snapshot.remaining_seconds, 1);

    advance(3).await;
    assert_eq!(engine.snapshot().remaining_seconds, 1);
}

// ============================================================================
// Settings Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_settings_update_applies_to_next_work() {
    let (engine, _rx) = create_engine(PhaseConfig::default());
    let audio = MockAudioPlayer::new();

    let update = SettingsUpdate::parse(["work=50", "short=10", "long=30"]).unwrap();
    settings::apply(&update, &engine, &audio).unwrap();

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.remaining_seconds, 50 * 60);
    assert_eq!(snapshot.time_display(), "50:00");
}

#[test]
fn test_out_of_range_settings_rejected() {
    let (engine, _rx) = create_engine(PhaseConfig::default());

    for tokens in [["work=0"], ["work=121"], ["short=61"], ["long=121"]] {
        assert!(SettingsUpdate::parse(tokens).is_err(), "{:?}", tokens);
    }
    assert_eq!(engine.work_minutes(), 25);
    assert_eq!(engine.short_break_minutes(), 5);
    assert_eq!(engine.long_break_minutes(), 20);
}
