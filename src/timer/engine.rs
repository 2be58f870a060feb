//! Countdown engine for the Pomodoro timer.
//!
//! This module provides the core timer functionality:
//! - State transitions (Idle ⇄ Running)
//! - Countdown with tokio::time::interval on a background task
//! - Event firing for ticks, phase completion and lifecycle changes
//! - At most one tick loop per engine
//!
//! The engine is a cheap handle; clones share the same countdown. The tick
//! loop checks the running flag and its run id on every tick, so `stop()` and
//! `reset()` take effect within one tick and a stale loop retires as soon as
//! a newer `start()` has happened.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::sequencer::PhaseSequencer;
use crate::types::{PhaseConfig, PhaseKind, TimerSnapshot, TimerState};

/// Time between two ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

// ============================================================================
// TimerEvent
// ============================================================================

/// Details of a completed phase and the phase loaded in its place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseTransition {
    /// Phase that just ran out
    pub completed: PhaseKind,
    /// Phase now loaded into the countdown
    pub next: PhaseKind,
    pub is_break: bool,
    /// Interval index after the transition
    pub interval_index: u8,
    /// Duration of the next phase in seconds
    pub remaining_seconds: u32,
    /// Announcement for the display ("Short Break!", ...)
    pub message: &'static str,
}

/// Timer events for the display and audio collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimerEvent {
    /// Countdown started or resumed
    Started {
        phase: PhaseKind,
        remaining_seconds: u32,
    },
    /// Countdown stopped; remaining time kept
    Stopped { remaining_seconds: u32 },
    /// Cycle reset to the first work interval
    Reset { remaining_seconds: u32 },
    /// One second elapsed without finishing the phase
    Tick { remaining_seconds: u32 },
    /// The current phase reached zero
    PhaseCompleted(PhaseTransition),
    /// Phase durations changed
    SettingsChanged {
        work_minutes: u32,
        short_break_minutes: u32,
        long_break_minutes: u32,
    },
}

// ============================================================================
// Countdown
// ============================================================================

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// Nothing to do: the timer is idle or the calling loop is stale
    Idle,
    /// One second was counted
    Ticked,
    /// The phase finished and the next one was loaded
    Completed,
}

/// Mutable state behind the engine handle.
#[derive(Debug)]
struct Countdown {
    state: TimerState,
    sequencer: PhaseSequencer,
    /// Incremented on every `start()`; identifies the live tick loop
    run_id: u64,
}

impl Countdown {
    fn new(config: PhaseConfig) -> Self {
        let sequencer = PhaseSequencer::new(config);
        Self {
            state: TimerState::idle(sequencer.current_duration()),
            sequencer,
            run_id: 0,
        }
    }

    fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.sequencer.current_phase(),
            interval_index: self.sequencer.interval_index(),
            remaining_seconds: self.state.remaining_seconds,
            total_seconds: self.sequencer.current_duration(),
            running: self.state.running,
        }
    }

    /// Counts one second; on reaching zero advances to the next phase.
    fn tick(&mut self, run_id: Option<u64>) -> (TickStatus, Option<TimerEvent>) {
        if !self.state.running || run_id.is_some_and(|id| id != self.run_id) {
            return (TickStatus::Idle, None);
        }

        if !self.state.tick() {
            let event = TimerEvent::Tick {
                remaining_seconds: self.state.remaining_seconds,
            };
            return (TickStatus::Ticked, Some(event));
        }

        let completed = self.sequencer.current_phase();
        let next = self.sequencer.advance();
        self.state.remaining_seconds = next.duration_seconds;

        let transition = PhaseTransition {
            completed,
            next: next.kind,
            is_break: next.kind.is_break(),
            interval_index: self.sequencer.interval_index(),
            remaining_seconds: next.duration_seconds,
            message: next.kind.transition_message(),
        };
        (TickStatus::Completed, Some(TimerEvent::PhaseCompleted(transition)))
    }

    fn settings_event(&self) -> TimerEvent {
        let config = self.sequencer.config();
        TimerEvent::SettingsChanged {
            work_minutes: config.work_minutes(),
            short_break_minutes: config.short_break_minutes(),
            long_break_minutes: config.long_break_minutes(),
        }
    }
}

struct Shared {
    countdown: Mutex<Countdown>,
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Countdown> {
        self.countdown.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("Timer event dropped: receiver closed");
        }
    }

    fn tick(&self, run_id: Option<u64>) -> TickStatus {
        let (status, event) = self.lock().tick(run_id);
        if let Some(event) = event {
            if let TimerEvent::PhaseCompleted(transition) = &event {
                info!(
                    "{} finished, next: {} ({}s, interval {})",
                    transition.completed,
                    transition.next,
                    transition.remaining_seconds,
                    transition.interval_index
                );
            }
            self.emit(event);
        }
        status
    }
}

// ============================================================================
// CountdownEngine
// ============================================================================

/// Handle to the Pomodoro countdown.
#[derive(Clone)]
pub struct CountdownEngine {
    shared: Arc<Shared>,
}

impl CountdownEngine {
    /// Creates an idle engine loaded with the first work interval.
    pub fn new(config: PhaseConfig, event_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self {
            shared: Arc::new(Shared {
                countdown: Mutex::new(Countdown::new(config)),
                event_tx,
            }),
        }
    }

    /// Starts counting down the current phase.
    ///
    /// Spawns the tick loop on the current tokio runtime. Returns false and
    /// does nothing if the timer is already running.
    pub fn start(&self) -> bool {
        let (run_id, phase, remaining_seconds) = {
            let mut countdown = self.shared.lock();
            if countdown.state.running {
                debug!("Start ignored: timer already running");
                return false;
            }
            if countdown.state.remaining_seconds == 0 {
                countdown.state.remaining_seconds = countdown.sequencer.current_duration();
            }
            countdown.state.running = true;
            countdown.run_id += 1;
            (
                countdown.run_id,
                countdown.sequencer.current_phase(),
                countdown.state.remaining_seconds,
            )
        };

        info!("Timer started: {} with {}s left", phase, remaining_seconds);
        self.shared.emit(TimerEvent::Started {
            phase,
            remaining_seconds,
        });

        let shared = Arc::clone(&self.shared);
        tokio::spawn(run_tick_loop(shared, run_id));
        true
    }

    /// Stops the countdown, keeping the remaining time.
    ///
    /// Returns false if the timer was not running.
    pub fn stop(&self) -> bool {
        let remaining_seconds = {
            let mut countdown = self.shared.lock();
            if !countdown.state.running {
                return false;
            }
            countdown.state.running = false;
            countdown.state.remaining_seconds
        };

        info!("Timer stopped with {}s left", remaining_seconds);
        self.shared.emit(TimerEvent::Stopped { remaining_seconds });
        true
    }

    /// Stops the countdown and returns to the first work interval.
    pub fn reset(&self) {
        let remaining_seconds = {
            let mut countdown = self.shared.lock();
            countdown.state.running = false;
            countdown.sequencer.reset();
            countdown.state.remaining_seconds = countdown.sequencer.current_duration();
            countdown.state.remaining_seconds
        };

        info!("Timer reset");
        self.shared.emit(TimerEvent::Reset { remaining_seconds });
    }

    /// Counts one second of the running phase.
    ///
    /// The background loop calls this once per second; calling it directly
    /// while the loop runs counts extra seconds.
    pub fn tick(&self) -> TickStatus {
        self.shared.tick(None)
    }

    /// Returns a copy of the current timer state.
    pub fn snapshot(&self) -> TimerSnapshot {
        self.shared.lock().snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().state.running
    }

    pub fn config(&self) -> PhaseConfig {
        *self.shared.lock().sequencer.config()
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    /// Sets the work duration in whole minutes.
    ///
    /// While idle in a work phase the countdown is reloaded with the new value.
    pub fn set_work_minutes(&self, minutes: u32) {
        self.update_config(|config| config.set_work_minutes(minutes));
    }

    /// Sets the short break duration in whole minutes.
    pub fn set_short_break_minutes(&self, minutes: u32) {
        self.update_config(|config| config.set_short_break_minutes(minutes));
    }

    /// Sets the long break duration in whole minutes.
    pub fn set_long_break_minutes(&self, minutes: u32) {
        self.update_config(|config| config.set_long_break_minutes(minutes));
    }

    /// Sets all three durations at once, emitting a single event.
    pub fn set_durations(&self, work: u32, short_break: u32, long_break: u32) {
        self.update_config(|config| {
            config.set_work_minutes(work);
            config.set_short_break_minutes(short_break);
            config.set_long_break_minutes(long_break);
        });
    }

    pub fn work_minutes(&self) -> u32 {
        self.config().work_minutes()
    }

    pub fn short_break_minutes(&self) -> u32 {
        self.config().short_break_minutes()
    }

    pub fn long_break_minutes(&self) -> u32 {
        self.config().long_break_minutes()
    }

    fn update_config(&self, apply: impl FnOnce(&mut PhaseConfig)) {
        let event = {
            let mut countdown = self.shared.lock();
            apply(countdown.sequencer.config_mut());
            if !countdown.state.running && countdown.sequencer.current_phase() == PhaseKind::Work
            {
                countdown.state.remaining_seconds = countdown.sequencer.current_duration();
            }
            countdown.settings_event()
        };

        debug!("Timer configuration updated: {:?}", event);
        self.shared.emit(event);
    }
}

/// Drives one run of the countdown until it stops, completes, or is replaced.
async fn run_tick_loop(shared: Arc<Shared>, run_id: u64) {
    let mut ticker = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    debug!("Tick loop {} started", run_id);
    loop {
        ticker.tick().await;

        match shared.tick(Some(run_id)) {
            TickStatus::Ticked => continue,
            TickStatus::Completed | TickStatus::Idle => break,
        }
    }
    debug!("Tick loop {} finished", run_id);
}

// ============================================================================
// Tests
// ============================================================================
