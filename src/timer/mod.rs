//! Timer module for the Pomodoro timer.
//!
//! This module contains the countdown core:
//! - `sequencer`: Work/break cycle decisions
//! - `engine`: Countdown engine with its background tick loop and events

pub mod engine;
pub mod sequencer;

pub use engine::{CountdownEngine, PhaseTransition, TickStatus, TimerEvent, TICK_INTERVAL};
pub use sequencer::{NextPhase, PhaseSequencer};
