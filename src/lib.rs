//! Good Day To Learn Library
//!
//! This library provides the core functionality for the Pomodoro timer.
//! It includes:
//! - Countdown engine and phase sequencer (four work intervals per cycle)
//! - Audio playback for ambient music and phase alarms
//! - Settings validation
//! - CLI argument parsing, interactive commands and display utilities
//! - Type definitions for configuration and state

pub mod app;
pub mod audio;
pub mod cli;
pub mod settings;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use app::{App, Flow};
pub use audio::{AudioError, AudioOptions, AudioPlayer, MockAudioPlayer, SilentAudioPlayer};
pub use settings::{SettingsError, SettingsUpdate};
pub use timer::{CountdownEngine, PhaseSequencer, PhaseTransition, TickStatus, TimerEvent};
pub use types::{format_time_display, PhaseConfig, PhaseKind, TimerSnapshot};
