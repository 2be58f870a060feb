//! Core data types for the Pomodoro timer.
//!
//! This module defines the data structures used for:
//! - Phase kinds and the 4-interval work/break cycle
//! - Phase durations with their allowed minute ranges
//! - Timer state and the read-only snapshot handed to the display
//! - Time formatting for the countdown display

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Defaults and Limits
// ============================================================================

/// Default work duration in minutes.
pub const DEFAULT_WORK_MINUTES: u32 = 25;
/// Default short break duration in minutes.
pub const DEFAULT_SHORT_BREAK_MINUTES: u32 = 5;
/// Default long break duration in minutes.
pub const DEFAULT_LONG_BREAK_MINUTES: u32 = 20;

/// Default ambient music volume (0.0 to 1.0).
pub const DEFAULT_MUSIC_VOLUME: f32 = 0.5;
/// Default alarm volume (0.0 to 1.0).
pub const DEFAULT_ALARM_VOLUME: f32 = 0.7;

/// Number of work intervals before a long break.
pub const INTERVALS_PER_CYCLE: u8 = 4;

/// Inclusive range of accepted values for a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub min: u32,
    pub max: u32,
}

impl Limits {
    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Allowed work duration (minutes).
pub const WORK_LIMITS: Limits = Limits { min: 1, max: 120 };
/// Allowed short break duration (minutes).
pub const SHORT_BREAK_LIMITS: Limits = Limits { min: 1, max: 60 };
/// Allowed long break duration (minutes).
pub const LONG_BREAK_LIMITS: Limits = Limits { min: 1, max: 120 };

// ============================================================================
// PhaseKind
// ============================================================================

/// The kind of phase the timer is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    /// Focused work interval
    Work,
    /// Short break between work intervals
    ShortBreak,
    /// Long break after a full cycle of work intervals
    LongBreak,
}

impl PhaseKind {
    /// Returns the machine-readable name of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Work => "work",
            PhaseKind::ShortBreak => "short_break",
            PhaseKind::LongBreak => "long_break",
        }
    }

    /// Returns true for either kind of break.
    pub fn is_break(&self) -> bool {
        matches!(self, PhaseKind::ShortBreak | PhaseKind::LongBreak)
    }

    /// Returns the message announced when this phase begins.
    pub fn transition_message(&self) -> &'static str {
        match self {
            PhaseKind::Work => "Back to Work!",
            PhaseKind::ShortBreak => "Short Break!",
            PhaseKind::LongBreak => "Long Break!",
        }
    }
}

impl Default for PhaseKind {
    fn default() -> Self {
        PhaseKind::Work
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseKind::Work => write!(f, "work"),
            PhaseKind::ShortBreak => write!(f, "short break"),
            PhaseKind::LongBreak => write!(f, "long break"),
        }
    }
}

// ============================================================================
// PhaseConfig
// ============================================================================

/// Configured duration of each phase, stored in seconds.
///
/// Setters take whole minutes. Range checks are the caller's job; see
/// [`crate::settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseConfig {
    work_seconds: u32,
    short_break_seconds: u32,
    long_break_seconds: u32,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self::from_minutes(
            DEFAULT_WORK_MINUTES,
            DEFAULT_SHORT_BREAK_MINUTES,
            DEFAULT_LONG_BREAK_MINUTES,
        )
    }
}

impl PhaseConfig {
    /// Creates a configuration from whole minutes.
    ///
    /// Durations saturate at `u32::MAX` seconds.
    pub fn from_minutes(work: u32, short_break: u32, long_break: u32) -> Self {
        Self {
            work_seconds: work.saturating_mul(60),
            short_break_seconds: short_break.saturating_mul(60),
            long_break_seconds: long_break.saturating_mul(60),
        }
    }

    /// Creates a configuration from raw seconds.
    ///
    /// Used for short test cycles; the settings surface only deals in minutes.
    pub fn from_seconds(work: u32, short_break: u32, long_break: u32) -> Self {
        Self {
            work_seconds: work,
            short_break_seconds: short_break,
            long_break_seconds: long_break,
        }
    }

    /// Returns the configured duration of `phase` in seconds.
    pub fn duration_of(&self, phase: PhaseKind) -> u32 {
        match phase {
            PhaseKind::Work => self.work_seconds,
            PhaseKind::ShortBreak => self.short_break_seconds,
            PhaseKind::LongBreak => self.long_break_seconds,
        }
    }

    pub fn set_work_minutes(&mut self, minutes: u32) {
        self.work_seconds = minutes.saturating_mul(60);
    }

    pub fn set_short_break_minutes(&mut self, minutes: u32) {
        self.short_break_seconds = minutes.saturating_mul(60);
    }

    pub fn set_long_break_minutes(&mut self, minutes: u32) {
        self.long_break_seconds = minutes.saturating_mul(60);
    }

    pub fn work_minutes(&self) -> u32 {
        self.work_seconds / 60
    }

    pub fn short_break_minutes(&self) -> u32 {
        self.short_break_seconds / 60
    }

    pub fn long_break_minutes(&self) -> u32 {
        self.long_break_seconds / 60
    }
}

// ============================================================================
// CycleState
// ============================================================================

/// Position within the work/break cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleState {
    /// Phase currently loaded into the countdown
    pub phase: PhaseKind,
    /// Completed work intervals in the current cycle (0-3)
    pub interval_index: u8,
}

impl CycleState {
    pub fn is_break(&self) -> bool {
        self.phase.is_break()
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Countdown state owned by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Seconds left in the current phase
    pub remaining_seconds: u32,
    /// Whether the countdown is ticking
    pub running: bool,
}

impl TimerState {
    /// Creates an idle state holding `remaining_seconds`.
    pub fn idle(remaining_seconds: u32) -> Self {
        Self {
            remaining_seconds,
            running: false,
        }
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true if this tick brought the countdown to zero. Reaching zero
    /// clears `running`.
    pub fn tick(&mut self) -> bool {
        if !self.running || self.remaining_seconds == 0 {
            return false;
        }
        self.remaining_seconds -= 1;
        if self.remaining_seconds == 0 {
            self.running = false;
            return true;
        }
        false
    }
}

// ============================================================================
// TimerSnapshot
// ============================================================================

/// Point-in-time view of the engine for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: PhaseKind,
    pub interval_index: u8,
    pub remaining_seconds: u32,
    /// Configured length of the current phase
    pub total_seconds: u32,
    pub running: bool,
}

impl TimerSnapshot {
    pub fn is_break(&self) -> bool {
        self.phase.is_break()
    }

    /// Returns the countdown as `MM:SS`.
    pub fn time_display(&self) -> String {
        format_time_display(self.remaining_seconds)
    }

    /// Returns the status line for the current phase.
    pub fn status_text(&self) -> String {
        status_text(self.phase, self.interval_index)
    }

    /// Fraction of the current phase already elapsed, in `0.0..=1.0`.
    ///
    /// Zero while idle.
    pub fn progress(&self) -> f64 {
        if !self.running || self.total_seconds == 0 {
            return 0.0;
        }
        let elapsed = 1.0 - f64::from(self.remaining_seconds) / f64::from(self.total_seconds);
        elapsed.clamp(0.0, 1.0)
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// Formats seconds as `MM:SS`, both fields zero-padded to two digits.
///
/// Minutes are not wrapped into hours: 3661 seconds is `61:01`.
pub fn format_time_display(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Returns the status text for a phase at a given interval.
pub fn status_text(phase: PhaseKind, interval_index: u8) -> String {
    match phase {
        PhaseKind::Work => format!(
            "Work Time - Interval {}/{}",
            interval_index + 1,
            INTERVALS_PER_CYCLE
        ),
        PhaseKind::ShortBreak => "Short Break Time".to_string(),
        PhaseKind::LongBreak => "Long Break Time".to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
