//! Command definitions for the Good Day To Learn CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::audio::AudioOptions;
use crate::types::{
    PhaseConfig, DEFAULT_LONG_BREAK_MINUTES, DEFAULT_SHORT_BREAK_MINUTES, DEFAULT_WORK_MINUTES,
};

/// Default music volume in percent.
pub const DEFAULT_MUSIC_VOLUME_PERCENT: u8 = 50;
/// Default alarm volume in percent.
pub const DEFAULT_ALARM_VOLUME_PERCENT: u8 = 70;

// ============================================================================
// CLI Structure
// ============================================================================

/// Good Day To Learn - a Pomodoro timer with ambient music
#[derive(Parser, Debug)]
#[command(
    name = "good-day-to-learn",
    version,
    about = "Pomodoro timer with ambient music and phase alarms",
    long_about = "A terminal Pomodoro timer.\n\
                  Four work intervals separated by short breaks, then a long break. \
                  Rain sounds play while you work and an alarm marks every phase change.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the interactive timer
    Run(RunArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Work duration in minutes (1-120)
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_WORK_MINUTES,
        value_parser = clap::value_parser!(u32).range(1..=120)
    )]
    pub work: u32,

    /// Short break duration in minutes (1-60)
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_SHORT_BREAK_MINUTES,
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub short_break: u32,

    /// Long break duration in minutes (1-120)
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_LONG_BREAK_MINUTES,
        value_parser = clap::value_parser!(u32).range(1..=120)
    )]
    pub long_break: u32,

    /// Ambient music volume in percent (0-100)
    #[arg(
        long,
        default_value_t = DEFAULT_MUSIC_VOLUME_PERCENT,
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub music_volume: u8,

    /// Alarm volume in percent (0-100)
    #[arg(
        long,
        default_value_t = DEFAULT_ALARM_VOLUME_PERCENT,
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub alarm_volume: u8,

    /// Music file to loop during work (default: rain.wav)
    #[arg(long, value_parser = validate_audio_file)]
    pub music_file: Option<PathBuf>,

    /// Alarm file played at phase changes (default: alarm.wav)
    #[arg(long, value_parser = validate_audio_file)]
    pub alarm_file: Option<PathBuf>,

    /// Disable all sound
    #[arg(long)]
    pub no_sound: bool,

    /// Print timer events as JSON lines instead of the live display
    #[arg(long)]
    pub json: bool,

    /// Start the first work interval immediately
    #[arg(long)]
    pub autostart: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            work: DEFAULT_WORK_MINUTES,
            short_break: DEFAULT_SHORT_BREAK_MINUTES,
            long_break: DEFAULT_LONG_BREAK_MINUTES,
            music_volume: DEFAULT_MUSIC_VOLUME_PERCENT,
            alarm_volume: DEFAULT_ALARM_VOLUME_PERCENT,
            music_file: None,
            alarm_file: None,
            no_sound: false,
            json: false,
            autostart: false,
        }
    }
}

impl RunArgs {
    /// Phase durations requested on the command line.
    pub fn phase_config(&self) -> PhaseConfig {
        PhaseConfig::from_minutes(self.work, self.short_break, self.long_break)
    }

    /// Audio options requested on the command line.
    pub fn audio_options(&self) -> AudioOptions {
        AudioOptions {
            music_volume: f32::from(self.music_volume) / 100.0,
            alarm_volume: f32::from(self.alarm_volume) / 100.0,
            music_file: self.music_file.clone(),
            alarm_file: self.alarm_file.clone(),
            disabled: self.no_sound,
        }
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates that an audio file path points to an existing file.
fn validate_audio_file(s: &str) -> Result<PathBuf, String> {
    if s.is_empty() {
        return Err("File path cannot be empty".to_string());
    }
    let path = PathBuf::from(s);
    if !path.is_file() {
        return Err(format!("No such file: {}", s));
    }
    Ok(path)
}

// ============================================================================
// Tests
// ============================================================================
