//! Interactive command parsing.
//!
//! While the timer runs, each line typed on stdin is one command. The
//! single-key forms follow the keyboard shortcuts of the desktop app:
//! an empty line toggles the timer, `r` resets, `s` opens settings and
//! `esc` stops.

use std::fmt;

use thiserror::Error;

use crate::settings::{SettingsError, SettingsUpdate};

// ============================================================================
// Command
// ============================================================================

/// Commands accepted on the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start or resume the countdown
    Start,
    /// Stop the countdown, keeping the remaining time
    Stop,
    /// Start if stopped, stop if running
    Toggle,
    /// Back to the first work interval
    Reset,
    /// Show the current phase and remaining time
    Status,
    /// Show (empty update) or change settings
    Settings(SettingsUpdate),
    /// List commands
    Help,
    /// Leave the application
    Quit,
}

impl Command {
    /// Parses one input line.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Unknown` for unrecognised commands and
    /// `InputError::Settings` for invalid settings tokens.
    pub fn parse(line: &str) -> Result<Self, InputError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Command::Toggle);
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "start" => Command::Start,
            "stop" | "esc" | "escape" => Command::Stop,
            "toggle" | "space" => Command::Toggle,
            "reset" | "r" => Command::Reset,
            "status" | "st" => Command::Status,
            "settings" | "s" => return Ok(Command::Settings(SettingsUpdate::parse(words)?)),
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(InputError::Unknown(other.to_string())),
        };

        if let Some(extra) = words.next() {
            return Err(InputError::UnexpectedArgument {
                command: command.as_command(),
                argument: extra.to_string(),
            });
        }
        Ok(command)
    }

    /// Returns the canonical command word.
    pub fn as_command(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Stop => "stop",
            Command::Toggle => "toggle",
            Command::Reset => "reset",
            Command::Status => "status",
            Command::Settings(_) => "settings",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_command())
    }
}

/// Help lines: (usage, description).
pub const COMMAND_HELP: &[(&str, &str)] = &[
    ("<enter> | toggle", "Start or stop the timer"),
    ("start", "Start the timer"),
    ("stop | esc", "Stop the timer (remaining time is kept)"),
    ("reset | r", "Reset to the first work interval"),
    ("status", "Show the current phase"),
    ("settings | s", "Show current settings"),
    (
        "settings work=N short=N long=N",
        "Set durations in minutes (a running phase keeps its time)",
    ),
    ("settings music=N alarm=N", "Set volumes in percent (0-100)"),
    (
        "settings music-file=PATH alarm-file=PATH",
        "Choose sound files (`default` restores the built-in ones)",
    ),
    ("help", "Show this help"),
    ("quit | q", "Quit"),
];

// ============================================================================
// InputError
// ============================================================================

/// Errors from parsing an input line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Unknown command '{0}' (type `help` for a list)")]
    Unknown(String),

    #[error("`{command}` takes no arguments, got '{argument}'")]
    UnexpectedArgument {
        command: &'static str,
        argument: String,
    },

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

// ============================================================================
// Tests
// ============================================================================
