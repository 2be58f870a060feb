//! Display utilities for the Good Day To Learn CLI.
//!
//! This module renders:
//! - The live countdown line, rewritten in place every tick
//! - Phase transition announcements
//! - Status, settings and help screens
//! - JSON event lines when machine-readable output is requested

use std::io::{self, Write};

use crate::cli::input::COMMAND_HELP;
use crate::settings::{AppliedSettings, CurrentSettings};
use crate::timer::{PhaseTransition, TimerEvent};
use crate::types::TimerSnapshot;

/// Application title shown in the banner.
pub const APP_TITLE: &str = "Good Day To Learn";

/// Width of the progress bar in characters.
const PROGRESS_WIDTH: usize = 20;

// ============================================================================
// Display
// ============================================================================

/// Terminal output for the interactive timer.
pub struct Display<W: Write> {
    out: W,
    json: bool,
    /// A countdown line is on screen without a trailing newline
    line_open: bool,
}

impl<W: Write> Display<W> {
    /// Creates a display writing to `out`.
    pub fn new(out: W, json: bool) -> Self {
        Self {
            out,
            json,
            line_open: false,
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Shows the title and the shortcut summary.
    pub fn show_welcome(&mut self, snapshot: &TimerSnapshot) -> io::Result<()> {
        if self.json {
            return Ok(());
        }
        writeln!(self.out, "{}", APP_TITLE)?;
        writeln!(self.out, "─────────────────────────────")?;
        writeln!(
            self.out,
            "Enter: start/stop   r: reset   s: settings   help: commands   q: quit"
        )?;
        self.show_countdown(snapshot)
    }

    /// Rewrites the countdown line.
    pub fn show_countdown(&mut self, snapshot: &TimerSnapshot) -> io::Result<()> {
        write!(
            self.out,
            "\r{}  {:<28} {}",
            snapshot.time_display(),
            snapshot.status_text(),
            progress_bar(snapshot.progress(), PROGRESS_WIDTH)
        )?;
        self.line_open = true;
        self.out.flush()
    }

    /// Renders a timer event.
    pub fn show_event(&mut self, event: &TimerEvent, snapshot: &TimerSnapshot) -> io::Result<()> {
        if self.json {
            return self.show_event_json(event);
        }

        match event {
            TimerEvent::Tick { .. } => self.show_countdown(snapshot),
            TimerEvent::PhaseCompleted(transition) => {
                self.show_transition(transition)?;
                self.show_countdown(snapshot)
            }
            TimerEvent::Started { .. } | TimerEvent::Reset { .. } => {
                self.show_countdown(snapshot)
            }
            TimerEvent::Stopped { .. } => {
                self.show_countdown(snapshot)?;
                self.message("Stopped")
            }
            TimerEvent::SettingsChanged { .. } => Ok(()),
        }
    }

    /// Announces a phase change.
    pub fn show_transition(&mut self, transition: &PhaseTransition) -> io::Result<()> {
        self.message(&format!("** {} **", transition.message))
    }

    /// Shows the status screen.
    pub fn show_status(&mut self, snapshot: &TimerSnapshot) -> io::Result<()> {
        self.close_line()?;
        writeln!(self.out, "Status:    {}", snapshot.status_text())?;
        writeln!(self.out, "Remaining: {}", snapshot.time_display())?;
        writeln!(
            self.out,
            "Timer:     {}",
            if snapshot.running { "running" } else { "stopped" }
        )?;
        self.show_countdown(snapshot)
    }

    /// Shows the settings in effect.
    pub fn show_settings(&mut self, settings: &CurrentSettings) -> io::Result<()> {
        self.close_line()?;
        writeln!(self.out, "Settings")?;
        writeln!(self.out, "  Work time:    {} min", settings.work_minutes)?;
        writeln!(self.out, "  Short break:  {} min", settings.short_break_minutes)?;
        writeln!(self.out, "  Long break:   {} min", settings.long_break_minutes)?;
        writeln!(self.out, "  Music volume: {}%", settings.music_volume)?;
        writeln!(self.out, "  Alarm volume: {}%", settings.alarm_volume)?;
        writeln!(
            self.out,
            "  Music file:   {}",
            file_label(settings.music_file.as_deref())
        )?;
        writeln!(
            self.out,
            "  Alarm file:   {}",
            file_label(settings.alarm_file.as_deref())
        )?;
        self.out.flush()
    }

    /// Confirms a saved settings update.
    pub fn show_settings_saved(&mut self, applied: &AppliedSettings) -> io::Result<()> {
        if applied.timer_reset {
            self.message("Settings saved, timer reset")
        } else {
            self.message("Settings saved")
        }
    }

    /// Shows the command list.
    pub fn show_help(&mut self) -> io::Result<()> {
        self.close_line()?;
        writeln!(self.out, "Commands")?;
        for (usage, description) in COMMAND_HELP {
            writeln!(self.out, "  {:<42} {}", usage, description)?;
        }
        self.out.flush()
    }

    /// Shows an error message.
    pub fn show_error(&mut self, message: &str) -> io::Result<()> {
        self.message(&format!("Error: {}", message))
    }

    /// Ends the countdown line before the program exits.
    pub fn finish(&mut self) -> io::Result<()> {
        self.close_line()?;
        self.out.flush()
    }

    fn show_event_json(&mut self, event: &TimerEvent) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        writeln!(self.out)?;
        self.out.flush()
    }

    /// Prints a message on its own line.
    fn message(&mut self, text: &str) -> io::Result<()> {
        self.close_line()?;
        writeln!(self.out, "{}", text)?;
        self.out.flush()
    }

    fn close_line(&mut self) -> io::Result<()> {
        if self.line_open {
            writeln!(self.out)?;
            self.line_open = false;
        }
        Ok(())
    }
}

/// Prints a fatal error to stderr.
pub fn print_error(message: &str) {
    eprintln!("Error: {}", message);
}

/// Renders `progress` (0.0 to 1.0) as a fixed-width bar.
pub fn progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

fn file_label(path: Option<&std::path::Path>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "default".to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
