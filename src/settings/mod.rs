//! Settings validation and application.
//!
//! This is the only boundary where user input reaches the timer. Every
//! field of an update is parsed and range-checked before anything is
//! applied, so a rejected update leaves the engine and the audio player
//! exactly as they were.
//!
//! Updates are written as `key=value` tokens:
//!
//! ```text
//! work=30 short=5 long=20 music=40 alarm=80 music-file=~/sounds/forest.wav alarm-file=default
//! ```
//!
//! A leading `~/` in a file path is expanded to the home directory.

mod error;

use std::path::PathBuf;

use tracing::{debug, info};

pub use error::{SettingField, SettingsError};

use crate::audio::AudioPlayer;
use crate::timer::CountdownEngine;
use crate::types::{Limits, LONG_BREAK_LIMITS, SHORT_BREAK_LIMITS, WORK_LIMITS};

/// Accepted volume range in percent.
pub const VOLUME_LIMITS: Limits = Limits { min: 0, max: 100 };

/// Value that selects a track's default file.
pub const DEFAULT_FILE_KEYWORD: &str = "default";

// ============================================================================
// Parsing
// ============================================================================

/// New file choice for an audio track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChoice {
    /// Go back to the default file
    Default,
    /// Play a specific file
    Custom(PathBuf),
}

impl FileChoice {
    fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case(DEFAULT_FILE_KEYWORD) {
            FileChoice::Default
        } else {
            FileChoice::Custom(expand_home(raw, dirs::home_dir()))
        }
    }

    fn into_custom(self) -> Option<PathBuf> {
        match self {
            FileChoice::Default => None,
            FileChoice::Custom(path) => Some(path),
        }
    }
}

/// A validated settings change. Fields left as `None` keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub work_minutes: Option<u32>,
    pub short_break_minutes: Option<u32>,
    pub long_break_minutes: Option<u32>,
    /// Percent, 0-100
    pub music_volume: Option<u8>,
    /// Percent, 0-100
    pub alarm_volume: Option<u8>,
    pub music_file: Option<FileChoice>,
    pub alarm_file: Option<FileChoice>,
}

impl SettingsUpdate {
    /// Parses `key=value` tokens into an update.
    ///
    /// # Errors
    ///
    /// Returns the first malformed token, unknown key, non-integer or
    /// out-of-range value.
    pub fn parse<'a, I>(tokens: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut update = Self::default();

        for token in tokens {
            let (key, value) = token
                .split_once('=')
                .ok_or_else(|| SettingsError::Malformed(token.to_string()))?;
            let value = value.trim();
            if value.is_empty() {
                return Err(SettingsError::Malformed(token.to_string()));
            }

            let key = key.trim().to_ascii_lowercase();
            let Some(field) = SettingField::from_key(&key) else {
                return Err(SettingsError::UnknownKey(key));
            };

            match field {
                SettingField::Work => update.work_minutes = Some(parse_minutes(field, value)?),
                SettingField::ShortBreak => {
                    update.short_break_minutes = Some(parse_minutes(field, value)?)
                }
                SettingField::LongBreak => {
                    update.long_break_minutes = Some(parse_minutes(field, value)?)
                }
                SettingField::MusicVolume => {
                    update.music_volume = Some(parse_volume(field, value)?)
                }
                SettingField::AlarmVolume => {
                    update.alarm_volume = Some(parse_volume(field, value)?)
                }
                SettingField::MusicFile => update.music_file = Some(FileChoice::parse(value)),
                SettingField::AlarmFile => update.alarm_file = Some(FileChoice::parse(value)),
            }
        }

        Ok(update)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns true if any phase duration is part of the update.
    pub fn changes_durations(&self) -> bool {
        self.work_minutes.is_some()
            || self.short_break_minutes.is_some()
            || self.long_break_minutes.is_some()
    }
}

/// Expands a leading `~` to `home`. Other paths are returned unchanged.
fn expand_home(raw: &str, home: Option<PathBuf>) -> PathBuf {
    let rest = match raw.strip_prefix('~') {
        Some("") => "",
        Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(raw),
    };
    match home {
        Some(home) => home.join(rest),
        None => PathBuf::from(raw),
    }
}

/// Returns the allowed minute range for a duration field.
pub fn limits_for(field: SettingField) -> Limits {
    match field {
        SettingField::Work => WORK_LIMITS,
        SettingField::ShortBreak => SHORT_BREAK_LIMITS,
        SettingField::LongBreak => LONG_BREAK_LIMITS,
        _ => VOLUME_LIMITS,
    }
}

/// Parses a whole number of minutes for `field` and checks its range.
pub fn parse_minutes(field: SettingField, raw: &str) -> Result<u32, SettingsError> {
    parse_in_range(field, raw, limits_for(field))
}

/// Parses a volume percentage (0-100).
pub fn parse_volume(field: SettingField, raw: &str) -> Result<u8, SettingsError> {
    let percent = parse_in_range(field, raw, VOLUME_LIMITS)?;
    // VOLUME_LIMITS keeps the value within u8
    Ok(percent as u8)
}

fn parse_in_range(field: SettingField, raw: &str, range: Limits) -> Result<u32, SettingsError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| SettingsError::NotANumber {
            field,
            value: raw.to_string(),
        })?;

    let out_of_range = SettingsError::OutOfRange {
        field,
        min: range.min,
        max: range.max,
        value,
    };
    let value = u32::try_from(value).map_err(|_| out_of_range.clone())?;
    if !range.contains(value) {
        return Err(out_of_range);
    }
    Ok(value)
}

// ============================================================================
// Application
// ============================================================================

/// What [`apply`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppliedSettings {
    pub durations_changed: bool,
    /// The timer was idle and got reset to the first work interval
    pub timer_reset: bool,
}

/// Applies a parsed update to the engine and the audio player.
///
/// Saving new durations while the timer is stopped resets the cycle. While
/// it runs, the current countdown keeps its remaining time and the new
/// durations apply from the next phase. Volumes and files apply immediately.
///
/// # Errors
///
/// Returns `FileNotFound` for a missing custom file. Nothing is applied on
/// error.
pub fn apply(
    update: &SettingsUpdate,
    engine: &CountdownEngine,
    audio: &dyn AudioPlayer,
) -> Result<AppliedSettings, SettingsError> {
    for (field, choice) in [
        (SettingField::MusicFile, &update.music_file),
        (SettingField::AlarmFile, &update.alarm_file),
    ] {
        if let Some(FileChoice::Custom(path)) = choice {
            if !path.is_file() {
                return Err(SettingsError::FileNotFound {
                    field,
                    path: path.display().to_string(),
                });
            }
        }
    }

    let mut applied = AppliedSettings::default();

    if update.changes_durations() {
        let current = engine.config();
        engine.set_durations(
            update.work_minutes.unwrap_or(current.work_minutes()),
            update
                .short_break_minutes
                .unwrap_or(current.short_break_minutes()),
            update
                .long_break_minutes
                .unwrap_or(current.long_break_minutes()),
        );
        applied.durations_changed = true;
        if !engine.is_running() {
            engine.reset();
            applied.timer_reset = true;
        }
        info!(
            "Durations set to {}/{}/{} minutes",
            engine.work_minutes(),
            engine.short_break_minutes(),
            engine.long_break_minutes()
        );
    }

    if let Some(percent) = update.music_volume {
        audio.set_music_volume(f32::from(percent) / 100.0);
        debug!("Music volume set to {}%", percent);
    }
    if let Some(percent) = update.alarm_volume {
        audio.set_alarm_volume(f32::from(percent) / 100.0);
        debug!("Alarm volume set to {}%", percent);
    }
    if let Some(choice) = update.music_file.clone() {
        audio.set_music_file(choice.into_custom());
    }
    if let Some(choice) = update.alarm_file.clone() {
        audio.set_alarm_file(choice.into_custom());
    }

    Ok(applied)
}

// ============================================================================
// CurrentSettings
// ============================================================================

/// The settings in effect, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentSettings {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub music_volume: u8,
    pub alarm_volume: u8,
    pub music_file: Option<PathBuf>,
    pub alarm_file: Option<PathBuf>,
}

impl CurrentSettings {
    /// Reads the current values from the engine and the audio player.
    pub fn read(engine: &CountdownEngine, audio: &dyn AudioPlayer) -> Self {
        Self {
            work_minutes: engine.work_minutes(),
            short_break_minutes: engine.short_break_minutes(),
            long_break_minutes: engine.long_break_minutes(),
            music_volume: to_percent(audio.music_volume()),
            alarm_volume: to_percent(audio.alarm_volume()),
            music_file: audio.music_file(),
            alarm_file: audio.alarm_file(),
        }
    }
}

fn to_percent(volume: f32) -> u8 {
    (volume.clamp(0.0, 1.0) * 100.0).round() as u8
}

// ============================================================================
// Tests
// ============================================================================
