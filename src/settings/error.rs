//! Settings validation error types.

use std::fmt;

use thiserror::Error;

/// A field of the settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    Work,
    ShortBreak,
    LongBreak,
    MusicVolume,
    AlarmVolume,
    MusicFile,
    AlarmFile,
}

impl SettingField {
    /// Every field, in the order the settings screen lists them.
    pub const ALL: [SettingField; 7] = [
        SettingField::Work,
        SettingField::ShortBreak,
        SettingField::LongBreak,
        SettingField::MusicVolume,
        SettingField::AlarmVolume,
        SettingField::MusicFile,
        SettingField::AlarmFile,
    ];

    /// Looks up a field by its settings key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    /// Key used on the settings command line.
    pub fn key(&self) -> &'static str {
        match self {
            SettingField::Work => "work",
            SettingField::ShortBreak => "short",
            SettingField::LongBreak => "long",
            SettingField::MusicVolume => "music",
            SettingField::AlarmVolume => "alarm",
            SettingField::MusicFile => "music-file",
            SettingField::AlarmFile => "alarm-file",
        }
    }

    /// Unit of the field's numeric value.
    pub fn unit(&self) -> &'static str {
        match self {
            SettingField::Work | SettingField::ShortBreak | SettingField::LongBreak => "minutes",
            SettingField::MusicVolume | SettingField::AlarmVolume => "percent",
            SettingField::MusicFile | SettingField::AlarmFile => "",
        }
    }
}

impl fmt::Display for SettingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SettingField::Work => "Work time",
            SettingField::ShortBreak => "Short break",
            SettingField::LongBreak => "Long break",
            SettingField::MusicVolume => "Music volume",
            SettingField::AlarmVolume => "Alarm volume",
            SettingField::MusicFile => "Music file",
            SettingField::AlarmFile => "Alarm file",
        };
        write!(f, "{}", label)
    }
}

/// Errors raised while validating a settings update.
///
/// A rejected update leaves timer and audio state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The value is not a whole number.
    #[error("{field} must be a whole number, got '{value}'")]
    NotANumber { field: SettingField, value: String },

    /// The value is outside the allowed range.
    #[error("{field} must be between {min} and {max} {unit}", unit = .field.unit())]
    OutOfRange {
        field: SettingField,
        min: u32,
        max: u32,
        value: i64,
    },

    /// The key is not a known setting.
    #[error("Unknown setting '{0}' (expected work, short, long, music, alarm, music-file or alarm-file)")]
    UnknownKey(String),

    /// The token is not of the form `key=value`.
    #[error("Expected key=value, got '{0}'")]
    Malformed(String),

    /// A selected audio file does not exist.
    #[error("{field} not found: {path}")]
    FileNotFound { field: SettingField, path: String },
}

impl SettingsError {
    /// Returns the field the error refers to, if any.
    #[must_use]
    pub fn field(&self) -> Option<SettingField> {
        match self {
            Self::NotANumber { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::FileNotFound { field, .. } => Some(*field),
            Self::UnknownKey(_) | Self::Malformed(_) => None,
        }
    }
}
