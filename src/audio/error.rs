//! Audio system error types.
//!
//! Audio failures never stop the timer; callers log them and carry on
//! without sound.

use thiserror::Error;

/// Errors that can occur in the audio playback system.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("Audio device is not available: {0}")]
    DeviceNotAvailable(String),

    /// No file could be found for a track.
    #[error("Audio file not found: {0}")]
    FileNotFound(String),

    /// Failed to decode the audio file.
    #[error("Failed to decode audio file: {0}")]
    DecodeError(String),

    /// Failed to create an output sink.
    #[error("Failed to create audio stream: {0}")]
    StreamError(String),

    /// Generic playback error.
    #[error("Audio playback error: {0}")]
    PlaybackError(String),
}

impl AudioError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if this error is related to the audio file.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::DecodeError(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "Connect an audio output device or run with --no-sound",
            Self::FileNotFound(_) => "Place rain.wav and alarm.wav next to the binary or pass --music-file/--alarm-file",
            Self::DecodeError(_) => "The audio file may be corrupted or in an unsupported format",
            Self::StreamError(_) => "Check your audio settings",
            Self::PlaybackError(_) => "Restart the application",
        }
    }
}
