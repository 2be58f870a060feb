//! Audio track selection and file resolution.
//!
//! Each track (ambient music, alarm) plays either a user-chosen file or the
//! default file, looked up in this order:
//! 1. The current working directory
//! 2. The per-user data directory (`<data_dir>/good-day-to-learn/`)

use std::fmt;
use std::path::{Path, PathBuf};

/// Directory name under the platform data directory.
pub const APP_DIR_NAME: &str = "good-day-to-learn";

/// The two sounds the timer plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioTrack {
    /// Ambient music looped during work phases
    Music,
    /// Alarm played once at each phase transition
    Alarm,
}

impl AudioTrack {
    /// File name looked up when no custom file is set.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            AudioTrack::Music => "rain.wav",
            AudioTrack::Alarm => "alarm.wav",
        }
    }
}

impl fmt::Display for AudioTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioTrack::Music => write!(f, "music"),
            AudioTrack::Alarm => write!(f, "alarm"),
        }
    }
}

/// Returns the per-user asset directory, if the platform has one.
pub fn asset_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME))
}

/// Directories searched for default track files, in priority order.
pub fn default_search_dirs() -> Vec<PathBuf> {
    let mut search = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        search.push(cwd);
    }
    if let Some(dir) = asset_dir() {
        search.push(dir);
    }
    search
}

/// Finds the default file for `track` in the first directory containing it.
pub fn find_in_dirs(track: AudioTrack, search: &[PathBuf]) -> Option<PathBuf> {
    search
        .iter()
        .map(|dir| dir.join(track.default_file_name()))
        .find(|path| path.is_file())
}

/// The file chosen for one track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackSelection {
    track: AudioTrack,
    custom: Option<PathBuf>,
}

impl TrackSelection {
    /// Selects `custom` if given, the default file otherwise.
    pub fn new(track: AudioTrack, custom: Option<PathBuf>) -> Self {
        Self { track, custom }
    }

    pub fn track(&self) -> AudioTrack {
        self.track
    }

    /// Returns the user-chosen file, if any.
    pub fn custom(&self) -> Option<&Path> {
        self.custom.as_deref()
    }

    pub fn set_custom(&mut self, path: Option<PathBuf>) {
        self.custom = path;
    }

    /// Resolves the file to play, searching the default locations.
    pub fn resolve(&self) -> Option<PathBuf> {
        self.resolve_with(&default_search_dirs())
    }

    /// Resolves the file to play against explicit search directories.
    ///
    /// A custom file is returned as-is even if it has since disappeared; the
    /// player reports that when it tries to open it.
    pub fn resolve_with(&self, search: &[PathBuf]) -> Option<PathBuf> {
        match &self.custom {
            Some(path) => Some(path.clone()),
            None => find_in_dirs(self.track, search),
        }
    }
}
