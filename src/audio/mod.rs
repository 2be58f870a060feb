//! Audio playback for the Pomodoro timer.
//!
//! This module provides the sounds around the countdown:
//!
//! - Ambient music looped during work phases
//! - An alarm at every phase transition, with a generated chime as fallback
//! - Live volume control and custom file selection
//! - Graceful degradation to silence when no output device exists
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   AudioPlayer    │ ← Trait used by the app controller
//! └────────┬─────────┘
//!          │
//!    ┌─────┴──────────────┬──────────────────┐
//!    ▼                    ▼                  ▼
//! ┌──────────────┐ ┌──────────────┐ ┌──────────────┐
//! │ RodioAudio   │ │ SilentAudio  │ │  MockAudio   │
//! │ Player       │ │ Player       │ │  Player      │
//! └──────┬───────┘ └──────────────┘ └──────────────┘
//!        ▼
//! ┌──────────────────┐
//! │  TrackSelection  │ → custom file, ./rain.wav, <data_dir>/...
//! └──────────────────┘
//! ```

mod error;
mod player;
mod source;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

pub use error::AudioError;
pub use player::RodioAudioPlayer;
pub use source::{
    asset_dir, default_search_dirs, find_in_dirs, AudioTrack, TrackSelection, APP_DIR_NAME,
};

use crate::types::{DEFAULT_ALARM_VOLUME, DEFAULT_MUSIC_VOLUME};

/// Trait for audio playback implementations.
///
/// Volumes are in `0.0..=1.0`; out-of-range values are clamped. A `None`
/// file selects the default file for the track.
pub trait AudioPlayer {
    /// Starts looping the ambient music. No-op if it is already playing.
    ///
    /// # Errors
    ///
    /// Returns an error if the music file cannot be found, decoded or played.
    fn start_music(&self) -> Result<(), AudioError>;

    /// Stops the ambient music.
    fn stop_music(&self);

    /// Returns true while the ambient music is playing.
    fn is_music_playing(&self) -> bool;

    /// Plays the alarm once without blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if no sound at all could be played.
    fn play_alarm(&self) -> Result<(), AudioError>;

    fn set_music_volume(&self, volume: f32);

    fn set_alarm_volume(&self, volume: f32);

    fn music_volume(&self) -> f32;

    fn alarm_volume(&self) -> f32;

    /// Selects the music file; takes effect immediately if music is playing.
    fn set_music_file(&self, path: Option<PathBuf>);

    fn set_alarm_file(&self, path: Option<PathBuf>);

    /// Returns the custom music file, if one is selected.
    fn music_file(&self) -> Option<PathBuf>;

    /// Returns the custom alarm file, if one is selected.
    fn alarm_file(&self) -> Option<PathBuf>;
}

impl<P: AudioPlayer + ?Sized> AudioPlayer for Box<P> {
    fn start_music(&self) -> Result<(), AudioError> {
        (**self).start_music()
    }

    fn stop_music(&self) {
        (**self).stop_music()
    }

    fn is_music_playing(&self) -> bool {
        (**self).is_music_playing()
    }

    fn play_alarm(&self) -> Result<(), AudioError> {
        (**self).play_alarm()
    }

    fn set_music_volume(&self, volume: f32) {
        (**self).set_music_volume(volume)
    }

    fn set_alarm_volume(&self, volume: f32) {
        (**self).set_alarm_volume(volume)
    }

    fn music_volume(&self) -> f32 {
        (**self).music_volume()
    }

    fn alarm_volume(&self) -> f32 {
        (**self).alarm_volume()
    }

    fn set_music_file(&self, path: Option<PathBuf>) {
        (**self).set_music_file(path)
    }

    fn set_alarm_file(&self, path: Option<PathBuf>) {
        (**self).set_alarm_file(path)
    }

    fn music_file(&self) -> Option<PathBuf> {
        (**self).music_file()
    }

    fn alarm_file(&self) -> Option<PathBuf> {
        (**self).alarm_file()
    }
}

/// Clamps a volume to `0.0..=1.0`.
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        return 0.0;
    }
    volume.clamp(0.0, 1.0)
}

// ============================================================================
// AudioOptions
// ============================================================================

/// Startup options for the audio player.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioOptions {
    pub music_volume: f32,
    pub alarm_volume: f32,
    pub music_file: Option<PathBuf>,
    pub alarm_file: Option<PathBuf>,
    /// Skip the output device entirely
    pub disabled: bool,
}

impl Default for AudioOptions {
    fn default() -> Self {
        Self {
            music_volume: DEFAULT_MUSIC_VOLUME,
            alarm_volume: DEFAULT_ALARM_VOLUME,
            music_file: None,
            alarm_file: None,
            disabled: false,
        }
    }
}

/// Creates the best available player for `options`.
///
/// Falls back to [`SilentAudioPlayer`] when sound is disabled or no output
/// device can be opened.
pub fn create_player(options: &AudioOptions) -> Box<dyn AudioPlayer> {
    if options.disabled {
        return Box::new(SilentAudioPlayer::new(options));
    }
    match RodioAudioPlayer::new(options) {
        Ok(player) => Box::new(player),
        Err(e) => {
            warn!("Audio not available, continuing without sound: {}", e);
            Box::new(SilentAudioPlayer::new(options))
        }
    }
}

// ============================================================================
// Shared settings holder
// ============================================================================

/// Volumes and file choices kept by the non-device players.
#[derive(Debug, Clone, PartialEq)]
struct TrackSettings {
    music_volume: f32,
    alarm_volume: f32,
    music: TrackSelection,
    alarm: TrackSelection,
}

impl TrackSettings {
    fn from_options(options: &AudioOptions) -> Self {
        Self {
            music_volume: clamp_volume(options.music_volume),
            alarm_volume: clamp_volume(options.alarm_volume),
            music: TrackSelection::new(AudioTrack::Music, options.music_file.clone()),
            alarm: TrackSelection::new(AudioTrack::Alarm, options.alarm_file.clone()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// SilentAudioPlayer
// ============================================================================

/// A player that keeps settings but produces no sound.
#[derive(Debug)]
pub struct SilentAudioPlayer {
    settings: Mutex<TrackSettings>,
}

impl SilentAudioPlayer {
    pub fn new(options: &AudioOptions) -> Self {
        Self {
            settings: Mutex::new(TrackSettings::from_options(options)),
        }
    }
}

impl AudioPlayer for SilentAudioPlayer {
    fn start_music(&self) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop_music(&self) {}

    fn is_music_playing(&self) -> bool {
        false
    }

    fn play_alarm(&self) -> Result<(), AudioError> {
        Ok(())
    }

    fn set_music_volume(&self, volume: f32) {
        lock(&self.settings).music_volume = clamp_volume(volume);
    }

    fn set_alarm_volume(&self, volume: f32) {
        lock(&self.settings).alarm_volume = clamp_volume(volume);
    }

    fn music_volume(&self) -> f32 {
        lock(&self.settings).music_volume
    }

    fn alarm_volume(&self) -> f32 {
        lock(&self.settings).alarm_volume
    }

    fn set_music_file(&self, path: Option<PathBuf>) {
        lock(&self.settings).music.set_custom(path);
    }

    fn set_alarm_file(&self, path: Option<PathBuf>) {
        lock(&self.settings).alarm.set_custom(path);
    }

    fn music_file(&self) -> Option<PathBuf> {
        lock(&self.settings).music.custom().map(PathBuf::from)
    }

    fn alarm_file(&self) -> Option<PathBuf> {
        lock(&self.settings).alarm.custom().map(PathBuf::from)
    }
}

// ============================================================================
// MockAudioPlayer
// ============================================================================

/// A recorded call on [`MockAudioPlayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCall {
    StartMusic,
    StopMusic,
    PlayAlarm,
}

/// Mock audio player for testing.
#[derive(Debug)]
pub struct MockAudioPlayer {
    calls: Mutex<Vec<AudioCall>>,
    settings: Mutex<TrackSettings>,
    music_playing: AtomicBool,
    should_fail: AtomicBool,
}

impl Default for MockAudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAudioPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            settings: Mutex::new(TrackSettings::from_options(&AudioOptions::default())),
            music_playing: AtomicBool::new(false),
            should_fail: AtomicBool::new(false),
        }
    }

    /// Makes `start_music` and `play_alarm` fail.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<AudioCall> {
        lock(&self.calls).clone()
    }

    #[must_use]
    pub fn count(&self, call: AudioCall) -> usize {
        lock(&self.calls).iter().filter(|c| **c == call).count()
    }

    fn record(&self, call: AudioCall) {
        lock(&self.calls).push(call);
    }
}

impl AudioPlayer for MockAudioPlayer {
    fn start_music(&self) -> Result<(), AudioError> {
        self.record(AudioCall::StartMusic);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(AudioError::PlaybackError("Mock failure".to_string()));
        }
        self.music_playing.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop_music(&self) {
        self.record(AudioCall::StopMusic);
        self.music_playing.store(false, Ordering::SeqCst);
    }

    fn is_music_playing(&self) -> bool {
        self.music_playing.load(Ordering::SeqCst)
    }

    fn play_alarm(&self) -> Result<(), AudioError> {
        self.record(AudioCall::PlayAlarm);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(AudioError::PlaybackError("Mock failure".to_string()));
        }
        Ok(())
    }

    fn set_music_volume(&self, volume: f32) {
        lock(&self.settings).music_volume = clamp_volume(volume);
    }

    fn set_alarm_volume(&self, volume: f32) {
        lock(&self.settings).alarm_volume = clamp_volume(volume);
    }

    fn music_volume(&self) -> f32 {
        lock(&self.settings).music_volume
    }

    fn alarm_volume(&self) -> f32 {
        lock(&self.settings).alarm_volume
    }

    fn set_music_file(&self, path: Option<PathBuf>) {
        lock(&self.settings).music.set_custom(path);
    }

    fn set_alarm_file(&self, path: Option<PathBuf>) {
        lock(&self.settings).alarm.set_custom(path);
    }

    fn music_file(&self) -> Option<PathBuf> {
        lock(&self.settings).music.custom().map(PathBuf::from)
    }

    fn alarm_file(&self) -> Option<PathBuf> {
        lock(&self.settings).alarm.custom().map(PathBuf::from)
    }
}
