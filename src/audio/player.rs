//! Audio player implementation using rodio.
//!
//! Ambient music loops on a sink owned by the player so it can be stopped
//! and re-leveled. Alarms go to a detached sink and play out on their own.
//! The output stream is not `Send`; the player stays on the task that
//! created it.

use std::cell::{Cell, RefCell};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::AudioError;
use super::source::{AudioTrack, TrackSelection};
use super::{clamp_volume, AudioOptions, AudioPlayer};

/// An audio player backed by the default rodio output device.
pub struct RodioAudioPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
    /// Sink holding the looping music, while it plays.
    music_sink: RefCell<Option<Sink>>,
    music: RefCell<TrackSelection>,
    alarm: RefCell<TrackSelection>,
    music_volume: Cell<f32>,
    alarm_volume: Cell<f32>,
}

impl RodioAudioPlayer {
    /// Opens the default output device.
    ///
    /// # Errors
    ///
    /// Returns `AudioError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new(options: &AudioOptions) -> Result<Self, AudioError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| AudioError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
            music_sink: RefCell::new(None),
            music: RefCell::new(TrackSelection::new(
                AudioTrack::Music,
                options.music_file.clone(),
            )),
            alarm: RefCell::new(TrackSelection::new(
                AudioTrack::Alarm,
                options.alarm_file.clone(),
            )),
            music_volume: Cell::new(clamp_volume(options.music_volume)),
            alarm_volume: Cell::new(clamp_volume(options.alarm_volume)),
        })
    }

    fn new_sink(&self) -> Result<Sink, AudioError> {
        Sink::try_new(&self.stream_handle).map_err(|e| AudioError::StreamError(e.to_string()))
    }

    fn open(path: &Path) -> Result<BufReader<File>, AudioError> {
        let file = File::open(path)
            .map_err(|e| AudioError::FileNotFound(format!("{}: {}", path.display(), e)))?;
        Ok(BufReader::new(file))
    }

    fn resolve(selection: &RefCell<TrackSelection>) -> Result<PathBuf, AudioError> {
        let selection = selection.borrow();
        selection.resolve().ok_or_else(|| {
            AudioError::FileNotFound(selection.track().default_file_name().to_string())
        })
    }

    fn play_alarm_file(&self) -> Result<(), AudioError> {
        let path = Self::resolve(&self.alarm)?;
        let decoder = Decoder::new(Self::open(&path)?)
            .map_err(|e| AudioError::DecodeError(format!("{}: {}", path.display(), e)))?;

        let sink = self.new_sink()?;
        sink.set_volume(self.alarm_volume.get());
        sink.append(decoder);
        sink.detach();

        debug!("Alarm playing from {}", path.display());
        Ok(())
    }

    /// Plays a short two-tone chime in place of a missing alarm file.
    fn play_chime(&self) -> Result<(), AudioError> {
        let sink = self.new_sink()?;
        sink.set_volume(self.alarm_volume.get());

        let first = SineWave::new(880.0)
            .take_duration(Duration::from_millis(150))
            .amplify(0.3);
        let gap = SineWave::new(0.0)
            .take_duration(Duration::from_millis(50))
            .amplify(0.0);
        let second = SineWave::new(1108.0)
            .take_duration(Duration::from_millis(200))
            .amplify(0.3);

        sink.append(first);
        sink.append(gap);
        sink.append(second);
        sink.detach();
        Ok(())
    }

    /// Restarts the music if it is playing, so a new file takes effect.
    fn reload_music(&self) {
        if !self.is_music_playing() {
            return;
        }
        self.stop_music();
        if let Err(e) = self.start_music() {
            warn!("Failed to reload music: {}", e);
        }
    }
}

impl AudioPlayer for RodioAudioPlayer {
    fn start_music(&self) -> Result<(), AudioError> {
        if self.is_music_playing() {
            return Ok(());
        }

        let path = Self::resolve(&self.music)?;
        let decoder = Decoder::new_looped(Self::open(&path)?)
            .map_err(|e| AudioError::DecodeError(format!("{}: {}", path.display(), e)))?;

        let sink = self.new_sink()?;
        sink.set_volume(self.music_volume.get());
        sink.append(decoder);
        *self.music_sink.borrow_mut() = Some(sink);

        debug!("Music looping from {}", path.display());
        Ok(())
    }

    fn stop_music(&self) {
        if let Some(sink) = self.music_sink.borrow_mut().take() {
            sink.stop();
            debug!("Music stopped");
        }
    }

    fn is_music_playing(&self) -> bool {
        self.music_sink
            .borrow()
            .as_ref()
            .is_some_and(|sink| !sink.empty())
    }

    fn play_alarm(&self) -> Result<(), AudioError> {
        match self.play_alarm_file() {
            Ok(()) => Ok(()),
            Err(e) if e.is_file_error() => {
                warn!("Alarm file unavailable ({}), playing chime instead", e);
                self.play_chime()
            }
            Err(e) => Err(e),
        }
    }

    fn set_music_volume(&self, volume: f32) {
        let volume = clamp_volume(volume);
        self.music_volume.set(volume);
        if let Some(sink) = self.music_sink.borrow().as_ref() {
            sink.set_volume(volume);
        }
    }

    fn set_alarm_volume(&self, volume: f32) {
        self.alarm_volume.set(clamp_volume(volume));
    }

    fn music_volume(&self) -> f32 {
        self.music_volume.get()
    }

    fn alarm_volume(&self) -> f32 {
        self.alarm_volume.get()
    }

    fn set_music_file(&self, path: Option<PathBuf>) {
        self.music.borrow_mut().set_custom(path);
        self.reload_music();
    }

    fn set_alarm_file(&self, path: Option<PathBuf>) {
        self.alarm.borrow_mut().set_custom(path);
    }

    fn music_file(&self) -> Option<PathBuf> {
        self.music.borrow().custom().map(Path::to_path_buf)
    }

    fn alarm_file(&self) -> Option<PathBuf> {
        self.alarm.borrow().custom().map(Path::to_path_buf)
    }
}

impl std::fmt::Debug for RodioAudioPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioAudioPlayer")
            .field("music_volume", &self.music_volume.get())
            .field("alarm_volume", &self.alarm_volume.get())
            .finish_non_exhaustive()
    }
}
