//! Application controller.
//!
//! Connects the countdown engine to its collaborators:
//!
//! - Commands typed by the user drive the engine and the music
//! - Timer events drive the display and the alarm
//!
//! Music only plays while a work phase is counting down. When a phase
//! completes the music stops and the alarm rings; starting the next work
//! phase brings the music back.

use std::future::Future;
use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::audio::AudioPlayer;
use crate::cli::display::Display;
use crate::cli::input::Command;
use crate::settings::{self, CurrentSettings};
use crate::timer::{CountdownEngine, TimerEvent};

/// Whether the main loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The interactive timer: engine, audio and display.
pub struct App<A: AudioPlayer, W: Write> {
    engine: CountdownEngine,
    audio: A,
    display: Display<W>,
}

impl<A: AudioPlayer, W: Write> App<A, W> {
    pub fn new(engine: CountdownEngine, audio: A, display: Display<W>) -> Self {
        Self {
            engine,
            audio,
            display,
        }
    }

    pub fn engine(&self) -> &CountdownEngine {
        &self.engine
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Shows the banner and the initial countdown.
    pub fn show_welcome(&mut self) -> io::Result<()> {
        self.display.show_welcome(&self.engine.snapshot())
    }

    /// Parses and runs one input line. Parse errors are shown, not returned.
    pub fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        match Command::parse(line) {
            Ok(command) => self.handle_command(command),
            Err(e) => {
                debug!("Rejected input {:?}: {}", line, e);
                self.display.show_error(&e.to_string())?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Runs one command.
    pub fn handle_command(&mut self, command: Command) -> io::Result<Flow> {
        debug!("Command: {}", command);
        match command {
            Command::Start => self.start(),
            Command::Stop => self.stop(),
            Command::Toggle => {
                if self.engine.is_running() {
                    self.stop();
                } else {
                    self.start();
                }
            }
            Command::Reset => {
                self.engine.reset();
                self.audio.stop_music();
            }
            Command::Status => self.display.show_status(&self.engine.snapshot())?,
            Command::Settings(update) if update.is_empty() => {
                let current = CurrentSettings::read(&self.engine, &self.audio);
                self.display.show_settings(&current)?;
            }
            Command::Settings(update) => {
                match settings::apply(&update, &self.engine, &self.audio) {
                    Ok(applied) => {
                        if applied.timer_reset {
                            self.audio.stop_music();
                        }
                        self.display.show_settings_saved(&applied)?;
                    }
                    Err(e) => self.display.show_error(&e.to_string())?,
                }
            }
            Command::Help => self.display.show_help()?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Reacts to one timer event.
    pub fn handle_event(&mut self, event: TimerEvent) -> io::Result<()> {
        if let TimerEvent::PhaseCompleted(transition) = &event {
            self.audio.stop_music();
            if let Err(e) = self.audio.play_alarm() {
                warn!("Alarm failed: {} ({})", e, e.suggestion());
            }
            debug!("Now in {}", transition.next);
        }
        self.display.show_event(&event, &self.engine.snapshot())
    }

    /// Stops the timer and the music and closes the display line.
    pub fn shutdown(&mut self) -> io::Result<()> {
        self.engine.stop();
        self.audio.stop_music();
        self.display.finish()
    }

    fn start(&mut self) {
        if !self.engine.start() {
            return;
        }
        if self.engine.snapshot().is_break() {
            return;
        }
        if let Err(e) = self.audio.start_music() {
            warn!("Music failed: {} ({})", e, e.suggestion());
        }
    }

    fn stop(&mut self) {
        self.engine.stop();
        self.audio.stop_music();
    }
}

/// Runs the interactive loop until `quit` or `shutdown` resolves.
///
/// Input reaching end-of-file does not end the loop; the timer keeps running
/// until the shutdown future completes.
pub async fn run<A, W, R, S>(
    app: &mut App<A, W>,
    mut events: mpsc::UnboundedReceiver<TimerEvent>,
    input: R,
    shutdown: S,
) -> io::Result<()>
where
    A: AudioPlayer,
    W: Write,
    R: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    let mut lines = input.lines();
    let mut input_open = true;
    tokio::pin!(shutdown);

    app.show_welcome()?;

    loop {
        tokio::select! {
            Some(event) = events.recv() => app.handle_event(event)?,
            line = lines.next_line(), if input_open => match line? {
                Some(line) => {
                    if app.handle_line(&line)? == Flow::Quit {
                        info!("Quit requested");
                        break;
                    }
                }
                None => {
                    debug!("Input closed");
                    input_open = false;
                }
            },
            () = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    app.shutdown()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCall, MockAudioPlayer};
    use crate::timer::TickStatus;
    use crate::types::{PhaseConfig, PhaseKind};
    use tokio::time::Duration;

    type TestApp = App<MockAudioPlayer, Vec<u8>>;

    fn create_app(config: PhaseConfig) -> (TestApp, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = CountdownEngine::new(config, tx);
        let app = App::new(engine, MockAudioPlayer::new(), Display::new(Vec::new(), false));
        (app, rx)
    }

    fn pump(app: &mut TestApp, rx: &mut mpsc::UnboundedReceiver<TimerEvent>) {
        while let Ok(event) = rx.try_recv() {
            app.handle_event(event).unwrap();
        }
    }

    fn output(app: TestApp) -> String {
        String::from_utf8(app.display.into_inner()).unwrap()
    }

    // ------------------------------------------------------------------------
    // Command Tests
    // ------------------------------------------------------------------------

    mod command_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_start_plays_music_in_work() {
            let (mut app, _rx) = create_app(PhaseConfig::default());

            app.handle_command(Command::Start).unwrap();
            assert!(app.engine().is_running());
            assert_eq!(app.audio().count(AudioCall::StartMusic), 1);
            assert!(app.audio().is_music_playing());

            app.handle_command(Command::Stop).unwrap();
            assert!(!app.engine().is_running());
            assert!(!app.audio().is_music_playing());
        }

        #[tokio::test(start_paused = true)]
        async fn test_second_start_does_not_restart_music() {
            let (mut app, _rx) = create_app(PhaseConfig::default());

            app.handle_command(Command::Start).unwrap();
            app.handle_command(Command::Start).unwrap();
            assert_eq!(app.audio().count(AudioCall::StartMusic), 1);
            app.shutdown().unwrap();
        }

        #[tokio::test(start_paused = true)]
        async fn test_toggle() {
            let (mut app, _rx) = create_app(PhaseConfig::default());

            app.handle_line("").unwrap();
            assert!(app.engine().is_running());
            app.handle_line("").unwrap();
            assert!(!app.engine().is_running());
        }

        #[tokio::test(start_paused = true)]
        async fn test_reset_stops_music_and_rewinds() {
            let (mut app, _rx) = create_app(PhaseConfig::from_seconds(3, 1, 1));

            app.handle_command(Command::Start).unwrap();
            app.engine().tick();
            app.handle_command(Command::Reset).unwrap();

            let snapshot = app.engine().snapshot();
            assert!(!snapshot.running);
            assert_eq!(snapshot.remaining_seconds, 3);
            assert!(!app.audio().is_music_playing());
        }

        #[tokio::test(start_paused = true)]
        async fn test_break_has_no_music() {
            let (mut app, mut rx) = create_app(PhaseConfig::from_seconds(1, 5, 5));

            app.handle_command(Command::Start).unwrap();
            assert_eq!(app.engine().tick(), TickStatus::Completed);
            pump(&mut app, &mut rx);

            assert_eq!(app.engine().snapshot().phase, PhaseKind::ShortBreak);
            assert_eq!(app.audio().count(AudioCall::PlayAlarm), 1);
            assert!(!app.audio().is_music_playing());

            app.handle_command(Command::Start).unwrap();
            assert!(app.engine().is_running());
            assert_eq!(app.audio().count(AudioCall::StartMusic), 1);
            app.shutdown().unwrap();
        }

        #[tokio::test(start_paused = true)]
        async fn test_audio_failure_is_not_fatal() {
            let (mut app, mut rx) = create_app(PhaseConfig::from_seconds(1, 5, 5));
            app.audio().set_should_fail(true);

            assert_eq!(app.handle_command(Command::Start).unwrap(), Flow::Continue);
            assert!(app.engine().is_running());

            app.engine().tick();
            pump(&mut app, &mut rx);
            assert_eq!(app.audio().count(AudioCall::PlayAlarm), 1);
        }

        #[test]
        fn test_quit() {
            let (mut app, _rx) = create_app(PhaseConfig::default());
            assert_eq!(app.handle_line("q").unwrap(), Flow::Quit);
        }

        #[test]
        fn test_unknown_command_shows_error() {
            let (mut app, _rx) = create_app(PhaseConfig::default());
            assert_eq!(app.handle_line("pause").unwrap(), Flow::Continue);
            assert!(output(app).contains("Error: Unknown command 'pause'"));
        }
    }

    // ------------------------------------------------------------------------
    // Settings Tests
    // ------------------------------------------------------------------------

    mod settings_tests {
        use super::*;

        #[test]
        fn test_show_settings() {
            let (mut app, _rx) = create_app(PhaseConfig::default());
            app.handle_line("settings").unwrap();
            assert!(output(app).contains("Work time:    25 min"));
        }

        #[test]
        fn test_invalid_value_leaves_config() {
            let (mut app, _rx) = create_app(PhaseConfig::default());
            app.handle_line("s work=121").unwrap();

            assert_eq!(app.engine().work_minutes(), 25);
            assert!(output(app).contains("Work time must be between 1 and 120 minutes"));
        }

        #[test]
        fn test_save_durations() {
            let (mut app, _rx) = create_app(PhaseConfig::default());
            app.handle_line("s work=50 short=10").unwrap();

            assert_eq!(app.engine().work_minutes(), 50);
            assert_eq!(app.engine().short_break_minutes(), 10);
            assert_eq!(app.engine().snapshot().remaining_seconds, 50 * 60);
            assert!(output(app).contains("Settings saved, timer reset"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_durations_saved_while_running() {
            let (mut app, _rx) = create_app(PhaseConfig::from_seconds(2, 60, 60));
            app.handle_command(Command::Start).unwrap();
            app.engine().tick();
            app.handle_line("s work=50 short=10").unwrap();

            assert_eq!(app.engine().work_minutes(), 50);
            assert_eq!(app.engine().short_break_minutes(), 10);

            // Current work phase keeps counting with its music
            let snapshot = app.engine().snapshot();
            assert!(snapshot.running);
            assert_eq!(snapshot.remaining_seconds, 1);
            assert!(app.audio().is_music_playing());

            app.engine().tick();
            let snapshot = app.engine().snapshot();
            assert_eq!(snapshot.phase, PhaseKind::ShortBreak);
            assert_eq!(snapshot.remaining_seconds, 10 * 60);
            assert!(output(app).contains("Settings saved\n"));
        }

        #[test]
        fn test_volume_change() {
            let (mut app, _rx) = create_app(PhaseConfig::default());
            app.handle_line("s music=20").unwrap();
            assert_eq!(app.audio().music_volume(), 0.2);
        }
    }

    // ------------------------------------------------------------------------
    // Run Loop Tests
    // ------------------------------------------------------------------------

    mod run_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_run_until_quit() {
            let (mut app, rx) = create_app(PhaseConfig::default());
            let input: &[u8] = b"start\nstatus\nq\n";

            run(&mut app, rx, input, std::future::pending())
                .await
                .unwrap();

            assert!(!app.engine().is_running());
            assert!(!app.audio().is_music_playing());
            let text = output(app);
            assert!(text.starts_with("Good Day To Learn"));
            assert!(text.contains("Timer:     running"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_run_counts_down_until_shutdown() {
            let (mut app, rx) = create_app(PhaseConfig::default());
            let input: &[u8] = b"start\n";
            let shutdown = tokio::time::sleep(Duration::from_millis(3500));

            run(&mut app, rx, input, shutdown).await.unwrap();

            assert!(!app.engine().is_running());
            assert_eq!(app.engine().snapshot().remaining_seconds, 25 * 60 - 3);
            let text = output(app);
            assert!(text.contains("24:59"));
            assert!(text.contains("24:57"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_run_json_mode() {
            let (tx, rx) = mpsc::unbounded_channel();
            let engine = CountdownEngine::new(PhaseConfig::from_seconds(2, 1, 1), tx);
            let mut app = App::new(engine, MockAudioPlayer::new(), Display::new(Vec::new(), true));
            let input: &[u8] = b"start\n";
            let shutdown = tokio::time::sleep(Duration::from_millis(2500));

            run(&mut app, rx, input, shutdown).await.unwrap();

            let text = output(app);
            let events: Vec<serde_json::Value> = text
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect();
            assert_eq!(events[0]["event"], "started");
            assert_eq!(events[1]["event"], "tick");
            assert_eq!(events[2]["event"], "phase_completed");
            assert_eq!(events[2]["next"], "short_break");
            assert_eq!(events[2]["interval_index"], 1);
        }
    }
}
