//! Good Day To Learn - a Pomodoro timer for the terminal
//!
//! This tool helps you stay focused using the Pomodoro Technique:
//! - 25 minutes of focused work with rain sounds
//! - 5 minutes of short break
//! - 20 minutes of long break after 4 work intervals

use std::io;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{debug, info};

use good_day_to_learn::app::{self, App};
use good_day_to_learn::audio::create_player;
use good_day_to_learn::cli::display::{self, Display};
use good_day_to_learn::cli::{Cli, Command, Commands, RunArgs};
use good_day_to_learn::timer::CountdownEngine;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        display::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so they never mix with the countdown line.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => run_timer(args).await?,
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Runs the interactive timer until `quit` or Ctrl+C.
async fn run_timer(args: RunArgs) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let engine = CountdownEngine::new(args.phase_config(), event_tx);
    let audio = create_player(&args.audio_options());
    debug!("Audio player ready");

    let mut app = App::new(engine, audio, Display::new(io::stdout(), args.json));
    if args.autostart {
        app.handle_command(Command::Start)
            .context("Failed to start the timer")?;
    }

    let input = BufReader::new(tokio::io::stdin());
    app::run(&mut app, event_rx, input, shutdown_signal())
        .await
        .context("Terminal I/O failed")?;
    Ok(())
}

/// Resolves on Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
