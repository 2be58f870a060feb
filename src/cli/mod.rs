//! CLI module for Good Day To Learn.
//!
//! This module provides the command-line interface:
//! - `commands`: Command-line arguments using clap derive
//! - `input`: Commands typed while the timer runs
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod display;
pub mod input;

pub use commands::{Cli, Commands, RunArgs};
pub use display::Display;
pub use input::{Command, InputError};
