//! Library half of the `flowmap` binary.
//!
//! Argument parsing, command execution and logging setup live here so the
//! integration tests can drive [`commands::run`] without spawning a process.

pub mod args;
pub mod commands;
pub mod logging;

pub use args::{Cli, Commands, RenderArgs};
pub use commands::{run, Report};
pub use logging::init_logging;
