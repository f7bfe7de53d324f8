//! CLI layer: argument parsing and command dispatch

pub mod args;
pub mod commands;
pub mod error;
pub mod output;
pub mod tree_view;

pub use args::{Cli, Commands, ConfigCommands};
pub use error::{CliError, CliResult};
