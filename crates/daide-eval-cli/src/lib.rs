//! daide-eval CLI library: argument definitions, commands and output.

pub mod cli;
pub mod commands;
pub mod output;

pub use cli::{Cli, CliFormat, Command};
pub use output::Formatter;
