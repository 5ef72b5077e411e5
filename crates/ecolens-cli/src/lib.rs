//! Ecolens CLI library.
//!
//! Drives the product-data intake workflow from the command line: one-shot
//! commands restore the run from the session file, the REPL keeps one run
//! alive across commands.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;

pub use app::{App, RemoteApp};
pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
