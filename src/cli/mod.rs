//! CLI module for the outpass service
//!
//! Provides command-line interface for:
//! - serve: Run the web server
//! - list: Print stored requests as JSON

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{list, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::write_response;
