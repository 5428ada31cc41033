//! CLI argument definitions using clap
//!
//! Commands:
//! - outpass serve [--config <path>] [--port <n>] [--data-file <path>]
//! - outpass list [--config <path>] [--data-file <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Hostel outpass request and warden approval service
#[derive(Parser, Debug)]
#[command(name = "outpass")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the web server
    Serve {
        /// Optional JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on (overrides config and OUTPASS_PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Data file holding all requests
        #[arg(long)]
        data_file: Option<PathBuf>,
    },

    /// Print every request with its index and status
    List {
        /// Optional JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Data file holding all requests
        #[arg(long)]
        data_file: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_flags() {
        let cli = Cli::parse_from(["outpass", "serve", "--port", "8080", "--data-file", "x.json"]);
        match cli.command {
            Command::Serve {
                config,
                port,
                data_file,
            } => {
                assert!(config.is_none());
                assert_eq!(port, Some(8080));
                assert_eq!(data_file, Some(PathBuf::from("x.json")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::parse_from(["outpass", "list", "--config", "outpass.json"]);
        assert!(matches!(
            cli.command,
            Command::List { config: Some(_), data_file: None }
        ));
    }
}
