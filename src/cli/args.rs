//! CLI argument definitions using clap
//!
//! Commands:
//! - cubby init --config <path>
//! - cubby start --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cubby - A minimal authenticated per-user file-storage service
#[derive(Parser, Debug)]
#[command(name = "cubby")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize the data directory and databases
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./cubby.json")]
        config: PathBuf,
    },

    /// Start the cubby server
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./cubby.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
