//! CLI command definitions for the `dnya` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod history;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Dnya chat backend.
#[derive(Parser)]
#[command(name = "dnya", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text (logs included).
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on [default: config `server.port`].
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to [default: config `server.host`].
        #[arg(long)]
        host: Option<String>,
    },

    /// Print the stored conversation for a user.
    History {
        /// User id whose conversation with Dnya to show.
        user_id: String,

        /// Show only the most recent N messages.
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
