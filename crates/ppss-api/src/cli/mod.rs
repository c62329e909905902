//! CLI command definitions for the `ppss` binary.

pub mod status;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Public Participation Support System: personalized agent API server.
#[derive(Parser)]
#[command(name = "ppss", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// More log output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server.
    Serve {
        /// Bind address (defaults to `server.host` from config.toml).
        #[arg(long, env = "PPSS_HOST")]
        host: Option<String>,

        /// Port (defaults to `server.port` from config.toml).
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Also export spans through OpenTelemetry (stdout exporter).
        #[arg(long)]
        otel: bool,
    },

    /// Show storage and gateway status.
    Status {
        /// Output machine-readable JSON instead of styled text.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

impl Cli {
    /// Default log filter derived from `--quiet` and `-v`.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "info",
            1 => "info,ppss_api=debug,ppss_core=debug,ppss_infra=debug",
            _ => "trace",
        }
    }
}
