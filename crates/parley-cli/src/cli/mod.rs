//! CLI command definitions for the `parley` binary.

pub mod agents;
pub mod chat;
pub mod history;
pub mod seed;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use parley_core::memory::DEFAULT_DIALOG_ID;

/// Chat with registered agents.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat with an agent.
    Chat {
        /// Registered agent name.
        #[arg(long, short, default_value = "openai_sdk")]
        agent: String,

        /// Dialog to continue.
        #[arg(long, default_value = DEFAULT_DIALOG_ID, conflicts_with = "new")]
        dialog_id: String,

        /// Start a fresh dialog with a generated id.
        #[arg(long)]
        new: bool,
    },

    /// List registered agents.
    Agents,

    /// Show durable conversation history.
    History {
        /// Dialog to show. Lists known dialogs when omitted.
        #[arg(long)]
        dialog_id: Option<String>,

        /// Maximum number of messages to show.
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Create the demo company database.
    SeedDb {
        /// Where to write the database file.
        #[arg(long, default_value = "data/company.db")]
        path: PathBuf,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Default log filter for the verbosity flags.
pub fn log_filter(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info,parley=debug",
        _ => "trace",
    }
}
