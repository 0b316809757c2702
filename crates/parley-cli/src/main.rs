//! Parley CLI entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, sets up tracing, builds the application state and
//! dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    parley_observe::tracing_setup::init_tracing(cli::log_filter(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    parley_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Commands that need no settings or database.
    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(*shell, &mut cmd, "parley", &mut std::io::stdout());
            return Ok(());
        }
        Commands::SeedDb { path } => {
            return cli::seed::seed_db(path, cli.json).await;
        }
        _ => {}
    }

    let state = AppState::init().await?;

    let result = match cli.command {
        Commands::Chat {
            agent,
            dialog_id,
            new,
        } => {
            let dialog_id = if new {
                uuid::Uuid::now_v7().to_string()
            } else {
                dialog_id
            };
            cli::chat::loop_runner::run_chat_loop(&state, &agent, &dialog_id).await
        }
        Commands::Agents => cli::agents::list_agents(&state, cli.json),
        Commands::History { dialog_id, limit } => {
            cli::history::show_history(&state, dialog_id.as_deref(), limit, cli.json).await
        }
        Commands::SeedDb { .. } | Commands::Completions { .. } => Ok(()),
    };

    state.shutdown().await;
    result
}
