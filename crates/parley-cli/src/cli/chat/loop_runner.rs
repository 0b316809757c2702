//! Main chat loop orchestrator.
//!
//! Resolves the agent once, then for each line: handle exit words and slash
//! commands, otherwise send the line to the agent behind a spinner and print
//! the reply. The loop keeps its own in-process transcript for `/history`,
//! separate from whatever memory the agent uses.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use parley_core::agent::tools::builtin_catalog;
use parley_core::agent::{AgentRegistry, BoxAgent, FactoryArgs};
use parley_core::memory::{ConversationMemory, DEFAULT_HISTORY_LIMIT, InProcessMemory};
use parley_types::error::AgentError;
use parley_types::llm::MessageRole;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use crate::state::AppState;

/// Resolve `agent_name` with the builtin tools on offer.
pub fn resolve_agent(registry: &AgentRegistry, agent_name: &str) -> Result<BoxAgent, AgentError> {
    registry.resolve(agent_name, FactoryArgs::default().with_tools(builtin_catalog()))
}

/// Error reported when `resolve_agent` fails. An unknown name also lists
/// what is registered. `main` prints it once and exits 1.
pub fn resolution_error(err: AgentError, registry: &AgentRegistry) -> anyhow::Error {
    match err {
        AgentError::NotFound(_) => {
            anyhow::anyhow!("{err} (available agents: {})", registry.names().join(", "))
        }
        other => other.into(),
    }
}

/// Send one line to the agent and record the exchange in the transcript.
pub async fn exchange(
    agent: &BoxAgent,
    transcript: &InProcessMemory,
    dialog_id: &str,
    text: &str,
) -> anyhow::Result<String> {
    transcript.append(dialog_id, MessageRole::User, text).await?;
    let reply = agent.chat(text, Some(dialog_id)).await;
    transcript
        .append(dialog_id, MessageRole::Assistant, &reply)
        .await?;
    Ok(reply)
}

pub async fn run_chat_loop(state: &AppState, agent_name: &str, dialog_id: &str) -> anyhow::Result<()> {
    let agent = resolve_agent(&state.registry, agent_name)
        .map_err(|e| resolution_error(e, &state.registry))?;
    tracing::info!(agent = %agent_name, kind = agent.name(), dialog_id, "Starting chat");

    let model = (agent.name() != "echo")
        .then(|| state.settings.model.as_deref())
        .flatten();
    print_welcome_banner(agent_name, dialog_id, model);

    let transcript = InProcessMemory::new();
    let prompt = format!("  {} ", style("User >").blue().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D or type 'exit' to quit.").dim());
                continue;
            }
            InputEvent::Message(text) => text,
        };

        if text.is_empty() {
            continue;
        }
        if commands::is_exit_word(&text) {
            break;
        }

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::Exit => break,
                ChatCommand::History => {
                    print_transcript(&transcript, dialog_id, agent_name).await?;
                }
                ChatCommand::Unknown(name) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(name).dim()
                    );
                }
            }
            continue;
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(spinner_style);
        }
        spinner.set_message("thinking...");
        spinner.enable_steady_tick(Duration::from_millis(80));

        let reply = exchange(&agent, &transcript, dialog_id, &text).await;
        spinner.finish_and_clear();

        let reply = reply?;
        println!("  {} {}", style("Assistant >").green().bold(), reply);
        println!();
    }

    chat_input.flush();
    println!("\n  {}", style("Bye!").dim());
    Ok(())
}

async fn print_transcript(
    transcript: &InProcessMemory,
    dialog_id: &str,
    agent_name: &str,
) -> anyhow::Result<()> {
    let messages = transcript
        .get_history(dialog_id, DEFAULT_HISTORY_LIMIT)
        .await?;

    println!();
    if messages.is_empty() {
        println!("  {}", style("No messages yet in this session.").dim());
    }
    for msg in &messages {
        let label = match msg.role {
            MessageRole::User => format!("{}", style("You").blue()),
            MessageRole::Assistant => format!("{}", style(agent_name).green()),
            MessageRole::System => "System".to_string(),
        };
        println!(
            "  {} {}",
            style(label).bold(),
            crate::cli::history::preview(&msg.content, 100)
        );
    }
    println!();
    Ok(())
}
