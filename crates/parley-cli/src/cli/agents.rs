//! `parley agents`: list registered agents and whether they can be built.

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use parley_core::agent::{AgentRegistry, FactoryArgs};

use crate::state::AppState;

/// One row of the agent listing.
#[derive(Debug, PartialEq)]
pub struct AgentStatus {
    pub name: String,
    /// Variant name when the agent builds, otherwise `None`.
    pub kind: Option<String>,
    /// Why the agent cannot be built.
    pub problem: Option<String>,
}

/// Try to build every registered agent.
pub fn agent_statuses(registry: &AgentRegistry) -> Vec<AgentStatus> {
    registry
        .names()
        .into_iter()
        .map(|name| match registry.resolve(name, FactoryArgs::default()) {
            Ok(agent) => AgentStatus {
                name: name.to_string(),
                kind: Some(agent.name().to_string()),
                problem: None,
            },
            Err(e) => AgentStatus {
                name: name.to_string(),
                kind: None,
                problem: Some(e.to_string()),
            },
        })
        .collect()
}

pub fn list_agents(state: &AppState, json: bool) -> anyhow::Result<()> {
    let statuses = agent_statuses(&state.registry);

    if json {
        let rows: Vec<serde_json::Value> = statuses
            .iter()
            .map(|s| {
                serde_json::json!({
                    "name": s.name,
                    "kind": s.kind,
                    "ready": s.problem.is_none(),
                    "problem": s.problem,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Agent").fg(Color::White),
        Cell::new("Kind").fg(Color::White),
        Cell::new("Status").fg(Color::White),
    ]);

    for status in &statuses {
        let status_cell = match &status.problem {
            None => Cell::new("● ready").fg(Color::Green),
            Some(problem) => Cell::new(format!("○ {problem}")).fg(Color::Yellow),
        };
        table.add_row(vec![
            Cell::new(&status.name),
            Cell::new(status.kind.as_deref().unwrap_or("-")),
            status_cell,
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {}",
        style("Start a chat with: parley chat --agent <name>").dim()
    );
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use parley_core::agent::AgentRegistryBuilder;
    use parley_core::memory::InProcessMemory;
    use parley_infra::agents::register_agents;
    use parley_types::config::Settings;

    #[test]
    fn test_statuses_without_credentials() {
        let mut builder = AgentRegistryBuilder::new();
        register_agents(
            &mut builder,
            Arc::new(Settings::default()),
            Arc::new(InProcessMemory::new()),
        );
        let statuses = agent_statuses(&builder.build());

        let echo = statuses.iter().find(|s| s.name == "echo").unwrap();
        assert_eq!(echo.kind.as_deref(), Some("echo"));
        assert!(echo.problem.is_none());

        let assistant = statuses.iter().find(|s| s.name == "assistant").unwrap();
        assert!(assistant.kind.is_none());
        assert!(assistant.problem.as_deref().unwrap().contains("OPENAI_API_KEY"));
    }
}
