//! `parley history`: inspect the durable conversation store.

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use parley_core::memory::ConversationMemory;
use parley_types::llm::MessageRole;

use crate::state::AppState;

const PREVIEW_CHARS: usize = 120;

pub async fn show_history(
    state: &AppState,
    dialog_id: Option<&str>,
    limit: usize,
    json: bool,
) -> anyhow::Result<()> {
    match dialog_id {
        Some(id) => show_dialog(state, id, limit, json).await,
        None => list_dialogs(state, json).await,
    }
}

async fn list_dialogs(state: &AppState, json: bool) -> anyhow::Result<()> {
    let ids = state.durable.dialog_ids().await?;
    let mut rows = Vec::with_capacity(ids.len());
    for id in ids {
        let count = state.durable.count(&id).await?;
        rows.push((id, count));
    }

    if json {
        let out: Vec<serde_json::Value> = rows
            .iter()
            .map(|(id, count)| serde_json::json!({ "dialog_id": id, "messages": count }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!();
        println!(
            "  {} No stored dialogs in {}",
            style("i").cyan().bold(),
            style(state.data_dir.display()).dim()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Dialog").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
    ]);
    for (id, count) in &rows {
        table.add_row(vec![Cell::new(id), Cell::new(count)]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

async fn show_dialog(
    state: &AppState,
    dialog_id: &str,
    limit: usize,
    json: bool,
) -> anyhow::Result<()> {
    let entries = state.durable.recent_entries(dialog_id, limit).await?;

    if json {
        let out: Vec<serde_json::Value> = entries
            .iter()
            .map(|e| {
                serde_json::json!({
                    "role": e.message.role.to_string(),
                    "content": e.message.content,
                    "created_at": e.created_at.to_rfc3339(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!();
        println!(
            "  {} No messages in dialog '{}'",
            style("i").cyan().bold(),
            dialog_id
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Time").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for entry in &entries {
        let role_cell = match entry.message.role {
            MessageRole::User => Cell::new("user").fg(Color::Green),
            MessageRole::Assistant => Cell::new("assistant").fg(Color::Cyan),
            MessageRole::System => Cell::new("system").fg(Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(entry.created_at.format("%Y-%m-%d %H:%M:%S")),
            role_cell,
            Cell::new(preview(&entry.message.content, PREVIEW_CHARS)),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

/// Shorten `text` to at most `max` characters, marking the cut.
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}
