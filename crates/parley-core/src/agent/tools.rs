//! Tool allow-lists and the `<available_tools>` prompt block.
//!
//! Tools are only advertised to the model. Filtering happens once, when an
//! agent is built, so a tool outside the allow-list is invisible to that
//! agent no matter what the caller supplies.

use parley_types::tool::ToolDescriptor;

/// Keep only the tools whose names exactly match an allow-list entry.
///
/// Order follows `available`; duplicates are kept as supplied.
pub fn filter_allowed(available: Vec<ToolDescriptor>, allow_list: &[&str]) -> Vec<ToolDescriptor> {
    available
        .into_iter()
        .filter(|tool| allow_list.contains(&tool.name.as_str()))
        .collect()
}

/// Render tool metadata for the system prompt.
///
/// Returns an empty string when there are no tools.
///
/// ```xml
/// <available_tools>
///   <tool name="InternetSearch">Search the web for a query</tool>
/// </available_tools>
/// ```
pub fn render_tool_block(tools: &[ToolDescriptor]) -> String {
    if tools.is_empty() {
        return String::new();
    }

    let mut xml = String::from("<available_tools>\n");
    for tool in tools {
        xml.push_str(&format!(
            "  <tool name=\"{}\">{}</tool>\n",
            tool.name, tool.description
        ));
    }
    xml.push_str("</available_tools>");
    xml
}

/// Tools offered to agents by default.
pub fn builtin_catalog() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "InternetSearch",
            "Search the internet and return result snippets with their URLs",
        ),
        ToolDescriptor::new(
            "BrowseWebpage",
            "Fetch a web page by URL and return its readable text",
        ),
        ToolDescriptor::new(
            "SqlQuery",
            "Run a read-only SQL query against the company database",
        ),
    ]
}
