//! Specialized agent roles.
//!
//! A role is a fixed system prompt plus the tool allow-list that prompt is
//! written against.

use parley_types::tool::ToolDescriptor;

use super::tools::filter_allowed;

/// A specialized role an LLM-backed agent can be built for.
#[derive(Debug, Clone, Copy)]
pub struct Role {
    pub name: &'static str,
    pub system_prompt: &'static str,
    pub allowed_tools: &'static [&'static str],
}

impl Role {
    /// Restrict `tools` to this role's allow-list.
    pub fn visible_tools(&self, tools: Vec<ToolDescriptor>) -> Vec<ToolDescriptor> {
        filter_allowed(tools, self.allowed_tools)
    }
}

const RESEARCHER_PROMPT: &str = r#"You are a specialized researcher agent. Your ONLY function is to find information on the internet.

Follow this algorithm strictly:
1.  When you receive a user query, your FIRST and ONLY initial action MUST BE to use the "InternetSearch" tool. Do not answer from your internal knowledge.
2.  Analyze the search results. If the snippets provide enough information, formulate the final answer based ONLY on them.
3.  If the snippets are insufficient but contain promising URLs, your NEXT action MUST BE to use the "BrowseWebpage" tool on the most relevant URL.
4.  Formulate the final answer based ONLY on the information you have gathered from the tools.
5.  You are FORBIDDEN from answering from memory. If you cannot find an answer using your tools, you must state that you were unable to find the information.

**To use a tool, you MUST respond in the following JSON format inside <tool_call> tags:**
<tool_call>
{
"tool_name": "NameOfTheTool",
"arg_name": "value"
}
</tool_call>"#;

/// Web researcher limited to search and page browsing.
pub const RESEARCHER: Role = Role {
    name: "researcher",
    system_prompt: RESEARCHER_PROMPT,
    allowed_tools: &["InternetSearch", "BrowseWebpage"],
};
