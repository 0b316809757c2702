//! Language-model-backed agent.
//!
//! One `chat` call is one turn: read back the dialog, call the backend once,
//! and record the exchange only when the backend produced usable text.
//! Every failure during a turn is folded into the returned string.

use std::sync::Arc;

use tracing::{Instrument, debug, info_span, warn};

use parley_types::config::BackendSettings;
use parley_types::llm::{CompletionRequest, Message, MessageRole};
use parley_types::tool::ToolDescriptor;

use crate::llm::box_provider::BoxLlmProvider;
use crate::memory::{ConversationMemory, DEFAULT_DIALOG_ID, DEFAULT_HISTORY_LIMIT};

use super::capability::Agent;
use super::tools::render_tool_block;

/// Reply returned when the backend answers without any text.
pub const EMPTY_RESPONSE_REPLY: &str = "Error: Received no content from LLM.";

/// Everything that shapes the request an `LlmAgent` sends, apart from the
/// conversation itself.
#[derive(Debug, Clone)]
pub struct AgentProfile {
    pub system_prompt: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub history_limit: usize,
    /// Tools advertised in the system prompt.
    pub tools: Vec<ToolDescriptor>,
}

impl AgentProfile {
    pub fn new(model: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            model: model.into(),
            temperature: 0.7,
            max_tokens: 1024,
            history_limit: DEFAULT_HISTORY_LIMIT,
            tools: Vec::new(),
        }
    }

    /// Profile using the model parameters of a validated backend.
    pub fn from_backend(backend: &BackendSettings, system_prompt: impl Into<String>) -> Self {
        Self {
            temperature: backend.temperature,
            max_tokens: backend.max_tokens,
            ..Self::new(backend.model.clone(), system_prompt)
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDescriptor>) -> Self {
        self.tools = tools;
        self
    }

    /// The system prompt with the tool block appended, if any tools are visible.
    pub fn rendered_system_prompt(&self) -> String {
        let block = render_tool_block(&self.tools);
        if block.is_empty() {
            self.system_prompt.clone()
        } else {
            format!("{}\n\n{}", self.system_prompt, block)
        }
    }
}

/// Agent that answers through an LLM provider and keeps per-dialog history.
pub struct LlmAgent<M> {
    provider: BoxLlmProvider,
    memory: Arc<M>,
    profile: AgentProfile,
}

impl<M: ConversationMemory> LlmAgent<M> {
    pub fn new(provider: BoxLlmProvider, memory: Arc<M>, profile: AgentProfile) -> Self {
        Self {
            provider,
            memory,
            profile,
        }
    }

    pub fn profile(&self) -> &AgentProfile {
        &self.profile
    }

    pub fn memory(&self) -> &Arc<M> {
        &self.memory
    }

    /// Build the request: system prompt, prior messages, then the new message.
    async fn build_request(&self, dialog_id: &str, message: &str) -> CompletionRequest {
        let mut messages = match self
            .memory
            .get_history(dialog_id, self.profile.history_limit)
            .await
        {
            Ok(history) => history,
            Err(e) => {
                warn!(dialog_id, error = %e, "Failed to read dialog history, continuing without it");
                Vec::new()
            }
        };
        messages.push(Message::user(message));

        CompletionRequest {
            model: self.profile.model.clone(),
            messages,
            system: Some(self.profile.rendered_system_prompt()),
            max_tokens: self.profile.max_tokens,
            temperature: Some(self.profile.temperature),
            stop_sequences: None,
        }
    }

    async fn record_turn(&self, dialog_id: &str, message: &str, reply: &str) {
        if let Err(e) = self.memory.append(dialog_id, MessageRole::User, message).await {
            warn!(dialog_id, error = %e, "Failed to record user message");
            return;
        }
        if let Err(e) = self
            .memory
            .append(dialog_id, MessageRole::Assistant, reply)
            .await
        {
            warn!(dialog_id, error = %e, "Failed to record assistant reply");
        }
    }
}

impl<M: ConversationMemory> Agent for LlmAgent<M> {
    fn name(&self) -> &str {
        "llm"
    }

    async fn chat(&self, message: &str, dialog_id: Option<&str>) -> String {
        let dialog_id = dialog_id
            .filter(|id| !id.is_empty())
            .unwrap_or(DEFAULT_DIALOG_ID);
        let request = self.build_request(dialog_id, message).await;

        let span = info_span!(
            "gen_ai.chat",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            dialog_id = %dialog_id,
        );

        let response = match self.provider.complete(&request).instrument(span).await {
            Ok(response) => response,
            Err(e) => {
                warn!(dialog_id, error = %e, "LLM call failed");
                return format!("An error occurred: {e}");
            }
        };

        let reply = response.content.trim();
        if reply.is_empty() {
            warn!(dialog_id, stop_reason = %response.stop_reason, "LLM returned no content");
            return EMPTY_RESPONSE_REPLY.to_string();
        }

        debug!(
            dialog_id,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "LLM turn complete"
        );

        self.record_turn(dialog_id, message, reply).await;
        reply.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::Mutex;

    use parley_types::error::RepositoryError;
    use parley_types::llm::{CompletionResponse, LlmError, StopReason, Usage};

    use crate::llm::provider::LlmProvider;
    use crate::memory::InProcessMemory;

    #[derive(Clone)]
    enum MockResult {
        Text(String),
        RateLimited,
    }

    /// Provider that records every request it receives.
    struct MockProvider {
        result: MockResult,
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl MockProvider {
        fn replying(text: &str) -> (Self, Arc<Mutex<Vec<CompletionRequest>>>) {
            Self::with_result(MockResult::Text(text.to_string()))
        }

        fn with_result(result: MockResult) -> (Self, Arc<Mutex<Vec<CompletionRequest>>>) {
            let requests = Arc::new(Mutex::new(Vec::new()));
            let provider = Self {
                result,
                requests: Arc::clone(&requests),
            };
            (provider, requests)
        }
    }

    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        fn complete(
            &self,
            request: &CompletionRequest,
        ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send {
            self.requests.lock().unwrap().push(request.clone());
            let result = self.result.clone();
            async move {
                match result {
                    MockResult::Text(content) => Ok(CompletionResponse {
                        id: "resp-1".to_string(),
                        content,
                        model: "mock-model".to_string(),
                        stop_reason: StopReason::EndTurn,
                        usage: Usage {
                            input_tokens: 10,
                            output_tokens: 5,
                        },
                    }),
                    MockResult::RateLimited => Err(LlmError::RateLimited {
                        retry_after_ms: Some(1000),
                    }),
                }
            }
        }
    }

    /// Memory whose every operation fails.
    struct FailingMemory;

    impl ConversationMemory for FailingMemory {
        async fn append(
            &self,
            _dialog_id: &str,
            _role: MessageRole,
            _text: &str,
        ) -> Result<(), RepositoryError> {
            Err(RepositoryError::Connection)
        }

        async fn get_history(
            &self,
            _dialog_id: &str,
            _limit: usize,
        ) -> Result<Vec<Message>, RepositoryError> {
            Err(RepositoryError::Connection)
        }

        async fn dialog_ids(&self) -> Result<Vec<String>, RepositoryError> {
            Err(RepositoryError::Connection)
        }
    }

    fn profile() -> AgentProfile {
        AgentProfile::new("test-model", "You are terse.")
    }

    fn agent_with(
        provider: MockProvider,
        memory: Arc<InProcessMemory>,
        profile: AgentProfile,
    ) -> LlmAgent<InProcessMemory> {
        LlmAgent::new(BoxLlmProvider::new(provider), memory, profile)
    }

    #[tokio::test]
    async fn test_request_is_system_then_history_then_user() {
        let memory = Arc::new(InProcessMemory::new());
        memory.append("d1", MessageRole::User, "earlier question").await.unwrap();
        memory.append("d1", MessageRole::Assistant, "earlier answer").await.unwrap();

        let (provider, requests) = MockProvider::replying("ok");
        let agent = agent_with(provider, Arc::clone(&memory), profile());
        agent.chat("new question", Some("d1")).await;

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.model, "test-model");
        assert_eq!(request.system.as_deref(), Some("You are terse."));
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, 1024);
        assert_eq!(
            request.messages,
            vec![
                Message::user("earlier question"),
                Message::assistant("earlier answer"),
                Message::user("new question"),
            ]
        );
    }

    #[tokio::test]
    async fn test_reply_is_trimmed_and_recorded() {
        let memory = Arc::new(InProcessMemory::new());
        let (provider, _) = MockProvider::replying("  Paris.\n");
        let agent = agent_with(provider, Arc::clone(&memory), profile());

        let reply = agent.chat("Capital of France?", Some("geo")).await;

        assert_eq!(reply, "Paris.");
        let history = memory.get_history("geo", 50).await.unwrap();
        assert_eq!(
            history,
            vec![Message::user("Capital of France?"), Message::assistant("Paris.")]
        );
    }

    #[tokio::test]
    async fn test_empty_reply_returns_diagnostic_without_recording() {
        let memory = Arc::new(InProcessMemory::new());
        let (provider, _) = MockProvider::replying("   \n ");
        let agent = agent_with(provider, Arc::clone(&memory), profile());

        let reply = agent.chat("hello", Some("d1")).await;

        assert_eq!(reply, EMPTY_RESPONSE_REPLY);
        assert!(memory.get_history("d1", 50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_backend_error_becomes_reply_text() {
        let memory = Arc::new(InProcessMemory::new());
        let (provider, _) = MockProvider::with_result(MockResult::RateLimited);
        let agent = agent_with(provider, Arc::clone(&memory), profile());

        let reply = agent.chat("hello", Some("d1")).await;

        assert!(reply.starts_with("An error occurred: "));
        assert!(reply.contains("rate limited"));
        assert!(memory.get_history("d1", 50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_dialog_id_uses_default() {
        let memory = Arc::new(InProcessMemory::new());
        let (provider, _) = MockProvider::replying("hi");
        let agent = agent_with(provider, Arc::clone(&memory), profile());

        agent.chat("hello", None).await;

        assert_eq!(memory.len(DEFAULT_DIALOG_ID), 2);
        assert_eq!(memory.dialog_ids().await.unwrap(), vec!["default"]);
    }

    #[tokio::test]
    async fn test_empty_dialog_id_uses_default() {
        let memory = Arc::new(InProcessMemory::new());
        let (provider, _) = MockProvider::replying("hi");
        let agent = agent_with(provider, Arc::clone(&memory), profile());

        agent.chat("hello", Some("")).await;

        assert_eq!(memory.len(DEFAULT_DIALOG_ID), 2);
        assert_eq!(memory.dialog_ids().await.unwrap(), vec!["default"]);
    }

    #[tokio::test]
    async fn test_history_limit_bounds_context() {
        let memory = Arc::new(InProcessMemory::new());
        for i in 0..10 {
            memory.append("d1", MessageRole::User, &format!("m{i}")).await.unwrap();
        }

        let (provider, requests) = MockProvider::replying("ok");
        let agent = agent_with(provider, Arc::clone(&memory), profile().with_history_limit(3));
        agent.chat("latest", Some("d1")).await;

        let requests = requests.lock().unwrap();
        let contents: Vec<&str> = requests[0]
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["m7", "m8", "m9", "latest"]);
    }

    #[tokio::test]
    async fn test_tools_are_advertised_in_system_prompt() {
        let memory = Arc::new(InProcessMemory::new());
        let (provider, requests) = MockProvider::replying("ok");
        let profile = profile().with_tools(vec![ToolDescriptor::new(
            "InternetSearch",
            "Search the web",
        )]);
        let agent = agent_with(provider, memory, profile);

        agent.chat("find something", None).await;

        let requests = requests.lock().unwrap();
        let system = requests[0].system.as_deref().unwrap();
        assert!(system.starts_with("You are terse.\n\n<available_tools>"));
        assert!(system.contains("<tool name=\"InternetSearch\">Search the web</tool>"));
    }

    #[tokio::test]
    async fn test_memory_failure_does_not_break_the_turn() {
        let (provider, requests) = MockProvider::replying("still here");
        let agent = LlmAgent::new(
            BoxLlmProvider::new(provider),
            Arc::new(FailingMemory),
            profile(),
        );

        let reply = agent.chat("hello", Some("d1")).await;

        assert_eq!(reply, "still here");
        let requests = requests.lock().unwrap();
        assert_eq!(requests[0].messages, vec![Message::user("hello")]);
    }

    #[tokio::test]
    async fn test_dialogs_do_not_share_history() {
        let memory = Arc::new(InProcessMemory::new());
        let (provider, requests) = MockProvider::replying("ok");
        let agent = agent_with(provider, Arc::clone(&memory), profile());

        agent.chat("for a", Some("a")).await;
        agent.chat("for b", Some("b")).await;

        let requests = requests.lock().unwrap();
        assert_eq!(requests[1].messages, vec![Message::user("for b")]);
        assert_eq!(memory.len("a"), 2);
        assert_eq!(memory.len("b"), 2);
    }

    #[test]
    fn test_profile_from_backend() {
        let backend = BackendSettings {
            api_url: "http://localhost:8080/v1".to_string(),
            api_key: "sk-test".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            max_tokens: 256,
        };
        let profile = AgentProfile::from_backend(&backend, "Be brief.");
        assert_eq!(profile.model, "gpt-4o-mini");
        assert_eq!(profile.temperature, 0.2);
        assert_eq!(profile.max_tokens, 256);
        assert_eq!(profile.history_limit, DEFAULT_HISTORY_LIMIT);
        assert_eq!(profile.rendered_system_prompt(), "Be brief.");
    }
}
