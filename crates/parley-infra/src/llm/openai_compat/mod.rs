//! OpenAI-compatible LLM provider.
//!
//! Talks to the public OpenAI API or to any server speaking the same chat
//! completions protocol (vLLM, Ollama, LM Studio, ...), selected by base URL.

pub mod config;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::{ApiError, OpenAIError};
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
    CreateChatCompletionResponse, FinishReason, StopConfiguration,
};
use secrecy::ExposeSecret;

use parley_core::llm::provider::LlmProvider;
use parley_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, Message, MessageRole, StopReason, Usage,
};

use self::config::OpenAiCompatConfig;

/// Provider for any OpenAI-compatible chat completions endpoint.
///
/// Not `Debug`: the wrapped client carries the API key.
pub struct OpenAiCompatibleProvider {
    client: Client<OpenAIConfig>,
    provider_name: String,
    default_model: String,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: OpenAiCompatConfig) -> Self {
        let client_config = OpenAIConfig::new()
            .with_api_base(&config.base_url)
            .with_api_key(config.api_key.expose_secret());

        Self {
            client: Client::with_config(client_config),
            provider_name: config.provider_name,
            default_model: config.model,
        }
    }

    /// Provider for the public OpenAI endpoint.
    pub fn openai(api_key: &str, model: &str) -> Self {
        Self::new(OpenAiCompatConfig::openai(api_key, model))
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    fn to_wire(&self, request: &CompletionRequest) -> CreateChatCompletionRequest {
        let messages = request
            .system
            .iter()
            .map(|system| system_message(system))
            .chain(request.messages.iter().map(wire_message))
            .collect();

        let model = match request.model.as_str() {
            "" => self.default_model.clone(),
            model => model.to_string(),
        };

        let stop = request
            .stop_sequences
            .as_ref()
            .filter(|stops| !stops.is_empty())
            .map(|stops| StopConfiguration::StringArray(stops.clone()));

        CreateChatCompletionRequest {
            model,
            messages,
            max_completion_tokens: Some(request.max_tokens),
            temperature: request.temperature.map(|t| t as f32),
            stop,
            ..Default::default()
        }
    }
}

fn system_message(text: &str) -> ChatCompletionRequestMessage {
    ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
        content: ChatCompletionRequestSystemMessageContent::Text(text.to_string()),
        name: None,
    })
}

fn wire_message(message: &Message) -> ChatCompletionRequestMessage {
    let text = message.content.clone();
    match message.role {
        MessageRole::System => system_message(&text),
        MessageRole::User => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(text),
            name: None,
        }),
        #[allow(deprecated)]
        MessageRole::Assistant => {
            ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                content: Some(ChatCompletionRequestAssistantMessageContent::Text(text)),
                refusal: None,
                name: None,
                audio: None,
                tool_calls: None,
                function_call: None,
            })
        }
    }
}

fn stop_reason(reason: Option<&FinishReason>) -> StopReason {
    match reason {
        Some(FinishReason::Length) => StopReason::MaxTokens,
        Some(FinishReason::ToolCalls) | Some(FinishReason::FunctionCall) => StopReason::ToolUse,
        Some(FinishReason::Stop) | Some(FinishReason::ContentFilter) | None => StopReason::EndTurn,
    }
}

/// Convert the wire response. A missing choice or null content both come
/// back as empty text.
fn from_wire(response: CreateChatCompletionResponse) -> CompletionResponse {
    let first = response.choices.into_iter().next();
    let stop_reason = stop_reason(first.as_ref().and_then(|c| c.finish_reason.as_ref()));
    let content = first.and_then(|c| c.message.content).unwrap_or_default();
    let usage = response
        .usage
        .map(|u| Usage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        })
        .unwrap_or_default();

    CompletionResponse {
        id: response.id,
        content,
        model: response.model,
        stop_reason,
        usage,
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let response = self
            .client
            .chat()
            .create(self.to_wire(request))
            .await
            .map_err(into_llm_error)?;
        Ok(from_wire(response))
    }
}

/// Classify an API error body by its code, type and message.
fn classify_api_error(api_err: &ApiError) -> Option<LlmError> {
    let code = api_err.code.as_deref().unwrap_or_default();
    let kind = api_err.r#type.as_deref().unwrap_or_default();
    let message = api_err.message.as_str();

    if matches!(code, "invalid_api_key" | "authentication_error")
        || kind == "authentication_error"
        || message.contains("Incorrect API key")
    {
        Some(LlmError::AuthenticationFailed)
    } else if code == "rate_limit_exceeded" || kind == "rate_limit_error" {
        Some(LlmError::RateLimited {
            retry_after_ms: None,
        })
    } else if code == "context_length_exceeded" || message.contains("maximum context length") {
        Some(LlmError::ContextLengthExceeded)
    } else if code == "server_error" || kind == "overloaded_error" {
        Some(LlmError::Overloaded(message.to_string()))
    } else {
        None
    }
}

fn into_llm_error(err: OpenAIError) -> LlmError {
    let classified = match &err {
        OpenAIError::ApiError(api_err) => classify_api_error(api_err),
        OpenAIError::Reqwest(http_err) => match http_err.status().map(|s| s.as_u16()) {
            Some(401) => Some(LlmError::AuthenticationFailed),
            Some(429) => Some(LlmError::RateLimited {
                retry_after_ms: None,
            }),
            Some(503) => Some(LlmError::Overloaded(err.to_string())),
            _ => None,
        },
        OpenAIError::JSONDeserialize(_, body) => Some(LlmError::Deserialization(format!(
            "failed to parse response: {body}"
        ))),
        OpenAIError::InvalidArgument(msg) => Some(LlmError::InvalidRequest(msg.clone())),
        _ => None,
    };

    classified.unwrap_or_else(|| LlmError::Provider {
        message: err.to_string(),
    })
}
