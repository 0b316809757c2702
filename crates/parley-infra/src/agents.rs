//! Agent wiring.
//!
//! Builds the registry the entry point resolves agents from. Each factory
//! captures the settings it needs and validates them when it runs, so an
//! agent with missing credentials fails at `resolve`, never mid-chat.

use std::sync::Arc;

use parley_core::agent::roles::{RESEARCHER, Role};
use parley_core::agent::{
    AgentProfile, AgentRegistry, AgentRegistryBuilder, BoxAgent, FactoryArgs, LlmAgent, echo,
};
use parley_core::memory::{ConversationMemory, InProcessMemory};
use parley_types::config::{BackendSettings, Settings};
use parley_types::error::AgentError;

use crate::llm::create_provider;
use crate::sqlite::SqliteConversationMemory;

/// Agent backed by the model with a fresh in-process memory per instance.
pub const OPENAI_SDK_AGENT_NAME: &str = "openai_sdk";

/// Agent backed by the model with the shared durable memory.
pub const ASSISTANT_AGENT_NAME: &str = "assistant";

/// Register every built-in agent and freeze the registry.
pub fn build_registry(
    settings: Arc<Settings>,
    durable: Arc<SqliteConversationMemory>,
) -> AgentRegistry {
    let mut builder = AgentRegistryBuilder::new();
    register_agents(&mut builder, settings, durable);
    builder.build()
}

/// Register the built-in agents on an existing builder.
pub fn register_agents<M>(
    builder: &mut AgentRegistryBuilder,
    settings: Arc<Settings>,
    durable: Arc<M>,
) where
    M: ConversationMemory + 'static,
{
    echo::register(builder);

    {
        let settings = Arc::clone(&settings);
        builder.register_fn(OPENAI_SDK_AGENT_NAME, move |args: FactoryArgs| {
            llm_agent(&settings, Arc::new(InProcessMemory::new()), args)
        });
    }

    {
        let settings = Arc::clone(&settings);
        let durable = Arc::clone(&durable);
        builder.register_fn(ASSISTANT_AGENT_NAME, move |args: FactoryArgs| {
            llm_agent(&settings, Arc::clone(&durable), args)
        });
    }

    builder.register_fn(RESEARCHER.name, move |args: FactoryArgs| {
        role_agent(&settings, Arc::clone(&durable), &RESEARCHER, args)
    });
}

/// General-purpose agent: configured prompt unless the caller overrides it,
/// and every supplied tool.
fn llm_agent<M>(
    settings: &Settings,
    memory: Arc<M>,
    args: FactoryArgs,
) -> Result<BoxAgent, AgentError>
where
    M: ConversationMemory + 'static,
{
    let backend = BackendSettings::from_settings(settings)?;
    let prompt = args
        .system_prompt
        .unwrap_or_else(|| settings.system_prompt.clone());
    let profile = AgentProfile::from_backend(&backend, prompt)
        .with_history_limit(settings.history_limit)
        .with_tools(args.tools);

    Ok(BoxAgent::new(LlmAgent::new(
        create_provider(&backend),
        memory,
        profile,
    )))
}

/// Role agent: fixed prompt and only the tools on the role's allow-list.
fn role_agent<M>(
    settings: &Settings,
    memory: Arc<M>,
    role: &Role,
    args: FactoryArgs,
) -> Result<BoxAgent, AgentError>
where
    M: ConversationMemory + 'static,
{
    let backend = BackendSettings::from_settings(settings)?;
    let profile = AgentProfile::from_backend(&backend, role.system_prompt)
        .with_history_limit(settings.history_limit)
        .with_tools(role.visible_tools(args.tools));

    Ok(BoxAgent::new(LlmAgent::new(
        create_provider(&backend),
        memory,
        profile,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::agent::tools::builtin_catalog;

    fn configured() -> Arc<Settings> {
        Arc::new(Settings {
            api_key: Some("sk-test".to_string()),
            model: Some("gpt-4o-mini".to_string()),
            ..Settings::default()
        })
    }

    fn registry_with(settings: Arc<Settings>) -> AgentRegistry {
        let mut builder = AgentRegistryBuilder::new();
        register_agents(&mut builder, settings, Arc::new(InProcessMemory::new()));
        builder.build()
    }

    #[test]
    fn test_all_agents_registered() {
        let registry = registry_with(configured());
        assert_eq!(
            registry.names(),
            vec!["assistant", "echo", "openai_sdk", "researcher"]
        );
    }

    #[test]
    fn test_every_name_resolves_when_configured() {
        let registry = registry_with(configured());
        for name in registry.names() {
            let args = FactoryArgs::default().with_tools(builtin_catalog());
            let agent = registry.resolve(name, args).unwrap();
            assert!(!agent.name().is_empty());
        }
    }

    #[test]
    fn test_llm_agents_fail_fast_without_credentials() {
        let registry = registry_with(Arc::new(Settings::default()));

        for name in ["openai_sdk", "assistant", "researcher"] {
            match registry.resolve(name, FactoryArgs::default()) {
                Err(AgentError::ConfigurationMissing(key)) => assert_eq!(key, "OPENAI_API_KEY"),
                other => panic!("expected ConfigurationMissing for {name}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_missing_model_is_reported() {
        let settings = Arc::new(Settings {
            api_key: Some("sk-test".to_string()),
            ..Settings::default()
        });
        let registry = registry_with(settings);

        match registry.resolve("assistant", FactoryArgs::default()) {
            Err(AgentError::ConfigurationMissing(key)) => assert_eq!(key, "LLM_MODEL_NAME"),
            other => panic!("expected ConfigurationMissing, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_echo_needs_no_credentials() {
        let registry = registry_with(Arc::new(Settings::default()));
        let agent = registry.resolve("echo", FactoryArgs::default()).unwrap();
        assert_eq!(agent.chat("hello", None).await, "Echo: hello");
    }

    #[tokio::test]
    async fn test_echo_never_writes_shared_memory() {
        let shared = Arc::new(InProcessMemory::new());
        let mut builder = AgentRegistryBuilder::new();
        register_agents(&mut builder, configured(), Arc::clone(&shared));
        let registry = builder.build();

        let agent = registry.resolve("echo", FactoryArgs::default()).unwrap();
        agent.chat("hello", Some("d1")).await;

        assert!(shared.get_history("d1", 50).await.unwrap().is_empty());
        assert!(shared.dialog_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_build_registry_with_durable_memory() {
        let dir = tempfile::tempdir().unwrap();
        let pool = crate::sqlite::DatabasePool::open(&dir.path().join("parley.db"))
            .await
            .unwrap();
        let durable = Arc::new(SqliteConversationMemory::new(pool));

        let registry = build_registry(configured(), durable);
        assert!(registry.contains("assistant"));
        assert!(registry.resolve("researcher", FactoryArgs::default()).is_ok());
    }
}
