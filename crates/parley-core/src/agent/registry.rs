//! Agent registry for runtime agent lookup.
//!
//! Registration happens once, on an `AgentRegistryBuilder`, while the process
//! starts up. `build()` freezes it into an `AgentRegistry` that only supports
//! lookups, so nothing can mutate the set of agents after startup.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use parley_types::error::AgentError;
use parley_types::tool::ToolDescriptor;

use super::capability::BoxAgent;

/// Keyword arguments handed to a factory on every `resolve`.
///
/// Factories ignore the fields they have no use for.
#[derive(Debug, Clone, Default)]
pub struct FactoryArgs {
    /// Tools the caller makes available to the agent.
    pub tools: Vec<ToolDescriptor>,
    /// Replacement for the agent's configured system prompt.
    pub system_prompt: Option<String>,
}

impl FactoryArgs {
    pub fn with_tools(mut self, tools: Vec<ToolDescriptor>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// A function producing a fresh agent instance.
///
/// Returns `ConfigurationMissing` when the agent cannot be built from the
/// configuration it captured.
pub type AgentFactory = Arc<dyn Fn(FactoryArgs) -> Result<BoxAgent, AgentError> + Send + Sync>;

/// Collects agent factories during initialization.
#[derive(Default)]
pub struct AgentRegistryBuilder {
    factories: HashMap<String, AgentFactory>,
}

impl AgentRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under the given name.
    ///
    /// If a factory with this name already exists, it is replaced.
    pub fn register(&mut self, name: impl Into<String>, factory: AgentFactory) -> &mut Self {
        let name = name.into();
        if self.factories.insert(name.clone(), factory).is_some() {
            debug!(agent = %name, "Replacing previously registered agent factory");
        }
        self
    }

    /// Register a closure as a factory.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(FactoryArgs) -> Result<BoxAgent, AgentError> + Send + Sync + 'static,
    {
        self.register(name, Arc::new(factory))
    }

    /// Freeze the registered factories into a read-only registry.
    pub fn build(self) -> AgentRegistry {
        AgentRegistry {
            factories: self.factories,
        }
    }
}

/// Read-only registry of agent factories, indexed by name.
pub struct AgentRegistry {
    factories: HashMap<String, AgentFactory>,
}

impl AgentRegistry {
    /// Build a fresh agent by name.
    ///
    /// Every call runs the factory again; nothing is cached here.
    pub fn resolve(&self, name: &str, args: FactoryArgs) -> Result<BoxAgent, AgentError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| AgentError::NotFound(name.to_string()))?;
        let agent = factory(args)?;
        debug!(agent = %name, "Resolved agent");
        Ok(agent)
    }

    /// Whether a factory is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::capability::Agent;
    use crate::agent::echo::EchoAgent;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replies with whatever it was built with, so tests can see the factory args.
    struct ArgsAgent {
        reply: String,
    }

    impl Agent for ArgsAgent {
        fn name(&self) -> &str {
            "args"
        }

        async fn chat(&self, _message: &str, _dialog_id: Option<&str>) -> String {
            self.reply.clone()
        }
    }

    fn echo_factory(prefix: &'static str) -> AgentFactory {
        Arc::new(move |_args: FactoryArgs| Ok(BoxAgent::new(EchoAgent::new(prefix))))
    }

    #[tokio::test]
    async fn test_resolve_registered_name() {
        let mut builder = AgentRegistryBuilder::new();
        builder.register("echo", echo_factory("> "));
        let registry = builder.build();

        let agent = registry.resolve("echo", FactoryArgs::default()).unwrap();
        assert_eq!(agent.chat("ping", None).await, "> ping");
    }

    #[test]
    fn test_resolve_unknown_name_is_not_found() {
        let registry = AgentRegistryBuilder::new().build();
        match registry.resolve("ghost", FactoryArgs::default()) {
            Err(AgentError::NotFound(name)) => assert_eq!(name, "ghost"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reregistration_overwrites() {
        let mut builder = AgentRegistryBuilder::new();
        builder.register("echo", echo_factory("old: "));
        builder.register("echo", echo_factory("new: "));
        let registry = builder.build();

        assert_eq!(registry.len(), 1);
        let agent = registry.resolve("echo", FactoryArgs::default()).unwrap();
        assert_eq!(agent.chat("hi", None).await, "new: hi");
    }

    #[test]
    fn test_every_resolve_runs_the_factory() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut builder = AgentRegistryBuilder::new();
        builder.register_fn("counted", move |_args| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(BoxAgent::new(EchoAgent::new("")))
        });
        let registry = builder.build();

        registry.resolve("counted", FactoryArgs::default()).unwrap();
        registry.resolve("counted", FactoryArgs::default()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_factory_receives_args() {
        let mut builder = AgentRegistryBuilder::new();
        builder.register_fn("args", |args: FactoryArgs| {
            let tools: Vec<String> = args.tools.into_iter().map(|t| t.name).collect();
            let reply = format!(
                "{}|{}",
                args.system_prompt.unwrap_or_default(),
                tools.join(",")
            );
            Ok(BoxAgent::new(ArgsAgent { reply }))
        });
        let registry = builder.build();

        let args = FactoryArgs::default()
            .with_system_prompt("be terse")
            .with_tools(vec![
                ToolDescriptor::new("InternetSearch", ""),
                ToolDescriptor::new("SqlQuery", ""),
            ]);
        let agent = registry.resolve("args", args).unwrap();
        assert_eq!(agent.chat("", None).await, "be terse|InternetSearch,SqlQuery");
    }

    #[test]
    fn test_factory_error_propagates() {
        let mut builder = AgentRegistryBuilder::new();
        builder.register_fn("needs-key", |_args| {
            Err(AgentError::ConfigurationMissing("OPENAI_API_KEY".to_string()))
        });
        let registry = builder.build();

        let result = registry.resolve("needs-key", FactoryArgs::default());
        assert!(matches!(result, Err(AgentError::ConfigurationMissing(_))));
    }

    #[test]
    fn test_names_are_sorted() {
        let mut builder = AgentRegistryBuilder::new();
        builder
            .register("researcher", echo_factory(""))
            .register("assistant", echo_factory(""))
            .register("echo", echo_factory(""));
        let registry = builder.build();

        assert_eq!(registry.names(), vec!["assistant", "echo", "researcher"]);
        assert!(registry.contains("echo"));
        assert!(!registry.contains("openai_sdk"));
    }
}
