//! Echo agent: replies with the message behind a fixed prefix.
//!
//! No backend call and no memory. Used to exercise the registry wiring and
//! the chat contract without network access or credentials.

use super::capability::Agent;
use super::registry::{AgentRegistryBuilder, FactoryArgs};

/// Name the echo agent registers under.
pub const ECHO_AGENT_NAME: &str = "echo";

/// Prefix used by the registered echo agent.
pub const ECHO_PREFIX: &str = "Echo: ";

#[derive(Debug, Clone)]
pub struct EchoAgent {
    prefix: String,
}

impl EchoAgent {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Agent for EchoAgent {
    fn name(&self) -> &str {
        ECHO_AGENT_NAME
    }

    async fn chat(&self, message: &str, _dialog_id: Option<&str>) -> String {
        format!("{}{}", self.prefix, message)
    }
}

/// Register the echo agent under [`ECHO_AGENT_NAME`].
pub fn register(builder: &mut AgentRegistryBuilder) {
    builder.register_fn(ECHO_AGENT_NAME, |_args: FactoryArgs| {
        Ok(super::BoxAgent::new(EchoAgent::new(ECHO_PREFIX)))
    });
}
