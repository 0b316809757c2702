//! The agent capability: one asynchronous `chat` operation.
//!
//! Follows the same blanket-impl pattern as `BoxLlmProvider`:
//! 1. `Agent` is the RPITIT trait concrete variants implement
//! 2. `AgentDyn` is its object-safe twin with a boxed future
//! 3. `BoxAgent` wraps `Box<dyn AgentDyn>` and is what factories return

use std::future::Future;
use std::pin::Pin;

/// Contract every agent variant satisfies.
///
/// `chat` never fails: anything that goes wrong while producing a reply is
/// reported inside the returned text. `dialog_id` of `None` means the
/// default dialog.
pub trait Agent: Send + Sync {
    /// Variant name used in logs (e.g., "echo", "llm").
    fn name(&self) -> &str;

    /// Produce a reply to `message` within a dialog.
    fn chat(
        &self,
        message: &str,
        dialog_id: Option<&str>,
    ) -> impl Future<Output = String> + Send;
}

/// Object-safe version of [`Agent`] with a boxed future.
pub trait AgentDyn: Send + Sync {
    fn name(&self) -> &str;

    fn chat_boxed<'a>(
        &'a self,
        message: &'a str,
        dialog_id: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = String> + Send + 'a>>;
}

impl<T: Agent> AgentDyn for T {
    fn name(&self) -> &str {
        Agent::name(self)
    }

    fn chat_boxed<'a>(
        &'a self,
        message: &'a str,
        dialog_id: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = String> + Send + 'a>> {
        Box::pin(self.chat(message, dialog_id))
    }
}

/// Type-erased agent returned by the registry.
pub struct BoxAgent {
    inner: Box<dyn AgentDyn + Send + Sync>,
}

impl BoxAgent {
    /// Wrap a concrete `Agent` in a type-erased box.
    pub fn new<T: Agent + 'static>(agent: T) -> Self {
        Self {
            inner: Box::new(agent),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn chat(&self, message: &str, dialog_id: Option<&str>) -> String {
        self.inner.chat_boxed(message, dialog_id).await
    }
}

impl std::fmt::Debug for BoxAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxAgent").field("name", &self.name()).finish()
    }
}
