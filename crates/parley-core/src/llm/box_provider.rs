//! Type-erased provider handle.
//!
//! [`LlmProvider`] returns `impl Future`, so it cannot be a trait object.
//! [`LlmProviderDyn`] is its object-safe twin with boxed futures, and
//! [`BoxLlmProvider`] owns one so agents can pick a backend at runtime.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use parley_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use super::provider::LlmProvider;

/// Boxed future returned by [`LlmProviderDyn::complete_boxed`].
pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>>;

pub trait LlmProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn complete_boxed<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a>;
}

impl<P: LlmProvider> LlmProviderDyn for P {
    fn name(&self) -> &str {
        LlmProvider::name(self)
    }

    fn complete_boxed<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a> {
        Box::pin(LlmProvider::complete(self, request))
    }
}

/// Owned, type-erased provider.
pub struct BoxLlmProvider(Box<dyn LlmProviderDyn>);

impl BoxLlmProvider {
    pub fn new<P: LlmProvider + 'static>(provider: P) -> Self {
        Self(Box::new(provider))
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        self.0.complete_boxed(request).await
    }
}

impl fmt::Debug for BoxLlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoxLlmProvider").field(&self.name()).finish()
    }
}
