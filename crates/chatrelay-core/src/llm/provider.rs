//! CompletionProvider trait definition.
//!
//! The abstraction every completion backend implements. Uses RPITIT for
//! `complete`; see `BoxCompletionProvider` for the type-erased form.

use chatrelay_types::llm::{CompletionRequest, LlmError};

/// Trait for completion service backends (OpenAI-compatible APIs, test doubles).
///
/// Implementations live in chatrelay-infra (e.g., `OpenAiCompatibleProvider`).
pub trait CompletionProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the raw reply text.
    ///
    /// The text may be empty; substituting a fallback is the dispatcher's job.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;
}
