//! Completion dispatch on a bounded worker pool.
//!
//! Every call to the completion service runs on its own spawned task,
//! gated by a semaphore sized to `dispatch_workers`. The handler that
//! requested it only awaits the result, so the accept loop is never
//! held up by a slow or stalled call, and a panic inside a provider
//! surfaces as a `ServiceError` for that one request.

use std::sync::Arc;
use std::time::Instant;

use chatrelay_types::chat::RequestPayload;
use chatrelay_types::error::ServiceError;
use chatrelay_types::llm::CompletionRequest;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::llm::BoxCompletionProvider;

/// Reply used when the service answers with an empty or whitespace-only body.
pub const NO_ANSWER_REPLY: &str = "Sorry, I don't have an answer to that.";

/// Runs completion calls off the accept path.
///
/// Cheap to clone; clones share the provider and the worker permits.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    provider: Arc<BoxCompletionProvider>,
    workers: Arc<Semaphore>,
    max_workers: usize,
    model: Arc<str>,
    temperature: f32,
}

impl Dispatcher {
    /// Create a dispatcher allowing `max_workers` calls in flight (at least one).
    pub fn new(
        provider: BoxCompletionProvider,
        model: impl Into<Arc<str>>,
        temperature: f32,
        max_workers: usize,
    ) -> Self {
        let max_workers = max_workers.max(1);
        Self {
            provider: Arc::new(provider),
            workers: Arc::new(Semaphore::new(max_workers)),
            max_workers,
            model: model.into(),
            temperature,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Completion calls currently holding a worker permit.
    pub fn in_flight(&self) -> usize {
        self.max_workers - self.workers.available_permits()
    }

    /// Stop accepting new dispatches. Calls already running complete normally.
    pub fn close(&self) {
        self.workers.close();
    }

    /// Send `payload` to the completion service and wait for the reply.
    ///
    /// Waits for a free worker first. No retry and no timeout beyond what
    /// the provider's own transport enforces. Dropping the returned future
    /// does not abort a call that has already started.
    pub async fn invoke(&self, payload: RequestPayload) -> Result<String, ServiceError> {
        let request = CompletionRequest::from_payload(payload, &*self.model, self.temperature);

        let permit = Arc::clone(&self.workers)
            .acquire_owned()
            .await
            .map_err(|_| ServiceError::PoolClosed)?;

        let provider = Arc::clone(&self.provider);
        let started = Instant::now();
        let worker = tokio::spawn(async move {
            let _permit = permit;
            provider.complete(&request).await
        });

        let reply = match worker.await {
            Ok(result) => result?,
            Err(err) => return Err(ServiceError::WorkerFailed(err.to_string())),
        };

        debug!(
            provider = self.provider.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            reply_chars = reply.chars().count(),
            "completion finished"
        );

        Ok(non_empty_or_fallback(reply))
    }
}

fn non_empty_or_fallback(reply: String) -> String {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        NO_ANSWER_REPLY.to_string()
    } else if trimmed.len() == reply.len() {
        reply
    } else {
        trimmed.to_string()
    }
}
