//! Wiring of the relay's components from configuration.
//!
//! Components are generic over the transport; this module pins the store
//! and provider to the concrete implementations.

use std::sync::Arc;

use secrecy::SecretString;

use chatrelay_core::conversation::{InMemoryConversationStore, RequestBuilder};
use chatrelay_core::dispatch::Dispatcher;
use chatrelay_core::llm::BoxCompletionProvider;
use chatrelay_core::router::CommandRouter;
use chatrelay_core::transport::Transport;
use chatrelay_infra::llm::openai_compat::{OpenAiCompatConfig, OpenAiCompatibleProvider};
use chatrelay_types::config::RelayConfig;

/// Router pinned to the in-memory store.
pub type RelayRouter<T> = CommandRouter<InMemoryConversationStore, T>;

/// Build the router for `transport` with a provider selected from `config`.
pub fn build_router<T: Transport>(
    config: &RelayConfig,
    api_key: SecretString,
    transport: Arc<T>,
) -> RelayRouter<T> {
    let provider = OpenAiCompatibleProvider::new(OpenAiCompatConfig::from_settings(
        &config.provider,
        api_key,
    ));
    let provider = BoxCompletionProvider::new(provider);

    build_router_with(config, provider, transport)
}

/// Build the router around an already constructed provider.
pub fn build_router_with<T: Transport>(
    config: &RelayConfig,
    provider: BoxCompletionProvider,
    transport: Arc<T>,
) -> RelayRouter<T> {
    let store = Arc::new(InMemoryConversationStore::new(config.max_turns));
    let builder = RequestBuilder::new(config.system_prompt.as_str());
    let dispatcher = Dispatcher::new(
        provider,
        config.model.as_str(),
        config.temperature,
        config.dispatch_workers,
    );

    tracing::debug!(
        provider = dispatcher.provider_name(),
        model = %config.model,
        workers = dispatcher.max_workers(),
        history_capacity = store.capacity(),
        "relay components wired"
    );

    CommandRouter::new(store, builder, dispatcher, transport, config.chunk_limit)
}
