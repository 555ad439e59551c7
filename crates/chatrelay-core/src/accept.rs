//! Accept loop: one spawned task per inbound event.
//!
//! The loop only receives events and spawns handlers, so it is free to take
//! the next event while earlier ones wait on the completion service. On
//! shutdown it stops accepting and waits for in-flight handlers; dispatched
//! requests are never abandoned. Once drained, the dispatch pool is closed.

use std::sync::Arc;

use chatrelay_types::transport::InboundEvent;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::conversation::ConversationStore;
use crate::router::{CommandRouter, Outcome};
use crate::transport::Transport;

/// Counters reported when the accept loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcceptStats {
    pub accepted: u64,
    pub completed: u64,
    pub panicked: u64,
}

impl AcceptStats {
    fn record(&mut self, joined: Result<Outcome, JoinError>) {
        match joined {
            Ok(outcome) => {
                self.completed += 1;
                debug!(?outcome, "handler finished");
            }
            Err(err) => {
                self.panicked += 1;
                error!(error = %err, "handler task failed");
            }
        }
    }
}

/// Receive events until the channel closes or `shutdown` fires, then drain.
pub async fn run_accept_loop<S, T>(
    router: Arc<CommandRouter<S, T>>,
    mut inbound: mpsc::Receiver<InboundEvent>,
    shutdown: CancellationToken,
) -> AcceptStats
where
    S: ConversationStore + 'static,
    T: Transport + 'static,
{
    let mut stats = AcceptStats::default();
    let mut in_flight: JoinSet<Outcome> = JoinSet::new();

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                info!(
                    dispatching = router.dispatcher().in_flight(),
                    "shutdown requested, no longer accepting events"
                );
                break;
            }

            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                stats.record(joined);
            }

            event = inbound.recv() => {
                let Some(event) = event else {
                    info!("inbound channel closed");
                    break;
                };
                stats.accepted += 1;
                let router = Arc::clone(&router);
                in_flight.spawn(async move { router.handle(event).await });
            }
        }
    }

    if !in_flight.is_empty() {
        info!(in_flight = in_flight.len(), "waiting for in-flight requests");
    }
    while let Some(joined) = in_flight.join_next().await {
        stats.record(joined);
    }
    router.dispatcher().close();

    info!(
        accepted = stats.accepted,
        completed = stats.completed,
        panicked = stats.panicked,
        "accept loop stopped"
    );
    stats
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use chatrelay_types::chat::{ChatId, RequestPayload, Turn, UserId};
    use chatrelay_types::error::{ServiceError, TransportError};
    use chatrelay_types::llm::{CompletionRequest, LlmError};
    use tokio::sync::Notify;

    use super::*;
    use crate::conversation::{InMemoryConversationStore, RequestBuilder};
    use crate::dispatch::Dispatcher;
    use crate::llm::{BoxCompletionProvider, CompletionProvider};

    /// Echoes the last message; waits for `release` when it says "wait".
    struct Echo {
        release: Arc<Notify>,
    }

    impl CompletionProvider for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
            let last = request
                .messages
                .last()
                .map(|t| t.content().to_string())
                .unwrap_or_default();
            if last == "wait" {
                self.release.notified().await;
            }
            Ok(format!("echo {last}"))
        }
    }

    /// Records sends; panics when asked to send to chat 13.
    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<(ChatId, String)>>,
    }

    impl Transport for Recorder {
        async fn send(&self, chat: ChatId, text: &str) -> Result<(), TransportError> {
            assert_ne!(chat, ChatId(13), "transport exploded");
            self.sent.lock().unwrap().push((chat, text.to_string()));
            Ok(())
        }
    }

    fn router(
        release: Arc<Notify>,
        transport: Arc<Recorder>,
    ) -> Arc<CommandRouter<InMemoryConversationStore, Recorder>> {
        Arc::new(CommandRouter::new(
            Arc::new(InMemoryConversationStore::new(8)),
            RequestBuilder::new("sys"),
            Dispatcher::new(BoxCompletionProvider::new(Echo { release }), "m", 0.0, 4),
            transport,
            4096,
        ))
    }

    #[tokio::test]
    async fn handles_every_event_until_channel_closes() {
        let transport = Arc::new(Recorder::default());
        let router = router(Arc::new(Notify::new()), Arc::clone(&transport));
        let (tx, rx) = mpsc::channel(16);

        let accept = tokio::spawn(run_accept_loop(
            Arc::clone(&router),
            rx,
            CancellationToken::new(),
        ));

        for user in 1..=3 {
            tx.send(InboundEvent::new(UserId(user), ChatId(user), "hi"))
                .await
                .unwrap();
        }
        tx.send(InboundEvent::new(UserId(1), ChatId(1), "  ")).await.unwrap();
        drop(tx);

        let stats = accept.await.unwrap();
        assert_eq!(stats.accepted, 4);
        assert_eq!(stats.completed, 4);
        assert_eq!(transport.sent.lock().unwrap().len(), 3);
        for user in 1..=3 {
            assert_eq!(router.store().get(UserId(user)).len(), 2);
        }
    }

    #[tokio::test]
    async fn dispatch_pool_is_closed_after_drain() {
        let router = router(Arc::new(Notify::new()), Arc::new(Recorder::default()));
        let (tx, rx) = mpsc::channel(4);
        drop(tx);

        run_accept_loop(Arc::clone(&router), rx, CancellationToken::new()).await;

        let payload = RequestPayload::new(Turn::system("sys"), Vec::new(), Turn::user("late"));
        let err = router.dispatcher().invoke(payload).await.unwrap_err();
        assert!(matches!(err, ServiceError::PoolClosed));
        assert_eq!(router.dispatcher().in_flight(), 0);
    }

    #[tokio::test]
    async fn handler_panic_does_not_stop_the_loop() {
        let transport = Arc::new(Recorder::default());
        let router = router(Arc::new(Notify::new()), Arc::clone(&transport));
        let (tx, rx) = mpsc::channel(16);

        let accept = tokio::spawn(run_accept_loop(router, rx, CancellationToken::new()));

        tx.send(InboundEvent::new(UserId(13), ChatId(13), "/start"))
            .await
            .unwrap();
        tx.send(InboundEvent::new(UserId(2), ChatId(2), "/help"))
            .await
            .unwrap();
        drop(tx);

        let stats = accept.await.unwrap();
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.panicked, 1);
        assert_eq!(transport.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn shutdown_waits_for_in_flight_requests() {
        let release = Arc::new(Notify::new());
        let transport = Arc::new(Recorder::default());
        let router = router(Arc::clone(&release), Arc::clone(&transport));
        let (tx, rx) = mpsc::channel(16);
        let shutdown = CancellationToken::new();

        let accept = tokio::spawn(run_accept_loop(
            Arc::clone(&router),
            rx,
            shutdown.clone(),
        ));

        tx.send(InboundEvent::new(UserId(5), ChatId(5), "wait"))
            .await
            .unwrap();
        // Wait until the loop has taken the event off the channel.
        while tx.capacity() < tx.max_capacity() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        shutdown.cancel();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!accept.is_finished(), "loop must wait for the stalled request");

        release.notify_one();
        let stats = accept.await.unwrap();

        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(
            transport.sent.lock().unwrap().as_slice(),
            &[(ChatId(5), "echo wait".to_string())]
        );
        assert_eq!(router.store().get(UserId(5)).len(), 2);
    }
}
