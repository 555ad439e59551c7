//! Long-poll loop feeding Telegram updates into the relay's inbound channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use chatrelay_types::transport::InboundEvent;

use super::client::TelegramClient;

/// Pause after a failed `getUpdates` before polling again.
const ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Poll `getUpdates` until `shutdown` fires or the inbound channel closes.
///
/// Each update is acknowledged (the offset advances past it) whether or not
/// it carries a usable text message. Returns the number of events forwarded.
pub async fn run_poller(
    client: Arc<TelegramClient>,
    inbound: mpsc::Sender<InboundEvent>,
    poll_timeout_secs: u64,
    shutdown: CancellationToken,
) -> u64 {
    let mut offset: i64 = 0;
    let mut forwarded: u64 = 0;

    tracing::info!(poll_timeout_secs, "telegram poller started");

    loop {
        let polled = tokio::select! {
            _ = shutdown.cancelled() => break,
            polled = client.get_updates(offset, poll_timeout_secs) => polled,
        };

        let updates = match polled {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!(error = %e, "getUpdates failed, retrying");
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = tokio::time::sleep(ERROR_BACKOFF) => continue,
                }
            }
        };

        for update in updates {
            let update_id = update.update_id;
            offset = offset.max(update_id + 1);
            let Some(event) = update.into_event() else {
                tracing::trace!(update_id, "skipping non-text update");
                continue;
            };
            if inbound.send(event).await.is_err() {
                tracing::info!(forwarded, "inbound channel closed, poller stopping");
                return forwarded;
            }
            forwarded += 1;
        }
    }

    tracing::info!(forwarded, "telegram poller stopped");
    forwarded
}
