//! Local console transport: stdin lines in, replies on stdout.
//!
//! The whole session is one user in one chat, so `/reset` and history
//! behave exactly as they do for a Telegram user.

use std::io::Write;
use std::sync::Mutex;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use chatrelay_core::transport::Transport;
use chatrelay_types::chat::{ChatId, UserId};
use chatrelay_types::error::TransportError;
use chatrelay_types::transport::InboundEvent;

/// Identity of the single console user.
pub const CONSOLE_USER: UserId = UserId(0);
pub const CONSOLE_CHAT: ChatId = ChatId(0);

/// Prints each outbound message as a styled block.
pub struct ConsoleTransport<W> {
    out: Mutex<W>,
}

impl ConsoleTransport<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleTransport<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl<W: Write + Send> Transport for ConsoleTransport<W> {
    async fn send(&self, _chat: ChatId, text: &str) -> Result<(), TransportError> {
        let mut out = self.out.lock().map_err(|_| TransportError::Closed)?;
        writeln!(out, "\n{} {}\n", console::style("bot>").cyan().bold(), text)
            .and_then(|()| out.flush())
            .map_err(TransportError::Io)
    }
}

/// Forward each non-empty line of `reader` as an event from the console user.
///
/// Returns the number of lines forwarded once the reader hits EOF, the
/// channel closes, or `shutdown` fires.
pub async fn forward_lines<R>(
    reader: R,
    inbound: mpsc::Sender<InboundEvent>,
    shutdown: CancellationToken,
) -> u64
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut forwarded = 0;

    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => break,
            line = lines.next_line() => line,
        };

        let text = match line {
            Ok(Some(text)) => text,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read console input");
                break;
            }
        };

        if text.trim().is_empty() {
            continue;
        }

        if inbound
            .send(InboundEvent::new(CONSOLE_USER, CONSOLE_CHAT, text))
            .await
            .is_err()
        {
            break;
        }
        forwarded += 1;
    }

    forwarded
}
