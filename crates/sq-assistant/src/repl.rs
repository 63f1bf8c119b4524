//! Interactive question loop: one line in, one reply line out.
//!
//! Generic over the reader and writer so tests drive it with in-memory
//! buffers. Only I/O errors end the session early; resolution failures are
//! already turned into replies by the `Resolver`.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use sq_protocol::Resolution;

use crate::pipeline::Resolver;

/// Per-session counters, logged when the session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub turns: usize,
    pub found: usize,
    pub not_found: usize,
    /// Turns where the classifier could not separate the top two intents.
    pub ambiguous: usize,
    pub errors: usize,
    /// `true` when the user typed the sentinel, `false` on end of input.
    pub ended_by_sentinel: bool,
}

impl SessionStats {
    fn record(&mut self, resolution: &Resolution) {
        self.turns += 1;
        match resolution {
            Resolution::Found(_) => self.found += 1,
            Resolution::NotFound { .. } => self.not_found += 1,
            Resolution::Ambiguous { .. } => self.ambiguous += 1,
            Resolution::Error { .. } => self.errors += 1,
        }
    }
}

/// Whether `line` is the session-ending sentinel (case-insensitive, trimmed).
pub fn is_sentinel(line: &str, sentinel: &str) -> bool {
    line.trim().to_lowercase() == sentinel.trim().to_lowercase()
}

/// Run the prompt/answer loop until the sentinel or end of input.
pub async fn run_session<R, W>(
    resolver: &Resolver,
    sentinel: &str,
    input: R,
    output: &mut W,
) -> std::io::Result<SessionStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let messages = resolver.messages();
    let prompt = messages.prompt(sentinel);
    let mut lines = input.lines();
    let mut stats = SessionStats::default();

    loop {
        output.write_all(prompt.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            output.write_all(b"\n").await?;
            break;
        };
        let utterance = line.trim();
        if utterance.is_empty() {
            continue;
        }
        if is_sentinel(utterance, sentinel) {
            output.write_all(messages.farewell().as_bytes()).await?;
            output.write_all(b"\n").await?;
            stats.ended_by_sentinel = true;
            break;
        }

        let outcome = resolver.resolve(utterance).await;
        stats.record(&outcome.resolution);
        output.write_all(outcome.response.as_bytes()).await?;
        output.write_all(b"\n").await?;
    }

    output.flush().await?;
    tracing::info!(
        turns = stats.turns,
        found = stats.found,
        not_found = stats.not_found,
        ambiguous = stats.ambiguous,
        errors = stats.errors,
        "session ended"
    );
    Ok(stats)
}
