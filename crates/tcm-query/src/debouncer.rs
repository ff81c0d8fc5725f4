//! Input debouncing.

use tokio::time::{Instant, sleep_until};

use crate::config::QueryConfig;

/// A committed query: the term that stayed stable for the quiet period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// Trimmed search term.
    pub term: String,
    /// When the input that produced this term arrived.
    pub issued_at: Instant,
}

/// What happened to one piece of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// The term was empty or too short; any pending commit was dropped.
    Cleared,
    /// The term will be committed once input stays quiet.
    Scheduled,
}

#[derive(Debug)]
struct Pending {
    term: String,
    issued_at: Instant,
    deadline: Instant,
}

/// Delays a commit until input has been stable for `debounce_ms`.
///
/// Dropping the debouncer (or calling [`cancel`](Self::cancel)) discards a
/// pending term without emitting it.
#[derive(Debug)]
pub struct QueryDebouncer {
    config: QueryConfig,
    pending: Option<Pending>,
}

impl QueryDebouncer {
    /// Create an idle debouncer.
    #[must_use]
    pub fn new(config: QueryConfig) -> Self {
        Self {
            config,
            pending: None,
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> QueryConfig {
        self.config
    }

    /// Feed the current raw input.
    ///
    /// Short input clears synchronously; anything else (re)starts the quiet
    /// period with this term replacing whatever was pending.
    pub fn input(&mut self, raw: &str) -> InputOutcome {
        let term = raw.trim();
        if !self.config.accepts(term) {
            self.pending = None;
            return InputOutcome::Cleared;
        }

        let now = Instant::now();
        self.pending = Some(Pending {
            term: term.to_string(),
            issued_at: now,
            deadline: now + self.config.debounce(),
        });
        InputOutcome::Scheduled
    }

    /// Whether a term is waiting for its quiet period to end.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Discard any pending term.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Resolve with the pending term once its quiet period has passed.
    ///
    /// Pends forever while nothing is scheduled. Cancel-safe: dropping the
    /// future keeps the pending term, so it can sit in a `tokio::select!`
    /// next to the input source.
    pub async fn committed(&mut self) -> QueryRequest {
        loop {
            let Some(deadline) = self.pending.as_ref().map(|p| p.deadline) else {
                std::future::pending::<()>().await;
                continue;
            };
            sleep_until(deadline).await;
            if let Some(pending) = self.pending.take() {
                return QueryRequest {
                    term: pending.term,
                    issued_at: pending.issued_at,
                };
            }
        }
    }
}
