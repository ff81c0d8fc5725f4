//! Supersede-and-ignore cancellation for one logical query channel.
//!
//! Every request is issued with a [`RequestTicket`]. Issuing a new ticket
//! cancels the previous one. Completions must check
//! [`RequestCanceller::is_current`] before touching state, so only the
//! response to the most recently issued request is ever applied, whatever
//! order the network resolves them in.

use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Outcome of running a future under a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch<T> {
    /// The future finished before the ticket was cancelled.
    Done(T),
    /// The ticket was superseded or torn down first. Not an error.
    Cancelled,
}

impl<T> Fetch<T> {
    /// The finished value, if any.
    pub fn done(self) -> Option<T> {
        match self {
            Self::Done(value) => Some(value),
            Self::Cancelled => None,
        }
    }
}

/// Handle for one issued request.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    generation: u64,
    token: CancellationToken,
}

impl RequestTicket {
    /// Monotonic generation number within the owning canceller.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether this ticket has been superseded or torn down.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Race `fut` against cancellation of this ticket.
    ///
    /// A future that is already cancelled when polled is never started.
    pub async fn run<F>(&self, fut: F) -> Fetch<F::Output>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            () = self.token.cancelled() => Fetch::Cancelled,
            value = fut => Fetch::Done(value),
        }
    }
}

/// Issues tickets for one channel and remembers which one is current.
#[derive(Debug, Default)]
pub struct RequestCanceller {
    generation: u64,
    current: Option<CancellationToken>,
}

impl RequestCanceller {
    /// Create a canceller with nothing outstanding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel whatever is outstanding and issue a fresh ticket.
    pub fn issue(&mut self) -> RequestTicket {
        if let Some(previous) = self.current.take() {
            previous.cancel();
        }
        self.generation += 1;
        let token = CancellationToken::new();
        self.current = Some(token.clone());
        tracing::trace!(generation = self.generation, "issued request ticket");
        RequestTicket {
            generation: self.generation,
            token,
        }
    }

    /// Whether `ticket` is the most recently issued, still-live ticket.
    #[must_use]
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.is_current_generation(ticket.generation) && !ticket.is_cancelled()
    }

    /// Generation-only form of [`is_current`](Self::is_current), for
    /// completions that travel without their token.
    #[must_use]
    pub fn is_current_generation(&self, generation: u64) -> bool {
        self.current.is_some() && generation == self.generation
    }

    /// Latest generation issued so far (0 before the first ticket).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Cancel and forget the outstanding ticket, if any.
    pub fn teardown(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }
}

impl Drop for RequestCanceller {
    fn drop(&mut self) {
        self.teardown();
    }
}
