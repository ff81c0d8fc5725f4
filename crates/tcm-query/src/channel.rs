//! One logical query channel: debounce, cancel, fetch, apply.
//!
//! ```text
//!            input (long enough)          quiet period over
//!   Idle ─────────────────────────▶ Pending(g) ─────────────▶ InFlight(g)
//!    ▲                                 │  ▲                      │
//!    │ input (too short)               │  └── input: g' = g+1 ───┤
//!    └─────────────────────────────────┴─────────────────────────┤
//!                                                                ▼
//!                                              completion(g) ─▶ Settled(g)
//! ```
//!
//! Every new input invalidates the previous ticket before entering
//! `Pending`, so a completion is applied only if its generation is still the
//! current one. Stale completions are dropped silently.

use std::sync::Arc;

use tcm_api::Payload;
use tokio::sync::mpsc;

use crate::canceller::{Fetch, RequestCanceller, RequestTicket};
use crate::config::QueryConfig;
use crate::debouncer::{InputOutcome, QueryDebouncer, QueryRequest};
use crate::result::QueryResult;
use crate::source::QuerySource;

/// Where the channel is in its request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelPhase {
    /// No request wanted.
    Idle,
    /// Input accepted; waiting for the quiet period under this generation.
    Pending(u64),
    /// Request for this generation is on the wire.
    InFlight(u64),
    /// The request for this generation has been applied.
    Settled(u64),
}

/// A finished fetch travelling back to its channel.
#[derive(Debug)]
pub struct Completion<T> {
    /// Generation of the ticket the fetch ran under.
    pub generation: u64,
    /// Term the fetch was issued for.
    pub term: String,
    /// Fetch outcome.
    pub outcome: tcm_api::Result<Payload<T>>,
}

/// Something observable happened on the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// A term was committed and its request started.
    Committed {
        /// The committed term.
        term: String,
        /// Ticket generation of the request.
        generation: u64,
    },
    /// A completion was applied to the visible result.
    Applied {
        /// The term the result belongs to.
        term: String,
        /// Ticket generation of the request.
        generation: u64,
    },
    /// A stale completion was ignored.
    Discarded {
        /// Ticket generation of the ignored request.
        generation: u64,
    },
}

/// A debounced, cancellable, cache-aware query channel over one source.
///
/// Single owner, single mutator: the owning task feeds input and polls
/// [`next_event`](Self::next_event). Fetches run on spawned tasks and report
/// back through an internal channel.
pub struct QueryChannel<S: QuerySource> {
    source: Arc<S>,
    debouncer: QueryDebouncer,
    canceller: RequestCanceller,
    ticket: Option<RequestTicket>,
    phase: ChannelPhase,
    result: QueryResult<S::Output>,
    term: Option<String>,
    completions_tx: mpsc::UnboundedSender<Completion<S::Output>>,
    completions_rx: mpsc::UnboundedReceiver<Completion<S::Output>>,
}

impl<S: QuerySource> QueryChannel<S> {
    /// Create an idle channel.
    pub fn new(source: S, config: QueryConfig) -> Self {
        Self::with_shared(Arc::new(source), config)
    }

    /// Create an idle channel over a source shared with other owners.
    pub fn with_shared(source: Arc<S>, config: QueryConfig) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            source,
            debouncer: QueryDebouncer::new(config),
            canceller: RequestCanceller::new(),
            ticket: None,
            phase: ChannelPhase::Idle,
            result: QueryResult::Idle,
            term: None,
            completions_tx,
            completions_rx,
        }
    }

    /// The source this channel fetches from.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> ChannelPhase {
        self.phase
    }

    /// What the view should show right now.
    pub fn result(&self) -> &QueryResult<S::Output> {
        &self.result
    }

    /// Term of the most recent commit.
    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    /// Feed the current raw input (e.g. after every keystroke).
    ///
    /// Short input clears the channel synchronously. Otherwise the previous
    /// ticket is invalidated and a commit is scheduled.
    pub fn input(&mut self, raw: &str) -> InputOutcome {
        match self.debouncer.input(raw) {
            InputOutcome::Cleared => {
                self.clear();
                InputOutcome::Cleared
            }
            InputOutcome::Scheduled => {
                let ticket = self.canceller.issue();
                self.phase = ChannelPhase::Pending(ticket.generation());
                self.ticket = Some(ticket);
                InputOutcome::Scheduled
            }
        }
    }

    /// Commit `term` immediately, bypassing the quiet period.
    ///
    /// Used for explicit actions such as pressing enter or changing page.
    pub fn submit(&mut self, term: &str) -> Option<ChannelEvent> {
        let term = term.trim();
        if !self.debouncer.config().accepts(term) {
            self.clear();
            return None;
        }
        self.debouncer.cancel();
        let ticket = self.canceller.issue();
        Some(self.dispatch(term.to_string(), ticket))
    }

    /// Re-submit the last committed term, e.g. after changing page or sort.
    pub fn refresh(&mut self) -> Option<ChannelEvent> {
        let term = self.term.clone()?;
        self.submit(&term)
    }

    /// Wait for the next commit or completion and apply it.
    ///
    /// Cancel-safe; pends forever on an idle channel.
    pub async fn next_event(&mut self) -> ChannelEvent {
        tokio::select! {
            request = self.debouncer.committed() => self.commit(request),
            Some(completion) = self.completions_rx.recv() => self.apply(completion),
        }
    }

    /// Apply a completion if it belongs to the current ticket.
    ///
    /// Returns [`ChannelEvent::Discarded`] without touching the visible
    /// result otherwise.
    pub fn apply(&mut self, completion: Completion<S::Output>) -> ChannelEvent {
        let generation = completion.generation;
        let in_flight = self.phase == ChannelPhase::InFlight(generation);
        if !in_flight || !self.canceller.is_current_generation(generation) {
            tracing::debug!(
                source = self.source.label(),
                generation,
                current = self.canceller.generation(),
                "discarding stale response"
            );
            return ChannelEvent::Discarded { generation };
        }

        match &completion.outcome {
            Ok(payload) => tracing::debug!(
                source = self.source.label(),
                generation,
                cached = payload.cached,
                "applying response"
            ),
            Err(err) => tracing::debug!(
                source = self.source.label(),
                generation,
                error = %err,
                "applying failure"
            ),
        }
        self.result = completion.outcome.into();
        self.phase = ChannelPhase::Settled(generation);
        self.ticket = None;
        ChannelEvent::Applied {
            term: completion.term,
            generation,
        }
    }

    /// Cancel everything and return to `Idle` (component teardown or reset).
    pub fn clear(&mut self) {
        self.debouncer.cancel();
        self.canceller.teardown();
        self.ticket = None;
        self.phase = ChannelPhase::Idle;
        self.result = QueryResult::Idle;
        self.term = None;
    }

    fn commit(&mut self, request: QueryRequest) -> ChannelEvent {
        let ticket = match self.ticket.take() {
            Some(ticket) if self.canceller.is_current(&ticket) => ticket,
            _ => self.canceller.issue(),
        };
        tracing::debug!(
            source = self.source.label(),
            term = %request.term,
            waited_ms = request.issued_at.elapsed().as_millis() as u64,
            "committing query"
        );
        self.dispatch(request.term, ticket)
    }

    fn dispatch(&mut self, term: String, ticket: RequestTicket) -> ChannelEvent {
        let generation = ticket.generation();
        self.phase = ChannelPhase::InFlight(generation);
        self.result = QueryResult::Loading;
        self.term = Some(term.clone());
        self.ticket = Some(ticket.clone());

        let source = Arc::clone(&self.source);
        let tx = self.completions_tx.clone();
        let task_term = term.clone();
        tokio::spawn(async move {
            match ticket.run(source.fetch(&task_term)).await {
                Fetch::Done(outcome) => {
                    // The receiver is gone once the channel is dropped.
                    let _ = tx.send(Completion {
                        generation,
                        term: task_term,
                        outcome,
                    });
                }
                Fetch::Cancelled => {
                    tracing::trace!(source = source.label(), generation, "request cancelled");
                }
            }
        });

        ChannelEvent::Committed { term, generation }
    }
}

impl<S: QuerySource> Drop for QueryChannel<S> {
    fn drop(&mut self) {
        self.debouncer.cancel();
        self.canceller.teardown();
    }
}
