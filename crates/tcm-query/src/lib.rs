//! Debounced, cancellable remote queries.
//!
//! A [`QueryChannel`] is the unit a view binds to: it debounces raw input
//! with a [`QueryDebouncer`], issues one request per committed term through
//! a [`QuerySource`], and uses a [`RequestCanceller`] so that only the
//! response to the most recently issued request ever reaches the visible
//! [`QueryResult`].
//!
//! # Example
//!
//! ```no_run
//! use tcm_api::{ApiSettings, SearchClient};
//! use tcm_query::{Autocomplete, QueryChannel, QueryConfig};
//!
//! async fn suggest(keystrokes: Vec<String>) -> tcm_api::Result<()> {
//!     let client = SearchClient::new(&ApiSettings::default())?;
//!     let mut channel = QueryChannel::new(Autocomplete::new(client), QueryConfig::autocomplete());
//!     for input in &keystrokes {
//!         channel.input(input);
//!     }
//!     loop {
//!         let event = channel.next_event().await;
//!         println!("{event:?} -> {:?}", channel.result());
//!     }
//! }
//! ```

#![warn(clippy::all)]

pub mod canceller;
pub mod channel;
pub mod config;
pub mod debouncer;
pub mod result;
pub mod source;

pub use canceller::{Fetch, RequestCanceller, RequestTicket};
pub use channel::{ChannelEvent, ChannelPhase, Completion, QueryChannel};
pub use config::{QueryConfig, QuerySettings};
pub use debouncer::{InputOutcome, QueryDebouncer, QueryRequest};
pub use result::QueryResult;
pub use source::{Autocomplete, EmailAvailability, FullSearch, QuerySource, SearchOptions};
