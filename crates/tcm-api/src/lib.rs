//! Typed clients for the card marketplace backends.
//!
//! Two backends are consumed:
//!
//! - the **search API** (autocomplete, full search, sets, card detail,
//!   printings, health) through [`SearchClient`]
//! - the **account API** (login, email verification, password reset,
//!   registration) through [`AuthClient`]
//!
//! Both wrap payloads in the same `{ success, cached, error?, data }`
//! envelope. [`envelope::interpret`] turns a status code and raw body into a
//! [`Payload`] or an [`ApiError`] without doing any I/O, so callers and tests
//! can reason about responses independently of the network.
//!
//! # Example
//!
//! ```no_run
//! use tcm_api::{ApiSettings, SearchClient};
//!
//! async fn suggestions() -> tcm_api::Result<()> {
//!     let client = SearchClient::new(&ApiSettings::default())?;
//!     let payload = client.autocomplete("light").await?;
//!     for printing in payload.data {
//!         println!("{} ({})", printing.name, printing.set_code);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod config;
pub mod envelope;
pub mod error;
mod http;
#[allow(missing_docs)]
pub mod models;
pub mod search;

pub use auth::AuthClient;
pub use config::ApiSettings;
pub use envelope::{Payload, interpret, interpret_ack};
pub use error::{ApiError, Result};
pub use models::{
    AccountKind, Card, CardDetail, CardSet, HealthStatus, Pagination, Printing,
    RegistrationIdentity, RegistrationRequest, SearchPage, Session, SetDetail, SortKey,
};
pub use search::SearchClient;
