//! Client for the card search API.

use crate::config::ApiSettings;
use crate::envelope::Payload;
use crate::error::{ApiError, Result};
use crate::http::Transport;
use crate::models::{CardDetail, CardSet, HealthStatus, Printing, SearchPage, SetDetail, SortKey};

/// Async client for the card search backend.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct SearchClient {
    transport: Transport,
}

impl SearchClient {
    /// Creates a client for `settings.search_base_url`.
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(&settings.search_base_url, settings)?,
        })
    }

    /// Printings whose name starts with or contains `term`.
    pub async fn autocomplete(&self, term: &str) -> Result<Payload<Vec<Printing>>> {
        let url = self.transport.url(
            &["api", "search", "autocomplete"],
            &[("term", term.to_string())],
        )?;
        self.transport.get(url).await
    }

    /// One page of full search results.
    pub async fn search(&self, term: &str, page: u32, sort: SortKey) -> Result<Payload<SearchPage>> {
        let url = self.transport.url(
            &["api", "search", "results"],
            &[
                ("term", term.to_string()),
                ("page", page.max(1).to_string()),
                ("sort", sort.as_str().to_string()),
            ],
        )?;
        self.transport.get(url).await
    }

    /// Every known set.
    pub async fn sets(&self) -> Result<Payload<Vec<CardSet>>> {
        let url = self.transport.url(&["api", "sets"], &[])?;
        self.transport.get(url).await
    }

    /// One set and its printings.
    pub async fn set(&self, code: &str) -> Result<Payload<SetDetail>> {
        let code = non_empty("set code", code)?;
        let url = self.transport.url(&["api", "set", code], &[])?;
        self.transport.get(url).await
    }

    /// Card detail, optionally focused on one printing.
    pub async fn card(
        &self,
        oracle_id: &str,
        printing_id: Option<&str>,
    ) -> Result<Payload<CardDetail>> {
        let oracle_id = non_empty("oracle id", oracle_id)?;
        let query: Vec<(&str, String)> = printing_id
            .map(|id| vec![("printing_id", id.to_string())])
            .unwrap_or_default();
        let url = self.transport.url(&["api", "card", oracle_id], &query)?;
        self.transport.get(url).await
    }

    /// Every printing of a card.
    pub async fn printings(&self, oracle_id: &str) -> Result<Payload<Vec<Printing>>> {
        let oracle_id = non_empty("oracle id", oracle_id)?;
        let url = self
            .transport
            .url(&["api", "card", oracle_id, "printings"], &[])?;
        self.transport.get(url).await
    }

    /// Printings for a single oracle id through the search index.
    pub async fn by_oracle_id(&self, oracle_id: &str) -> Result<Payload<Vec<Printing>>> {
        let oracle_id = non_empty("oracle id", oracle_id)?;
        let url = self.transport.url(
            &["api", "search", "by-oracle-id"],
            &[("oracle_id", oracle_id.to_string())],
        )?;
        self.transport.get(url).await
    }

    /// Cards for several oracle ids, paginated.
    pub async fn by_oracle_ids_paginated(
        &self,
        oracle_ids: &[String],
        page: u32,
    ) -> Result<Payload<SearchPage>> {
        if oracle_ids.is_empty() {
            return Err(ApiError::InvalidRequest(
                "at least one oracle id is required".to_string(),
            ));
        }
        let url = self.transport.url(
            &["api", "search", "by-oracle-ids-paginated"],
            &[
                ("oracle_ids", oracle_ids.join(",")),
                ("page", page.max(1).to_string()),
            ],
        )?;
        self.transport.get(url).await
    }

    /// Backend liveness probe. Not enveloped.
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.transport.url(&["health"], &[])?;
        self.transport.get_plain(url).await
    }
}

fn non_empty<'a>(what: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ApiError::InvalidRequest(format!("{what} must not be empty")))
    } else {
        Ok(trimmed)
    }
}
