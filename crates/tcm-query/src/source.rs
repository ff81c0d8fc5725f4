//! Remote sources a query channel can fetch from.

use std::sync::RwLock;

use async_trait::async_trait;
use tcm_api::{AuthClient, Payload, Printing, SearchClient, SearchPage, SortKey};

/// One kind of remote lookup keyed by a search term.
///
/// Implementations must not touch shared UI state; the channel decides
/// whether a result is still wanted.
#[async_trait]
pub trait QuerySource: Send + Sync + 'static {
    /// Decoded payload type.
    type Output: Send + 'static;

    /// Short label used in logs.
    fn label(&self) -> &'static str;

    /// Perform the lookup.
    async fn fetch(&self, term: &str) -> tcm_api::Result<Payload<Self::Output>>;
}

/// Search-bar suggestions.
#[derive(Debug, Clone)]
pub struct Autocomplete {
    client: SearchClient,
}

impl Autocomplete {
    pub fn new(client: SearchClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuerySource for Autocomplete {
    type Output = Vec<Printing>;

    fn label(&self) -> &'static str {
        "autocomplete"
    }

    async fn fetch(&self, term: &str) -> tcm_api::Result<Payload<Vec<Printing>>> {
        self.client.autocomplete(term).await
    }
}

/// Page and ordering of a full search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub page: u32,
    pub sort: SortKey,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            page: 1,
            sort: SortKey::default(),
        }
    }
}

/// Full result pages.
///
/// Page and sort live behind a lock so the owning view can change them and
/// re-submit the current term without rebuilding the channel.
#[derive(Debug)]
pub struct FullSearch {
    client: SearchClient,
    options: RwLock<SearchOptions>,
}

impl FullSearch {
    pub fn new(client: SearchClient, options: SearchOptions) -> Self {
        Self {
            client,
            options: RwLock::new(options),
        }
    }

    /// Current page and sort.
    pub fn options(&self) -> SearchOptions {
        match self.options.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Replace page and sort for subsequent fetches.
    pub fn set_options(&self, options: SearchOptions) {
        match self.options.write() {
            Ok(mut guard) => *guard = options,
            Err(poisoned) => *poisoned.into_inner() = options,
        }
    }
}

#[async_trait]
impl QuerySource for FullSearch {
    type Output = SearchPage;

    fn label(&self) -> &'static str {
        "search"
    }

    async fn fetch(&self, term: &str) -> tcm_api::Result<Payload<SearchPage>> {
        let options = self.options();
        self.client.search(term, options.page, options.sort).await
    }
}

/// Registration-form check that an email address is still free.
#[derive(Debug, Clone)]
pub struct EmailAvailability {
    client: AuthClient,
}

impl EmailAvailability {
    pub fn new(client: AuthClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuerySource for EmailAvailability {
    type Output = bool;

    fn label(&self) -> &'static str {
        "email-availability"
    }

    async fn fetch(&self, term: &str) -> tcm_api::Result<Payload<bool>> {
        self.client.check_email_available(term).await
    }
}
