//! Wire models returned by the search and account backends.
//!
//! Optional fields default liberally: the search backend omits keys rather
//! than sending nulls for cards that lack them (tokens have no mana cost,
//! promo printings have no collector number, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One physical edition of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Printing {
    /// Printing identifier.
    pub id: String,
    /// Oracle identifier shared by every printing of the same card.
    pub oracle_id: String,
    /// Card name.
    pub name: String,
    /// Set code (e.g. `MH3`).
    #[serde(default)]
    pub set_code: String,
    /// Human readable set name.
    #[serde(default)]
    pub set_name: Option<String>,
    /// Collector number within the set.
    #[serde(default)]
    pub collector_number: Option<String>,
    /// Rarity label.
    #[serde(default)]
    pub rarity: Option<String>,
    /// Image URL for this printing.
    #[serde(default)]
    pub image_uri: Option<String>,
}

/// Card summary as listed in search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub oracle_id: String,
    pub name: String,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub image_uri: Option<String>,
    #[serde(default)]
    pub printings_count: Option<u32>,
}

/// Pagination block of a paged result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: u32,
}

impl Pagination {
    /// Whether a page after the current one exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// One page of full search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    pub pagination: Pagination,
    pub data: Vec<Card>,
}

/// Set summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSet {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub card_count: Option<u32>,
    #[serde(default)]
    pub icon_uri: Option<String>,
}

/// Set with its printings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDetail {
    #[serde(flatten)]
    pub set: CardSet,
    #[serde(default)]
    pub printings: Vec<Printing>,
}

/// Full card detail, optionally focused on one printing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetail {
    #[serde(flatten)]
    pub card: Card,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub printing: Option<Printing>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl HealthStatus {
    /// Whether the backend reports itself healthy.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self.status.to_ascii_lowercase().as_str(), "ok" | "healthy" | "up")
    }
}

/// Sort order accepted by `GET /api/search/results`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Relevance,
    NameAsc,
    NameDesc,
    ReleaseDesc,
    ReleaseAsc,
}

impl SortKey {
    /// All keys in display order.
    pub const ALL: [SortKey; 5] = [
        Self::Relevance,
        Self::NameAsc,
        Self::NameDesc,
        Self::ReleaseDesc,
        Self::ReleaseAsc,
    ];

    /// Value sent in the `sort` query parameter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::NameAsc => "name_asc",
            Self::NameDesc => "name_desc",
            Self::ReleaseDesc => "release_desc",
            Self::ReleaseAsc => "release_asc",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown sort key: {s}"))
    }
}

/// Authenticated session returned by login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

/// Account type submitted at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Personal,
    Business,
}

/// Identity block of a registration, matching the account kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegistrationIdentity {
    Personal {
        first_name: String,
        last_name: String,
    },
    Business {
        company_name: String,
        vat_number: String,
    },
}

/// Body of `POST /api/auth/register`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub country_code: String,
    pub phone_prefix: String,
    pub vat_prefix: String,
    pub account_type: AccountKind,
    pub identity: RegistrationIdentity,
    pub phone: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub accepted_terms: bool,
    pub accepted_privacy: bool,
    pub accepted_cancellation: bool,
    pub confirmed_adult: bool,
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("country_code", &self.country_code)
            .field("account_type", &self.account_type)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_round_trip_from_str() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
        assert!("newest".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_printing_tolerates_missing_optionals() {
        let printing: Printing = serde_json::from_str(
            r#"{"id": "p1", "oracle_id": "o1", "name": "Lightning Bolt"}"#,
        )
        .unwrap();
        assert_eq!(printing.set_code, "");
        assert!(printing.image_uri.is_none());
    }

    #[test]
    fn test_card_detail_flattens_card() {
        let detail: CardDetail = serde_json::from_str(
            r#"{"oracle_id": "o1", "name": "Counterspell", "oracle_text": "Counter target spell."}"#,
        )
        .unwrap();
        assert_eq!(detail.card.name, "Counterspell");
        assert_eq!(detail.oracle_text.as_deref(), Some("Counter target spell."));
    }

    #[test]
    fn test_pagination_has_next() {
        let page = Pagination {
            current_page: 1,
            per_page: 20,
            total: 45,
            total_pages: 3,
        };
        assert!(page.has_next());
    }

    #[test]
    fn test_registration_debug_redacts_password() {
        let request = RegistrationRequest {
            country_code: "IT".into(),
            phone_prefix: "+39".into(),
            vat_prefix: "IT".into(),
            account_type: AccountKind::Personal,
            identity: RegistrationIdentity::Personal {
                first_name: "Mario".into(),
                last_name: "Rossi".into(),
            },
            phone: "3331234567".into(),
            email: "mario@example.com".into(),
            username: "mario_r".into(),
            password: "Secret123".into(),
            accepted_terms: true,
            accepted_privacy: true,
            accepted_cancellation: true,
            confirmed_adult: true,
        };
        let debug = format!("{request:?}");
        assert!(!debug.contains("Secret123"));
        assert!(debug.contains("REDACTED"));
    }
}
