//! Whitelisted wizard snapshot and the adapter that stores it.
//!
//! Only country data, account type, identity fields and the step index
//! survive a restart. Contact details, credentials and consents are never
//! written.

use serde::{Deserialize, Serialize};

use crate::error::{PersistenceError, Result};
use crate::state::{AccountType, IdentityFields, Step, WizardState};
use crate::store::SnapshotStore;

/// Key the registration wizard is stored under.
pub const STORAGE_KEY: &str = "registration-wizard";

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// The durable subset of [`WizardState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedWizardSnapshot {
    pub version: u32,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub phone_prefix: String,
    #[serde(default)]
    pub vat_prefix: String,
    #[serde(default)]
    pub account_type: AccountType,
    #[serde(default)]
    pub identity: IdentityFields,
    #[serde(default)]
    pub step: Step,
}

impl PersistedWizardSnapshot {
    /// Take the whitelisted fields of `state`.
    pub fn capture(state: &WizardState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            country_code: state.country_code.clone(),
            phone_prefix: state.phone_prefix.clone(),
            vat_prefix: state.vat_prefix.clone(),
            account_type: state.account_type,
            identity: state.identity.clone(),
            step: state.step,
        }
    }

    /// A fresh state carrying the snapshot's fields.
    ///
    /// An identity that does not match the account type is replaced by an
    /// empty one of the right variant.
    pub fn into_state(self) -> WizardState {
        let identity = if self.identity.matches(self.account_type) {
            self.identity
        } else {
            IdentityFields::empty_for(self.account_type)
        };
        WizardState {
            step: self.step,
            country_code: self.country_code,
            phone_prefix: self.phone_prefix,
            vat_prefix: self.vat_prefix,
            account_type: self.account_type,
            identity,
            ..WizardState::default()
        }
    }

    /// Parse a stored document, rejecting other versions.
    pub fn from_json(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct VersionProbe {
            version: u32,
        }

        let probe: VersionProbe = serde_json::from_str(json)
            .map_err(|source| PersistenceError::Deserialization { source })?;
        if probe.version != SNAPSHOT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: probe.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        serde_json::from_str(json).map_err(|source| PersistenceError::Deserialization { source })
    }

    /// Serialize for storage.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|source| PersistenceError::Serialization { source })
    }
}

/// Reads and writes the wizard snapshot in a [`SnapshotStore`].
#[derive(Debug)]
pub struct PersistenceAdapter<S> {
    store: S,
    key: String,
}

impl<S: SnapshotStore> PersistenceAdapter<S> {
    /// Adapter using [`STORAGE_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored snapshot, `None` if nothing is stored.
    pub fn load(&self) -> Result<Option<PersistedWizardSnapshot>> {
        self.store
            .load(&self.key)?
            .map(|json| PersistedWizardSnapshot::from_json(&json))
            .transpose()
    }

    /// Initial state for a freshly mounted wizard.
    ///
    /// Missing, corrupt or incompatible data falls back to defaults.
    pub fn restore(&self) -> WizardState {
        match self.load() {
            Ok(Some(snapshot)) => {
                tracing::info!(
                    step = snapshot.step.number(),
                    "restored registration progress"
                );
                snapshot.into_state()
            }
            Ok(None) => WizardState::default(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "discarding saved registration progress");
                WizardState::default()
            }
        }
    }

    /// Write the whitelisted subset of `state`.
    pub fn persist(&self, state: &WizardState) -> Result<()> {
        let json = PersistedWizardSnapshot::capture(state).to_json()?;
        self.store.save(&self.key, &json)
    }

    /// Remove the stored snapshot.
    pub fn clear(&self) -> Result<()> {
        self.store.clear(&self.key)
    }
}
