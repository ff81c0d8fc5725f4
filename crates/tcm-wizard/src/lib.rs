//! Registration wizard state machine.
//!
//! The wizard collects a new account over five steps. Its state is a plain
//! value changed only through the [`update`] reducer, which validates the
//! current step before advancing and asks the caller to run side effects
//! (email availability checks, the registration call) instead of performing
//! I/O itself.
//!
//! # Architecture
//!
//! - `state` - [`WizardState`] and the field, step and consent types
//! - `validate` - pure per-step validators
//! - `message` / `update` - messages, effects and the reducer
//! - `store` - [`SnapshotStore`] with file and in-memory backends
//! - `snapshot` - the whitelisted, versioned [`PersistedWizardSnapshot`]
//! - `wizard` - [`RegistrationWizard`], which ties the reducer to storage
//!
//! # Example
//!
//! ```
//! use tcm_wizard::{MemoryStore, RegistrationWizard, Step, WizardMessage};
//!
//! let mut wizard = RegistrationWizard::mount(MemoryStore::new());
//! wizard.dispatch(WizardMessage::SetCountry("IT".into()));
//! wizard.dispatch(WizardMessage::Next);
//! assert_eq!(wizard.state().step, Step::Two);
//! assert_eq!(wizard.state().phone_prefix, "+39");
//! ```

pub mod country;
mod error;
mod message;
mod snapshot;
mod state;
mod store;
mod update;
pub mod validate;
mod wizard;

pub use error::{PersistenceError, Result};
pub use message::{WizardEffect, WizardMessage};
pub use snapshot::{PersistedWizardSnapshot, PersistenceAdapter, SNAPSHOT_VERSION, STORAGE_KEY};
pub use state::{
    AccountType, Consent, ConsentFlags, EmailAvailability, Field, FieldErrors, IdentityField,
    IdentityFields, Step, WizardState,
};
pub use store::{FileStore, MemoryStore, SnapshotStore};
pub use update::update;
pub use validate::{step_is_valid, validate_step};
pub use wizard::RegistrationWizard;
