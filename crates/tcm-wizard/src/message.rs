//! Messages the wizard reacts to and effects it asks the caller to run.

use tcm_api::RegistrationRequest;

use crate::state::{AccountType, Consent, IdentityField};

/// Every input the registration wizard understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardMessage {
    // =========================================================================
    // Step 1
    // =========================================================================
    /// Country code; a supported code also fills both prefixes.
    SetCountry(String),
    SetPhonePrefix(String),
    SetVatPrefix(String),

    // =========================================================================
    // Step 2-3
    // =========================================================================
    /// Switching type discards the other type's identity fields.
    SetAccountType(AccountType),
    SetIdentity(IdentityField, String),

    // =========================================================================
    // Step 4
    // =========================================================================
    SetPhone(String),
    /// Also schedules an availability check for well-formed addresses.
    SetEmail(String),
    /// Availability answer for `email`; `None` when the check failed.
    EmailChecked {
        email: String,
        available: Option<bool>,
    },

    // =========================================================================
    // Step 5
    // =========================================================================
    SetUsername(String),
    SetPassword(String),
    SetPasswordConfirmation(String),
    SetConsent(Consent, bool),

    // =========================================================================
    // Navigation and lifecycle
    // =========================================================================
    /// Advance if the current step validates; submit from the last step.
    Next,
    /// Go back one step, keeping all data. No-op on the first step.
    Prev,
    /// Outcome of the registration call started by [`WizardEffect::Submit`].
    SubmitFinished(Result<(), String>),
    /// Discard everything, including the persisted snapshot.
    Reset,
}

/// Side effects requested by [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEffect {
    /// Check whether this email is still free.
    CheckEmail(String),
    /// Send the registration; answer with [`WizardMessage::SubmitFinished`].
    Submit(RegistrationRequest),
    /// Remove the persisted snapshot.
    ClearPersisted,
}
