//! Wizard state and the small types it is built from.
//!
//! [`WizardState`] is a plain value. It is never mutated in place by
//! callers; every change goes through [`crate::update`], which returns the
//! next state.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tcm_api::{AccountKind, RegistrationIdentity, RegistrationRequest};

// =============================================================================
// Step
// =============================================================================

/// Wizard step. Serialized as its 1-based number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum Step {
    /// Country, phone prefix and VAT prefix.
    #[default]
    One,
    /// Account type.
    Two,
    /// Identity (personal or business).
    Three,
    /// Contact details.
    Four,
    /// Credentials and consents.
    Five,
}

impl Step {
    /// All steps in order.
    pub const ALL: [Step; 5] = [Step::One, Step::Two, Step::Three, Step::Four, Step::Five];

    /// 1-based step number.
    pub const fn number(self) -> u8 {
        match self {
            Step::One => 1,
            Step::Two => 2,
            Step::Three => 3,
            Step::Four => 4,
            Step::Five => 5,
        }
    }

    /// Step for a 1-based number.
    pub const fn from_number(number: u8) -> Option<Step> {
        match number {
            1 => Some(Step::One),
            2 => Some(Step::Two),
            3 => Some(Step::Three),
            4 => Some(Step::Four),
            5 => Some(Step::Five),
            _ => None,
        }
    }

    /// The following step, `None` on the last one.
    pub const fn next(self) -> Option<Step> {
        Step::from_number(self.number() + 1)
    }

    /// The preceding step, `None` on the first one.
    pub const fn prev(self) -> Option<Step> {
        Step::from_number(self.number() - 1)
    }

    /// Whether this is the final step.
    pub const fn is_last(self) -> bool {
        matches!(self, Step::Five)
    }

    /// Short title for display.
    pub const fn title(self) -> &'static str {
        match self {
            Step::One => "Country",
            Step::Two => "Account type",
            Step::Three => "Identity",
            Step::Four => "Contact",
            Step::Five => "Account",
        }
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> u8 {
        step.number()
    }
}

impl TryFrom<u8> for Step {
    type Error = String;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Step::from_number(number).ok_or_else(|| format!("step must be 1-5, got {number}"))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5 {}", self.number(), self.title())
    }
}

// =============================================================================
// Account type and identity
// =============================================================================

/// Account type chosen on step 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Not chosen yet.
    #[default]
    Unset,
    /// Private individual.
    Personal,
    /// Company.
    Business,
}

impl AccountType {
    /// The wire kind, `None` while unset.
    pub const fn kind(self) -> Option<AccountKind> {
        match self {
            AccountType::Unset => None,
            AccountType::Personal => Some(AccountKind::Personal),
            AccountType::Business => Some(AccountKind::Business),
        }
    }
}

/// Identity fields; the variant always matches the account type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IdentityFields {
    /// No account type chosen.
    #[default]
    None,
    /// Private individual.
    Personal {
        /// Given name.
        first_name: String,
        /// Family name.
        last_name: String,
    },
    /// Company.
    Business {
        /// Registered company name.
        company_name: String,
        /// VAT number without the country prefix.
        vat_number: String,
    },
}

impl IdentityFields {
    /// Empty identity of the variant matching `account_type`.
    pub fn empty_for(account_type: AccountType) -> Self {
        match account_type {
            AccountType::Unset => IdentityFields::None,
            AccountType::Personal => IdentityFields::Personal {
                first_name: String::new(),
                last_name: String::new(),
            },
            AccountType::Business => IdentityFields::Business {
                company_name: String::new(),
                vat_number: String::new(),
            },
        }
    }

    /// Whether the variant belongs to `account_type`.
    pub fn matches(&self, account_type: AccountType) -> bool {
        matches!(
            (self, account_type),
            (IdentityFields::None, AccountType::Unset)
                | (IdentityFields::Personal { .. }, AccountType::Personal)
                | (IdentityFields::Business { .. }, AccountType::Business)
        )
    }

    fn to_registration(&self) -> Option<RegistrationIdentity> {
        match self {
            IdentityFields::None => None,
            IdentityFields::Personal {
                first_name,
                last_name,
            } => Some(RegistrationIdentity::Personal {
                first_name: first_name.trim().to_string(),
                last_name: last_name.trim().to_string(),
            }),
            IdentityFields::Business {
                company_name,
                vat_number,
            } => Some(RegistrationIdentity::Business {
                company_name: company_name.trim().to_string(),
                vat_number: vat_number.trim().to_string(),
            }),
        }
    }
}

/// Identity field a user can edit on step 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    /// Personal given name.
    FirstName,
    /// Personal family name.
    LastName,
    /// Business name.
    CompanyName,
    /// Business VAT number.
    VatNumber,
}

impl IdentityField {
    /// The error key for this field.
    pub const fn field(self) -> Field {
        match self {
            IdentityField::FirstName => Field::FirstName,
            IdentityField::LastName => Field::LastName,
            IdentityField::CompanyName => Field::CompanyName,
            IdentityField::VatNumber => Field::VatNumber,
        }
    }
}

// =============================================================================
// Consents
// =============================================================================

/// The four mandatory consents on step 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConsentFlags {
    /// Terms of service accepted.
    pub terms: bool,
    /// Privacy policy accepted.
    pub privacy: bool,
    /// Cancellation policy accepted.
    pub cancellation: bool,
    /// User confirms being of age.
    pub adult: bool,
}

impl ConsentFlags {
    /// Whether every consent is given.
    pub const fn all(&self) -> bool {
        self.terms && self.privacy && self.cancellation && self.adult
    }

    /// Read one flag.
    pub const fn get(&self, consent: Consent) -> bool {
        match consent {
            Consent::Terms => self.terms,
            Consent::Privacy => self.privacy,
            Consent::Cancellation => self.cancellation,
            Consent::Adult => self.adult,
        }
    }

    /// Set one flag.
    pub fn set(&mut self, consent: Consent, value: bool) {
        match consent {
            Consent::Terms => self.terms = value,
            Consent::Privacy => self.privacy = value,
            Consent::Cancellation => self.cancellation = value,
            Consent::Adult => self.adult = value,
        }
    }
}

/// One of the consent checkboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    Terms,
    Privacy,
    Cancellation,
    Adult,
}

impl Consent {
    /// All consents in display order.
    pub const ALL: [Consent; 4] = [
        Consent::Terms,
        Consent::Privacy,
        Consent::Cancellation,
        Consent::Adult,
    ];

    /// The error key for this consent.
    pub const fn field(self) -> Field {
        match self {
            Consent::Terms => Field::Terms,
            Consent::Privacy => Field::Privacy,
            Consent::Cancellation => Field::Cancellation,
            Consent::Adult => Field::Adult,
        }
    }

    /// Prompt text.
    pub const fn label(self) -> &'static str {
        match self {
            Consent::Terms => "I accept the terms of service",
            Consent::Privacy => "I accept the privacy policy",
            Consent::Cancellation => "I accept the cancellation policy",
            Consent::Adult => "I confirm I am at least 18 years old",
        }
    }
}

// =============================================================================
// Fields and errors
// =============================================================================

/// Key of a per-field error list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Country,
    PhonePrefix,
    VatPrefix,
    AccountType,
    FirstName,
    LastName,
    CompanyName,
    VatNumber,
    Phone,
    Email,
    Username,
    Password,
    PasswordConfirmation,
    Terms,
    Privacy,
    Cancellation,
    Adult,
}

impl Field {
    /// Stable snake_case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Field::Country => "country",
            Field::PhonePrefix => "phone_prefix",
            Field::VatPrefix => "vat_prefix",
            Field::AccountType => "account_type",
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::CompanyName => "company_name",
            Field::VatNumber => "vat_number",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::Username => "username",
            Field::Password => "password",
            Field::PasswordConfirmation => "password_confirmation",
            Field::Terms => "terms",
            Field::Privacy => "privacy",
            Field::Cancellation => "cancellation",
            Field::Adult => "adult",
        }
    }

    /// Step on which the field is edited.
    pub const fn step(self) -> Step {
        match self {
            Field::Country | Field::PhonePrefix | Field::VatPrefix => Step::One,
            Field::AccountType => Step::Two,
            Field::FirstName | Field::LastName | Field::CompanyName | Field::VatNumber => {
                Step::Three
            }
            Field::Phone | Field::Email => Step::Four,
            Field::Username
            | Field::Password
            | Field::PasswordConfirmation
            | Field::Terms
            | Field::Privacy
            | Field::Cancellation
            | Field::Adult => Step::Five,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field validation messages.
pub type FieldErrors = BTreeMap<Field, Vec<String>>;

/// Result of the asynchronous email uniqueness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailAvailability {
    /// Not checked for the current email.
    #[default]
    Unknown,
    /// A check is in flight.
    Checking,
    /// The backend reports the email as free.
    Available,
    /// Already registered.
    Taken,
}

// =============================================================================
// WizardState
// =============================================================================

/// Everything the registration wizard has collected so far.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct WizardState {
    pub step: Step,
    pub country_code: String,
    pub phone_prefix: String,
    pub vat_prefix: String,
    pub account_type: AccountType,
    pub identity: IdentityFields,
    pub phone: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub password_confirmation: String,
    pub consents: ConsentFlags,
    pub errors: FieldErrors,
    pub email_availability: EmailAvailability,
    pub submitting: bool,
    pub submit_error: Option<String>,
}

impl WizardState {
    /// Messages recorded for `field`.
    pub fn errors_for(&self, field: Field) -> &[String] {
        self.errors.get(&field).map_or(&[], Vec::as_slice)
    }

    /// Whether any field has an error.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Current text of an identity field, empty if the variant lacks it.
    pub fn identity_value(&self, field: IdentityField) -> &str {
        match (&self.identity, field) {
            (IdentityFields::Personal { first_name, .. }, IdentityField::FirstName) => first_name,
            (IdentityFields::Personal { last_name, .. }, IdentityField::LastName) => last_name,
            (IdentityFields::Business { company_name, .. }, IdentityField::CompanyName) => {
                company_name
            }
            (IdentityFields::Business { vat_number, .. }, IdentityField::VatNumber) => vat_number,
            _ => "",
        }
    }

    /// Build the registration body.
    ///
    /// `None` while the account type is unset or the identity does not match
    /// it; field validity is the validator's business.
    pub fn to_request(&self) -> Option<RegistrationRequest> {
        let account_type = self.account_type.kind()?;
        if !self.identity.matches(self.account_type) {
            return None;
        }
        Some(RegistrationRequest {
            country_code: self.country_code.trim().to_ascii_uppercase(),
            phone_prefix: self.phone_prefix.trim().to_string(),
            vat_prefix: self.vat_prefix.trim().to_string(),
            account_type,
            identity: self.identity.to_registration()?,
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            accepted_terms: self.consents.terms,
            accepted_privacy: self.consents.privacy,
            accepted_cancellation: self.consents.cancellation,
            confirmed_adult: self.consents.adult,
        })
    }
}

impl fmt::Debug for WizardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardState")
            .field("step", &self.step)
            .field("country_code", &self.country_code)
            .field("account_type", &self.account_type)
            .field("identity", &self.identity)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("consents", &self.consents)
            .field("errors", &self.errors)
            .field("submitting", &self.submitting)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_navigation_bounds() {
        assert_eq!(Step::One.prev(), None);
        assert_eq!(Step::One.next(), Some(Step::Two));
        assert_eq!(Step::Five.next(), None);
        assert!(Step::Five.is_last());
    }

    #[test]
    fn test_step_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Step::Three).unwrap(), "3");
        assert_eq!(serde_json::from_str::<Step>("4").unwrap(), Step::Four);
        assert!(serde_json::from_str::<Step>("9").is_err());
    }

    #[test]
    fn test_identity_matches_account_type() {
        assert!(IdentityFields::empty_for(AccountType::Business).matches(AccountType::Business));
        assert!(!IdentityFields::None.matches(AccountType::Personal));
    }

    #[test]
    fn test_identity_serialization_is_tagged() {
        let identity = IdentityFields::Personal {
            first_name: "Mario".into(),
            last_name: "Rossi".into(),
        };
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["kind"], "personal");
        assert_eq!(json["first_name"], "Mario");
    }

    #[test]
    fn test_request_needs_matching_identity() {
        let mut state = WizardState {
            account_type: AccountType::Personal,
            ..WizardState::default()
        };
        assert!(state.to_request().is_none());

        state.identity = IdentityFields::Personal {
            first_name: " Mario ".into(),
            last_name: "Rossi".into(),
        };
        state.country_code = "it".into();
        let request = state.to_request().unwrap();
        assert_eq!(request.country_code, "IT");
        assert_eq!(
            request.identity,
            RegistrationIdentity::Personal {
                first_name: "Mario".into(),
                last_name: "Rossi".into()
            }
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let state = WizardState {
            password: "Hunter22".into(),
            ..WizardState::default()
        };
        assert!(!format!("{state:?}").contains("Hunter22"));
    }
}
