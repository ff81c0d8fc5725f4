//! Per-step validation.
//!
//! Validators are pure: they read a [`WizardState`] and return the errors
//! that block advancing from a step. An empty map means the step is valid.

use std::sync::LazyLock;

use regex::Regex;

use crate::country;
use crate::state::{AccountType, Consent, Field, FieldErrors, IdentityFields, Step, WizardState};

/// Business VAT numbers: eleven digits, whatever the country.
static VAT_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{11}$").expect("Invalid VAT number regex"));

/// Phone characters: digits, spaces, `+`, parentheses, dashes and dots.
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9 +()\-.]+$").expect("Invalid phone regex"));

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("Invalid email regex")
});

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{3,20}$").expect("Invalid username regex"));

/// Minimum number of digits in a phone number.
pub const MIN_PHONE_DIGITS: usize = 10;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors blocking `step`.
pub fn validate_step(step: Step, state: &WizardState) -> FieldErrors {
    let mut errors = Errors::default();
    match step {
        Step::One => check_country(state, &mut errors),
        Step::Two => check_account_type(state, &mut errors),
        Step::Three => check_identity(state, &mut errors),
        Step::Four => check_contact(state, &mut errors),
        Step::Five => check_credentials(state, &mut errors),
    }
    errors.0
}

/// Whether `step` allows advancing.
pub fn step_is_valid(step: Step, state: &WizardState) -> bool {
    validate_step(step, state).is_empty()
}

/// Errors across every step, used before submitting.
///
/// Several steps may report on the same field; their messages are merged,
/// each distinct message kept once.
pub fn validate_all(state: &WizardState) -> FieldErrors {
    let mut all = FieldErrors::new();
    for step in Step::ALL {
        for (field, messages) in validate_step(step, state) {
            let merged = all.entry(field).or_default();
            for message in messages {
                if !merged.contains(&message) {
                    merged.push(message);
                }
            }
        }
    }
    all
}

/// Whether `value` is a well-formed business VAT number.
pub fn is_valid_vat_number(value: &str) -> bool {
    VAT_NUMBER_REGEX.is_match(value.trim())
}

/// Whether `value` looks like a phone number with enough digits.
pub fn is_valid_phone(value: &str) -> bool {
    let value = value.trim();
    PHONE_REGEX.is_match(value)
        && value.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
}

/// Whether `value` has the shape `local@domain.tld`.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value.trim())
}

/// Whether `value` is an acceptable username.
pub fn is_valid_username(value: &str) -> bool {
    USERNAME_REGEX.is_match(value.trim())
}

/// Password policy violations, empty when the password is acceptable.
pub fn password_issues(password: &str) -> Vec<&'static str> {
    let mut issues = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        issues.push("Password must be at least 8 characters long.");
    }
    if !password.chars().any(char::is_lowercase) {
        issues.push("Password must contain a lowercase letter.");
    }
    if !password.chars().any(char::is_uppercase) {
        issues.push("Password must contain an uppercase letter.");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        issues.push("Password must contain a digit.");
    }
    issues
}

#[derive(Default)]
struct Errors(FieldErrors);

impl Errors {
    fn push(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    fn require(&mut self, field: Field, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.push(field, message);
            false
        } else {
            true
        }
    }
}

fn check_country(state: &WizardState, errors: &mut Errors) {
    if errors.require(Field::Country, &state.country_code, "Select a country.")
        && !country::is_supported(&state.country_code)
    {
        errors.push(
            Field::Country,
            format!("Country '{}' is not supported.", state.country_code.trim()),
        );
    }
    errors.require(
        Field::PhonePrefix,
        &state.phone_prefix,
        "Phone prefix is required.",
    );
    errors.require(Field::VatPrefix, &state.vat_prefix, "VAT prefix is required.");
}

fn check_account_type(state: &WizardState, errors: &mut Errors) {
    if state.account_type == AccountType::Unset {
        errors.push(Field::AccountType, "Choose a personal or business account.");
    }
}

fn check_identity(state: &WizardState, errors: &mut Errors) {
    match &state.identity {
        IdentityFields::Personal {
            first_name,
            last_name,
        } if state.account_type == AccountType::Personal => {
            errors.require(Field::FirstName, first_name, "First name is required.");
            errors.require(Field::LastName, last_name, "Last name is required.");
        }
        IdentityFields::Business {
            company_name,
            vat_number,
        } if state.account_type == AccountType::Business => {
            errors.require(Field::CompanyName, company_name, "Company name is required.");
            if errors.require(Field::VatNumber, vat_number, "VAT number is required.")
                && !is_valid_vat_number(vat_number)
            {
                errors.push(Field::VatNumber, "VAT number must be exactly 11 digits.");
            }
        }
        _ => errors.push(Field::AccountType, "Choose a personal or business account."),
    }
}

fn check_contact(state: &WizardState, errors: &mut Errors) {
    if errors.require(Field::Phone, &state.phone, "Phone number is required.")
        && !is_valid_phone(&state.phone)
    {
        errors.push(
            Field::Phone,
            "Enter a valid phone number with at least 10 digits.",
        );
    }
    if errors.require(Field::Email, &state.email, "Email is required.")
        && !is_valid_email(&state.email)
    {
        errors.push(Field::Email, "Enter a valid email address.");
    }
}

fn check_credentials(state: &WizardState, errors: &mut Errors) {
    if errors.require(Field::Username, &state.username, "Username is required.")
        && !is_valid_username(&state.username)
    {
        errors.push(
            Field::Username,
            "Username must be 3-20 letters, digits or underscores.",
        );
    }
    if errors.require(Field::Password, &state.password, "Password is required.") {
        for issue in password_issues(&state.password) {
            errors.push(Field::Password, issue);
        }
    }
    if state.password_confirmation != state.password {
        errors.push(Field::PasswordConfirmation, "Passwords do not match.");
    }
    for consent in Consent::ALL {
        if !state.consents.get(consent) {
            errors.push(consent.field(), "This consent is required.");
        }
    }
}
