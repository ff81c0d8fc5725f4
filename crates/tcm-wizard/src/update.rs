//! The wizard reducer.

use crate::country;
use crate::message::{WizardEffect, WizardMessage};
use crate::state::{
    AccountType, EmailAvailability, Field, IdentityField, IdentityFields, Step, WizardState,
};
use crate::validate;

/// Apply `message` to `state`, returning the next state and the effects the
/// caller must run.
///
/// Never panics and never fails: blocked transitions record per-field errors
/// and leave the step where it was.
pub fn update(mut state: WizardState, message: WizardMessage) -> (WizardState, Vec<WizardEffect>) {
    let mut effects = Vec::new();

    match message {
        WizardMessage::SetCountry(code) => {
            let code = code.trim().to_ascii_uppercase();
            if let Some(country) = country::find(&code) {
                state.phone_prefix = country.phone_prefix.to_string();
                state.vat_prefix = country.vat_prefix.to_string();
                state.errors.remove(&Field::PhonePrefix);
                state.errors.remove(&Field::VatPrefix);
            }
            state.country_code = code;
            edited(&mut state, &[Field::Country]);
        }
        WizardMessage::SetPhonePrefix(prefix) => {
            state.phone_prefix = prefix;
            edited(&mut state, &[Field::PhonePrefix]);
        }
        WizardMessage::SetVatPrefix(prefix) => {
            state.vat_prefix = prefix;
            edited(&mut state, &[Field::VatPrefix]);
        }
        WizardMessage::SetAccountType(account_type) => {
            if account_type != state.account_type {
                state.account_type = account_type;
                state.identity = IdentityFields::empty_for(account_type);
            }
            edited(
                &mut state,
                &[
                    Field::AccountType,
                    Field::FirstName,
                    Field::LastName,
                    Field::CompanyName,
                    Field::VatNumber,
                ],
            );
        }
        WizardMessage::SetIdentity(field, value) => {
            if set_identity(&mut state.identity, field, value) {
                edited(&mut state, &[field.field()]);
            } else {
                tracing::debug!(
                    ?field,
                    account_type = ?state.account_type,
                    "ignoring identity field for other account type"
                );
            }
        }
        WizardMessage::SetPhone(phone) => {
            state.phone = phone;
            edited(&mut state, &[Field::Phone]);
        }
        WizardMessage::SetEmail(email) => {
            state.email = email;
            edited(&mut state, &[Field::Email]);
            let email = state.email.trim();
            if validate::is_valid_email(email) {
                state.email_availability = EmailAvailability::Checking;
                effects.push(WizardEffect::CheckEmail(email.to_string()));
            } else {
                state.email_availability = EmailAvailability::Unknown;
            }
        }
        WizardMessage::EmailChecked { email, available } => {
            if email == state.email.trim() {
                state.email_availability = match available {
                    Some(true) => EmailAvailability::Available,
                    Some(false) => EmailAvailability::Taken,
                    None => EmailAvailability::Unknown,
                };
            } else {
                tracing::debug!("ignoring availability answer for a previous email");
            }
        }
        WizardMessage::SetUsername(username) => {
            state.username = username;
            edited(&mut state, &[Field::Username]);
        }
        WizardMessage::SetPassword(password) => {
            state.password = password;
            edited(&mut state, &[Field::Password, Field::PasswordConfirmation]);
        }
        WizardMessage::SetPasswordConfirmation(confirmation) => {
            state.password_confirmation = confirmation;
            edited(&mut state, &[Field::PasswordConfirmation]);
        }
        WizardMessage::SetConsent(consent, value) => {
            state.consents.set(consent, value);
            edited(&mut state, &[consent.field()]);
        }
        WizardMessage::Next => next(&mut state, &mut effects),
        WizardMessage::Prev => {
            if let Some(prev) = state.step.prev() {
                state.step = prev;
            }
        }
        WizardMessage::SubmitFinished(Ok(())) => {
            tracing::info!("registration accepted, resetting wizard");
            state = WizardState::default();
            effects.push(WizardEffect::ClearPersisted);
        }
        WizardMessage::SubmitFinished(Err(message)) => {
            tracing::warn!(%message, "registration rejected");
            state.submitting = false;
            state.submit_error = Some(message);
        }
        WizardMessage::Reset => {
            state = WizardState::default();
            effects.push(WizardEffect::ClearPersisted);
        }
    }

    (state, effects)
}

fn next(state: &mut WizardState, effects: &mut Vec<WizardEffect>) {
    if state.submitting {
        return;
    }

    let step = state.step;
    state.errors.retain(|field, _| field.step() != step);
    let errors = validate::validate_step(step, state);
    if !errors.is_empty() {
        tracing::debug!(step = step.number(), fields = errors.len(), "step blocked");
        state.errors.extend(errors);
        return;
    }

    if let Some(following) = step.next() {
        state.step = following;
        return;
    }

    // Earlier steps may be incomplete after a restore.
    let errors = validate::validate_all(state);
    if let Some(first) = errors.keys().map(|field| field.step()).min() {
        tracing::debug!(step = first.number(), "earlier step incomplete");
        state.step = first;
        state.errors = errors;
        return;
    }

    match state.to_request() {
        Some(request) => {
            tracing::info!(username = %request.username, "submitting registration");
            state.submitting = true;
            state.submit_error = None;
            effects.push(WizardEffect::Submit(request));
        }
        None => {
            state.step = Step::Two;
            state
                .errors
                .entry(Field::AccountType)
                .or_default()
                .push("Choose a personal or business account.".to_string());
        }
    }
}

/// Drop errors of the edited fields and any stale submission failure.
fn edited(state: &mut WizardState, fields: &[Field]) {
    for field in fields {
        state.errors.remove(field);
    }
    state.submit_error = None;
}

fn set_identity(identity: &mut IdentityFields, field: IdentityField, value: String) -> bool {
    let slot = match (identity, field) {
        (IdentityFields::Personal { first_name, .. }, IdentityField::FirstName) => first_name,
        (IdentityFields::Personal { last_name, .. }, IdentityField::LastName) => last_name,
        (IdentityFields::Business { company_name, .. }, IdentityField::CompanyName) => {
            company_name
        }
        (IdentityFields::Business { vat_number, .. }, IdentityField::VatNumber) => vat_number,
        _ => return false,
    };
    *slot = value;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Consent;

    fn apply(state: WizardState, messages: Vec<WizardMessage>) -> WizardState {
        messages
            .into_iter()
            .fold(state, |state, message| update(state, message).0)
    }

    #[test]
    fn test_next_from_empty_step1_is_blocked() {
        let (state, effects) = update(WizardState::default(), WizardMessage::Next);
        assert_eq!(state.step, Step::One);
        assert!(!state.errors_for(Field::Country).is_empty());
        assert!(effects.is_empty());
    }

    #[test]
    fn test_country_fills_prefixes_and_advances() {
        let state = apply(
            WizardState::default(),
            vec![WizardMessage::SetCountry("it".into()), WizardMessage::Next],
        );
        assert_eq!(state.country_code, "IT");
        assert_eq!(state.phone_prefix, "+39");
        assert_eq!(state.vat_prefix, "IT");
        assert_eq!(state.step, Step::Two);
    }

    #[test]
    fn test_editing_clears_that_fields_errors_only() {
        let (state, _) = update(WizardState::default(), WizardMessage::Next);
        let (state, _) = update(state, WizardMessage::SetVatPrefix("IT".into()));
        assert!(state.errors_for(Field::VatPrefix).is_empty());
        assert!(!state.errors_for(Field::Country).is_empty());
        assert!(!state.errors_for(Field::PhonePrefix).is_empty());
    }

    #[test]
    fn test_switching_account_type_clears_identity() {
        let state = apply(
            WizardState::default(),
            vec![
                WizardMessage::SetAccountType(AccountType::Personal),
                WizardMessage::SetIdentity(IdentityField::FirstName, "Mario".into()),
                WizardMessage::SetAccountType(AccountType::Business),
            ],
        );
        assert_eq!(
            state.identity,
            IdentityFields::Business {
                company_name: String::new(),
                vat_number: String::new(),
            }
        );
        assert_eq!(state.identity_value(IdentityField::FirstName), "");
    }

    #[test]
    fn test_reselecting_same_account_type_keeps_identity() {
        let state = apply(
            WizardState::default(),
            vec![
                WizardMessage::SetAccountType(AccountType::Personal),
                WizardMessage::SetIdentity(IdentityField::FirstName, "Mario".into()),
                WizardMessage::SetAccountType(AccountType::Personal),
            ],
        );
        assert_eq!(state.identity_value(IdentityField::FirstName), "Mario");
    }

    #[test]
    fn test_identity_field_of_other_variant_is_ignored() {
        let state = apply(
            WizardState::default(),
            vec![
                WizardMessage::SetAccountType(AccountType::Personal),
                WizardMessage::SetIdentity(IdentityField::VatNumber, "12345678901".into()),
            ],
        );
        assert!(state.identity.matches(AccountType::Personal));
        assert_eq!(state.identity_value(IdentityField::VatNumber), "");
    }

    #[test]
    fn test_prev_keeps_data_and_stops_at_step1() {
        let state = apply(
            WizardState::default(),
            vec![
                WizardMessage::SetCountry("FR".into()),
                WizardMessage::Next,
                WizardMessage::Prev,
                WizardMessage::Prev,
            ],
        );
        assert_eq!(state.step, Step::One);
        assert_eq!(state.country_code, "FR");
    }

    #[test]
    fn test_email_edit_requests_availability_check() {
        let (state, effects) = update(
            WizardState::default(),
            WizardMessage::SetEmail(" mario@example.it ".into()),
        );
        assert_eq!(state.email_availability, EmailAvailability::Checking);
        assert_eq!(
            effects,
            vec![WizardEffect::CheckEmail("mario@example.it".into())]
        );

        let (state, effects) = update(state, WizardMessage::SetEmail("mario@".into()));
        assert_eq!(state.email_availability, EmailAvailability::Unknown);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_stale_availability_answer_is_ignored() {
        let state = apply(
            WizardState::default(),
            vec![
                WizardMessage::SetEmail("old@example.it".into()),
                WizardMessage::SetEmail("new@example.it".into()),
                WizardMessage::EmailChecked {
                    email: "old@example.it".into(),
                    available: Some(false),
                },
            ],
        );
        assert_eq!(state.email_availability, EmailAvailability::Checking);

        let (state, _) = update(
            state,
            WizardMessage::EmailChecked {
                email: "new@example.it".into(),
                available: Some(false),
            },
        );
        assert_eq!(state.email_availability, EmailAvailability::Taken);
    }

    #[test]
    fn test_taken_email_does_not_block_step4() {
        let state = WizardState {
            step: Step::Four,
            phone: "333 123 4567".into(),
            email: "mario@example.it".into(),
            email_availability: EmailAvailability::Taken,
            ..WizardState::default()
        };
        let (state, _) = update(state, WizardMessage::Next);
        assert_eq!(state.step, Step::Five);
    }

    #[test]
    fn test_submit_from_step5_with_missing_earlier_data_goes_back() {
        let state = apply(
            WizardState {
                step: Step::Five,
                ..WizardState::default()
            },
            vec![
                WizardMessage::SetUsername("mario".into()),
                WizardMessage::SetPassword("Abcdefg1".into()),
                WizardMessage::SetPasswordConfirmation("Abcdefg1".into()),
                WizardMessage::SetConsent(Consent::Terms, true),
                WizardMessage::SetConsent(Consent::Privacy, true),
                WizardMessage::SetConsent(Consent::Cancellation, true),
                WizardMessage::SetConsent(Consent::Adult, true),
                WizardMessage::Next,
            ],
        );
        assert_eq!(state.step, Step::One);
        assert!(!state.submitting);
        assert!(!state.errors_for(Field::Country).is_empty());
    }

    #[test]
    fn test_failed_submission_keeps_data() {
        let state = WizardState {
            step: Step::Five,
            username: "mario".into(),
            submitting: true,
            ..WizardState::default()
        };
        let (state, effects) = update(state, WizardMessage::SubmitFinished(Err("Taken".into())));
        assert!(!state.submitting);
        assert_eq!(state.submit_error.as_deref(), Some("Taken"));
        assert_eq!(state.username, "mario");
        assert!(effects.is_empty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let state = WizardState {
            step: Step::Three,
            country_code: "IT".into(),
            ..WizardState::default()
        };
        let (state, effects) = update(state, WizardMessage::Reset);
        assert_eq!(state, WizardState::default());
        assert_eq!(effects, vec![WizardEffect::ClearPersisted]);
    }
}
