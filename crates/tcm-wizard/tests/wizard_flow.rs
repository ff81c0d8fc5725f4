//! End-to-end walks through the reducer.

use tcm_api::{AccountKind, RegistrationIdentity};
use tcm_wizard::{
    AccountType, Consent, Field, IdentityField, IdentityFields, MemoryStore, RegistrationWizard,
    Step, WizardEffect, WizardMessage, WizardState, update,
};

fn run(state: WizardState, messages: Vec<WizardMessage>) -> (WizardState, Vec<WizardEffect>) {
    messages
        .into_iter()
        .fold((state, Vec::new()), |(state, mut effects), message| {
            let (state, new) = update(state, message);
            effects.extend(new);
            (state, effects)
        })
}

fn complete_business_form() -> Vec<WizardMessage> {
    vec![
        WizardMessage::SetCountry("IT".into()),
        WizardMessage::Next,
        WizardMessage::SetAccountType(AccountType::Business),
        WizardMessage::Next,
        WizardMessage::SetIdentity(IdentityField::CompanyName, "Carte Rare Srl".into()),
        WizardMessage::SetIdentity(IdentityField::VatNumber, "01234567890".into()),
        WizardMessage::Next,
        WizardMessage::SetPhone("+39 333 123 4567".into()),
        WizardMessage::SetEmail("shop@carterare.it".into()),
        WizardMessage::Next,
        WizardMessage::SetUsername("carte_rare".into()),
        WizardMessage::SetPassword("Abcdefg1".into()),
        WizardMessage::SetPasswordConfirmation("Abcdefg1".into()),
        WizardMessage::SetConsent(Consent::Terms, true),
        WizardMessage::SetConsent(Consent::Privacy, true),
        WizardMessage::SetConsent(Consent::Cancellation, true),
        WizardMessage::SetConsent(Consent::Adult, true),
        WizardMessage::Next,
    ]
}

#[test]
fn empty_country_blocks_first_step() {
    let (state, _) = update(WizardState::default(), WizardMessage::Next);
    assert_eq!(state.step, Step::One);
    assert!(!state.errors_for(Field::Country).is_empty());
}

#[test]
fn switching_to_business_drops_personal_names() {
    let (state, _) = run(
        WizardState::default(),
        vec![
            WizardMessage::SetAccountType(AccountType::Personal),
            WizardMessage::SetIdentity(IdentityField::FirstName, "Mario".into()),
            WizardMessage::SetIdentity(IdentityField::LastName, "Rossi".into()),
            WizardMessage::SetAccountType(AccountType::Business),
        ],
    );
    assert!(matches!(state.identity, IdentityFields::Business { .. }));
    assert_eq!(state.identity_value(IdentityField::FirstName), "");
    assert_eq!(state.identity_value(IdentityField::LastName), "");
    assert_eq!(state.identity_value(IdentityField::CompanyName), "");
}

#[test]
fn weak_password_blocks_final_step() {
    let mut messages = complete_business_form();
    let position = messages
        .iter()
        .position(|m| matches!(m, WizardMessage::SetPassword(_)))
        .unwrap();
    messages[position] = WizardMessage::SetPassword("abcdefgh".into());
    messages[position + 1] = WizardMessage::SetPasswordConfirmation("abcdefgh".into());

    let (state, effects) = run(WizardState::default(), messages);
    assert_eq!(state.step, Step::Five);
    assert!(!state.errors_for(Field::Password).is_empty());
    assert!(effects.iter().all(|e| !matches!(e, WizardEffect::Submit(_))));
}

#[test]
fn complete_form_submits_registration() {
    let (state, effects) = run(WizardState::default(), complete_business_form());
    assert!(state.submitting);
    assert!(!state.has_errors());

    let request = effects
        .iter()
        .find_map(|e| match e {
            WizardEffect::Submit(request) => Some(request),
            _ => None,
        })
        .expect("submit effect");
    assert_eq!(request.country_code, "IT");
    assert_eq!(request.vat_prefix, "IT");
    assert_eq!(request.account_type, AccountKind::Business);
    assert_eq!(
        request.identity,
        RegistrationIdentity::Business {
            company_name: "Carte Rare Srl".into(),
            vat_number: "01234567890".into(),
        }
    );
    assert!(request.accepted_terms && request.confirmed_adult);
    assert!(effects.contains(&WizardEffect::CheckEmail("shop@carterare.it".into())));

    // A second Next while the call is running does nothing.
    let (again, effects) = update(state.clone(), WizardMessage::Next);
    assert_eq!(again, state);
    assert!(effects.is_empty());
}

#[test]
fn successful_submission_resets_and_clears_storage() {
    let store = std::sync::Arc::new(MemoryStore::new());
    let mut wizard = RegistrationWizard::mount(std::sync::Arc::clone(&store));

    let mut submitted = false;
    for message in complete_business_form() {
        let effects = wizard.dispatch(message);
        submitted |= effects
            .iter()
            .any(|e| matches!(e, WizardEffect::Submit(_)));
    }
    assert!(submitted);
    assert!(store.contains(tcm_wizard::STORAGE_KEY));

    wizard.dispatch(WizardMessage::SubmitFinished(Ok(())));
    assert_eq!(wizard.state(), &WizardState::default());
    assert!(!store.contains(tcm_wizard::STORAGE_KEY));
}

#[test]
fn rejected_submission_can_be_retried() {
    let (state, _) = run(WizardState::default(), complete_business_form());
    let (state, _) = update(
        state,
        WizardMessage::SubmitFinished(Err("Username already taken".into())),
    );
    assert_eq!(state.submit_error.as_deref(), Some("Username already taken"));
    assert_eq!(state.step, Step::Five);

    let (state, _) = update(state, WizardMessage::SetUsername("carte_rare_2".into()));
    assert_eq!(state.submit_error, None);
    let (state, effects) = update(state, WizardMessage::Next);
    assert!(state.submitting);
    assert!(matches!(effects.as_slice(), [WizardEffect::Submit(r)] if r.username == "carte_rare_2"));
}
