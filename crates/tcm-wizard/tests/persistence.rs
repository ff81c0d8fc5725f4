//! Snapshot persistence through a real file store.

use tcm_wizard::{
    AccountType, Consent, FileStore, IdentityField, PersistedWizardSnapshot, PersistenceAdapter,
    RegistrationWizard, STORAGE_KEY, SnapshotStore, Step, WizardMessage,
};
use tempfile::tempdir;

fn fill_personal_until_step3(wizard: &mut RegistrationWizard<FileStore>) {
    for message in [
        WizardMessage::SetCountry("IT".into()),
        WizardMessage::Next,
        WizardMessage::SetAccountType(AccountType::Personal),
        WizardMessage::Next,
        WizardMessage::SetIdentity(IdentityField::FirstName, "Mario".into()),
        WizardMessage::SetIdentity(IdentityField::LastName, "Rossi".into()),
        // Data that must never reach the disk.
        WizardMessage::SetPhone("+39 333 123 4567".into()),
        WizardMessage::SetEmail("mario@example.it".into()),
        WizardMessage::SetPassword("Abcdefg1".into()),
        WizardMessage::SetPasswordConfirmation("Abcdefg1".into()),
        WizardMessage::SetConsent(Consent::Terms, true),
    ] {
        wizard.dispatch(message);
    }
}

#[test]
fn reload_restores_only_whitelisted_fields() {
    let dir = tempdir().unwrap();

    let mut wizard = RegistrationWizard::mount(FileStore::new(dir.path()));
    fill_personal_until_step3(&mut wizard);
    assert_eq!(wizard.state().step, Step::Three);
    drop(wizard);

    let restored = RegistrationWizard::mount(FileStore::new(dir.path()));
    let state = restored.state();
    assert_eq!(state.country_code, "IT");
    assert_eq!(state.phone_prefix, "+39");
    assert_eq!(state.vat_prefix, "IT");
    assert_eq!(state.account_type, AccountType::Personal);
    assert_eq!(state.identity_value(IdentityField::FirstName), "Mario");
    assert_eq!(state.step, Step::Three);

    assert_eq!(state.password, "");
    assert_eq!(state.password_confirmation, "");
    assert_eq!(state.phone, "");
    assert_eq!(state.email, "");
    assert!(!state.consents.terms);
}

#[test]
fn stored_file_never_contains_secrets() {
    let dir = tempdir().unwrap();
    let mut wizard = RegistrationWizard::mount(FileStore::new(dir.path()));
    fill_personal_until_step3(&mut wizard);

    let raw = std::fs::read_to_string(dir.path().join("registration-wizard.json")).unwrap();
    assert!(!raw.contains("Abcdefg1"));
    assert!(!raw.contains("mario@example.it"));
    assert!(!raw.contains("333"));
}

#[test]
fn snapshot_format_is_stable() {
    let dir = tempdir().unwrap();
    let mut wizard = RegistrationWizard::mount(FileStore::new(dir.path()));
    fill_personal_until_step3(&mut wizard);

    let snapshot = wizard.persistence().load().unwrap().unwrap();
    insta::assert_json_snapshot!(snapshot, @r#"
    {
      "version": 1,
      "country_code": "IT",
      "phone_prefix": "+39",
      "vat_prefix": "IT",
      "account_type": "personal",
      "identity": {
        "kind": "personal",
        "first_name": "Mario",
        "last_name": "Rossi"
      },
      "step": 3
    }
    "#);
}

#[test]
fn corrupt_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path());
    store.save(STORAGE_KEY, "]]garbage").unwrap();

    let wizard = RegistrationWizard::mount(store);
    assert_eq!(wizard.state().step, Step::One);
    assert_eq!(wizard.state().country_code, "");
}

#[test]
fn reset_deletes_the_file() {
    let dir = tempdir().unwrap();
    let mut wizard = RegistrationWizard::mount(FileStore::new(dir.path()));
    fill_personal_until_step3(&mut wizard);
    let path = dir.path().join("registration-wizard.json");
    assert!(path.exists());

    wizard.reset();
    assert!(!path.exists());
    assert_eq!(
        PersistenceAdapter::new(FileStore::new(dir.path()))
            .load()
            .unwrap(),
        None::<PersistedWizardSnapshot>
    );
}
