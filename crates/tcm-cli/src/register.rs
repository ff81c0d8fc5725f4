//! Interactive registration wizard.

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::{Context, Result};
use tcm_api::AuthClient;
use tcm_cli::prompt::{Prompter, Reply};
use tcm_cli::settings::Settings;
use tcm_query::{
    ChannelEvent, EmailAvailability as EmailSource, QueryChannel, QueryResult,
};
use tcm_wizard::{
    AccountType, Consent, EmailAvailability, FileStore, IdentityField, RegistrationWizard,
    SnapshotStore, Step, WizardEffect, WizardMessage, WizardState, country,
};
use tokio::io::AsyncBufRead;

/// What the user chose while filling in a step.
enum Flow {
    Done,
    Back,
    Quit,
}

/// Unwrap a prompt reply inside a step function.
macro_rules! answer {
    ($reply:expr) => {
        match $reply {
            Reply::Value(value) => value,
            Reply::Back => return Ok(Flow::Back),
            Reply::Quit => return Ok(Flow::Quit),
        }
    };
}

pub async fn run_register(settings: &Settings, reset: bool) -> Result<i32> {
    let store = FileStore::new(Settings::data_dir());
    tracing::debug!("registration progress stored in {}", store.dir().display());

    let auth = AuthClient::new(&settings.api).context("create account client")?;
    let email_check = QueryChannel::new(EmailSource::new(auth.clone()), settings.query.email_check);
    let check_timeout = settings.api.timeout() + settings.query.email_check.debounce();

    let mut session = RegisterSession {
        wizard: RegistrationWizard::mount(store),
        auth,
        email_check,
        check_timeout,
        registered: false,
    };
    if reset {
        session.wizard.reset();
    } else if session.wizard.state().step != Step::One {
        println!(
            "Resuming saved registration at step {}.",
            session.wizard.state().step
        );
    }

    session.run(&mut Prompter::stdin()).await
}

struct RegisterSession<S: SnapshotStore> {
    wizard: RegistrationWizard<S>,
    auth: AuthClient,
    email_check: QueryChannel<EmailSource>,
    check_timeout: Duration,
    registered: bool,
}

impl<S: SnapshotStore> RegisterSession<S> {
    async fn run<R: AsyncBufRead + Unpin>(&mut self, prompter: &mut Prompter<R>) -> Result<i32> {
        println!("Type :back to return to the previous step, :quit to stop (progress is kept).");
        loop {
            let state = self.wizard.state().clone();
            println!();
            println!("Step {}", state.step);
            print_errors(&state);

            let flow = match state.step {
                Step::One => self.step_country(prompter, &state).await?,
                Step::Two => self.step_account_type(prompter, &state).await?,
                Step::Three => self.step_identity(prompter, &state).await?,
                Step::Four => self.step_contact(prompter, &state).await?,
                Step::Five => self.step_credentials(prompter, &state).await?,
            };

            match flow {
                Flow::Done => self.send(WizardMessage::Next).await,
                Flow::Back => self.send(WizardMessage::Prev).await,
                Flow::Quit => {
                    println!("Registration paused. Run `tcm register` to continue.");
                    return Ok(1);
                }
            }

            if self.registered {
                println!("Account created. Check your inbox to verify your email address.");
                return Ok(0);
            }
            if let Some(error) = &self.wizard.state().submit_error {
                eprintln!("error: {error}");
            }
        }
    }

    async fn step_country<R: AsyncBufRead + Unpin>(
        &mut self,
        prompter: &mut Prompter<R>,
        state: &WizardState,
    ) -> Result<Flow> {
        let codes: Vec<&str> = country::COUNTRIES.iter().map(|c| c.code).collect();
        println!("Supported countries: {}", codes.join(", "));

        let code = answer!(prompter.ask("Country code", &state.country_code).await?);
        self.send(WizardMessage::SetCountry(code)).await;

        let current = self.wizard.state().clone();
        let phone_prefix = answer!(prompter.ask("Phone prefix", &current.phone_prefix).await?);
        self.send(WizardMessage::SetPhonePrefix(phone_prefix)).await;
        let vat_prefix = answer!(prompter.ask("VAT prefix", &current.vat_prefix).await?);
        self.send(WizardMessage::SetVatPrefix(vat_prefix)).await;
        Ok(Flow::Done)
    }

    async fn step_account_type<R: AsyncBufRead + Unpin>(
        &mut self,
        prompter: &mut Prompter<R>,
        state: &WizardState,
    ) -> Result<Flow> {
        let current = match state.account_type {
            AccountType::Unset => "",
            AccountType::Personal => "personal",
            AccountType::Business => "business",
        };
        let account_type = loop {
            let answer = answer!(prompter.ask("Account type (personal/business)", current).await?);
            match answer.to_ascii_lowercase().as_str() {
                "personal" | "p" => break AccountType::Personal,
                "business" | "b" => break AccountType::Business,
                "" => break AccountType::Unset,
                _ => println!("Please answer personal or business."),
            }
        };
        self.send(WizardMessage::SetAccountType(account_type)).await;
        Ok(Flow::Done)
    }

    async fn step_identity<R: AsyncBufRead + Unpin>(
        &mut self,
        prompter: &mut Prompter<R>,
        state: &WizardState,
    ) -> Result<Flow> {
        let fields: &[(IdentityField, &str)] = match state.account_type {
            AccountType::Personal => &[
                (IdentityField::FirstName, "First name"),
                (IdentityField::LastName, "Last name"),
            ],
            AccountType::Business => &[
                (IdentityField::CompanyName, "Company name"),
                (IdentityField::VatNumber, "VAT number (11 digits)"),
            ],
            AccountType::Unset => return Ok(Flow::Back),
        };
        for &(field, label) in fields {
            let value = answer!(prompter.ask(label, state.identity_value(field)).await?);
            self.send(WizardMessage::SetIdentity(field, value)).await;
        }
        Ok(Flow::Done)
    }

    async fn step_contact<R: AsyncBufRead + Unpin>(
        &mut self,
        prompter: &mut Prompter<R>,
        state: &WizardState,
    ) -> Result<Flow> {
        let phone = answer!(prompter.ask("Phone number", &state.phone).await?);
        self.send(WizardMessage::SetPhone(phone)).await;

        let email = answer!(prompter.ask("Email", &state.email).await?);
        if email != state.email || state.email_availability == EmailAvailability::Unknown {
            self.send(WizardMessage::SetEmail(email)).await;
        }
        match self.wizard.state().email_availability {
            EmailAvailability::Taken => {
                println!("Note: this email is already registered; you may want to log in instead.");
            }
            EmailAvailability::Available => println!("Email is available."),
            EmailAvailability::Unknown | EmailAvailability::Checking => {}
        }
        Ok(Flow::Done)
    }

    async fn step_credentials<R: AsyncBufRead + Unpin>(
        &mut self,
        prompter: &mut Prompter<R>,
        state: &WizardState,
    ) -> Result<Flow> {
        let username = answer!(prompter.ask("Username", &state.username).await?);
        self.send(WizardMessage::SetUsername(username)).await;

        println!("Passwords are echoed; make sure nobody is watching.");
        let password = answer!(prompter.ask_secret("Password", &state.password).await?);
        self.send(WizardMessage::SetPassword(password)).await;
        let current = self.wizard.state().password_confirmation.clone();
        let confirmation = answer!(prompter.ask_secret("Repeat password", &current).await?);
        self.send(WizardMessage::SetPasswordConfirmation(confirmation))
            .await;

        for consent in Consent::ALL {
            let value =
                answer!(prompter.ask_yes_no(consent.label(), state.consents.get(consent)).await?);
            self.send(WizardMessage::SetConsent(consent, value)).await;
        }
        Ok(Flow::Done)
    }

    /// Dispatch `message` and run the effects it produces until none remain.
    async fn send(&mut self, message: WizardMessage) {
        let mut queue = VecDeque::from([message]);
        while let Some(message) = queue.pop_front() {
            for effect in self.wizard.dispatch(message) {
                match effect {
                    WizardEffect::CheckEmail(email) => {
                        queue.push_back(self.check_email(email).await);
                    }
                    WizardEffect::Submit(request) => {
                        println!("Creating account...");
                        let outcome = self
                            .auth
                            .register(&request)
                            .await
                            .map_err(|e| e.user_message());
                        self.registered = outcome.is_ok();
                        queue.push_back(WizardMessage::SubmitFinished(outcome));
                    }
                    WizardEffect::ClearPersisted => {}
                }
            }
        }
    }

    /// Run the email through the debounced availability channel.
    async fn check_email(&mut self, email: String) -> WizardMessage {
        self.email_check.input(&email);
        let channel = &mut self.email_check;
        let settled = tokio::time::timeout(self.check_timeout, async {
            loop {
                if let ChannelEvent::Applied { .. } = channel.next_event().await {
                    break;
                }
            }
        })
        .await;

        if settled.is_err() {
            tracing::warn!("email availability check timed out");
            self.email_check.clear();
            return WizardMessage::EmailChecked {
                email,
                available: None,
            };
        }

        let available = match self.email_check.result() {
            QueryResult::Success { data, .. } => Some(*data),
            QueryResult::Failure(message) => {
                tracing::warn!(%message, "email availability check failed");
                None
            }
            QueryResult::Idle | QueryResult::Loading => None,
        };
        WizardMessage::EmailChecked { email, available }
    }
}

fn print_errors(state: &WizardState) {
    for (field, messages) in &state.errors {
        for message in messages {
            eprintln!("  {field}: {message}");
        }
    }
}
