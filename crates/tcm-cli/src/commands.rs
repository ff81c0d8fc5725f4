use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tcm_api::{ApiError, AuthClient, SearchClient, SearchPage};
use tcm_cli::prompt::{Prompter, Reply};
use tcm_cli::render::{
    cache_note, card_lines, pagination_line, printings_table, search_table, sets_table,
};
use tcm_cli::settings::Settings;
use tcm_query::{ChannelEvent, FullSearch, QueryChannel, QueryResult, SearchOptions};

use crate::cli::{AutocompleteArgs, Command, SearchArgs};
use crate::interactive::run_autocomplete;
use crate::register::run_register;

/// Run one subcommand and return the process exit code.
pub async fn run(command: Command, settings: &Settings, config_path: &Path) -> Result<i32> {
    match command {
        Command::Health => run_health(settings).await,
        Command::Autocomplete(args) => run_autocomplete_command(args, settings).await,
        Command::Search(args) => run_search(args, settings).await,
        Command::Sets => {
            let payload = search_client(settings)?.sets().await.map_err(api_error)?;
            println!("{}", sets_table(&payload.data));
            println!("{} sets{}", payload.data.len(), cache_note(payload.cached));
            Ok(0)
        }
        Command::Set { code } => {
            let payload = search_client(settings)?
                .set(&code)
                .await
                .map_err(api_error)?;
            let detail = payload.data;
            println!(
                "{} ({}){}",
                detail.set.name,
                detail.set.code.to_uppercase(),
                cache_note(payload.cached)
            );
            if let Some(released) = &detail.set.release_date {
                println!("Released {released}");
            }
            println!("{}", printings_table(&detail.printings));
            Ok(0)
        }
        Command::Card {
            oracle_id,
            printing,
        } => {
            let payload = search_client(settings)?
                .card(&oracle_id, printing.as_deref())
                .await
                .map_err(api_error)?;
            for line in card_lines(&payload.data) {
                println!("{line}");
            }
            Ok(0)
        }
        Command::Printings {
            oracle_id,
            from_search,
        } => {
            let client = search_client(settings)?;
            let payload = if from_search {
                client.by_oracle_id(&oracle_id).await
            } else {
                client.printings(&oracle_id).await
            }
            .map_err(api_error)?;
            println!("{}", printings_table(&payload.data));
            println!(
                "{} printings{}",
                payload.data.len(),
                cache_note(payload.cached)
            );
            Ok(0)
        }
        Command::Login { email } => run_login(&email, settings).await,
        Command::SendVerification { email } => {
            auth_client(settings)?
                .send_verification_email(&email)
                .await
                .map_err(api_error)?;
            println!("Verification code sent to {email}.");
            Ok(0)
        }
        Command::VerifyEmail { email, code } => {
            auth_client(settings)?
                .verify_email(&email, &code)
                .await
                .map_err(api_error)?;
            println!("Email {email} verified.");
            Ok(0)
        }
        Command::ResetPassword { email } => {
            auth_client(settings)?
                .request_password_reset(&email)
                .await
                .map_err(api_error)?;
            println!("If {email} belongs to an account, a reset link is on its way.");
            Ok(0)
        }
        Command::ResendVerification { email } => {
            auth_client(settings)?
                .resend_verification(&email)
                .await
                .map_err(api_error)?;
            println!("Verification email sent again to {email}.");
            Ok(0)
        }
        Command::Register { reset } => run_register(settings, reset).await,
        Command::Config { write } => run_config(settings, config_path, write),
    }
}

async fn run_health(settings: &Settings) -> Result<i32> {
    let health = search_client(settings)?
        .health()
        .await
        .map_err(api_error)?;
    match &health.version {
        Some(version) => println!("{} (version {version})", health.status),
        None => println!("{}", health.status),
    }
    Ok(if health.is_ok() { 0 } else { 1 })
}

async fn run_autocomplete_command(args: AutocompleteArgs, settings: &Settings) -> Result<i32> {
    let client = search_client(settings)?;
    if args.interactive {
        return run_autocomplete(client, settings.query.autocomplete).await;
    }

    let term = args.term.unwrap_or_default();
    let term = term.trim();
    if !settings.query.autocomplete.accepts(term) {
        tracing::debug!(term, "term too short, not querying");
        println!("No suggestions for \"{term}\"");
        return Ok(0);
    }
    let payload = client.autocomplete(term).await.map_err(api_error)?;
    if payload.data.is_empty() {
        println!("No suggestions for \"{term}\"{}", cache_note(payload.cached));
    } else {
        println!("{}", printings_table(&payload.data));
        println!(
            "{} suggestions{}",
            payload.data.len(),
            cache_note(payload.cached)
        );
    }
    Ok(0)
}

async fn run_search(args: SearchArgs, settings: &Settings) -> Result<i32> {
    let client = search_client(settings)?;
    let (page, cached) = if args.oracle_ids.is_empty() {
        let term = args.term.unwrap_or_default();
        let options = SearchOptions {
            page: args.page.max(1),
            sort: args.sort.into(),
        };
        search_through_channel(client, options, &term, settings).await?
    } else {
        let payload = client
            .by_oracle_ids_paginated(&args.oracle_ids, args.page)
            .await
            .map_err(api_error)?;
        (payload.data, payload.cached)
    };

    if page.data.is_empty() {
        println!("No cards found{}", cache_note(cached));
        return Ok(0);
    }
    println!("{}", search_table(&page));
    println!("{}{}", pagination_line(&page.pagination), cache_note(cached));
    Ok(0)
}

/// Run one full search through a query channel and wait for its result.
async fn search_through_channel(
    client: SearchClient,
    options: SearchOptions,
    term: &str,
    settings: &Settings,
) -> Result<(SearchPage, bool)> {
    let config = settings.query.search;
    let mut channel = QueryChannel::new(FullSearch::new(client, options), config);
    if channel.submit(term).is_none() {
        return Err(anyhow!(
            "search term must be at least {} characters",
            config.min_length.max(1)
        ));
    }

    tokio::time::timeout(settings.api.timeout() + config.debounce(), async {
        loop {
            if let ChannelEvent::Applied { .. } = channel.next_event().await {
                break;
            }
        }
    })
    .await
    .map_err(|_| api_error(ApiError::Timeout))?;

    match channel.result() {
        QueryResult::Success { data, cached } => Ok((data.clone(), *cached)),
        QueryResult::Failure(message) => Err(anyhow!(message.clone())),
        QueryResult::Idle | QueryResult::Loading => Err(anyhow!("search did not complete")),
    }
}

async fn run_login(email: &str, settings: &Settings) -> Result<i32> {
    let client = auth_client(settings)?;
    let mut prompter = Prompter::stdin();
    let password = match prompter
        .ask_secret("Password", "")
        .await
        .context("read password")?
    {
        Reply::Value(password) if !password.is_empty() => password,
        _ => return Err(anyhow!("a password is required")),
    };

    let session = client.login(email, &password).await.map_err(api_error)?;
    println!("Logged in as {}", session.username.as_deref().unwrap_or(email));
    println!("User ID:  {}", session.user_id);
    if let Some(expires_at) = &session.expires_at {
        println!("Expires:  {expires_at}");
    }
    if !session.email_verified {
        println!("Email not verified yet; run `tcm send-verification {email}`.");
    }
    Ok(0)
}

fn run_config(settings: &Settings, config_path: &Path, write: bool) -> Result<i32> {
    let rendered = settings.to_toml().map_err(|e| anyhow!(e))?;
    println!("# {}", config_path.display());
    print!("{rendered}");
    if write {
        settings.save_to(config_path).map_err(|e| anyhow!(e))?;
        eprintln!("Settings written to {}", config_path.display());
    }
    Ok(0)
}

fn search_client(settings: &Settings) -> Result<SearchClient> {
    SearchClient::new(&settings.api).context("create search client")
}

fn auth_client(settings: &Settings) -> Result<AuthClient> {
    AuthClient::new(&settings.api).context("create account client")
}

/// Turn an API failure into a message fit for the terminal.
fn api_error(error: ApiError) -> anyhow::Error {
    tracing::debug!(error = ?error, "request failed");
    anyhow!(error.user_message())
}
