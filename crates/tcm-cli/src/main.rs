//! Card marketplace command-line client.

use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};
use tcm_cli::logging::{LogConfig, init_logging};
use tcm_cli::settings::Settings;

mod cli;
mod commands;
mod interactive;
mod register;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let config_path = cli.config.clone().unwrap_or_else(Settings::config_path);
    let settings = Settings::load_from(&config_path).with_overrides(
        cli.search_url.clone(),
        cli.auth_url.clone(),
        cli.timeout,
    );
    tracing::debug!(
        search = %settings.api.search_base_url,
        auth = %settings.api.auth_base_url,
        "effective endpoints"
    );

    let exit_code = match commands::run(cli.command, &settings, &config_path).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Logging setup from the command line. An explicit `--log-level` or
/// `-v`/`-q` disables the `RUST_LOG` override.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let explicit = cli.verbosity.is_present() || cli.log_level.is_some();
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig {
        level_filter: cli
            .log_level
            .map_or_else(|| cli.verbosity.tracing_level_filter(), Into::into),
        use_env_filter: !explicit,
        with_ansi,
        format: cli.log_format.into(),
        log_file: cli.log_file.clone(),
        ..LogConfig::default()
    }
}
