//! CLI argument definitions for the card marketplace client.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tcm_api::SortKey;
use tcm_cli::logging::LogFormat;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "tcm",
    version,
    about = "Card marketplace client - search cards, manage your account",
    long_about = "Search the card catalogue and manage a marketplace account.\n\n\
                  Settings are read from settings.toml in the platform config directory;\n\
                  run `tcm config` to see the effective values and the file location."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Read settings from this file instead of the default location.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Override the search API base URL.
    #[arg(long = "search-url", value_name = "URL", global = true)]
    pub search_url: Option<String>,

    /// Override the account API base URL.
    #[arg(long = "auth-url", value_name = "URL", global = true)]
    pub auth_url: Option<String>,

    /// Override the request timeout in seconds.
    #[arg(long = "timeout", value_name = "SECS", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check that the search backend is up.
    Health,

    /// Suggest card names for a partial term.
    Autocomplete(AutocompleteArgs),

    /// Full-text card search with paging and sorting.
    Search(SearchArgs),

    /// List all card sets.
    Sets,

    /// Show one set and its printings.
    Set {
        /// Set code, e.g. `neo`.
        code: String,
    },

    /// Show a card, optionally a specific printing of it.
    Card {
        /// Oracle ID of the card.
        oracle_id: String,

        /// Printing ID to show instead of the default printing.
        #[arg(long = "printing", value_name = "ID")]
        printing: Option<String>,
    },

    /// List every printing of a card.
    Printings {
        /// Oracle ID of the card.
        oracle_id: String,

        /// Resolve through the search index instead of the card endpoint.
        #[arg(long = "from-search")]
        from_search: bool,
    },

    /// Log in and show the session (password is read from stdin).
    Login {
        email: String,
    },

    /// Send an email verification code.
    SendVerification {
        email: String,
    },

    /// Confirm an email address with the received code.
    VerifyEmail {
        email: String,
        code: String,
    },

    /// Request a password reset link.
    ResetPassword {
        email: String,
    },

    /// Send the verification email again.
    ResendVerification {
        email: String,
    },

    /// Create an account with the interactive five-step wizard.
    ///
    /// Progress (except contact details, password and consents) is saved
    /// after every step, so an interrupted registration resumes where it
    /// stopped.
    Register {
        /// Discard saved progress and start over.
        #[arg(long = "reset")]
        reset: bool,
    },

    /// Print the effective settings and where they are read from.
    Config {
        /// Write the effective settings to the config file.
        #[arg(long = "write")]
        write: bool,
    },
}

#[derive(Args)]
pub struct AutocompleteArgs {
    /// Partial card name.
    #[arg(required_unless_present = "interactive")]
    pub term: Option<String>,

    /// Read one term per line from stdin and show live suggestions.
    #[arg(long = "interactive", short = 'i', conflicts_with = "term")]
    pub interactive: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search term.
    #[arg(required_unless_present = "oracle_ids")]
    pub term: Option<String>,

    /// Page to show (1-based).
    #[arg(long = "page", default_value_t = 1)]
    pub page: u32,

    /// Result ordering.
    #[arg(long = "sort", value_enum, default_value = "relevance")]
    pub sort: SortArg,

    /// Restrict to these oracle IDs (comma-separated) instead of a text search.
    #[arg(
        long = "oracle-ids",
        value_delimiter = ',',
        value_name = "IDS",
        conflicts_with = "term"
    )]
    pub oracle_ids: Vec<String>,
}

/// CLI sort choices, spelled as the API spells them.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum SortArg {
    Relevance,
    NameAsc,
    NameDesc,
    ReleaseDesc,
    ReleaseAsc,
}

impl From<SortArg> for SortKey {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Relevance => SortKey::Relevance,
            SortArg::NameAsc => SortKey::NameAsc,
            SortArg::NameDesc => SortKey::NameDesc,
            SortArg::ReleaseDesc => SortKey::ReleaseDesc,
            SortArg::ReleaseAsc => SortKey::ReleaseAsc,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
