//! Live autocomplete over stdin.
//!
//! Each line read is treated as the new content of a search box. Lines are
//! debounced and superseded requests are cancelled, so piping a burst of
//! keystrokes produces a single lookup for the last one.

use anyhow::Result;
use tcm_api::{Printing, SearchClient};
use tcm_cli::prompt::Prompter;
use tcm_cli::render::{cache_note, printings_table};
use tcm_query::{
    Autocomplete, ChannelEvent, ChannelPhase, InputOutcome, QueryChannel, QueryConfig, QueryResult,
};

pub async fn run_autocomplete(client: SearchClient, config: QueryConfig) -> Result<i32> {
    let mut channel = QueryChannel::new(Autocomplete::new(client), config);
    let mut prompter = Prompter::stdin();
    let mut stdin_open = true;

    eprintln!(
        "Type part of a card name and press enter (at least {} characters). Ctrl-D quits.",
        config.min_length
    );

    loop {
        tokio::select! {
            line = prompter.line(), if stdin_open => match line? {
                Some(line) => {
                    if channel.input(&line) == InputOutcome::Cleared {
                        tracing::debug!("input too short, suggestions cleared");
                    }
                }
                None => stdin_open = false,
            },
            event = channel.next_event() => match event {
                ChannelEvent::Committed { term, .. } => eprintln!("Looking up \"{term}\"..."),
                ChannelEvent::Applied { term, .. } => show(&term, channel.result()),
                ChannelEvent::Discarded { .. } => {}
            },
        }

        let busy = matches!(
            channel.phase(),
            ChannelPhase::Pending(_) | ChannelPhase::InFlight(_)
        );
        if !stdin_open && !busy {
            break;
        }
    }
    Ok(0)
}

fn show(term: &str, result: &QueryResult<Vec<Printing>>) {
    match result {
        QueryResult::Success { data, cached } if data.is_empty() => {
            println!("No suggestions for \"{term}\"{}", cache_note(*cached));
        }
        QueryResult::Success { data, cached } => {
            println!("Suggestions for \"{term}\"{}", cache_note(*cached));
            println!("{}", printings_table(data));
        }
        QueryResult::Failure(message) => eprintln!("error: {message}"),
        QueryResult::Idle | QueryResult::Loading => {}
    }
}
