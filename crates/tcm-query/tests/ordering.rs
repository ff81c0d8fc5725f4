//! Ordering guarantees: only the most recently issued request may update
//! visible state, whatever order responses arrive in.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tcm_api::Payload;
use tcm_query::{
    ChannelEvent, ChannelPhase, Completion, QueryChannel, QueryConfig, QueryResult, QuerySource,
};

/// Never answers on its own; tests deliver completions by hand.
struct Silent;

#[async_trait]
impl QuerySource for Silent {
    type Output = Vec<String>;

    fn label(&self) -> &'static str {
        "silent"
    }

    async fn fetch(&self, _term: &str) -> tcm_api::Result<Payload<Vec<String>>> {
        std::future::pending().await
    }
}

/// Answers after a per-term delay, counting how many fetches started.
struct Delayed {
    delays: HashMap<&'static str, u64>,
    started: Mutex<Vec<String>>,
}

#[async_trait]
impl QuerySource for Delayed {
    type Output = String;

    fn label(&self) -> &'static str {
        "delayed"
    }

    async fn fetch(&self, term: &str) -> tcm_api::Result<Payload<String>> {
        self.started.lock().unwrap().push(term.to_string());
        let delay = self.delays.get(term).copied().unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(Payload {
            data: term.to_string(),
            cached: false,
        })
    }
}

fn config() -> QueryConfig {
    QueryConfig {
        debounce_ms: 50,
        min_length: 2,
    }
}

fn completion(generation: u64, term: &str) -> Completion<Vec<String>> {
    Completion {
        generation,
        term: term.to_string(),
        outcome: Ok(Payload {
            data: vec![term.to_string()],
            cached: false,
        }),
    }
}

#[tokio::test(start_paused = true)]
async fn only_last_commit_is_applied_when_resolved_out_of_order() {
    let mut channel = QueryChannel::new(Silent, config());

    let mut generations = Vec::new();
    for term in ["sol", "sol r", "sol ring"] {
        match channel.submit(term) {
            Some(ChannelEvent::Committed { generation, .. }) => generations.push(generation),
            other => panic!("expected commit, got {other:?}"),
        }
    }
    let (first, second, last) = (generations[0], generations[1], generations[2]);

    assert_eq!(
        channel.apply(completion(last, "sol ring")),
        ChannelEvent::Applied {
            term: "sol ring".to_string(),
            generation: last
        }
    );
    assert_eq!(
        channel.apply(completion(second, "sol r")),
        ChannelEvent::Discarded { generation: second }
    );
    assert_eq!(
        channel.apply(completion(first, "sol")),
        ChannelEvent::Discarded { generation: first }
    );

    assert_eq!(
        channel.result(),
        &QueryResult::Success {
            data: vec!["sol ring".to_string()],
            cached: false
        }
    );
    assert_eq!(channel.phase(), ChannelPhase::Settled(last));
}

#[tokio::test(start_paused = true)]
async fn stale_response_is_ignored_even_before_latest_resolves() {
    let mut channel = QueryChannel::new(Silent, config());
    let Some(ChannelEvent::Committed { generation: old, .. }) = channel.submit("bolt") else {
        panic!("expected commit");
    };
    channel.submit("bolts");

    assert_eq!(
        channel.apply(completion(old, "bolt")),
        ChannelEvent::Discarded { generation: old }
    );
    assert!(channel.result().is_loading());
}

#[tokio::test(start_paused = true)]
async fn superseded_fetches_never_report_back() {
    let source = Delayed {
        delays: HashMap::from([("first", 300), ("second", 200), ("third", 100)]),
        started: Mutex::new(Vec::new()),
    };
    let mut channel = QueryChannel::new(source, config());

    channel.submit("first");
    channel.submit("second");
    channel.submit("third");

    let event = channel.next_event().await;
    assert!(matches!(event, ChannelEvent::Applied { ref term, .. } if term == "third"));
    assert_eq!(channel.result().data().map(String::as_str), Some("third"));

    // Let the superseded requests run past their delays: nothing else arrives.
    let quiet = tokio::time::timeout(Duration::from_secs(1), channel.next_event()).await;
    assert!(quiet.is_err());
    assert_eq!(channel.result().data().map(String::as_str), Some("third"));
}

#[tokio::test(start_paused = true)]
async fn typing_during_flight_invalidates_the_in_flight_request() {
    let source = Delayed {
        delays: HashMap::from([("lotus", 500)]),
        started: Mutex::new(Vec::new()),
    };
    let mut channel = QueryChannel::new(source, config());

    channel.input("lotus");
    assert!(matches!(
        channel.next_event().await,
        ChannelEvent::Committed { .. }
    ));

    // Let the fetch start, then type while "lotus" is on the wire.
    tokio::time::sleep(Duration::from_millis(10)).await;
    channel.input("lotu");
    assert!(matches!(channel.phase(), ChannelPhase::Pending(_)));

    let event = channel.next_event().await;
    assert!(matches!(event, ChannelEvent::Committed { ref term, .. } if term == "lotu"));
    let event = channel.next_event().await;
    assert!(matches!(event, ChannelEvent::Applied { ref term, .. } if term == "lotu"));
    assert_eq!(
        *channel.source().started.lock().unwrap(),
        vec!["lotus".to_string(), "lotu".to_string()]
    );
}
