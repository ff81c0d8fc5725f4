//! Full search pages through a query channel against a local HTTP server.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::time::Duration;

use tcm_api::{ApiSettings, SearchClient, SortKey};
use tcm_query::{ChannelEvent, FullSearch, QueryChannel, QueryConfig, SearchOptions};

const PAGE_BODY: &str = r#"{"success":true,"cached":false,"data":{"pagination":{"current_page":1,"per_page":20,"total":1,"total_pages":1},"data":[{"oracle_id":"o-1","name":"Black Lotus"}]}}"#;

/// Answer `requests` connections with one search page each, reporting every
/// request line back to the test.
fn serve(requests: usize) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for _ in 0..requests {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let read = stream.read(&mut buf).unwrap();
            let head = String::from_utf8_lossy(&buf[..read]);
            let line = head.lines().next().unwrap_or_default().to_string();
            tx.send(line).unwrap();
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{PAGE_BODY}",
                PAGE_BODY.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        }
    });
    (format!("http://{addr}"), rx)
}

async fn wait_applied(channel: &mut QueryChannel<FullSearch>) {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            if let ChannelEvent::Applied { .. } = channel.next_event().await {
                break;
            }
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn changed_options_apply_on_refresh() {
    let (base, requests) = serve(2);
    let settings = ApiSettings {
        search_base_url: base,
        ..ApiSettings::default()
    };
    let client = SearchClient::new(&settings).unwrap();
    let mut channel = QueryChannel::new(
        FullSearch::new(client, SearchOptions::default()),
        QueryConfig::search(),
    );

    channel.submit("lotus").unwrap();
    wait_applied(&mut channel).await;
    let first = requests.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(first.contains("term=lotus"), "{first}");
    assert!(first.contains("page=1"), "{first}");
    assert!(first.contains("sort=relevance"), "{first}");
    assert_eq!(
        channel.result().data().map(|page| page.data[0].name.as_str()),
        Some("Black Lotus")
    );

    channel.source().set_options(SearchOptions {
        page: 3,
        sort: SortKey::NameDesc,
    });
    assert!(matches!(
        channel.refresh(),
        Some(ChannelEvent::Committed { .. })
    ));
    wait_applied(&mut channel).await;
    let second = requests.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(second.contains("term=lotus"), "{second}");
    assert!(second.contains("page=3"), "{second}");
    assert!(second.contains("sort=name_desc"), "{second}");
}

#[tokio::test]
async fn short_term_is_never_submitted() {
    let client = SearchClient::new(&ApiSettings::default()).unwrap();
    let mut channel = QueryChannel::new(
        FullSearch::new(client, SearchOptions::default()),
        QueryConfig::search(),
    );

    assert!(channel.submit("a").is_none());
    assert!(channel.refresh().is_none());
}
