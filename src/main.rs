use std::sync::{Arc, Mutex};

use dotenv::dotenv;
use log::{info, warn};

use solana_whale_feed::{
    feed::TerminalAlerts, ApiClient, EventDispatcher, FeedConfig, FeedError, LiveFeed,
    StreamCoordinator, StreamKind,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    let config = FeedConfig::load_from_env()?;
    let kind = parse_stream_kind(std::env::args().nth(1).as_deref())?;

    // Backend snapshot before going live; the stream itself needs no auth.
    let api = ApiClient::new(config.api_base_url.clone(), config.session_token.clone());
    match api.transfer_counts().await {
        Ok(counts) => info!(
            "backend totals: {} transfers ({} buys / {} sells), {} coordinated",
            counts.total, counts.buys, counts.sells, counts.coordinated
        ),
        Err(FeedError::Unauthorized) => {
            warn!("session expired; set WHALE_SESSION_TOKEN to query history")
        }
        Err(err) => warn!("could not fetch backend counts: {}", err),
    }

    let feed = Arc::new(Mutex::new(LiveFeed::new(Arc::new(TerminalAlerts::new(
        true,
    )))));

    let dispatcher = EventDispatcher::new();
    let ingest_feed = Arc::clone(&feed);
    dispatcher.on_event(move |_, event| {
        if let Ok(mut feed) = ingest_feed.lock() {
            feed.ingest(event);
        }
    });
    dispatcher.on_status(|kind, status| info!("{} stream is {}", kind, status));
    dispatcher.on_error(|kind, err| warn!("{} stream: {}", kind, err));

    let mut coordinator =
        StreamCoordinator::new(config.endpoints.clone(), config.retry, dispatcher);
    coordinator.set_active_stream(kind).await;
    info!("Watching {} whale feed; Ctrl-C to exit", kind);

    tokio::signal::ctrl_c().await?;
    coordinator.stop().await;

    if let Ok(feed) = feed.lock() {
        let counters = feed.counters();
        info!(
            "session: {} transfers ({} buys / {} sells), {} coordinated",
            counters.transfers, counters.buys, counters.sells, counters.coordinated
        );
    }
    Ok(())
}

fn parse_stream_kind(arg: Option<&str>) -> Result<StreamKind, String> {
    match arg {
        None | Some("combined") => Ok(StreamKind::Combined),
        Some("transfers") => Ok(StreamKind::Transfers),
        Some("coordinated") => Ok(StreamKind::Coordinated),
        Some(other) => Err(format!(
            "unknown feed '{}': expected combined, transfers or coordinated",
            other
        )),
    }
}
