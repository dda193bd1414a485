//! End-to-end pipeline checks: raw SSE bytes through framing, payload decode,
//! and the live feed's dedup/bounded buffers, without a network.

use std::sync::Arc;

use solana_whale_feed::feed::{NullAlerts, LiveFeed};
use solana_whale_feed::stream::{decode_frame, DecodedFrame, FrameDecoder};
use solana_whale_feed::{FeedEvent, StreamKind};

fn transfer_json(sig: &str, ts: &str) -> String {
    format!(
        r#"{{"walletAddress":"9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM","tokenAddress":"EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v","amount":"1500.25","signature":"{}","timestamp":"{}","side":"buy"}}"#,
        sig, ts
    )
}

fn coordinated_json(token: &str, triggered: &str) -> String {
    format!(
        r#"{{"tokenAddress":"{}","windowStart":"2026-08-27T11:55:00Z","windowEnd":"2026-08-27T12:00:00Z","triggeredAt":"{}","uniqueWallets":3,"walletAddresses":["w1","w2","w3"]}}"#,
        token, triggered
    )
}

/// Drive raw bytes through framing and decoding into a feed, counting frames
/// that were dropped as unparseable.
fn pump(feed: &mut LiveFeed, kind: StreamKind, bytes: &[u8]) -> usize {
    let mut decoder = FrameDecoder::new();
    let mut dropped = 0;
    for frame in decoder.push(bytes) {
        match decode_frame(&frame, kind) {
            Ok(DecodedFrame::Events(events)) => {
                for event in events {
                    feed.ingest(event);
                }
            }
            Ok(DecodedFrame::Heartbeat) => {}
            Err(_) => dropped += 1,
        }
    }
    dropped
}

#[test]
fn combined_stream_bytes_land_in_all_buffers() {
    let mut feed = LiveFeed::new(Arc::new(NullAlerts));
    let payload = format!(
        "event: heartbeat\ndata: \n\nevent: transfers\ndata: [{},{}]\n\nevent: coordinated\ndata: {}\n\n",
        transfer_json("Sig1", "2026-08-27T12:00:00Z"),
        transfer_json("Sig2", "2026-08-27T12:00:01Z"),
        coordinated_json("Tok1", "2026-08-27T12:00:02Z"),
    );
    let dropped = pump(&mut feed, StreamKind::Combined, payload.as_bytes());
    assert_eq!(dropped, 0);

    assert_eq!(feed.combined().len(), 3);
    assert_eq!(feed.transfers().len(), 2);
    assert_eq!(feed.coordinated().len(), 1);

    // Most-recent-first: the coordinated trade arrived last.
    let newest = feed.combined().iter().next().unwrap();
    assert!(matches!(newest, FeedEvent::Coordinated(_)));

    let counters = feed.counters();
    assert_eq!(counters.transfers, 2);
    assert_eq!(counters.coordinated, 1);
}

#[test]
fn duplicate_frames_do_not_grow_the_feed() {
    let mut feed = LiveFeed::new(Arc::new(NullAlerts));
    let frame = format!(
        "event: transfers\ndata: [{}]\n\n",
        transfer_json("SigDup", "2026-08-27T12:00:00Z")
    );
    pump(&mut feed, StreamKind::Combined, frame.as_bytes());
    pump(&mut feed, StreamKind::Combined, frame.as_bytes());
    assert_eq!(feed.combined().len(), 1);

    let coord = format!(
        "event: coordinated\ndata: {}\n\n",
        coordinated_json("Tok1", "2026-08-27T12:00:02Z")
    );
    pump(&mut feed, StreamKind::Combined, coord.as_bytes());
    pump(&mut feed, StreamKind::Combined, coord.as_bytes());
    assert_eq!(feed.coordinated().len(), 1);
    assert_eq!(feed.counters().coordinated, 1);
}

#[test]
fn garbage_frame_is_dropped_and_the_rest_still_flows() {
    let mut feed = LiveFeed::new(Arc::new(NullAlerts));
    let payload = format!(
        "data: not json\n\nevent: transfers\ndata: [{}]\n\n",
        transfer_json("SigOk", "2026-08-27T12:00:00Z")
    );
    let dropped = pump(&mut feed, StreamKind::Combined, payload.as_bytes());
    assert_eq!(dropped, 1);
    assert_eq!(feed.combined().len(), 1);
}

#[test]
fn per_kind_stream_accepts_bare_default_messages() {
    let mut feed = LiveFeed::new(Arc::new(NullAlerts));
    let payload = format!(
        "data: {}\n\ndata: [{}]\n\n",
        transfer_json("SigA", "2026-08-27T12:00:00Z"),
        transfer_json("SigB", "2026-08-27T12:00:01Z"),
    );
    let dropped = pump(&mut feed, StreamKind::Transfers, payload.as_bytes());
    assert_eq!(dropped, 0);
    assert_eq!(feed.transfers().len(), 2);
}

#[test]
fn chunked_delivery_matches_single_shot_delivery() {
    let payload = format!(
        "event: transfers\ndata: [{}]\n\n",
        transfer_json("SigChunk", "2026-08-27T12:00:00Z")
    );

    let mut whole = LiveFeed::new(Arc::new(NullAlerts));
    pump(&mut whole, StreamKind::Combined, payload.as_bytes());

    let mut chunked = LiveFeed::new(Arc::new(NullAlerts));
    let mut decoder = FrameDecoder::new();
    for chunk in payload.as_bytes().chunks(7) {
        for frame in decoder.push(chunk) {
            if let Ok(DecodedFrame::Events(events)) = decode_frame(&frame, StreamKind::Combined) {
                for event in events {
                    chunked.ingest(event);
                }
            }
        }
    }

    assert_eq!(whole.combined().len(), chunked.combined().len());
    assert_eq!(whole.counters(), chunked.counters());
}
