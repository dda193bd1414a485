use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::feed::buffer::FeedBuffer;
use crate::feed::notify::AlertSink;
use crate::feed::types::{EventKind, FeedEvent, TradeSide};

pub const COMBINED_FEED_CAPACITY: usize = 500;
pub const TRANSFER_FEED_CAPACITY: usize = 50;
pub const COORDINATED_FEED_CAPACITY: usize = 20;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeedCounters {
    pub transfers: u64,
    pub buys: u64,
    pub sells: u64,
    pub coordinated: u64,
}

/// In-memory state behind the live feed view: one combined buffer plus
/// per-kind mini-feeds, session counters, and the alert sink. Everything here
/// dies with the instance; there is no durable cache.
pub struct LiveFeed {
    combined: FeedBuffer,
    transfers: FeedBuffer,
    coordinated: FeedBuffer,
    counters: FeedCounters,
    alerts: Arc<dyn AlertSink>,
}

impl LiveFeed {
    pub fn new(alerts: Arc<dyn AlertSink>) -> Self {
        Self::with_capacities(
            COMBINED_FEED_CAPACITY,
            TRANSFER_FEED_CAPACITY,
            COORDINATED_FEED_CAPACITY,
            alerts,
        )
    }

    pub fn with_capacities(
        combined: usize,
        transfers: usize,
        coordinated: usize,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            combined: FeedBuffer::new(combined),
            transfers: FeedBuffer::new(transfers),
            coordinated: FeedBuffer::new(coordinated),
            counters: FeedCounters::default(),
            alerts,
        }
    }

    /// Run one event through the pipeline: arrival cue, admission into the
    /// combined feed and the matching mini-feed, then counters and the
    /// admitted alert. The arrival cue deliberately fires before the dedup
    /// decision, so duplicates still beep (observed dashboard behavior).
    ///
    /// Returns whether the event entered the combined feed.
    pub fn ingest(&mut self, event: FeedEvent) -> bool {
        self.alerts.event_arrived(event.kind());

        let admitted = self.combined.admit(event.clone());
        match event.kind() {
            EventKind::Transfer => {
                self.transfers.admit(event.clone());
            }
            EventKind::Coordinated => {
                self.coordinated.admit(event.clone());
            }
        }

        if admitted {
            match &event {
                FeedEvent::Transfer(t) => {
                    self.counters.transfers += 1;
                    match t.side {
                        TradeSide::Buy => self.counters.buys += 1,
                        TradeSide::Sell => self.counters.sells += 1,
                    }
                }
                FeedEvent::Coordinated(_) => self.counters.coordinated += 1,
            }
            self.alerts.event_admitted(&event);
        }
        admitted
    }

    pub fn combined(&self) -> &FeedBuffer {
        &self.combined
    }

    pub fn transfers(&self) -> &FeedBuffer {
        &self.transfers
    }

    pub fn coordinated(&self) -> &FeedBuffer {
        &self.coordinated
    }

    pub fn counters(&self) -> FeedCounters {
        self.counters
    }

    pub fn clear(&mut self) {
        self.combined.clear();
        self.transfers.clear();
        self.coordinated.clear();
        self.counters = FeedCounters::default();
    }
}

/// Normalize a wire amount string for display. Amounts are opaque decimal
/// strings; anything unparseable is shown as-is.
pub fn display_amount(raw: &str) -> String {
    match Decimal::from_str(raw) {
        Ok(d) => d.normalize().to_string(),
        Err(_) => raw.to_string(),
    }
}
