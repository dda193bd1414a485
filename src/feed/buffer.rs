use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::feed::types::FeedEvent;

/// Coordinated-trade keys are remembered past buffer eviction; once the memory
/// exceeds this bound it is pruned to the most recent half.
const COORDINATED_KEY_MEMORY_LIMIT: usize = 100;

/// Bounded most-recent-first event buffer with per-kind duplicate suppression.
///
/// Capacity is fixed at construction. Each buffer owns its dedup state;
/// distinct buffers never share it.
pub struct FeedBuffer {
    capacity: usize,
    entries: VecDeque<FeedEvent>,
    seen_coordinated: VecDeque<(String, DateTime<Utc>)>,
}

impl FeedBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
            seen_coordinated: VecDeque::new(),
        }
    }

    /// Admit a candidate event. Duplicates are rejected silently; admitted
    /// events go to the front and the tail is trimmed to capacity.
    ///
    /// Transfers dedup on transaction signature; events without a signature
    /// are always admitted. Coordinated trades dedup on
    /// (token address, trigger instant) against the key memory, which outlives
    /// buffer eviction.
    pub fn admit(&mut self, event: FeedEvent) -> bool {
        match &event {
            FeedEvent::Transfer(transfer) => {
                if let Some(sig) = transfer.dedup_signature() {
                    if self.contains_signature(sig) {
                        return false;
                    }
                }
            }
            FeedEvent::Coordinated(coordinated) => {
                let (token, triggered_at) = coordinated.dedup_key();
                if self
                    .seen_coordinated
                    .iter()
                    .any(|(t, at)| t == token && *at == triggered_at)
                {
                    return false;
                }
                self.seen_coordinated
                    .push_back((token.to_string(), triggered_at));
                if self.seen_coordinated.len() > COORDINATED_KEY_MEMORY_LIMIT {
                    let excess = self.seen_coordinated.len() - COORDINATED_KEY_MEMORY_LIMIT / 2;
                    self.seen_coordinated.drain(..excess);
                }
            }
        }

        self.entries.push_front(event);
        self.entries.truncate(self.capacity);
        true
    }

    fn contains_signature(&self, sig: &str) -> bool {
        self.entries.iter().any(|entry| match entry {
            FeedEvent::Transfer(t) => t.dedup_signature() == Some(sig),
            _ => false,
        })
    }

    /// Most-recent-first iteration.
    pub fn iter(&self) -> impl Iterator<Item = &FeedEvent> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.seen_coordinated.clear();
    }

    #[cfg(test)]
    fn coordinated_key_memory_len(&self) -> usize {
        self.seen_coordinated.len()
    }
}
