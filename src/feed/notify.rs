use std::io::Write;

use log::info;

use crate::feed::live::display_amount;
use crate::feed::types::{EventKind, FeedEvent, TradeSide};

/// Downstream observer of the admission pipeline. Sinks must never mutate
/// buffer state and must never let a notification failure reach the stream.
///
/// `event_arrived` fires once per inbound event, before the dedup decision,
/// so duplicates still produce an audible cue. `event_admitted` fires only
/// for events that actually entered the combined feed.
#[cfg_attr(test, mockall::automock)]
pub trait AlertSink: Send + Sync {
    fn event_arrived(&self, kind: EventKind);
    fn event_admitted(&self, event: &FeedEvent);
}

/// Arrival cue pitch by event kind, for sinks with a tone generator.
pub fn tone_hz(kind: EventKind) -> u32 {
    match kind {
        EventKind::Transfer => 880,
        EventKind::Coordinated => 523,
    }
}

/// Terminal sink: BEL for the arrival cue, an info log line as the "toast".
/// Audio failures (no tty, closed pipe) are swallowed.
pub struct TerminalAlerts {
    sound_enabled: bool,
}

impl TerminalAlerts {
    pub fn new(sound_enabled: bool) -> Self {
        Self { sound_enabled }
    }
}

impl AlertSink for TerminalAlerts {
    fn event_arrived(&self, kind: EventKind) {
        if !self.sound_enabled {
            return;
        }
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(b"\x07");
        let _ = stdout.flush();
        log::debug!("arrival cue ({} Hz)", tone_hz(kind));
    }

    fn event_admitted(&self, event: &FeedEvent) {
        match event {
            FeedEvent::Transfer(t) => {
                let verb = match t.side {
                    TradeSide::Buy => "bought",
                    TradeSide::Sell => "sold",
                };
                info!(
                    "whale {} {} {} of {}",
                    t.wallet_address,
                    verb,
                    display_amount(&t.amount),
                    t.token_address
                );
            }
            FeedEvent::Coordinated(c) => {
                info!(
                    "coordinated trade on {}: {} wallets within {}s window",
                    c.token_address,
                    c.unique_wallets,
                    (c.window_end - c.window_start).num_seconds()
                );
            }
        }
    }
}

/// Sink that does nothing; for headless consumers and tests.
pub struct NullAlerts;

impl AlertSink for NullAlerts {
    fn event_arrived(&self, _kind: EventKind) {}
    fn event_admitted(&self, _event: &FeedEvent) {}
}
