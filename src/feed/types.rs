use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One whale wallet transfer as emitted by the backend stream.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferEvent {
    pub wallet_address: String,
    pub token_address: String,
    /// Decimal string; parsed only for display, never for arithmetic.
    pub amount: String,
    #[serde(default)]
    pub signature: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub side: TradeSide,
}

impl TransferEvent {
    /// Dedup key: the transaction signature, when present and non-empty.
    /// Events without one are never treated as duplicates.
    pub fn dedup_signature(&self) -> Option<&str> {
        match self.signature.as_deref() {
            Some(sig) if !sig.is_empty() => Some(sig),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    #[serde(alias = "BUY")]
    Buy,
    #[serde(alias = "SELL")]
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "BUY"),
            TradeSide::Sell => write!(f, "SELL"),
        }
    }
}

/// A detected multi-wallet pattern: several distinct wallets trading the same
/// token inside one time window. Detection happens upstream; this is the
/// already-computed result.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatedTradeEvent {
    pub token_address: String,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub triggered_at: DateTime<Utc>,
    pub unique_wallets: u32,
    /// Should have `unique_wallets` entries, but the backend is not trusted
    /// on that; a mismatch is tolerated.
    #[serde(default)]
    pub wallet_addresses: Vec<String>,
}

impl CoordinatedTradeEvent {
    /// Dedup key: (token address, trigger instant).
    pub fn dedup_key(&self) -> (&str, DateTime<Utc>) {
        (&self.token_address, self.triggered_at)
    }
}

/// Unified internal representation for everything the streams deliver.
#[derive(Clone, Debug)]
pub enum FeedEvent {
    Transfer(TransferEvent),
    Coordinated(CoordinatedTradeEvent),
}

impl FeedEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            FeedEvent::Transfer(_) => EventKind::Transfer,
            FeedEvent::Coordinated(_) => EventKind::Coordinated,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Transfer,
    Coordinated,
}

/// Which logical feed a connection subscribes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Combined,
    Transfers,
    Coordinated,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Combined => write!(f, "combined"),
            StreamKind::Transfers => write!(f, "transfers"),
            StreamKind::Coordinated => write!(f, "coordinated"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Disconnected => write!(f, "disconnected"),
            ConnectionStatus::Connecting => write!(f, "connecting"),
            ConnectionStatus::Connected => write!(f, "connected"),
            ConnectionStatus::Error => write!(f, "error"),
        }
    }
}
