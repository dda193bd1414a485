use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FeedError;

/// Backend cap on the tracked-wallet list; enforced client-side as well so a
/// too-long list never leaves the process.
pub const MAX_TRACKED_WALLETS: usize = 100;

/// Query for historical transfers: either a row limit or a time range. The
/// backend ignores `limit` whenever a range is present, so the client drops
/// it from the request instead of sending a parameter that does nothing.
#[derive(Clone, Debug, Default)]
pub struct TransferQuery {
    pub limit: Option<u32>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TransferQuery {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn with_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            limit: None,
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn has_range(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(start) = self.start {
            params.push(("start", start.to_rfc3339()));
        }
        if let Some(end) = self.end {
            params.push(("end", end.to_rfc3339()));
        }
        if !self.has_range() {
            if let Some(limit) = self.limit {
                params.push(("limit", limit.to_string()));
            }
        }
        params
    }
}

/// Detection parameters the operator can edit from the dashboard. The actual
/// detection runs upstream; this is only its configuration surface.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionConfig {
    pub min_transfer_amount: Decimal,
    pub coordination_window_seconds: u32,
    pub min_coordinated_wallets: u32,
    pub alerts_enabled: bool,
    pub track_buys: bool,
    pub track_sells: bool,
    #[serde(default)]
    pub excluded_tokens: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferCounts {
    pub total: u64,
    pub buys: u64,
    pub sells: u64,
    pub coordinated: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedWallet {
    pub address: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// Local shape check for Solana addresses (base58, 32-44 chars). Invalid
/// input is rejected before any network call.
pub fn validate_address(address: &str) -> Result<(), FeedError> {
    const BASE58: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
    if !(32..=44).contains(&address.len()) {
        return Err(FeedError::Validation(format!(
            "address has invalid length {}: {}",
            address.len(),
            address
        )));
    }
    if let Some(bad) = address.chars().find(|c| !BASE58.contains(*c)) {
        return Err(FeedError::Validation(format!(
            "address contains non-base58 character '{}': {}",
            bad, address
        )));
    }
    Ok(())
}

pub(crate) fn validate_wallet_list(wallets: &[TrackedWallet]) -> Result<(), FeedError> {
    if wallets.len() > MAX_TRACKED_WALLETS {
        return Err(FeedError::Validation(format!(
            "tracked wallet list has {} entries, maximum is {}",
            wallets.len(),
            MAX_TRACKED_WALLETS
        )));
    }
    for wallet in wallets {
        validate_address(&wallet.address)?;
    }
    Ok(())
}
