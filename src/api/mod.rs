mod client;
mod types;

pub use client::ApiClient;
pub use types::{
    validate_address, DetectionConfig, TrackedWallet, TransferCounts, TransferQuery,
    MAX_TRACKED_WALLETS,
};
