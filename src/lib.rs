pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod stream;

// Re-export key types
pub use api::{ApiClient, DetectionConfig, TrackedWallet, TransferQuery};
pub use config::{FeedConfig, StreamEndpoints};
pub use error::FeedError;

pub use feed::{
    AlertSink, ConnectionStatus, CoordinatedTradeEvent, FeedBuffer, FeedEvent, LiveFeed,
    StreamKind, TransferEvent,
};

pub use stream::{
    EventDispatcher, RetryPolicy, StreamConnection, StreamCoordinator,
};
