mod buffer;
mod live;
mod notify;
pub mod types;

pub use buffer::FeedBuffer;
pub use live::{
    display_amount, FeedCounters, LiveFeed, COMBINED_FEED_CAPACITY, COORDINATED_FEED_CAPACITY,
    TRANSFER_FEED_CAPACITY,
};
pub use notify::{tone_hz, AlertSink, NullAlerts, TerminalAlerts};
pub use types::{
    ConnectionStatus, CoordinatedTradeEvent, EventKind, FeedEvent, StreamKind, TradeSide,
    TransferEvent,
};
