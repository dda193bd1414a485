mod connection;
mod coordinator;
mod dispatcher;
mod frame;

pub use connection::{RetryPolicy, StreamConnection};
pub use coordinator::StreamCoordinator;
pub use dispatcher::EventDispatcher;
pub use frame::{decode_frame, DecodedFrame, FrameDecoder, SseFrame};
