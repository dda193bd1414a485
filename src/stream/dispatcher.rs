use std::sync::{Arc, RwLock};

use crate::error::FeedError;
use crate::feed::types::{ConnectionStatus, FeedEvent, StreamKind};

type EventHandler = Box<dyn Fn(StreamKind, FeedEvent) + Send + Sync>;
type StatusHandler = Box<dyn Fn(StreamKind, ConnectionStatus) + Send + Sync>;
type ErrorHandler = Box<dyn Fn(StreamKind, &FeedError) + Send + Sync>;

#[derive(Default)]
struct Handlers {
    on_event: Option<EventHandler>,
    on_status: Option<StatusHandler>,
    on_error: Option<ErrorHandler>,
}

/// Stable callback handle shared between connections and their consumer.
///
/// A connection captures a clone of the dispatcher at creation time;
/// registration mutates the shared handler slots afterwards, so whichever
/// callback was registered last is the one a long-lived connection invokes.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    inner: Arc<RwLock<Handlers>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_event(&self, handler: impl Fn(StreamKind, FeedEvent) + Send + Sync + 'static) {
        if let Ok(mut handlers) = self.inner.write() {
            handlers.on_event = Some(Box::new(handler));
        }
    }

    pub fn on_status(
        &self,
        handler: impl Fn(StreamKind, ConnectionStatus) + Send + Sync + 'static,
    ) {
        if let Ok(mut handlers) = self.inner.write() {
            handlers.on_status = Some(Box::new(handler));
        }
    }

    pub fn on_error(&self, handler: impl Fn(StreamKind, &FeedError) + Send + Sync + 'static) {
        if let Ok(mut handlers) = self.inner.write() {
            handlers.on_error = Some(Box::new(handler));
        }
    }

    pub(crate) fn dispatch_event(&self, kind: StreamKind, event: FeedEvent) {
        if let Ok(handlers) = self.inner.read() {
            if let Some(handler) = &handlers.on_event {
                handler(kind, event);
            }
        }
    }

    pub(crate) fn dispatch_status(&self, kind: StreamKind, status: ConnectionStatus) {
        if let Ok(handlers) = self.inner.read() {
            if let Some(handler) = &handlers.on_status {
                handler(kind, status);
            }
        }
    }

    pub(crate) fn dispatch_error(&self, kind: StreamKind, error: &FeedError) {
        if let Ok(handlers) = self.inner.read() {
            if let Some(handler) = &handlers.on_error {
                handler(kind, error);
            }
        }
    }
}
