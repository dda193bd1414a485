use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::config::StreamEndpoints;
use crate::feed::types::{ConnectionStatus, StreamKind};
use crate::stream::connection::{RetryPolicy, StreamConnection};
use crate::stream::dispatcher::EventDispatcher;

/// Runs at most one live stream at a time and switches between logical feeds
/// without leaking the previous connection: the old socket and any pending
/// reconnect timer are gone before the new subscription opens.
pub struct StreamCoordinator {
    endpoints: StreamEndpoints,
    policy: RetryPolicy,
    dispatcher: EventDispatcher,
    active: Option<StreamConnection>,
}

impl StreamCoordinator {
    pub fn new(endpoints: StreamEndpoints, policy: RetryPolicy, dispatcher: EventDispatcher) -> Self {
        Self {
            endpoints,
            policy,
            dispatcher,
            active: None,
        }
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    /// Make `kind` the one live subscription. Idempotent when it already is;
    /// otherwise the previous connection is fully torn down first.
    pub async fn set_active_stream(&mut self, kind: StreamKind) {
        if let Some(conn) = self.active.as_mut() {
            if conn.kind() == kind {
                // Re-arms a connection that gave up; no-op while healthy.
                conn.connect();
                return;
            }
        }
        if let Some(mut previous) = self.active.take() {
            previous.disconnect().await;
        }
        let mut conn = StreamConnection::new(
            kind,
            self.endpoints.url_for(kind),
            self.policy,
            self.dispatcher.clone(),
        );
        conn.connect();
        self.active = Some(conn);
    }

    /// Disconnect whatever is live. Subsequent `status` reads `disconnected`.
    pub async fn stop(&mut self) {
        if let Some(mut conn) = self.active.take() {
            conn.disconnect().await;
        }
    }

    /// Manual reconnect of the active stream, bypassing the retry ceiling.
    pub async fn reconnect(&mut self) {
        if let Some(conn) = self.active.as_mut() {
            conn.reconnect().await;
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.active
            .as_ref()
            .map(|conn| conn.status())
            .unwrap_or(ConnectionStatus::Disconnected)
    }

    pub fn status_watch(&self) -> Option<watch::Receiver<ConnectionStatus>> {
        self.active.as_ref().map(|conn| conn.status_watch())
    }

    pub fn active_kind(&self) -> Option<StreamKind> {
        self.active.as_ref().map(|conn| conn.kind())
    }

    pub fn last_event_at(&self) -> Option<DateTime<Utc>> {
        self.active.as_ref().and_then(|conn| conn.last_event_at())
    }
}
