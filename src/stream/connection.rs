use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use log::{info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::error::FeedError;
use crate::feed::types::{ConnectionStatus, StreamKind};
use crate::stream::dispatcher::EventDispatcher;
use crate::stream::frame::{decode_frame, DecodedFrame, FrameDecoder};

#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub auto_reconnect: bool,
    pub max_attempts: u32,
    /// Fixed delay between attempts. Deliberately not exponential; the
    /// max-attempts ceiling bounds the damage and keeps recovery predictable.
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            auto_reconnect: true,
            max_attempts: 10,
            retry_delay: Duration::from_millis(5000),
        }
    }
}

/// Retry bookkeeping, kept separate from the transport so the transition
/// rules are testable without a socket.
#[derive(Debug, Default)]
pub(crate) struct RetryCounter {
    attempts: u32,
}

impl RetryCounter {
    /// A successful open resets the counter.
    pub(crate) fn on_connected(&mut self) {
        self.attempts = 0;
    }

    /// Decide what follows a transport failure: `Some(delay)` schedules a
    /// reconnect, `None` means give up and go to `disconnected`.
    pub(crate) fn next_retry(&mut self, policy: &RetryPolicy) -> Option<Duration> {
        if policy.auto_reconnect && self.attempts < policy.max_attempts {
            self.attempts += 1;
            Some(policy.retry_delay)
        } else {
            None
        }
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.attempts
    }
}

/// One logical SSE subscription.
///
/// `connect` spawns the read-loop task; `disconnect` signals it, awaits it,
/// and cancels any pending reconnect timer with it. The task owns its own
/// retry counter, so a fresh `connect` always starts from attempt zero.
pub struct StreamConnection {
    kind: StreamKind,
    url: String,
    shared: Arc<ConnShared>,
    status_rx: watch::Receiver<ConnectionStatus>,
    shutdown: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

struct ConnShared {
    kind: StreamKind,
    url: String,
    policy: RetryPolicy,
    dispatcher: EventDispatcher,
    http: reqwest::Client,
    status_tx: watch::Sender<ConnectionStatus>,
    last_event: RwLock<Option<DateTime<Utc>>>,
}

impl ConnShared {
    fn set_status(&self, status: ConnectionStatus) {
        let changed = self
            .status_tx
            .send_if_modified(|current| {
                if *current == status {
                    false
                } else {
                    *current = status;
                    true
                }
            });
        if changed {
            self.dispatcher.dispatch_status(self.kind, status);
        }
    }

    fn touch_last_event(&self) {
        if let Ok(mut last) = self.last_event.write() {
            *last = Some(Utc::now());
        }
    }

    fn handle_frame(&self, frame: &crate::stream::frame::SseFrame) {
        match decode_frame(frame, self.kind) {
            Ok(DecodedFrame::Heartbeat) => self.touch_last_event(),
            Ok(DecodedFrame::Events(events)) => {
                self.touch_last_event();
                for event in events {
                    self.dispatcher.dispatch_event(self.kind, event);
                }
            }
            // A bad frame is dropped; the connection is unaffected.
            Err(err) => warn!("{} stream: dropping frame: {}", self.kind, err),
        }
    }
}

impl StreamConnection {
    pub fn new(
        kind: StreamKind,
        url: impl Into<String>,
        policy: RetryPolicy,
        dispatcher: EventDispatcher,
    ) -> Self {
        let url = url.into();
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Disconnected);
        let shared = Arc::new(ConnShared {
            kind,
            url: url.clone(),
            policy,
            dispatcher,
            http: reqwest::Client::new(),
            status_tx,
            last_event: RwLock::new(None),
        });
        Self {
            kind,
            url,
            shared,
            status_rx,
            shutdown: None,
            task: None,
        }
    }

    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> ConnectionStatus {
        *self.status_rx.borrow()
    }

    /// Watch handle for status transitions, usable independently of the
    /// registered callbacks.
    pub fn status_watch(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_rx.clone()
    }

    pub fn last_event_at(&self) -> Option<DateTime<Utc>> {
        self.shared.last_event.read().ok().and_then(|last| *last)
    }

    /// Open the connection. Idempotent while a read loop is already running;
    /// after the loop has given up (retries exhausted) a new `connect` starts
    /// over with a fresh attempt counter.
    pub fn connect(&mut self) {
        if self.task.as_ref().is_some_and(|task| !task.is_finished()) {
            return;
        }
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        self.shutdown = Some(shutdown_tx);
        let shared = Arc::clone(&self.shared);
        self.task = Some(tokio::spawn(run(shared, shutdown_rx)));
    }

    /// Tear the connection down: signal the read loop, await it (which also
    /// cancels any pending reconnect timer), and settle on `disconnected`.
    /// Safe to call repeatedly.
    pub async fn disconnect(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(true);
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        self.shared.set_status(ConnectionStatus::Disconnected);
    }

    /// Manual escape hatch: tear down and retry immediately, regardless of
    /// how many automatic attempts were already spent.
    pub async fn reconnect(&mut self) {
        self.disconnect().await;
        self.connect();
    }
}

impl Drop for StreamConnection {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(true);
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

enum ReadOutcome {
    Shutdown,
    Ended,
    Failed(FeedError),
}

async fn run(shared: Arc<ConnShared>, mut shutdown: watch::Receiver<bool>) {
    let mut retry = RetryCounter::default();
    loop {
        shared.set_status(ConnectionStatus::Connecting);
        let opened = tokio::select! {
            _ = shutdown.changed() => return,
            result = open_stream(&shared) => result,
        };
        let failure = match opened {
            Ok(response) => {
                shared.set_status(ConnectionStatus::Connected);
                retry.on_connected();
                shared.touch_last_event();
                info!("{} stream connected to {}", shared.kind, shared.url);
                match read_frames(&shared, response, &mut shutdown).await {
                    ReadOutcome::Shutdown => return,
                    ReadOutcome::Ended => FeedError::Transport("stream closed by server".into()),
                    ReadOutcome::Failed(err) => err,
                }
            }
            Err(err) => err,
        };

        if *shutdown.borrow() {
            return;
        }
        warn!("{} stream error: {}", shared.kind, failure);
        shared.dispatcher.dispatch_error(shared.kind, &failure);
        shared.set_status(ConnectionStatus::Error);

        match retry.next_retry(&shared.policy) {
            Some(delay) => {
                info!(
                    "{} stream: reconnect attempt {}/{} in {:?}",
                    shared.kind,
                    retry.attempts(),
                    shared.policy.max_attempts,
                    delay
                );
                tokio::select! {
                    _ = sleep(delay) => {}
                    _ = shutdown.changed() => return,
                }
                if *shutdown.borrow() {
                    return;
                }
            }
            None => {
                warn!(
                    "{} stream: giving up after {} attempts",
                    shared.kind,
                    retry.attempts()
                );
                shared.set_status(ConnectionStatus::Disconnected);
                return;
            }
        }
    }
}

async fn open_stream(shared: &ConnShared) -> Result<reqwest::Response, FeedError> {
    let response = shared
        .http
        .get(&shared.url)
        .header(reqwest::header::ACCEPT, "text/event-stream")
        .send()
        .await?
        .error_for_status()?;
    Ok(response)
}

async fn read_frames(
    shared: &ConnShared,
    response: reqwest::Response,
    shutdown: &mut watch::Receiver<bool>,
) -> ReadOutcome {
    let mut decoder = FrameDecoder::new();
    let mut body = response.bytes_stream();
    loop {
        tokio::select! {
            _ = shutdown.changed() => return ReadOutcome::Shutdown,
            chunk = body.next() => match chunk {
                None => return ReadOutcome::Ended,
                Some(Err(err)) => return ReadOutcome::Failed(err.into()),
                Some(Ok(bytes)) => {
                    for frame in decoder.push(&bytes) {
                        shared.handle_frame(&frame);
                    }
                }
            }
        }
    }
}
