pub mod event;
pub mod transport;

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::feed::event::TokenCreationEvent;
use crate::feed::transport::{FeedConnection, FeedTransport};
use crate::processor::Pipeline;

pub const SUBSCRIBE_NEW_TOKEN: &str = r#"{"method":"subscribeNewToken"}"#;
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Stopped,
    Connecting,
    Subscribed,
}

/// De-duplicating consumer of the "new token" feed.
///
/// Owns the connection lifecycle: subscribe on open, reconnect after a fixed
/// delay while active, tear down on `stop()`. Each parsed event is checked
/// against the seen set *before* any await point, then enrichment runs as its
/// own task so one slow or failing event never stalls the read loop. The seen
/// set survives reconnects; it is lost on process restart by design.
pub struct CoinTracker {
    transport: Arc<dyn FeedTransport>,
    pipeline: Arc<Pipeline>,
    seen: Arc<Mutex<HashSet<String>>>,
    reconnect_delay: Duration,
    active: watch::Sender<bool>,
    state: watch::Sender<TrackerState>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl CoinTracker {
    pub fn new(transport: Arc<dyn FeedTransport>, pipeline: Arc<Pipeline>) -> Self {
        Self::with_reconnect_delay(transport, pipeline, RECONNECT_DELAY)
    }

    pub fn with_reconnect_delay(
        transport: Arc<dyn FeedTransport>,
        pipeline: Arc<Pipeline>,
        reconnect_delay: Duration,
    ) -> Self {
        let (active, _) = watch::channel(false);
        let (state, _) = watch::channel(TrackerState::Stopped);
        Self {
            transport,
            pipeline,
            seen: Arc::new(Mutex::new(HashSet::new())),
            reconnect_delay,
            active,
            state,
            task: Mutex::new(None),
        }
    }

    pub fn state(&self) -> TrackerState {
        *self.state.borrow()
    }

    /// Establish the feed subscription. A no-op while already running.
    pub fn start(&self) {
        let mut task = self.task.lock().unwrap();
        if task.is_some() {
            return;
        }
        self.active.send_replace(true);

        let worker = Worker {
            transport: Arc::clone(&self.transport),
            pipeline: Arc::clone(&self.pipeline),
            seen: Arc::clone(&self.seen),
            reconnect_delay: self.reconnect_delay,
            active: self.active.subscribe(),
            state: self.state.clone(),
        };
        *task = Some(tokio::spawn(worker.run()));
    }

    /// Tear the subscription down, cancelling a pending reconnect. Idempotent.
    pub async fn stop(&self) {
        self.active.send_replace(false);
        let handle = self.task.lock().unwrap().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

struct Worker {
    transport: Arc<dyn FeedTransport>,
    pipeline: Arc<Pipeline>,
    seen: Arc<Mutex<HashSet<String>>>,
    reconnect_delay: Duration,
    active: watch::Receiver<bool>,
    state: watch::Sender<TrackerState>,
}

impl Worker {
    async fn run(mut self) {
        while *self.active.borrow() {
            self.state.send_replace(TrackerState::Connecting);
            let connected = tokio::select! {
                _ = stopped(&mut self.active) => break,
                connected = self.transport.connect() => connected,
            };
            match connected {
                Ok(conn) => self.run_connection(conn).await,
                Err(e) => warn!("feed connection failed: {}", e),
            }

            if !*self.active.borrow() {
                break;
            }
            self.state.send_replace(TrackerState::Connecting);
            info!(
                "feed disconnected - reconnecting in {:?}",
                self.reconnect_delay
            );
            tokio::select! {
                _ = tokio::time::sleep(self.reconnect_delay) => {}
                _ = stopped(&mut self.active) => break,
            }
        }
        self.state.send_replace(TrackerState::Stopped);
    }

    async fn run_connection(&mut self, mut conn: Box<dyn FeedConnection>) {
        if let Err(e) = conn.send(SUBSCRIBE_NEW_TOKEN).await {
            warn!("failed to send subscription: {}", e);
            return;
        }
        self.state.send_replace(TrackerState::Subscribed);
        info!("📡 Subscribed to new token events");

        loop {
            let frame = tokio::select! {
                _ = stopped(&mut self.active) => return,
                frame = conn.next() => frame,
            };
            match frame {
                Some(text) => handle_frame(&self.pipeline, &self.seen, &text),
                None => {
                    warn!("⚠️ feed stream ended");
                    return;
                }
            }
        }
    }
}

async fn stopped(active: &mut watch::Receiver<bool>) {
    loop {
        if !*active.borrow() {
            return;
        }
        if active.changed().await.is_err() {
            return;
        }
    }
}

fn handle_frame(pipeline: &Arc<Pipeline>, seen: &Mutex<HashSet<String>>, text: &str) {
    let event = match TokenCreationEvent::from_frame(text) {
        Ok(event) if !event.mint.is_empty() => event,
        Ok(_) => {
            debug!("feed frame without mint dropped");
            return;
        }
        Err(e) => {
            debug!("ignoring non-event feed frame: {}", e);
            return;
        }
    };

    pipeline.counters().increment_events_received();

    // The mint is recorded before the enrichment task is even scheduled, so a
    // duplicate arriving while the first is still in flight is rejected here.
    if !seen.lock().unwrap().insert(event.mint.clone()) {
        pipeline.counters().increment_duplicates_skipped();
        debug!("duplicate mint {} dropped", event.mint);
        return;
    }

    let pipeline = Arc::clone(pipeline);
    tokio::spawn(async move {
        pipeline.process_event(event).await;
    });
}
