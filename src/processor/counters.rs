use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Clone)]
pub struct Counters {
    pub events_received: Arc<AtomicU64>,
    pub duplicates_skipped: Arc<AtomicU64>,
    pub alerts_sent: Arc<AtomicU64>,
    pub alert_failures: Arc<AtomicU64>,
}

impl Counters {
    pub fn new() -> Self {
        Self {
            events_received: Arc::new(AtomicU64::new(0)),
            duplicates_skipped: Arc::new(AtomicU64::new(0)),
            alerts_sent: Arc::new(AtomicU64::new(0)),
            alert_failures: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn increment_events_received(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_duplicates_skipped(&self) {
        self.duplicates_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_alerts_sent(&self) {
        self.alerts_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_alert_failures(&self) {
        self.alert_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            events_received: self.events_received.load(Ordering::Relaxed),
            duplicates_skipped: self.duplicates_skipped.load(Ordering::Relaxed),
            alerts_sent: self.alerts_sent.load(Ordering::Relaxed),
            alert_failures: self.alert_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for Counters {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct CountersSnapshot {
    pub events_received: u64,
    pub duplicates_skipped: u64,
    pub alerts_sent: u64,
    pub alert_failures: u64,
}
