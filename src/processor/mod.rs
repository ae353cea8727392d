pub mod calculator;
pub mod counters;

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::alert::notifier::Notifier;
use crate::feed::event::TokenCreationEvent;
use crate::metadata::MetadataResolver;
use crate::price::PriceOracle;
use crate::processor::counters::Counters;

/// Enrichment pipeline for one token-creation event: metadata and reference
/// price are fetched concurrently, metrics are derived, and the notifier is
/// invoked once. Every failure is contained to the single event.
pub struct Pipeline {
    resolver: MetadataResolver,
    oracle: PriceOracle,
    notifier: Arc<dyn Notifier>,
    counters: Counters,
}

impl Pipeline {
    pub fn new(
        resolver: MetadataResolver,
        oracle: PriceOracle,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            resolver,
            oracle,
            notifier,
            counters: Counters::new(),
        }
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub async fn process_event(&self, event: TokenCreationEvent) {
        info!(
            "🆕 New token: {} ({}) - Mint: {}",
            event.name, event.symbol, event.mint
        );

        let (metadata, sol_price) =
            tokio::join!(self.resolver.resolve(&event.uri), self.oracle.usd_price());

        let metrics = calculator::compute_metrics(&event, sol_price);

        match self.notifier.notify(&event, &metadata, &metrics).await {
            Ok(()) => {
                self.counters.increment_alerts_sent();
                debug!("✅ Alert delivered for {}", event.mint);
            }
            Err(e) => {
                // A failed delivery never un-marks the mint as seen.
                self.counters.increment_alert_failures();
                error!("Failed to deliver alert for {}: {}", event.mint, e);
            }
        }
    }
}
