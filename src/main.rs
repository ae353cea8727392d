use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use pumpfun_alerts::alert::notifier::WebhookNotifier;
use pumpfun_alerts::config::Config;
use pumpfun_alerts::feed::CoinTracker;
use pumpfun_alerts::feed::transport::PumpPortalTransport;
use pumpfun_alerts::metadata::{HttpMetadataFetcher, MetadataResolver, RetryPolicy};
use pumpfun_alerts::price::{CoinGeckoSource, PriceOracle};
use pumpfun_alerts::processor::Pipeline;

#[tokio::main]
async fn main() -> Result<()> {

    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();

    info!("🚀 Starting Pump.fun token tracker...");

    let config = Config::from_env()?;
    info!("✅ Configuration loaded");
    info!("   Feed: {}", config.feed_url);
    info!("   Webhook: {}", mask_webhook_url(&config.webhook_url));

    if config.coingecko_api_key.is_some() {
        info!("   CoinGecko: Pro API enabled");
    } else {
        info!("   CoinGecko: Free tier (may have rate limits)");
    }

    let resolver = MetadataResolver::new(
        Arc::new(HttpMetadataFetcher::new()?),
        RetryPolicy::default(),
    );
    let oracle = PriceOracle::new(Arc::new(CoinGeckoSource::new(
        config.coingecko_api_key.clone(),
    )?));
    let notifier = Arc::new(WebhookNotifier::new(config.webhook_url.clone())?);
    let pipeline = Arc::new(Pipeline::new(resolver, oracle, notifier));

    let transport = Arc::new(PumpPortalTransport::new(config.feed_url.clone()));
    let tracker = CoinTracker::new(transport, Arc::clone(&pipeline));
    tracker.start();

    info!("✨ Tracker is running!");
    info!("Press Ctrl+C to shutdown");

    tokio::signal::ctrl_c().await?;
    info!("👋 Shutting down gracefully...");

    tracker.stop().await;

    let stats = pipeline.counters().snapshot();
    info!(
        "📊 Session totals: {} events, {} duplicates skipped, {} alerts sent, {} failed",
        stats.events_received, stats.duplicates_skipped, stats.alerts_sent, stats.alert_failures
    );

    Ok(())
}

fn mask_webhook_url(url: &str) -> String {
    match url.rfind('/') {
        Some(pos) if pos + 1 < url.len() => format!("{}/****", &url[..pos]),
        _ => url.to_string(),
    }
}
