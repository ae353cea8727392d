use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub const PRICE_CACHE_TTL: Duration = Duration::from_secs(300);

const COINGECKO_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=solana&vs_currencies=usd";

#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_usd(&self) -> anyhow::Result<f64>;
}

pub struct CoinGeckoSource {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl CoinGeckoSource {
    pub fn new(api_key: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl PriceSource for CoinGeckoSource {
    async fn fetch_usd(&self) -> anyhow::Result<f64> {
        let mut request = self
            .client
            .get(COINGECKO_URL)
            .header("User-Agent", "Mozilla/5.0")
            .header("Accept", "application/json");

        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            anyhow::bail!("CoinGecko API error: {}", response.status());
        }

        #[derive(Deserialize)]
        struct CoinGeckoResponse {
            solana: SolanaPrice,
        }

        #[derive(Deserialize)]
        struct SolanaPrice {
            usd: f64,
        }

        let data: CoinGeckoResponse = response.json().await?;
        Ok(data.solana.usd)
    }
}

struct PriceCacheEntry {
    value: Option<f64>,
    fetched_at: Option<Instant>,
}

/// Single-entry SOL/USD cache with a TTL. A refresh failure keeps the old
/// value (and its age), so the next caller retries the source; `None` means
/// the price has never been fetched and callers should render "N/A".
pub struct PriceOracle {
    source: Arc<dyn PriceSource>,
    ttl: Duration,
    cache: Mutex<PriceCacheEntry>,
}

impl PriceOracle {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self::with_ttl(source, PRICE_CACHE_TTL)
    }

    pub fn with_ttl(source: Arc<dyn PriceSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cache: Mutex::new(PriceCacheEntry {
                value: None,
                fetched_at: None,
            }),
        }
    }

    pub async fn usd_price(&self) -> Option<f64> {
        let mut cache = self.cache.lock().await;

        let fresh = cache
            .fetched_at
            .map(|at| at.elapsed() < self.ttl)
            .unwrap_or(false);
        if fresh {
            return cache.value;
        }

        match self.source.fetch_usd().await {
            Ok(value) => {
                debug!("💰 SOL price refreshed: ${:.2}", value);
                cache.value = Some(value);
                cache.fetched_at = Some(Instant::now());
            }
            Err(e) => {
                warn!("⚠️ SOL price refresh failed, serving cached value: {}", e);
            }
        }

        cache.value
    }
}
