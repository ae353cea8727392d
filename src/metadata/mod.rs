pub mod socials;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::metadata::socials::{SocialLinks, extract_social_links};

pub const FALLBACK_IMAGE: &str = "https://solana.com/src/img/branding/solanaLogoMark.svg";

const IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Off-chain descriptive token record, resolved from the metadata URI.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub socials: SocialLinks,
}

impl TokenMetadata {
    pub fn fallback() -> Self {
        Self {
            name: String::new(),
            description: "Metadata unavailable".to_string(),
            image: FALLBACK_IMAGE.to_string(),
            socials: SocialLinks::default(),
        }
    }

    fn from_json(body: &Value) -> Self {
        let image = body
            .get("image")
            .or_else(|| body.get("image_url"))
            .and_then(Value::as_str)
            .unwrap_or(FALLBACK_IMAGE);

        Self {
            name: body
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            description: body
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            image: image.to_string(),
            socials: extract_social_links(body),
        }
    }
}

/// Fixed-delay retry policy; tests pass a zero-delay instance.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    async fn fetch_json(&self, url: &str) -> anyhow::Result<Value>;
}

pub struct HttpMetadataFetcher {
    client: reqwest::Client,
}

impl HttpMetadataFetcher {
    pub fn new() -> anyhow::Result<Self> {
        // Certificate validation is off on purpose: plenty of IPFS gateways
        // serve broken chains, and this metadata is cosmetic content only.
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .danger_accept_invalid_certs(true)
            .user_agent("Mozilla/5.0")
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl MetadataFetcher for HttpMetadataFetcher {
    async fn fetch_json(&self, url: &str) -> anyhow::Result<Value> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("metadata endpoint returned {}", response.status());
        }
        Ok(response.json().await?)
    }
}

/// Resolves token metadata URIs with an immutable per-URI cache. Never fails:
/// invalid URIs and exhausted retries both come back as the fallback record.
pub struct MetadataResolver {
    fetcher: Arc<dyn MetadataFetcher>,
    cache: Mutex<HashMap<String, TokenMetadata>>,
    retry: RetryPolicy,
}

impl MetadataResolver {
    pub fn new(fetcher: Arc<dyn MetadataFetcher>, retry: RetryPolicy) -> Self {
        Self {
            fetcher,
            cache: Mutex::new(HashMap::new()),
            retry,
        }
    }

    pub async fn resolve(&self, uri: &str) -> TokenMetadata {
        let Some(url) = normalize_uri(uri) else {
            return TokenMetadata::fallback();
        };

        if let Some(hit) = self.cache.lock().unwrap().get(&url) {
            return hit.clone();
        }

        for attempt in 1..=self.retry.max_attempts {
            match self.fetcher.fetch_json(&url).await {
                Ok(body) => {
                    let metadata = TokenMetadata::from_json(&body);
                    self.cache
                        .lock()
                        .unwrap()
                        .insert(url, metadata.clone());
                    return metadata;
                }
                Err(e) => {
                    debug!(
                        "metadata fetch {}/{} failed for {}: {}",
                        attempt, self.retry.max_attempts, url, e
                    );
                    if attempt < self.retry.max_attempts {
                        tokio::time::sleep(self.retry.delay).await;
                    }
                }
            }
        }

        warn!(
            "⚠️ metadata unavailable after {} attempts: {}",
            self.retry.max_attempts, url
        );
        // Not cached: the gateway may recover and a later caller should retry.
        TokenMetadata::fallback()
    }
}

/// Accepts absolute https URLs, upgrades plain http, and rewrites ipfs://
/// CIDs to a public gateway. Anything else resolves to the fallback without
/// touching the network.
fn normalize_uri(uri: &str) -> Option<String> {
    if uri.is_empty() {
        return None;
    }
    if let Some(cid) = uri.strip_prefix("ipfs://") {
        return Some(format!("{IPFS_GATEWAY}{cid}"));
    }
    if let Some(rest) = uri.strip_prefix("http://") {
        return Some(format!("https://{rest}"));
    }
    if uri.starts_with("https://") {
        return Some(uri.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FakeFetcher {
        calls: AtomicU32,
        response: Option<Value>,
    }

    impl FakeFetcher {
        fn succeeding(body: Value) -> Self {
            Self {
                calls: AtomicU32::new(0),
                response: Some(body),
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicU32::new(0),
                response: None,
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MetadataFetcher for FakeFetcher {
        async fn fetch_json(&self, _url: &str) -> anyhow::Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Some(body) => Ok(body.clone()),
                None => anyhow::bail!("gateway down"),
            }
        }
    }

    fn zero_delay() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_invalid_uris_fall_back_without_fetching() {
        let fetcher = Arc::new(FakeFetcher::succeeding(json!({})));
        let resolver = MetadataResolver::new(fetcher.clone(), zero_delay());

        for uri in ["", "not-a-url", "ftp://example.com/meta.json"] {
            let metadata = resolver.resolve(uri).await;
            assert_eq!(metadata, TokenMetadata::fallback());
        }
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_resolve_is_cached() {
        let body = json!({
            "name": "Coin",
            "description": "about",
            "image": "https://img.example/coin.png"
        });
        let fetcher = Arc::new(FakeFetcher::succeeding(body));
        let resolver = MetadataResolver::new(fetcher.clone(), zero_delay());

        let first = resolver.resolve("https://meta.example/coin.json").await;
        let second = resolver.resolve("https://meta.example/coin.json").await;

        assert_eq!(first.name, "Coin");
        assert_eq!(first.image, "https://img.example/coin.png");
        assert_eq!(first, second);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_retries_serve_uncached_fallback() {
        let fetcher = Arc::new(FakeFetcher::failing());
        let resolver = MetadataResolver::new(fetcher.clone(), zero_delay());

        let first = resolver.resolve("https://dead.example/meta.json").await;
        assert_eq!(first, TokenMetadata::fallback());
        assert_eq!(fetcher.calls(), 3);

        // The fallback is not cached, so the next caller retries the source.
        let _ = resolver.resolve("https://dead.example/meta.json").await;
        assert_eq!(fetcher.calls(), 6);
    }

    #[tokio::test]
    async fn test_image_url_alias_and_missing_image() {
        let fetcher = Arc::new(FakeFetcher::succeeding(json!({
            "name": "Alias",
            "image_url": "https://img.example/alias.png"
        })));
        let resolver = MetadataResolver::new(fetcher, zero_delay());
        let metadata = resolver.resolve("https://meta.example/alias.json").await;
        assert_eq!(metadata.image, "https://img.example/alias.png");

        let fetcher = Arc::new(FakeFetcher::succeeding(json!({"name": "NoImage"})));
        let resolver = MetadataResolver::new(fetcher, zero_delay());
        let metadata = resolver.resolve("https://meta.example/none.json").await;
        assert_eq!(metadata.image, FALLBACK_IMAGE);
    }

    #[test]
    fn test_normalize_uri() {
        assert_eq!(
            normalize_uri("ipfs://QmAbc").as_deref(),
            Some("https://ipfs.io/ipfs/QmAbc")
        );
        assert_eq!(
            normalize_uri("http://meta.example/a.json").as_deref(),
            Some("https://meta.example/a.json")
        );
        assert_eq!(
            normalize_uri("https://meta.example/a.json").as_deref(),
            Some("https://meta.example/a.json")
        );
        assert_eq!(normalize_uri(""), None);
        assert_eq!(normalize_uri("QmAbc"), None);
    }
}
