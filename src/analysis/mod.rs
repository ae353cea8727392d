pub mod holders;
pub mod security;

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::analysis::holders::{HolderBalance, HolderSummary, summarize_holders};
use crate::analysis::security::{SecurityFlags, SecuritySummary};

const PUMP_FUN_API: &str = "https://api.pump.fun";
const GOPLUS_API: &str = "https://api.gopluslabs.io/api/v1/token_security/solana";

/// On-demand token scan: holder concentration plus rug-risk flags. Each
/// section degrades to `None` when its upstream is unavailable.
#[derive(Debug, Clone)]
pub struct TokenReport {
    pub mint: String,
    pub holders: Option<HolderSummary>,
    pub security: Option<SecuritySummary>,
}

pub struct TokenScanner {
    client: reqwest::Client,
}

impl TokenScanner {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }

    pub async fn scan(&self, mint: &str) -> TokenReport {
        let (holders, security) = tokio::join!(self.fetch_holders(mint), self.fetch_security(mint));

        TokenReport {
            mint: mint.to_string(),
            holders: holders.unwrap_or_else(|e| {
                warn!("holder analysis failed for {}: {}", mint, e);
                None
            }),
            security: security.unwrap_or_else(|e| {
                warn!("security check failed for {}: {}", mint, e);
                None
            }),
        }
    }

    async fn fetch_holders(&self, mint: &str) -> anyhow::Result<Option<HolderSummary>> {
        #[derive(Deserialize)]
        struct HoldersResponse {
            #[serde(default)]
            holders: Vec<HolderBalance>,
            #[serde(default, rename = "totalSupply")]
            total_supply: f64,
            #[serde(default, rename = "totalHolders")]
            total_holders: u64,
        }

        let url = format!("{PUMP_FUN_API}/tokens/{mint}/holders");
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("holders endpoint returned {}", response.status());
        }

        let mut data: HoldersResponse = response.json().await?;

        // Some responses only carry raw amounts; derive shares from supply.
        if data.total_supply > 0.0 {
            for holder in &mut data.holders {
                if holder.pct == 0.0 && holder.amount > 0.0 {
                    holder.pct = (holder.amount / data.total_supply) * 100.0;
                }
            }
        }

        let total_holders = if data.total_holders > 0 {
            data.total_holders
        } else {
            data.holders.len() as u64
        };
        Ok(summarize_holders(total_holders, &data.holders))
    }

    async fn fetch_security(&self, mint: &str) -> anyhow::Result<Option<SecuritySummary>> {
        #[derive(Deserialize)]
        struct GoPlusResponse {
            #[serde(default)]
            result: HashMap<String, SecurityFlags>,
        }

        let url = format!("{GOPLUS_API}?contract_addresses={mint}");
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("security endpoint returned {}", response.status());
        }

        let data: GoPlusResponse = response.json().await?;
        Ok(data
            .result
            .into_values()
            .next()
            .map(SecuritySummary::from_flags))
    }
}
