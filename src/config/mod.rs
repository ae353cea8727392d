use anyhow::Result;
use std::env;

pub const DEFAULT_FEED_URL: &str = "wss://pumpportal.fun/api/data";

#[derive(Debug, Clone)]
pub struct Config {
  pub webhook_url: String,
  pub feed_url: String,
  pub coingecko_api_key: Option<String>,
}

impl Config {
  pub fn from_env() -> Result<Self> {
    dotenv::dotenv().ok();

    Ok(Self {
      webhook_url: env::var("DISCORD_WEBHOOK_URL")
        .expect("DISCORD_WEBHOOK_URL must be set in .env"),

      feed_url: env::var("FEED_URL")
        .unwrap_or_else(|_| DEFAULT_FEED_URL.to_string()),

      coingecko_api_key: env::var("COINGECKO_API_KEY").ok(),
    })
  }
}
