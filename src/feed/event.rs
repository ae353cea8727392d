use serde::Deserialize;

/// A "new token" record as delivered by the pumpportal feed. Only `mint` is
/// required; everything else is defaulted so partially populated frames still
/// parse and the metric math can degrade to zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenCreationEvent {
    pub mint: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default, rename = "traderPublicKey")]
    pub trader_public_key: String,
    #[serde(default, rename = "vTokensInBondingCurve")]
    pub v_tokens_in_bonding_curve: f64,
    #[serde(default, rename = "vSolInBondingCurve")]
    pub v_sol_in_bonding_curve: f64,
    #[serde(default, rename = "marketCapSol")]
    pub market_cap_sol: f64,
    #[serde(default, rename = "solAmount")]
    pub sol_amount: f64,
    #[serde(default)]
    pub pool: String,
}

impl TokenCreationEvent {
    /// Parse a raw feed frame. Subscription acks and other control frames
    /// carry no `mint` and fail here; the caller drops them at debug level.
    pub fn from_frame(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
