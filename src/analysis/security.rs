use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Token-security flags in the GoPlus shape. The upstream encodes booleans
/// inconsistently ("0"/"1" strings, numbers, plain bools), so every flag goes
/// through one tolerant deserializer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityFlags {
    #[serde(default, deserialize_with = "de_flag")]
    pub is_proxy: bool,
    #[serde(default, deserialize_with = "de_flag")]
    pub is_mintable: bool,
    #[serde(default, deserialize_with = "de_flag")]
    pub anti_whale: bool,
    #[serde(default, deserialize_with = "de_flag")]
    pub can_take_back_ownership: bool,
    #[serde(default, deserialize_with = "de_flag")]
    pub hidden_owner: bool,
    #[serde(default, deserialize_with = "de_flag")]
    pub trading_cooldown: bool,
}

fn de_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::String(s) => s == "1" || s.eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    })
}

#[derive(Debug, Clone)]
pub struct SecuritySummary {
    pub flags: SecurityFlags,
    pub risk_score: u8,
}

impl SecuritySummary {
    pub fn from_flags(flags: SecurityFlags) -> Self {
        let risk_score = risk_score(&flags);
        Self { flags, risk_score }
    }
}

/// Weighted 0-100 rug-risk score; saturates at 100.
pub fn risk_score(flags: &SecurityFlags) -> u8 {
    let mut score: u32 = 0;
    if flags.is_proxy {
        score += 30;
    }
    if flags.is_mintable {
        score += 25;
    }
    if flags.hidden_owner {
        score += 20;
    }
    if flags.can_take_back_ownership {
        score += 15;
    }
    score.min(100) as u8
}
