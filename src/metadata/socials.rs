use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

/// Social links recovered from token metadata. Attributes take priority over
/// the free-text description scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SocialLinks {
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
}

lazy_static! {
    static ref TWITTER_RE: Regex =
        Regex::new(r"(?i)(twitter\.com/[a-z0-9_]+|@[a-z0-9_]+)").unwrap();
    static ref TELEGRAM_RE: Regex = Regex::new(r"(?i)(t\.me/[a-z0-9_]+|@[a-z0-9_]+)").unwrap();
    static ref WEBSITE_RE: Regex = Regex::new(r"(?i)https?://[^\s]+").unwrap();
}

pub fn extract_social_links(metadata: &Value) -> SocialLinks {
    let mut socials = SocialLinks::default();

    if let Some(attributes) = metadata.get("attributes").and_then(Value::as_array) {
        for attr in attributes {
            let trait_type = attr
                .get("trait_type")
                .or_else(|| attr.get("key"))
                .and_then(Value::as_str);
            let value = attr.get("value").and_then(Value::as_str);
            let (Some(trait_type), Some(value)) = (trait_type, value) else {
                continue;
            };

            let lower = trait_type.to_lowercase();
            if lower.contains("twitter") {
                socials.twitter = Some(normalize_handle(value, "https://twitter.com/"));
            } else if lower.contains("website") || lower.contains("url") {
                socials.website = Some(if value.starts_with("http") {
                    value.to_string()
                } else {
                    format!("https://{value}")
                });
            } else if lower.contains("telegram") {
                socials.telegram = Some(normalize_handle(value, "https://t.me/"));
            }
        }
    }

    if let Some(description) = metadata.get("description").and_then(Value::as_str) {
        if socials.twitter.is_none() {
            if let Some(found) = TWITTER_RE.find(description) {
                socials.twitter = Some(normalize_match(found.as_str(), "https://twitter.com/"));
            }
        }
        if socials.telegram.is_none() {
            if let Some(found) = TELEGRAM_RE.find(description) {
                socials.telegram = Some(normalize_match(found.as_str(), "https://t.me/"));
            }
        }
        if socials.website.is_none() {
            if let Some(found) = WEBSITE_RE.find(description) {
                socials.website = Some(found.as_str().to_string());
            }
        }
    }

    socials
}

/// Attribute values may be a full URL or a bare handle like `@coin`.
fn normalize_handle(value: &str, prefix: &str) -> String {
    if value.starts_with("http") {
        value.to_string()
    } else {
        format!("{prefix}{}", value.trim_start_matches('@'))
    }
}

/// Description matches are either a bare `@handle` or a domain path with no
/// scheme.
fn normalize_match(found: &str, prefix: &str) -> String {
    if let Some(handle) = found.strip_prefix('@') {
        format!("{prefix}{handle}")
    } else {
        format!("https://{found}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_from_attributes() {
        let metadata = json!({
            "attributes": [
                {"trait_type": "Twitter", "value": "@mycoin"},
                {"trait_type": "Website", "value": "mycoin.xyz"},
                {"trait_type": "Telegram", "value": "https://t.me/mycoin"}
            ]
        });
        let socials = extract_social_links(&metadata);
        assert_eq!(socials.twitter.as_deref(), Some("https://twitter.com/mycoin"));
        assert_eq!(socials.website.as_deref(), Some("https://mycoin.xyz"));
        assert_eq!(socials.telegram.as_deref(), Some("https://t.me/mycoin"));
    }

    #[test]
    fn test_attributes_win_over_description() {
        let metadata = json!({
            "description": "follow twitter.com/other for updates",
            "attributes": [
                {"trait_type": "twitter handle", "value": "@primary"}
            ]
        });
        let socials = extract_social_links(&metadata);
        assert_eq!(
            socials.twitter.as_deref(),
            Some("https://twitter.com/primary")
        );
    }

    #[test]
    fn test_description_scan_fills_missing_fields() {
        let metadata = json!({
            "description": "Community at t.me/coinchat, site https://coin.example"
        });
        let socials = extract_social_links(&metadata);
        assert_eq!(socials.telegram.as_deref(), Some("https://t.me/coinchat"));
        assert_eq!(socials.website.as_deref(), Some("https://coin.example"));
    }

    #[test]
    fn test_bare_handle_fills_both_handle_fields() {
        // A lone "@handle" matches both the twitter and the telegram pattern;
        // each empty slot picks it up.
        let metadata = json!({"description": "find us @bonobo"});
        let socials = extract_social_links(&metadata);
        assert_eq!(socials.twitter.as_deref(), Some("https://twitter.com/bonobo"));
        assert_eq!(socials.telegram.as_deref(), Some("https://t.me/bonobo"));
    }

    #[test]
    fn test_empty_metadata_yields_no_links() {
        assert_eq!(extract_social_links(&json!({})), SocialLinks::default());
    }
}
