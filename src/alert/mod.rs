pub mod notifier;

use chrono::Utc;
use serde::Serialize;

use crate::feed::event::TokenCreationEvent;
use crate::metadata::TokenMetadata;
use crate::processor::calculator::DerivedMetrics;

const EMBED_COLOR_GREEN: u32 = 0x00FF00;
const PUMP_FUN_FAVICON: &str = "https://pump.fun/favicon.ico";

/// Discord webhook payload: a content line plus one embed.
#[derive(Debug, Clone, Serialize)]
pub struct AlertPayload {
    pub content: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Embed {
    pub color: u32,
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedThumbnail>,
    pub footer: EmbedFooter,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedThumbnail {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: String,
}

pub fn render_token_alert(
    event: &TokenCreationEvent,
    metadata: &TokenMetadata,
    metrics: &DerivedMetrics,
) -> AlertPayload {
    let mint = &event.mint;

    let mut fields = vec![
        EmbedField {
            name: "📜 Contract Address".to_string(),
            value: format!("```{mint}```"),
            inline: false,
        },
        EmbedField {
            name: "👷 Creator".to_string(),
            value: format!(
                "[{}](https://solscan.io/account/{})",
                short_address(&event.trader_public_key, 11),
                event.trader_public_key
            ),
            inline: false,
        },
        EmbedField {
            name: "📊 Token Info".to_string(),
            value: format!(
                "**MC:** ${}\n**Liq:** ${}",
                format_compact_number(metrics.market_cap_usd),
                format_compact_number(metrics.liquidity_usd)
            ),
            inline: true,
        },
        EmbedField {
            name: "💵 Price Info".to_string(),
            value: format!(
                "**Price:** ${:.10}\n**Dex:** [Pump.fun](https://pump.fun/{mint})",
                metrics.price_usd
            ),
            inline: true,
        },
    ];

    fields.push(EmbedField {
        name: String::new(),
        value: format!("**Social:** {}", format_social_links(metadata)),
        inline: false,
    });

    fields.push(EmbedField {
        name: "🔗 Links".to_string(),
        value: format!(
            "[PF](https://pump.fun/{mint}) ⋅ \
             [DEX](https://dexscreener.com/solana/{mint}) ⋅ \
             [SCAN](https://solscan.io/token/{mint}) ⋅ \
             [RUG](https://rugcheck.xyz/tokens/{mint})"
        ),
        inline: false,
    });

    AlertPayload {
        content: format!(
            "🚦 [{}](https://pump.fun/{mint}) - ${} `@Pump.fun New Token`",
            event.name, event.symbol
        ),
        embeds: vec![Embed {
            color: EMBED_COLOR_GREEN,
            fields,
            thumbnail: Some(EmbedThumbnail {
                url: metadata.image.clone(),
            }),
            footer: EmbedFooter {
                text: "Pump.fun Token Alert".to_string(),
                icon_url: PUMP_FUN_FAVICON.to_string(),
            },
            timestamp: Utc::now().to_rfc3339(),
        }],
    }
}

fn format_social_links(metadata: &TokenMetadata) -> String {
    let links: Vec<String> = [
        metadata
            .socials
            .website
            .as_ref()
            .map(|url| format!("[🌐 Website]({url})")),
        metadata
            .socials
            .twitter
            .as_ref()
            .map(|url| format!("[🐦 Twitter]({url})")),
        metadata
            .socials
            .telegram
            .as_ref()
            .map(|url| format!("[📢 Telegram]({url})")),
    ]
    .into_iter()
    .flatten()
    .collect();

    if links.is_empty() {
        "Not available".to_string()
    } else {
        links.join(" ")
    }
}

/// `1234.5` -> `1.2K`, `2_500_000` -> `2.5M`. Unknown values render "N/A".
pub fn format_compact_number(number: f64) -> String {
    if !number.is_finite() {
        return "N/A".to_string();
    }
    if number < 1_000.0 {
        format!("{number:.2}")
    } else if number < 1_000_000.0 {
        format!("{:.1}K", number / 1_000.0)
    } else if number < 1_000_000_000.0 {
        format!("{:.1}M", number / 1_000_000.0)
    } else {
        format!("{:.1}B", number / 1_000_000_000.0)
    }
}

pub fn short_address(address: &str, chars: usize) -> String {
    if address.is_empty() {
        return "N/A".to_string();
    }
    if address.len() <= chars * 2 {
        return address.to_string();
    }
    format!("{}...{}", &address[..chars], &address[address.len() - chars..])
}
