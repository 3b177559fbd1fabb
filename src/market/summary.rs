//! Dashboard view of a single token: detail and price chart merged.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenImage {
    pub small: Option<String>,
    pub thumb: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenLinks {
    pub homepage: String,
    pub blockchain_site: String,
    pub official_forum: String,
    pub twitter: String,
    pub telegram: String,
    pub github: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenMarketData {
    pub current_price: f64,
    pub market_cap: f64,
    pub total_volume: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    pub price_change_percentage_24h: f64,
    pub price_change_percentage_7d: f64,
    pub price_change_percentage_30d: f64,
    pub circulating_supply: f64,
    pub total_supply: f64,
    pub max_supply: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityData {
    pub twitter_followers: f64,
    pub telegram_channel_user_count: f64,
    pub reddit_subscribers: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub prices: Value,
    pub market_caps: Value,
    pub total_volumes: Value,
    pub timeframe: String,
}

// == Token Summary ==
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenSummary {
    pub id: Value,
    pub name: Value,
    pub symbol: String,
    pub description: String,
    pub image: TokenImage,
    pub links: TokenLinks,
    pub market_data: TokenMarketData,
    pub community_data: CommunityData,
    pub chart_data: ChartData,
    pub last_updated: Value,
    pub timestamp: String,
    pub ecosystem: &'static str,
}

impl TokenSummary {
    /// Reshapes `/coins/{id}` and `/coins/{id}/market_chart` payloads.
    ///
    /// Absent numbers become 0, absent strings become empty, and prices are
    /// read in USD.
    pub fn from_upstream(token: &Value, chart: &Value, days: u32) -> Self {
        Self {
            id: field(token, "/id"),
            name: field(token, "/name"),
            symbol: text(token, "/symbol").to_uppercase(),
            description: text(token, "/description/en"),
            image: TokenImage {
                small: opt_text(token, "/image/small"),
                thumb: opt_text(token, "/image/thumb"),
            },
            links: TokenLinks {
                homepage: text(token, "/links/homepage/0"),
                blockchain_site: text(token, "/links/blockchain_site/0"),
                official_forum: text(token, "/links/official_forum_url/0"),
                twitter: text(token, "/links/twitter_screen_name"),
                telegram: text(token, "/links/telegram_channel_identifier"),
                github: text(token, "/links/repos_url/github/0"),
            },
            market_data: TokenMarketData {
                current_price: number(token, "/market_data/current_price/usd"),
                market_cap: number(token, "/market_data/market_cap/usd"),
                total_volume: number(token, "/market_data/total_volume/usd"),
                high_24h: number(token, "/market_data/high_24h/usd"),
                low_24h: number(token, "/market_data/low_24h/usd"),
                price_change_percentage_24h: number(token, "/market_data/price_change_percentage_24h"),
                price_change_percentage_7d: number(token, "/market_data/price_change_percentage_7d"),
                price_change_percentage_30d: number(token, "/market_data/price_change_percentage_30d"),
                circulating_supply: number(token, "/market_data/circulating_supply"),
                total_supply: number(token, "/market_data/total_supply"),
                max_supply: number(token, "/market_data/max_supply"),
            },
            community_data: CommunityData {
                twitter_followers: number(token, "/community_data/twitter_followers"),
                telegram_channel_user_count: number(
                    token,
                    "/community_data/telegram_channel_user_count",
                ),
                reddit_subscribers: number(token, "/community_data/reddit_subscribers"),
            },
            chart_data: ChartData {
                prices: field(chart, "/prices"),
                market_caps: field(chart, "/market_caps"),
                total_volumes: field(chart, "/total_volumes"),
                timeframe: timeframe(days),
            },
            last_updated: field(token, "/last_updated"),
            timestamp: Utc::now().to_rfc3339(),
            ecosystem: "solana",
        }
    }
}

fn timeframe(days: u32) -> String {
    if days > 1 {
        format!("{} days", days)
    } else {
        format!("{} day", days)
    }
}

fn field(value: &Value, pointer: &str) -> Value {
    value.pointer(pointer).cloned().unwrap_or(Value::Null)
}

fn opt_text(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn text(value: &Value, pointer: &str) -> String {
    opt_text(value, pointer).unwrap_or_default()
}

fn number(value: &Value, pointer: &str) -> f64 {
    value.pointer(pointer).and_then(Value::as_f64).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn solana_detail() -> Value {
        json!({
            "id": "solana",
            "name": "Solana",
            "symbol": "sol",
            "description": {"en": "High-throughput L1"},
            "image": {"small": "https://img/sol-small.png", "thumb": "https://img/sol-thumb.png"},
            "links": {
                "homepage": ["https://solana.com", ""],
                "twitter_screen_name": "solana",
                "repos_url": {"github": ["https://github.com/solana-labs/solana"]}
            },
            "market_data": {
                "current_price": {"usd": 150.25},
                "market_cap": {"usd": 7.0e10},
                "price_change_percentage_24h": -1.5,
                "max_supply": null
            },
            "community_data": {"twitter_followers": 2500000},
            "last_updated": "2026-10-18T00:00:00.000Z"
        })
    }

    #[test]
    fn test_reshape() {
        let chart = json!({"prices": [[1, 150.0]], "market_caps": [[1, 7.0e10]], "total_volumes": [[1, 2.0e9]]});

        let summary = TokenSummary::from_upstream(&solana_detail(), &chart, 7);

        assert_eq!(summary.id, json!("solana"));
        assert_eq!(summary.symbol, "SOL");
        assert_eq!(summary.description, "High-throughput L1");
        assert_eq!(summary.links.homepage, "https://solana.com");
        assert_eq!(summary.links.blockchain_site, "");
        assert_eq!(summary.links.github, "https://github.com/solana-labs/solana");
        assert_eq!(summary.market_data.current_price, 150.25);
        assert_eq!(summary.market_data.total_volume, 0.0);
        assert_eq!(summary.market_data.max_supply, 0.0);
        assert_eq!(summary.market_data.price_change_percentage_24h, -1.5);
        assert_eq!(summary.community_data.twitter_followers, 2_500_000.0);
        assert_eq!(summary.chart_data.prices, json!([[1, 150.0]]));
        assert_eq!(summary.chart_data.timeframe, "7 days");
        assert_eq!(summary.ecosystem, "solana");
    }

    #[test]
    fn test_timeframe_singular() {
        assert_eq!(timeframe(1), "1 day");
        assert_eq!(timeframe(30), "30 days");
    }

    #[test]
    fn test_sparse_payload() {
        let summary = TokenSummary::from_upstream(&json!({}), &json!({}), 1);

        assert_eq!(summary.symbol, "");
        assert_eq!(summary.id, Value::Null);
        assert!(summary.image.small.is_none());
        assert_eq!(summary.chart_data.prices, Value::Null);
    }
}
