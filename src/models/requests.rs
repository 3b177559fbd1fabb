//! Query-string DTOs for the HTTP routes
//!
//! Every field is optional text; unparseable numbers fall back to the
//! route default instead of rejecting the request.

use serde::Deserialize;

use crate::market::MarketsQuery;

/// Query of `GET /api/market/data`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketDataParams {
    pub vs_currency: Option<String>,
    pub category: Option<String>,
    pub order: Option<String>,
    pub per_page: Option<String>,
    pub page: Option<String>,
    pub sparkline: Option<String>,
    pub price_change_percentage: Option<String>,
}

impl MarketDataParams {
    /// Applies route defaults. `sparkline` is on unless given as `false`.
    pub fn into_query(self) -> MarketsQuery {
        let defaults = MarketsQuery::default();

        MarketsQuery {
            vs_currency: non_empty(self.vs_currency).unwrap_or(defaults.vs_currency),
            category: non_empty(self.category).unwrap_or(defaults.category),
            order: non_empty(self.order).unwrap_or(defaults.order),
            per_page: parse_or(self.per_page, defaults.per_page),
            page: parse_or(self.page, defaults.page),
            sparkline: self.sparkline.as_deref() != Some("false"),
            price_change_percentage: non_empty(self.price_change_percentage)
                .unwrap_or(defaults.price_change_percentage),
        }
    }
}

/// Query of `GET /api/token/:id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenParams {
    pub days: Option<String>,
}

impl TokenParams {
    pub const DEFAULT_DAYS: u32 = 7;

    pub fn days(&self) -> u32 {
        parse_or(self.days.clone(), Self::DEFAULT_DAYS)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_or(value: Option<String>, default: u32) -> u32 {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = MarketDataParams::default().into_query();
        assert_eq!(query, MarketsQuery::default());
        assert!(query.sparkline);
    }

    #[test]
    fn test_overrides() {
        let params: MarketDataParams = serde_json::from_str(
            r#"{"vs_currency":"eur","per_page":"2","page":"3","sparkline":"false"}"#,
        )
        .unwrap();

        let query = params.into_query();
        assert_eq!(query.vs_currency, "eur");
        assert_eq!(query.per_page, 2);
        assert_eq!(query.page, 3);
        assert!(!query.sparkline);
        assert_eq!(query.category, "solana-ecosystem");
    }

    #[test]
    fn test_bad_numbers_fall_back() {
        let params = MarketDataParams {
            per_page: Some("lots".to_string()),
            page: Some("-1".to_string()),
            sparkline: Some("no".to_string()),
            ..MarketDataParams::default()
        };

        let query = params.into_query();
        assert_eq!(query.per_page, 50);
        assert_eq!(query.page, 1);
        // Only the literal "false" disables sparklines
        assert!(query.sparkline);
    }

    #[test]
    fn test_token_days() {
        assert_eq!(TokenParams::default().days(), 7);
        assert_eq!(
            TokenParams {
                days: Some("30".to_string())
            }
            .days(),
            30
        );
        assert_eq!(
            TokenParams {
                days: Some("max".to_string())
            }
            .days(),
            7
        );
    }
}
