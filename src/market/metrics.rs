//! Aggregate metrics over a `/coins/markets` page.

use serde::Serialize;
use serde_json::Value;

/// Token with the largest or smallest 24h move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Performer {
    pub symbol: String,
    pub change: f64,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub id: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketMetrics {
    pub total_market_cap: f64,
    pub total_volume_24h: f64,
    pub positive_performers_24h: usize,
    pub negative_performers_24h: usize,
    pub best_performer: Option<Performer>,
    pub worst_performer: Option<Performer>,
}

/// Sums market cap and volume, counts gainers and losers, and picks the
/// best and worst 24h performers. Missing numbers count as zero; a
/// performer without a symbol is reported as `None`.
pub fn calculate_market_metrics(rows: &[Value]) -> MarketMetrics {
    let mut metrics = MarketMetrics::default();
    let mut best: Option<Performer> = None;
    let mut worst: Option<Performer> = None;

    for row in rows {
        metrics.total_market_cap += number(row, "market_cap");
        metrics.total_volume_24h += number(row, "total_volume");

        let change = number(row, "price_change_percentage_24h");
        if change > 0.0 {
            metrics.positive_performers_24h += 1;
        } else if change < 0.0 {
            metrics.negative_performers_24h += 1;
        }

        if best.as_ref().map_or(true, |b| change > b.change) {
            best = Some(performer(row, change));
        }
        if worst.as_ref().map_or(true, |w| change < w.change) {
            worst = Some(performer(row, change));
        }
    }

    metrics.best_performer = best.filter(|p| !p.symbol.is_empty());
    metrics.worst_performer = worst.filter(|p| !p.symbol.is_empty());
    metrics
}

fn number(row: &Value, field: &str) -> f64 {
    row.get(field).and_then(Value::as_f64).unwrap_or(0.0)
}

fn text(row: &Value, field: &str) -> Option<String> {
    row.get(field).and_then(Value::as_str).map(str::to_string)
}

fn performer(row: &Value, change: f64) -> Performer {
    Performer {
        symbol: text(row, "symbol").unwrap_or_default(),
        change,
        name: text(row, "name"),
        price: row.get("current_price").and_then(Value::as_f64),
        id: text(row, "id"),
        image: text(row, "image"),
    }
}
