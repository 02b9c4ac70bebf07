//! Reports
//!
//! Aggregates the sales history into the summary shapes the accounting view
//! and export collaborators consume. Pure functions over [`Sale`] records;
//! nothing here touches engine state.

use jiff::tz::TimeZone;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::sales::Sale;

/// Number of trailing active days kept in the daily trend.
const DAILY_TREND_DAYS: usize = 7;

/// Revenue recorded on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRevenue {
    /// Calendar day, ISO-8601 (`YYYY-MM-DD`), UTC.
    pub date: String,

    /// Summed sale totals for that day.
    pub amount: Decimal,
}

/// Aggregated view of the sales history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSummary {
    /// Sum of all sale totals.
    pub total_revenue: Decimal,

    /// Number of completed sales.
    pub total_sales: usize,

    /// Name of the product with the highest summed quantity across all
    /// sales, `"N/A"` when the history is empty.
    pub top_selling_product: String,

    /// Per-day revenue, chronological, limited to the last
    /// [`DAILY_TREND_DAYS`] days with at least one sale.
    pub daily_sales: Vec<DailyRevenue>,
}

/// Summarizes a sales history, newest first or in any order.
pub fn summarize(sales: &[Sale]) -> SalesSummary {
    let total_revenue = sales.iter().map(Sale::total).sum();

    SalesSummary {
        total_revenue,
        total_sales: sales.len(),
        top_selling_product: top_selling_product(sales),
        daily_sales: daily_sales(sales),
    }
}

fn top_selling_product(sales: &[Sale]) -> String {
    let mut quantities: FxHashMap<&str, u64> = FxHashMap::default();

    for sale in sales {
        for line in sale.items() {
            *quantities.entry(line.product().name.as_str()).or_default() +=
                u64::from(line.quantity());
        }
    }

    let mut ranked: Vec<(&str, u64)> = quantities.into_iter().collect();
    // Quantity descending, name ascending so ties are deterministic.
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    ranked
        .first()
        .map_or_else(|| "N/A".to_string(), |(name, _)| (*name).to_string())
}

fn daily_sales(sales: &[Sale]) -> Vec<DailyRevenue> {
    let mut by_day: FxHashMap<String, Decimal> = FxHashMap::default();

    for sale in sales {
        let day = sale.date().to_zoned(TimeZone::UTC).date().to_string();
        *by_day.entry(day).or_default() += sale.total();
    }

    let mut days: Vec<DailyRevenue> = by_day
        .into_iter()
        .map(|(date, amount)| DailyRevenue { date, amount })
        .collect();

    // ISO dates sort lexicographically in chronological order.
    days.sort_by(|a, b| a.date.cmp(&b.date));

    let skip = days.len().saturating_sub(DAILY_TREND_DAYS);
    days.split_off(skip)
}
