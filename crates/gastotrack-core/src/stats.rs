//! Aggregate statistics over expense records
//!
//! Everything here is pure: summaries are computed over already-fetched
//! records and the suggested date ranges are a function of the given day,
//! which keeps all of it testable without a database.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

use crate::models::{format_date, Category, Expense};

/// Round to 2 decimals for money values
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to 1 decimal for percentages
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Subtotal for one category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    #[serde(rename = "categoria")]
    pub category: Category,
    pub total: f64,
}

/// Subtotal for one origin tag
#[derive(Debug, Clone, Serialize)]
pub struct OriginTotal {
    #[serde(rename = "origen")]
    pub origin: String,
    pub total: f64,
}

/// Summary of a filtered result set
#[derive(Debug, Clone, Serialize)]
pub struct FilterSummary {
    pub total: f64,
    #[serde(rename = "promedio")]
    pub average: f64,
    #[serde(rename = "cantidad")]
    pub count: usize,
    #[serde(rename = "por_categoria")]
    pub by_category: Vec<CategoryTotal>,
    #[serde(rename = "por_origen")]
    pub by_origin: Vec<OriginTotal>,
}

/// Overall totals across all stored expenses
#[derive(Debug, Clone, Serialize)]
pub struct OverallSummary {
    pub total: f64,
    #[serde(rename = "promedio")]
    pub average: f64,
    #[serde(rename = "cantidad")]
    pub count: i64,
}

/// Per-category slice of the overall spend, with display color
#[derive(Debug, Clone, Serialize)]
pub struct CategoryBreakdown {
    #[serde(rename = "categoria")]
    pub category: Category,
    pub total: f64,
    #[serde(rename = "porcentaje")]
    pub percent: f64,
    pub color: &'static str,
}

/// Compute total, mean, count and per-category/per-origin subtotals for an
/// already-filtered set of records. Empty input yields a zeroed summary.
pub fn summarize(expenses: &[Expense]) -> FilterSummary {
    if expenses.is_empty() {
        return FilterSummary {
            total: 0.0,
            average: 0.0,
            count: 0,
            by_category: Vec::new(),
            by_origin: Vec::new(),
        };
    }

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    let count = expenses.len();
    let average = total / count as f64;

    let mut categories: HashMap<Category, f64> = HashMap::new();
    let mut origins: HashMap<String, f64> = HashMap::new();
    for expense in expenses {
        *categories.entry(expense.category).or_default() += expense.amount;
        let origin = expense.origin.clone().unwrap_or_else(|| "Sin origen".to_string());
        *origins.entry(origin).or_default() += expense.amount;
    }

    let mut by_category: Vec<CategoryTotal> = categories
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category,
            total: round2(total),
        })
        .collect();
    // Descending by subtotal, name as tiebreak for deterministic output
    by_category.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });

    let mut by_origin: Vec<OriginTotal> = origins
        .into_iter()
        .map(|(origin, total)| OriginTotal {
            origin,
            total: round2(total),
        })
        .collect();
    by_origin.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.origin.cmp(&b.origin))
    });

    FilterSummary {
        total: round2(total),
        average: round2(average),
        count,
        by_category,
        by_origin,
    }
}

/// One named date-range shortcut
#[derive(Debug, Clone, Serialize)]
pub struct SuggestedRange {
    #[serde(rename = "inicio")]
    pub start: String,
    #[serde(rename = "fin")]
    pub end: String,
    pub label: &'static str,
}

/// The fixed set of quick-filter ranges
#[derive(Debug, Clone, Serialize)]
pub struct SuggestedRanges {
    pub hoy: SuggestedRange,
    pub esta_semana: SuggestedRange,
    pub este_mes: SuggestedRange,
    pub ultimos_7_dias: SuggestedRange,
    pub ultimos_30_dias: SuggestedRange,
}

/// Named date-range shortcuts for the given day, all in `DD-MM-YYYY`
pub fn suggested_ranges(today: NaiveDate) -> SuggestedRanges {
    let range = |start: NaiveDate, label: &'static str| SuggestedRange {
        start: format_date(start),
        end: format_date(today),
        label,
    };

    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    let first_of_month = today.with_day(1).unwrap_or(today);

    SuggestedRanges {
        hoy: range(today, "Hoy"),
        esta_semana: range(monday, "Esta semana"),
        este_mes: range(first_of_month, "Este mes"),
        ultimos_7_dias: range(today - Duration::days(7), "Últimos 7 días"),
        ultimos_30_dias: range(today - Duration::days(30), "Últimos 30 días"),
    }
}

/// Turn per-category totals into the breakdown used by the statistics
/// endpoint. Every allowed category appears, zero-total ones included;
/// percentages are 0 across the board when the grand total is 0.
pub fn category_breakdown(totals: &[(Category, f64)]) -> Vec<CategoryBreakdown> {
    let by_category: HashMap<Category, f64> = totals.iter().copied().collect();
    let grand_total: f64 = totals.iter().map(|(_, t)| t).sum();

    Category::ALL
        .iter()
        .map(|&category| {
            let total = by_category.get(&category).copied().unwrap_or(0.0);
            let percent = if grand_total > 0.0 {
                round2(total / grand_total * 100.0)
            } else {
                0.0
            };
            CategoryBreakdown {
                category,
                total: round2(total),
                percent,
                color: category.color(),
            }
        })
        .collect()
}
