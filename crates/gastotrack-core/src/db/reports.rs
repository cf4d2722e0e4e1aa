//! Category aggregation for the statistics endpoint

use super::Database;
use crate::error::Result;
use crate::models::Category;
use crate::stats::{self, round2, CategoryBreakdown, OverallSummary};

impl Database {
    /// Total spend per category over all stored expenses (only categories
    /// with at least one record appear)
    pub fn category_totals(&self) -> Result<Vec<(Category, f64)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT category, COALESCE(SUM(amount), 0)
             FROM expenses
             GROUP BY category",
        )?;

        let rows = stmt.query_map([], |row| {
            let category: String = row.get(0)?;
            let total: f64 = row.get(1)?;
            Ok((category, total))
        })?;

        let mut totals = Vec::new();
        for row in rows {
            let (category, total) = row?;
            if let Ok(category) = category.parse::<Category>() {
                totals.push((category, total));
            }
        }

        Ok(totals)
    }

    /// Per-category totals and percentages with display colors; every
    /// allowed category appears even at zero.
    pub fn category_breakdown(&self) -> Result<Vec<CategoryBreakdown>> {
        let totals = self.category_totals()?;
        Ok(stats::category_breakdown(&totals))
    }

    /// Overall total, mean and count across all expenses
    pub fn overall_summary(&self) -> Result<OverallSummary> {
        let conn = self.conn()?;
        let (total, count): (f64, i64) = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0), COUNT(*) FROM expenses",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let average = if count > 0 { total / count as f64 } else { 0.0 };

        Ok(OverallSummary {
            total: round2(total),
            average: round2(average),
            count,
        })
    }
}
