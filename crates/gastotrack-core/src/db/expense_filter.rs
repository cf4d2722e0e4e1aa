//! Expense filter builder for constructing dynamic SQL queries
//!
//! Builder pattern producing the WHERE clause and parameters shared by the
//! filtered listing and its count query, so the two never drift apart.

use chrono::NaiveDate;

use super::DATE_KEY_SQL;
use crate::models::Category;

/// Builder for expense query predicates. All criteria are optional and
/// combined with AND.
///
/// The lifetime `'query` covers borrowed criteria (search text, origin,
/// category list) for the duration of the query.
#[derive(Default)]
pub struct ExpenseFilter<'query> {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub categories: Option<&'query [Category]>,
    pub origin: Option<&'query str>,
    pub amount_min: Option<f64>,
    pub amount_max: Option<f64>,
    pub search: Option<&'query str>,
}

/// Result of building a filter - SQL fragments plus bound parameters
pub struct FilterResult {
    /// WHERE clause including the "WHERE" keyword (empty if no conditions)
    pub where_clause: String,
    /// ORDER BY clause, date descending (chronological) with id tiebreak
    pub order_clause: String,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl FilterResult {
    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }

    /// Build a COUNT query over the same predicate
    pub fn build_count_query(&self) -> String {
        format!("SELECT COUNT(*) FROM expenses {}", self.where_clause)
    }
}

impl<'query> ExpenseFilter<'query> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inclusive lower date bound
    pub fn date_from(mut self, date: Option<NaiveDate>) -> Self {
        self.date_from = date;
        self
    }

    /// Inclusive upper date bound
    pub fn date_to(mut self, date: Option<NaiveDate>) -> Self {
        self.date_to = date;
        self
    }

    /// Match any of the given categories
    pub fn categories(mut self, categories: Option<&'query [Category]>) -> Self {
        self.categories = categories;
        self
    }

    /// Exact origin match
    pub fn origin(mut self, origin: Option<&'query str>) -> Self {
        self.origin = origin;
        self
    }

    /// Inclusive amount bounds
    pub fn amount_min(mut self, min: Option<f64>) -> Self {
        self.amount_min = min;
        self
    }

    pub fn amount_max(mut self, max: Option<f64>) -> Self {
        self.amount_max = max;
        self
    }

    /// Case-insensitive substring search on the description
    pub fn search(mut self, query: Option<&'query str>) -> Self {
        self.search = query;
        self
    }

    /// Build the filter components
    pub fn build(self) -> FilterResult {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(from) = self.date_from {
            conditions.push(format!("({}) >= ?", DATE_KEY_SQL));
            params.push(Box::new(from.format("%Y%m%d").to_string()));
        }

        if let Some(to) = self.date_to {
            conditions.push(format!("({}) <= ?", DATE_KEY_SQL));
            params.push(Box::new(to.format("%Y%m%d").to_string()));
        }

        if let Some(categories) = self.categories {
            if !categories.is_empty() {
                let placeholders: Vec<&str> = categories.iter().map(|_| "?").collect();
                conditions.push(format!("category IN ({})", placeholders.join(", ")));
                for category in categories {
                    params.push(Box::new(category.as_str()));
                }
            }
        }

        if let Some(origin) = self.origin {
            if !origin.trim().is_empty() {
                conditions.push("origin = ?".to_string());
                params.push(Box::new(origin.trim().to_string()));
            }
        }

        if let Some(min) = self.amount_min {
            conditions.push("amount >= ?".to_string());
            params.push(Box::new(min));
        }

        if let Some(max) = self.amount_max {
            conditions.push("amount <= ?".to_string());
            params.push(Box::new(max));
        }

        if let Some(q) = self.search {
            if !q.trim().is_empty() {
                conditions.push("description LIKE ? COLLATE NOCASE".to_string());
                params.push(Box::new(format!("%{}%", q.trim())));
            }
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        FilterResult {
            where_clause,
            order_clause: format!("ORDER BY ({}) DESC, id DESC", DATE_KEY_SQL),
            params,
        }
    }
}
