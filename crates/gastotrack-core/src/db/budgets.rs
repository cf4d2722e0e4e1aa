//! Budget operations
//!
//! A budget scopes a monthly spending limit to one category in one
//! month/year. Nothing enforces uniqueness per (category, month, year);
//! lookups take the first match by insertion order.

use chrono::{Datelike, NaiveDate};
use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{AlertLevel, Budget, BudgetAlert, BudgetProgress, BudgetStatus, Category};
use crate::stats::{round1, round2};

/// Usage percentage at which a category shows up in the alert list
const ALERT_THRESHOLD: f64 = 80.0;

impl Database {
    /// Store a budget for the month/year of `today`, active by default
    pub fn create_budget(
        &self,
        category: Category,
        monthly_limit: f64,
        today: NaiveDate,
    ) -> Result<Budget> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO budgets (category, monthly_limit, month, year, active)
             VALUES (?, ?, ?, ?, 1)",
            params![
                category.as_str(),
                monthly_limit,
                today.month(),
                today.year(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        let budget = conn
            .query_row(
                "SELECT id, category, monthly_limit, month, year, active, created_at
                 FROM budgets WHERE id = ?",
                params![id],
                |row| Self::row_to_budget(row),
            )
            .optional()?;

        budget.ok_or_else(|| Error::NotFound(format!("Budget {} vanished after insert", id)))
    }

    /// All budgets still marked active
    pub fn list_active_budgets(&self) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, category, monthly_limit, month, year, active, created_at
             FROM budgets WHERE active = 1 ORDER BY id",
        )?;

        let budgets = stmt
            .query_map([], |row| Self::row_to_budget(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(budgets)
    }

    /// First active budget for (category, month, year), if any
    pub fn find_budget(
        &self,
        category: Category,
        month: u32,
        year: i32,
    ) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let budget = conn
            .query_row(
                "SELECT id, category, monthly_limit, month, year, active, created_at
                 FROM budgets
                 WHERE category = ? AND month = ? AND year = ? AND active = 1
                 ORDER BY id LIMIT 1",
                params![category.as_str(), month, year],
                |row| Self::row_to_budget(row),
            )
            .optional()?;

        Ok(budget)
    }

    /// Sum of expense amounts for a category in a given month/year, matching
    /// on the month and year parts of the stored `DD-MM-YYYY` date.
    pub fn month_spend(&self, category: Category, month: u32, year: i32) -> Result<f64> {
        let conn = self.conn()?;
        let spent: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0)
             FROM expenses
             WHERE category = ? AND substr(date, 4, 2) = ? AND substr(date, 7, 4) = ?",
            params![
                category.as_str(),
                format!("{:02}", month),
                year.to_string(),
            ],
            |row| row.get(0),
        )?;
        Ok(spent)
    }

    /// Month-to-date progress against the category's budget for the month of
    /// `today`. `None` means no budget exists, which is distinct from a
    /// zero-progress result.
    pub fn budget_progress(
        &self,
        category: Category,
        today: NaiveDate,
    ) -> Result<Option<BudgetProgress>> {
        let Some(budget) = self.find_budget(category, today.month(), today.year())? else {
            return Ok(None);
        };

        let spent = self.month_spend(category, today.month(), today.year())?;
        let percent_used = round1(spent / budget.monthly_limit * 100.0);

        Ok(Some(BudgetProgress {
            category,
            limit: budget.monthly_limit,
            spent: round2(spent),
            remaining: round2(budget.monthly_limit - spent),
            percent_used,
            status: BudgetStatus::from_percent(percent_used),
        }))
    }

    /// Categories at or above the alert threshold for the current month.
    /// 80-99% tags as warning, 100%+ as danger.
    pub fn budget_alerts(&self, today: NaiveDate) -> Result<Vec<BudgetAlert>> {
        let mut alerts = Vec::new();

        for category in Category::ALL {
            if let Some(progress) = self.budget_progress(category, today)? {
                if progress.percent_used >= ALERT_THRESHOLD {
                    alerts.push(BudgetAlert {
                        category,
                        percent: progress.percent_used,
                        level: if progress.percent_used < 100.0 {
                            AlertLevel::Warning
                        } else {
                            AlertLevel::Danger
                        },
                    });
                }
            }
        }

        Ok(alerts)
    }

    /// Helper to convert a row to Budget
    /// Column order: id, category, monthly_limit, month, year, active, created_at
    pub(crate) fn row_to_budget(row: &rusqlite::Row) -> rusqlite::Result<Budget> {
        let category_str: String = row.get(1)?;
        let active_int: i64 = row.get(5)?;
        let created_at_str: String = row.get(6)?;
        Ok(Budget {
            id: row.get(0)?,
            category: category_str.parse().unwrap_or(Category::Other),
            monthly_limit: row.get(2)?,
            month: row.get(3)?,
            year: row.get(4)?,
            active: active_int != 0,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
