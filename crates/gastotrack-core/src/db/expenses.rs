//! Expense operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::expense_filter::ExpenseFilter;
use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Category, Expense, NewExpense};

const EXPENSE_COLUMNS: &str =
    "id, description, amount, category, origin, date, created_at, updated_at";

impl Database {
    /// Insert an expense and return the stored record with its assigned id
    /// and server timestamps.
    pub fn insert_expense(&self, new: &NewExpense) -> Result<Expense> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO expenses (description, amount, category, origin, date)
             VALUES (?, ?, ?, ?, ?)",
            params![
                new.description,
                new.amount,
                new.category.as_str(),
                new.origin,
                new.date,
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.get_expense(id)?
            .ok_or_else(|| Error::NotFound(format!("Expense {} vanished after insert", id)))
    }

    /// Get a single expense by id
    pub fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses WHERE id = ?",
            EXPENSE_COLUMNS
        ))?;

        let expense = stmt
            .query_row(params![id], |row| Self::row_to_expense(row))
            .optional()?;

        Ok(expense)
    }

    /// List expenses ordered by date descending, with optional category and
    /// inclusive date-range filters. Returns the page of records plus the
    /// total count matching the filters.
    pub fn list_expenses(
        &self,
        page: i64,
        per_page: i64,
        category: Option<Category>,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<(Vec<Expense>, i64)> {
        let conn = self.conn()?;

        let category_buf = category.map(|c| [c]);
        let filter = ExpenseFilter::new()
            .categories(category_buf.as_ref().map(|c| c.as_slice()))
            .date_from(date_from)
            .date_to(date_to)
            .build();

        let count: i64 = {
            let mut stmt = conn.prepare(&filter.build_count_query())?;
            stmt.query_row(filter.params_refs().as_slice(), |row| row.get(0))?
        };

        let sql = format!(
            "SELECT {} FROM expenses {} {} LIMIT ? OFFSET ?",
            EXPENSE_COLUMNS, filter.where_clause, filter.order_clause
        );
        let offset = (page.max(1) - 1) * per_page;

        let mut params = filter.params;
        params.push(Box::new(per_page));
        params.push(Box::new(offset));

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let expenses = stmt
            .query_map(params_refs.as_slice(), |row| Self::row_to_expense(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok((expenses, count))
    }

    /// Replace an expense's fields and refresh `updated_at`, preserving
    /// `created_at`. Returns `None` when the id does not exist.
    pub fn update_expense(&self, id: i64, new: &NewExpense) -> Result<Option<Expense>> {
        let conn = self.conn()?;

        let changed = conn.execute(
            "UPDATE expenses
             SET description = ?, amount = ?, category = ?, origin = ?, date = ?,
                 updated_at = CURRENT_TIMESTAMP
             WHERE id = ?",
            params![
                new.description,
                new.amount,
                new.category.as_str(),
                new.origin,
                new.date,
                id,
            ],
        )?;

        if changed == 0 {
            return Ok(None);
        }
        self.get_expense(id)
    }

    /// Hard-delete an expense, returning the removed record so callers can
    /// confirm what was deleted. `None` when the id does not exist (a second
    /// delete of the same id is a not-found, not an error).
    pub fn delete_expense(&self, id: i64) -> Result<Option<Expense>> {
        let Some(expense) = self.get_expense(id)? else {
            return Ok(None);
        };

        let conn = self.conn()?;
        conn.execute("DELETE FROM expenses WHERE id = ?", params![id])?;

        Ok(Some(expense))
    }

    /// Run a filter query, ordered by date descending
    pub fn filter_expenses(&self, filter: ExpenseFilter) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let built = filter.build();

        let sql = format!(
            "SELECT {} FROM expenses {} {}",
            EXPENSE_COLUMNS, built.where_clause, built.order_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let expenses = stmt
            .query_map(built.params_refs().as_slice(), |row| {
                Self::row_to_expense(row)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Count all stored expenses
    pub fn count_expenses(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Helper to convert a row to Expense
    /// Column order: id, description, amount, category, origin, date,
    ///               created_at, updated_at
    pub(crate) fn row_to_expense(row: &rusqlite::Row) -> rusqlite::Result<Expense> {
        let category_str: String = row.get(3)?;
        let created_at_str: String = row.get(6)?;
        let updated_at_str: String = row.get(7)?;
        Ok(Expense {
            id: row.get(0)?,
            description: row.get(1)?,
            amount: row.get(2)?,
            category: category_str.parse().unwrap_or(Category::Other),
            origin: row.get(4)?,
            date: row.get(5)?,
            created_at: parse_datetime(&created_at_str),
            updated_at: parse_datetime(&updated_at_str),
        })
    }
}
