//! Init command and shared utilities

use std::path::Path;

use anyhow::{Context, Result};
use gastotrack_core::db::Database;
use gastotrack_core::models::Category;

/// Open the database, creating the schema if needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path.to_string_lossy();
    Database::new(&path_str).context("Failed to open database")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    println!("   Tables: expenses, budgets");
    println!("   Categories: {}", Category::allowed_list());
    println!("   Expenses: {}", db.count_expenses()?);

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Start the API: gastotrack serve");
    println!("  2. Create an expense: POST /api/gastos");

    Ok(())
}
