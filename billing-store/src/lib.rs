//! # Billing Store
//!
//! Concrete persistence adapter for the billing service.
//! This crate provides the SQLite adapter that implements the
//! `BillingStore` port.

pub mod sqlite;

mod types;

#[cfg(test)]
mod sqlite_tests;

pub use sqlite::SqliteStore;

/// Build and initialize a store from a database URL.
///
/// This function:
/// 1. Connects to the database
/// 2. Applies the schema (idempotent, `IF NOT EXISTS`)
/// 3. Returns a ready-to-use `SqliteStore`
///
/// # Examples
///
/// ```ignore
/// let store = build_store("sqlite://billing.db?mode=rwc").await?;
/// ```
pub async fn build_store(database_url: &str) -> anyhow::Result<SqliteStore> {
    SqliteStore::new(database_url).await
}
