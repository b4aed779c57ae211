//! SQLite store adapter.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use billing_types::{
    BillingStore, CreatePaymentRequest, Invoice, InvoiceDraft, Payment, PaymentId, PaymentStatus,
    StoreError, Transaction, TransactionId,
};

use crate::types::{DbInvoice, DbPayment, DbPaymentState, DbTransaction};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Store
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite store implementation.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Creates a new SQLite store with automatic schema setup.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        let store = Self { pool };
        store.apply_schema().await?;

        tracing::info!("billing database schema initialized");

        Ok(store)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Applies the schema DDL. Idempotent: every statement is
    /// `CREATE TABLE IF NOT EXISTS`.
    pub async fn apply_schema(&self) -> Result<(), StoreError> {
        let ddl = include_str!("../migrations/0001_create_tables.sql");
        sqlx::raw_sql(ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }
}

/// True when `err` is a UNIQUE violation on the given column
/// (SQLite reports the column as `table.column` in the message).
fn is_unique_violation(err: &sqlx::Error, column: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation() && db.message().contains(column),
        _ => false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Store implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl BillingStore for SqliteStore {
    async fn insert_payment(&self, req: CreatePaymentRequest) -> Result<Payment, StoreError> {
        let now = chrono::Utc::now();
        let now_str = now.to_rfc3339();
        let status = PaymentStatus::Pending;

        let result = sqlx::query(
            r#"INSERT INTO payments (order_id, user_id, total_amount, method, status, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&req.order_id)
        .bind(req.user_id)
        .bind(req.total_amount)
        .bind(&req.method)
        .bind(status.to_string())
        .bind(&now_str)
        .bind(&now_str)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "payments.order_id") {
                StoreError::DuplicateOrder(req.order_id.clone())
            } else {
                StoreError::Database(e.to_string())
            }
        })?;

        Ok(Payment::from_parts(
            PaymentId::from_i64(result.last_insert_rowid()),
            req.order_id,
            req.user_id,
            req.total_amount,
            req.method,
            status,
            now,
            now,
        ))
    }

    async fn get_payment(&self, id: PaymentId) -> Result<Option<Payment>, StoreError> {
        let row: Option<DbPayment> = sqlx::query_as(
            r#"SELECT id, order_id, user_id, total_amount, method, status, created_at, updated_at
               FROM payments WHERE id = ?"#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        row.map(DbPayment::into_domain).transpose()
    }

    async fn get_payment_by_order(&self, order_id: &str) -> Result<Option<Payment>, StoreError> {
        let row: Option<DbPayment> = sqlx::query_as(
            r#"SELECT id, order_id, user_id, total_amount, method, status, created_at, updated_at
               FROM payments WHERE order_id = ?"#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        row.map(DbPayment::into_domain).transpose()
    }

    async fn list_recent_payments(&self, limit: i64) -> Result<Vec<Payment>, StoreError> {
        let rows: Vec<DbPayment> = sqlx::query_as(
            r#"SELECT id, order_id, user_id, total_amount, method, status, created_at, updated_at
               FROM payments ORDER BY id DESC LIMIT ?"#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        rows.into_iter().map(DbPayment::into_domain).collect()
    }

    async fn record_approval(
        &self,
        payment_id: PaymentId,
        reference: &str,
        message: &str,
    ) -> Result<Transaction, StoreError> {
        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        let state: Option<DbPaymentState> =
            sqlx::query_as(r#"SELECT status FROM payments WHERE id = ?"#)
                .bind(payment_id.as_i64())
                .fetch_optional(&mut *db_tx)
                .await
                .map_err(|e| StoreError::Database(e.to_string()))?;

        let state = state.ok_or(StoreError::NotFound)?;

        if crate::types::parse_status(&state.status)? == PaymentStatus::Approved {
            return Err(StoreError::AlreadyApproved(payment_id));
        }

        let status = PaymentStatus::Approved;
        let now = chrono::Utc::now();
        let now_str = now.to_rfc3339();

        sqlx::query(r#"UPDATE payments SET status = ?, updated_at = ? WHERE id = ?"#)
            .bind(status.to_string())
            .bind(&now_str)
            .bind(payment_id.as_i64())
            .execute(&mut *db_tx)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let result = sqlx::query(
            r#"INSERT INTO transactions (payment_id, reference, status, message, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(payment_id.as_i64())
        .bind(reference)
        .bind(status.to_string())
        .bind(message)
        .bind(&now_str)
        .execute(&mut *db_tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "transactions.reference") {
                StoreError::DuplicateReference(reference.to_string())
            } else {
                StoreError::Database(e.to_string())
            }
        })?;

        db_tx
            .commit()
            .await
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        Ok(Transaction::from_parts(
            TransactionId::from_i64(result.last_insert_rowid()),
            payment_id,
            reference.to_string(),
            status,
            message.to_string(),
            now,
        ))
    }

    async fn list_transactions_for_payment(
        &self,
        payment_id: PaymentId,
    ) -> Result<Vec<Transaction>, StoreError> {
        let rows: Vec<DbTransaction> = sqlx::query_as(
            r#"SELECT id, payment_id, reference, status, message, created_at
               FROM transactions WHERE payment_id = ? ORDER BY id DESC"#,
        )
        .bind(payment_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        rows.into_iter().map(DbTransaction::into_domain).collect()
    }

    async fn insert_invoice(&self, draft: InvoiceDraft) -> Result<Invoice, StoreError> {
        let items_json =
            serde_json::to_string(&draft.items).map_err(|e| StoreError::Database(e.to_string()))?;
        let issued_at_str = draft.issued_at.to_rfc3339();

        let result = sqlx::query(
            r#"INSERT INTO invoices (number, payment_id, order_id, user_id, total_amount, tax, subtotal, items, issued_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&draft.number)
        .bind(draft.payment_id.as_i64())
        .bind(&draft.order_id)
        .bind(draft.user_id)
        .bind(draft.total_amount)
        .bind(draft.tax)
        .bind(draft.subtotal)
        .bind(&items_json)
        .bind(&issued_at_str)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "invoices.payment_id") {
                StoreError::DuplicateInvoice(draft.payment_id)
            } else if is_unique_violation(&e, "invoices.number") {
                StoreError::DuplicateInvoiceNumber(draft.number.clone())
            } else {
                StoreError::Database(e.to_string())
            }
        })?;

        Ok(Invoice::from_parts(
            billing_types::InvoiceId::from_i64(result.last_insert_rowid()),
            draft.number,
            draft.payment_id,
            draft.order_id,
            draft.user_id,
            draft.total_amount,
            draft.tax,
            draft.subtotal,
            draft.items,
            draft.issued_at,
        ))
    }

    async fn get_invoice(&self, number: &str) -> Result<Option<Invoice>, StoreError> {
        let row: Option<DbInvoice> = sqlx::query_as(
            r#"SELECT id, number, payment_id, order_id, user_id, total_amount, tax, subtotal, items, issued_at
               FROM invoices WHERE number = ?"#,
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        row.map(DbInvoice::into_domain).transpose()
    }

    async fn list_recent_invoices(&self, limit: i64) -> Result<Vec<Invoice>, StoreError> {
        let rows: Vec<DbInvoice> = sqlx::query_as(
            r#"SELECT id, number, payment_id, order_id, user_id, total_amount, tax, subtotal, items, issued_at
               FROM invoices ORDER BY id DESC LIMIT ?"#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        rows.into_iter().map(DbInvoice::into_domain).collect()
    }
}
