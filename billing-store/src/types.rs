//! Database row structs and domain conversion.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use billing_types::{
    Invoice, InvoiceId, LineItem, Payment, PaymentId, PaymentStatus, StoreError, Transaction,
    TransactionId,
};

// ─────────────────────────────────────────────────────────────────────────────
// Database row structs (derive FromRow for automatic mapping)
// ─────────────────────────────────────────────────────────────────────────────

/// Payment row from database.
#[derive(FromRow)]
pub struct DbPayment {
    pub id: i64,
    pub order_id: String,
    pub user_id: i64,
    pub total_amount: f64,
    pub method: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Transaction row from database.
#[derive(FromRow)]
pub struct DbTransaction {
    pub id: i64,
    pub payment_id: i64,
    pub reference: String,
    pub status: String,
    pub message: Option<String>,
    pub created_at: String,
}

/// Invoice row from database.
#[derive(FromRow)]
pub struct DbInvoice {
    pub id: i64,
    pub number: String,
    pub payment_id: i64,
    pub order_id: String,
    pub user_id: i64,
    pub total_amount: f64,
    pub tax: f64,
    pub subtotal: f64,
    pub items: String,
    pub issued_at: String,
}

/// Status-only row for the approval precondition check.
#[derive(FromRow)]
pub struct DbPaymentState {
    pub status: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

pub fn parse_status(s: &str) -> Result<PaymentStatus, StoreError> {
    s.parse().map_err(StoreError::Database)
}

pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map_err(|e| StoreError::Database(e.to_string()))
        .map(|dt| dt.with_timezone(&Utc))
}

// ─────────────────────────────────────────────────────────────────────────────
// Domain conversion
// ─────────────────────────────────────────────────────────────────────────────

impl DbPayment {
    /// Convert database row to domain Payment.
    pub fn into_domain(self) -> Result<Payment, StoreError> {
        Ok(Payment::from_parts(
            PaymentId::from_i64(self.id),
            self.order_id,
            self.user_id,
            self.total_amount,
            self.method,
            parse_status(&self.status)?,
            parse_datetime(&self.created_at)?,
            parse_datetime(&self.updated_at)?,
        ))
    }
}

impl DbTransaction {
    /// Convert database row to domain Transaction.
    pub fn into_domain(self) -> Result<Transaction, StoreError> {
        Ok(Transaction::from_parts(
            TransactionId::from_i64(self.id),
            PaymentId::from_i64(self.payment_id),
            self.reference,
            parse_status(&self.status)?,
            self.message.unwrap_or_default(),
            parse_datetime(&self.created_at)?,
        ))
    }
}

impl DbInvoice {
    /// Convert database row to domain Invoice.
    pub fn into_domain(self) -> Result<Invoice, StoreError> {
        let items: Vec<LineItem> =
            serde_json::from_str(&self.items).map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Invoice::from_parts(
            InvoiceId::from_i64(self.id),
            self.number,
            PaymentId::from_i64(self.payment_id),
            self.order_id,
            self.user_id,
            self.total_amount,
            self.tax,
            self.subtotal,
            items,
            parse_datetime(&self.issued_at)?,
        ))
    }
}
