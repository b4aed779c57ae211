//! Persistence store port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (SQLite, in-memory for tests) implement this trait; it is the
//! single owner of all durable state.

use chrono::{DateTime, Utc};

use crate::domain::{Invoice, LineItem, Payment, PaymentId, Transaction};
use crate::dto::CreatePaymentRequest;
use crate::error::StoreError;

/// A fully computed invoice, ready to persist.
///
/// The service computes the number, the tax split, and the denormalized
/// payment fields; the store only assigns the id.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    pub number: String,
    pub payment_id: PaymentId,
    pub order_id: String,
    pub user_id: i64,
    pub total_amount: f64,
    pub tax: f64,
    pub subtotal: f64,
    pub items: Vec<LineItem>,
    pub issued_at: DateTime<Utc>,
}

/// The main store port for billing operations.
///
/// `record_approval` MUST be atomic: the payment update and the audit
/// insert commit together or not at all.
#[async_trait::async_trait]
pub trait BillingStore: Send + Sync + 'static {
    // ─────────────────────────────────────────────────────────────────────────
    // Payment Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Inserts a new payment with status `pending` and both timestamps set
    /// to the same instant. Fails with `DuplicateOrder` when a payment for
    /// the order already exists.
    async fn insert_payment(&self, req: CreatePaymentRequest) -> Result<Payment, StoreError>;

    /// Gets a payment by id.
    async fn get_payment(&self, id: PaymentId) -> Result<Option<Payment>, StoreError>;

    /// Gets a payment by its originating order id.
    async fn get_payment_by_order(&self, order_id: &str) -> Result<Option<Payment>, StoreError>;

    /// Lists payments, most-recent-id-first, at most `limit` rows.
    async fn list_recent_payments(&self, limit: i64) -> Result<Vec<Payment>, StoreError>;

    // ─────────────────────────────────────────────────────────────────────────
    // Processing (MUST be atomic)
    // ─────────────────────────────────────────────────────────────────────────

    /// Approves a payment and records the audit transaction in one unit of
    /// work: sets status to `approved`, bumps the update timestamp, and
    /// inserts the transaction row with the same instant.
    ///
    /// Fails with `NotFound` for an unknown payment, `AlreadyApproved` for
    /// a payment past `pending`, and `DuplicateReference` when the caller's
    /// reference code collides (the caller regenerates and retries).
    async fn record_approval(
        &self,
        payment_id: PaymentId,
        reference: &str,
        message: &str,
    ) -> Result<Transaction, StoreError>;

    /// Lists the audit transactions recorded against a payment,
    /// most-recent-id-first.
    async fn list_transactions_for_payment(
        &self,
        payment_id: PaymentId,
    ) -> Result<Vec<Transaction>, StoreError>;

    // ─────────────────────────────────────────────────────────────────────────
    // Invoice Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Inserts a computed invoice. Fails with `DuplicateInvoice` when the
    /// payment is already invoiced, and `DuplicateInvoiceNumber` when the
    /// number collides (the caller regenerates and retries).
    async fn insert_invoice(&self, draft: InvoiceDraft) -> Result<Invoice, StoreError>;

    /// Gets an invoice by its invoice number.
    async fn get_invoice(&self, number: &str) -> Result<Option<Invoice>, StoreError>;

    /// Lists invoices, most-recent-id-first, at most `limit` rows.
    async fn list_recent_invoices(&self, limit: i64) -> Result<Vec<Invoice>, StoreError>;
}
