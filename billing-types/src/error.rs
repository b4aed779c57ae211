//! Error types for the billing service.

use crate::domain::PaymentId;

/// Store-level errors (data access failures and expected conflicts).
///
/// Expected outcomes (duplicate order, already approved, duplicate
/// invoice) are ordinary variants, not panics - callers decide how to
/// surface them.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a payment already exists for order {0}")]
    DuplicateOrder(String),

    #[error("payment {0} is already approved")]
    AlreadyApproved(PaymentId),

    #[error("transaction reference collision: {0}")]
    DuplicateReference(String),

    #[error("an invoice was already issued for payment {0}")]
    DuplicateInvoice(PaymentId),

    #[error("invoice number collision: {0}")]
    DuplicateInvoiceNumber(String),

    #[error("entity not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(String),

    #[error("transaction error: {0}")]
    Transaction(String),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    /// Invoice precondition rejection. The reason deliberately does not
    /// distinguish an unknown payment from a not-yet-approved one.
    #[error("{0}")]
    Rejected(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateOrder(order_id) => {
                AppError::Conflict(format!("a payment already exists for order {}", order_id))
            }
            StoreError::AlreadyApproved(id) => {
                AppError::Conflict(format!("payment {} is already approved", id))
            }
            StoreError::DuplicateInvoice(id) => {
                AppError::Conflict(format!("an invoice was already issued for payment {}", id))
            }
            StoreError::NotFound => AppError::NotFound("resource not found".into()),
            StoreError::DuplicateReference(e) => AppError::Internal(e),
            StoreError::DuplicateInvoiceNumber(e) => AppError::Internal(e),
            StoreError::Database(e) => AppError::Internal(e),
            StoreError::Transaction(e) => AppError::Internal(e),
        }
    }
}
