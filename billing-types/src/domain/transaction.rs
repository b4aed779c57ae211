//! Transaction domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::payment::{PaymentId, PaymentStatus};

/// Unique identifier for a Transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TransactionId(i64);

impl TransactionId {
    /// Creates a TransactionId from a store-assigned rowid.
    pub fn from_i64(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying integer value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An audit record of one processing attempt against a payment.
///
/// Transactions are immutable once created - they represent
/// a historical record of what happened.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,
    /// The payment this attempt processed
    pub payment_id: PaymentId,
    /// Human-readable reference code, globally unique (`TXN-` + 6 digits)
    pub reference: String,
    /// Outcome of the attempt
    pub status: PaymentStatus,
    /// Human-readable result message
    pub message: String,
    /// When the attempt was recorded
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Reconstructs a transaction from database fields.
    pub fn from_parts(
        id: TransactionId,
        payment_id: PaymentId,
        reference: String,
        status: PaymentStatus,
        message: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            payment_id,
            reference,
            status,
            message,
            created_at,
        }
    }
}
