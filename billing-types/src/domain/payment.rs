//! Payment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unique identifier for a Payment.
///
/// Payment ids are assigned by the store (monotonic rowid), never by the
/// application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PaymentId(i64);

impl PaymentId {
    /// Creates a PaymentId from a store-assigned rowid.
    pub fn from_i64(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying integer value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PaymentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Lifecycle state of a payment.
///
/// The only legal transition is `Pending` -> `Approved`; there is no
/// reversal. A declined path is anticipated but not modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Created, not yet processed
    Pending,
    /// Processed and approved
    Approved,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Approved => write!(f, "approved"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "approved" => Ok(PaymentStatus::Approved),
            other => Err(format!("unknown payment status: {}", other)),
        }
    }
}

/// A record of funds owed for an order.
///
/// At most one payment exists per `order_id`; the store enforces this.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    /// Store-assigned identifier
    pub id: PaymentId,
    /// Caller-supplied order identifier, unique across all payments
    pub order_id: String,
    /// Identifier of the paying user
    pub user_id: i64,
    /// Total amount owed
    pub total_amount: f64,
    /// Payment method tag (free-form, e.g. "card")
    pub method: String,
    /// Current lifecycle state
    pub status: PaymentStatus,
    /// When the payment was created
    pub created_at: DateTime<Utc>,
    /// When the payment was last updated (equals `created_at` until processed)
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Reconstructs a payment from database fields.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: PaymentId,
        order_id: String,
        user_id: i64,
        total_amount: f64,
        method: String,
        status: PaymentStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            order_id,
            user_id,
            total_amount,
            method,
            status,
            created_at,
            updated_at,
        }
    }

    /// Returns true if this payment has been approved.
    pub fn is_approved(&self) -> bool {
        self.status == PaymentStatus::Approved
    }
}
