//! Invoice domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::payment::PaymentId;

/// Unique identifier for an Invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct InvoiceId(i64);

impl InvoiceId {
    /// Creates an InvoiceId from a store-assigned rowid.
    pub fn from_i64(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying integer value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One billed line on an invoice.
///
/// Quantity and price are recorded as supplied by the caller; no
/// positivity validation is performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LineItem {
    /// Item name
    #[schema(example = "Producto A")]
    pub name: String,
    /// Billed quantity
    #[schema(example = 2)]
    pub quantity: i64,
    /// Unit price
    #[schema(example = 25.0)]
    pub price: f64,
}

/// A billing document derived from an approved payment.
///
/// `subtotal + tax == total_amount` by construction; the split is
/// `subtotal = total / (1 + tax_rate)`. Invoices are immutable once issued.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Invoice {
    /// Store-assigned identifier
    pub id: InvoiceId,
    /// Unique invoice number (`FAC-` + issue date + 4 digits)
    pub number: String,
    /// The approved payment this invoice bills
    pub payment_id: PaymentId,
    /// Order identifier, copied from the payment
    pub order_id: String,
    /// User identifier, copied from the payment
    pub user_id: i64,
    /// Total billed amount, equal to the payment's total
    pub total_amount: f64,
    /// Tax portion of the total
    pub tax: f64,
    /// Tax-exclusive base amount
    pub subtotal: f64,
    /// Billed line items, order preserved
    pub items: Vec<LineItem>,
    /// When the invoice was issued
    pub issued_at: DateTime<Utc>,
}

impl Invoice {
    /// Reconstructs an invoice from database fields.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: InvoiceId,
        number: String,
        payment_id: PaymentId,
        order_id: String,
        user_id: i64,
        total_amount: f64,
        tax: f64,
        subtotal: f64,
        items: Vec<LineItem>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            number,
            payment_id,
            order_id,
            user_id,
            total_amount,
            tax,
            subtotal,
            items,
            issued_at,
        }
    }
}
