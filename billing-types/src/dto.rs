//! Data Transfer Objects (DTOs) for requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Invoice, InvoiceId, LineItem, PaymentId, PaymentStatus};

// ─────────────────────────────────────────────────────────────────────────────
// Payment DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a new payment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    /// External order identifier, unique per payment
    #[schema(example = "ORD-001")]
    pub order_id: String,
    /// Identifier of the paying user
    #[schema(example = 123)]
    pub user_id: i64,
    /// Total amount owed
    #[schema(example = 112.0)]
    pub total_amount: f64,
    /// Payment method tag
    #[schema(example = "tarjeta_credito")]
    pub method: String,
}

/// Result of processing a payment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProcessingResult {
    /// The processed payment
    pub payment_id: PaymentId,
    /// Reference code of the recorded transaction (`TXN-` + 6 digits)
    #[schema(example = "TXN-483920")]
    pub reference: String,
    /// Resulting payment status
    pub status: PaymentStatus,
    /// Human-readable outcome message
    #[schema(example = "payment processed successfully")]
    pub message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Invoice DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to generate an invoice for an approved payment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateInvoiceRequest {
    /// The payment to bill; must be approved
    pub payment_id: PaymentId,
    /// Line items to record on the invoice
    pub items: Vec<LineItem>,
    /// Tax rate applied to the total, exclusive bounds (0, 1)
    #[serde(default = "default_tax_rate")]
    #[schema(example = 0.12)]
    pub tax_rate: f64,
}

/// The default tax rate applied when the caller omits one.
pub fn default_tax_rate() -> f64 {
    0.12
}

/// An invoice as returned over the API.
///
/// `subtotal` and `tax` are rounded to two decimals for display;
/// `total_amount` is returned as stored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvoiceResponse {
    /// Store-assigned identifier
    pub id: InvoiceId,
    /// Unique invoice number
    #[schema(example = "FAC-20250114-4821")]
    pub number: String,
    /// The billed payment
    pub payment_id: PaymentId,
    /// Order identifier copied from the payment
    pub order_id: String,
    /// User identifier copied from the payment
    pub user_id: i64,
    /// Tax-exclusive base, rounded to 2 decimals
    #[schema(example = 100.0)]
    pub subtotal: f64,
    /// Tax portion, rounded to 2 decimals
    #[schema(example = 12.0)]
    pub tax: f64,
    /// Total billed amount, as stored
    #[schema(example = 112.0)]
    pub total_amount: f64,
    /// Billed line items, order preserved
    pub items: Vec<LineItem>,
    /// When the invoice was issued (ISO 8601)
    pub issued_at: chrono::DateTime<chrono::Utc>,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            number: invoice.number,
            payment_id: invoice.payment_id,
            order_id: invoice.order_id,
            user_id: invoice.user_id,
            subtotal: round2(invoice.subtotal),
            tax: round2(invoice.tax),
            total_amount: invoice.total_amount,
            items: invoice.items,
            issued_at: invoice.issued_at,
        }
    }
}

/// Rounds to two decimal places for display.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ─────────────────────────────────────────────────────────────────────────────
// Composite flow DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request for the complete create -> process -> invoice flow.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompleteFlowRequest {
    /// External order identifier, unique per payment
    #[schema(example = "ORD-100")]
    pub order_id: String,
    /// Identifier of the paying user
    #[schema(example = 7)]
    pub user_id: i64,
    /// Total amount owed
    #[schema(example = 50.0)]
    pub total_amount: f64,
    /// Payment method tag
    #[schema(example = "card")]
    pub method: String,
    /// Line items for the generated invoice
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Tax rate applied to the total, exclusive bounds (0, 1)
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
}

/// Result of the complete flow: the approved payment, the processing
/// transaction, and the issued invoice.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompleteFlowResponse {
    pub payment: crate::domain::Payment,
    pub transaction: ProcessingResult,
    pub invoice: InvoiceResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_invoice_response_rounds_display_amounts() {
        let invoice = Invoice::from_parts(
            InvoiceId::from_i64(1),
            "FAC-20250114-1234".into(),
            PaymentId::from_i64(1),
            "ORD-001".into(),
            123,
            112.0,
            112.0 - 112.0 / 1.12,
            112.0 / 1.12,
            vec![],
            Utc::now(),
        );

        let response = InvoiceResponse::from(invoice);

        assert_eq!(response.subtotal, 100.0);
        assert_eq!(response.tax, 12.0);
        assert_eq!(response.total_amount, 112.0);
    }

    #[test]
    fn test_generate_request_defaults_tax_rate() {
        let req: GenerateInvoiceRequest =
            serde_json::from_str(r#"{"payment_id": 1, "items": []}"#).unwrap();
        assert_eq!(req.tax_rate, 0.12);
    }
}
