//! Billing application services.
//!
//! Orchestrate domain operations through the store port.
//! Contain NO infrastructure logic - pure business orchestration.

use std::sync::Arc;

use rand::Rng;

use billing_types::{
    AppError, BillingStore, CompleteFlowRequest, CompleteFlowResponse, CreatePaymentRequest,
    GenerateInvoiceRequest, InvoiceDraft, InvoiceResponse, Payment, PaymentId, ProcessingResult,
    StoreError,
};

/// Largest number of rows a listing operation returns.
pub const MAX_LIST_LIMIT: i64 = 50;

/// Attempts to allocate a random reference/invoice number before giving up.
const MAX_CODE_ATTEMPTS: u32 = 4;

/// Message recorded with every successful processing attempt.
const PROCESSED_MESSAGE: &str = "payment processed successfully";

/// Rejection reason for invoice generation. Deliberately does not
/// distinguish an unknown payment from a not-yet-approved one.
const INVOICE_REJECTED: &str = "payment not found or not approved";

/// Generates a transaction reference code: `TXN-` + 6 random digits.
fn new_transaction_reference() -> String {
    format!("TXN-{}", rand::rng().random_range(100_000..=999_999))
}

/// Generates an invoice number: `FAC-` + UTC issue date + 4 random digits.
fn new_invoice_number() -> String {
    format!(
        "FAC-{}-{}",
        chrono::Utc::now().format("%Y%m%d"),
        rand::rng().random_range(1000..=9999)
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment Lifecycle Service
// ─────────────────────────────────────────────────────────────────────────────

/// Application service for the payment lifecycle.
///
/// Generic over `S: BillingStore` - the adapter is injected at construction.
/// This enables:
/// - Swapping stores without code changes
/// - Testing with an in-memory store
/// - Compile-time checks for port implementation
pub struct PaymentService<S: BillingStore> {
    store: Arc<S>,
}

impl<S: BillingStore> PaymentService<S> {
    /// Creates a new payment service over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a new payment in `pending` state.
    pub async fn create_payment(&self, req: CreatePaymentRequest) -> Result<Payment, AppError> {
        if req.order_id.trim().is_empty() {
            return Err(AppError::BadRequest("order id cannot be empty".into()));
        }

        if !req.total_amount.is_finite() || req.total_amount <= 0.0 {
            return Err(AppError::BadRequest("total amount must be positive".into()));
        }

        self.store.insert_payment(req).await.map_err(Into::into)
    }

    /// Processes a payment: transitions it to `approved` and records the
    /// audit transaction. Simulated, always-approve - once the payment
    /// exists and is pending, this succeeds.
    ///
    /// Re-processing an already-approved payment is a conflict; the audit
    /// trail stays at one row per approval.
    pub async fn process_payment(&self, id: PaymentId) -> Result<ProcessingResult, AppError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let reference = new_transaction_reference();

            match self
                .store
                .record_approval(id, &reference, PROCESSED_MESSAGE)
                .await
            {
                Ok(tx) => {
                    return Ok(ProcessingResult {
                        payment_id: tx.payment_id,
                        reference: tx.reference,
                        status: tx.status,
                        message: tx.message,
                    });
                }
                // Reference collision: roll a new code and try again.
                Err(StoreError::DuplicateReference(_)) => continue,
                Err(StoreError::NotFound) => {
                    return Err(AppError::NotFound(format!("payment {}", id)));
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Internal(
            "could not allocate a unique transaction reference".into(),
        ))
    }

    /// Gets a payment by id.
    pub async fn get_payment(&self, id: PaymentId) -> Result<Payment, AppError> {
        self.store
            .get_payment(id)
            .await
            .map_err(Into::into)
            .and_then(|opt| opt.ok_or_else(|| AppError::NotFound(format!("payment {}", id))))
    }

    /// Gets a payment by its originating order id.
    pub async fn get_payment_by_order(&self, order_id: &str) -> Result<Payment, AppError> {
        self.store
            .get_payment_by_order(order_id)
            .await
            .map_err(Into::into)
            .and_then(|opt| {
                opt.ok_or_else(|| AppError::NotFound(format!("payment for order {}", order_id)))
            })
    }

    /// Lists recent payments, newest first. `limit` is clamped to
    /// [1, `MAX_LIST_LIMIT`].
    pub async fn list_recent_payments(&self, limit: i64) -> Result<Vec<Payment>, AppError> {
        self.store
            .list_recent_payments(limit.clamp(1, MAX_LIST_LIMIT))
            .await
            .map_err(Into::into)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Invoice Generation Service
// ─────────────────────────────────────────────────────────────────────────────

/// Application service for invoice generation.
pub struct InvoiceService<S: BillingStore> {
    store: Arc<S>,
}

impl<S: BillingStore> InvoiceService<S> {
    /// Creates a new invoice service over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Generates an invoice for an approved payment, splitting its total
    /// into a tax-exclusive subtotal and a tax amount:
    ///
    /// ```text
    /// subtotal = total / (1 + tax_rate)
    /// tax      = total - subtotal
    /// ```
    pub async fn generate_invoice(
        &self,
        req: GenerateInvoiceRequest,
    ) -> Result<InvoiceResponse, AppError> {
        if !req.tax_rate.is_finite() || req.tax_rate <= 0.0 || req.tax_rate >= 1.0 {
            return Err(AppError::BadRequest(
                "tax rate must be between 0 and 1, exclusive".into(),
            ));
        }

        let payment = match self.store.get_payment(req.payment_id).await? {
            Some(p) if p.is_approved() => p,
            // One rejection for both "unknown id" and "not yet approved".
            _ => return Err(AppError::Rejected(INVOICE_REJECTED.into())),
        };

        let subtotal = payment.total_amount / (1.0 + req.tax_rate);
        let tax = payment.total_amount - subtotal;

        for _ in 0..MAX_CODE_ATTEMPTS {
            let draft = InvoiceDraft {
                number: new_invoice_number(),
                payment_id: payment.id,
                order_id: payment.order_id.clone(),
                user_id: payment.user_id,
                total_amount: payment.total_amount,
                tax,
                subtotal,
                items: req.items.clone(),
                issued_at: chrono::Utc::now(),
            };

            match self.store.insert_invoice(draft).await {
                Ok(invoice) => return Ok(invoice.into()),
                // Number collision: roll a new number and try again.
                Err(StoreError::DuplicateInvoiceNumber(_)) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Internal(
            "could not allocate a unique invoice number".into(),
        ))
    }

    /// Gets an invoice by its invoice number.
    pub async fn get_invoice(&self, number: &str) -> Result<InvoiceResponse, AppError> {
        self.store
            .get_invoice(number)
            .await
            .map_err(Into::into)
            .and_then(|opt| {
                opt.map(Into::into)
                    .ok_or_else(|| AppError::NotFound(format!("invoice {}", number)))
            })
    }

    /// Lists recent invoices, newest first. `limit` is clamped to
    /// [1, `MAX_LIST_LIMIT`].
    pub async fn list_recent_invoices(&self, limit: i64) -> Result<Vec<InvoiceResponse>, AppError> {
        let invoices = self
            .store
            .list_recent_invoices(limit.clamp(1, MAX_LIST_LIMIT))
            .await?;

        Ok(invoices.into_iter().map(Into::into).collect())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Composite flow
// ─────────────────────────────────────────────────────────────────────────────

/// Runs the complete checkout flow: create payment -> process -> invoice.
///
/// Pure orchestration over the two services; introduces no state of its
/// own. Each step short-circuits with its own failure mapping: a duplicate
/// order stays a conflict, while processing and invoicing failures become
/// internal errors carrying the step's detail.
pub async fn complete_payment_flow<S: BillingStore>(
    payments: &PaymentService<S>,
    invoices: &InvoiceService<S>,
    req: CompleteFlowRequest,
) -> Result<CompleteFlowResponse, AppError> {
    let payment = payments
        .create_payment(CreatePaymentRequest {
            order_id: req.order_id,
            user_id: req.user_id,
            total_amount: req.total_amount,
            method: req.method,
        })
        .await?;

    let transaction = payments
        .process_payment(payment.id)
        .await
        .map_err(|e| AppError::Internal(format!("failed to process payment: {}", e)))?;

    let invoice = invoices
        .generate_invoice(GenerateInvoiceRequest {
            payment_id: payment.id,
            items: req.items,
            tax_rate: req.tax_rate,
        })
        .await
        .map_err(|e| AppError::Internal(format!("failed to generate invoice: {}", e)))?;

    // Re-read so the response reflects the approved state.
    let payment = payments.get_payment(payment.id).await?;

    Ok(CompleteFlowResponse {
        payment,
        transaction,
        invoice,
    })
}
