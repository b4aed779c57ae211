//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use utoipa::OpenApi;

use billing_types::domain::{Invoice, InvoiceId, LineItem, Payment, PaymentId, PaymentStatus};
use billing_types::dto::{
    CompleteFlowRequest, CompleteFlowResponse, CreatePaymentRequest, GenerateInvoiceRequest,
    InvoiceResponse, ProcessingResult,
};

// Dummy functions to generate path documentation.
// The actual handlers are generic over the store; these monomorphic stubs
// carry the path metadata instead.

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = inline(serde_json::Value), example = json!({"status": "ok", "service": "billing-api"}))
    )
)]
async fn health() {}

/// Create a new payment
#[utoipa::path(
    post,
    path = "/payments",
    tag = "payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment created in pending state", body = Payment),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "A payment already exists for the order")
    )
)]
async fn create_payment() {}

/// Process a payment (simulated, always-approve)
#[utoipa::path(
    post,
    path = "/payments/{id}/process",
    tag = "payments",
    params(
        ("id" = i64, Path, description = "Payment id")
    ),
    responses(
        (status = 200, description = "Payment approved and audit transaction recorded", body = ProcessingResult),
        (status = 404, description = "Payment not found"),
        (status = 409, description = "Payment is already approved")
    )
)]
async fn process_payment() {}

/// Get a payment by id
#[utoipa::path(
    get,
    path = "/payments/{id}",
    tag = "payments",
    params(
        ("id" = i64, Path, description = "Payment id")
    ),
    responses(
        (status = 200, description = "The payment", body = Payment),
        (status = 404, description = "Payment not found")
    )
)]
async fn get_payment() {}

/// Get a payment by its originating order id
#[utoipa::path(
    get,
    path = "/payments/order/{order_id}",
    tag = "payments",
    params(
        ("order_id" = String, Path, description = "External order identifier")
    ),
    responses(
        (status = 200, description = "The payment", body = Payment),
        (status = 404, description = "No payment for the order")
    )
)]
async fn get_payment_by_order() {}

/// List recent payments, newest first (at most 50)
#[utoipa::path(
    get,
    path = "/payments",
    tag = "payments",
    responses(
        (status = 200, description = "Recent payments", body = Vec<Payment>)
    )
)]
async fn list_payments() {}

/// Generate an invoice for an approved payment
#[utoipa::path(
    post,
    path = "/invoices",
    tag = "invoices",
    request_body = GenerateInvoiceRequest,
    responses(
        (status = 201, description = "Invoice issued", body = InvoiceResponse),
        (status = 400, description = "Payment not found or not approved, or invalid tax rate"),
        (status = 409, description = "An invoice was already issued for the payment")
    )
)]
async fn generate_invoice() {}

/// Get an invoice by its invoice number
#[utoipa::path(
    get,
    path = "/invoices/{number}",
    tag = "invoices",
    params(
        ("number" = String, Path, description = "Invoice number")
    ),
    responses(
        (status = 200, description = "The invoice", body = InvoiceResponse),
        (status = 404, description = "Invoice not found")
    )
)]
async fn get_invoice() {}

/// List recent invoices, newest first (at most 50)
#[utoipa::path(
    get,
    path = "/invoices",
    tag = "invoices",
    responses(
        (status = 200, description = "Recent invoices", body = Vec<InvoiceResponse>)
    )
)]
async fn list_invoices() {}

/// Run the complete flow: create payment -> process -> invoice
#[utoipa::path(
    post,
    path = "/payments/complete",
    tag = "payments",
    request_body = CompleteFlowRequest,
    responses(
        (status = 201, description = "Flow completed", body = CompleteFlowResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "A payment already exists for the order"),
        (status = 500, description = "A later step of the flow failed")
    )
)]
async fn complete_flow() {}

/// The OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Billing API",
        description = "Payment and invoicing record-keeping API"
    ),
    paths(
        health,
        create_payment,
        process_payment,
        get_payment,
        get_payment_by_order,
        list_payments,
        generate_invoice,
        get_invoice,
        list_invoices,
        complete_flow,
    ),
    components(schemas(
        Payment,
        PaymentId,
        PaymentStatus,
        Invoice,
        InvoiceId,
        LineItem,
        CreatePaymentRequest,
        ProcessingResult,
        GenerateInvoiceRequest,
        InvoiceResponse,
        CompleteFlowRequest,
        CompleteFlowResponse,
    ))
)]
pub struct ApiDoc;
