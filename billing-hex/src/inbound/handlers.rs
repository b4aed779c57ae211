//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequest, Path, Request, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use billing_types::{
    AppError, BillingStore, CompleteFlowRequest, CreatePaymentRequest, GenerateInvoiceRequest,
    PaymentId,
};

use crate::service::{InvoiceService, MAX_LIST_LIMIT, PaymentService, complete_payment_flow};

/// Application state shared across handlers.
///
/// Both services are constructed once at startup over one shared store -
/// explicit dependency injection, no process-wide singletons.
pub struct AppState<S: BillingStore> {
    pub payments: PaymentService<S>,
    pub invoices: InvoiceService<S>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Rejected(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// `Json` extractor that reports malformed or field-missing bodies as 400
/// (axum's default rejection is 422).
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError(AppError::BadRequest(rejection.body_text()))),
        }
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok", "service": "billing-api" }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Payments
// ─────────────────────────────────────────────────────────────────────────────

/// Create a new payment.
#[tracing::instrument(skip(state, req), fields(order_id = %req.order_id))]
pub async fn create_payment<S: BillingStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(req): ApiJson<CreatePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = state.payments.create_payment(req).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// Process a payment (simulated, always-approve).
#[tracing::instrument(skip(state), fields(payment_id = id))]
pub async fn process_payment<S: BillingStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .payments
        .process_payment(PaymentId::from_i64(id))
        .await?;
    Ok(Json(result))
}

/// Get a payment by id.
#[tracing::instrument(skip(state), fields(payment_id = id))]
pub async fn get_payment<S: BillingStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = state.payments.get_payment(PaymentId::from_i64(id)).await?;
    Ok(Json(payment))
}

/// Get a payment by its originating order id.
#[tracing::instrument(skip(state), fields(order_id = %order_id))]
pub async fn get_payment_by_order<S: BillingStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = state.payments.get_payment_by_order(&order_id).await?;
    Ok(Json(payment))
}

/// List recent payments, newest first.
#[tracing::instrument(skip(state))]
pub async fn list_payments<S: BillingStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = state.payments.list_recent_payments(MAX_LIST_LIMIT).await?;
    Ok(Json(payments))
}

// ─────────────────────────────────────────────────────────────────────────────
// Invoices
// ─────────────────────────────────────────────────────────────────────────────

/// Generate an invoice for an approved payment.
#[tracing::instrument(skip(state, req), fields(payment_id = %req.payment_id))]
pub async fn generate_invoice<S: BillingStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(req): ApiJson<GenerateInvoiceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let invoice = state.invoices.generate_invoice(req).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// Get an invoice by its invoice number.
#[tracing::instrument(skip(state), fields(number = %number))]
pub async fn get_invoice<S: BillingStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(number): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let invoice = state.invoices.get_invoice(&number).await?;
    Ok(Json(invoice))
}

/// List recent invoices, newest first.
#[tracing::instrument(skip(state))]
pub async fn list_invoices<S: BillingStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let invoices = state.invoices.list_recent_invoices(MAX_LIST_LIMIT).await?;
    Ok(Json(invoices))
}

// ─────────────────────────────────────────────────────────────────────────────
// Composite flow
// ─────────────────────────────────────────────────────────────────────────────

/// Run the complete flow: create payment -> process -> invoice.
#[tracing::instrument(skip(state, req), fields(order_id = %req.order_id))]
pub async fn complete_flow<S: BillingStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(req): ApiJson<CompleteFlowRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = complete_payment_flow(&state.payments, &state.invoices, req).await?;
    Ok((StatusCode::CREATED, Json(result)))
}
