//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use billing_types::BillingStore;

use super::handlers::{self, AppState};
use crate::openapi::ApiDoc;
use crate::service::{InvoiceService, PaymentService};

/// HTTP Server for the Billing API.
pub struct HttpServer<S: BillingStore> {
    state: Arc<AppState<S>>,
}

impl<S: BillingStore> HttpServer<S> {
    /// Creates a new HTTP server over the given services.
    pub fn new(payments: PaymentService<S>, invoices: InvoiceService<S>) -> Self {
        Self {
            state: Arc::new(AppState { payments, invoices }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/payments", post(handlers::create_payment::<S>))
            .route("/payments", get(handlers::list_payments::<S>))
            .route("/payments/complete", post(handlers::complete_flow::<S>))
            .route(
                "/payments/{id}/process",
                post(handlers::process_payment::<S>),
            )
            .route("/payments/{id}", get(handlers::get_payment::<S>))
            .route(
                "/payments/order/{order_id}",
                get(handlers::get_payment_by_order::<S>),
            )
            .route("/invoices", post(handlers::generate_invoice::<S>))
            .route("/invoices", get(handlers::list_invoices::<S>))
            .route("/invoices/{number}", get(handlers::get_invoice::<S>))
            .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
            // The dashboard frontend calls the API cross-origin.
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
