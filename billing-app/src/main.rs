//! # Billing Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the store adapter
//! - Create the payment and invoice services
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use billing_hex::{InvoiceService, PaymentService, inbound::HttpServer};
use billing_store::build_store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,billing_app=debug,billing_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting billing server on port {}", config.port);
    tracing::info!("Using database: {}", config.database_url);

    // Build the store (handles connection and schema setup)
    let store = Arc::new(build_store(&config.database_url).await?);

    // Create the services over the shared store
    let payments = PaymentService::new(store.clone());
    let invoices = InvoiceService::new(store);

    // Create and run the HTTP server
    let server = HttpServer::new(payments, invoices);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    Ok(())
}
