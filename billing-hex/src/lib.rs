//! # Billing Hex
//!
//! Application service layer and HTTP adapter for the billing service.
//!
//! ## Architecture
//!
//! - `service/` - Application services (payment lifecycle, invoice generation)
//! - `inbound/` - HTTP adapter (Axum server)
//! - `openapi/` - OpenAPI document served by the inbound adapter
//!
//! The services are generic over `S: BillingStore`, allowing
//! different store implementations to be injected.

pub mod inbound;
pub mod openapi;
pub mod service;


pub use service::{InvoiceService, PaymentService, complete_payment_flow};
