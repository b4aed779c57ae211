//! Domain models for the billing service.

pub mod invoice;
pub mod payment;
pub mod transaction;

pub use invoice::{Invoice, InvoiceId, LineItem};
pub use payment::{Payment, PaymentId, PaymentStatus};
pub use transaction::{Transaction, TransactionId};
