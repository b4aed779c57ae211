//! SQLite store integration tests.

#[cfg(test)]
mod tests {
    use billing_types::{
        BillingStore, CreatePaymentRequest, InvoiceDraft, LineItem, PaymentId, PaymentStatus,
        StoreError,
    };

    use crate::SqliteStore;

    async fn setup_store() -> SqliteStore {
        SqliteStore::new("sqlite::memory:").await.unwrap()
    }

    fn payment_request(order_id: &str) -> CreatePaymentRequest {
        CreatePaymentRequest {
            order_id: order_id.to_string(),
            user_id: 123,
            total_amount: 112.0,
            method: "tarjeta_credito".to_string(),
        }
    }

    fn invoice_draft(payment: &billing_types::Payment, number: &str) -> InvoiceDraft {
        let subtotal = payment.total_amount / 1.12;
        InvoiceDraft {
            number: number.to_string(),
            payment_id: payment.id,
            order_id: payment.order_id.clone(),
            user_id: payment.user_id,
            total_amount: payment.total_amount,
            tax: payment.total_amount - subtotal,
            subtotal,
            items: vec![
                LineItem {
                    name: "Producto A".to_string(),
                    quantity: 2,
                    price: 25.0,
                },
                LineItem {
                    name: "Producto B".to_string(),
                    quantity: 1,
                    price: 62.0,
                },
            ],
            issued_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_payment_then_get_returns_equal_record() {
        let store = setup_store().await;

        let created = store.insert_payment(payment_request("ORD-001")).await.unwrap();

        assert_eq!(created.status, PaymentStatus::Pending);
        assert_eq!(created.created_at, created.updated_at);

        let fetched = store.get_payment(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.order_id, created.order_id);
        assert_eq!(fetched.user_id, created.user_id);
        assert_eq!(fetched.total_amount, created.total_amount);
        assert_eq!(fetched.method, created.method);
        assert_eq!(fetched.status, created.status);
    }

    #[tokio::test]
    async fn test_duplicate_order_is_rejected_and_keeps_one_row() {
        let store = setup_store().await;

        store.insert_payment(payment_request("ORD-001")).await.unwrap();
        let result = store.insert_payment(payment_request("ORD-001")).await;

        assert!(matches!(result, Err(StoreError::DuplicateOrder(_))));

        let payments = store.list_recent_payments(50).await.unwrap();
        assert_eq!(payments.len(), 1);
    }

    #[tokio::test]
    async fn test_get_payment_by_order() {
        let store = setup_store().await;

        let created = store.insert_payment(payment_request("ORD-042")).await.unwrap();

        let fetched = store.get_payment_by_order("ORD-042").await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);

        assert!(store.get_payment_by_order("ORD-999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_approval_on_unknown_payment_writes_nothing() {
        let store = setup_store().await;

        let missing = PaymentId::from_i64(42);
        let result = store.record_approval(missing, "TXN-123456", "ok").await;

        assert!(matches!(result, Err(StoreError::NotFound)));

        let transactions = store.list_transactions_for_payment(missing).await.unwrap();
        assert!(transactions.is_empty());
    }

    #[tokio::test]
    async fn test_record_approval_transitions_and_audits_atomically() {
        let store = setup_store().await;

        let payment = store.insert_payment(payment_request("ORD-001")).await.unwrap();

        let tx = store
            .record_approval(payment.id, "TXN-654321", "payment processed successfully")
            .await
            .unwrap();

        assert_eq!(tx.payment_id, payment.id);
        assert_eq!(tx.status, PaymentStatus::Approved);
        assert_eq!(tx.reference, "TXN-654321");

        let updated = store.get_payment(payment.id).await.unwrap().unwrap();
        assert_eq!(updated.status, PaymentStatus::Approved);
        assert!(updated.updated_at >= updated.created_at);

        let transactions = store.list_transactions_for_payment(payment.id).await.unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].reference, "TXN-654321");
        // The audit row and the payment update share one instant.
        assert_eq!(transactions[0].created_at, updated.updated_at);
    }

    #[tokio::test]
    async fn test_record_approval_rejects_already_approved() {
        let store = setup_store().await;

        let payment = store.insert_payment(payment_request("ORD-001")).await.unwrap();
        store
            .record_approval(payment.id, "TXN-111111", "ok")
            .await
            .unwrap();

        let result = store.record_approval(payment.id, "TXN-222222", "ok").await;
        assert!(matches!(result, Err(StoreError::AlreadyApproved(_))));

        // No second audit row was appended.
        let transactions = store.list_transactions_for_payment(payment.id).await.unwrap();
        assert_eq!(transactions.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_reference_is_surfaced_for_retry() {
        let store = setup_store().await;

        let first = store.insert_payment(payment_request("ORD-001")).await.unwrap();
        let second = store.insert_payment(payment_request("ORD-002")).await.unwrap();

        store
            .record_approval(first.id, "TXN-123456", "ok")
            .await
            .unwrap();

        let result = store.record_approval(second.id, "TXN-123456", "ok").await;
        assert!(matches!(result, Err(StoreError::DuplicateReference(_))));

        // The rejected unit of work must not have half-applied.
        let untouched = store.get_payment(second.id).await.unwrap().unwrap();
        assert_eq!(untouched.status, PaymentStatus::Pending);
        let transactions = store.list_transactions_for_payment(second.id).await.unwrap();
        assert!(transactions.is_empty());
    }

    #[tokio::test]
    async fn test_invoice_round_trip_preserves_items_in_order() {
        let store = setup_store().await;

        let payment = store.insert_payment(payment_request("ORD-001")).await.unwrap();
        store
            .record_approval(payment.id, "TXN-123456", "ok")
            .await
            .unwrap();

        let draft = invoice_draft(&payment, "FAC-20250114-1234");
        let issued = store.insert_invoice(draft.clone()).await.unwrap();

        assert_eq!(issued.number, "FAC-20250114-1234");
        assert_eq!(issued.payment_id, payment.id);

        let fetched = store.get_invoice("FAC-20250114-1234").await.unwrap().unwrap();
        assert_eq!(fetched.id, issued.id);
        assert_eq!(fetched.items, draft.items);
        assert_eq!(fetched.order_id, payment.order_id);
        assert_eq!(fetched.user_id, payment.user_id);
        assert_eq!(fetched.total_amount, payment.total_amount);
    }

    #[tokio::test]
    async fn test_get_invoice_unknown_number_is_none() {
        let store = setup_store().await;

        assert!(store.get_invoice("FAC-20250114-0000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_second_invoice_for_same_payment_is_rejected() {
        let store = setup_store().await;

        let payment = store.insert_payment(payment_request("ORD-001")).await.unwrap();
        store
            .record_approval(payment.id, "TXN-123456", "ok")
            .await
            .unwrap();

        store
            .insert_invoice(invoice_draft(&payment, "FAC-20250114-1111"))
            .await
            .unwrap();

        let result = store
            .insert_invoice(invoice_draft(&payment, "FAC-20250114-2222"))
            .await;

        assert!(matches!(result, Err(StoreError::DuplicateInvoice(_))));
    }

    #[tokio::test]
    async fn test_invoice_number_collision_is_surfaced_for_retry() {
        let store = setup_store().await;

        let first = store.insert_payment(payment_request("ORD-001")).await.unwrap();
        let second = store.insert_payment(payment_request("ORD-002")).await.unwrap();
        store.record_approval(first.id, "TXN-111111", "ok").await.unwrap();
        store.record_approval(second.id, "TXN-222222", "ok").await.unwrap();

        store
            .insert_invoice(invoice_draft(&first, "FAC-20250114-1234"))
            .await
            .unwrap();

        let result = store
            .insert_invoice(invoice_draft(&second, "FAC-20250114-1234"))
            .await;

        assert!(matches!(result, Err(StoreError::DuplicateInvoiceNumber(_))));
    }

    #[tokio::test]
    async fn test_listings_are_newest_first_and_capped() {
        let store = setup_store().await;

        for i in 1..=4 {
            let payment = store
                .insert_payment(payment_request(&format!("ORD-{:03}", i)))
                .await
                .unwrap();
            store
                .record_approval(payment.id, &format!("TXN-10000{}", i), "ok")
                .await
                .unwrap();
            store
                .insert_invoice(invoice_draft(&payment, &format!("FAC-20250114-100{}", i)))
                .await
                .unwrap();
        }

        let payments = store.list_recent_payments(3).await.unwrap();
        assert_eq!(payments.len(), 3);
        assert!(payments.windows(2).all(|w| w[0].id.as_i64() > w[1].id.as_i64()));
        assert_eq!(payments[0].order_id, "ORD-004");

        let invoices = store.list_recent_invoices(3).await.unwrap();
        assert_eq!(invoices.len(), 3);
        assert!(invoices.windows(2).all(|w| w[0].id.as_i64() > w[1].id.as_i64()));
    }

    #[tokio::test]
    async fn test_schema_application_is_idempotent() {
        let store = setup_store().await;

        store.insert_payment(payment_request("ORD-001")).await.unwrap();

        // Re-applying the DDL must neither fail nor drop existing rows.
        store.apply_schema().await.unwrap();

        let payments = store.list_recent_payments(50).await.unwrap();
        assert_eq!(payments.len(), 1);
    }
}
