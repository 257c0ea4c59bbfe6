//! Invoicing service: read-repair status resolution and report assembly.

use invoicer_shared::types::InvoiceId;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::error::InvoicingError;
use super::ledger::InvoiceLedger;
use super::status::StatusResolver;
use super::totals::TotalsCalculator;
use super::types::{InvoiceRecord, InvoiceReport, PaymentResolution};

/// Runs the invoicing engine against a ledger.
///
/// The ledger decides the isolation: a ledger bound to a transaction that
/// row-locks invoices makes [`Self::resolve_status`] atomic.
pub struct InvoicingService<L> {
    ledger: L,
}

impl<L: InvoiceLedger> InvoicingService<L> {
    /// Creates a service over `ledger`.
    pub const fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// Returns the underlying ledger.
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Sum of completed payments for an invoice.
    pub async fn total_paid(&self, invoice_id: InvoiceId) -> Result<Decimal, InvoicingError> {
        self.ledger.completed_payment_total(invoice_id).await
    }

    /// Derives the invoice's payment status and writes back drifted fields.
    pub async fn resolve_status(
        &self,
        invoice_id: InvoiceId,
    ) -> Result<PaymentResolution, InvoicingError> {
        let mut invoice = self.load_invoice(invoice_id).await?;
        self.reconcile(&mut invoice).await
    }

    /// Builds the full report for an invoice.
    ///
    /// Reads are not isolated from each other unless the ledger is.
    pub async fn assemble_report(
        &self,
        invoice_id: InvoiceId,
    ) -> Result<InvoiceReport, InvoicingError> {
        let mut invoice = self.load_invoice(invoice_id).await?;

        let billing_address = self
            .ledger
            .find_address(invoice.billing_address_id)
            .await?
            .ok_or(InvoicingError::AddressNotFound(invoice.billing_address_id))?;

        let shipping_address = match invoice.shipping_address_id {
            Some(id) => Some(
                self.ledger
                    .find_address(id)
                    .await?
                    .ok_or(InvoicingError::AddressNotFound(id))?,
            ),
            None => None,
        };

        let payment_status = self.reconcile(&mut invoice).await?;

        let sender_company = self
            .ledger
            .find_company(invoice.sender_company_id)
            .await?
            .ok_or(InvoicingError::CompanyNotFound(invoice.sender_company_id))?;

        let recipient_company = self
            .ledger
            .find_company(invoice.recipient_company_id)
            .await?
            .ok_or(InvoicingError::CompanyNotFound(invoice.recipient_company_id))?;

        let order = match invoice.order_id {
            Some(id) => Some(
                self.ledger
                    .find_order(id)
                    .await?
                    .ok_or(InvoicingError::OrderNotFound(id))?,
            ),
            None => None,
        };

        let items = self.ledger.list_line_items(invoice_id).await?;
        let payments = self.ledger.list_payments(invoice_id).await?;

        let amounts: Vec<_> = items.iter().map(|item| item.amounts()).collect();
        let computed_totals = TotalsCalculator::calculate(&amounts)?.rounded();
        if computed_totals.grand_total != invoice.grand_total {
            debug!(
                invoice_id = %invoice_id,
                stored = %invoice.grand_total,
                computed = %computed_totals.grand_total,
                "Stored grand total differs from line items"
            );
        }

        Ok(InvoiceReport {
            invoice,
            sender_company,
            recipient_company,
            billing_address,
            shipping_address,
            order,
            items,
            payments,
            payment_status,
            computed_totals,
        })
    }

    async fn load_invoice(&self, invoice_id: InvoiceId) -> Result<InvoiceRecord, InvoicingError> {
        self.ledger
            .find_invoice(invoice_id)
            .await?
            .ok_or(InvoicingError::InvoiceNotFound(invoice_id))
    }

    async fn reconcile(
        &self,
        invoice: &mut InvoiceRecord,
    ) -> Result<PaymentResolution, InvoicingError> {
        let total_paid = self.ledger.completed_payment_total(invoice.id).await?;
        let resolution = StatusResolver::resolve(invoice.grand_total, total_paid);

        if let Some(repair) = StatusResolver::plan_repair(&invoice.payment_fields(), &resolution) {
            warn!(
                invoice_id = %invoice.id,
                stored_paid = %invoice.amount_paid,
                stored_due = %invoice.amount_due,
                stored_status = %invoice.status,
                amount_paid = %repair.amount_paid,
                amount_due = %repair.amount_due,
                status = %repair.status,
                "Repairing drifted invoice payment fields"
            );
            self.ledger.write_payment_fields(invoice.id, repair).await?;
            invoice.apply_payment_fields(repair);
        }

        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};
    use invoicer_shared::types::{
        AddressId, CompanyId, InvoiceItemId, ItemId, OrderId, OrderItemId, PaymentId,
    };
    use rust_decimal_macros::dec;

    use super::*;
    use crate::invoicing::ledger::MockInvoiceLedger;
    use crate::invoicing::types::{
        AddressRecord, CompanyRecord, InvoiceLineRecord, InvoiceStatus, OrderLineRecord,
        OrderRecord, PaymentFields, PaymentRecord, PaymentStatus, SettlementStatus,
    };

    /// In-memory ledger that counts writes.
    #[derive(Default)]
    struct MemoryLedger {
        invoices: Mutex<HashMap<InvoiceId, InvoiceRecord>>,
        companies: HashMap<CompanyId, CompanyRecord>,
        addresses: HashMap<AddressId, AddressRecord>,
        orders: HashMap<OrderId, OrderRecord>,
        lines: HashMap<InvoiceId, Vec<InvoiceLineRecord>>,
        payments: Mutex<Vec<PaymentRecord>>,
        writes: Mutex<usize>,
    }

    impl MemoryLedger {
        fn writes(&self) -> usize {
            *self.writes.lock().unwrap()
        }

        fn invoice(&self, id: InvoiceId) -> InvoiceRecord {
            self.invoices.lock().unwrap()[&id].clone()
        }

        fn add_payment(&self, invoice_id: InvoiceId, amount: Decimal, status: PaymentStatus) {
            self.payments.lock().unwrap().push(PaymentRecord {
                id: PaymentId::new(),
                invoice_id,
                payment_date: Utc::now(),
                amount,
                method: "bank_transfer".to_string(),
                status,
                transaction_reference: None,
            });
        }
    }

    #[async_trait]
    impl InvoiceLedger for MemoryLedger {
        async fn find_invoice(
            &self,
            id: InvoiceId,
        ) -> Result<Option<InvoiceRecord>, InvoicingError> {
            Ok(self.invoices.lock().unwrap().get(&id).cloned())
        }

        async fn find_company(
            &self,
            id: CompanyId,
        ) -> Result<Option<CompanyRecord>, InvoicingError> {
            Ok(self.companies.get(&id).cloned())
        }

        async fn find_address(
            &self,
            id: AddressId,
        ) -> Result<Option<AddressRecord>, InvoicingError> {
            Ok(self.addresses.get(&id).cloned())
        }

        async fn find_order(&self, id: OrderId) -> Result<Option<OrderRecord>, InvoicingError> {
            Ok(self.orders.get(&id).cloned())
        }

        async fn list_line_items(
            &self,
            invoice_id: InvoiceId,
        ) -> Result<Vec<InvoiceLineRecord>, InvoicingError> {
            Ok(self.lines.get(&invoice_id).cloned().unwrap_or_default())
        }

        async fn list_payments(
            &self,
            invoice_id: InvoiceId,
        ) -> Result<Vec<PaymentRecord>, InvoicingError> {
            Ok(self
                .payments
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.invoice_id == invoice_id)
                .cloned()
                .collect())
        }

        async fn write_payment_fields(
            &self,
            invoice_id: InvoiceId,
            fields: PaymentFields,
        ) -> Result<(), InvoicingError> {
            let mut invoices = self.invoices.lock().unwrap();
            let invoice = invoices
                .get_mut(&invoice_id)
                .ok_or(InvoicingError::InvoiceNotFound(invoice_id))?;
            invoice.apply_payment_fields(fields);
            invoice.updated_at = Utc::now();
            *self.writes.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn company(name: &str) -> CompanyRecord {
        CompanyRecord {
            id: CompanyId::new(),
            company_name: name.to_string(),
            contact_person: None,
            email: None,
            phone: None,
            is_customer: true,
            is_vendor: false,
        }
    }

    fn address(company_id: CompanyId, address_type: &str) -> AddressRecord {
        AddressRecord {
            id: AddressId::new(),
            company_id,
            address_type: address_type.to_string(),
            street: "789 Tech Park".to_string(),
            city: "Austin".to_string(),
            state_province: Some("Texas".to_string()),
            postal_code: Some("78701".to_string()),
            country: "United States".to_string(),
        }
    }

    fn invoice(
        sender: &CompanyRecord,
        recipient: &CompanyRecord,
        billing: &AddressRecord,
        grand_total: Decimal,
        amount_paid: Decimal,
        status: InvoiceStatus,
    ) -> InvoiceRecord {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        InvoiceRecord {
            id: InvoiceId::new(),
            invoice_number: "INV-2025-0001".to_string(),
            sender_company_id: sender.id,
            recipient_company_id: recipient.id,
            billing_address_id: billing.id,
            shipping_address_id: None,
            order_id: None,
            invoice_subject: None,
            invoice_date: date,
            due_date: date + chrono::Days::new(30),
            subtotal: grand_total,
            tax_total: Decimal::ZERO,
            grand_total,
            amount_paid,
            amount_due: grand_total - amount_paid,
            status,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Ledger holding one invoice from InvoiceGo Corp to Alpha Technologies.
    fn seeded(grand_total: Decimal, amount_paid: Decimal, status: InvoiceStatus) -> (MemoryLedger, InvoiceId) {
        let sender = company("InvoiceGo Corp");
        let recipient = company("Alpha Technologies");
        let billing = address(recipient.id, "billing");
        let record = invoice(&sender, &recipient, &billing, grand_total, amount_paid, status);
        let id = record.id;

        let mut ledger = MemoryLedger::default();
        ledger.companies.insert(sender.id, sender);
        ledger.companies.insert(recipient.id, recipient);
        ledger.addresses.insert(billing.id, billing);
        ledger.invoices.lock().unwrap().insert(id, record);
        (ledger, id)
    }

    #[tokio::test]
    async fn test_resolve_paid_invoice() {
        let (ledger, id) = seeded(dec!(702.00), dec!(702.00), InvoiceStatus::Paid);
        ledger.add_payment(id, dec!(702.00), PaymentStatus::Completed);
        let service = InvoicingService::new(ledger);

        let resolution = service.resolve_status(id).await.unwrap();
        assert_eq!(resolution.status, SettlementStatus::Paid);
        assert_eq!(resolution.amount_due, dec!(0.00));
        assert_eq!(service.ledger().writes(), 0);
    }

    #[tokio::test]
    async fn test_resolve_partial_invoice() {
        let (ledger, id) = seeded(dec!(2970.00), dec!(1500.00), InvoiceStatus::Partial);
        ledger.add_payment(id, dec!(1500.00), PaymentStatus::Completed);
        let service = InvoicingService::new(ledger);

        let resolution = service.resolve_status(id).await.unwrap();
        assert_eq!(resolution.status, SettlementStatus::Partial);
        assert_eq!(resolution.amount_due, dec!(1470.00));
    }

    #[tokio::test]
    async fn test_resolve_unpaid_invoice() {
        let (ledger, id) = seeded(dec!(378.00), dec!(0.00), InvoiceStatus::Sent);
        let service = InvoicingService::new(ledger);

        let resolution = service.resolve_status(id).await.unwrap();
        assert_eq!(resolution.status, SettlementStatus::Unpaid);
        assert_eq!(resolution.amount_due, dec!(378.00));
        assert_eq!(service.ledger().writes(), 0);
    }

    #[tokio::test]
    async fn test_resolve_repairs_once() {
        let (ledger, id) = seeded(dec!(2970.00), dec!(0.00), InvoiceStatus::Sent);
        ledger.add_payment(id, dec!(1000.00), PaymentStatus::Completed);
        ledger.add_payment(id, dec!(500.00), PaymentStatus::Completed);
        ledger.add_payment(id, dec!(900.00), PaymentStatus::Pending);
        ledger.add_payment(id, dec!(70.00), PaymentStatus::Failed);
        let service = InvoicingService::new(ledger);

        let first = service.resolve_status(id).await.unwrap();
        assert_eq!(service.ledger().writes(), 1);

        let stored = service.ledger().invoice(id);
        assert_eq!(stored.amount_paid, dec!(1500.00));
        assert_eq!(stored.amount_due, dec!(1470.00));
        assert_eq!(stored.status, InvoiceStatus::Partial);

        let second = service.resolve_status(id).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(service.ledger().writes(), 1);
    }

    #[tokio::test]
    async fn test_resolve_picks_up_new_payment() {
        let (ledger, id) = seeded(dec!(378.00), dec!(0.00), InvoiceStatus::Sent);
        let service = InvoicingService::new(ledger);
        assert_eq!(
            service.resolve_status(id).await.unwrap().status,
            SettlementStatus::Unpaid
        );

        service
            .ledger()
            .add_payment(id, dec!(378.00), PaymentStatus::Completed);
        let resolution = service.resolve_status(id).await.unwrap();
        assert_eq!(resolution.status, SettlementStatus::Paid);
        assert_eq!(service.ledger().invoice(id).status, InvoiceStatus::Paid);
    }

    #[tokio::test]
    async fn test_resolve_missing_invoice() {
        let service = InvoicingService::new(MemoryLedger::default());
        let id = InvoiceId::new();
        let err = service.resolve_status(id).await.unwrap_err();
        assert!(matches!(err, InvoicingError::InvoiceNotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_report_for_missing_invoice_does_no_other_lookups() {
        let mut ledger = MockInvoiceLedger::new();
        ledger.expect_find_invoice().times(1).returning(|_| Ok(None));
        ledger.expect_find_company().never();
        ledger.expect_find_address().never();
        ledger.expect_find_order().never();
        ledger.expect_list_line_items().never();
        ledger.expect_list_payments().never();
        ledger.expect_completed_payment_total().never();
        ledger.expect_write_payment_fields().never();

        let service = InvoicingService::new(ledger);
        let err = service.assemble_report(InvoiceId::new()).await.unwrap_err();
        assert!(matches!(err, InvoicingError::InvoiceNotFound(_)));
    }

    #[tokio::test]
    async fn test_resolve_propagates_storage_error() {
        let mut ledger = MockInvoiceLedger::new();
        ledger
            .expect_find_invoice()
            .returning(|_| Err(InvoicingError::Storage("connection refused".into())));
        ledger.expect_write_payment_fields().never();

        let service = InvoicingService::new(ledger);
        let err = service.resolve_status(InvoiceId::new()).await.unwrap_err();
        assert!(matches!(err, InvoicingError::Storage(_)));
    }

    #[tokio::test]
    async fn test_report_without_order() {
        let (ledger, id) = seeded(dec!(378.00), dec!(0.00), InvoiceStatus::Sent);
        let service = InvoicingService::new(ledger);

        let report = service.assemble_report(id).await.unwrap();
        assert!(report.order.is_none());
        assert!(report.shipping_address.is_none());
        assert_eq!(report.sender_company.company_name, "InvoiceGo Corp");
        assert_eq!(report.recipient_company.company_name, "Alpha Technologies");
        assert_eq!(report.payment_status.status, SettlementStatus::Unpaid);
        assert!(report.items.is_empty());
        assert_eq!(report.computed_totals.grand_total, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_report_with_order_items_and_payments() {
        let (mut ledger, id) = seeded(dec!(702.00), dec!(0.00), InvoiceStatus::Sent);
        let recipient_id = ledger.invoice(id).recipient_company_id;

        let order_id = OrderId::new();
        let item_id = ItemId::new();
        ledger.orders.insert(
            order_id,
            OrderRecord {
                id: order_id,
                customer_company_id: recipient_id,
                order_date: Utc::now(),
                total_price: dec!(650.00),
                status: "completed".to_string(),
                items: vec![OrderLineRecord {
                    id: OrderItemId::new(),
                    item_id,
                    item_name: "Standard Widget".to_string(),
                    quantity: dec!(13),
                    unit_price: dec!(50.00),
                    item_total: dec!(650.00),
                }],
            },
        );
        ledger.lines.insert(
            id,
            vec![InvoiceLineRecord {
                id: InvoiceItemId::new(),
                item_id: Some(item_id),
                item_name: Some("Standard Widget".to_string()),
                description: "Standard Widget".to_string(),
                quantity: dec!(13),
                unit_price: dec!(50.00),
                item_total: dec!(650.00),
                tax_rate_percentage: dec!(8.00),
            }],
        );
        ledger.invoices.lock().unwrap().get_mut(&id).unwrap().order_id = Some(order_id);
        ledger.add_payment(id, dec!(702.00), PaymentStatus::Completed);
        ledger.add_payment(id, dec!(50.00), PaymentStatus::Refunded);

        let service = InvoicingService::new(ledger);
        let report = service.assemble_report(id).await.unwrap();

        assert_eq!(report.order.as_ref().unwrap().items.len(), 1);
        assert_eq!(report.items.len(), 1);
        assert_eq!(report.payments.len(), 2);
        assert_eq!(report.payment_status.status, SettlementStatus::Paid);
        assert_eq!(report.payment_status.amount_due, dec!(0.00));
        assert_eq!(report.computed_totals.grand_total, dec!(702.00));
        // the embedded invoice reflects the repair
        assert_eq!(report.invoice.status, InvoiceStatus::Paid);
        assert_eq!(report.invoice.amount_paid, dec!(702.00));
        assert_eq!(service.ledger().writes(), 1);
    }

    #[tokio::test]
    async fn test_report_with_dangling_order() {
        let (ledger, id) = seeded(dec!(378.00), dec!(0.00), InvoiceStatus::Sent);
        let missing = OrderId::new();
        ledger.invoices.lock().unwrap().get_mut(&id).unwrap().order_id = Some(missing);
        let service = InvoicingService::new(ledger);

        let err = service.assemble_report(id).await.unwrap_err();
        assert!(matches!(err, InvoicingError::OrderNotFound(o) if o == missing));
    }

    #[tokio::test]
    async fn test_report_with_missing_recipient() {
        let (mut ledger, id) = seeded(dec!(378.00), dec!(0.00), InvoiceStatus::Sent);
        let recipient_id = ledger.invoice(id).recipient_company_id;
        ledger.companies.remove(&recipient_id);
        let service = InvoicingService::new(ledger);

        let err = service.assemble_report(id).await.unwrap_err();
        assert!(matches!(err, InvoicingError::CompanyNotFound(c) if c == recipient_id));
    }
}
