//! Storage seam for the invoicing engine.

use async_trait::async_trait;
use invoicer_shared::types::{AddressId, CompanyId, InvoiceId, OrderId};
use rust_decimal::Decimal;

use super::error::InvoicingError;
use super::payments::PaymentAggregator;
use super::types::{
    AddressRecord, CompanyRecord, InvoiceLineRecord, InvoiceRecord, OrderRecord, PaymentFields,
    PaymentRecord,
};

/// Read and write access to the invoicing tables.
///
/// Lookups return `Ok(None)` for missing rows; deciding whether that is an
/// error is left to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceLedger: Send + Sync {
    /// Loads an invoice header.
    async fn find_invoice(&self, id: InvoiceId) -> Result<Option<InvoiceRecord>, InvoicingError>;

    /// Loads a company.
    async fn find_company(&self, id: CompanyId) -> Result<Option<CompanyRecord>, InvoicingError>;

    /// Loads an address.
    async fn find_address(&self, id: AddressId) -> Result<Option<AddressRecord>, InvoicingError>;

    /// Loads an order with its lines.
    async fn find_order(&self, id: OrderId) -> Result<Option<OrderRecord>, InvoicingError>;

    /// Lists an invoice's line items in insertion order.
    async fn list_line_items(
        &self,
        invoice_id: InvoiceId,
    ) -> Result<Vec<InvoiceLineRecord>, InvoicingError>;

    /// Lists every payment for an invoice, oldest first.
    async fn list_payments(&self, invoice_id: InvoiceId)
    -> Result<Vec<PaymentRecord>, InvoicingError>;

    /// Sum of completed payments for an invoice.
    async fn completed_payment_total(&self, invoice_id: InvoiceId) -> Result<Decimal, InvoicingError> {
        let payments = self.list_payments(invoice_id).await?;
        Ok(PaymentAggregator::total_paid(&payments))
    }

    /// Persists amount paid, amount due and status, refreshing `updated_at`.
    async fn write_payment_fields(
        &self,
        invoice_id: InvoiceId,
        fields: PaymentFields,
    ) -> Result<(), InvoicingError>;
}
