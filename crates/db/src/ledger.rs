//! `SeaORM` implementation of the invoicing engine's storage seam.

use async_trait::async_trait;
use chrono::Utc;
use invoicer_core::invoicing::{
    AddressRecord, CompanyRecord, InvoiceLedger, InvoiceLineRecord, InvoiceRecord, InvoicingError,
    OrderLineRecord, OrderRecord, PaymentFields, PaymentRecord,
};
use invoicer_shared::types::{AddressId, CompanyId, InvoiceId, OrderId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveEnum, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::{
    addresses, companies, invoice_items, invoices, items, order_items, orders, payments,
    sea_orm_active_enums::PaymentStatus,
};

/// Invoice ledger over any `SeaORM` connection or transaction.
///
/// Built with [`SeaLedger::locking`] on a transaction, invoice reads take a
/// `FOR UPDATE` row lock that is held until the transaction ends.
#[derive(Debug, Clone, Copy)]
pub struct SeaLedger<'c, C> {
    conn: &'c C,
    lock_invoices: bool,
}

impl<'c, C: ConnectionTrait> SeaLedger<'c, C> {
    /// Plain reads, no row locks.
    pub const fn new(conn: &'c C) -> Self {
        Self {
            conn,
            lock_invoices: false,
        }
    }

    /// Reads invoice rows with `SELECT ... FOR UPDATE`.
    pub const fn locking(conn: &'c C) -> Self {
        Self {
            conn,
            lock_invoices: true,
        }
    }
}

pub(crate) fn storage(err: DbErr) -> InvoicingError {
    InvoicingError::Storage(err.to_string())
}

#[async_trait]
impl<C> InvoiceLedger for SeaLedger<'_, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_invoice(&self, id: InvoiceId) -> Result<Option<InvoiceRecord>, InvoicingError> {
        let mut query = invoices::Entity::find_by_id(id.into_inner());
        if self.lock_invoices {
            query = query.lock_exclusive();
        }
        let invoice = query.one(self.conn).await.map_err(storage)?;
        Ok(invoice.map(InvoiceRecord::from))
    }

    async fn find_company(&self, id: CompanyId) -> Result<Option<CompanyRecord>, InvoicingError> {
        let company = companies::Entity::find_by_id(id.into_inner())
            .one(self.conn)
            .await
            .map_err(storage)?;
        Ok(company.map(CompanyRecord::from))
    }

    async fn find_address(&self, id: AddressId) -> Result<Option<AddressRecord>, InvoicingError> {
        let address = addresses::Entity::find_by_id(id.into_inner())
            .one(self.conn)
            .await
            .map_err(storage)?;
        Ok(address.map(AddressRecord::from))
    }

    async fn find_order(&self, id: OrderId) -> Result<Option<OrderRecord>, InvoicingError> {
        let Some(order) = orders::Entity::find_by_id(id.into_inner())
            .one(self.conn)
            .await
            .map_err(storage)?
        else {
            return Ok(None);
        };

        let lines = order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(order.id))
            .find_also_related(items::Entity)
            .order_by_asc(order_items::Column::CreatedAt)
            .order_by_asc(order_items::Column::Id)
            .all(self.conn)
            .await
            .map_err(storage)?;

        Ok(Some(order_record(order, lines)))
    }

    async fn list_line_items(
        &self,
        invoice_id: InvoiceId,
    ) -> Result<Vec<InvoiceLineRecord>, InvoicingError> {
        let rows = invoice_items::Entity::find()
            .filter(invoice_items::Column::InvoiceId.eq(invoice_id.into_inner()))
            .find_also_related(items::Entity)
            .order_by_asc(invoice_items::Column::CreatedAt)
            .order_by_asc(invoice_items::Column::Id)
            .all(self.conn)
            .await
            .map_err(storage)?;

        Ok(rows
            .into_iter()
            .map(|(line, item)| line_record(line, item))
            .collect())
    }

    async fn list_payments(
        &self,
        invoice_id: InvoiceId,
    ) -> Result<Vec<PaymentRecord>, InvoicingError> {
        let rows = payments::Entity::find()
            .filter(payments::Column::InvoiceId.eq(invoice_id.into_inner()))
            .order_by_asc(payments::Column::PaymentDate)
            .all(self.conn)
            .await
            .map_err(storage)?;

        Ok(rows.into_iter().map(PaymentRecord::from).collect())
    }

    async fn completed_payment_total(&self, invoice_id: InvoiceId) -> Result<Decimal, InvoicingError> {
        let total: Option<Option<Decimal>> = payments::Entity::find()
            .select_only()
            .column_as(payments::Column::Amount.sum(), "total")
            .filter(payments::Column::InvoiceId.eq(invoice_id.into_inner()))
            .filter(payments::Column::Status.eq(PaymentStatus::Completed))
            .into_tuple()
            .one(self.conn)
            .await
            .map_err(storage)?;

        Ok(total.flatten().unwrap_or(Decimal::ZERO))
    }

    async fn write_payment_fields(
        &self,
        invoice_id: InvoiceId,
        fields: PaymentFields,
    ) -> Result<(), InvoicingError> {
        let update = invoices::ActiveModel {
            amount_paid: Set(fields.amount_paid),
            amount_due: Set(fields.amount_due),
            status: Set(fields.status.into()),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let result = invoices::Entity::update_many()
            .set(update)
            .filter(invoices::Column::Id.eq(invoice_id.into_inner()))
            .exec(self.conn)
            .await
            .map_err(storage)?;

        if result.rows_affected == 0 {
            return Err(InvoicingError::InvoiceNotFound(invoice_id));
        }
        Ok(())
    }
}

// ============================================================================
// Model -> record conversions
// ============================================================================

impl From<invoices::Model> for InvoiceRecord {
    fn from(model: invoices::Model) -> Self {
        Self {
            id: model.id.into(),
            invoice_number: model.invoice_number,
            sender_company_id: model.sender_company_id.into(),
            recipient_company_id: model.recipient_company_id.into(),
            billing_address_id: model.billing_address_id.into(),
            shipping_address_id: model.shipping_address_id.map(Into::into),
            order_id: model.order_id.map(Into::into),
            invoice_subject: model.invoice_subject,
            invoice_date: model.invoice_date,
            due_date: model.due_date,
            subtotal: model.subtotal,
            tax_total: model.tax_total,
            grand_total: model.grand_total,
            amount_paid: model.amount_paid,
            amount_due: model.amount_due,
            status: model.status.into(),
            notes: model.notes,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<companies::Model> for CompanyRecord {
    fn from(model: companies::Model) -> Self {
        Self {
            id: model.id.into(),
            company_name: model.company_name,
            contact_person: model.contact_person,
            email: model.email,
            phone: model.phone,
            is_customer: model.is_customer,
            is_vendor: model.is_vendor,
        }
    }
}

impl From<addresses::Model> for AddressRecord {
    fn from(model: addresses::Model) -> Self {
        Self {
            id: model.id.into(),
            company_id: model.company_id.into(),
            address_type: model.address_type.to_value(),
            street: model.street,
            city: model.city,
            state_province: model.state_province,
            postal_code: model.postal_code,
            country: model.country,
        }
    }
}

impl From<payments::Model> for PaymentRecord {
    fn from(model: payments::Model) -> Self {
        Self {
            id: model.id.into(),
            invoice_id: model.invoice_id.into(),
            payment_date: model.payment_date.with_timezone(&Utc),
            amount: model.amount,
            method: model.method,
            status: model.status.into(),
            transaction_reference: model.transaction_reference,
        }
    }
}

pub(crate) fn line_record(line: invoice_items::Model, item: Option<items::Model>) -> InvoiceLineRecord {
    InvoiceLineRecord {
        id: line.id.into(),
        item_id: line.item_id.map(Into::into),
        item_name: item.map(|i| i.name),
        description: line.description,
        quantity: line.quantity,
        unit_price: line.unit_price,
        item_total: line.item_total,
        tax_rate_percentage: line.tax_rate_percentage,
    }
}

pub(crate) fn order_record(
    order: orders::Model,
    lines: Vec<(order_items::Model, Option<items::Model>)>,
) -> OrderRecord {
    OrderRecord {
        id: order.id.into(),
        customer_company_id: order.customer_company_id.into(),
        order_date: order.order_date.with_timezone(&Utc),
        total_price: order.total_price,
        status: order.status.to_value(),
        items: lines
            .into_iter()
            .map(|(line, item)| OrderLineRecord {
                id: line.id.into(),
                item_id: line.item_id.into(),
                item_name: item.map(|i| i.name).unwrap_or_default(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                item_total: line.item_total,
            })
            .collect(),
    }
}
