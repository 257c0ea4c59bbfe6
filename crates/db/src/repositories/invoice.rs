//! Invoice repository.
//!
//! Line item writes recompute the stored totals in the same transaction.
//! Status resolution and report assembly run the invoicing engine over a
//! [`SeaLedger`]; with [`ReconcileMode::Locked`] the whole run happens in one
//! transaction holding the invoice row lock.

use chrono::{Datelike, Days, NaiveDate, Utc};
use invoicer_core::invoicing::{
    InvoiceLedger, InvoiceLineRecord, InvoiceRecord, InvoiceReport, InvoiceStatus,
    InvoicingError, InvoicingService, LineAmounts, PaymentResolution, TotalsCalculator,
};
use invoicer_shared::types::money::round_currency;
use invoicer_shared::types::{InvoiceId, InvoiceItemId};
use invoicer_shared::{AppError, InvoicingConfig, ReconcileMode};
use rand::Rng;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::entities::{
    addresses, companies, invoice_items, invoices, items, orders,
    sea_orm_active_enums::InvoiceStatus as DbInvoiceStatus,
};
use crate::ledger::{SeaLedger, line_record};

/// Attempts at drawing an unused invoice number before giving up.
const NUMBER_ATTEMPTS: usize = 8;

/// Error types for invoice operations.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    /// Engine error.
    #[error(transparent)]
    Invoicing(#[from] InvoicingError),

    /// Invoice number already in use.
    #[error("Invoice number already exists: {0}")]
    DuplicateNumber(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<InvoiceError> for AppError {
    fn from(err: InvoiceError) -> Self {
        match err {
            InvoiceError::Invoicing(e) => e.into(),
            InvoiceError::DuplicateNumber(_) => Self::Conflict(err.to_string()),
            InvoiceError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

fn invalid(msg: impl Into<String>) -> InvoiceError {
    InvoiceError::Invoicing(InvoicingError::InvalidInput(msg.into()))
}

/// One line item in a create or add request.
///
/// `description` and `unit_price` fall back to the catalog item when
/// `item_id` is given.
#[derive(Debug, Clone, Deserialize)]
#[allow(missing_docs)]
pub struct LineItemInput {
    pub item_id: Option<Uuid>,
    pub description: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Option<Decimal>,
    #[serde(default)]
    pub tax_rate_percentage: Decimal,
}

/// Partial update for a line item.
#[derive(Debug, Clone, Default, Deserialize)]
#[allow(missing_docs)]
pub struct UpdateLineItemInput {
    pub description: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub tax_rate_percentage: Option<Decimal>,
}

/// Input for creating an invoice.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceInput {
    /// Issuing company.
    pub sender_company_id: Uuid,
    /// Billed company.
    pub recipient_company_id: Uuid,
    /// Billing address.
    pub billing_address_id: Uuid,
    /// Optional shipping address.
    pub shipping_address_id: Option<Uuid>,
    /// Optional originating order.
    pub order_id: Option<Uuid>,
    /// Explicit invoice number; generated when absent.
    pub invoice_number: Option<String>,
    /// Subject line.
    pub invoice_subject: Option<String>,
    /// Issue date, defaults to today.
    pub invoice_date: Option<NaiveDate>,
    /// Due date, defaults to issue date plus the configured payment terms.
    pub due_date: Option<NaiveDate>,
    /// Free text.
    pub notes: Option<String>,
    /// Initial line items.
    #[serde(default)]
    pub items: Vec<LineItemInput>,
}

/// A line item write together with the invoice totals it produced.
#[derive(Debug, Clone, Serialize)]
pub struct LineItemChange {
    /// The written line.
    pub item: InvoiceLineRecord,
    /// The invoice after recomputing totals.
    pub invoice: InvoiceRecord,
}

/// A validated line ready for insert.
struct PreparedLine {
    item_id: Option<Uuid>,
    item_name: Option<String>,
    description: String,
    amounts: LineAmounts,
}

/// Formats an invoice number as `{prefix}-{year}-{sequence:04}`.
fn format_number(prefix: &str, year: i32, sequence: u16) -> String {
    format!("{prefix}-{year}-{sequence:04}")
}

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
    config: InvoicingConfig,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, config: InvoicingConfig) -> Self {
        Self { db, config }
    }

    // ========================================================================
    // Invoices
    // ========================================================================

    /// Creates a draft invoice with optional initial line items.
    ///
    /// # Errors
    ///
    /// Returns not-found errors for unknown companies, addresses, orders or
    /// items, `InvalidInput` for bad dates or line amounts, and
    /// `DuplicateNumber` for an invoice number already in use.
    pub async fn create(&self, input: CreateInvoiceInput) -> Result<InvoiceRecord, InvoiceError> {
        let invoice_date = input.invoice_date.unwrap_or_else(|| Utc::now().date_naive());
        let due_date = match input.due_date {
            Some(date) => date,
            None => invoice_date
                .checked_add_days(Days::new(u64::from(self.config.payment_terms_days)))
                .ok_or_else(|| invalid("due date out of range"))?,
        };
        if due_date < invoice_date {
            return Err(invalid("due_date must not be before invoice_date"));
        }

        let txn = self.db.begin().await?;

        ensure_company(&txn, input.sender_company_id).await?;
        ensure_company(&txn, input.recipient_company_id).await?;
        ensure_address(&txn, input.billing_address_id).await?;
        if let Some(id) = input.shipping_address_id {
            ensure_address(&txn, id).await?;
        }
        if let Some(id) = input.order_id {
            orders::Entity::find_by_id(id)
                .one(&txn)
                .await?
                .ok_or(InvoicingError::OrderNotFound(id.into()))?;
        }

        let invoice_number = match input.invoice_number.as_deref().map(str::trim) {
            Some("") => return Err(invalid("invoice_number must not be blank")),
            Some(number) => {
                if number_taken(&txn, number).await? {
                    return Err(InvoiceError::DuplicateNumber(number.to_string()));
                }
                number.to_string()
            }
            None => self.generate_number(&txn, invoice_date).await?,
        };

        let mut lines = Vec::with_capacity(input.items.len());
        for line in input.items {
            lines.push(prepare_line(&txn, line).await?);
        }
        let totals = TotalsCalculator::calculate(lines.iter().map(|l| &l.amounts))?
            .rounded()
            .ensure_storable()?;

        let now = Utc::now().into();
        let invoice_id = Uuid::now_v7();
        let invoice = invoices::ActiveModel {
            id: Set(invoice_id),
            invoice_number: Set(invoice_number),
            sender_company_id: Set(input.sender_company_id),
            recipient_company_id: Set(input.recipient_company_id),
            billing_address_id: Set(input.billing_address_id),
            shipping_address_id: Set(input.shipping_address_id),
            order_id: Set(input.order_id),
            invoice_subject: Set(input.invoice_subject),
            invoice_date: Set(invoice_date),
            due_date: Set(due_date),
            subtotal: Set(totals.subtotal),
            tax_total: Set(totals.tax_total),
            grand_total: Set(totals.grand_total),
            amount_paid: Set(Decimal::ZERO),
            amount_due: Set(totals.grand_total),
            status: Set(DbInvoiceStatus::Draft),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        for line in lines {
            insert_line(&txn, invoice_id, line).await?;
        }

        txn.commit().await?;

        info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            grand_total = %invoice.grand_total,
            "Invoice created"
        );
        Ok(invoice.into())
    }

    /// Gets an invoice by ID.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound` if no invoice has this ID.
    pub async fn get(&self, id: InvoiceId) -> Result<InvoiceRecord, InvoiceError> {
        let invoice = SeaLedger::new(&self.db)
            .find_invoice(id)
            .await?
            .ok_or(InvoicingError::InvoiceNotFound(id))?;
        Ok(invoice)
    }

    /// Lists invoices, newest first, optionally filtered by stored status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, status: Option<InvoiceStatus>) -> Result<Vec<InvoiceRecord>, InvoiceError> {
        let mut query = invoices::Entity::find();
        if let Some(status) = status {
            query = query.filter(invoices::Column::Status.eq(DbInvoiceStatus::from(status)));
        }
        let rows = query
            .order_by_desc(invoices::Column::InvoiceDate)
            .order_by_desc(invoices::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(InvoiceRecord::from).collect())
    }

    /// Sets the stored lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound` for an unknown invoice and
    /// `InvalidTransition` when leaving `cancelled`.
    pub async fn update_status(
        &self,
        id: InvoiceId,
        status: InvoiceStatus,
    ) -> Result<InvoiceRecord, InvoiceError> {
        let txn = self.db.begin().await?;

        let invoice = lock_invoice(&txn, id).await?;
        let current: InvoiceStatus = invoice.status.into();
        if !current.can_transition_to(status) {
            return Err(InvoicingError::InvalidTransition {
                from: current,
                to: status,
            }
            .into());
        }

        let mut active: invoices::ActiveModel = invoice.into();
        active.status = Set(status.into());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(invoice_id = %id, from = %current, to = %status, "Invoice status updated");
        Ok(updated.into())
    }

    // ========================================================================
    // Line items
    // ========================================================================

    /// Lists an invoice's line items with catalog names.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound` if no invoice has this ID.
    pub async fn line_items(&self, id: InvoiceId) -> Result<Vec<InvoiceLineRecord>, InvoiceError> {
        let ledger = SeaLedger::new(&self.db);
        ledger
            .find_invoice(id)
            .await?
            .ok_or(InvoicingError::InvoiceNotFound(id))?;
        Ok(ledger.list_line_items(id).await?)
    }

    /// Adds a line item and recomputes the invoice totals.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound`, `InvoiceCancelled`, `ItemNotFound` or
    /// `InvalidInput`.
    pub async fn add_line_item(
        &self,
        id: InvoiceId,
        input: LineItemInput,
    ) -> Result<LineItemChange, InvoiceError> {
        let txn = self.db.begin().await?;

        let invoice = lock_open_invoice(&txn, id).await?;
        let line = prepare_line(&txn, input).await?;
        let item = insert_line(&txn, invoice.id, line).await?;
        let invoice = recompute_totals(&txn, invoice).await?;

        txn.commit().await?;

        info!(
            invoice_id = %id,
            line_id = %item.id,
            grand_total = %invoice.grand_total,
            "Line item added"
        );
        Ok(LineItemChange {
            item,
            invoice: invoice.into(),
        })
    }

    /// Updates a line item and recomputes the invoice totals.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound`, `LineItemNotFound`, `InvoiceCancelled` or
    /// `InvalidInput`.
    pub async fn update_line_item(
        &self,
        id: InvoiceId,
        line_id: InvoiceItemId,
        input: UpdateLineItemInput,
    ) -> Result<LineItemChange, InvoiceError> {
        let description = match input.description.as_deref().map(str::trim) {
            Some("") => return Err(invalid("description must not be blank")),
            other => other.map(str::to_string),
        };

        let txn = self.db.begin().await?;

        let invoice = lock_open_invoice(&txn, id).await?;
        let line = invoice_items::Entity::find_by_id(line_id.into_inner())
            .filter(invoice_items::Column::InvoiceId.eq(invoice.id))
            .one(&txn)
            .await?
            .ok_or(InvoicingError::LineItemNotFound(line_id))?;

        let amounts = LineAmounts::new(
            input.quantity.unwrap_or(line.quantity),
            input.unit_price.unwrap_or(line.unit_price),
            input.tax_rate_percentage.unwrap_or(line.tax_rate_percentage),
        );
        amounts.validate()?;

        let catalog = match line.item_id {
            Some(item_id) => items::Entity::find_by_id(item_id).one(&txn).await?,
            None => None,
        };

        let mut active: invoice_items::ActiveModel = line.into();
        if let Some(description) = description {
            active.description = Set(description);
        }
        active.quantity = Set(amounts.quantity);
        active.unit_price = Set(amounts.unit_price);
        active.tax_rate_percentage = Set(amounts.tax_rate_percentage);
        active.item_total = Set(round_currency(TotalsCalculator::line_total(&amounts)?));
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        let invoice = recompute_totals(&txn, invoice).await?;
        txn.commit().await?;

        info!(
            invoice_id = %id,
            line_id = %line_id,
            grand_total = %invoice.grand_total,
            "Line item updated"
        );
        Ok(LineItemChange {
            item: line_record(updated, catalog),
            invoice: invoice.into(),
        })
    }

    /// Removes a line item and recomputes the invoice totals.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound`, `LineItemNotFound` or `InvoiceCancelled`.
    pub async fn remove_line_item(
        &self,
        id: InvoiceId,
        line_id: InvoiceItemId,
    ) -> Result<InvoiceRecord, InvoiceError> {
        let txn = self.db.begin().await?;

        let invoice = lock_open_invoice(&txn, id).await?;
        let result = invoice_items::Entity::delete_many()
            .filter(invoice_items::Column::Id.eq(line_id.into_inner()))
            .filter(invoice_items::Column::InvoiceId.eq(invoice.id))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(InvoicingError::LineItemNotFound(line_id).into());
        }

        let invoice = recompute_totals(&txn, invoice).await?;
        txn.commit().await?;

        info!(
            invoice_id = %id,
            line_id = %line_id,
            grand_total = %invoice.grand_total,
            "Line item removed"
        );
        Ok(invoice.into())
    }

    // ========================================================================
    // Engine
    // ========================================================================

    /// Sum of completed payments for an invoice.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the query fails.
    pub async fn total_paid(&self, id: InvoiceId) -> Result<Decimal, InvoiceError> {
        Ok(InvoicingService::new(SeaLedger::new(&self.db))
            .total_paid(id)
            .await?)
    }

    /// Derives the payment status, repairing drifted stored fields.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound` or `Storage`.
    pub async fn resolve_status(&self, id: InvoiceId) -> Result<PaymentResolution, InvoiceError> {
        match self.config.reconcile_mode {
            ReconcileMode::Optimistic => Ok(InvoicingService::new(SeaLedger::new(&self.db))
                .resolve_status(id)
                .await?),
            ReconcileMode::Locked => {
                let txn = self.db.begin().await?;
                let resolution = InvoicingService::new(SeaLedger::locking(&txn))
                    .resolve_status(id)
                    .await?;
                txn.commit().await?;
                Ok(resolution)
            }
        }
    }

    /// Assembles the full invoice report.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for the invoice or any entity it references,
    /// or `Storage`.
    pub async fn report(&self, id: InvoiceId) -> Result<InvoiceReport, InvoiceError> {
        match self.config.reconcile_mode {
            ReconcileMode::Optimistic => Ok(InvoicingService::new(SeaLedger::new(&self.db))
                .assemble_report(id)
                .await?),
            ReconcileMode::Locked => {
                let txn = self.db.begin().await?;
                let report = InvoicingService::new(SeaLedger::locking(&txn))
                    .assemble_report(id)
                    .await?;
                txn.commit().await?;
                Ok(report)
            }
        }
    }

    async fn generate_number<C: ConnectionTrait>(
        &self,
        conn: &C,
        date: NaiveDate,
    ) -> Result<String, InvoiceError> {
        let mut candidate = String::new();
        for _ in 0..NUMBER_ATTEMPTS {
            let sequence: u16 = rand::rng().random_range(0..10_000);
            candidate = format_number(&self.config.invoice_number_prefix, date.year(), sequence);
            if !number_taken(conn, &candidate).await? {
                return Ok(candidate);
            }
        }
        Err(InvoiceError::DuplicateNumber(candidate))
    }
}

// ============================================================================
// Transaction helpers
// ============================================================================

async fn ensure_company<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), InvoiceError> {
    companies::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(InvoicingError::CompanyNotFound(id.into()))?;
    Ok(())
}

async fn ensure_address<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), InvoiceError> {
    addresses::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(InvoicingError::AddressNotFound(id.into()))?;
    Ok(())
}

async fn number_taken<C: ConnectionTrait>(conn: &C, number: &str) -> Result<bool, DbErr> {
    let count = invoices::Entity::find()
        .filter(invoices::Column::InvoiceNumber.eq(number))
        .count(conn)
        .await?;
    Ok(count > 0)
}

async fn lock_invoice<C: ConnectionTrait>(
    conn: &C,
    id: InvoiceId,
) -> Result<invoices::Model, InvoiceError> {
    let invoice = invoices::Entity::find_by_id(id.into_inner())
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or(InvoicingError::InvoiceNotFound(id))?;
    Ok(invoice)
}

/// Locks an invoice that still accepts line item changes.
async fn lock_open_invoice<C: ConnectionTrait>(
    conn: &C,
    id: InvoiceId,
) -> Result<invoices::Model, InvoiceError> {
    let invoice = lock_invoice(conn, id).await?;
    if invoice.status == DbInvoiceStatus::Cancelled {
        return Err(InvoicingError::InvoiceCancelled(id).into());
    }
    Ok(invoice)
}

async fn prepare_line<C: ConnectionTrait>(
    conn: &C,
    input: LineItemInput,
) -> Result<PreparedLine, InvoiceError> {
    let item = match input.item_id {
        Some(id) => Some(
            items::Entity::find_by_id(id)
                .one(conn)
                .await?
                .ok_or(InvoicingError::ItemNotFound(id.into()))?,
        ),
        None => None,
    };

    let description = input
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .or_else(|| item.as_ref().map(|i| i.name.clone()))
        .ok_or_else(|| invalid("description is required for lines without an item"))?;

    let unit_price = input
        .unit_price
        .or_else(|| item.as_ref().map(|i| i.unit_price))
        .ok_or_else(|| invalid("unit_price is required for lines without an item"))?;

    let amounts = LineAmounts::new(input.quantity, unit_price, input.tax_rate_percentage);
    amounts.validate()?;

    Ok(PreparedLine {
        item_id: item.as_ref().map(|i| i.id),
        item_name: item.map(|i| i.name),
        description,
        amounts,
    })
}

async fn insert_line<C: ConnectionTrait>(
    conn: &C,
    invoice_id: Uuid,
    line: PreparedLine,
) -> Result<InvoiceLineRecord, InvoiceError> {
    let item_total = round_currency(TotalsCalculator::line_total(&line.amounts)?);
    let now = Utc::now().into();
    let model = invoice_items::ActiveModel {
        id: Set(Uuid::now_v7()),
        invoice_id: Set(invoice_id),
        item_id: Set(line.item_id),
        description: Set(line.description),
        quantity: Set(line.amounts.quantity),
        unit_price: Set(line.amounts.unit_price),
        item_total: Set(item_total),
        tax_rate_percentage: Set(line.amounts.tax_rate_percentage),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await?;

    let mut record = line_record(model, None);
    record.item_name = line.item_name;
    Ok(record)
}

/// Rewrites subtotal, tax and grand total from the current line items.
///
/// `amount_due` follows the new grand total against the stored amount paid;
/// the status is left for the resolver.
async fn recompute_totals<C: ConnectionTrait>(
    conn: &C,
    invoice: invoices::Model,
) -> Result<invoices::Model, InvoiceError> {
    let lines = invoice_items::Entity::find()
        .filter(invoice_items::Column::InvoiceId.eq(invoice.id))
        .all(conn)
        .await?;

    let amounts: Vec<LineAmounts> = lines
        .iter()
        .map(|l| LineAmounts::new(l.quantity, l.unit_price, l.tax_rate_percentage))
        .collect();
    let totals = TotalsCalculator::calculate(&amounts)?
        .rounded()
        .ensure_storable()?;
    let amount_due = (totals.grand_total - invoice.amount_paid).max(Decimal::ZERO);

    let mut active: invoices::ActiveModel = invoice.into();
    active.subtotal = Set(totals.subtotal);
    active.tax_total = Set(totals.tax_total);
    active.grand_total = Set(totals.grand_total);
    active.amount_due = Set(round_currency(amount_due));
    active.updated_at = Set(Utc::now().into());
    Ok(active.update(conn).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_pads_sequence() {
        assert_eq!(format_number("INV", 2026, 7), "INV-2026-0007");
        assert_eq!(format_number("ACME", 2025, 1234), "ACME-2025-1234");
    }

    #[test]
    fn test_error_mapping() {
        let id = InvoiceId::new();

        let err: AppError = InvoiceError::from(InvoicingError::InvoiceNotFound(id)).into();
        assert_eq!(err.status_code(), 404);

        let err: AppError = InvoiceError::from(InvoicingError::InvoiceCancelled(id)).into();
        assert_eq!(err.status_code(), 409);

        let err: AppError = InvoiceError::DuplicateNumber("INV-2026-0001".into()).into();
        assert_eq!(err.status_code(), 409);

        let err: AppError = invalid("quantity must not be negative").into();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_line_input_defaults_tax_to_zero() {
        let input: LineItemInput =
            serde_json::from_str(r#"{"description": "Consulting", "quantity": "2", "unit_price": "150.00"}"#)
                .unwrap();
        assert_eq!(input.tax_rate_percentage, Decimal::ZERO);
        assert!(input.item_id.is_none());
    }

    #[test]
    fn test_create_input_items_default_empty() {
        let input: CreateInvoiceInput = serde_json::from_str(&format!(
            r#"{{"sender_company_id": "{0}", "recipient_company_id": "{0}", "billing_address_id": "{0}", "invoice_date": "2026-03-01"}}"#,
            Uuid::nil()
        ))
        .unwrap();
        assert!(input.items.is_empty());
        assert_eq!(input.invoice_date, NaiveDate::from_ymd_opt(2026, 3, 1));
        assert!(input.due_date.is_none());
    }
}
