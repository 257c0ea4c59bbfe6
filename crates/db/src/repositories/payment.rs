//! Payment repository.
//!
//! Recording a payment or changing its status does not touch the invoice;
//! the invoice catches up the next time its status is resolved.

use chrono::{DateTime, Utc};
use invoicer_core::invoicing::{InvoicingError, PaymentRecord, PaymentStatus};
use invoicer_shared::AppError;
use invoicer_shared::types::{InvoiceId, PaymentId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::required_text;
use crate::entities::{invoices, payments, sea_orm_active_enums::PaymentStatus as DbPaymentStatus};

/// Error types for payment operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// Engine error.
    #[error(transparent)]
    Invoicing(#[from] InvoicingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Invoicing(e) => e.into(),
            PaymentError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for recording a payment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentInput {
    /// Amount received, must be positive.
    pub amount: Decimal,
    /// Payment method, e.g. `bank_transfer`.
    pub method: String,
    /// Defaults to `completed`.
    pub status: Option<String>,
    /// Defaults to now.
    pub payment_date: Option<DateTime<Utc>>,
    /// External reference.
    pub transaction_reference: Option<String>,
}

fn parse_status(value: Option<&str>) -> Result<PaymentStatus, InvoicingError> {
    value.map_or(Ok(PaymentStatus::Completed), str::parse)
}

fn invalid(msg: impl Into<String>) -> PaymentError {
    PaymentError::Invoicing(InvoicingError::InvalidInput(msg.into()))
}

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a payment against an invoice.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound` for an unknown invoice, `InvalidInput` for a
    /// non-positive amount or blank method, and `UnknownStatus`.
    pub async fn create(
        &self,
        invoice_id: InvoiceId,
        input: CreatePaymentInput,
    ) -> Result<PaymentRecord, PaymentError> {
        if input.amount <= Decimal::ZERO {
            return Err(invalid(format!(
                "amount must be positive, got {}",
                input.amount
            )));
        }
        let method = required_text("method", &input.method).map_err(invalid)?;
        let status = parse_status(input.status.as_deref())?;

        invoices::Entity::find_by_id(invoice_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(InvoicingError::InvoiceNotFound(invoice_id))?;

        let now = Utc::now();
        let payment = payments::ActiveModel {
            id: Set(Uuid::now_v7()),
            invoice_id: Set(invoice_id.into_inner()),
            payment_date: Set(input.payment_date.unwrap_or(now).into()),
            amount: Set(input.amount),
            method: Set(method),
            status: Set(status.into()),
            transaction_reference: Set(input.transaction_reference),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await?;

        info!(
            invoice_id = %invoice_id,
            payment_id = %payment.id,
            amount = %payment.amount,
            status = %status,
            "Payment recorded"
        );
        Ok(payment.into())
    }

    /// Lists an invoice's payments in payment date order.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound` for an unknown invoice.
    pub async fn list_for_invoice(
        &self,
        invoice_id: InvoiceId,
        status: Option<PaymentStatus>,
    ) -> Result<Vec<PaymentRecord>, PaymentError> {
        invoices::Entity::find_by_id(invoice_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(InvoicingError::InvoiceNotFound(invoice_id))?;

        let mut query =
            payments::Entity::find().filter(payments::Column::InvoiceId.eq(invoice_id.into_inner()));
        if let Some(status) = status {
            query = query.filter(payments::Column::Status.eq(DbPaymentStatus::from(status)));
        }

        let rows = query
            .order_by_asc(payments::Column::PaymentDate)
            .order_by_asc(payments::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(PaymentRecord::from).collect())
    }

    /// Gets a payment by ID.
    ///
    /// # Errors
    ///
    /// Returns `PaymentNotFound` if no payment has this ID.
    pub async fn get(&self, id: PaymentId) -> Result<PaymentRecord, PaymentError> {
        let payment = payments::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(InvoicingError::PaymentNotFound(id))?;
        Ok(payment.into())
    }

    /// Changes a payment's status.
    ///
    /// # Errors
    ///
    /// Returns `PaymentNotFound` if no payment has this ID.
    pub async fn update_status(
        &self,
        id: PaymentId,
        status: PaymentStatus,
    ) -> Result<PaymentRecord, PaymentError> {
        let txn = self.db.begin().await?;

        let payment = payments::Entity::find_by_id(id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(InvoicingError::PaymentNotFound(id))?;

        let previous = PaymentStatus::from(payment.status);
        let mut active: payments::ActiveModel = payment.into();
        active.status = Set(status.into());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(payment_id = %id, from = %previous, to = %status, "Payment status updated");
        Ok(updated.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_defaults_to_completed() {
        assert_eq!(parse_status(None).unwrap(), PaymentStatus::Completed);
        assert_eq!(parse_status(Some("Pending")).unwrap(), PaymentStatus::Pending);
        assert!(matches!(
            parse_status(Some("bounced")),
            Err(InvoicingError::UnknownStatus(_))
        ));
    }

    #[test]
    fn test_invalid_maps_to_validation() {
        let err: AppError = invalid("amount must be positive, got 0").into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "invalid_input");
    }
}
