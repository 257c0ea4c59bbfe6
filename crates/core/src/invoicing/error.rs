//! Invoicing error types.

use invoicer_shared::{
    AppError,
    types::{AddressId, CompanyId, InvoiceId, InvoiceItemId, ItemId, OrderId, PaymentId},
};
use thiserror::Error;

use super::types::InvoiceStatus;

/// Errors raised by the invoice financial-state engine.
#[derive(Debug, Error)]
pub enum InvoicingError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(InvoiceId),

    /// Company referenced by an invoice or order not found.
    #[error("Company not found: {0}")]
    CompanyNotFound(CompanyId),

    /// Address referenced by an invoice not found.
    #[error("Address not found: {0}")]
    AddressNotFound(AddressId),

    /// Order referenced by an invoice not found.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// Catalogue item not found.
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// Invoice line item not found.
    #[error("Invoice line item not found: {0}")]
    LineItemNotFound(InvoiceItemId),

    /// Payment not found.
    #[error("Payment not found: {0}")]
    PaymentNotFound(PaymentId),

    /// Malformed or out-of-range input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown status name.
    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    /// Status change not allowed from the current status.
    #[error("Cannot change invoice status from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: InvoiceStatus,
        /// Requested status.
        to: InvoiceStatus,
    },

    /// Invoice no longer accepts changes.
    #[error("Invoice {0} is cancelled")]
    InvoiceCancelled(InvoiceId),

    /// Storage backend failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl InvoicingError {
    /// Returns true for the not-found family of errors.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::InvoiceNotFound(_)
                | Self::CompanyNotFound(_)
                | Self::AddressNotFound(_)
                | Self::OrderNotFound(_)
                | Self::ItemNotFound(_)
                | Self::LineItemNotFound(_)
                | Self::PaymentNotFound(_)
        )
    }
}

impl From<InvoicingError> for AppError {
    fn from(err: InvoicingError) -> Self {
        match err {
            e if e.is_not_found() => Self::NotFound(e.to_string()),
            e @ (InvoicingError::InvalidInput(_) | InvoicingError::UnknownStatus(_)) => {
                Self::Validation(e.to_string())
            }
            e @ (InvoicingError::InvalidTransition { .. } | InvoicingError::InvoiceCancelled(_)) => {
                Self::Conflict(e.to_string())
            }
            InvoicingError::Storage(msg) => Self::Database(msg),
            e => Self::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_to_app_error() {
        let err: AppError = InvoicingError::InvoiceNotFound(InvoiceId::new()).into();
        assert_eq!(err.status_code(), 404);

        let err: AppError = InvoicingError::PaymentNotFound(PaymentId::new()).into();
        assert_eq!(err.status_code(), 404);

        let err: AppError = InvoicingError::InvalidInput("quantity".into()).into();
        assert_eq!(err.status_code(), 400);

        let err: AppError = InvoicingError::UnknownStatus("archived".into()).into();
        assert_eq!(err.status_code(), 400);

        let err: AppError = InvoicingError::InvalidTransition {
            from: InvoiceStatus::Cancelled,
            to: InvoiceStatus::Sent,
        }
        .into();
        assert_eq!(err.status_code(), 409);

        let err: AppError = InvoicingError::Storage("connection reset".into()).into();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_transition_message() {
        let err = InvoicingError::InvalidTransition {
            from: InvoiceStatus::Cancelled,
            to: InvoiceStatus::Paid,
        };
        assert_eq!(
            err.to_string(),
            "Cannot change invoice status from cancelled to paid"
        );
    }
}
