//! Postgres enum types.

use invoicer_core::invoicing as domain;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `address_type` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "address_type")]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    #[sea_orm(string_value = "main")]
    Main,
    #[sea_orm(string_value = "billing")]
    Billing,
    #[sea_orm(string_value = "shipping")]
    Shipping,
    #[sea_orm(string_value = "office")]
    Office,
    #[sea_orm(string_value = "other")]
    Other,
}

/// `order_status` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "order_status")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "shipped")]
    Shipped,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// `invoice_status` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    #[sea_orm(string_value = "partial")]
    Partial,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "overdue")]
    Overdue,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// `payment_status` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

impl AddressType {
    /// Parses a case-insensitive address type name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "main" => Some(Self::Main),
            "billing" => Some(Self::Billing),
            "shipping" => Some(Self::Shipping),
            "office" => Some(Self::Office),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl From<InvoiceStatus> for domain::InvoiceStatus {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Draft => Self::Draft,
            InvoiceStatus::Sent => Self::Sent,
            InvoiceStatus::Unpaid => Self::Unpaid,
            InvoiceStatus::Partial => Self::Partial,
            InvoiceStatus::Paid => Self::Paid,
            InvoiceStatus::Overdue => Self::Overdue,
            InvoiceStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<domain::InvoiceStatus> for InvoiceStatus {
    fn from(status: domain::InvoiceStatus) -> Self {
        match status {
            domain::InvoiceStatus::Draft => Self::Draft,
            domain::InvoiceStatus::Sent => Self::Sent,
            domain::InvoiceStatus::Unpaid => Self::Unpaid,
            domain::InvoiceStatus::Partial => Self::Partial,
            domain::InvoiceStatus::Paid => Self::Paid,
            domain::InvoiceStatus::Overdue => Self::Overdue,
            domain::InvoiceStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<PaymentStatus> for domain::PaymentStatus {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Completed => Self::Completed,
            PaymentStatus::Pending => Self::Pending,
            PaymentStatus::Failed => Self::Failed,
            PaymentStatus::Refunded => Self::Refunded,
        }
    }
}

impl From<domain::PaymentStatus> for PaymentStatus {
    fn from(status: domain::PaymentStatus) -> Self {
        match status {
            domain::PaymentStatus::Completed => Self::Completed,
            domain::PaymentStatus::Pending => Self::Pending,
            domain::PaymentStatus::Failed => Self::Failed,
            domain::PaymentStatus::Refunded => Self::Refunded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_status_round_trips_through_core() {
        for status in domain::InvoiceStatus::ALL {
            let db: InvoiceStatus = status.into();
            assert_eq!(domain::InvoiceStatus::from(db), status);
            assert_eq!(db.to_value(), status.as_str());
        }
    }

    #[test]
    fn test_payment_status_values_match_core_names() {
        for status in domain::PaymentStatus::ALL {
            let db: PaymentStatus = status.into();
            assert_eq!(db.to_value(), status.as_str());
        }
    }

    #[test]
    fn test_address_type_parse() {
        assert_eq!(AddressType::parse("Billing"), Some(AddressType::Billing));
        assert_eq!(AddressType::parse("main"), Some(AddressType::Main));
        assert_eq!(AddressType::parse("warehouse"), None);
    }
}
