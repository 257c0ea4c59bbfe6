//! Invoicing domain types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use invoicer_shared::types::money::{AMOUNT_LIMIT, QUANTITY_LIMIT, is_valid_tax_rate};
use invoicer_shared::types::{
    AddressId, CompanyId, InvoiceId, InvoiceItemId, ItemId, OrderId, OrderItemId, PaymentId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::InvoicingError;

// ============================================================================
// Statuses
// ============================================================================

/// Lifecycle status stored on an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Being prepared, not yet sent.
    Draft,
    /// Sent to the recipient, nothing paid.
    Sent,
    /// Outstanding, nothing paid.
    Unpaid,
    /// Some but not all of the grand total paid.
    Partial,
    /// Fully paid.
    Paid,
    /// Past due date with a balance outstanding.
    Overdue,
    /// Voided.
    Cancelled,
}

impl InvoiceStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 7] = [
        Self::Draft,
        Self::Sent,
        Self::Unpaid,
        Self::Partial,
        Self::Paid,
        Self::Overdue,
        Self::Cancelled,
    ];

    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Unpaid => "unpaid",
            Self::Partial => "partial",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns the status the resolver should persist for this invoice given
    /// the settlement derived from its payments.
    ///
    /// `Draft` and `Cancelled` are only changed by explicit status updates.
    /// `Sent` and `Overdue` already describe an invoice with nothing paid and
    /// are kept until a payment lands.
    #[must_use]
    pub const fn reconciled(self, settlement: SettlementStatus) -> Self {
        match (self, settlement) {
            (Self::Draft | Self::Cancelled, _) => self,
            (_, SettlementStatus::Paid) => Self::Paid,
            (_, SettlementStatus::Partial) => Self::Partial,
            (Self::Sent | Self::Overdue, SettlementStatus::Unpaid) => self,
            (_, SettlementStatus::Unpaid) => Self::Unpaid,
        }
    }

    /// Returns true if a manual status update may move the invoice to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        !matches!(self, Self::Cancelled) || matches!(next, Self::Cancelled)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = InvoicingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| InvoicingError::UnknownStatus(s.to_string()))
    }
}

/// Payment status derived from grand total and completed payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    /// Nothing paid.
    Unpaid,
    /// Paid in part.
    Partial,
    /// Paid in full.
    Paid,
}

impl SettlementStatus {
    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a single payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Funds received.
    Completed,
    /// Awaiting settlement.
    Pending,
    /// Rejected by the payment processor.
    Failed,
    /// Returned to the payer.
    Refunded,
}

impl PaymentStatus {
    /// All payment statuses.
    pub const ALL: [Self; 4] = [Self::Completed, Self::Pending, Self::Failed, Self::Refunded];

    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    /// Only completed payments count toward the amount paid.
    #[must_use]
    pub const fn counts_toward_paid(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = InvoicingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| InvoicingError::UnknownStatus(s.to_string()))
    }
}

// ============================================================================
// Amounts
// ============================================================================

/// The numeric inputs of one line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAmounts {
    /// Quantity, may be fractional.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Tax rate in percent (0-100).
    pub tax_rate_percentage: Decimal,
}

impl LineAmounts {
    /// Creates line amounts.
    #[must_use]
    pub const fn new(quantity: Decimal, unit_price: Decimal, tax_rate_percentage: Decimal) -> Self {
        Self {
            quantity,
            unit_price,
            tax_rate_percentage,
        }
    }

    /// Checks quantity, price and line total fit their stored columns and the
    /// tax rate is a percentage.
    pub fn validate(&self) -> Result<(), InvoicingError> {
        if self.quantity < Decimal::ZERO {
            return Err(InvoicingError::InvalidInput(format!(
                "quantity must not be negative, got {}",
                self.quantity
            )));
        }
        if self.quantity >= QUANTITY_LIMIT {
            return Err(InvoicingError::InvalidInput(format!(
                "quantity must be less than {QUANTITY_LIMIT}, got {}",
                self.quantity
            )));
        }
        if self.unit_price < Decimal::ZERO {
            return Err(InvoicingError::InvalidInput(format!(
                "unit_price must not be negative, got {}",
                self.unit_price
            )));
        }
        if self.unit_price >= AMOUNT_LIMIT {
            return Err(InvoicingError::InvalidInput(format!(
                "unit_price must be less than {AMOUNT_LIMIT}, got {}",
                self.unit_price
            )));
        }
        if self
            .quantity
            .checked_mul(self.unit_price)
            .is_none_or(|total| total >= AMOUNT_LIMIT)
        {
            return Err(InvoicingError::InvalidInput(format!(
                "line total must be less than {AMOUNT_LIMIT}"
            )));
        }
        if !is_valid_tax_rate(self.tax_rate_percentage) {
            return Err(InvoicingError::InvalidInput(format!(
                "tax_rate_percentage must be between 0 and 100, got {}",
                self.tax_rate_percentage
            )));
        }
        Ok(())
    }
}

/// Subtotal, tax and grand total of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Sum of line taxes.
    pub tax_total: Decimal,
    /// Subtotal plus tax total.
    pub grand_total: Decimal,
}

/// Outcome of resolving an invoice's payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResolution {
    /// Derived payment status.
    pub status: SettlementStatus,
    /// Sum of completed payments.
    pub amount_paid: Decimal,
    /// Outstanding balance, never negative.
    pub amount_due: Decimal,
}

/// The payment-derived fields persisted on an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentFields {
    /// Stored amount paid.
    pub amount_paid: Decimal,
    /// Stored amount due.
    pub amount_due: Decimal,
    /// Stored lifecycle status.
    pub status: InvoiceStatus,
}

// ============================================================================
// Records read from storage
// ============================================================================

/// Invoice header as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct InvoiceRecord {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub sender_company_id: CompanyId,
    pub recipient_company_id: CompanyId,
    pub billing_address_id: AddressId,
    pub shipping_address_id: Option<AddressId>,
    pub order_id: Option<OrderId>,
    pub invoice_subject: Option<String>,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub subtotal: Decimal,
    pub tax_total: Decimal,
    pub grand_total: Decimal,
    pub amount_paid: Decimal,
    pub amount_due: Decimal,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InvoiceRecord {
    /// Returns the payment-derived fields.
    #[must_use]
    pub const fn payment_fields(&self) -> PaymentFields {
        PaymentFields {
            amount_paid: self.amount_paid,
            amount_due: self.amount_due,
            status: self.status,
        }
    }

    /// Overwrites the payment-derived fields.
    pub fn apply_payment_fields(&mut self, fields: PaymentFields) {
        self.amount_paid = fields.amount_paid;
        self.amount_due = fields.amount_due;
        self.status = fields.status;
    }
}

/// Company as seen by the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct CompanyRecord {
    pub id: CompanyId,
    pub company_name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_customer: bool,
    pub is_vendor: bool,
}

/// Address as seen by the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct AddressRecord {
    pub id: AddressId,
    pub company_id: CompanyId,
    pub address_type: String,
    pub street: String,
    pub city: String,
    pub state_province: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
}

/// Order line with the item name joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct OrderLineRecord {
    pub id: OrderItemId,
    pub item_id: ItemId,
    pub item_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub item_total: Decimal,
}

/// Order with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct OrderRecord {
    pub id: OrderId,
    pub customer_company_id: CompanyId,
    pub order_date: DateTime<Utc>,
    pub total_price: Decimal,
    pub status: String,
    pub items: Vec<OrderLineRecord>,
}

/// Invoice line item; `item_name` is `None` for free-text lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct InvoiceLineRecord {
    pub id: InvoiceItemId,
    pub item_id: Option<ItemId>,
    pub item_name: Option<String>,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub item_total: Decimal,
    pub tax_rate_percentage: Decimal,
}

impl InvoiceLineRecord {
    /// Returns the numeric inputs for the totals calculator.
    #[must_use]
    pub const fn amounts(&self) -> LineAmounts {
        LineAmounts::new(self.quantity, self.unit_price, self.tax_rate_percentage)
    }
}

/// Payment against an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct PaymentRecord {
    pub id: PaymentId,
    pub invoice_id: InvoiceId,
    pub payment_date: DateTime<Utc>,
    pub amount: Decimal,
    pub method: String,
    pub status: PaymentStatus,
    pub transaction_reference: Option<String>,
}

// ============================================================================
// Report
// ============================================================================

/// Denormalized view of an invoice with everything it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceReport {
    /// Invoice header, with payment fields as reconciled.
    pub invoice: InvoiceRecord,
    /// Issuing company.
    pub sender_company: CompanyRecord,
    /// Billed company.
    pub recipient_company: CompanyRecord,
    /// Billing address.
    pub billing_address: AddressRecord,
    /// Shipping address, if any.
    pub shipping_address: Option<AddressRecord>,
    /// Source order, if the invoice was raised from one.
    pub order: Option<OrderRecord>,
    /// Line items.
    pub items: Vec<InvoiceLineRecord>,
    /// Every payment, whatever its status.
    pub payments: Vec<PaymentRecord>,
    /// Derived payment status.
    pub payment_status: PaymentResolution,
    /// Totals recomputed from the current line items.
    pub computed_totals: InvoiceTotals,
}
