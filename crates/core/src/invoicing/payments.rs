//! Payment aggregator.

use rust_decimal::Decimal;

use super::types::PaymentRecord;

/// Sums the payments that count toward an invoice's amount paid.
pub struct PaymentAggregator;

impl PaymentAggregator {
    /// Sum of `amount` over completed payments. No payments gives zero.
    #[must_use]
    pub fn total_paid(payments: &[PaymentRecord]) -> Decimal {
        payments
            .iter()
            .filter(|p| p.status.counts_toward_paid())
            .map(|p| p.amount)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoicing::types::PaymentStatus;
    use chrono::Utc;
    use invoicer_shared::types::{InvoiceId, PaymentId};
    use rust_decimal_macros::dec;

    fn payment(invoice_id: InvoiceId, amount: Decimal, status: PaymentStatus) -> PaymentRecord {
        PaymentRecord {
            id: PaymentId::new(),
            invoice_id,
            payment_date: Utc::now(),
            amount,
            method: "bank_transfer".to_string(),
            status,
            transaction_reference: None,
        }
    }

    #[test]
    fn test_no_payments_is_zero() {
        assert_eq!(PaymentAggregator::total_paid(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_only_completed_payments_count() {
        let invoice_id = InvoiceId::new();
        let payments = [
            payment(invoice_id, dec!(1000.00), PaymentStatus::Completed),
            payment(invoice_id, dec!(500.00), PaymentStatus::Completed),
            payment(invoice_id, dec!(200.00), PaymentStatus::Pending),
            payment(invoice_id, dec!(300.00), PaymentStatus::Failed),
            payment(invoice_id, dec!(400.00), PaymentStatus::Refunded),
        ];
        assert_eq!(PaymentAggregator::total_paid(&payments), dec!(1500.00));
    }

    #[test]
    fn test_pending_only_is_zero() {
        let invoice_id = InvoiceId::new();
        let payments = [payment(invoice_id, dec!(378.00), PaymentStatus::Pending)];
        assert_eq!(PaymentAggregator::total_paid(&payments), Decimal::ZERO);
    }
}
