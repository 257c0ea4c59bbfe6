//! Status resolver.
//!
//! Derives `paid` / `partial` / `unpaid` from the grand total and the completed
//! payments, and decides whether the stored invoice fields need repair.

use invoicer_shared::types::money::round_currency;
use rust_decimal::Decimal;

use super::types::{PaymentFields, PaymentResolution, SettlementStatus};

/// Resolves an invoice's payment status.
pub struct StatusResolver;

impl StatusResolver {
    /// Computes status and amount due.
    ///
    /// `paid` once nothing is outstanding, `partial` if anything was paid,
    /// `unpaid` otherwise. Overpayment leaves `amount_due` at zero.
    #[must_use]
    pub fn resolve(grand_total: Decimal, total_paid: Decimal) -> PaymentResolution {
        let amount_paid = round_currency(total_paid);
        let outstanding = round_currency(grand_total) - amount_paid;

        let status = if outstanding <= Decimal::ZERO {
            SettlementStatus::Paid
        } else if amount_paid > Decimal::ZERO {
            SettlementStatus::Partial
        } else {
            SettlementStatus::Unpaid
        };

        PaymentResolution {
            status,
            amount_paid,
            amount_due: round_currency(outstanding.max(Decimal::ZERO)),
        }
    }

    /// Returns the corrected fields when `stored` has drifted from `resolution`,
    /// or `None` when nothing needs to be written.
    #[must_use]
    pub fn plan_repair(
        stored: &PaymentFields,
        resolution: &PaymentResolution,
    ) -> Option<PaymentFields> {
        let target = PaymentFields {
            amount_paid: resolution.amount_paid,
            amount_due: resolution.amount_due,
            status: stored.status.reconciled(resolution.status),
        };

        (target != *stored).then_some(target)
    }
}
