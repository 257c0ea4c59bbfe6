//! Totals calculator.

use invoicer_shared::types::money::{AMOUNT_LIMIT, percent_of, round_currency};
use rust_decimal::Decimal;

use super::error::InvoicingError;
use super::types::{InvoiceTotals, LineAmounts};

fn out_of_range() -> InvoicingError {
    InvoicingError::InvalidInput("invoice amounts exceed the supported range".to_string())
}

/// Computes invoice totals from line items.
pub struct TotalsCalculator;

impl TotalsCalculator {
    /// `quantity * unit_price`, unrounded.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the product overflows.
    pub fn line_total(line: &LineAmounts) -> Result<Decimal, InvoicingError> {
        line.quantity
            .checked_mul(line.unit_price)
            .ok_or_else(out_of_range)
    }

    /// Tax on one line, unrounded.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the line total or its tax overflows.
    pub fn line_tax(line: &LineAmounts) -> Result<Decimal, InvoicingError> {
        percent_of(Self::line_total(line)?, line.tax_rate_percentage).ok_or_else(out_of_range)
    }

    /// Sums line totals and taxes. The result is exact; see [`InvoiceTotals::rounded`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if any product or sum overflows.
    pub fn calculate<'a, I>(lines: I) -> Result<InvoiceTotals, InvoicingError>
    where
        I: IntoIterator<Item = &'a LineAmounts>,
    {
        let (subtotal, tax_total) =
            lines
                .into_iter()
                .try_fold((Decimal::ZERO, Decimal::ZERO), |(sub, tax), line| {
                    let sub = sub
                        .checked_add(Self::line_total(line)?)
                        .ok_or_else(out_of_range)?;
                    let tax = tax
                        .checked_add(Self::line_tax(line)?)
                        .ok_or_else(out_of_range)?;
                    Ok::<_, InvoicingError>((sub, tax))
                })?;

        Ok(InvoiceTotals {
            subtotal,
            tax_total,
            grand_total: subtotal.checked_add(tax_total).ok_or_else(out_of_range)?,
        })
    }
}

impl InvoiceTotals {
    /// Rounds subtotal and tax to cents and rebuilds the grand total from the
    /// rounded parts, so `grand_total == subtotal + tax_total` still holds.
    #[must_use]
    pub fn rounded(self) -> Self {
        let subtotal = round_currency(self.subtotal);
        let tax_total = round_currency(self.tax_total);
        Self {
            subtotal,
            tax_total,
            grand_total: subtotal + tax_total,
        }
    }

    /// Checks the grand total fits the stored amount columns.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the grand total reaches [`AMOUNT_LIMIT`].
    pub fn ensure_storable(self) -> Result<Self, InvoicingError> {
        if self.grand_total >= AMOUNT_LIMIT {
            return Err(InvoicingError::InvalidInput(format!(
                "invoice grand total must be less than {AMOUNT_LIMIT}, got {}",
                self.grand_total
            )));
        }
        Ok(self)
    }
}
