//! Invoice financial-state engine.
//!
//! This module keeps an invoice's totals, amount paid, amount due and status
//! consistent with its line items and payments:
//! - Totals Calculator (`totals`)
//! - Payment Aggregator (`payments`)
//! - Status Resolver with read-repair (`status`, `service`)
//! - Report Assembler (`service`)

pub mod error;
pub mod ledger;
pub mod payments;
pub mod service;
pub mod status;
pub mod totals;
pub mod types;


pub use error::InvoicingError;
pub use ledger::InvoiceLedger;
pub use payments::PaymentAggregator;
pub use service::InvoicingService;
pub use status::StatusResolver;
pub use totals::TotalsCalculator;
pub use types::*;
