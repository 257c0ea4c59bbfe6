//! Entity re-exports.

pub use super::addresses::Entity as Addresses;
pub use super::companies::Entity as Companies;
pub use super::invoice_items::Entity as InvoiceItems;
pub use super::invoices::Entity as Invoices;
pub use super::items::Entity as Items;
pub use super::order_items::Entity as OrderItems;
pub use super::orders::Entity as Orders;
pub use super::payments::Entity as Payments;
