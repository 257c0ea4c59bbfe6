//! `SeaORM` entities for the invoicing schema.

pub mod prelude;

pub mod addresses;
pub mod companies;
pub mod invoice_items;
pub mod invoices;
pub mod items;
pub mod order_items;
pub mod orders;
pub mod payments;
pub mod sea_orm_active_enums;
