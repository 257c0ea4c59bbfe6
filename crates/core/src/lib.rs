//! Core business logic for Invoicer.
//!
//! This crate contains the invoice financial-state engine with ZERO web or database
//! dependencies. Storage is reached through the [`invoicing::InvoiceLedger`] trait,
//! implemented by the database crate.
//!
//! # Modules
//!
//! - `invoicing` - Totals, payment aggregation, status resolution and report assembly

pub mod invoicing;
