//! Vitrine boutique back office
//!
//! Catalog and stock, checkout settlement with tiered installment interest,
//! accounts receivable, purchase backlog for backorders, and appointment
//! booking, served over HTTP on a single MySQL pool.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

pub use modules::{appointments, backlog, catalog, clients, receivables, sales, settings};
