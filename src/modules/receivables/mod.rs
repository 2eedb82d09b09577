// Accounts receivable: installment schedules billed for credit sales

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{AccountReceivable, ReceivableStatus};
pub use repositories::ReceivableRepository;
pub use services::{OverdueSweeper, ReceivableCalculator, ReceivableService};
