// Sales module: checkout orchestration, settlement, fulfillment and cancellation

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Sale, SaleFulfillmentStatus, SaleResponse};
pub use services::{SaleService, SettlementEngine};
