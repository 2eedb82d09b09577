// Purchase backlog: replenishment needs created by backordered sale items

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{BacklogStatus, PurchaseBacklogItem};
pub use repositories::BacklogRepository;
pub use services::BacklogService;
