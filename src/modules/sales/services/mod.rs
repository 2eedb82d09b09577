pub mod fulfillment;
pub mod sale_service;
pub mod settlement;

pub use fulfillment::{FulfillmentPlan, FulfillmentPlanner, PlannedLine, VariantStock};
pub use sale_service::{SaleListParams, SaleService};
pub use settlement::{SettledPayment, Settlement, SettlementEngine};
