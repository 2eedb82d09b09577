pub mod interest_calculator;
pub mod payment_conditions;
pub mod settings_service;
pub mod tier_lookup;

pub use interest_calculator::{InterestCalculator, Repass};
pub use payment_conditions::{PaymentCondition, PaymentConditionResponse, PaymentConditions};
pub use settings_service::{SettingsService, SettlementSettings};
pub use tier_lookup::TierLookup;
