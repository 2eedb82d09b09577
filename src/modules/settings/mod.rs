// Settings module: payment methods and tiered installment interest rules

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{InstallmentOption, InstallmentTier, PaymentMethod, PaymentMethodKind};
pub use services::{InterestCalculator, SettingsService, SettlementSettings, TierLookup};
