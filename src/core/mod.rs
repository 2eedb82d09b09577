pub mod error;
pub mod money;

pub use error::{AppError, BusinessRuleViolation, Result};
pub use money::{clamp_percentage, format_brl, from_cents, round_money, to_cents};
