use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::{round_money, AppError, Result};

/// Outcome of passing a financing fee on to the customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Repass {
    pub principal: Decimal,
    pub total: Decimal,
    pub interest: Decimal,
}

/// Interest repass: inflate the charged amount so that, after the processor
/// keeps `rate`% of it, the store still nets the principal.
pub struct InterestCalculator;

impl InterestCalculator {
    /// `total = P / (1 - r/100)` rounded to cents, `interest = total - P`.
    ///
    /// Rate must be in `[0, 100)`; a zero rate returns the principal unchanged.
    pub fn repass(principal: Decimal, rate_percentage: Decimal) -> Result<Repass> {
        if principal < Decimal::ZERO {
            return Err(AppError::validation("Principal cannot be negative"));
        }
        if rate_percentage < Decimal::ZERO || rate_percentage >= Decimal::ONE_HUNDRED {
            return Err(AppError::validation(format!(
                "Interest rate {}% is outside [0, 100)",
                rate_percentage
            )));
        }

        let principal = round_money(principal);
        if rate_percentage.is_zero() {
            return Ok(Repass {
                principal,
                total: principal,
                interest: Decimal::ZERO,
            });
        }

        let factor = Decimal::ONE - rate_percentage / Decimal::ONE_HUNDRED;
        let total = round_money(principal / factor);

        Ok(Repass {
            principal,
            total,
            interest: total - principal,
        })
    }
}
