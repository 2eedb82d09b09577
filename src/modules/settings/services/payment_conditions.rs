use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::{format_brl, round_money, AppError, Result};
use crate::modules::settings::models::InstallmentTier;
use crate::modules::settings::services::InterestCalculator;

/// Smallest installment worth offering
const MIN_INSTALLMENT_VALUE: Decimal = Decimal::ONE;

/// One way to pay a given purchase value
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentCondition {
    pub installments: i32,
    /// Per-installment amount
    pub value: Decimal,
    pub total_value: Decimal,
    /// Rate actually charged to the customer
    pub interest_rate: Decimal,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct PaymentConditionResponse {
    pub installments: i32,
    pub value: String,
    pub total_value: String,
    pub interest_rate: String,
    pub description: String,
}

impl From<PaymentCondition> for PaymentConditionResponse {
    fn from(condition: PaymentCondition) -> Self {
        Self {
            installments: condition.installments,
            value: condition.value.to_string(),
            total_value: condition.total_value.to_string(),
            interest_rate: condition.interest_rate.to_string(),
            description: condition.description,
        }
    }
}

/// Builds the installment menu shown at checkout
pub struct PaymentConditions;

impl PaymentConditions {
    /// Quote every option of `tier` for `purchase_value`.
    ///
    /// With `repass_interest` the customer pays the tier rate through
    /// [`InterestCalculator::repass`]; otherwise the store absorbs it.
    /// Options whose installment would fall below 1.00 are dropped, and a
    /// single cash condition is returned if nothing else remains.
    pub fn quote(
        tier: &InstallmentTier,
        purchase_value: Decimal,
        repass_interest: bool,
    ) -> Result<Vec<PaymentCondition>> {
        if purchase_value <= Decimal::ZERO {
            return Err(AppError::validation("purchase_value must be greater than 0"));
        }
        let purchase_value = round_money(purchase_value);

        let mut conditions = Vec::with_capacity(tier.rules.len());
        for option in &tier.rules {
            let rate = if repass_interest {
                option.interest_rate_percentage
            } else {
                Decimal::ZERO
            };
            let total = InterestCalculator::repass(purchase_value, rate)?.total;
            let value = round_money(total / Decimal::from(option.installments));
            if value < MIN_INSTALLMENT_VALUE {
                continue;
            }

            conditions.push(PaymentCondition {
                installments: option.installments,
                value,
                total_value: total,
                interest_rate: rate,
                description: describe(option.installments, value, total, rate),
            });
        }

        if conditions.is_empty() {
            conditions.push(PaymentCondition {
                installments: 1,
                value: purchase_value,
                total_value: purchase_value,
                interest_rate: Decimal::ZERO,
                description: describe(1, purchase_value, purchase_value, Decimal::ZERO),
            });
        }

        Ok(conditions)
    }
}

fn describe(installments: i32, value: Decimal, total: Decimal, rate: Decimal) -> String {
    if installments == 1 {
        format!("À vista {}", format_brl(total))
    } else if rate.is_zero() {
        format!("{}x de {} sem juros", installments, format_brl(value))
    } else {
        format!(
            "{}x de {} (total {})",
            installments,
            format_brl(value),
            format_brl(total)
        )
    }
}
