// Installment tier: a purchase-value threshold and the installment counts it
// unlocks, each with the interest rate passed on to the customer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::core::{AppError, Result};

/// Identifier of the implicit tier used when no configured tier applies
pub const CASH_TIER_ID: &str = "cash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentOption {
    pub installments: i32,
    pub interest_rate_percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallmentTier {
    pub id: String,
    pub name: String,
    pub min_purchase_value: Decimal,
    /// Sorted by installment count, unique per count
    pub rules: Vec<InstallmentOption>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InstallmentTier {
    /// Single payment, no interest. Applies when the amount is below every tier.
    pub fn cash() -> Self {
        let epoch = DateTime::<Utc>::UNIX_EPOCH;
        Self {
            id: CASH_TIER_ID.to_string(),
            name: "À vista".to_string(),
            min_purchase_value: Decimal::ZERO,
            rules: vec![InstallmentOption {
                installments: 1,
                interest_rate_percentage: Decimal::ZERO,
            }],
            created_at: epoch,
            updated_at: epoch,
        }
    }

    pub fn option_for(&self, installments: i32) -> Option<&InstallmentOption> {
        self.rules.iter().find(|o| o.installments == installments)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstallmentTierRequest {
    pub name: String,
    pub min_purchase_value: Decimal,
    pub rules: Vec<InstallmentOption>,
}

impl InstallmentTierRequest {
    /// Validate and return the rules sorted by installment count
    pub fn validated_rules(&self) -> Result<Vec<InstallmentOption>> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Tier name is required"));
        }
        if self.min_purchase_value < Decimal::ZERO {
            return Err(AppError::validation(
                "min_purchase_value cannot be negative",
            ));
        }
        if self.rules.is_empty() {
            return Err(AppError::validation(
                "A tier needs at least one installment rule",
            ));
        }

        let mut seen = HashSet::new();
        for option in &self.rules {
            if option.installments < 1 {
                return Err(AppError::validation(
                    "Installment count must be at least 1",
                ));
            }
            if option.interest_rate_percentage < Decimal::ZERO
                || option.interest_rate_percentage >= Decimal::ONE_HUNDRED
            {
                return Err(AppError::validation(format!(
                    "Interest rate for {}x must be in [0, 100)",
                    option.installments
                )));
            }
            if !seen.insert(option.installments) {
                return Err(AppError::validation(format!(
                    "Installment count {}x is listed more than once",
                    option.installments
                )));
            }
        }

        let mut rules = self.rules.clone();
        rules.sort_by_key(|o| o.installments);
        Ok(rules)
    }
}

#[derive(Debug, Serialize)]
pub struct InstallmentOptionResponse {
    pub installments: i32,
    pub interest_rate_percentage: String,
}

#[derive(Debug, Serialize)]
pub struct InstallmentTierResponse {
    pub id: String,
    pub name: String,
    pub min_purchase_value: String,
    pub rules: Vec<InstallmentOptionResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<InstallmentTier> for InstallmentTierResponse {
    fn from(tier: InstallmentTier) -> Self {
        Self {
            id: tier.id,
            name: tier.name,
            min_purchase_value: tier.min_purchase_value.to_string(),
            rules: tier
                .rules
                .into_iter()
                .map(|o| InstallmentOptionResponse {
                    installments: o.installments,
                    interest_rate_percentage: o.interest_rate_percentage.to_string(),
                })
                .collect(),
            created_at: tier.created_at.to_rfc3339(),
            updated_at: tier.updated_at.to_rfc3339(),
        }
    }
}
