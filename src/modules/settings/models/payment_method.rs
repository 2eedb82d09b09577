use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{AppError, BusinessRuleViolation, Result};

/// Payment methods the store accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethodKind {
    Cash,
    Card,
    Pix,
    /// In-store credit billed through accounts receivable
    Credit,
}

impl PaymentMethodKind {
    pub const ALL: [PaymentMethodKind; 4] = [
        PaymentMethodKind::Cash,
        PaymentMethodKind::Card,
        PaymentMethodKind::Pix,
        PaymentMethodKind::Credit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethodKind::Cash => "cash",
            PaymentMethodKind::Card => "card",
            PaymentMethodKind::Pix => "pix",
            PaymentMethodKind::Credit => "credit",
        }
    }

    /// Parse a method key from a sale request
    pub fn parse(key: &str) -> Result<Self> {
        key.parse().map_err(|_| {
            AppError::business_rule(
                BusinessRuleViolation::InvalidPaymentMethod,
                format!("Unknown payment method '{}'", key),
            )
        })
    }
}

impl fmt::Display for PaymentMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethodKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethodKind::Cash),
            "card" => Ok(PaymentMethodKind::Card),
            "pix" => Ok(PaymentMethodKind::Pix),
            "credit" => Ok(PaymentMethodKind::Credit),
            other => Err(format!("Invalid payment method: {}", other)),
        }
    }
}

/// Store-level configuration of one payment method
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentMethod {
    pub key: PaymentMethodKind,
    pub name: String,
    pub is_active: bool,
    pub max_installments: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePaymentMethodRequest {
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub max_installments: Option<i32>,
}

impl UpdatePaymentMethodRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("name cannot be empty"));
            }
        }
        if let Some(max) = self.max_installments {
            if max < 1 {
                return Err(AppError::validation("max_installments must be at least 1"));
            }
        }
        Ok(())
    }

    pub fn apply(self, method: &mut PaymentMethod) {
        if let Some(name) = self.name {
            method.name = name.trim().to_string();
        }
        if let Some(is_active) = self.is_active {
            method.is_active = is_active;
        }
        if let Some(max) = self.max_installments {
            method.max_installments = max;
        }
    }
}
