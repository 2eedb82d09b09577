use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReceivableStatus {
    Pending,
    Paid,
    Overdue,
}

impl ReceivableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceivableStatus::Pending => "PENDING",
            ReceivableStatus::Paid => "PAID",
            ReceivableStatus::Overdue => "OVERDUE",
        }
    }

    /// Parse a status from user input; unknown values are a validation error
    pub fn parse(value: &str) -> Result<Self> {
        value.parse().map_err(|_| {
            AppError::validation(format!(
                "Invalid receivable status '{}': expected PENDING, PAID or OVERDUE",
                value
            ))
        })
    }
}

impl fmt::Display for ReceivableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReceivableStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ReceivableStatus::Pending),
            "PAID" => Ok(ReceivableStatus::Paid),
            "OVERDUE" => Ok(ReceivableStatus::Overdue),
            other => Err(format!("Invalid receivable status: {}", other)),
        }
    }
}

/// One installment owed by a customer for a credit sale
#[derive(Debug, Clone, PartialEq)]
pub struct AccountReceivable {
    pub id: String,
    pub sale_id: String,
    pub customer_id: String,
    /// Which payment leg of the sale this schedule belongs to
    pub payment_leg: i32,
    pub installment_number: i32,
    pub total_installments: i32,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub status: ReceivableStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReceivableFilter {
    pub status: Option<String>,
    pub customer_id: Option<String>,
    pub sale_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateReceivableStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ReceivableResponse {
    pub id: String,
    pub sale_id: String,
    pub customer_id: String,
    pub installment_number: i32,
    pub total_installments: i32,
    pub amount: String,
    pub due_date: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,
}

impl From<AccountReceivable> for ReceivableResponse {
    fn from(receivable: AccountReceivable) -> Self {
        Self {
            id: receivable.id,
            sale_id: receivable.sale_id,
            customer_id: receivable.customer_id,
            installment_number: receivable.installment_number,
            total_installments: receivable.total_installments,
            amount: receivable.amount.to_string(),
            due_date: receivable.due_date.to_string(),
            status: receivable.status.to_string(),
            paid_at: receivable.paid_at.map(|dt| dt.to_rfc3339()),
        }
    }
}
