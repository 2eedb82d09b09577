// Sale aggregate: line items with a per-item fulfillment decision and the
// settled payment legs. Created once at checkout; the only later mutation
// is cancellation.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{AppError, BusinessRuleViolation, Result};
use crate::modules::settings::models::PaymentMethodKind;

/// Whether stock covered a line at sale time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemFulfillmentStatus {
    Fulfilled,
    /// Sold on backorder; a purchase backlog row tracks the shortfall
    PendingStock,
}

impl ItemFulfillmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemFulfillmentStatus::Fulfilled => "fulfilled",
            ItemFulfillmentStatus::PendingStock => "pending_stock",
        }
    }
}

impl fmt::Display for ItemFulfillmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemFulfillmentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "fulfilled" => Ok(ItemFulfillmentStatus::Fulfilled),
            "pending_stock" => Ok(ItemFulfillmentStatus::PendingStock),
            other => Err(format!("Invalid item fulfillment status: {}", other)),
        }
    }
}

/// Sale-level fulfillment lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleFulfillmentStatus {
    ReadyToShip,
    AwaitingStock,
    Partial,
    Fulfilled,
    Canceled,
}

impl SaleFulfillmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleFulfillmentStatus::ReadyToShip => "ready_to_ship",
            SaleFulfillmentStatus::AwaitingStock => "awaiting_stock",
            SaleFulfillmentStatus::Partial => "partial",
            SaleFulfillmentStatus::Fulfilled => "fulfilled",
            SaleFulfillmentStatus::Canceled => "canceled",
        }
    }

    /// Shipped goods (fully or partly) can no longer be canceled
    pub fn is_shipped(&self) -> bool {
        matches!(
            self,
            SaleFulfillmentStatus::Partial | SaleFulfillmentStatus::Fulfilled
        )
    }
}

impl fmt::Display for SaleFulfillmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SaleFulfillmentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ready_to_ship" => Ok(SaleFulfillmentStatus::ReadyToShip),
            "awaiting_stock" => Ok(SaleFulfillmentStatus::AwaitingStock),
            "partial" => Ok(SaleFulfillmentStatus::Partial),
            "fulfilled" => Ok(SaleFulfillmentStatus::Fulfilled),
            "canceled" => Ok(SaleFulfillmentStatus::Canceled),
            other => Err(format!("Invalid fulfillment status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "paid" => Ok(PaymentStatus::Paid),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(format!("Invalid payment status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub line_number: i32,
    pub variant_id: String,
    /// SKU at sale time
    pub sku: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub fulfillment_status: ItemFulfillmentStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalePayment {
    pub id: String,
    pub sale_id: String,
    pub leg_number: i32,
    pub method: PaymentMethodKind,
    /// Charged amount, interest included
    pub amount: Decimal,
    pub interest_amount: Decimal,
    pub installments: i32,
    pub interest_rate_percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    pub id: String,
    pub customer_id: Option<String>,
    pub items: Vec<SaleItem>,
    pub subtotal_amount: Decimal,
    pub discount_percentage: Decimal,
    pub discount_amount: Decimal,
    pub interest_amount: Decimal,
    /// Sum of payment amounts: net of discount, gross of repassed interest
    pub total_amount: Decimal,
    pub payments: Vec<SalePayment>,
    pub payment_status: PaymentStatus,
    pub fulfillment_status: SaleFulfillmentStatus,
    pub due_date: Option<NaiveDate>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    pub fn is_canceled(&self) -> bool {
        self.fulfillment_status == SaleFulfillmentStatus::Canceled
    }

    pub fn credit_payments(&self) -> impl Iterator<Item = &SalePayment> {
        self.payments
            .iter()
            .filter(|p| p.method == PaymentMethodKind::Credit && p.installments > 0)
    }
}

/// Largest quantity a single sale line may carry
pub const MAX_LINE_QUANTITY: i32 = 10_000;

#[derive(Debug, Clone, Deserialize)]
pub struct SaleItemRequest {
    pub variant_id: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntentRequest {
    pub method: String,
    pub amount: Option<Decimal>,
    pub installments: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSaleRequest {
    #[serde(default)]
    pub items: Vec<SaleItemRequest>,
    #[serde(default)]
    pub payments: Vec<PaymentIntentRequest>,
    pub customer_id: Option<String>,
    pub discount_percentage: Option<Decimal>,
    /// First receivable due date for credit legs
    pub due_date: Option<NaiveDate>,
}

impl CreateSaleRequest {
    /// Shape checks that need no database access
    pub fn validate(&self) -> Result<()> {
        if self.items.is_empty() {
            return Err(AppError::validation("A sale needs at least one item"));
        }
        for (index, item) in self.items.iter().enumerate() {
            if item.variant_id.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "items[{}].variant_id is required",
                    index
                )));
            }
            if item.quantity < 1 {
                return Err(AppError::validation(format!(
                    "items[{}].quantity must be at least 1",
                    index
                )));
            }
            if item.quantity > MAX_LINE_QUANTITY {
                return Err(AppError::validation(format!(
                    "items[{}].quantity cannot exceed {}",
                    index, MAX_LINE_QUANTITY
                )));
            }
        }

        if self.payments.is_empty() {
            return Err(AppError::validation("payments is required"));
        }
        if self.payments.len() > 2 {
            return Err(AppError::validation(
                "At most two payments (entry plus installments) are supported",
            ));
        }
        for (index, payment) in self.payments.iter().enumerate() {
            if let Some(installments) = payment.installments {
                if installments < 1 {
                    return Err(AppError::validation(format!(
                        "payments[{}].installments must be at least 1",
                        index
                    )));
                }
            }
            if let Some(amount) = payment.amount {
                if amount < Decimal::ZERO {
                    return Err(AppError::validation(format!(
                        "payments[{}].amount cannot be negative",
                        index
                    )));
                }
            }
        }

        if let Some(customer_id) = &self.customer_id {
            if customer_id.trim().is_empty() {
                return Err(AppError::validation("customer_id cannot be blank"));
            }
        }

        Ok(())
    }

    /// Parse payment intents and check the customer requirement of credit legs
    pub fn payment_intents(&self) -> Result<Vec<PaymentIntent>> {
        let intents = self
            .payments
            .iter()
            .map(|p| {
                Ok(PaymentIntent {
                    method: PaymentMethodKind::parse(&p.method)?,
                    amount: p.amount,
                    installments: p.installments,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let has_credit = intents.iter().any(|i| i.method == PaymentMethodKind::Credit);
        if has_credit && self.customer_id.is_none() {
            return Err(AppError::business_rule(
                BusinessRuleViolation::CustomerRequiredForCredit,
                "Credit sales require a customer_id",
            ));
        }

        Ok(intents)
    }
}

/// A requested payment leg before settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentIntent {
    pub method: PaymentMethodKind,
    /// Required on the entry leg of a split payment, ignored otherwise
    pub amount: Option<Decimal>,
    pub installments: Option<i32>,
}
