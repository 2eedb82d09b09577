// Purchase backlog: units sold on backorder that still have to be bought.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{AppError, BusinessRuleViolation, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BacklogStatus {
    AwaitingPurchase,
    PurchaseOrderSent,
    Received,
    Canceled,
}

impl BacklogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BacklogStatus::AwaitingPurchase => "awaiting_purchase",
            BacklogStatus::PurchaseOrderSent => "purchase_order_sent",
            BacklogStatus::Received => "received",
            BacklogStatus::Canceled => "canceled",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        value
            .parse()
            .map_err(|e: String| AppError::validation(e))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BacklogStatus::Received | BacklogStatus::Canceled)
    }

    /// awaiting_purchase -> purchase_order_sent | canceled,
    /// purchase_order_sent -> received | canceled
    pub fn can_transition_to(&self, next: BacklogStatus) -> bool {
        matches!(
            (self, next),
            (
                BacklogStatus::AwaitingPurchase,
                BacklogStatus::PurchaseOrderSent | BacklogStatus::Canceled
            ) | (
                BacklogStatus::PurchaseOrderSent,
                BacklogStatus::Received | BacklogStatus::Canceled
            )
        )
    }

    pub fn ensure_transition(&self, next: BacklogStatus) -> Result<()> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(AppError::business_rule(
                BusinessRuleViolation::InvalidBacklogTransition,
                format!("Backlog item cannot move from {} to {}", self, next),
            ))
        }
    }
}

impl Default for BacklogStatus {
    fn default() -> Self {
        BacklogStatus::AwaitingPurchase
    }
}

impl fmt::Display for BacklogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BacklogStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "awaiting_purchase" => Ok(BacklogStatus::AwaitingPurchase),
            "purchase_order_sent" => Ok(BacklogStatus::PurchaseOrderSent),
            "received" => Ok(BacklogStatus::Received),
            "canceled" => Ok(BacklogStatus::Canceled),
            other => Err(format!("Invalid backlog status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseBacklogItem {
    pub id: String,
    pub variant_id: String,
    /// Units missing when the sale was made
    pub quantity_needed: i32,
    pub source_sale_id: String,
    pub source_sale_item_id: String,
    pub status: BacklogStatus,
    pub purchase_order_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BacklogListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBacklogStatusRequest {
    pub status: String,
    pub purchase_order_ref: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BacklogResponse {
    pub id: String,
    pub variant_id: String,
    pub quantity_needed: i32,
    pub source_sale_id: String,
    pub source_sale_item_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_order_ref: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PurchaseBacklogItem> for BacklogResponse {
    fn from(item: PurchaseBacklogItem) -> Self {
        Self {
            id: item.id,
            variant_id: item.variant_id,
            quantity_needed: item.quantity_needed,
            source_sale_id: item.source_sale_id,
            source_sale_item_id: item.source_sale_item_id,
            status: item.status.to_string(),
            purchase_order_ref: item.purchase_order_ref,
            created_at: item.created_at.to_rfc3339(),
            updated_at: item.updated_at.to_rfc3339(),
        }
    }
}
