use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use crate::core::{round_money, AppError, BusinessRuleViolation, Result};
use crate::modules::catalog::models::ProductVariant;
use crate::modules::sales::models::{ItemFulfillmentStatus, SaleFulfillmentStatus, SaleItemRequest};

/// The parts of a locked variant the planner reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantStock {
    pub id: String,
    pub sku: String,
    pub sale_price: Decimal,
    pub quantity: i32,
}

impl From<&ProductVariant> for VariantStock {
    fn from(variant: &ProductVariant) -> Self {
        Self {
            id: variant.id.clone(),
            sku: variant.sku.clone(),
            sale_price: variant.sale_price,
            quantity: variant.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedLine {
    pub line_number: i32,
    pub variant_id: String,
    pub sku: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub status: ItemFulfillmentStatus,
    /// Units to purchase for this line; zero when fulfilled
    pub shortfall: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FulfillmentPlan {
    pub lines: Vec<PlannedLine>,
    pub subtotal: Decimal,
    /// Units to take from each variant, summed over its lines
    pub stock_decrements: BTreeMap<String, i32>,
    pub fulfillment_status: SaleFulfillmentStatus,
}

impl FulfillmentPlan {
    pub fn pending_lines(&self) -> impl Iterator<Item = &PlannedLine> {
        self.lines
            .iter()
            .filter(|l| l.status == ItemFulfillmentStatus::PendingStock)
    }
}

/// Decides per line whether stock covers it.
///
/// Lines of the same variant draw from a running balance, so a second line
/// sees what the first one left. Stock is always taken in full and may go
/// negative: a negative balance is the backorder.
pub struct FulfillmentPlanner;

impl FulfillmentPlanner {
    pub fn plan(items: &[SaleItemRequest], stock: &[VariantStock]) -> Result<FulfillmentPlan> {
        let by_id: HashMap<&str, &VariantStock> =
            stock.iter().map(|v| (v.id.as_str(), v)).collect();
        let mut remaining: HashMap<&str, i32> =
            stock.iter().map(|v| (v.id.as_str(), v.quantity)).collect();

        let mut lines = Vec::with_capacity(items.len());
        let mut stock_decrements: BTreeMap<String, i32> = BTreeMap::new();
        let mut subtotal = Decimal::ZERO;

        for (index, item) in items.iter().enumerate() {
            let variant = by_id.get(item.variant_id.as_str()).ok_or_else(|| {
                AppError::business_rule(
                    BusinessRuleViolation::UnknownVariant,
                    format!("Variant '{}' does not exist", item.variant_id),
                )
            })?;

            let available = remaining.entry(variant.id.as_str()).or_insert(0);
            let (status, shortfall) = if *available >= item.quantity {
                (ItemFulfillmentStatus::Fulfilled, 0)
            } else {
                (
                    ItemFulfillmentStatus::PendingStock,
                    item.quantity - (*available).max(0),
                )
            };
            *available = available
                .checked_sub(item.quantity)
                .ok_or_else(|| quantity_overflow(&variant.sku))?;
            let taken = stock_decrements.entry(variant.id.clone()).or_insert(0);
            *taken = taken
                .checked_add(item.quantity)
                .ok_or_else(|| quantity_overflow(&variant.sku))?;

            let line_subtotal = round_money(variant.sale_price * Decimal::from(item.quantity));
            subtotal += line_subtotal;

            lines.push(PlannedLine {
                line_number: index as i32 + 1,
                variant_id: variant.id.clone(),
                sku: variant.sku.clone(),
                quantity: item.quantity,
                unit_price: variant.sale_price,
                subtotal: line_subtotal,
                status,
                shortfall,
            });
        }

        let fulfillment_status = if lines
            .iter()
            .any(|l| l.status == ItemFulfillmentStatus::PendingStock)
        {
            SaleFulfillmentStatus::AwaitingStock
        } else {
            SaleFulfillmentStatus::ReadyToShip
        };

        Ok(FulfillmentPlan {
            lines,
            subtotal,
            stock_decrements,
            fulfillment_status,
        })
    }
}

fn quantity_overflow(sku: &str) -> AppError {
    AppError::validation(format!("Quantity requested for '{}' is out of range", sku))
}
