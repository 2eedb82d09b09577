// Product variant: the sellable, stock-carrying unit of the catalog.
// Prices are versioned through an append-only history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductVariant {
    pub id: String,
    pub product_id: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub sku: String,
    pub buy_price: Decimal,
    pub sale_price: Decimal,
    /// Stock on hand. Negative while backordered units are owed.
    pub quantity: i32,
    pub minimum_stock: i32,
    pub price_history: Vec<PriceHistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductVariant {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.minimum_stock
    }

    /// Whether new prices differ from the current ones
    pub fn prices_differ(&self, buy_price: Decimal, sale_price: Decimal) -> bool {
        self.buy_price != buy_price || self.sale_price != sale_price
    }
}

/// Prices a variant carried before a change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    pub buy_price: Decimal,
    pub sale_price: Decimal,
    pub changed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVariantRequest {
    pub product_id: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub sku: String,
    pub buy_price: Decimal,
    pub sale_price: Decimal,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub minimum_stock: i32,
}

impl CreateVariantRequest {
    pub fn validate(&self) -> Result<()> {
        if self.product_id.trim().is_empty() {
            return Err(AppError::validation("product_id is required"));
        }
        if self.sku.trim().is_empty() {
            return Err(AppError::validation("sku is required"));
        }
        validate_prices(self.buy_price, self.sale_price)?;
        if self.quantity < 0 {
            return Err(AppError::validation("Initial quantity cannot be negative"));
        }
        if self.minimum_stock < 0 {
            return Err(AppError::validation("minimum_stock cannot be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePricesRequest {
    pub buy_price: Decimal,
    pub sale_price: Decimal,
}

impl UpdatePricesRequest {
    pub fn validate(&self) -> Result<()> {
        validate_prices(self.buy_price, self.sale_price)
    }
}

/// Signed stock movement, e.g. `+5` for a received purchase order
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustStockRequest {
    pub delta: i32,
}

fn validate_prices(buy_price: Decimal, sale_price: Decimal) -> Result<()> {
    if buy_price < Decimal::ZERO || sale_price < Decimal::ZERO {
        return Err(AppError::validation("Prices cannot be negative"));
    }
    if buy_price.scale() > 2 || sale_price.scale() > 2 {
        return Err(AppError::validation(
            "Prices must have at most 2 decimal places",
        ));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct PriceHistoryResponse {
    pub buy_price: String,
    pub sale_price: String,
    pub changed_at: String,
}

#[derive(Debug, Serialize)]
pub struct VariantResponse {
    pub id: String,
    pub product_id: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub sku: String,
    pub buy_price: String,
    pub sale_price: String,
    pub quantity: i32,
    pub minimum_stock: i32,
    pub low_stock: bool,
    pub price_history: Vec<PriceHistoryResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ProductVariant> for VariantResponse {
    fn from(variant: ProductVariant) -> Self {
        let low_stock = variant.is_low_stock();
        Self {
            id: variant.id,
            product_id: variant.product_id,
            size: variant.size,
            color: variant.color,
            sku: variant.sku,
            buy_price: variant.buy_price.to_string(),
            sale_price: variant.sale_price.to_string(),
            quantity: variant.quantity,
            minimum_stock: variant.minimum_stock,
            low_stock,
            price_history: variant
                .price_history
                .into_iter()
                .map(|entry| PriceHistoryResponse {
                    buy_price: entry.buy_price.to_string(),
                    sale_price: entry.sale_price.to_string(),
                    changed_at: entry.changed_at.to_rfc3339(),
                })
                .collect(),
            created_at: variant.created_at.to_rfc3339(),
            updated_at: variant.updated_at.to_rfc3339(),
        }
    }
}
