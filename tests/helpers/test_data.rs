// Test data factory
//
// Unique SKUs and phone numbers keep tests isolated on a shared database.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use uuid::Uuid;
use vitrine::modules::catalog::models::{CreateProductRequest, CreateVariantRequest, ProductVariant};
use vitrine::modules::catalog::CatalogService;

pub fn unique_sku(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..12])
}

/// Eleven digits, unique enough per test run
pub fn unique_phone() -> String {
    let digits: String = Uuid::new_v4()
        .as_u128()
        .to_string()
        .chars()
        .take(9)
        .collect();
    format!("11{}", digits)
}

pub fn product_request(name: &str) -> CreateProductRequest {
    CreateProductRequest {
        name: name.to_string(),
        description: None,
        code: Some(unique_sku("P")),
        category: Some("vestidos".to_string()),
        is_available: true,
    }
}

pub fn variant_request(product_id: &str, sale_price: Decimal, quantity: i32) -> CreateVariantRequest {
    CreateVariantRequest {
        product_id: product_id.to_string(),
        size: Some("M".to_string()),
        color: Some("black".to_string()),
        sku: unique_sku("TEST"),
        buy_price: sale_price / Decimal::TWO,
        sale_price,
        quantity,
        minimum_stock: 1,
    }
}

/// Create a product with a single variant carrying `quantity` units
pub async fn stocked_variant(
    catalog: &CatalogService,
    sale_price: Decimal,
    quantity: i32,
) -> ProductVariant {
    let product = catalog
        .create_product(product_request("Test Dress"))
        .await
        .expect("Failed to create test product");
    catalog
        .create_variant(variant_request(&product.id, sale_price, quantity))
        .await
        .expect("Failed to create test variant")
}

/// A well-formed single-leg PIX sale body
pub fn pix_sale_payload(variant_id: &str, quantity: i32) -> Value {
    json!({
        "items": [{ "variant_id": variant_id, "quantity": quantity }],
        "payments": [{ "method": "pix" }]
    })
}

/// Slot payload starting `days_ahead` days from now, one hour long
pub fn slot_payload(days_ahead: i64) -> Value {
    let start = Utc::now() + Duration::days(days_ahead);
    let end = start + Duration::hours(1);
    json!({
        "slots": [{ "start_time": start.to_rfc3339(), "end_time": end.to_rfc3339() }]
    })
}
