// Contract tests for the sales endpoints
//
// Every request here is rejected before the database is touched, so the
// route table runs against a pool that never connects.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{http::StatusCode, test, App};
use serde_json::{json, Value};
use vitrine::modules;

macro_rules! init_app {
    () => {{
        let pool = helpers::lazy_pool();
        test::init_service(App::new().configure(|cfg| modules::configure(cfg, &pool))).await
    }};
}

async fn post_sale(body: Value) -> (StatusCode, Value) {
    let app = init_app!();
    let req = test::TestRequest::post()
        .uri("/api/v1/sales")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

#[actix_web::test]
async fn test_create_sale_without_items_is_rejected() {
    let (status, body) = post_sale(json!({
        "items": [],
        "payments": [{ "method": "pix" }]
    }))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "validation");
    assert_eq!(body["error"]["code"], 400);
}

#[actix_web::test]
async fn test_create_sale_without_payments_is_rejected() {
    let (status, body) = post_sale(json!({
        "items": [{ "variant_id": "v1", "quantity": 1 }]
    }))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "validation");
}

#[actix_web::test]
async fn test_create_sale_with_three_payments_is_rejected() {
    let (status, body) = post_sale(json!({
        "items": [{ "variant_id": "v1", "quantity": 1 }],
        "payments": [
            { "method": "pix", "amount": "10.00" },
            { "method": "card", "installments": 2 },
            { "method": "cash" }
        ]
    }))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "validation");
}

#[actix_web::test]
async fn test_create_sale_with_zero_quantity_is_rejected() {
    let (status, body) = post_sale(json!({
        "items": [{ "variant_id": "v1", "quantity": 0 }],
        "payments": [{ "method": "pix" }]
    }))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("quantity"));
}

#[actix_web::test]
async fn test_create_sale_with_oversized_quantity_is_rejected() {
    let (status, body) = post_sale(json!({
        "items": [
            { "variant_id": "v1", "quantity": 2_000_000_000 },
            { "variant_id": "v1", "quantity": 2_000_000_000 }
        ],
        "payments": [{ "method": "pix" }]
    }))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "validation");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("cannot exceed"));
}

#[actix_web::test]
async fn test_unknown_payment_method_reports_rule() {
    let (status, body) = post_sale(json!({
        "items": [{ "variant_id": "v1", "quantity": 1 }],
        "payments": [{ "method": "boleto" }]
    }))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "business_rule");
    assert_eq!(body["error"]["rule"], "invalid_payment_method");
}

#[actix_web::test]
async fn test_credit_sale_requires_customer() {
    let (status, body) = post_sale(json!({
        "items": [{ "variant_id": "v1", "quantity": 1 }],
        "payments": [{ "method": "credit", "installments": 2 }]
    }))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["rule"], "customer_required_for_credit");
}

#[actix_web::test]
async fn test_malformed_sale_body_uses_error_envelope() {
    let app = init_app!();
    let req = test::TestRequest::post()
        .uri("/api/v1/sales")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"items\": \"not-a-list\"}")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["kind"], "validation");
}

#[actix_web::test]
async fn test_list_sales_rejects_unknown_fulfillment_status() {
    let app = init_app!();
    let req = test::TestRequest::get()
        .uri("/api/v1/sales?fulfillment_status=SHIPPED_YESTERDAY")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["kind"], "validation");
}

#[actix_web::test]
async fn test_list_sales_rejects_negative_offset() {
    let app = init_app!();
    let req = test::TestRequest::get()
        .uri("/api/v1/sales?offset=-1")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_list_sales_rejects_non_numeric_limit() {
    let app = init_app!();
    let req = test::TestRequest::get()
        .uri("/api/v1/sales?limit=many")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["kind"], "validation");
}

#[actix_web::test]
async fn test_summary_rejects_inverted_range() {
    let app = init_app!();
    let req = test::TestRequest::get()
        .uri("/api/v1/sales/summary?start_date=2025-03-01&end_date=2025-02-01")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("start_date"));
}

#[actix_web::test]
async fn test_variant_creation_validates_prices() {
    let app = init_app!();
    let req = test::TestRequest::post()
        .uri("/api/v1/variants")
        .set_json(json!({
            "product_id": "dress",
            "sku": "DRS-M-BLK",
            "buy_price": "-1.00",
            "sale_price": "89.90"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
