// Contract tests for settings, installment rules and the quote endpoint

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

#[actix_web::test]
async fn test_quote_rejects_zero_purchase_value() {
    let app = init_app!();
    let req = test::TestRequest::get()
        .uri("/api/v1/installments?purchase_value=0")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["kind"], "validation");
}

#[actix_web::test]
async fn test_quote_requires_purchase_value() {
    let app = init_app!();
    let req = test::TestRequest::get()
        .uri("/api/v1/installments")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_create_rule_without_options_is_rejected() {
    let app = init_app!();
    let req = test::TestRequest::post()
        .uri("/api/v1/installment-rules")
        .set_json(json!({
            "name": "Acima de 500",
            "min_purchase_value": "500.00",
            "rules": []
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("at least one"));
}

#[actix_web::test]
async fn test_create_rule_with_duplicate_installments_is_rejected() {
    let app = init_app!();
    let req = test::TestRequest::post()
        .uri("/api/v1/installment-rules")
        .set_json(json!({
            "name": "Acima de 500",
            "min_purchase_value": "500.00",
            "rules": [
                { "installments": 2, "interest_rate_percentage": "3.00" },
                { "installments": 2, "interest_rate_percentage": "4.00" }
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_create_rule_with_full_interest_is_rejected() {
    let app = init_app!();
    let req = test::TestRequest::post()
        .uri("/api/v1/installment-rules")
        .set_json(json!({
            "name": "Invalid",
            "min_purchase_value": "100.00",
            "rules": [{ "installments": 3, "interest_rate_percentage": "100" }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_update_unknown_payment_method_is_not_found() {
    let app = init_app!();
    let req = test::TestRequest::patch()
        .uri("/api/v1/settings/payment-methods/boleto")
        .set_json(json!({ "is_active": false }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["kind"], "not_found");
}

#[actix_web::test]
async fn test_update_payment_method_rejects_zero_installments() {
    let app = init_app!();
    let req = test::TestRequest::patch()
        .uri("/api/v1/settings/payment-methods/card")
        .set_json(json!({ "max_installments": 0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
