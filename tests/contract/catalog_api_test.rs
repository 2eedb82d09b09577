// Contract tests for the product and variant endpoints
//
// Every request here is rejected before the database is touched.

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
async fn test_create_product_requires_name() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/products")
        .set_json(json!({ "name": "  ", "category": "vestidos" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["kind"], "validation");
    assert!(body["error"]["message"].as_str().unwrap().contains("name"));
}

#[actix_web::test]
async fn test_create_product_rejects_malformed_code() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/products")
        .set_json(json!({ "name": "Saia Midi", "code": "SM 01" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_empty_product_update_is_rejected() {
    let app = init_app!();

    let req = test::TestRequest::put()
        .uri("/api/v1/products/00000000-0000-4000-8000-000000000001")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Nothing to update"));
}

#[actix_web::test]
async fn test_list_products_rejects_out_of_range_limit() {
    let app = init_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/products?limit=500")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_variant_requires_product_reference() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/variants")
        .set_json(json!({
            "product_id": "",
            "sku": "VM-AZ-M",
            "buy_price": "80.00",
            "sale_price": "189.90"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("product_id"));
}
