// Contract tests for receivables and the purchase backlog

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
async fn test_list_receivables_rejects_unknown_status() {
    let app = init_app!();
    let req = test::TestRequest::get()
        .uri("/api/v1/receivables?status=LOST")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("PENDING"));
}

#[actix_web::test]
async fn test_update_receivable_rejects_unknown_status() {
    let app = init_app!();
    let req = test::TestRequest::patch()
        .uri("/api/v1/receivables/some-id/status")
        .set_json(json!({ "status": "LOST" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_update_receivable_requires_status_field() {
    let app = init_app!();
    let req = test::TestRequest::patch()
        .uri("/api/v1/receivables/some-id/status")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["kind"], "validation");
}

#[actix_web::test]
async fn test_list_backlog_rejects_unknown_status() {
    let app = init_app!();
    let req = test::TestRequest::get()
        .uri("/api/v1/purchase-backlog?status=lost")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_update_backlog_rejects_unknown_status() {
    let app = init_app!();
    let req = test::TestRequest::patch()
        .uri("/api/v1/purchase-backlog/some-id/status")
        .set_json(json!({ "status": "shipped" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["kind"], "validation");
}
