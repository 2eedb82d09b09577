// Contract tests for availability, appointments, clients and health probes

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
async fn test_health_check() {
    let app = init_app!();
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "vitrine");
}

#[actix_web::test]
async fn test_readiness_reports_unreachable_database() {
    let app = init_app!();
    let req = test::TestRequest::get().uri("/ready").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn test_create_slots_rejects_empty_batch() {
    let app = init_app!();
    let req = test::TestRequest::post()
        .uri("/api/v1/availability")
        .set_json(json!({ "slots": [] }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_create_slots_rejects_end_before_start() {
    let app = init_app!();
    let req = test::TestRequest::post()
        .uri("/api/v1/availability")
        .set_json(json!({
            "slots": [{
                "start_time": "2030-05-10T15:00:00Z",
                "end_time": "2030-05-10T14:00:00Z"
            }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["kind"], "validation");
}

#[actix_web::test]
async fn test_available_days_rejects_month_thirteen() {
    let app = init_app!();
    let req = test::TestRequest::get()
        .uri("/api/v1/availability/available-days?year=2030&month=13")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_list_slots_rejects_inverted_range() {
    let app = init_app!();
    let req = test::TestRequest::get()
        .uri("/api/v1/availability?start_date=2030-06-10&end_date=2030-06-01")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_list_appointments_rejects_inverted_range() {
    let app = init_app!();
    let req = test::TestRequest::get()
        .uri("/api/v1/appointments?start_date=2030-06-10&end_date=2030-06-01")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_booking_rejects_invalid_phone() {
    let app = init_app!();
    let req = test::TestRequest::post()
        .uri("/api/v1/appointments")
        .set_json(json!({
            "slot_id": "slot-1",
            "client_name": "Ana Souza",
            "client_phone": "12ab"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("phone"));
}

#[actix_web::test]
async fn test_create_client_requires_name() {
    let app = init_app!();
    let req = test::TestRequest::post()
        .uri("/api/v1/clients")
        .set_json(json!({ "name": "  ", "phone_number": "11987654321" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
