// Appointment booking against a real MySQL database
//
// Run with: TEST_DATABASE_URL=mysql://... cargo test --test booking_flow_test -- --ignored

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{http::StatusCode, test, App};
use chrono::{Duration, DurationRound, Utc};
use serde_json::{json, Value};
use vitrine::core::error::AppError;
use vitrine::modules::{
    self,
    appointments::{
        models::{BookAppointmentRequest, CreateSlotsRequest, SlotRequest},
        AppointmentService, AppointmentStatus, AvailabilityService,
    },
};

fn booking(slot_id: &str, phone: &str) -> BookAppointmentRequest {
    BookAppointmentRequest {
        slot_id: slot_id.to_string(),
        client_name: "Beatriz Lima".to_string(),
        client_phone: phone.to_string(),
        client_address: None,
        notes: Some("Prova do vestido".to_string()),
    }
}

#[actix_web::test]
#[ignore = "Requires test database configuration"]
async fn test_book_double_book_and_cancel() {
    let pool = helpers::create_test_pool().await;
    let availability = AvailabilityService::new(pool.clone());
    let appointments = AppointmentService::new(pool.clone());

    let start = (Utc::now() + Duration::days(400))
        .duration_trunc(Duration::hours(1))
        .unwrap();
    let slots = availability
        .create_slots(CreateSlotsRequest {
            slots: vec![SlotRequest {
                start_time: start,
                end_time: start + Duration::minutes(45),
            }],
        })
        .await
        .unwrap();
    let slot = &slots[0];
    assert!(!slot.is_booked);

    let phone = helpers::unique_phone();
    let appointment = appointments.book(booking(&slot.id, &phone)).await.unwrap();
    assert_eq!(appointment.status, AppointmentStatus::Confirmed);
    assert_eq!(appointment.start_time, slot.start_time);

    let err = appointments
        .book(booking(&slot.id, &phone))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let day = availability.slots_of_day(start.date_naive()).await.unwrap();
    let booked = day.iter().find(|s| s.id == slot.id).unwrap();
    assert!(booked.is_booked);
    assert_eq!(booked.appointment_id.as_deref(), Some(appointment.id.as_str()));

    // A booked slot cannot be removed
    let err = availability.delete_slot(&slot.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let canceled = appointments.cancel(&appointment.id).await.unwrap();
    assert_eq!(canceled.status, AppointmentStatus::Canceled);

    let day = availability.slots_of_day(start.date_naive()).await.unwrap();
    let freed = day.iter().find(|s| s.id == slot.id).unwrap();
    assert!(!freed.is_booked);
    assert!(freed.appointment_id.is_none());

    // Returning client is matched by phone
    let again = appointments.book(booking(&slot.id, &phone)).await.unwrap();
    assert_eq!(again.client_id, appointment.client_id);

    appointments.cancel(&again.id).await.unwrap();
    availability.delete_slot(&slot.id).await.unwrap();
}

#[actix_web::test]
#[ignore = "Requires test database configuration"]
async fn test_available_days_over_http() {
    let pool = helpers::create_test_pool().await;
    let app =
        test::init_service(App::new().configure(|cfg| modules::configure(cfg, &pool))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/availability")
        .set_json(helpers::slot_payload(420))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let slot_id = created[0]["id"].as_str().unwrap().to_string();
    let start = created[0]["start_time"].as_str().unwrap().to_string();

    let date = chrono::DateTime::parse_from_rfc3339(&start)
        .unwrap()
        .with_timezone(&Utc)
        .date_naive();
    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/availability/available-days?year={}&month={}",
            chrono::Datelike::year(&date),
            chrono::Datelike::month(&date)
        ))
        .to_request();
    let days: Vec<String> = test::call_and_read_body_json(&app, req).await;
    assert!(days.contains(&date.format("%Y-%m-%d").to_string()));

    let req = test::TestRequest::post()
        .uri("/api/v1/appointments")
        .set_json(json!({
            "slot_id": slot_id,
            "client_name": "Clara Nunes",
            "client_phone": helpers::unique_phone()
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let appointment: Value = test::read_body_json(resp).await;
    assert_eq!(appointment["status"], "confirmed");

    let req = test::TestRequest::patch()
        .uri(&format!(
            "/api/v1/appointments/{}/cancel",
            appointment["id"].as_str().unwrap()
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/availability/{}", slot_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
