use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::appointments::models::{
    AppointmentResponse, BookAppointmentRequest, DateRangeQuery, DayQuery, SlotResponse,
};
use crate::modules::appointments::services::{AppointmentService, AvailabilityService};

/// GET /appointments/slots?date=YYYY-MM-DD
pub async fn slots_of_day(
    service: web::Data<Arc<AvailabilityService>>,
    query: web::Query<DayQuery>,
) -> Result<HttpResponse, AppError> {
    let slots = service.slots_of_day(query.date).await?;
    let body: Vec<SlotResponse> = slots.into_iter().map(SlotResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /appointments
pub async fn book_appointment(
    service: web::Data<Arc<AppointmentService>>,
    request: web::Json<BookAppointmentRequest>,
) -> Result<HttpResponse, AppError> {
    let appointment = service.book(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(AppointmentResponse::from(appointment)))
}

/// GET /appointments?start_date=&end_date=
pub async fn list_appointments(
    service: web::Data<Arc<AppointmentService>>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse, AppError> {
    let appointments = service.confirmed_in_range(query.into_inner()).await?;
    let body: Vec<AppointmentResponse> = appointments
        .into_iter()
        .map(AppointmentResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

/// PATCH /appointments/{id}/cancel
pub async fn cancel_appointment(
    service: web::Data<Arc<AppointmentService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let appointment = service.cancel(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(AppointmentResponse::from(appointment)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/appointments")
            .route("", web::post().to(book_appointment))
            .route("", web::get().to(list_appointments))
            .route("/slots", web::get().to(slots_of_day))
            .route("/{id}/cancel", web::patch().to(cancel_appointment)),
    );
}
