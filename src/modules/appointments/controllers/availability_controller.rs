use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::appointments::models::{
    CreateSlotsRequest, DateRangeQuery, MonthQuery, SlotResponse,
};
use crate::modules::appointments::services::AvailabilityService;

/// POST /availability
pub async fn create_slots(
    service: web::Data<Arc<AvailabilityService>>,
    request: web::Json<CreateSlotsRequest>,
) -> Result<HttpResponse, AppError> {
    let slots = service.create_slots(request.into_inner()).await?;
    let body: Vec<SlotResponse> = slots.into_iter().map(SlotResponse::from).collect();
    Ok(HttpResponse::Created().json(body))
}

/// GET /availability?start_date=&end_date=
pub async fn list_slots(
    service: web::Data<Arc<AvailabilityService>>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse, AppError> {
    let slots = service.slots_in_range(query.into_inner()).await?;
    let body: Vec<SlotResponse> = slots.into_iter().map(SlotResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /availability/available-days?year=&month=
pub async fn available_days(
    service: web::Data<Arc<AvailabilityService>>,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse, AppError> {
    let days = service.available_days(query.into_inner()).await?;
    let body: Vec<String> = days.into_iter().map(|d| d.to_string()).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// DELETE /availability/{id}
pub async fn delete_slot(
    service: web::Data<Arc<AvailabilityService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_slot(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/availability")
            .route("", web::post().to(create_slots))
            .route("", web::get().to(list_slots))
            .route("/available-days", web::get().to(available_days))
            .route("/{id}", web::delete().to(delete_slot)),
    );
}
