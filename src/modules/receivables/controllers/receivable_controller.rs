use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::core::error::AppError;
use crate::modules::receivables::models::{
    ReceivableFilter, ReceivableResponse, UpdateReceivableStatusRequest,
};
use crate::modules::receivables::services::ReceivableService;

/// GET /receivables?status=&customer_id=&sale_id=
pub async fn list_receivables(
    service: web::Data<Arc<ReceivableService>>,
    query: web::Query<ReceivableFilter>,
) -> Result<HttpResponse, AppError> {
    let receivables = service.list(query.into_inner()).await?;
    let body: Vec<ReceivableResponse> = receivables
        .into_iter()
        .map(ReceivableResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

/// PATCH /receivables/{id}/status
pub async fn update_status(
    service: web::Data<Arc<ReceivableService>>,
    path: web::Path<String>,
    request: web::Json<UpdateReceivableStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let receivable = service
        .update_status(&path.into_inner(), &request.status)
        .await?;
    Ok(HttpResponse::Ok().json(ReceivableResponse::from(receivable)))
}

/// POST /receivables/mark-overdue
pub async fn mark_overdue(
    service: web::Data<Arc<ReceivableService>>,
) -> Result<HttpResponse, AppError> {
    let updated = service.mark_overdue(Utc::now().date_naive()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "updated": updated })))
}

/// Configure receivable routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/receivables")
            .route("", web::get().to(list_receivables))
            .route("/mark-overdue", web::post().to(mark_overdue))
            .route("/{id}/status", web::patch().to(update_status)),
    );
}
