use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::backlog::models::{
    BacklogListQuery, BacklogResponse, UpdateBacklogStatusRequest,
};
use crate::modules::backlog::services::BacklogService;

/// GET /purchase-backlog?status=awaiting_purchase
pub async fn list_backlog(
    service: web::Data<Arc<BacklogService>>,
    query: web::Query<BacklogListQuery>,
) -> Result<HttpResponse, AppError> {
    let items = service.list(query.status.as_deref()).await?;
    let body: Vec<BacklogResponse> = items.into_iter().map(BacklogResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// PATCH /purchase-backlog/{id}/status
pub async fn update_status(
    service: web::Data<Arc<BacklogService>>,
    path: web::Path<String>,
    request: web::Json<UpdateBacklogStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let item = service
        .update_status(&path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(BacklogResponse::from(item)))
}

/// Configure purchase backlog routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/purchase-backlog")
            .route("", web::get().to(list_backlog))
            .route("/{id}/status", web::patch().to(update_status)),
    );
}
