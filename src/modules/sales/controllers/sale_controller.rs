use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::Instrument;

use crate::core::error::AppError;
use crate::middleware::RequestIdValue;
use crate::modules::sales::models::{CreateSaleRequest, SaleResponse, SalesSummaryResponse};
use crate::modules::sales::services::{SaleListParams, SaleService};

/// Query parameters for listing sales
#[derive(Debug, Deserialize)]
pub struct ListSalesQuery {
    pub fulfillment_status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// POST /sales
pub async fn create_sale(
    service: web::Data<Arc<SaleService>>,
    request_id: RequestIdValue,
    request: web::Json<CreateSaleRequest>,
) -> Result<HttpResponse, AppError> {
    let sale = service
        .create_sale(request.into_inner())
        .instrument(tracing::info_span!("create_sale", request_id = %request_id))
        .await?;
    Ok(HttpResponse::Created().json(SaleResponse::from(sale)))
}

/// GET /sales?fulfillment_status=&limit=&offset=
pub async fn list_sales(
    service: web::Data<Arc<SaleService>>,
    query: web::Query<ListSalesQuery>,
) -> Result<HttpResponse, AppError> {
    let params = SaleListParams::parse(
        query.fulfillment_status.as_deref(),
        query.limit,
        query.offset,
    )?;
    let sales = service.list_sales(params).await?;
    let body: Vec<SaleResponse> = sales.into_iter().map(SaleResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /sales/summary?start_date=&end_date=
pub async fn get_summary(
    service: web::Data<Arc<SaleService>>,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse, AppError> {
    let summary = service.summary(query.start_date, query.end_date).await?;
    Ok(HttpResponse::Ok().json(SalesSummaryResponse::from(summary)))
}

/// GET /sales/{id}
pub async fn get_sale(
    service: web::Data<Arc<SaleService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let sale = service.get_sale(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(SaleResponse::from(sale)))
}

/// PATCH /sales/{id}/cancel
pub async fn cancel_sale(
    service: web::Data<Arc<SaleService>>,
    request_id: RequestIdValue,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let sale = service
        .cancel_sale(&path.into_inner())
        .instrument(tracing::info_span!("cancel_sale", request_id = %request_id))
        .await?;
    Ok(HttpResponse::Ok().json(SaleResponse::from(sale)))
}

/// Configure sale routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    // /summary must be registered ahead of /{id}
    cfg.service(
        web::scope("/sales")
            .route("", web::post().to(create_sale))
            .route("", web::get().to(list_sales))
            .route("/summary", web::get().to(get_summary))
            .route("/{id}", web::get().to(get_sale))
            .route("/{id}/cancel", web::patch().to(cancel_sale)),
    );
}
