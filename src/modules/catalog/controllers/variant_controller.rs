use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::catalog::models::{
    AdjustStockRequest, CreateVariantRequest, UpdatePricesRequest, VariantResponse,
};
use crate::modules::catalog::services::CatalogService;

/// Query parameters for listing variants
#[derive(Debug, Deserialize)]
pub struct ListVariantsQuery {
    #[serde(default)]
    pub low_stock: bool,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// POST /variants
pub async fn create_variant(
    service: web::Data<Arc<CatalogService>>,
    request: web::Json<CreateVariantRequest>,
) -> Result<HttpResponse, AppError> {
    let variant = service.create_variant(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(VariantResponse::from(variant)))
}

/// GET /variants/{id}
pub async fn get_variant(
    service: web::Data<Arc<CatalogService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let variant = service.get_variant(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(VariantResponse::from(variant)))
}

/// GET /variants?low_stock=true
pub async fn list_variants(
    service: web::Data<Arc<CatalogService>>,
    query: web::Query<ListVariantsQuery>,
) -> Result<HttpResponse, AppError> {
    if query.limit <= 0 || query.limit > 200 || query.offset < 0 {
        return Err(AppError::validation(
            "limit must be between 1 and 200 and offset cannot be negative",
        ));
    }

    let variants = service
        .list_variants(query.low_stock, query.limit, query.offset)
        .await?;
    let body: Vec<VariantResponse> = variants.into_iter().map(VariantResponse::from).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// PUT /variants/{id}/prices
pub async fn update_prices(
    service: web::Data<Arc<CatalogService>>,
    path: web::Path<String>,
    request: web::Json<UpdatePricesRequest>,
) -> Result<HttpResponse, AppError> {
    let variant = service
        .update_prices(&path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(VariantResponse::from(variant)))
}

/// POST /variants/{id}/stock
pub async fn adjust_stock(
    service: web::Data<Arc<CatalogService>>,
    path: web::Path<String>,
    request: web::Json<AdjustStockRequest>,
) -> Result<HttpResponse, AppError> {
    let variant = service
        .adjust_stock(&path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(VariantResponse::from(variant)))
}

/// Configure variant routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/variants")
            .route("", web::post().to(create_variant))
            .route("", web::get().to(list_variants))
            .route("/{id}", web::get().to(get_variant))
            .route("/{id}/prices", web::put().to(update_prices))
            .route("/{id}/stock", web::post().to(adjust_stock)),
    );
}
