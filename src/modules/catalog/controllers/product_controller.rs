use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::catalog::models::{
    CreateProductRequest, ProductFilter, ProductResponse, UpdateProductRequest,
};
use crate::modules::catalog::services::CatalogService;

/// Query parameters for listing products
#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    pub category: Option<String>,
    #[serde(default)]
    pub include_unavailable: bool,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// POST /products
pub async fn create_product(
    service: web::Data<Arc<CatalogService>>,
    request: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let product = service.create_product(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ProductResponse::new(product, Vec::new())))
}

/// GET /products/{id}
pub async fn get_product(
    service: web::Data<Arc<CatalogService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let (product, variants) = service.get_product(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::new(product, variants)))
}

/// GET /products?category=vestidos
pub async fn list_products(
    service: web::Data<Arc<CatalogService>>,
    query: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    if query.limit <= 0 || query.limit > 200 || query.offset < 0 {
        return Err(AppError::validation(
            "limit must be between 1 and 200 and offset cannot be negative",
        ));
    }

    let filter = ProductFilter {
        category: query.category.filter(|c| !c.trim().is_empty()),
        include_unavailable: query.include_unavailable,
        limit: query.limit,
        offset: query.offset,
    };
    let body: Vec<ProductResponse> = service
        .list_products(filter)
        .await?
        .into_iter()
        .map(|(product, variants)| ProductResponse::new(product, variants))
        .collect();

    Ok(HttpResponse::Ok().json(body))
}

/// PUT /products/{id}
pub async fn update_product(
    service: web::Data<Arc<CatalogService>>,
    path: web::Path<String>,
    request: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let (product, variants) = service
        .update_product(&path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ProductResponse::new(product, variants)))
}

/// Configure product routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::post().to(create_product))
            .route("", web::get().to(list_products))
            .route("/{id}", web::get().to(get_product))
            .route("/{id}", web::put().to(update_product)),
    );
}
