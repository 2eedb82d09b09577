use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::core::error::AppError;
use crate::modules::settings::models::{PaymentMethod, UpdatePaymentMethodRequest};
use crate::modules::settings::services::SettingsService;

#[derive(Debug, Serialize)]
pub struct PaymentMethodResponse {
    pub key: String,
    pub name: String,
    pub is_active: bool,
    pub max_installments: i32,
    pub updated_at: String,
}

impl From<PaymentMethod> for PaymentMethodResponse {
    fn from(method: PaymentMethod) -> Self {
        Self {
            key: method.key.to_string(),
            name: method.name,
            is_active: method.is_active,
            max_installments: method.max_installments,
            updated_at: method.updated_at.to_rfc3339(),
        }
    }
}

/// GET /settings/payment-methods
pub async fn list_payment_methods(
    service: web::Data<Arc<SettingsService>>,
) -> Result<HttpResponse, AppError> {
    let methods = service.list_payment_methods().await?;
    let body: Vec<PaymentMethodResponse> =
        methods.into_iter().map(PaymentMethodResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// PATCH /settings/payment-methods/{key}
pub async fn update_payment_method(
    service: web::Data<Arc<SettingsService>>,
    path: web::Path<String>,
    request: web::Json<UpdatePaymentMethodRequest>,
) -> Result<HttpResponse, AppError> {
    let method = service
        .update_payment_method(&path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(PaymentMethodResponse::from(method)))
}

/// Configure settings routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/settings")
            .route("/payment-methods", web::get().to(list_payment_methods))
            .route(
                "/payment-methods/{key}",
                web::patch().to(update_payment_method),
            ),
    );
}
