use std::sync::Arc;

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::settings::models::{InstallmentTierRequest, InstallmentTierResponse};
use crate::modules::settings::services::{PaymentConditionResponse, SettingsService};

#[derive(Debug, Deserialize)]
pub struct PaymentConditionsQuery {
    pub purchase_value: Decimal,
    #[serde(default = "default_repass")]
    pub repass_interest: bool,
}

fn default_repass() -> bool {
    true
}

/// GET /installment-rules
pub async fn list_rules(
    service: web::Data<Arc<SettingsService>>,
) -> Result<HttpResponse, AppError> {
    let tiers = service.list_tiers().await?;
    let body: Vec<InstallmentTierResponse> =
        tiers.into_iter().map(InstallmentTierResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /installment-rules/{id}
pub async fn get_rule(
    service: web::Data<Arc<SettingsService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let tier = service.get_tier(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(InstallmentTierResponse::from(tier)))
}

/// POST /installment-rules
///
/// 409 when a tier already exists for the same `min_purchase_value`.
pub async fn create_rule(
    service: web::Data<Arc<SettingsService>>,
    request: web::Json<InstallmentTierRequest>,
) -> Result<HttpResponse, AppError> {
    let tier = service.create_tier(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(InstallmentTierResponse::from(tier)))
}

/// PUT /installment-rules/{id}
pub async fn update_rule(
    service: web::Data<Arc<SettingsService>>,
    path: web::Path<String>,
    request: web::Json<InstallmentTierRequest>,
) -> Result<HttpResponse, AppError> {
    let tier = service
        .update_tier(&path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(InstallmentTierResponse::from(tier)))
}

/// DELETE /installment-rules/{id}
pub async fn delete_rule(
    service: web::Data<Arc<SettingsService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_tier(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /installments?purchase_value=900&repass_interest=true
pub async fn payment_conditions(
    service: web::Data<Arc<SettingsService>>,
    query: web::Query<PaymentConditionsQuery>,
) -> Result<HttpResponse, AppError> {
    let conditions = service
        .payment_conditions(query.purchase_value, query.repass_interest)
        .await?;
    let body: Vec<PaymentConditionResponse> = conditions
        .into_iter()
        .map(PaymentConditionResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Configure installment rule and quote routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/installment-rules")
            .route("", web::get().to(list_rules))
            .route("", web::post().to(create_rule))
            .route("/{id}", web::get().to(get_rule))
            .route("/{id}", web::put().to(update_rule))
            .route("/{id}", web::delete().to(delete_rule)),
    )
    .route("/installments", web::get().to(payment_conditions));
}
