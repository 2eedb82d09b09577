use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: bool,
    /// Applied schema migrations; absent when the database is unreachable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrations_applied: Option<i64>,
}

/// GET /health
///
/// Liveness only: answers while the process serves requests and never
/// touches the database.
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn applied_migrations(pool: &MySqlPool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(pool)
        .await
}

/// GET /ready - 503 until the database answers
pub async fn readiness_check(pool: web::Data<MySqlPool>) -> impl Responder {
    let response = match applied_migrations(pool.get_ref()).await {
        Ok(count) => ReadinessResponse {
            ready: count > 0,
            database: true,
            migrations_applied: Some(count),
        },
        Err(e) => {
            tracing::error!(error = %e, "Database readiness check failed");
            ReadinessResponse {
                ready: false,
                database: false,
                migrations_applied: None,
            }
        }
    };

    if response.ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check));
}
