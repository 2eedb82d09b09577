use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{http::header, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vitrine::config::{Config, LogFormat};
use vitrine::middleware::RequestId;
use vitrine::modules;
use vitrine::receivables::{OverdueSweeper, ReceivableService};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    init_tracing(&config);

    tracing::info!(
        env = config.app.env.as_str(),
        bind_address = %config.server.bind_address(),
        workers = config.server.workers,
        "Starting vitrine"
    );

    let pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    tracing::info!(
        database = config.database.redacted_url().as_str(),
        min_connections = config.database.pool_size,
        max_connections = config.database.max_connections,
        "Database pool initialized"
    );

    if config.app.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;
        tracing::info!("Database migrations applied");
    }

    if config.app.overdue_sweep_interval_secs > 0 {
        let sweeper = OverdueSweeper::new(
            Arc::new(ReceivableService::new(pool.clone())),
            Duration::from_secs(config.app.overdue_sweep_interval_secs),
        );
        tokio::spawn(sweeper.run());
    }

    let server_pool = pool.clone();
    let app_config = config.app.clone();
    let bind_address = config.server.bind_address();

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&app_config))
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .configure(|cfg| modules::configure(cfg, &server_pool))
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run()
    .await
    .context("HTTP server error")?;

    pool.close().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

/// `RUST_LOG` wins over `LOG_LEVEL`
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "vitrine={level},actix_web={level},sqlx=warn",
            level = config.app.log_level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    match config.app.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn cors(app: &vitrine::config::AppConfig) -> Cors {
    match &app.cors_allowed_origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
            .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
            .max_age(3600),
        None if !app.is_production() => Cors::permissive(),
        None => Cors::default(),
    }
}
