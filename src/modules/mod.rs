pub mod appointments;
pub mod backlog;
pub mod catalog;
pub mod clients;
pub mod health;
pub mod receivables;
pub mod sales;
pub mod settings;

use std::sync::Arc;

use actix_web::web;
use sqlx::MySqlPool;

use crate::middleware::configure_extractors;

/// Build every service on the shared pool and mount all routes.
///
/// Health probes live at the root; business routes under `/api/v1`.
pub fn configure(cfg: &mut web::ServiceConfig, pool: &MySqlPool) {
    configure_extractors(cfg);

    cfg.app_data(web::Data::new(pool.clone()))
        .app_data(web::Data::new(Arc::new(catalog::CatalogService::new(
            pool.clone(),
        ))))
        .app_data(web::Data::new(Arc::new(settings::SettingsService::new(
            pool.clone(),
        ))))
        .app_data(web::Data::new(Arc::new(sales::SaleService::new(pool.clone()))))
        .app_data(web::Data::new(Arc::new(
            receivables::ReceivableService::new(pool.clone()),
        )))
        .app_data(web::Data::new(Arc::new(backlog::BacklogService::new(
            pool.clone(),
        ))))
        .app_data(web::Data::new(Arc::new(clients::ClientService::new(
            pool.clone(),
        ))))
        .app_data(web::Data::new(Arc::new(
            appointments::AvailabilityService::new(pool.clone()),
        )))
        .app_data(web::Data::new(Arc::new(
            appointments::AppointmentService::new(pool.clone()),
        )));

    health::controllers::configure(cfg);

    cfg.service(
        web::scope("/api/v1")
            .configure(catalog::controllers::configure)
            .configure(settings::controllers::configure)
            .configure(sales::controllers::configure)
            .configure(receivables::controllers::configure)
            .configure(backlog::controllers::configure)
            .configure(clients::controllers::configure)
            .configure(appointments::controllers::configure),
    );
}
