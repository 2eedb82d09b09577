pub mod product_controller;
pub mod variant_controller;

use actix_web::web;

/// Configure catalog routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    product_controller::configure(cfg);
    variant_controller::configure(cfg);
}
