pub mod appointment_controller;
pub mod availability_controller;

pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    availability_controller::configure(cfg);
    appointment_controller::configure(cfg);
}
