pub mod installment_rule_controller;
pub mod settings_controller;

pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    settings_controller::configure(cfg);
    installment_rule_controller::configure(cfg);
}
