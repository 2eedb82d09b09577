pub mod receivable_controller;

pub use receivable_controller::configure;
