pub mod backlog_controller;

pub use backlog_controller::configure;
