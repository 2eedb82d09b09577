pub mod backlog_service;

pub use backlog_service::BacklogService;
