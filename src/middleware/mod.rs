pub mod error_handler;
pub mod request_id;

pub use error_handler::{configure_extractors, json_error_handler, log_error};
pub use request_id::{RequestId, RequestIdValue};
