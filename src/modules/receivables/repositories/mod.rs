mod receivable_repository;

pub use receivable_repository::{ReceivableQuery, ReceivableRepository};
