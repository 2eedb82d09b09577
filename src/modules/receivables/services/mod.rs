pub mod overdue_sweeper;
pub mod receivable_calculator;
pub mod receivable_service;

pub use overdue_sweeper::OverdueSweeper;
pub use receivable_calculator::ReceivableCalculator;
pub use receivable_service::ReceivableService;
