mod sale_repository;

pub use sale_repository::{SaleRepository, SaleTotals};
