// Catalog module: products, their variants, stock and price history

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Product, ProductResponse, ProductVariant, VariantResponse};
pub use repositories::{ProductRepository, VariantRepository};
pub use services::CatalogService;
