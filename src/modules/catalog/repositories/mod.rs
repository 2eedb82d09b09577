mod product_repository;
mod variant_repository;

pub use product_repository::ProductRepository;
pub use variant_repository::VariantRepository;
