mod product;
mod product_variant;

pub use product::{
    CreateProductRequest, Product, ProductFilter, ProductResponse, UpdateProductRequest,
};
pub(crate) use product::{blank_to_none, normalize_code};
pub use product_variant::{
    AdjustStockRequest, CreateVariantRequest, PriceHistoryEntry, PriceHistoryResponse,
    ProductVariant, UpdatePricesRequest, VariantResponse,
};
