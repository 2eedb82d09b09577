use chrono::Utc;
use sqlx::MySqlPool;
use tracing::info;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::catalog::{
    models::{
        blank_to_none, normalize_code, AdjustStockRequest, CreateProductRequest,
        CreateVariantRequest, Product, ProductFilter, ProductVariant, UpdatePricesRequest,
        UpdateProductRequest,
    },
    repositories::{ProductRepository, VariantRepository},
};

/// Service for catalog business logic
pub struct CatalogService {
    products: ProductRepository,
    repository: VariantRepository,
}

impl CatalogService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            products: ProductRepository::new(pool.clone()),
            repository: VariantRepository::new(pool),
        }
    }

    pub async fn create_product(&self, request: CreateProductRequest) -> Result<Product> {
        request.validate()?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: request.name.trim().to_string(),
            description: request.description.and_then(blank_to_none),
            code: normalize_code(request.code),
            category: request.category.and_then(blank_to_none),
            is_available: request.is_available,
            created_at: now,
            updated_at: now,
        };

        self.products.create(&product).await?;

        info!(
            product_id = product.id.as_str(),
            code = product.code.as_deref().unwrap_or_default(),
            "Product created"
        );

        Ok(product)
    }

    /// A product with its variants. Unavailable products are not found.
    pub async fn get_product(&self, id: &str) -> Result<(Product, Vec<ProductVariant>)> {
        let product = self
            .products
            .find_by_id(id)
            .await?
            .filter(|p| p.is_available)
            .ok_or_else(|| AppError::not_found(format!("Product '{}' not found", id)))?;

        let variants = self.repository.list_by_product_ids(&[product.id.clone()]).await?;
        Ok((product, variants))
    }

    /// Products matching the filter, each with its variants
    pub async fn list_products(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<(Product, Vec<ProductVariant>)>> {
        let products = self.products.list(&filter).await?;
        let ids: Vec<String> = products.iter().map(|p| p.id.clone()).collect();
        let variants = self.repository.list_by_product_ids(&ids).await?;

        Ok(products
            .into_iter()
            .map(|product| {
                let own = variants
                    .iter()
                    .filter(|v| v.product_id == product.id)
                    .cloned()
                    .collect();
                (product, own)
            })
            .collect())
    }

    /// Update descriptive fields. Hidden products can still be edited, which
    /// is how they are made available again.
    pub async fn update_product(
        &self,
        id: &str,
        request: UpdateProductRequest,
    ) -> Result<(Product, Vec<ProductVariant>)> {
        request.validate()?;

        let mut product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product '{}' not found", id)))?;

        request.apply_to(&mut product);
        product.updated_at = Utc::now();
        self.products.update(&product).await?;

        info!(
            product_id = id,
            is_available = product.is_available,
            "Product updated"
        );

        let variants = self.repository.list_by_product_ids(&[product.id.clone()]).await?;
        Ok((product, variants))
    }

    pub async fn create_variant(&self, request: CreateVariantRequest) -> Result<ProductVariant> {
        request.validate()?;

        if self.products.find_by_id(request.product_id.trim()).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Product '{}' not found",
                request.product_id
            )));
        }

        let now = Utc::now();
        let variant = ProductVariant {
            id: Uuid::new_v4().to_string(),
            product_id: request.product_id.trim().to_string(),
            size: request.size,
            color: request.color,
            sku: request.sku.trim().to_string(),
            buy_price: request.buy_price,
            sale_price: request.sale_price,
            quantity: request.quantity,
            minimum_stock: request.minimum_stock,
            price_history: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.repository.create(&variant).await?;

        info!(
            variant_id = variant.id.as_str(),
            sku = variant.sku.as_str(),
            quantity = variant.quantity,
            "Variant created"
        );

        Ok(variant)
    }

    pub async fn get_variant(&self, id: &str) -> Result<ProductVariant> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Variant '{}' not found", id)))
    }

    pub async fn list_variants(
        &self,
        low_stock_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductVariant>> {
        self.repository.list(low_stock_only, limit, offset).await
    }

    /// Change prices, appending the previous pair to the price history.
    /// Submitting the current prices is a no-op.
    pub async fn update_prices(
        &self,
        id: &str,
        request: UpdatePricesRequest,
    ) -> Result<ProductVariant> {
        request.validate()?;

        let mut tx = self.repository.pool().begin().await?;
        let current = VariantRepository::lock_by_ids_for_update(&mut tx, &[id.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found(format!("Variant '{}' not found", id)))?;

        if !current.prices_differ(request.buy_price, request.sale_price) {
            tx.rollback().await?;
            return self.get_variant(id).await;
        }

        VariantRepository::update_prices_with_tx(
            &mut tx,
            &current,
            request.buy_price,
            request.sale_price,
            Utc::now(),
        )
        .await?;
        tx.commit().await?;

        info!(
            variant_id = id,
            previous_sale_price = %current.sale_price,
            sale_price = %request.sale_price,
            "Variant prices updated"
        );

        self.get_variant(id).await
    }

    /// Restock or write off units
    pub async fn adjust_stock(&self, id: &str, request: AdjustStockRequest) -> Result<ProductVariant> {
        if request.delta == 0 {
            return Err(AppError::validation("delta must not be zero"));
        }

        let mut tx = self.repository.pool().begin().await?;
        VariantRepository::apply_stock_delta_with_tx(&mut tx, id, request.delta).await?;
        tx.commit().await?;

        info!(variant_id = id, delta = request.delta, "Variant stock adjusted");

        self.get_variant(id).await
    }

    pub async fn count_low_stock(&self) -> Result<i64> {
        self.repository.count_low_stock().await
    }
}
