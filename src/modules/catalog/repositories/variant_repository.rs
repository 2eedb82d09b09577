// MySQL persistence for product variants and their price history.
// Stock-changing queries take the caller's transaction so a sale and its
// stock movement commit together.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, QueryBuilder, Transaction};
use std::collections::HashMap;

use crate::core::{AppError, Result};
use crate::modules::catalog::models::{PriceHistoryEntry, ProductVariant};

const VARIANT_COLUMNS: &str = "id, product_id, size, color, sku, buy_price, sale_price, \
     quantity, minimum_stock, created_at, updated_at";

/// Repository for product variant database operations
#[derive(Clone)]
pub struct VariantRepository {
    pool: MySqlPool,
}

impl VariantRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Insert a new variant. A duplicate SKU is reported as a conflict.
    pub async fn create(&self, variant: &ProductVariant) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO product_variants (
                id, product_id, size, color, sku, buy_price, sale_price,
                quantity, minimum_stock, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&variant.id)
        .bind(&variant.product_id)
        .bind(&variant.size)
        .bind(&variant.color)
        .bind(&variant.sku)
        .bind(variant.buy_price)
        .bind(variant.sale_price)
        .bind(variant.quantity)
        .bind(variant.minimum_stock)
        .bind(variant.created_at)
        .bind(variant.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_unique_violation(e, format!("SKU '{}' already exists", variant.sku))
        })?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<ProductVariant>> {
        let row = sqlx::query_as::<_, VariantRow>(&format!(
            "SELECT {} FROM product_variants WHERE id = ?",
            VARIANT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch variant: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut history = self.load_history(&[row.id.clone()]).await?;
        let mut variant = ProductVariant::from(row);
        variant.price_history = history.remove(&variant.id).unwrap_or_default();
        Ok(Some(variant))
    }

    /// List variants ordered by SKU, optionally only those at or below minimum stock
    pub async fn list(
        &self,
        low_stock_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductVariant>> {
        let mut builder: QueryBuilder<MySql> =
            QueryBuilder::new(format!("SELECT {} FROM product_variants", VARIANT_COLUMNS));
        if low_stock_only {
            builder.push(" WHERE quantity <= minimum_stock");
        }
        builder.push(" ORDER BY sku ASC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows = builder
            .build_query_as::<VariantRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to list variants: {}", e)))?;

        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let mut history = self.load_history(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let mut variant = ProductVariant::from(row);
                variant.price_history = history.remove(&variant.id).unwrap_or_default();
                variant
            })
            .collect())
    }

    /// Variants of the given products, with price history, ordered by SKU
    pub async fn list_by_product_ids(&self, product_ids: &[String]) -> Result<Vec<ProductVariant>> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<MySql> = QueryBuilder::new(format!(
            "SELECT {} FROM product_variants WHERE product_id IN (",
            VARIANT_COLUMNS
        ));
        let mut separated = builder.separated(", ");
        for id in product_ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(") ORDER BY sku ASC");

        let rows = builder
            .build_query_as::<VariantRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to list product variants: {}", e)))?;

        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let mut history = self.load_history(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let mut variant = ProductVariant::from(row);
                variant.price_history = history.remove(&variant.id).unwrap_or_default();
                variant
            })
            .collect())
    }

    pub async fn count_low_stock(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM product_variants WHERE quantity <= minimum_stock",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to count low stock variants: {}", e)))
    }

    /// Lock the given variants for the rest of the transaction.
    ///
    /// Rows are locked in id order so concurrent checkouts touching the same
    /// variants cannot deadlock. Unknown ids are simply absent from the result.
    pub async fn lock_by_ids_for_update(
        tx: &mut Transaction<'_, MySql>,
        ids: &[String],
    ) -> Result<Vec<ProductVariant>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<MySql> = QueryBuilder::new(format!(
            "SELECT {} FROM product_variants WHERE id IN (",
            VARIANT_COLUMNS
        ));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(") ORDER BY id FOR UPDATE");

        let rows = builder
            .build_query_as::<VariantRow>()
            .fetch_all(&mut **tx)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to lock variants: {}", e)))?;

        Ok(rows.into_iter().map(ProductVariant::from).collect())
    }

    /// Apply a signed stock movement inside the caller's transaction
    pub async fn apply_stock_delta_with_tx(
        tx: &mut Transaction<'_, MySql>,
        variant_id: &str,
        delta: i32,
    ) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE product_variants
            SET quantity = quantity + ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(delta)
        .bind(Utc::now())
        .bind(variant_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to update stock: {}", e)))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found(format!(
                "Variant '{}' not found",
                variant_id
            )));
        }

        Ok(())
    }

    /// Record the previous prices and set the new ones
    pub async fn update_prices_with_tx(
        tx: &mut Transaction<'_, MySql>,
        previous: &ProductVariant,
        buy_price: Decimal,
        sale_price: Decimal,
        changed_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO variant_price_history (variant_id, buy_price, sale_price, changed_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&previous.id)
        .bind(previous.buy_price)
        .bind(previous.sale_price)
        .bind(changed_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to record price history: {}", e)))?;

        sqlx::query(
            r#"
            UPDATE product_variants
            SET buy_price = ?, sale_price = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(buy_price)
        .bind(sale_price)
        .bind(changed_at)
        .bind(&previous.id)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to update prices: {}", e)))?;

        Ok(())
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    async fn load_history(&self, ids: &[String]) -> Result<HashMap<String, Vec<PriceHistoryEntry>>> {
        let mut grouped: HashMap<String, Vec<PriceHistoryEntry>> = HashMap::new();
        if ids.is_empty() {
            return Ok(grouped);
        }

        let mut builder: QueryBuilder<MySql> = QueryBuilder::new(
            "SELECT variant_id, buy_price, sale_price, changed_at \
             FROM variant_price_history WHERE variant_id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(") ORDER BY changed_at ASC, id ASC");

        let rows = builder
            .build_query_as::<PriceHistoryRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to fetch price history: {}", e)))?;

        for row in rows {
            grouped
                .entry(row.variant_id)
                .or_default()
                .push(PriceHistoryEntry {
                    buy_price: row.buy_price,
                    sale_price: row.sale_price,
                    changed_at: row.changed_at,
                });
        }

        Ok(grouped)
    }
}

/// Database row representation for product_variants table
#[derive(sqlx::FromRow)]
struct VariantRow {
    id: String,
    product_id: String,
    size: Option<String>,
    color: Option<String>,
    sku: String,
    buy_price: Decimal,
    sale_price: Decimal,
    quantity: i32,
    minimum_stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VariantRow> for ProductVariant {
    fn from(row: VariantRow) -> Self {
        ProductVariant {
            id: row.id,
            product_id: row.product_id,
            size: row.size,
            color: row.color,
            sku: row.sku,
            buy_price: row.buy_price,
            sale_price: row.sale_price,
            quantity: row.quantity,
            minimum_stock: row.minimum_stock,
            price_history: Vec::new(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PriceHistoryRow {
    variant_id: String,
    buy_price: Decimal,
    sale_price: Decimal,
    changed_at: DateTime<Utc>,
}
