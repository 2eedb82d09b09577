// MySQL persistence for catalog products

use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool, QueryBuilder};

use crate::core::{AppError, Result};
use crate::modules::catalog::models::{Product, ProductFilter};

const PRODUCT_COLUMNS: &str =
    "id, name, description, code, category, is_available, created_at, updated_at";

/// Repository for product database operations
#[derive(Clone)]
pub struct ProductRepository {
    pool: MySqlPool,
}

impl ProductRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Insert a new product. A duplicate code is reported as a conflict.
    pub async fn create(&self, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, code, category, is_available, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.code)
        .bind(&product.category)
        .bind(product.is_available)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_unique_violation(e, duplicate_code(product)))?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE id = ?",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch product: {}", e)))?;

        Ok(row.map(Product::from))
    }

    /// List products by name
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let mut builder: QueryBuilder<MySql> =
            QueryBuilder::new(format!("SELECT {} FROM products WHERE 1 = 1", PRODUCT_COLUMNS));
        if !filter.include_unavailable {
            builder.push(" AND is_available = 1");
        }
        if let Some(category) = &filter.category {
            builder.push(" AND category = ");
            builder.push_bind(category);
        }
        builder.push(" ORDER BY name ASC, id ASC LIMIT ");
        builder.push_bind(filter.limit);
        builder.push(" OFFSET ");
        builder.push_bind(filter.offset);

        let rows = builder
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to list products: {}", e)))?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    pub async fn update(&self, product: &Product) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, description = ?, code = ?, category = ?, is_available = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.code)
        .bind(&product.category)
        .bind(product.is_available)
        .bind(product.updated_at)
        .bind(&product.id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_unique_violation(e, duplicate_code(product)))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found(format!(
                "Product '{}' not found",
                product.id
            )));
        }

        Ok(())
    }
}

fn duplicate_code(product: &Product) -> String {
    format!(
        "Product code '{}' already exists",
        product.code.as_deref().unwrap_or_default()
    )
}

/// Database row representation for products table
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    description: Option<String>,
    code: Option<String>,
    category: Option<String>,
    is_available: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            code: row.code,
            category: row.category,
            is_available: row.is_available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
