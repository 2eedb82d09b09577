use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::settings::models::{PaymentMethod, PaymentMethodKind};

/// Repository for the payment_methods table
#[derive(Clone)]
pub struct PaymentMethodRepository {
    pool: MySqlPool,
}

impl PaymentMethodRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<PaymentMethod>> {
        let rows = sqlx::query_as::<_, PaymentMethodRow>(
            r#"
            SELECT method_key, name, is_active, max_installments, updated_at
            FROM payment_methods
            ORDER BY FIELD(method_key, 'cash', 'card', 'pix', 'credit')
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch payment methods: {}", e)))?;

        rows.into_iter().map(|row| row.try_into()).collect()
    }

    pub async fn find_by_key(&self, key: PaymentMethodKind) -> Result<Option<PaymentMethod>> {
        let row = sqlx::query_as::<_, PaymentMethodRow>(
            r#"
            SELECT method_key, name, is_active, max_installments, updated_at
            FROM payment_methods
            WHERE method_key = ?
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch payment method: {}", e)))?;

        row.map(PaymentMethod::try_from).transpose()
    }

    pub async fn update(&self, method: &PaymentMethod) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE payment_methods
            SET name = ?, is_active = ?, max_installments = ?, updated_at = ?
            WHERE method_key = ?
            "#,
        )
        .bind(&method.name)
        .bind(method.is_active)
        .bind(method.max_installments)
        .bind(method.updated_at)
        .bind(method.key.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to update payment method: {}", e)))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found(format!(
                "Payment method '{}' not found",
                method.key
            )));
        }

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct PaymentMethodRow {
    method_key: String,
    name: String,
    is_active: bool,
    max_installments: i32,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentMethodRow> for PaymentMethod {
    type Error = AppError;

    fn try_from(row: PaymentMethodRow) -> Result<Self> {
        let key = row
            .method_key
            .parse::<PaymentMethodKind>()
            .map_err(AppError::Internal)?;

        Ok(PaymentMethod {
            key,
            name: row.name,
            is_active: row.is_active,
            max_installments: row.max_installments,
            updated_at: row.updated_at,
        })
    }
}
