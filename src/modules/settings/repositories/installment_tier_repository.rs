// MySQL persistence for installment tiers. A tier row owns its options in
// installment_rule_options; both are always written in one transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, QueryBuilder, Transaction};
use std::collections::HashMap;

use crate::core::{AppError, Result};
use crate::modules::settings::models::{InstallmentOption, InstallmentTier};

#[derive(Clone)]
pub struct InstallmentTierRepository {
    pool: MySqlPool,
}

impl InstallmentTierRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// All tiers ascending by `min_purchase_value`, which tier lookup relies on
    pub async fn find_all(&self) -> Result<Vec<InstallmentTier>> {
        let rows = sqlx::query_as::<_, TierRow>(
            r#"
            SELECT id, name, min_purchase_value, created_at, updated_at
            FROM installment_rules
            ORDER BY min_purchase_value ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch installment tiers: {}", e)))?;

        let options = sqlx::query_as::<_, OptionRow>(
            r#"
            SELECT rule_id, installments, interest_rate_percentage
            FROM installment_rule_options
            ORDER BY rule_id, installments ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch installment options: {}", e)))?;

        let mut grouped: HashMap<String, Vec<InstallmentOption>> = HashMap::new();
        for option in options {
            grouped
                .entry(option.rule_id)
                .or_default()
                .push(InstallmentOption {
                    installments: option.installments,
                    interest_rate_percentage: option.interest_rate_percentage,
                });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let rules = grouped.remove(&row.id).unwrap_or_default();
                row.into_tier(rules)
            })
            .collect())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<InstallmentTier>> {
        let row = sqlx::query_as::<_, TierRow>(
            r#"
            SELECT id, name, min_purchase_value, created_at, updated_at
            FROM installment_rules
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch installment tier: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let options = sqlx::query_as::<_, OptionRow>(
            r#"
            SELECT rule_id, installments, interest_rate_percentage
            FROM installment_rule_options
            WHERE rule_id = ?
            ORDER BY installments ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch installment options: {}", e)))?;

        let rules = options
            .into_iter()
            .map(|o| InstallmentOption {
                installments: o.installments,
                interest_rate_percentage: o.interest_rate_percentage,
            })
            .collect();

        Ok(Some(row.into_tier(rules)))
    }

    pub async fn exists_with_min_value(
        &self,
        min_purchase_value: Decimal,
        excluding_id: Option<&str>,
    ) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM installment_rules
            WHERE min_purchase_value = ? AND id <> ?
            "#,
        )
        .bind(min_purchase_value)
        .bind(excluding_id.unwrap_or(""))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to check tier threshold: {}", e)))?;

        Ok(count > 0)
    }

    pub async fn create(&self, tier: &InstallmentTier) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO installment_rules (id, name, min_purchase_value, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&tier.id)
        .bind(&tier.name)
        .bind(tier.min_purchase_value)
        .bind(tier.created_at)
        .bind(tier.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::from_unique_violation(
                e,
                format!(
                    "A tier for minimum purchase value {} already exists",
                    tier.min_purchase_value
                ),
            )
        })?;

        Self::insert_options_with_tx(&mut tx, &tier.id, &tier.rules).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Replace name, threshold and the full option set
    pub async fn update(&self, tier: &InstallmentTier) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let rows_affected = sqlx::query(
            r#"
            UPDATE installment_rules
            SET name = ?, min_purchase_value = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&tier.name)
        .bind(tier.min_purchase_value)
        .bind(tier.updated_at)
        .bind(&tier.id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::from_unique_violation(
                e,
                format!(
                    "A tier for minimum purchase value {} already exists",
                    tier.min_purchase_value
                ),
            )
        })?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found(format!(
                "Installment tier '{}' not found",
                tier.id
            )));
        }

        sqlx::query("DELETE FROM installment_rule_options WHERE rule_id = ?")
            .bind(&tier.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to clear tier options: {}", e)))?;

        Self::insert_options_with_tx(&mut tx, &tier.id, &tier.rules).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Returns false when no tier had this id
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let rows_affected = sqlx::query("DELETE FROM installment_rules WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to delete installment tier: {}", e)))?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    async fn insert_options_with_tx(
        tx: &mut Transaction<'_, MySql>,
        rule_id: &str,
        options: &[InstallmentOption],
    ) -> Result<()> {
        if options.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<MySql> = QueryBuilder::new(
            "INSERT INTO installment_rule_options (rule_id, installments, interest_rate_percentage) ",
        );
        builder.push_values(options, |mut row, option| {
            row.push_bind(rule_id)
                .push_bind(option.installments)
                .push_bind(option.interest_rate_percentage);
        });

        builder
            .build()
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to insert tier options: {}", e)))?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct TierRow {
    id: String,
    name: String,
    min_purchase_value: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TierRow {
    fn into_tier(self, rules: Vec<InstallmentOption>) -> InstallmentTier {
        InstallmentTier {
            id: self.id,
            name: self.name,
            min_purchase_value: self.min_purchase_value,
            rules,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OptionRow {
    rule_id: String,
    installments: i32,
    interest_rate_percentage: Decimal,
}
