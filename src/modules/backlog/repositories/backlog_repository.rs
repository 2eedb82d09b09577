use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool, QueryBuilder, Transaction};

use crate::core::{AppError, Result};
use crate::modules::backlog::models::{BacklogStatus, PurchaseBacklogItem};

const BACKLOG_COLUMNS: &str = "id, variant_id, quantity_needed, source_sale_id, \
     source_sale_item_id, status, purchase_order_ref, created_at, updated_at";

/// Repository for purchase_backlog
#[derive(Clone)]
pub struct BacklogRepository {
    pool: MySqlPool,
}

impl BacklogRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn insert_batch_with_tx(
        tx: &mut Transaction<'_, MySql>,
        items: &[PurchaseBacklogItem],
    ) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<MySql> =
            QueryBuilder::new(format!("INSERT INTO purchase_backlog ({}) ", BACKLOG_COLUMNS));
        builder.push_values(items, |mut row, item| {
            row.push_bind(&item.id)
                .push_bind(&item.variant_id)
                .push_bind(item.quantity_needed)
                .push_bind(&item.source_sale_id)
                .push_bind(&item.source_sale_item_id)
                .push_bind(item.status.as_str())
                .push_bind(&item.purchase_order_ref)
                .push_bind(item.created_at)
                .push_bind(item.updated_at);
        });

        builder
            .build()
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to insert backlog items: {}", e)))?;

        Ok(())
    }

    pub async fn delete_by_sale_with_tx(
        tx: &mut Transaction<'_, MySql>,
        sale_id: &str,
    ) -> Result<u64> {
        let result = sqlx::query("DELETE FROM purchase_backlog WHERE source_sale_id = ?")
            .bind(sale_id)
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to delete backlog items: {}", e)))?;

        Ok(result.rows_affected())
    }

    /// Oldest first, so purchasing works through demand in sale order
    pub async fn find_by_status(&self, status: BacklogStatus) -> Result<Vec<PurchaseBacklogItem>> {
        let rows = sqlx::query_as::<_, BacklogRow>(&format!(
            "SELECT {} FROM purchase_backlog WHERE status = ? ORDER BY created_at ASC, id ASC",
            BACKLOG_COLUMNS
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch backlog: {}", e)))?;

        rows.into_iter().map(|row| row.try_into()).collect()
    }

    pub async fn find_by_sale(&self, sale_id: &str) -> Result<Vec<PurchaseBacklogItem>> {
        let rows = sqlx::query_as::<_, BacklogRow>(&format!(
            "SELECT {} FROM purchase_backlog WHERE source_sale_id = ? ORDER BY created_at ASC, id ASC",
            BACKLOG_COLUMNS
        ))
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch backlog: {}", e)))?;

        rows.into_iter().map(|row| row.try_into()).collect()
    }

    pub async fn find_by_id_for_update(
        tx: &mut Transaction<'_, MySql>,
        id: &str,
    ) -> Result<Option<PurchaseBacklogItem>> {
        let row = sqlx::query_as::<_, BacklogRow>(&format!(
            "SELECT {} FROM purchase_backlog WHERE id = ? FOR UPDATE",
            BACKLOG_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch backlog item: {}", e)))?;

        row.map(PurchaseBacklogItem::try_from).transpose()
    }

    pub async fn update_status_with_tx(
        tx: &mut Transaction<'_, MySql>,
        item: &PurchaseBacklogItem,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE purchase_backlog
            SET status = ?, purchase_order_ref = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(item.status.as_str())
        .bind(&item.purchase_order_ref)
        .bind(item.updated_at)
        .bind(&item.id)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to update backlog item: {}", e)))?;

        Ok(())
    }

    /// Rows still needing a purchase or a delivery
    pub async fn count_open(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM purchase_backlog
            WHERE status IN ('awaiting_purchase', 'purchase_order_sent')
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to count backlog: {}", e)))
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct BacklogRow {
    id: String,
    variant_id: String,
    quantity_needed: i32,
    source_sale_id: String,
    source_sale_item_id: String,
    status: String,
    purchase_order_ref: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BacklogRow> for PurchaseBacklogItem {
    type Error = AppError;

    fn try_from(row: BacklogRow) -> Result<Self> {
        let status = row
            .status
            .parse::<BacklogStatus>()
            .map_err(AppError::Internal)?;

        Ok(PurchaseBacklogItem {
            id: row.id,
            variant_id: row.variant_id,
            quantity_needed: row.quantity_needed,
            source_sale_id: row.source_sale_id,
            source_sale_item_id: row.source_sale_item_id,
            status,
            purchase_order_ref: row.purchase_order_ref,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
