use chrono::Utc;
use sqlx::MySqlPool;
use tracing::{info, warn};

use crate::core::{AppError, Result};
use crate::modules::backlog::{
    models::{BacklogStatus, PurchaseBacklogItem, UpdateBacklogStatusRequest},
    repositories::BacklogRepository,
};

/// Service for the purchase backlog lifecycle
pub struct BacklogService {
    repository: BacklogRepository,
}

impl BacklogService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            repository: BacklogRepository::new(pool),
        }
    }

    /// Parse the list filter; defaults to items still awaiting purchase
    pub fn parse_status_filter(status: Option<&str>) -> Result<BacklogStatus> {
        status
            .map(BacklogStatus::parse)
            .transpose()
            .map(|s| s.unwrap_or_default())
    }

    pub async fn list(&self, status: Option<&str>) -> Result<Vec<PurchaseBacklogItem>> {
        let status = Self::parse_status_filter(status)?;
        self.repository.find_by_status(status).await
    }

    pub async fn list_for_sale(&self, sale_id: &str) -> Result<Vec<PurchaseBacklogItem>> {
        self.repository.find_by_sale(sale_id).await
    }

    pub async fn update_status(
        &self,
        id: &str,
        request: UpdateBacklogStatusRequest,
    ) -> Result<PurchaseBacklogItem> {
        let next = BacklogStatus::parse(&request.status)?;

        let mut tx = self.repository.pool().begin().await?;
        let mut item = BacklogRepository::find_by_id_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Backlog item '{}' not found", id)))?;

        if let Err(e) = item.status.ensure_transition(next) {
            warn!(
                backlog_id = id,
                from = item.status.as_str(),
                to = next.as_str(),
                "Rejected backlog transition"
            );
            return Err(e);
        }

        let previous = item.status;
        item.status = next;
        if let Some(reference) = request.purchase_order_ref {
            item.purchase_order_ref = Some(reference);
        }
        item.updated_at = Utc::now();

        BacklogRepository::update_status_with_tx(&mut tx, &item).await?;
        tx.commit().await?;

        info!(
            backlog_id = id,
            variant_id = item.variant_id.as_str(),
            from = previous.as_str(),
            to = next.as_str(),
            "Backlog status updated"
        );

        Ok(item)
    }
}
