use chrono::{NaiveDate, Utc};
use sqlx::MySqlPool;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::receivables::{
    models::{AccountReceivable, ReceivableFilter, ReceivableStatus},
    repositories::{ReceivableQuery, ReceivableRepository},
};

/// Service for accounts receivable maintenance
pub struct ReceivableService {
    repository: ReceivableRepository,
}

impl ReceivableService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            repository: ReceivableRepository::new(pool),
        }
    }

    /// Parse user-supplied filters; rejects unknown statuses before any query
    pub fn parse_filter(filter: ReceivableFilter) -> Result<ReceivableQuery> {
        let status = filter
            .status
            .as_deref()
            .map(ReceivableStatus::parse)
            .transpose()?;

        Ok(ReceivableQuery {
            status,
            customer_id: filter.customer_id,
            sale_id: filter.sale_id,
        })
    }

    pub async fn list(&self, filter: ReceivableFilter) -> Result<Vec<AccountReceivable>> {
        let query = Self::parse_filter(filter)?;
        self.repository.list(&query).await
    }

    pub async fn update_status(&self, id: &str, status: &str) -> Result<AccountReceivable> {
        let status = ReceivableStatus::parse(status)?;

        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Receivable '{}' not found", id)))?;

        let paid_at = match status {
            ReceivableStatus::Paid => existing.paid_at.or_else(|| Some(Utc::now())),
            _ => None,
        };
        self.repository.update_status(id, status, paid_at).await?;

        info!(
            receivable_id = id,
            sale_id = existing.sale_id.as_str(),
            from = existing.status.as_str(),
            to = status.as_str(),
            "Receivable status updated"
        );

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Receivable '{}' not found", id)))
    }

    pub async fn mark_overdue(&self, today: NaiveDate) -> Result<u64> {
        let updated = self.repository.mark_overdue(today).await?;
        if updated > 0 {
            info!(overdue_count = updated, today = %today, "Marked receivables as overdue");
        }
        Ok(updated)
    }
}
