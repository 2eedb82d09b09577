use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, QueryBuilder, Transaction};

use crate::core::{AppError, Result};
use crate::modules::receivables::models::{AccountReceivable, ReceivableStatus};

const RECEIVABLE_COLUMNS: &str = "id, sale_id, customer_id, payment_leg, installment_number, \
     total_installments, amount, due_date, status, paid_at, created_at, updated_at";

/// Repository for accounts_receivable
#[derive(Clone)]
pub struct ReceivableRepository {
    pool: MySqlPool,
}

/// Filters already parsed by the service
#[derive(Debug, Clone, Default)]
pub struct ReceivableQuery {
    pub status: Option<ReceivableStatus>,
    pub customer_id: Option<String>,
    pub sale_id: Option<String>,
}

impl ReceivableRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Insert a whole schedule inside the sale's transaction
    pub async fn insert_batch_with_tx(
        tx: &mut Transaction<'_, MySql>,
        receivables: &[AccountReceivable],
    ) -> Result<()> {
        if receivables.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<MySql> = QueryBuilder::new(format!(
            "INSERT INTO accounts_receivable ({}) ",
            RECEIVABLE_COLUMNS
        ));
        builder.push_values(receivables, |mut row, r| {
            row.push_bind(&r.id)
                .push_bind(&r.sale_id)
                .push_bind(&r.customer_id)
                .push_bind(r.payment_leg)
                .push_bind(r.installment_number)
                .push_bind(r.total_installments)
                .push_bind(r.amount)
                .push_bind(r.due_date)
                .push_bind(r.status.as_str())
                .push_bind(r.paid_at)
                .push_bind(r.created_at)
                .push_bind(r.updated_at);
        });

        builder
            .build()
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to insert receivables: {}", e)))?;

        Ok(())
    }

    pub async fn delete_by_sale_with_tx(
        tx: &mut Transaction<'_, MySql>,
        sale_id: &str,
    ) -> Result<u64> {
        let result = sqlx::query("DELETE FROM accounts_receivable WHERE sale_id = ?")
            .bind(sale_id)
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to delete receivables: {}", e)))?;

        Ok(result.rows_affected())
    }

    pub async fn list(&self, query: &ReceivableQuery) -> Result<Vec<AccountReceivable>> {
        let mut builder: QueryBuilder<MySql> = QueryBuilder::new(format!(
            "SELECT {} FROM accounts_receivable WHERE 1 = 1",
            RECEIVABLE_COLUMNS
        ));
        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(customer_id) = &query.customer_id {
            builder.push(" AND customer_id = ").push_bind(customer_id);
        }
        if let Some(sale_id) = &query.sale_id {
            builder.push(" AND sale_id = ").push_bind(sale_id);
        }
        builder.push(" ORDER BY due_date ASC, installment_number ASC");

        let rows = builder
            .build_query_as::<ReceivableRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to list receivables: {}", e)))?;

        rows.into_iter().map(|row| row.try_into()).collect()
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<AccountReceivable>> {
        let row = sqlx::query_as::<_, ReceivableRow>(&format!(
            "SELECT {} FROM accounts_receivable WHERE id = ?",
            RECEIVABLE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch receivable: {}", e)))?;

        row.map(AccountReceivable::try_from).transpose()
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: ReceivableStatus,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE accounts_receivable
            SET status = ?, paid_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(status.as_str())
        .bind(paid_at)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to update receivable: {}", e)))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found(format!("Receivable '{}' not found", id)));
        }

        Ok(())
    }

    /// Flag every pending installment due before `today` as overdue
    pub async fn mark_overdue(&self, today: NaiveDate) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE accounts_receivable
            SET status = 'OVERDUE', updated_at = ?
            WHERE status = 'PENDING' AND due_date < ?
            "#,
        )
        .bind(Utc::now())
        .bind(today)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to mark overdue receivables: {}", e)))?;

        Ok(result.rows_affected())
    }

    /// Amount still to collect (pending or overdue)
    pub async fn open_amount(&self) -> Result<Decimal> {
        sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM accounts_receivable
            WHERE status IN ('PENDING', 'OVERDUE')
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to sum open receivables: {}", e)))
    }

    pub async fn count_overdue(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM accounts_receivable WHERE status = 'OVERDUE'",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to count overdue receivables: {}", e)))
    }
}

#[derive(sqlx::FromRow)]
struct ReceivableRow {
    id: String,
    sale_id: String,
    customer_id: String,
    payment_leg: i32,
    installment_number: i32,
    total_installments: i32,
    amount: Decimal,
    due_date: NaiveDate,
    status: String,
    paid_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ReceivableRow> for AccountReceivable {
    type Error = AppError;

    fn try_from(row: ReceivableRow) -> Result<Self> {
        let status = row
            .status
            .parse::<ReceivableStatus>()
            .map_err(AppError::Internal)?;

        Ok(AccountReceivable {
            id: row.id,
            sale_id: row.sale_id,
            customer_id: row.customer_id,
            payment_leg: row.payment_leg,
            installment_number: row.installment_number,
            total_installments: row.total_installments,
            amount: row.amount,
            due_date: row.due_date,
            status,
            paid_at: row.paid_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
