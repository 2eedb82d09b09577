// Sale persistence. The sale row and its children are always written inside
// the caller's transaction; reads assemble the aggregate with one query per
// child table.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, QueryBuilder, Transaction};
use std::collections::HashMap;

use crate::core::{AppError, Result};
use crate::modules::sales::models::{
    ItemFulfillmentStatus, PaymentStatus, Sale, SaleFulfillmentStatus, SaleItem, SalePayment,
};
use crate::modules::settings::models::PaymentMethodKind;

const SALE_COLUMNS: &str = "id, customer_id, subtotal_amount, discount_percentage, \
     discount_amount, interest_amount, total_amount, payment_status, fulfillment_status, \
     due_date, canceled_at, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, sale_id, line_number, variant_id, sku, quantity, \
     unit_price, subtotal, fulfillment_status";

const PAYMENT_COLUMNS: &str = "id, sale_id, leg_number, method, amount, interest_amount, \
     installments, interest_rate_percentage";

/// Aggregates over the sales table for the dashboard
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleTotals {
    pub sales_count: i64,
    pub canceled_count: i64,
    pub awaiting_stock_count: i64,
    /// Total charged over non-canceled sales
    pub gross_revenue: Decimal,
    pub total_discount: Decimal,
    pub total_interest: Decimal,
}

/// Repository for sales, sale_items and sale_payments
#[derive(Clone)]
pub struct SaleRepository {
    pool: MySqlPool,
}

impl SaleRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Insert the sale row with all its items and payment legs
    pub async fn insert_with_tx(tx: &mut Transaction<'_, MySql>, sale: &Sale) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO sales ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            SALE_COLUMNS
        ))
        .bind(&sale.id)
        .bind(&sale.customer_id)
        .bind(sale.subtotal_amount)
        .bind(sale.discount_percentage)
        .bind(sale.discount_amount)
        .bind(sale.interest_amount)
        .bind(sale.total_amount)
        .bind(sale.payment_status.as_str())
        .bind(sale.fulfillment_status.as_str())
        .bind(sale.due_date)
        .bind(sale.canceled_at)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to insert sale: {}", e)))?;

        if !sale.items.is_empty() {
            let mut builder: QueryBuilder<MySql> =
                QueryBuilder::new(format!("INSERT INTO sale_items ({}) ", ITEM_COLUMNS));
            builder.push_values(&sale.items, |mut row, item| {
                row.push_bind(&item.id)
                    .push_bind(&item.sale_id)
                    .push_bind(item.line_number)
                    .push_bind(&item.variant_id)
                    .push_bind(&item.sku)
                    .push_bind(item.quantity)
                    .push_bind(item.unit_price)
                    .push_bind(item.subtotal)
                    .push_bind(item.fulfillment_status.as_str());
            });
            builder
                .build()
                .execute(&mut **tx)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to insert sale items: {}", e)))?;
        }

        if !sale.payments.is_empty() {
            let mut builder: QueryBuilder<MySql> =
                QueryBuilder::new(format!("INSERT INTO sale_payments ({}) ", PAYMENT_COLUMNS));
            builder.push_values(&sale.payments, |mut row, payment| {
                row.push_bind(&payment.id)
                    .push_bind(&payment.sale_id)
                    .push_bind(payment.leg_number)
                    .push_bind(payment.method.as_str())
                    .push_bind(payment.amount)
                    .push_bind(payment.interest_amount)
                    .push_bind(payment.installments)
                    .push_bind(payment.interest_rate_percentage);
            });
            builder.build().execute(&mut **tx).await.map_err(|e| {
                AppError::Internal(format!("Failed to insert sale payments: {}", e))
            })?;
        }

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>(&format!(
            "SELECT {} FROM sales WHERE id = ?",
            SALE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch sale: {}", e)))?;

        match row {
            Some(row) => {
                let mut sales = self.attach_children(vec![row]).await?;
                Ok(sales.pop())
            }
            None => Ok(None),
        }
    }

    /// Lock the sale row and load its items for cancellation
    pub async fn find_by_id_for_update(
        tx: &mut Transaction<'_, MySql>,
        id: &str,
    ) -> Result<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>(&format!(
            "SELECT {} FROM sales WHERE id = ? FOR UPDATE",
            SALE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to lock sale: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, SaleItemRow>(&format!(
            "SELECT {} FROM sale_items WHERE sale_id = ? ORDER BY line_number",
            ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_all(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch sale items: {}", e)))?;

        let payments = sqlx::query_as::<_, SalePaymentRow>(&format!(
            "SELECT {} FROM sale_payments WHERE sale_id = ? ORDER BY leg_number",
            PAYMENT_COLUMNS
        ))
        .bind(id)
        .fetch_all(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch sale payments: {}", e)))?;

        let mut sale = Sale::try_from(row)?;
        sale.items = items
            .into_iter()
            .map(SaleItem::try_from)
            .collect::<Result<_>>()?;
        sale.payments = payments
            .into_iter()
            .map(SalePayment::try_from)
            .collect::<Result<_>>()?;

        Ok(Some(sale))
    }

    /// Newest first
    pub async fn list(
        &self,
        fulfillment_status: Option<SaleFulfillmentStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Sale>> {
        let mut builder: QueryBuilder<MySql> =
            QueryBuilder::new(format!("SELECT {} FROM sales", SALE_COLUMNS));
        if let Some(status) = fulfillment_status {
            builder.push(" WHERE fulfillment_status = ");
            builder.push_bind(status.as_str());
        }
        builder.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows = builder
            .build_query_as::<SaleRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to list sales: {}", e)))?;

        self.attach_children(rows).await
    }

    pub async fn mark_canceled_with_tx(
        tx: &mut Transaction<'_, MySql>,
        sale: &Sale,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE sales
            SET fulfillment_status = ?, payment_status = ?, canceled_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(sale.fulfillment_status.as_str())
        .bind(sale.payment_status.as_str())
        .bind(sale.canceled_at)
        .bind(sale.updated_at)
        .bind(&sale.id)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to cancel sale: {}", e)))?;

        Ok(())
    }

    /// Totals over sales created in `[start, end]` (whole days, both optional)
    pub async fn totals(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<SaleTotals> {
        let mut builder: QueryBuilder<MySql> = QueryBuilder::new(
            r#"
            SELECT
                COUNT(*) AS sales_count,
                CAST(COALESCE(SUM(fulfillment_status = 'canceled'), 0) AS SIGNED) AS canceled_count,
                CAST(COALESCE(SUM(fulfillment_status = 'awaiting_stock'), 0) AS SIGNED) AS awaiting_stock_count,
                COALESCE(SUM(CASE WHEN fulfillment_status <> 'canceled' THEN total_amount END), 0) AS gross_revenue,
                COALESCE(SUM(CASE WHEN fulfillment_status <> 'canceled' THEN discount_amount END), 0) AS total_discount,
                COALESCE(SUM(CASE WHEN fulfillment_status <> 'canceled' THEN interest_amount END), 0) AS total_interest
            FROM sales
            WHERE 1 = 1
            "#,
        );
        if let Some(start) = start {
            builder.push(" AND created_at >= ");
            builder.push_bind(start.and_time(NaiveTime::MIN).and_utc());
        }
        if let Some(end) = end {
            builder.push(" AND created_at < ");
            builder.push_bind((end.and_time(NaiveTime::MIN) + Duration::days(1)).and_utc());
        }

        let row = builder
            .build_query_as::<SaleTotalsRow>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to compute sale totals: {}", e)))?;

        Ok(SaleTotals {
            sales_count: row.sales_count,
            canceled_count: row.canceled_count,
            awaiting_stock_count: row.awaiting_stock_count,
            gross_revenue: row.gross_revenue,
            total_discount: row.total_discount,
            total_interest: row.total_interest,
        })
    }

    async fn attach_children(&self, rows: Vec<SaleRow>) -> Result<Vec<Sale>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();

        let mut builder: QueryBuilder<MySql> = QueryBuilder::new(format!(
            "SELECT {} FROM sale_items WHERE sale_id IN (",
            ITEM_COLUMNS
        ));
        let mut separated = builder.separated(", ");
        for id in &ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(") ORDER BY sale_id, line_number");
        let item_rows = builder
            .build_query_as::<SaleItemRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to fetch sale items: {}", e)))?;

        let mut builder: QueryBuilder<MySql> = QueryBuilder::new(format!(
            "SELECT {} FROM sale_payments WHERE sale_id IN (",
            PAYMENT_COLUMNS
        ));
        let mut separated = builder.separated(", ");
        for id in &ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(") ORDER BY sale_id, leg_number");
        let payment_rows = builder
            .build_query_as::<SalePaymentRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to fetch sale payments: {}", e)))?;

        let mut items: HashMap<String, Vec<SaleItem>> = HashMap::new();
        for row in item_rows {
            let item = SaleItem::try_from(row)?;
            items.entry(item.sale_id.clone()).or_default().push(item);
        }
        let mut payments: HashMap<String, Vec<SalePayment>> = HashMap::new();
        for row in payment_rows {
            let payment = SalePayment::try_from(row)?;
            payments.entry(payment.sale_id.clone()).or_default().push(payment);
        }

        rows.into_iter()
            .map(|row| {
                let mut sale = Sale::try_from(row)?;
                sale.items = items.remove(&sale.id).unwrap_or_default();
                sale.payments = payments.remove(&sale.id).unwrap_or_default();
                Ok(sale)
            })
            .collect()
    }
}

#[derive(sqlx::FromRow)]
struct SaleRow {
    id: String,
    customer_id: Option<String>,
    subtotal_amount: Decimal,
    discount_percentage: Decimal,
    discount_amount: Decimal,
    interest_amount: Decimal,
    total_amount: Decimal,
    payment_status: String,
    fulfillment_status: String,
    due_date: Option<NaiveDate>,
    canceled_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SaleRow> for Sale {
    type Error = AppError;

    fn try_from(row: SaleRow) -> Result<Self> {
        Ok(Sale {
            id: row.id,
            customer_id: row.customer_id,
            items: Vec::new(),
            subtotal_amount: row.subtotal_amount,
            discount_percentage: row.discount_percentage,
            discount_amount: row.discount_amount,
            interest_amount: row.interest_amount,
            total_amount: row.total_amount,
            payments: Vec::new(),
            payment_status: row
                .payment_status
                .parse::<PaymentStatus>()
                .map_err(AppError::Internal)?,
            fulfillment_status: row
                .fulfillment_status
                .parse::<SaleFulfillmentStatus>()
                .map_err(AppError::Internal)?,
            due_date: row.due_date,
            canceled_at: row.canceled_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SaleItemRow {
    id: String,
    sale_id: String,
    line_number: i32,
    variant_id: String,
    sku: String,
    quantity: i32,
    unit_price: Decimal,
    subtotal: Decimal,
    fulfillment_status: String,
}

impl TryFrom<SaleItemRow> for SaleItem {
    type Error = AppError;

    fn try_from(row: SaleItemRow) -> Result<Self> {
        Ok(SaleItem {
            id: row.id,
            sale_id: row.sale_id,
            line_number: row.line_number,
            variant_id: row.variant_id,
            sku: row.sku,
            quantity: row.quantity,
            unit_price: row.unit_price,
            subtotal: row.subtotal,
            fulfillment_status: row
                .fulfillment_status
                .parse::<ItemFulfillmentStatus>()
                .map_err(AppError::Internal)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SalePaymentRow {
    id: String,
    sale_id: String,
    leg_number: i32,
    method: String,
    amount: Decimal,
    interest_amount: Decimal,
    installments: i32,
    interest_rate_percentage: Decimal,
}

impl TryFrom<SalePaymentRow> for SalePayment {
    type Error = AppError;

    fn try_from(row: SalePaymentRow) -> Result<Self> {
        let method = row
            .method
            .parse::<PaymentMethodKind>()
            .map_err(|_| AppError::Internal(format!("Invalid payment method: {}", row.method)))?;

        Ok(SalePayment {
            id: row.id,
            sale_id: row.sale_id,
            leg_number: row.leg_number,
            method,
            amount: row.amount,
            interest_amount: row.interest_amount,
            installments: row.installments,
            interest_rate_percentage: row.interest_rate_percentage,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SaleTotalsRow {
    sales_count: i64,
    canceled_count: i64,
    awaiting_stock_count: i64,
    gross_revenue: Decimal,
    total_discount: Decimal,
    total_interest: Decimal,
}
