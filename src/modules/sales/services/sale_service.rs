use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::MySqlPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::{round_money, AppError, BusinessRuleViolation, Result};
use crate::modules::backlog::{BacklogRepository, BacklogStatus, PurchaseBacklogItem};
use crate::modules::catalog::VariantRepository;
use crate::modules::receivables::{ReceivableCalculator, ReceivableRepository};
use crate::modules::sales::{
    models::{
        CreateSaleRequest, ItemFulfillmentStatus, PaymentStatus, Sale, SaleFulfillmentStatus,
        SaleItem, SalePayment, SalesSummary,
    },
    repositories::SaleRepository,
    services::{FulfillmentPlan, FulfillmentPlanner, Settlement, SettlementEngine, VariantStock},
};
use crate::modules::settings::{PaymentMethodKind, SettingsService};

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 200;

/// Parsed listing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleListParams {
    pub fulfillment_status: Option<SaleFulfillmentStatus>,
    pub limit: i64,
    pub offset: i64,
}

impl SaleListParams {
    /// Unknown status or negative offset is a 400; limit is clamped to 1..=200
    pub fn parse(
        fulfillment_status: Option<&str>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Self> {
        let fulfillment_status = fulfillment_status
            .map(|s| s.parse::<SaleFulfillmentStatus>().map_err(AppError::validation))
            .transpose()?;

        let offset = offset.unwrap_or(0);
        if offset < 0 {
            return Err(AppError::validation("offset cannot be negative"));
        }

        Ok(Self {
            fulfillment_status,
            limit: limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT),
            offset,
        })
    }
}

/// Orchestrates checkout and cancellation across catalog, settings,
/// receivables and purchase backlog
pub struct SaleService {
    sales: SaleRepository,
    settings: SettingsService,
    variants: VariantRepository,
    receivables: ReceivableRepository,
    backlog: BacklogRepository,
}

impl SaleService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            sales: SaleRepository::new(pool.clone()),
            settings: SettingsService::new(pool.clone()),
            variants: VariantRepository::new(pool.clone()),
            receivables: ReceivableRepository::new(pool.clone()),
            backlog: BacklogRepository::new(pool),
        }
    }

    /// Create a sale in a single transaction.
    ///
    /// Variants are locked before stock is read, so two checkouts of the same
    /// variant are serialized and the second one sees the first one's
    /// decrement. Any failure rolls everything back.
    pub async fn create_sale(&self, request: CreateSaleRequest) -> Result<Sale> {
        request.validate()?;
        let intents = request.payment_intents()?;
        let settings = self.settings.settlement_settings().await?;

        let variant_ids: Vec<String> = request
            .items
            .iter()
            .map(|i| i.variant_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut tx = self.sales.pool().begin().await?;

        let locked = VariantRepository::lock_by_ids_for_update(&mut tx, &variant_ids).await?;
        let stock: Vec<VariantStock> = locked.iter().map(VariantStock::from).collect();

        let plan = FulfillmentPlanner::plan(&request.items, &stock)?;
        let settlement = SettlementEngine::settle(
            plan.subtotal,
            request.discount_percentage,
            &intents,
            &settings,
        )?;

        let sale = build_sale(&request, &plan, &settlement)?;
        SaleRepository::insert_with_tx(&mut tx, &sale).await?;

        let mut receivable_count = 0;
        if sale.credit_payments().next().is_some() {
            let customer_id = sale.customer_id.as_deref().ok_or_else(|| {
                AppError::business_rule(
                    BusinessRuleViolation::CustomerRequiredForCredit,
                    "Credit sales require a customer_id",
                )
            })?;
            let first_due = match sale.due_date {
                Some(date) => date,
                None => ReceivableCalculator::first_due_date(
                    sale.created_at.date_naive(),
                    request.due_date,
                )?,
            };

            for payment in sale.credit_payments() {
                let schedule = ReceivableCalculator::schedule(
                    &sale.id,
                    customer_id,
                    payment.leg_number,
                    payment.amount,
                    payment.installments,
                    first_due,
                    sale.created_at,
                )?;
                receivable_count += schedule.len();
                ReceivableRepository::insert_batch_with_tx(&mut tx, &schedule).await?;
            }
        }

        let backlog_items = backlog_for(&sale, &plan);
        BacklogRepository::insert_batch_with_tx(&mut tx, &backlog_items).await?;

        for (variant_id, quantity) in &plan.stock_decrements {
            VariantRepository::apply_stock_delta_with_tx(&mut tx, variant_id, -quantity).await?;
        }

        tx.commit().await?;

        info!(
            sale_id = sale.id.as_str(),
            items = sale.items.len(),
            total_amount = %sale.total_amount,
            interest_amount = %sale.interest_amount,
            fulfillment_status = sale.fulfillment_status.as_str(),
            receivables = receivable_count,
            backlog_items = backlog_items.len(),
            "Sale created"
        );

        Ok(sale)
    }

    pub async fn get_sale(&self, id: &str) -> Result<Sale> {
        self.sales
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Sale '{}' not found", id)))
    }

    pub async fn list_sales(&self, params: SaleListParams) -> Result<Vec<Sale>> {
        self.sales
            .list(params.fulfillment_status, params.limit, params.offset)
            .await
    }

    /// Cancel a sale and undo its side effects in one transaction.
    ///
    /// Canceling an already canceled sale returns it unchanged. Stock comes
    /// back only for lines that were fulfilled from stock.
    pub async fn cancel_sale(&self, id: &str) -> Result<Sale> {
        let mut tx = self.sales.pool().begin().await?;

        let mut sale = SaleRepository::find_by_id_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Sale '{}' not found", id)))?;

        if sale.is_canceled() {
            tx.rollback().await?;
            return Ok(sale);
        }
        if sale.fulfillment_status.is_shipped() {
            warn!(
                sale_id = id,
                fulfillment_status = sale.fulfillment_status.as_str(),
                "Rejected cancellation of shipped sale"
            );
            return Err(AppError::business_rule(
                BusinessRuleViolation::SaleNotCancelable,
                format!(
                    "Sale '{}' is {} and can no longer be canceled",
                    id, sale.fulfillment_status
                ),
            ));
        }

        let receivables = ReceivableRepository::delete_by_sale_with_tx(&mut tx, id).await?;
        let backlog = BacklogRepository::delete_by_sale_with_tx(&mut tx, id).await?;

        let restock = restock_for(&sale);
        for (variant_id, quantity) in &restock {
            VariantRepository::apply_stock_delta_with_tx(&mut tx, variant_id, *quantity).await?;
        }

        let now = Utc::now();
        sale.fulfillment_status = SaleFulfillmentStatus::Canceled;
        sale.payment_status = PaymentStatus::Refunded;
        sale.canceled_at = Some(now);
        sale.updated_at = now;
        SaleRepository::mark_canceled_with_tx(&mut tx, &sale).await?;

        tx.commit().await?;

        info!(
            sale_id = id,
            receivables_removed = receivables,
            backlog_removed = backlog,
            variants_restocked = restock.len(),
            "Sale canceled"
        );

        Ok(sale)
    }

    /// Dashboard KPIs; the date range filters sales only
    pub async fn summary(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<SalesSummary> {
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(AppError::validation(
                    "start_date must not be after end_date",
                ));
            }
        }

        let totals = self.sales.totals(start_date, end_date).await?;
        let open_receivables_amount = self.receivables.open_amount().await?;
        let overdue_receivables_count = self.receivables.count_overdue().await?;
        let open_backlog_count = self.backlog.count_open().await?;
        let low_stock_variants = self.variants.count_low_stock().await?;

        let effective_sales = totals.sales_count - totals.canceled_count;
        let average_ticket = if effective_sales > 0 {
            round_money(totals.gross_revenue / Decimal::from(effective_sales))
        } else {
            Decimal::ZERO
        };

        Ok(SalesSummary {
            sales_count: totals.sales_count,
            canceled_count: totals.canceled_count,
            awaiting_stock_count: totals.awaiting_stock_count,
            gross_revenue: totals.gross_revenue,
            total_discount: totals.total_discount,
            total_interest: totals.total_interest,
            average_ticket,
            open_receivables_amount,
            overdue_receivables_count,
            open_backlog_count,
            low_stock_variants,
        })
    }
}

/// Assemble the aggregate from the fulfillment plan and the settlement
fn build_sale(
    request: &CreateSaleRequest,
    plan: &FulfillmentPlan,
    settlement: &Settlement,
) -> Result<Sale> {
    let sale_id = Uuid::new_v4().to_string();
    let now = Utc::now();

    let items = plan
        .lines
        .iter()
        .map(|line| SaleItem {
            id: Uuid::new_v4().to_string(),
            sale_id: sale_id.clone(),
            line_number: line.line_number,
            variant_id: line.variant_id.clone(),
            sku: line.sku.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            subtotal: line.subtotal,
            fulfillment_status: line.status,
        })
        .collect();

    let payments: Vec<SalePayment> = settlement
        .payments
        .iter()
        .enumerate()
        .map(|(index, leg)| SalePayment {
            id: Uuid::new_v4().to_string(),
            sale_id: sale_id.clone(),
            leg_number: index as i32 + 1,
            method: leg.method,
            amount: leg.amount,
            interest_amount: leg.interest_amount,
            installments: leg.installments,
            interest_rate_percentage: leg.interest_rate_percentage,
        })
        .collect();

    let has_credit = payments
        .iter()
        .any(|p| p.method == PaymentMethodKind::Credit);
    let due_date = if has_credit {
        Some(ReceivableCalculator::first_due_date(
            now.date_naive(),
            request.due_date,
        )?)
    } else {
        request.due_date
    };

    Ok(Sale {
        id: sale_id,
        customer_id: request.customer_id.clone(),
        items,
        subtotal_amount: settlement.subtotal_amount,
        discount_percentage: settlement.discount_percentage,
        discount_amount: settlement.discount_amount,
        interest_amount: settlement.interest_amount,
        total_amount: settlement.total_amount,
        payments,
        payment_status: PaymentStatus::Paid,
        fulfillment_status: plan.fulfillment_status,
        due_date,
        canceled_at: None,
        created_at: now,
        updated_at: now,
    })
}

/// One backlog row per backordered line, for the units stock could not cover
fn backlog_for(sale: &Sale, plan: &FulfillmentPlan) -> Vec<PurchaseBacklogItem> {
    plan.pending_lines()
        .filter_map(|line| {
            let item = sale
                .items
                .iter()
                .find(|i| i.line_number == line.line_number)?;
            Some(PurchaseBacklogItem {
                id: Uuid::new_v4().to_string(),
                variant_id: line.variant_id.clone(),
                quantity_needed: line.shortfall,
                source_sale_id: sale.id.clone(),
                source_sale_item_id: item.id.clone(),
                status: BacklogStatus::AwaitingPurchase,
                purchase_order_ref: None,
                created_at: sale.created_at,
                updated_at: sale.created_at,
            })
        })
        .collect()
}

/// Quantities to put back on cancel, per variant
fn restock_for(sale: &Sale) -> BTreeMap<String, i32> {
    let mut restock = BTreeMap::new();
    for item in &sale.items {
        if item.fulfillment_status == ItemFulfillmentStatus::Fulfilled {
            *restock.entry(item.variant_id.clone()).or_insert(0) += item.quantity;
        }
    }
    restock
}
