use rust_decimal::Decimal;
use serde::Serialize;

use super::sale::{Sale, SaleItem, SalePayment};

#[derive(Debug, Serialize)]
pub struct SaleItemResponse {
    pub id: String,
    pub variant_id: String,
    pub sku: String,
    pub quantity: i32,
    pub unit_price: String,
    pub subtotal: String,
    pub fulfillment_status: String,
}

impl From<SaleItem> for SaleItemResponse {
    fn from(item: SaleItem) -> Self {
        Self {
            id: item.id,
            variant_id: item.variant_id,
            sku: item.sku,
            quantity: item.quantity,
            unit_price: item.unit_price.to_string(),
            subtotal: item.subtotal.to_string(),
            fulfillment_status: item.fulfillment_status.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SalePaymentResponse {
    pub method: String,
    pub amount: String,
    pub interest_amount: String,
    pub installments: i32,
    pub interest_rate_percentage: String,
}

impl From<SalePayment> for SalePaymentResponse {
    fn from(payment: SalePayment) -> Self {
        Self {
            method: payment.method.to_string(),
            amount: payment.amount.to_string(),
            interest_amount: payment.interest_amount.to_string(),
            installments: payment.installments,
            interest_rate_percentage: payment.interest_rate_percentage.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SaleResponse {
    pub id: String,
    pub customer_id: Option<String>,
    pub items: Vec<SaleItemResponse>,
    pub subtotal_amount: String,
    pub discount_percentage: String,
    pub discount_amount: String,
    pub interest_amount: String,
    pub total_amount: String,
    pub payments: Vec<SalePaymentResponse>,
    pub payment_status: String,
    pub fulfillment_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canceled_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Sale> for SaleResponse {
    fn from(sale: Sale) -> Self {
        Self {
            id: sale.id,
            customer_id: sale.customer_id,
            items: sale.items.into_iter().map(SaleItemResponse::from).collect(),
            subtotal_amount: sale.subtotal_amount.to_string(),
            discount_percentage: sale.discount_percentage.to_string(),
            discount_amount: sale.discount_amount.to_string(),
            interest_amount: sale.interest_amount.to_string(),
            total_amount: sale.total_amount.to_string(),
            payments: sale
                .payments
                .into_iter()
                .map(SalePaymentResponse::from)
                .collect(),
            payment_status: sale.payment_status.to_string(),
            fulfillment_status: sale.fulfillment_status.to_string(),
            due_date: sale.due_date.map(|d| d.to_string()),
            canceled_at: sale.canceled_at.map(|dt| dt.to_rfc3339()),
            created_at: sale.created_at.to_rfc3339(),
            updated_at: sale.updated_at.to_rfc3339(),
        }
    }
}

/// Dashboard KPIs over sales and their side effects
#[derive(Debug, Clone, PartialEq)]
pub struct SalesSummary {
    pub sales_count: i64,
    pub canceled_count: i64,
    pub awaiting_stock_count: i64,
    pub gross_revenue: Decimal,
    pub total_discount: Decimal,
    pub total_interest: Decimal,
    pub average_ticket: Decimal,
    pub open_receivables_amount: Decimal,
    pub overdue_receivables_count: i64,
    pub open_backlog_count: i64,
    pub low_stock_variants: i64,
}

#[derive(Debug, Serialize)]
pub struct SalesSummaryResponse {
    pub sales_count: i64,
    pub canceled_count: i64,
    pub awaiting_stock_count: i64,
    pub gross_revenue: String,
    pub total_discount: String,
    pub total_interest: String,
    pub average_ticket: String,
    pub open_receivables_amount: String,
    pub overdue_receivables_count: i64,
    pub open_backlog_count: i64,
    pub low_stock_variants: i64,
}

impl From<SalesSummary> for SalesSummaryResponse {
    fn from(summary: SalesSummary) -> Self {
        Self {
            sales_count: summary.sales_count,
            canceled_count: summary.canceled_count,
            awaiting_stock_count: summary.awaiting_stock_count,
            gross_revenue: summary.gross_revenue.to_string(),
            total_discount: summary.total_discount.to_string(),
            total_interest: summary.total_interest.to_string(),
            average_ticket: summary.average_ticket.to_string(),
            open_receivables_amount: summary.open_receivables_amount.to_string(),
            overdue_receivables_count: summary.overdue_receivables_count,
            open_backlog_count: summary.open_backlog_count,
            low_stock_variants: summary.low_stock_variants,
        }
    }
}
