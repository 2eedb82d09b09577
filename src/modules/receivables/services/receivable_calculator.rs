// Installment schedule for a credit payment, in exact cents.

use chrono::{DateTime, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::{from_cents, to_cents, AppError, Result};
use crate::modules::receivables::models::{AccountReceivable, ReceivableStatus};

pub struct ReceivableCalculator;

impl ReceivableCalculator {
    /// Split `total` into `installments` cent-exact parts.
    ///
    /// Every part gets `floor(cents / n)`; the first also takes the remainder,
    /// so the parts always sum to the total.
    pub fn split_amount(total: Decimal, installments: i32) -> Result<Vec<Decimal>> {
        if installments < 1 {
            return Err(AppError::validation("Installment count must be at least 1"));
        }
        if total < Decimal::ZERO {
            return Err(AppError::validation("Receivable total cannot be negative"));
        }

        let cents = to_cents(total)?;
        let count = i64::from(installments);
        let base = cents / count;
        let remainder = cents - base * count;

        Ok((0..count)
            .map(|i| {
                if i == 0 {
                    from_cents(base + remainder)
                } else {
                    from_cents(base)
                }
            })
            .collect())
    }

    /// Monthly due dates starting at `first_due`. Month ends clamp, so a
    /// schedule starting Jan 31 falls due Feb 28/29, Mar 31, ...
    pub fn due_dates(first_due: NaiveDate, installments: i32) -> Result<Vec<NaiveDate>> {
        (0..installments.max(0) as u32)
            .map(|i| {
                first_due.checked_add_months(Months::new(i)).ok_or_else(|| {
                    AppError::validation(format!("Due date out of range after {}", first_due))
                })
            })
            .collect()
    }

    /// First installment is due on the requested date, or a month after the sale
    pub fn first_due_date(sale_date: NaiveDate, requested: Option<NaiveDate>) -> Result<NaiveDate> {
        match requested {
            Some(date) => Ok(date),
            None => sale_date
                .checked_add_months(Months::new(1))
                .ok_or_else(|| AppError::internal("Sale date out of range")),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn schedule(
        sale_id: &str,
        customer_id: &str,
        payment_leg: i32,
        total: Decimal,
        installments: i32,
        first_due: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Vec<AccountReceivable>> {
        let amounts = Self::split_amount(total, installments)?;
        let due_dates = Self::due_dates(first_due, installments)?;

        Ok(amounts
            .into_iter()
            .zip(due_dates)
            .enumerate()
            .map(|(index, (amount, due_date))| AccountReceivable {
                id: Uuid::new_v4().to_string(),
                sale_id: sale_id.to_string(),
                customer_id: customer_id.to_string(),
                payment_leg,
                installment_number: index as i32 + 1,
                total_installments: installments,
                amount,
                due_date,
                status: ReceivableStatus::Pending,
                paid_at: None,
                created_at: now,
                updated_at: now,
            })
            .collect())
    }
}
