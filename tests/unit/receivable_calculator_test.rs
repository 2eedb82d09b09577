// Receivable schedules: cent-exact split with the remainder on the first installment

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use vitrine::modules::receivables::{ReceivableCalculator, ReceivableStatus};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_even_split() {
    let parts = ReceivableCalculator::split_amount(dec!(300.00), 3).unwrap();
    assert_eq!(parts, vec![dec!(100.00), dec!(100.00), dec!(100.00)]);
}

#[test]
fn test_remainder_goes_to_first_installment() {
    let parts = ReceivableCalculator::split_amount(dec!(300.01), 3).unwrap();
    assert_eq!(parts, vec![dec!(100.01), dec!(100.00), dec!(100.00)]);

    let parts = ReceivableCalculator::split_amount(dec!(100.00), 3).unwrap();
    assert_eq!(parts, vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
}

#[test]
fn test_due_dates_are_monthly_and_clamp_month_end() {
    let dates = ReceivableCalculator::due_dates(date(2025, 1, 31), 3).unwrap();
    assert_eq!(dates, vec![date(2025, 1, 31), date(2025, 2, 28), date(2025, 3, 31)]);
}

#[test]
fn test_first_due_defaults_to_one_month_after_sale() {
    assert_eq!(
        ReceivableCalculator::first_due_date(date(2025, 5, 10), None).unwrap(),
        date(2025, 6, 10)
    );
    assert_eq!(
        ReceivableCalculator::first_due_date(date(2025, 5, 10), Some(date(2025, 5, 20))).unwrap(),
        date(2025, 5, 20)
    );
}

#[test]
fn test_schedule_rows() {
    let rows = ReceivableCalculator::schedule(
        "sale-1",
        "client-1",
        2,
        dec!(962.57),
        3,
        date(2025, 7, 1),
        Utc::now(),
    )
    .unwrap();

    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.status == ReceivableStatus::Pending));
    assert!(rows.iter().all(|r| r.payment_leg == 2 && r.total_installments == 3));
    assert_eq!(rows[0].installment_number, 1);
    assert_eq!(rows[2].due_date, date(2025, 9, 1));
    assert_eq!(rows.iter().map(|r| r.amount).sum::<Decimal>(), dec!(962.57));
}

proptest! {
    /// Installments always sum to the total, to the cent
    #[test]
    fn prop_split_sums_to_total(
        cents in 0u64..100_000_000u64,
        count in 1i32..24i32,
    ) {
        let total = Decimal::new(cents as i64, 2);
        let parts = ReceivableCalculator::split_amount(total, count).unwrap();

        prop_assert_eq!(parts.len(), count as usize);
        prop_assert_eq!(parts.iter().copied().sum::<Decimal>(), total);
    }

    /// The first installment carries the remainder, the rest are equal
    #[test]
    fn prop_first_installment_is_largest(
        cents in 0u64..100_000_000u64,
        count in 2i32..24i32,
    ) {
        let total = Decimal::new(cents as i64, 2);
        let parts = ReceivableCalculator::split_amount(total, count).unwrap();

        for part in &parts[1..] {
            prop_assert!(parts[0] >= *part);
            prop_assert_eq!(*part, parts[1]);
        }
        prop_assert!(parts[0] - parts[1] < Decimal::new(count as i64, 2));
    }
}
