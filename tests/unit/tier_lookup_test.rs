// Property tests for installment tier selection

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use vitrine::modules::settings::{InstallmentOption, InstallmentTier, TierLookup};

fn tier(id: &str, min_purchase_value: Decimal) -> InstallmentTier {
    InstallmentTier {
        id: id.to_string(),
        name: format!("Tier {}", id),
        min_purchase_value,
        rules: vec![InstallmentOption {
            installments: 1,
            interest_rate_percentage: Decimal::ZERO,
        }],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn ladder() -> Vec<InstallmentTier> {
    vec![
        tier("a", dec!(100)),
        tier("b", dec!(300)),
        tier("c", dec!(1000)),
    ]
}

#[test]
fn test_select_exact_threshold_is_inclusive() {
    let tiers = ladder();
    assert_eq!(TierLookup::select(&tiers, dec!(300)).unwrap().id, "b");
    assert_eq!(TierLookup::select(&tiers, dec!(299.99)).unwrap().id, "a");
    assert_eq!(TierLookup::select(&tiers, dec!(5000)).unwrap().id, "c");
}

#[test]
fn test_below_smallest_tier_falls_back_to_cash() {
    let tiers = ladder();
    assert!(TierLookup::select(&tiers, dec!(99.99)).is_none());

    let resolved = TierLookup::resolve(&tiers, dec!(50));
    assert_eq!(resolved.rules.len(), 1);
    assert_eq!(resolved.rules[0].installments, 1);
    assert_eq!(resolved.rules[0].interest_rate_percentage, Decimal::ZERO);
}

#[test]
fn test_empty_tier_list_resolves_to_cash() {
    let resolved = TierLookup::resolve(&[], dec!(10000));
    assert_eq!(resolved, InstallmentTier::cash());
}

proptest! {
    /// The selected tier has the largest threshold not above the amount
    #[test]
    fn prop_select_picks_greatest_threshold_below_amount(
        thresholds in prop::collection::btree_set(0u64..1_000_000u64, 1..8),
        amount_cents in 0u64..2_000_000u64,
    ) {
        let tiers: Vec<InstallmentTier> = thresholds
            .into_iter()
            .enumerate()
            .map(|(i, cents)| tier(&i.to_string(), Decimal::new(cents as i64, 2)))
            .collect();
        let amount = Decimal::new(amount_cents as i64, 2);

        let expected = tiers
            .iter()
            .filter(|t| t.min_purchase_value <= amount)
            .max_by_key(|t| t.min_purchase_value)
            .map(|t| t.id.clone());
        let selected = TierLookup::select(&tiers, amount).map(|t| t.id.clone());

        prop_assert_eq!(selected, expected);
    }
}
