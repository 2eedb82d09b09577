// Payment-split settlement against the seeded store configuration

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use vitrine::core::BusinessRuleViolation;
use vitrine::modules::sales::models::PaymentIntent;
use vitrine::modules::sales::services::SettlementEngine;
use vitrine::modules::settings::{
    InstallmentOption, InstallmentTier, PaymentMethod, PaymentMethodKind, SettlementSettings,
};

fn method(key: PaymentMethodKind, max_installments: i32) -> PaymentMethod {
    PaymentMethod {
        key,
        name: key.to_string(),
        is_active: true,
        max_installments,
        updated_at: Utc::now(),
    }
}

fn option(installments: i32, rate: Decimal) -> InstallmentOption {
    InstallmentOption {
        installments,
        interest_rate_percentage: rate,
    }
}

fn settings() -> SettlementSettings {
    SettlementSettings {
        payment_methods: vec![
            method(PaymentMethodKind::Cash, 1),
            method(PaymentMethodKind::Card, 12),
            method(PaymentMethodKind::Pix, 1),
            method(PaymentMethodKind::Credit, 4),
        ],
        tiers: vec![InstallmentTier {
            id: "default".to_string(),
            name: "Default".to_string(),
            min_purchase_value: Decimal::ZERO,
            rules: vec![
                option(1, Decimal::ZERO),
                option(2, dec!(5.5)),
                option(3, dec!(6.5)),
            ],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }],
    }
}

fn intent(method: PaymentMethodKind, amount: Option<Decimal>, installments: Option<i32>) -> PaymentIntent {
    PaymentIntent {
        method,
        amount,
        installments,
    }
}

#[test]
fn test_discounted_credit_sale_in_three_installments() {
    let settlement = SettlementEngine::settle(
        dec!(1000),
        Some(dec!(10)),
        &[intent(PaymentMethodKind::Credit, None, Some(3))],
        &settings(),
    )
    .unwrap();

    assert_eq!(settlement.discount_amount, dec!(100));
    assert_eq!(settlement.net_amount, dec!(900));
    assert_eq!(settlement.total_amount, dec!(962.57));
    assert_eq!(settlement.interest_amount, dec!(62.57));
    assert_eq!(settlement.payments.len(), 1);
    assert_eq!(settlement.payments[0].interest_rate_percentage, dec!(6.5));
    assert_eq!(settlement.payments[0].installments, 3);
}

#[test]
fn test_single_cash_payment_has_no_interest() {
    let settlement = SettlementEngine::settle(
        dec!(250),
        None,
        &[intent(PaymentMethodKind::Pix, None, None)],
        &settings(),
    )
    .unwrap();

    assert_eq!(settlement.total_amount, dec!(250));
    assert_eq!(settlement.interest_amount, Decimal::ZERO);
}

#[test]
fn test_discount_is_clamped() {
    let settlement = SettlementEngine::settle(
        dec!(200),
        Some(dec!(150)),
        &[intent(PaymentMethodKind::Cash, None, None)],
        &settings(),
    )
    .unwrap();

    assert_eq!(settlement.discount_percentage, dec!(100));
    assert_eq!(settlement.total_amount, Decimal::ZERO);
}

#[test]
fn test_installments_not_in_tier_are_rejected() {
    // credit allows 4x, but the tier only offers up to 3x
    let err = SettlementEngine::settle(
        dec!(1000),
        None,
        &[intent(PaymentMethodKind::Credit, None, Some(4))],
        &settings(),
    )
    .unwrap_err();
    assert_eq!(err.rule(), Some(BusinessRuleViolation::InstallmentNotPermitted));

    let err = SettlementEngine::settle(
        dec!(1000),
        None,
        &[intent(PaymentMethodKind::Pix, None, Some(2))],
        &settings(),
    )
    .unwrap_err();
    assert_eq!(err.rule(), Some(BusinessRuleViolation::InstallmentNotPermitted));
}

#[test]
fn test_inactive_method_is_rejected() {
    let mut settings = settings();
    settings.payment_methods[1].is_active = false;

    let err = SettlementEngine::settle(
        dec!(100),
        None,
        &[intent(PaymentMethodKind::Card, None, Some(1))],
        &settings,
    )
    .unwrap_err();
    assert_eq!(err.rule(), Some(BusinessRuleViolation::InvalidPaymentMethod));
}

#[test]
fn test_split_needs_entry_amount_below_net() {
    let err = SettlementEngine::settle(
        dec!(500),
        None,
        &[
            intent(PaymentMethodKind::Pix, None, None),
            intent(PaymentMethodKind::Credit, None, Some(3)),
        ],
        &settings(),
    )
    .unwrap_err();
    assert_eq!(err.rule(), Some(BusinessRuleViolation::SplitEntryAmountRequired));

    let err = SettlementEngine::settle(
        dec!(500),
        None,
        &[
            intent(PaymentMethodKind::Pix, Some(dec!(500)), None),
            intent(PaymentMethodKind::Credit, None, Some(3)),
        ],
        &settings(),
    )
    .unwrap_err();
    assert_eq!(err.rule(), Some(BusinessRuleViolation::SplitEntryNotBelowTotal));
}

#[test]
fn test_split_payment_never_repasses_interest() {
    let settlement = SettlementEngine::settle(
        dec!(1000),
        None,
        &[
            intent(PaymentMethodKind::Pix, Some(dec!(400)), None),
            intent(PaymentMethodKind::Credit, None, Some(3)),
        ],
        &settings(),
    )
    .unwrap();

    assert_eq!(settlement.payments[0].amount, dec!(400));
    assert_eq!(settlement.payments[1].amount, dec!(600));
    assert!(settlement
        .payments
        .iter()
        .all(|p| p.interest_rate_percentage.is_zero() && p.interest_amount.is_zero()));
    assert_eq!(settlement.total_amount, dec!(1000));
}

proptest! {
    /// Split legs are interest free and add up to the net amount
    #[test]
    fn prop_split_legs_sum_to_net(
        subtotal_cents in 200u64..10_000_000u64,
        entry_share in 1u64..99u64,
        discount in 0u32..50u32,
        installments in 1i32..=4i32,
    ) {
        let subtotal = Decimal::new(subtotal_cents as i64, 2);
        let discount = Decimal::from(discount);
        let net = subtotal - (subtotal * discount / Decimal::ONE_HUNDRED).round_dp(2);
        let entry = (net * Decimal::from(entry_share) / Decimal::ONE_HUNDRED).round_dp(2);
        prop_assume!(entry > Decimal::ZERO && entry < net);

        let settlement = SettlementEngine::settle(
            subtotal,
            Some(discount),
            &[
                intent(PaymentMethodKind::Cash, Some(entry), None),
                intent(PaymentMethodKind::Credit, None, Some(installments)),
            ],
            &settings(),
        ).unwrap();

        prop_assert_eq!(settlement.total_amount, settlement.net_amount);
        prop_assert_eq!(settlement.interest_amount, Decimal::ZERO);
        prop_assert!(settlement.payments.iter().all(|p| p.interest_rate_percentage.is_zero()));
    }

    /// A single leg applies the matched tier's rate
    #[test]
    fn prop_single_leg_applies_tier_rate(
        subtotal_cents in 1u64..10_000_000u64,
        installments in 1i32..=3i32,
    ) {
        let subtotal = Decimal::new(subtotal_cents as i64, 2);
        let settlement = SettlementEngine::settle(
            subtotal,
            None,
            &[intent(PaymentMethodKind::Card, None, Some(installments))],
            &settings(),
        ).unwrap();

        let expected_rate = match installments {
            1 => Decimal::ZERO,
            2 => dec!(5.5),
            _ => dec!(6.5),
        };
        prop_assert_eq!(settlement.payments[0].interest_rate_percentage, expected_rate);
        prop_assert!(settlement.total_amount >= subtotal);
    }
}
