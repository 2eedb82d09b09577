// Interest repass: total = P / (1 - r/100), interest = total - P

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use vitrine::modules::settings::InterestCalculator;

#[test]
fn test_zero_rate_is_identity() {
    let repass = InterestCalculator::repass(dec!(900), Decimal::ZERO).unwrap();
    assert_eq!(repass.total, dec!(900));
    assert_eq!(repass.interest, Decimal::ZERO);
}

#[test]
fn test_three_installments_at_six_and_a_half_percent() {
    let repass = InterestCalculator::repass(dec!(900), dec!(6.5)).unwrap();
    assert_eq!(repass.total, dec!(962.57));
    assert_eq!(repass.interest, dec!(62.57));
}

#[test]
fn test_rate_out_of_range_is_rejected() {
    assert!(InterestCalculator::repass(dec!(100), dec!(100)).is_err());
    assert!(InterestCalculator::repass(dec!(100), dec!(-1)).is_err());
    assert!(InterestCalculator::repass(dec!(-1), dec!(5)).is_err());
}

proptest! {
    /// The store nets the principal back, within rounding to cents
    #[test]
    fn prop_repass_nets_principal(
        principal_cents in 0u64..100_000_000u64,
        rate_bp in 0u32..5_000u32,
    ) {
        let principal = Decimal::new(principal_cents as i64, 2);
        let rate = Decimal::new(rate_bp as i64, 2);

        let repass = InterestCalculator::repass(principal, rate).unwrap();

        prop_assert_eq!(repass.principal, principal);
        prop_assert_eq!(repass.interest, repass.total - principal);
        prop_assert!(repass.total >= principal);

        let netted = repass.total * (Decimal::ONE - rate / Decimal::ONE_HUNDRED);
        prop_assert!((netted - principal).abs() <= dec!(0.01));
    }
}
