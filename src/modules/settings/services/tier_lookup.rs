use rust_decimal::Decimal;

use crate::modules::settings::models::InstallmentTier;

/// Selects the installment tier that applies to a purchase amount
pub struct TierLookup;

impl TierLookup {
    /// Tier with the greatest `min_purchase_value` not above `amount`.
    ///
    /// `tiers` must be sorted ascending by `min_purchase_value`; the scan stops
    /// at the first tier whose threshold exceeds the amount.
    pub fn select(tiers: &[InstallmentTier], amount: Decimal) -> Option<&InstallmentTier> {
        let mut selected = None;
        for tier in tiers {
            if tier.min_purchase_value > amount {
                break;
            }
            selected = Some(tier);
        }
        selected
    }

    /// Like [`TierLookup::select`], falling back to the cash tier
    pub fn resolve(tiers: &[InstallmentTier], amount: Decimal) -> InstallmentTier {
        Self::select(tiers, amount)
            .cloned()
            .unwrap_or_else(InstallmentTier::cash)
    }
}
