// Payment-split settlement: discount, tier lookup and interest repass
// turned into the payment legs a sale is persisted with.

use rust_decimal::Decimal;
use tracing::warn;

use crate::core::{clamp_percentage, round_money, AppError, BusinessRuleViolation, Result};
use crate::modules::sales::models::PaymentIntent;
use crate::modules::settings::models::{PaymentMethod, PaymentMethodKind};
use crate::modules::settings::{InterestCalculator, SettlementSettings, TierLookup};

/// A payment leg as it will be charged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettledPayment {
    pub method: PaymentMethodKind,
    /// Charged amount, interest included
    pub amount: Decimal,
    pub principal: Decimal,
    pub interest_amount: Decimal,
    pub installments: i32,
    pub interest_rate_percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub subtotal_amount: Decimal,
    pub discount_percentage: Decimal,
    pub discount_amount: Decimal,
    /// Subtotal minus discount, before interest
    pub net_amount: Decimal,
    pub interest_amount: Decimal,
    /// Sum of all leg amounts
    pub total_amount: Decimal,
    pub payments: Vec<SettledPayment>,
}

pub struct SettlementEngine;

impl SettlementEngine {
    /// Settle a subtotal against one or two payment intents.
    ///
    /// One intent pays the whole net amount and has the matched tier's rate
    /// repassed. Two intents are an entry plus a remainder leg, both at 0%.
    pub fn settle(
        subtotal: Decimal,
        discount_percentage: Option<Decimal>,
        intents: &[PaymentIntent],
        settings: &SettlementSettings,
    ) -> Result<Settlement> {
        let subtotal = round_money(subtotal);
        let discount_percentage = clamp_percentage(discount_percentage.unwrap_or(Decimal::ZERO));
        let discount_amount = round_money(subtotal * discount_percentage / Decimal::ONE_HUNDRED);
        let net_amount = subtotal - discount_amount;

        let payments = match intents {
            [single] => vec![Self::settle_single(single, net_amount, settings)?],
            [entry, remainder] => Self::settle_split(entry, remainder, net_amount, settings)?,
            _ => {
                return Err(AppError::validation(format!(
                    "Expected one or two payments, got {}",
                    intents.len()
                )))
            }
        };

        let total_amount = payments.iter().map(|p| p.amount).sum();
        let interest_amount = payments.iter().map(|p| p.interest_amount).sum();

        Ok(Settlement {
            subtotal_amount: subtotal,
            discount_percentage,
            discount_amount,
            net_amount,
            interest_amount,
            total_amount,
            payments,
        })
    }

    fn settle_single(
        intent: &PaymentIntent,
        net_amount: Decimal,
        settings: &SettlementSettings,
    ) -> Result<SettledPayment> {
        let installments = intent.installments.unwrap_or(1);
        check_method(intent.method, installments, &settings.payment_methods)?;

        let tier = TierLookup::resolve(&settings.tiers, net_amount);
        let option = tier.option_for(installments).ok_or_else(|| {
            warn!(
                installments,
                tier_id = tier.id.as_str(),
                net_amount = %net_amount,
                "Installment count not offered by tier"
            );
            AppError::business_rule(
                BusinessRuleViolation::InstallmentNotPermitted,
                format!(
                    "{}x is not available for a purchase of {}",
                    installments, net_amount
                ),
            )
        })?;

        let repass = InterestCalculator::repass(net_amount, option.interest_rate_percentage)?;

        Ok(SettledPayment {
            method: intent.method,
            amount: repass.total,
            principal: repass.principal,
            interest_amount: repass.interest,
            installments,
            interest_rate_percentage: option.interest_rate_percentage,
        })
    }

    fn settle_split(
        entry: &PaymentIntent,
        remainder: &PaymentIntent,
        net_amount: Decimal,
        settings: &SettlementSettings,
    ) -> Result<Vec<SettledPayment>> {
        let entry_amount = entry.amount.map(round_money).ok_or_else(|| {
            AppError::business_rule(
                BusinessRuleViolation::SplitEntryAmountRequired,
                "The entry payment of a split needs an amount",
            )
        })?;
        if entry_amount <= Decimal::ZERO {
            return Err(AppError::validation(
                "The entry payment amount must be greater than 0",
            ));
        }
        if entry_amount >= net_amount {
            return Err(AppError::business_rule(
                BusinessRuleViolation::SplitEntryNotBelowTotal,
                format!(
                    "Entry amount {} must be less than the sale total {}",
                    entry_amount, net_amount
                ),
            ));
        }

        let entry_installments = entry.installments.unwrap_or(1);
        let remainder_installments = remainder.installments.unwrap_or(1);
        check_method(entry.method, entry_installments, &settings.payment_methods)?;
        check_method(
            remainder.method,
            remainder_installments,
            &settings.payment_methods,
        )?;

        let remainder_amount = net_amount - entry_amount;

        // No interest is repassed on split payments
        Ok(vec![
            interest_free(entry.method, entry_amount, entry_installments),
            interest_free(remainder.method, remainder_amount, remainder_installments),
        ])
    }
}

fn interest_free(method: PaymentMethodKind, amount: Decimal, installments: i32) -> SettledPayment {
    SettledPayment {
        method,
        amount,
        principal: amount,
        interest_amount: Decimal::ZERO,
        installments,
        interest_rate_percentage: Decimal::ZERO,
    }
}

/// Method must be configured and active, and allow the installment count
fn check_method(
    kind: PaymentMethodKind,
    installments: i32,
    methods: &[PaymentMethod],
) -> Result<()> {
    let method = methods
        .iter()
        .find(|m| m.key == kind && m.is_active)
        .ok_or_else(|| {
            AppError::business_rule(
                BusinessRuleViolation::InvalidPaymentMethod,
                format!("Payment method '{}' is not available", kind),
            )
        })?;

    if installments < 1 || installments > method.max_installments {
        return Err(AppError::business_rule(
            BusinessRuleViolation::InstallmentNotPermitted,
            format!(
                "{} allows up to {}x, requested {}x",
                method.name, method.max_installments, installments
            ),
        ));
    }

    Ok(())
}
