use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::MySqlPool;
use tracing::info;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::settings::{
    models::{
        InstallmentTier, InstallmentTierRequest, PaymentMethod, PaymentMethodKind,
        UpdatePaymentMethodRequest,
    },
    repositories::{InstallmentTierRepository, PaymentMethodRepository},
    services::{PaymentCondition, PaymentConditions, TierLookup},
};

/// Everything sale settlement reads from settings, loaded together
#[derive(Debug, Clone)]
pub struct SettlementSettings {
    pub payment_methods: Vec<PaymentMethod>,
    /// Ascending by `min_purchase_value`
    pub tiers: Vec<InstallmentTier>,
}

/// Service for payment method and installment tier configuration
pub struct SettingsService {
    payment_methods: PaymentMethodRepository,
    tiers: InstallmentTierRepository,
}

impl SettingsService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            payment_methods: PaymentMethodRepository::new(pool.clone()),
            tiers: InstallmentTierRepository::new(pool),
        }
    }

    pub async fn settlement_settings(&self) -> Result<SettlementSettings> {
        Ok(SettlementSettings {
            payment_methods: self.payment_methods.find_all().await?,
            tiers: self.tiers.find_all().await?,
        })
    }

    pub async fn list_payment_methods(&self) -> Result<Vec<PaymentMethod>> {
        self.payment_methods.find_all().await
    }

    pub async fn update_payment_method(
        &self,
        key: &str,
        request: UpdatePaymentMethodRequest,
    ) -> Result<PaymentMethod> {
        request.validate()?;
        let kind = key
            .parse::<PaymentMethodKind>()
            .map_err(|_| AppError::not_found(format!("Payment method '{}' not found", key)))?;

        let mut method = self
            .payment_methods
            .find_by_key(kind)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Payment method '{}' not found", key)))?;

        request.apply(&mut method);
        method.updated_at = Utc::now();
        self.payment_methods.update(&method).await?;

        info!(
            method = method.key.as_str(),
            is_active = method.is_active,
            max_installments = method.max_installments,
            "Payment method updated"
        );

        Ok(method)
    }

    pub async fn list_tiers(&self) -> Result<Vec<InstallmentTier>> {
        self.tiers.find_all().await
    }

    pub async fn get_tier(&self, id: &str) -> Result<InstallmentTier> {
        self.tiers
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Installment tier '{}' not found", id)))
    }

    pub async fn create_tier(&self, request: InstallmentTierRequest) -> Result<InstallmentTier> {
        let rules = request.validated_rules()?;

        if self
            .tiers
            .exists_with_min_value(request.min_purchase_value, None)
            .await?
        {
            return Err(AppError::conflict(format!(
                "A tier for minimum purchase value {} already exists",
                request.min_purchase_value
            )));
        }

        let now = Utc::now();
        let tier = InstallmentTier {
            id: Uuid::new_v4().to_string(),
            name: request.name.trim().to_string(),
            min_purchase_value: request.min_purchase_value,
            rules,
            created_at: now,
            updated_at: now,
        };
        self.tiers.create(&tier).await?;

        info!(
            tier_id = tier.id.as_str(),
            min_purchase_value = %tier.min_purchase_value,
            options = tier.rules.len(),
            "Installment tier created"
        );

        Ok(tier)
    }

    pub async fn update_tier(
        &self,
        id: &str,
        request: InstallmentTierRequest,
    ) -> Result<InstallmentTier> {
        let rules = request.validated_rules()?;
        let existing = self.get_tier(id).await?;

        if self
            .tiers
            .exists_with_min_value(request.min_purchase_value, Some(id))
            .await?
        {
            return Err(AppError::conflict(format!(
                "A tier for minimum purchase value {} already exists",
                request.min_purchase_value
            )));
        }

        let tier = InstallmentTier {
            id: existing.id,
            name: request.name.trim().to_string(),
            min_purchase_value: request.min_purchase_value,
            rules,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };
        self.tiers.update(&tier).await?;

        info!(tier_id = id, "Installment tier updated");

        Ok(tier)
    }

    pub async fn delete_tier(&self, id: &str) -> Result<()> {
        if !self.tiers.delete(id).await? {
            return Err(AppError::not_found(format!(
                "Installment tier '{}' not found",
                id
            )));
        }

        info!(tier_id = id, "Installment tier deleted");
        Ok(())
    }

    /// Installment menu for a purchase value using the tier that applies to it
    pub async fn payment_conditions(
        &self,
        purchase_value: Decimal,
        repass_interest: bool,
    ) -> Result<Vec<PaymentCondition>> {
        if purchase_value <= Decimal::ZERO {
            return Err(AppError::validation("purchase_value must be greater than 0"));
        }

        let tiers = self.tiers.find_all().await?;
        let tier = TierLookup::resolve(&tiers, purchase_value);
        PaymentConditions::quote(&tier, purchase_value, repass_interest)
    }
}
