mod installment_tier;
mod payment_method;

pub use installment_tier::{
    InstallmentOption, InstallmentOptionResponse, InstallmentTier, InstallmentTierRequest,
    InstallmentTierResponse, CASH_TIER_ID,
};
pub use payment_method::{PaymentMethod, PaymentMethodKind, UpdatePaymentMethodRequest};
