mod installment_tier_repository;
mod payment_method_repository;

pub use installment_tier_repository::InstallmentTierRepository;
pub use payment_method_repository::PaymentMethodRepository;
