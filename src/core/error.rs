use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::fmt;

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Closed set of business rules a request can break.
///
/// Controllers and clients switch on the rule code, never on the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessRuleViolation {
    /// A sale line references a variant that does not exist
    UnknownVariant,
    /// Payment method is unknown or deactivated in settings
    InvalidPaymentMethod,
    /// Requested installment count is not offered for the amount or method
    InstallmentNotPermitted,
    /// Split payment without an explicit entry amount
    SplitEntryAmountRequired,
    /// Split entry amount is not strictly below the net amount
    SplitEntryNotBelowTotal,
    /// Credit sale without a customer to bill
    CustomerRequiredForCredit,
    /// Sale already shipped (fully or partially)
    SaleNotCancelable,
    /// Purchase backlog status change outside its lifecycle
    InvalidBacklogTransition,
}

impl BusinessRuleViolation {
    pub fn code(&self) -> &'static str {
        match self {
            BusinessRuleViolation::UnknownVariant => "unknown_variant",
            BusinessRuleViolation::InvalidPaymentMethod => "invalid_payment_method",
            BusinessRuleViolation::InstallmentNotPermitted => "installment_not_permitted",
            BusinessRuleViolation::SplitEntryAmountRequired => "split_entry_amount_required",
            BusinessRuleViolation::SplitEntryNotBelowTotal => "split_entry_not_below_total",
            BusinessRuleViolation::CustomerRequiredForCredit => "customer_required_for_credit",
            BusinessRuleViolation::SaleNotCancelable => "sale_not_cancelable",
            BusinessRuleViolation::InvalidBacklogTransition => "invalid_backlog_transition",
        }
    }
}

impl fmt::Display for BusinessRuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Missing or malformed input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Well-formed request rejected by a business rule
    #[error("Business rule violation: {message}")]
    BusinessRule {
        rule: BusinessRuleViolation,
        message: String,
    },

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness or state conflict (duplicate SKU, booked slot)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        // Driver messages stay in the logs
        let message = match self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "Database error".to_string()
            }
            other => other.to_string(),
        };

        let mut error = serde_json::json!({
            "code": status_code.as_u16(),
            "kind": self.kind(),
            "message": message,
        });
        if let AppError::BusinessRule { rule, .. } = self {
            error["rule"] = serde_json::Value::from(rule.code());
        }

        HttpResponse::build(status_code).json(serde_json::json!({ "error": error }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::BusinessRule { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn business_rule(rule: BusinessRuleViolation, msg: impl Into<String>) -> Self {
        AppError::BusinessRule {
            rule,
            message: msg.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Stable machine-readable error category
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) | AppError::Json(_) => "validation",
            AppError::BusinessRule { .. } => "business_rule",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Database(_) => "database",
            AppError::Configuration(_) => "configuration",
            AppError::Internal(_) => "internal",
        }
    }

    /// The violated rule, when this is a business rule rejection
    pub fn rule(&self) -> Option<BusinessRuleViolation> {
        match self {
            AppError::BusinessRule { rule, .. } => Some(*rule),
            _ => None,
        }
    }

    /// Map a unique-key violation to `Conflict`, anything else to `Database`
    pub fn from_unique_violation(err: sqlx::Error, conflict_msg: impl Into<String>) -> Self {
        let is_unique = err
            .as_database_error()
            .map(|db| db.is_unique_violation())
            .unwrap_or(false);

        if is_unique {
            AppError::Conflict(conflict_msg.into())
        } else {
            AppError::Database(err)
        }
    }
}
