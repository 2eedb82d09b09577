// Product: the catalog entry variants belong to. Carries the descriptive
// fields shared by every size and color; stock and prices live on variants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};
use crate::modules::catalog::models::{ProductVariant, VariantResponse};

const MAX_NAME_LEN: usize = 160;
const MAX_CODE_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Store-facing reference, unique when present, kept uppercase
    pub code: Option<String>,
    pub category: Option<String>,
    /// Unavailable products are hidden from the catalog but keep their variants
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalog listing filter; unavailable products are skipped unless asked for
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub include_unavailable: bool,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub code: Option<String>,
    pub category: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

impl CreateProductRequest {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        if let Some(code) = &self.code {
            validate_code(code)?;
        }
        Ok(())
    }
}

/// Partial update; absent fields keep their current value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub category: Option<String>,
    pub is_available: Option<bool>,
}

impl UpdateProductRequest {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_none()
            && self.description.is_none()
            && self.code.is_none()
            && self.category.is_none()
            && self.is_available.is_none()
        {
            return Err(AppError::validation("Nothing to update"));
        }
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(code) = &self.code {
            validate_code(code)?;
        }
        Ok(())
    }

    /// Fold the changes into `product`
    pub fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            product.description = blank_to_none(description);
        }
        if let Some(code) = self.code {
            product.code = normalize_code(Some(code));
        }
        if let Some(category) = self.category {
            product.category = blank_to_none(category);
        }
        if let Some(is_available) = self.is_available {
            product.is_available = is_available;
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "name cannot exceed {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

fn validate_code(code: &str) -> Result<()> {
    let code = code.trim();
    if code.len() > MAX_CODE_LEN {
        return Err(AppError::validation(format!(
            "code cannot exceed {} characters",
            MAX_CODE_LEN
        )));
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(AppError::validation(
            "code may only contain letters, digits and '-'",
        ));
    }
    Ok(())
}

pub(crate) fn blank_to_none(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(crate) fn normalize_code(code: Option<String>) -> Option<String> {
    code.and_then(blank_to_none).map(|c| c.to_ascii_uppercase())
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub code: Option<String>,
    pub category: Option<String>,
    pub is_available: bool,
    pub variants: Vec<VariantResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl ProductResponse {
    pub fn new(product: Product, variants: Vec<ProductVariant>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            code: product.code,
            category: product.category,
            is_available: product.is_available,
            variants: variants.into_iter().map(VariantResponse::from).collect(),
            created_at: product.created_at.to_rfc3339(),
            updated_at: product.updated_at.to_rfc3339(),
        }
    }
}
