use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: String,
    pub name: String,
    /// Unique; booking identifies returning clients by phone
    pub phone_number: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClientRequest {
    pub name: String,
    pub phone_number: String,
    pub address: Option<String>,
}

impl CreateClientRequest {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("name is required"));
        }
        validate_phone(&self.phone_number)
    }
}

/// Digits with optional `+`, spaces, dashes and parentheses
pub fn validate_phone(phone_number: &str) -> Result<()> {
    let digits = phone_number.chars().filter(|c| c.is_ascii_digit()).count();
    let allowed = phone_number
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'));

    if !allowed || !(8..=15).contains(&digits) {
        return Err(AppError::validation(format!(
            "Invalid phone number: {}",
            phone_number
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListClientsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ClientResponse {
    pub id: String,
    pub name: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub created_at: String,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name,
            phone_number: client.phone_number,
            address: client.address,
            created_at: client.created_at.to_rfc3339(),
        }
    }
}
