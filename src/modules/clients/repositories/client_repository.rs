use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool, Transaction};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::clients::models::Client;

const CLIENT_COLUMNS: &str = "id, name, phone_number, address, created_at, updated_at";

/// Repository for clients
#[derive(Clone)]
pub struct ClientRepository {
    pool: MySqlPool,
}

impl ClientRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, client: &Client) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO clients ({}) VALUES (?, ?, ?, ?, ?, ?)",
            CLIENT_COLUMNS
        ))
        .bind(&client.id)
        .bind(&client.name)
        .bind(&client.phone_number)
        .bind(&client.address)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_unique_violation(
                e,
                format!("A client with phone '{}' already exists", client.phone_number),
            )
        })?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Client>> {
        let row = sqlx::query_as::<_, ClientRow>(&format!(
            "SELECT {} FROM clients WHERE id = ?",
            CLIENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch client: {}", e)))?;

        Ok(row.map(Client::from))
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Client>> {
        let rows = sqlx::query_as::<_, ClientRow>(&format!(
            "SELECT {} FROM clients ORDER BY name ASC, id ASC LIMIT ? OFFSET ?",
            CLIENT_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to list clients: {}", e)))?;

        Ok(rows.into_iter().map(Client::from).collect())
    }

    /// Look a client up by phone, creating it when unknown.
    ///
    /// The row is locked so a concurrent booking with the same phone waits
    /// instead of inserting a duplicate.
    pub async fn find_or_create_by_phone_with_tx(
        tx: &mut Transaction<'_, MySql>,
        name: &str,
        phone_number: &str,
        address: Option<&str>,
    ) -> Result<Client> {
        let existing = sqlx::query_as::<_, ClientRow>(&format!(
            "SELECT {} FROM clients WHERE phone_number = ? FOR UPDATE",
            CLIENT_COLUMNS
        ))
        .bind(phone_number)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch client: {}", e)))?;

        if let Some(row) = existing {
            return Ok(row.into());
        }

        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            phone_number: phone_number.to_string(),
            address: address.map(str::to_string),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(&format!(
            "INSERT INTO clients ({}) VALUES (?, ?, ?, ?, ?, ?)",
            CLIENT_COLUMNS
        ))
        .bind(&client.id)
        .bind(&client.name)
        .bind(&client.phone_number)
        .bind(&client.address)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            AppError::from_unique_violation(
                e,
                format!("A client with phone '{}' already exists", phone_number),
            )
        })?;

        Ok(client)
    }
}

#[derive(sqlx::FromRow)]
struct ClientRow {
    id: String,
    name: String,
    phone_number: String,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client {
            id: row.id,
            name: row.name,
            phone_number: row.phone_number,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
