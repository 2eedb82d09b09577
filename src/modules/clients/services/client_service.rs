use chrono::Utc;
use sqlx::MySqlPool;
use tracing::info;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::clients::{
    models::{Client, CreateClientRequest},
    repositories::ClientRepository,
};

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

pub struct ClientService {
    repository: ClientRepository,
}

impl ClientService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            repository: ClientRepository::new(pool),
        }
    }

    pub async fn create_client(&self, request: CreateClientRequest) -> Result<Client> {
        request.validate()?;

        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4().to_string(),
            name: request.name.trim().to_string(),
            phone_number: request.phone_number.trim().to_string(),
            address: request.address,
            created_at: now,
            updated_at: now,
        };
        self.repository.create(&client).await?;

        info!(client_id = client.id.as_str(), "Client created");
        Ok(client)
    }

    pub async fn get_client(&self, id: &str) -> Result<Client> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Client '{}' not found", id)))
    }

    pub async fn list_clients(&self, limit: Option<i64>, offset: Option<i64>) -> Result<Vec<Client>> {
        let offset = offset.unwrap_or(0);
        if offset < 0 {
            return Err(AppError::validation("offset cannot be negative"));
        }
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        self.repository.list(limit, offset).await
    }
}
