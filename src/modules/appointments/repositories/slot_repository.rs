use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool, QueryBuilder, Transaction};
use tracing::debug;

use crate::core::{AppError, Result};
use crate::modules::appointments::models::AvailabilitySlot;

const SLOT_COLUMNS: &str = "id, start_time, end_time, is_booked, appointment_id, created_at";

/// Repository for availability_slots
#[derive(Clone)]
pub struct SlotRepository {
    pool: MySqlPool,
}

impl SlotRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create_batch(&self, slots: &[AvailabilitySlot]) -> Result<()> {
        if slots.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<MySql> =
            QueryBuilder::new(format!("INSERT INTO availability_slots ({}) ", SLOT_COLUMNS));
        builder.push_values(slots, |mut row, slot| {
            row.push_bind(&slot.id)
                .push_bind(slot.start_time)
                .push_bind(slot.end_time)
                .push_bind(slot.is_booked)
                .push_bind(&slot.appointment_id)
                .push_bind(slot.created_at);
        });

        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create slots: {}", e)))?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<AvailabilitySlot>> {
        let row = sqlx::query_as::<_, SlotRow>(&format!(
            "SELECT {} FROM availability_slots WHERE id = ?",
            SLOT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch slot: {}", e)))?;

        Ok(row.map(AvailabilitySlot::from))
    }

    /// Delete only while still free; returns whether a row went away
    pub async fn delete_unbooked(&self, id: &str) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM availability_slots WHERE id = ? AND is_booked = FALSE")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to delete slot: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    /// Slots starting in `[start, end)`, booked or not
    pub async fn find_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AvailabilitySlot>> {
        debug!(start = %start, end = %end, "Loading slots in range");

        let rows = sqlx::query_as::<_, SlotRow>(&format!(
            "SELECT {} FROM availability_slots \
             WHERE start_time >= ? AND start_time < ? \
             ORDER BY start_time ASC",
            SLOT_COLUMNS
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch slots: {}", e)))?;

        Ok(rows.into_iter().map(AvailabilitySlot::from).collect())
    }

    /// Start times of free slots in `[start, end)`
    pub async fn free_start_times(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>> {
        sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            SELECT start_time FROM availability_slots
            WHERE is_booked = FALSE AND start_time >= ? AND start_time < ?
            ORDER BY start_time ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch free slots: {}", e)))
    }

    pub async fn find_by_id_for_update(
        tx: &mut Transaction<'_, MySql>,
        id: &str,
    ) -> Result<Option<AvailabilitySlot>> {
        let row = sqlx::query_as::<_, SlotRow>(&format!(
            "SELECT {} FROM availability_slots WHERE id = ? FOR UPDATE",
            SLOT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to lock slot: {}", e)))?;

        Ok(row.map(AvailabilitySlot::from))
    }

    pub async fn book_with_tx(
        tx: &mut Transaction<'_, MySql>,
        slot_id: &str,
        appointment_id: &str,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE availability_slots SET is_booked = TRUE, appointment_id = ? WHERE id = ?",
        )
        .bind(appointment_id)
        .bind(slot_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to book slot: {}", e)))?;

        Ok(())
    }

    /// Free whatever slot holds the appointment
    pub async fn release_with_tx(
        tx: &mut Transaction<'_, MySql>,
        appointment_id: &str,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE availability_slots
            SET is_booked = FALSE, appointment_id = NULL
            WHERE appointment_id = ?
            "#,
        )
        .bind(appointment_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to release slot: {}", e)))?;

        Ok(result.rows_affected())
    }
}

#[derive(sqlx::FromRow)]
struct SlotRow {
    id: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    is_booked: bool,
    appointment_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<SlotRow> for AvailabilitySlot {
    fn from(row: SlotRow) -> Self {
        AvailabilitySlot {
            id: row.id,
            start_time: row.start_time,
            end_time: row.end_time,
            is_booked: row.is_booked,
            appointment_id: row.appointment_id,
            created_at: row.created_at,
        }
    }
}
