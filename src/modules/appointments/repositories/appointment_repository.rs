use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::appointments::models::{Appointment, AppointmentStatus};

const APPOINTMENT_COLUMNS: &str = "id, client_id, slot_id, client_name, client_phone, address, \
     notes, start_time, end_time, status, created_at, updated_at";

/// Repository for appointments
#[derive(Clone)]
pub struct AppointmentRepository {
    pool: MySqlPool,
}

impl AppointmentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub async fn insert_with_tx(
        tx: &mut Transaction<'_, MySql>,
        appointment: &Appointment,
    ) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO appointments ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            APPOINTMENT_COLUMNS
        ))
        .bind(&appointment.id)
        .bind(&appointment.client_id)
        .bind(&appointment.slot_id)
        .bind(&appointment.client_name)
        .bind(&appointment.client_phone)
        .bind(&appointment.address)
        .bind(&appointment.notes)
        .bind(appointment.start_time)
        .bind(appointment.end_time)
        .bind(appointment.status.as_str())
        .bind(appointment.created_at)
        .bind(appointment.updated_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to insert appointment: {}", e)))?;

        Ok(())
    }

    pub async fn find_by_id_for_update(
        tx: &mut Transaction<'_, MySql>,
        id: &str,
    ) -> Result<Option<Appointment>> {
        let row = sqlx::query_as::<_, AppointmentRow>(&format!(
            "SELECT {} FROM appointments WHERE id = ? FOR UPDATE",
            APPOINTMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch appointment: {}", e)))?;

        row.map(Appointment::try_from).transpose()
    }

    pub async fn update_status_with_tx(
        tx: &mut Transaction<'_, MySql>,
        appointment: &Appointment,
    ) -> Result<()> {
        sqlx::query("UPDATE appointments SET status = ?, updated_at = ? WHERE id = ?")
            .bind(appointment.status.as_str())
            .bind(appointment.updated_at)
            .bind(&appointment.id)
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to update appointment: {}", e)))?;

        Ok(())
    }

    /// Confirmed appointments starting in `[start, end)`, soonest first
    pub async fn find_confirmed_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            "SELECT {} FROM appointments \
             WHERE status = ? AND start_time >= ? AND start_time < ? \
             ORDER BY start_time ASC",
            APPOINTMENT_COLUMNS
        ))
        .bind(AppointmentStatus::Confirmed.as_str())
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch appointments: {}", e)))?;

        rows.into_iter().map(Appointment::try_from).collect()
    }
}

#[derive(sqlx::FromRow)]
struct AppointmentRow {
    id: String,
    client_id: String,
    slot_id: String,
    client_name: String,
    client_phone: String,
    address: Option<String>,
    notes: Option<String>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = AppError;

    fn try_from(row: AppointmentRow) -> Result<Self> {
        let status = row
            .status
            .parse::<AppointmentStatus>()
            .map_err(AppError::Internal)?;

        Ok(Appointment {
            id: row.id,
            client_id: row.client_id,
            slot_id: row.slot_id,
            client_name: row.client_name,
            client_phone: row.client_phone,
            address: row.address,
            notes: row.notes,
            start_time: row.start_time,
            end_time: row.end_time,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
