use chrono::Utc;
use sqlx::MySqlPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::appointments::{
    models::{Appointment, AppointmentStatus, BookAppointmentRequest, DateRangeQuery},
    repositories::{AppointmentRepository, SlotRepository},
};
use crate::modules::clients::ClientRepository;

pub struct AppointmentService {
    appointments: AppointmentRepository,
}

impl AppointmentService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            appointments: AppointmentRepository::new(pool),
        }
    }

    /// Book a free slot in one transaction.
    ///
    /// The slot row is locked first, so of two concurrent bookings for the
    /// same slot exactly one succeeds and the other gets a conflict.
    pub async fn book(&self, request: BookAppointmentRequest) -> Result<Appointment> {
        request.validate()?;

        let mut tx = self.appointments.pool().begin().await?;

        let slot = SlotRepository::find_by_id_for_update(&mut tx, &request.slot_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Slot '{}' not found", request.slot_id))
            })?;

        if slot.is_booked {
            warn!(slot_id = slot.id.as_str(), "Slot already booked");
            return Err(AppError::conflict(
                "This slot has just been booked, please pick another one",
            ));
        }

        let client = ClientRepository::find_or_create_by_phone_with_tx(
            &mut tx,
            request.client_name.trim(),
            request.client_phone.trim(),
            request.client_address.as_deref(),
        )
        .await?;

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4().to_string(),
            client_id: client.id.clone(),
            slot_id: slot.id.clone(),
            client_name: request.client_name.trim().to_string(),
            client_phone: request.client_phone.trim().to_string(),
            address: request.client_address.clone(),
            notes: request.notes.clone(),
            start_time: slot.start_time,
            end_time: slot.end_time,
            status: AppointmentStatus::Confirmed,
            created_at: now,
            updated_at: now,
        };

        AppointmentRepository::insert_with_tx(&mut tx, &appointment).await?;
        SlotRepository::book_with_tx(&mut tx, &slot.id, &appointment.id).await?;

        tx.commit().await?;

        info!(
            appointment_id = appointment.id.as_str(),
            slot_id = slot.id.as_str(),
            client_id = client.id.as_str(),
            "Appointment booked"
        );

        Ok(appointment)
    }

    /// Cancel and free the slot; canceling twice returns the appointment unchanged
    pub async fn cancel(&self, id: &str) -> Result<Appointment> {
        let mut tx = self.appointments.pool().begin().await?;

        let mut appointment = AppointmentRepository::find_by_id_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Appointment '{}' not found", id)))?;

        match appointment.status {
            AppointmentStatus::Canceled => {
                tx.rollback().await?;
                return Ok(appointment);
            }
            AppointmentStatus::Completed => {
                return Err(AppError::conflict(format!(
                    "Appointment '{}' is already completed",
                    id
                )));
            }
            AppointmentStatus::Confirmed => {}
        }

        appointment.status = AppointmentStatus::Canceled;
        appointment.updated_at = Utc::now();
        AppointmentRepository::update_status_with_tx(&mut tx, &appointment).await?;
        let released = SlotRepository::release_with_tx(&mut tx, id).await?;

        tx.commit().await?;

        info!(
            appointment_id = id,
            slots_released = released,
            "Appointment canceled"
        );

        Ok(appointment)
    }

    pub async fn confirmed_in_range(&self, range: DateRangeQuery) -> Result<Vec<Appointment>> {
        let (start, end) = range.bounds()?;
        self.appointments.find_confirmed_in_range(start, end).await
    }
}
