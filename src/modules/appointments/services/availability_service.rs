use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use sqlx::MySqlPool;
use tracing::info;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::appointments::{
    models::{start_of_day, AvailabilitySlot, CreateSlotsRequest, DateRangeQuery, MonthQuery},
    repositories::SlotRepository,
};

/// Service for the bookable agenda
pub struct AvailabilityService {
    slots: SlotRepository,
}

impl AvailabilityService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            slots: SlotRepository::new(pool),
        }
    }

    pub async fn create_slots(&self, request: CreateSlotsRequest) -> Result<Vec<AvailabilitySlot>> {
        request.validate()?;

        let now = Utc::now();
        let slots: Vec<AvailabilitySlot> = request
            .slots
            .iter()
            .map(|s| AvailabilitySlot {
                id: Uuid::new_v4().to_string(),
                start_time: s.start_time,
                end_time: s.end_time,
                is_booked: false,
                appointment_id: None,
                created_at: now,
            })
            .collect();

        self.slots.create_batch(&slots).await?;
        info!(count = slots.len(), "Availability slots created");

        Ok(slots)
    }

    /// Booked slots cannot be removed
    pub async fn delete_slot(&self, id: &str) -> Result<()> {
        let slot = self
            .slots
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Slot '{}' not found", id)))?;

        if slot.is_booked || !self.slots.delete_unbooked(id).await? {
            return Err(AppError::conflict(format!(
                "Slot '{}' is booked and cannot be removed",
                id
            )));
        }

        info!(slot_id = id, "Availability slot removed");
        Ok(())
    }

    /// Every slot, booked or free, in an inclusive day range
    pub async fn slots_in_range(&self, range: DateRangeQuery) -> Result<Vec<AvailabilitySlot>> {
        let (start, end) = range.bounds()?;
        self.slots.find_in_range(start, end).await
    }

    pub async fn slots_of_day(&self, date: NaiveDate) -> Result<Vec<AvailabilitySlot>> {
        let next = date
            .succ_opt()
            .ok_or_else(|| AppError::validation("date is out of range"))?;
        self.slots
            .find_in_range(start_of_day(date), start_of_day(next))
            .await
    }

    /// Days of the month, from today on, that still have a free slot
    pub async fn available_days(&self, month: MonthQuery) -> Result<Vec<NaiveDate>> {
        let Some((start, end)) = month.open_window(Utc::now().date_naive())? else {
            return Ok(Vec::new());
        };

        let days: BTreeSet<NaiveDate> = self
            .slots
            .free_start_times(start, end)
            .await?
            .into_iter()
            .map(|t| t.date_naive())
            .collect();

        Ok(days.into_iter().collect())
    }
}
