use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// Largest batch accepted by one create call
pub const MAX_SLOT_BATCH: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilitySlot {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_booked: bool,
    pub appointment_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlotRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSlotsRequest {
    #[serde(default)]
    pub slots: Vec<SlotRequest>,
}

impl CreateSlotsRequest {
    pub fn validate(&self) -> Result<()> {
        if self.slots.is_empty() {
            return Err(AppError::validation("slots must contain at least one slot"));
        }
        if self.slots.len() > MAX_SLOT_BATCH {
            return Err(AppError::validation(format!(
                "At most {} slots can be created at once",
                MAX_SLOT_BATCH
            )));
        }
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.end_time <= slot.start_time {
                return Err(AppError::validation(format!(
                    "slots[{}]: end_time ({}) must be after start_time ({})",
                    index,
                    slot.end_time.to_rfc3339(),
                    slot.start_time.to_rfc3339()
                )));
            }
        }
        Ok(())
    }
}

/// Inclusive range of whole UTC days
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRangeQuery {
    /// Half-open instant bounds: start of first day to start of the day after the last
    pub fn bounds(&self) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        if self.start_date > self.end_date {
            return Err(AppError::validation("start_date must not be after end_date"));
        }
        let end = self
            .end_date
            .succ_opt()
            .ok_or_else(|| AppError::validation("end_date is out of range"))?;
        Ok((start_of_day(self.start_date), start_of_day(end)))
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DayQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

impl MonthQuery {
    /// Window of the month still open for booking, counted from `today`.
    ///
    /// `None` when the whole month is already past.
    pub fn open_window(&self, today: NaiveDate) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>> {
        let first = if (1..=12).contains(&self.month) && self.year >= 1970 {
            NaiveDate::from_ymd_opt(self.year, self.month, 1)
        } else {
            None
        }
        .ok_or_else(|| AppError::validation("Invalid year or month"))?;

        let next = if first.month() == 12 {
            NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
        }
        .ok_or_else(|| AppError::validation("Invalid year or month"))?;

        let start = first.max(today);
        if start >= next {
            return Ok(None);
        }
        Ok(Some((start_of_day(start), start_of_day(next))))
    }
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

#[derive(Debug, Serialize)]
pub struct SlotResponse {
    pub id: String,
    pub start_time: String,
    pub end_time: String,
    pub is_booked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
}

impl From<AvailabilitySlot> for SlotResponse {
    fn from(slot: AvailabilitySlot) -> Self {
        Self {
            id: slot.id,
            start_time: slot.start_time.to_rfc3339(),
            end_time: slot.end_time.to_rfc3339(),
            is_booked: slot.is_booked,
            appointment_id: slot.appointment_id,
        }
    }
}
