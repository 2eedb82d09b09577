use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{AppError, Result};
use crate::modules::clients::models::validate_phone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Confirmed,
    Canceled,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Canceled => "canceled",
            AppointmentStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "canceled" => Ok(AppointmentStatus::Canceled),
            "completed" => Ok(AppointmentStatus::Completed),
            other => Err(format!("Invalid appointment status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: String,
    pub client_id: String,
    pub slot_id: String,
    /// Contact details as given at booking time
    pub client_name: String,
    pub client_phone: String,
    pub address: Option<String>,
    pub notes: Option<String>,
    /// Copied from the slot
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    pub slot_id: String,
    pub client_name: String,
    pub client_phone: String,
    pub client_address: Option<String>,
    pub notes: Option<String>,
}

impl BookAppointmentRequest {
    pub fn validate(&self) -> Result<()> {
        if self.slot_id.trim().is_empty() {
            return Err(AppError::validation("slot_id is required"));
        }
        if self.client_name.trim().is_empty() {
            return Err(AppError::validation("client_name is required"));
        }
        validate_phone(&self.client_phone)
    }
}

#[derive(Debug, Serialize)]
pub struct AppointmentResponse {
    pub id: String,
    pub client_id: String,
    pub slot_id: String,
    pub client_name: String,
    pub client_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub created_at: String,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            client_id: appointment.client_id,
            slot_id: appointment.slot_id,
            client_name: appointment.client_name,
            client_phone: appointment.client_phone,
            address: appointment.address,
            notes: appointment.notes,
            start_time: appointment.start_time.to_rfc3339(),
            end_time: appointment.end_time.to_rfc3339(),
            status: appointment.status.to_string(),
            created_at: appointment.created_at.to_rfc3339(),
        }
    }
}
