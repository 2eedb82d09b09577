// Appointments: bookable availability slots and client appointments

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Appointment, AppointmentStatus, AvailabilitySlot};
pub use services::{AppointmentService, AvailabilityService};
