pub mod appointment_service;
pub mod availability_service;

pub use appointment_service::AppointmentService;
pub use availability_service::AvailabilityService;
