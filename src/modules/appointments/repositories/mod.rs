mod appointment_repository;
mod slot_repository;

pub use appointment_repository::AppointmentRepository;
pub use slot_repository::SlotRepository;
