mod appointment;
mod availability_slot;

pub use appointment::{
    Appointment, AppointmentResponse, AppointmentStatus, BookAppointmentRequest,
};
pub use availability_slot::{
    start_of_day, AvailabilitySlot, CreateSlotsRequest, DateRangeQuery, DayQuery, MonthQuery,
    SlotRequest, SlotResponse, MAX_SLOT_BATCH,
};
