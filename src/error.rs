use crate::types::AppointmentId;
use chrono::NaiveDate;
use thiserror::Error;

/// Failures surfaced by the booking engine. All are recoverable by the
/// caller; the menu prints them and re-prompts.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Invalid Client or Technician ID")]
    UnknownParty,

    #[error("Invalid date format: {0} (use YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("{technician} is not available at {time} on {date} (already booked or not scheduled)")]
    SlotUnavailable {
        technician: String,
        date: NaiveDate,
        time: String,
    },

    #[error("{technician} is already available at {time} on {date}")]
    AlreadyAvailable {
        technician: String,
        date: NaiveDate,
        time: String,
    },

    #[error("Slot {date} @ {time} not found in {technician}'s availability")]
    NotAvailable {
        technician: String,
        date: NaiveDate,
        time: String,
    },

    #[error("Appointment ID {0} not found or already canceled")]
    UnknownAppointment(AppointmentId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures in the flat-file record store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("record store I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed record: {0}")]
    Csv(#[from] csv::Error),
}
