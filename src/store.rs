use crate::error::StorageError;
use crate::types::{Appointment, AppointmentId, AppointmentStatus, ClientId, TechnicianId};
use serde::{Deserialize, Serialize};

/// The durable record store behind the booking manager. Clients and
/// technicians are append-only; the appointment file is rewritten in full
/// after every mutation because cancellation flips the status of records
/// already on disk.
pub trait RecordStore {
    fn load_clients(&self) -> Result<Vec<ClientRecord>, StorageError>;
    fn load_technicians(&self) -> Result<Vec<TechnicianRecord>, StorageError>;
    fn load_appointments(&self) -> Result<Vec<AppointmentRecord>, StorageError>;
    fn append_client(&self, record: &ClientRecord) -> Result<(), StorageError>;
    fn append_technician(&self, record: &TechnicianRecord) -> Result<(), StorageError>;
    fn rewrite_appointments(&self, records: &[AppointmentRecord]) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub client_id: ClientId,
    pub name: String,
    pub phone: String,
}

impl ClientRecord {
    pub const HEADER: [&'static str; 3] = ["client_id", "name", "phone"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicianRecord {
    pub tech_id: TechnicianId,
    pub name: String,
}

impl TechnicianRecord {
    pub const HEADER: [&'static str; 2] = ["tech_id", "name"];
}

/// On-disk appointment row. Dates and prices travel as strings: the date in
/// its `YYYY-MM-DD` form, the price formatted to two decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub appt_id: AppointmentId,
    pub date: String,
    pub time: String,
    pub client_id: ClientId,
    pub tech_id: TechnicianId,
    pub service: String,
    pub price: String,
    pub status: AppointmentStatus,
}

impl AppointmentRecord {
    pub const HEADER: [&'static str; 8] = [
        "appt_id", "date", "time", "client_id", "tech_id", "service", "price", "status",
    ];
}

impl From<&Appointment> for AppointmentRecord {
    fn from(appointment: &Appointment) -> Self {
        Self {
            appt_id: appointment.id,
            date: appointment.date.format("%Y-%m-%d").to_string(),
            time: appointment.time.clone(),
            client_id: appointment.client_id,
            tech_id: appointment.technician_id,
            service: appointment.service.clone(),
            price: format!("{:.2}", appointment.price),
            status: appointment.status,
        }
    }
}
