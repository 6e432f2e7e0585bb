use crate::availability::{Availability, ScheduleLog};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClientId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TechnicianId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AppointmentId(pub u32);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

impl fmt::Display for TechnicianId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub phone: String,
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.id, self.name)
    }
}

/// A technician together with the two date-keyed views of their calendar:
/// slots still open for booking, and appointments already taken.
#[derive(Debug, Clone)]
pub struct Technician {
    pub id: TechnicianId,
    pub name: String,
    pub availability: Availability,
    pub schedule: ScheduleLog,
}

impl Technician {
    pub fn new(id: TechnicianId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            availability: Availability::default(),
            schedule: ScheduleLog::default(),
        }
    }
}

impl fmt::Display for Technician {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.id, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Booked,
    Canceled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Booked => write!(f, "Booked"),
            AppointmentStatus::Canceled => write!(f, "Canceled"),
        }
    }
}

/// A booking instance. References its parties by id; canceled records are
/// kept for history and never deleted.
#[derive(Debug, Clone)]
pub struct Appointment {
    pub id: AppointmentId,
    pub date: NaiveDate,
    pub time: String,
    pub client_id: ClientId,
    pub technician_id: TechnicianId,
    pub service: String,
    pub price: f64,
    pub status: AppointmentStatus,
}
