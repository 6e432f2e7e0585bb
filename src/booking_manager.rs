use crate::configuration::Configuration;
use crate::error::{BookingError, StorageError};
use crate::id_registry::IdRegistry;
use crate::store::{AppointmentRecord, ClientRecord, RecordStore, TechnicianRecord};
use crate::types::{
    Appointment, AppointmentId, AppointmentStatus, Client, ClientId, Technician, TechnicianId,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Owns all booking state and implements the business logic. The
/// availability ledger is the single source of truth for "is this
/// technician free"; it and the schedule log mutate only together, inside
/// `book_appointment` and `cancel_appointment`.
#[derive(Debug)]
pub struct BookingManager<S> {
    clients: BTreeMap<ClientId, Client>,
    technicians: BTreeMap<TechnicianId, Technician>,
    appointments: BTreeMap<AppointmentId, Appointment>,
    ids: IdRegistry,
    store: S,
}

/// One bookable opening, as reported by `find_open_slots`.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenSlot {
    pub technician_id: TechnicianId,
    pub technician_name: String,
    pub date: NaiveDate,
    pub time: String,
}

#[derive(Debug, Clone)]
pub struct CancelOutcome {
    pub appointment: Appointment,
    /// False when the slot was independently re-opened before cancellation
    /// and no restoration was needed.
    pub slot_restored: bool,
}

fn parse_date(date: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| BookingError::InvalidDate(date.to_string()))
}

impl<S: RecordStore> BookingManager<S> {
    /// Rebuilds the full in-memory state from persisted records: entities
    /// first, then the fixed seed availability windows, then every surviving
    /// appointment subtracts its slot (Booked only; a Canceled appointment's
    /// slot was already restored before it was persisted).
    pub fn load(store: S, configuration: &impl Configuration) -> Result<Self, StorageError> {
        let mut manager = Self {
            clients: BTreeMap::new(),
            technicians: BTreeMap::new(),
            appointments: BTreeMap::new(),
            ids: IdRegistry::default(),
            store,
        };
        manager.load_client_records()?;
        manager.load_technician_records()?;
        manager.apply_seed_technicians(configuration)?;
        manager.load_appointment_records()?;
        if manager.clients.is_empty() {
            if let Some(seed) = configuration.fallback_client() {
                manager.register_client(&seed.name, &seed.phone)?;
            }
        }
        Ok(manager)
    }

    fn load_client_records(&mut self) -> Result<(), StorageError> {
        let records = self.store.load_clients()?;
        let count = records.len();
        for record in records {
            self.ids.observe_client(record.client_id);
            self.clients.insert(
                record.client_id,
                Client {
                    id: record.client_id,
                    name: record.name,
                    phone: record.phone,
                },
            );
        }
        info!(count, "loaded client records");
        Ok(())
    }

    fn load_technician_records(&mut self) -> Result<(), StorageError> {
        let records = self.store.load_technicians()?;
        let count = records.len();
        for record in records {
            self.ids.observe_technician(record.tech_id);
            self.technicians
                .insert(record.tech_id, Technician::new(record.tech_id, record.name));
        }
        info!(count, "loaded technician records");
        Ok(())
    }

    /// Guarantees the configured technicians exist and resets their ledgers
    /// to the fixed seed window before appointments subtract from it.
    fn apply_seed_technicians(
        &mut self,
        configuration: &impl Configuration,
    ) -> Result<(), StorageError> {
        for seed in configuration.seed_technicians() {
            let existing = self
                .technicians
                .values()
                .find(|technician| technician.name == seed.name)
                .map(|technician| technician.id);
            let id = match existing {
                Some(id) => id,
                None => self.register_technician(&seed.name)?.id,
            };
            if let Some(technician) = self.technicians.get_mut(&id) {
                technician.availability.clear();
                for (date, times) in &seed.windows {
                    for time in times {
                        technician.availability.add_slot(*date, time);
                    }
                }
            }
        }
        Ok(())
    }

    fn load_appointment_records(&mut self) -> Result<(), StorageError> {
        let records = self.store.load_appointments()?;
        let mut count = 0usize;
        for record in records {
            if !self.clients.contains_key(&record.client_id)
                || !self.technicians.contains_key(&record.tech_id)
            {
                warn!(
                    appointment = %record.appt_id,
                    "skipping appointment record: linked client or technician not found"
                );
                continue;
            }
            let Ok(date) = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d") else {
                warn!(
                    appointment = %record.appt_id,
                    date = %record.date,
                    "skipping appointment record: malformed date"
                );
                continue;
            };
            let appointment = Appointment {
                id: record.appt_id,
                date,
                time: record.time,
                client_id: record.client_id,
                technician_id: record.tech_id,
                service: record.service,
                price: record.price.parse().unwrap_or(0.0),
                status: record.status,
            };
            self.ids.observe_appointment(appointment.id);
            if let Some(technician) = self.technicians.get_mut(&appointment.technician_id) {
                technician.schedule.append(date, appointment.id);
                if appointment.status == AppointmentStatus::Booked {
                    technician.availability.remove_slot(date, &appointment.time);
                }
            }
            self.appointments.insert(appointment.id, appointment);
            count += 1;
        }
        info!(count, "loaded appointment records");
        Ok(())
    }

    pub fn register_client(&mut self, name: &str, phone: &str) -> Result<Client, StorageError> {
        let client = Client {
            id: self.ids.next_client(),
            name: name.to_string(),
            phone: phone.to_string(),
        };
        self.clients.insert(client.id, client.clone());
        self.store.append_client(&ClientRecord {
            client_id: client.id,
            name: client.name.clone(),
            phone: client.phone.clone(),
        })?;
        info!(id = %client.id, "registered client");
        Ok(client)
    }

    pub fn register_technician(&mut self, name: &str) -> Result<Technician, StorageError> {
        let technician = Technician::new(self.ids.next_technician(), name);
        self.technicians.insert(technician.id, technician.clone());
        self.store.append_technician(&TechnicianRecord {
            tech_id: technician.id,
            name: technician.name.clone(),
        })?;
        info!(id = %technician.id, "registered technician");
        Ok(technician)
    }

    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(&id)
    }

    pub fn technician(&self, id: TechnicianId) -> Option<&Technician> {
        self.technicians.get(&id)
    }

    pub fn appointment(&self, id: AppointmentId) -> Option<&Appointment> {
        self.appointments.get(&id)
    }

    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    pub fn technicians(&self) -> impl Iterator<Item = &Technician> {
        self.technicians.values()
    }

    pub fn appointments(&self) -> impl Iterator<Item = &Appointment> {
        self.appointments.values()
    }

    pub fn client_appointments(&self, client_id: ClientId) -> impl Iterator<Item = &Appointment> {
        self.appointments
            .values()
            .filter(move |appointment| appointment.client_id == client_id)
    }

    /// Books the slot if it is open. Validates everything before the first
    /// mutation; after mutation the new state is rewritten to the store.
    pub fn book_appointment(
        &mut self,
        client_id: ClientId,
        technician_id: TechnicianId,
        date: &str,
        time: &str,
        service: &str,
        price: f64,
    ) -> Result<Appointment, BookingError> {
        if !self.clients.contains_key(&client_id) || !self.technicians.contains_key(&technician_id)
        {
            return Err(BookingError::UnknownParty);
        }
        let date = parse_date(date)?;
        let technician = self
            .technicians
            .get(&technician_id)
            .ok_or(BookingError::UnknownParty)?;
        if !technician.availability.is_open(date, time) {
            return Err(BookingError::SlotUnavailable {
                technician: technician.name.clone(),
                date,
                time: time.to_string(),
            });
        }

        let appointment = Appointment {
            id: self.ids.next_appointment(),
            date,
            time: time.to_string(),
            client_id,
            technician_id,
            service: service.to_string(),
            price,
            status: AppointmentStatus::Booked,
        };
        if let Some(technician) = self.technicians.get_mut(&technician_id) {
            technician.schedule.append(date, appointment.id);
            technician.availability.remove_slot(date, time);
        }
        self.appointments
            .insert(appointment.id, appointment.clone());
        self.persist_appointments()?;
        info!(
            id = %appointment.id,
            client = %client_id,
            technician = %technician_id,
            "appointment booked"
        );
        Ok(appointment)
    }

    /// Cancels a booked appointment, keeping its record for history, and
    /// restores the slot unless the technician already re-opened it.
    /// A second cancellation of the same id is rejected.
    pub fn cancel_appointment(
        &mut self,
        appointment_id: AppointmentId,
    ) -> Result<CancelOutcome, BookingError> {
        let appointment = match self.appointments.get_mut(&appointment_id) {
            Some(appointment) if appointment.status == AppointmentStatus::Booked => {
                appointment.status = AppointmentStatus::Canceled;
                appointment.clone()
            }
            _ => return Err(BookingError::UnknownAppointment(appointment_id)),
        };
        self.persist_appointments()?;

        let mut slot_restored = false;
        if let Some(technician) = self.technicians.get_mut(&appointment.technician_id) {
            technician.schedule.remove(appointment.date, appointment_id);
            slot_restored = technician
                .availability
                .add_slot(appointment.date, &appointment.time);
        }
        info!(id = %appointment_id, slot_restored, "appointment canceled");
        Ok(CancelOutcome {
            appointment,
            slot_restored,
        })
    }

    /// Every open slot across all technicians on one date, technicians in
    /// id order and times ascending. Pure read.
    pub fn find_open_slots(&self, date: &str) -> Result<Vec<OpenSlot>, BookingError> {
        let date = parse_date(date)?;
        let mut open_slots = Vec::new();
        for technician in self.technicians.values() {
            for time in technician.availability.open_times(date) {
                open_slots.push(OpenSlot {
                    technician_id: technician.id,
                    technician_name: technician.name.clone(),
                    date,
                    time: time.to_string(),
                });
            }
        }
        Ok(open_slots)
    }

    pub fn technician_add_slot(
        &mut self,
        technician_id: TechnicianId,
        date: &str,
        time: &str,
    ) -> Result<(), BookingError> {
        if !self.technicians.contains_key(&technician_id) {
            return Err(BookingError::UnknownParty);
        }
        let date = parse_date(date)?;
        let technician = self
            .technicians
            .get_mut(&technician_id)
            .ok_or(BookingError::UnknownParty)?;
        if !technician.availability.add_slot(date, time) {
            return Err(BookingError::AlreadyAvailable {
                technician: technician.name.clone(),
                date,
                time: time.to_string(),
            });
        }
        Ok(())
    }

    pub fn technician_remove_slot(
        &mut self,
        technician_id: TechnicianId,
        date: &str,
        time: &str,
    ) -> Result<(), BookingError> {
        if !self.technicians.contains_key(&technician_id) {
            return Err(BookingError::UnknownParty);
        }
        let date = parse_date(date)?;
        let technician = self
            .technicians
            .get_mut(&technician_id)
            .ok_or(BookingError::UnknownParty)?;
        if !technician.availability.remove_slot(date, time) {
            return Err(BookingError::NotAvailable {
                technician: technician.name.clone(),
                date,
                time: time.to_string(),
            });
        }
        Ok(())
    }

    fn persist_appointments(&self) -> Result<(), StorageError> {
        let records: Vec<AppointmentRecord> =
            self.appointments.values().map(AppointmentRecord::from).collect();
        self.store.rewrite_appointments(&records)
    }
}
