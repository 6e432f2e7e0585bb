use crate::error::StorageError;
use crate::store::{AppointmentRecord, ClientRecord, RecordStore, TechnicianRecord};
use csv::{ReaderBuilder, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use tracing::debug;

pub const CLIENTS_FILE: &str = "clients.txt";
pub const TECHNICIANS_FILE: &str = "technicians.txt";
pub const APPOINTMENTS_FILE: &str = "appointments.txt";

/// Flat-file record store: one CSV file per record kind inside a data
/// directory. A missing file reads as an empty store.
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    data_dir: PathBuf,
}

impl FlatFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    fn load<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, StorageError> {
        let path = self.path(file);
        if !path.exists() {
            debug!(?path, "record file missing, loading empty store");
            return Ok(Vec::new());
        }
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(BufReader::new(File::open(&path)?));
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }
        Ok(records)
    }

    /// Appends one record, writing the header row first only when the file
    /// is missing or empty.
    fn append<T: Serialize>(
        &self,
        file: &str,
        header: &[&str],
        record: &T,
    ) -> Result<(), StorageError> {
        let path = self.path(file);
        let needs_header = !path.exists() || path.metadata()?.len() == 0;
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));
        if needs_header {
            writer.write_record(header)?;
        }
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }
}

impl RecordStore for FlatFileStore {
    fn load_clients(&self) -> Result<Vec<ClientRecord>, StorageError> {
        self.load(CLIENTS_FILE)
    }

    fn load_technicians(&self) -> Result<Vec<TechnicianRecord>, StorageError> {
        self.load(TECHNICIANS_FILE)
    }

    fn load_appointments(&self) -> Result<Vec<AppointmentRecord>, StorageError> {
        self.load(APPOINTMENTS_FILE)
    }

    fn append_client(&self, record: &ClientRecord) -> Result<(), StorageError> {
        self.append(CLIENTS_FILE, &ClientRecord::HEADER, record)
    }

    fn append_technician(&self, record: &TechnicianRecord) -> Result<(), StorageError> {
        self.append(TECHNICIANS_FILE, &TechnicianRecord::HEADER, record)
    }

    /// Full overwrite with header. Written to a temporary file first and
    /// renamed into place, so a crash mid-write leaves the previous file
    /// intact rather than a truncated one.
    fn rewrite_appointments(&self, records: &[AppointmentRecord]) -> Result<(), StorageError> {
        let path = self.path(APPOINTMENTS_FILE);
        let temp_path = path.with_extension("tmp");
        {
            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .from_writer(BufWriter::new(File::create(&temp_path)?));
            writer.write_record(&AppointmentRecord::HEADER)?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::{AppointmentId, AppointmentStatus, ClientId, TechnicianId};
    use tempfile::TempDir;

    fn client_record(id: u32, name: &str) -> ClientRecord {
        ClientRecord {
            client_id: ClientId(id),
            name: name.into(),
            phone: "555-1234".into(),
        }
    }

    fn appointment_record(id: u32, status: AppointmentStatus) -> AppointmentRecord {
        AppointmentRecord {
            appt_id: AppointmentId(id),
            date: "2025-11-21".into(),
            time: "10:00".into(),
            client_id: ClientId(101),
            tech_id: TechnicianId(201),
            service: "Manicure".into(),
            price: "45.00".into(),
            status,
        }
    }

    #[test]
    fn missing_files_load_as_empty_stores() {
        let temp_dir = TempDir::new().unwrap();
        let store = FlatFileStore::new(temp_dir.path());

        assert!(store.load_clients().unwrap().is_empty());
        assert!(store.load_technicians().unwrap().is_empty());
        assert!(store.load_appointments().unwrap().is_empty());
    }

    #[test]
    fn append_writes_header_exactly_once() {
        let temp_dir = TempDir::new().unwrap();
        let store = FlatFileStore::new(temp_dir.path());

        store.append_client(&client_record(101, "Cathy Smith")).unwrap();
        store.append_client(&client_record(102, "Dana Jones")).unwrap();

        let raw = fs::read_to_string(temp_dir.path().join(CLIENTS_FILE)).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "client_id,name,phone");
        assert_eq!(lines[1], "101,Cathy Smith,555-1234");

        let loaded = store.load_clients().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], client_record(101, "Cathy Smith"));
        assert_eq!(loaded[1], client_record(102, "Dana Jones"));
    }

    #[test]
    fn append_technician_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let store = FlatFileStore::new(temp_dir.path());

        let record = TechnicianRecord {
            tech_id: TechnicianId(201),
            name: "Alice".into(),
        };
        store.append_technician(&record).unwrap();

        assert_eq!(store.load_technicians().unwrap(), vec![record]);
    }

    #[test]
    fn rewrite_appointments_replaces_previous_contents() {
        let temp_dir = TempDir::new().unwrap();
        let store = FlatFileStore::new(temp_dir.path());

        store
            .rewrite_appointments(&[
                appointment_record(3001, AppointmentStatus::Booked),
                appointment_record(3002, AppointmentStatus::Booked),
            ])
            .unwrap();
        assert_eq!(store.load_appointments().unwrap().len(), 2);

        let canceled = appointment_record(3001, AppointmentStatus::Canceled);
        store.rewrite_appointments(&[canceled.clone()]).unwrap();

        let loaded = store.load_appointments().unwrap();
        assert_eq!(loaded, vec![canceled]);
    }

    #[test]
    fn rewrite_with_no_records_still_writes_the_header() {
        let temp_dir = TempDir::new().unwrap();
        let store = FlatFileStore::new(temp_dir.path());

        store.rewrite_appointments(&[]).unwrap();

        let raw = fs::read_to_string(temp_dir.path().join(APPOINTMENTS_FILE)).unwrap();
        assert_eq!(
            raw.lines().collect::<Vec<_>>(),
            vec!["appt_id,date,time,client_id,tech_id,service,price,status"]
        );
        assert!(store.load_appointments().unwrap().is_empty());
    }

    #[test]
    fn booking_state_reconstructs_through_flat_files() {
        use crate::booking_manager::BookingManager;
        use crate::testutils::TestConfiguration;

        let temp_dir = TempDir::new().unwrap();

        let mut manager =
            BookingManager::load(FlatFileStore::new(temp_dir.path()), &TestConfiguration).unwrap();
        let cathy = manager.clients().next().unwrap().id;
        let alice = manager
            .technicians()
            .find(|t| t.name == "Alice")
            .unwrap()
            .id;
        let appointment = manager
            .book_appointment(cathy, alice, "2025-11-21", "10:00", "Manicure", 45.0)
            .unwrap();
        drop(manager);

        let reloaded =
            BookingManager::load(FlatFileStore::new(temp_dir.path()), &TestConfiguration).unwrap();
        let alice = reloaded
            .technicians()
            .find(|t| t.name == "Alice")
            .unwrap();
        let day = chrono::NaiveDate::from_ymd_opt(2025, 11, 21).unwrap();
        let times: Vec<&str> = alice.availability.open_times(day).collect();
        assert_eq!(times, vec!["11:00", "15:00"]);
        assert_eq!(
            reloaded.appointment(appointment.id).unwrap().status,
            AppointmentStatus::Booked
        );
        // No re-registration of the seeded entities on the second boot.
        assert_eq!(reloaded.clients().count(), 1);
        assert_eq!(reloaded.technicians().count(), 2);
    }

    #[test]
    fn records_survive_a_new_store_instance() {
        let temp_dir = TempDir::new().unwrap();

        let store = FlatFileStore::new(temp_dir.path());
        store.append_client(&client_record(101, "Cathy Smith")).unwrap();
        store
            .rewrite_appointments(&[appointment_record(3001, AppointmentStatus::Booked)])
            .unwrap();
        drop(store);

        let reopened = FlatFileStore::new(temp_dir.path());
        assert_eq!(reopened.load_clients().unwrap().len(), 1);
        let appointments = reopened.load_appointments().unwrap();
        assert_eq!(appointments.len(), 1);
        assert_eq!(appointments[0].price, "45.00");
        assert_eq!(appointments[0].status, AppointmentStatus::Booked);
    }
}
