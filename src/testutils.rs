use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex,
};

use chrono::NaiveDate;

use crate::configuration::{Configuration, SeedClient, SeedTechnician, Service};
use crate::error::StorageError;
use crate::store::{AppointmentRecord, ClientRecord, RecordStore, TechnicianRecord};

pub struct MockRecordStoreInner {
    pub success: AtomicBool,
    pub calls_to_load_clients: AtomicU64,
    pub calls_to_load_technicians: AtomicU64,
    pub calls_to_load_appointments: AtomicU64,
    pub calls_to_append_client: AtomicU64,
    pub calls_to_append_technician: AtomicU64,
    pub calls_to_rewrite_appointments: AtomicU64,
    pub clients: Mutex<Vec<ClientRecord>>,
    pub technicians: Mutex<Vec<TechnicianRecord>>,
    pub appointments: Mutex<Vec<AppointmentRecord>>,
}

#[derive(Clone)]
pub struct MockRecordStore(pub Arc<MockRecordStoreInner>);

impl MockRecordStoreInner {
    fn new() -> Self {
        Self {
            success: AtomicBool::new(true),
            calls_to_load_clients: AtomicU64::default(),
            calls_to_load_technicians: AtomicU64::default(),
            calls_to_load_appointments: AtomicU64::default(),
            calls_to_append_client: AtomicU64::default(),
            calls_to_append_technician: AtomicU64::default(),
            calls_to_rewrite_appointments: AtomicU64::default(),
            clients: Mutex::default(),
            technicians: Mutex::default(),
            appointments: Mutex::default(),
        }
    }
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self(Arc::new(MockRecordStoreInner::new()))
    }

    fn result(&self) -> Result<(), StorageError> {
        match self.0.success.load(Ordering::SeqCst) {
            true => Ok(()),
            false => Err(StorageError::Io(io::Error::new(
                io::ErrorKind::Other,
                "supposed to fail",
            ))),
        }
    }
}

impl RecordStore for MockRecordStore {
    fn load_clients(&self) -> Result<Vec<ClientRecord>, StorageError> {
        self.0.calls_to_load_clients.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(self.0.clients.lock().unwrap().clone())
    }

    fn load_technicians(&self) -> Result<Vec<TechnicianRecord>, StorageError> {
        self.0
            .calls_to_load_technicians
            .fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(self.0.technicians.lock().unwrap().clone())
    }

    fn load_appointments(&self) -> Result<Vec<AppointmentRecord>, StorageError> {
        self.0
            .calls_to_load_appointments
            .fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(self.0.appointments.lock().unwrap().clone())
    }

    fn append_client(&self, record: &ClientRecord) -> Result<(), StorageError> {
        self.0.calls_to_append_client.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        self.0.clients.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn append_technician(&self, record: &TechnicianRecord) -> Result<(), StorageError> {
        self.0
            .calls_to_append_technician
            .fetch_add(1, Ordering::SeqCst);
        self.result()?;
        self.0.technicians.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn rewrite_appointments(&self, records: &[AppointmentRecord]) -> Result<(), StorageError> {
        self.0
            .calls_to_rewrite_appointments
            .fetch_add(1, Ordering::SeqCst);
        self.result()?;
        *self.0.appointments.lock().unwrap() = records.to_vec();
        Ok(())
    }
}

/// The fixed bootstrap fixture: Alice and Bob with their opening-day
/// windows, Cathy Smith as the fallback client, and the four-service
/// catalog.
#[derive(Clone)]
pub struct TestConfiguration;

impl Configuration for TestConfiguration {
    fn data_dir(&self) -> PathBuf {
        PathBuf::from(".")
    }

    fn seed_technicians(&self) -> Vec<SeedTechnician> {
        let opening_day = NaiveDate::from_ymd_opt(2025, 11, 21).unwrap();
        vec![
            SeedTechnician {
                name: "Alice".into(),
                windows: vec![(
                    opening_day,
                    vec!["10:00".into(), "11:00".into(), "15:00".into()],
                )],
            },
            SeedTechnician {
                name: "Bob".into(),
                windows: vec![(opening_day, vec!["14:00".into(), "16:00".into()])],
            },
        ]
    }

    fn fallback_client(&self) -> Option<SeedClient> {
        Some(SeedClient {
            name: "Cathy Smith".into(),
            phone: "555-1234".into(),
        })
    }

    fn service_catalog(&self) -> BTreeMap<String, Service> {
        BTreeMap::from([
            (
                "1".into(),
                Service {
                    name: "Manicure".into(),
                    price: 45.00,
                },
            ),
            (
                "2".into(),
                Service {
                    name: "Pedicure".into(),
                    price: 45.00,
                },
            ),
            (
                "3".into(),
                Service {
                    name: "Gel Manicure".into(),
                    price: 55.00,
                },
            ),
            (
                "4".into(),
                Service {
                    name: "Gel Pedicure".into(),
                    price: 55.00,
                },
            ),
        ])
    }
}
