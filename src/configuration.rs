use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A catalog entry: a bookable service and its fixed price.
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub name: String,
    pub price: f64,
}

/// A technician guaranteed to exist at bootstrap, with the fixed
/// availability window assigned on every startup.
#[derive(Debug, Clone)]
pub struct SeedTechnician {
    pub name: String,
    pub windows: Vec<(NaiveDate, Vec<String>)>,
}

#[derive(Debug, Clone)]
pub struct SeedClient {
    pub name: String,
    pub phone: String,
}

pub trait Configuration: Clone + 'static {
    fn data_dir(&self) -> PathBuf;
    fn seed_technicians(&self) -> Vec<SeedTechnician>;
    /// Registered at startup when no client records exist yet.
    fn fallback_client(&self) -> Option<SeedClient>;
    /// Menu selection key to service, in selection-key order.
    fn service_catalog(&self) -> BTreeMap<String, Service>;
}
