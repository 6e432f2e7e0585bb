use crate::configuration::{Configuration, SeedClient, SeedTechnician, Service};
use chrono::NaiveDate;
use clap::Parser;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(about = "Nail salon appointment booking system")]
pub struct ConfigurationHandler {
    /// Directory holding the flat-file record stores
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    fn seed_technicians(&self) -> Vec<SeedTechnician> {
        let opening_day = NaiveDate::from_ymd_opt(2025, 11, 21).expect("fixed opening day");
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
