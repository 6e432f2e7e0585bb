use crate::booking_manager::BookingManager;
use crate::configuration::Configuration;
use crate::configuration_handler::ConfigurationHandler;
use crate::flat_file::FlatFileStore;
use crate::menu::Menu;
use std::io;
use tracing_subscriber::EnvFilter;

mod availability;
mod booking_manager;
mod configuration;
mod configuration_handler;
mod error;
mod flat_file;
mod id_registry;
mod menu;
mod store;
#[cfg(test)]
mod testutils;
mod types;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("########################");
    println!("# Nail Salon Booking   #");
    println!("########################");

    let configuration = ConfigurationHandler::parse_arguments();
    let store = FlatFileStore::new(configuration.data_dir());
    let mut manager = BookingManager::load(store, &configuration)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut menu = Menu::new(
        &mut manager,
        configuration.service_catalog(),
        stdin.lock(),
        stdout.lock(),
    );
    menu.run()?;
    Ok(())
}
