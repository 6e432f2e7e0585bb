use crate::booking_manager::BookingManager;
use crate::configuration::Service;
use crate::store::RecordStore;
use crate::types::{Appointment, AppointmentId, AppointmentStatus, ClientId, TechnicianId};
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

/// The interactive dialogue flow. Strictly request/response over one
/// input/output pair; every invalid entry prints an ERROR line and
/// re-prompts, and end-of-input exits any menu cleanly. All booking state
/// lives in the manager; this layer only collects strings and prints.
pub struct Menu<'a, S, R, W> {
    manager: &'a mut BookingManager<S>,
    catalog: BTreeMap<String, Service>,
    input: R,
    output: W,
}

impl<'a, S: RecordStore, R: BufRead, W: Write> Menu<'a, S, R, W> {
    pub fn new(
        manager: &'a mut BookingManager<S>,
        catalog: BTreeMap<String, Service>,
        input: R,
        output: W,
    ) -> Self {
        Self {
            manager,
            catalog,
            input,
            output,
        }
    }

    /// Returns None once the input is exhausted.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "--- Main Menu ---")?;
            writeln!(self.output, "1. I am a Client")?;
            writeln!(self.output, "2. I am a Technician")?;
            writeln!(self.output, "3. Exit System")?;
            let Some(choice) = self.prompt("Enter your choice (1-3): ")? else {
                return Ok(());
            };
            match choice.as_str() {
                "" => writeln!(self.output, "Input cannot be empty. Please enter a choice.")?,
                "1" => {
                    if let Some(client_id) = self.client_login_or_create()? {
                        self.client_menu(client_id)?;
                    }
                }
                "2" => {
                    if let Some(technician_id) = self.technician_login_or_create()? {
                        self.technician_menu(technician_id)?;
                    }
                }
                "3" => {
                    writeln!(self.output)?;
                    writeln!(
                        self.output,
                        "Thank you for using the Nail Salon Booking System. Goodbye!"
                    )?;
                    return Ok(());
                }
                _ => writeln!(self.output, "ERROR: Invalid choice. Please enter 1, 2, or 3.")?,
            }
        }
    }

    fn client_login_or_create(&mut self) -> io::Result<Option<ClientId>> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "--- Client Login/Creation ---")?;
            writeln!(self.output, "1. Log In with Existing ID")?;
            writeln!(self.output, "2. Create New Client Account")?;
            writeln!(self.output, "3. Back to Main Menu")?;
            let Some(choice) = self.prompt("Enter choice (1-3): ")? else {
                return Ok(None);
            };
            match choice.as_str() {
                "1" => {
                    writeln!(self.output, "Current Clients:")?;
                    for client in self.manager.clients() {
                        writeln!(self.output, "  - {client}")?;
                    }
                    let Some(raw) = self.prompt("Enter your Client ID (e.g., 101): ")? else {
                        return Ok(None);
                    };
                    match raw.parse::<u32>().ok().map(ClientId) {
                        Some(id) if self.manager.client(id).is_some() => return Ok(Some(id)),
                        _ => {
                            writeln!(self.output, "ERROR: Invalid Client ID. Please try again.")?
                        }
                    }
                }
                "2" => {
                    let Some(name) = self.prompt("Enter your Name: ")? else {
                        return Ok(None);
                    };
                    let Some(phone) = self.prompt("Enter your Phone Number: ")? else {
                        return Ok(None);
                    };
                    if name.is_empty() || phone.is_empty() {
                        writeln!(self.output, "ERROR: Name and Phone cannot be empty.")?;
                        continue;
                    }
                    match self.manager.register_client(&name, &phone) {
                        Ok(client) => {
                            writeln!(self.output)?;
                            writeln!(
                                self.output,
                                "SUCCESS: New Client created and saved: {} (ID: {})",
                                client.name, client.id
                            )?;
                            return Ok(Some(client.id));
                        }
                        Err(err) => writeln!(self.output, "ERROR: {err}")?,
                    }
                }
                "3" => return Ok(None),
                _ => writeln!(self.output, "ERROR: Invalid choice. Please enter 1, 2, or 3.")?,
            }
        }
    }

    fn client_menu(&mut self, client_id: ClientId) -> io::Result<()> {
        loop {
            let Some(client_name) = self.manager.client(client_id).map(|c| c.name.clone()) else {
                return Ok(());
            };
            writeln!(self.output)?;
            writeln!(self.output, "--- Welcome, {client_name} (Client Menu) ---")?;
            writeln!(self.output, "1. Book New Appointment")?;
            writeln!(self.output, "2. View My Appointments")?;
            writeln!(self.output, "3. Cancel Appointment")?;
            writeln!(self.output, "4. Back to Main Menu")?;
            let Some(choice) = self.prompt("Enter choice (1-4): ")? else {
                return Ok(());
            };
            match choice.as_str() {
                "1" => self.book_appointment_flow(client_id)?,
                "2" => self.view_client_appointments(client_id)?,
                "3" => self.cancel_appointment_flow()?,
                "4" => {
                    writeln!(self.output, "Returning to Main Menu.")?;
                    return Ok(());
                }
                "" => {}
                _ => writeln!(
                    self.output,
                    "ERROR: Invalid choice. Please enter 1, 2, 3, or 4."
                )?,
            }
        }
    }

    fn book_appointment_flow(&mut self, client_id: ClientId) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "--- Service Selection ---")?;
        for (key, service) in &self.catalog {
            writeln!(self.output, "{key}. {} (${:.2})", service.name, service.price)?;
        }
        let Some(service_choice) = self.prompt("Select a service (1-4): ")? else {
            return Ok(());
        };
        let Some(service) = self.catalog.get(&service_choice).cloned() else {
            writeln!(self.output, "ERROR: Invalid service selection.")?;
            return Ok(());
        };
        writeln!(
            self.output,
            "Selected: {} for ${:.2}",
            service.name, service.price
        )?;

        let Some(date) = self.prompt("Enter date to check (YYYY-MM-DD, e.g., 2025-11-21): ")?
        else {
            return Ok(());
        };
        if date.is_empty() {
            writeln!(self.output, "ERROR: Date cannot be empty.")?;
            return Ok(());
        }
        let slots = match self.manager.find_open_slots(&date) {
            Ok(slots) => slots,
            Err(err) => {
                writeln!(self.output, "ERROR: {err}")?;
                return Ok(());
            }
        };
        if slots.is_empty() {
            writeln!(self.output, "No open slots found for that date.")?;
            return Ok(());
        }
        writeln!(self.output)?;
        writeln!(self.output, "--- Open Slots on {date} ---")?;
        for slot in &slots {
            writeln!(
                self.output,
                "  {} (ID: {}) at {}",
                slot.technician_name, slot.technician_id, slot.time
            )?;
        }

        let Some(technician_raw) = self.prompt("Enter Technician ID (e.g., 201) for booking: ")?
        else {
            return Ok(());
        };
        let Some(time) = self.prompt("Enter desired time (HH:MM, e.g., 10:00): ")? else {
            return Ok(());
        };
        if technician_raw.is_empty() || time.is_empty() {
            writeln!(self.output, "ERROR: Technician ID and Time cannot be empty.")?;
            return Ok(());
        }
        let Some(technician_id) = technician_raw.parse::<u32>().ok().map(TechnicianId) else {
            writeln!(self.output, "ERROR: Invalid Client or Technician ID")?;
            return Ok(());
        };
        match self.manager.book_appointment(
            client_id,
            technician_id,
            &date,
            &time,
            &service.name,
            service.price,
        ) {
            Ok(appointment) => {
                writeln!(self.output)?;
                writeln!(self.output, "SUCCESS: Booking Successful!")?;
                let description = describe_appointment(self.manager, &appointment);
                writeln!(self.output, "{description}")?;
            }
            Err(err) => writeln!(self.output, "ERROR: {err}")?,
        }
        Ok(())
    }

    fn view_client_appointments(&mut self, client_id: ClientId) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "--- Your Appointments ---")?;
        let manager: &BookingManager<S> = self.manager;
        let descriptions: Vec<String> = manager
            .client_appointments(client_id)
            .map(|appointment| describe_appointment(manager, appointment))
            .collect();
        if descriptions.is_empty() {
            writeln!(self.output, "You have no appointments booked.")?;
        } else {
            for description in descriptions {
                writeln!(self.output, "{description}")?;
            }
        }
        Ok(())
    }

    fn cancel_appointment_flow(&mut self) -> io::Result<()> {
        let Some(raw) = self.prompt("Enter Appointment ID to cancel (e.g., 3001): ")? else {
            return Ok(());
        };
        if raw.is_empty() {
            writeln!(self.output, "ERROR: Appointment ID cannot be empty.")?;
            return Ok(());
        }
        let Some(appointment_id) = raw.parse::<u32>().ok().map(AppointmentId) else {
            writeln!(
                self.output,
                "ERROR: Appointment ID {raw} not found or already canceled"
            )?;
            return Ok(());
        };
        match self.manager.cancel_appointment(appointment_id) {
            Ok(outcome) => {
                writeln!(self.output, "SUCCESS: Appointment {appointment_id} canceled.")?;
                let technician_name = self
                    .manager
                    .technician(outcome.appointment.technician_id)
                    .map(|t| t.name.clone())
                    .unwrap_or_default();
                if outcome.slot_restored {
                    writeln!(
                        self.output,
                        "Technician {technician_name}'s slot on {} at {} restored.",
                        outcome.appointment.date, outcome.appointment.time
                    )?;
                } else {
                    writeln!(
                        self.output,
                        "Technician {technician_name}'s slot on {} at {} was already available (no restoration needed).",
                        outcome.appointment.date, outcome.appointment.time
                    )?;
                }
            }
            Err(err) => writeln!(self.output, "ERROR: {err}")?,
        }
        Ok(())
    }

    fn technician_login_or_create(&mut self) -> io::Result<Option<TechnicianId>> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "--- Technician Login/Creation ---")?;
            writeln!(self.output, "1. Log In with Existing ID")?;
            writeln!(self.output, "2. Create New Technician Profile")?;
            writeln!(self.output, "3. Back to Main Menu")?;
            let Some(choice) = self.prompt("Enter choice (1-3): ")? else {
                return Ok(None);
            };
            match choice.as_str() {
                "1" => {
                    writeln!(self.output, "Current Technicians:")?;
                    for technician in self.manager.technicians() {
                        writeln!(self.output, "  - {technician}")?;
                    }
                    let Some(raw) = self.prompt("Enter your Technician ID (e.g., 201): ")? else {
                        return Ok(None);
                    };
                    match raw.parse::<u32>().ok().map(TechnicianId) {
                        Some(id) if self.manager.technician(id).is_some() => return Ok(Some(id)),
                        _ => writeln!(
                            self.output,
                            "ERROR: Invalid Technician ID. Please try again."
                        )?,
                    }
                }
                "2" => {
                    let Some(name) = self.prompt("Enter your Name: ")? else {
                        return Ok(None);
                    };
                    if name.is_empty() {
                        writeln!(self.output, "ERROR: Name cannot be empty.")?;
                        continue;
                    }
                    match self.manager.register_technician(&name) {
                        Ok(technician) => {
                            writeln!(self.output)?;
                            writeln!(
                                self.output,
                                "SUCCESS: New Technician created and saved: {} (ID: {})",
                                technician.name, technician.id
                            )?;
                            return Ok(Some(technician.id));
                        }
                        Err(err) => writeln!(self.output, "ERROR: {err}")?,
                    }
                }
                "3" => return Ok(None),
                _ => writeln!(self.output, "ERROR: Invalid choice. Please enter 1, 2, or 3.")?,
            }
        }
    }

    fn technician_menu(&mut self, technician_id: TechnicianId) -> io::Result<()> {
        loop {
            let Some(technician_name) = self
                .manager
                .technician(technician_id)
                .map(|t| t.name.clone())
            else {
                return Ok(());
            };
            writeln!(self.output)?;
            writeln!(
                self.output,
                "--- Welcome, {technician_name} (Technician Menu) ---"
            )?;
            writeln!(self.output, "1. View My Schedule")?;
            writeln!(self.output, "2. Add Availability Slot")?;
            writeln!(self.output, "3. Remove Availability Slot")?;
            writeln!(self.output, "4. Back to Main Menu")?;
            let Some(choice) = self.prompt("Enter choice (1-4): ")? else {
                return Ok(());
            };
            if choice.is_empty() {
                writeln!(self.output, "Input cannot be empty. Please enter a choice.")?;
                continue;
            }
            match choice.as_str() {
                "1" => self.view_technician_schedule(technician_id)?,
                "2" => {
                    let Some(date) = self.prompt("Enter date to add (YYYY-MM-DD): ")? else {
                        return Ok(());
                    };
                    let Some(time) = self.prompt("Enter time to add (HH:MM, e.g., 15:30): ")?
                    else {
                        return Ok(());
                    };
                    if date.is_empty() || time.is_empty() {
                        writeln!(self.output, "ERROR: Date and Time cannot be empty.")?;
                        continue;
                    }
                    match self.manager.technician_add_slot(technician_id, &date, &time) {
                        Ok(()) => writeln!(
                            self.output,
                            "SUCCESS: Slot {date} @ {time} added for {technician_name}."
                        )?,
                        Err(err) => writeln!(self.output, "ERROR: {err}")?,
                    }
                }
                "3" => {
                    let Some(date) = self.prompt("Enter date to remove from (YYYY-MM-DD): ")?
                    else {
                        return Ok(());
                    };
                    let Some(time) = self.prompt("Enter time to remove (HH:MM): ")? else {
                        return Ok(());
                    };
                    if date.is_empty() || time.is_empty() {
                        writeln!(self.output, "ERROR: Date and Time cannot be empty.")?;
                        continue;
                    }
                    match self
                        .manager
                        .technician_remove_slot(technician_id, &date, &time)
                    {
                        Ok(()) => writeln!(
                            self.output,
                            "SUCCESS: Slot {date} @ {time} removed for {technician_name}."
                        )?,
                        Err(err) => writeln!(self.output, "ERROR: {err}")?,
                    }
                }
                "4" => {
                    writeln!(self.output, "Returning to Main Menu.")?;
                    return Ok(());
                }
                _ => writeln!(
                    self.output,
                    "ERROR: Invalid choice. Please enter 1, 2, 3, or 4."
                )?,
            }
        }
    }

    fn view_technician_schedule(&mut self, technician_id: TechnicianId) -> io::Result<()> {
        let Some(technician) = self.manager.technician(technician_id) else {
            return Ok(());
        };
        writeln!(self.output)?;
        writeln!(
            self.output,
            "--- {}'s Schedule & Availability ---",
            technician.name
        )?;
        writeln!(self.output)?;
        writeln!(
            self.output,
            "**Current Availability Slots (Open for Booking):**"
        )?;
        if technician.availability.is_empty() {
            writeln!(self.output, "  No future availability set.")?;
        } else {
            for (date, times) in technician.availability.iter() {
                let joined = times
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(self.output, "  {date}: {joined}")?;
            }
        }
        writeln!(self.output)?;
        writeln!(self.output, "**Booked/Past Appointments:**")?;
        let mut found_schedule = false;
        for (date, ids) in technician.schedule.iter() {
            if ids.is_empty() {
                continue;
            }
            writeln!(self.output, "  --- {date} ---")?;
            for id in ids {
                let Some(appointment) = self.manager.appointment(*id) else {
                    continue;
                };
                let client_name = self
                    .manager
                    .client(appointment.client_id)
                    .map(|c| c.name.as_str())
                    .unwrap_or("<unknown>");
                writeln!(
                    self.output,
                    "    {} | Client: {} (ID: {}) | Status: {}",
                    appointment.time, client_name, appointment.client_id, appointment.status
                )?;
                found_schedule = true;
            }
        }
        if !found_schedule {
            writeln!(self.output, "No appointments currently booked.")?;
        }
        Ok(())
    }
}

fn describe_appointment<S: RecordStore>(
    manager: &BookingManager<S>,
    appointment: &Appointment,
) -> String {
    let client_name = manager
        .client(appointment.client_id)
        .map(|c| c.name.as_str())
        .unwrap_or("<unknown>");
    let technician_name = manager
        .technician(appointment.technician_id)
        .map(|t| t.name.as_str())
        .unwrap_or("<unknown>");
    let status_info = match appointment.status {
        AppointmentStatus::Booked => String::new(),
        status => format!(" | Status: {status}"),
    };
    format!(
        "[{}] {} @ {} | Service: {} (${:.2}){}\n    - Technician: {} | Client: {}",
        appointment.id,
        appointment.date,
        appointment.time,
        appointment.service,
        appointment.price,
        status_info,
        technician_name,
        client_name
    )
}
