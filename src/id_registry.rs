use crate::types::{AppointmentId, ClientId, TechnicianId};

const FIRST_CLIENT_ID: u32 = 101;
const FIRST_TECHNICIAN_ID: u32 = 201;
const FIRST_APPOINTMENT_ID: u32 = 3001;

/// Monotonic identifier issuance, one counter per entity kind. Counters are
/// raised past every identifier seen in loaded records before the first
/// issuance, so an id is never reused across restarts.
#[derive(Debug, Clone)]
pub struct IdRegistry {
    next_client: u32,
    next_technician: u32,
    next_appointment: u32,
}

impl Default for IdRegistry {
    fn default() -> Self {
        Self {
            next_client: FIRST_CLIENT_ID,
            next_technician: FIRST_TECHNICIAN_ID,
            next_appointment: FIRST_APPOINTMENT_ID,
        }
    }
}

impl IdRegistry {
    pub fn next_client(&mut self) -> ClientId {
        let id = ClientId(self.next_client);
        self.next_client += 1;
        id
    }

    pub fn next_technician(&mut self) -> TechnicianId {
        let id = TechnicianId(self.next_technician);
        self.next_technician += 1;
        id
    }

    pub fn next_appointment(&mut self) -> AppointmentId {
        let id = AppointmentId(self.next_appointment);
        self.next_appointment += 1;
        id
    }

    pub fn observe_client(&mut self, id: ClientId) {
        self.next_client = self.next_client.max(id.0 + 1);
    }

    pub fn observe_technician(&mut self, id: TechnicianId) {
        self.next_technician = self.next_technician.max(id.0 + 1);
    }

    pub fn observe_appointment(&mut self, id: AppointmentId) {
        self.next_appointment = self.next_appointment.max(id.0 + 1);
    }
}
