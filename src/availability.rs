use crate::types::AppointmentId;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Open slots per date. The inner set keeps time tokens ("10:00") in
/// ascending lexical order, which for zero-padded HH:MM is time order.
///
/// Mutation goes through the booking manager only; a slot disappearing here
/// must coincide with an appointment entering the schedule log.
#[derive(Debug, Clone, Default)]
pub struct Availability {
    slots: BTreeMap<NaiveDate, BTreeSet<String>>,
}

impl Availability {
    /// Returns false if the slot was already present.
    pub(crate) fn add_slot(&mut self, date: NaiveDate, time: &str) -> bool {
        self.slots.entry(date).or_default().insert(time.to_string())
    }

    /// Returns false if the slot was not present. A date whose last slot is
    /// removed drops out of the map entirely.
    pub(crate) fn remove_slot(&mut self, date: NaiveDate, time: &str) -> bool {
        let Some(times) = self.slots.get_mut(&date) else {
            return false;
        };
        let removed = times.remove(time);
        if times.is_empty() {
            self.slots.remove(&date);
        }
        removed
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn is_open(&self, date: NaiveDate, time: &str) -> bool {
        self.slots
            .get(&date)
            .map(|times| times.contains(time))
            .unwrap_or(false)
    }

    /// Open time tokens for one date, ascending. Empty for unknown dates.
    pub fn open_times(&self, date: NaiveDate) -> impl Iterator<Item = &str> + '_ {
        self.slots
            .get(&date)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &BTreeSet<String>)> {
        self.slots.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Appointments (any status) per date, in booking order. Read-only
/// reporting view; booking appends, cancellation filters out.
#[derive(Debug, Clone, Default)]
pub struct ScheduleLog {
    entries: BTreeMap<NaiveDate, Vec<AppointmentId>>,
}

impl ScheduleLog {
    pub(crate) fn append(&mut self, date: NaiveDate, id: AppointmentId) {
        self.entries.entry(date).or_default().push(id);
    }

    pub(crate) fn remove(&mut self, date: NaiveDate, id: AppointmentId) {
        if let Some(ids) = self.entries.get_mut(&date) {
            ids.retain(|entry| *entry != id);
        }
    }

    pub fn on(&self, date: NaiveDate) -> &[AppointmentId] {
        self.entries.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &[AppointmentId])> {
        self.entries.iter().map(|(date, ids)| (date, ids.as_slice()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn slots_stay_in_ascending_time_order() {
        let mut availability = Availability::default();
        availability.add_slot(date("2025-11-21"), "15:00");
        availability.add_slot(date("2025-11-21"), "10:00");
        availability.add_slot(date("2025-11-21"), "11:00");

        let times: Vec<&str> = availability.open_times(date("2025-11-21")).collect();
        assert_eq!(times, vec!["10:00", "11:00", "15:00"]);
    }

    #[test]
    fn duplicate_slot_is_rejected() {
        let mut availability = Availability::default();
        assert!(availability.add_slot(date("2025-11-21"), "10:00"));
        assert!(!availability.add_slot(date("2025-11-21"), "10:00"));

        let times: Vec<&str> = availability.open_times(date("2025-11-21")).collect();
        assert_eq!(times, vec!["10:00"]);
    }

    #[test]
    fn removing_last_slot_drops_the_date() {
        let mut availability = Availability::default();
        availability.add_slot(date("2025-11-21"), "10:00");

        assert!(availability.remove_slot(date("2025-11-21"), "10:00"));
        assert!(!availability.is_open(date("2025-11-21"), "10:00"));
        assert!(availability.is_empty());
        assert_eq!(availability.open_times(date("2025-11-21")).count(), 0);
    }

    #[test]
    fn removing_missing_slot_reports_absence() {
        let mut availability = Availability::default();
        availability.add_slot(date("2025-11-21"), "10:00");

        assert!(!availability.remove_slot(date("2025-11-21"), "11:00"));
        assert!(!availability.remove_slot(date("2025-11-22"), "10:00"));
        assert!(availability.is_open(date("2025-11-21"), "10:00"));
    }

    #[test]
    fn unknown_date_yields_empty_sequence() {
        let availability = Availability::default();
        assert_eq!(availability.open_times(date("2030-01-01")).count(), 0);
    }

    #[test]
    fn schedule_log_keeps_booking_order_and_filters_on_remove() {
        let mut schedule = ScheduleLog::default();
        schedule.append(date("2025-11-21"), AppointmentId(3002));
        schedule.append(date("2025-11-21"), AppointmentId(3001));
        schedule.append(date("2025-11-22"), AppointmentId(3003));

        assert_eq!(
            schedule.on(date("2025-11-21")),
            &[AppointmentId(3002), AppointmentId(3001)]
        );

        schedule.remove(date("2025-11-21"), AppointmentId(3002));
        assert_eq!(schedule.on(date("2025-11-21")), &[AppointmentId(3001)]);

        let dates: Vec<&NaiveDate> = schedule.iter().map(|(d, _)| d).collect();
        assert_eq!(dates, vec![&date("2025-11-21"), &date("2025-11-22")]);
    }
}
