//! Appointment storage and calendar queries.
//!
//! This module provides the AppointmentStore which holds the doctors and
//! appointments supplied by a DataSource and answers day- and range-scoped
//! queries for a single doctor.

use crate::models::{Appointment, Doctor};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Upstream supplier of reference data, read once at startup.
pub trait DataSource {
    fn list_doctors(&self) -> Vec<Doctor>;
    fn list_appointments(&self) -> Vec<Appointment>;
}

/// Read-only snapshot of doctors and appointments, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct AppointmentStore {
    doctors: Vec<Doctor>,
    appointments: Vec<Appointment>,
}

impl AppointmentStore {
    pub fn new(doctors: Vec<Doctor>, appointments: Vec<Appointment>) -> Self {
        AppointmentStore {
            doctors,
            appointments,
        }
    }

    /// Snapshot everything the source currently supplies.
    pub fn from_source<S: DataSource + ?Sized>(source: &S) -> Self {
        let store = AppointmentStore::new(source.list_doctors(), source.list_appointments());
        tracing::info!(
            doctors = store.doctors.len(),
            appointments = store.appointments.len(),
            "appointment store loaded"
        );
        store
    }

    /// All doctors, in source order.
    pub fn list_doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn find_doctor(&self, doctor_id: &str) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.id == doctor_id)
    }

    /// Appointments for `doctor_id` starting in `[start_of_day(date), +1 day)`.
    pub fn appointments_for_doctor_on_date(
        &self,
        doctor_id: &str,
        date: NaiveDate,
    ) -> Vec<Appointment> {
        let start = start_of_day(date);
        let end = start + Duration::days(1);

        let found: Vec<Appointment> = self
            .appointments
            .iter()
            .filter(|apt| apt.doctor_id == doctor_id && apt.start >= start && apt.start < end)
            .cloned()
            .collect();

        tracing::debug!(doctor_id, %date, count = found.len(), "day query");
        found
    }

    /// Appointments for `doctor_id` starting in
    /// `[start_of_day(start_date), end_of_day(end_date)]`.
    ///
    /// The upper bound is closed at 23:59:59.999, unlike the day query.
    pub fn appointments_for_doctor_in_range(
        &self,
        doctor_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Vec<Appointment> {
        let start = start_of_day(start_date);
        let end = end_of_day(end_date);

        let found: Vec<Appointment> = self
            .appointments
            .iter()
            .filter(|apt| apt.doctor_id == doctor_id && apt.start >= start && apt.start <= end)
            .cloned()
            .collect();

        tracing::debug!(
            doctor_id,
            %start_date,
            %end_date,
            count = found.len(),
            "range query"
        );
        found
    }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59.999 on `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1) - Duration::milliseconds(1)
}
