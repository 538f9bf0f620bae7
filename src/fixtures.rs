//! Data sources: built-in demo data and JSON records.
//!
//! Timestamps cross this boundary as ISO-8601 strings and are parsed into
//! naive wall-clock values. Offsets are dropped without conversion.

use crate::calendar::DataSource;
use crate::error::{Result, ScheduleError};
use crate::models::{Appointment, AppointmentType, Doctor};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use uuid::Uuid;

/// Demo clinic anchored on a caller-supplied "today".
#[derive(Debug, Clone, Copy)]
pub struct DemoDataSource {
    pub today: NaiveDate,
}

impl DemoDataSource {
    pub fn new(today: NaiveDate) -> Self {
        DemoDataSource { today }
    }
}

impl DataSource for DemoDataSource {
    fn list_doctors(&self) -> Vec<Doctor> {
        demo_doctors()
    }

    fn list_appointments(&self) -> Vec<Appointment> {
        demo_appointments(self.today)
    }
}

pub fn demo_doctors() -> Vec<Doctor> {
    vec![
        Doctor::new("d1", "Dr. Sarah Chen", "Cardiology", Some("8:00 AM - 4:00 PM")),
        Doctor::new("d2", "Dr. Amir Patel", "Dermatology", Some("9:00 AM - 6:00 PM")),
        Doctor::new("d3", "Dr. Lina Gomez", "Orthopedics", Some("8:00 AM - 5:00 PM")),
    ]
}

/// Build an appointment starting `day_offset` days after `today` at `hour:minute`.
///
/// Returns `None` when `hour:minute` is not a valid time of day.
pub fn booking(
    id: &str,
    doctor_id: &str,
    patient_name: &str,
    kind: AppointmentType,
    today: NaiveDate,
    day_offset: i64,
    (hour, minute): (u32, u32),
    minutes: i64,
) -> Option<Appointment> {
    let start = (today + Duration::days(day_offset)).and_hms_opt(hour, minute, 0)?;
    Some(Appointment::new(
        id,
        doctor_id,
        patient_name,
        kind,
        start,
        start + Duration::minutes(minutes),
        minutes,
    ))
}

pub fn demo_appointments(today: NaiveDate) -> Vec<Appointment> {
    use AppointmentType::*;

    vec![
        booking("a1", "d1", "John Doe", Checkup, today, 0, (9, 0), 30),
        booking("a2", "d1", "Jane Smith", Consultation, today, 0, (10, 0), 60),
        // Overlaps a1.
        booking("a3", "d1", "Ali Khan", FollowUp, today, 0, (9, 15), 45),
        booking("a4", "d2", "Michael Green", Procedure, today, 1, (11, 30), 45),
        booking("a5", "d3", "Laura Black", Checkup, today, 2, (15, 0), 30),
        booking("a6", "d1", "Chris Blue", Consultation, today, 7, (14, 0), 30),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DoctorRecord {
    id: String,
    name: String,
    specialty: String,
    #[serde(default)]
    working_hours: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppointmentRecord {
    #[serde(default)]
    id: Option<String>,
    doctor_id: String,
    patient_name: String,
    #[serde(rename = "type")]
    kind: String,
    start_time: String,
    end_time: String,
    duration: i64,
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(default)]
    doctors: Vec<DoctorRecord>,
    #[serde(default)]
    appointments: Vec<AppointmentRecord>,
}

/// A snapshot parsed from JSON of the shape
/// `{"doctors": [...], "appointments": [...]}` with camelCase fields.
#[derive(Debug, Clone, Default)]
pub struct JsonDataSource {
    doctors: Vec<Doctor>,
    appointments: Vec<Appointment>,
}

impl JsonDataSource {
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;

        let doctors = snapshot
            .doctors
            .into_iter()
            .map(|record| Doctor {
                id: record.id,
                name: record.name,
                specialty: record.specialty,
                working_hours: record.working_hours,
            })
            .collect();

        let appointments = snapshot
            .appointments
            .into_iter()
            .map(appointment_from_record)
            .collect::<Result<Vec<_>>>()?;

        Ok(JsonDataSource {
            doctors,
            appointments,
        })
    }
}

impl DataSource for JsonDataSource {
    fn list_doctors(&self) -> Vec<Doctor> {
        self.doctors.clone()
    }

    fn list_appointments(&self) -> Vec<Appointment> {
        self.appointments.clone()
    }
}

fn appointment_from_record(record: AppointmentRecord) -> Result<Appointment> {
    let id = record.id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let kind = AppointmentType::from_string(&record.kind).map_err(|reason| {
        ScheduleError::InvalidRecord {
            id: id.clone(),
            reason,
        }
    })?;
    let start = parse_timestamp(&record.start_time)?;
    let end = parse_timestamp(&record.end_time)?;

    if start >= end {
        tracing::warn!(id = %id, "rejecting appointment that ends before it starts");
        return Err(ScheduleError::InvalidRecord {
            id,
            reason: "start time must be before end time".to_string(),
        });
    }

    Ok(Appointment {
        id,
        doctor_id: record.doctor_id,
        patient_name: record.patient_name,
        kind,
        start,
        end,
        duration_minutes: record.duration,
    })
}

/// Parse an ISO-8601 date-time into a naive wall-clock value.
///
/// Accepts `YYYY-MM-DDTHH:MM[:SS[.fff]]` (a space separator works too) and
/// RFC 3339 strings with an offset, whose written local time is kept.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| ScheduleError::InvalidTimestamp(value.to_string()))
}
