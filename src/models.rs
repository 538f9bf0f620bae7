//! Data models for the appointment calendar.
//!
//! This module defines the value types shared by the store, the layout
//! engines and the facade:
//! - AppointmentType: closed set of appointment kinds (legend only)
//! - Doctor: immutable reference data
//! - Interval / TimeSlot: half-open time range with an overlap predicate
//! - Appointment: a booked, time-bounded record for one doctor
//! - PositionedAppointment: an appointment with screen-space coordinates

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Horizontal gap, in pixels, the renderer subtracts from each column width.
pub const COLUMN_GAP_PX: u32 = 4;

/// Kind of appointment. Drives the color legend and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentType {
    Checkup,
    Consultation,
    #[serde(rename = "Follow-up")]
    FollowUp,
    Procedure,
}

impl AppointmentType {
    /// Legend order.
    pub const ALL: [AppointmentType; 4] = [
        AppointmentType::Checkup,
        AppointmentType::Consultation,
        AppointmentType::FollowUp,
        AppointmentType::Procedure,
    ];

    /// Convert a display label to an AppointmentType.
    pub fn from_string(value: &str) -> Result<Self, String> {
        match value.to_lowercase().trim() {
            "checkup" => Ok(AppointmentType::Checkup),
            "consultation" => Ok(AppointmentType::Consultation),
            "follow-up" | "followup" => Ok(AppointmentType::FollowUp),
            "procedure" => Ok(AppointmentType::Procedure),
            _ => Err(format!(
                "Invalid appointment type: '{}'. \
                 Must be one of: Checkup, Consultation, Follow-up, Procedure",
                value
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AppointmentType::Checkup => "Checkup",
            AppointmentType::Consultation => "Consultation",
            AppointmentType::FollowUp => "Follow-up",
            AppointmentType::Procedure => "Procedure",
        }
    }

    /// Color token used by the rendering layer.
    pub fn color(&self) -> &'static str {
        match self {
            AppointmentType::Checkup => "bg-blue-600",
            AppointmentType::Consultation => "bg-green-600",
            AppointmentType::FollowUp => "bg-orange-600",
            AppointmentType::Procedure => "bg-purple-600",
        }
    }
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `(label, color)` pairs for the appointment type legend.
pub fn legend() -> Vec<(&'static str, &'static str)> {
    AppointmentType::ALL
        .iter()
        .map(|kind| (kind.name(), kind.color()))
        .collect()
}

/// Represents a doctor whose calendar can be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub working_hours: Option<String>,
}

impl Doctor {
    pub fn new(id: &str, name: &str, specialty: &str, working_hours: Option<&str>) -> Self {
        Doctor {
            id: id.to_string(),
            name: name.to_string(),
            specialty: specialty.to_string(),
            working_hours: working_hours.map(str::to_string),
        }
    }
}

/// Half-open time range `[start, end)` on the naive wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// A grid cell of the viewing window.
pub type TimeSlot = Interval;

impl Interval {
    /// Callers guarantee `start < end`; this is only asserted in debug builds.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        debug_assert!(start < end, "interval start must precede end");
        Interval { start, end }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Intervals that only touch at an endpoint do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        overlaps(self, other)
    }
}

/// Strict half-open overlap test: `a.start < b.end && b.start < a.end`.
pub fn overlaps(a: &Interval, b: &Interval) -> bool {
    a.start < b.end && b.start < a.end
}

/// A booked appointment.
///
/// `duration_minutes` is display data carried from the source record. It is
/// never recomputed from the timestamps, which remain the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub doctor_id: String,
    pub patient_name: String,
    #[serde(rename = "type")]
    pub kind: AppointmentType,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration_minutes: i64,
}

impl Appointment {
    pub fn new(
        id: &str,
        doctor_id: &str,
        patient_name: &str,
        kind: AppointmentType,
        start: NaiveDateTime,
        end: NaiveDateTime,
        duration_minutes: i64,
    ) -> Self {
        debug_assert!(start < end, "appointment start must precede end");
        Appointment {
            id: id.to_string(),
            doctor_id: doctor_id.to_string(),
            patient_name: patient_name.to_string(),
            kind,
            start,
            end,
            duration_minutes,
        }
    }

    pub fn interval(&self) -> Interval {
        Interval {
            start: self.start,
            end: self.end,
        }
    }
}

/// An appointment annotated with percentage coordinates of the viewing window.
///
/// Values are not clamped: appointments outside the window yield a negative
/// `top` or a `top + height` above 100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedAppointment {
    pub appointment: Appointment,
    pub top: f64,
    pub height: f64,
    pub left: f64,
    pub width: f64,
}

impl PositionedAppointment {
    /// CSS width with the column gap taken out, e.g. `calc(50% - 4px)`.
    pub fn css_width(&self, gap_px: u32) -> String {
        format!("calc({}% - {}px)", self.width, gap_px)
    }
}

/// Which calendar view a request is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Day,
    Week,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Day => ViewMode::Week,
            ViewMode::Week => ViewMode::Day,
        }
    }
}
