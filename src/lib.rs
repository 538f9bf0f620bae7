//! # easyappoint-calendar
//!
//! Day and week calendar layout for a single doctor's appointments.
//!
//! ## Modules
//!
//! - [`models`] - doctors, appointments, half-open intervals, positioned blocks
//! - [`slots`] - the 30-minute time-slot grid of the viewing window
//! - [`calendar`] - read-only appointment store and its day/range queries
//! - [`layout`] - day view overlap fan-out and week view placement
//! - [`scheduler`] - facade and session state for UI callers
//! - [`fixtures`] - demo data and JSON data source
//! - [`config`] - viewing window and layout policy settings
//! - [`error`] - boundary error types
//! - [`logging`] - tracing subscriber setup

pub mod calendar;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod layout;
pub mod logging;
pub mod models;
pub mod scheduler;
pub mod slots;

pub use calendar::{AppointmentStore, DataSource};
pub use config::{ScheduleConfig, ViewWindow};
pub use error::ScheduleError;
pub use fixtures::{DemoDataSource, JsonDataSource};
pub use layout::{DayColumn, DayLayoutEngine, OverlapPolicy, WeekLayout, WeekLayoutEngine};
pub use models::{
    overlaps, Appointment, AppointmentType, Doctor, Interval, PositionedAppointment, TimeSlot,
    ViewMode,
};
pub use scheduler::{DoctorSelection, ScheduleFacade, ScheduleSession, ScheduleView, WeekRange};
pub use slots::{generate_time_slots, TimeSlotGenerator};
