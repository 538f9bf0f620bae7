//! Schedule orchestration: the single entry point UI code calls.
//!
//! This module provides the ScheduleFacade which resolves a doctor, queries
//! the store and runs the day or week layout, and the ScheduleSession which
//! holds the caller's selection and navigation state between requests.

use crate::calendar::AppointmentStore;
use crate::config::ScheduleConfig;
use crate::layout::{DayLayoutEngine, WeekLayout, WeekLayoutEngine};
use crate::models::{Doctor, PositionedAppointment, TimeSlot, ViewMode};
use crate::slots::generate_time_slots;
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// First day of the week containing `date`.
pub fn start_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let days_back = (7 + date.weekday().num_days_from_monday() as i64
        - week_start.num_days_from_monday() as i64)
        % 7;
    date - Duration::days(days_back)
}

/// Inclusive seven-day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekRange {
    pub fn containing(date: NaiveDate, week_start: Weekday) -> Self {
        let start = start_of_week(date, week_start);
        WeekRange {
            start,
            end: start + Duration::days(6),
        }
    }
}

/// Everything the renderer needs for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleView {
    pub doctor: Option<Doctor>,
    pub view_mode: ViewMode,
    pub date: NaiveDate,
    pub appointments: Vec<PositionedAppointment>,
    /// Per-day columns; only present in week view.
    pub week: Option<WeekLayout>,
    pub time_slots: Vec<TimeSlot>,
    pub week_range: WeekRange,
}

impl ScheduleView {
    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    /// Header line, e.g. `Monday, Mar 2, 2026` or `Mar 2 - Mar 8, 2026`.
    pub fn title(&self) -> String {
        match self.view_mode {
            ViewMode::Day => self.date.format("%A, %b %-d, %Y").to_string(),
            ViewMode::Week => format!(
                "{} - {}",
                self.week_range.start.format("%b %-d"),
                self.week_range.end.format("%b %-d, %Y")
            ),
        }
    }
}

/// Stateless orchestrator over a borrowed store.
pub struct ScheduleFacade<'a> {
    store: &'a AppointmentStore,
    config: ScheduleConfig,
}

impl<'a> ScheduleFacade<'a> {
    pub fn new(store: &'a AppointmentStore, config: ScheduleConfig) -> Self {
        ScheduleFacade { store, config }
    }

    pub fn store(&self) -> &'a AppointmentStore {
        self.store
    }

    /// Build the schedule for `(doctor_id, date, view_mode)`.
    ///
    /// A missing or unknown doctor yields no doctor and no appointments; the
    /// slot grid and week range are still filled in.
    pub fn schedule(
        &self,
        doctor_id: Option<&str>,
        date: NaiveDate,
        view_mode: ViewMode,
    ) -> ScheduleView {
        let window = self.config.window;
        let week_range = WeekRange::containing(date, self.config.week_start);
        let time_slots = generate_time_slots(date, &window);
        let doctor = doctor_id.and_then(|id| self.store.find_doctor(id)).cloned();

        let mut view = ScheduleView {
            doctor: None,
            view_mode,
            date,
            appointments: Vec::new(),
            week: None,
            time_slots,
            week_range,
        };

        let Some(doctor) = doctor else {
            tracing::debug!(?doctor_id, "no doctor selected");
            return view;
        };

        match view_mode {
            ViewMode::Day => {
                let appointments = self.store.appointments_for_doctor_on_date(&doctor.id, date);
                view.appointments =
                    DayLayoutEngine::new(window, self.config.overlap_policy).layout(&appointments);
            }
            ViewMode::Week => {
                let appointments = self.store.appointments_for_doctor_in_range(
                    &doctor.id,
                    week_range.start,
                    week_range.end,
                );
                let week = WeekLayoutEngine::new(window).layout(week_range.start, &appointments);
                view.appointments = week.flatten();
                view.week = Some(week);
            }
        }

        tracing::debug!(
            doctor_id = %doctor.id,
            %date,
            ?view_mode,
            count = view.appointments.len(),
            "schedule laid out"
        );
        view.doctor = Some(doctor);
        view
    }
}

/// Which doctor the session shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DoctorSelection {
    #[default]
    Unselected,
    Selected(String),
}

impl DoctorSelection {
    pub fn doctor_id(&self) -> Option<&str> {
        match self {
            DoctorSelection::Unselected => None,
            DoctorSelection::Selected(id) => Some(id.as_str()),
        }
    }
}

/// Caller-side state: selected doctor, reference date and view mode.
#[derive(Debug, Clone)]
pub struct ScheduleSession {
    pub selection: DoctorSelection,
    pub date: NaiveDate,
    pub view_mode: ViewMode,
}

impl ScheduleSession {
    pub fn new(date: NaiveDate) -> Self {
        ScheduleSession {
            selection: DoctorSelection::Unselected,
            date,
            view_mode: ViewMode::Day,
        }
    }

    /// Unselected -> Selected(first doctor). Returns true on transition.
    pub fn ensure_default_doctor(&mut self, doctors: &[Doctor]) -> bool {
        if self.selection != DoctorSelection::Unselected {
            return false;
        }
        match doctors.first() {
            Some(first) => {
                tracing::info!(doctor_id = %first.id, "defaulting to first doctor");
                self.selection = DoctorSelection::Selected(first.id.clone());
                true
            }
            None => false,
        }
    }

    pub fn select_doctor(&mut self, doctor_id: &str) {
        self.selection = DoctorSelection::Selected(doctor_id.to_string());
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    pub fn set_view(&mut self, view_mode: ViewMode) {
        self.view_mode = view_mode;
    }

    /// Forward one day in day view, one week in week view.
    pub fn next(&mut self) {
        self.date = self.date + self.step();
    }

    pub fn previous(&mut self) {
        self.date = self.date - self.step();
    }

    fn step(&self) -> Duration {
        match self.view_mode {
            ViewMode::Day => Duration::days(1),
            ViewMode::Week => Duration::days(7),
        }
    }

    pub fn render(&self, facade: &ScheduleFacade<'_>) -> ScheduleView {
        facade.schedule(self.selection.doctor_id(), self.date, self.view_mode)
    }
}
