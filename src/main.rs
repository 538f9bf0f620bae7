//! Command-line interface for browsing a doctor's appointment calendar.
//!
//! Usage: `easyappoint [snapshot.json]`. Without a snapshot the built-in demo
//! clinic is loaded, anchored on today's date.

use chrono::{Local, NaiveDate};
use easyappoint_calendar::models::{legend, COLUMN_GAP_PX};
use easyappoint_calendar::{
    logging, AppointmentStore, DataSource, DemoDataSource, JsonDataSource, ScheduleConfig,
    ScheduleFacade, ScheduleSession, ScheduleView, ViewMode,
};
use std::io::{self, Write};

struct CalendarCLI<'a> {
    facade: ScheduleFacade<'a>,
    session: ScheduleSession,
    running: bool,
}

impl<'a> CalendarCLI<'a> {
    fn new(facade: ScheduleFacade<'a>, today: NaiveDate) -> Self {
        let mut session = ScheduleSession::new(today);
        session.ensure_default_doctor(facade.store().list_doctors());

        CalendarCLI {
            facade,
            session,
            running: true,
        }
    }

    fn print_header(&self) {
        println!("\n{}", "=".repeat(60));
        println!("       DOCTOR APPOINTMENT CALENDAR");
        println!("{}", "=".repeat(60));
    }

    fn print_menu(&self) {
        let view = match self.session.view_mode {
            ViewMode::Day => "day",
            ViewMode::Week => "week",
        };
        println!("\n--- Main Menu ({} view) ---", view);
        println!("1. Select doctor");
        println!("2. Toggle day/week view");
        println!("3. Previous");
        println!("4. Next");
        println!("5. Go to date");
        println!("6. Show schedule");
        println!("7. Show appointment type legend");
        println!("8. Exit");
        println!("{}", "-".repeat(20));
    }

    fn get_input(&self, prompt: &str, default: Option<&str>) -> String {
        if let Some(def) = default {
            print!("{} [{}]: ", prompt, def);
        } else {
            print!("{}: ", prompt);
        }
        let _ = io::stdout().flush();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).unwrap_or(0) == 0 {
            println!("\nGoodbye!");
            std::process::exit(0);
        }
        let input = input.trim();

        if input.is_empty() {
            default.unwrap_or("").to_string()
        } else {
            input.to_string()
        }
    }

    fn get_int_input(&self, prompt: &str, default: Option<i32>) -> i32 {
        loop {
            let default_str = default.map(|d| d.to_string());
            let input = self.get_input(prompt, default_str.as_deref());

            if let Ok(value) = input.parse::<i32>() {
                return value;
            }
            println!("Please enter a valid number");
        }
    }

    fn select_doctor(&mut self) {
        let doctors = self.facade.store().list_doctors();
        if doctors.is_empty() {
            println!("\nNo doctors available");
            return;
        }

        println!("\n--- Select Doctor ---");
        for (i, doctor) in doctors.iter().enumerate() {
            println!("  {}. {} ({})", i + 1, doctor.name, doctor.specialty);
        }

        let choice = self.get_int_input("Doctor", Some(1));
        match usize::try_from(choice).ok().and_then(|c| c.checked_sub(1)) {
            Some(index) if index < doctors.len() => {
                let doctor = &doctors[index];
                self.session.select_doctor(&doctor.id);
                println!("\nNow showing {}", doctor.name);
            }
            _ => println!("Invalid choice"),
        }
    }

    fn toggle_view(&mut self) {
        self.session.set_view(self.session.view_mode.toggled());
        self.show_schedule();
    }

    fn go_to_date(&mut self) {
        let current = self.session.date.format("%Y-%m-%d").to_string();
        let input = self.get_input("Date (YYYY-MM-DD)", Some(&current));

        match NaiveDate::parse_from_str(&input, "%Y-%m-%d") {
            Ok(date) => {
                self.session.set_date(date);
                self.show_schedule();
            }
            Err(_) => println!("Invalid date: '{}'", input),
        }
    }

    fn show_schedule(&self) {
        let view = self.session.render(&self.facade);

        match &view.doctor {
            Some(doctor) => {
                println!("\n{} - {}", doctor.name, doctor.specialty);
                if let Some(hours) = &doctor.working_hours {
                    println!("Hours: {}", hours);
                }
            }
            None => {
                println!("\nNo doctor selected");
                return;
            }
        }
        println!("{}", view.title());

        match view.view_mode {
            ViewMode::Day => self.print_day(&view),
            ViewMode::Week => self.print_week(&view),
        }
    }

    fn print_day(&self, view: &ScheduleView) {
        if let Some(first) = view.time_slots.first() {
            println!(
                "\n{} slots of {} minutes",
                view.time_slots.len(),
                first.duration_minutes()
            );
        }
        for (i, slot) in view.time_slots.iter().enumerate() {
            // Hour marks only, like the grid labels.
            if i % 2 == 0 {
                println!("  {}", slot.start.format("%-I %p"));
            }
        }

        if view.is_empty() {
            println!("\nNo appointments scheduled for this day.");
            return;
        }

        println!("\n--- Appointments ({}) ---", view.appointments.len());
        for placed in &view.appointments {
            let apt = &placed.appointment;
            println!(
                "  {} - {}  {:15} {} • {} min",
                apt.start.format("%H:%M"),
                apt.end.format("%H:%M"),
                apt.patient_name,
                apt.kind,
                apt.duration_minutes
            );
            println!(
                "    top {:.1}%  height {:.1}%  left {:.1}%  width {}",
                placed.top,
                placed.height,
                placed.left,
                placed.css_width(COLUMN_GAP_PX)
            );
        }
    }

    fn print_week(&self, view: &ScheduleView) {
        let Some(week) = &view.week else {
            return;
        };

        if view.is_empty() {
            println!("\nNo appointments scheduled for this week.");
            return;
        }

        for day in &week.days {
            println!("\n{}:", day.date.format("%a %d"));
            if day.appointments.is_empty() {
                println!("  -");
            }
            for placed in &day.appointments {
                let apt = &placed.appointment;
                println!(
                    "  {} {:15} {} min (top {:.1}%, height {:.1}%)",
                    apt.start.format("%H:%M"),
                    apt.patient_name,
                    apt.duration_minutes,
                    placed.top,
                    placed.height
                );
            }
        }
    }

    fn show_legend(&self) {
        println!("\n--- Appointment Type Legend ---");
        for (label, color) in legend() {
            println!("  {:13} {}", label, color);
        }
    }

    fn run(&mut self) {
        self.print_header();
        self.show_schedule();

        while self.running {
            self.print_menu();

            let choice = self.get_int_input("Enter choice", Some(6));

            match choice {
                1 => self.select_doctor(),
                2 => self.toggle_view(),
                3 => {
                    self.session.previous();
                    self.show_schedule();
                }
                4 => {
                    self.session.next();
                    self.show_schedule();
                }
                5 => self.go_to_date(),
                6 => self.show_schedule(),
                7 => self.show_legend(),
                8 => {
                    self.running = false;
                    println!("\nGoodbye!");
                }
                _ => println!("Invalid choice"),
            }
        }
    }
}

fn load_store(path: Option<String>, today: NaiveDate) -> Result<AppointmentStore, String> {
    let source: Box<dyn DataSource> = match path {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .map_err(|e| format!("Cannot read {}: {}", path, e))?;
            Box::new(JsonDataSource::from_json(&json).map_err(|e| e.to_string())?)
        }
        None => Box::new(DemoDataSource::new(today)),
    };
    Ok(AppointmentStore::from_source(source.as_ref()))
}

fn main() {
    logging::init();

    let config = match ScheduleConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{}; using defaults", e);
            ScheduleConfig::default()
        }
    };

    let today = Local::now().date_naive();
    let store = match load_store(std::env::args().nth(1), today) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error loading appointments: {}", e);
            std::process::exit(1);
        }
    };

    let facade = ScheduleFacade::new(&store, config);
    let mut cli = CalendarCLI::new(facade, today);
    cli.run();
}
