//! Time-slot grid generation for one calendar day.

use crate::config::ViewWindow;
use crate::models::TimeSlot;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Lazy iterator over the slots of a viewing window, earliest first.
///
/// Cloning the generator restarts it from the first slot. No slot crosses the
/// window's end hour; a window with `end_hour <= start_hour` yields nothing.
#[derive(Debug, Clone)]
pub struct TimeSlotGenerator {
    day_start: NaiveDateTime,
    next_minute: u32,
    end_minute: u32,
    step: u32,
}

impl TimeSlotGenerator {
    pub fn new(date: NaiveDate, window: &ViewWindow) -> Self {
        TimeSlotGenerator {
            day_start: date.and_time(chrono::NaiveTime::MIN),
            next_minute: window.start_minute(),
            end_minute: window.end_hour * 60,
            step: window.slot_minutes,
        }
    }

    pub fn remaining(&self) -> usize {
        if self.step == 0 || self.end_minute <= self.next_minute {
            return 0;
        }
        ((self.end_minute - self.next_minute) / self.step) as usize
    }
}

impl Iterator for TimeSlotGenerator {
    type Item = TimeSlot;

    fn next(&mut self) -> Option<TimeSlot> {
        if self.remaining() == 0 {
            return None;
        }

        let start = self.day_start + Duration::minutes(self.next_minute as i64);
        let end = start + Duration::minutes(self.step as i64);
        self.next_minute += self.step;

        Some(TimeSlot { start, end })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TimeSlotGenerator {}

/// Collect the grid for `date` within `window`.
pub fn generate_time_slots(date: NaiveDate, window: &ViewWindow) -> Vec<TimeSlot> {
    TimeSlotGenerator::new(date, window).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn default_window_yields_twenty_half_hour_slots() {
        let slots = generate_time_slots(day(), &ViewWindow::default());

        assert_eq!(slots.len(), 20);
        assert!(slots.iter().all(|s| s.duration_minutes() == 30));
        assert_eq!(slots[0].start, day().and_hms_opt(8, 0, 0).unwrap());
        assert_eq!(slots[0].end, day().and_hms_opt(8, 30, 0).unwrap());
        assert_eq!(slots[19].start, day().and_hms_opt(17, 30, 0).unwrap());
        assert_eq!(slots[19].end, day().and_hms_opt(18, 0, 0).unwrap());
    }

    #[test]
    fn slots_are_contiguous() {
        let slots = generate_time_slots(day(), &ViewWindow::default());
        for pair in slots.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn clone_restarts_the_sequence() {
        let mut generator = TimeSlotGenerator::new(day(), &ViewWindow::default());
        let fresh = generator.clone();
        generator.next();
        generator.next();

        assert_eq!(generator.len(), 18);
        assert_eq!(fresh.len(), 20);
        assert_eq!(fresh.clone().next().unwrap().start, day().and_hms_opt(8, 0, 0).unwrap());
    }

    #[test]
    fn inverted_window_is_empty() {
        assert!(generate_time_slots(day(), &ViewWindow::new(18, 8)).is_empty());
        assert!(generate_time_slots(day(), &ViewWindow::new(9, 9)).is_empty());
    }

    #[test]
    fn slot_never_crosses_end_hour() {
        let window = ViewWindow {
            start_hour: 8,
            end_hour: 10,
            slot_minutes: 45,
        };
        let slots = generate_time_slots(day(), &window);

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].end, day().and_hms_opt(9, 30, 0).unwrap());
    }

    #[test]
    fn full_day_window_ends_at_midnight() {
        let slots = generate_time_slots(day(), &ViewWindow::new(0, 24));
        assert_eq!(slots.len(), 48);
        assert_eq!(slots[47].end, day().succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap());
    }

    proptest! {
        #[test]
        fn slot_count_matches_window(start in 0u32..24, len in 1u32..=24) {
            let end = (start + len).min(24);
            prop_assume!(end > start);
            let window = ViewWindow::new(start, end);
            let slots = generate_time_slots(day(), &window);
            prop_assert_eq!(slots.len() as u32, (end - start) * 2);
        }
    }
}
