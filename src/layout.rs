//! Layout engines that turn appointments into screen-space rectangles.
//!
//! All coordinates are percentages of the viewing window. Vertical placement
//! is shared by the day and week views:
//!
//! ```text
//! top    = (start_minute_of_day - window_start_minute) / window_minutes * 100
//! height = (end - start in whole minutes)              / window_minutes * 100
//! ```
//!
//! Only the day view fans overlapping appointments out horizontally. In the
//! week view every appointment spans its full day column.

use crate::config::ViewWindow;
use crate::models::{Appointment, PositionedAppointment};
use chrono::{Duration, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

/// How the day view splits a row between overlapping appointments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Each appointment's width comes from its own direct overlaps only.
    ///
    /// Grouping is not transitive: with A-B and B-C overlapping but not A-C,
    /// A and C get half the row while B gets a third.
    #[default]
    Local,
    /// Connected overlap clusters share one width; columns are assigned
    /// greedily in start order.
    Clustered,
}

impl OverlapPolicy {
    pub fn from_string(value: &str) -> Result<Self, String> {
        match value.to_lowercase().trim() {
            "local" => Ok(OverlapPolicy::Local),
            "clustered" => Ok(OverlapPolicy::Clustered),
            _ => Err(format!(
                "Invalid overlap policy: '{}'. Must be one of: local, clustered",
                value
            )),
        }
    }
}

/// Vertical extent of one appointment in whole minutes relative to the window start.
#[derive(Debug, Clone, Copy)]
struct Span {
    offset: i64,
    length: i64,
}

impl Span {
    fn of(appointment: &Appointment, window: &ViewWindow) -> Self {
        let start = appointment.start;
        let minute_of_day = (start.hour() * 60 + start.minute()) as i64;
        Span {
            offset: minute_of_day - window.start_minute() as i64,
            length: (appointment.end - appointment.start).num_minutes(),
        }
    }

    fn end(&self) -> i64 {
        self.offset + self.length
    }

    fn overlaps(&self, other: &Span) -> bool {
        !(self.end() <= other.offset || other.end() <= self.offset)
    }
}

fn place_vertically(
    appointment: &Appointment,
    span: Span,
    window: &ViewWindow,
) -> PositionedAppointment {
    let total = window.total_minutes() as f64;
    PositionedAppointment {
        appointment: appointment.clone(),
        top: span.offset as f64 / total * 100.0,
        height: span.length as f64 / total * 100.0,
        left: 0.0,
        width: 100.0,
    }
}

/// Lays out a single day, fanning overlapping appointments across the row.
#[derive(Debug, Clone, Copy, Default)]
pub struct DayLayoutEngine {
    pub window: ViewWindow,
    pub policy: OverlapPolicy,
}

impl DayLayoutEngine {
    pub fn new(window: ViewWindow, policy: OverlapPolicy) -> Self {
        DayLayoutEngine { window, policy }
    }

    /// One positioned appointment per input, in input order.
    ///
    /// The input is expected to be confined to one calendar day. Pairwise
    /// overlap detection makes this O(n^2).
    pub fn layout(&self, appointments: &[Appointment]) -> Vec<PositionedAppointment> {
        let spans: Vec<Span> = appointments
            .iter()
            .map(|apt| Span::of(apt, &self.window))
            .collect();

        let columns = match self.policy {
            OverlapPolicy::Local => local_columns(&spans),
            OverlapPolicy::Clustered => clustered_columns(&spans),
        };

        appointments
            .iter()
            .zip(spans)
            .zip(columns)
            .map(|((apt, span), (column, count))| {
                let mut positioned = place_vertically(apt, span, &self.window);
                positioned.width = 100.0 / count as f64;
                positioned.left = column as f64 * positioned.width;
                positioned
            })
            .collect()
    }
}

/// `(column, group size)` per appointment from its direct-overlap group.
fn local_columns(spans: &[Span]) -> Vec<(usize, usize)> {
    spans
        .iter()
        .enumerate()
        .map(|(i, span)| {
            // Indices come out ascending, so the group is already in list order.
            let group: Vec<usize> = spans
                .iter()
                .enumerate()
                .filter(|(j, other)| *j == i || span.overlaps(other))
                .map(|(j, _)| j)
                .collect();
            let column = group.iter().position(|&j| j == i).unwrap_or(0);
            tracing::trace!(index = i, group = ?group, "overlap group");
            (column, group.len())
        })
        .collect()
}

/// `(column, column count)` per appointment from connected overlap clusters.
fn clustered_columns(spans: &[Span]) -> Vec<(usize, usize)> {
    let mut clusters = UnionFind::new(spans.len());
    for i in 0..spans.len() {
        for j in (i + 1)..spans.len() {
            if spans[i].overlaps(&spans[j]) {
                clusters.union(i, j);
            }
        }
    }

    let mut order: Vec<usize> = (0..spans.len()).collect();
    order.sort_by_key(|&i| (spans[i].offset, i));

    let mut assigned = vec![(0usize, 1usize); spans.len()];
    // Per cluster root: the end offset of the last appointment in each column.
    let mut column_ends: std::collections::HashMap<usize, Vec<i64>> =
        std::collections::HashMap::new();

    for &i in &order {
        let root = clusters.find(i);
        let ends = column_ends.entry(root).or_default();
        let column = match ends.iter().position(|&end| end <= spans[i].offset) {
            Some(free) => {
                ends[free] = spans[i].end();
                free
            }
            None => {
                ends.push(spans[i].end());
                ends.len() - 1
            }
        };
        assigned[i].0 = column;
    }

    for (i, slot) in assigned.iter_mut().enumerate() {
        let root = clusters.find(i);
        slot.1 = column_ends.get(&root).map_or(1, Vec::len);
    }

    assigned
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = i;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }
}

/// One calendar day of the week view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub appointments: Vec<PositionedAppointment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekLayout {
    pub week_start: NaiveDate,
    pub days: Vec<DayColumn>,
}

impl WeekLayout {
    /// All positioned appointments, day by day.
    pub fn flatten(&self) -> Vec<PositionedAppointment> {
        self.days
            .iter()
            .flat_map(|day| day.appointments.iter().cloned())
            .collect()
    }

    pub fn appointment_count(&self) -> usize {
        self.days.iter().map(|day| day.appointments.len()).sum()
    }
}

/// Lays out seven consecutive days with vertical placement only.
///
/// Same-day overlaps are left stacked at full width.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekLayoutEngine {
    pub window: ViewWindow,
}

impl WeekLayoutEngine {
    pub fn new(window: ViewWindow) -> Self {
        WeekLayoutEngine { window }
    }

    /// Buckets appointments by the calendar day of their start. Appointments
    /// outside `week_start..week_start + 7 days` are not shown.
    pub fn layout(&self, week_start: NaiveDate, appointments: &[Appointment]) -> WeekLayout {
        let days: Vec<DayColumn> = (0..7)
            .map(|offset| {
                let date = week_start + Duration::days(offset);
                let placed = appointments
                    .iter()
                    .filter(|apt| apt.start.date() == date)
                    .map(|apt| place_vertically(apt, Span::of(apt, &self.window), &self.window))
                    .collect();
                DayColumn {
                    date,
                    appointments: placed,
                }
            })
            .collect();

        let layout = WeekLayout { week_start, days };
        let dropped = appointments.len() - layout.appointment_count();
        if dropped > 0 {
            tracing::debug!(%week_start, dropped, "appointments outside the week were skipped");
        }
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentType;
    use chrono::NaiveDateTime;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn apt(id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Appointment {
        let minutes = (end - start).num_minutes();
        Appointment::new(id, "d1", id, AppointmentType::Consultation, start, end, minutes)
    }

    fn day_engine() -> DayLayoutEngine {
        DayLayoutEngine::default()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn vertical_placement_in_default_window() {
        let out = day_engine().layout(&[apt("a", at(2, 9, 0), at(2, 9, 30))]);
        assert_close(out[0].top, 10.0);
        assert_close(out[0].height, 5.0);
    }

    #[test]
    fn lone_appointment_takes_full_width() {
        let out = day_engine().layout(&[apt("a", at(2, 14, 0), at(2, 14, 30))]);
        assert_close(out[0].left, 0.0);
        assert_close(out[0].width, 100.0);
    }

    #[test]
    fn empty_day_yields_empty_layout() {
        assert!(day_engine().layout(&[]).is_empty());
    }

    #[test]
    fn pairwise_overlap_splits_row() {
        let out = day_engine().layout(&[
            apt("A", at(2, 9, 0), at(2, 10, 0)),
            apt("B", at(2, 9, 15), at(2, 10, 0)),
            apt("C", at(2, 14, 0), at(2, 14, 30)),
        ]);

        assert_close(out[0].width, 50.0);
        assert_close(out[0].left, 0.0);
        assert_close(out[1].width, 50.0);
        assert_close(out[1].left, 50.0);
        assert_close(out[2].width, 100.0);
        assert_close(out[2].left, 0.0);
    }

    #[test]
    fn local_grouping_is_not_transitive() {
        let out = day_engine().layout(&[
            apt("A", at(2, 9, 0), at(2, 9, 30)),
            apt("B", at(2, 9, 15), at(2, 9, 45)),
            apt("C", at(2, 9, 40), at(2, 10, 0)),
        ]);

        assert_close(out[0].width, 50.0);
        assert_close(out[0].left, 0.0);
        assert_close(out[1].width, 100.0 / 3.0);
        assert_close(out[1].left, 100.0 / 3.0);
        assert_close(out[2].width, 50.0);
        assert_close(out[2].left, 50.0);
    }

    #[test]
    fn group_position_follows_list_order_not_start_time() {
        let out = day_engine().layout(&[
            apt("later", at(2, 10, 0), at(2, 11, 0)),
            apt("earlier", at(2, 9, 30), at(2, 10, 30)),
        ]);
        assert_close(out[0].left, 0.0);
        assert_close(out[1].left, 50.0);
    }

    #[test]
    fn touching_appointments_do_not_share_row() {
        let out = day_engine().layout(&[
            apt("a", at(2, 9, 0), at(2, 9, 30)),
            apt("b", at(2, 9, 30), at(2, 10, 0)),
        ]);
        assert_close(out[0].width, 100.0);
        assert_close(out[1].width, 100.0);
    }

    #[test]
    fn touching_quarter_hour_boundary_stays_full_width() {
        // 12:45 sits at offset 285; a float comparison of 285 + 60 against
        // 345 as window percentages can report these as overlapping.
        let out = day_engine().layout(&[
            apt("a", at(2, 12, 45), at(2, 13, 45)),
            apt("b", at(2, 13, 45), at(2, 14, 15)),
        ]);
        for placed in &out {
            assert_close(placed.width, 100.0);
            assert_close(placed.left, 0.0);
        }
    }

    #[test]
    fn placement_is_not_clamped() {
        let out = day_engine().layout(&[
            apt("early", at(2, 7, 0), at(2, 8, 30)),
            apt("late", at(2, 17, 0), at(2, 19, 0)),
        ]);
        assert_close(out[0].top, -10.0);
        assert_close(out[0].height, 15.0);
        assert!(out[1].top + out[1].height > 100.0);
    }

    #[test]
    fn seconds_in_start_are_ignored_for_top() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(9, 0, 45)
            .unwrap();
        let out = day_engine().layout(&[apt("a", start, start + Duration::minutes(30))]);
        assert_close(out[0].top, 10.0);
    }

    #[test]
    fn clustered_policy_shares_width_across_chain() {
        let engine = DayLayoutEngine::new(ViewWindow::default(), OverlapPolicy::Clustered);
        let out = engine.layout(&[
            apt("A", at(2, 9, 0), at(2, 9, 30)),
            apt("B", at(2, 9, 15), at(2, 9, 45)),
            apt("C", at(2, 9, 40), at(2, 10, 0)),
            apt("D", at(2, 14, 0), at(2, 14, 30)),
        ]);

        // A and C can reuse column 0; B needs a second column.
        assert_close(out[0].width, 50.0);
        assert_close(out[1].width, 50.0);
        assert_close(out[2].width, 50.0);
        assert_close(out[0].left, 0.0);
        assert_close(out[1].left, 50.0);
        assert_close(out[2].left, 0.0);
        assert_close(out[3].width, 100.0);
    }

    #[test]
    fn clustered_policy_orders_columns_by_start() {
        let engine = DayLayoutEngine::new(ViewWindow::default(), OverlapPolicy::Clustered);
        let out = engine.layout(&[
            apt("later", at(2, 10, 0), at(2, 11, 0)),
            apt("earlier", at(2, 9, 30), at(2, 10, 30)),
        ]);
        assert_close(out[0].left, 50.0);
        assert_close(out[1].left, 0.0);
    }

    #[test]
    fn week_layout_buckets_by_start_day() {
        let monday = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let week = WeekLayoutEngine::default().layout(
            monday,
            &[
                apt("mon", at(2, 9, 0), at(2, 9, 30)),
                apt("wed", at(4, 11, 30), at(4, 12, 15)),
                apt("sun", at(8, 15, 0), at(8, 15, 30)),
                apt("next-mon", at(9, 9, 0), at(9, 9, 30)),
            ],
        );

        assert_eq!(week.days.len(), 7);
        assert_eq!(week.days[0].date, monday);
        assert_eq!(week.days[0].appointments[0].appointment.id, "mon");
        assert_eq!(week.days[2].appointments[0].appointment.id, "wed");
        assert_eq!(week.days[6].appointments[0].appointment.id, "sun");
        assert_eq!(week.appointment_count(), 3);
        assert_close(week.days[2].appointments[0].top, 35.0);
        assert_close(week.days[2].appointments[0].height, 7.5);
    }

    #[test]
    fn week_layout_never_fans_out_overlaps() {
        let monday = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let week = WeekLayoutEngine::default().layout(
            monday,
            &[
                apt("A", at(2, 9, 0), at(2, 10, 0)),
                apt("B", at(2, 9, 15), at(2, 10, 0)),
            ],
        );

        for placed in &week.days[0].appointments {
            assert_close(placed.left, 0.0);
            assert_close(placed.width, 100.0);
        }
        assert_eq!(week.flatten().len(), 2);
    }

    proptest! {
        #[test]
        fn widths_stay_within_row(
            starts in proptest::collection::vec((8u32..17, 0u32..60, 5i64..120), 0..12)
        ) {
            let appointments: Vec<Appointment> = starts
                .iter()
                .enumerate()
                .map(|(i, &(hour, minute, len))| {
                    let start = at(2, hour, minute);
                    apt(&i.to_string(), start, start + Duration::minutes(len))
                })
                .collect();

            for policy in [OverlapPolicy::Local, OverlapPolicy::Clustered] {
                let out = DayLayoutEngine::new(ViewWindow::default(), policy).layout(&appointments);
                prop_assert_eq!(out.len(), appointments.len());
                for placed in &out {
                    prop_assert!(placed.width > 0.0 && placed.width <= 100.0);
                    prop_assert!(placed.left + placed.width <= 100.0 + EPS);
                }
            }
        }
    }
}
