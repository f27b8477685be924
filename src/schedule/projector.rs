//! Per-day occurrence lists shared by the schedule list and the week grid.

use super::subject::{Subject, Weekday};
use super::time::{slot_height, time_to_offset};

pub const PALETTE_SIZE: u8 = 8;

/// Stable color slot derived from a subject's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorTag(u8);

impl ColorTag {
    /// First character's code point modulo the palette size; an empty
    /// name gets slot 0.
    pub fn for_name(name: &str) -> Self {
        let slot = name
            .chars()
            .next()
            .map(|c| (c as u32 % PALETTE_SIZE as u32) as u8)
            .unwrap_or(0);
        Self(slot)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One subject placed on one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence<'a> {
    pub subject: &'a Subject,
    pub start_time: &'a str,
    /// The subject's end time, or `start_time` for a zero-length slot.
    pub end_time: &'a str,
    pub color: ColorTag,
}

/// Occurrences of `subjects` on `day`, earliest first.
///
/// Ties keep collection order (`sort_by` is stable).
pub fn project(subjects: &[Subject], day: Weekday) -> Vec<Occurrence<'_>> {
    let mut occurrences: Vec<Occurrence<'_>> = subjects
        .iter()
        .filter_map(|subject| {
            let start = subject.times.get(day).filter(|t| !t.is_empty())?;
            Some(Occurrence {
                subject,
                start_time: start,
                end_time: subject.end_time.as_deref().unwrap_or(start),
                color: ColorTag::for_name(&subject.name),
            })
        })
        .collect();
    occurrences.sort_by(|a, b| a.start_time.cmp(b.start_time));
    occurrences
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSchedule<'a> {
    days: [Vec<Occurrence<'a>>; 5],
}

impl<'a> WeekSchedule<'a> {
    pub fn day(&self, day: Weekday) -> &[Occurrence<'a>] {
        &self.days[day.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[Occurrence<'a>])> + '_ {
        Weekday::ALL.into_iter().map(move |d| (d, self.day(d)))
    }

    pub fn total(&self) -> usize {
        self.days.iter().map(Vec::len).sum()
    }
}

pub fn project_week(subjects: &[Subject]) -> WeekSchedule<'_> {
    WeekSchedule {
        days: Weekday::ALL.map(|day| project(subjects, day)),
    }
}

/// Vertical scale of the week grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    pub start_hour: u32,
    pub end_hour: u32,
    pub pixels_per_hour: f64,
    pub min_height: f64,
}

impl GridMetrics {
    pub fn total_height(&self) -> f64 {
        self.end_hour.saturating_sub(self.start_hour) as f64 * self.pixels_per_hour
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSlot<'a> {
    pub occurrence: Occurrence<'a>,
    pub top: f64,
    pub height: f64,
}

impl GridSlot<'_> {
    /// Whether any part of the slot falls inside `0..total_height`.
    pub fn is_visible(&self, metrics: &GridMetrics) -> bool {
        self.top + self.height > 0.0 && self.top < metrics.total_height()
    }
}

/// Position each occurrence on the grid. Slots outside the window are
/// kept; the view clips them.
pub fn grid_layout<'a>(occurrences: &[Occurrence<'a>], metrics: &GridMetrics) -> Vec<GridSlot<'a>> {
    occurrences
        .iter()
        .map(|occ| GridSlot {
            occurrence: *occ,
            top: time_to_offset(occ.start_time, metrics.start_hour, metrics.pixels_per_hour),
            height: slot_height(
                occ.start_time,
                Some(occ.end_time),
                metrics.pixels_per_hour,
                metrics.min_height,
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::subject::DayTimes;
    use proptest::prelude::*;

    fn at(name: &str, day: Weekday, time: &str) -> Subject {
        let mut subject = Subject::with_id(name, name);
        subject.times = DayTimes::uniform(&[day], time);
        subject
    }

    #[test]
    fn ties_keep_collection_order() {
        let subjects = vec![
            at("nine", Weekday::Monday, "09:00"),
            at("first-830", Weekday::Monday, "08:30"),
            at("second-830", Weekday::Monday, "08:30"),
        ];
        let order: Vec<&str> = project(&subjects, Weekday::Monday)
            .iter()
            .map(|o| o.subject.id())
            .collect();
        assert_eq!(order, vec!["first-830", "second-830", "nine"]);
    }

    #[test]
    fn other_days_and_empty_times_are_skipped() {
        let mut unparsed = at("unparsed", Weekday::Monday, "");
        unparsed.times.schedule(Weekday::Tuesday, "10:00");
        let subjects = vec![unparsed, at("tue", Weekday::Tuesday, "09:00")];

        assert!(project(&subjects, Weekday::Monday).is_empty());
        assert_eq!(project(&subjects, Weekday::Tuesday).len(), 2);
    }

    #[test]
    fn end_time_defaults_to_start() {
        let mut with_end = at("a", Weekday::Friday, "13:00");
        with_end.end_time = Some("13:30".into());
        let subjects = vec![with_end, at("b", Weekday::Friday, "14:00")];

        let friday = project(&subjects, Weekday::Friday);
        assert_eq!(friday[0].end_time, "13:30");
        assert_eq!(friday[1].end_time, "14:00");
    }

    #[test]
    fn color_depends_only_on_name() {
        let a = at("x", Weekday::Monday, "09:00");
        let mut b = at("y", Weekday::Thursday, "11:00");
        b.name = a.name.clone();
        assert_eq!(ColorTag::for_name(&a.name), ColorTag::for_name(&b.name));
        assert_eq!(ColorTag::for_name("A").index(), 65 % 8);
        assert_eq!(ColorTag::for_name("").index(), 0);
    }

    #[test]
    fn week_projection_matches_per_day_projection() {
        let mut both = at("both", Weekday::Monday, "10:00");
        both.times.schedule(Weekday::Wednesday, "10:00");
        let subjects = vec![both, at("mon", Weekday::Monday, "08:00")];

        let week = project_week(&subjects);
        assert_eq!(week.total(), 3);
        for (day, occurrences) in week.iter() {
            assert_eq!(occurrences, project(&subjects, day).as_slice());
        }
    }

    #[test]
    fn grid_layout_positions_by_time() {
        let mut subject = at("s", Weekday::Monday, "09:30");
        subject.end_time = Some("10:30".into());
        let subjects = vec![subject];
        let metrics = GridMetrics {
            start_hour: 8,
            end_hour: 16,
            pixels_per_hour: 2.0,
            min_height: 1.0,
        };

        let slots = grid_layout(&project(&subjects, Weekday::Monday), &metrics);
        assert_eq!(slots[0].top, 3.0);
        assert_eq!(slots[0].height, 2.0);
        assert!(slots[0].is_visible(&metrics));
        assert_eq!(metrics.total_height(), 16.0);
    }

    #[test]
    fn slot_before_window_is_not_visible() {
        let subjects = vec![at("early", Weekday::Monday, "06:00")];
        let metrics = GridMetrics {
            start_hour: 8,
            end_hour: 16,
            pixels_per_hour: 2.0,
            min_height: 1.0,
        };
        let slots = grid_layout(&project(&subjects, Weekday::Monday), &metrics);
        assert_eq!(slots[0].top, -4.0);
        assert!(!slots[0].is_visible(&metrics));
    }

    proptest! {
        #[test]
        fn projection_is_sorted_and_stable(times in prop::collection::vec(0u32..4, 0..12)) {
            let subjects: Vec<Subject> = times
                .iter()
                .enumerate()
                .map(|(i, t)| at(&format!("s{i:02}"), Weekday::Monday, &format!("{:02}:00", 8 + t)))
                .collect();
            let projected = project(&subjects, Weekday::Monday);
            prop_assert_eq!(projected.len(), subjects.len());
            for pair in projected.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                prop_assert!(a.start_time <= b.start_time);
                if a.start_time == b.start_time {
                    prop_assert!(a.subject.id() < b.subject.id());
                }
            }
        }
    }
}
