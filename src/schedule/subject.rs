use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time::is_valid_hhmm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }

    pub fn short_label(&self) -> &'static str {
        &self.label()[..3]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// School weekday for a calendar weekday; weekends have none.
    pub fn from_chrono(day: chrono::Weekday) -> Option<Self> {
        match day {
            chrono::Weekday::Mon => Some(Weekday::Monday),
            chrono::Weekday::Tue => Some(Weekday::Tuesday),
            chrono::Weekday::Wed => Some(Weekday::Wednesday),
            chrono::Weekday::Thu => Some(Weekday::Thursday),
            chrono::Weekday::Fri => Some(Weekday::Friday),
            chrono::Weekday::Sat | chrono::Weekday::Sun => None,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = SubjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|day| day.as_str() == needle)
            .ok_or_else(|| SubjectError::UnknownWeekday(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubjectError {
    #[error("subject name is required")]
    EmptyName,
    #[error("no start time set for {0}")]
    MissingDayTime(Weekday),
    #[error("`{time}` on {day} is not a valid HH:MM time")]
    InvalidTime { day: Weekday, time: String },
    #[error("end time `{0}` is not a valid HH:MM time")]
    InvalidEndTime(String),
    #[error("end time {end} must be after start time {start}")]
    EndNotAfterStart { start: String, end: String },
    #[error("subject id {0} is already in the collection")]
    DuplicateId(String),
    #[error("no subject with id {0}")]
    NotFound(String),
    #[error("unknown weekday `{0}`")]
    UnknownWeekday(String),
}

/// Per-weekday start times. A day is scheduled when it has an entry; the
/// entry may be empty only for imported rows whose time did not parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayTimes([Option<String>; 5]);

impl DayTimes {
    /// Same start time on every given day.
    pub fn uniform(days: &[Weekday], time: &str) -> Self {
        let mut times = Self::default();
        for day in days {
            times.schedule(*day, time);
        }
        times
    }

    pub fn get(&self, day: Weekday) -> Option<&str> {
        self.0[day.index()].as_deref()
    }

    /// Start time on `day`, or `""` when not scheduled.
    pub fn time(&self, day: Weekday) -> &str {
        self.get(day).unwrap_or("")
    }

    pub fn is_scheduled(&self, day: Weekday) -> bool {
        self.0[day.index()].is_some()
    }

    pub fn schedule(&mut self, day: Weekday, time: impl Into<String>) {
        self.0[day.index()] = Some(time.into());
    }

    pub fn unschedule(&mut self, day: Weekday) {
        self.0[day.index()] = None;
    }

    /// Scheduled days, Monday first.
    pub fn days(&self) -> Vec<Weekday> {
        Weekday::ALL
            .into_iter()
            .filter(|day| self.is_scheduled(*day))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|slot| slot.is_some()).count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resources {
    #[serde(default)]
    pub book_link: String,
    #[serde(default)]
    pub google_doc_link: String,
}

impl Resources {
    pub fn is_empty(&self) -> bool {
        self.book_link.trim().is_empty() && self.google_doc_link.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frequency {
    #[serde(default)]
    pub days_per_week: usize,
    #[serde(default)]
    pub selected_days: Vec<Weekday>,
}

/// A recurring lesson.
///
/// The per-day table is the single source of truth; `selectedDays`,
/// `daysPerWeek` and the shared `startTime` of the JSON form are derived
/// from it on the way out and folded back into it on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SubjectRecord", into = "SubjectRecord")]
pub struct Subject {
    id: String,
    pub name: String,
    pub times: DayTimes,
    pub end_time: Option<String>,
    pub resources: Resources,
}

impl Subject {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name)
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            times: DayTimes::default(),
            end_time: None,
            resources: Resources::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn selected_days(&self) -> Vec<Weekday> {
        self.times.days()
    }

    pub fn days_per_week(&self) -> usize {
        self.times.count()
    }

    pub fn frequency(&self) -> Frequency {
        Frequency {
            days_per_week: self.days_per_week(),
            selected_days: self.selected_days(),
        }
    }

    pub fn is_scheduled_on(&self, day: Weekday) -> bool {
        self.times.is_scheduled(day)
    }

    /// The start time shared by every scheduled day, if there is one.
    pub fn start_time(&self) -> Option<&str> {
        let mut days = self.selected_days().into_iter();
        let first = self.times.time(days.next()?);
        if first.is_empty() {
            return None;
        }
        days.all(|day| self.times.time(day) == first).then_some(first)
    }

    pub fn validate(&self) -> Result<(), SubjectError> {
        if self.name.trim().is_empty() {
            return Err(SubjectError::EmptyName);
        }
        for day in self.selected_days() {
            let time = self.times.time(day);
            if time.is_empty() {
                return Err(SubjectError::MissingDayTime(day));
            }
            if !is_valid_hhmm(time) {
                return Err(SubjectError::InvalidTime {
                    day,
                    time: time.to_string(),
                });
            }
        }
        if let Some(end) = &self.end_time {
            if !is_valid_hhmm(end) {
                return Err(SubjectError::InvalidEndTime(end.clone()));
            }
            for day in self.selected_days() {
                let start = self.times.time(day);
                if start >= end.as_str() {
                    return Err(SubjectError::EndNotAfterStart {
                        start: start.to_string(),
                        end: end.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

// ── JSON wire shape ──

#[derive(Debug, Default, Serialize, Deserialize)]
struct TimesRecord {
    #[serde(default)]
    monday: String,
    #[serde(default)]
    tuesday: String,
    #[serde(default)]
    wednesday: String,
    #[serde(default)]
    thursday: String,
    #[serde(default)]
    friday: String,
}

impl TimesRecord {
    fn get(&self, day: Weekday) -> &str {
        match day {
            Weekday::Monday => &self.monday,
            Weekday::Tuesday => &self.tuesday,
            Weekday::Wednesday => &self.wednesday,
            Weekday::Thursday => &self.thursday,
            Weekday::Friday => &self.friday,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubjectRecord {
    id: String,
    name: String,
    #[serde(default)]
    times: TimesRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_time: Option<String>,
    #[serde(default)]
    resources: Resources,
    #[serde(default)]
    frequency: Frequency,
}

impl From<SubjectRecord> for Subject {
    fn from(record: SubjectRecord) -> Self {
        let start = record.start_time.filter(|s| !s.is_empty());
        let mut times = DayTimes::default();
        for day in Weekday::ALL {
            let time = record.times.get(day);
            if !time.is_empty() {
                times.schedule(day, time);
            } else if record.frequency.selected_days.contains(&day) {
                times.schedule(day, start.clone().unwrap_or_default());
            }
        }
        Self {
            id: record.id,
            name: record.name,
            times,
            end_time: record.end_time.filter(|s| !s.is_empty()),
            resources: record.resources,
        }
    }
}

impl From<Subject> for SubjectRecord {
    fn from(subject: Subject) -> Self {
        let t = &subject.times;
        Self {
            times: TimesRecord {
                monday: t.time(Weekday::Monday).to_string(),
                tuesday: t.time(Weekday::Tuesday).to_string(),
                wednesday: t.time(Weekday::Wednesday).to_string(),
                thursday: t.time(Weekday::Thursday).to_string(),
                friday: t.time(Weekday::Friday).to_string(),
            },
            start_time: subject.start_time().map(str::to_string),
            frequency: subject.frequency(),
            id: subject.id,
            name: subject.name,
            end_time: subject.end_time,
            resources: subject.resources,
        }
    }
}

// ── Collection ──

/// Ordered subject list; insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Subject>", into = "Vec<Subject>")]
pub struct SubjectCollection {
    subjects: Vec<Subject>,
}

impl SubjectCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn as_slice(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Subject> {
        self.subjects.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.subjects.iter().position(|s| s.id == id)
    }

    pub fn add(&mut self, subject: Subject) -> Result<(), SubjectError> {
        if self.get(&subject.id).is_some() {
            return Err(SubjectError::DuplicateId(subject.id));
        }
        self.subjects.push(subject);
        Ok(())
    }

    /// Append a batch. Nothing is added if any id collides.
    pub fn extend(&mut self, batch: Vec<Subject>) -> Result<usize, SubjectError> {
        for (i, subject) in batch.iter().enumerate() {
            let seen_in_batch = batch[..i].iter().any(|s| s.id == subject.id);
            if seen_in_batch || self.get(&subject.id).is_some() {
                return Err(SubjectError::DuplicateId(subject.id.clone()));
            }
        }
        let added = batch.len();
        self.subjects.extend(batch);
        Ok(added)
    }

    /// Full replace of the subject with the same id, keeping its position.
    pub fn replace(&mut self, subject: Subject) -> Result<(), SubjectError> {
        let idx = self
            .position(&subject.id)
            .ok_or_else(|| SubjectError::NotFound(subject.id.clone()))?;
        self.subjects[idx] = subject;
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<Subject, SubjectError> {
        let idx = self
            .position(id)
            .ok_or_else(|| SubjectError::NotFound(id.to_string()))?;
        Ok(self.subjects.remove(idx))
    }
}

impl From<Vec<Subject>> for SubjectCollection {
    /// Later entries with an id already seen are dropped.
    fn from(subjects: Vec<Subject>) -> Self {
        let mut collection = Self::new();
        for subject in subjects {
            let id = subject.id.clone();
            if collection.add(subject).is_err() {
                tracing::warn!(%id, "dropping subject with duplicate id");
            }
        }
        collection
    }
}

impl From<SubjectCollection> for Vec<Subject> {
    fn from(collection: SubjectCollection) -> Self {
        collection.subjects
    }
}

impl<'a> IntoIterator for &'a SubjectCollection {
    type Item = &'a Subject;
    type IntoIter = std::slice::Iter<'a, Subject>;

    fn into_iter(self) -> Self::IntoIter {
        self.subjects.iter()
    }
}
