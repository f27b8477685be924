//! Batch creation of subjects that share one time and day selection.

use std::fmt;

use super::subject::{DayTimes, Subject, Weekday};
use super::time::is_valid_hhmm;

pub const COMMON_SUBJECTS: &[&str] = &[
    "Bible & Pray",
    "Mathematics",
    "English",
    "Filipino",
    "Science",
    "AP (Geography)",
    "English Literature",
    "English Communication",
    "Filipino Reading",
    "Mental Math",
    "Physical Education",
    "Music and Arts",
    "Health",
    "Character Education",
    "Nature Study",
    "Art Appreciation",
    "Poetry Memory Work",
    "Bible Memory Work",
    "Leisure Reading",
    "Sketching / Drawing",
];

pub const COMMON_TIMES: &[&str] = &[
    "08:30", "08:50", "09:20", "09:25", "09:40", "09:55", "10:15", "10:25", "10:40", "10:55",
    "11:10", "11:40", "13:00", "13:10", "13:20", "13:30", "13:35",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickTime {
    /// A single start time picked from the presets.
    Preset(String),
    /// A typed start/end pair.
    Custom { start: String, end: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuickAddError {
    #[error("Select a time")]
    MissingTime,
    #[error("`{0}` is not a valid HH:MM time")]
    InvalidTime(String),
    #[error("Select at least one day")]
    MissingDays,
    #[error("Select at least one subject")]
    MissingSubjects,
    #[error("End time must be after start time")]
    EndNotAfterStart,
}

/// All violated preconditions of one build attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickAddErrors(pub Vec<QuickAddError>);

impl QuickAddErrors {
    pub fn contains(&self, error: &QuickAddError) -> bool {
        self.0.contains(error)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuickAddError> {
        self.0.iter()
    }
}

impl fmt::Display for QuickAddErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for QuickAddErrors {}

fn check_time(time: &str, errors: &mut Vec<QuickAddError>) -> bool {
    if is_valid_hhmm(time) {
        true
    } else {
        errors.push(QuickAddError::InvalidTime(time.to_string()));
        false
    }
}

/// Resolve the time selection into a start and optional end.
fn resolve_time(time: Option<&QuickTime>, errors: &mut Vec<QuickAddError>) -> Option<(String, Option<String>)> {
    match time {
        None => {
            errors.push(QuickAddError::MissingTime);
            None
        }
        Some(QuickTime::Preset(start)) => {
            let start = start.trim();
            if start.is_empty() {
                errors.push(QuickAddError::MissingTime);
                return None;
            }
            check_time(start, errors).then(|| (start.to_string(), None))
        }
        Some(QuickTime::Custom { start, end }) => {
            let (start, end) = (start.trim(), end.trim());
            if start.is_empty() || end.is_empty() {
                errors.push(QuickAddError::MissingTime);
                return None;
            }
            let start_ok = check_time(start, errors);
            let end_ok = check_time(end, errors);
            if !(start_ok && end_ok) {
                return None;
            }
            if end <= start {
                errors.push(QuickAddError::EndNotAfterStart);
                return None;
            }
            Some((start.to_string(), Some(end.to_string())))
        }
    }
}

/// Build one subject per name, all on `days` at the resolved time.
///
/// Blank names are ignored and repeated names collapse to one subject.
/// Every failed precondition is reported, not just the first.
pub fn build<S: AsRef<str>>(
    names: &[S],
    days: &[Weekday],
    time: Option<&QuickTime>,
) -> Result<Vec<Subject>, QuickAddErrors> {
    let mut errors = Vec::new();

    let resolved = resolve_time(time, &mut errors);

    if days.is_empty() {
        errors.push(QuickAddError::MissingDays);
    }

    let mut unique: Vec<&str> = Vec::new();
    for name in names.iter().map(|n| n.as_ref().trim()) {
        if !name.is_empty() && !unique.contains(&name) {
            unique.push(name);
        }
    }
    if unique.is_empty() {
        errors.push(QuickAddError::MissingSubjects);
    }

    let (start, end) = match resolved {
        Some(resolved) if errors.is_empty() => resolved,
        _ => return Err(QuickAddErrors(errors)),
    };

    let times = DayTimes::uniform(days, &start);
    let subjects: Vec<Subject> = unique
        .into_iter()
        .map(|name| {
            let mut subject = Subject::new(name);
            subject.times = times.clone();
            subject.end_time = end.clone();
            subject
        })
        .collect();

    tracing::debug!(count = subjects.len(), %start, "built quick-add batch");
    Ok(subjects)
}
