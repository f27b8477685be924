//! Editable form state for adding or editing a single subject.

use std::fmt;

use super::subject::{DayTimes, Resources, Subject, Weekday};
use super::time::is_valid_hhmm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    StartTime,
    EndTime,
    Days,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("Subject name is required")]
    NameRequired,
    #[error("Start time is required")]
    StartTimeRequired,
    #[error("Start time must be HH:MM")]
    InvalidStartTime,
    #[error("End time is required")]
    EndTimeRequired,
    #[error("End time must be HH:MM")]
    InvalidEndTime,
    #[error("End time must be after start time")]
    EndNotAfterStart,
    #[error("Please select {expected} {}", day_word(.expected))]
    WrongDayCount { expected: usize, selected: usize },
}

fn day_word(n: &usize) -> &'static str {
    if *n == 1 {
        "day"
    } else {
        "days"
    }
}

impl DraftError {
    pub fn field(&self) -> DraftField {
        match self {
            DraftError::NameRequired => DraftField::Name,
            DraftError::StartTimeRequired | DraftError::InvalidStartTime => DraftField::StartTime,
            DraftError::EndTimeRequired
            | DraftError::InvalidEndTime
            | DraftError::EndNotAfterStart => DraftField::EndTime,
            DraftError::WrongDayCount { .. } => DraftField::Days,
        }
    }
}

/// Every field error found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftErrors(pub Vec<DraftError>);

impl DraftErrors {
    pub fn for_field(&self, field: DraftField) -> Option<&DraftError> {
        self.0.iter().find(|e| e.field() == field)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DraftError> {
        self.0.iter()
    }
}

impl fmt::Display for DraftErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for DraftErrors {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectDraft {
    /// Set when editing an existing subject.
    pub id: Option<String>,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub days_per_week: usize,
    pub selected_days: Vec<Weekday>,
    pub book_link: String,
    pub google_doc_link: String,
}

impl Default for SubjectDraft {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            days_per_week: 1,
            selected_days: Vec::new(),
            book_link: String::new(),
            google_doc_link: String::new(),
        }
    }
}

impl SubjectDraft {
    pub fn from_subject(subject: &Subject) -> Self {
        let selected_days = subject.selected_days();
        // Fall back to the first scheduled time when days differ.
        let start_time = subject
            .start_time()
            .or_else(|| {
                selected_days
                    .iter()
                    .map(|d| subject.times.time(*d))
                    .find(|t| !t.is_empty())
            })
            .unwrap_or_default()
            .to_string();

        Self {
            id: Some(subject.id().to_string()),
            name: subject.name.clone(),
            start_time,
            end_time: subject.end_time.clone().unwrap_or_default(),
            days_per_week: selected_days.len().max(1),
            selected_days,
            book_link: subject.resources.book_link.clone(),
            google_doc_link: subject.resources.google_doc_link.clone(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.id.is_some()
    }

    /// Change the recurrence count, dropping selections beyond it.
    pub fn set_days_per_week(&mut self, n: usize) {
        self.days_per_week = n.clamp(1, Weekday::ALL.len());
        self.selected_days.truncate(self.days_per_week);
    }

    /// Select or deselect a day. Selecting is refused once the
    /// recurrence count is reached.
    pub fn toggle_day(&mut self, day: Weekday) {
        if let Some(pos) = self.selected_days.iter().position(|d| *d == day) {
            self.selected_days.remove(pos);
        } else if self.selected_days.len() < self.days_per_week {
            self.selected_days.push(day);
        }
    }

    pub fn validate(&self) -> Result<Subject, DraftErrors> {
        let mut errors = Vec::new();
        let start = self.start_time.trim();
        let end = self.end_time.trim();

        if self.name.trim().is_empty() {
            errors.push(DraftError::NameRequired);
        }

        if start.is_empty() {
            errors.push(DraftError::StartTimeRequired);
        } else if !is_valid_hhmm(start) {
            errors.push(DraftError::InvalidStartTime);
        }

        if end.is_empty() {
            errors.push(DraftError::EndTimeRequired);
        } else if !is_valid_hhmm(end) {
            errors.push(DraftError::InvalidEndTime);
        } else if is_valid_hhmm(start) && start >= end {
            errors.push(DraftError::EndNotAfterStart);
        }

        if self.selected_days.len() != self.days_per_week {
            errors.push(DraftError::WrongDayCount {
                expected: self.days_per_week,
                selected: self.selected_days.len(),
            });
        }

        if !errors.is_empty() {
            return Err(DraftErrors(errors));
        }

        let mut subject = match &self.id {
            Some(id) => Subject::with_id(id.clone(), self.name.trim()),
            None => Subject::new(self.name.trim()),
        };
        subject.times = DayTimes::uniform(&self.selected_days, start);
        subject.end_time = Some(end.to_string());
        subject.resources = Resources {
            book_link: self.book_link.trim().to_string(),
            google_doc_link: self.google_doc_link.trim().to_string(),
        };
        Ok(subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> SubjectDraft {
        SubjectDraft {
            name: "Science".into(),
            start_time: "10:15".into(),
            end_time: "10:55".into(),
            days_per_week: 2,
            selected_days: vec![Weekday::Thursday, Weekday::Tuesday],
            ..SubjectDraft::default()
        }
    }

    #[test]
    fn valid_draft_applies_start_to_every_selected_day() {
        let subject = filled().validate().unwrap();
        assert_eq!(subject.times.time(Weekday::Tuesday), "10:15");
        assert_eq!(subject.times.time(Weekday::Thursday), "10:15");
        assert_eq!(subject.times.time(Weekday::Monday), "");
        assert_eq!(subject.end_time.as_deref(), Some("10:55"));
        assert_eq!(subject.validate(), Ok(()));
    }

    #[test]
    fn empty_draft_reports_each_field() {
        let errors = SubjectDraft::default().validate().unwrap_err();
        assert!(errors.for_field(DraftField::Name).is_some());
        assert!(errors.for_field(DraftField::StartTime).is_some());
        assert!(errors.for_field(DraftField::EndTime).is_some());
        assert_eq!(
            errors.for_field(DraftField::Days).map(ToString::to_string),
            Some("Please select 1 day".to_string())
        );
    }

    #[test]
    fn end_must_follow_start() {
        let mut draft = filled();
        draft.end_time = "10:15".into();
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.0, vec![DraftError::EndNotAfterStart]);
    }

    #[test]
    fn day_count_message_pluralizes() {
        let mut draft = filled();
        draft.set_days_per_week(3);
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.to_string(), "Please select 3 days");
    }

    #[test]
    fn toggle_day_respects_days_per_week() {
        let mut draft = SubjectDraft::default();
        draft.toggle_day(Weekday::Monday);
        draft.toggle_day(Weekday::Friday);
        assert_eq!(draft.selected_days, vec![Weekday::Monday]);
        draft.toggle_day(Weekday::Monday);
        assert!(draft.selected_days.is_empty());
    }

    #[test]
    fn lowering_days_per_week_truncates_selection() {
        let mut draft = filled();
        draft.set_days_per_week(1);
        assert_eq!(draft.selected_days, vec![Weekday::Thursday]);
    }

    #[test]
    fn editing_keeps_the_id() {
        let mut original = Subject::with_id("keep-me", "Music");
        original.times = DayTimes::uniform(&[Weekday::Friday], "13:00");
        original.end_time = Some("13:30".into());

        let mut draft = SubjectDraft::from_subject(&original);
        assert!(draft.is_editing());
        assert_eq!(draft.start_time, "13:00");
        draft.name = "Music and Arts".into();

        let edited = draft.validate().unwrap();
        assert_eq!(edited.id(), "keep-me");
        assert_eq!(edited.name, "Music and Arts");
    }
}
