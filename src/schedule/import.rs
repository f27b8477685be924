//! Bulk import of a timetable pasted from a spreadsheet.
//!
//! Expected layout: a header row naming a `time` column and one column per
//! weekday, then one row per time slot with subject names in the day cells.
//!
//! ```text
//! Time,Monday,Tuesday,Wednesday,Thursday,Friday
//! 8:30 - 8:50 AM,Bible & Pray,Bible & Pray,,Bible & Pray,
//! 8:50 - 9:20 AM,Mathematics,English,Mathematics,English,Science
//! ```

use indexmap::IndexMap;

use super::subject::{Subject, SubjectCollection, SubjectError, Weekday};
use super::time::parse_time_range;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("no CSV data to import")]
    Empty,
    #[error("header row has no `{0}` column")]
    MissingColumn(&'static str),
    #[error("header row has no weekday columns")]
    NoWeekdayColumns,
}

/// A row whose time cell did not parse. Its subjects are still imported,
/// with an empty start time on the affected days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportWarning {
    /// 1-based line number in the pasted text.
    pub line: usize,
    pub time: String,
}

/// Result of an import pass. Nothing touches the subject list until the
/// caller commits it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportPreview {
    pub subjects: Vec<Subject>,
    pub warnings: Vec<ImportWarning>,
}

impl ImportPreview {
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Append the previewed subjects to `collection`.
    pub fn commit_into(self, collection: &mut SubjectCollection) -> Result<usize, SubjectError> {
        collection.extend(self.subjects)
    }
}

struct Header {
    time: usize,
    days: Vec<(Weekday, usize)>,
}

impl Header {
    fn parse(line: &str) -> Result<Self, ImportError> {
        let names: Vec<String> = line.split(',').map(|h| h.trim().to_lowercase()).collect();

        // A repeated header maps to its last column.
        let column = |name: &str| names.iter().rposition(|h| h == name);

        let time = column("time").ok_or(ImportError::MissingColumn("time"))?;
        let days: Vec<(Weekday, usize)> = Weekday::ALL
            .into_iter()
            .filter_map(|day| column(day.as_str()).map(|idx| (day, idx)))
            .collect();

        if days.is_empty() {
            return Err(ImportError::NoWeekdayColumns);
        }
        Ok(Self { time, days })
    }
}

/// Parse pasted CSV into a preview of subjects.
///
/// Subjects are keyed by lower-cased name, so a name appearing in several
/// rows accumulates days instead of producing duplicates. Output order is
/// the order in which names were first seen.
pub fn import_csv(text: &str) -> Result<ImportPreview, ImportError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ImportError::Empty);
    }

    let mut lines = text.lines().enumerate();
    let (_, header_line) = lines.next().ok_or(ImportError::Empty)?;
    let header = Header::parse(header_line)?;

    let mut by_name: IndexMap<String, Subject> = IndexMap::new();
    let mut warnings = Vec::new();
    let mut rows = 0usize;

    for (idx, line) in lines {
        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        let cell = |i: usize| cells.get(i).copied().unwrap_or("");

        let time = cell(header.time);
        if time.is_empty() || header.days.iter().all(|(_, i)| cell(*i).is_empty()) {
            continue;
        }
        rows += 1;

        let range = parse_time_range(time);
        if !range.is_parsed() {
            tracing::warn!(line = idx + 1, time, "unparsed time in import row");
            warnings.push(ImportWarning {
                line: idx + 1,
                time: time.to_string(),
            });
        }

        for (day, col) in &header.days {
            let name = cell(*col);
            if name.is_empty() {
                continue;
            }
            by_name
                .entry(name.to_lowercase())
                .or_insert_with(|| Subject::new(name))
                .times
                .schedule(*day, range.start.clone());
        }
    }

    tracing::debug!(rows, subjects = by_name.len(), "parsed import preview");

    Ok(ImportPreview {
        subjects: by_name.into_values().collect(),
        warnings,
    })
}
