pub mod draft;
pub mod import;
pub mod projector;
pub mod quick_add;
pub mod subject;
pub mod time;

pub use draft::{DraftError, DraftErrors, DraftField, SubjectDraft};
pub use import::{import_csv, ImportError, ImportPreview, ImportWarning};
pub use projector::{
    grid_layout, project, project_week, ColorTag, GridMetrics, GridSlot, Occurrence, WeekSchedule,
};
pub use quick_add::{QuickAddError, QuickAddErrors, QuickTime};
pub use subject::{DayTimes, Resources, Subject, SubjectCollection, SubjectError, Weekday};
pub use time::{format_time, parse_time_range, slot_height, time_to_offset, TimeRange};
