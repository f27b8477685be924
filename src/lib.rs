//! Weekly lesson planning: subjects with per-day start times, CSV
//! timetable import, schedule projection, and persistence to a REST API
//! or a local JSON file.

pub mod config;
pub mod logging;
pub mod schedule;
pub mod store;
pub mod theme;
