use lesson_planner::schedule::quick_add::{self, QuickAddError, QuickTime};
use lesson_planner::schedule::{
    format_time, import_csv, parse_time_range, project, project_week, DayTimes, Subject,
    SubjectCollection, Weekday,
};
use pretty_assertions::assert_eq;

const TIMETABLE: &str = "\
Time,Monday,Tuesday,Wednesday,Thursday,Friday
8:30 - 8:50 AM,Bible & Pray,Bible & Pray,Bible & Pray,Bible & Pray,Bible & Pray
8:50 - 9:20 AM,Mathematics,English,Mathematics,English,Science
9:20 - 9:40 AM,Recess,Recess,Recess,Recess,Recess
9:40 - 10:15 AM,English,Mathematics,Science,Mathematics,English
1:00 - 1:30,Music and Arts,,Health,,Physical Education
";

/// Name and per-day table; ids are random per import.
fn shape(subjects: &[Subject]) -> Vec<(String, Vec<(Weekday, String)>)> {
    subjects
        .iter()
        .map(|s| {
            let days = s
                .selected_days()
                .into_iter()
                .map(|d| (d, s.times.time(d).to_string()))
                .collect();
            (s.name.clone(), days)
        })
        .collect()
}

#[test]
fn format_time_display_conventions() {
    assert_eq!(format_time("00:00"), "12:00 AM");
    assert_eq!(format_time("12:00"), "12:00 PM");
    assert_eq!(format_time("13:05"), "1:05 PM");
}

#[test]
fn parse_time_range_cases() {
    let am = parse_time_range("8:30 - 8:50 AM");
    assert_eq!((am.start.as_str(), am.end.as_str()), ("08:30", "08:50"));

    let bare = parse_time_range("1:00 - 1:10");
    assert_eq!((bare.start.as_str(), bare.end.as_str()), ("1:00", "1:10"));

    let garbage = parse_time_range("garbage");
    assert_eq!((garbage.start.as_str(), garbage.end.as_str()), ("", ""));
}

#[test]
fn importing_twice_gives_equal_structure() {
    let first = import_csv(TIMETABLE).unwrap();
    let second = import_csv(TIMETABLE).unwrap();

    assert_eq!(shape(&first.subjects), shape(&second.subjects));
    assert_ne!(first.subjects[0].id(), second.subjects[0].id());
}

#[test]
fn import_merges_rows_by_case_insensitive_name() {
    let csv = "Time,Monday,Tuesday,Wednesday\n\
               8:50 - 9:20 AM,Mathematics,,\n\
               9:40 - 10:15 AM,,MATHEMATICS,\n";
    let preview = import_csv(csv).unwrap();

    assert_eq!(preview.subjects.len(), 1);
    let math = &preview.subjects[0];
    assert_eq!(math.selected_days(), vec![Weekday::Monday, Weekday::Tuesday]);
    assert_eq!(math.days_per_week(), 2);
    assert_eq!(math.times.time(Weekday::Monday), "08:50");
    assert_eq!(math.times.time(Weekday::Tuesday), "09:40");
}

#[test]
fn full_timetable_projects_to_every_day() {
    let preview = import_csv(TIMETABLE).unwrap();
    assert!(preview.warnings.is_empty());

    let mut subjects = SubjectCollection::new();
    let added = preview.commit_into(&mut subjects).unwrap();
    assert_eq!(added, 8);

    let week = project_week(subjects.as_slice());
    let friday: Vec<&str> = week
        .day(Weekday::Friday)
        .iter()
        .map(|o| o.subject.name.as_str())
        .collect();
    // Times without a meridiem are kept verbatim, so "1:00" sorts after "09:40".
    assert_eq!(
        friday,
        vec!["Bible & Pray", "Science", "Recess", "English", "Physical Education"]
    );
    assert_eq!(week.total(), 23);
}

#[test]
fn projector_keeps_first_seen_order_on_ties() {
    let at = |id: &str, time: &str| {
        let mut s = Subject::with_id(id, id);
        s.times = DayTimes::uniform(&[Weekday::Thursday], time);
        s
    };
    let subjects = vec![at("a", "09:00"), at("b", "08:30"), at("c", "08:30")];

    let order: Vec<(&str, &str)> = project(&subjects, Weekday::Thursday)
        .iter()
        .map(|o| (o.subject.id(), o.start_time))
        .collect();
    assert_eq!(order, vec![("b", "08:30"), ("c", "08:30"), ("a", "09:00")]);
}

#[test]
fn quick_add_reports_each_missing_selection() {
    let names: [&str; 0] = [];
    let errors = quick_add::build(&names, &[], Some(&QuickTime::Preset("09:00".into()))).unwrap_err();

    assert!(errors.len() >= 2);
    assert!(errors.contains(&QuickAddError::MissingDays));
    assert!(errors.contains(&QuickAddError::MissingSubjects));
}

#[test]
fn quick_add_round_trip() {
    let batch = quick_add::build(
        &["Science"],
        &[Weekday::Monday, Weekday::Wednesday],
        Some(&QuickTime::Preset("09:00".into())),
    )
    .unwrap();

    let subject = &batch[0];
    assert_eq!(subject.times.time(Weekday::Monday), "09:00");
    assert_eq!(subject.times.time(Weekday::Wednesday), "09:00");
    for day in [Weekday::Tuesday, Weekday::Thursday, Weekday::Friday] {
        assert_eq!(subject.times.time(day), "");
    }
    assert_eq!(subject.days_per_week(), 2);

    let json = serde_json::to_value(subject).unwrap();
    assert_eq!(json["times"]["tuesday"], "");
    assert_eq!(json["frequency"]["daysPerWeek"], 2);
}
