use lesson_planner::schedule::{format_time, ColorTag, Subject, SubjectCollection, Weekday};
use lesson_planner::theme::Theme;
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::truncate;

pub struct SubjectList;

impl SubjectList {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        subjects: &SubjectCollection,
        selected_index: usize,
    ) {
        let w = area.width as usize;

        let title = if w >= 25 {
            format!(" Subjects ({}) ", subjects.len())
        } else {
            " Subjects ".to_string()
        };

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        if subjects.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new(vec![
                Line::from(Span::styled("No subjects yet", theme.dim)),
                Line::from(""),
                Line::from(Span::styled("n: new subject  a: quick add  i: import CSV", theme.dim)),
            ]);
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = subjects
            .iter()
            .map(|subject| subject_card(theme, subject, inner_w))
            .collect();

        let mut state = ListState::default().with_selected(Some(selected_index.min(subjects.len() - 1)));
        let list = List::new(items)
            .block(block)
            .highlight_style(theme.highlight)
            .highlight_symbol("\u{25b8} ");
        frame.render_stateful_widget(list, area, &mut state);
    }
}

/// Two-line card: name with color chip, then days and time.
fn subject_card<'a>(theme: &Theme, subject: &Subject, width: usize) -> ListItem<'a> {
    let chip = Span::styled("  ", theme.chip(ColorTag::for_name(&subject.name)));
    let mut name_spans = vec![
        chip,
        Span::styled(
            format!(" {}", truncate(&subject.name, width.saturating_sub(8))),
            theme.base.add_modifier(Modifier::BOLD),
        ),
    ];
    if !subject.resources.is_empty() {
        name_spans.push(Span::styled(" \u{1f517}", theme.dim));
    }

    let days: Vec<&str> = Weekday::ALL
        .iter()
        .filter(|d| subject.is_scheduled_on(**d))
        .map(|d| d.short_label())
        .collect();
    let days = if days.is_empty() {
        "unscheduled".to_string()
    } else {
        days.join(" ")
    };

    let (time, time_style) = match time_label(subject) {
        Some(label) => (label, theme.dim),
        None => ("time not set".to_string(), theme.error),
    };

    let detail = Line::from(vec![
        Span::styled(format!("   {}", days), theme.dim),
        Span::styled(format!("  {}", time), time_style),
    ]);

    ListItem::new(vec![Line::from(name_spans), detail])
}

/// `None` when a scheduled day has no start time, which happens for
/// imported rows whose time cell could not be read. Such days stay off
/// the schedule until the subject is edited.
fn time_label(subject: &Subject) -> Option<String> {
    if subject
        .selected_days()
        .into_iter()
        .any(|d| subject.times.time(d).is_empty())
    {
        return None;
    }
    Some(match (subject.start_time(), subject.end_time.as_deref()) {
        (Some(start), Some(end)) => format!("{} \u{2013} {}", format_time(start), format_time(end)),
        (Some(start), None) => format_time(start),
        (None, _) if subject.days_per_week() > 0 => "varies by day".to_string(),
        (None, _) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_planner::schedule::import_csv;

    #[test]
    fn unreadable_import_time_is_flagged() {
        let preview = import_csv("Time,Monday,Tuesday\nafter lunch,Art,Art\n9:00 - 9:40 AM,Reading,\n").unwrap();
        let art = &preview.subjects[0];
        assert_eq!(art.selected_days(), vec![Weekday::Monday, Weekday::Tuesday]);
        assert_eq!(time_label(art), None);
        assert!(lesson_planner::schedule::project(std::slice::from_ref(art), Weekday::Monday).is_empty());

        assert_eq!(time_label(&preview.subjects[1]).as_deref(), Some("9:00 AM"));
    }

    #[test]
    fn differing_day_times_read_as_varies() {
        let mut music = Subject::new("Music");
        music.times.schedule(Weekday::Monday, String::from("09:00"));
        music.times.schedule(Weekday::Friday, String::from("13:00"));
        assert_eq!(time_label(&music).as_deref(), Some("varies by day"));
        assert_eq!(time_label(&Subject::new("Library")).as_deref(), Some(""));
    }
}
