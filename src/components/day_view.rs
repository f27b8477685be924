use lesson_planner::schedule::{format_time, project, ColorTag, Subject, Weekday};
use lesson_planner::theme::Theme;
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::{centered, truncate};

pub struct DayView;

impl DayView {
    /// One weekday's lessons, earliest first.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        subjects: &[Subject],
        day: Weekday,
        today: Option<Weekday>,
        selected_index: usize,
    ) {
        let occurrences = project(subjects, day);
        let w = area.width as usize;

        let title = if today == Some(day) {
            format!(" {} (today) ", day.label())
        } else if w >= 18 {
            format!(" {} ", day.label())
        } else {
            format!(" {} ", day.short_label())
        };

        let n = occurrences.len();
        let count_str = if n == 0 {
            String::new()
        } else {
            format!(" {} lesson{} ", n, if n == 1 { "" } else { "s" })
        };

        let block = Block::default()
            .title(title)
            .title_style(if today == Some(day) { theme.today } else { theme.header })
            .title_bottom(Line::from(Span::styled(count_str, theme.dim)))
            .borders(Borders::ALL)
            .border_style(theme.border);

        if occurrences.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("No lessons scheduled").style(theme.dim);
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = occurrences
            .iter()
            .map(|occ| {
                let time = if occ.end_time != occ.start_time {
                    format!("{} \u{2013} {}", format_time(occ.start_time), format_time(occ.end_time))
                } else {
                    format_time(occ.start_time)
                };
                let time = format!(" {:<20}", time);
                let name_w = inner_w.saturating_sub(time.len() + 4);
                ListItem::new(Line::from(vec![
                    Span::styled("  ", theme.chip(occ.color)),
                    Span::styled(time, theme.dim),
                    Span::styled(truncate(&occ.subject.name, name_w), theme.base),
                ]))
            })
            .collect();

        let mut state = ListState::default().with_selected(Some(selected_index.min(n - 1)));
        let list = List::new(items).block(block).highlight_style(theme.highlight);
        frame.render_stateful_widget(list, area, &mut state);
    }
}

pub fn render_detail_popup(frame: &mut Frame, area: Rect, theme: &Theme, subject: &Subject) {
    let popup_area = centered(area, 60, 16);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" {} ", subject.name))
        .title_style(theme.accent)
        .borders(Borders::ALL)
        .border_style(theme.border);

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("  ", theme.chip(ColorTag::for_name(&subject.name))),
        Span::styled(
            format!(" {} day{} a week", subject.days_per_week(), if subject.days_per_week() == 1 { "" } else { "s" }),
            theme.base,
        ),
    ]));
    lines.push(Line::from(""));

    for day in subject.selected_days() {
        let time = subject.times.time(day);
        let shown = if time.is_empty() {
            Span::styled("time not set", theme.error)
        } else {
            Span::styled(format_time(time), theme.base)
        };
        lines.push(Line::from(vec![Span::styled(format!("{:<11}", day.label()), theme.dim), shown]));
    }

    if let Some(end) = subject.end_time.as_deref() {
        lines.push(Line::from(vec![
            Span::styled("Ends:      ", theme.dim),
            Span::styled(format_time(end), theme.base),
        ]));
    }

    let resources = &subject.resources;
    if !resources.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Resources",
            theme.header.add_modifier(Modifier::UNDERLINED),
        )));
        if !resources.book_link.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("Book: ", theme.dim),
                Span::styled(resources.book_link.clone(), theme.base),
            ]));
        }
        if !resources.google_doc_link.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("Doc:  ", theme.dim),
                Span::styled(resources.google_doc_link.clone(), theme.base),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("e:Edit  d:Delete  Esc:Close", theme.dim)));

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
