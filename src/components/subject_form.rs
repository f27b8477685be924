use lesson_planner::schedule::{DraftErrors, DraftField, Subject, SubjectDraft, Weekday};
use lesson_planner::theme::Theme;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    Name,
    StartTime,
    EndTime,
    DaysPerWeek,
    Days,
    BookLink,
    DocLink,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Name => FormField::StartTime,
            FormField::StartTime => FormField::EndTime,
            FormField::EndTime => FormField::DaysPerWeek,
            FormField::DaysPerWeek => FormField::Days,
            FormField::Days => FormField::BookLink,
            FormField::BookLink => FormField::DocLink,
            FormField::DocLink => FormField::Name,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FormField::Name => FormField::DocLink,
            FormField::StartTime => FormField::Name,
            FormField::EndTime => FormField::StartTime,
            FormField::DaysPerWeek => FormField::EndTime,
            FormField::Days => FormField::DaysPerWeek,
            FormField::BookLink => FormField::Days,
            FormField::DocLink => FormField::BookLink,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubjectFormState {
    pub draft: SubjectDraft,
    pub active_field: FormField,
    pub day_cursor: Weekday,
    pub errors: Option<DraftErrors>,
}

impl SubjectFormState {
    pub fn new(day: Weekday) -> Self {
        Self {
            draft: SubjectDraft::default(),
            active_field: FormField::Name,
            day_cursor: day,
            errors: None,
        }
    }

    pub fn edit(subject: &Subject) -> Self {
        let draft = SubjectDraft::from_subject(subject);
        let day_cursor = draft.selected_days.first().copied().unwrap_or(Weekday::Monday);
        Self {
            draft,
            active_field: FormField::Name,
            day_cursor,
            errors: None,
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.active_field {
            FormField::Name => Some(&mut self.draft.name),
            FormField::StartTime => Some(&mut self.draft.start_time),
            FormField::EndTime => Some(&mut self.draft.end_time),
            FormField::BookLink => Some(&mut self.draft.book_link),
            FormField::DocLink => Some(&mut self.draft.google_doc_link),
            FormField::DaysPerWeek | FormField::Days => None,
        }
    }

    pub fn input_char(&mut self, c: char) {
        match self.active_field {
            FormField::DaysPerWeek => {
                if let Some(n) = c.to_digit(10) {
                    self.draft.set_days_per_week(n as usize);
                }
            }
            FormField::Days => {
                if c == ' ' {
                    self.draft.toggle_day(self.day_cursor);
                }
            }
            _ => {
                if let Some(text) = self.text_mut() {
                    text.push(c);
                }
            }
        }
    }

    pub fn input_str(&mut self, s: &str) {
        if let Some(text) = self.text_mut() {
            text.extend(s.chars().filter(|c| !c.is_control()));
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.text_mut() {
            text.pop();
        }
    }

    /// Left/right: move the day cursor or step the recurrence count.
    pub fn left(&mut self) {
        match self.active_field {
            FormField::Days => self.day_cursor = self.day_cursor.prev(),
            FormField::DaysPerWeek => {
                let n = self.draft.days_per_week.saturating_sub(1);
                self.draft.set_days_per_week(n);
            }
            _ => {}
        }
    }

    pub fn right(&mut self) {
        match self.active_field {
            FormField::Days => self.day_cursor = self.day_cursor.next(),
            FormField::DaysPerWeek => {
                let n = self.draft.days_per_week + 1;
                self.draft.set_days_per_week(n);
            }
            _ => {}
        }
    }

    fn error_for(&self, field: DraftField) -> Option<String> {
        self.errors
            .as_ref()
            .and_then(|e| e.for_field(field))
            .map(ToString::to_string)
    }
}

pub struct SubjectForm;

impl SubjectForm {
    pub fn render(frame: &mut Frame, area: Rect, theme: &Theme, state: &SubjectFormState) {
        let form_area = centered(area, 56, 20);
        frame.render_widget(Clear, form_area);

        let title = if state.draft.is_editing() {
            " Edit Subject "
        } else {
            " New Subject "
        };
        let block = Block::default()
            .title(title)
            .title_style(theme.accent)
            .borders(Borders::ALL)
            .border_style(theme.border);

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // name
            Constraint::Length(1),
            Constraint::Length(1), // start
            Constraint::Length(1), // end
            Constraint::Length(1),
            Constraint::Length(1), // days per week
            Constraint::Length(1), // days
            Constraint::Length(1),
            Constraint::Length(1), // book
            Constraint::Length(1), // doc
            Constraint::Length(1), // spacer
            Constraint::Length(1), // help
            Constraint::Min(0),
        ])
        .split(inner);

        let draft = &state.draft;
        let active = state.active_field;

        render_field(frame, rows[0], theme, "Name:", &draft.name, active == FormField::Name);
        render_error(frame, rows[1], theme, state.error_for(DraftField::Name));
        render_field(frame, rows[2], theme, "Start:", &draft.start_time, active == FormField::StartTime);
        render_field(frame, rows[3], theme, "End:", &draft.end_time, active == FormField::EndTime);
        render_error(
            frame,
            rows[4],
            theme,
            state
                .error_for(DraftField::StartTime)
                .or_else(|| state.error_for(DraftField::EndTime)),
        );

        let per_week = format!("< {} >", draft.days_per_week);
        render_field(frame, rows[5], theme, "Times:", &per_week, active == FormField::DaysPerWeek);

        let mut spans = vec![Span::styled(format!("{:<8}", "Days:"), theme.dim)];
        for day in Weekday::ALL {
            let chosen = draft.selected_days.contains(&day);
            let mut style = if chosen { theme.selected } else { theme.base };
            if active == FormField::Days && day == state.day_cursor {
                style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
            }
            spans.push(Span::styled(format!(" {} ", day.short_label()), style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), rows[6]);
        render_error(frame, rows[7], theme, state.error_for(DraftField::Days));

        render_field(frame, rows[8], theme, "Book:", &draft.book_link, active == FormField::BookLink);
        render_field(frame, rows[9], theme, "Doc:", &draft.google_doc_link, active == FormField::DocLink);

        let bold = theme.base.add_modifier(Modifier::BOLD);
        let help = Line::from(vec![
            Span::styled("Tab", bold),
            Span::styled(":Next ", theme.dim),
            Span::styled("\u{2190}\u{2192}/Space", bold),
            Span::styled(":Days ", theme.dim),
            Span::styled("Enter", bold),
            Span::styled(":Save ", theme.dim),
            Span::styled("Esc", bold),
            Span::styled(":Cancel", theme.dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[11]);
    }
}

fn render_field(frame: &mut Frame, area: Rect, theme: &Theme, label: &str, value: &str, active: bool) {
    let cursor = if active { "_" } else { "" };
    let style = if active { theme.accent } else { theme.base };

    let line = Line::from(vec![
        Span::styled(format!("{:<8}", label), theme.dim),
        Span::styled(format!("{}{}", value, cursor), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_error(frame: &mut Frame, area: Rect, theme: &Theme, message: Option<String>) {
    if let Some(message) = message {
        let line = Line::from(Span::styled(format!("        {}", message), theme.error));
        frame.render_widget(Paragraph::new(line), area);
    }
}
