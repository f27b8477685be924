use lesson_planner::schedule::quick_add::{self, COMMON_SUBJECTS, COMMON_TIMES};
use lesson_planner::schedule::{QuickAddErrors, QuickTime, Subject, Weekday};
use lesson_planner::theme::Theme;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::centered;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuickField {
    Subjects,
    CustomSubject,
    Days,
    Times,
    CustomStart,
    CustomEnd,
}

impl QuickField {
    pub fn next(&self) -> Self {
        match self {
            QuickField::Subjects => QuickField::CustomSubject,
            QuickField::CustomSubject => QuickField::Days,
            QuickField::Days => QuickField::Times,
            QuickField::Times => QuickField::CustomStart,
            QuickField::CustomStart => QuickField::CustomEnd,
            QuickField::CustomEnd => QuickField::Subjects,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            QuickField::Subjects => QuickField::CustomEnd,
            QuickField::CustomSubject => QuickField::Subjects,
            QuickField::Days => QuickField::CustomSubject,
            QuickField::Times => QuickField::Days,
            QuickField::CustomStart => QuickField::Times,
            QuickField::CustomEnd => QuickField::CustomStart,
        }
    }
}

/// Multi-select dialog over the common subject names, the weekdays and
/// the preset start times. Names typed into the custom subject field join
/// the selection; typing in the custom time fields switches to a
/// start/end pair.
#[derive(Debug, Clone)]
pub struct QuickAddState {
    pub focus: QuickField,
    pub subject_cursor: usize,
    pub chosen: Vec<String>,
    pub custom_subject: String,
    pub day_cursor: Weekday,
    pub days: Vec<Weekday>,
    pub time_cursor: usize,
    pub preset: Option<&'static str>,
    pub custom_start: String,
    pub custom_end: String,
    pub errors: Option<QuickAddErrors>,
}

impl Default for QuickAddState {
    fn default() -> Self {
        Self {
            focus: QuickField::Subjects,
            subject_cursor: 0,
            chosen: Vec::new(),
            custom_subject: String::new(),
            day_cursor: Weekday::Monday,
            days: Vec::new(),
            time_cursor: 0,
            preset: None,
            custom_start: String::new(),
            custom_end: String::new(),
            errors: None,
        }
    }
}

impl QuickAddState {
    /// Common names followed by the custom names added so far.
    pub fn subject_names(&self) -> Vec<&str> {
        let custom = self
            .chosen
            .iter()
            .map(String::as_str)
            .filter(|name| !COMMON_SUBJECTS.iter().any(|c| c == name));
        COMMON_SUBJECTS.iter().copied().chain(custom).collect()
    }

    pub fn is_chosen(&self, name: &str) -> bool {
        self.chosen.iter().any(|c| c.eq_ignore_ascii_case(name))
    }

    /// Enter on the custom subject field: select the trimmed name unless
    /// it is blank or already selected.
    pub fn add_custom_subject(&mut self) {
        let name = self.custom_subject.trim();
        if name.is_empty() || self.is_chosen(name) {
            return;
        }
        self.chosen.push(name.to_string());
        self.custom_subject.clear();
    }

    /// Drop names that are already stored, so resubmitting after a partly
    /// failed save only sends the rest.
    pub fn forget_subjects(&mut self, stored: &[String]) {
        self.chosen
            .retain(|name| !stored.iter().any(|s| s.eq_ignore_ascii_case(name)));
        self.subject_cursor = self.subject_cursor.min(self.subject_names().len() - 1);
    }

    pub fn up(&mut self) {
        match self.focus {
            QuickField::Subjects => self.subject_cursor = self.subject_cursor.saturating_sub(1),
            QuickField::Times => self.time_cursor = self.time_cursor.saturating_sub(1),
            _ => {}
        }
    }

    pub fn down(&mut self) {
        match self.focus {
            QuickField::Subjects => {
                self.subject_cursor = (self.subject_cursor + 1).min(self.subject_names().len() - 1)
            }
            QuickField::Times => self.time_cursor = (self.time_cursor + 1).min(COMMON_TIMES.len() - 1),
            _ => {}
        }
    }

    pub fn left(&mut self) {
        if self.focus == QuickField::Days {
            self.day_cursor = self.day_cursor.prev();
        }
    }

    pub fn right(&mut self) {
        if self.focus == QuickField::Days {
            self.day_cursor = self.day_cursor.next();
        }
    }

    /// Space: toggle the item under the cursor.
    pub fn toggle(&mut self) {
        match self.focus {
            QuickField::Subjects => {
                let Some(name) = self.subject_names().get(self.subject_cursor).map(|n| n.to_string())
                else {
                    return;
                };
                if self.is_chosen(&name) {
                    self.chosen.retain(|c| !c.eq_ignore_ascii_case(&name));
                } else {
                    self.chosen.push(name);
                }
                self.subject_cursor = self.subject_cursor.min(self.subject_names().len() - 1);
            }
            QuickField::Days => toggle(&mut self.days, self.day_cursor),
            QuickField::Times => {
                let time = COMMON_TIMES[self.time_cursor];
                self.preset = if self.preset == Some(time) { None } else { Some(time) };
                self.custom_start.clear();
                self.custom_end.clear();
            }
            QuickField::CustomSubject | QuickField::CustomStart | QuickField::CustomEnd => {
                self.input_char(' ')
            }
        }
    }

    pub fn input_char(&mut self, c: char) {
        if self.focus == QuickField::CustomSubject {
            self.custom_subject.push(c);
            return;
        }
        let field = match self.focus {
            QuickField::CustomStart => &mut self.custom_start,
            QuickField::CustomEnd => &mut self.custom_end,
            _ => return,
        };
        if !c.is_whitespace() {
            field.push(c);
            self.preset = None;
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            QuickField::CustomSubject => {
                self.custom_subject.pop();
            }
            QuickField::CustomStart => {
                self.custom_start.pop();
            }
            QuickField::CustomEnd => {
                self.custom_end.pop();
            }
            _ => {}
        }
    }

    pub fn time(&self) -> Option<QuickTime> {
        if let Some(preset) = self.preset {
            return Some(QuickTime::Preset(preset.to_string()));
        }
        if self.custom_start.is_empty() && self.custom_end.is_empty() {
            return None;
        }
        Some(QuickTime::Custom {
            start: self.custom_start.clone(),
            end: self.custom_end.clone(),
        })
    }

    /// Build the batch, keeping the errors on the dialog when it fails.
    pub fn build(&mut self) -> Option<Vec<Subject>> {
        match quick_add::build(&self.chosen, &self.days, self.time().as_ref()) {
            Ok(subjects) => {
                self.errors = None;
                Some(subjects)
            }
            Err(errors) => {
                self.errors = Some(errors);
                None
            }
        }
    }
}

fn toggle<T: PartialEq>(items: &mut Vec<T>, item: T) {
    match items.iter().position(|i| *i == item) {
        Some(pos) => {
            items.remove(pos);
        }
        None => items.push(item),
    }
}

pub struct QuickAddDialog;

impl QuickAddDialog {
    pub fn render(frame: &mut Frame, area: Rect, theme: &Theme, state: &QuickAddState) {
        let popup = centered(area, 64, 24);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Quick Add ")
            .title_style(theme.accent)
            .title_bottom(Line::from(Span::styled(
                " Tab:Section Space:Toggle Enter:Add Esc:Cancel ",
                theme.dim,
            )))
            .borders(Borders::ALL)
            .border_style(theme.border);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let cols = Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).split(inner);
        let left = Layout::vertical([Constraint::Min(5), Constraint::Length(3)]).split(cols[0]);
        let right = Layout::vertical([
            Constraint::Length(3), // days
            Constraint::Min(5),    // preset times
            Constraint::Length(4), // custom
            Constraint::Length(3), // errors
        ])
        .split(cols[1]);

        // Subjects
        let items: Vec<ListItem> = state
            .subject_names()
            .into_iter()
            .map(|name| {
                let mark = if state.is_chosen(name) { "[x]" } else { "[ ]" };
                ListItem::new(format!("{} {}", mark, name))
            })
            .collect();
        let mut list_state = ListState::default().with_selected(Some(state.subject_cursor));
        let list = List::new(items)
            .block(section(theme, "Subjects", state.focus == QuickField::Subjects))
            .highlight_style(if state.focus == QuickField::Subjects {
                theme.selected
            } else {
                theme.base
            });
        frame.render_stateful_widget(list, left[0], &mut list_state);

        let cursor = |field: QuickField| if state.focus == field { "_" } else { "" };
        frame.render_widget(
            Paragraph::new(format!("{}{}", state.custom_subject, cursor(QuickField::CustomSubject)))
                .style(theme.base)
                .block(section(theme, "Custom subject (Enter adds)", state.focus == QuickField::CustomSubject)),
            left[1],
        );

        // Days
        let day_spans: Vec<Span> = Weekday::ALL
            .iter()
            .map(|day| {
                let mut style = if state.days.contains(day) { theme.selected } else { theme.base };
                if state.focus == QuickField::Days && *day == state.day_cursor {
                    style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
                }
                Span::styled(format!("{} ", day.short_label()), style)
            })
            .collect();
        frame.render_widget(
            Paragraph::new(Line::from(day_spans)).block(section(theme, "Days", state.focus == QuickField::Days)),
            right[0],
        );

        // Preset times
        let times: Vec<ListItem> = COMMON_TIMES
            .iter()
            .map(|t| {
                let mark = if state.preset == Some(*t) { "(*)" } else { "( )" };
                ListItem::new(format!("{} {}", mark, t))
            })
            .collect();
        let mut time_state = ListState::default().with_selected(Some(state.time_cursor));
        let time_list = List::new(times)
            .block(section(theme, "Time", state.focus == QuickField::Times))
            .highlight_style(if state.focus == QuickField::Times {
                theme.selected
            } else {
                theme.base
            });
        frame.render_stateful_widget(time_list, right[1], &mut time_state);

        // Custom range
        let custom = vec![
            Line::from(vec![
                Span::styled("Start ", theme.dim),
                Span::styled(format!("{}{}", state.custom_start, cursor(QuickField::CustomStart)), theme.base),
            ]),
            Line::from(vec![
                Span::styled("End   ", theme.dim),
                Span::styled(format!("{}{}", state.custom_end, cursor(QuickField::CustomEnd)), theme.base),
            ]),
        ];
        let custom_focused = matches!(state.focus, QuickField::CustomStart | QuickField::CustomEnd);
        frame.render_widget(
            Paragraph::new(custom).block(section(theme, "Custom", custom_focused)),
            right[2],
        );

        if let Some(errors) = &state.errors {
            let lines: Vec<Line> = errors
                .iter()
                .map(|e| Line::from(Span::styled(e.to_string(), theme.error)))
                .collect();
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), right[3]);
        }
    }
}

fn section<'a>(theme: &Theme, title: &'a str, focused: bool) -> Block<'a> {
    Block::default()
        .title(format!(" {} ", title))
        .title_style(if focused { theme.accent } else { theme.header })
        .borders(Borders::ALL)
        .border_style(if focused { theme.accent } else { theme.border })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_planner::schedule::QuickAddError;

    #[test]
    fn empty_dialog_reports_every_missing_section() {
        let mut state = QuickAddState::default();
        assert!(state.build().is_none());
        let errors = state.errors.as_ref().unwrap();
        assert!(errors.contains(&QuickAddError::MissingSubjects));
        assert!(errors.contains(&QuickAddError::MissingDays));
        assert!(errors.contains(&QuickAddError::MissingTime));
    }

    #[test]
    fn toggling_builds_a_batch() {
        let mut state = QuickAddState::default();
        state.toggle(); // first subject
        state.focus = QuickField::Days;
        state.toggle();
        state.right();
        state.right();
        state.toggle();
        state.focus = QuickField::Times;
        state.toggle();

        let batch = state.build().unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].name, COMMON_SUBJECTS[0]);
        assert_eq!(batch[0].selected_days(), vec![Weekday::Monday, Weekday::Wednesday]);
        assert_eq!(batch[0].times.time(Weekday::Monday), COMMON_TIMES[0]);
    }

    #[test]
    fn custom_subject_joins_the_selection_once() {
        let mut state = QuickAddState {
            focus: QuickField::CustomSubject,
            ..QuickAddState::default()
        };
        for c in "  Latin Roots ".chars() {
            state.input_char(c);
        }
        state.add_custom_subject();
        assert_eq!(state.chosen, vec!["Latin Roots".to_string()]);
        assert!(state.custom_subject.is_empty());

        // Duplicates and blanks are ignored and leave the text in place.
        state.custom_subject = "latin roots".into();
        state.add_custom_subject();
        assert_eq!(state.chosen.len(), 1);
        assert_eq!(state.custom_subject, "latin roots");
        state.custom_subject = "   ".into();
        state.add_custom_subject();
        assert_eq!(state.chosen.len(), 1);

        assert_eq!(state.subject_names().last(), Some(&"Latin Roots"));

        state.focus = QuickField::Days;
        state.toggle();
        state.focus = QuickField::Times;
        state.toggle();
        let batch = state.build().unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].name, "Latin Roots");
    }

    #[test]
    fn toggling_a_custom_subject_removes_it() {
        let mut state = QuickAddState {
            chosen: vec!["Latin Roots".into()],
            subject_cursor: COMMON_SUBJECTS.len(),
            ..QuickAddState::default()
        };
        state.toggle();
        assert!(state.chosen.is_empty());
        assert_eq!(state.subject_cursor, COMMON_SUBJECTS.len() - 1);
    }

    #[test]
    fn forgetting_stored_subjects_keeps_the_rest() {
        let mut state = QuickAddState {
            chosen: vec![COMMON_SUBJECTS[0].to_string(), "Latin Roots".into()],
            subject_cursor: COMMON_SUBJECTS.len(),
            ..QuickAddState::default()
        };
        state.forget_subjects(&["LATIN ROOTS".to_string()]);
        assert_eq!(state.chosen, vec![COMMON_SUBJECTS[0].to_string()]);
        assert_eq!(state.subject_cursor, COMMON_SUBJECTS.len() - 1);
    }

    #[test]
    fn typing_a_custom_time_clears_the_preset() {
        let mut state = QuickAddState {
            preset: Some(COMMON_TIMES[0]),
            focus: QuickField::CustomStart,
            ..QuickAddState::default()
        };
        for c in "09:00".chars() {
            state.input_char(c);
        }
        assert_eq!(state.preset, None);
        assert_eq!(
            state.time(),
            Some(QuickTime::Custom {
                start: "09:00".into(),
                end: String::new()
            })
        );
    }
}
