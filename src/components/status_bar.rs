use lesson_planner::store::Backend;
use lesson_planner::theme::Theme;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{InputMode, ViewMode};

pub struct StatusBar;

impl StatusBar {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        view: ViewMode,
        input: InputMode,
        backend: Backend,
        message: Option<&str>,
    ) {
        let w = area.width as usize;

        let mode_str = match view {
            ViewMode::Subjects => "[1]Subjects",
            ViewMode::Schedule => "[2]Schedule",
            ViewMode::Week => "[3]Week",
        };

        let focus_indicator = match input {
            InputMode::Form => " [Subject]",
            InputMode::QuickAdd => " [Quick Add]",
            InputMode::Import => " [Import]",
            InputMode::ConfirmDelete => " [Delete?]",
            InputMode::Normal => "",
        };

        let right_text = if let Some(msg) = message {
            format!(" {} ", msg)
        } else if input == InputMode::ConfirmDelete {
            " y:Delete  any key:Cancel ".to_string()
        } else {
            match view {
                ViewMode::Subjects if w >= 80 => {
                    " jk:Move Enter:Detail n:New e:Edit d:Del a:Quick i:Import ?:Help q:Quit ".to_string()
                }
                ViewMode::Schedule | ViewMode::Week if w >= 80 => {
                    " hl:Day jk:Move t:Today Enter:Detail n:New a:Quick ?:Help q:Quit ".to_string()
                }
                _ if w >= 40 => " n:New a:Quick ?:Help q:Quit ".to_string(),
                _ => " ?:Help q:Quit ".to_string(),
            }
        };

        let left = format!(" {}{} \u{25cf} {} ", mode_str, focus_indicator, backend.label());
        let padding = " ".repeat(w.saturating_sub(left.chars().count() + right_text.chars().count()));

        let line = Line::from(vec![
            Span::styled(left, theme.status),
            Span::styled(padding, theme.status),
            Span::styled(right_text, theme.status),
        ]);

        frame.render_widget(Paragraph::new(line).style(theme.status), area);
    }
}
