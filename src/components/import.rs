use lesson_planner::schedule::{import_csv, ImportError, ImportPreview, Weekday};
use lesson_planner::theme::Theme;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::{centered, truncate};

/// Pasted CSV and the preview parsed from it.
#[derive(Debug, Clone, Default)]
pub struct ImportState {
    pub text: String,
    pub preview: Option<Result<ImportPreview, ImportError>>,
}

impl ImportState {
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut state = Self::default();
        state.set_text(text.into());
        state
    }

    /// Bracketed paste delivers the whole clipboard at once.
    pub fn paste(&mut self, text: &str) {
        let mut combined = std::mem::take(&mut self.text);
        if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(text);
        self.set_text(combined);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.preview = None;
    }

    fn set_text(&mut self, text: String) {
        // Terminals deliver pasted newlines as CR.
        self.text = text.replace("\r\n", "\n").replace('\r', "\n");
        self.preview = if self.text.trim().is_empty() {
            None
        } else {
            Some(import_csv(&self.text))
        };
    }

    pub fn ready(&self) -> Option<&ImportPreview> {
        match &self.preview {
            Some(Ok(preview)) if !preview.is_empty() => Some(preview),
            _ => None,
        }
    }
}

pub struct ImportDialog;

impl ImportDialog {
    pub fn render(frame: &mut Frame, area: Rect, theme: &Theme, state: &ImportState) {
        let popup = centered(area, 76, 24);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Import Timetable CSV ")
            .title_style(theme.accent)
            .title_bottom(Line::from(Span::styled(
                " Paste CSV  Enter:Import  Ctrl-u:Clear  Esc:Cancel ",
                theme.dim,
            )))
            .borders(Borders::ALL)
            .border_style(theme.border);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let rows = Layout::vertical([Constraint::Length(2), Constraint::Min(3), Constraint::Length(4)]).split(inner);

        let summary = match &state.preview {
            None => Line::from(Span::styled(
                "Header row: Time,Monday,...,Friday. Cells hold subject names.",
                theme.dim,
            )),
            Some(Err(e)) => Line::from(Span::styled(e.to_string(), theme.error)),
            Some(Ok(p)) => Line::from(Span::styled(
                format!(
                    "{} subject{} found",
                    p.subjects.len(),
                    if p.subjects.len() == 1 { "" } else { "s" }
                ),
                theme.header,
            )),
        };
        frame.render_widget(Paragraph::new(summary), rows[0]);

        let Some(Ok(preview)) = &state.preview else {
            return;
        };

        let name_w = rows[1].width.saturating_sub(5 * 7).max(8) as usize;
        let header = Row::new(
            std::iter::once("Subject".to_string())
                .chain(Weekday::ALL.iter().map(|d| d.short_label().to_string())),
        )
        .style(theme.header);

        let body: Vec<Row> = preview
            .subjects
            .iter()
            .map(|s| {
                let mut cells = vec![truncate(&s.name, name_w)];
                cells.extend(Weekday::ALL.iter().map(|d| match s.times.get(*d) {
                    Some("") => "?".to_string(),
                    Some(t) => t.to_string(),
                    None => String::new(),
                }));
                Row::new(cells)
            })
            .collect();

        let mut widths = vec![Constraint::Min(8)];
        widths.extend(std::iter::repeat(Constraint::Length(6)).take(Weekday::ALL.len()));
        frame.render_widget(Table::new(body, widths).header(header), rows[1]);

        if !preview.warnings.is_empty() {
            let lines: Vec<Line> = preview
                .warnings
                .iter()
                .map(|w| {
                    Line::from(Span::styled(
                        format!("line {}: could not read time `{}`", w.line, w.time),
                        theme.error,
                    ))
                })
                .collect();
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), rows[2]);
        }
    }
}
