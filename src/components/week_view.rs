use lesson_planner::config::GridConfig;
use lesson_planner::schedule::{grid_layout, project_week, GridMetrics, Subject, Weekday};
use lesson_planner::theme::Theme;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::truncate;

pub struct WeekView;

impl WeekView {
    /// Monday to Friday hour grid. One terminal row is the grid's unit,
    /// so `pixels_per_hour` is the number of rows per hour.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        subjects: &[Subject],
        grid: GridConfig,
        selected_day: Weekday,
        today: Option<Weekday>,
    ) {
        let week = project_week(subjects);
        let block = Block::default()
            .title(format!(" Week ({} lessons) ", week.total()))
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width < 10 || inner.height < 3 {
            return;
        }

        let time_col_w: u16 = if inner.width >= 70 { 6 } else { 4 };
        let col_w = (inner.width.saturating_sub(time_col_w) / 5).max(1);

        let mut col_constraints = vec![Constraint::Length(time_col_w)];
        col_constraints.extend(std::iter::repeat(Constraint::Length(col_w)).take(5));
        col_constraints.push(Constraint::Min(0));
        let cols = Layout::horizontal(col_constraints).split(inner);

        // Header row, then the hour grid.
        let content_rows = inner.height.saturating_sub(1) as u32;
        let total_hours = grid.end_hour - grid.start_hour;
        let rows_per_hour = (content_rows / total_hours).max(1);
        let metrics = GridMetrics {
            start_hour: grid.start_hour,
            end_hour: grid.end_hour,
            pixels_per_hour: rows_per_hour as f64,
            min_height: 1.0,
        };
        let grid_top = inner.y + 1;
        let grid_bottom = inner.y + inner.height;

        for day in Weekday::ALL {
            let col = cols[day.index() + 1];

            let label = if col_w >= 10 { day.label() } else { day.short_label() };
            let style = if day == selected_day {
                theme.selected
            } else if Some(day) == today {
                theme.today
            } else {
                theme.header
            };
            let header = Paragraph::new(Line::from(Span::styled(
                format!("{:^width$}", label, width = col_w as usize),
                style,
            )));
            frame.render_widget(header, Rect::new(col.x, inner.y, col.width, 1));

            for slot in grid_layout(week.day(day), &metrics) {
                if !slot.is_visible(&metrics) {
                    continue;
                }
                let top = slot.top.max(0.0).floor() as u16;
                let y = grid_top.saturating_add(top);
                if y >= grid_bottom {
                    continue;
                }
                let height = (slot.height.round() as u16).max(1).min(grid_bottom - y);
                let cell = Rect::new(col.x, y, col.width.saturating_sub(1).max(1), height);

                let occ = slot.occurrence;
                let width = cell.width as usize;
                let mut lines = vec![Line::from(Span::styled(
                    format!("{:<width$}", truncate(&occ.subject.name, width), width = width),
                    theme.chip(occ.color),
                ))];
                for _ in 1..height {
                    lines.push(Line::from(Span::styled(
                        format!("{:<width$}", truncate(occ.start_time, width), width = width),
                        theme.chip(occ.color),
                    )));
                }
                frame.render_widget(Paragraph::new(lines), cell);
            }
        }

        // Hour labels
        for hour_idx in 0..total_hours {
            let y = grid_top + (hour_idx * rows_per_hour) as u16;
            if y >= grid_bottom {
                break;
            }
            let hour = grid.start_hour + hour_idx;
            let label = if time_col_w >= 6 {
                format!("{:>2}:00 ", hour)
            } else {
                format!("{:>2} ", hour)
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(label, theme.dim))),
                Rect::new(cols[0].x, y, cols[0].width, 1),
            );
        }
    }
}
