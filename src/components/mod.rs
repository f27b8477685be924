pub mod day_view;
pub mod import;
pub mod quick_add;
pub mod status_bar;
pub mod subject_form;
pub mod subject_list;
pub mod week_view;

pub use day_view::DayView;
pub use import::ImportDialog;
pub use quick_add::QuickAddDialog;
pub use status_bar::StatusBar;
pub use subject_form::SubjectForm;
pub use subject_list::SubjectList;
pub use week_view::WeekView;

use ratatui::layout::Rect;

/// A popup of at most `w` x `h` centered in `area`.
pub fn centered(area: Rect, w: u16, h: u16) -> Rect {
    let popup_w = area.width.min(w);
    let popup_h = area.height.min(h);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    Rect::new(x, y, popup_w, popup_h)
}

/// Cut `s` to `max` characters, ending in `...` when shortened.
pub fn truncate(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("Bible & Pray", 20), "Bible & Pray");
        assert_eq!(truncate("Mathematics", 7), "Math...");
        assert_eq!(truncate("Año", 2), "Añ");
    }

    #[test]
    fn centered_fits_inside_small_areas() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered(area, 60, 16), Rect::new(0, 0, 40, 10));
        assert_eq!(centered(Rect::new(0, 0, 100, 40), 60, 16), Rect::new(20, 12, 60, 16));
    }
}
