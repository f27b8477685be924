use chrono::{Datelike, Local};
use lesson_planner::config::GridConfig;
use lesson_planner::schedule::{project, Subject, SubjectCollection, Weekday};
use lesson_planner::store::{Backend, Gateway};
use lesson_planner::theme::{Theme, UserTheme};

use crate::components::import::ImportState;
use crate::components::quick_add::QuickAddState;
use crate::components::subject_form::SubjectFormState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewMode {
    Subjects,
    Schedule,
    Week,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Form,
    QuickAdd,
    Import,
    ConfirmDelete,
}

pub struct App {
    pub running: bool,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub subjects: SubjectCollection,
    /// Selection in the subject list.
    pub list_index: usize,
    /// Selection among the selected day's lessons.
    pub day_index: usize,
    pub selected_day: Weekday,
    pub today: Option<Weekday>,
    pub grid: GridConfig,
    pub user_theme: UserTheme,
    pub theme: Theme,
    pub form: Option<SubjectFormState>,
    pub quick_add: Option<QuickAddState>,
    pub import: Option<ImportState>,
    /// Id of the subject shown in the detail popup.
    pub detail: Option<String>,
    pub show_help: bool,
    pub status_message: Option<String>,
    gateway: Gateway,
}

impl App {
    pub fn new(gateway: Gateway, subjects: SubjectCollection, grid: GridConfig, user_theme: UserTheme) -> Self {
        let today = Weekday::from_chrono(Local::now().weekday());
        Self {
            running: true,
            view_mode: ViewMode::Subjects,
            input_mode: InputMode::Normal,
            subjects,
            list_index: 0,
            day_index: 0,
            selected_day: today.unwrap_or(Weekday::Monday),
            today,
            grid,
            theme: Theme::from_user(&user_theme),
            user_theme,
            form: None,
            quick_add: None,
            import: None,
            detail: None,
            show_help: false,
            status_message: None,
            gateway,
        }
    }

    pub fn backend(&self) -> Backend {
        self.gateway.backend()
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view_mode = view;
        self.day_index = 0;
    }

    pub fn selected_subject(&self) -> Option<&Subject> {
        match self.view_mode {
            ViewMode::Subjects => self.subjects.as_slice().get(self.list_index),
            ViewMode::Schedule | ViewMode::Week => project(self.subjects.as_slice(), self.selected_day)
                .get(self.day_index)
                .map(|occ| occ.subject),
        }
    }

    fn selection_len(&self) -> usize {
        match self.view_mode {
            ViewMode::Subjects => self.subjects.len(),
            ViewMode::Schedule | ViewMode::Week => project(self.subjects.as_slice(), self.selected_day).len(),
        }
    }

    pub fn move_up(&mut self) {
        match self.view_mode {
            ViewMode::Subjects => self.list_index = self.list_index.saturating_sub(1),
            _ => self.day_index = self.day_index.saturating_sub(1),
        }
    }

    pub fn move_down(&mut self) {
        let last = self.selection_len().saturating_sub(1);
        match self.view_mode {
            ViewMode::Subjects => self.list_index = (self.list_index + 1).min(last),
            _ => self.day_index = (self.day_index + 1).min(last),
        }
    }

    pub fn next_day(&mut self) {
        self.selected_day = self.selected_day.next();
        self.day_index = 0;
    }

    pub fn prev_day(&mut self) {
        self.selected_day = self.selected_day.prev();
        self.day_index = 0;
    }

    pub fn go_to_today(&mut self) {
        match self.today {
            Some(day) => {
                self.selected_day = day;
                self.day_index = 0;
            }
            None => self.status_message = Some("No lessons on weekends".to_string()),
        }
    }

    fn clamp_selection(&mut self) {
        self.list_index = self.list_index.min(self.subjects.len().saturating_sub(1));
        let on_day = project(self.subjects.as_slice(), self.selected_day).len();
        self.day_index = self.day_index.min(on_day.saturating_sub(1));
    }

    // ── Detail popup ──

    pub fn show_detail(&mut self) {
        self.detail = self.selected_subject().map(|s| s.id().to_string());
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn detail_subject(&self) -> Option<&Subject> {
        self.detail.as_deref().and_then(|id| self.subjects.get(id))
    }

    // ── Subject form ──

    pub fn open_new_form(&mut self) {
        self.form = Some(SubjectFormState::new(self.selected_day));
        self.input_mode = InputMode::Form;
    }

    /// Edit the subject in the detail popup, or the selected one.
    pub fn open_edit_form(&mut self) {
        let subject = self.detail_subject().or_else(|| self.selected_subject());
        if let Some(subject) = subject {
            self.form = Some(SubjectFormState::edit(subject));
            self.detail = None;
            self.input_mode = InputMode::Form;
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let subject = match form.draft.validate() {
            Ok(subject) => subject,
            Err(errors) => {
                tracing::debug!(%errors, "subject form rejected");
                form.errors = Some(errors);
                return;
            }
        };
        let editing = form.draft.is_editing();
        let name = subject.name.clone();

        let result = if editing {
            self.gateway.update(&mut self.subjects, subject)
        } else {
            self.gateway.create(&mut self.subjects, subject)
        };
        match result {
            Ok(()) => {
                let verb = if editing { "Updated" } else { "Added" };
                self.status_message = Some(format!("{} {}", verb, name));
                self.close_form();
            }
            Err(e) => {
                tracing::error!(error = %e, "saving subject failed");
                self.status_message = Some(format!("Save failed: {}", e));
            }
        }
        self.clamp_selection();
    }

    // ── Quick add ──

    pub fn open_quick_add(&mut self) {
        self.quick_add = Some(QuickAddState::default());
        self.input_mode = InputMode::QuickAdd;
    }

    pub fn close_quick_add(&mut self) {
        self.quick_add = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn submit_quick_add(&mut self) {
        let Some(batch) = self.quick_add.as_mut().and_then(QuickAddState::build) else {
            return;
        };
        let sent: Vec<(String, String)> = batch
            .iter()
            .map(|s| (s.id().to_string(), s.name.clone()))
            .collect();
        match self.gateway.create_many(&mut self.subjects, batch) {
            Ok(n) => {
                self.status_message = Some(format!("Added {} subject{}", n, plural(n)));
                self.close_quick_add();
            }
            Err(e) => {
                tracing::error!(error = %e, "quick add failed");
                // Each submit mints fresh ids, so saved names must leave
                // the selection before a retry.
                let stored: Vec<String> = sent
                    .into_iter()
                    .filter(|(id, _)| self.subjects.get(id).is_some())
                    .map(|(_, name)| name)
                    .collect();
                if let Some(quick) = self.quick_add.as_mut() {
                    quick.forget_subjects(&stored);
                }
                self.status_message = Some(format!("Quick add failed: {}", e));
            }
        }
        self.clamp_selection();
    }

    // ── CSV import ──

    pub fn open_import(&mut self, text: Option<String>) {
        self.import = Some(match text {
            Some(text) => ImportState::with_text(text),
            None => ImportState::default(),
        });
        self.detail = None;
        self.input_mode = InputMode::Import;
    }

    pub fn close_import(&mut self) {
        self.import = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn submit_import(&mut self) {
        let Some(preview) = self.import.as_ref().and_then(ImportState::ready) else {
            self.status_message = Some("Nothing to import".to_string());
            return;
        };
        let batch = preview.subjects.clone();
        match self.gateway.create_many(&mut self.subjects, batch) {
            Ok(n) => {
                self.status_message = Some(format!("Imported {} subject{}", n, plural(n)));
                self.close_import();
            }
            Err(e) => {
                tracing::error!(error = %e, "import failed");
                self.status_message = Some(format!("Import failed: {}", e));
            }
        }
        self.clamp_selection();
    }

    pub fn handle_paste(&mut self, text: &str) {
        match self.input_mode {
            InputMode::Import => {
                if let Some(import) = self.import.as_mut() {
                    import.paste(text);
                }
            }
            InputMode::Form => {
                if let Some(form) = self.form.as_mut() {
                    form.input_str(text);
                }
            }
            InputMode::Normal => self.open_import(Some(text.to_string())),
            InputMode::QuickAdd | InputMode::ConfirmDelete => {}
        }
    }

    // ── Delete ──

    pub fn request_delete(&mut self) {
        let target = self
            .detail
            .clone()
            .or_else(|| self.selected_subject().map(|s| s.id().to_string()));
        if let Some(id) = target {
            self.detail = Some(id);
            self.input_mode = InputMode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self, confirmed: bool) {
        self.input_mode = InputMode::Normal;
        let Some(id) = self.detail.take() else {
            return;
        };
        if !confirmed {
            return;
        }
        match self.gateway.delete(&mut self.subjects, &id) {
            Ok(removed) => self.status_message = Some(format!("Deleted {}", removed.name)),
            Err(e) => {
                tracing::error!(error = %e, "delete failed");
                self.status_message = Some(format!("Delete failed: {}", e));
            }
        }
        self.clamp_selection();
    }

    // ── Theme & data ──

    pub fn cycle_theme(&mut self) {
        self.user_theme.cycle_preset();
        self.apply_theme();
    }

    pub fn toggle_dark_mode(&mut self) {
        self.user_theme.is_dark_mode = !self.user_theme.is_dark_mode;
        self.apply_theme();
    }

    fn apply_theme(&mut self) {
        self.theme = Theme::from_user(&self.user_theme);
        let mode = if self.user_theme.is_dark_mode { "dark" } else { "light" };
        self.status_message = Some(match self.user_theme.save() {
            Ok(()) => format!("Theme: {} ({})", self.user_theme.current_preset, mode),
            Err(e) => {
                tracing::warn!(error = %e, "could not save theme");
                format!("Theme not saved: {}", e)
            }
        });
    }

    pub fn reload(&mut self) {
        match self.gateway.connect() {
            Ok(subjects) => {
                self.subjects = subjects;
                self.clamp_selection();
                self.status_message = Some(format!(
                    "Loaded {} subject{} ({})",
                    self.subjects.len(),
                    plural(self.subjects.len()),
                    self.gateway.backend().label()
                ));
            }
            Err(e) => {
                tracing::error!(error = %e, "reload failed");
                self.status_message = Some(format!("Reload failed: {}", e));
            }
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
