mod app;
mod components;
mod event;
mod tui;

use std::path::PathBuf;
use std::time::Duration;

use app::{App, InputMode, ViewMode};
use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use components::quick_add::QuickField;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::AppEvent;
use lesson_planner::config::Config;
use lesson_planner::store::Gateway;
use lesson_planner::theme::{Theme, UserTheme};
use ratatui::layout::{Constraint, Layout, Rect};

/// Weekly lesson planner for the terminal.
#[derive(Debug, Parser)]
#[command(name = "lesson-planner", version, about)]
struct Cli {
    /// Config file (default: <config dir>/lesson-planner/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the subjects API
    #[arg(long, env = "LESSON_PLANNER_API_URL")]
    api_url: Option<String>,

    /// Use the local subject file only
    #[arg(
        long,
        env = "LESSON_PLANNER_OFFLINE",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    offline: bool,

    /// Open the import dialog with this CSV timetable
    #[arg(long, value_name = "CSV")]
    import: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config = config.with_api_url(url);
    }
    if cli.offline {
        config = config.with_offline(true);
    }

    let _log_guard = lesson_planner::logging::init(&config).wrap_err("failed to set up logging")?;
    tracing::info!(api_url = %config.api_url, offline = config.offline, "starting lesson planner");

    let import_text = cli
        .import
        .as_ref()
        .map(|path| {
            std::fs::read_to_string(path).wrap_err_with(|| format!("failed to read {}", path.display()))
        })
        .transpose()?;

    let mut gateway = Gateway::from_config(&config)?;
    eprintln!("Loading subjects...");
    let subjects = gateway.connect()?;
    eprintln!("Using {} storage. Launching TUI...", gateway.backend().label());

    let user_theme = UserTheme::load().unwrap_or_default();
    let mut app = App::new(gateway, subjects, config.grid, user_theme);
    if import_text.is_some() {
        app.open_import(import_text);
    }

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;
    tracing::info!("exiting");
    result
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();
            frame.render_widget(ratatui::widgets::Block::default().style(app.theme.base), area);

            let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
            let content_area = layout[0];

            match app.view_mode {
                ViewMode::Subjects => {
                    components::SubjectList::render(frame, content_area, &app.theme, &app.subjects, app.list_index)
                }
                ViewMode::Schedule => render_schedule_layout(frame, content_area, app),
                ViewMode::Week => components::WeekView::render(
                    frame,
                    content_area,
                    &app.theme,
                    app.subjects.as_slice(),
                    app.grid,
                    app.selected_day,
                    app.today,
                ),
            }

            if let Some(ref form) = app.form {
                components::SubjectForm::render(frame, area, &app.theme, form);
            }
            if let Some(ref quick) = app.quick_add {
                components::QuickAddDialog::render(frame, area, &app.theme, quick);
            }
            if let Some(ref import) = app.import {
                components::ImportDialog::render(frame, area, &app.theme, import);
            }
            if let Some(subject) = app.detail_subject() {
                components::day_view::render_detail_popup(frame, area, &app.theme, subject);
            }
            if app.show_help {
                render_help(frame, area, &app.theme);
            }

            components::StatusBar::render(
                frame,
                layout[1],
                &app.theme,
                app.view_mode,
                app.input_mode,
                app.backend(),
                app.status_message.as_deref(),
            );
        })?;

        let Some(event) = event::next_event(Duration::from_millis(100))? else {
            continue;
        };

        let key = match event {
            AppEvent::Paste(text) => {
                app.handle_paste(&text);
                continue;
            }
            AppEvent::Key(key) => key,
        };

        app.status_message = None;

        if app.show_help {
            if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
                app.show_help = false;
            }
            continue;
        }

        match app.input_mode {
            InputMode::Form => handle_form_input(app, key),
            InputMode::QuickAdd => handle_quick_add_input(app, key),
            InputMode::Import => handle_import_input(app, key),
            InputMode::ConfirmDelete => app.confirm_delete(matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'))),
            InputMode::Normal if app.detail.is_some() => handle_detail_input(app, key),
            InputMode::Normal => handle_normal_input(app, key.code, key.modifiers),
        }
    }

    Ok(())
}

fn handle_normal_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match (code, modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.running = false;
        }
        (KeyCode::Char('1'), _) => app.set_view(ViewMode::Subjects),
        (KeyCode::Char('2'), _) => app.set_view(ViewMode::Schedule),
        (KeyCode::Char('3'), _) => app.set_view(ViewMode::Week),
        (KeyCode::Char('t'), _) => app.go_to_today(),
        (KeyCode::Char('r'), _) => app.reload(),
        (KeyCode::Char('n'), _) => app.open_new_form(),
        (KeyCode::Char('e'), _) => app.open_edit_form(),
        (KeyCode::Char('d'), _) => app.request_delete(),
        (KeyCode::Char('a'), _) => app.open_quick_add(),
        (KeyCode::Char('i'), _) => app.open_import(None),
        (KeyCode::Char('T'), _) => app.cycle_theme(),
        (KeyCode::Char('D'), _) => app.toggle_dark_mode(),
        (KeyCode::Enter, _) => app.show_detail(),
        (KeyCode::Left, _) | (KeyCode::Char('h'), _) => app.prev_day(),
        (KeyCode::Right, _) | (KeyCode::Char('l'), _) => app.next_day(),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.move_up(),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.move_down(),
        (KeyCode::Char('?'), _) => app.show_help = true,
        _ => {}
    }
}

fn handle_detail_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.close_detail(),
        KeyCode::Char('e') => app.open_edit_form(),
        KeyCode::Char('d') => app.request_delete(),
        _ => {}
    }
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.close_form();
        return;
    }
    if key.code == KeyCode::Enter {
        app.submit_form();
        return;
    }
    let Some(form) = app.form.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Tab | KeyCode::Down => form.active_field = form.active_field.next(),
        KeyCode::BackTab | KeyCode::Up => form.active_field = form.active_field.prev(),
        KeyCode::Left => form.left(),
        KeyCode::Right => form.right(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.input_char(c),
        _ => {}
    }
}

fn handle_quick_add_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.close_quick_add();
            return;
        }
        KeyCode::Enter => {
            match app.quick_add.as_mut() {
                Some(quick) if quick.focus == QuickField::CustomSubject => quick.add_custom_subject(),
                _ => app.submit_quick_add(),
            }
            return;
        }
        _ => {}
    }
    let Some(quick) = app.quick_add.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Tab => quick.focus = quick.focus.next(),
        KeyCode::BackTab => quick.focus = quick.focus.prev(),
        KeyCode::Up => quick.up(),
        KeyCode::Down => quick.down(),
        KeyCode::Left => quick.left(),
        KeyCode::Right => quick.right(),
        KeyCode::Backspace => quick.backspace(),
        KeyCode::Char(' ') => quick.toggle(),
        KeyCode::Char(c) => quick.input_char(c),
        _ => {}
    }
}

fn handle_import_input(app: &mut App, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => app.close_import(),
        (KeyCode::Enter, _) => app.submit_import(),
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
            if let Some(import) = app.import.as_mut() {
                import.clear();
            }
        }
        _ => {}
    }
}

fn render_schedule_layout(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    if area.width < 60 {
        components::DayView::render(
            frame,
            area,
            &app.theme,
            app.subjects.as_slice(),
            app.selected_day,
            app.today,
            app.day_index,
        );
        return;
    }

    let content = Layout::horizontal([Constraint::Length(24), Constraint::Min(20)]).split(area);
    render_day_picker(frame, content[0], app);
    components::DayView::render(
        frame,
        content[1],
        &app.theme,
        app.subjects.as_slice(),
        app.selected_day,
        app.today,
        app.day_index,
    );
}

fn render_day_picker(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    use lesson_planner::schedule::{project_week, Weekday};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Paragraph};

    let week = project_week(app.subjects.as_slice());
    let lines: Vec<Line> = Weekday::ALL
        .iter()
        .map(|day| {
            let style = if *day == app.selected_day {
                app.theme.selected
            } else if Some(*day) == app.today {
                app.theme.today
            } else {
                app.theme.base
            };
            Line::from(vec![
                Span::styled(format!(" {:<10}", day.label()), style),
                Span::styled(format!(" {:>3}", week.day(*day).len()), app.theme.dim),
            ])
        })
        .collect();

    let block = Block::default()
        .title(" Days ")
        .title_style(app.theme.header)
        .borders(Borders::ALL)
        .border_style(app.theme.border);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help(frame: &mut ratatui::Frame, area: Rect, theme: &Theme) {
    use ratatui::style::Modifier;
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let popup_area = components::centered(area, 52, 26);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(theme.accent)
        .borders(Borders::ALL)
        .border_style(theme.border);

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = theme.accent;
    let section_style = theme.header.add_modifier(Modifier::UNDERLINED);
    let entry = |keys: &str, desc: &str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", keys), key_style),
            Span::styled(desc.to_string(), theme.base),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Navigation", section_style)),
        entry("h/l", "Previous/next weekday"),
        entry("j/k", "Move selection"),
        entry("t", "Jump to today"),
        Line::from(""),
        Line::from(Span::styled("Views", section_style)),
        entry("1/2/3", "Subjects / Schedule / Week"),
        Line::from(""),
        Line::from(Span::styled("Actions", section_style)),
        entry("Enter", "Subject details"),
        entry("n", "New subject"),
        entry("e", "Edit subject"),
        entry("d", "Delete subject"),
        entry("a", "Quick add common subjects"),
        entry("i", "Import timetable CSV (or paste)"),
        entry("r", "Reload subjects"),
        entry("T / D", "Next theme / dark mode"),
        Line::from(""),
        entry("q / Esc", "Quit / close popup"),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
