use std::path::PathBuf;

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

use crate::config::APP_DIR;
use crate::schedule::{ColorTag, projector::PALETTE_SIZE};

pub const DEFAULT_PRESET: &str = "indigo-purple";

#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("could not determine a config directory")]
    NoConfigDir,
    #[error("failed to write theme file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode theme: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Hex `#rrggbb` colors for each UI role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub surface: String,
    pub text: String,
    pub text_secondary: String,
}

/// Per-role overrides layered over a preset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomColors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_secondary: Option<String>,
}

impl CustomColors {
    fn apply(&self, colors: &mut ThemeColors) {
        let overrides = [
            (&self.primary, &mut colors.primary),
            (&self.secondary, &mut colors.secondary),
            (&self.accent, &mut colors.accent),
            (&self.background, &mut colors.background),
            (&self.surface, &mut colors.surface),
            (&self.text, &mut colors.text),
            (&self.text_secondary, &mut colors.text_secondary),
        ];
        for (custom, slot) in overrides {
            if let Some(value) = custom {
                *slot = value.clone();
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemePreset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub colors: ThemeColors,
}

/// The user's saved choice: a preset, optional overrides and dark mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTheme {
    pub current_preset: String,
    #[serde(default)]
    pub is_dark_mode: bool,
    #[serde(default)]
    pub custom_colors: CustomColors,
}

impl Default for UserTheme {
    fn default() -> Self {
        Self {
            current_preset: DEFAULT_PRESET.to_string(),
            custom_colors: CustomColors::default(),
            is_dark_mode: false,
        }
    }
}

impl UserTheme {
    pub fn load() -> Option<Self> {
        let path = theme_path()?;
        if !path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(&path).ok()?;
        match toml::from_str(&content) {
            Ok(theme) => Some(theme),
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "ignoring unreadable theme file");
                None
            }
        }
    }

    pub fn save(&self) -> Result<(), ThemeError> {
        let path = theme_path().ok_or(ThemeError::NoConfigDir)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Switch to the preset after the current one, wrapping around.
    pub fn cycle_preset(&mut self) {
        let presets = presets();
        let current = presets
            .iter()
            .position(|p| p.id == self.current_preset)
            .unwrap_or(0);
        self.current_preset = presets[(current + 1) % presets.len()].id.to_string();
    }
}

fn colors(
    primary: &str,
    secondary: &str,
    accent: &str,
    background: &str,
    text: &str,
    text_secondary: &str,
) -> ThemeColors {
    ThemeColors {
        primary: primary.into(),
        secondary: secondary.into(),
        accent: accent.into(),
        background: background.into(),
        surface: "#ffffff".into(),
        text: text.into(),
        text_secondary: text_secondary.into(),
    }
}

pub fn default_preset() -> ThemePreset {
    ThemePreset {
        id: DEFAULT_PRESET,
        name: "Indigo Purple",
        description: "Professional and modern",
        colors: colors("#6366f1", "#8b5cf6", "#ec4899", "#f1f5f9", "#1e293b", "#64748b"),
    }
}

pub fn presets() -> Vec<ThemePreset> {
    vec![
        default_preset(),
        ThemePreset {
            id: "ocean-blue",
            name: "Ocean Blue",
            description: "Calm and serene",
            colors: colors("#0ea5e9", "#06b6d4", "#0891b2", "#f0f9ff", "#0c4a6e", "#0369a1"),
        },
        ThemePreset {
            id: "emerald-green",
            name: "Emerald Green",
            description: "Fresh and natural",
            colors: colors("#10b981", "#059669", "#047857", "#f0fdf4", "#064e3b", "#065f46"),
        },
        ThemePreset {
            id: "sunset-orange",
            name: "Sunset Orange",
            description: "Warm and energetic",
            colors: colors("#f97316", "#ea580c", "#dc2626", "#fff7ed", "#7c2d12", "#9a3412"),
        },
        ThemePreset {
            id: "rose-pink",
            name: "Rose Pink",
            description: "Elegant and feminine",
            colors: colors("#f43f5e", "#e11d48", "#be185d", "#fdf2f8", "#831843", "#9d174d"),
        },
        ThemePreset {
            id: "slate-gray",
            name: "Slate Gray",
            description: "Minimal and clean",
            colors: colors("#64748b", "#475569", "#334155", "#f8fafc", "#1e293b", "#475569"),
        },
    ]
}

pub fn preset_by_id(id: &str) -> Option<ThemePreset> {
    presets().into_iter().find(|p| p.id == id)
}

/// Preset, then custom overrides, then dark-mode overrides.
/// An unknown preset id falls back to the default preset.
pub fn effective_colors(theme: &UserTheme) -> ThemeColors {
    let mut colors = preset_by_id(&theme.current_preset)
        .unwrap_or_else(default_preset)
        .colors;

    theme.custom_colors.apply(&mut colors);

    if theme.is_dark_mode {
        colors.background = "#0f172a".into();
        colors.surface = "#1e293b".into();
        colors.text = "#f1f5f9".into();
        colors.text_secondary = "#cbd5e1".into();
    }
    colors
}

/// CSS custom properties for a web front end rendering the same theme.
pub fn style_declarations(theme: &UserTheme) -> Vec<(String, String)> {
    let colors = effective_colors(theme);
    let mut decls: Vec<(String, String)> = [
        ("primary", &colors.primary),
        ("secondary", &colors.secondary),
        ("accent", &colors.accent),
        ("background", &colors.background),
        ("surface", &colors.surface),
        ("text", &colors.text),
        ("textSecondary", &colors.text_secondary),
    ]
    .into_iter()
    .map(|(key, value)| (format!("--color-{}", key), value.clone()))
    .collect();
    decls.push((
        "--background-gradient".to_string(),
        background_gradient(&colors.background),
    ));
    decls
}

fn background_gradient(background: &str) -> String {
    match parse_color(background) {
        Some(Color::Rgb(r, g, b)) => {
            let lighter = format!(
                "rgb({}, {}, {})",
                r.saturating_add(20),
                g.saturating_add(20),
                b.saturating_add(20)
            );
            let darker = format!(
                "rgb({}, {}, {})",
                r.saturating_sub(20),
                g.saturating_sub(20),
                b.saturating_sub(20)
            );
            format!(
                "linear-gradient(135deg, {lighter} 0%, {background} 25%, {darker} 50%, {background} 75%, {darker} 100%)"
            )
        }
        _ => "linear-gradient(135deg, #f1f5f9 0%, #e2e8f0 25%, #cbd5e1 50%, #94a3b8 75%, #64748b 100%)"
            .to_string(),
    }
}

/// Terminal styles for the views. Built once from the user's theme and
/// handed to every component.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub base: Style,
    pub today: Style,
    pub selected: Style,
    pub header: Style,
    pub dim: Style,
    pub border: Style,
    pub status: Style,
    pub highlight: Style,
    pub accent: Style,
    pub error: Style,
    palette: [Color; PALETTE_SIZE as usize],
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_user(&UserTheme::default())
    }
}

impl Theme {
    pub fn from_user(user: &UserTheme) -> Self {
        let colors = effective_colors(user);
        let c = |hex: &str, fallback: Color| parse_color(hex).unwrap_or(fallback);

        let primary = c(&colors.primary, Color::Blue);
        let secondary = c(&colors.secondary, Color::Magenta);
        let accent = c(&colors.accent, Color::Cyan);
        let background = c(&colors.background, Color::Reset);
        let surface = c(&colors.surface, Color::White);
        let text = c(&colors.text, Color::White);
        let text_secondary = c(&colors.text_secondary, Color::DarkGray);

        Self {
            name: user.current_preset.clone(),
            base: Style::default().fg(text).bg(background),
            today: Style::default().fg(surface).bg(accent).add_modifier(Modifier::BOLD),
            selected: Style::default().fg(surface).bg(primary),
            header: Style::default().fg(text).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(text_secondary),
            border: Style::default().fg(secondary),
            status: Style::default().fg(surface).bg(primary),
            highlight: Style::default().bg(surface).add_modifier(Modifier::BOLD),
            accent: Style::default().fg(primary).add_modifier(Modifier::BOLD),
            error: Style::default().fg(Color::Red),
            palette: [
                Color::Rgb(99, 102, 241),  // indigo
                Color::Rgb(14, 165, 233),  // sky
                Color::Rgb(16, 185, 129),  // emerald
                Color::Rgb(245, 158, 11),  // amber
                Color::Rgb(244, 63, 94),   // rose
                Color::Rgb(139, 92, 246),  // violet
                Color::Rgb(20, 184, 166),  // teal
                Color::Rgb(249, 115, 22),  // orange
            ],
        }
    }

    pub fn palette_color(&self, tag: ColorTag) -> Color {
        self.palette[tag.index() % self.palette.len()]
    }

    /// Block style for a subject chip in the list and grid.
    pub fn chip(&self, tag: ColorTag) -> Style {
        Style::default().fg(Color::Black).bg(self.palette_color(tag))
    }
}

fn theme_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("theme.toml"))
}

/// Parse a color string: hex "#rrggbb", or named colors.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if s.starts_with('#') && s.len() == 7 {
        let r = u8::from_str_radix(&s[1..3], 16).ok()?;
        let g = u8::from_str_radix(&s[3..5], 16).ok()?;
        let b = u8::from_str_radix(&s[5..7], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    match s.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        _ => None,
    }
}
