use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeName;
use crate::wizard::TaskStatus;

/// Consistent theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Style,
    pub selected: Style,
    pub focused: Style,
    pub error: Style,
    pub success: Style,
    pub warning: Style,
    pub info: Style,
    pub muted: Style,
    pub highlight: Style,
    pub help_bar: Style,
    pub gauge: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            selected: Style::default()
                .bg(Color::Rgb(50, 50, 80))
                .add_modifier(Modifier::BOLD),
            focused: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            error: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            success: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Yellow),
            info: Style::default().fg(Color::Blue),
            muted: Style::default().fg(Color::DarkGray),
            highlight: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            help_bar: Style::default().fg(Color::White).bg(Color::DarkGray),
            gauge: Style::default().fg(Color::Green).bg(Color::Black),
        }
    }
}

impl Theme {
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Default => Self::default(),
            ThemeName::Dark => Self {
                selected: Style::default()
                    .bg(Color::Rgb(30, 30, 30))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
                muted: Style::default().fg(Color::Gray),
                help_bar: Style::default().fg(Color::Gray).bg(Color::Black),
                ..Self::default()
            },
            ThemeName::Light => Self {
                title: Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
                selected: Style::default()
                    .bg(Color::Rgb(210, 220, 240))
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
                focused: Style::default()
                    .fg(Color::Rgb(160, 90, 0))
                    .add_modifier(Modifier::BOLD),
                warning: Style::default().fg(Color::Rgb(160, 90, 0)),
                muted: Style::default().fg(Color::Gray),
                highlight: Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
                help_bar: Style::default().fg(Color::Black).bg(Color::Gray),
                gauge: Style::default().fg(Color::Green).bg(Color::White),
                ..Self::default()
            },
        }
    }

    /// Style for a task line on the execution screen
    pub fn status_style(&self, status: TaskStatus) -> Style {
        match status {
            TaskStatus::Pending => self.muted,
            TaskStatus::InProgress => self.focused,
            TaskStatus::Completed => self.success,
            TaskStatus::Failed => self.error,
            TaskStatus::Skipped => self.warning,
        }
    }
}
