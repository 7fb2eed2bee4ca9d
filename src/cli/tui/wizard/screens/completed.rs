//! Outcome of the run and what to do next

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::View;
use crate::cli::tui::wizard::theme::Theme;
use crate::wizard::{Action, CreationResult, Key, Screen, WizardEvent, WizardState};

pub struct CompletedScreen {
    result: CreationResult,
}

impl CompletedScreen {
    pub fn new(result: CreationResult) -> Self {
        Self { result }
    }

    pub fn result(&self) -> &CreationResult {
        &self.result
    }
}

impl Screen for CompletedScreen {
    fn init(&mut self, _state: &mut WizardState) {}

    fn handle_event(&mut self, _state: &mut WizardState, event: &WizardEvent) -> Option<Action> {
        match event {
            WizardEvent::Key(Key::Char('r')) => Some(Action::Restart),
            WizardEvent::Key(Key::Enter | Key::Esc | Key::Char('q')) => Some(Action::Quit),
            _ => None,
        }
    }

    fn resize(&mut self, _width: u16, _height: u16) {}

    fn title(&self) -> &str {
        if self.result.success {
            "Done"
        } else {
            "Not created"
        }
    }

    fn can_go_back(&self) -> bool {
        false
    }

    fn can_go_next(&self) -> bool {
        false
    }
}

impl View for CompletedScreen {
    fn render(&self, frame: &mut Frame, area: Rect, state: &WizardState, theme: &Theme) {
        let result = &self.result;
        let mut lines = Vec::new();

        if result.success {
            lines.push(Line::from(Span::styled(
                format!("🎉 {}", result.message),
                theme.success,
            )));
        } else if result.cancelled {
            lines.push(Line::from(Span::styled(
                format!("⊘ {}", result.message),
                theme.warning,
            )));
        } else {
            lines.push(Line::from(Span::styled(
                format!("💥 {}", result.message),
                theme.error,
            )));
        }
        lines.push(Line::from(""));

        if let Some(url) = &result.repository_url {
            lines.push(Line::from(vec![
                Span::styled("🔗 Repository:  ", theme.muted),
                Span::styled(url.clone(), theme.highlight),
            ]));
        }
        if let Some(path) = &result.clone_path {
            lines.push(Line::from(vec![
                Span::styled("📁 Local path:  ", theme.muted),
                Span::raw(path.display().to_string()),
            ]));
        }
        lines.push(Line::from(Span::styled(
            format!("⏱️  Took {:.1}s", result.elapsed.as_secs_f64()),
            theme.muted,
        )));

        if let Some(error) = &result.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(format!("✗ {error}"), theme.error)));
            if let Some(hint) = error.hint() {
                lines.push(Line::from(Span::styled(format!("💡 {hint}"), theme.info)));
            }
        }

        if !result.warnings.is_empty() {
            lines.push(Line::from(""));
            for warning in &result.warnings {
                lines.push(Line::from(Span::styled(format!("⚠️  {warning}"), theme.warning)));
            }
        }

        if result.success {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Next steps", theme.highlight)));
            match &result.clone_path {
                Some(path) => {
                    lines.push(Line::from(format!("   cd {}", path.display())));
                    lines.push(Line::from("   git log --oneline"));
                }
                None => lines.push(Line::from(format!(
                    "   gh repo clone {}",
                    state.repository_config.name
                ))),
            }
            lines.push(Line::from(format!(
                "   gh repo view {} --web",
                state.repository_config.name
            )));
        }

        let summary = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: false });
        frame.render_widget(summary, area);
    }

    fn help(&self) -> &'static str {
        "r create another • Enter / q quit"
    }
}
