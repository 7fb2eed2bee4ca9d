//! Welcome screen: start from a template or from scratch

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{centered, View};
use crate::cli::tui::wizard::theme::Theme;
use crate::wizard::{Action, Key, Screen, WizardEvent, WizardState};

const CHOICES: [(&str, &str); 2] = [
    ("Start from a template", "pick one of your template repositories"),
    ("Start from scratch", "an empty repository, optionally with a README"),
];

pub struct WelcomeScreen {
    use_template: bool,
}

impl WelcomeScreen {
    pub fn new(state: &WizardState) -> Self {
        Self {
            use_template: state.use_template() || state.selected_template().is_none(),
        }
    }

    pub fn use_template(&self) -> bool {
        self.use_template
    }
}

impl Screen for WelcomeScreen {
    fn init(&mut self, _state: &mut WizardState) {}

    fn handle_event(&mut self, state: &mut WizardState, event: &WizardEvent) -> Option<Action> {
        let WizardEvent::Key(key) = event else {
            return None;
        };
        match key {
            Key::Up | Key::Down | Key::Tab | Key::Char('j') | Key::Char('k') => {
                self.use_template = !self.use_template;
                None
            }
            Key::Enter => {
                state.set_use_template(self.use_template);
                Some(Action::Next)
            }
            _ => None,
        }
    }

    fn resize(&mut self, _width: u16, _height: u16) {}

    fn title(&self) -> &str {
        "Welcome"
    }

    fn can_go_back(&self) -> bool {
        false
    }

    fn can_go_next(&self) -> bool {
        true
    }
}

impl View for WelcomeScreen {
    fn render(&self, frame: &mut Frame, area: Rect, _state: &WizardState, theme: &Theme) {
        let mut lines = vec![
            Line::from(Span::styled("Create a new GitHub repository", theme.title)),
            Line::from(""),
            Line::from("This wizard creates the repository with the GitHub CLI,"),
            Line::from("applies a template or README, and clones it locally."),
            Line::from(""),
            Line::from(""),
        ];

        for (index, (label, detail)) in CHOICES.iter().enumerate() {
            let chosen = (index == 0) == self.use_template;
            lines.push(Line::from(vec![
                Span::raw(if chosen { "▶ " } else { "  " }),
                Span::styled(*label, if chosen { theme.success } else { theme.muted }),
                Span::styled(format!("  {detail}"), theme.muted),
            ]));
        }

        let block = Block::default().borders(Borders::ALL);
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, centered(area, 72, 14));
    }

    fn help(&self) -> &'static str {
        "↑↓ choose • Enter continue • q quit"
    }
}
