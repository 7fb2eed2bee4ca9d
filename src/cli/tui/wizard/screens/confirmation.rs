//! Final review before anything is created

use std::sync::Arc;

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::warn;

use super::View;
use crate::backend::{RepositoryBackend, UNKNOWN_USER};
use crate::cli::tui::wizard::theme::Theme;
use crate::error::Result;
use crate::wizard::confirmation::{ConfirmationAction, ConfirmationData};
use crate::wizard::{Action, Key, Screen, WizardEvent, WizardState};

pub struct ConfirmationScreen {
    backend: Arc<dyn RepositoryBackend>,
    user: String,
    pending_user: Option<oneshot::Receiver<Result<String>>>,
    data: Option<ConfirmationData>,
    selected: usize,
    show_warnings: bool,
    show_command: bool,
}

impl ConfirmationScreen {
    pub fn new(backend: Arc<dyn RepositoryBackend>) -> Self {
        Self {
            backend,
            user: UNKNOWN_USER.to_string(),
            pending_user: None,
            data: None,
            selected: ConfirmationAction::ALL.len() - 1,
            show_warnings: true,
            show_command: false,
        }
    }

    pub fn data(&self) -> Option<&ConfirmationData> {
        self.data.as_ref()
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn selected_action(&self) -> ConfirmationAction {
        ConfirmationAction::ALL[self.selected]
    }

    pub fn show_warnings(&self) -> bool {
        self.show_warnings
    }

    pub fn show_command(&self) -> bool {
        self.show_command
    }

    fn refresh(&mut self, state: &WizardState) {
        self.data = Some(ConfirmationData::build(state, &self.user, Utc::now()));
    }

    fn poll_user(&mut self, state: &WizardState) {
        let Some(receiver) = self.pending_user.as_mut() else {
            return;
        };
        match receiver.try_recv() {
            Ok(Ok(user)) => {
                self.user = user;
                self.refresh(state);
            }
            Ok(Err(error)) => warn!("could not determine the signed-in user: {error}"),
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => {}
        }
        self.pending_user = None;
    }
}

impl Screen for ConfirmationScreen {
    fn init(&mut self, state: &mut WizardState) {
        self.refresh(state);

        let (sender, receiver) = oneshot::channel();
        let backend = self.backend.clone();
        tokio::spawn(async move {
            let _ = sender.send(backend.current_user().await);
        });
        self.pending_user = Some(receiver);
    }

    fn handle_event(&mut self, state: &mut WizardState, event: &WizardEvent) -> Option<Action> {
        let key = match event {
            WizardEvent::Tick => {
                self.poll_user(state);
                return None;
            }
            WizardEvent::Key(key) => *key,
        };

        match key {
            Key::Char('w') => {
                self.show_warnings = !self.show_warnings;
                None
            }
            Key::Char('c') => {
                self.show_command = !self.show_command;
                None
            }
            Key::Left => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            Key::Right | Key::Tab => {
                self.selected = (self.selected + 1).min(ConfirmationAction::ALL.len() - 1);
                None
            }
            Key::Enter => Some(self.selected_action().navigation()),
            Key::Char(c) => ConfirmationAction::from_key(c).map(|action| action.navigation()),
            Key::Esc => Some(Action::Back),
            _ => None,
        }
    }

    fn resize(&mut self, _width: u16, _height: u16) {}

    fn title(&self) -> &str {
        "Confirm"
    }

    fn can_go_back(&self) -> bool {
        true
    }

    fn can_go_next(&self) -> bool {
        true
    }
}

impl View for ConfirmationScreen {
    fn render(&self, frame: &mut Frame, area: Rect, _state: &WizardState, theme: &Theme) {
        let Some(data) = &self.data else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let mut lines = Vec::new();
        for section in &data.sections {
            lines.push(Line::from(Span::styled(
                format!("{} {}", section.icon, section.title),
                theme.highlight,
            )));
            for item in &section.items {
                let value_style = if item.important {
                    theme.focused
                } else {
                    ratatui::style::Style::default()
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("   {:<20}", format!("{}:", item.label)), theme.muted),
                    Span::styled(item.value.clone(), value_style),
                ]));
            }
            lines.push(Line::from(""));
        }

        if self.show_warnings && !data.warnings.is_empty() {
            for warning in &data.warnings {
                lines.push(Line::from(Span::styled(format!("⚠️  {warning}"), theme.warning)));
            }
            lines.push(Line::from(""));
        }

        if self.show_command {
            lines.push(Line::from(Span::styled(format!("💻 {}", data.command), theme.info)));
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            format!("⏱️  Estimated time: ~{}s", data.estimated_seconds),
            theme.muted,
        )));

        let summary = Paragraph::new(lines)
            .block(Block::default().title(" Review ").borders(Borders::ALL))
            .wrap(Wrap { trim: false });
        frame.render_widget(summary, chunks[0]);

        let buttons: Vec<Span> = data
            .actions
            .iter()
            .enumerate()
            .flat_map(|(index, action)| {
                let style = if index == self.selected {
                    theme.selected
                } else {
                    theme.muted
                };
                [
                    Span::styled(format!(" [{}] {} ", action.key(), action.label()), style),
                    Span::raw("   "),
                ]
            })
            .collect();
        let description = self.selected_action().description();
        let actions = Paragraph::new(vec![
            Line::from(buttons),
            Line::from(Span::styled(description, theme.muted)),
        ])
        .block(Block::default().borders(Borders::TOP));
        frame.render_widget(actions, chunks[1]);
    }

    fn help(&self) -> &'static str {
        "←→ choose • Enter confirm • 1/2/3 shortcut • w warnings • c command • Esc back"
    }
}
