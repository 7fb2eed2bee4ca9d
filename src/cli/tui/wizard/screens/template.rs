//! Template selection with a background load

use std::sync::Arc;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, warn};

use super::{centered, View};
use crate::backend::{order_by_recent, TemplateSource};
use crate::cli::tui::wizard::theme::Theme;
use crate::error::{Result, WizardError};
use crate::wizard::{Action, Key, Screen, Template, WizardEvent, WizardState};

enum Load {
    Loading(oneshot::Receiver<Result<Vec<Template>>>),
    Failed(WizardError),
    Ready(Vec<Template>),
}

pub struct TemplateScreen {
    source: Arc<dyn TemplateSource>,
    recent: Vec<String>,
    load: Load,
    selected: usize,
}

impl TemplateScreen {
    pub fn new(source: Arc<dyn TemplateSource>, recent: Vec<String>) -> Self {
        let (_, receiver) = oneshot::channel();
        Self {
            source,
            recent,
            load: Load::Loading(receiver),
            selected: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, Load::Loading(_))
    }

    pub fn templates(&self) -> &[Template] {
        match &self.load {
            Load::Ready(templates) => templates,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&WizardError> {
        match &self.load {
            Load::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<&Template> {
        self.templates().get(self.selected)
    }

    fn start_loading(&mut self) {
        let (sender, receiver) = oneshot::channel();
        let source = self.source.clone();
        tokio::spawn(async move {
            let _ = sender.send(source.list_templates().await);
        });
        self.load = Load::Loading(receiver);
        self.selected = 0;
    }

    fn poll_load(&mut self) {
        let Load::Loading(receiver) = &mut self.load else {
            return;
        };
        self.load = match receiver.try_recv() {
            Ok(Ok(mut templates)) => {
                debug!(count = templates.len(), "templates loaded");
                order_by_recent(&mut templates, &self.recent);
                Load::Ready(templates)
            }
            Ok(Err(error)) => {
                warn!("failed to load templates: {error}");
                Load::Failed(error)
            }
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => {
                Load::Failed(WizardError::project("template loading stopped unexpectedly"))
            }
        };
    }

    fn proceed(&self, state: &mut WizardState) -> Option<Action> {
        match &self.load {
            Load::Loading(_) => None,
            Load::Ready(templates) if !templates.is_empty() => {
                let template = templates.get(self.selected)?;
                state.select_template(template.clone());
                Some(Action::Next)
            }
            // Nothing to choose from: continue without a template
            Load::Ready(_) | Load::Failed(_) => {
                state.set_use_template(false);
                Some(Action::Next)
            }
        }
    }
}

impl Screen for TemplateScreen {
    fn init(&mut self, state: &mut WizardState) {
        if let Some(current) = state.selected_template() {
            if !self.recent.contains(&current.full_name) {
                self.recent.insert(0, current.full_name.clone());
            }
        }
        self.start_loading();
    }

    fn handle_event(&mut self, state: &mut WizardState, event: &WizardEvent) -> Option<Action> {
        let key = match event {
            WizardEvent::Tick => {
                self.poll_load();
                return None;
            }
            WizardEvent::Key(key) => *key,
        };

        let count = self.templates().len();
        match key {
            Key::Up | Key::Char('k') if count > 0 => {
                self.selected = self.selected.checked_sub(1).unwrap_or(count - 1);
                None
            }
            Key::Down | Key::Char('j') if count > 0 => {
                self.selected = (self.selected + 1) % count;
                None
            }
            Key::Char('r') if self.error().is_some() => {
                self.start_loading();
                None
            }
            Key::Enter => self.proceed(state),
            Key::Esc => Some(Action::Back),
            _ => None,
        }
    }

    fn resize(&mut self, _width: u16, _height: u16) {}

    fn title(&self) -> &str {
        "Choose a template"
    }

    fn can_go_back(&self) -> bool {
        true
    }

    fn can_go_next(&self) -> bool {
        !self.is_loading()
    }
}

impl View for TemplateScreen {
    fn render(&self, frame: &mut Frame, area: Rect, _state: &WizardState, theme: &Theme) {
        match &self.load {
            Load::Loading(_) => {
                let text = Paragraph::new(Line::from(Span::styled(
                    "⟳ Loading your template repositories...",
                    theme.focused,
                )));
                frame.render_widget(text, centered(area, 44, 1));
            }
            Load::Failed(error) => {
                let mut lines = vec![
                    Line::from(Span::styled("✗ Could not load templates", theme.error)),
                    Line::from(""),
                    Line::from(error.to_string()),
                ];
                if let Some(hint) = error.hint() {
                    lines.push(Line::from(Span::styled(hint, theme.muted)));
                }
                lines.push(Line::from(""));
                lines.push(Line::from("Press r to retry or Enter to continue without a template."));
                let text = Paragraph::new(lines)
                    .block(Block::default().borders(Borders::ALL))
                    .wrap(Wrap { trim: true });
                frame.render_widget(text, centered(area, 70, 10));
            }
            Load::Ready(templates) if templates.is_empty() => {
                let text = Paragraph::new(vec![
                    Line::from("No template repositories found."),
                    Line::from(""),
                    Line::from("Press Enter to continue without a template."),
                ]);
                frame.render_widget(text, centered(area, 46, 3));
            }
            Load::Ready(templates) => self.render_list(frame, area, templates, theme),
        }
    }

    fn help(&self) -> &'static str {
        if self.error().is_some() {
            "r retry • Enter continue without template • Esc back"
        } else {
            "↑↓ select • Enter choose • Esc back • q quit"
        }
    }
}

impl TemplateScreen {
    fn render_list(&self, frame: &mut Frame, area: Rect, templates: &[Template], theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let items: Vec<ListItem> = templates
            .iter()
            .map(|template| {
                let mut spans = vec![Span::raw(template.display_name())];
                if self.recent.contains(&template.full_name) {
                    spans.push(Span::styled("  recent", theme.info));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!(" Templates ({}) ", templates.len()))
                    .borders(Borders::ALL),
            )
            .highlight_style(theme.selected)
            .highlight_symbol("▶ ");
        let mut list_state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, chunks[0], &mut list_state);

        let Some(template) = templates.get(self.selected) else {
            return;
        };
        let mut lines = vec![
            Line::from(Span::styled(template.full_name.clone(), theme.highlight)),
            Line::from(""),
            Line::from(template.short_description()),
            Line::from(""),
            Line::from(format!("⭐ {}   🍴 {}", template.stars, template.forks)),
        ];
        if !template.language.is_empty() {
            lines.push(Line::from(format!("Language: {}", template.language)));
        }
        if !template.topics.is_empty() {
            lines.push(Line::from(format!("Topics: {}", template.topics.join(", "))));
        }
        if let Some(updated_at) = template.updated_at {
            lines.push(Line::from(format!("Updated: {}", updated_at.format("%Y-%m-%d"))));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(template.repo_url(), theme.muted)));

        let details = Paragraph::new(lines)
            .block(Block::default().title(" Details ").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(details, chunks[1]);
    }
}
