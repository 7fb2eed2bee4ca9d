//! Repository settings, one question at a time

use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};
use tui_input::{Input, InputRequest};

use super::View;
use crate::cli::tui::wizard::theme::Theme;
use crate::wizard::questions::{
    Question, QuestionFlow, QuestionKind, ADD_README, CLONE_AFTER_CREATE, DESCRIPTION, PRIVATE,
    PUBLIC, REPOSITORY_NAME, VISIBILITY,
};
use crate::wizard::{Action, Key, RepositoryConfig, Screen, WizardEvent, WizardState};

pub struct SettingsScreen {
    flow: QuestionFlow,
    /// Values to pre-fill when a question has no answer yet
    seed: RepositoryConfig,
    input: Input,
    option: usize,
    error: Option<String>,
    show_help: bool,
}

impl SettingsScreen {
    pub fn new(state: &WizardState) -> Self {
        let seed = state.repository_config.clone();
        let mut screen = Self {
            flow: QuestionFlow::new(&seed),
            seed,
            input: Input::default(),
            option: 0,
            error: None,
            show_help: false,
        };
        screen.load_question();
        screen
    }

    pub fn flow(&self) -> &QuestionFlow {
        &self.flow
    }

    pub fn input_value(&self) -> &str {
        self.input.value()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    fn current_kind(&self) -> Option<QuestionKind> {
        self.flow.current_question().map(|q| q.kind)
    }

    /// Put the stored answer, or a sensible starting value, into the editor
    fn load_question(&mut self) {
        let Some(question) = self.flow.current_question() else {
            return;
        };
        let value = match self.flow.answer(question.id) {
            Some(answer) => answer.value.clone(),
            None => seeded_value(question, &self.seed),
        };
        self.option = question
            .options
            .iter()
            .position(|option| *option == value)
            .unwrap_or(0);
        self.input = Input::new(value);
        self.error = None;
    }

    fn submit(&mut self, state: &mut WizardState) -> Option<Action> {
        let question = self.flow.current_question()?;
        let value = match question.kind {
            QuestionKind::Select => question.options.get(self.option).cloned().unwrap_or_default(),
            QuestionKind::Text | QuestionKind::Bool => self.input.value().to_string(),
        };

        if let Err(error) = self.flow.set_answer(&value) {
            self.error = Some(error.to_string());
            return None;
        }

        if self.flow.advance() {
            self.load_question();
            None
        } else {
            state.repository_config = self.flow.to_repository_config();
            Some(Action::Next)
        }
    }

    fn edit(&mut self, key: Key) {
        let request = match key {
            Key::Char(c) => InputRequest::InsertChar(c),
            Key::Backspace => InputRequest::DeletePrevChar,
            Key::Delete => InputRequest::DeleteNextChar,
            Key::Left => InputRequest::GoToPrevChar,
            Key::Right => InputRequest::GoToNextChar,
            Key::Home => InputRequest::GoToStart,
            Key::End => InputRequest::GoToEnd,
            Key::ClearLine => InputRequest::DeleteLine,
            _ => return,
        };
        if self.input.handle(request).is_some() {
            self.error = None;
        }
    }
}

/// Starting value for a question: the current setting where one exists
fn seeded_value(question: &Question, seed: &RepositoryConfig) -> String {
    let yes_no = |value: bool| if value { "yes" } else { "no" }.to_string();
    match question.id {
        REPOSITORY_NAME => seed.name.clone(),
        DESCRIPTION => seed.description.clone(),
        VISIBILITY => if seed.is_private { PRIVATE } else { PUBLIC }.to_string(),
        CLONE_AFTER_CREATE => yes_no(seed.should_clone),
        ADD_README => yes_no(seed.add_readme),
        _ => question.default_value.clone(),
    }
}

impl Screen for SettingsScreen {
    fn init(&mut self, _state: &mut WizardState) {}

    fn handle_event(&mut self, state: &mut WizardState, event: &WizardEvent) -> Option<Action> {
        let WizardEvent::Key(key) = event else {
            return None;
        };

        match (key, self.current_kind()) {
            (Key::Help, _) => {
                self.show_help = !self.show_help;
                None
            }
            (Key::Char('?'), Some(QuestionKind::Select)) => {
                self.show_help = !self.show_help;
                None
            }
            (Key::Enter, _) => self.submit(state),
            (Key::Esc, _) => {
                if self.flow.retreat() {
                    self.load_question();
                    None
                } else {
                    Some(Action::Back)
                }
            }
            (Key::Up | Key::Left, Some(QuestionKind::Select)) => {
                self.option = self.option.saturating_sub(1);
                None
            }
            (Key::Down | Key::Right, Some(QuestionKind::Select)) => {
                let count = self.flow.current_question().map_or(0, |q| q.options.len());
                self.option = (self.option + 1).min(count.saturating_sub(1));
                None
            }
            (_, Some(QuestionKind::Text | QuestionKind::Bool)) => {
                self.edit(*key);
                None
            }
            _ => None,
        }
    }

    fn resize(&mut self, _width: u16, _height: u16) {}

    fn title(&self) -> &str {
        "Repository settings"
    }

    fn can_go_back(&self) -> bool {
        true
    }

    fn can_go_next(&self) -> bool {
        self.flow.is_completed()
    }

    fn captures_text(&self) -> bool {
        matches!(
            self.current_kind(),
            Some(QuestionKind::Text | QuestionKind::Bool)
        )
    }
}

impl View for SettingsScreen {
    fn render(&self, frame: &mut Frame, area: Rect, _state: &WizardState, theme: &Theme) {
        let Some(question) = self.flow.current_question() else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Progress
                Constraint::Length(1), // Spacing
                Constraint::Length(2), // Question
                Constraint::Length(3), // Input
                Constraint::Length(2), // Error
                Constraint::Min(0),    // Help
            ])
            .split(area);

        let (current, total) = self.flow.progress();
        let gauge = Gauge::default()
            .ratio(self.flow.progress_ratio().clamp(0.0, 1.0))
            .label(format!("Question {current} of {total}"))
            .gauge_style(theme.gauge);
        frame.render_widget(gauge, chunks[0]);

        let mut title = vec![Span::styled(question.title.clone(), theme.highlight)];
        if question.required {
            title.push(Span::styled(" *", theme.error));
        }
        frame.render_widget(Paragraph::new(Line::from(title)), chunks[2]);

        match question.kind {
            QuestionKind::Select => {
                let spans: Vec<Span> = question
                    .options
                    .iter()
                    .enumerate()
                    .flat_map(|(index, option)| {
                        let style = if index == self.option {
                            theme.selected
                        } else {
                            theme.muted
                        };
                        [Span::styled(format!(" {option} "), style), Span::raw("  ")]
                    })
                    .collect();
                let options = Paragraph::new(Line::from(spans))
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(options, chunks[3]);
            }
            QuestionKind::Text | QuestionKind::Bool => {
                let width = chunks[3].width.saturating_sub(2) as usize;
                let scroll = self.input.visual_scroll(width);
                let input = Paragraph::new(self.input.value())
                    .scroll((0, scroll as u16))
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(input, chunks[3]);

                let cursor = self.input.visual_cursor().max(scroll) - scroll;
                frame.set_cursor_position(Position::new(
                    chunks[3].x + 1 + cursor as u16,
                    chunks[3].y + 1,
                ));
            }
        }

        if let Some(error) = &self.error {
            let error = Paragraph::new(Line::from(Span::styled(format!("✗ {error}"), theme.error)))
                .wrap(Wrap { trim: true });
            frame.render_widget(error, chunks[4]);
        }

        if self.show_help {
            let mut lines = vec![Line::from(question.help_text.clone())];
            if question.kind == QuestionKind::Bool {
                lines.push(Line::from(Span::styled(
                    "Answer yes/no, y/n, true/false or 1/0",
                    theme.muted,
                )));
            }
            let help = Paragraph::new(lines)
                .block(Block::default().title(" Help ").borders(Borders::ALL))
                .wrap(Wrap { trim: true });
            frame.render_widget(help, chunks[5]);
        }
    }

    fn help(&self) -> &'static str {
        match self.current_kind() {
            Some(QuestionKind::Select) => "←→ choose • Enter next • Esc previous • ? help",
            _ => "Enter next • Esc previous • Ctrl+U clear • F1 help",
        }
    }
}
