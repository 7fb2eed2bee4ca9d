//! One view per wizard step

pub mod completed;
pub mod confirmation;
pub mod execution;
pub mod settings;
pub mod template;
pub mod welcome;

use std::cell::Cell;
use std::time::Duration;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tokio::time::Instant;

use super::theme::Theme;
use crate::backend::Backends;
use crate::wizard::{CreationResult, Screen, ScreenFactory, Step, WizardState};

/// A step controller that can also draw itself
pub trait View: Screen {
    fn render(&self, frame: &mut Frame, area: Rect, state: &WizardState, theme: &Theme);

    /// Key bindings shown in the help bar
    fn help(&self) -> &'static str;
}

/// Builds the view for each step
pub struct ScreenSet {
    backends: Backends,
    recent_templates: Vec<String>,
    run_timeout: Duration,
    deadline: Cell<Instant>,
}

impl ScreenSet {
    pub fn new(backends: Backends, recent_templates: Vec<String>, run_timeout: Duration) -> Self {
        Self {
            backends,
            recent_templates,
            run_timeout,
            deadline: Cell::new(Instant::now() + run_timeout),
        }
    }

    /// Deadline of the current wizard run
    pub fn deadline(&self) -> Instant {
        self.deadline.get()
    }
}

impl ScreenFactory<dyn View> for ScreenSet {
    fn build(&self, step: Step, state: &WizardState, result: Option<CreationResult>) -> Box<dyn View> {
        match step {
            Step::Welcome => {
                // Every run starts here, so its deadline does too
                self.deadline.set(Instant::now() + self.run_timeout);
                Box::new(welcome::WelcomeScreen::new(state))
            }
            Step::TemplateSelection => Box::new(template::TemplateScreen::new(
                self.backends.templates.clone(),
                self.recent_templates.clone(),
            )),
            Step::RepositorySettings => Box::new(settings::SettingsScreen::new(state)),
            Step::Confirmation => Box::new(confirmation::ConfirmationScreen::new(
                self.backends.repositories.clone(),
            )),
            Step::Execution => Box::new(execution::ExecutionScreen::new(
                self.backends.repositories.clone(),
                self.deadline.get(),
            )),
            Step::Completed => Box::new(completed::CompletedScreen::new(result.unwrap_or_default())),
        }
    }
}

/// Position of `step` in the sequence the user is walking through
fn step_position(step: Step, state: &WizardState) -> (usize, usize) {
    let mut steps = vec![Step::Welcome];
    if state.use_template() {
        steps.push(Step::TemplateSelection);
    }
    steps.extend([
        Step::RepositorySettings,
        Step::Confirmation,
        Step::Execution,
        Step::Completed,
    ]);
    let index = steps.iter().position(|s| *s == step).unwrap_or(0);
    (index + 1, steps.len())
}

/// Draw the header, the active view and its help bar
pub fn render_frame(
    frame: &mut Frame,
    view: &dyn View,
    state: &WizardState,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    let (current, total) = step_position(state.current_step, state);
    let header = Paragraph::new(Line::from(vec![
        Span::styled("🔮 GitHub Repository Wizard", theme.title),
        Span::raw("  "),
        Span::styled(format!("{}  (step {current} of {total})", view.title()), theme.muted),
    ]));
    frame.render_widget(header, chunks[0]);

    view.render(frame, chunks[1], state, theme);

    let help = Paragraph::new(view.help())
        .style(theme.help_bar)
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[2]);
}

/// Area of `width` x `height` centered in `area`
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
