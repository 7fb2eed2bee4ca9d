//! Step state machine: which screen is active and when it may change

use tracing::debug;

use super::progress::CreationResult;
use super::state::{RepositoryConfig, Step, WizardState};

/// Keys the wizard reacts to, independent of the terminal backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Tab,
    /// Ctrl+U
    ClearLine,
    /// F1
    Help,
    /// Ctrl+C
    Interrupt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEvent {
    Key(Key),
    /// Periodic wake-up used for polling background work
    Tick,
}

/// Follow-up requested by a screen after handling an event
#[derive(Debug, Clone)]
pub enum Action {
    Next,
    Back,
    JumpTo(Step),
    /// Leave the execution step with the run's outcome
    Complete(CreationResult),
    /// Start over at Welcome with a fresh state
    Restart,
    Quit,
}

/// Controller owned by the active step.
///
/// A controller never swaps itself out; it mutates its own fields and returns an
/// [`Action`] when the navigator should move elsewhere.
pub trait Screen {
    /// Setup hook, called once after construction and the initial resize
    fn init(&mut self, state: &mut WizardState);

    fn handle_event(&mut self, state: &mut WizardState, event: &WizardEvent) -> Option<Action>;

    fn resize(&mut self, width: u16, height: u16);

    fn title(&self) -> &str;

    fn can_go_back(&self) -> bool;

    fn can_go_next(&self) -> bool;

    /// True while plain characters are being typed into a field
    fn captures_text(&self) -> bool {
        false
    }
}

/// Builds the controller for a step
pub trait ScreenFactory<S: ?Sized> {
    fn build(&self, step: Step, state: &WizardState, result: Option<CreationResult>) -> Box<S>;
}

pub struct StepNavigator<S: ?Sized + Screen, F: ScreenFactory<S>> {
    state: WizardState,
    screen: Box<S>,
    factory: F,
    viewport: (u16, u16),
    defaults: RepositoryConfig,
    last_result: Option<CreationResult>,
    should_quit: bool,
}

impl<S: ?Sized + Screen, F: ScreenFactory<S>> StepNavigator<S, F> {
    /// Start at Welcome with a state seeded from `defaults`
    pub fn new(factory: F, defaults: RepositoryConfig, viewport: (u16, u16)) -> Self {
        let mut state = WizardState::with_defaults(defaults.clone());
        let mut screen = factory.build(Step::Welcome, &state, None);
        screen.resize(viewport.0, viewport.1);
        screen.init(&mut state);

        Self {
            state,
            screen,
            factory,
            viewport,
            defaults,
            last_result: None,
            should_quit: false,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut WizardState {
        &mut self.state
    }

    pub fn current_step(&self) -> Step {
        self.state.current_step
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Outcome of the most recent execution, kept across restarts
    pub fn last_result(&self) -> Option<&CreationResult> {
        self.last_result.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Step forward if both the screen and the state allow it
    pub fn advance(&mut self) -> bool {
        if !self.screen.can_go_next() || !self.state.can_proceed_to_next() {
            debug!(step = %self.state.current_step, "advance refused");
            return false;
        }
        match self.state.next_step() {
            Some(next) => {
                self.transition(next, None);
                true
            }
            None => false,
        }
    }

    /// Step back one position; never from Welcome or Execution
    pub fn retreat(&mut self) -> bool {
        if matches!(self.state.current_step, Step::Welcome | Step::Execution)
            || !self.screen.can_go_back()
        {
            debug!(step = %self.state.current_step, "retreat refused");
            return false;
        }
        match self.state.previous_step() {
            Some(previous) => {
                self.transition(previous, None);
                true
            }
            None => false,
        }
    }

    /// Move to any step without gating
    pub fn jump_to(&mut self, step: Step, result: Option<CreationResult>) {
        self.transition(step, result);
    }

    /// Discard the current run and start again at Welcome
    pub fn restart(&mut self) {
        self.state.reset(self.defaults.clone());
        self.transition(Step::Welcome, None);
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
        self.screen.resize(width, height);
    }

    /// Route an event to the active screen and carry out its follow-up
    pub fn handle_event(&mut self, event: &WizardEvent) {
        if let Some(action) = self.screen.handle_event(&mut self.state, event) {
            self.apply(action);
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Next => {
                self.advance();
            }
            Action::Back => {
                self.retreat();
            }
            Action::JumpTo(step) => self.jump_to(step, None),
            Action::Complete(result) => {
                self.last_result = Some(result.clone());
                self.jump_to(Step::Completed, Some(result));
            }
            Action::Restart => self.restart(),
            Action::Quit => self.should_quit = true,
        }
    }

    fn transition(&mut self, step: Step, result: Option<CreationResult>) {
        debug!(from = %self.state.current_step, to = %step, "step transition");
        self.state.current_step = step;
        let mut screen = self.factory.build(step, &self.state, result);
        screen.resize(self.viewport.0, self.viewport.1);
        screen.init(&mut self.state);
        self.screen = screen;
    }
}
