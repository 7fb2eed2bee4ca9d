use std::cell::RefCell;
use std::rc::Rc;

use gh_wizard::wizard::{
    Action, CreationResult, Key, RepositoryConfig, Screen, ScreenFactory, Step, StepNavigator,
    WizardEvent, WizardState,
};
use pretty_assertions::assert_eq;

/// Screen whose gating answers and key bindings are fixed per test
struct StubScreen {
    step: Step,
    can_back: bool,
    can_next: bool,
    result: Option<CreationResult>,
    log: Rc<RefCell<Vec<String>>>,
}

impl Screen for StubScreen {
    fn init(&mut self, _state: &mut WizardState) {
        self.log.borrow_mut().push(format!("init {}", self.step));
    }

    fn handle_event(&mut self, state: &mut WizardState, event: &WizardEvent) -> Option<Action> {
        match event {
            WizardEvent::Key(Key::Char('t')) => {
                state.set_use_template(true);
                None
            }
            WizardEvent::Key(Key::Char('n')) => {
                state.repository_config.name = "demo".into();
                None
            }
            WizardEvent::Key(Key::Enter) => Some(Action::Next),
            WizardEvent::Key(Key::Esc) => Some(Action::Back),
            WizardEvent::Key(Key::Char('d')) => Some(Action::Complete(CreationResult {
                success: true,
                ..Default::default()
            })),
            WizardEvent::Key(Key::Char('r')) => Some(Action::Restart),
            _ => None,
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.log
            .borrow_mut()
            .push(format!("resize {} {width}x{height}", self.step));
    }

    fn title(&self) -> &str {
        self.step.name()
    }

    fn can_go_back(&self) -> bool {
        self.can_back
    }

    fn can_go_next(&self) -> bool {
        self.can_next
    }
}

struct StubFactory {
    blocked_next: Option<Step>,
    log: Rc<RefCell<Vec<String>>>,
}

impl ScreenFactory<StubScreen> for StubFactory {
    fn build(&self, step: Step, _state: &WizardState, result: Option<CreationResult>) -> Box<StubScreen> {
        Box::new(StubScreen {
            step,
            can_back: true,
            can_next: self.blocked_next != Some(step),
            result,
            log: self.log.clone(),
        })
    }
}

fn navigator(blocked_next: Option<Step>) -> (StepNavigator<StubScreen, StubFactory>, Rc<RefCell<Vec<String>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let factory = StubFactory {
        blocked_next,
        log: log.clone(),
    };
    (
        StepNavigator::new(factory, RepositoryConfig::default(), (100, 30)),
        log,
    )
}

fn press(nav: &mut StepNavigator<StubScreen, StubFactory>, key: Key) {
    nav.handle_event(&WizardEvent::Key(key));
}

#[test]
fn test_retreat_from_welcome_is_a_noop() {
    let (mut nav, _) = navigator(None);
    assert!(!nav.retreat());
    assert_eq!(nav.current_step(), Step::Welcome);

    press(&mut nav, Key::Esc);
    assert_eq!(nav.current_step(), Step::Welcome);
}

#[test]
fn test_welcome_skips_template_selection_without_template() {
    let (mut nav, _) = navigator(None);
    assert!(nav.advance());
    assert_eq!(nav.current_step(), Step::RepositorySettings);

    assert!(nav.retreat());
    assert_eq!(nav.current_step(), Step::Welcome);
}

#[test]
fn test_welcome_goes_to_template_selection_when_chosen() {
    let (mut nav, _) = navigator(None);
    press(&mut nav, Key::Char('t'));
    press(&mut nav, Key::Enter);
    assert_eq!(nav.current_step(), Step::TemplateSelection);

    // A template must be picked before leaving
    assert!(!nav.advance());
    assert_eq!(nav.current_step(), Step::TemplateSelection);
}

#[test]
fn test_settings_require_a_valid_config() {
    let (mut nav, _) = navigator(None);
    nav.advance();
    assert_eq!(nav.current_step(), Step::RepositorySettings);

    assert!(!nav.advance());
    assert_eq!(nav.current_step(), Step::RepositorySettings);

    press(&mut nav, Key::Char('n'));
    assert!(nav.advance());
    assert_eq!(nav.current_step(), Step::Confirmation);
}

#[test]
fn test_screen_can_block_advance() {
    let (mut nav, _) = navigator(Some(Step::Welcome));
    assert!(!nav.advance());
    assert_eq!(nav.current_step(), Step::Welcome);
}

#[test]
fn test_no_retreat_during_execution() {
    let (mut nav, _) = navigator(None);
    nav.jump_to(Step::Execution, None);
    assert!(!nav.retreat());
    assert_eq!(nav.current_step(), Step::Execution);
}

#[test]
fn test_complete_carries_result_to_completed() {
    let (mut nav, _) = navigator(None);
    nav.jump_to(Step::Execution, None);
    press(&mut nav, Key::Char('d'));

    assert_eq!(nav.current_step(), Step::Completed);
    assert!(nav.screen().result.as_ref().unwrap().success);
    assert!(nav.last_result().unwrap().success);
}

#[test]
fn test_restart_resets_state() {
    let (mut nav, _) = navigator(None);
    nav.advance();
    press(&mut nav, Key::Char('n'));
    nav.jump_to(Step::Completed, None);

    press(&mut nav, Key::Char('r'));
    assert_eq!(nav.current_step(), Step::Welcome);
    assert!(nav.state().repository_config.name.is_empty());
    assert!(!nav.state().use_template());
}

#[test]
fn test_transition_resizes_before_init() {
    let (mut nav, log) = navigator(None);
    nav.advance();

    assert_eq!(
        *log.borrow(),
        vec![
            "resize Welcome 100x30",
            "init Welcome",
            "resize Repository Settings 100x30",
            "init Repository Settings",
        ]
    );
}
