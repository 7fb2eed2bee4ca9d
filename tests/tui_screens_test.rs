use std::sync::Arc;
use std::time::Duration;

use gh_wizard::backend::{Backends, Operation, Simulated};
use gh_wizard::cli::tui::wizard::App;
use gh_wizard::config::Config;
use gh_wizard::wizard::{Key, Step};
use gh_wizard::WizardError;
use ratatui::{backend::TestBackend, Terminal};

fn app_with(simulated: Simulated, config: Config) -> App {
    let simulated = Arc::new(simulated);
    let backends = Backends {
        repositories: simulated.clone(),
        templates: simulated,
    };
    App::new(backends, &config)
}

fn app() -> App {
    app_with(Simulated::new(), Config::default())
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key(Key::Char(c));
    }
}

/// Press `key` and let background work progress until `step` is reached
async fn press_until(app: &mut App, key: Key, step: Step) {
    for _ in 0..200 {
        app.tick();
        if app.navigator().current_step() == step {
            return;
        }
        app.handle_key(key);
        if app.navigator().current_step() == step {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "never reached {step}, stuck at {}",
        app.navigator().current_step()
    );
}

fn screen_text(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|frame| app.render(frame)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

/// From Welcome through the settings questions with default answers
fn fill_settings(app: &mut App, name: &str) {
    assert_eq!(app.navigator().current_step(), Step::RepositorySettings);
    type_text(app, name);
    for _ in 0..5 {
        app.handle_key(Key::Enter);
    }
    assert_eq!(app.navigator().current_step(), Step::Confirmation);
}

#[tokio::test]
async fn test_create_from_scratch_end_to_end() {
    let mut app = app();
    assert!(screen_text(&app).contains("Start from a template"));

    app.handle_key(Key::Down);
    app.handle_key(Key::Enter);
    fill_settings(&mut app, "demo-app");

    let config = &app.navigator().state().repository_config;
    assert_eq!(config.name, "demo-app");
    assert!(config.is_private);
    assert!(config.should_clone);

    app.handle_key(Key::Char('3'));
    assert_eq!(app.navigator().current_step(), Step::Execution);

    press_until(&mut app, Key::Enter, Step::Completed).await;
    let result = app.navigator().last_result().unwrap();
    assert!(result.success);
    assert_eq!(
        result.repository_url.as_deref(),
        Some("https://github.com/octocat/demo-app")
    );
    assert!(screen_text(&app).contains("demo-app"));

    // Create another
    app.handle_key(Key::Char('r'));
    assert_eq!(app.navigator().current_step(), Step::Welcome);
    assert!(app.navigator().state().repository_config.name.is_empty());
    assert!(app.navigator().last_result().is_some());
}

#[tokio::test]
async fn test_template_selection_lists_recent_first() {
    let config = Config {
        recent_templates: vec!["octocat/python-lib-template".into()],
        ..Default::default()
    };
    let mut app = app_with(Simulated::new(), config);

    app.handle_key(Key::Enter);
    assert_eq!(app.navigator().current_step(), Step::TemplateSelection);

    press_until(&mut app, Key::Enter, Step::RepositorySettings).await;
    let state = app.navigator().state();
    assert!(state.use_template());
    assert_eq!(
        state.selected_template().unwrap().full_name,
        "octocat/python-lib-template"
    );
}

#[tokio::test]
async fn test_template_load_failure_continues_without_template() {
    let simulated =
        Simulated::new().failing(Operation::ListTemplates, WizardError::backend("rate limited"));
    let mut app = app_with(simulated, Config::default());

    app.handle_key(Key::Enter);
    press_until(&mut app, Key::Enter, Step::RepositorySettings).await;

    assert!(!app.navigator().state().use_template());
    assert!(app.navigator().state().selected_template().is_none());
}

#[tokio::test]
async fn test_settings_reject_invalid_name() {
    let mut app = app();
    app.handle_key(Key::Down);
    app.handle_key(Key::Enter);

    type_text(&mut app, "bad..name");
    app.handle_key(Key::Enter);
    assert_eq!(app.navigator().current_step(), Step::RepositorySettings);
    assert!(screen_text(&app).contains("consecutive periods"));

    // Typing 'q' into a field does not quit
    assert!(!app.should_quit());

    app.handle_key(Key::ClearLine);
    type_text(&mut app, "good-name");
    app.handle_key(Key::Enter);
    assert!(screen_text(&app).contains("Describe the repository"));
}

#[tokio::test]
async fn test_esc_on_first_question_returns_to_welcome() {
    let mut app = app();
    app.handle_key(Key::Down);
    app.handle_key(Key::Enter);
    assert_eq!(app.navigator().current_step(), Step::RepositorySettings);

    app.handle_key(Key::Esc);
    assert_eq!(app.navigator().current_step(), Step::Welcome);
}

#[tokio::test]
async fn test_confirmation_actions() {
    let mut app = app();
    app.handle_key(Key::Down);
    app.handle_key(Key::Enter);
    fill_settings(&mut app, "demo-app");

    // Modify settings
    app.handle_key(Key::Char('1'));
    assert_eq!(app.navigator().current_step(), Step::RepositorySettings);
    assert!(screen_text(&app).contains("demo-app"));

    for _ in 0..5 {
        app.handle_key(Key::Enter);
    }
    assert_eq!(app.navigator().current_step(), Step::Confirmation);

    // Cancel goes back to the start
    app.handle_key(Key::Char('2'));
    assert_eq!(app.navigator().current_step(), Step::Welcome);
}

#[tokio::test]
async fn test_confirmation_shows_signed_in_user() {
    let mut app = app_with(Simulated::new().with_user("hubot"), Config::default());
    app.handle_key(Key::Down);
    app.handle_key(Key::Enter);
    fill_settings(&mut app, "demo-app");

    for _ in 0..50 {
        app.tick();
        if screen_text(&app).contains("https://github.com/hubot/demo-app") {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("signed-in user never shown");
}

#[tokio::test]
async fn test_cancel_during_execution() {
    let simulated = Simulated::new().with_delay(Duration::from_secs(30));
    let mut app = app_with(simulated, Config::default());
    app.handle_key(Key::Down);
    app.handle_key(Key::Enter);
    fill_settings(&mut app, "slow-repo");
    app.handle_key(Key::Char('3'));

    // q is ignored while the run is in progress
    app.handle_key(Key::Char('q'));
    assert!(!app.should_quit());

    app.handle_key(Key::Esc);
    press_until(&mut app, Key::Enter, Step::Completed).await;

    let result = app.navigator().last_result().unwrap();
    assert!(!result.success);
    assert!(result.cancelled);
}

#[tokio::test]
async fn test_double_interrupt_quits() {
    let mut app = app();
    app.handle_key(Key::Interrupt);
    assert!(!app.should_quit());
    app.handle_key(Key::Interrupt);
    assert!(app.should_quit());
}

#[tokio::test]
async fn test_q_quits_outside_text_entry() {
    let mut app = app();
    app.handle_key(Key::Char('q'));
    assert!(app.should_quit());
}
