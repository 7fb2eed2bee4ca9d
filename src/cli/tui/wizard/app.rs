use std::time::{Duration, Instant};

use ratatui::{
    crossterm::event::{self, Event, KeyEventKind},
    DefaultTerminal, Frame,
};
use tokio::sync::mpsc;
use tokio::time;
use tracing::debug;

use super::events::{to_wizard_key, AppEvent};
use super::screens::{render_frame, ScreenSet, View};
use super::theme::Theme;
use crate::backend::Backends;
use crate::config::Config;
use crate::wizard::progress::POLL_INTERVAL;
use crate::wizard::{CreationResult, Key, Step, StepNavigator, WizardEvent};
use crate::Result;

/// Second Ctrl+C within this window quits
const DOUBLE_INTERRUPT_WINDOW: Duration = Duration::from_secs(1);

/// Main application struct
pub struct App {
    navigator: StepNavigator<dyn View, ScreenSet>,
    theme: Theme,
    /// Last time Ctrl+C was pressed
    last_interrupt: Option<Instant>,
}

impl App {
    /// Create a new app instance
    pub fn new(backends: Backends, config: &Config) -> Self {
        let screens = ScreenSet::new(
            backends,
            config.recent_templates.clone(),
            config.run_timeout(),
        );
        let viewport = ratatui::crossterm::terminal::size().unwrap_or((80, 24));

        Self {
            navigator: StepNavigator::new(screens, config.repository_defaults(), viewport),
            theme: Theme::from_name(config.theme),
            last_interrupt: None,
        }
    }

    pub fn navigator(&self) -> &StepNavigator<dyn View, ScreenSet> {
        &self.navigator
    }

    pub fn should_quit(&self) -> bool {
        self.navigator.should_quit()
    }

    /// Run the application
    pub async fn run(mut self) -> Result<Option<CreationResult>> {
        let mut terminal = ratatui::init();
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        spawn_input_reader(event_tx);

        let result = self.main_loop(&mut terminal, &mut event_rx).await;

        // Cleanup
        ratatui::restore();
        result?;
        Ok(self.navigator.last_result().cloned())
    }

    /// Main event loop
    async fn main_loop(
        &mut self,
        terminal: &mut DefaultTerminal,
        event_rx: &mut mpsc::UnboundedReceiver<AppEvent>,
    ) -> Result<()> {
        loop {
            terminal.draw(|frame| self.render(frame))?;

            match time::timeout(POLL_INTERVAL, event_rx.recv()).await {
                Ok(Some(AppEvent::Key(key))) => {
                    if let Some(key) = to_wizard_key(&key) {
                        self.handle_key(key);
                    }
                }
                Ok(Some(AppEvent::Resize(width, height))) => self.navigator.resize(width, height),
                Ok(Some(AppEvent::Tick)) | Err(_) => self.tick(),
                Ok(None) => break, // Input reader gone
            }

            if self.should_quit() {
                break;
            }
        }

        Ok(())
    }

    /// Render the current step
    pub fn render(&self, frame: &mut Frame) {
        render_frame(frame, self.navigator.screen(), self.navigator.state(), &self.theme);
    }

    pub fn tick(&mut self) {
        self.navigator.handle_event(&WizardEvent::Tick);
    }

    /// Apply the global bindings, then hand the key to the active screen
    pub fn handle_key(&mut self, key: Key) {
        match key {
            Key::Interrupt => {
                let now = Instant::now();
                if self
                    .last_interrupt
                    .is_some_and(|last| now.duration_since(last) < DOUBLE_INTERRUPT_WINDOW)
                {
                    debug!("double interrupt, quitting");
                    self.navigator.quit();
                    return;
                }
                self.last_interrupt = Some(now);
            }
            Key::Char('q') | Key::Char('Q')
                if !self.navigator.screen().captures_text()
                    && self.navigator.current_step() != Step::Execution =>
            {
                self.navigator.quit();
                return;
            }
            _ => {}
        }

        self.navigator.handle_event(&WizardEvent::Key(key));
    }
}

/// Forward terminal input until the receiving side goes away
fn spawn_input_reader(event_tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::task::spawn_blocking(move || {
        while !event_tx.is_closed() {
            match event::poll(POLL_INTERVAL) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(_) => break,
            }
            let event = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                Ok(Event::Resize(width, height)) => AppEvent::Resize(width, height),
                Ok(_) => continue,
                Err(_) => break,
            };
            if event_tx.send(event).is_err() {
                break;
            }
        }
    });
}
