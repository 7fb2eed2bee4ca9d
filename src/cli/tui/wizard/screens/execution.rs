//! Live progress of the creation run

use std::sync::Arc;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
    Frame,
};
use tokio::time::Instant;

use super::View;
use crate::backend::RepositoryBackend;
use crate::cli::tui::wizard::theme::Theme;
use crate::wizard::progress::{progress_channel, ExecutionMonitor};
use crate::wizard::worker::{CancelHandle, Worker};
use crate::wizard::{Action, ExecutionPlan, Key, Screen, WizardEvent, WizardState};

pub struct ExecutionScreen {
    backend: Arc<dyn RepositoryBackend>,
    deadline: Instant,
    monitor: Option<ExecutionMonitor>,
}

impl ExecutionScreen {
    pub fn new(backend: Arc<dyn RepositoryBackend>, deadline: Instant) -> Self {
        Self {
            backend,
            deadline,
            monitor: None,
        }
    }

    pub fn monitor(&self) -> Option<&ExecutionMonitor> {
        self.monitor.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.monitor.as_ref().is_some_and(|m| m.is_finished())
    }
}

impl Screen for ExecutionScreen {
    /// Start the background worker for this run
    fn init(&mut self, state: &mut WizardState) {
        let plan = ExecutionPlan::from_state(state);
        let (sender, receiver) = progress_channel();
        let cancel = CancelHandle::new();

        Worker::new(
            self.backend.clone(),
            state,
            &plan,
            self.deadline,
            cancel.token(),
        )
        .spawn(sender);

        self.monitor = Some(
            ExecutionMonitor::new(plan, receiver)
                .with_cancel(cancel)
                .with_template(state.selected_template().map(|t| t.full_name.clone())),
        );
    }

    fn handle_event(&mut self, _state: &mut WizardState, event: &WizardEvent) -> Option<Action> {
        let monitor = self.monitor.as_mut()?;
        match event {
            WizardEvent::Tick => {
                monitor.poll();
                None
            }
            WizardEvent::Key(Key::Esc | Key::Interrupt) if !monitor.is_finished() => {
                monitor.cancel();
                None
            }
            WizardEvent::Key(Key::Enter) => monitor.result().cloned().map(Action::Complete),
            WizardEvent::Key(_) => None,
        }
    }

    fn resize(&mut self, _width: u16, _height: u16) {}

    fn title(&self) -> &str {
        "Creating repository"
    }

    fn can_go_back(&self) -> bool {
        false
    }

    fn can_go_next(&self) -> bool {
        self.is_finished()
    }
}

impl Drop for ExecutionScreen {
    fn drop(&mut self) {
        // Leaving mid-run (quit) stops the worker
        if let Some(monitor) = &self.monitor {
            if !monitor.is_finished() {
                monitor.cancel();
            }
        }
    }
}

impl View for ExecutionScreen {
    fn render(&self, frame: &mut Frame, area: Rect, _state: &WizardState, theme: &Theme) {
        let Some(monitor) = &self.monitor else {
            return;
        };
        let plan = monitor.plan();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Spacing
                Constraint::Length(1), // Overall progress
                Constraint::Length(1), // Timing
                Constraint::Length(1), // Spacing
                Constraint::Min(5),    // Tasks
                Constraint::Length(2), // Status
            ])
            .split(area);

        let progress = plan.overall_progress().clamp(0.0, 1.0);
        let gauge = Gauge::default()
            .ratio(progress)
            .label(format!(
                "{:.0}%  {} of {} tasks",
                progress * 100.0,
                plan.finished_count(),
                plan.tasks().len()
            ))
            .gauge_style(theme.gauge);
        frame.render_widget(gauge, chunks[1]);

        let elapsed = plan.elapsed().as_secs();
        let timing = if let Some(result) = monitor.result() {
            format!("Finished in {:.1}s", result.elapsed.as_secs_f64())
        } else if progress > 0.0 {
            format!(
                "Elapsed {elapsed}s • about {}s remaining",
                plan.estimated_remaining().as_secs()
            )
        } else {
            format!("Elapsed {elapsed}s • estimating...")
        };
        frame.render_widget(Paragraph::new(Span::styled(timing, theme.muted)), chunks[2]);

        let items: Vec<ListItem> = plan
            .tasks()
            .iter()
            .map(|task| {
                let style = theme.status_style(task.status);
                let mut spans = vec![
                    Span::styled(task.status.icon(), style),
                    Span::raw(" "),
                    Span::styled(format!("{:<24}", task.name), style),
                ];
                if let Some(duration) = task.duration {
                    spans.push(Span::styled(
                        format!("{:>6}ms  ", duration.as_millis()),
                        theme.muted,
                    ));
                }
                if !task.message.is_empty() {
                    spans.push(Span::styled(task.message.clone(), theme.muted));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();
        let list = List::new(items).block(Block::default().title(" Tasks ").borders(Borders::ALL));
        frame.render_widget(list, chunks[4]);

        let status = match monitor.result() {
            Some(result) if result.success => {
                Span::styled(format!("✓ {} • Enter to continue", result.message), theme.success)
            }
            Some(result) => {
                Span::styled(format!("✗ {} • Enter to continue", result.message), theme.error)
            }
            None if monitor.cancel_requested() => Span::styled("Cancelling...", theme.warning),
            None => Span::styled(
                plan.current_task()
                    .map(|task| format!("⟳ {}", task.name))
                    .unwrap_or_default(),
                theme.focused,
            ),
        };
        frame.render_widget(Paragraph::new(Line::from(status)), chunks[5]);
    }

    fn help(&self) -> &'static str {
        if self.is_finished() {
            "Enter continue"
        } else {
            "Esc / Ctrl+C cancel"
        }
    }
}
