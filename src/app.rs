use std::sync::Arc;

use sysinfo::Signal;
use tokio::sync::mpsc;

use crate::action::{Action, parse_command};
use crate::alert::AlertLogger;
use crate::event::{Event, TerminationReport};
use crate::monitor::CycleReport;
use crate::system::kill::terminate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped,
}

pub struct App {
    pub state: RunState,
    pub latest: Option<Arc<CycleReport>>,
    pub status_message: Option<String>,
    /// Sticky one-line notice (privilege warning, first log failure).
    pub notice: Option<String>,
    pub threshold: f32,
    pub pending_kills: usize,
    /// Set when the monitor stopped for a reason other than the operator.
    pub failure: Option<String>,
    alerts: Arc<AlertLogger>,
    events: mpsc::UnboundedSender<Event>,
    kill_signal: Signal,
}

impl App {
    pub fn new(
        threshold: f32,
        kill_signal: Signal,
        alerts: Arc<AlertLogger>,
        events: mpsc::UnboundedSender<Event>,
    ) -> Self {
        App {
            state: RunState::Running,
            latest: None,
            status_message: None,
            notice: None,
            threshold,
            pending_kills: 0,
            failure: None,
            alerts,
            events,
            kill_signal,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Adds a notice next to any already shown.
    pub fn push_notice(&mut self, notice: impl Into<String>) {
        let notice = notice.into();
        self.notice = Some(match self.notice.take() {
            Some(existing) => format!("{existing} | {notice}"),
            None => notice,
        });
    }

    /// Applies one event; returns whether the screen should be redrawn.
    pub fn handle_event(&mut self, event: Event) -> bool {
        if !self.is_running() {
            return false;
        }
        match event {
            Event::Cycle(report) => {
                if let Some(warning) = &report.warning {
                    self.push_notice(warning.clone());
                }
                self.latest = Some(report);
                true
            }
            Event::Input(line) => {
                self.dispatch(parse_command(&line));
                self.is_running()
            }
            Event::Terminated(report) => {
                self.on_terminated(report);
                true
            }
            Event::SamplerFailed(reason) => {
                self.failure = Some(format!("sampling stopped: {reason}"));
                self.state = RunState::Stopped;
                false
            }
            Event::InputClosed | Event::Interrupt => {
                self.state = RunState::Stopped;
                false
            }
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => {
                tracing::info!("quit requested");
                self.state = RunState::Stopped;
            }
            Action::Kill(pid) => self.request_kill(pid),
            Action::Invalid(err) => {
                self.status_message = Some(err.to_string());
            }
            Action::None => {}
        }
    }

    /// The OS lookup and the signal run on the blocking pool; the outcome
    /// comes back as `Event::Terminated`.
    fn request_kill(&mut self, pid: u32) {
        let name_hint = self
            .latest
            .as_ref()
            .and_then(|report| report.ranked.find(pid))
            .map(|entry| entry.sample.display_name().to_string());
        let alerts = Arc::clone(&self.alerts);
        let tx = self.events.clone();
        let signal = self.kill_signal;

        self.pending_kills += 1;
        self.status_message = Some(format!("Terminating process {pid}..."));

        tokio::task::spawn_blocking(move || {
            let result = terminate(pid, signal);
            let name = result
                .process_name()
                .map(str::to_string)
                .or(name_hint)
                .unwrap_or_else(|| "unknown".to_string());
            let warning = alerts.on_terminate(pid, &name, &result);
            let _ = tx.send(Event::Terminated(TerminationReport { result, warning }));
        });
    }

    fn on_terminated(&mut self, report: TerminationReport) {
        self.pending_kills = self.pending_kills.saturating_sub(1);
        self.status_message = Some(report.result.message());
        if let Some(warning) = report.warning {
            self.push_notice(warning);
        }
    }
}
