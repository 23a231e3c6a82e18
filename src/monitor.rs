use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

use crate::alert::AlertLogger;
use crate::event::Event;
use crate::ranking::{RankedSnapshot, rank};
use crate::system::collector::Collector;
use crate::system::snapshot::SystemSnapshot;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CycleSettings {
    pub top_n: usize,
    pub threshold: f32,
}

/// Immutable result of one sample→rank→log pass. Replaced wholesale every
/// cycle.
#[derive(Clone, Debug)]
pub struct CycleReport {
    pub taken_at: DateTime<Local>,
    pub ranked: RankedSnapshot,
    pub total_processes: usize,
    pub partial: usize,
    pub skipped: usize,
    pub alerts_logged: usize,
    pub warning: Option<String>,
}

impl CycleReport {
    pub fn build(snapshot: &SystemSnapshot, settings: CycleSettings, alerts: &AlertLogger) -> Self {
        let ranked = rank(
            &snapshot.processes,
            snapshot.load,
            settings.top_n,
            settings.threshold,
        );
        let summary = alerts.on_cycle(&ranked);
        CycleReport {
            taken_at: Local::now(),
            ranked,
            total_processes: snapshot.processes.len(),
            partial: snapshot.partial,
            skipped: snapshot.skipped,
            alerts_logged: summary.logged,
            warning: summary.warning,
        }
    }
}

pub struct CycleRunner {
    collector: Collector,
    settings: CycleSettings,
    alerts: Arc<AlertLogger>,
}

impl CycleRunner {
    pub fn new(collector: Collector, settings: CycleSettings, alerts: Arc<AlertLogger>) -> Self {
        CycleRunner {
            collector,
            settings,
            alerts,
        }
    }

    pub fn run_cycle(&mut self) -> CycleReport {
        let snapshot = self.collector.refresh();
        let report = CycleReport::build(&snapshot, self.settings, &self.alerts);
        tracing::debug!(
            shown = report.ranked.entries.len(),
            alerts = report.alerts_logged,
            "cycle complete"
        );
        report
    }
}

/// Drives `runner` on a fixed interval until `shutdown` flips. The first
/// cycle fires immediately. Each cycle body runs on the blocking pool so a
/// slow process table never stalls the prompt; a cycle already running when
/// shutdown arrives is left to finish on its own.
pub fn spawn_sampler(
    runner: CycleRunner,
    period: Duration,
    tx: mpsc::UnboundedSender<Event>,
    mut shutdown: watch::Receiver<bool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut runner = Some(runner);
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                _ = interval.tick() => {}
            }

            let Some(mut current) = runner.take() else {
                break;
            };
            let job = tokio::task::spawn_blocking(move || {
                let report = current.run_cycle();
                (current, report)
            });

            tokio::select! {
                _ = shutdown.changed() => break,
                joined = job => match joined {
                    Ok((returned, report)) => {
                        runner = Some(returned);
                        if tx.send(Event::Cycle(Arc::new(report))).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "sampling cycle panicked");
                        let _ = tx.send(Event::SamplerFailed(err.to_string()));
                        break;
                    }
                },
            }
        }
        tracing::debug!("sampler stopped");
    })
}
