use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use crate::monitor::{CycleReport, CycleRunner, spawn_sampler};
use crate::system::kill::KillResult;

#[derive(Clone, Debug)]
pub struct TerminationReport {
    pub result: KillResult,
    pub warning: Option<String>,
}

#[derive(Clone, Debug)]
pub enum Event {
    Cycle(Arc<CycleReport>),
    Input(String),
    Terminated(TerminationReport),
    SamplerFailed(String),
    InputClosed,
    Interrupt,
}

/// Fans the sampler task, the stdin reader and Ctrl+C into one queue.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
    shutdown: watch::Sender<bool>,
    _sampler: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(runner: CycleRunner, period: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();
        let (shutdown, shutdown_rx) = watch::channel(false);

        let sampler = spawn_sampler(runner, period, tx.clone(), shutdown_rx.clone());
        spawn_stdin_reader(tx.clone());
        spawn_interrupt_listener(tx.clone(), shutdown_rx);

        Self {
            rx,
            tx,
            shutdown,
            _sampler: sampler,
        }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Stops the timer and any cycle that has not started yet.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Reads operator lines on a plain OS thread. A blocking read parked on the
/// tokio blocking pool would hold up runtime shutdown after `q`.
fn spawn_stdin_reader(tx: mpsc::UnboundedSender<Event>) {
    let reader_tx = tx.clone();
    let spawned = std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            let tx = reader_tx;
            let stdin = std::io::stdin();
            let mut line = String::new();
            loop {
                line.clear();
                match stdin.lock().read_line(&mut line) {
                    Ok(0) => {
                        let _ = tx.send(Event::InputClosed);
                        break;
                    }
                    Ok(_) => {
                        if tx.send(Event::Input(line.clone())).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "stdin read failed");
                        let _ = tx.send(Event::InputClosed);
                        break;
                    }
                }
            }
        });
    if let Err(err) = spawned {
        tracing::error!(error = %err, "cannot start stdin reader");
        let _ = tx.send(Event::InputClosed);
    }
}

fn spawn_interrupt_listener(tx: mpsc::UnboundedSender<Event>, mut shutdown: watch::Receiver<bool>) {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    let _ = tx.send(Event::Interrupt);
                }
            }
            _ = shutdown.changed() => {}
        }
    });
}
