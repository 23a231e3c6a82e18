//! Append-only event log for HIGH CPU alerts and process terminations.
//!
//! Records are rendered to a single line and handed to an [`EventSink`] in one
//! call, so a line is either fully written or not at all. Sink failures never
//! propagate into the sampling cycle; the first one is returned as a warning
//! for the operator and the rest only reach the diagnostics trace.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ranking::{CpuStatus, RankedSnapshot};
use crate::system::kill::KillResult;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug, Error)]
pub enum LogWriteError {
    #[error("cannot write to {target}: {source}")]
    Io {
        target: String,
        #[source]
        source: io::Error,
    },
    #[error("cannot encode log record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("log sink lock poisoned")]
    Poisoned,
}

pub trait EventSink: Send {
    fn append(&mut self, line: &str) -> io::Result<()>;
    fn describe(&self) -> String;
}

pub struct FileSink {
    path: PathBuf,
    file: Option<File>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSink {
            path: path.into(),
            file: None,
        }
    }
}

impl EventSink for FileSink {
    fn append(&mut self, line: &str) -> io::Result<()> {
        if self.file.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            self.file = Some(file);
        }
        let Some(file) = self.file.as_mut() else {
            return Err(io::Error::other("log file not open"));
        };
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        if let Err(err) = file.write_all(buf.as_bytes()) {
            // Reopen on the next record in case the file was rotated away.
            self.file = None;
            return Err(err);
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Keeps lines in memory; cloning shares the same buffer.
#[derive(Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl EventSink for MemorySink {
    fn append(&mut self, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .map_err(|_| io::Error::other("memory sink poisoned"))?
            .push(line.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertPolicy {
    /// One alert per HIGH entry per cycle.
    #[default]
    EveryCycle,
    /// One alert when a pid enters HIGH; re-armed once it leaves.
    OnTransition,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    fn label(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct AlertEvent {
    pub timestamp: DateTime<Local>,
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct TerminationEvent {
    pub timestamp: DateTime<Local>,
    pub pid: u32,
    pub name: String,
    pub outcome: Outcome,
    pub detail: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event")]
pub enum LogRecord {
    #[serde(rename = "HIGH_CPU_ALERT")]
    HighCpuAlert(AlertEvent),
    #[serde(rename = "PROCESS_TERMINATED")]
    ProcessTerminated(TerminationEvent),
}

impl LogRecord {
    pub fn render(&self, format: LogFormat) -> Result<String, LogWriteError> {
        match format {
            LogFormat::Json => Ok(serde_json::to_string(self)?),
            LogFormat::Text => Ok(match self {
                LogRecord::HighCpuAlert(e) => format!(
                    "{} HIGH_CPU_ALERT pid={} name={:?} cpu={:.1}",
                    e.timestamp.format(TIMESTAMP_FORMAT),
                    e.pid,
                    e.name,
                    e.cpu_percent
                ),
                LogRecord::ProcessTerminated(e) => format!(
                    "{} PROCESS_TERMINATED pid={} name={:?} outcome={} detail={:?}",
                    e.timestamp.format(TIMESTAMP_FORMAT),
                    e.pid,
                    e.name,
                    e.outcome.label(),
                    e.detail
                ),
            }),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlertSummary {
    pub logged: usize,
    pub warning: Option<String>,
}

pub struct AlertLogger {
    sink: Mutex<Box<dyn EventSink>>,
    format: LogFormat,
    policy: AlertPolicy,
    currently_high: Mutex<HashSet<u32>>,
    warned: AtomicBool,
}

impl AlertLogger {
    pub fn new(sink: Box<dyn EventSink>, format: LogFormat, policy: AlertPolicy) -> Self {
        AlertLogger {
            sink: Mutex::new(sink),
            format,
            policy,
            currently_high: Mutex::new(HashSet::new()),
            warned: AtomicBool::new(false),
        }
    }

    pub fn on_cycle(&self, snapshot: &RankedSnapshot) -> AlertSummary {
        let now = Local::now();
        let due = self.due_alerts(snapshot);

        let mut summary = AlertSummary::default();
        for (pid, name, cpu_percent) in due {
            let record = LogRecord::HighCpuAlert(AlertEvent {
                timestamp: now,
                pid,
                name,
                cpu_percent,
            });
            match self.write(&record) {
                Ok(()) => summary.logged += 1,
                Err(err) => {
                    if let Some(warning) = self.first_failure(&err) {
                        summary.warning = Some(warning);
                    }
                }
            }
        }
        summary
    }

    /// Always writes exactly one record, whatever the outcome was.
    pub fn on_terminate(&self, pid: u32, name: &str, result: &KillResult) -> Option<String> {
        let outcome = if result.is_success() {
            Outcome::Success
        } else {
            Outcome::Failure
        };
        let record = LogRecord::ProcessTerminated(TerminationEvent {
            timestamp: Local::now(),
            pid,
            name: name.to_string(),
            outcome,
            detail: result.message(),
        });
        self.write(&record)
            .err()
            .and_then(|err| self.first_failure(&err))
    }

    fn due_alerts(&self, snapshot: &RankedSnapshot) -> Vec<(u32, String, f32)> {
        let high: Vec<(u32, String, f32)> = snapshot
            .entries
            .iter()
            .filter(|e| e.status == CpuStatus::High)
            .map(|e| {
                (
                    e.sample.pid,
                    e.sample.display_name().to_string(),
                    e.sample.cpu_percent,
                )
            })
            .collect();

        match self.policy {
            AlertPolicy::EveryCycle => high,
            AlertPolicy::OnTransition => {
                let Ok(mut seen) = self.currently_high.lock() else {
                    return high;
                };
                let now_high: HashSet<u32> = high.iter().map(|(pid, _, _)| *pid).collect();
                let fresh = high
                    .into_iter()
                    .filter(|(pid, _, _)| !seen.contains(pid))
                    .collect();
                *seen = now_high;
                fresh
            }
        }
    }

    fn write(&self, record: &LogRecord) -> Result<(), LogWriteError> {
        let line = record.render(self.format)?;
        let mut sink = self.sink.lock().map_err(|_| LogWriteError::Poisoned)?;
        sink.append(&line).map_err(|source| LogWriteError::Io {
            target: sink.describe(),
            source,
        })
    }

    fn first_failure(&self, err: &LogWriteError) -> Option<String> {
        tracing::warn!(error = %err, "alert log write failed");
        if self.warned.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(format!("Warning: {err}"))
        }
    }
}
