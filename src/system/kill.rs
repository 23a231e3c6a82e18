use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, Signal, System};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KillResult {
    Success {
        pid: u32,
        name: String,
        signal: &'static str,
    },
    Failed {
        pid: u32,
        name: String,
        reason: String,
    },
    NotFound(u32),
}

impl KillResult {
    pub fn pid(&self) -> u32 {
        match self {
            KillResult::Success { pid, .. } | KillResult::Failed { pid, .. } => *pid,
            KillResult::NotFound(pid) => *pid,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, KillResult::Success { .. })
    }

    /// Name reported by the OS at kill time, if the process was still there.
    pub fn process_name(&self) -> Option<&str> {
        match self {
            KillResult::Success { name, .. } | KillResult::Failed { name, .. } => Some(name),
            KillResult::NotFound(_) => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            KillResult::Success { pid, signal, .. } => {
                format!("Process {pid} terminated successfully ({signal} sent)")
            }
            KillResult::Failed { reason, .. } => reason.clone(),
            KillResult::NotFound(pid) => {
                format!("Failed to terminate process {pid}: process not found")
            }
        }
    }
}

pub fn signal_name(signal: Signal) -> &'static str {
    match signal {
        Signal::Term => "SIGTERM",
        Signal::Kill => "SIGKILL",
        _ => "signal",
    }
}

pub fn kill_process(sys: &System, pid: u32, signal: Signal) -> KillResult {
    let sysinfo_pid = Pid::from_u32(pid);
    match sys.process(sysinfo_pid) {
        Some(process) => {
            let name = process.name().to_string_lossy().to_string();
            let signal_name = signal_name(signal);
            match process.kill_with(signal) {
                Some(true) => KillResult::Success {
                    pid,
                    name,
                    signal: signal_name,
                },
                Some(false) => KillResult::Failed {
                    pid,
                    name,
                    reason: format!("Failed to send {signal_name} to PID {pid} (permission denied?)"),
                },
                None => {
                    // Signal not supported on this platform, fall back to kill()
                    if process.kill() {
                        KillResult::Success {
                            pid,
                            name,
                            signal: signal_name,
                        }
                    } else {
                        KillResult::Failed {
                            pid,
                            name,
                            reason: format!("Failed to kill PID {pid} (permission denied?)"),
                        }
                    }
                }
            }
        }
        None => KillResult::NotFound(pid),
    }
}

/// Resolves `pid` against the live process table, not a cached snapshot,
/// then signals it.
pub fn terminate(pid: u32, signal: Signal) -> KillResult {
    let mut sys = System::new();
    let pids = [Pid::from_u32(pid)];
    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&pids),
        true,
        ProcessRefreshKind::nothing(),
    );
    let result = kill_process(&sys, pid, signal);
    tracing::info!(pid, success = result.is_success(), "termination requested");
    result
}
