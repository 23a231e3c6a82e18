use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind, Users};
use thiserror::Error;

use super::process::{is_task, read_sample};
use super::snapshot::SystemSnapshot;
use crate::model::{SampleOutcome, SystemLoad};

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("process enumeration is not supported on this platform")]
    Unsupported,
    #[error("no processes are visible; check permissions on the process table")]
    NoProcesses,
}

pub struct Collector {
    sys: System,
    users: Users,
}

impl Collector {
    /// Builds the collector and primes CPU counters so the first cycle
    /// reports real usage instead of zeros.
    pub fn new() -> Result<Self, SampleError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(SampleError::Unsupported);
        }

        let mut collector = Collector {
            sys: System::new(),
            users: Users::new_with_refreshed_list(),
        };
        collector.refresh_all();
        if collector.sys.processes().is_empty() {
            return Err(SampleError::NoProcesses);
        }

        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        tracing::info!(
            processes = collector.sys.processes().len(),
            "collector warm-up complete"
        );
        Ok(collector)
    }

    fn refresh_all(&mut self) {
        self.sys.refresh_memory();
        self.sys.refresh_cpu_all();
        // One pass over every process so CPU deltas share the same elapsed time.
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing()
                .with_cpu()
                .with_memory()
                .with_user(UpdateKind::OnlyIfNotSet),
        );
        if has_unknown_owner(&self.sys, &self.users) {
            self.users.refresh();
        }
    }

    pub fn sample(&mut self) -> Vec<SampleOutcome> {
        self.refresh_all();

        let total_memory = self.sys.total_memory();
        self.sys
            .processes()
            .iter()
            .filter(|(_, process)| !is_task(process))
            .map(|(pid, process)| read_sample(pid.as_u32(), process, &self.users, total_memory))
            .collect()
    }

    pub fn load(&self) -> SystemLoad {
        let total = self.sys.total_memory();
        let memory_percent = if total > 0 {
            (self.sys.used_memory() as f64 / total as f64 * 100.0) as f32
        } else {
            0.0
        };
        SystemLoad {
            cpu_percent: self.sys.global_cpu_usage(),
            memory_percent,
            cpu_count: self.sys.cpus().len(),
            cpu_frequency_mhz: self.sys.cpus().first().map(|c| c.frequency()).unwrap_or(0),
        }
    }

    pub fn refresh(&mut self) -> SystemSnapshot {
        let outcomes = self.sample();
        let snapshot = SystemSnapshot::from_outcomes(self.load(), outcomes);
        tracing::debug!(
            processes = snapshot.processes.len(),
            partial = snapshot.partial,
            skipped = snapshot.skipped,
            cpu = snapshot.load.cpu_percent,
            "sampled process table"
        );
        snapshot
    }
}

/// A uid missing from the cached user table usually belongs to an account
/// created after startup.
fn has_unknown_owner(sys: &System, users: &Users) -> bool {
    sys.processes().values().any(|process| {
        process
            .user_id()
            .is_some_and(|uid| users.get_user_by_id(uid).is_none())
    })
}
