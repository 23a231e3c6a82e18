use sysinfo::{Process, ProcessStatus, ThreadKind, Users};

use crate::model::{ProcessSample, ProcessState, SampleOutcome};

pub fn state_from_status(status: ProcessStatus) -> ProcessState {
    match status {
        ProcessStatus::Run => ProcessState::Running,
        ProcessStatus::Sleep => ProcessState::Sleeping,
        ProcessStatus::Idle => ProcessState::Idle,
        ProcessStatus::Stop | ProcessStatus::Tracing | ProcessStatus::Suspended => {
            ProcessState::Stopped
        }
        ProcessStatus::Zombie => ProcessState::Zombie,
        ProcessStatus::Dead => ProcessState::Dead,
        ProcessStatus::UninterruptibleDiskSleep | ProcessStatus::LockBlocked => {
            ProcessState::DiskSleep
        }
        _ => ProcessState::Unknown,
    }
}

/// Userland threads show up in the process table on some platforms; they are
/// not processes an operator can rank or kill on their own.
pub fn is_task(process: &Process) -> bool {
    matches!(process.thread_kind(), Some(ThreadKind::Userland))
}

/// Each field is read independently so one refused read only blanks that
/// field instead of dropping the whole row.
pub fn read_sample(pid: u32, process: &Process, users: &Users, total_memory: u64) -> SampleOutcome {
    let state = state_from_status(process.status());
    if state == ProcessState::Dead {
        return SampleOutcome::Skipped(pid);
    }

    let name = process.name().to_string_lossy().to_string();
    let name = (!name.is_empty()).then_some(name);

    let owner = process
        .user_id()
        .and_then(|uid| users.get_user_by_id(uid))
        .map(|user| user.name().to_string());

    let memory_percent = if total_memory > 0 {
        (process.memory() as f64 / total_memory as f64 * 100.0) as f32
    } else {
        0.0
    };

    SampleOutcome::from_sample(ProcessSample {
        pid,
        name,
        cpu_percent: process.cpu_usage(),
        memory_percent,
        owner,
        state,
    })
}
