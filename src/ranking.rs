use std::cmp::Ordering;

use crate::model::{ProcessSample, SystemLoad};

pub const DEFAULT_TOP_N: usize = 15;
pub const DEFAULT_THRESHOLD: f32 = 70.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CpuStatus {
    Normal,
    High,
}

impl CpuStatus {
    pub fn label(self) -> &'static str {
        match self {
            CpuStatus::Normal => "NORMAL",
            CpuStatus::High => "HIGH",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RankedEntry {
    pub sample: ProcessSample,
    pub status: CpuStatus,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RankedSnapshot {
    pub entries: Vec<RankedEntry>,
    pub system: SystemLoad,
    pub threshold: f32,
}

impl RankedSnapshot {
    pub fn high_entries(&self) -> impl Iterator<Item = &RankedEntry> {
        self.entries.iter().filter(|e| e.status == CpuStatus::High)
    }

    pub fn find(&self, pid: u32) -> Option<&RankedEntry> {
        self.entries.iter().find(|e| e.sample.pid == pid)
    }
}

/// Boundary is inclusive: a process sitting exactly on the threshold is HIGH.
pub fn classify(cpu_percent: f32, threshold: f32) -> CpuStatus {
    if cpu_percent >= threshold {
        CpuStatus::High
    } else {
        CpuStatus::Normal
    }
}

/// CPU descending, then pid ascending so equal loads always come out in the
/// same order.
pub fn compare_samples(a: &ProcessSample, b: &ProcessSample) -> Ordering {
    b.cpu_percent
        .total_cmp(&a.cpu_percent)
        .then_with(|| a.pid.cmp(&b.pid))
}

pub fn rank(
    samples: &[ProcessSample],
    system: SystemLoad,
    top_n: usize,
    threshold: f32,
) -> RankedSnapshot {
    let mut ordered: Vec<&ProcessSample> = samples.iter().collect();
    ordered.sort_by(|a, b| compare_samples(a, b));
    ordered.truncate(top_n);

    let entries = ordered
        .into_iter()
        .map(|sample| RankedEntry {
            status: classify(sample.cpu_percent, threshold),
            sample: sample.clone(),
        })
        .collect();

    RankedSnapshot {
        entries,
        system,
        threshold,
    }
}
