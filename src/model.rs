//! Plain data shared by the sampler, the ranking engine and the renderer.
//!
//! Nothing in here talks to the OS. The sampler produces these values and the
//! ranking engine consumes them.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    Sleeping,
    Idle,
    Stopped,
    Zombie,
    Dead,
    DiskSleep,
    Unknown,
}

/// One process as seen by a single sampling cycle.
///
/// `name` and `owner` are `None` when the OS refused to hand them out; the
/// renderer picks the placeholder text.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: Option<String>,
    pub cpu_percent: f32,
    pub memory_percent: f32,
    pub owner: Option<String>,
    pub state: ProcessState,
}

impl ProcessSample {
    pub fn is_partial(&self) -> bool {
        self.name.is_none() || self.owner.is_none()
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Access Denied")
    }

    pub fn display_owner(&self) -> &str {
        self.owner.as_deref().unwrap_or("unknown")
    }
}

/// Result of reading a single process during enumeration.
#[derive(Clone, Debug, PartialEq)]
pub enum SampleOutcome {
    Complete(ProcessSample),
    /// At least one field could not be read.
    Partial(ProcessSample),
    /// The process went away between enumeration and the detail read.
    Skipped(u32),
}

impl SampleOutcome {
    pub fn from_sample(sample: ProcessSample) -> Self {
        if sample.is_partial() {
            SampleOutcome::Partial(sample)
        } else {
            SampleOutcome::Complete(sample)
        }
    }

    pub fn into_sample(self) -> Option<ProcessSample> {
        match self {
            SampleOutcome::Complete(sample) | SampleOutcome::Partial(sample) => Some(sample),
            SampleOutcome::Skipped(_) => None,
        }
    }
}

/// Host-wide figures. `cpu_percent` is the total host load, not a sum over
/// the sampled processes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SystemLoad {
    pub cpu_percent: f32,
    pub memory_percent: f32,
    pub cpu_count: usize,
    pub cpu_frequency_mhz: u64,
}
