use crate::model::{ProcessSample, SampleOutcome, SystemLoad};

/// Everything one sampling pass produced, before ranking.
#[derive(Clone, Debug, Default)]
pub struct SystemSnapshot {
    pub load: SystemLoad,
    pub processes: Vec<ProcessSample>,
    pub partial: usize,
    pub skipped: usize,
}

impl SystemSnapshot {
    pub fn from_outcomes(load: SystemLoad, outcomes: Vec<SampleOutcome>) -> Self {
        let mut snapshot = SystemSnapshot {
            load,
            processes: Vec::with_capacity(outcomes.len()),
            partial: 0,
            skipped: 0,
        };
        for outcome in outcomes {
            match outcome {
                SampleOutcome::Complete(sample) => snapshot.processes.push(sample),
                SampleOutcome::Partial(sample) => {
                    snapshot.partial += 1;
                    snapshot.processes.push(sample);
                }
                SampleOutcome::Skipped(_) => snapshot.skipped += 1,
            }
        }
        snapshot
    }
}
