use foresight::looping::LoopStop;
use foresight::run::RunSummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Completed,
    Exhausted,
    CycleLimit,
    Error,
}

pub fn classify_outcome(result: &anyhow::Result<RunSummary>) -> Outcome {
    match result {
        Ok(summary) => match summary.stop {
            LoopStop::AllDelivered => Outcome::Completed,
            LoopStop::Exhausted => Outcome::Exhausted,
            LoopStop::CycleLimit { .. } => Outcome::CycleLimit,
        },
        Err(_) => Outcome::Error,
    }
}
