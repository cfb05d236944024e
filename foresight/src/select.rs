//! Selection of the active decision strategy from configuration.

use serde::{Deserialize, Serialize};

use crate::core::planner::ForesightPlanner;
use crate::core::strategy::{Greedy, Strategy};
use crate::io::config::SimConfig;

/// Which strategy drives the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Nearest-target baseline.
    Greedy,
    /// Depth-bounded exhaustive planner.
    Foresight,
}

/// Build the strategy named by `cfg`.
pub fn build_strategy(cfg: &SimConfig) -> Box<dyn Strategy> {
    match cfg.planner.strategy {
        StrategyKind::Greedy => Box::new(Greedy),
        StrategyKind::Foresight => {
            let planner =
                ForesightPlanner::new(cfg.planner.depth, cfg.replan_mode(), cfg.rules());
            match cfg.time_budget() {
                Some(budget) => Box::new(planner.with_time_budget(budget)),
                None => Box::new(planner),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_the_configured_strategy() {
        let mut cfg = SimConfig::default();
        assert_eq!(build_strategy(&cfg).name(), "foresight");
        cfg.planner.strategy = StrategyKind::Greedy;
        assert_eq!(build_strategy(&cfg).name(), "greedy");
    }
}
