use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::eval::HeuristicSpec;
use crate::time_control::SearchLimits;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Minimax,
    #[default]
    AlphaBeta,
    Mcts,
}

/// Everything a search needs besides the position.
///
/// Values are taken as given; a depth of 0 or a zero time budget is the
/// caller's problem.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub algorithm: Algorithm,
    pub heuristic: HeuristicSpec,
    /// Plies for minimax and alpha-beta.
    pub depth: u8,
    pub time_budget_ms: Option<u64>,
    /// Split the root moves across rayon's pool.
    pub parallel: bool,
    pub mcts_iterations: u32,
    /// UCB1 exploration constant.
    pub exploration: f64,
    pub rollout_depth: u16,
    /// Fixes the MCTS rollout RNG for reproducible searches.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            heuristic: HeuristicSpec::default(),
            depth: 3,
            time_budget_ms: None,
            parallel: false,
            mcts_iterations: 1000,
            exploration: std::f64::consts::SQRT_2,
            rollout_depth: 40,
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_heuristic(mut self, heuristic: HeuristicSpec) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget_ms = Some(budget.as_millis() as u64);
        self
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }

    /// Fresh limits for one search; each call gets its own stop flag.
    pub fn limits(&self) -> SearchLimits {
        SearchLimits::new(self.depth, self.time_budget())
    }

    pub fn from_toml_str(text: &str) -> Result<Self, SearchError> {
        toml::from_str(text).map_err(|e| SearchError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{HeuristicKind, Preset};

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = SearchConfig::from_toml_str("").expect("empty is valid");
        assert_eq!(config, SearchConfig::default());
        assert_eq!(config.algorithm, Algorithm::AlphaBeta);
        assert_eq!(config.heuristic, HeuristicSpec::Preset(Preset::Standard));
        assert_eq!(config.depth, 3);
        assert_eq!(config.limits().time_budget, None);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = SearchConfig::from_toml_str(
            r#"
            algorithm = "mcts"
            heuristic = "material"
            time_budget_ms = 250
            seed = 7
            "#,
        )
        .expect("valid");
        assert_eq!(config.algorithm, Algorithm::Mcts);
        assert_eq!(config.heuristic, HeuristicSpec::Kind(HeuristicKind::Material));
        assert_eq!(config.time_budget(), Some(Duration::from_millis(250)));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.mcts_iterations, 1000);
    }

    #[test]
    fn test_bad_toml_is_a_config_error() {
        let err = SearchConfig::from_toml_str(r#"algorithm = "alphabet""#).unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }
}
