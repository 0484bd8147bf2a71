// Data-driven planner configuration.
//
// All tunable search parameters live in `PlannerConfig`, loaded from JSON
// (or built in code via `Default`). The search reads its budgets, heuristic
// weight, and path constraints from here rather than from constants, so a
// caller can trade plan quality for latency per agent without recompiling.
//
// Every field has a default (`#[serde(default)]`), so a partial JSON object
// such as `{"allow_place_blocks": false}` is a valid config.
//
// See also: `pathfinding.rs` which consumes the budgets, `movement/` which
// consumes the break/place/parkour constraints.

use crate::error::{PlanError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Maximum number of node expansions before giving up with
    /// `NotFound(BudgetExceeded)`.
    pub max_iterations: u64,

    /// Wall-clock budget for one search in milliseconds. `None` disables the
    /// deadline and leaves only the iteration budget.
    pub max_duration_ms: Option<u64>,

    /// Multiplier on the goal heuristic. 1.0 is plain A*; larger values
    /// search greedier and return sooner with possibly costlier routes.
    pub heuristic_weight: f64,

    /// Movements may mine through obstructing blocks.
    pub allow_break_blocks: bool,

    /// Movements may place blocks to bridge gaps and tower upward.
    pub allow_place_blocks: bool,

    /// Two-block gap jumps are generated.
    pub allow_parkour: bool,

    /// Minimum interval between progress log lines during long searches.
    pub progress_log_interval_ms: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200_000,
            max_duration_ms: Some(180_000),
            heuristic_weight: 1.0,
            allow_break_blocks: true,
            allow_place_blocks: true,
            allow_parkour: true,
            progress_log_interval_ms: 1000,
        }
    }
}

impl PlannerConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PlannerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(PlanError::InvalidConfig(
                "max_iterations must be at least 1".into(),
            ));
        }
        if !self.heuristic_weight.is_finite() || self.heuristic_weight < 0.0 {
            return Err(PlanError::InvalidConfig(format!(
                "heuristic_weight must be finite and non-negative, got {}",
                self.heuristic_weight
            )));
        }
        Ok(())
    }

    pub fn max_duration(&self) -> Option<Duration> {
        self.max_duration_ms.map(Duration::from_millis)
    }

    pub fn progress_log_interval(&self) -> Duration {
        Duration::from_millis(self.progress_log_interval_ms)
    }
}
