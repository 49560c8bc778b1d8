//! Tunable parameters of the two searchers

use std::time::Duration;

use crate::error::{Error, Result};
use crate::{HEIGHT, WIDTH};

/// Default number of plies searched by alpha-beta
pub const DEFAULT_DEPTH: u32 = 4;

/// Default wall-clock budget of one MCTS move
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(2);

/// Configuration for the alpha-beta searcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlphaBetaConfig {
    /// Number of plies to look ahead, at least 1
    pub depth: u32,
}

impl Default for AlphaBetaConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
        }
    }
}

impl AlphaBetaConfig {
    pub fn with_depth(depth: u32) -> Self {
        Self { depth }
    }

    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 || self.depth as usize > WIDTH * HEIGHT {
            return Err(Error::InvalidConfig(format!(
                "alpha-beta depth must be between 1 and {}, got {}",
                WIDTH * HEIGHT,
                self.depth
            )));
        }
        Ok(())
    }
}

/// How MCTS picks its move among the root children once the budget is spent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Highest wins / simulations, ties broken by simulations
    ///
    /// Rates are compared without any minimum sample size. The flat UCB1 scan
    /// can leave a root child with only a handful of playouts, and a lucky
    /// streak there beats a well explored sibling. Use [`SelectionPolicy::Visits`]
    /// for a choice backed by sample count.
    WinRate,
    /// Most simulations, ties broken by win rate
    Visits,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        SelectionPolicy::WinRate
    }
}

/// Configuration for Monte Carlo Tree Search
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Wall-clock time spent per move. The deadline is checked between
    /// iterations, so a search can overrun it by one iteration.
    pub time_budget: Duration,

    /// Exploration constant `c` of the UCB1 formula
    pub exploration: f64,

    /// Optional cap on iterations, reached before the deadline it ends the search
    pub max_iterations: Option<u64>,

    /// Seed for the rollout RNG. Without one the RNG is seeded from entropy.
    pub seed: Option<u64>,

    pub selection: SelectionPolicy,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            time_budget: DEFAULT_TIME_BUDGET,
            exploration: std::f64::consts::SQRT_2,
            max_iterations: None,
            seed: None,
            selection: SelectionPolicy::default(),
        }
    }
}

impl MctsConfig {
    /// A reproducible configuration bounded by iterations rather than time
    pub fn for_testing() -> Self {
        Self {
            time_budget: Duration::from_secs(60),
            max_iterations: Some(500),
            seed: Some(0),
            ..Self::default()
        }
    }

    pub fn with_time_budget(time_budget: Duration) -> Self {
        Self {
            time_budget,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.time_budget == Duration::from_secs(0) && self.max_iterations.is_none() {
            return Err(Error::InvalidConfig(
                "mcts time budget must be positive".into(),
            ));
        }
        if self.max_iterations == Some(0) {
            return Err(Error::InvalidConfig(
                "mcts max_iterations must be > 0".into(),
            ));
        }
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "mcts exploration constant must be finite and >= 0, got {}",
                self.exploration
            )));
        }
        Ok(())
    }
}
