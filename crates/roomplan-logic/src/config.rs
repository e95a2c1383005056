//! Run configuration and engine feature flags.
//!
//! [`EngineFeatures`] is fixed when a [`FloorPlan`](crate::plan::FloorPlan)
//! is built. [`LayoutConfig`] is passed per run and is checked by
//! [`validate_config`] before any search starts.
//!
//! ```
//! use roomplan_logic::config::{validate_config, LayoutConfig};
//!
//! let mut config = LayoutConfig::default();
//! config.seed = Some(7);
//! assert!(validate_config(&config).is_empty());
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which placement search to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchStrategy {
    /// Independent randomized greedy attempts; keep the best.
    #[default]
    RandomRestart,
    /// Level-order exploration of partial placements.
    BreadthFirst,
    /// Grow required-adjacency clusters outward from a seed room.
    ClusterGrowth,
}

/// Orthogonal engine capabilities, selected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineFeatures {
    /// Use the grid index for overlap checks instead of a linear scan.
    pub spatial_indexing: bool,
    /// Reject placements and moves that create a forbidden adjacency.
    pub forbidden_adjacency: bool,
    pub expansion: bool,
    pub compaction: bool,
    /// Move isolated rooms flush against some other room after search.
    pub minimum_adjacency: bool,
}

impl Default for EngineFeatures {
    fn default() -> Self {
        Self::all()
    }
}

impl EngineFeatures {
    pub fn all() -> Self {
        Self {
            spatial_indexing: true,
            forbidden_adjacency: true,
            expansion: true,
            compaction: true,
            minimum_adjacency: true,
        }
    }

    /// Bare random-restart placement with expansion: no index, no
    /// forbidden edges, no compaction or enforcement.
    pub fn basic() -> Self {
        Self {
            spatial_indexing: false,
            forbidden_adjacency: false,
            expansion: true,
            compaction: false,
            minimum_adjacency: false,
        }
    }
}

/// Per-run search budget and pass toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub strategy: SearchStrategy,
    /// Random-restart and cluster-growth attempt budget.
    pub max_attempts: u32,
    /// Wall-clock budget for the whole search (None = unbounded).
    pub timeout: Option<Duration>,
    /// RNG seed (None = draw one and report it in the outcome).
    pub seed: Option<u64>,
    pub enable_expansion: bool,
    pub enable_compaction: bool,
    /// Candidates kept per room and orientation in random restart.
    pub max_positions_per_room: usize,
    /// Uniform samples drawn after the neighbor-derived candidates.
    pub random_samples: usize,
    /// Children pushed per orientation by each breadth-first state.
    pub bfs_fan_out: usize,
    /// Breadth-first dequeue budget.
    pub max_nodes: usize,
    /// Children are dropped once the breadth-first queue holds this many
    /// states.
    pub bfs_queue_limit: usize,
    /// Breadth-first depth cap (None = number of rooms).
    pub max_depth: Option<usize>,
    /// Growth steps tried by the expansion pass, largest first.
    pub expansion_increments: Vec<i32>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::RandomRestart,
            max_attempts: 500,
            timeout: None,
            seed: None,
            enable_expansion: true,
            enable_compaction: true,
            max_positions_per_room: 30,
            random_samples: 200,
            bfs_fan_out: 3,
            max_nodes: 20_000,
            bfs_queue_limit: 1024,
            max_depth: None,
            expansion_increments: vec![5, 3, 2, 1],
        }
    }
}

impl LayoutConfig {
    pub fn new(
        max_attempts: u32,
        timeout: Option<Duration>,
        enable_expansion: bool,
        enable_compaction: bool,
        seed: Option<u64>,
    ) -> Self {
        Self {
            max_attempts,
            timeout,
            enable_expansion,
            enable_compaction,
            seed,
            ..Self::default()
        }
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigError {
    /// No attempts allowed.
    ZeroAttempts,
    /// No candidate positions kept per room.
    ZeroPositions,
    /// Breadth-first states may push no children.
    ZeroFanOut,
    /// Breadth-first node budget is zero.
    ZeroNodes,
    /// Breadth-first queue cannot hold a single state.
    ZeroQueueLimit,
    /// No expansion increments to try.
    EmptyIncrements,
    /// An expansion increment is zero or negative.
    NonPositiveIncrement(i32),
    /// Timeout of zero length.
    ZeroTimeout,
}

/// Validate a layout configuration, returning all errors found.
pub fn validate_config(config: &LayoutConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.max_attempts == 0 {
        errors.push(ConfigError::ZeroAttempts);
    }
    if config.max_positions_per_room == 0 {
        errors.push(ConfigError::ZeroPositions);
    }
    if config.bfs_fan_out == 0 {
        errors.push(ConfigError::ZeroFanOut);
    }
    if config.max_nodes == 0 {
        errors.push(ConfigError::ZeroNodes);
    }
    if config.bfs_queue_limit == 0 {
        errors.push(ConfigError::ZeroQueueLimit);
    }
    if config.expansion_increments.is_empty() {
        errors.push(ConfigError::EmptyIncrements);
    }
    for &step in &config.expansion_increments {
        if step <= 0 {
            errors.push(ConfigError::NonPositiveIncrement(step));
        }
    }
    if config.timeout == Some(Duration::ZERO) {
        errors.push(ConfigError::ZeroTimeout);
    }

    errors
}
