//! Engine configuration.
//!
//! [`EngineConfig`] collects every numerical tolerance and iteration limit the
//! engine hands to its linear-algebra primitives, plus the search settings.
//! A dynamics instance keeps the config it was built with.

use serde::{Deserialize, Serialize};

use qwalk_linalg::{EigenConfig, KrylovConfig};

use crate::error::{ConfigurationError, QwResult};

/// What the search maximiser ranks candidates by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchObjective {
    /// `probability / (runtime + penalty)`.
    #[default]
    Efficiency,
    /// Total marked probability alone.
    Probability,
}

/// Settings for [`maximize_search`](crate::search::maximize_search).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of grid times sampled in `(0, max]` for continuous models.
    pub grid_points: usize,
    /// Width of the golden-section bracket at which refinement stops.
    pub golden_tolerance: f64,
    /// Iteration cap for golden-section refinement.
    pub golden_max_iterations: usize,
    /// Ranking objective.
    pub objective: SearchObjective,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            grid_points: 100,
            golden_tolerance: 1e-6,
            golden_max_iterations: 200,
            objective: SearchObjective::Efficiency,
        }
    }
}

/// Numerical configuration for models and dynamics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Power iteration used for the default jumping rate.
    pub eigen: EigenConfig,
    /// Lanczos settings for sparse continuous-time evolution.
    pub krylov: KrylovConfig,
    /// Search maximisation settings.
    pub search: SearchConfig,
    /// Column-sum tolerance when validating stochastic matrices.
    pub stochastic_tolerance: f64,
    /// Entry-wise tolerance when validating Hamiltonian symmetry.
    pub symmetry_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            eigen: EigenConfig::default(),
            krylov: KrylovConfig::default(),
            search: SearchConfig::default(),
            stochastic_tolerance: 1e-10,
            symmetry_tolerance: 1e-10,
        }
    }
}

fn invalid(message: impl Into<String>) -> QwResult<()> {
    Err(ConfigurationError::InvalidConfig(message.into()).into())
}

impl EngineConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the eigenvalue-estimation limits.
    #[must_use]
    pub fn with_eigen(mut self, eigen: EigenConfig) -> Self {
        self.eigen = eigen;
        self
    }

    /// Replace the Krylov settings.
    #[must_use]
    pub fn with_krylov(mut self, krylov: KrylovConfig) -> Self {
        self.krylov = krylov;
        self
    }

    /// Replace the search settings.
    #[must_use]
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Set the search objective.
    #[must_use]
    pub fn with_objective(mut self, objective: SearchObjective) -> Self {
        self.search.objective = objective;
        self
    }

    /// Set the stochastic column-sum tolerance.
    #[must_use]
    pub fn with_stochastic_tolerance(mut self, tolerance: f64) -> Self {
        self.stochastic_tolerance = tolerance;
        self
    }

    /// Check every value is in range.
    pub fn validate(&self) -> QwResult<()> {
        if self.eigen.max_iterations == 0 {
            return invalid("eigen.max_iterations must be at least 1");
        }
        if !(self.eigen.tolerance > 0.0) {
            return invalid(format!(
                "eigen.tolerance must be positive, got {}",
                self.eigen.tolerance
            ));
        }
        if self.krylov.dimension == 0 {
            return invalid("krylov.dimension must be at least 1");
        }
        if !(self.krylov.max_step_norm > 0.0) {
            return invalid(format!(
                "krylov.max_step_norm must be positive, got {}",
                self.krylov.max_step_norm
            ));
        }
        if self.search.grid_points == 0 {
            return invalid("search.grid_points must be at least 1");
        }
        if !(self.search.golden_tolerance > 0.0) {
            return invalid(format!(
                "search.golden_tolerance must be positive, got {}",
                self.search.golden_tolerance
            ));
        }
        if !(self.stochastic_tolerance >= 0.0) || !(self.symmetry_tolerance >= 0.0) {
            return invalid("tolerances must be non-negative");
        }
        Ok(())
    }
}
