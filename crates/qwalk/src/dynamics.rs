//! Dynamics instances: a model bound to its validated parameters.
//!
//! [`QwEvolution`] is a plain walk and [`QwSearch`] a search for a marked
//! set. Both run the model's validation in their constructors, so a live
//! instance is always a coherent model/parameters/marked-set combination.
//! Execution code only ever sees them through the [`Dynamics`] trait.

use std::fmt;

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{ConfigurationError, QwError, QwResult};
use crate::marked::MarkedSet;
use crate::model::{SearchModel, TimeModel, WalkModel, check_marked, check_state_len, restrict};

/// How far to evolve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Runtime {
    /// Number of discrete steps.
    Steps(usize),
    /// Elapsed continuous time.
    Time(f64),
}

impl Runtime {
    /// The runtime as a real number.
    pub fn as_time(self) -> f64 {
        match self {
            Runtime::Steps(steps) => steps as f64,
            Runtime::Time(time) => time,
        }
    }

    /// True for a finite runtime strictly greater than zero.
    pub fn is_positive(self) -> bool {
        match self {
            Runtime::Steps(steps) => steps > 0,
            Runtime::Time(time) => time.is_finite() && time > 0.0,
        }
    }
}

impl From<usize> for Runtime {
    fn from(steps: usize) -> Self {
        Runtime::Steps(steps)
    }
}

impl From<f64> for Runtime {
    fn from(time: f64) -> Self {
        Runtime::Time(time)
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Runtime::Steps(steps) => write!(f, "{steps} steps"),
            Runtime::Time(time) => write!(f, "t = {time}"),
        }
    }
}

/// Evolution and measurement protocol shared by every dynamics instance.
pub trait Dynamics: Send + Sync {
    /// Entry type of the evolution state.
    type Amplitude: Copy + fmt::Debug + Send + Sync + 'static;

    /// Name of the underlying model.
    fn model_name(&self) -> &'static str;

    /// Whether the dynamics is stepped or continuous.
    fn time_model(&self) -> TimeModel;

    /// Number of graph vertices.
    fn vertex_count(&self) -> usize;

    /// Required length of a state.
    fn state_dimension(&self) -> usize;

    /// Numerical configuration the instance was built with.
    fn config(&self) -> &EngineConfig;

    /// Advance one discrete step.
    fn step(&self, state: &Array1<Self::Amplitude>) -> QwResult<Array1<Self::Amplitude>>;

    /// Evolve directly to elapsed time `time` from `state`.
    fn evolve_to(
        &self,
        state: &Array1<Self::Amplitude>,
        time: f64,
    ) -> QwResult<Array1<Self::Amplitude>>;

    /// Probability distribution over all vertices, or restricted to `subset`
    /// in subset order.
    fn measure(
        &self,
        state: &Array1<Self::Amplitude>,
        subset: Option<&[usize]>,
    ) -> QwResult<Array1<f64>>;

    /// Evolve `state` by `runtime`.
    ///
    /// Discrete dynamics take one step per unit of [`Runtime::Steps`] and
    /// reject [`Runtime::Time`]. Continuous dynamics jump straight to the
    /// elapsed time, reading `Steps(k)` as time `k`.
    fn evolve(
        &self,
        state: &Array1<Self::Amplitude>,
        runtime: Runtime,
    ) -> QwResult<Array1<Self::Amplitude>> {
        check_state_len(state.len(), self.state_dimension())?;
        match (self.time_model(), runtime) {
            (TimeModel::Discrete, Runtime::Steps(steps)) => {
                let mut current = state.clone();
                for _ in 0..steps {
                    current = self.step(&current)?;
                }
                Ok(current)
            }
            (TimeModel::Discrete, Runtime::Time(_)) => Err(QwError::unsupported(
                "evolution to a real-valued time",
                self.model_name(),
            )),
            (TimeModel::Continuous, runtime) => self.evolve_to(state, runtime.as_time()),
        }
    }
}

/// Plain evolution of a walk model.
#[derive(Debug, Clone)]
pub struct QwEvolution<M: WalkModel> {
    model: M,
    parameters: M::Parameters,
    config: EngineConfig,
}

impl<M: WalkModel> QwEvolution<M> {
    /// Evolution with the model's default parameters and default config.
    pub fn new(model: M) -> QwResult<Self> {
        Self::with_config(model, EngineConfig::default())
    }

    /// Evolution with the model's default parameters.
    pub fn with_config(model: M, config: EngineConfig) -> QwResult<Self> {
        config.validate()?;
        let parameters = model.default_parameters(&config)?;
        Self::build(model, parameters, config)
    }

    /// Evolution with caller-supplied parameters.
    pub fn with_parameters(
        model: M,
        parameters: M::Parameters,
        config: EngineConfig,
    ) -> QwResult<Self> {
        config.validate()?;
        Self::build(model, parameters, config)
    }

    fn build(model: M, parameters: M::Parameters, config: EngineConfig) -> QwResult<Self> {
        model.validate(&parameters, None, &config)?;
        debug!(
            model = M::NAME,
            vertices = model.vertex_count(),
            dimension = model.state_dimension(),
            "built evolution"
        );
        Ok(Self {
            model,
            parameters,
            config,
        })
    }

    /// The underlying model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The validated parameters.
    pub fn parameters(&self) -> &M::Parameters {
        &self.parameters
    }

    /// The model's canonical starting state.
    pub fn initial_state(&self) -> Array1<M::Amplitude> {
        self.model.initial_state()
    }
}

impl<M: WalkModel> Dynamics for QwEvolution<M> {
    type Amplitude = M::Amplitude;

    fn model_name(&self) -> &'static str {
        M::NAME
    }

    fn time_model(&self) -> TimeModel {
        M::TIME_MODEL
    }

    fn vertex_count(&self) -> usize {
        self.model.vertex_count()
    }

    fn state_dimension(&self) -> usize {
        self.model.state_dimension()
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn step(&self, state: &Array1<M::Amplitude>) -> QwResult<Array1<M::Amplitude>> {
        check_state_len(state.len(), self.state_dimension())?;
        self.model.step(&self.parameters, state)
    }

    fn evolve_to(
        &self,
        state: &Array1<M::Amplitude>,
        time: f64,
    ) -> QwResult<Array1<M::Amplitude>> {
        check_state_len(state.len(), self.state_dimension())?;
        self.model.evolve_to(&self.parameters, state, time, &self.config)
    }

    fn measure(
        &self,
        state: &Array1<M::Amplitude>,
        subset: Option<&[usize]>,
    ) -> QwResult<Array1<f64>> {
        check_state_len(state.len(), self.state_dimension())?;
        let distribution = self.model.measure(state);
        match subset {
            Some(subset) => restrict(&distribution, subset),
            None => Ok(distribution),
        }
    }
}

/// Search for a marked vertex set.
///
/// `penalty` is the cost of preparing and measuring a state, in units of
/// runtime; it enters the efficiency objective of
/// [`maximize_search`](crate::search::maximize_search).
#[derive(Debug, Clone)]
pub struct QwSearch<M: SearchModel> {
    model: M,
    parameters: M::Parameters,
    marked: MarkedSet,
    penalty: f64,
    config: EngineConfig,
}

impl<M: SearchModel> QwSearch<M> {
    /// Search with the model's search parameters and default config.
    pub fn new(model: M, marked: MarkedSet, penalty: f64) -> QwResult<Self> {
        Self::with_config(model, marked, penalty, EngineConfig::default())
    }

    /// Search with the model's search parameters.
    pub fn with_config(
        model: M,
        marked: MarkedSet,
        penalty: f64,
        config: EngineConfig,
    ) -> QwResult<Self> {
        config.validate()?;
        check_marked(&marked, model.vertex_count())?;
        let parameters = model.search_parameters(&marked, &config)?;
        Self::build(model, parameters, marked, penalty, config)
    }

    /// Search with caller-supplied parameters.
    pub fn with_parameters(
        model: M,
        parameters: M::Parameters,
        marked: MarkedSet,
        penalty: f64,
        config: EngineConfig,
    ) -> QwResult<Self> {
        config.validate()?;
        Self::build(model, parameters, marked, penalty, config)
    }

    fn build(
        model: M,
        parameters: M::Parameters,
        marked: MarkedSet,
        penalty: f64,
        config: EngineConfig,
    ) -> QwResult<Self> {
        if !(penalty.is_finite() && penalty >= 0.0) {
            return Err(ConfigurationError::InvalidPenalty(penalty).into());
        }
        model.validate(&parameters, Some(&marked), &config)?;
        debug!(
            model = M::NAME,
            vertices = model.vertex_count(),
            marked = marked.len(),
            penalty,
            "built search"
        );
        Ok(Self {
            model,
            parameters,
            marked,
            penalty,
            config,
        })
    }

    /// Move the search to a new marked set.
    ///
    /// An equal set (in any order) only replaces the stored order. A
    /// different set patches the existing parameters instead of rebuilding
    /// them.
    pub fn with_marked(mut self, marked: MarkedSet) -> QwResult<Self> {
        check_marked(&marked, self.model.vertex_count())?;
        if !self.marked.same_vertices(&marked) {
            self.parameters = self
                .model
                .patch_marked(&self.parameters, &self.marked, &marked)?;
            debug!(
                model = M::NAME,
                changed = self.marked.symmetric_difference(&marked).len(),
                "patched marked set"
            );
        }
        self.marked = marked;
        Ok(self)
    }

    /// The underlying model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The validated search parameters.
    pub fn parameters(&self) -> &M::Parameters {
        &self.parameters
    }

    /// The marked vertices.
    pub fn marked(&self) -> &MarkedSet {
        &self.marked
    }

    /// Preparation and measurement cost.
    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    /// The model's canonical starting state.
    pub fn initial_state(&self) -> Array1<M::Amplitude> {
        self.model.initial_state()
    }

    /// Probability of each marked vertex, in marked-set order.
    pub fn measure_marked(&self, state: &Array1<M::Amplitude>) -> QwResult<Array1<f64>> {
        self.measure(state, Some(self.marked.vertices()))
    }
}

impl<M: SearchModel> Dynamics for QwSearch<M> {
    type Amplitude = M::Amplitude;

    fn model_name(&self) -> &'static str {
        M::NAME
    }

    fn time_model(&self) -> TimeModel {
        M::TIME_MODEL
    }

    fn vertex_count(&self) -> usize {
        self.model.vertex_count()
    }

    fn state_dimension(&self) -> usize {
        self.model.state_dimension()
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn step(&self, state: &Array1<M::Amplitude>) -> QwResult<Array1<M::Amplitude>> {
        check_state_len(state.len(), self.state_dimension())?;
        self.model.step(&self.parameters, state)
    }

    fn evolve_to(
        &self,
        state: &Array1<M::Amplitude>,
        time: f64,
    ) -> QwResult<Array1<M::Amplitude>> {
        check_state_len(state.len(), self.state_dimension())?;
        self.model.evolve_to(&self.parameters, state, time, &self.config)
    }

    fn measure(
        &self,
        state: &Array1<M::Amplitude>,
        subset: Option<&[usize]>,
    ) -> QwResult<Array1<f64>> {
        check_state_len(state.len(), self.state_dimension())?;
        let distribution = self.model.measure(state);
        match subset {
            Some(subset) => restrict(&distribution, subset),
            None => Ok(distribution),
        }
    }
}
