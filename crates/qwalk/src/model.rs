//! Walk model capability traits.
//!
//! A model is an immutable description of a walk on a graph. Everything a
//! dynamics instance needs from it (parameter construction, validation, the
//! evolution step and the measurement) goes through [`WalkModel`]; search
//! support is the extra [`SearchModel`] capability.

use std::fmt::Debug;

use ndarray::Array1;

use crate::config::EngineConfig;
use crate::error::{ConfigurationError, QwError, QwResult};
use crate::graph::SharedGraph;
use crate::marked::MarkedSet;

/// How a model advances in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeModel {
    /// Integer step counts.
    Discrete,
    /// Real elapsed times.
    Continuous,
}

impl TimeModel {
    /// True for [`TimeModel::Discrete`].
    pub fn is_discrete(self) -> bool {
        matches!(self, TimeModel::Discrete)
    }
}

/// A walk family: fixed structure plus the operations its dynamics need.
pub trait WalkModel: Debug + Send + Sync {
    /// Entry type of the evolution state.
    type Amplitude: Copy + Debug + Send + Sync + 'static;

    /// Derived operators owned by a dynamics instance.
    type Parameters: Clone + Debug + Send + Sync;

    /// Model name used in logs and errors.
    const NAME: &'static str;

    /// Whether the model is stepped or jumps to a time.
    const TIME_MODEL: TimeModel;

    /// The graph the model was built on.
    fn graph(&self) -> &SharedGraph;

    /// Number of graph vertices.
    fn vertex_count(&self) -> usize {
        self.graph().vertex_count()
    }

    /// Length of an evolution state.
    fn state_dimension(&self) -> usize {
        self.vertex_count()
    }

    /// Parameters of the plain (non-search) evolution.
    fn default_parameters(&self, config: &EngineConfig) -> QwResult<Self::Parameters>;

    /// Check a model/parameters/marked-set combination.
    fn validate(
        &self,
        parameters: &Self::Parameters,
        marked: Option<&MarkedSet>,
        config: &EngineConfig,
    ) -> QwResult<()>;

    /// Advance one discrete step.
    fn step(
        &self,
        parameters: &Self::Parameters,
        state: &Array1<Self::Amplitude>,
    ) -> QwResult<Array1<Self::Amplitude>> {
        let _ = (parameters, state);
        Err(QwError::unsupported("single-step evolution", Self::NAME))
    }

    /// Jump to elapsed time `time` from `state`.
    fn evolve_to(
        &self,
        parameters: &Self::Parameters,
        state: &Array1<Self::Amplitude>,
        time: f64,
        config: &EngineConfig,
    ) -> QwResult<Array1<Self::Amplitude>> {
        let _ = (parameters, state, time, config);
        Err(QwError::unsupported("continuous-time evolution", Self::NAME))
    }

    /// Probability of every vertex.
    fn measure(&self, state: &Array1<Self::Amplitude>) -> Array1<f64>;

    /// Canonical starting state.
    fn initial_state(&self) -> Array1<Self::Amplitude>;
}

/// A walk family that supports search for marked vertices.
pub trait SearchModel: WalkModel {
    /// Parameters of the search evolution for `marked`.
    fn search_parameters(
        &self,
        marked: &MarkedSet,
        config: &EngineConfig,
    ) -> QwResult<Self::Parameters>;

    /// Turn the search parameters for `old` into those for `new` without
    /// rebuilding them. Only called when the two sets differ.
    fn patch_marked(
        &self,
        parameters: &Self::Parameters,
        old: &MarkedSet,
        new: &MarkedSet,
    ) -> QwResult<Self::Parameters>;
}

/// Check a marked set fits a graph of `vertex_count` vertices.
pub(crate) fn check_marked(marked: &MarkedSet, vertex_count: usize) -> QwResult<()> {
    match marked.iter().find(|&v| v >= vertex_count) {
        Some(vertex) => Err(ConfigurationError::VertexOutOfRange {
            vertex,
            vertex_count,
        }
        .into()),
        None => Ok(()),
    }
}

/// Check a state has the length the model expects.
pub(crate) fn check_state_len(len: usize, expected: usize) -> QwResult<()> {
    if len != expected {
        return Err(ConfigurationError::DimensionMismatch {
            name: "state",
            expected,
            got: len,
        }
        .into());
    }
    Ok(())
}

/// Pick `subset` entries of a full distribution, in subset order.
pub(crate) fn restrict(distribution: &Array1<f64>, subset: &[usize]) -> QwResult<Array1<f64>> {
    let vertex_count = distribution.len();
    subset
        .iter()
        .map(|&vertex| {
            distribution.get(vertex).copied().ok_or_else(|| {
                QwError::from(ConfigurationError::VertexOutOfRange {
                    vertex,
                    vertex_count,
                })
            })
        })
        .collect()
}
