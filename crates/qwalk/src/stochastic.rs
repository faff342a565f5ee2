//! Classical random walk.
//!
//! The state is a probability vector evolved by a column-stochastic matrix.
//! Search makes the marked vertices absorbing: their columns are replaced by
//! unit vectors, so probability that reaches them stays there.

use std::sync::Arc;

use ndarray::Array1;

use qwalk_linalg::CsrMatrix;

use crate::config::EngineConfig;
use crate::error::{ConfigurationError, QwResult};
use crate::graph::{SharedGraph, WalkGraph, uniform_stochastic_matrix};
use crate::marked::MarkedSet;
use crate::model::{SearchModel, TimeModel, WalkModel, check_marked};

/// Check `matrix` is square of order `order` with no negative entry.
pub(crate) fn check_stochastic_shape(matrix: &CsrMatrix<f64>, order: usize) -> QwResult<()> {
    let (rows, cols) = matrix.shape();
    if rows != cols {
        return Err(ConfigurationError::NotSquare {
            name: "stochastic matrix",
            rows,
            cols,
        }
        .into());
    }
    if rows != order {
        return Err(ConfigurationError::DimensionMismatch {
            name: "stochastic matrix",
            expected: order,
            got: rows,
        }
        .into());
    }
    if let Some((row, col, value)) = matrix.iter().find(|&(_, _, v)| v < 0.0 || v.is_nan()) {
        return Err(ConfigurationError::NegativeEntry { row, col, value }.into());
    }
    Ok(())
}

/// Check every column of `matrix` sums to one within `tolerance`.
pub(crate) fn check_column_sums(matrix: &CsrMatrix<f64>, tolerance: f64) -> QwResult<()> {
    for (column, sum) in matrix.column_sums().into_iter().enumerate() {
        if !((sum - 1.0).abs() <= tolerance) {
            return Err(ConfigurationError::NotStochastic { column, sum }.into());
        }
    }
    Ok(())
}

/// Transition matrix of a [`StochasticWalk`] dynamics.
#[derive(Debug, Clone, PartialEq)]
pub struct StochasticParameters {
    /// Column-stochastic transition matrix, absorbing at marked vertices
    /// for search.
    pub stochastic: CsrMatrix<f64>,
}

/// Classical random walk on a graph.
#[derive(Debug, Clone)]
pub struct StochasticWalk {
    graph: SharedGraph,
    stochastic: CsrMatrix<f64>,
    /// Transpose of `stochastic`; row `x` is column `x`.
    columns: CsrMatrix<f64>,
}

impl StochasticWalk {
    /// Uniform random walk: every out-neighbour equally likely.
    pub fn new<G: WalkGraph + 'static>(graph: G) -> QwResult<Self> {
        let stochastic = uniform_stochastic_matrix(&graph)?;
        Ok(Self {
            graph: Arc::new(graph),
            columns: stochastic.transpose(),
            stochastic,
        })
    }

    /// Walk with a caller-supplied column-stochastic matrix.
    ///
    /// Shape and sign are checked here; column sums are checked against the
    /// configured tolerance when a dynamics instance is built.
    pub fn with_stochastic<G: WalkGraph + 'static>(
        graph: G,
        stochastic: CsrMatrix<f64>,
    ) -> QwResult<Self> {
        check_stochastic_shape(&stochastic, graph.vertex_count())?;
        Ok(Self {
            graph: Arc::new(graph),
            columns: stochastic.transpose(),
            stochastic,
        })
    }

    /// The model's transition matrix.
    pub fn stochastic(&self) -> &CsrMatrix<f64> {
        &self.stochastic
    }

    /// Entries `(row, column, value)` of one column of the model matrix.
    fn column(&self, column: usize) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.columns
            .row(column)
            .map(move |(row, value)| (row, column, value))
    }
}

impl WalkModel for StochasticWalk {
    type Amplitude = f64;
    type Parameters = StochasticParameters;

    const NAME: &'static str = "stochastic walk";
    const TIME_MODEL: TimeModel = TimeModel::Discrete;

    fn graph(&self) -> &SharedGraph {
        &self.graph
    }

    fn default_parameters(&self, _config: &EngineConfig) -> QwResult<StochasticParameters> {
        Ok(StochasticParameters {
            stochastic: self.stochastic.clone(),
        })
    }

    fn validate(
        &self,
        parameters: &StochasticParameters,
        marked: Option<&MarkedSet>,
        config: &EngineConfig,
    ) -> QwResult<()> {
        check_stochastic_shape(&parameters.stochastic, self.vertex_count())?;
        check_column_sums(&parameters.stochastic, config.stochastic_tolerance)?;
        if let Some(marked) = marked {
            check_marked(marked, self.vertex_count())?;
        }
        Ok(())
    }

    fn step(
        &self,
        parameters: &StochasticParameters,
        state: &Array1<f64>,
    ) -> QwResult<Array1<f64>> {
        Ok(parameters.stochastic.mul_vec(state)?)
    }

    fn measure(&self, state: &Array1<f64>) -> Array1<f64> {
        state.clone()
    }

    fn initial_state(&self) -> Array1<f64> {
        let n = self.vertex_count();
        Array1::from_elem(n, 1.0 / n as f64)
    }
}

impl SearchModel for StochasticWalk {
    fn search_parameters(
        &self,
        marked: &MarkedSet,
        _config: &EngineConfig,
    ) -> QwResult<StochasticParameters> {
        let n = self.vertex_count();
        let kept = self
            .stochastic
            .iter()
            .filter(|&(_, c, _)| !marked.contains(c));
        let absorbing = marked.iter().map(|m| (m, m, 1.0));
        let stochastic = CsrMatrix::from_triplets(n, n, kept.chain(absorbing))?;
        Ok(StochasticParameters { stochastic })
    }

    fn patch_marked(
        &self,
        parameters: &StochasticParameters,
        old: &MarkedSet,
        new: &MarkedSet,
    ) -> QwResult<StochasticParameters> {
        let n = self.vertex_count();
        let changed = old.symmetric_difference(new);
        let mut triplets: Vec<(usize, usize, f64)> = parameters
            .stochastic
            .iter()
            .filter(|&(_, c, _)| changed.binary_search(&c).is_err())
            .collect();
        for &vertex in &changed {
            if new.contains(vertex) {
                triplets.push((vertex, vertex, 1.0));
            } else {
                triplets.extend(self.column(vertex));
            }
        }
        let stochastic = CsrMatrix::from_triplets(n, n, triplets)?;
        Ok(StochasticParameters { stochastic })
    }
}
