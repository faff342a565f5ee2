//! Szegedy discrete-time quantum walk.
//!
//! The walk lives on the arcs of the bipartite double cover, a space of
//! dimension `n²` for a graph of order `n`. Basis index `x·n + y` is the arc
//! from `x` in the first register to `y` in the second.
//!
//! With `s_x` the `x`-th column of the element-wise square root of the
//! column-stochastic matrix, the two reflections are
//!
//! ```text
//! R1 = ⊕_x (2·|s_x⟩⟨s_x|) - I        blocks on x·n .. x·n + n
//! R2 = Σ_x (2·|s_x⟩⟨s_x|)ₓ - I       same projectors on x, x + n, x + 2n, ...
//! ```
//!
//! A search marks the set `M` with `D = I - 2·Σ_{m∈M} |m⟩⟨m|` through
//! `Q1 = D ⊗ I` and `Q2 = I ⊗ D`, and one search step is `(R2·Q2)·(R1·Q1)`.

use std::sync::Arc;

use ndarray::{Array1, s};
use tracing::debug;

use qwalk_linalg::CsrMatrix;

use crate::config::EngineConfig;
use crate::error::{ConfigurationError, QwResult};
use crate::graph::{SharedGraph, WalkGraph, uniform_stochastic_matrix};
use crate::marked::MarkedSet;
use crate::model::{SearchModel, TimeModel, WalkModel, check_marked};
use crate::stochastic::{check_column_sums, check_stochastic_shape};

/// The two step factors of a Szegedy dynamics. One step applies
/// `operators[0]`, then `operators[1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SzegedyParameters {
    /// Step factors, each of order `n²`.
    pub operators: [CsrMatrix<f64>; 2],
}

/// Szegedy walk model.
#[derive(Debug, Clone)]
pub struct Szegedy {
    graph: SharedGraph,
    sqrtstochastic: CsrMatrix<f64>,
    /// Built from the uniform random walk, which skips the column-sum check.
    uniform: bool,
}

impl Szegedy {
    /// Szegedy walk over the uniform random walk on `graph`.
    ///
    /// The degree-normalised matrix is stochastic by construction and is not
    /// re-checked against the stochastic tolerance.
    pub fn new<G: WalkGraph + 'static>(graph: G) -> QwResult<Self> {
        let stochastic = uniform_stochastic_matrix(&graph)?;
        Ok(Self {
            graph: Arc::new(graph),
            sqrtstochastic: stochastic.map(f64::sqrt),
            uniform: true,
        })
    }

    /// Szegedy walk over a caller-supplied column-stochastic matrix.
    ///
    /// Shape and sign are checked here; column sums are checked against the
    /// configured tolerance when a dynamics instance is built.
    pub fn with_stochastic<G: WalkGraph + 'static>(
        graph: G,
        stochastic: &CsrMatrix<f64>,
    ) -> QwResult<Self> {
        check_stochastic_shape(stochastic, graph.vertex_count())?;
        Ok(Self {
            graph: Arc::new(graph),
            sqrtstochastic: stochastic.map(f64::sqrt),
            uniform: false,
        })
    }

    /// Element-wise square root of the stochastic matrix.
    pub fn sqrtstochastic(&self) -> &CsrMatrix<f64> {
        &self.sqrtstochastic
    }
}

/// The reflections `(R1, R2)` for a square-root stochastic matrix.
pub fn walk_operators(
    sqrtstochastic: &CsrMatrix<f64>,
) -> QwResult<(CsrMatrix<f64>, CsrMatrix<f64>)> {
    let n = sqrtstochastic.rows();
    let columns = sqrtstochastic.transpose();

    let mut blocks = Vec::with_capacity(n);
    let mut scattered = Vec::new();
    for x in 0..n {
        let column: Vec<(usize, f64)> = columns.row(x).collect();
        let mut projector = Vec::with_capacity(column.len() * column.len());
        for &(i, a) in &column {
            for &(j, b) in &column {
                projector.push((i, j, 2.0 * a * b));
                scattered.push((i * n + x, j * n + x, 2.0 * a * b));
            }
        }
        blocks.push(CsrMatrix::from_triplets(n, n, projector)?);
    }

    let dimension = n * n;
    let identity = CsrMatrix::identity(dimension);
    let r1 = CsrMatrix::block_diag(&blocks).sub(&identity)?;
    let r2 = CsrMatrix::from_triplets(dimension, dimension, scattered)?.sub(&identity)?;
    debug!(
        order = n,
        nnz_r1 = r1.nnz(),
        nnz_r2 = r2.nnz(),
        "built szegedy walk operators"
    );
    Ok((r1, r2))
}

/// The oracles `(Q1, Q2) = (D ⊗ I, I ⊗ D)` marking `marked` in a graph of
/// order `n`.
pub fn oracle_operators(marked: &[usize], n: usize) -> (CsrMatrix<f64>, CsrMatrix<f64>) {
    let diagonal: Vec<f64> = (0..n)
        .map(|v| if marked.contains(&v) { -1.0 } else { 1.0 })
        .collect();
    let d = CsrMatrix::from_diagonal(&diagonal);
    let identity = CsrMatrix::identity(n);
    (d.kron(&identity), identity.kron(&d))
}

fn check_operator(operator: &CsrMatrix<f64>, dimension: usize) -> QwResult<()> {
    let (rows, cols) = operator.shape();
    if rows != cols {
        return Err(ConfigurationError::NotSquare {
            name: "szegedy operator",
            rows,
            cols,
        }
        .into());
    }
    if rows != dimension {
        return Err(ConfigurationError::DimensionMismatch {
            name: "szegedy operator",
            expected: dimension,
            got: rows,
        }
        .into());
    }
    Ok(())
}

impl WalkModel for Szegedy {
    type Amplitude = f64;
    type Parameters = SzegedyParameters;

    const NAME: &'static str = "szegedy";
    const TIME_MODEL: TimeModel = TimeModel::Discrete;

    fn graph(&self) -> &SharedGraph {
        &self.graph
    }

    fn state_dimension(&self) -> usize {
        let n = self.vertex_count();
        n * n
    }

    fn default_parameters(&self, _config: &EngineConfig) -> QwResult<SzegedyParameters> {
        let (r1, r2) = walk_operators(&self.sqrtstochastic)?;
        Ok(SzegedyParameters {
            operators: [r1, r2],
        })
    }

    fn validate(
        &self,
        parameters: &SzegedyParameters,
        marked: Option<&MarkedSet>,
        config: &EngineConfig,
    ) -> QwResult<()> {
        if !self.uniform {
            let stochastic = self.sqrtstochastic.map(|v| v * v);
            check_column_sums(&stochastic, config.stochastic_tolerance)?;
        }
        for operator in &parameters.operators {
            check_operator(operator, self.state_dimension())?;
        }
        if let Some(marked) = marked {
            check_marked(marked, self.vertex_count())?;
        }
        Ok(())
    }

    fn step(&self, parameters: &SzegedyParameters, state: &Array1<f64>) -> QwResult<Array1<f64>> {
        let [first, second] = &parameters.operators;
        let half = first.mul_vec(state)?;
        Ok(second.mul_vec(&half)?)
    }

    fn measure(&self, state: &Array1<f64>) -> Array1<f64> {
        let n = self.vertex_count();
        Array1::from_shape_fn(n, |x| {
            state
                .slice(s![x * n..(x + 1) * n])
                .iter()
                .map(|a| a * a)
                .sum::<f64>()
        })
    }

    /// `ψ[x·n + y] = √S[y, x] / √n`: every vertex equally likely, each
    /// spreading over its outgoing arcs.
    fn initial_state(&self) -> Array1<f64> {
        let n = self.vertex_count();
        let norm = (n as f64).sqrt();
        let mut state = Array1::zeros(n * n);
        for (y, x, value) in self.sqrtstochastic.iter() {
            state[x * n + y] = value / norm;
        }
        state
    }
}

impl SearchModel for Szegedy {
    fn search_parameters(
        &self,
        marked: &MarkedSet,
        _config: &EngineConfig,
    ) -> QwResult<SzegedyParameters> {
        let n = self.vertex_count();
        let (r1, r2) = walk_operators(&self.sqrtstochastic)?;
        let (q1, q2) = oracle_operators(marked.vertices(), n);
        Ok(SzegedyParameters {
            operators: [r1.matmul(&q1)?, r2.matmul(&q2)?],
        })
    }

    /// Right-multiplies the difference oracle `Q_old·Q_new` into both step
    /// factors. Oracles are diagonal involutions, so this equals `R·Q_new`.
    fn patch_marked(
        &self,
        parameters: &SzegedyParameters,
        old: &MarkedSet,
        new: &MarkedSet,
    ) -> QwResult<SzegedyParameters> {
        let changed = old.symmetric_difference(new);
        let (q1, q2) = oracle_operators(&changed, self.vertex_count());
        let [first, second] = &parameters.operators;
        Ok(SzegedyParameters {
            operators: [first.matmul(&q1)?, second.matmul(&q2)?],
        })
    }
}
