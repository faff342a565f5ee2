//! Continuous-time quantum walk.
//!
//! The state evolves as `ψ(t) = exp(i·H·t)·ψ(0)` with `H = γ·M`, where `M` is
//! the adjacency matrix or the Laplacian of the graph and `γ` the jumping
//! rate. A dense Hamiltonian is exponentiated directly; a sparse one only
//! ever has the exponential's action computed, through Lanczos.
//!
//! Search adds the projectors onto the marked vertices to the diagonal, with
//! the sign that puts the oracle on the same spectral edge as the uniform
//! state: `γ·A + Σ|m⟩⟨m|` and `γ·L - Σ|m⟩⟨m|`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use qwalk_linalg::{
    CsrMatrix, EigenConfig, KrylovConfig, expm_multiply, spectral_radius, unitary_propagator,
};

use crate::config::EngineConfig;
use crate::error::{ConfigurationError, QwError, QwResult};
use crate::graph::{SharedGraph, WalkGraph, adjacency_matrix, laplacian_matrix};
use crate::marked::MarkedSet;
use crate::model::{SearchModel, TimeModel, WalkModel, check_marked};

/// Which graph matrix generates the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CtqwMatrix {
    /// Adjacency matrix `A`.
    #[default]
    Adjacency,
    /// Laplacian `L = D - A`.
    Laplacian,
}

impl CtqwMatrix {
    /// Sign of the marked-vertex projectors in a search Hamiltonian.
    fn oracle_sign(self) -> f64 {
        match self {
            CtqwMatrix::Adjacency => 1.0,
            CtqwMatrix::Laplacian => -1.0,
        }
    }

    /// The selected matrix of `graph`.
    pub fn of(self, graph: &dyn WalkGraph) -> QwResult<CsrMatrix<f64>> {
        match self {
            CtqwMatrix::Adjacency => adjacency_matrix(graph),
            CtqwMatrix::Laplacian => laplacian_matrix(graph),
        }
    }
}

impl fmt::Display for CtqwMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CtqwMatrix::Adjacency => write!(f, "adjacency"),
            CtqwMatrix::Laplacian => write!(f, "laplacian"),
        }
    }
}

impl FromStr for CtqwMatrix {
    type Err = QwError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "adjacency" => Ok(CtqwMatrix::Adjacency),
            "laplacian" => Ok(CtqwMatrix::Laplacian),
            _ => Err(ConfigurationError::UnknownHamiltonian(s.to_string()).into()),
        }
    }
}

/// Storage form of a Hamiltonian, which decides the evolution path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HamiltonianStorage {
    /// Dense matrix, evolved by the full exponential.
    Dense,
    /// Sparse matrix, evolved by the Krylov exponential action.
    #[default]
    Sparse,
}

/// A real symmetric Hamiltonian.
#[derive(Debug, Clone, PartialEq)]
pub enum Hamiltonian {
    /// Dense storage.
    Dense(Array2<f64>),
    /// Sparse storage.
    Sparse(CsrMatrix<f64>),
}

impl Hamiltonian {
    /// Store `matrix` in the requested form.
    pub fn from_sparse(matrix: CsrMatrix<f64>, storage: HamiltonianStorage) -> Self {
        match storage {
            HamiltonianStorage::Dense => Hamiltonian::Dense(matrix.to_dense()),
            HamiltonianStorage::Sparse => Hamiltonian::Sparse(matrix),
        }
    }

    /// Storage form.
    pub fn storage(&self) -> HamiltonianStorage {
        match self {
            Hamiltonian::Dense(_) => HamiltonianStorage::Dense,
            Hamiltonian::Sparse(_) => HamiltonianStorage::Sparse,
        }
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Hamiltonian::Dense(h) => h.dim(),
            Hamiltonian::Sparse(h) => h.shape(),
        }
    }

    /// True if `|H[i, j] - H[j, i]| <= tolerance` everywhere.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        match self {
            Hamiltonian::Dense(h) => {
                let (rows, cols) = h.dim();
                rows == cols
                    && (0..rows).all(|i| {
                        (i + 1..cols).all(|j| (h[[i, j]] - h[[j, i]]).abs() <= tolerance)
                    })
            }
            Hamiltonian::Sparse(h) => h.is_symmetric(tolerance),
        }
    }

    /// Dense copy.
    pub fn to_dense(&self) -> Array2<f64> {
        match self {
            Hamiltonian::Dense(h) => h.clone(),
            Hamiltonian::Sparse(h) => h.to_dense(),
        }
    }

    /// Copy with `delta` added to the listed diagonal entries.
    pub fn add_to_diagonal(&self, delta: &[(usize, f64)]) -> QwResult<Self> {
        match self {
            Hamiltonian::Dense(h) => {
                let mut h = h.clone();
                for &(i, d) in delta {
                    h[[i, i]] += d;
                }
                Ok(Hamiltonian::Dense(h))
            }
            Hamiltonian::Sparse(h) => {
                let (rows, cols) = h.shape();
                let patch =
                    CsrMatrix::from_triplets(rows, cols, delta.iter().map(|&(i, d)| (i, i, d)))?;
                Ok(Hamiltonian::Sparse(h.add(&patch)?))
            }
        }
    }

    /// `exp(i·H·t)·v`.
    pub fn evolve(
        &self,
        v: &Array1<Complex64>,
        t: f64,
        krylov: &KrylovConfig,
    ) -> QwResult<Array1<Complex64>> {
        match self {
            Hamiltonian::Dense(h) => {
                let u = unitary_propagator(h, t)?;
                if u.ncols() != v.len() {
                    return Err(ConfigurationError::DimensionMismatch {
                        name: "state",
                        expected: u.ncols(),
                        got: v.len(),
                    }
                    .into());
                }
                Ok(u.dot(v))
            }
            Hamiltonian::Sparse(h) => Ok(expm_multiply(h, v, t, krylov)?),
        }
    }
}

/// Hamiltonian of a [`Ctqw`] dynamics.
#[derive(Debug, Clone, PartialEq)]
pub struct CtqwParameters {
    /// Generator of the evolution.
    pub hamiltonian: Hamiltonian,
}

/// Default jumping rate: `1 / ρ(A)` for the adjacency matrix.
///
/// An edgeless graph has `ρ(A) = 0`; the rate falls back to `1`. The
/// Laplacian has no default rate.
pub fn default_jumping_rate(
    graph: &dyn WalkGraph,
    matrix: CtqwMatrix,
    config: &EigenConfig,
) -> QwResult<f64> {
    match matrix {
        CtqwMatrix::Adjacency => {
            let rho = spectral_radius(&adjacency_matrix(graph)?, config)?;
            if rho == 0.0 {
                warn!(
                    vertices = graph.vertex_count(),
                    "graph has no edges, using jumping rate 1"
                );
                return Ok(1.0);
            }
            Ok(1.0 / rho)
        }
        CtqwMatrix::Laplacian => Err(QwError::unsupported(
            "default jumping rate",
            "ctqw with laplacian",
        )),
    }
}

/// Continuous-time quantum walk model.
#[derive(Debug, Clone)]
pub struct Ctqw {
    graph: SharedGraph,
    matrix: CtqwMatrix,
    storage: HamiltonianStorage,
    jumping_rate: Option<f64>,
}

impl Ctqw {
    /// Walk generated by `matrix`, with sparse storage.
    pub fn new<G: WalkGraph + 'static>(graph: G, matrix: CtqwMatrix) -> Self {
        Self {
            graph: Arc::new(graph),
            matrix,
            storage: HamiltonianStorage::default(),
            jumping_rate: None,
        }
    }

    /// Walk whose matrix is given by name (`"adjacency"` or `"laplacian"`).
    pub fn with_mode<G: WalkGraph + 'static>(graph: G, mode: &str) -> QwResult<Self> {
        Ok(Self::new(graph, mode.parse()?))
    }

    /// Choose the Hamiltonian storage.
    #[must_use]
    pub fn with_storage(mut self, storage: HamiltonianStorage) -> Self {
        self.storage = storage;
        self
    }

    /// Fix the jumping rate instead of deriving it.
    #[must_use]
    pub fn with_jumping_rate(mut self, rate: f64) -> Self {
        self.jumping_rate = Some(rate);
        self
    }

    /// Generating matrix.
    pub fn matrix(&self) -> CtqwMatrix {
        self.matrix
    }

    /// Hamiltonian storage.
    pub fn storage(&self) -> HamiltonianStorage {
        self.storage
    }

    /// Rate used for search: the fixed one, or the default for the matrix.
    pub fn search_jumping_rate(&self, config: &EngineConfig) -> QwResult<f64> {
        match self.jumping_rate {
            Some(rate) => checked_rate(rate),
            None => default_jumping_rate(self.graph.as_ref(), self.matrix, &config.eigen),
        }
    }

    fn scaled_matrix(&self, rate: f64) -> QwResult<CsrMatrix<f64>> {
        Ok(self.matrix.of(self.graph.as_ref())?.scale(rate))
    }
}

fn checked_rate(rate: f64) -> QwResult<f64> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(ConfigurationError::InvalidJumpingRate(rate).into())
    }
}

impl WalkModel for Ctqw {
    type Amplitude = Complex64;
    type Parameters = CtqwParameters;

    const NAME: &'static str = "ctqw";
    const TIME_MODEL: TimeModel = TimeModel::Continuous;

    fn graph(&self) -> &SharedGraph {
        &self.graph
    }

    /// `γ·M`, with `γ = 1` unless a rate was fixed.
    fn default_parameters(&self, _config: &EngineConfig) -> QwResult<CtqwParameters> {
        let rate = checked_rate(self.jumping_rate.unwrap_or(1.0))?;
        Ok(CtqwParameters {
            hamiltonian: Hamiltonian::from_sparse(self.scaled_matrix(rate)?, self.storage),
        })
    }

    fn validate(
        &self,
        parameters: &CtqwParameters,
        marked: Option<&MarkedSet>,
        config: &EngineConfig,
    ) -> QwResult<()> {
        let (rows, cols) = parameters.hamiltonian.shape();
        if rows != cols {
            return Err(ConfigurationError::NotSquare {
                name: "hamiltonian",
                rows,
                cols,
            }
            .into());
        }
        if rows != self.vertex_count() {
            return Err(ConfigurationError::DimensionMismatch {
                name: "hamiltonian",
                expected: self.vertex_count(),
                got: rows,
            }
            .into());
        }
        if !parameters.hamiltonian.is_symmetric(config.symmetry_tolerance) {
            return Err(ConfigurationError::NotSymmetric {
                tolerance: config.symmetry_tolerance,
            }
            .into());
        }
        if let Some(marked) = marked {
            check_marked(marked, self.vertex_count())?;
        }
        Ok(())
    }

    fn evolve_to(
        &self,
        parameters: &CtqwParameters,
        state: &Array1<Complex64>,
        time: f64,
        config: &EngineConfig,
    ) -> QwResult<Array1<Complex64>> {
        parameters.hamiltonian.evolve(state, time, &config.krylov)
    }

    fn measure(&self, state: &Array1<Complex64>) -> Array1<f64> {
        state.mapv(|a| a.norm_sqr())
    }

    fn initial_state(&self) -> Array1<Complex64> {
        let n = self.vertex_count();
        Array1::from_elem(n, Complex64::new(1.0 / (n as f64).sqrt(), 0.0))
    }
}

impl SearchModel for Ctqw {
    fn search_parameters(
        &self,
        marked: &MarkedSet,
        config: &EngineConfig,
    ) -> QwResult<CtqwParameters> {
        let rate = self.search_jumping_rate(config)?;
        let sign = self.matrix.oracle_sign();
        let n = self.vertex_count();
        let oracle = CsrMatrix::from_triplets(n, n, marked.iter().map(|m| (m, m, sign)))?;
        let hamiltonian = self.scaled_matrix(rate)?.add(&oracle)?;
        debug!(
            matrix = %self.matrix,
            rate,
            nnz = hamiltonian.nnz(),
            "built ctqw search hamiltonian"
        );
        Ok(CtqwParameters {
            hamiltonian: Hamiltonian::from_sparse(hamiltonian, self.storage),
        })
    }

    fn patch_marked(
        &self,
        parameters: &CtqwParameters,
        old: &MarkedSet,
        new: &MarkedSet,
    ) -> QwResult<CtqwParameters> {
        let sign = self.matrix.oracle_sign();
        let delta: Vec<(usize, f64)> = old
            .symmetric_difference(new)
            .into_iter()
            .map(|v| (v, if new.contains(v) { sign } else { -sign }))
            .collect();
        Ok(CtqwParameters {
            hamiltonian: parameters.hamiltonian.add_to_diagonal(&delta)?,
        })
    }
}
