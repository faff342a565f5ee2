//! `qwalk`: quantum-walk dynamics on graphs.
//!
//! Evolves states under classical random walks, Szegedy discrete-time
//! quantum walks and continuous-time quantum walks (CTQW), measures them
//! against vertex subsets, and finds the runtime that best amplifies a
//! marked vertex set.
//!
//! - **Models** ([`StochasticWalk`], [`Szegedy`], [`Ctqw`]) are immutable
//!   descriptions of a walk on a `petgraph` graph.
//! - **Dynamics** ([`QwEvolution`], [`QwSearch`]) bind a model to its
//!   validated parameters; construction fails on any invalid combination.
//! - **Execution** ([`execute`] and friends) and **search maximisation**
//!   ([`maximize_search`]) are written once against the [`Dynamics`] trait.
//!
//! # Quick start
//!
//! ```rust
//! use qwalk::graph::complete_graph;
//! use qwalk::{MarkedSet, QwSearch, Runtime, Szegedy, execute_single_measured};
//!
//! let model = Szegedy::new(complete_graph(4)).unwrap();
//! let marked = MarkedSet::new([0], 4).unwrap();
//! let search = QwSearch::new(model, marked, 0.0).unwrap();
//!
//! let initial = search.initial_state();
//! let p = execute_single_measured(&search, &initial, Runtime::Steps(1)).unwrap();
//! assert!((p[0] - 25.0 / 36.0).abs() < 1e-12);
//! ```

pub mod config;
pub mod ctqw;
pub mod dynamics;
pub mod error;
pub mod execute;
pub mod graph;
pub mod marked;
pub mod model;
pub mod search;
pub mod stochastic;
pub mod szegedy;

pub use qwalk_linalg as linalg;

pub use config::{EngineConfig, SearchConfig, SearchObjective};
pub use ctqw::{
    Ctqw, CtqwMatrix, CtqwParameters, Hamiltonian, HamiltonianStorage, default_jumping_rate,
};
pub use dynamics::{Dynamics, QwEvolution, QwSearch, Runtime};
pub use error::{ConfigurationError, QwError, QwResult};
pub use execute::{
    ExecuteOptions, Execution, execute, execute_all, execute_all_measured, execute_single,
    execute_single_measured,
};
pub use graph::{SharedGraph, WalkGraph};
pub use marked::MarkedSet;
pub use model::{SearchModel, TimeModel, WalkModel};
pub use search::{MaximizeMode, SearchResult, maximize_search, objective_value};
pub use stochastic::{StochasticParameters, StochasticWalk};
pub use szegedy::{Szegedy, SzegedyParameters, oracle_operators, walk_operators};
