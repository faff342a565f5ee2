//! qwalk Demo Suite
//!
//! Search demonstrations on complete graphs for each walk model:
//!
//! - **Stochastic**: classical absorbing random walk baseline
//! - **Szegedy**: discrete-time quantum walk on the bipartite double cover
//! - **CTQW**: continuous-time walk, exact and heuristic maximisation
//!
//! The [`runners::SearchRunner`] drives all of them and collects one
//! [`runners::SearchOutcome`] per run so binaries and tests share the same path.

pub mod runners;
