//! Read-only graph access for walk models.
//!
//! Models only need the vertex count and the arc list of a graph. The
//! [`WalkGraph`] trait exposes exactly that and is implemented for every
//! `petgraph::Graph`, so callers keep building graphs with petgraph.
//!
//! Vertices are addressed by their 0-based petgraph node index.

use std::fmt;
use std::sync::Arc;

use petgraph::EdgeType;
use petgraph::graph::{Graph, IndexType, UnGraph};
use petgraph::visit::EdgeRef;

use qwalk_linalg::CsrMatrix;

use crate::error::{ConfigurationError, QwResult};

/// Graph view consumed by walk models.
pub trait WalkGraph: Send + Sync {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Every arc `(from, to)`. An undirected edge yields both directions, a
    /// self-loop yields one arc.
    fn arcs(&self) -> Vec<(usize, usize)>;
}

impl<N, E, Ty, Ix> WalkGraph for Graph<N, E, Ty, Ix>
where
    N: Send + Sync,
    E: Send + Sync,
    Ty: EdgeType + Send + Sync,
    Ix: IndexType + Send + Sync,
{
    fn vertex_count(&self) -> usize {
        self.node_count()
    }

    fn arcs(&self) -> Vec<(usize, usize)> {
        let mut arcs = Vec::with_capacity(2 * self.edge_count());
        for edge in self.edge_references() {
            let (from, to) = (edge.source().index(), edge.target().index());
            arcs.push((from, to));
            if !Ty::is_directed() && from != to {
                arcs.push((to, from));
            }
        }
        arcs
    }
}

impl<G: WalkGraph + ?Sized> WalkGraph for Arc<G> {
    fn vertex_count(&self) -> usize {
        (**self).vertex_count()
    }

    fn arcs(&self) -> Vec<(usize, usize)> {
        (**self).arcs()
    }
}

impl fmt::Debug for dyn WalkGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkGraph")
            .field("vertex_count", &self.vertex_count())
            .finish_non_exhaustive()
    }
}

/// Shared handle to the graph a model was built on.
pub type SharedGraph = Arc<dyn WalkGraph>;

/// Adjacency matrix: `A[from, to]` counts the arcs `from → to`.
///
/// An arc endpoint outside `0..vertex_count` is a configuration error.
pub fn adjacency_matrix(graph: &dyn WalkGraph) -> QwResult<CsrMatrix<f64>> {
    let n = graph.vertex_count();
    let arcs = graph.arcs();
    if let Some(vertex) = arcs
        .iter()
        .flat_map(|&(from, to)| [from, to])
        .find(|&v| v >= n)
    {
        return Err(ConfigurationError::VertexOutOfRange {
            vertex,
            vertex_count: n,
        }
        .into());
    }
    let triplets = arcs.into_iter().map(|(from, to)| (from, to, 1.0));
    Ok(CsrMatrix::from_triplets(n, n, triplets)?)
}

/// Graph Laplacian `L = D - A` with `D` the out-degree matrix.
pub fn laplacian_matrix(graph: &dyn WalkGraph) -> QwResult<CsrMatrix<f64>> {
    let adjacency = adjacency_matrix(graph)?;
    let degrees = CsrMatrix::from_diagonal(&adjacency.row_sums());
    Ok(degrees.sub(&adjacency)?)
}

/// Column-stochastic matrix of the uniform random walk:
/// `S[to, from] = A[from, to] / outdeg(from)`.
///
/// Every vertex needs at least one outgoing arc.
pub fn uniform_stochastic_matrix(graph: &dyn WalkGraph) -> QwResult<CsrMatrix<f64>> {
    let n = graph.vertex_count();
    let adjacency = adjacency_matrix(graph)?;
    let degrees = adjacency.row_sums();
    if let Some(isolated) = degrees.iter().position(|&d| d == 0.0) {
        return Err(ConfigurationError::IsolatedVertex(isolated).into());
    }
    let triplets = adjacency
        .iter()
        .map(|(from, to, weight)| (to, from, weight / degrees[from]));
    Ok(CsrMatrix::from_triplets(n, n, triplets)?)
}

/// Complete graph `K_n` without self-loops.
pub fn complete_graph(n: usize) -> UnGraph<(), ()> {
    let edges = (0..n).flat_map(|i| ((i + 1)..n).map(move |j| (i as u32, j as u32)));
    with_order(n, edges)
}

/// Cycle graph `C_n`; for `n < 3` this is the path `P_n`.
pub fn cycle_graph(n: usize) -> UnGraph<(), ()> {
    if n < 3 {
        return path_graph(n);
    }
    let edges = (0..n).map(|i| (i as u32, ((i + 1) % n) as u32));
    with_order(n, edges)
}

/// Path graph `P_n`.
pub fn path_graph(n: usize) -> UnGraph<(), ()> {
    let edges = (1..n).map(|i| ((i - 1) as u32, i as u32));
    with_order(n, edges)
}

fn with_order(n: usize, edges: impl IntoIterator<Item = (u32, u32)>) -> UnGraph<(), ()> {
    let mut graph = UnGraph::with_capacity(n, 0);
    for _ in 0..n {
        graph.add_node(());
    }
    graph.extend_with_edges(edges);
    graph
}
