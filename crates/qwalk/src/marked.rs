//! Marked vertex sets for search dynamics.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, QwResult};

/// A validated, non-empty set of marked vertices.
///
/// Iteration order is the order the vertices were given in; measured search
/// probabilities follow the same order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkedSet {
    vertices: Vec<usize>,
}

impl MarkedSet {
    /// Validate `vertices` against a graph of `vertex_count` vertices.
    ///
    /// Fails on an empty set, an index outside `0..vertex_count`, or a
    /// repeated vertex.
    pub fn new(vertices: impl IntoIterator<Item = usize>, vertex_count: usize) -> QwResult<Self> {
        let vertices: Vec<usize> = vertices.into_iter().collect();
        if vertices.is_empty() {
            return Err(ConfigurationError::EmptyMarkedSet.into());
        }
        let mut seen = vec![false; vertex_count];
        for &vertex in &vertices {
            if vertex >= vertex_count {
                return Err(ConfigurationError::VertexOutOfRange {
                    vertex,
                    vertex_count,
                }
                .into());
            }
            if std::mem::replace(&mut seen[vertex], true) {
                return Err(ConfigurationError::DuplicateVertex(vertex).into());
            }
        }
        Ok(Self { vertices })
    }

    /// Marked vertices in iteration order.
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// Number of marked vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false for a validated set.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// True if `vertex` is marked.
    pub fn contains(&self, vertex: usize) -> bool {
        self.vertices.contains(&vertex)
    }

    /// Iterate the marked vertices.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.vertices.iter().copied()
    }

    /// Set equality, ignoring order.
    pub fn same_vertices(&self, other: &Self) -> bool {
        self.sorted() == other.sorted()
    }

    /// Vertices marked in exactly one of the two sets, ascending.
    pub fn symmetric_difference(&self, other: &Self) -> Vec<usize> {
        let mut diff: Vec<usize> = self
            .iter()
            .filter(|v| !other.contains(*v))
            .chain(other.iter().filter(|v| !self.contains(*v)))
            .collect();
        diff.sort_unstable();
        diff
    }

    fn sorted(&self) -> Vec<usize> {
        let mut sorted = self.vertices.clone();
        sorted.sort_unstable();
        sorted
    }
}
