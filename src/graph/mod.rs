//! Weighted graph over a location set and the graph algorithms the
//! Christofides pipeline depends on.
//!
//! Vertices are indices into the [`LocationSet`]; edges are flat
//! `(u, v, weight)` records, so spanning trees, matchings, and multigraphs
//! are plain edge lists with no shared references between them.
//!
//! # Collaborator seam
//!
//! [`GraphAlgorithms`] captures the three contracts the assembler needs.
//! [`StandardGraphAlgorithms`] is the built-in implementation:
//!
//! - [`mst`]: Kruskal with union-find
//! - [`matching`]: exact bitmask DP for small odd sets, Edmonds' blossom above
//! - [`blossom`]: general maximum-weight matching
//! - [`euler`]: Hierholzer over an edge-list multigraph

pub mod blossom;
pub mod euler;
pub mod matching;
pub mod mst;

pub use crate::error::GraphStage;

use crate::error::{Result, TspError};
use crate::geo::LocationSet;

/// An undirected weighted edge between two vertex indices.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub u: usize,
    pub v: usize,
    pub weight: f64,
}

impl Edge {
    /// Creates an edge with endpoints ordered so that `u <= v`.
    pub fn new(a: usize, b: usize, weight: f64) -> Self {
        let (u, v) = if a <= b { (a, b) } else { (b, a) };
        Self { u, v, weight }
    }

    /// The endpoint opposite `vertex`.
    pub fn other(&self, vertex: usize) -> usize {
        if self.u == vertex {
            self.v
        } else {
            self.u
        }
    }
}

/// Weighted graph stored as a dense symmetric matrix.
///
/// A non-finite weight means "no edge". [`WeightedGraph::complete`] never
/// produces one, so graphs built from a location set are always connected.
#[derive(Debug, Clone)]
pub struct WeightedGraph {
    n: usize,
    weights: Vec<f64>,
}

impl WeightedGraph {
    /// Complete graph with great-circle edge weights.
    pub fn complete(locations: &LocationSet) -> Self {
        let n = locations.len();
        let mut weights = vec![0.0; n * n];
        for a in 0..n {
            for b in (a + 1)..n {
                let d = locations.distance(a, b);
                weights[a * n + b] = d;
                weights[b * n + a] = d;
            }
        }
        Self { n, weights }
    }

    /// Graph from a row-major `n * n` weight matrix.
    ///
    /// The matrix must be symmetric; use `f64::INFINITY` for missing edges.
    pub fn from_matrix(n: usize, weights: Vec<f64>) -> Result<Self> {
        if weights.len() != n * n {
            return Err(TspError::invalid_configuration(format!(
                "weight matrix has {} entries, expected {}",
                weights.len(),
                n * n
            )));
        }
        for a in 0..n {
            for b in (a + 1)..n {
                let (ab, ba) = (weights[a * n + b], weights[b * n + a]);
                if ab != ba && !(ab.is_nan() && ba.is_nan()) {
                    return Err(TspError::invalid_configuration(format!(
                        "weight matrix is not symmetric at ({a}, {b})"
                    )));
                }
            }
        }
        Ok(Self { n, weights })
    }

    pub fn vertex_count(&self) -> usize {
        self.n
    }

    /// Weight of edge `(a, b)`.
    ///
    /// # Panics
    /// Panics if either index is out of range.
    pub fn weight(&self, a: usize, b: usize) -> f64 {
        assert!(a < self.n && b < self.n, "vertex index out of range");
        self.weights[a * self.n + b]
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        a != b && self.weight(a, b).is_finite()
    }

    /// All present edges with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.n).flat_map(move |u| {
            ((u + 1)..self.n)
                .filter(move |&v| self.has_edge(u, v))
                .map(move |v| Edge::new(u, v, self.weight(u, v)))
        })
    }
}

/// Vertices with odd degree in the multigraph given by `edges`, ascending.
pub fn odd_degree_vertices(vertex_count: usize, edges: &[Edge]) -> Vec<usize> {
    let mut degree = vec![0usize; vertex_count];
    for e in edges {
        degree[e.u] += 1;
        degree[e.v] += 1;
    }
    degree
        .iter()
        .enumerate()
        .filter(|&(_, &d)| d % 2 == 1)
        .map(|(v, _)| v)
        .collect()
}

/// Graph algorithms consumed by the Christofides assembler.
///
/// Implementations must be deterministic for a given input if callers rely
/// on reproducible tours.
pub trait GraphAlgorithms {
    /// Spanning tree of minimum total weight, as `vertex_count - 1` edges.
    fn minimum_spanning_tree(&self, graph: &WeightedGraph) -> Result<Vec<Edge>>;

    /// Minimum-weight perfect matching restricted to `vertices`.
    ///
    /// Fails if `vertices` has odd cardinality.
    fn minimum_weight_perfect_matching(
        &self,
        graph: &WeightedGraph,
        vertices: &[usize],
    ) -> Result<Vec<Edge>>;

    /// Closed walk using every edge of the multigraph exactly once, as
    /// consecutive `(from, to)` vertex pairs.
    fn eulerian_circuit(&self, vertex_count: usize, edges: &[Edge]) -> Result<Vec<(usize, usize)>>;
}

/// Built-in [`GraphAlgorithms`] implementation.
#[derive(Debug, Clone, Copy)]
pub struct StandardGraphAlgorithms {
    /// Largest odd-vertex set solved by subset DP; larger sets use the
    /// blossom algorithm. Both are optimal.
    pub exact_matching_limit: usize,
}

impl StandardGraphAlgorithms {
    pub fn new() -> Self {
        Self {
            exact_matching_limit: matching::EXACT_LIMIT,
        }
    }

    pub fn with_exact_matching_limit(mut self, limit: usize) -> Self {
        self.exact_matching_limit = limit.min(matching::EXACT_LIMIT);
        self
    }
}

impl Default for StandardGraphAlgorithms {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphAlgorithms for StandardGraphAlgorithms {
    fn minimum_spanning_tree(&self, graph: &WeightedGraph) -> Result<Vec<Edge>> {
        mst::kruskal(graph)
    }

    fn minimum_weight_perfect_matching(
        &self,
        graph: &WeightedGraph,
        vertices: &[usize],
    ) -> Result<Vec<Edge>> {
        if vertices.len() % 2 == 1 {
            return Err(TspError::graph_failure(
                GraphStage::Matching,
                format!("cannot perfectly match {} vertices", vertices.len()),
            ));
        }
        if vertices.len() <= self.exact_matching_limit {
            matching::exact(graph, vertices)
        } else {
            matching::blossom(graph, vertices)
        }
    }

    fn eulerian_circuit(&self, vertex_count: usize, edges: &[Edge]) -> Result<Vec<(usize, usize)>> {
        euler::hierholzer(vertex_count, edges)
    }
}
