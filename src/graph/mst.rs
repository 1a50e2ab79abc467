//! Minimum spanning tree via Kruskal's algorithm.
//!
//! Edges are considered in `(weight, u, v)` order, so ties always resolve
//! the same way for the same graph.
//!
//! # Complexity
//! O(E log E) with E = n(n-1)/2 for a complete graph.

use petgraph::unionfind::UnionFind;

use super::{Edge, WeightedGraph};
use crate::error::{GraphStage, Result, TspError};

/// Computes a minimum spanning tree of `graph`.
///
/// Returns `vertex_count - 1` edges (empty for graphs with fewer than two
/// vertices). Fails if the graph is disconnected.
pub fn kruskal(graph: &WeightedGraph) -> Result<Vec<Edge>> {
    let n = graph.vertex_count();
    if n < 2 {
        return Ok(Vec::new());
    }

    let mut candidates: Vec<Edge> = graph.edges().collect();
    candidates.sort_by(|a, b| {
        a.weight
            .total_cmp(&b.weight)
            .then(a.u.cmp(&b.u))
            .then(a.v.cmp(&b.v))
    });

    let mut components = UnionFind::<usize>::new(n);
    let mut tree = Vec::with_capacity(n - 1);
    for edge in candidates {
        if components.union(edge.u, edge.v) {
            tree.push(edge);
            if tree.len() == n - 1 {
                break;
            }
        }
    }

    if tree.len() != n - 1 {
        return Err(TspError::graph_failure(
            GraphStage::SpanningTree,
            format!(
                "graph is disconnected: spanning forest has {} of {} edges",
                tree.len(),
                n - 1
            ),
        ));
    }
    Ok(tree)
}
