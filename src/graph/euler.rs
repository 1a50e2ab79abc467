//! Eulerian circuit extraction (Hierholzer's algorithm).
//!
//! Works on an edge-list multigraph: parallel edges are distinct entries and
//! are each traversed once.

use super::Edge;
use crate::error::{GraphStage, Result, TspError};

/// Eulerian circuit over the multigraph `edges` on `vertex_count` vertices.
///
/// The walk starts at the lowest-indexed vertex that has an edge and is
/// returned as consecutive `(from, to)` pairs; the last pair ends at the
/// start vertex. An empty edge list yields an empty circuit.
///
/// Fails if any vertex has odd degree or the edges do not form a single
/// connected component.
///
/// # Complexity
/// O(V + E)
pub fn hierholzer(vertex_count: usize, edges: &[Edge]) -> Result<Vec<(usize, usize)>> {
    if edges.is_empty() {
        return Ok(Vec::new());
    }

    let mut adjacency: Vec<Vec<(usize, usize)>> = vec![Vec::new(); vertex_count];
    for (id, e) in edges.iter().enumerate() {
        if e.u >= vertex_count || e.v >= vertex_count {
            return Err(TspError::graph_failure(
                GraphStage::EulerianCircuit,
                format!("edge ({}, {}) references a missing vertex", e.u, e.v),
            ));
        }
        adjacency[e.u].push((e.v, id));
        adjacency[e.v].push((e.u, id));
    }

    if let Some(v) = adjacency.iter().position(|adj| adj.len() % 2 == 1) {
        return Err(TspError::graph_failure(
            GraphStage::EulerianCircuit,
            format!("vertex {v} has odd degree {}", adjacency[v].len()),
        ));
    }

    let start = adjacency
        .iter()
        .position(|adj| !adj.is_empty())
        .unwrap_or_default();

    let mut used = vec![false; edges.len()];
    let mut cursor = vec![0usize; vertex_count];
    let mut stack = vec![start];
    let mut walk = Vec::with_capacity(edges.len() + 1);

    while let Some(&v) = stack.last() {
        while cursor[v] < adjacency[v].len() && used[adjacency[v][cursor[v]].1] {
            cursor[v] += 1;
        }
        if cursor[v] == adjacency[v].len() {
            walk.push(v);
            stack.pop();
        } else {
            let (next, id) = adjacency[v][cursor[v]];
            used[id] = true;
            stack.push(next);
        }
    }

    if walk.len() != edges.len() + 1 {
        return Err(TspError::graph_failure(
            GraphStage::EulerianCircuit,
            format!(
                "multigraph is disconnected: circuit covers {} of {} edges",
                walk.len().saturating_sub(1),
                edges.len()
            ),
        ));
    }

    walk.reverse();
    Ok(walk.windows(2).map(|w| (w[0], w[1])).collect())
}
