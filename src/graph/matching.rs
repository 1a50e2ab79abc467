//! Minimum-weight perfect matching on a vertex subset.
//!
//! Both strategies are optimal; [`StandardGraphAlgorithms`](super::StandardGraphAlgorithms)
//! picks one by subset size:
//!
//! - [`exact`]: dynamic programming over subsets, for up to [`EXACT_LIMIT`]
//!   vertices
//! - [`blossom`]: Edmonds' blossom algorithm, for any size

use super::blossom::max_weight_max_cardinality;
use super::{Edge, WeightedGraph};
use crate::error::{GraphStage, Result, TspError};

/// Largest vertex subset handled by [`exact`].
pub const EXACT_LIMIT: usize = 20;

/// Optimal perfect matching by subset DP.
///
/// `cost[mask]` is the cheapest way to match exactly the vertices in `mask`;
/// each step pairs the lowest unmatched vertex with every other unmatched
/// one.
///
/// # Complexity
/// O(2^k · k) time, O(2^k) space for k vertices.
pub fn exact(graph: &WeightedGraph, vertices: &[usize]) -> Result<Vec<Edge>> {
    let k = vertices.len();
    ensure_even(k)?;
    if k > EXACT_LIMIT {
        return Err(TspError::graph_failure(
            GraphStage::Matching,
            format!("{k} vertices exceed the exact matching limit of {EXACT_LIMIT}"),
        ));
    }
    if k == 0 {
        return Ok(Vec::new());
    }

    let full = (1usize << k) - 1;
    let mut cost = vec![f64::INFINITY; full + 1];
    let mut came_from = vec![(0u32, 0u8, 0u8); full + 1];
    cost[0] = 0.0;

    for mask in 0..full {
        let base = cost[mask];
        if base.is_infinite() {
            continue;
        }
        let i = (!mask).trailing_zeros() as usize;
        for j in (i + 1)..k {
            if mask & (1 << j) != 0 {
                continue;
            }
            let w = graph.weight(vertices[i], vertices[j]);
            if !w.is_finite() {
                continue;
            }
            let next = mask | (1 << i) | (1 << j);
            let candidate = base + w;
            if candidate < cost[next] {
                cost[next] = candidate;
                came_from[next] = (mask as u32, i as u8, j as u8);
            }
        }
    }

    if cost[full].is_infinite() {
        return Err(TspError::graph_failure(
            GraphStage::Matching,
            "no perfect matching exists on the odd-degree subgraph",
        ));
    }

    let mut pairs = Vec::with_capacity(k / 2);
    let mut mask = full;
    while mask != 0 {
        let (prev, i, j) = came_from[mask];
        let (a, b) = (vertices[i as usize], vertices[j as usize]);
        pairs.push(Edge::new(a, b, graph.weight(a, b)));
        mask = prev as usize;
    }
    pairs.reverse();
    Ok(pairs)
}

/// Optimal perfect matching by Edmonds' blossom algorithm.
///
/// Weights are mirrored to `max + 1 - w` and a maximum-weight matching is
/// taken among maximum-cardinality ones, which on a vertex set with a
/// perfect matching is exactly the minimum-weight perfect matching.
///
/// # Complexity
/// O(k³) time for k vertices.
pub fn blossom(graph: &WeightedGraph, vertices: &[usize]) -> Result<Vec<Edge>> {
    let k = vertices.len();
    ensure_even(k)?;
    if k == 0 {
        return Ok(Vec::new());
    }

    let mut local: Vec<(usize, usize, f64)> = Vec::with_capacity(k * (k - 1) / 2);
    let mut heaviest = 0.0f64;
    for i in 0..k {
        for j in (i + 1)..k {
            let (a, b) = (vertices[i], vertices[j]);
            if graph.has_edge(a, b) {
                let w = graph.weight(a, b);
                heaviest = heaviest.max(w);
                local.push((i, j, w));
            }
        }
    }
    for edge in &mut local {
        edge.2 = heaviest + 1.0 - edge.2;
    }

    let mate = max_weight_max_cardinality(k, &local);
    let mut pairs = Vec::with_capacity(k / 2);
    for (i, &j) in mate.iter().enumerate() {
        if j >= k {
            return Err(TspError::graph_failure(
                GraphStage::Matching,
                "no perfect matching exists on the odd-degree subgraph",
            ));
        }
        if i < j {
            let (a, b) = (vertices[i], vertices[j]);
            pairs.push(Edge::new(a, b, graph.weight(a, b)));
        }
    }
    Ok(pairs)
}

fn ensure_even(k: usize) -> Result<()> {
    if k % 2 == 1 {
        return Err(TspError::graph_failure(
            GraphStage::Matching,
            format!("cannot perfectly match {k} vertices"),
        ));
    }
    Ok(())
}
