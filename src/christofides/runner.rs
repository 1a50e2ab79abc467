//! Christofides pipeline execution.

use log::{debug, info};

use crate::error::{GraphStage, Result, TspError};
use crate::geo::LocationSet;
use crate::graph::{
    odd_degree_vertices, Edge, GraphAlgorithms, StandardGraphAlgorithms, WeightedGraph,
};
use crate::tour::{closed_route, tour_length};

/// Result of a Christofides run.
///
/// `tour`/`order` hold each location exactly once; the return edge to the
/// first location is implicit (see [`closed_tour`](Self::closed_tour)).
/// The remaining fields are intermediate artifacts kept for visualization.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChristofidesResult {
    /// Location names in visiting order.
    pub tour: Vec<String>,

    /// Location indices in visiting order.
    pub order: Vec<usize>,

    /// Closed tour length in kilometres.
    pub distance: f64,

    /// Minimum spanning tree edges.
    pub spanning_tree: Vec<Edge>,

    /// Vertices with odd degree in the spanning tree.
    pub odd_vertices: Vec<usize>,

    /// Minimum-weight perfect matching on `odd_vertices`.
    pub matching: Vec<Edge>,

    /// Eulerian circuit of tree + matching, as `(from, to)` pairs.
    pub circuit: Vec<(usize, usize)>,
}

impl ChristofidesResult {
    /// The tour with the starting location repeated at the end.
    pub fn closed_tour(&self) -> Vec<String> {
        closed_route(&self.tour)
    }
}

/// Runs the Christofides construction.
///
/// # Usage
///
/// ```
/// use u_tsp::christofides::ChristofidesSolver;
/// use u_tsp::geo::{Location, LocationSet};
///
/// let cities = LocationSet::new(vec![
///     Location::new("Paris", 48.8566, 2.3522),
///     Location::new("Lyon", 45.7640, 4.8357),
///     Location::new("Marseille", 43.2965, 5.3698),
///     Location::new("Bordeaux", 44.8378, -0.5792),
/// ])
/// .unwrap();
///
/// let result = ChristofidesSolver::solve(&cities).unwrap();
/// assert_eq!(result.tour.len(), 4);
/// assert!(result.distance > 0.0);
/// ```
pub struct ChristofidesSolver;

impl ChristofidesSolver {
    /// Runs the pipeline with [`StandardGraphAlgorithms`].
    pub fn solve(locations: &LocationSet) -> Result<ChristofidesResult> {
        Self::solve_with(locations, &StandardGraphAlgorithms::new())
    }

    /// Runs the pipeline with a caller-supplied graph collaborator.
    ///
    /// Fails with `InsufficientLocations` for fewer than two locations and
    /// with `GraphAlgorithmFailure` if any collaborator step fails. No step
    /// is retried.
    pub fn solve_with<G: GraphAlgorithms + ?Sized>(
        locations: &LocationSet,
        algorithms: &G,
    ) -> Result<ChristofidesResult> {
        locations.ensure_solvable()?;
        let n = locations.len();
        info!("christofides: {n} locations");

        let graph = WeightedGraph::complete(locations);

        let spanning_tree = algorithms.minimum_spanning_tree(&graph)?;
        let odd_vertices = odd_degree_vertices(n, &spanning_tree);
        debug!(
            "christofides: spanning tree has {} edges, {} odd-degree vertices",
            spanning_tree.len(),
            odd_vertices.len()
        );

        let matching = if odd_vertices.is_empty() {
            Vec::new()
        } else {
            algorithms.minimum_weight_perfect_matching(&graph, &odd_vertices)?
        };
        debug!("christofides: matching has {} edges", matching.len());

        let mut multigraph = Vec::with_capacity(spanning_tree.len() + matching.len());
        multigraph.extend_from_slice(&spanning_tree);
        multigraph.extend_from_slice(&matching);

        let circuit = algorithms.eulerian_circuit(n, &multigraph)?;
        debug!("christofides: eulerian circuit has {} steps", circuit.len());

        let order = shortcut(&circuit, n);
        if order.len() != n {
            return Err(TspError::graph_failure(
                GraphStage::EulerianCircuit,
                format!("circuit visits {} of {n} locations", order.len()),
            ));
        }

        let distance = tour_length(&order, locations)?;
        let tour = locations.names(&order)?;
        info!("christofides: tour length {distance:.2} km");

        Ok(ChristofidesResult {
            tour,
            order,
            distance,
            spanning_tree,
            odd_vertices,
            matching,
            circuit,
        })
    }
}

/// Hamiltonian order from an Eulerian circuit.
///
/// Walks the circuit and keeps the first visit of each vertex, skipping
/// repeats. The result is open: the closing edge back to the first vertex
/// is implicit.
pub fn shortcut(circuit: &[(usize, usize)], vertex_count: usize) -> Vec<usize> {
    let mut visited = vec![false; vertex_count];
    let mut order = Vec::with_capacity(vertex_count);
    for &(from, _) in circuit {
        if from < vertex_count && !visited[from] {
            visited[from] = true;
            order.push(from);
        }
    }
    order
}
