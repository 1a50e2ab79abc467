//! Christofides construction heuristic.
//!
//! A deterministic, one-shot pipeline over the complete great-circle graph:
//!
//! 1. Minimum spanning tree
//! 2. Odd-degree vertices of the tree
//! 3. Minimum-weight perfect matching on those vertices
//! 4. Tree + matching merged into a multigraph (duplicates kept)
//! 5. Eulerian circuit of the multigraph
//! 6. Shortcut repeated visits into a Hamiltonian tour
//!
//! With an optimal matching the tour is at most 3/2 times the optimum,
//! since great-circle distance satisfies the triangle inequality.
//!
//! # Key Types
//!
//! - [`ChristofidesSolver`]: runs the pipeline with a pluggable
//!   [`GraphAlgorithms`](crate::graph::GraphAlgorithms) collaborator
//! - [`ChristofidesResult`]: tour, length, and intermediate artifacts
//!
//! # References
//!
//! - Christofides (1976), "Worst-case analysis of a new heuristic for the
//!   travelling salesman problem"

mod runner;

pub use runner::{shortcut, ChristofidesResult, ChristofidesSolver};
