//! Heuristic travelling-salesman solvers over geographic coordinates.
//!
//! Two independent strategies work on the same [`geo::LocationSet`]:
//!
//! - **Christofides**: a deterministic construction that merges a minimum
//!   spanning tree with a minimum-weight perfect matching on its odd-degree
//!   vertices, walks an Eulerian circuit, and shortcuts repeated visits.
//!   Within 3/2 of the optimum when the matching is exact.
//! - **Genetic search**: a population of tour permutations evolved with
//!   tournament selection, order crossover, swap and inversion mutation,
//!   and elitism.
//!
//! Distances are great-circle (haversine) kilometres on a spherical Earth.
//! [`compare::compare_algorithms`] runs both and reports the gap between
//! them.
//!
//! # Features
//!
//! - `csv` (default): CSV location input ([`io`]) and CSV report export
//! - `serde`: `Serialize`/`Deserialize` on locations, configs, and results
//! - `parallel`: tour evaluation across threads with rayon

pub mod christofides;
pub mod compare;
pub mod error;
pub mod ga;
pub mod geo;
pub mod graph;
#[cfg(feature = "csv")]
pub mod io;
pub mod random;
pub mod tour;

pub use error::{Result, TspError};
