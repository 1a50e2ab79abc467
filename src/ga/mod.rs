//! Genetic search over tour permutations.
//!
//! Each individual is a permutation of location indices. A generation
//! evaluates every tour against a precomputed distance matrix, keeps the
//! best tours as elites, and fills the rest of the next population with
//! order-crossover children of tournament-selected parents.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, mutation, presets)
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`SearchState`]: One run's state, advanced a generation at a time
//! - [`GaResult`]: Best tour found with per-generation statistics
//!
//! # Submodules
//!
//! - [`operators`]: Order crossover, swap and inversion mutation
//! - [`selection`]: Tournament selection
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Larrañaga et al. (1999), "Genetic Algorithms for the Travelling Salesman
//!   Problem: A Review of Representations and Operators"

mod config;
pub mod operators;
mod runner;
pub mod selection;
mod types;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner, SearchState};
pub use types::{fitness, GenerationStats, SearchPhase};
