//! Shared GA types: search phases, per-generation statistics, fitness.

/// Phase of the generation state machine.
///
/// A run moves `Initializing → (Evaluating → Selecting → Reproducing)* →
/// Elapsed`. Between generations the state always rests in `Evaluating`
/// or, once the budget is spent, in `Elapsed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchPhase {
    Initializing,
    Evaluating,
    Selecting,
    Reproducing,
    Elapsed,
}

/// Statistics recorded for one generation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Zero-based generation index.
    pub generation: usize,

    /// Best length seen so far, including this generation.
    pub best_distance: f64,

    /// Shortest tour in this generation's population.
    pub generation_best: f64,

    /// Mean tour length of this generation's population.
    pub average_distance: f64,
}

/// Fitness of a tour: the inverse of its length.
///
/// A zero-length tour cannot occur with distinct locations; it maps to
/// fitness 0 rather than dividing by zero.
pub fn fitness(length: f64) -> f64 {
    if length > 0.0 {
        1.0 / length
    } else {
        0.0
    }
}
