//! Error types shared by every solver in the crate.

use std::fmt;

use thiserror::Error as ThisError;

/// Pipeline stage of the graph collaborator that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GraphStage {
    /// Minimum spanning tree construction.
    SpanningTree,
    /// Minimum-weight perfect matching on the odd-degree vertices.
    Matching,
    /// Eulerian circuit extraction from the merged multigraph.
    EulerianCircuit,
}

impl fmt::Display for GraphStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GraphStage::SpanningTree => "minimum spanning tree",
            GraphStage::Matching => "minimum-weight perfect matching",
            GraphStage::EulerianCircuit => "eulerian circuit",
        };
        f.write_str(name)
    }
}

/// Errors raised by location handling, tour evaluation, and both solvers.
///
/// No solver retries internally: each error is reported on the first
/// failure, before any partial result is produced.
#[derive(Debug, ThisError)]
pub enum TspError {
    /// Solver parameters out of range; detected before any computation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Fewer than two distinct locations were supplied.
    #[error("at least 2 distinct locations are required, found {found}")]
    InsufficientLocations { found: usize },

    /// A tour referenced a location that is not in the active set.
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    /// Two input records share the same name.
    #[error("duplicate location name: {0}")]
    DuplicateLocation(String),

    /// Latitude outside -90..=90 or longitude outside -180..=180.
    #[error("invalid coordinate for {name}: ({latitude}, {longitude})")]
    InvalidCoordinate {
        name: String,
        latitude: f64,
        longitude: f64,
    },

    /// The graph collaborator could not satisfy its contract.
    #[error("{stage} failed: {reason}")]
    GraphAlgorithmFailure { stage: GraphStage, reason: String },

    #[cfg(feature = "csv")]
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TspError>;

impl TspError {
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    pub fn graph_failure(stage: GraphStage, reason: impl Into<String>) -> Self {
        Self::GraphAlgorithmFailure {
            stage,
            reason: reason.into(),
        }
    }
}
