//! GA configuration.
//!
//! [`GaConfig`] holds every parameter that controls the evolutionary loop.

use crate::error::{Result, TspError};

/// Configuration for the genetic search.
///
/// Termination is bounded by `generations` only; there is no convergence
/// or stagnation cut-off, so a run always performs exactly that many
/// generations unless cancelled.
///
/// # Defaults
///
/// ```
/// use u_tsp::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.generations, 500);
/// assert_eq!(config.elite_size, 5);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_tsp::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_tournament_size(3)
///     .with_elite_size(10)
///     .with_mutation_rate(0.2)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of tours in the population. At least 2.
    pub population_size: usize,

    /// Number of generations to run. At least 1.
    pub generations: usize,

    /// Probability (0.0–1.0) that each child is mutated.
    ///
    /// The first child of every crossover pair may receive a swap mutation,
    /// the second an inversion mutation.
    pub mutation_rate: f64,

    /// Number of best tours copied unchanged into the next generation.
    ///
    /// Must be smaller than `population_size`.
    pub elite_size: usize,

    /// Number of distinct tours sampled per tournament.
    ///
    /// Must be in `2..=population_size`.
    pub tournament_size: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Whether to evaluate tour lengths in parallel using rayon.
    ///
    /// Has no effect unless the `parallel` feature is enabled. Results are
    /// identical either way.
    pub parallel: bool,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 500,
            mutation_rate: 0.1,
            elite_size: 5,
            tournament_size: 5,
            seed: None,
            parallel: true,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the number of elites.
    pub fn with_elite_size(mut self, n: usize) -> Self {
        self.elite_size = n;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Preset for quick runs: population 50, 100 generations.
    pub fn fast() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            elite_size: 2,
            tournament_size: 3,
            ..Self::default()
        }
    }

    /// Preset matching the defaults: population 100, 500 generations.
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Preset for quality: population 200, 1000 generations.
    pub fn quality() -> Self {
        Self {
            population_size: 200,
            generations: 1000,
            elite_size: 10,
            ..Self::default()
        }
    }

    /// Validates the configuration.
    ///
    /// Returns `InvalidConfiguration` describing the first parameter out of
    /// range.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(TspError::invalid_configuration(
                "population_size must be at least 2",
            ));
        }
        if self.generations == 0 {
            return Err(TspError::invalid_configuration(
                "generations must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(TspError::invalid_configuration(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if self.elite_size >= self.population_size {
            return Err(TspError::invalid_configuration(format!(
                "elite_size ({}) must be smaller than population_size ({})",
                self.elite_size, self.population_size
            )));
        }
        if self.tournament_size < 2 || self.tournament_size > self.population_size {
            return Err(TspError::invalid_configuration(format!(
                "tournament_size must be in 2..={}, got {}",
                self.population_size, self.tournament_size
            )));
        }
        Ok(())
    }
}
