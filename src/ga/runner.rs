//! GA evolutionary loop execution.
//!
//! [`SearchState`] holds everything a run mutates: the population, the
//! generator, the best tour so far, and the history. Each
//! [`step`](SearchState::step) consumes the state and returns the next one,
//! so the loop can be driven and inspected generation by generation.
//! [`GaRunner`] drives a state from initialization to the generation budget.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::GaConfig;
use super::operators::{inversion_mutation, order_crossover, swap_mutation};
use super::selection::tournament;
use super::types::{GenerationStats, SearchPhase};
use crate::error::Result;
use crate::geo::LocationSet;
use crate::graph::WeightedGraph;
use crate::random::rng_from_option;
use crate::tour::tour_length_in;

const PROGRESS_INTERVAL: usize = 50;

/// Result of a GA run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaResult {
    /// Best tour found, as location names. The return to the first
    /// location is implicit.
    pub best_tour: Vec<String>,

    /// Best tour found, as location indices.
    pub best_order: Vec<usize>,

    /// Closed length of `best_tour` in kilometres.
    pub best_distance: f64,

    /// Number of generations executed.
    pub generations: usize,

    /// Whether the run was cancelled before the budget was spent.
    pub cancelled: bool,

    /// One entry per executed generation.
    pub history: Vec<GenerationStats>,
}

impl GaResult {
    /// `(best, average)` length pairs, one per generation.
    pub fn history_pairs(&self) -> Vec<(f64, f64)> {
        self.history
            .iter()
            .map(|s| (s.best_distance, s.average_distance))
            .collect()
    }
}

/// Mutable state of one GA run.
///
/// Owns its population, its random generator, and the running best, so
/// concurrent runs never share anything.
#[derive(Debug, Clone)]
pub struct SearchState<'a, R: Rng = StdRng> {
    locations: &'a LocationSet,
    graph: WeightedGraph,
    config: GaConfig,
    rng: R,
    phase: SearchPhase,
    generation: usize,
    population: Vec<Vec<usize>>,
    best_order: Vec<usize>,
    best_distance: f64,
    history: Vec<GenerationStats>,
}

impl<'a, R: Rng> SearchState<'a, R> {
    /// Validates `config`, then creates the initial random population.
    ///
    /// Fails with `InvalidConfiguration` before touching the generator, or
    /// with `InsufficientLocations` for fewer than two locations.
    pub fn new(locations: &'a LocationSet, config: GaConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        locations.ensure_solvable()?;
        trace!("ga: phase {:?}", SearchPhase::Initializing);

        let n = locations.len();
        let population = (0..config.population_size)
            .map(|_| {
                let mut tour: Vec<usize> = (0..n).collect();
                tour.shuffle(&mut rng);
                tour
            })
            .collect();

        Ok(Self {
            locations,
            graph: WeightedGraph::complete(locations),
            history: Vec::new(),
            config,
            rng,
            phase: SearchPhase::Evaluating,
            generation: 0,
            population,
            best_order: Vec::new(),
            best_distance: f64::INFINITY,
        })
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Number of completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn is_elapsed(&self) -> bool {
        self.phase == SearchPhase::Elapsed
    }

    pub fn population(&self) -> &[Vec<usize>] {
        &self.population
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Best tour seen so far; empty before the first generation.
    pub fn best_order(&self) -> &[usize] {
        &self.best_order
    }

    /// Length of [`best_order`](Self::best_order); infinite before the
    /// first generation.
    pub fn best_distance(&self) -> f64 {
        self.best_distance
    }

    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Closed lengths of the current population, in population order.
    pub fn evaluate(&self) -> Vec<f64> {
        let graph = &self.graph;

        #[cfg(feature = "parallel")]
        {
            if self.config.parallel {
                return self
                    .population
                    .par_iter()
                    .map(|tour| tour_length_in(tour, graph))
                    .collect();
            }
        }

        self.population
            .iter()
            .map(|tour| tour_length_in(tour, graph))
            .collect()
    }

    /// Runs one generation: evaluate, record statistics, select, and
    /// reproduce into the next population.
    ///
    /// Returns the state unchanged once the budget is spent.
    pub fn step(mut self) -> Self {
        if self.is_elapsed() {
            return self;
        }

        self.phase = SearchPhase::Evaluating;
        let lengths = self.evaluate();
        self.record(&lengths);

        self.phase = SearchPhase::Selecting;
        trace!("ga: generation {} phase {:?}", self.generation, self.phase);
        let mut ranked: Vec<usize> = (0..lengths.len()).collect();
        ranked.sort_by(|&a, &b| lengths[a].total_cmp(&lengths[b]));

        self.phase = SearchPhase::Reproducing;
        trace!("ga: generation {} phase {:?}", self.generation, self.phase);
        self.population = self.reproduce(&lengths, &ranked);

        self.generation += 1;
        self.phase = if self.generation >= self.config.generations {
            SearchPhase::Elapsed
        } else {
            SearchPhase::Evaluating
        };
        self
    }

    /// Updates the running best (strict improvement only) and appends this
    /// generation's statistics.
    fn record(&mut self, lengths: &[f64]) {
        let mut best_idx = 0;
        for (idx, len) in lengths.iter().enumerate() {
            if *len < lengths[best_idx] {
                best_idx = idx;
            }
        }
        let generation_best = lengths[best_idx];

        if generation_best < self.best_distance {
            self.best_distance = generation_best;
            self.best_order = self.population[best_idx].clone();
        }

        let average_distance = lengths.iter().sum::<f64>() / lengths.len() as f64;
        self.history.push(GenerationStats {
            generation: self.generation,
            best_distance: self.best_distance,
            generation_best,
            average_distance,
        });

        let last = self.generation + 1 == self.config.generations;
        if self.generation % PROGRESS_INTERVAL == 0 || last {
            debug!(
                "ga: generation {:4} | best {:.2} km | best ever {:.2} km | avg {:.2} km",
                self.generation, generation_best, self.best_distance, average_distance
            );
        }
    }

    /// Elites first, then children from tournament-selected parents until
    /// the population is full again.
    ///
    /// Each crossover pair mutates its first child by swap and its second
    /// by inversion, each with probability `mutation_rate`.
    fn reproduce(&mut self, lengths: &[f64], ranked: &[usize]) -> Vec<Vec<usize>> {
        let size = self.config.population_size;
        let rate = self.config.mutation_rate;
        let k = self.config.tournament_size;

        let mut next: Vec<Vec<usize>> = Vec::with_capacity(size + 1);
        next.extend(
            ranked[..self.config.elite_size]
                .iter()
                .map(|&idx| self.population[idx].clone()),
        );

        while next.len() < size {
            let p1 = tournament(lengths, k, &mut self.rng);
            let p2 = tournament(lengths, k, &mut self.rng);

            let (mut child1, mut child2) =
                order_crossover(&self.population[p1], &self.population[p2], &mut self.rng);

            if self.rng.random::<f64>() < rate {
                swap_mutation(&mut child1, &mut self.rng);
            }
            if self.rng.random::<f64>() < rate {
                inversion_mutation(&mut child2, &mut self.rng);
            }

            next.push(child1);
            next.push(child2);
        }

        next.truncate(size);
        next
    }

    /// Consumes the state and produces the result.
    ///
    /// A state stopped before its first generation is evaluated once so the
    /// result still carries a valid tour.
    pub fn finish(mut self) -> Result<GaResult> {
        if self.best_order.is_empty() {
            let lengths = self.evaluate();
            if let Some((idx, &len)) = lengths
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.total_cmp(b.1))
            {
                self.best_distance = len;
                self.best_order = self.population[idx].clone();
            }
        }

        let best_tour = self.locations.names(&self.best_order)?;
        Ok(GaResult {
            best_tour,
            best_order: self.best_order,
            best_distance: self.best_distance,
            generations: self.generation,
            cancelled: self.generation < self.config.generations,
            history: self.history,
        })
    }
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```
/// use u_tsp::ga::{GaConfig, GaRunner};
/// use u_tsp::geo::{Location, LocationSet};
///
/// let cities = LocationSet::new(vec![
///     Location::new("Paris", 48.8566, 2.3522),
///     Location::new("Lyon", 45.7640, 4.8357),
///     Location::new("Marseille", 43.2965, 5.3698),
///     Location::new("Bordeaux", 44.8378, -0.5792),
///     Location::new("Lille", 50.6292, 3.0573),
/// ])
/// .unwrap();
///
/// let config = GaConfig::fast().with_generations(30).with_seed(42);
/// let result = GaRunner::run(&cities, &config).unwrap();
/// assert_eq!(result.best_tour.len(), 5);
/// assert_eq!(result.history.len(), 30);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA with a generator seeded from `config.seed`.
    pub fn run(locations: &LocationSet, config: &GaConfig) -> Result<GaResult> {
        Self::run_with_cancel(locations, config, None)
    }

    /// Runs the GA with a caller-supplied generator; `config.seed` is
    /// ignored.
    pub fn run_with_rng<R: Rng>(
        locations: &LocationSet,
        config: &GaConfig,
        rng: R,
    ) -> Result<GaResult> {
        Self::drive(SearchState::new(locations, config.clone(), rng)?, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// The flag is checked between generations only; a cancelled run
    /// returns the best tour found so far.
    pub fn run_with_cancel(
        locations: &LocationSet,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult> {
        // Validate before drawing entropy for an unseeded generator.
        config.validate()?;
        let rng = rng_from_option(config.seed);
        Self::drive(SearchState::new(locations, config.clone(), rng)?, cancel)
    }

    fn drive<R: Rng>(
        mut state: SearchState<'_, R>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult> {
        let config = state.config();
        info!(
            "ga: {} locations, population {}, generations {}, mutation {}, elites {}, tournament {}",
            state.locations.len(),
            config.population_size,
            config.generations,
            config.mutation_rate,
            config.elite_size,
            config.tournament_size
        );

        while !state.is_elapsed() {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    info!("ga: cancelled after {} generations", state.generation());
                    break;
                }
            }
            state = state.step();
        }

        let result = state.finish()?;
        info!("ga: best tour {:.2} km", result.best_distance);
        Ok(result)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Location;
    use crate::random::create_rng;
    use crate::tour::{is_permutation, tour_length};
    use crate::TspError;
    use std::collections::HashSet;

    fn square() -> LocationSet {
        LocationSet::new(vec![
            Location::new("A", 0.0, 0.0),
            Location::new("B", 0.0, 1.0),
            Location::new("C", 1.0, 1.0),
            Location::new("D", 1.0, 0.0),
        ])
        .unwrap()
    }

    fn cities() -> LocationSet {
        LocationSet::new(vec![
            Location::new("Paris", 48.8566, 2.3522),
            Location::new("Lyon", 45.7640, 4.8357),
            Location::new("Marseille", 43.2965, 5.3698),
            Location::new("Toulouse", 43.6047, 1.4442),
            Location::new("Nice", 43.7102, 7.2620),
            Location::new("Nantes", 47.2184, -1.5536),
            Location::new("Strasbourg", 48.5734, 7.7521),
            Location::new("Montpellier", 43.6108, 3.8767),
            Location::new("Bordeaux", 44.8378, -0.5792),
            Location::new("Lille", 50.6292, 3.0573),
        ])
        .unwrap()
    }

    fn square_config() -> GaConfig {
        GaConfig::default()
            .with_population_size(10)
            .with_generations(20)
            .with_mutation_rate(0.2)
            .with_elite_size(2)
            .with_tournament_size(3)
            .with_seed(42)
            .with_parallel(false)
    }

    #[test]
    fn test_square_converges_to_perimeter() {
        let set = square();
        let perimeter = tour_length(&[0, 1, 2, 3], &set).unwrap();
        let result = GaRunner::run(&set, &square_config()).unwrap();

        assert!(
            (result.best_distance - perimeter).abs() < 1e-6,
            "expected perimeter {perimeter}, got {}",
            result.best_distance
        );
        assert_eq!(result.generations, 20);
        assert!(!result.cancelled);
    }

    #[test]
    fn test_best_tour_is_permutation_and_matches_distance() {
        let set = cities();
        let config = GaConfig::fast().with_generations(50).with_seed(3);
        let result = GaRunner::run(&set, &config).unwrap();

        assert!(is_permutation(&result.best_order, set.len()));
        let unique: HashSet<&String> = result.best_tour.iter().collect();
        assert_eq!(unique.len(), set.len());

        let evaluated = tour_length(&result.best_order, &set).unwrap();
        assert!((evaluated - result.best_distance).abs() < 1e-6);
    }

    #[test]
    fn test_history_best_is_non_increasing() {
        let set = cities();
        let config = GaConfig::fast().with_generations(80).with_seed(11);
        let result = GaRunner::run(&set, &config).unwrap();

        assert_eq!(result.history.len(), 80);
        for window in result.history.windows(2) {
            assert!(
                window[1].best_distance <= window[0].best_distance,
                "best distance increased: {} -> {}",
                window[0].best_distance,
                window[1].best_distance
            );
        }
        for stats in &result.history {
            assert!(stats.best_distance <= stats.generation_best);
            assert!(stats.generation_best <= stats.average_distance + 1e-9);
        }
        assert_eq!(
            result.history.last().unwrap().best_distance,
            result.best_distance
        );
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let set = cities();
        let config = GaConfig::fast().with_generations(40).with_seed(1234);
        let a = GaRunner::run(&set, &config).unwrap();
        let b = GaRunner::run(&set, &config).unwrap();

        assert_eq!(a.best_tour, b.best_tour);
        assert_eq!(a.best_distance.to_bits(), b.best_distance.to_bits());
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_injected_rng_matches_seeded_run() {
        let set = cities();
        let config = GaConfig::fast().with_generations(10).with_seed(5);
        let seeded = GaRunner::run(&set, &config).unwrap();
        let injected = GaRunner::run_with_rng(&set, &config, create_rng(5)).unwrap();
        assert_eq!(seeded.best_order, injected.best_order);
        assert_eq!(seeded.history, injected.history);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_evaluation_does_not_change_results() {
        let set = cities();
        let config = GaConfig::fast().with_generations(30).with_seed(9);
        let sequential = GaRunner::run(&set, &config.clone().with_parallel(false)).unwrap();
        let parallel = GaRunner::run(&set, &config.with_parallel(true)).unwrap();
        assert_eq!(sequential.best_order, parallel.best_order);
        assert_eq!(sequential.history, parallel.history);
    }

    #[test]
    fn test_elites_survive_each_generation() {
        let set = cities();
        let config = GaConfig::default()
            .with_population_size(20)
            .with_generations(15)
            .with_elite_size(4)
            .with_tournament_size(3)
            .with_mutation_rate(0.5)
            .with_parallel(false);
        let mut state = SearchState::new(&set, config, create_rng(77)).unwrap();

        while !state.is_elapsed() {
            let lengths = state.evaluate();
            let mut ranked: Vec<usize> = (0..lengths.len()).collect();
            ranked.sort_by(|&a, &b| lengths[a].total_cmp(&lengths[b]));
            let elites: Vec<Vec<usize>> = ranked[..4]
                .iter()
                .map(|&i| state.population()[i].clone())
                .collect();

            state = state.step();

            assert_eq!(state.population().len(), 20);
            assert_eq!(&state.population()[..4], elites.as_slice());
        }
        assert_eq!(state.generation(), 15);
    }

    #[test]
    fn test_population_stays_valid() {
        let set = cities();
        let config = GaConfig::fast()
            .with_population_size(11)
            .with_elite_size(2)
            .with_mutation_rate(1.0);
        let mut state = SearchState::new(&set, config, create_rng(8)).unwrap();
        for _ in 0..10 {
            state = state.step();
            assert_eq!(state.population().len(), 11);
            for tour in state.population() {
                assert!(is_permutation(tour, set.len()));
            }
        }
    }

    #[test]
    fn test_phases() {
        let set = square();
        let config = square_config().with_generations(2);
        let state = SearchState::new(&set, config, create_rng(1)).unwrap();
        assert_eq!(state.phase(), SearchPhase::Evaluating);
        assert!(state.best_order().is_empty());

        let state = state.step();
        assert_eq!(state.phase(), SearchPhase::Evaluating);
        assert_eq!(state.generation(), 1);
        assert!(state.best_distance().is_finite());

        let state = state.step();
        assert_eq!(state.phase(), SearchPhase::Elapsed);

        let state = state.step();
        assert_eq!(state.generation(), 2);
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn test_two_locations() {
        let set = LocationSet::new(vec![
            Location::new("A", 0.0, 0.0),
            Location::new("B", 0.0, 1.0),
        ])
        .unwrap();
        let config = square_config().with_generations(5);
        let result = GaRunner::run(&set, &config).unwrap();
        assert_eq!(result.best_tour.len(), 2);
        assert!((result.best_distance - 2.0 * set.distance(0, 1)).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        let set = square();
        let config = square_config().with_elite_size(10);
        assert!(matches!(
            GaRunner::run(&set, &config),
            Err(TspError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_insufficient_locations() {
        let set = LocationSet::new(vec![Location::new("A", 0.0, 0.0)]).unwrap();
        assert!(matches!(
            GaRunner::run(&set, &square_config()),
            Err(TspError::InsufficientLocations { found: 1 })
        ));
    }

    #[test]
    fn test_cancel_before_start() {
        let set = cities();
        let cancel = Arc::new(AtomicBool::new(true));
        let config = GaConfig::fast().with_seed(42);
        let result = GaRunner::run_with_cancel(&set, &config, Some(cancel)).unwrap();

        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert!(result.history.is_empty());
        assert!(is_permutation(&result.best_order, set.len()));
        assert!(result.best_distance.is_finite());
    }

    #[test]
    fn test_cancellation_between_generations() {
        let set = cities();
        let config = GaConfig::fast()
            .with_generations(1_000_000)
            .with_seed(42)
            .with_parallel(false);

        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_clone = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(10));
            cancel_clone.store(true, Ordering::Relaxed);
        });

        let result = GaRunner::run_with_cancel(&set, &config, Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert!(result.generations < 1_000_000);
        assert_eq!(result.history.len(), result.generations);
    }

    #[test]
    fn test_history_pairs() {
        let set = square();
        let result = GaRunner::run(&set, &square_config()).unwrap();
        let pairs = result.history_pairs();
        assert_eq!(pairs.len(), 20);
        assert_eq!(pairs[0].0, result.history[0].best_distance);
        assert_eq!(pairs[0].1, result.history[0].average_distance);
    }
}
