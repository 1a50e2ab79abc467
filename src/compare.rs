//! Side-by-side comparison of the Christofides construction and the
//! genetic search.
//!
//! [`compare_algorithms`] runs Christofides once, then the genetic search
//! once per configuration, timing each run with wall-clock time. Each entry
//! reports its gap to the Christofides tour, so negative gaps mean the
//! genetic search found a shorter tour.

use std::fmt;
use std::time::{Duration, Instant};

use log::info;

use crate::christofides::ChristofidesSolver;
use crate::error::Result;
use crate::ga::{GaConfig, GaRunner};
use crate::geo::LocationSet;

/// Solver that produced a [`ComparisonEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    Christofides,
    Genetic,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Christofides => f.write_str("Christofides"),
            Algorithm::Genetic => f.write_str("Genetic"),
        }
    }
}

/// One measured solver run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComparisonEntry {
    pub algorithm: Algorithm,

    /// Parameters of a genetic run; `None` for Christofides.
    pub config: Option<GaConfig>,

    /// Tour as location names.
    pub tour: Vec<String>,

    /// Closed tour length in kilometres.
    pub distance: f64,

    /// Wall-clock time of the solver call.
    pub elapsed: Duration,

    /// `(distance - christofides) / christofides * 100`.
    pub gap_percent: f64,
}

/// Results of [`compare_algorithms`]. The Christofides entry comes first,
/// followed by one genetic entry per configuration, in input order.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComparisonReport {
    entries: Vec<ComparisonEntry>,
}

impl ComparisonReport {
    /// All entries, Christofides first.
    pub fn entries(&self) -> &[ComparisonEntry] {
        &self.entries
    }

    /// The Christofides entry; `None` only for a report with no entries.
    pub fn christofides(&self) -> Option<&ComparisonEntry> {
        self.entries
            .first()
            .filter(|e| e.algorithm == Algorithm::Christofides)
    }

    /// Entries of the genetic runs.
    pub fn genetic(&self) -> &[ComparisonEntry] {
        let skip = usize::from(self.christofides().is_some());
        &self.entries[skip..]
    }

    /// Entry with the shortest tour; the earliest one on ties.
    pub fn best_distance(&self) -> Option<&ComparisonEntry> {
        self.entries
            .iter()
            .reduce(|best, e| if e.distance < best.distance { e } else { best })
    }

    /// Entry with the shortest wall-clock time; the earliest one on ties.
    pub fn fastest(&self) -> Option<&ComparisonEntry> {
        self.entries
            .iter()
            .reduce(|best, e| if e.elapsed < best.elapsed { e } else { best })
    }

    /// Writes one CSV row per entry, with a header.
    ///
    /// Genetic parameters are left blank on the Christofides row.
    #[cfg(feature = "csv")]
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<()> {
        let mut out = csv::Writer::from_writer(writer);
        for entry in &self.entries {
            out.serialize(CsvRow::from(entry))?;
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(feature = "csv")]
#[derive(serde::Serialize)]
struct CsvRow {
    algorithm: String,
    distance_km: f64,
    execution_time_s: f64,
    gap_percent: f64,
    population_size: Option<usize>,
    generations: Option<usize>,
    mutation_rate: Option<f64>,
    elite_size: Option<usize>,
    tournament_size: Option<usize>,
}

#[cfg(feature = "csv")]
impl From<&ComparisonEntry> for CsvRow {
    fn from(entry: &ComparisonEntry) -> Self {
        let config = entry.config.as_ref();
        Self {
            algorithm: entry.algorithm.to_string(),
            distance_km: entry.distance,
            execution_time_s: entry.elapsed.as_secs_f64(),
            gap_percent: entry.gap_percent,
            population_size: config.map(|c| c.population_size),
            generations: config.map(|c| c.generations),
            mutation_rate: config.map(|c| c.mutation_rate),
            elite_size: config.map(|c| c.elite_size),
            tournament_size: config.map(|c| c.tournament_size),
        }
    }
}

/// Runs Christofides, then the genetic search for each configuration.
///
/// Every configuration is validated before any solver runs.
///
/// # Errors
/// `InvalidConfiguration` for the first invalid configuration, or any error
/// either solver reports.
pub fn compare_algorithms(
    locations: &LocationSet,
    configs: &[GaConfig],
) -> Result<ComparisonReport> {
    for config in configs {
        config.validate()?;
    }
    locations.ensure_solvable()?;

    let total = configs.len() + 1;
    info!("compare: [1/{total}] christofides");
    let started = Instant::now();
    let christofides = ChristofidesSolver::solve(locations)?;
    let elapsed = started.elapsed();
    let reference = christofides.distance;

    let mut entries = Vec::with_capacity(total);
    entries.push(ComparisonEntry {
        algorithm: Algorithm::Christofides,
        config: None,
        tour: christofides.tour,
        distance: reference,
        elapsed,
        gap_percent: 0.0,
    });

    for (i, config) in configs.iter().enumerate() {
        info!(
            "compare: [{}/{total}] genetic (population {}, generations {})",
            i + 2,
            config.population_size,
            config.generations
        );
        let started = Instant::now();
        let result = GaRunner::run(locations, config)?;
        let elapsed = started.elapsed();
        let gap_percent = gap_percent(result.best_distance, reference);
        info!(
            "compare: genetic {:.2} km in {:.3} s ({:+.2}% vs christofides)",
            result.best_distance,
            elapsed.as_secs_f64(),
            gap_percent
        );

        entries.push(ComparisonEntry {
            algorithm: Algorithm::Genetic,
            config: Some(config.clone()),
            tour: result.best_tour,
            distance: result.best_distance,
            elapsed,
            gap_percent,
        });
    }

    Ok(ComparisonReport { entries })
}

fn gap_percent(distance: f64, reference: f64) -> f64 {
    if reference > 0.0 {
        (distance - reference) / reference * 100.0
    } else {
        0.0
    }
}
