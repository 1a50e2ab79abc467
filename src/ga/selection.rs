//! Tournament selection.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use rand::seq::index;
use rand::Rng;

use super::types::fitness;

/// Tournament selection over evaluated tour lengths.
///
/// Samples `k` distinct population indices and returns the one with the
/// highest [`fitness`]; ties go to the earliest sampled entry. Each call is
/// an independent tournament, so the same tour can win repeatedly.
///
/// # Complexity
/// O(k) per selection
///
/// # Panics
/// Panics if `lengths` is empty or `k` is not in `1..=lengths.len()`.
pub fn tournament<R: Rng + ?Sized>(lengths: &[f64], k: usize, rng: &mut R) -> usize {
    assert!(!lengths.is_empty(), "cannot select from empty population");
    assert!(
        (1..=lengths.len()).contains(&k),
        "tournament size {k} out of range for population of {}",
        lengths.len()
    );

    let entrants = index::sample(rng, lengths.len(), k);
    let mut winner = entrants.index(0);
    let mut winner_fitness = fitness(lengths[winner]);
    for idx in entrants.iter().skip(1) {
        let f = fitness(lengths[idx]);
        if f > winner_fitness {
            winner = idx;
            winner_fitness = f;
        }
    }
    winner
}
