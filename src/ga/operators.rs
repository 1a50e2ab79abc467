//! Permutation operators for tour chromosomes.
//!
//! Tours are `&[usize]` permutations of `0..n`.
//!
//! # Crossover
//!
//! - [`order_crossover`] (OX): Davis (1985), preserves relative order
//!
//! # Mutation
//!
//! - [`swap_mutation`]: exchange two distinct positions, O(1)
//! - [`inversion_mutation`]: reverse the half-open segment `[i, j)`, O(n)
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use rand::seq::index;
use rand::Rng;

// ============================================================================
// Crossover
// ============================================================================

/// Order Crossover (OX) with random cut points.
///
/// Picks two distinct cut points `start < end`, then builds one child from
/// each parent (see [`order_crossover_at`]).
///
/// # Panics
/// Panics if parents have different lengths or fewer than 2 entries.
pub fn order_crossover<R: Rng + ?Sized>(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    assert!(n >= 2, "parents must have at least 2 entries");

    let (start, end) = distinct_sorted_pair(n, rng);
    order_crossover_at(parent1, parent2, start, end)
}

/// Order Crossover (OX) with fixed cut points.
///
/// Child 1 keeps `parent1[start..end]` in place; its remaining positions are
/// filled, starting at `end` and wrapping around, with the locations not yet
/// present, taken in `parent2`'s order starting at `end`. Child 2 is built
/// the same way with the parents swapped.
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if parents differ in length or `start..end` is out of range.
pub fn order_crossover_at(
    parent1: &[usize],
    parent2: &[usize],
    start: usize,
    end: usize,
) -> (Vec<usize>, Vec<usize>) {
    assert_eq!(parent1.len(), parent2.len(), "parents must have equal length");
    assert!(start <= end && end <= parent1.len(), "invalid cut points");

    (
        ox_build_child(parent1, parent2, start, end),
        ox_build_child(parent2, parent1, start, end),
    )
}

/// Build one OX child: keep `template[start..end]`, fill from `donor`.
fn ox_build_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    if n == 0 {
        return Vec::new();
    }
    let mut child = vec![usize::MAX; n];
    let mut present = vec![false; n];

    for i in start..end {
        child[i] = template[i];
        present[template[i]] = true;
    }

    let mut pos = end % n;
    for offset in 0..n {
        let val = donor[(end + offset) % n];
        if !present[val] {
            child[pos] = val;
            present[val] = true;
            pos = (pos + 1) % n;
        }
    }

    child
}

// ============================================================================
// Mutation
// ============================================================================

/// Swap mutation: exchange two distinct random positions.
///
/// No-op for fewer than 2 entries.
pub fn swap_mutation<R: Rng + ?Sized>(perm: &mut [usize], rng: &mut R) {
    if perm.len() < 2 {
        return;
    }
    let picks = index::sample(rng, perm.len(), 2);
    perm.swap(picks.index(0), picks.index(1));
}

/// Inversion mutation: reverse `perm[i..j]` for two distinct random
/// positions `i < j`. The end position is excluded, so adjacent picks
/// leave the tour unchanged.
///
/// No-op for fewer than 2 entries.
pub fn inversion_mutation<R: Rng + ?Sized>(perm: &mut [usize], rng: &mut R) {
    if perm.len() < 2 {
        return;
    }
    let (i, j) = distinct_sorted_pair(perm.len(), rng);
    perm[i..j].reverse();
}

// ============================================================================
// Helpers
// ============================================================================

/// Two distinct positions in `0..n`, returned in ascending order.
fn distinct_sorted_pair<R: Rng + ?Sized>(n: usize, rng: &mut R) -> (usize, usize) {
    let picks = index::sample(rng, n, 2);
    let (a, b) = (picks.index(0), picks.index(1));
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::tour::is_permutation;
    use proptest::prelude::*;

    #[test]
    fn test_ox_fixed_cuts() {
        let p1 = vec![0, 1, 2, 3, 4, 5, 6, 7];
        let p2 = vec![7, 6, 5, 4, 3, 2, 1, 0];
        let (c1, c2) = order_crossover_at(&p1, &p2, 2, 5);

        // Slice [2, 5) from p1 stays in place; the rest follows p2's order
        // starting at position 5: 2, 1, 0, 7, 6, 5, 4, 3 minus {2, 3, 4}.
        assert_eq!(c1, vec![6, 5, 2, 3, 4, 1, 0, 7]);
        assert_eq!(&c2[2..5], &p2[2..5]);
        assert!(is_permutation(&c1, 8));
        assert!(is_permutation(&c2, 8));
    }

    #[test]
    fn test_ox_identical_parents() {
        let mut rng = create_rng(42);
        let p: Vec<usize> = (0..6).collect();
        let (c1, c2) = order_crossover(&p, &p, &mut rng);
        assert_eq!(c1, p);
        assert_eq!(c2, p);
    }

    #[test]
    fn test_ox_two_elements() {
        let mut rng = create_rng(42);
        for _ in 0..20 {
            let (c1, c2) = order_crossover(&[0, 1], &[1, 0], &mut rng);
            assert!(is_permutation(&c1, 2));
            assert!(is_permutation(&c2, 2));
        }
    }

    #[test]
    #[should_panic(expected = "at least 2 entries")]
    fn test_ox_rejects_single_element() {
        let mut rng = create_rng(42);
        order_crossover(&[0], &[0], &mut rng);
    }

    #[test]
    fn test_swap_changes_exactly_two_positions() {
        let mut rng = create_rng(42);
        for _ in 0..100 {
            let original: Vec<usize> = (0..10).collect();
            let mut perm = original.clone();
            swap_mutation(&mut perm, &mut rng);
            let diffs = perm.iter().zip(&original).filter(|(a, b)| a != b).count();
            assert_eq!(diffs, 2);
            assert!(is_permutation(&perm, 10));
        }
    }

    #[test]
    fn test_inversion_reverses_a_segment() {
        let mut rng = create_rng(42);
        for _ in 0..100 {
            let original: Vec<usize> = (0..10).collect();
            let mut perm = original.clone();
            inversion_mutation(&mut perm, &mut rng);
            assert!(is_permutation(&perm, 10));
            if perm == original {
                continue;
            }

            let first = perm.iter().zip(&original).position(|(a, b)| a != b).unwrap();
            let last = perm.iter().zip(&original).rposition(|(a, b)| a != b).unwrap();
            let mut segment = original[first..=last].to_vec();
            segment.reverse();
            assert_eq!(&perm[first..=last], segment.as_slice());
            assert!(last < 9);
        }
    }

    #[test]
    fn test_inversion_excludes_end_position() {
        let mut rng = create_rng(7);
        let mut unchanged = 0;
        for _ in 0..3000 {
            let mut perm = vec![0, 1, 2];
            inversion_mutation(&mut perm, &mut rng);
            assert!(perm == [0, 1, 2] || perm == [1, 0, 2]);
            if perm == [0, 1, 2] {
                unchanged += 1;
            }
        }
        // Picks (0, 1) and (1, 2) reverse a single entry.
        assert!((1800..=2200).contains(&unchanged), "unchanged {unchanged}");
    }

    #[test]
    fn test_mutations_on_tiny_tours() {
        let mut rng = create_rng(42);
        let mut single = vec![0];
        swap_mutation(&mut single, &mut rng);
        inversion_mutation(&mut single, &mut rng);
        assert_eq!(single, vec![0]);

        let mut pair = vec![0, 1];
        swap_mutation(&mut pair, &mut rng);
        assert_eq!(pair, vec![1, 0]);
        inversion_mutation(&mut pair, &mut rng);
        assert_eq!(pair, vec![1, 0]);
    }

    #[test]
    fn test_random_pair_bounds() {
        let mut rng = create_rng(42);
        for _ in 0..1000 {
            let (a, b) = distinct_sorted_pair(10, &mut rng);
            assert!(a < b);
            assert!(b < 10);
        }
    }

    fn parent_pair() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
        (2usize..30).prop_flat_map(|n| {
            let base: Vec<usize> = (0..n).collect();
            (Just(base.clone()).prop_shuffle(), Just(base).prop_shuffle())
        })
    }

    proptest! {
        #[test]
        fn prop_ox_children_are_permutations((p1, p2) in parent_pair(), seed in any::<u64>()) {
            let n = p1.len();
            let mut rng = create_rng(seed);
            let (c1, c2) = order_crossover(&p1, &p2, &mut rng);
            prop_assert!(is_permutation(&c1, n), "child1 {:?}", c1);
            prop_assert!(is_permutation(&c2, n), "child2 {:?}", c2);
        }

        #[test]
        fn prop_ox_keeps_parent_slice((p1, p2) in parent_pair(), a in 0usize..30, b in 0usize..30) {
            let n = p1.len();
            let (start, end) = (a.min(b) % n, (a.max(b) % n).max(a.min(b) % n));
            let (c1, c2) = order_crossover_at(&p1, &p2, start, end);
            prop_assert_eq!(&c1[start..end], &p1[start..end]);
            prop_assert_eq!(&c2[start..end], &p2[start..end]);
            prop_assert!(is_permutation(&c1, n));
            prop_assert!(is_permutation(&c2, n));
        }
    }
}
