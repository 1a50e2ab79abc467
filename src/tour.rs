//! Closed-tour evaluation.
//!
//! A tour is a permutation of location indices; the edge from the last
//! entry back to the first is implicit.

use crate::error::{Result, TspError};
use crate::geo::LocationSet;
use crate::graph::WeightedGraph;

/// Total closed-tour length in kilometres, including the wrap-around edge.
///
/// Fails with `UnknownLocation` if any index is outside `locations`.
/// Empty and single-entry tours have length zero.
pub fn tour_length(tour: &[usize], locations: &LocationSet) -> Result<f64> {
    if let Some(&bad) = tour.iter().find(|&&idx| idx >= locations.len()) {
        return Err(TspError::UnknownLocation(format!("#{bad}")));
    }
    Ok(closed_sum(tour, |a, b| locations.distance(a, b)))
}

/// Same as [`tour_length`], but for a tour given by location names.
pub fn tour_length_by_names<S: AsRef<str>>(tour: &[S], locations: &LocationSet) -> Result<f64> {
    let indices = tour
        .iter()
        .map(|name| locations.index_of(name.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    tour_length(&indices, locations)
}

/// Closed-tour length using precomputed graph weights.
///
/// Produces the same value as [`tour_length`] for the graph's location set.
///
/// # Panics
/// Panics if an index is outside the graph.
pub fn tour_length_in(tour: &[usize], graph: &WeightedGraph) -> f64 {
    closed_sum(tour, |a, b| graph.weight(a, b))
}

fn closed_sum(tour: &[usize], dist: impl Fn(usize, usize) -> f64) -> f64 {
    let n = tour.len();
    if n < 2 {
        return 0.0;
    }
    (0..n).map(|i| dist(tour[i], tour[(i + 1) % n])).sum()
}

/// Checks that `tour` visits each of `0..n` exactly once.
pub fn is_permutation(tour: &[usize], n: usize) -> bool {
    if tour.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &idx in tour {
        if idx >= n || seen[idx] {
            return false;
        }
        seen[idx] = true;
    }
    true
}

/// The tour with its first entry appended, as an explicit closed route.
pub fn closed_route<T: Clone>(tour: &[T]) -> Vec<T> {
    let mut route = tour.to_vec();
    if let Some(first) = tour.first() {
        route.push(first.clone());
    }
    route
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{haversine_km, Location};
    use proptest::prelude::*;

    fn square() -> LocationSet {
        LocationSet::new(vec![
            Location::new("A", 0.0, 0.0),
            Location::new("B", 0.0, 1.0),
            Location::new("C", 1.0, 1.0),
            Location::new("D", 1.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_includes_wrap_around_edge() {
        let set = square();
        let expected = haversine_km(0.0, 0.0, 0.0, 1.0)
            + haversine_km(0.0, 1.0, 1.0, 1.0)
            + haversine_km(1.0, 1.0, 1.0, 0.0)
            + haversine_km(1.0, 0.0, 0.0, 0.0);
        let got = tour_length(&[0, 1, 2, 3], &set).unwrap();
        assert!((got - expected).abs() < 1e-9);
    }

    #[test]
    fn test_two_locations_counts_edge_twice() {
        let set = square();
        let got = tour_length(&[0, 1], &set).unwrap();
        assert!((got - 2.0 * set.distance(0, 1)).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_index() {
        let set = square();
        assert!(matches!(
            tour_length(&[0, 1, 7], &set),
            Err(TspError::UnknownLocation(_))
        ));
    }

    #[test]
    fn test_by_names() {
        let set = square();
        let by_name = tour_length_by_names(&["A", "B", "C", "D"], &set).unwrap();
        let by_idx = tour_length(&[0, 1, 2, 3], &set).unwrap();
        assert_eq!(by_name, by_idx);

        assert!(matches!(
            tour_length_by_names(&["A", "Z"], &set),
            Err(TspError::UnknownLocation(name)) if name == "Z"
        ));
    }

    #[test]
    fn test_graph_weights_match_direct_evaluation() {
        let set = square();
        let graph = WeightedGraph::complete(&set);
        let tour = [2, 0, 3, 1];
        let direct = tour_length(&tour, &set).unwrap();
        assert!((tour_length_in(&tour, &graph) - direct).abs() < 1e-9);
    }

    #[test]
    fn test_is_permutation() {
        assert!(is_permutation(&[2, 0, 1], 3));
        assert!(!is_permutation(&[0, 0, 1], 3));
        assert!(!is_permutation(&[0, 1], 3));
        assert!(!is_permutation(&[0, 1, 3], 3));
    }

    #[test]
    fn test_closed_route() {
        assert_eq!(closed_route(&["A", "B", "C"]), vec!["A", "B", "C", "A"]);
        assert!(closed_route::<usize>(&[]).is_empty());
    }

    fn random_set_and_tour() -> impl Strategy<Value = (Vec<(f64, f64)>, Vec<usize>)> {
        prop::collection::vec((-80.0f64..80.0, -170.0f64..170.0), 2..12).prop_flat_map(|coords| {
            let n = coords.len();
            (Just(coords), Just((0..n).collect::<Vec<_>>()).prop_shuffle())
        })
    }

    fn build(coords: &[(f64, f64)]) -> LocationSet {
        LocationSet::new(
            coords
                .iter()
                .enumerate()
                .map(|(i, &(lat, lon))| Location::new(format!("L{i}"), lat, lon))
                .collect(),
        )
        .unwrap()
    }

    proptest! {
        #[test]
        fn prop_rotation_invariant((coords, tour) in random_set_and_tour(), shift in 0usize..12) {
            let set = build(&coords);
            let mut rotated = tour.clone();
            rotated.rotate_left(shift % tour.len());
            let a = tour_length(&tour, &set).unwrap();
            let b = tour_length(&rotated, &set).unwrap();
            prop_assert!((a - b).abs() < 1e-6, "{} vs {}", a, b);
        }

        #[test]
        fn prop_reversal_invariant((coords, tour) in random_set_and_tour()) {
            let set = build(&coords);
            let mut reversed = tour.clone();
            reversed.reverse();
            let a = tour_length(&tour, &set).unwrap();
            let b = tour_length(&reversed, &set).unwrap();
            prop_assert!((a - b).abs() < 1e-6, "{} vs {}", a, b);
        }
    }
}
