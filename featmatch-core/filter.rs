use crate::{Match, Neighbors};

/// Sorts matches by ascending distance and keeps the first `limit`
///
/// The sort is stable, so matches with equal distance keep the order the
/// matcher produced them in.
pub fn best_matches(mut matches: Vec<Match>, limit: usize) -> Vec<Match> {
    matches.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    matches.truncate(limit);
    matches
}

/// Lowe's ratio test over k-nearest-neighbour candidates
///
/// Keeps the nearest candidate of a query only when it is closer than
/// `ratio` times the second nearest. Queries with fewer than two candidates
/// carry no evidence either way and are dropped.
pub fn ratio_test(neighbors: &[Neighbors], ratio: f32) -> Vec<Match> {
    neighbors
        .iter()
        .filter_map(|candidates| match candidates.as_slice() {
            [best, second, ..] if best.distance < ratio * second.distance => Some(*best),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn create_matches(distances: &[f32]) -> Vec<Match> {
        distances
            .iter()
            .enumerate()
            .map(|(i, &d)| Match::new(i, i, d))
            .collect()
    }

    fn create_pair(query: usize, best: f32, second: f32) -> Neighbors {
        vec![Match::new(query, 0, best), Match::new(query, 1, second)]
    }

    #[test]
    fn test_best_matches_sorts_ascending() {
        let matches = create_matches(&[5.0, 1.0, 3.0, 0.0]);
        let best = best_matches(matches, 20);
        let distances: Vec<f32> = best.iter().map(|m| m.distance).collect();
        assert_eq!(distances, vec![0.0, 1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_best_matches_truncates_after_sorting() {
        let distances: Vec<f32> = (0..50).rev().map(|d| d as f32).collect();
        let best = best_matches(create_matches(&distances), 20);
        assert_eq!(best.len(), 20);
        assert_eq!(best[0].distance, 0.0);
        assert_eq!(best[19].distance, 19.0);
    }

    #[test]
    fn test_best_matches_keeps_order_of_ties() {
        let matches = vec![Match::new(0, 7, 2.0), Match::new(1, 3, 2.0), Match::new(2, 1, 1.0)];
        let best = best_matches(matches, 3);
        assert_eq!(best[0].query_idx, 2);
        assert_eq!(best[1].query_idx, 0);
        assert_eq!(best[2].query_idx, 1);
    }

    #[test]
    fn test_best_matches_empty_input() {
        assert!(best_matches(Vec::new(), 20).is_empty());
    }

    #[test]
    fn test_ratio_test_keeps_distinctive_matches() {
        let neighbors = vec![
            create_pair(0, 10.0, 100.0), // kept
            create_pair(1, 80.0, 100.0), // ambiguous
            create_pair(2, 74.0, 100.0), // kept at 0.75
        ];
        let kept = ratio_test(&neighbors, 0.75);
        let queries: Vec<usize> = kept.iter().map(|m| m.query_idx).collect();
        assert_eq!(queries, vec![0, 2]);

        let strict = ratio_test(&neighbors, 0.7);
        assert_eq!(strict.len(), 1);
        assert_eq!(strict[0].query_idx, 0);
    }

    #[test]
    fn test_ratio_test_is_strict_inequality() {
        let neighbors = vec![create_pair(0, 75.0, 100.0)];
        assert!(ratio_test(&neighbors, 0.75).is_empty());
    }

    #[test]
    fn test_ratio_test_drops_short_candidate_lists() {
        let neighbors = vec![vec![Match::new(0, 0, 0.0)], Vec::new()];
        assert!(ratio_test(&neighbors, 0.75).is_empty());
    }

    #[test]
    fn test_ratio_test_zero_distance_pair() {
        // Two identical candidates are ambiguous, never distinctive
        let neighbors = vec![create_pair(0, 0.0, 0.0)];
        assert!(ratio_test(&neighbors, 0.75).is_empty());
    }

    proptest! {
        #[test]
        fn prop_best_matches_sorted_and_bounded(
            distances in prop::collection::vec(0.0f32..1000.0, 0..200),
            limit in 0usize..64,
        ) {
            let best = best_matches(create_matches(&distances), limit);
            prop_assert!(best.len() <= limit);
            prop_assert_eq!(best.len(), distances.len().min(limit));
            prop_assert!(best.windows(2).all(|w| w[0].distance <= w[1].distance));

            let mut sorted = distances.clone();
            sorted.sort_by(|a, b| a.total_cmp(b));
            let prefix: Vec<f32> = best.iter().map(|m| m.distance).collect();
            prop_assert_eq!(prefix, sorted[..best.len()].to_vec());
        }

        #[test]
        fn prop_ratio_test_survivors_pass_inequality(
            pairs in prop::collection::vec((0.0f32..500.0, 0.0f32..500.0), 0..200),
            ratio in 0.1f32..1.0,
        ) {
            let neighbors: Vec<Neighbors> = pairs
                .iter()
                .enumerate()
                .map(|(i, &(a, b))| create_pair(i, a.min(b), a.max(b)))
                .collect();
            let kept = ratio_test(&neighbors, ratio);
            prop_assert!(kept.len() <= neighbors.len());
            for m in &kept {
                let second = neighbors[m.query_idx][1].distance;
                prop_assert!(m.distance < ratio * second);
            }
        }
    }
}
