use crate::error::{QuizError, Result};
use crate::stats::{Direction, ItemStatistics};
use itertools::Itertools;
use rand::seq::index;
use rand::Rng;
use std::cmp::Reverse;
use tracing::debug;

/// Items answered correctly at least this many times are left out of a resumed pool
pub const MASTERY_CUTOFF: u32 = 2;

/// Strategy for building the pool of candidate indices before sampling
pub trait IndexSelector {
    fn candidate_pool(
        &self,
        statistics: &ItemStatistics,
        direction: Direction,
        total_items: usize,
    ) -> Vec<usize>;
}

/// Every item, in dataset order
pub struct UniformSelector;

impl IndexSelector for UniformSelector {
    fn candidate_pool(
        &self,
        _statistics: &ItemStatistics,
        _direction: Direction,
        total_items: usize,
    ) -> Vec<usize> {
        (0..total_items).collect()
    }
}

/// Most-missed items first, mastered items dropped
pub struct PrioritySelector;

impl IndexSelector for PrioritySelector {
    fn candidate_pool(
        &self,
        statistics: &ItemStatistics,
        direction: Direction,
        total_items: usize,
    ) -> Vec<usize> {
        // sorted_by_key is stable, ties keep dataset order
        (0..total_items)
            .sorted_by_key(|&i| Reverse(statistics.incorrects(direction, i)))
            .filter(|&i| statistics.corrects(direction, i) < MASTERY_CUTOFF)
            .collect()
    }
}

/// Pick the strategy for a run
pub fn selector_for(resumed: bool) -> Box<dyn IndexSelector> {
    if resumed {
        Box::new(PrioritySelector)
    } else {
        Box::new(UniformSelector)
    }
}

/// Produce `max_questions` distinct indices in random order.
///
/// Fails with [`QuizError::SampleSizeExceeded`] instead of truncating when the
/// candidate pool is smaller than `max_questions`.
pub fn select<R: Rng + ?Sized>(
    statistics: &ItemStatistics,
    direction: Direction,
    total_items: usize,
    resumed: bool,
    max_questions: usize,
    rng: &mut R,
) -> Result<Vec<usize>> {
    let pool = selector_for(resumed).candidate_pool(statistics, direction, total_items);
    debug!(
        pool = pool.len(),
        requested = max_questions,
        resumed,
        "built question pool"
    );

    if max_questions > pool.len() {
        return Err(QuizError::SampleSizeExceeded {
            requested: max_questions,
            available: pool.len(),
        });
    }

    // index::sample already returns positions in random order
    let picked = index::sample(rng, pool.len(), max_questions)
        .into_iter()
        .map(|pos| pool[pos])
        .collect();
    Ok(picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn stats_with(
        len: usize,
        direction: Direction,
        incorrects: &[(usize, u32)],
        corrects: &[(usize, u32)],
    ) -> ItemStatistics {
        let mut stats = ItemStatistics::new(len);
        for &(i, n) in incorrects {
            for _ in 0..n {
                stats.record_incorrect(direction, i);
            }
        }
        for &(i, n) in corrects {
            for _ in 0..n {
                stats.record_correct(direction, i);
            }
        }
        stats
    }

    #[test]
    fn fresh_selection_is_distinct_and_in_range() {
        let stats = ItemStatistics::new(10);
        let mut rng = StdRng::seed_from_u64(7);
        let picked = select(&stats, Direction::Forward, 10, false, 5, &mut rng).unwrap();

        assert_eq!(picked.len(), 5);
        assert!(picked.iter().all(|&i| i < 10));
        assert_eq!(picked.iter().collect::<HashSet<_>>().len(), 5);
    }

    #[test]
    fn same_seed_same_questions() {
        let stats = ItemStatistics::new(20);
        let a = select(&stats, Direction::Forward, 20, false, 8, &mut StdRng::seed_from_u64(3));
        let b = select(&stats, Direction::Forward, 20, false, 8, &mut StdRng::seed_from_u64(3));
        assert_eq!(a.unwrap(), b.unwrap());
    }

    #[test]
    fn taking_the_whole_pool_still_shuffles_it() {
        let stats = ItemStatistics::new(10);
        let in_order: Vec<usize> = (0..10).collect();
        let mut reordered = 0;
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = select(&stats, Direction::Forward, 10, false, 10, &mut rng).unwrap();
            let mut sorted = picked.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, in_order);
            if picked != in_order {
                reordered += 1;
            }
        }
        assert!(reordered > 0);
    }

    #[test]
    fn priority_pool_orders_by_misses_and_drops_mastered() {
        let stats = stats_with(
            10,
            Direction::Forward,
            &[(3, 5), (7, 1), (5, 2)],
            &[(7, 3)],
        );
        let pool = PrioritySelector.candidate_pool(&stats, Direction::Forward, 10);

        assert!(!pool.contains(&7));
        assert_eq!(pool[0], 3);
        assert_eq!(pool[1], 5);
        // untouched items follow in dataset order
        assert_eq!(&pool[2..], &[0, 1, 2, 4, 6, 8, 9]);
    }

    #[test]
    fn priority_pool_only_reads_active_direction() {
        let stats = stats_with(3, Direction::Reverse, &[(2, 4)], &[(0, 2)]);
        let forward = PrioritySelector.candidate_pool(&stats, Direction::Forward, 3);
        let reverse = PrioritySelector.candidate_pool(&stats, Direction::Reverse, 3);

        assert_eq!(forward, vec![0, 1, 2]);
        assert_eq!(reverse, vec![2, 1]);
    }

    #[test]
    fn resumed_selection_never_returns_mastered_items() {
        let stats = stats_with(6, Direction::Forward, &[], &[(1, 2), (4, 5)]);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = select(&stats, Direction::Forward, 6, true, 4, &mut rng).unwrap();
            assert!(!picked.contains(&1));
            assert!(!picked.contains(&4));
        }
    }

    #[test]
    fn pool_smaller_than_request_fails_loudly() {
        let stats = stats_with(4, Direction::Forward, &[], &[(0, 2), (1, 2), (2, 2)]);
        let mut rng = StdRng::seed_from_u64(1);
        let err = select(&stats, Direction::Forward, 4, true, 3, &mut rng).unwrap_err();
        assert_matches!(
            err,
            QuizError::SampleSizeExceeded {
                requested: 3,
                available: 1
            }
        );
    }

    #[test]
    fn zero_questions_is_empty() {
        let stats = ItemStatistics::new(3);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(select(&stats, Direction::Forward, 3, false, 0, &mut rng)
            .unwrap()
            .is_empty());
    }
}
