//! Label-balanced interleaved sampling.
//!
//! Annotations are grouped per category, each group is shuffled and drained
//! as a FIFO queue in rounds. Every round visits categories in their
//! insertion order and pops up to `ratio` items from each queue, so the
//! selection interleaves categories instead of concentrating on whichever
//! label dominates the input.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::error::LoadError;

/// One category's annotations, in the order the category list declared them.
#[derive(Debug, Clone)]
pub struct CategoryGroup<T> {
    pub name: String,
    pub items: Vec<T>,
}

/// Per-category sampling state. Mutated only by [`sample`], never aliased.
#[derive(Debug)]
struct CategoryQueue<T> {
    name: String,
    queue: VecDeque<T>,
    /// Items drawn from this queue per round. A ceiling, not a guarantee:
    /// the final round may yield fewer when the queue runs dry.
    ratio: usize,
    count: usize,
}

/// The selection in draw order, plus final per-category counts.
///
/// `counts` holds an entry for every category that had at least one raw
/// annotation, including categories that ended up never being drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleOutcome<T> {
    pub selected: Vec<T>,
    pub counts: Vec<(String, usize)>,
}

/// Select up to `split_len` items, drawing from categories round-robin.
///
/// With `keep_original_dist` set, each category draws
/// `ceil(raw_total / overall_total * min(overall_total, split_len))` items
/// per round instead of one, which skews the realized distribution toward
/// (without exactly preserving) the original one. The ceiling keeps sparse
/// categories from being starved to a zero ratio.
///
/// Each group is shuffled with the caller's `rng` before draining, so a
/// seeded generator makes the whole selection deterministic.
pub fn sample<T, R: Rng>(
    groups: Vec<CategoryGroup<T>>,
    split_len: usize,
    keep_original_dist: bool,
    rng: &mut R,
) -> Result<SampleOutcome<T>, LoadError> {
    let total: usize = groups.iter().map(|g| g.items.len()).sum();
    if total == 0 {
        return Err(LoadError::EmptyInput);
    }
    let batch_size = total.min(split_len);

    // Categories with zero annotations never enter the queue list.
    let mut queues: Vec<CategoryQueue<T>> = groups
        .into_iter()
        .filter(|g| !g.items.is_empty())
        .map(|mut g| {
            g.items.shuffle(&mut *rng);
            let ratio = if keep_original_dist {
                ((g.items.len() as f64 / total as f64) * batch_size as f64).ceil() as usize
            } else {
                1
            };
            debug!("Category {}: {} items, ratio {}", g.name, g.items.len(), ratio);
            CategoryQueue {
                name: g.name,
                queue: g.items.into(),
                ratio,
                count: 0,
            }
        })
        .collect();

    let mut selected: Vec<T> = Vec::with_capacity(batch_size);
    'rounds: loop {
        for idx in 0..queues.len() {
            if !queues[idx].queue.is_empty() {
                for _ in 0..queues[idx].ratio {
                    if let Some(item) = queues[idx].queue.pop_front() {
                        selected.push(item);
                        queues[idx].count += 1;
                    }
                    if queues[idx].queue.is_empty() {
                        break;
                    }
                }
            }
            // Termination is checked after every category, not only at round
            // boundaries: a category late in the order may never get its
            // final round if an earlier draw already hit the target.
            if selected.len() >= split_len || queues.iter().all(|q| q.queue.is_empty()) {
                break 'rounds;
            }
        }
    }

    let counts = queues.into_iter().map(|q| (q.name, q.count)).collect();
    Ok(SampleOutcome { selected, counts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn group(name: &str, items: Vec<u32>) -> CategoryGroup<u32> {
        CategoryGroup {
            name: name.to_string(),
            items,
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn count_of(outcome: &SampleOutcome<u32>, name: &str) -> usize {
        outcome
            .counts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| *c)
            .unwrap()
    }

    #[test]
    fn test_round_robin_with_exhausted_category() {
        // A:5, B:1, split_len=3 -> draws A,B,A; B exhausted after round 1.
        let groups = vec![group("A", vec![1, 2, 3, 4, 5]), group("B", vec![10])];
        let outcome = sample(groups, 3, false, &mut rng()).unwrap();
        assert_eq!(outcome.selected.len(), 3);
        assert_eq!(count_of(&outcome, "A"), 2);
        assert_eq!(count_of(&outcome, "B"), 1);
    }

    #[test]
    fn test_proportional_ratios_drain_in_one_round() {
        // A:9, B:1, split_len=10 -> ratio(A)=9, ratio(B)=1, full drain.
        let groups = vec![group("A", (0..9).collect()), group("B", vec![100])];
        let outcome = sample(groups, 10, true, &mut rng()).unwrap();
        assert_eq!(outcome.selected.len(), 10);
        assert_eq!(count_of(&outcome, "A"), 9);
        assert_eq!(count_of(&outcome, "B"), 1);
        // Round 1 draws all nine As before the single B.
        assert_eq!(outcome.selected[9], 100);
    }

    #[test]
    fn test_counts_sum_matches_selection_length() {
        let groups = vec![
            group("A", (0..7).collect()),
            group("B", (10..13).collect()),
            group("C", (20..25).collect()),
        ];
        let outcome = sample(groups, 11, false, &mut rng()).unwrap();
        let sum: usize = outcome.counts.iter().map(|(_, c)| c).sum();
        assert_eq!(sum, outcome.selected.len());
        assert_eq!(outcome.selected.len(), 11);
    }

    #[test]
    fn test_round_robin_fairness_within_one() {
        // No category runs dry before the target, so counts differ by <= 1.
        let groups = vec![
            group("A", (0..10).collect()),
            group("B", (10..20).collect()),
            group("C", (20..30).collect()),
        ];
        let outcome = sample(groups, 11, false, &mut rng()).unwrap();
        let counts: Vec<usize> = outcome.counts.iter().map(|(_, c)| *c).collect();
        let max = counts.iter().max().unwrap();
        let min = counts.iter().min().unwrap();
        assert!(max - min <= 1, "counts {:?} not within 1", counts);
        assert_eq!(outcome.selected.len(), 11);
    }

    #[test]
    fn test_full_drain_when_target_exceeds_total() {
        let groups = vec![group("A", vec![1, 2, 3]), group("B", vec![4, 5])];
        let outcome = sample(groups, 100, false, &mut rng()).unwrap();
        let mut all: Vec<u32> = outcome.selected.clone();
        all.sort_unstable();
        assert_eq!(all, vec![1, 2, 3, 4, 5]);

        // Same with the proportional flag set.
        let groups = vec![group("A", vec![1, 2, 3]), group("B", vec![4, 5])];
        let outcome = sample(groups, 100, true, &mut rng()).unwrap();
        let mut all: Vec<u32> = outcome.selected.clone();
        all.sort_unstable();
        assert_eq!(all, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_later_category_skipped_when_target_hit_mid_round() {
        // split_len=1: A's draw satisfies the target before B is visited,
        // but B still appears in the counts with zero.
        let groups = vec![group("A", vec![1, 2, 3]), group("B", vec![4, 5])];
        let outcome = sample(groups, 1, false, &mut rng()).unwrap();
        assert_eq!(outcome.selected.len(), 1);
        assert_eq!(count_of(&outcome, "A"), 1);
        assert_eq!(count_of(&outcome, "B"), 0);
    }

    #[test]
    fn test_sparse_category_ratio_never_rounds_to_zero() {
        // B is 1 of 101 annotations; ceiling keeps its ratio at 1.
        let mut groups = vec![group("A", (0..100).collect()), group("B", vec![999])];
        groups.swap(0, 1); // B first so its round-1 draw is observable
        let outcome = sample(groups, 10, true, &mut rng()).unwrap();
        assert_eq!(count_of(&outcome, "B"), 1);
        assert_eq!(outcome.selected[0], 999);
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let make = || {
            vec![
                group("A", (0..20).collect()),
                group("B", (20..30).collect()),
            ]
        };
        let first = sample(make(), 15, false, &mut StdRng::seed_from_u64(7)).unwrap();
        let second = sample(make(), 15, false, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let outcome = sample(Vec::<CategoryGroup<u32>>::new(), 5, false, &mut rng());
        assert!(matches!(outcome, Err(LoadError::EmptyInput)));

        let groups = vec![group("A", vec![]), group("B", vec![])];
        let outcome = sample(groups, 5, true, &mut rng());
        assert!(matches!(outcome, Err(LoadError::EmptyInput)));
    }

    #[test]
    fn test_zero_annotation_category_absent_from_counts() {
        let groups = vec![group("A", vec![1, 2]), group("B", vec![])];
        let outcome = sample(groups, 2, false, &mut rng()).unwrap();
        assert_eq!(outcome.counts.len(), 1);
        assert_eq!(outcome.counts[0].0, "A");
    }
}
