//! Fitness-weighted multiset of survivor indices.
//!
//! Each survivor is entered `round(fitness * 10)` times, so sampling an entry
//! uniformly picks survivors in proportion to their fitness without keeping a
//! cumulative sum around.

use rand::Rng;

/// Entries contributed per unit of fitness.
pub const ENTRIES_PER_FITNESS: f32 = 10.0;

/// Largest fitness the engine accepts. Caps a survivor at a million entries.
pub const MAX_FITNESS: f32 = 100_000.0;

/// Number of gene pool entries an individual with `fitness` earns.
///
/// Halves round to even, so 0.25 earns 2 entries and 0.75 earns 8. Fitness
/// above [`MAX_FITNESS`] earns no more than `MAX_FITNESS` does.
pub fn entries_for(fitness: f32) -> usize {
    if fitness.is_nan() {
        return 0;
    }
    let scaled = (fitness.min(MAX_FITNESS) * ENTRIES_PER_FITNESS).round_ties_even();
    if scaled > 0.0 { scaled as usize } else { 0 }
}

/// Weighted pool of parent candidates, rebuilt every generation.
#[derive(Debug, Clone, Default)]
pub struct GenePool {
    entries: Vec<usize>,
    distinct: usize,
}

impl GenePool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties the pool.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.distinct = 0;
    }

    /// Enters `index` as many times as [`entries_for`] its fitness earns.
    ///
    /// Each index is added at most once per generation.
    ///
    /// Returns the number of entries added.
    pub fn add(&mut self, index: usize, fitness: f32) -> usize {
        let count = entries_for(fitness);
        if count > 0 {
            self.entries.extend(std::iter::repeat_n(index, count));
            self.distinct += 1;
        }
        count
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no survivor earned an entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct indices in the pool.
    pub fn distinct(&self) -> usize {
        self.distinct
    }

    /// How many entries `index` holds.
    pub fn count_of(&self, index: usize) -> usize {
        self.entries.iter().filter(|&&entry| entry == index).count()
    }

    /// Raw entries in insertion order.
    pub fn entries(&self) -> &[usize] {
        &self.entries
    }

    /// Draws two different parent indices, redrawing both until they differ.
    ///
    /// Returns `None` when fewer than two distinct indices are present, since
    /// no pair of draws could ever differ.
    pub fn draw_distinct_pair<R: Rng>(&self, rng: &mut R) -> Option<(usize, usize)> {
        if self.distinct < 2 {
            return None;
        }
        loop {
            let a = self.entries[rng.random_range(0..self.entries.len())];
            let b = self.entries[rng.random_range(0..self.entries.len())];
            if a != b {
                return Some((a, b));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn entries_scale_with_fitness() {
        assert_eq!(entries_for(3.7), 37);
        assert_eq!(entries_for(10.0), 100);
        assert_eq!(entries_for(0.04), 0);
        assert_eq!(entries_for(0.0), 0);
        assert_eq!(entries_for(-2.0), 0);
    }

    #[test]
    fn halves_round_to_even() {
        assert_eq!(entries_for(0.25), 2);
        assert_eq!(entries_for(0.75), 8);
    }

    #[test]
    fn oversized_fitness_is_capped() {
        let cap = entries_for(MAX_FITNESS);
        assert_eq!(cap, 1_000_000);
        assert_eq!(entries_for(1e20), cap);
        assert_eq!(entries_for(f32::INFINITY), cap);
        assert_eq!(entries_for(f32::NAN), 0);
    }

    #[test]
    fn add_tracks_counts_and_distinct_indices() {
        let mut pool = GenePool::new();
        assert_eq!(pool.add(0, 1.2), 12);
        assert_eq!(pool.add(1, 0.0), 0);
        assert_eq!(pool.add(2, 0.5), 5);

        assert_eq!(pool.len(), 17);
        assert_eq!(pool.distinct(), 2);
        assert_eq!(pool.count_of(0), 12);
        assert_eq!(pool.count_of(1), 0);

        pool.clear();
        assert!(pool.is_empty());
        assert_eq!(pool.distinct(), 0);
    }

    #[test]
    fn single_survivor_cannot_form_a_pair() {
        let mut pool = GenePool::new();
        pool.add(3, 4.0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(pool.draw_distinct_pair(&mut rng), None);
    }

    #[test]
    fn drawn_pairs_are_distinct_pool_members() {
        let mut pool = GenePool::new();
        pool.add(0, 5.0);
        pool.add(1, 0.1);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..50 {
            let (a, b) = pool.draw_distinct_pair(&mut rng).unwrap();
            assert_ne!(a, b);
            assert!(a <= 1 && b <= 1);
        }
    }
}
