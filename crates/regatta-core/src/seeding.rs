//! Fleet seeding: splitting an ordered boat list across heats.
//!
//! Three assignment orders share one capacity split:
//!
//! - round-robin for a first round drawn from the entry list
//! - boundary-repeating serpentine when re-seeding from a ranking, so each
//!   heat gets a similar spread of strong and weak boats
//! - contiguous slicing for finals, best boats to the first fleet

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{RegattaError, Result};

/// Heat sizes for `boats` boats over `heats` heats.
/// The first `boats % heats` heats take one extra boat.
pub fn capacities(boats: usize, heats: usize) -> Vec<usize> {
    if heats == 0 {
        return Vec::new();
    }
    let base = boats / heats;
    let remainder = boats % heats;
    (0..heats)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// How the first round's order is taken from the entry list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Draw {
    #[default]
    EntryOrder,
    /// Reproducible shuffle; the same seed always gives the same order
    Random { seed: u64 },
}

impl Draw {
    pub fn apply<B: Clone>(&self, entries: &[B]) -> Vec<B> {
        let mut order = entries.to_vec();
        if let Draw::Random { seed } = *self {
            let mut rng = StdRng::seed_from_u64(seed);
            order.shuffle(&mut rng);
        }
        order
    }
}

/// Assigns boats to a fixed set of destination heats.
///
/// Generic over the heat identifier, so the same seeder works with heat
/// indices, names, or store ids.
#[derive(Debug, Clone)]
pub struct FleetSeeder<'a, H> {
    heats: &'a [H],
}

impl<'a, H: Clone> FleetSeeder<'a, H> {
    pub fn new(heats: &'a [H]) -> Result<Self> {
        if heats.is_empty() {
            return Err(RegattaError::inconsistent("no destination heats to seed into"));
        }
        Ok(Self { heats })
    }

    pub fn capacities(&self, boats: usize) -> Vec<usize> {
        capacities(boats, self.heats.len())
    }

    /// Boat i goes to heat i mod K
    pub fn round_robin<B: Clone>(&self, boats: &[B]) -> Vec<(H, B)> {
        let k = self.heats.len();
        boats
            .iter()
            .enumerate()
            .map(|(i, boat)| (self.heats[i % k].clone(), boat.clone()))
            .collect()
    }

    /// Snake order over a ranked list, taking two consecutive boats at each
    /// end heat before turning.
    pub fn serpentine<B: Clone>(&self, boats: &[B]) -> Vec<(H, B)> {
        let mut remaining = self.capacities(boats.len());
        let mut assignments = Vec::with_capacity(boats.len());
        let mut turn = Turn::default();
        let mut current = 0;

        for (i, boat) in boats.iter().enumerate() {
            assignments.push((self.heats[current].clone(), boat.clone()));
            remaining[current] -= 1;
            if i + 1 < boats.len() {
                current = turn.next_heat(current, &remaining);
            }
        }
        assignments
    }

    /// Consecutive slices of the ranking, sized by capacity
    pub fn contiguous<B: Clone>(&self, boats: &[B]) -> Vec<(H, B)> {
        let mut assignments = Vec::with_capacity(boats.len());
        let mut rest = boats;
        for (heat, size) in self.heats.iter().zip(self.capacities(boats.len())) {
            let (slice, tail) = rest.split_at(size);
            assignments.extend(slice.iter().map(|boat| (heat.clone(), boat.clone())));
            rest = tail;
        }
        assignments
    }
}

/// Direction of travel and whether the current end heat has had its repeat
#[derive(Debug, Clone, Copy)]
struct Turn {
    forward: bool,
    repeated: bool,
}

impl Default for Turn {
    fn default() -> Self {
        Self {
            forward: true,
            repeated: false,
        }
    }
}

impl Turn {
    fn next_heat(&mut self, current: usize, remaining: &[usize]) -> usize {
        let k = remaining.len();
        if k == 1 {
            return 0;
        }

        let at_boundary = if self.forward {
            current == k - 1
        } else {
            current == 0
        };
        if at_boundary {
            if remaining[current] > 0 && !self.repeated {
                self.repeated = true;
                return current;
            }
            self.forward = !self.forward;
            self.repeated = false;
        }

        let step = if self.forward { current + 1 } else { current - 1 };
        if remaining[step] > 0 {
            return step;
        }
        (1..k)
            .map(|offset| (step + offset) % k)
            .find(|&heat| remaining[heat] > 0)
            .unwrap_or(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(assignments: &[(usize, usize)], heats: usize) -> Vec<usize> {
        let mut counts = vec![0; heats];
        for (heat, _) in assignments {
            counts[*heat] += 1;
        }
        counts
    }

    fn heat_of(assignments: &[(usize, usize)], boat: usize) -> usize {
        assignments
            .iter()
            .find(|(_, b)| *b == boat)
            .map(|(h, _)| *h)
            .unwrap()
    }

    #[test]
    fn test_capacities_split_remainder_first() {
        assert_eq!(capacities(7, 2), vec![4, 3]);
        assert_eq!(capacities(11, 3), vec![4, 4, 3]);
        assert_eq!(capacities(9, 3), vec![3, 3, 3]);
        assert_eq!(capacities(2, 4), vec![1, 1, 0, 0]);
        assert!(capacities(5, 0).is_empty());
    }

    #[test]
    fn test_seeder_requires_heats() {
        let heats: Vec<usize> = vec![];
        assert!(FleetSeeder::new(&heats).is_err());
    }

    #[test]
    fn test_round_robin_eleven_boats_three_heats() {
        let heats = vec![0, 1, 2];
        let boats: Vec<usize> = (0..11).collect();
        let assignments = FleetSeeder::new(&heats).unwrap().round_robin(&boats);
        assert_eq!(heat_of(&assignments, 10), 1);
        for boat in 0..11 {
            assert_eq!(heat_of(&assignments, boat), boat % 3);
        }
        assert_eq!(counts(&assignments, 3), capacities(11, 3));
    }

    #[test]
    fn test_serpentine_seven_boats_two_heats() {
        let heats = vec![0, 1];
        let ranked: Vec<usize> = (1..=7).collect();
        let assignments = FleetSeeder::new(&heats).unwrap().serpentine(&ranked);
        let order: Vec<usize> = assignments.iter().map(|(h, _)| *h).collect();
        // Heat 1 fills at three boats, so rank 7 completes heat 0
        assert_eq!(order, vec![0, 1, 1, 0, 0, 1, 0]);
        assert_eq!(counts(&assignments, 2), vec![4, 3]);
    }

    #[test]
    fn test_serpentine_repeats_end_heats() {
        let heats = vec!["A", "B", "C"];
        let ranked: Vec<usize> = (1..=12).collect();
        let assignments = FleetSeeder::new(&heats).unwrap().serpentine(&ranked);
        let order: Vec<&str> = assignments.iter().map(|(h, _)| *h).collect();
        assert_eq!(
            order,
            vec!["A", "B", "C", "C", "B", "A", "A", "B", "C", "C", "B", "A"]
        );
    }

    #[test]
    fn test_serpentine_matches_capacities_for_all_sizes() {
        for k in 1..=7usize {
            let heats: Vec<usize> = (0..k).collect();
            let seeder = FleetSeeder::new(&heats).unwrap();
            for n in 0..=60usize {
                let boats: Vec<usize> = (0..n).collect();
                let assignments = seeder.serpentine(&boats);
                assert_eq!(counts(&assignments, k), capacities(n, k), "n={} k={}", n, k);

                let mut seen: Vec<usize> = assignments.iter().map(|(_, b)| *b).collect();
                seen.sort_unstable();
                assert_eq!(seen, boats);

                let larger = counts(&assignments, k)
                    .iter()
                    .filter(|&&c| c == n / k + 1)
                    .count();
                if n % k != 0 {
                    assert_eq!(larger, n % k);
                }
            }
        }
    }

    #[test]
    fn test_contiguous_slices_best_first() {
        let fleets = vec!["Gold", "Silver", "Bronze"];
        let ranked: Vec<usize> = (1..=8).collect();
        let assignments = FleetSeeder::new(&fleets).unwrap().contiguous(&ranked);
        let gold: Vec<usize> = assignments
            .iter()
            .filter(|(h, _)| *h == "Gold")
            .map(|(_, b)| *b)
            .collect();
        let bronze: Vec<usize> = assignments
            .iter()
            .filter(|(h, _)| *h == "Bronze")
            .map(|(_, b)| *b)
            .collect();
        assert_eq!(gold, vec![1, 2, 3]);
        assert_eq!(bronze, vec![7, 8]);
    }

    #[test]
    fn test_draw_entry_order_is_identity() {
        let entries = vec![5, 3, 9];
        assert_eq!(Draw::EntryOrder.apply(&entries), entries);
    }

    #[test]
    fn test_random_draw_is_reproducible_permutation() {
        let entries: Vec<i64> = (1..=20).collect();
        let first = Draw::Random { seed: 42 }.apply(&entries);
        let second = Draw::Random { seed: 42 }.apply(&entries);
        assert_eq!(first, second);

        let mut sorted = first.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, entries);
    }
}
