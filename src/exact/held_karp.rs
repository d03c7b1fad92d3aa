use crate::error::{Result, TspError};
use crate::matrix::{CostMatrix, Location};
use crate::problem::Problem;
use crate::solution::Solution;

/// Parent marker for paths that start directly at home
const FROM_HOME: u32 = u32::MAX;

/// Held-Karp dynamic programming over (visited set, endpoint) states.
///
/// Runs in O(n²·2ⁿ) time and O(n·2ⁿ) memory. Among equally good predecessors
/// and final endpoints the one with the lowest input position wins.
pub fn exact_dynamic_programming<L: Location>(
    matrix: &CostMatrix<L>,
    home: &L,
    visit: &[L],
) -> Result<Solution<L>> {
    if visit.is_empty() {
        return Ok(Solution::round_trip(home));
    }

    let problem = Problem::new(matrix, home, visit)?;
    let table = HeldKarpTable::build(&problem)?;
    let (order, cost) = table.best_tour(&problem);

    Ok(problem.solution(&order, cost))
}

/// Memo and parent tables, both indexed by `mask * n + endpoint`.
///
/// Bit `s` of a mask stands for stop `s`, i.e. local index `s + 1`. The home
/// location is never part of a mask; every path implicitly starts there.
struct HeldKarpTable {
    n: usize,
    cost: Vec<f64>,
    parent: Vec<u32>,
}

impl HeldKarpTable {
    fn build<L: Location>(problem: &Problem<'_, L>) -> Result<Self> {
        let n = problem.num_stops();
        let entries = table_entries(n).ok_or_else(|| TspError::TooManyLocations {
            algorithm: "Dynamic Programming".to_string(),
            requested: n,
            limit: max_addressable_stops(),
        })?;
        let subsets = 1usize << n;

        log::debug!("held-karp: {} stops, {} table entries", n, entries);

        let mut table = HeldKarpTable {
            n,
            cost: vec![f64::INFINITY; entries],
            parent: vec![FROM_HOME; entries],
        };

        for stop in 0..n {
            let at = table.at(1 << stop, stop);
            table.cost[at] = problem.cost(0, stop + 1);
        }

        for size in 2..=n {
            let mut mask = (1usize << size) - 1;
            while mask < subsets {
                table.relax(problem, mask);
                mask = next_subset(mask);
            }
        }

        Ok(table)
    }

    #[inline]
    fn at(&self, mask: usize, end: usize) -> usize {
        mask * self.n + end
    }

    /// Fill every `(mask, end)` entry from the subsets one smaller
    fn relax<L: Location>(&mut self, problem: &Problem<'_, L>, mask: usize) {
        for end in bits(mask) {
            let prev_mask = mask & !(1 << end);
            let mut best = f64::INFINITY;
            let mut best_prev = FROM_HOME;

            for prev in bits(prev_mask) {
                let cost = self.cost[self.at(prev_mask, prev)] + problem.cost(prev + 1, end + 1);
                if best_prev == FROM_HOME || cost < best {
                    best = cost;
                    best_prev = prev as u32;
                }
            }

            let at = self.at(mask, end);
            self.cost[at] = best;
            self.parent[at] = best_prev;
        }
    }

    /// Close the tour over the full set and walk parents back to home
    fn best_tour<L: Location>(&self, problem: &Problem<'_, L>) -> (Vec<usize>, f64) {
        let full = (1usize << self.n) - 1;

        // first endpoint taken even when every sum is infinite
        let mut closing: Option<(usize, f64)> = None;
        for end in 0..self.n {
            let cost = self.cost[self.at(full, end)] + problem.cost(end + 1, 0);
            if closing.map_or(true, |(_, best)| cost < best) {
                closing = Some((end, cost));
            }
        }
        let (last, best) = closing.unwrap_or((0, 0.0));

        let mut order = Vec::with_capacity(self.n);
        let mut mask = full;
        let mut current = last;
        loop {
            order.push(current + 1);
            let parent = self.parent[self.at(mask, current)];
            if parent == FROM_HOME {
                break;
            }
            mask &= !(1 << current);
            current = parent as usize;
        }
        order.reverse();

        (order, best)
    }
}

/// Number of `(mask, endpoint)` entries for `n` stops, if the cost table can be addressed
fn table_entries(n: usize) -> Option<usize> {
    let subsets = 1usize.checked_shl(u32::try_from(n).ok()?)?;
    let entries = subsets.checked_mul(n)?;
    let bytes = entries.checked_mul(std::mem::size_of::<f64>())?;
    (bytes <= isize::MAX as usize).then_some(entries)
}

/// Largest stop count accepted by [`table_entries`]
fn max_addressable_stops() -> usize {
    (1..usize::BITS as usize)
        .take_while(|&n| table_entries(n).is_some())
        .last()
        .unwrap_or(0)
}

/// Positions of the set bits of `mask`, lowest first
fn bits(mut mask: usize) -> impl Iterator<Item = usize> {
    std::iter::from_fn(move || {
        if mask == 0 {
            None
        } else {
            let bit = mask.trailing_zeros() as usize;
            mask &= mask - 1;
            Some(bit)
        }
    })
}

/// Next larger integer with the same number of set bits (Gosper's hack)
#[inline]
fn next_subset(mask: usize) -> usize {
    let lowest = mask & mask.wrapping_neg();
    let ripple = mask + lowest;
    (((ripple ^ mask) >> 2) / lowest) | ripple
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> CostMatrix<&'static str> {
        let costs = [
            [0.0, 10.0, 15.0, 20.0],
            [10.0, 0.0, 35.0, 25.0],
            [15.0, 35.0, 0.0, 30.0],
            [20.0, 25.0, 30.0, 0.0],
        ];
        CostMatrix::new(
            vec!["A", "B", "C", "D"],
            costs.iter().map(|row| row.to_vec()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_next_subset_enumerates_by_size() {
        let mut masks = Vec::new();
        let mut mask = 0b0011;
        while mask < 16 {
            masks.push(mask);
            mask = next_subset(mask);
        }
        assert_eq!(masks, vec![0b0011, 0b0101, 0b0110, 0b1001, 0b1010, 0b1100]);
    }

    #[test]
    fn test_max_addressable_stops() {
        let n = max_addressable_stops();
        assert!(n > 20);
        assert!(table_entries(n).is_some());
        assert!(table_entries(n + 1).is_none());
        assert!(table_entries(usize::MAX).is_none());
        assert_eq!(table_entries(3), Some(24));
    }

    #[test]
    fn test_bits() {
        assert_eq!(bits(0b10110).collect::<Vec<_>>(), vec![1, 2, 4]);
        assert_eq!(bits(0).count(), 0);
    }

    #[test]
    fn test_dynamic_programming_fixture() {
        let matrix = fixture();
        let solution = exact_dynamic_programming(&matrix, &"A", &["B", "C", "D"]).unwrap();

        assert_eq!(solution.cost, 80.0);
        solution.verify(&matrix, &"A", &["B", "C", "D"]).unwrap();
    }

    #[test]
    fn test_dynamic_programming_small_inputs() {
        let matrix = fixture();

        let empty = exact_dynamic_programming(&matrix, &"A", &[]).unwrap();
        assert_eq!(empty.route, vec!["A", "A"]);
        assert_eq!(empty.cost, 0.0);

        let single = exact_dynamic_programming(&matrix, &"B", &["D"]).unwrap();
        assert_eq!(single.route, vec!["B", "D", "B"]);
        assert_eq!(single.cost, 50.0);

        let pair = exact_dynamic_programming(&matrix, &"A", &["C", "B"]).unwrap();
        assert_eq!(pair.cost, 60.0);
        pair.verify(&matrix, &"A", &["C", "B"]).unwrap();
    }

    #[test]
    fn test_dynamic_programming_directed_costs() {
        // cheap only around the cycle H -> X -> Y -> Z -> H
        let matrix = CostMatrix::from_fn(vec!['H', 'X', 'Y', 'Z'], |a, b| match (a, b) {
            ('H', 'X') | ('X', 'Y') | ('Y', 'Z') | ('Z', 'H') => 1.0,
            _ => 7.0,
        })
        .unwrap();

        let solution = exact_dynamic_programming(&matrix, &'H', &['Z', 'Y', 'X']).unwrap();
        assert_eq!(solution.route, vec!['H', 'X', 'Y', 'Z', 'H']);
        assert_eq!(solution.cost, 4.0);
    }

    #[test]
    fn test_dynamic_programming_saturating_costs() {
        // every tour sum overflows to infinity
        let matrix = CostMatrix::from_fn(vec![0, 1, 2, 3], |_, _| f64::MAX / 2.0).unwrap();

        let solution = exact_dynamic_programming(&matrix, &0, &[1, 2, 3]).unwrap();
        assert_eq!(solution.route.len(), 5);
        assert!(solution.cost.is_infinite());
        solution.verify(&matrix, &0, &[1, 2, 3]).unwrap();
    }
}
