use crate::error::Result;
use crate::matrix::{CostMatrix, Location};
use crate::problem::Problem;
use crate::solution::Solution;
use itertools::Itertools;

/// Exhaustive search over every visiting order.
///
/// Permutations are enumerated in lexicographic order of input positions and
/// the first tour with the minimum cost is kept. Runs in O(n!·n); only
/// meant as a correctness baseline for small inputs.
pub fn exact_brute_force<L: Location>(
    matrix: &CostMatrix<L>,
    home: &L,
    visit: &[L],
) -> Result<Solution<L>> {
    if visit.is_empty() {
        return Ok(Solution::round_trip(home));
    }

    let problem = Problem::new(matrix, home, visit)?;
    let n = problem.num_stops();

    let mut best: Option<(Vec<usize>, f64)> = None;
    let mut explored = 0usize;

    for order in (1..=n).permutations(n) {
        explored += 1;
        let cost = problem.tour_cost(&order);
        if best.as_ref().map_or(true, |(_, best_cost)| cost < *best_cost) {
            best = Some((order, cost));
        }
    }

    log::debug!("brute force: {} stops, {} permutations explored", n, explored);

    let (order, cost) = best.unwrap_or_default();
    Ok(problem.solution(&order, cost))
}
