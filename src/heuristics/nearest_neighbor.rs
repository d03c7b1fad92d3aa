use crate::error::Result;
use crate::matrix::{CostMatrix, Location};
use crate::problem::Problem;
use crate::solution::Solution;
use ordered_float::OrderedFloat;

/// Nearest Neighbor Heuristic
///
/// Starting at home, repeatedly travels to the cheapest unvisited stop, then
/// returns home. Ties go to the stop listed first in `visit`. Never
/// backtracks, so the result is not guaranteed optimal. O(n²).
pub fn heuristic_nearest_neighbor<L: Location>(
    matrix: &CostMatrix<L>,
    home: &L,
    visit: &[L],
) -> Result<Solution<L>> {
    if visit.is_empty() {
        return Ok(Solution::round_trip(home));
    }

    let problem = Problem::new(matrix, home, visit)?;
    let n = problem.num_stops();

    let mut unvisited: Vec<usize> = (1..=n).collect();
    let mut order = Vec::with_capacity(n);
    let mut current = 0;
    let mut total = 0.0;

    while let Some((pos, cost)) = nearest(&problem, current, &unvisited) {
        let next = unvisited.remove(pos);
        total += cost;
        order.push(next);
        current = next;
    }

    total += problem.cost(current, 0);

    Ok(problem.solution(&order, total))
}

/// Position in `candidates` of the cheapest stop from `current`, first one on ties
fn nearest<L: Location>(
    problem: &Problem<'_, L>,
    current: usize,
    candidates: &[usize],
) -> Option<(usize, f64)> {
    candidates
        .iter()
        .enumerate()
        .map(|(pos, &stop)| (pos, problem.cost(current, stop)))
        .min_by_key(|&(_, cost)| OrderedFloat(cost))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> CostMatrix<&'static str> {
        CostMatrix::new(
            vec!["A", "B", "C", "D"],
            vec![
                vec![0.0, 10.0, 15.0, 20.0],
                vec![10.0, 0.0, 35.0, 25.0],
                vec![15.0, 35.0, 0.0, 30.0],
                vec![20.0, 25.0, 30.0, 0.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_nearest_neighbor_fixture() {
        let matrix = fixture();
        let solution = heuristic_nearest_neighbor(&matrix, &"A", &["B", "C", "D"]).unwrap();

        // A -> B (10) -> D (25) -> C (30) -> A (15)
        assert_eq!(solution.route, vec!["A", "B", "D", "C", "A"]);
        assert_eq!(solution.cost, 80.0);
    }

    #[test]
    fn test_nearest_neighbor_ties_follow_input_order() {
        let matrix = CostMatrix::from_fn(vec![0, 1, 2, 3], |_, _| 1.0).unwrap();

        let forward = heuristic_nearest_neighbor(&matrix, &0, &[3, 1, 2]).unwrap();
        assert_eq!(forward.route, vec![0, 3, 1, 2, 0]);
        assert_eq!(forward.cost, 4.0);

        let backward = heuristic_nearest_neighbor(&matrix, &0, &[2, 1, 3]).unwrap();
        assert_eq!(backward.route, vec![0, 2, 1, 3, 0]);
    }

    #[test]
    fn test_nearest_neighbor_is_greedy() {
        // the cheap first leg forces an expensive return
        let matrix = CostMatrix::new(
            vec!['H', 'X', 'Y'],
            vec![
                vec![0.0, 1.0, 2.0],
                vec![1.0, 0.0, 1.0],
                vec![100.0, 1.0, 0.0],
            ],
        )
        .unwrap();

        let solution = heuristic_nearest_neighbor(&matrix, &'H', &['X', 'Y']).unwrap();
        assert_eq!(solution.route, vec!['H', 'X', 'Y', 'H']);
        assert_eq!(solution.cost, 102.0);
        solution.verify(&matrix, &'H', &['X', 'Y']).unwrap();
    }

    #[test]
    fn test_nearest_neighbor_empty() {
        let matrix = fixture();
        let solution = heuristic_nearest_neighbor(&matrix, &"D", &[]).unwrap();
        assert_eq!(solution.route, vec!["D", "D"]);
        assert_eq!(solution.cost, 0.0);
    }
}
