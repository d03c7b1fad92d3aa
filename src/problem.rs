//! Validated, index-based view of a single solve call.
//!
//! All solvers go through [`Problem::new`] so that input normalization is
//! identical between them. Local index 0 is the home location, local indices
//! `1..=n` are the locations to visit in the order they were given.

use crate::error::{Result, TspError};
use crate::matrix::{CostMatrix, Location};
use crate::solution::Solution;
use std::collections::HashSet;

pub(crate) struct Problem<'a, L: Location> {
    matrix: &'a CostMatrix<L>,
    /// Matrix positions by local index
    nodes: Vec<usize>,
}

impl<'a, L: Location> Problem<'a, L> {
    /// Resolve and validate `home` and `visit` against `matrix`.
    ///
    /// Fails if a location is unknown, if `visit` has duplicates, or if
    /// `visit` contains the home location.
    pub fn new(matrix: &'a CostMatrix<L>, home: &L, visit: &[L]) -> Result<Self> {
        let home_pos = matrix
            .index_of(home)
            .ok_or_else(|| TspError::UnknownLocation(format!("{:?}", home)))?;

        let mut nodes = Vec::with_capacity(visit.len() + 1);
        nodes.push(home_pos);

        let mut seen = HashSet::with_capacity(visit.len());
        for location in visit {
            if location == home {
                return Err(TspError::HomeInVisitList(format!("{:?}", home)));
            }
            if !seen.insert(location) {
                return Err(TspError::DuplicateLocation(format!("{:?}", location)));
            }
            let pos = matrix
                .index_of(location)
                .ok_or_else(|| TspError::UnknownLocation(format!("{:?}", location)))?;
            nodes.push(pos);
        }

        Ok(Problem { matrix, nodes })
    }

    /// Number of locations to visit (home excluded)
    #[inline]
    pub fn num_stops(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Directed cost between two local indices
    #[inline]
    pub fn cost(&self, from: usize, to: usize) -> f64 {
        self.matrix.cost_at(self.nodes[from], self.nodes[to])
    }

    /// Cost of `home -> order... -> home`, summed left to right
    pub fn tour_cost(&self, order: &[usize]) -> f64 {
        let mut cost = 0.0;
        let mut current = 0;
        for &next in order {
            cost += self.cost(current, next);
            current = next;
        }
        cost + self.cost(current, 0)
    }

    fn label(&self, local: usize) -> &L {
        &self.matrix.labels()[self.nodes[local]]
    }

    /// Materialize a closed route from the interior `order` of local indices
    pub fn solution(&self, order: &[usize], cost: f64) -> Solution<L> {
        let mut route = Vec::with_capacity(order.len() + 2);
        route.push(self.label(0).clone());
        route.extend(order.iter().map(|&local| self.label(local).clone()));
        route.push(self.label(0).clone());
        Solution::new(route, cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> CostMatrix<char> {
        CostMatrix::from_fn(vec!['H', 'X', 'Y'], |a, b| match (a, b) {
            ('H', 'X') | ('X', 'Y') | ('Y', 'H') => 1.0,
            _ => 10.0,
        })
        .unwrap()
    }

    #[test]
    fn test_local_indexing() {
        let matrix = matrix();
        let problem = Problem::new(&matrix, &'H', &['Y', 'X']).unwrap();

        assert_eq!(problem.num_stops(), 2);
        // local 1 = Y, local 2 = X
        assert_eq!(problem.cost(0, 1), 10.0);
        assert_eq!(problem.cost(0, 2), 1.0);
        assert_eq!(problem.tour_cost(&[2, 1]), 3.0);

        let solution = problem.solution(&[2, 1], 3.0);
        assert_eq!(solution.route, vec!['H', 'X', 'Y', 'H']);
    }

    #[test]
    fn test_validation() {
        let matrix = matrix();

        assert!(matches!(
            Problem::new(&matrix, &'Q', &['X']),
            Err(TspError::UnknownLocation(_))
        ));
        assert!(matches!(
            Problem::new(&matrix, &'H', &['X', 'Q']),
            Err(TspError::UnknownLocation(_))
        ));
        assert!(matches!(
            Problem::new(&matrix, &'H', &['X', 'X']),
            Err(TspError::DuplicateLocation(_))
        ));
        assert!(matches!(
            Problem::new(&matrix, &'H', &['X', 'H']),
            Err(TspError::HomeInVisitList(_))
        ));
    }
}
