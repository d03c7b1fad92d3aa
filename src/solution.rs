//! Solution representation for TSP routes.
//!
//! A solution is a closed route starting and ending at the home location
//! together with its total directed cost.

use crate::error::{Result, TspError};
use crate::matrix::{CostMatrix, Location};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Relative tolerance used when cross-checking a reported cost
const COST_TOLERANCE: f64 = 1e-9;

/// A closed route and its total cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution<L> {
    /// Visit order, `route[0] == route[route.len() - 1] == home`
    pub route: Vec<L>,
    /// Sum of the directed costs of consecutive route legs
    pub cost: f64,
}

impl<L: Location> Solution<L> {
    pub fn new(route: Vec<L>, cost: f64) -> Self {
        Solution { route, cost }
    }

    /// The zero-cost round trip `[home, home]` returned when nothing is to be visited
    pub fn round_trip(home: &L) -> Self {
        Solution {
            route: vec![home.clone(), home.clone()],
            cost: 0.0,
        }
    }

    /// Start (and end) of the route
    pub fn home(&self) -> Option<&L> {
        self.route.first()
    }

    /// Locations visited between leaving and returning home
    pub fn stops(&self) -> &[L] {
        if self.route.len() < 2 {
            &[]
        } else {
            &self.route[1..self.route.len() - 1]
        }
    }

    /// Number of legs travelled
    pub fn num_legs(&self) -> usize {
        self.route.len().saturating_sub(1)
    }

    /// Check that this is a closed tour at `home` visiting each of `visit`
    /// exactly once and that `cost` matches the route under `matrix`.
    pub fn verify(&self, matrix: &CostMatrix<L>, home: &L, visit: &[L]) -> Result<()> {
        if self.route.len() != visit.len() + 2 {
            return Err(TspError::InvalidRoute(format!(
                "expected {} locations, found {}",
                visit.len() + 2,
                self.route.len()
            )));
        }
        if self.route.first() != Some(home) || self.route.last() != Some(home) {
            return Err(TspError::InvalidRoute(format!(
                "route must start and end at {:?}",
                home
            )));
        }

        let expected: HashSet<&L> = visit.iter().collect();
        let mut seen = HashSet::with_capacity(visit.len());
        for stop in self.stops() {
            if !expected.contains(stop) {
                return Err(TspError::InvalidRoute(format!("unexpected stop {:?}", stop)));
            }
            if !seen.insert(stop) {
                return Err(TspError::InvalidRoute(format!("{:?} visited twice", stop)));
            }
        }

        let actual = matrix.route_cost(&self.route)?;
        if (actual - self.cost).abs() > COST_TOLERANCE * actual.abs().max(1.0) {
            return Err(TspError::InvalidRoute(format!(
                "reported cost {} but route costs {}",
                self.cost, actual
            )));
        }

        Ok(())
    }
}

impl<L: std::fmt::Display> std::fmt::Display for Solution<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, location) in self.route.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", location)?;
        }
        write!(f, " ({:.2})", self.cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let sol = Solution::round_trip(&"A");
        assert_eq!(sol.route, vec!["A", "A"]);
        assert_eq!(sol.cost, 0.0);
        assert!(sol.stops().is_empty());
        assert_eq!(sol.num_legs(), 1);
    }

    #[test]
    fn test_display() {
        let sol = Solution::new(vec!["A", "B", "A"], 20.0);
        assert_eq!(sol.to_string(), "A -> B -> A (20.00)");
    }

    #[test]
    fn test_verify() {
        let matrix = CostMatrix::from_fn(vec!["A", "B", "C"], |_, _| 5.0).unwrap();
        let visit = ["B", "C"];

        let good = Solution::new(vec!["A", "C", "B", "A"], 15.0);
        assert!(good.verify(&matrix, &"A", &visit).is_ok());

        let wrong_cost = Solution::new(vec!["A", "C", "B", "A"], 14.0);
        assert!(wrong_cost.verify(&matrix, &"A", &visit).is_err());

        let not_closed = Solution::new(vec!["A", "C", "B", "C"], 15.0);
        assert!(not_closed.verify(&matrix, &"A", &visit).is_err());

        let repeated = Solution::new(vec!["A", "C", "C", "A"], 15.0);
        assert!(repeated.verify(&matrix, &"A", &visit).is_err());
    }
}
