//! Algorithm selection and caller-side size limits.
//!
//! The solver functions themselves never refuse an input for being too
//! large. [`SolverConfig`] is the guard a caller puts in front of them.

use crate::error::{Result, TspError};
use crate::exact::{exact_brute_force, exact_dynamic_programming};
use crate::heuristics::heuristic_nearest_neighbor;
use crate::matrix::{CostMatrix, Location};
use crate::solution::Solution;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// The available route-finding strategies
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Algorithm {
    BruteForce,
    DynamicProgramming,
    NearestNeighbor,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::BruteForce,
        Algorithm::DynamicProgramming,
        Algorithm::NearestNeighbor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::BruteForce => "Brute Force",
            Algorithm::DynamicProgramming => "Dynamic Programming",
            Algorithm::NearestNeighbor => "Nearest Neighbor",
        }
    }

    /// Time complexity in the number of stops
    pub fn complexity(&self) -> &'static str {
        match self {
            Algorithm::BruteForce => "O(n!)",
            Algorithm::DynamicProgramming => "O(n²·2ⁿ)",
            Algorithm::NearestNeighbor => "O(n²)",
        }
    }

    /// Whether the algorithm always returns an optimal tour
    pub fn is_exact(&self) -> bool {
        !matches!(self, Algorithm::NearestNeighbor)
    }

    /// Run the algorithm without any size check
    pub fn solve<L: Location>(
        &self,
        matrix: &CostMatrix<L>,
        home: &L,
        visit: &[L],
    ) -> Result<Solution<L>> {
        match self {
            Algorithm::BruteForce => exact_brute_force(matrix, home, visit),
            Algorithm::DynamicProgramming => exact_dynamic_programming(matrix, home, visit),
            Algorithm::NearestNeighbor => heuristic_nearest_neighbor(matrix, home, visit),
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Upper bounds on the number of stops each exact algorithm is allowed to take
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub max_brute_force: usize,
    pub max_dynamic_programming: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            max_brute_force: 10,
            max_dynamic_programming: 20,
        }
    }
}

/// One timed solver invocation
#[derive(Debug, Clone)]
pub struct AlgorithmRun<L> {
    pub algorithm: Algorithm,
    pub solution: Solution<L>,
    /// Wall-clock time in seconds
    pub elapsed: f64,
}

impl SolverConfig {
    /// Stop limit for `algorithm`, `None` when unbounded
    pub fn limit(&self, algorithm: Algorithm) -> Option<usize> {
        match algorithm {
            Algorithm::BruteForce => Some(self.max_brute_force),
            Algorithm::DynamicProgramming => Some(self.max_dynamic_programming),
            Algorithm::NearestNeighbor => None,
        }
    }

    pub fn allows(&self, algorithm: Algorithm, num_stops: usize) -> bool {
        self.limit(algorithm).map_or(true, |limit| num_stops <= limit)
    }

    pub fn check(&self, algorithm: Algorithm, num_stops: usize) -> Result<()> {
        match self.limit(algorithm) {
            Some(limit) if num_stops > limit => Err(TspError::TooManyLocations {
                algorithm: algorithm.name().to_string(),
                requested: num_stops,
                limit,
            }),
            _ => Ok(()),
        }
    }

    /// Run `algorithm` after checking the input size against its limit
    pub fn solve<L: Location>(
        &self,
        algorithm: Algorithm,
        matrix: &CostMatrix<L>,
        home: &L,
        visit: &[L],
    ) -> Result<Solution<L>> {
        self.check(algorithm, visit.len())?;
        algorithm.solve(matrix, home, visit)
    }

    /// Time a single guarded run
    pub fn run<L: Location>(
        &self,
        algorithm: Algorithm,
        matrix: &CostMatrix<L>,
        home: &L,
        visit: &[L],
    ) -> Result<AlgorithmRun<L>> {
        self.check(algorithm, visit.len())?;
        let start = Instant::now();
        let solution = algorithm.solve(matrix, home, visit)?;
        let elapsed = start.elapsed().as_secs_f64();

        log::debug!("{}: cost {:.2} in {:.6}s", algorithm, solution.cost, elapsed);

        Ok(AlgorithmRun { algorithm, solution, elapsed })
    }

    /// Run every algorithm the limits allow, in [`Algorithm::ALL`] order
    pub fn run_all<L: Location>(
        &self,
        matrix: &CostMatrix<L>,
        home: &L,
        visit: &[L],
    ) -> Result<Vec<AlgorithmRun<L>>> {
        let mut runs = Vec::with_capacity(Algorithm::ALL.len());
        for algorithm in Algorithm::ALL {
            if !self.allows(algorithm, visit.len()) {
                log::warn!(
                    "Skipping {}: {} stops exceeds its limit",
                    algorithm,
                    visit.len()
                );
                continue;
            }
            runs.push(self.run(algorithm, matrix, home, visit)?);
        }
        Ok(runs)
    }
}

/// The run with the cheapest route, the earliest one on ties
pub fn best_run<L>(runs: &[AlgorithmRun<L>]) -> Option<&AlgorithmRun<L>> {
    runs.iter().min_by_key(|run| OrderedFloat(run.solution.cost))
}
