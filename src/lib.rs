//! TSP Solver Library
//!
//! Route-finding over a fixed set of locations and a precomputed, possibly
//! asymmetric, cost matrix. Every route starts and ends at a home location
//! and visits each requested location exactly once.
//!
//! # Features
//!
//! - Exact brute force search over all visiting orders
//! - Exact Held-Karp dynamic programming over bitmask-indexed subsets
//! - Nearest Neighbor construction heuristic
//! - Caller-side size limits, random instance generation, JSON instances
//! - Benchmarking tools
//!
//! # Example
//!
//! ```
//! use tsp_solver::{exact_dynamic_programming, heuristic_nearest_neighbor, CostMatrix};
//!
//! let matrix = CostMatrix::new(
//!     vec!["A", "B", "C", "D"],
//!     vec![
//!         vec![0.0, 10.0, 15.0, 20.0],
//!         vec![10.0, 0.0, 35.0, 25.0],
//!         vec![15.0, 35.0, 0.0, 30.0],
//!         vec![20.0, 25.0, 30.0, 0.0],
//!     ],
//! )
//! .unwrap();
//!
//! let optimal = exact_dynamic_programming(&matrix, &"A", &["B", "C", "D"]).unwrap();
//! let greedy = heuristic_nearest_neighbor(&matrix, &"A", &["B", "C", "D"]).unwrap();
//!
//! assert_eq!(optimal.cost, 80.0);
//! assert!(greedy.cost >= optimal.cost);
//! ```
//!
//! The exact solvers are exponential in the number of stops. Bound the input
//! size before calling them, for instance with [`SolverConfig`].

pub mod error;
pub mod matrix;
mod problem;
pub mod solution;
pub mod exact;
pub mod heuristics;
pub mod solver;
pub mod instance;
pub mod benchmark;

pub use error::{Result, TspError};
pub use exact::{exact_brute_force, exact_dynamic_programming};
pub use heuristics::heuristic_nearest_neighbor;
pub use instance::{City, Instance};
pub use matrix::{CostMatrix, Location};
pub use solution::Solution;
pub use solver::{Algorithm, SolverConfig};
