//! Heuristics module.
//!
//! Approximate solvers whose results are upper bounds on the optimal tour cost.

pub mod nearest_neighbor;

pub use nearest_neighbor::heuristic_nearest_neighbor;
