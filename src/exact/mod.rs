//! Exact solvers module.
//!
//! Both solvers return an optimal tour. Their running time is exponential in
//! the number of stops, so callers are expected to bound the input size
//! beforehand (see [`crate::solver::SolverConfig`]).

mod brute_force;
mod held_karp;

pub use brute_force::exact_brute_force;
pub use held_karp::exact_dynamic_programming;
