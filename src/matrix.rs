//! Directed cost matrix over labelled locations.
//!
//! Costs are stored densely in row-major order and addressed either by label
//! or by the label's position. Nothing here assumes `cost(a, b) == cost(b, a)`.

use crate::error::{Result, TspError};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// A location identifier: any comparable, hashable token naming a node.
pub trait Location: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Location for T {}

/// Square matrix of non-negative travel costs between every pair of locations
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix<L: Location> {
    labels: Vec<L>,
    index: HashMap<L, usize>,
    costs: Vec<f64>,
}

impl<L: Location> CostMatrix<L> {
    /// Build a matrix from one row of costs per label.
    ///
    /// `rows[i][j]` is the cost of travelling from `labels[i]` to `labels[j]`.
    pub fn new(labels: Vec<L>, rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = labels.len();
        if rows.len() != n {
            return Err(TspError::DimensionMismatch { expected: n, found: rows.len() });
        }

        let index = Self::build_index(&labels)?;
        let mut costs = Vec::with_capacity(n * n);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(TspError::DimensionMismatch { expected: n, found: row.len() });
            }
            for (j, cost) in row.into_iter().enumerate() {
                Self::check_cost(&labels[i], &labels[j], cost)?;
                costs.push(cost);
            }
        }

        Ok(CostMatrix { labels, index, costs })
    }

    /// Build a matrix by evaluating `cost_fn` on every ordered pair of labels
    pub fn from_fn<F>(labels: Vec<L>, mut cost_fn: F) -> Result<Self>
    where
        F: FnMut(&L, &L) -> f64,
    {
        let index = Self::build_index(&labels)?;
        let n = labels.len();
        let mut costs = Vec::with_capacity(n * n);

        for from in &labels {
            for to in &labels {
                let cost = if from == to { 0.0 } else { cost_fn(from, to) };
                Self::check_cost(from, to, cost)?;
                costs.push(cost);
            }
        }

        Ok(CostMatrix { labels, index, costs })
    }

    /// Build a matrix from a sparse `(origin, destination) -> cost` mapping.
    ///
    /// Every off-diagonal pair among `labels` must be present exactly once; a
    /// missing self-cost defaults to 0. Pairs naming labels outside `labels` are rejected.
    pub fn from_pairs<I>(labels: Vec<L>, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = ((L, L), f64)>,
    {
        let index = Self::build_index(&labels)?;
        let n = labels.len();
        let mut costs: Vec<Option<f64>> = vec![None; n * n];

        for ((from, to), cost) in pairs {
            let i = *index
                .get(&from)
                .ok_or_else(|| TspError::UnknownLocation(format!("{:?}", from)))?;
            let j = *index
                .get(&to)
                .ok_or_else(|| TspError::UnknownLocation(format!("{:?}", to)))?;
            Self::check_cost(&from, &to, cost)?;
            if costs[i * n + j].replace(cost).is_some() {
                return Err(TspError::DuplicateLocation(format!("({:?}, {:?})", from, to)));
            }
        }

        let mut dense = Vec::with_capacity(n * n);
        for (k, cost) in costs.into_iter().enumerate() {
            let (i, j) = (k / n, k % n);
            match cost {
                Some(c) => dense.push(c),
                None if i == j => dense.push(0.0),
                None => {
                    return Err(TspError::MissingCost {
                        from: format!("{:?}", labels[i]),
                        to: format!("{:?}", labels[j]),
                    })
                }
            }
        }

        Ok(CostMatrix { labels, index, costs: dense })
    }

    fn build_index(labels: &[L]) -> Result<HashMap<L, usize>> {
        let mut index = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            if index.insert(label.clone(), i).is_some() {
                return Err(TspError::DuplicateLocation(format!("{:?}", label)));
            }
        }
        Ok(index)
    }

    fn check_cost(from: &L, to: &L, cost: f64) -> Result<()> {
        if cost.is_finite() && cost >= 0.0 {
            Ok(())
        } else {
            Err(TspError::InvalidCost {
                from: format!("{:?}", from),
                to: format!("{:?}", to),
                cost,
            })
        }
    }

    /// Number of locations
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Location labels in matrix order
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Position of a label in the matrix
    pub fn index_of(&self, label: &L) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn contains(&self, label: &L) -> bool {
        self.index.contains_key(label)
    }

    /// Directed cost between two positions
    #[inline]
    pub fn cost_at(&self, from: usize, to: usize) -> f64 {
        self.costs[from * self.labels.len() + to]
    }

    /// Directed cost between two labels, if both are known
    pub fn cost(&self, from: &L, to: &L) -> Option<f64> {
        let i = self.index_of(from)?;
        let j = self.index_of(to)?;
        Some(self.cost_at(i, j))
    }

    /// Sum of directed costs over consecutive pairs of `route`
    pub fn route_cost(&self, route: &[L]) -> Result<f64> {
        let positions = route
            .iter()
            .map(|label| {
                self.index_of(label)
                    .ok_or_else(|| TspError::UnknownLocation(format!("{:?}", label)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(positions.windows(2).map(|w| self.cost_at(w[0], w[1])).sum())
    }

    /// Whether `cost(a, b) == cost(b, a)` holds for every pair
    pub fn is_symmetric(&self) -> bool {
        let n = self.labels.len();
        (0..n).all(|i| (i + 1..n).all(|j| self.cost_at(i, j) == self.cost_at(j, i)))
    }

    /// Costs of all ordered pairs of distinct locations
    pub fn off_diagonal(&self) -> impl Iterator<Item = f64> + '_ {
        let n = self.labels.len();
        (0..n).flat_map(move |i| (0..n).filter(move |&j| j != i).map(move |j| self.cost_at(i, j)))
    }
}
