/*!
Solvers of the two models used in a search.

# Overview

A search alternates between two models:

- The [relaxation](relaxation), solved by the controller over the whole search space, with continuous variables.
  The objective of the relaxation bounds the objective of every pattern not yet excluded by a cut, and the values of markers guide the creation of the next cut.
- [Sparse subproblems](sparse), solved by workers over the markers of a single cut, with binary variables.
  Each sparse subproblem examines every pattern within the cut, and returns the best found.

Each model is solved through a trait, so the controller may be driven by any backend.
The backends provided build models with [good_lp](https://docs.rs/good_lp), using the pure Rust microlp solver.

Both models share variables and constraints:

- A variable for each marker, and for each individual.
- The objective: the ratio of group one individuals less the ratio of group two individuals, among individuals with value one.
- The markers of a pattern sum to the pattern size *k*.
- A group one individual may have value one only if the individual carries every marker of the pattern, so *k*·i ≤ Σ carried markers.
- A group two individual must have value one if the individual carries every marker of the pattern, so i ≥ Σ carried markers − *k* + 1.
- The markers of a cut sum to at most *k* − 1.
- A fixed domain bounds the variable to the fixed value.
*/

pub mod relaxation;
pub mod sparse;

use crate::{
    context::SearchContext,
    structures::{cut::Cut, domain::Domain, solution::Solution},
    types::err::ErrorKind,
};

/// The values found by a solve of the relaxation.
#[derive(Clone, Debug, Default)]
pub struct Relaxation {
    pub obj_value: f64,

    /// The value of each marker, rounded to zero or one if within tolerance.
    pub marker_values: Vec<f64>,

    /// The value of each individual, rounded to zero or one if within tolerance.
    pub individual_values: Vec<f64>,

    /// Whether the relaxation was found to be infeasible.
    pub infeasible: bool,
}

impl Relaxation {
    /// The outcome of an infeasible relaxation, with an objective value of zero and every value zero.
    pub fn infeasible(num_markers: usize, num_individuals: usize) -> Self {
        Relaxation {
            obj_value: 0.0,
            marker_values: vec![0.0; num_markers],
            individual_values: vec![0.0; num_individuals],
            infeasible: true,
        }
    }

    /// Whether every value is within `tolerance` of zero or one.
    pub fn is_integral(&self, tolerance: f64) -> bool {
        !self.infeasible
            && self
                .marker_values
                .iter()
                .chain(self.individual_values.iter())
                .all(|value| value.abs() <= tolerance || (1.0 - value).abs() <= tolerance)
    }

    /// If the relaxation is integral, the first `pattern_size` markers with a nonzero value.
    pub fn integral_pattern(&self, pattern_size: usize, tolerance: f64) -> Option<Vec<usize>> {
        if !self.is_integral(tolerance) {
            return None;
        }

        let pattern = self
            .marker_values
            .iter()
            .enumerate()
            .filter(|(_, value)| **value > tolerance)
            .map(|(marker, _)| marker)
            .take(pattern_size)
            .collect::<Vec<_>>();

        match pattern.len() == pattern_size {
            true => Some(pattern),
            false => None,
        }
    }
}

/// Rounds `value` to zero or one, if within `tolerance`.
pub(crate) fn round_within(value: f64, tolerance: f64) -> f64 {
    if value.abs() <= tolerance {
        0.0
    } else if (1.0 - value).abs() <= tolerance {
        1.0
    } else {
        value
    }
}

/// A sparse subproblem, as sent to a worker.
#[derive(Clone, Debug)]
pub struct SparseProblem {
    /// The objective value a pattern must reach to be returned.
    pub threshold: f64,

    /// The markers of the subproblem.
    pub cut: Cut,

    /// Every cut issued before the subproblem.
    pub cuts: Vec<Cut>,

    pub marker_domains: Vec<Domain>,

    pub individual_domains: Vec<Domain>,
}

/// A solver of the relaxation of the remaining search space.
pub trait RelaxationSolver {
    /// Solves the relaxation of `ctx`.
    ///
    /// An infeasible relaxation is not an error, and is noted on the returned [Relaxation].
    fn solve(&mut self, ctx: &SearchContext) -> Result<Relaxation, ErrorKind>;
}

/// A solver of sparse subproblems.
///
/// Each worker holds its own solver.
pub trait SparseSolver: Send {
    /// Solves `problem`, returning patterns which reach the threshold of the problem, best first.
    ///
    /// An infeasible subproblem returns no patterns.
    fn solve(&mut self, problem: &SparseProblem) -> Result<Vec<Solution>, ErrorKind>;
}
