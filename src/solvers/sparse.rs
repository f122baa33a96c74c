/*!
Sparse subproblems.

A sparse subproblem is the search space of patterns within the markers of a single cut.
Markers of the cut and all individuals are binary variables.

# Presolve

When sparse constraints are enabled, free individuals are fixed before the model is built:
- An individual which carries fewer than *k* of the markers of the cut carries no pattern of the subproblem, and is fixed to zero.
- An individual which carries every marker of the cut carries every pattern of the subproblem, and is fixed to one.

# Cuts

A stored cut excludes patterns containing every marker of the cut.
Within the subproblem, only the markers of the stored cut which are also markers of the subproblem matter, and if there are at most *k* − 1 such markers no pattern of the subproblem is excluded.
Otherwise, the markers in common sum to at most *k* − 1.

# Pools

By default, a single best pattern is found.
When collecting solutions above a threshold, patterns are found one after another, each excluded from later solves, until no pattern reaches the threshold or the pool limit is reached.
*/

use std::sync::Arc;

use good_lp::{
    default_solver, variable, Expression, IntoAffineExpression, ProblemVariables, ResolutionError,
    Solution as _, SolverModel, VariableDefinition,
};

use crate::{
    config::Config,
    dataset::Dataset,
    misc::log::targets::SPARSE,
    solvers::{
        relaxation::{linking_constraint, objective_expression},
        SparseProblem, SparseSolver,
    },
    structures::{domain::Domain, solution::Solution},
    types::err::{self, ErrorKind, SolverError},
};

/// The sparse subproblem solver, built on [good_lp].
#[derive(Clone, Debug)]
pub struct LpSparse {
    data: Arc<Dataset>,

    config: Config,
}

impl LpSparse {
    pub fn new(data: Arc<Dataset>, config: Config) -> Self {
        LpSparse { data, config }
    }

    /// Domains of individuals, with free individuals fixed where the markers of the cut decide the value.
    fn presolve(&self, problem: &SparseProblem, markers: &[usize]) -> Vec<Domain> {
        let k = self.data.pattern_size();
        let mut domains = problem.individual_domains.clone();

        if !self.config.switch.sparse_constraints {
            return domains;
        }

        for (individual, domain) in domains.iter_mut().enumerate() {
            if domain.is_set() {
                continue;
            }

            let carried = markers
                .iter()
                .filter(|marker| self.data.carries(**marker, individual))
                .count();

            if carried < k {
                domain.fix(false);
            } else if carried == markers.len() {
                domain.fix(true);
            }
        }

        domains
    }

    /// Solves the model of the subproblem, with each pattern of `excluded` forbidden.
    ///
    /// Returns the pattern found, or None if the model is infeasible.
    fn solve_model(
        &self,
        problem: &SparseProblem,
        markers: &[usize],
        individual_domains: &[Domain],
        excluded: &[Vec<usize>],
    ) -> Result<Option<Vec<usize>>, ErrorKind> {
        let k = self.data.pattern_size() as f64;

        let mut vars = ProblemVariables::new();
        let marker_vars = markers
            .iter()
            .map(|marker| vars.add(binary(problem.marker_domains[*marker])))
            .collect::<Vec<_>>();
        let individual_vars = individual_domains
            .iter()
            .map(|domain| vars.add(binary(*domain)))
            .collect::<Vec<_>>();

        let objective = objective_expression(&self.data, &individual_vars);
        let mut model = vars.maximise(objective.clone()).using(default_solver);

        model.add_constraint(marker_vars.iter().sum::<Expression>().eq(k));

        for (individual, individual_var) in individual_vars.iter().enumerate() {
            let carried = markers
                .iter()
                .zip(&marker_vars)
                .filter(|(marker, _)| self.data.carries(**marker, individual))
                .map(|(_, var)| *var)
                .collect::<Vec<_>>();
            model.add_constraint(linking_constraint(
                self.data.group(individual),
                k,
                *individual_var,
                &carried,
            ));
        }

        for cut in &problem.cuts {
            let common = markers
                .iter()
                .zip(&marker_vars)
                .filter(|(marker, _)| cut.contains(**marker))
                .map(|(_, var)| *var)
                .collect::<Vec<_>>();
            if common.len() >= self.data.pattern_size() {
                model.add_constraint(common.iter().sum::<Expression>().leq(k - 1.0));
            }
        }

        for pattern in excluded {
            let pattern_vars = markers
                .iter()
                .zip(&marker_vars)
                .filter(|(marker, _)| pattern.contains(*marker))
                .map(|(_, var)| *var)
                .collect::<Vec<_>>();
            model.add_constraint(pattern_vars.iter().sum::<Expression>().leq(k - 1.0));
        }

        if self.config.switch.pool_threshold {
            model.add_constraint(objective.geq(self.config.pool_threshold.value));
        } else if self.config.switch.lower_cutoff {
            model.add_constraint(objective.geq(problem.threshold));
        }

        let solution = match model.solve() {
            Ok(solution) => solution,
            Err(ResolutionError::Infeasible) => return Ok(None),
            Err(e) => return Err(err::ErrorKind::from(SolverError::Status(e.to_string()))),
        };

        let pattern = markers
            .iter()
            .zip(&marker_vars)
            .filter(|(_, var)| solution.value(**var) > 0.5)
            .map(|(marker, _)| *marker)
            .collect::<Vec<_>>();

        match pattern.len() == self.data.pattern_size() {
            true => Ok(Some(pattern)),
            false => Err(err::ErrorKind::from(SolverError::PatternSize {
                expected: self.data.pattern_size(),
                found: pattern.len(),
            })),
        }
    }
}

/// A binary variable, or fixed to the value of a fixed domain.
fn binary(domain: Domain) -> VariableDefinition {
    match domain.value() {
        None => variable().integer().min(0).max(1),
        Some(value) => {
            let value = value as u8 as f64;
            variable().integer().min(value).max(value)
        }
    }
}

impl SparseSolver for LpSparse {
    fn solve(&mut self, problem: &SparseProblem) -> Result<Vec<Solution>, ErrorKind> {
        let markers = problem
            .cut
            .iter_elements()
            .filter(|marker| !problem.marker_domains[*marker].is_zero())
            .collect::<Vec<_>>();

        if markers.len() < self.data.pattern_size() {
            log::trace!(target: SPARSE, "Cut {} is smaller than a pattern", problem.cut);
            return Ok(Vec::default());
        }

        let individual_domains = self.presolve(problem, &markers);

        let limit = match self.config.switch.pool_threshold {
            true => self.config.pool_limit.value,
            false => 1,
        };

        let mut found: Vec<Vec<usize>> = Vec::default();
        while found.len() < limit {
            match self.solve_model(problem, &markers, &individual_domains, &found)? {
                Some(pattern) => found.push(pattern),
                None => break,
            }
        }

        let mut pool = found
            .into_iter()
            .map(|pattern| {
                let obj_value = self.data.objective_of(&pattern);
                Solution::new(pattern, obj_value)
            })
            .filter(|solution| {
                solution.obj_value() >= problem.threshold && solution.obj_value() > 0.0
            })
            .collect::<Vec<_>>();

        pool.sort_by(|a, b| b.cmp(a));
        pool.dedup();

        log::trace!(target: SPARSE, "Cut {} gave {} solutions", problem.cut, pool.len());
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::{cut::Cut, domain::Group};

    /// The pattern {0, 1} is carried by both group one individuals and neither group two individual.
    fn data() -> Arc<Dataset> {
        let states = vec![
            vec![true, true, false, false],
            vec![true, true, true, false],
            vec![true, false, false, true],
            vec![false, true, true, true],
        ];
        let groups = vec![Group::One, Group::One, Group::Two, Group::Two];
        Arc::new(Dataset::new(states, groups, 2).expect("valid"))
    }

    fn problem(cut: &[usize], cuts: &[&[usize]]) -> SparseProblem {
        SparseProblem {
            threshold: 0.0,
            cut: Cut::from_elements(4, cut),
            cuts: cuts.iter().map(|c| Cut::from_elements(4, c)).collect(),
            marker_domains: vec![Domain::Free; 4],
            individual_domains: vec![Domain::Free; 4],
        }
    }

    #[test]
    fn best_pattern() {
        let mut solver = LpSparse::new(data(), Config::default());
        let pool = solver.solve(&problem(&[0, 1, 2, 3], &[])).expect("solved");

        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].markers(), &[0, 1]);
        assert_eq!(pool[0].obj_value(), 1.0);
    }

    #[test]
    fn stored_cuts_exclude() {
        let mut solver = LpSparse::new(data(), Config::default());
        let pool = solver
            .solve(&problem(&[0, 1, 2, 3], &[&[0, 1]]))
            .expect("solved");

        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].obj_value(), 0.5);
        assert!(!pool[0].contains_cut(&Cut::from_elements(4, &[0, 1])));
    }

    #[test]
    fn small_cut_is_empty() {
        let mut solver = LpSparse::new(data(), Config::default());
        let mut problem = problem(&[0, 1], &[]);
        problem.marker_domains[1] = Domain::Zero;

        assert!(solver.solve(&problem).expect("solved").is_empty());
    }

    #[test]
    fn pool_above_threshold() {
        let mut config = Config::default();
        config.switch.pool_threshold = true;
        config.pool_threshold.value = 0.4;
        config.pool_limit.value = 10;

        let mut solver = LpSparse::new(data(), config);
        let pool = solver.solve(&problem(&[0, 1, 2, 3], &[])).expect("solved");

        assert_eq!(pool.len(), 4);
        assert_eq!(pool[0].markers(), &[0, 1]);
        assert!(pool.iter().skip(1).all(|s| s.obj_value() == 0.5));
    }

    #[test]
    fn presolve_fixes() {
        let solver = LpSparse::new(data(), Config::default());
        let problem = problem(&[0, 1], &[]);
        let domains = solver.presolve(&problem, &[0, 1]);

        assert_eq!(domains, vec![Domain::One, Domain::One, Domain::Zero, Domain::Zero]);
    }
}
