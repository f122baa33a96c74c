/*!
The relaxation of the remaining search space.

Every marker and individual is a continuous variable in \[0, 1\], or fixed to the value of a fixed domain.
In addition to the constraints shared with sparse subproblems, each recorded equality between individuals is an equality between the variables of the individuals.

The objective value of the relaxation is an upper bound on the objective value of any pattern which does not contain a stored cut.
*/

use good_lp::{
    default_solver, variable, Constraint, Expression, IntoAffineExpression, ProblemVariables,
    ResolutionError, Solution as _, SolverModel, Variable, VariableDefinition,
};

use crate::{
    context::SearchContext,
    dataset::Dataset,
    misc::log::targets::RELAXATION,
    solvers::{round_within, Relaxation, RelaxationSolver},
    structures::domain::{Domain, Group},
    types::err::{self, ErrorKind, SolverError},
};

/// The relaxation solver, built on [good_lp].
#[derive(Clone, Copy, Debug, Default)]
pub struct LpRelaxation;

impl RelaxationSolver for LpRelaxation {
    fn solve(&mut self, ctx: &SearchContext) -> Result<Relaxation, ErrorKind> {
        let k = ctx.pattern_size() as f64;
        let tolerance = ctx.config.tolerance.value;

        let mut vars = ProblemVariables::new();
        let marker_vars = ctx
            .markers
            .iter()
            .map(|marker| vars.add(continuous(marker.domain())))
            .collect::<Vec<_>>();
        let individual_vars = ctx
            .individuals
            .iter()
            .map(|individual| vars.add(continuous(individual.domain())))
            .collect::<Vec<_>>();

        let objective = objective_expression(&ctx.data, &individual_vars);
        let mut model = vars.maximise(objective).using(default_solver);

        model.add_constraint(marker_vars.iter().sum::<Expression>().eq(k));

        for (individual, individual_var) in individual_vars.iter().enumerate() {
            let carried = ctx
                .data
                .carried_by(individual)
                .map(|marker| marker_vars[marker])
                .collect::<Vec<_>>();
            model.add_constraint(linking_constraint(
                ctx.data.group(individual),
                k,
                *individual_var,
                &carried,
            ));
        }

        for (x, y) in ctx.equalities.pairs() {
            model.add_constraint(individual_vars[x].into_expression().eq(individual_vars[y]));
        }

        for cut in ctx.cut_set.iter() {
            let cut_vars = cut
                .iter_elements()
                .map(|marker| marker_vars[marker])
                .collect::<Vec<_>>();
            model.add_constraint(cut_vars.iter().sum::<Expression>().leq(k - 1.0));
        }

        let solution = match model.solve() {
            Ok(solution) => solution,

            Err(ResolutionError::Infeasible) => {
                log::debug!(target: RELAXATION, "Infeasible relaxation");
                return Ok(Relaxation::infeasible(marker_vars.len(), individual_vars.len()));
            }

            Err(e) => return Err(err::ErrorKind::from(SolverError::Status(e.to_string()))),
        };

        let raw_individual_values = individual_vars
            .iter()
            .map(|var| solution.value(*var))
            .collect::<Vec<_>>();

        let obj_value = objective_value(&ctx.data, &raw_individual_values);

        let relaxation = Relaxation {
            obj_value,
            marker_values: marker_vars
                .iter()
                .map(|var| round_within(solution.value(*var), tolerance))
                .collect(),
            individual_values: raw_individual_values
                .into_iter()
                .map(|value| round_within(value, tolerance))
                .collect(),
            infeasible: false,
        };

        log::trace!(target: RELAXATION, "Relaxation objective {obj_value}");
        Ok(relaxation)
    }
}

/// A variable in \[0, 1\], or fixed to the value of a fixed domain.
fn continuous(domain: Domain) -> VariableDefinition {
    match domain.value() {
        None => variable().min(0.0).max(1.0),
        Some(value) => {
            let value = value as u8 as f64;
            variable().min(value).max(value)
        }
    }
}

/// The ratio of group one individuals less the ratio of group two individuals.
pub(crate) fn objective_expression(data: &Dataset, individual_vars: &[Variable]) -> Expression {
    let grp_one_weight = 1.0 / data.num_grp_one() as f64;
    let grp_two_weight = 1.0 / data.num_grp_two() as f64;

    let mut objective = Expression::from(0.0);
    for (individual, var) in individual_vars.iter().enumerate() {
        match data.group(individual) {
            Group::One => objective += grp_one_weight * *var,
            Group::Two => objective -= grp_two_weight * *var,
        }
    }
    objective
}

/// The objective value, given the value of each individual.
pub(crate) fn objective_value(data: &Dataset, individual_values: &[f64]) -> f64 {
    let grp_one_weight = 1.0 / data.num_grp_one() as f64;
    let grp_two_weight = 1.0 / data.num_grp_two() as f64;

    individual_values
        .iter()
        .enumerate()
        .map(|(individual, value)| match data.group(individual) {
            Group::One => grp_one_weight * value,
            Group::Two => -grp_two_weight * value,
        })
        .sum()
}

/// The constraint linking the value of an individual to the markers the individual carries.
pub(crate) fn linking_constraint(
    group: Group,
    pattern_size: f64,
    individual_var: Variable,
    carried: &[Variable],
) -> Constraint {
    let carried = carried.iter().sum::<Expression>();
    match group {
        Group::One => (pattern_size * individual_var).leq(carried),
        Group::Two => individual_var
            .into_expression()
            .geq(carried - (pattern_size - 1.0)),
    }
}
