/*!
The controller of a search.

# Overview

The controller holds the [search context](crate::context::SearchContext), solves the relaxation, creates cuts, and sends the sparse subproblem of each cut to a worker.
Each iteration moves through the states of [ControllerState]:

1. [SolvingRelaxation](ControllerState::SolvingRelaxation).
   The upper bound is lowered to the objective value of the relaxation, with an infeasible relaxation having an objective value of zero.
   If the relaxation is integral, the pattern of the relaxation is a solution, and both bounds are moved to the objective value of the pattern.
2. [CheckConvergence](ControllerState::CheckConvergence).
   The search has converged when the upper bound is at most the lower bound, or when collecting solutions above a threshold, at most the threshold.
3. [CreateCut](ControllerState::CreateCut).
4. [Dispatch](ControllerState::Dispatch).
   The subproblem of the cut is sent to an idle worker, without hoisted markers, after waiting on a completion if every worker is busy.
   If the cut was made from an individual, every pattern the individual carries is part of the subproblem, and so the individual, and each individual equal to the individual, is fixed to zero.
   The cut is then stored.
   If the lower bound rose, or some individual was fixed, markers below the pruning threshold are fixed, individuals without a pattern are fixed, and equalities are detected.

On completion of a subproblem, the lower bound is raised to the best objective value found, unless collecting solutions above a threshold, and each solution is reported.

A search ends when [converged](ControllerState::Converged), or [stopped](ControllerState::Stopped) by a limit on iterations or time.
In either case, a [checkpoint](crate::checkpoint) is taken, every worker is told to terminate, and busy workers are drained before the final bounds are reported.

On an error from a solver, or from communication with a worker, every worker is terminated before the error is returned.

# Invariants

<div class="warning">
Outside of collecting solutions above a threshold, the lower bound never decreases.
</div>

<div class="warning">
The upper bound never increases.
</div>
*/

use std::{
    collections::VecDeque,
    sync::Arc,
    time::{Duration, Instant},
};

use crate::{
    checkpoint::Checkpoint,
    context::SearchContext,
    dispatch::{Dispatch, Dispatcher, Outcome, PatternSummary, Report, Stat},
    misc::log::targets::CONTROLLER,
    parallel::{pool::WorkerPool, FromWorker},
    procedures::cut_creation::{CutCreator, CutSource},
    solvers::{
        relaxation::LpRelaxation, sparse::LpSparse, RelaxationSolver, SparseProblem, SparseSolver,
    },
    structures::{cut::Cut, solution::Solution},
    types::err::ErrorKind,
};

/// States of the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    SolvingRelaxation,
    CheckConvergence,
    CreateCut,
    Dispatch,
    Converged,
    Stopped,
}

pub struct Controller<R: RelaxationSolver> {
    pub ctx: SearchContext,

    relaxation: R,

    pool: WorkerPool,

    creator: CutCreator,

    state: ControllerState,

    iteration: usize,

    cuts_issued: usize,

    /// Set once the bounds meet above the threshold, when collecting solutions above a threshold.
    true_convergence: bool,

    /// Cuts to issue before any new cut, from a checkpoint.
    pending: VecDeque<Cut>,

    /// Every solution found, in the order found.
    solutions: Vec<Solution>,

    /// The upper and lower bound at the end of each iteration.
    bound_history: Vec<(f64, f64)>,

    /// A checkpoint taken when the search ended.
    exit_checkpoint: Option<Checkpoint>,

    start: Instant,

    /// Total time reported by workers.
    sparse_time: Duration,

    dispatcher: Option<Dispatcher>,
}

impl Controller<LpRelaxation> {
    /// A controller using the [good_lp] solvers, with a sparse solver for each worker.
    pub fn with_lp(ctx: SearchContext) -> Result<Self, ErrorKind> {
        let data = ctx.data.clone();
        let config = ctx.config.clone();
        Controller::new(ctx, LpRelaxation, move |_| {
            LpSparse::new(Arc::clone(&data), config.clone())
        })
    }
}

impl<R: RelaxationSolver> Controller<R> {
    /// A controller of a search of `ctx`, with workers given solvers from `make_solver`.
    ///
    /// The initial round of pruning is applied to the context.
    pub fn new<S, F>(mut ctx: SearchContext, relaxation: R, make_solver: F) -> Result<Self, ErrorKind>
    where
        S: SparseSolver + 'static,
        F: FnMut(usize) -> S,
    {
        ctx.initialise();

        let pool = WorkerPool::spawn(ctx.config.workers.value, make_solver)?;
        let creator = CutCreator::new(ctx.config.seed.value);

        Ok(Controller {
            ctx,
            relaxation,
            pool,
            creator,
            state: ControllerState::SolvingRelaxation,
            iteration: 0,
            cuts_issued: 0,
            true_convergence: false,
            pending: VecDeque::default(),
            solutions: Vec::default(),
            bound_history: Vec::default(),
            exit_checkpoint: None,
            start: Instant::now(),
            sparse_time: Duration::ZERO,
            dispatcher: None,
        })
    }

    pub fn set_dispatcher(&mut self, dispatcher: Dispatcher) {
        self.dispatcher = Some(dispatcher);
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn iterations(&self) -> usize {
        self.iteration
    }

    pub fn cuts_issued(&self) -> usize {
        self.cuts_issued
    }

    pub fn lb(&self) -> f64 {
        self.ctx.lb
    }

    pub fn ub(&self) -> f64 {
        self.ctx.ub
    }

    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    /// The solution with the greatest objective value, if any.
    pub fn best(&self) -> Option<&Solution> {
        self.solutions.iter().max()
    }

    pub fn bound_history(&self) -> &[(f64, f64)] {
        &self.bound_history
    }

    pub fn true_convergence(&self) -> bool {
        self.true_convergence
    }

    /// The checkpoint taken when the search ended, if the search has ended.
    pub fn exit_checkpoint(&self) -> Option<&Checkpoint> {
        self.exit_checkpoint.as_ref()
    }

    /// A checkpoint of the search as it stands, with subproblems in flight noted as uncompleted.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::of(&self.ctx, self.pool.in_flight_cuts())
    }

    /// Restores `checkpoint` to the context, with uncompleted cuts issued before any new cut.
    pub fn resume(&mut self, checkpoint: &Checkpoint) {
        let uncompleted = checkpoint.restore(&mut self.ctx);
        self.pending.extend(uncompleted);

        self.ctx.fix_markers_below_threshold();
        self.ctx.fix_individuals_without_pattern();
        self.ctx.detect_equalities();

        log::info!(target: CONTROLLER, "Resumed with bounds [{}, {}]", self.ctx.lb, self.ctx.ub);
    }

    /// Runs the search until convergence or a limit is reached.
    pub fn run(&mut self) -> Result<Outcome, ErrorKind> {
        self.start = Instant::now();

        let outcome = match self.search() {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!(target: CONTROLLER, "Search failed: {e:?}");
                self.pool.terminate();
                return Err(e);
            }
        };

        self.exit_checkpoint = Some(self.checkpoint());

        if self.pool.num_busy() > 0 {
            log::info!(target: CONTROLLER, "Waiting on {} workers to finish", self.pool.num_busy());
        }

        let mut drain_error = None;
        for (reply, _) in self.pool.terminate() {
            if let Err(e) = self.complete(reply) {
                drain_error.get_or_insert(e);
            }
        }
        if let Some(e) = drain_error {
            return Err(e);
        }

        self.dispatch(|| {
            Dispatch::Report(Report::Bounds {
                iteration: self.iteration,
                ub: self.ctx.ub,
                lb: self.ctx.lb,
                source: None,
            })
        });
        self.dispatch_stats();
        self.dispatch(|| Dispatch::Report(Report::Finish(outcome)));

        log::info!(
            target: CONTROLLER,
            "{outcome} after {} iterations, with bounds [{}, {}]",
            self.iteration,
            self.ctx.lb,
            self.ctx.ub
        );

        Ok(outcome)
    }

    fn search(&mut self) -> Result<Outcome, ErrorKind> {
        while let Some(cut) = self.pending.pop_front() {
            log::debug!(target: CONTROLLER, "Issuing uncompleted cut {cut}");
            self.issue(&cut)?;
            self.ctx.cut_set.add(cut);
        }

        loop {
            if self.limit_reached() {
                self.state = ControllerState::Stopped;
                return Ok(Outcome::Stopped);
            }

            self.state = ControllerState::SolvingRelaxation;
            let relaxation = self.relaxation.solve(&self.ctx)?;
            self.ctx.ub = self.ctx.ub.min(relaxation.obj_value);

            log::debug!(target: CONTROLLER, "Relaxation found objective value of {}", relaxation.obj_value);

            let tolerance = self.ctx.config.tolerance.value;
            if let Some(pattern) = relaxation.integral_pattern(self.ctx.pattern_size(), tolerance) {
                let obj_value = self.ctx.data.objective_of(&pattern);
                log::debug!(target: CONTROLLER, "Integral relaxation, with objective value {obj_value}");

                self.ctx.ub = self.ctx.ub.min(obj_value);
                match self.ctx.config.switch.pool_threshold {
                    true => {
                        if obj_value >= self.ctx.config.pool_threshold.value {
                            self.record_solution(Solution::new(pattern, obj_value));
                        }
                    }
                    false => {
                        self.ctx.lb = self.ctx.lb.max(obj_value);
                        self.record_solution(Solution::new(pattern, obj_value));
                    }
                }
            }

            self.state = ControllerState::CheckConvergence;
            if self.converged() {
                self.state = ControllerState::Converged;
                self.bound_history.push((self.ctx.ub, self.ctx.lb));
                return Ok(Outcome::Converged);
            }

            self.state = ControllerState::CreateCut;
            let max_num_cuts = self
                .ctx
                .config
                .max_num_cuts(self.ctx.lb, self.ctx.data.num_grp_one());
            let (cut, source) =
                self.creator
                    .create_cut(&self.ctx, &relaxation.marker_values, max_num_cuts);

            log::debug!(target: CONTROLLER, "Cut {cut} created from {source}");

            self.state = ControllerState::Dispatch;
            let prev_lb = self.ctx.lb;
            self.issue(&cut)?;

            let individual_fixed = match source {
                CutSource::Individual(individual) => {
                    self.ctx.fix_individual_and_equals_to_zero(individual);
                    true
                }
                CutSource::Relaxation | CutSource::Merge => false,
            };

            self.ctx.cut_set.add(cut);

            if (self.ctx.lb - prev_lb).abs() > tolerance || individual_fixed {
                self.ctx.fix_markers_below_threshold();
                self.ctx.fix_individuals_without_pattern();
                self.ctx.detect_equalities();
            }

            self.iteration += 1;
            self.bound_history.push((self.ctx.ub, self.ctx.lb));

            self.dispatch(|| {
                Dispatch::Report(Report::Bounds {
                    iteration: self.iteration,
                    ub: self.ctx.ub,
                    lb: self.ctx.lb,
                    source: Some(source),
                })
            });
        }
    }

    /// Sends the subproblem of `cut` to an idle worker, waiting on a completion if every worker is busy.
    fn issue(&mut self, cut: &Cut) -> Result<usize, ErrorKind> {
        while !self.pool.has_idle() {
            log::trace!(target: CONTROLLER, "Waiting on {} workers", self.pool.num_busy());
            let (reply, _) = self.pool.await_completion()?;
            self.complete(reply)?;
        }

        let mut sparse_cut = cut.clone();
        for marker in self.ctx.cut_set.markers_kept_in_all_cuts() {
            sparse_cut.remove(*marker);
        }

        let threshold = match self.ctx.config.switch.pool_threshold {
            true => self.ctx.config.pool_threshold.value,
            false => self.ctx.lb,
        };

        let problem = SparseProblem {
            threshold,
            cut: sparse_cut,
            cuts: self.ctx.cut_set.iter().cloned().collect(),
            marker_domains: self.ctx.marker_domains(),
            individual_domains: self.ctx.individual_domains(),
        };

        let rank = self.pool.dispatch(problem)?;
        self.cuts_issued += 1;
        log::trace!(target: CONTROLLER, "Sent {cut} to worker {rank}");
        Ok(rank)
    }

    /// Applies a reply from a worker.
    fn complete(&mut self, reply: FromWorker) -> Result<(), ErrorKind> {
        match reply {
            FromWorker::Completed {
                rank,
                solutions,
                elapsed,
            } => {
                self.sparse_time += elapsed;
                log::trace!(target: CONTROLLER, "Worker {rank} returned {} solutions", solutions.len());

                if !self.ctx.config.switch.pool_threshold {
                    if let Some(best) = solutions.iter().max() {
                        self.ctx.lb = self.ctx.lb.max(best.obj_value());
                    }
                }

                for solution in solutions {
                    self.record_solution(solution);
                }
                Ok(())
            }

            FromWorker::Failed { rank, error } => {
                log::error!(target: CONTROLLER, "Worker {rank} failed: {error:?}");
                Err(error)
            }
        }
    }

    fn record_solution(&mut self, solution: Solution) {
        self.dispatch(|| {
            Dispatch::Report(Report::Solution(PatternSummary::of(
                &self.ctx.data,
                solution.markers(),
            )))
        });
        self.solutions.push(solution);
    }

    fn converged(&mut self) -> bool {
        let (lb, ub) = (self.ctx.lb, self.ctx.ub);

        if !self.ctx.config.switch.pool_threshold {
            return ub <= lb;
        }

        let threshold = self.ctx.config.pool_threshold.value;
        if !self.true_convergence && ub <= lb && ub > threshold {
            self.true_convergence = true;
            log::info!(
                target: CONTROLLER,
                "True convergence occurred at {lb}, continuing to search for patterns above {threshold}"
            );
            self.dispatch(|| Dispatch::Report(Report::TrueConvergence { ub, lb }));
        }

        ub <= threshold
    }

    fn limit_reached(&self) -> bool {
        if let Some(max_iterations) = self.ctx.config.max_iterations {
            if self.iteration >= max_iterations {
                log::info!(target: CONTROLLER, "Stopped after {} iterations", self.iteration);
                return true;
            }
        }

        if let Some(time_limit) = self.ctx.config.time_limit {
            if self.start.elapsed() >= time_limit {
                log::info!(target: CONTROLLER, "Stopped after {:.2?}", self.start.elapsed());
                return true;
            }
        }

        false
    }

    /// Sends the dispatch built by `dispatch`, if a dispatcher is set.
    fn dispatch(&self, dispatch: impl FnOnce() -> Dispatch) {
        if let Some(dispatcher) = &self.dispatcher {
            dispatcher(dispatch());
        }
    }

    fn dispatch_stats(&self) {
        if let Some(dispatcher) = &self.dispatcher {
            let (free_markers, free_individuals) = self.ctx.free_counts();
            dispatcher(Dispatch::Stat(Stat::Iterations(self.iteration)));
            dispatcher(Dispatch::Stat(Stat::Cuts(self.ctx.cut_set.num_cuts(), self.cuts_issued)));
            dispatcher(Dispatch::Stat(Stat::Free(free_markers, free_individuals)));
            dispatcher(Dispatch::Stat(Stat::Time(self.start.elapsed())));
        }
    }

    /// Total time spent by workers on subproblems.
    pub fn sparse_time(&self) -> Duration {
        self.sparse_time
    }
}
