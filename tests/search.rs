use std::{cell::RefCell, rc::Rc, sync::Arc};

use csfs::{
    checkpoint::Checkpoint,
    config::Config,
    context::SearchContext,
    dataset::Dataset,
    dispatch::{Dispatch, Outcome, Report},
    parallel::controller::Controller,
    solvers::{sparse::LpSparse, Relaxation, RelaxationSolver, SparseProblem, SparseSolver},
    structures::{domain::Group, solution::Solution},
    types::err::{ErrorKind, SolverError},
};

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Every pair of the given markers.
fn pairs(markers: &[usize]) -> Vec<Vec<usize>> {
    let mut pairs = Vec::default();
    for (index, first) in markers.iter().enumerate() {
        for second in markers.iter().skip(index + 1) {
            pairs.push(vec![*first, *second]);
        }
    }
    pairs
}

/// The greatest objective value of a pair of states.
fn best_pair_value(data: &Dataset) -> f64 {
    let markers = (0..data.num_states()).collect::<Vec<_>>();
    pairs(&markers)
        .iter()
        .map(|pair| data.objective_of(pair))
        .fold(f64::MIN, f64::max)
}

/// Ten states over five individuals of each group, with the pair {0, 1} carried by four of group one and none of group two.
fn random_dataset(seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut states = (0..10)
        .map(|_| (0..10).map(|_| rng.gen_bool(0.55)).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    states[0] = vec![true, true, true, true, false, false, false, false, false, false];
    states[1] = vec![true; 10];

    let groups = [Group::One; 5].into_iter().chain([Group::Two; 5]).collect();
    Dataset::new(states, groups, 2).expect("valid dataset")
}

/// A relaxation which bounds the search by the best pair outside of every stored cut, with fractional values.
struct Enumerating;

impl RelaxationSolver for Enumerating {
    fn solve(&mut self, ctx: &SearchContext) -> Result<Relaxation, ErrorKind> {
        let free = (0..ctx.markers.len())
            .filter(|marker| !ctx.markers[*marker].is_zero())
            .collect::<Vec<_>>();

        let best = pairs(&free)
            .into_iter()
            .filter(|pair| !ctx.cut_set.exists_elements(pair))
            .map(|pair| (ctx.data.objective_of(&pair), pair))
            .max_by(|a, b| a.0.total_cmp(&b.0));

        let Some((obj_value, pair)) = best else {
            return Ok(Relaxation::infeasible(ctx.markers.len(), ctx.individuals.len()));
        };

        let mut marker_values = vec![0.0; ctx.markers.len()];
        for marker in pair {
            marker_values[marker] = 0.5;
        }

        Ok(Relaxation {
            obj_value,
            marker_values,
            individual_values: vec![0.5; ctx.individuals.len()],
            infeasible: false,
        })
    }
}

/// A sparse solver which examines each pair of the cut.
struct Exhaustive {
    data: Arc<Dataset>,
}

impl SparseSolver for Exhaustive {
    fn solve(&mut self, problem: &SparseProblem) -> Result<Vec<Solution>, ErrorKind> {
        let markers = problem
            .cut
            .true_elements()
            .into_iter()
            .filter(|marker| !problem.marker_domains[*marker].is_zero())
            .collect::<Vec<_>>();

        let best = pairs(&markers)
            .into_iter()
            .filter(|pair| {
                !problem
                    .cuts
                    .iter()
                    .any(|cut| pair.iter().all(|marker| cut.contains(*marker)))
            })
            .map(|pair| {
                let obj_value = self.data.objective_of(&pair);
                Solution::new(pair, obj_value)
            })
            .max();

        Ok(best.into_iter().collect())
    }
}

struct Failing;

impl SparseSolver for Failing {
    fn solve(&mut self, _: &SparseProblem) -> Result<Vec<Solution>, ErrorKind> {
        Err(ErrorKind::from(SolverError::Status(String::from("scripted"))))
    }
}

fn scripted_controller(data: Dataset, config: Config) -> Controller<Enumerating> {
    let data = Arc::new(data);
    let ctx = SearchContext::from_config(config, Arc::clone(&data));
    Controller::new(ctx, Enumerating, move |_| Exhaustive {
        data: Arc::clone(&data),
    })
    .expect("workers")
}

fn assert_monotone_bounds(history: &[(f64, f64)]) {
    for window in history.windows(2) {
        let ((ub_before, lb_before), (ub_after, lb_after)) = (window[0], window[1]);
        assert!(ub_after <= ub_before, "upper bound rose from {ub_before} to {ub_after}");
        assert!(lb_after >= lb_before, "lower bound fell from {lb_before} to {lb_after}");
    }
}

mod protocol {
    use super::*;

    #[test]
    fn converges_to_the_best_pair() {
        for (seed, workers) in [(1, 1), (2, 2), (3, 3), (4, 4)] {
            let data = random_dataset(seed);
            let optimum = best_pair_value(&data);
            assert!(optimum >= 0.8);

            let mut config = Config::default();
            config.workers.value = workers;
            config.max_iterations = Some(500);

            let mut controller = scripted_controller(data, config);
            assert_eq!(controller.run(), Ok(Outcome::Converged));

            let best = controller.best().expect("a solution");
            assert_eq!(best.obj_value(), optimum);
            assert_eq!(controller.lb(), optimum);

            assert!(controller.solutions().iter().all(|solution| solution.size() == 2));
            assert_monotone_bounds(controller.bound_history());
        }
    }

    #[test]
    fn stops_at_the_iteration_limit() {
        let mut config = Config::default();
        config.workers.value = 2;
        config.max_iterations = Some(1);

        let mut controller = scripted_controller(random_dataset(9), config);
        assert_eq!(controller.run(), Ok(Outcome::Stopped));
        assert_eq!(controller.iterations(), 1);
        assert_eq!(controller.cuts_issued(), 1);

        let checkpoint = controller.exit_checkpoint().expect("a checkpoint");
        assert_eq!(checkpoint.completed.len() + checkpoint.uncompleted.len(), 1);
    }

    #[test]
    fn solver_failure_ends_the_search() {
        let data = Arc::new(random_dataset(5));
        let mut config = Config::default();
        config.workers.value = 1;
        config.max_iterations = Some(50);

        let ctx = SearchContext::from_config(config, data);
        let mut controller = Controller::new(ctx, Enumerating, |_| Failing).expect("workers");

        assert_eq!(
            controller.run(),
            Err(ErrorKind::Solver(SolverError::Status(String::from("scripted"))))
        );
    }

    #[test]
    fn dispatches_each_solution_and_the_finish() {
        let mut controller = scripted_controller(random_dataset(6), Config::default());

        let dispatches = Rc::new(RefCell::new(Vec::default()));
        let sink = Rc::clone(&dispatches);
        controller.set_dispatcher(Box::new(move |dispatch: Dispatch| {
            sink.borrow_mut().push(dispatch)
        }));

        assert_eq!(controller.run(), Ok(Outcome::Converged));

        let dispatches = dispatches.borrow();
        let solutions = dispatches
            .iter()
            .filter(|dispatch| matches!(dispatch, Dispatch::Report(Report::Solution(_))))
            .count();
        assert_eq!(solutions, controller.solutions().len());

        assert!(matches!(
            dispatches.last(),
            Some(Dispatch::Report(Report::Finish(Outcome::Converged)))
        ));
    }
}

mod resume {
    use super::*;

    #[test]
    fn checkpoint_file_resumes() {
        let seed = 12;
        let optimum = best_pair_value(&random_dataset(seed));

        let mut config = Config::default();
        config.workers.value = 2;
        config.max_iterations = Some(2);

        let mut controller = scripted_controller(random_dataset(seed), config.clone());
        assert!(controller.run().is_ok());
        let checkpoint = controller.exit_checkpoint().expect("a checkpoint").clone();

        let path = std::env::temp_dir().join(format!("csfs_checkpoint_{}.txt", std::process::id()));
        checkpoint.write_file(&path, 2).expect("written");
        let read = Checkpoint::read_file(&path, 10, 10).expect("read");
        let _ = std::fs::remove_file(&path);
        assert_eq!(read, checkpoint);

        config.max_iterations = Some(500);
        let mut resumed = scripted_controller(random_dataset(seed), config);
        resumed.resume(&read);
        assert!(resumed.lb() >= checkpoint.lb.unwrap_or_default());

        assert_eq!(resumed.run(), Ok(Outcome::Converged));
        assert_eq!(resumed.lb(), optimum);
    }
}

mod lp {
    use super::*;

    fn lp_dataset() -> Dataset {
        let states = vec![
            vec![true, true, true, false, true, false, false, false],
            vec![true, true, false, true, false, true, false, false],
            vec![false, true, true, true, false, false, true, false],
            vec![true, true, true, true, true, true, false, true],
            vec![false, false, false, true, true, true, true, true],
            vec![true, true, true, true, false, false, false, false],
        ];
        let groups = [Group::One; 4].into_iter().chain([Group::Two; 4]).collect();
        Dataset::new(states, groups, 2).expect("valid dataset")
    }

    #[test]
    fn finds_the_best_pattern() {
        let data = lp_dataset();
        let optimum = best_pair_value(&data);
        assert_eq!(optimum, 1.0);

        let ctx = SearchContext::from_config(Config::default(), Arc::new(data));
        let mut controller = Controller::with_lp(ctx).expect("workers");

        assert_eq!(controller.run(), Ok(Outcome::Converged));
        let best = controller.best().expect("a solution");
        assert_eq!(best.obj_value(), optimum);
        assert_eq!(best.markers(), &[3, 5]);
        assert_monotone_bounds(controller.bound_history());
    }

    #[test]
    fn collects_patterns_above_the_threshold() {
        let data = lp_dataset();
        let threshold = 0.4;

        let markers = (0..data.num_states()).collect::<Vec<_>>();
        let expected = pairs(&markers)
            .into_iter()
            .filter(|pair| data.objective_of(pair) > threshold + 1e-9)
            .collect::<Vec<_>>();
        assert!(expected.len() > 1);

        let mut config = Config::default();
        config.switch.pool_threshold = true;
        config.pool_threshold.value = threshold;

        let ctx = SearchContext::from_config(config, Arc::new(data));
        let mut controller = Controller::with_lp(ctx).expect("workers");
        assert_eq!(controller.run(), Ok(Outcome::Converged));

        for pair in expected {
            assert!(
                controller.solutions().iter().any(|solution| solution.markers() == pair.as_slice()),
                "missing {pair:?}"
            );
        }
        assert!(controller.solutions().iter().all(|solution| solution.size() == 2));
    }

    /// A relaxation which is always integral, at the best pair outside of every stored cut.
    struct Integral;

    impl RelaxationSolver for Integral {
        fn solve(&mut self, ctx: &SearchContext) -> Result<Relaxation, ErrorKind> {
            let free = (0..ctx.markers.len())
                .filter(|marker| !ctx.markers[*marker].is_zero())
                .collect::<Vec<_>>();

            let best = pairs(&free)
                .into_iter()
                .filter(|pair| !ctx.cut_set.exists_elements(pair))
                .map(|pair| (ctx.data.objective_of(&pair), pair))
                .max_by(|a, b| a.0.total_cmp(&b.0));

            let Some((obj_value, pair)) = best else {
                return Ok(Relaxation::infeasible(ctx.markers.len(), ctx.individuals.len()));
            };

            let mut marker_values = vec![0.0; ctx.markers.len()];
            for marker in &pair {
                marker_values[*marker] = 1.0;
            }
            let individual_values = (0..ctx.individuals.len())
                .map(|individual| match ctx.data.carries_pattern(&pair, individual) {
                    true => 1.0,
                    false => 0.0,
                })
                .collect();

            Ok(Relaxation {
                obj_value,
                marker_values,
                individual_values,
                infeasible: false,
            })
        }
    }

    #[test]
    fn integral_relaxations_keep_the_threshold() {
        let data = Arc::new(lp_dataset());
        let threshold = 0.4;

        let markers = (0..data.num_states()).collect::<Vec<_>>();
        let expected = pairs(&markers)
            .into_iter()
            .filter(|pair| data.objective_of(pair) > threshold + 1e-9)
            .collect::<Vec<_>>();
        assert_eq!(expected.len(), 10);

        let mut config = Config::default();
        config.switch.pool_threshold = true;
        config.pool_threshold.value = threshold;
        config.max_iterations = Some(500);

        let ctx = SearchContext::from_config(config.clone(), Arc::clone(&data));
        let sparse_data = Arc::clone(&data);
        let mut controller = Controller::new(ctx, Integral, move |_| {
            LpSparse::new(Arc::clone(&sparse_data), config.clone())
        })
        .expect("workers");

        assert_eq!(controller.run(), Ok(Outcome::Converged));
        assert_eq!(controller.lb(), threshold);

        for pair in expected {
            assert!(
                controller.solutions().iter().any(|solution| solution.markers() == pair.as_slice()),
                "missing {pair:?}"
            );
        }
        assert!(controller
            .solutions()
            .iter()
            .all(|solution| solution.obj_value() >= threshold));
    }
}
