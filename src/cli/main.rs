#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]

#[cfg(not(target_env = "msvc"))]
#[cfg(feature = "jemalloc")]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = Jemalloc;

use std::{path::PathBuf, sync::Arc};

use csfs::{
    checkpoint::Checkpoint,
    context::SearchContext,
    dataset::Dataset,
    dispatch::{Dispatch, Outcome, Report, Stat},
    parallel::controller::Controller,
    types::err::ErrorKind,
};

mod parse;

/// Exit codes, by the kind of error which ended a run.
fn exit_code(error: &ErrorKind) -> i32 {
    match error {
        ErrorKind::Config(_) | ErrorKind::Data(_) | ErrorKind::Io(_) | ErrorKind::Parse(_) => 1,
        ErrorKind::Solver(_) | ErrorKind::Transport(_) => 2,
    }
}

fn fail(error: ErrorKind) -> ! {
    println!("c Error: {error}");
    println!("s ERROR");
    std::process::exit(exit_code(&error))
}

fn print_dispatch(dispatch: Dispatch, verbose: bool) {
    match dispatch {
        Dispatch::Report(Report::Solution(summary)) => {
            for line in summary.to_string().lines() {
                println!("c {line}");
            }
        }

        Dispatch::Report(Report::Bounds {
            iteration,
            ub,
            lb,
            source,
        }) => match source {
            Some(source) => println!("c Iteration {iteration}: ub {ub:.9} lb {lb:.9} (cut from {source})"),
            None => println!("c Iteration {iteration}: ub {ub:.9} lb {lb:.9}"),
        },

        Dispatch::Report(Report::TrueConvergence { ub, lb }) => {
            println!("c True convergence at ub {ub:.9} lb {lb:.9}, every pattern above the threshold has been found");
        }

        Dispatch::Report(Report::Finish(_)) => {}

        Dispatch::Stat(stat) => {
            if verbose {
                match stat {
                    Stat::Iterations(count) => println!("c {:<14}{count}", "Iterations:"),
                    Stat::Cuts(stored, issued) => {
                        println!("c {:<14}{stored} stored, {issued} issued", "Cuts:")
                    }
                    Stat::Free(markers, individuals) => {
                        println!("c {:<14}{markers} markers, {individuals} individuals", "Free:")
                    }
                    Stat::Time(time) => println!("c {:<14}{:.2?}", "Time:", time),
                }
            }
        }
    }
}

fn main() {
    #[cfg(feature = "log")]
    env_logger::init();

    let matches = parse::cli::cli().get_matches();

    let config = match parse::config::config_from_args(&matches) {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    let quiet = config.switch.quiet;
    let verbose = config.switch.verbose;
    let pattern_size = config.pattern_size.value;

    let data = match Dataset::read_file(&config) {
        Ok(data) => data,
        Err(e) => fail(e),
    };

    if let Ok(Some(true)) = matches.try_get_one::<bool>("show_data") {
        for line in data.matrix_string().lines() {
            println!("c {line}");
        }
    }

    let (num_states, num_individuals) = (data.num_states(), data.num_individuals());
    if !quiet {
        println!("c {num_states} marker states, {num_individuals} individuals, patterns of {pattern_size} states");
    }

    let ctx = SearchContext::from_config(config, Arc::new(data));
    let mut controller = match Controller::with_lp(ctx) {
        Ok(controller) => controller,
        Err(e) => fail(e),
    };

    if let Ok(Some(path)) = matches.try_get_one::<PathBuf>("resume") {
        match Checkpoint::read_file(path, num_states, num_individuals) {
            Ok(checkpoint) => {
                if !quiet {
                    println!("c Resuming from {}", path.display());
                }
                controller.resume(&checkpoint)
            }
            Err(e) => fail(e),
        }
    }

    if !quiet {
        controller.set_dispatcher(Box::new(move |dispatch| print_dispatch(dispatch, verbose)));
    }

    let outcome = controller.run();

    if let Ok(Some(path)) = matches.try_get_one::<PathBuf>("checkpoint") {
        if let Some(checkpoint) = controller.exit_checkpoint() {
            if let Err(e) = checkpoint.write_file(path, pattern_size) {
                println!("c Error writing checkpoint: {e}");
            }
        }
    }

    match outcome {
        Ok(outcome) => {
            if let Some(best) = controller.best() {
                println!("c Best pattern {:?} with objective value {:.9}", best.markers(), best.obj_value());
            } else {
                println!("c No pattern found above the lower bound");
            }

            match outcome {
                Outcome::Converged => {
                    println!("s CONVERGED");
                    std::process::exit(0)
                }
                Outcome::Stopped => {
                    println!("c Bounds at exit: ub {:.9} lb {:.9}", controller.ub(), controller.lb());
                    println!("s STOPPED");
                    std::process::exit(3)
                }
            }
        }

        Err(e) => fail(e),
    }
}
