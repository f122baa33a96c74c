use std::path::PathBuf;

use clap::{value_parser, Arg, Command};

use csfs::config::Config;

pub fn cli() -> Command {
    let defaults = Config::default();

    Command::new("csfs")
        .about("Finds patterns of marker states which separate cases from controls, by cut-and-solve")
        .version(env!("CARGO_PKG_VERSION"))

        .arg(Arg::new("config")
            .required(true)
            .num_args(1)
            .value_parser(value_parser!(PathBuf))
            .help("The configuration file of the search, as KEY = VALUE lines."))

        .arg(Arg::new("workers")
            .short('w')
            .long("workers")
            .value_parser(value_parser!(usize))
            .required(false)
            .num_args(1)
            .help(format!("The count of worker threads solving sparse subproblems.
Default: {}", defaults.workers.value)))

        .arg(Arg::new("seed")
            .long("seed")
            .value_parser(value_parser!(u64))
            .required(false)
            .num_args(1)
            .help(format!("The seed for random choices made when extending cuts.
Default: {}", defaults.seed.value)))

        .arg(Arg::new("max_iterations")
            .long("max-iterations")
            .value_parser(value_parser!(usize))
            .required(false)
            .num_args(1)
            .help("Stop after the given count of iterations, if the bounds have not met."))

        .arg(Arg::new("time_limit")
            .short('t')
            .long("time-limit")
            .value_parser(value_parser!(u64))
            .required(false)
            .num_args(1)
            .help("Stop after the given count of seconds, if the bounds have not met."))

        .arg(Arg::new("pattern_size")
            .short('k')
            .long("pattern-size")
            .value_parser(value_parser!(usize))
            .required(false)
            .num_args(1)
            .help("The count of marker states in a pattern, in place of the value of the configuration file."))

        .arg(Arg::new("checkpoint")
            .long("checkpoint")
            .value_parser(value_parser!(PathBuf))
            .required(false)
            .num_args(1)
            .help("Write a checkpoint of the search to the given path when the search ends."))

        .arg(Arg::new("resume")
            .long("resume")
            .value_parser(value_parser!(PathBuf))
            .required(false)
            .num_args(1)
            .help("Resume a search from the checkpoint at the given path.
The checkpoint must have been written for the same data and pattern size."))

        .arg(Arg::new("quiet")
            .short('q')
            .long("quiet")
            .value_parser(value_parser!(bool))
            .required(false)
            .num_args(0)
            .conflicts_with("verbose")
            .help("Report only the outcome of the search."))

        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .value_parser(value_parser!(bool))
            .required(false)
            .num_args(0)
            .help("Report statistics on the search, in addition to bounds and solutions."))

        .arg(Arg::new("show_data")
            .long("show-data")
            .value_parser(value_parser!(bool))
            .required(false)
            .num_args(0)
            .help("Display the matrix of marker states before the search begins."))
}
