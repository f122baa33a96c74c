use std::{io::BufReader, path::PathBuf};

use clap::ArgMatches;

use csfs::{
    config::Config,
    types::err::{self, ErrorKind, IoError},
};

/// Reads the configuration file given as an argument, and applies any overrides from the remaining arguments.
pub fn config_from_args(args: &ArgMatches) -> Result<Config, ErrorKind> {
    let mut the_config = match args.try_get_one::<PathBuf>("config") {
        Ok(Some(path)) => {
            let file = std::fs::File::open(path).map_err(|e| IoError::new(path, &e))?;
            Config::from_reader(BufReader::new(file))?
        }
        _ => return Err(err::ErrorKind::from(err::ConfigError::MissingKey("config"))),
    };

    if let Ok(Some(count)) = args.try_get_one::<usize>("workers") {
        the_config.workers.set(*count)?
    };

    if let Ok(Some(seed)) = args.try_get_one::<u64>("seed") {
        the_config.seed.set(*seed)?
    };

    if let Ok(Some(size)) = args.try_get_one::<usize>("pattern_size") {
        the_config.pattern_size.set(*size)?
    };

    if let Ok(Some(limit)) = args.try_get_one::<usize>("max_iterations") {
        the_config.max_iterations = Some(*limit)
    };

    if let Ok(Some(secs)) = args.try_get_one::<u64>("time_limit") {
        the_config.time_limit = Some(std::time::Duration::from_secs(*secs))
    };

    if let Ok(Some(true)) = args.try_get_one::<bool>("quiet") {
        the_config.switch.quiet = true;
        the_config.switch.verbose = false;
    };

    if let Ok(Some(true)) = args.try_get_one::<bool>("verbose") {
        the_config.switch.verbose = true;
        the_config.switch.quiet = false;
    };

    the_config.validate()?;
    the_config.data.validate(the_config.pattern_size.value)?;

    Ok(the_config)
}
