/*!
Configuration of a search.

All configuration for a search is contained within [Config].
The controller keeps the configuration, and workers are given a copy.

Configuration may be built in code, starting from [Config::default], or [read](Config::from_reader) from a file of `KEY = VALUE` lines.
In either case, [validate](Config::validate) should be called before a search begins.

# Thresholds

A handful of derived values are used throughout a search:
- The [pruning threshold](Config::pruning_threshold), below which the group one carrying ratio of a marker leads the marker to be fixed to zero.
- The [initial lower bound](Config::initial_lower_bound).
- The [cap on the count of cuts](Config::max_num_cuts), after which cuts are merged rather than found by relaxation.
*/

use std::time::Duration;

mod config_option;
pub use config_option::ConfigOption;

pub mod data;
pub use data::{Bin, BinKind, DataConfig};

mod file;

mod switches;
pub use switches::Switches;

use crate::types::err::ConfigError;

/// The primary configuration structure.
#[derive(Clone, Debug)]
pub struct Config {
    /// The count of marker states in a pattern.
    pub pattern_size: ConfigOption<usize>,

    /// The lower bound at the start of a search.
    pub starting_lower_bound: ConfigOption<f64>,

    /// The upper bound at the start of a search.
    pub starting_upper_bound: ConfigOption<f64>,

    /// The threshold used when [collecting solutions](Switches::pool_threshold) above a threshold.
    pub pool_threshold: ConfigOption<f64>,

    /// The most solutions a sparse subproblem returns when collecting solutions above a threshold.
    pub pool_limit: ConfigOption<usize>,

    /// Values within tolerance of an integer are taken to be the integer.
    pub tolerance: ConfigOption<f64>,

    /// The seed for random choices when extending cuts.
    pub seed: ConfigOption<u64>,

    /// The count of worker threads.
    pub workers: ConfigOption<usize>,

    /// Stop after the given count of iterations, if converence has not been reached.
    pub max_iterations: Option<usize>,

    /// Stop after the given time, if convergence has not been reached.
    pub time_limit: Option<Duration>,

    pub switch: Switches,

    pub data: DataConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pattern_size: ConfigOption {
                name: "pattern_size",
                min: 1,
                max: usize::MAX,
                value: 2,
            },

            starting_lower_bound: ConfigOption {
                name: "starting_lower_bound",
                min: 0.0,
                max: 1.0,
                value: 0.0,
            },

            starting_upper_bound: ConfigOption {
                name: "starting_upper_bound",
                min: 0.0,
                max: 1.0,
                value: 1.0,
            },

            pool_threshold: ConfigOption {
                name: "pool_threshold",
                min: 0.0,
                max: 1.0,
                value: 0.2,
            },

            pool_limit: ConfigOption {
                name: "pool_limit",
                min: 1,
                max: 1_000_000,
                value: 100,
            },

            tolerance: ConfigOption {
                name: "tolerance",
                min: f64::MIN_POSITIVE,
                max: 1.0,
                value: 1e-6,
            },

            seed: ConfigOption {
                name: "seed",
                min: 0,
                max: u64::MAX,
                value: 0,
            },

            workers: ConfigOption {
                name: "workers",
                min: 1,
                max: 1024,
                value: 2,
            },

            max_iterations: None,
            time_limit: None,

            switch: Switches::default(),
            data: DataConfig::default(),
        }
    }
}

impl Config {
    /// Checks the search settings are consistent.
    ///
    /// Settings which are permitted, though likely to be a mistake, are noted with a warning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lb = self.starting_lower_bound.value;
        let ub = self.starting_upper_bound.value;

        if ub <= lb {
            return Err(ConfigError::Inconsistent(
                "STARTING_LOWER_BOUND must be less than STARTING_UPPER_BOUND",
            ));
        }
        if !(0.0..1.0).contains(&lb) {
            return Err(ConfigError::OutOfRange(self.starting_lower_bound.name));
        }
        if ub <= 0.0 || ub > 1.0 {
            return Err(ConfigError::OutOfRange(self.starting_upper_bound.name));
        }

        if self.switch.pool_threshold {
            let threshold = self.pool_threshold.value;
            if threshold < 0.0 {
                return Err(ConfigError::OutOfRange(self.pool_threshold.name));
            }
            if threshold < 0.1 {
                log::warn!("The solution pool threshold {threshold} may be too low");
            }
            if threshold > 0.6 {
                log::warn!("The solution pool threshold {threshold} may be too high");
            }
            if self.switch.lower_cutoff {
                return Err(ConfigError::Inconsistent(
                    "USE_SOLUTION_POOL_THRESHOLD and USE_LOWER_CUTOFF cannot both be true",
                ));
            }
        }

        if self.switch.quiet && self.switch.verbose {
            return Err(ConfigError::Inconsistent(
                "QUIET and VERBOSE cannot both be true",
            ));
        }

        if self.tolerance.value <= 0.0 {
            return Err(ConfigError::OutOfRange(self.tolerance.name));
        }
        if self.tolerance.value >= 1e-2 {
            log::warn!("The tolerance {} may be too large", self.tolerance.value);
        }

        for option in [&self.pattern_size, &self.workers, &self.pool_limit] {
            if !option.in_range() {
                return Err(ConfigError::OutOfRange(option.name));
            }
        }

        Ok(())
    }

    /// The ratio below which a marker is fixed to zero, given the lower bound `lb`.
    pub fn pruning_threshold(&self, lb: f64) -> f64 {
        match self.switch.pool_threshold {
            true => self.pool_threshold.value,
            false => lb.max(self.tolerance.value),
        }
    }

    /// The starting lower bound, raised to the pool threshold when collecting solutions above a higher threshold.
    pub fn initial_lower_bound(&self) -> f64 {
        let lb = self.starting_lower_bound.value;
        match self.switch.pool_threshold {
            true => lb.max(self.pool_threshold.value),
            false => lb,
        }
    }

    /// The most cuts to keep before merging cuts, given the lower bound and the size of group one.
    ///
    /// At least two, as two cuts are required for a merge.
    pub fn max_num_cuts(&self, lb: f64, num_grp_one: usize) -> usize {
        let threshold = match self.switch.pool_threshold {
            true => self.pool_threshold.value,
            false => lb,
        };
        let cap = (threshold * num_grp_one as f64).round();
        (cap.max(0.0) as usize).max(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn inconsistent_bounds() {
        let mut config = Config::default();
        config.starting_lower_bound.value = 0.5;
        config.starting_upper_bound.value = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn pool_excludes_cutoff() {
        let mut config = Config::default();
        config.switch.pool_threshold = true;
        config.switch.lower_cutoff = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn thresholds() {
        let mut config = Config::default();
        assert_eq!(config.pruning_threshold(0.0), config.tolerance.value);
        assert_eq!(config.pruning_threshold(0.3), 0.3);
        assert_eq!(config.max_num_cuts(0.0, 40), 2);
        assert_eq!(config.max_num_cuts(0.25, 40), 10);

        config.switch.pool_threshold = true;
        config.pool_threshold.value = 0.4;
        assert_eq!(config.pruning_threshold(0.1), 0.4);
        assert_eq!(config.initial_lower_bound(), 0.4);
        assert_eq!(config.max_num_cuts(0.0, 40), 16);
    }
}
