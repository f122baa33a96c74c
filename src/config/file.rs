/*!
Reading configuration from a file.

Each non-empty line of a configuration file is a key and a value, separated by `=` or by whitespace.
Text following a `#` is ignored.

```text
# A small search
DATA_FILE = data/example.txt
PATTERN_SIZE = 2
NUM_EXPRS 40
```

Keys which set no part of a [Config] are rejected, aside from a handful of keys which only concerned output of some earlier tool.
These are noted and skipped.
*/

use std::{io::BufRead, path::PathBuf, time::Duration};

use crate::{
    config::{BinKind, Config},
    types::err::{self, ConfigError, ErrorKind},
};

/// Keys which are read and ignored.
const IGNORED_KEYS: [&str; 2] = ["PRINT_CPLEX_OUTPUT", "ID_PREFIX"];

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse::<T>().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

impl Config {
    /// Reads a configuration from `reader`, starting from the default configuration.
    pub fn from_reader(reader: impl BufRead) -> Result<Config, ErrorKind> {
        let mut config = Config::default();

        for (index, line) in reader.lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(_) => return Err(err::ErrorKind::from(err::ParseError::Line(index + 1))),
            };

            let content = match line.split_once('#') {
                Some((content, _)) => content,
                None => line.as_str(),
            }
            .trim();

            if content.is_empty() {
                continue;
            }

            let (key, value) = match content.split_once('=') {
                Some((key, value)) => (key.trim(), value.trim()),
                None => match content.split_once(char::is_whitespace) {
                    Some((key, value)) => (key.trim(), value.trim()),
                    None => (content, ""),
                },
            };

            config.apply_setting(key, value)?;
        }

        Ok(config)
    }

    /// Applies a single `key`, `value` setting.
    pub fn apply_setting(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "PATTERN_SIZE" => self.pattern_size.set(parse(key, value)?)?,
            "STARTING_LOWER_BOUND" => self.starting_lower_bound.set(parse(key, value)?)?,
            "STARTING_UPPER_BOUND" => self.starting_upper_bound.set(parse(key, value)?)?,
            "USE_SOLUTION_POOL_THRESHOLD" => self.switch.pool_threshold = parse_bool(key, value)?,
            "SOLUTION_POOL_THRESHOLD" => self.pool_threshold.set(parse(key, value)?)?,
            "SOLUTION_POOL_LIMIT" => self.pool_limit.set(parse(key, value)?)?,
            "RISK" => self.switch.risk = parse_bool(key, value)?,
            "QUIET" => self.switch.quiet = parse_bool(key, value)?,
            "VERBOSE" => self.switch.verbose = parse_bool(key, value)?,
            "TOL" => self.tolerance.set(parse(key, value)?)?,
            "SEED" | "CPLEX_SEED" => self.seed.set(parse(key, value)?)?,
            "USE_LOWER_CUTOFF" => self.switch.lower_cutoff = parse_bool(key, value)?,
            "USE_SPARSE_CONSTRAINTS" | "USE_SPARSE_CONTRAINTS" => {
                self.switch.sparse_constraints = parse_bool(key, value)?
            }
            "WORKERS" => self.workers.set(parse(key, value)?)?,
            "MAX_ITERATIONS" => self.max_iterations = Some(parse(key, value)?),
            "TIME_LIMIT" => self.time_limit = Some(Duration::from_secs(parse(key, value)?)),

            "DATA_FILE" => self.data.data_file = Some(PathBuf::from(value)),
            "NUM_EXPRS" => self.data.num_exprs = parse(key, value)?,
            "NUM_CASES" => self.data.num_cases = parse(key, value)?,
            "NUM_CTRLS" => self.data.num_ctrls = parse(key, value)?,
            "NUM_HEAD_ROWS" => self.data.num_head_rows = parse(key, value)?,
            "NUM_HEAD_COLS" => self.data.num_head_cols = parse(key, value)?,
            "NUM_BINS" => self.data.num_bins = parse(key, value)?,
            "MISSING_SYMBOL" => self.data.missing_symbol = value.to_string(),
            "SET_NA_TRUE" => self.data.set_na_true = parse_bool(key, value)?,

            _ if IGNORED_KEYS.contains(&key) => {
                log::info!("The configuration key {key} has no effect");
            }

            _ => {
                for kind in BinKind::ALL {
                    if key.strip_prefix("USE_") == Some(kind.label()) {
                        self.data.bin_mut(kind).enabled = parse_bool(key, value)?;
                        return Ok(());
                    }
                    if key.strip_suffix("_VALUE") == Some(kind.label()) {
                        self.data.bin_mut(kind).value = parse(key, value)?;
                        return Ok(());
                    }
                }
                return Err(ConfigError::UnknownKey(key.to_string()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_settings() {
        let file = b"
# comment
PATTERN_SIZE = 3
NUM_EXPRS 12
RISK = false   # protective
USE_NOT_LOW = true
NOT_LOW_VALUE = 1.5
PRINT_CPLEX_OUTPUT false
DATA_FILE = data/input.txt
";
        let config = Config::from_reader(file.as_slice()).expect("readable");

        assert_eq!(config.pattern_size.value, 3);
        assert_eq!(config.data.num_exprs, 12);
        assert!(!config.switch.risk);
        assert!(config.data.bin(BinKind::NotLow).enabled);
        assert_eq!(config.data.bin(BinKind::NotLow).value, 1.5);
        assert_eq!(config.data.data_file, Some(PathBuf::from("data/input.txt")));
    }

    #[test]
    fn rejects_unknown() {
        let result = Config::from_reader(b"USE_MIDDLE = true".as_slice());
        assert_eq!(
            result.err(),
            Some(ErrorKind::Config(ConfigError::UnknownKey(String::from(
                "USE_MIDDLE"
            ))))
        );
    }

    #[test]
    fn rejects_out_of_range() {
        let result = Config::from_reader(b"TOL = 2.0".as_slice());
        assert_eq!(
            result.err(),
            Some(ErrorKind::Config(ConfigError::OutOfRange("tolerance")))
        );
    }
}
