/*!
Reading a dataset from a table of expression values.

The table is read as a sequence of whitespace separated tokens:
- [num_head_rows](DataConfig::num_head_rows) header rows, each of [num_head_cols](DataConfig::num_head_cols) label columns followed by a column for each individual.
- A row for each expression, again of label columns followed by a value for each individual.

Individuals are the cases followed by the controls.

Each expression becomes one state for each enabled bin, and an individual carries the state if the value of the individual is the value of the bin.
A missing value is carried in every enabled bin when [set_na_true](DataConfig::set_na_true), and in none otherwise.
*/

use std::io::Read;

use crate::{
    config::{Config, DataConfig},
    dataset::Dataset,
    misc::log::targets::DATA,
    structures::domain::Group,
    types::err::{self, DataError, ErrorKind, IoError},
};

impl Dataset {
    /// Reads a dataset from the file named in the data configuration.
    pub fn read_file(config: &Config) -> Result<Dataset, ErrorKind> {
        let path = config
            .data
            .data_file
            .as_ref()
            .ok_or(err::ConfigError::MissingKey("DATA_FILE"))?;

        let file = std::fs::File::open(path).map_err(|e| IoError::new(path, &e))?;
        log::info!(target: DATA, "Reading data from {}", path.display());

        Dataset::read(std::io::BufReader::new(file), config)
    }

    /// Reads a dataset from `reader`, as configured.
    pub fn read(mut reader: impl Read, config: &Config) -> Result<Dataset, ErrorKind> {
        let data = &config.data;

        let mut content = String::default();
        if let Err(e) = reader.read_to_string(&mut content) {
            let path = data
                .data_file
                .as_ref()
                .map_or(String::from("input"), |p| p.display().to_string());
            return Err(err::ErrorKind::from(IoError::new(path, &e)));
        }

        let num_individuals = data.num_cases + data.num_ctrls;
        let bins = data.enabled_bins();
        let mut tokens = content.split_whitespace();

        let header_tokens = data.num_head_rows * (data.num_head_cols + num_individuals);
        for _ in 0..header_tokens {
            if tokens.next().is_none() {
                return Err(err::ErrorKind::from(DataError::MissingData {
                    expression: 0,
                    individual: 0,
                }));
            }
        }

        let mut states = vec![vec![false; num_individuals]; bins.len() * data.num_exprs];
        let mut labels = Vec::with_capacity(states.len());

        for expression in 0..data.num_exprs {
            let mut label = Vec::with_capacity(data.num_head_cols);
            for _ in 0..data.num_head_cols {
                match tokens.next() {
                    Some(token) => label.push(token),
                    None => {
                        return Err(err::ErrorKind::from(DataError::MissingData {
                            expression,
                            individual: 0,
                        }))
                    }
                }
            }
            let label = label.join(" ");

            let first_state = expression * bins.len();
            for individual in 0..num_individuals {
                let Some(token) = tokens.next() else {
                    return Err(err::ErrorKind::from(DataError::MissingData {
                        expression,
                        individual,
                    }));
                };

                if token == data.missing_symbol {
                    if data.set_na_true {
                        for offset in 0..bins.len() {
                            states[first_state + offset][individual] = true;
                        }
                    }
                    continue;
                }

                let value = match token.parse::<f64>() {
                    Ok(value) => value,
                    Err(_) => {
                        return Err(err::ErrorKind::from(DataError::BadValue {
                            expression,
                            individual,
                        }))
                    }
                };

                for (offset, bin) in bins.iter().enumerate() {
                    if value == bin.value {
                        states[first_state + offset][individual] = true;
                    }
                }
            }

            for bin in &bins {
                labels.push(format!("{label} {}", bin.kind));
            }
        }

        if tokens.next().is_some() {
            log::warn!(target: DATA, "Values after the last expression were ignored");
        }

        let groups = groups_of(data, config.switch.risk);

        log::info!(
            target: DATA,
            "Read {} expressions as {} states over {} individuals",
            data.num_exprs,
            states.len(),
            num_individuals
        );

        Ok(Dataset::new(states, groups, config.pattern_size.value)?
            .with_labels(labels)
            .with_risk(config.switch.risk))
    }
}

/// Groups of the cases and then controls, with group one the cases when searching for risk patterns.
fn groups_of(data: &DataConfig, risk: bool) -> Vec<Group> {
    let (case_group, ctrl_group) = match risk {
        true => (Group::One, Group::Two),
        false => (Group::Two, Group::One),
    };
    std::iter::repeat(case_group)
        .take(data.num_cases)
        .chain(std::iter::repeat(ctrl_group).take(data.num_ctrls))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::BinKind;

    fn config() -> Config {
        let mut config = Config::default();
        config.pattern_size.value = 2;
        config.data.num_exprs = 2;
        config.data.num_cases = 2;
        config.data.num_ctrls = 2;
        config.data.num_head_rows = 1;
        config.data.num_head_cols = 2;
        config
    }

    const TABLE: &str = "
        id   name   c1 c2 t1 t2
        e0   alpha  2  2  0  1
        e1   beta   1  NA 0  2
    ";

    #[test]
    fn bins_values() {
        let config = config();
        let dataset = Dataset::read(TABLE.as_bytes(), &config).expect("readable");

        assert_eq!(dataset.num_states(), 6);
        assert_eq!(dataset.num_grp_one(), 2);

        assert_eq!(dataset.carriers(0).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(dataset.carriers(1).collect::<Vec<_>>(), vec![3]);
        assert_eq!(dataset.carriers(2).collect::<Vec<_>>(), vec![2]);

        assert_eq!(dataset.carriers(4).collect::<Vec<_>>(), vec![0]);
        assert_eq!(dataset.state_label(0), "e0 alpha HIGH");
        assert_eq!(dataset.state_label(5), "e1 beta LOW");
    }

    #[test]
    fn missing_values() {
        let mut config = config();
        config.data.set_na_true = true;
        let dataset = Dataset::read(TABLE.as_bytes(), &config).expect("readable");

        for state in 3..6 {
            assert!(dataset.carries(state, 1));
        }
    }

    #[test]
    fn protective_groups() {
        let mut config = config();
        config.switch.risk = false;
        config.data.bin_mut(BinKind::Norm).enabled = false;
        config.data.num_bins = 2;

        let dataset = Dataset::read(TABLE.as_bytes(), &config).expect("readable");
        assert_eq!(dataset.group(0), Group::Two);
        assert_eq!(dataset.group(3), Group::One);
        assert_eq!(dataset.num_states(), 4);
    }

    #[test]
    fn short_input() {
        let config = config();
        let result = Dataset::read("id name c1 c2 t1 t2 e0 alpha 2 2".as_bytes(), &config);
        assert_eq!(
            result.err(),
            Some(ErrorKind::Data(DataError::MissingData {
                expression: 0,
                individual: 2
            }))
        );
    }
}
