/*!
Configuration of the input data, and of how values are binned into marker states.

Each expression of the input is split into one state for each enabled bin.
A value is placed in a bin if the value is equal to the value of the bin, so bins may overlap.

The order of bins is fixed, and only enabled bins take a state:

| Bin      | Key prefix |
|----------|------------|
| High     | `HIGH`     |
| Norm     | `NORM`     |
| Low      | `LOW`      |
| Not low  | `NOT_LOW`  |
| Not high | `NOT_HIGH` |
*/

use std::path::PathBuf;

use crate::types::err::ConfigError;

/// The kinds of bin an expression value may be placed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum BinKind {
    High = 0,
    Norm,
    Low,
    NotLow,
    NotHigh,
}

impl BinKind {
    /// Each kind, in the order states are assigned.
    pub const ALL: [BinKind; 5] = [
        BinKind::High,
        BinKind::Norm,
        BinKind::Low,
        BinKind::NotLow,
        BinKind::NotHigh,
    ];

    /// The label of the bin, as used in configuration keys and reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Norm => "NORM",
            Self::Low => "LOW",
            Self::NotLow => "NOT_LOW",
            Self::NotHigh => "NOT_HIGH",
        }
    }
}

impl std::fmt::Display for BinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bin {
    pub kind: BinKind,
    pub enabled: bool,
    pub value: f64,
}

#[derive(Clone, Debug)]
pub struct DataConfig {
    /// The table of expression values.
    pub data_file: Option<PathBuf>,

    pub num_exprs: usize,
    pub num_cases: usize,
    pub num_ctrls: usize,

    /// Rows before the first expression.
    pub num_head_rows: usize,

    /// Columns before the first value of each expression.
    pub num_head_cols: usize,

    /// The symbol of a missing value.
    pub missing_symbol: String,

    /// Place missing values in every enabled bin.
    pub set_na_true: bool,

    /// The expected count of enabled bins.
    pub num_bins: usize,

    /// Bins, indexed by [BinKind].
    pub bins: [Bin; 5],
}

impl Default for DataConfig {
    fn default() -> Self {
        let bin = |kind, enabled, value| Bin { kind, enabled, value };
        DataConfig {
            data_file: None,
            num_exprs: 0,
            num_cases: 0,
            num_ctrls: 0,
            num_head_rows: 1,
            num_head_cols: 1,
            missing_symbol: String::from("NA"),
            set_na_true: false,
            num_bins: 3,
            bins: [
                bin(BinKind::High, true, 2.0),
                bin(BinKind::Norm, true, 1.0),
                bin(BinKind::Low, true, 0.0),
                bin(BinKind::NotLow, false, 1.0),
                bin(BinKind::NotHigh, false, 1.0),
            ],
        }
    }
}

impl DataConfig {
    pub fn bin(&self, kind: BinKind) -> &Bin {
        &self.bins[kind as usize]
    }

    pub fn bin_mut(&mut self, kind: BinKind) -> &mut Bin {
        &mut self.bins[kind as usize]
    }

    /// Enabled bins, in the order states are assigned.
    pub fn enabled_bins(&self) -> Vec<Bin> {
        self.bins.iter().filter(|bin| bin.enabled).copied().collect()
    }

    pub fn num_states(&self) -> usize {
        self.num_bins * self.num_exprs
    }

    /// Checks the settings are consistent with one another and with the given pattern size.
    pub fn validate(&self, pattern_size: usize) -> Result<(), ConfigError> {
        if self.data_file.is_none() {
            return Err(ConfigError::MissingKey("DATA_FILE"));
        }

        if pattern_size < 1 || pattern_size > 2 * self.num_exprs {
            return Err(ConfigError::Inconsistent(
                "PATTERN_SIZE must be at least 1, and at most twice the number of expressions",
            ));
        }

        if self.num_cases == 0 || self.num_ctrls == 0 {
            return Err(ConfigError::Inconsistent(
                "NUM_CASES and NUM_CTRLS must both be positive",
            ));
        }

        if self.enabled_bins().len() != self.num_bins {
            return Err(ConfigError::Inconsistent(
                "The number of USE_* flags set true must equal NUM_BINS",
            ));
        }

        Ok(())
    }
}
