//! Error types used in the library.
//!
//! - Configuration and data errors are found before any search begins, and end a run before workers start.
//! - Solver errors are any solver outcome other than an optimal solution or a proof of infeasibility.
//!   Infeasibility itself is not an error, as many subproblems are expected to be infeasible.
//! - Transport errors note a worker which stopped answering, which the search has no way to recover from.
//!
//! Names of the error enums --- for the most part --- overlap with the areas of the library they are found in.
//  As such, throughout the library err::{self} is often used to prefix use of the types with `err::`.

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Config(ConfigError),
    Data(DataError),
    Io(IoError),
    Parse(ParseError),
    Solver(SolverError),
    Transport(TransportError),
}

/// Errors in the configuration of a search.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// A key in a configuration file which is not recognised.
    UnknownKey(String),

    /// A value which could not be parsed for the given key.
    InvalidValue { key: String, value: String },

    /// A value outside the permitted range of an option.
    OutOfRange(&'static str),

    /// A required key was not given.
    MissingKey(&'static str),

    /// A combination of options which cannot be used together, with a note on the combination.
    Inconsistent(&'static str),
}

impl From<ConfigError> for ErrorKind {
    fn from(e: ConfigError) -> Self {
        ErrorKind::Config(e)
    }
}

/// Errors when building a dataset.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataError {
    /// The input ended before a value for the given expression and individual was read.
    MissingData { expression: usize, individual: usize },

    /// A value which is neither a number nor the missing symbol.
    BadValue { expression: usize, individual: usize },

    /// Rows of the state matrix differ in length.
    RaggedMatrix,

    /// One of the two groups has no individuals.
    EmptyGroup,

    /// The pattern size is zero or larger than the count of states.
    PatternSize,
}

impl From<DataError> for ErrorKind {
    fn from(e: DataError) -> Self {
        ErrorKind::Data(e)
    }
}

/// Failures to open, read, or write a file.
///
/// The underlying [std::io::Error] is kept as a string, so errors remain comparable and clonable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IoError {
    pub path: String,
    pub message: String,
}

impl IoError {
    pub fn new(path: impl AsRef<std::path::Path>, error: &std::io::Error) -> Self {
        IoError {
            path: path.as_ref().display().to_string(),
            message: error.to_string(),
        }
    }
}

impl From<IoError> for ErrorKind {
    fn from(e: IoError) -> Self {
        ErrorKind::Io(e)
    }
}

/// Errors when parsing a checkpoint.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// A line which could not be read or understood.
    Line(usize),

    /// A state or individual on the given line which is outside the dataset.
    Index(usize),

    /// Content found before any section marker, on the given line.
    NoSection(usize),
}

impl From<ParseError> for ErrorKind {
    fn from(e: ParseError) -> Self {
        ErrorKind::Parse(e)
    }
}

/// Errors from a solver backend.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SolverError {
    /// The solver finished without an optimal solution or proof of infeasibility.
    Status(String),

    /// A solution of some model was found, though the pattern read from it does not have the required size.
    PatternSize { expected: usize, found: usize },
}

impl From<SolverError> for ErrorKind {
    fn from(e: SolverError) -> Self {
        ErrorKind::Solver(e)
    }
}

/// Errors in communication between the controller and workers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransportError {
    /// No worker is available, and none is busy.
    NoWorkers,

    /// A message could not be sent to the worker of the given rank.
    Send(usize),

    /// Every worker hung up while a completion was awaited.
    Disconnected,

    /// The worker of the given rank panicked.
    Panic(usize),
}

impl From<TransportError> for ErrorKind {
    fn from(e: TransportError) -> Self {
        ErrorKind::Transport(e)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(ConfigError::UnknownKey(key)) => write!(f, "Unknown configuration key: {key}"),
            Self::Config(ConfigError::InvalidValue { key, value }) => {
                write!(f, "Invalid value '{value}' for {key}")
            }
            Self::Config(ConfigError::OutOfRange(name)) => write!(f, "{name} is out of range"),
            Self::Config(ConfigError::MissingKey(key)) => write!(f, "A value must be given for {key}"),
            Self::Config(ConfigError::Inconsistent(note)) => write!(f, "{note}"),

            Self::Data(DataError::MissingData { expression, individual }) => {
                write!(f, "Input is missing data at expression {expression}, individual {individual}")
            }
            Self::Data(DataError::BadValue { expression, individual }) => {
                write!(f, "Unreadable value at expression {expression}, individual {individual}")
            }
            Self::Data(DataError::RaggedMatrix) => write!(f, "States differ in their count of individuals"),
            Self::Data(DataError::EmptyGroup) => write!(f, "Both groups require at least one individual"),
            Self::Data(DataError::PatternSize) => write!(f, "The pattern size does not fit the states"),

            Self::Io(IoError { path, message }) => write!(f, "{path}: {message}"),

            Self::Parse(ParseError::Line(line)) => write!(f, "Unable to parse checkpoint line {line}"),
            Self::Parse(ParseError::Index(line)) => write!(f, "Index out of range on checkpoint line {line}"),
            Self::Parse(ParseError::NoSection(line)) => {
                write!(f, "Checkpoint line {line} is outside of a section")
            }

            Self::Solver(SolverError::Status(status)) => write!(f, "Solver failed: {status}"),
            Self::Solver(SolverError::PatternSize { expected, found }) => {
                write!(f, "Expected a pattern of {expected} states, found {found}")
            }

            Self::Transport(TransportError::NoWorkers) => write!(f, "No workers are available"),
            Self::Transport(TransportError::Send(rank)) => write!(f, "Unable to reach worker {rank}"),
            Self::Transport(TransportError::Disconnected) => write!(f, "Workers disconnected"),
            Self::Transport(TransportError::Panic(rank)) => write!(f, "Worker {rank} panicked"),
        }
    }
}

impl std::error::Error for ErrorKind {}
