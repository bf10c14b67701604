use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire forecasting crate.
pub type Result<T> = std::result::Result<T, ForecastErr>;

/// The forecasting crate's error type.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastErr {
    /// A hyperparameter or construction argument is out of its valid domain.
    InvalidConfiguration(String),
    /// The width of some input disagrees with the width the receiver expects.
    DimensionMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// A dataset was indexed past its bounds.
    IndexOutOfRange { index: usize, len: usize },
    /// A zero-length sample set was handed to training or evaluation.
    EmptyDataset(&'static str),
}

impl ForecastErr {
    /// Shorthand for building an `InvalidConfiguration` error.
    pub(crate) fn config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

impl Display for ForecastErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastErr::InvalidConfiguration(msg) => write!(f, "invalid configuration: {msg}"),
            ForecastErr::DimensionMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "dimension mismatch for {what}: got {got}, expected {expected}"
            ),
            ForecastErr::IndexOutOfRange { index, len } => {
                write!(f, "index {index} is out of range for {len} samples")
            }
            ForecastErr::EmptyDataset(which) => write!(f, "the {which} dataset is empty"),
        }
    }
}

impl Error for ForecastErr {}
