//! Parameter and selector errors.

use std::error::Error;
use std::fmt;

/// Errors raised while validating experiment parameters or parsing a selector.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamError {
    /// Experiment index outside `0..ExperimentId::COUNT`.
    UnknownExperiment {
        /// The index that was requested.
        index: i64,
    },
    /// A size range whose lower bound exceeds its upper bound.
    EmptySizeRange {
        /// Inclusive lower bound.
        lower: u64,
        /// Inclusive upper bound.
        upper: u64,
    },
    /// A size range that can draw zero-sized blocks.
    ZeroSize,
    /// A fill range smaller than the size the allocation table is dimensioned for.
    BelowMinimalSize {
        /// Inclusive lower bound of the offending range.
        lower: u64,
        /// The minimal size the table is sized against.
        minimal: u64,
    },
    /// Delete fraction is NaN, negative, or not below 1.0.
    InvalidDeleteFraction {
        /// The rejected value.
        value: f64,
    },
    /// Selector text that does not start with an integer.
    InvalidSelector {
        /// The first token of the input.
        input: String,
    },
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownExperiment { index } => write!(f, "unknown experiment {index}"),
            Self::EmptySizeRange { lower, upper } => {
                write!(f, "size range {lower}..={upper} is empty")
            }
            Self::ZeroSize => write!(f, "size range may draw zero-sized blocks"),
            Self::BelowMinimalSize { lower, minimal } => {
                write!(f, "fill size {lower} is below the table's minimal size {minimal}")
            }
            Self::InvalidDeleteFraction { value } => {
                write!(f, "delete fraction must be in [0, 1), got {value}")
            }
            Self::InvalidSelector { input } => write!(f, "selector '{input}' does not start with an integer"),
        }
    }
}

impl Error for ParamError {}
