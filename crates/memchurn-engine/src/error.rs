//! Driver error type.

use std::error::Error;
use std::fmt;

use memchurn_arena::ArenaError;

use crate::config::ConfigError;

/// Errors returned by [`Driver`](crate::Driver) operations.
///
/// The phase-one invariant is not among them: a violation means the
/// parameter table is inconsistent and the driver panics.
#[derive(Debug, PartialEq)]
pub enum DriverError {
    /// Config rejected for the requested experiment.
    Config(ConfigError),
    /// The table failed to allocate or free a block.
    Arena(ArenaError),
    /// Phase one was started on a table that still holds blocks.
    TableNotEmpty {
        /// Live slots left over from an earlier run.
        live: usize,
    },
    /// A phase that picks random slots ran before the fill populated any.
    NotPopulated,
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Arena(e) => write!(f, "arena: {e}"),
            Self::TableNotEmpty { live } => {
                write!(f, "table still holds {live} live blocks; reset the driver first")
            }
            Self::NotPopulated => write!(f, "no slots populated; run the fill first"),
        }
    }
}

impl Error for DriverError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Arena(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for DriverError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ArenaError> for DriverError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}
