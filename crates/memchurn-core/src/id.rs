//! Experiment identifiers and the stdin selector.

use std::fmt;
use std::str::FromStr;

use crate::error::ParamError;
use crate::params::{ExperimentParams, EXPERIMENTS};

/// Index of one of the compiled-in experiments.
///
/// Always within `0..ExperimentId::COUNT`, so [`params`](ExperimentId::params)
/// never fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExperimentId(u8);

impl ExperimentId {
    /// Number of experiments in [`EXPERIMENTS`].
    pub const COUNT: usize = 8;

    /// Build an id, returning `None` if `index` has no experiment.
    pub fn new(index: u8) -> Option<Self> {
        ((index as usize) < Self::COUNT).then_some(Self(index))
    }

    /// Raw index into the experiment table.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Compile-time parameters of this experiment.
    pub fn params(self) -> &'static ExperimentParams {
        &EXPERIMENTS[self.index()]
    }

    /// Every experiment id in table order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }
}

impl fmt::Display for ExperimentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for ExperimentId {
    type Error = ParamError;

    fn try_from(index: i64) -> Result<Self, Self::Error> {
        u8::try_from(index)
            .ok()
            .and_then(Self::new)
            .ok_or(ParamError::UnknownExperiment { index })
    }
}

/// What the process was asked to do.
///
/// Any integer outside the experiment table selects [`Selector::Baseline`]:
/// no experiment runs and only the final memory report is printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selector {
    /// Run the given experiment.
    Experiment(ExperimentId),
    /// Skip the experiment; report the idle process only.
    Baseline,
}

impl From<i64> for Selector {
    fn from(value: i64) -> Self {
        match ExperimentId::try_from(value) {
            Ok(id) => Self::Experiment(id),
            Err(_) => Self::Baseline,
        }
    }
}

impl FromStr for Selector {
    type Err = ParamError;

    /// Parse the leading integer after any whitespace.
    ///
    /// Trailing text is ignored, so `"7abc"` selects experiment 7. A number
    /// too large for `i64` is out of range and selects the baseline. Input
    /// with no leading digits is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim_start();
        let sign = usize::from(s.starts_with(['+', '-']));
        let digits = s[sign..].bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return Err(ParamError::InvalidSelector {
                input: s.split_whitespace().next().unwrap_or("").to_string(),
            });
        }
        Ok(s[..sign + digits]
            .parse::<i64>()
            .map_or(Self::Baseline, Self::from))
    }
}
