//! Driver configuration, validation, and error types.
//!
//! [`DriverConfig`] carries the budgets every phase is measured against.
//! The binary always uses [`DriverConfig::default`], which matches the
//! compiled-in constants; tests and benches shrink the budgets with
//! [`DriverConfig::with_budgets`] so a run finishes in milliseconds.

use std::error::Error;
use std::fmt;

use memchurn_arena::{ArenaError, TableConfig};
use memchurn_core::{
    ExperimentParams, ParamError, SizeRange, HIGH_WATER, LOW_WATER, MINIMAL_SIZE,
};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`DriverConfig::validate_for`].
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Experiment parameters are inconsistent.
    Params(ParamError),
    /// Table configuration is invalid.
    Arena(ArenaError),
    /// Low-water budget is zero, so the fill would populate nothing.
    ZeroLowWater,
    /// High-water budget is not above what the fill alone can reach.
    ///
    /// Churn must allocate at least once to bring usage back under the
    /// low-water mark before phase one ends.
    HighWaterTooLow {
        /// Configured high-water budget.
        high_water: u64,
        /// Smallest budget that guarantees churn runs.
        required: u64,
    },
    /// A size range can draw blocks that never fit under the low-water mark.
    SizeExceedsBudget {
        /// Largest size in the offending range.
        size: u64,
        /// Configured low-water budget.
        low_water: u64,
    },
    /// The table cannot hold a fill made of the smallest draws.
    TableTooSmall {
        /// Configured slot count.
        capacity: usize,
        /// Slots the fill may need.
        required: u64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Params(e) => write!(f, "params: {e}"),
            Self::Arena(e) => write!(f, "table: {e}"),
            Self::ZeroLowWater => write!(f, "low_water must be at least 1"),
            Self::HighWaterTooLow {
                high_water,
                required,
            } => write!(f, "high_water {high_water} must be above {required}"),
            Self::SizeExceedsBudget { size, low_water } => {
                write!(f, "size {size} never fits under low_water {low_water}")
            }
            Self::TableTooSmall { capacity, required } => {
                write!(f, "table of {capacity} slots is below the {required} the fill may need")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Params(e) => Some(e),
            Self::Arena(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParamError> for ConfigError {
    fn from(e: ParamError) -> Self {
        Self::Params(e)
    }
}

impl From<ArenaError> for ConfigError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}

// ── DriverConfig ───────────────────────────────────────────────────

/// Budgets, seed, and table sizing for one [`Driver`](crate::Driver).
#[derive(Clone, Debug, PartialEq)]
pub struct DriverConfig {
    /// Live-usage ceiling in logical units. Default: [`LOW_WATER`].
    pub low_water: u64,
    /// Per-phase cumulative allocation budget. Default: [`HIGH_WATER`].
    pub high_water: u64,
    /// Seed for the ChaCha8 generator. Default: 0.
    pub seed: u64,
    /// Allocation table sizing.
    pub table: TableConfig,
}

impl DriverConfig {
    /// Default RNG seed.
    pub const DEFAULT_SEED: u64 = 0;

    /// Config with custom budgets and a table sized for them.
    pub fn with_budgets(low_water: u64, high_water: u64) -> Self {
        Self {
            low_water,
            high_water,
            seed: Self::DEFAULT_SEED,
            table: TableConfig::for_budget(low_water, MINIMAL_SIZE),
        }
    }

    /// Replace the seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check that `params` can run to completion under this config.
    pub fn validate_for(&self, params: &ExperimentParams) -> Result<(), ConfigError> {
        params.validate()?;
        self.table.validate()?;
        if self.low_water == 0 {
            return Err(ConfigError::ZeroLowWater);
        }

        let ranges = std::iter::once(params.former).chain(params.phase_two.map(|p| p.sizes));
        for range in ranges {
            self.validate_range(range)?;
        }

        // Fill stops once usage reaches low_water, overshooting by < one draw.
        let required = self.low_water.saturating_add(params.former.upper);
        if self.high_water <= required {
            return Err(ConfigError::HighWaterTooLow {
                high_water: self.high_water,
                required,
            });
        }

        let slots = self.low_water.div_ceil(params.former.lower);
        if slots > self.table.capacity as u64 {
            return Err(ConfigError::TableTooSmall {
                capacity: self.table.capacity,
                required: slots,
            });
        }
        Ok(())
    }

    /// Check that `range` can be drawn from and that every draw fits under
    /// the low-water mark.
    ///
    /// A churn loop over a range that never fits can never allocate, so its
    /// footprint would never reach the high-water budget.
    pub fn validate_range(&self, range: SizeRange) -> Result<(), ConfigError> {
        range.validate()?;
        if range.upper >= self.low_water {
            return Err(ConfigError::SizeExceedsBudget {
                size: range.upper,
                low_water: self.low_water,
            });
        }
        Ok(())
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::with_budgets(LOW_WATER, HIGH_WATER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memchurn_core::EXPERIMENTS;

    #[test]
    fn default_matches_constants() {
        let config = DriverConfig::default();
        assert_eq!(config.low_water, LOW_WATER);
        assert_eq!(config.high_water, HIGH_WATER);
        assert_eq!(config.table, TableConfig::default());
    }

    #[test]
    fn default_accepts_every_experiment() {
        let config = DriverConfig::default();
        for params in &EXPERIMENTS {
            assert_eq!(config.validate_for(params), Ok(()));
        }
    }

    #[test]
    fn small_budgets_accept_every_experiment() {
        let config = DriverConfig::with_budgets(100_000, 500_000);
        for params in &EXPERIMENTS {
            assert_eq!(config.validate_for(params), Ok(()));
        }
    }

    #[test]
    fn zero_low_water_rejected() {
        let config = DriverConfig::with_budgets(0, 10);
        assert!(config.validate_for(&EXPERIMENTS[0]).is_err());
    }

    #[test]
    fn oversized_latter_range_rejected() {
        let config = DriverConfig::with_budgets(10_000, 50_000);
        assert_eq!(
            config.validate_for(&EXPERIMENTS[7]),
            Err(ConfigError::SizeExceedsBudget {
                size: 15_000,
                low_water: 10_000,
            })
        );
    }

    #[test]
    fn high_water_must_clear_fill() {
        let config = DriverConfig::with_budgets(10_000, 10_100);
        assert_eq!(
            config.validate_for(&EXPERIMENTS[0]),
            Err(ConfigError::HighWaterTooLow {
                high_water: 10_100,
                required: 10_100,
            })
        );
    }

    #[test]
    fn small_table_rejected() {
        let mut config = DriverConfig::with_budgets(10_000, 50_000);
        config.table.capacity = 50;
        assert_eq!(
            config.validate_for(&EXPERIMENTS[0]),
            Err(ConfigError::TableTooSmall {
                capacity: 50,
                required: 100,
            })
        );
    }

    #[test]
    fn range_must_fit_under_low_water() {
        let config = DriverConfig::with_budgets(10_000, 50_000);
        assert_eq!(config.validate_range(SizeRange::new(100, 9_999)), Ok(()));
        assert_eq!(
            config.validate_range(SizeRange::fixed(10_000)),
            Err(ConfigError::SizeExceedsBudget {
                size: 10_000,
                low_water: 10_000,
            })
        );
        assert_eq!(
            config.validate_range(SizeRange::new(0, 10)),
            Err(ConfigError::Params(ParamError::ZeroSize))
        );
    }

    #[test]
    fn invalid_params_surface_as_params_error() {
        let config = DriverConfig::with_budgets(10_000, 50_000);
        let params = ExperimentParams {
            former: SizeRange::new(200, 100),
            phase_two: None,
        };
        assert!(matches!(
            config.validate_for(&params),
            Err(ConfigError::Params(ParamError::EmptySizeRange { .. }))
        ));
    }
}
