//! The compiled-in experiment table and budget constants.
//!
//! All sizes are *logical* element counts. A block of logical size `n`
//! occupies `n * ELEMENT_WIDTH` bytes. The budgets are expressed in the
//! same logical units, so `LOW_WATER` live elements weigh
//! `LOW_WATER * ELEMENT_WIDTH` bytes of payload.

use crate::error::ParamError;

/// One gibi-unit.
pub const GIB: u64 = 1024 * 1024 * 1024;

/// Live-usage ceiling. Phase one fills up to it; churn stays under it.
pub const LOW_WATER: u64 = 10 * GIB;

/// Cumulative allocation total that ends a churn loop.
pub const HIGH_WATER: u64 = 50 * GIB;

/// Smallest logical size any fill range may draw.
///
/// Dimensions the allocation table: `LOW_WATER / MINIMAL_SIZE + 2` slots.
pub const MINIMAL_SIZE: u64 = 50;

/// Bytes per logical element.
pub const ELEMENT_WIDTH: usize = 8;

/// Inclusive range of logical block sizes, sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeRange {
    /// Smallest size drawn.
    pub lower: u64,
    /// Largest size drawn.
    pub upper: u64,
}

impl SizeRange {
    /// A range `lower..=upper`.
    pub const fn new(lower: u64, upper: u64) -> Self {
        Self { lower, upper }
    }

    /// A degenerate range that always yields `size`.
    pub const fn fixed(size: u64) -> Self {
        Self::new(size, size)
    }

    /// True when every draw yields the same size.
    pub fn is_fixed(&self) -> bool {
        self.lower == self.upper
    }

    /// True when `size` can be drawn from this range.
    pub fn contains(&self, size: u64) -> bool {
        (self.lower..=self.upper).contains(&size)
    }

    /// Reject empty ranges and ranges that may draw zero.
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.lower > self.upper {
            return Err(ParamError::EmptySizeRange {
                lower: self.lower,
                upper: self.upper,
            });
        }
        if self.lower == 0 {
            return Err(ParamError::ZeroSize);
        }
        Ok(())
    }
}

/// Parameters of the optional second phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseTwo {
    /// Fraction of the populated slots deleted before churning again.
    pub delete_fraction: f64,
    /// Size range used by the second churn.
    pub sizes: SizeRange,
}

impl PhaseTwo {
    /// `floor(delete_fraction * populated)`.
    pub fn objects_to_delete(&self, populated: usize) -> usize {
        (self.delete_fraction * populated as f64).floor() as usize
    }

    /// Validate the size range and require `0.0 <= delete_fraction < 1.0`.
    ///
    /// A fraction of one would empty the table and leave the second churn
    /// with no slot it can ever pick.
    pub fn validate(&self) -> Result<(), ParamError> {
        if !(0.0..1.0).contains(&self.delete_fraction) {
            return Err(ParamError::InvalidDeleteFraction {
                value: self.delete_fraction,
            });
        }
        self.sizes.validate()
    }
}

/// Everything that distinguishes one experiment from another.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExperimentParams {
    /// Size range for the fill and the first churn.
    pub former: SizeRange,
    /// Bulk delete and second churn, if the experiment has them.
    pub phase_two: Option<PhaseTwo>,
}

impl ExperimentParams {
    const fn single(former: SizeRange) -> Self {
        Self {
            former,
            phase_two: None,
        }
    }

    const fn two_phase(former: SizeRange, delete_fraction: f64, latter: SizeRange) -> Self {
        Self {
            former,
            phase_two: Some(PhaseTwo {
                delete_fraction,
                sizes: latter,
            }),
        }
    }

    /// Whether a second phase follows the first.
    pub fn has_phase_two(&self) -> bool {
        self.phase_two.is_some()
    }

    /// Check the table invariants the driver relies on.
    pub fn validate(&self) -> Result<(), ParamError> {
        self.former.validate()?;
        if self.former.lower < MINIMAL_SIZE {
            return Err(ParamError::BelowMinimalSize {
                lower: self.former.lower,
                minimal: MINIMAL_SIZE,
            });
        }
        match &self.phase_two {
            Some(p) => p.validate(),
            None => Ok(()),
        }
    }
}

/// Experiment parameters indexed by experiment number.
pub const EXPERIMENTS: [ExperimentParams; 8] = [
    ExperimentParams::single(SizeRange::fixed(100)),
    ExperimentParams::two_phase(SizeRange::fixed(100), 0.0, SizeRange::fixed(130)),
    ExperimentParams::two_phase(SizeRange::fixed(100), 0.9, SizeRange::fixed(130)),
    ExperimentParams::two_phase(SizeRange::new(100, 150), 0.0, SizeRange::new(200, 250)),
    ExperimentParams::two_phase(SizeRange::new(100, 150), 0.9, SizeRange::new(200, 250)),
    ExperimentParams::two_phase(SizeRange::new(100, 200), 0.5, SizeRange::new(1000, 2000)),
    ExperimentParams::two_phase(SizeRange::new(1000, 2000), 0.9, SizeRange::new(1500, 2500)),
    ExperimentParams::two_phase(SizeRange::new(50, 150), 0.9, SizeRange::new(5000, 15000)),
];
