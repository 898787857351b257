//! Benchmark profiles for the memchurn allocator stress generator.
//!
//! The compiled-in budgets take minutes and tens of gigabytes per run,
//! so benches use scaled-down [`DriverConfig`] profiles:
//!
//! - [`reference_profile`]: 1M live units, 5M cumulative per phase
//! - [`stress_profile`]: 10M live units, 50M cumulative per phase
//!
//! Both keep the 1:5 low-water to high-water ratio of the defaults.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use memchurn_core::{HIGH_WATER, LOW_WATER};
use memchurn_engine::DriverConfig;

/// Scale-down factor of [`reference_profile`] against the defaults.
pub const REFERENCE_DIVISOR: u64 = 10_240;

/// Scale-down factor of [`stress_profile`] against the defaults.
pub const STRESS_DIVISOR: u64 = 1_024;

/// Small profile: runs every experiment in well under a second.
pub fn reference_profile(seed: u64) -> DriverConfig {
    scaled(REFERENCE_DIVISOR, seed)
}

/// Ten times the reference profile.
pub fn stress_profile(seed: u64) -> DriverConfig {
    scaled(STRESS_DIVISOR, seed)
}

fn scaled(divisor: u64, seed: u64) -> DriverConfig {
    DriverConfig::with_budgets(LOW_WATER / divisor, HIGH_WATER / divisor).seed(seed)
}
