//! Counters and per-phase reports.
//!
//! [`Counters`] is the live bookkeeping the driver consults on every
//! iteration. The report structs are snapshots taken when a sub-phase
//! ends; they exist for logging and tests and never feed back into the
//! experiment.

use memchurn_core::ExperimentId;

/// Running totals for one experiment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    /// Sum of logical sizes over occupied slots.
    pub total_usage: u64,
    /// Cumulative logical size allocated in the current phase.
    pub footprint: u64,
    /// Slots populated by the fill. Random picks land in `0..populated`.
    pub populated: usize,
}

/// Outcome of the phase-one fill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FillReport {
    /// Slots populated.
    pub populated: usize,
    /// Live usage when the fill stopped.
    pub total_usage: u64,
}

/// Outcome of a churn loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChurnReport {
    /// Loop iterations, including skipped ones.
    pub iterations: u64,
    /// Blocks allocated.
    pub allocations: u64,
    /// Live blocks freed.
    pub frees: u64,
    /// Picks that landed on an empty slot.
    pub misses: u64,
    /// Footprint when the loop ended.
    pub footprint: u64,
    /// Live usage when the loop ended.
    pub total_usage: u64,
}

/// Outcome of the phase-two bulk delete.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeleteReport {
    /// `floor(delete_fraction * populated)`.
    pub requested: usize,
    /// Live slots when deletion started.
    pub available: usize,
    /// Slots actually freed: `min(requested, available)`.
    pub deleted: usize,
    /// Picks that landed on an empty slot.
    pub misses: u64,
    /// Live usage after deletion.
    pub total_usage: u64,
}

/// Fill followed by churn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhaseOneReport {
    /// Fill sub-phase.
    pub fill: FillReport,
    /// Churn sub-phase.
    pub churn: ChurnReport,
}

/// Bulk delete followed by churn with the latter size range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhaseTwoReport {
    /// Bulk delete sub-phase.
    pub delete: DeleteReport,
    /// Churn sub-phase.
    pub churn: ChurnReport,
}

/// Everything one experiment did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// Which experiment ran.
    pub experiment: ExperimentId,
    /// Phase one.
    pub phase_one: PhaseOneReport,
    /// Phase two, for experiments that have one.
    pub phase_two: Option<PhaseTwoReport>,
}

impl RunReport {
    /// Blocks allocated across every phase, fill included.
    pub fn total_allocations(&self) -> u64 {
        let two = self.phase_two.map_or(0, |p| p.churn.allocations);
        self.phase_one.fill.populated as u64 + self.phase_one.churn.allocations + two
    }
}
