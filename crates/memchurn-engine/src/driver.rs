//! The experiment driver.
//!
//! A [`Driver`] runs one experiment at a time against its [`SlotTable`].
//! Phases can be run individually ([`fill`](Driver::fill),
//! [`churn`](Driver::churn), [`bulk_delete`](Driver::bulk_delete)) or
//! composed with [`phase_one`](Driver::phase_one),
//! [`phase_two`](Driver::phase_two) and [`run`](Driver::run).
//!
//! # Replacement semantics
//!
//! A churn step frees the picked slot before allocating into it. A live
//! block is never overwritten, so churn cannot leak.

use log::{debug, info, warn};
use memchurn_arena::SlotTable;
use memchurn_core::{ExperimentId, PhaseTwo, SizeRange};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::DriverConfig;
use crate::error::DriverError;
use crate::report::{
    ChurnReport, Counters, DeleteReport, FillReport, PhaseOneReport, PhaseTwoReport, RunReport,
};

/// What a churn step does when its random pick lands on an empty slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptySlotPolicy {
    /// Allocate into the empty slot if the budget allows. Phase one.
    Refill,
    /// Skip the iteration. Phase two, where the table is deliberately sparse.
    Skip,
}

/// Runs experiments against a fixed-capacity allocation table.
pub struct Driver {
    config: DriverConfig,
    table: SlotTable,
    rng: ChaCha8Rng,
    counters: Counters,
}

impl Driver {
    /// Allocate the table and seed the generator.
    pub fn new(config: DriverConfig) -> Result<Self, DriverError> {
        let table = SlotTable::new(&config.table)?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            table,
            rng,
            counters: Counters::default(),
        })
    }

    /// The config this driver was built with.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Read-only view of the allocation table.
    pub fn table(&self) -> &SlotTable {
        &self.table
    }

    /// Current counters.
    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// Free every block, zero the counters and reseed the generator.
    pub fn reset(&mut self) {
        self.table.release_all();
        self.counters = Counters::default();
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
    }

    /// Run every phase of experiment `id`.
    pub fn run(&mut self, id: ExperimentId) -> Result<RunReport, DriverError> {
        let phase_one = self.phase_one(id)?;
        let phase_two = self.phase_two(id)?;
        Ok(RunReport {
            experiment: id,
            phase_one,
            phase_two,
        })
    }

    /// Fill then churn with the experiment's former size range.
    ///
    /// # Panics
    ///
    /// Panics if live usage is not below the low-water mark once churn
    /// ends. That only happens when the parameter table is inconsistent.
    pub fn phase_one(&mut self, id: ExperimentId) -> Result<PhaseOneReport, DriverError> {
        let params = id.params();
        self.config.validate_for(params)?;
        if self.table.live_count() > 0 {
            return Err(DriverError::TableNotEmpty {
                live: self.table.live_count(),
            });
        }

        info!("stepping into phase one for experiment {id}");
        let fill = self.fill(params.former)?;
        debug!("experiment {id} fill: {fill:?}");
        let churn = self.churn(params.former, EmptySlotPolicy::Refill)?;
        debug!("experiment {id} phase one churn: {churn:?}");

        assert!(
            self.counters.total_usage < self.config.low_water,
            "experiment {id}: live usage {} is not below the low-water mark {} after phase one",
            self.counters.total_usage,
            self.config.low_water,
        );
        Ok(PhaseOneReport { fill, churn })
    }

    /// Bulk delete then churn with the latter size range.
    ///
    /// Returns `Ok(None)` for experiments without a second phase.
    pub fn phase_two(&mut self, id: ExperimentId) -> Result<Option<PhaseTwoReport>, DriverError> {
        let Some(phase) = id.params().phase_two else {
            return Ok(None);
        };

        info!("stepping into phase two for experiment {id}");
        let delete = self.bulk_delete(&phase)?;
        debug!("experiment {id} bulk delete: {delete:?}");
        self.counters.footprint = 0;
        let churn = self.churn(phase.sizes, EmptySlotPolicy::Skip)?;
        debug!("experiment {id} phase two churn: {churn:?}");
        Ok(Some(PhaseTwoReport { delete, churn }))
    }

    /// Populate consecutive slots with random sizes until live usage
    /// reaches the low-water mark.
    ///
    /// The last draw may carry usage past the mark; for a fixed size `s`
    /// this populates `ceil(low_water / s)` slots. `sizes` must pass
    /// [`DriverConfig::validate_range`].
    pub fn fill(&mut self, sizes: SizeRange) -> Result<FillReport, DriverError> {
        self.config.validate_range(sizes)?;
        while self.counters.total_usage < self.config.low_water {
            let size = self.draw(sizes);
            self.table.allocate(self.counters.populated, size)?;
            self.counters.populated += 1;
            self.counters.total_usage += size;
            self.counters.footprint += size;
        }
        Ok(FillReport {
            populated: self.counters.populated,
            total_usage: self.counters.total_usage,
        })
    }

    /// Random free/allocate cycles until this phase's footprint reaches
    /// the high-water budget.
    ///
    /// Each iteration draws a size, picks a populated slot, frees it, and
    /// allocates the new size into it if usage stays under the low-water
    /// mark. `sizes` must pass [`DriverConfig::validate_range`], otherwise
    /// no draw could ever be allocated and the loop would not end.
    pub fn churn(
        &mut self,
        sizes: SizeRange,
        empty: EmptySlotPolicy,
    ) -> Result<ChurnReport, DriverError> {
        self.config.validate_range(sizes)?;
        if self.counters.populated == 0 {
            return Err(DriverError::NotPopulated);
        }
        // With nothing live, a skipping churn could never allocate again.
        let empty = if empty == EmptySlotPolicy::Skip && self.table.live_count() == 0 {
            warn!("no live slots left to churn; refilling empty picks instead");
            EmptySlotPolicy::Refill
        } else {
            empty
        };

        let mut report = ChurnReport::default();
        while self.counters.footprint < self.config.high_water {
            report.iterations += 1;
            let size = self.draw(sizes);
            let index = self.pick();

            if self.free_slot(index)? == 0 {
                report.misses += 1;
                if empty == EmptySlotPolicy::Skip {
                    continue;
                }
            } else {
                report.frees += 1;
            }

            if self.counters.total_usage + size < self.config.low_water {
                self.table.allocate(index, size)?;
                self.counters.total_usage += size;
                self.counters.footprint += size;
                report.allocations += 1;
            }
        }

        report.footprint = self.counters.footprint;
        report.total_usage = self.counters.total_usage;
        Ok(report)
    }

    /// Free `floor(delete_fraction * populated)` randomly chosen live slots.
    ///
    /// Picks are uniform over the populated range with replacement, so the
    /// miss rate climbs as the table empties. If fewer slots are live than
    /// requested, every live slot is freed.
    pub fn bulk_delete(&mut self, phase: &PhaseTwo) -> Result<DeleteReport, DriverError> {
        if self.counters.populated == 0 {
            return Err(DriverError::NotPopulated);
        }

        let requested = phase.objects_to_delete(self.counters.populated);
        let available = self.table.live_count();
        let target = requested.min(available);
        if target < requested {
            warn!("bulk delete wants {requested} slots but only {available} are live");
        }

        let mut report = DeleteReport {
            requested,
            available,
            ..Default::default()
        };
        while report.deleted < target {
            let index = self.pick();
            if self.free_slot(index)? == 0 {
                report.misses += 1;
                continue;
            }
            report.deleted += 1;
        }
        report.total_usage = self.counters.total_usage;
        Ok(report)
    }

    /// Free the block at `index` and return its logical size.
    ///
    /// Freeing an empty slot returns 0 and leaves every counter untouched.
    pub fn free_slot(&mut self, index: usize) -> Result<u64, DriverError> {
        let freed = self.table.release(index)?;
        self.counters.total_usage -= freed;
        Ok(freed)
    }

    fn draw(&mut self, sizes: SizeRange) -> u64 {
        self.rng.random_range(sizes.lower..=sizes.upper)
    }

    fn pick(&mut self) -> usize {
        self.rng.random_range(0..self.counters.populated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use memchurn_core::{ParamError, EXPERIMENTS};

    fn small() -> DriverConfig {
        DriverConfig::with_budgets(10_000, 50_000)
    }

    fn id(n: u8) -> ExperimentId {
        ExperimentId::new(n).unwrap()
    }

    #[test]
    fn fill_fixed_size_populates_ceil() {
        let mut d = Driver::new(DriverConfig::with_budgets(10_050, 60_000)).unwrap();
        let fill = d.fill(SizeRange::fixed(100)).unwrap();
        assert_eq!(fill.populated, 101);
        assert_eq!(fill.total_usage, 10_100);
        assert_eq!(d.counters().footprint, 10_100);
        assert!(d.table().iter_touched().all(|(_, s)| s.size() == 100));
    }

    #[test]
    fn fill_overshoot_is_under_one_draw() {
        let mut d = Driver::new(small()).unwrap();
        let range = SizeRange::new(50, 150);
        let fill = d.fill(range).unwrap();
        assert!(fill.total_usage >= 10_000);
        assert!(fill.total_usage < 10_000 + range.upper);
        assert_eq!(d.table().live_units(), fill.total_usage);
    }

    #[test]
    fn churn_before_fill_is_error() {
        let mut d = Driver::new(small()).unwrap();
        assert_eq!(
            d.churn(SizeRange::fixed(100), EmptySlotPolicy::Refill),
            Err(DriverError::NotPopulated)
        );
        let phase = EXPERIMENTS[2].phase_two.unwrap();
        assert_eq!(d.bulk_delete(&phase), Err(DriverError::NotPopulated));
    }

    #[test]
    fn churn_reaches_high_water_and_stays_under_low_water() {
        let mut d = Driver::new(small()).unwrap();
        d.fill(SizeRange::fixed(100)).unwrap();
        let churn = d.churn(SizeRange::fixed(100), EmptySlotPolicy::Refill).unwrap();
        assert!(churn.footprint >= 50_000);
        assert!(churn.footprint < 50_000 + 100);
        assert!(churn.total_usage < 10_000);
        assert!(churn.allocations > 0);
        assert_eq!(d.table().live_units(), churn.total_usage);
    }

    #[test]
    fn churn_rejects_range_that_never_fits() {
        let mut d = Driver::new(small()).unwrap();
        d.fill(SizeRange::fixed(100)).unwrap();
        let before = d.counters();
        assert_eq!(
            d.churn(SizeRange::fixed(10_000), EmptySlotPolicy::Refill),
            Err(DriverError::Config(ConfigError::SizeExceedsBudget {
                size: 10_000,
                low_water: 10_000,
            }))
        );
        assert_eq!(d.counters(), before);
        assert_eq!(d.table().live_count(), 100);
    }

    #[test]
    fn fill_rejects_unusable_ranges() {
        let mut d = Driver::new(small()).unwrap();
        assert_eq!(
            d.fill(SizeRange::new(200, 100)),
            Err(DriverError::Config(ConfigError::Params(
                ParamError::EmptySizeRange {
                    lower: 200,
                    upper: 100,
                }
            )))
        );
        assert!(matches!(
            d.fill(SizeRange::fixed(10_000)),
            Err(DriverError::Config(ConfigError::SizeExceedsBudget { .. }))
        ));
        assert_eq!(d.counters(), Counters::default());
        assert_eq!(d.table().live_count(), 0);
    }

    #[test]
    fn freeing_empty_slot_is_idempotent() {
        let mut d = Driver::new(small()).unwrap();
        d.fill(SizeRange::fixed(100)).unwrap();
        assert_eq!(d.free_slot(3).unwrap(), 100);
        let before = d.counters();
        assert_eq!(d.free_slot(3).unwrap(), 0);
        assert_eq!(d.free_slot(3).unwrap(), 0);
        assert_eq!(d.counters(), before);
    }

    #[test]
    fn bulk_delete_frees_exact_count() {
        let mut d = Driver::new(small()).unwrap();
        d.fill(SizeRange::fixed(100)).unwrap();
        let phase = EXPERIMENTS[2].phase_two.unwrap();
        let report = d.bulk_delete(&phase).unwrap();
        assert_eq!(report.requested, 90);
        assert_eq!(report.deleted, 90);
        assert_eq!(d.table().live_count(), 10);
        assert_eq!(report.total_usage, 1_000);
    }

    #[test]
    fn bulk_delete_caps_at_live_count() {
        let mut d = Driver::new(small()).unwrap();
        d.fill(SizeRange::fixed(100)).unwrap();
        for i in 0..20 {
            d.free_slot(i).unwrap();
        }
        let phase = EXPERIMENTS[7].phase_two.unwrap();
        let report = d.bulk_delete(&phase).unwrap();
        assert_eq!(report.requested, 90);
        assert_eq!(report.available, 80);
        assert_eq!(report.deleted, 80);
        assert_eq!(d.table().live_count(), 0);
    }

    #[test]
    fn run_twice_requires_reset() {
        let mut d = Driver::new(small()).unwrap();
        d.run(id(0)).unwrap();
        assert!(matches!(
            d.run(id(0)),
            Err(DriverError::TableNotEmpty { .. })
        ));
        d.reset();
        assert_eq!(d.counters(), Counters::default());
        assert_eq!(d.table().live_count(), 0);
        d.run(id(0)).unwrap();
    }

    #[test]
    fn reset_replays_the_same_sequence() {
        let mut d = Driver::new(small()).unwrap();
        let first = d.run(id(3)).unwrap();
        d.reset();
        let second = d.run(id(3)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_config_is_reported() {
        let mut d = Driver::new(DriverConfig::with_budgets(10_000, 10_050)).unwrap();
        assert!(matches!(d.run(id(0)), Err(DriverError::Config(_))));
        assert_eq!(d.table().live_count(), 0);
    }

    #[test]
    fn phase_two_skipped_for_single_phase_experiment() {
        let mut d = Driver::new(small()).unwrap();
        d.phase_one(id(0)).unwrap();
        assert_eq!(d.phase_two(id(0)).unwrap(), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn every_experiment_completes_with_consistent_counters(
                experiment in 0u8..8,
                seed in any::<u64>(),
            ) {
                let config = DriverConfig::with_budgets(40_000, 120_000).seed(seed);
                let mut d = Driver::new(config).unwrap();
                let report = d.run(id(experiment)).unwrap();
                let counters = d.counters();

                prop_assert!(report.phase_one.fill.total_usage >= 40_000);
                prop_assert!(report.phase_one.churn.total_usage < 40_000);
                prop_assert!(report.phase_one.churn.footprint >= 120_000);
                prop_assert_eq!(counters.total_usage, d.table().live_units());
                prop_assert!(counters.total_usage < 40_000);
                prop_assert_eq!(report.phase_two.is_some(), EXPERIMENTS[experiment as usize].has_phase_two());
                if let Some(two) = report.phase_two {
                    let expected = two.delete.requested.min(two.delete.available);
                    prop_assert_eq!(two.delete.deleted, expected);
                    prop_assert!(two.churn.footprint >= 120_000);
                }
            }

            #[test]
            fn draws_stay_in_range(lower in 50u64..500, span in 0u64..500, seed in any::<u64>()) {
                let range = SizeRange::new(lower, lower + span);
                let mut d = Driver::new(DriverConfig::with_budgets(20_000, 100_000).seed(seed)).unwrap();
                d.fill(range).unwrap();
                for (_, slot) in d.table().iter_touched() {
                    prop_assert!(range.contains(slot.size()));
                }
            }
        }
    }
}
