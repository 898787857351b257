//! Experiment driver for memchurn allocator stress runs.
//!
//! [`Driver`] owns the allocation table and the random generator and runs
//! an experiment's phases synchronously:
//!
//! 1. **Fill** the table until live usage reaches the low-water mark.
//! 2. **Churn** random free/allocate cycles until the phase has allocated
//!    the high-water budget.
//! 3. *(phase two only)* **Bulk delete** a fraction of the populated slots.
//! 4. *(phase two only)* **Churn** again with the latter size range.
//!
//! Everything is single-threaded and deterministic for a given seed.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod driver;
pub mod error;
pub mod report;

pub use config::{ConfigError, DriverConfig};
pub use driver::{Driver, EmptySlotPolicy};
pub use error::DriverError;
pub use report::{
    ChurnReport, Counters, DeleteReport, FillReport, PhaseOneReport, PhaseTwoReport, RunReport,
};
