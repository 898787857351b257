//! memchurn: a synthetic memory-allocator stress generator.
//!
//! This is the top-level facade crate. It re-exports the sub-crates and
//! provides [`Session`], which ties a selector, the experiment driver and
//! the memory probe together the way the `memchurn` binary runs them.
//!
//! # Quick start
//!
//! ```rust
//! use memchurn::prelude::*;
//!
//! // Shrunken budgets; the binary uses DriverConfig::default().
//! let config = DriverConfig::with_budgets(10_000, 50_000);
//! let mut session = Session::new(Vec::new())
//!     .config(config)
//!     .probe(MemoryProbe::at("/nonexistent"))
//!     .mid_run_probe(false);
//!
//! let report = session.execute("0".parse().unwrap()).unwrap().unwrap();
//! assert_eq!(report.phase_one.fill.populated, 100);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`params`] | `memchurn-core` | Experiment table, ids, budgets |
//! | [`arena`] | `memchurn-arena` | Slot table and raw blocks |
//! | [`engine`] | `memchurn-engine` | Experiment driver and reports |
//! | [`probe`] | `memchurn-probe` | Process status probe |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Experiment parameters, ids and budgets (`memchurn-core`).
pub use memchurn_core as params;

/// Allocation table and raw blocks (`memchurn-arena`).
pub use memchurn_arena as arena;

/// Experiment driver, config and reports (`memchurn-engine`).
pub use memchurn_engine as engine;

/// Process memory probe (`memchurn-probe`).
pub use memchurn_probe as probe;

pub mod session;

pub use session::{read_selector, Session, SessionError};

/// Common imports.
pub mod prelude {
    pub use crate::session::{read_selector, Session, SessionError};
    pub use memchurn_core::{ExperimentId, Selector};
    pub use memchurn_engine::{Driver, DriverConfig, DriverError, RunReport};
    pub use memchurn_probe::MemoryProbe;
}
