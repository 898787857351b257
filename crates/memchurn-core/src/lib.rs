//! Core types for the memchurn allocator stress generator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the compile-time experiment table, the budget constants every phase
//! is measured against, experiment identifiers, and parameter errors.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod params;

pub use error::ParamError;
pub use id::{ExperimentId, Selector};
pub use params::{
    ExperimentParams, PhaseTwo, SizeRange, ELEMENT_WIDTH, EXPERIMENTS, GIB, HIGH_WATER,
    LOW_WATER, MINIMAL_SIZE,
};
