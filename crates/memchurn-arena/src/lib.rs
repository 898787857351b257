//! Fixed-capacity allocation table for memchurn experiments.
//!
//! The table is a single zero-initialised array of [`Slot`] records,
//! allocated once and never resized, so the bookkeeping itself does not
//! churn the allocator under test. Each occupied slot owns one
//! [`RawBlock`] obtained straight from the global allocator.
//!
//! # Architecture
//!
//! ```text
//! SlotTable (fixed capacity, zeroed on creation)
//! └── Slot[] (index-addressed, never reordered)
//!     ├── block: Option<RawBlock>   (None == empty)
//!     └── size:  u64                (0 == empty)
//! ```
//!
//! # Block ownership
//!
//! [`RawBlock`] has no destructor. A block is released only through
//! [`SlotTable::release`], which knows the size it was allocated with.
//! Dropping the table releases whatever blocks are still owned.
//!
//! # Unsafe code
//!
//! This crate is the only one in the workspace that may contain `unsafe`
//! code. The allocator calls live in `raw.rs`. The one call site outside
//! it is `RawBlock::release`, which owns the size invariant that
//! `raw::dealloc_block` requires: a block is freed with the size it was
//! allocated with, exactly once.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod block;
pub mod config;
pub mod error;
mod raw;
pub mod slot;
pub mod table;

pub use block::RawBlock;
pub use config::TableConfig;
pub use error::ArenaError;
pub use slot::Slot;
pub use table::SlotTable;
