//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during table operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// A table with no slots was requested.
    ZeroCapacity,
    /// The slot array itself could not be allocated.
    TableAllocationFailed {
        /// Bytes requested for the slot array.
        bytes: usize,
    },
    /// The global allocator refused a block.
    BlockAllocationFailed {
        /// Bytes requested for the block.
        bytes: usize,
    },
    /// A logical size whose byte size does not fit in a `Layout`.
    SizeOverflow {
        /// The logical size requested.
        size: u64,
    },
    /// Zero-sized blocks cannot be distinguished from empty slots.
    ZeroSize,
    /// Index past the end of the table.
    SlotOutOfRange {
        /// The index requested.
        index: usize,
        /// Table capacity.
        capacity: usize,
    },
    /// Allocation into a slot that still owns a live block.
    SlotOccupied {
        /// The occupied slot.
        index: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "table capacity must be at least 1"),
            Self::TableAllocationFailed { bytes } => {
                write!(f, "failed to allocate slot table of {bytes} bytes")
            }
            Self::BlockAllocationFailed { bytes } => {
                write!(f, "failed to allocate block of {bytes} bytes")
            }
            Self::SizeOverflow { size } => {
                write!(f, "block of logical size {size} overflows the address space")
            }
            Self::ZeroSize => write!(f, "zero-sized blocks are not allowed"),
            Self::SlotOutOfRange { index, capacity } => {
                write!(f, "slot {index} out of range for table of {capacity} slots")
            }
            Self::SlotOccupied { index } => write!(f, "slot {index} already owns a block"),
        }
    }
}

impl Error for ArenaError {}
