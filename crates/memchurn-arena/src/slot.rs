//! A single allocation record.

use crate::block::RawBlock;

/// One entry of the [`SlotTable`](crate::SlotTable).
///
/// Invariant: `block.is_none()` iff `size == 0`. Only the table mutates
/// slots, so the invariant cannot be broken from outside this crate.
#[derive(Debug, Default)]
pub struct Slot {
    pub(crate) block: Option<RawBlock>,
    pub(crate) size: u64,
}

impl Slot {
    /// True when the slot owns no block.
    pub fn is_empty(&self) -> bool {
        self.block.is_none()
    }

    /// Logical size of the owned block, or 0 when empty.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Base address of the owned block, if any.
    pub fn block_ptr(&self) -> Option<*const u8> {
        self.block.as_ref().map(RawBlock::as_ptr)
    }
}
