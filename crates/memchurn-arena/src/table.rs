//! The fixed-capacity slot arena.
//!
//! [`SlotTable`] is allocated once, zeroed, and never grows. Slots are
//! addressed only by index. Allocating into an occupied slot is an error,
//! so a live block can never be silently abandoned by overwriting its
//! record.

use crate::block::RawBlock;
use crate::config::TableConfig;
use crate::error::ArenaError;
use crate::raw;
use crate::slot::Slot;

/// Index-addressed table of allocation slots.
pub struct SlotTable {
    slots: Box<[Slot]>,
    element_width: usize,
    /// Number of occupied slots.
    live: usize,
    /// Sum of `size` over occupied slots.
    live_units: u64,
    /// One past the highest index ever occupied. Bounds teardown.
    touched: usize,
}

impl SlotTable {
    /// Build an empty table from a validated config.
    pub fn new(config: &TableConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let slots =
            raw::alloc_zeroed_slots(config.capacity).ok_or(ArenaError::TableAllocationFailed {
                bytes: config.table_bytes(),
            })?;
        Ok(Self {
            slots,
            element_width: config.element_width,
            live: 0,
            live_units: 0,
            touched: 0,
        })
    }

    /// Table with `capacity` slots and the default element width.
    pub fn with_capacity(capacity: usize) -> Result<Self, ArenaError> {
        Self::new(&TableConfig {
            capacity,
            ..TableConfig::default()
        })
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Bytes backing one logical element.
    pub fn element_width(&self) -> usize {
        self.element_width
    }

    /// Number of slots currently owning a block.
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Sum of the logical sizes of all live blocks.
    pub fn live_units(&self) -> u64 {
        self.live_units
    }

    /// One past the highest slot index ever occupied.
    pub fn touched(&self) -> usize {
        self.touched
    }

    /// Borrow the slot at `index`.
    pub fn slot(&self, index: usize) -> Result<&Slot, ArenaError> {
        self.slots.get(index).ok_or(ArenaError::SlotOutOfRange {
            index,
            capacity: self.slots.len(),
        })
    }

    /// True when `index` is in range and owns no block.
    pub fn is_empty(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(Slot::is_empty)
    }

    /// Allocate a block of logical `size` into the empty slot at `index`.
    pub fn allocate(&mut self, index: usize, size: u64) -> Result<(), ArenaError> {
        let capacity = self.slots.len();
        let element_width = self.element_width;
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(ArenaError::SlotOutOfRange { index, capacity })?;
        if !slot.is_empty() {
            return Err(ArenaError::SlotOccupied { index });
        }
        slot.block = Some(RawBlock::allocate(size, element_width)?);
        slot.size = size;
        self.live += 1;
        self.live_units += size;
        self.touched = self.touched.max(index + 1);
        Ok(())
    }

    /// Free the block at `index`, if any, and return its logical size.
    ///
    /// Releasing an empty slot is a no-op that returns 0.
    pub fn release(&mut self, index: usize) -> Result<u64, ArenaError> {
        let capacity = self.slots.len();
        let element_width = self.element_width;
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(ArenaError::SlotOutOfRange { index, capacity })?;
        let Some(block) = slot.block.take() else {
            return Ok(0);
        };
        let size = std::mem::take(&mut slot.size);
        block.release(size, element_width);
        self.live -= 1;
        self.live_units -= size;
        Ok(size)
    }

    /// Free every live block. The table stays usable afterwards.
    pub fn release_all(&mut self) {
        let element_width = self.element_width;
        for slot in &mut self.slots[..self.touched] {
            if let Some(block) = slot.block.take() {
                block.release(std::mem::take(&mut slot.size), element_width);
            }
        }
        self.live = 0;
        self.live_units = 0;
        self.touched = 0;
    }

    /// Iterate `(index, &Slot)` over the touched prefix.
    pub fn iter_touched(&self) -> impl Iterator<Item = (usize, &Slot)> {
        self.slots[..self.touched].iter().enumerate()
    }
}

impl Drop for SlotTable {
    fn drop(&mut self) {
        self.release_all();
    }
}
