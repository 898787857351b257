//! Table sizing parameters.

use memchurn_core::{ELEMENT_WIDTH, LOW_WATER, MINIMAL_SIZE};

use crate::error::ArenaError;

/// Configuration for the allocation table.
///
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableConfig {
    /// Number of slots. Never changes after the table is built.
    ///
    /// Default: `LOW_WATER / MINIMAL_SIZE + 2`, enough for a fill made
    /// entirely of minimal-size blocks plus the one draw that crosses
    /// the mark.
    pub capacity: usize,

    /// Bytes backing each logical element of a block.
    ///
    /// Default: [`ELEMENT_WIDTH`] (8).
    pub element_width: usize,
}

impl TableConfig {
    /// Headroom past `budget / minimal_size`.
    pub const SLACK_SLOTS: usize = 2;

    /// Size a table for a live budget made of blocks no smaller than
    /// `minimal_size`.
    pub fn for_budget(low_water: u64, minimal_size: u64) -> Self {
        let slots = low_water / minimal_size.max(1);
        Self {
            capacity: usize::try_from(slots)
                .unwrap_or(usize::MAX)
                .saturating_add(Self::SLACK_SLOTS),
            element_width: ELEMENT_WIDTH,
        }
    }

    /// Bytes taken by the slot array.
    pub fn table_bytes(&self) -> usize {
        self.capacity
            .saturating_mul(std::mem::size_of::<crate::slot::Slot>())
    }

    /// Check invariants.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.capacity == 0 {
            return Err(ArenaError::ZeroCapacity);
        }
        if self.element_width == 0 {
            return Err(ArenaError::ZeroSize);
        }
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::for_budget(LOW_WATER, MINIMAL_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_covers_low_water() {
        let config = TableConfig::default();
        assert_eq!(config.capacity, (LOW_WATER / MINIMAL_SIZE) as usize + 2);
        assert_eq!(config.element_width, 8);
    }

    #[test]
    fn slot_is_two_words() {
        let config = TableConfig::for_budget(1000, 100);
        assert_eq!(config.capacity, 12);
        assert_eq!(config.table_bytes(), 12 * 16);
    }

    #[test]
    fn zero_capacity_rejected() {
        let config = TableConfig {
            capacity: 0,
            element_width: 8,
        };
        assert_eq!(config.validate(), Err(ArenaError::ZeroCapacity));
    }
}
