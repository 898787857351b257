//! Raw, manually released memory blocks.

use std::ptr::NonNull;

use crate::error::ArenaError;
use crate::raw;

/// An exclusively owned region from the global allocator.
///
/// `RawBlock` deliberately has no `Drop` impl: the experiment studies
/// explicit allocate/free patterns, so a block goes back to the allocator
/// only when its slot is released. The block does not remember its own
/// length; the owning [`Slot`](crate::Slot) records the logical size.
#[repr(transparent)]
#[derive(Debug)]
pub struct RawBlock {
    ptr: NonNull<u8>,
}

impl RawBlock {
    /// Allocate `size * element_width` bytes.
    pub(crate) fn allocate(size: u64, element_width: usize) -> Result<Self, ArenaError> {
        let bytes = Self::byte_len(size, element_width)?;
        let layout = raw::block_layout(bytes).ok_or(ArenaError::SizeOverflow { size })?;
        let ptr = raw::alloc_block(layout).ok_or(ArenaError::BlockAllocationFailed { bytes })?;
        Ok(Self { ptr })
    }

    /// Give the block back to the allocator.
    ///
    /// `size` and `element_width` must be the values passed to
    /// [`allocate`](Self::allocate); the table guarantees this by storing
    /// the size next to the block.
    #[allow(unsafe_code)]
    pub(crate) fn release(self, size: u64, element_width: usize) {
        let layout = Self::byte_len(size, element_width)
            .ok()
            .and_then(raw::block_layout)
            .expect("layout was valid when the block was allocated");
        // SAFETY: `self` was produced by `allocate` with this size and width,
        // and is consumed here so it cannot be released twice.
        unsafe { raw::dealloc_block(self.ptr, layout) }
    }

    /// Base address of the block.
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    fn byte_len(size: u64, element_width: usize) -> Result<usize, ArenaError> {
        if size == 0 || element_width == 0 {
            return Err(ArenaError::ZeroSize);
        }
        usize::try_from(size)
            .ok()
            .and_then(|s| s.checked_mul(element_width))
            .ok_or(ArenaError::SizeOverflow { size })
    }
}
