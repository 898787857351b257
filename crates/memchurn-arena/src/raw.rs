//! Low-level primitives for table and block memory.
//!
//! Every allocator call in the workspace is made here, each with a
//! `// SAFETY:` comment. [`dealloc_block`] stays `unsafe`: only
//! `RawBlock::release` calls it, because only the block knows it has not
//! been freed yet. Nothing in this module touches block contents: the
//! experiment measures the allocator, not page faults from writes.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::slot::Slot;

/// Alignment of every block, matching the 8-byte element width.
const BLOCK_ALIGN: usize = std::mem::align_of::<u64>();

/// Layout for a block of `bytes` bytes.
pub(crate) fn block_layout(bytes: usize) -> Option<Layout> {
    Layout::from_size_align(bytes, BLOCK_ALIGN).ok()
}

/// Allocate an uninitialised block. Returns `None` if the allocator fails.
pub(crate) fn alloc_block(layout: Layout) -> Option<NonNull<u8>> {
    debug_assert!(layout.size() > 0);
    // SAFETY: callers reject zero-sized layouts before reaching here.
    NonNull::new(unsafe { alloc::alloc(layout) })
}

/// Return a block to the allocator.
///
/// # Safety
///
/// `ptr` must come from [`alloc_block`] with the same `layout` and must not
/// have been released already.
pub(crate) unsafe fn dealloc_block(ptr: NonNull<u8>, layout: Layout) {
    // SAFETY: upheld by the caller.
    unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
}

/// Allocate `capacity` empty slots in one zeroed allocation.
///
/// Large zeroed requests are served from fresh pages, so slots that are
/// never touched never become resident.
pub(crate) fn alloc_zeroed_slots(capacity: usize) -> Option<Box<[Slot]>> {
    let layout = Layout::array::<Slot>(capacity).ok()?;
    if layout.size() == 0 {
        return None;
    }
    // SAFETY: layout has non-zero size.
    let ptr = NonNull::new(unsafe { alloc::alloc_zeroed(layout) })?.cast::<Slot>();
    let slice = std::ptr::slice_from_raw_parts_mut(ptr.as_ptr(), capacity);
    // SAFETY: the all-zero bit pattern is a valid empty `Slot` (`RawBlock` is
    // a transparent `NonNull`, so a zeroed `Option<RawBlock>` is `None`, and
    // `size` is 0). The memory came from the global allocator with
    // `Layout::array::<Slot>(capacity)`, which is exactly the layout `Box`
    // uses to free a `[Slot]` of this length.
    Some(unsafe { Box::from_raw(slice) })
}
