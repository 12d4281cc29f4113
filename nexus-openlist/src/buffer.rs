//! Fixed-capacity slot buffer: one allocation, never resized.

use core::mem::MaybeUninit;
use core::ptr::NonNull;
use std::alloc::{Layout, alloc, dealloc};

#[cfg(unix)]
use crate::sys::Pages;
use crate::{Allocator, Error};

enum Backing {
    /// Zero-sized layout, nothing allocated.
    Empty,
    /// Global allocator with the layout used to allocate.
    Heap(Layout),
    /// Dedicated OS pages.
    #[cfg(unix)]
    Pages(Pages),
}

/// Contiguous storage for exactly `capacity` records of `T`.
///
/// Slots start uninitialized; the owner tracks which ones have been
/// written. `T: Copy` so slots never need dropping.
pub(crate) struct SlotBuffer<T: Copy> {
    ptr: NonNull<MaybeUninit<T>>,
    capacity: usize,
    backing: Backing,
}

impl<T: Copy> SlotBuffer<T> {
    /// Allocates room for `capacity` records using `allocator`.
    pub(crate) fn allocate(capacity: usize, allocator: Allocator, mlock: bool) -> Result<Self, Error> {
        if !allocator.is_valid() {
            return Err(Error::InvalidAllocator(allocator));
        }

        let layout = Layout::array::<T>(capacity).map_err(|_| Error::SizeOverflow {
            capacity,
            slot_size: size_of::<T>(),
        })?;

        if layout.size() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity,
                backing: Backing::Empty,
            });
        }

        #[cfg(unix)]
        if allocator.uses_pages() && layout.align() <= 4096 {
            return Self::allocate_pages(capacity, layout, mlock);
        }
        #[cfg(not(unix))]
        let _ = mlock;

        // Safety: layout has non-zero size
        let raw = unsafe { alloc(layout) };
        let ptr = NonNull::new(raw as *mut MaybeUninit<T>).ok_or(Error::AllocationFailed)?;

        Ok(Self {
            ptr,
            capacity,
            backing: Backing::Heap(layout),
        })
    }

    #[cfg(unix)]
    fn allocate_pages(capacity: usize, layout: Layout, mlock: bool) -> Result<Self, Error> {
        let pages = Pages::alloc(layout.size()).map_err(|_| Error::AllocationFailed)?;
        if mlock {
            if let Err(err) = pages.mlock() {
                tracing::warn!(bytes = pages.size(), %err, "mlock refused");
                return Err(Error::MlockFailed);
            }
        }
        let ptr =
            NonNull::new(pages.as_ptr() as *mut MaybeUninit<T>).ok_or(Error::AllocationFailed)?;
        Ok(Self {
            ptr,
            capacity,
            backing: Backing::Pages(pages),
        })
    }

    #[inline]
    pub(crate) const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes held by the backing allocation.
    pub(crate) fn bytes(&self) -> usize {
        match &self.backing {
            Backing::Empty => 0,
            Backing::Heap(layout) => layout.size(),
            #[cfg(unix)]
            Backing::Pages(pages) => pages.size(),
        }
    }

    /// Writes `value` into slot `i`.
    ///
    /// # Safety
    ///
    /// `i < capacity`.
    #[inline]
    pub(crate) unsafe fn write(&mut self, i: usize, value: T) {
        debug_assert!(i < self.capacity);
        unsafe { self.ptr.as_ptr().add(i).write(MaybeUninit::new(value)) }
    }

    /// # Safety
    ///
    /// `i < capacity` and slot `i` has been written.
    #[inline]
    pub(crate) unsafe fn get(&self, i: usize) -> &T {
        debug_assert!(i < self.capacity);
        unsafe { (*self.ptr.as_ptr().add(i)).assume_init_ref() }
    }

    /// # Safety
    ///
    /// `i < capacity` and slot `i` has been written.
    #[inline]
    pub(crate) unsafe fn get_mut(&mut self, i: usize) -> &mut T {
        debug_assert!(i < self.capacity);
        unsafe { (*self.ptr.as_ptr().add(i)).assume_init_mut() }
    }

    /// Returns slots `[0, len)` as initialized records.
    ///
    /// # Safety
    ///
    /// `len <= capacity` and every slot below `len` has been written.
    #[inline]
    pub(crate) unsafe fn written_mut(&mut self, len: usize) -> &mut [T] {
        debug_assert!(len <= self.capacity);
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr() as *mut T, len) }
    }
}

impl<T: Copy> Drop for SlotBuffer<T> {
    fn drop(&mut self) {
        if let Backing::Heap(layout) = self.backing {
            // Safety: allocated with this layout in `allocate`
            unsafe { dealloc(self.ptr.as_ptr() as *mut u8, layout) }
        }
        // Pages unmap themselves.
    }
}

// Safety: SlotBuffer exclusively owns its allocation.
unsafe impl<T: Copy + Send> Send for SlotBuffer<T> {}
unsafe impl<T: Copy + Sync> Sync for SlotBuffer<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_allocator_rejected() {
        let result = SlotBuffer::<u64>::allocate(4, Allocator::Unset, false);
        assert!(matches!(result, Err(Error::InvalidAllocator(Allocator::Unset))));
    }

    #[test]
    fn zero_capacity_allocates_nothing() {
        let buffer = SlotBuffer::<u64>::allocate(0, Allocator::Task, false).unwrap();
        assert_eq!(buffer.capacity(), 0);
        assert_eq!(buffer.bytes(), 0);
    }

    #[test]
    fn heap_write_read() {
        let mut buffer = SlotBuffer::<u64>::allocate(8, Allocator::Scratch, false).unwrap();
        assert_eq!(buffer.bytes(), 64);
        unsafe {
            buffer.write(3, 42);
            assert_eq!(*buffer.get(3), 42);
            *buffer.get_mut(3) = 7;
            assert_eq!(*buffer.get(3), 7);
        }
    }

    #[test]
    fn pages_write_read() {
        let mut buffer = SlotBuffer::<u64>::allocate(1000, Allocator::Persistent, false).unwrap();
        assert!(buffer.bytes() >= 8000);
        unsafe {
            buffer.write(999, 5);
            assert_eq!(*buffer.get(999), 5);
        }
    }

    #[test]
    fn size_overflow_reported() {
        let result = SlotBuffer::<[u8; 64]>::allocate(usize::MAX / 2, Allocator::Task, false);
        assert_eq!(
            result.err(),
            Some(Error::SizeOverflow {
                capacity: usize::MAX / 2,
                slot_size: 64,
            })
        );
    }

    #[test]
    fn written_slice_covers_prefix() {
        let mut buffer = SlotBuffer::<u32>::allocate(4, Allocator::Task, false).unwrap();
        unsafe {
            buffer.write(0, 1);
            buffer.write(1, 2);
            assert_eq!(buffer.written_mut(2), &mut [1, 2]);
        }
    }
}
