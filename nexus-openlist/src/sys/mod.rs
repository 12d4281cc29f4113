//! Page-aligned OS allocation for persistent buffers (internal).
//!
//! Unix only; elsewhere persistent buffers come from the global allocator.

mod unix;

use std::ptr::NonNull;

use unix::{alloc_pages, drop_pages, mlock_impl};

/// A zeroed, page-aligned region owned by one persistent buffer.
///
/// Pages are prefaulted at allocation so the first pushes after
/// construction do not take page faults. Freed on drop.
pub(crate) struct Pages {
    ptr: NonNull<u8>,
    size: usize,
}

impl Pages {
    /// Allocates at least `size` bytes, rounded up to whole pages.
    pub(crate) fn alloc(size: usize) -> std::io::Result<Self> {
        alloc_pages(size)
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Rounded size of the region in bytes.
    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.size
    }

    /// Pins the region in physical memory.
    pub(crate) fn mlock(&self) -> std::io::Result<()> {
        mlock_impl(self.ptr, self.size)
    }
}

// Safety: Pages exclusively owns its mapping.
unsafe impl Send for Pages {}
unsafe impl Sync for Pages {}

impl Drop for Pages {
    fn drop(&mut self) {
        unsafe { drop_pages(self.ptr, self.size) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_page() {
        let pages = Pages::alloc(1).unwrap();
        assert!(pages.size() >= 1);
        assert_eq!(pages.size() % 4096, 0);
    }

    #[test]
    fn pointer_is_page_aligned() {
        let pages = Pages::alloc(100).unwrap();
        assert_eq!(pages.as_ptr() as usize % 4096, 0);
    }

    #[test]
    fn memory_is_zeroed_and_writable() {
        let size = 4096 * 3;
        let pages = Pages::alloc(size).unwrap();
        unsafe {
            assert_eq!(*pages.as_ptr().add(size - 1), 0);
            std::ptr::write_bytes(pages.as_ptr(), 0xAB, size);
            assert_eq!(*pages.as_ptr(), 0xAB);
        }
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn alloc_zero_panics() {
        let _ = Pages::alloc(0);
    }

    #[test]
    fn mlock_pins_or_reports_limit() {
        use std::io::ErrorKind;

        let pages = Pages::alloc(4096).unwrap();
        // Unprivileged runs may hit RLIMIT_MEMLOCK (EPERM/ENOMEM/EAGAIN).
        match pages.mlock() {
            Ok(()) => {}
            Err(err) => assert!(
                matches!(
                    err.kind(),
                    ErrorKind::PermissionDenied | ErrorKind::OutOfMemory | ErrorKind::WouldBlock
                ),
                "unexpected mlock error: {err}"
            ),
        }
        // Region stays usable either way.
        unsafe {
            pages.as_ptr().write(1);
            assert_eq!(*pages.as_ptr(), 1);
        }
    }
}
