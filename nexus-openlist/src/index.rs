//! Sentinel-based slot index trait.
//!
//! Links between records are stored as signed integers where `-1` means
//! "no successor". This keeps a record the same size as the raw slot
//! index instead of paying for `Option<Idx>`.

use core::fmt::Debug;

/// A copyable signed slot index with a `-1` sentinel.
///
/// # Example
///
/// ```
/// use nexus_openlist::Index;
///
/// let idx: i32 = 5;
/// let none: i32 = i32::NONE;
///
/// assert!(idx.is_some());
/// assert!(none.is_none());
/// assert_eq!(idx.to_slot(), Some(5));
/// assert_eq!(none.to_slot(), None);
/// ```
pub trait Index: Copy + Eq + Debug {
    /// Sentinel value representing "no slot".
    const NONE: Self;

    /// Largest number of slots this index type can address.
    const MAX_SLOTS: usize;

    /// Returns `true` if this is the sentinel value.
    #[inline]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Returns `true` if this is not the sentinel value.
    #[inline]
    fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Converts a buffer offset into an index.
    ///
    /// The caller guarantees `slot < Self::MAX_SLOTS`.
    fn from_slot(slot: usize) -> Self;

    /// Converts to a buffer offset. Returns `None` for negative values,
    /// including the sentinel, and for values `usize` cannot hold.
    fn to_slot(self) -> Option<usize>;

    /// Widens to `i128` for error reporting.
    fn widen(self) -> i128;
}

macro_rules! impl_index_for_signed {
    ($($ty:ty),*) => {
        $(
            impl Index for $ty {
                const NONE: Self = -1;

                const MAX_SLOTS: usize = if (<$ty>::MAX as u128) < (usize::MAX as u128) {
                    <$ty>::MAX as usize
                } else {
                    usize::MAX
                };

                #[inline]
                fn from_slot(slot: usize) -> Self {
                    debug_assert!(slot < Self::MAX_SLOTS, "slot exceeds index range");
                    slot as Self
                }

                #[inline]
                fn to_slot(self) -> Option<usize> {
                    usize::try_from(self).ok()
                }

                #[inline]
                fn widen(self) -> i128 {
                    self as i128
                }
            }
        )*
    };
}

impl_index_for_signed!(i16, i32, i64, isize);

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_index_sentinel {
        ($($ty:ty => $name:ident),*) => {
            $(
                #[test]
                fn $name() {
                    assert!(<$ty>::NONE.is_none());
                    assert!(!<$ty>::NONE.is_some());
                    assert!((0 as $ty).is_some());
                    assert!((<$ty>::MAX - 1).is_some());
                    assert_eq!(<$ty>::NONE.to_slot(), None);
                }
            )*
        };
    }

    test_index_sentinel!(
        i16 => i16_sentinel,
        i32 => i32_sentinel,
        i64 => i64_sentinel,
        isize => isize_sentinel
    );

    #[test]
    fn negative_values_have_no_slot() {
        assert_eq!((-7i32).to_slot(), None);
        assert_eq!(i64::MIN.to_slot(), None);
    }

    #[test]
    fn wide_values_do_not_wrap() {
        let wide = 1i64 << 40;
        assert_eq!(wide.to_slot(), usize::try_from(wide).ok());
        assert_eq!(i64::MAX.to_slot(), usize::try_from(i64::MAX).ok());
        if cfg!(target_pointer_width = "32") {
            assert_eq!(wide.to_slot(), None);
            assert_eq!((1i64 << 32).to_slot(), None);
        } else {
            assert_eq!(wide.to_slot(), Some(1usize << 40));
        }
    }

    #[test]
    fn max_slots_matches_type() {
        assert_eq!(i16::MAX_SLOTS, i16::MAX as usize);
        assert_eq!(i32::MAX_SLOTS, i32::MAX as usize);
    }

    #[test]
    fn slot_conversion() {
        for slot in [0usize, 1, 100, i16::MAX as usize - 1] {
            assert_eq!(i16::from_slot(slot).to_slot(), Some(slot));
        }
    }
}
