//! Allocation strategy selector.

/// Where an [`OpenList`](crate::OpenList) buffer comes from and how long
/// it is expected to live.
///
/// | Strategy | Backing | Intended lifetime |
/// |----------|---------|-------------------|
/// | `Scratch` | global allocator | one short task, freed within a few frames |
/// | `Task` | global allocator | the duration of a scheduled job |
/// | `Persistent` | page-aligned OS pages on unix, optional `mlock` | long-lived, reused across jobs |
///
/// `Unset` is the default and is rejected at build time, so a strategy
/// must always be chosen explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Allocator {
    /// No strategy chosen. Building with this is an error.
    #[default]
    Unset,
    /// Transient buffer for a single short-lived unit of work.
    Scratch,
    /// Buffer scoped to one scheduled task.
    Task,
    /// Long-lived buffer backed by dedicated pages.
    Persistent,
}

impl Allocator {
    /// Returns `true` if this strategy can allocate.
    #[inline]
    pub const fn is_valid(self) -> bool {
        !matches!(self, Allocator::Unset)
    }

    /// Returns `true` if buffers come from dedicated OS pages.
    ///
    /// Only on unix; elsewhere `Persistent` uses the global allocator and
    /// `mlock` is ignored.
    #[inline]
    pub const fn uses_pages(self) -> bool {
        matches!(self, Allocator::Persistent) && cfg!(unix)
    }

    /// Short lowercase name for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Allocator::Unset => "unset",
            Allocator::Scratch => "scratch",
            Allocator::Task => "task",
            Allocator::Persistent => "persistent",
        }
    }
}

impl core::fmt::Display for Allocator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unset() {
        assert_eq!(Allocator::default(), Allocator::Unset);
        assert!(!Allocator::default().is_valid());
    }

    #[test]
    fn only_persistent_uses_pages() {
        assert_eq!(Allocator::Persistent.uses_pages(), cfg!(unix));
        assert!(!Allocator::Scratch.uses_pages());
        assert!(!Allocator::Task.uses_pages());
    }

    #[test]
    fn display_names() {
        assert_eq!(Allocator::Scratch.to_string(), "scratch");
        assert_eq!(Allocator::Persistent.to_string(), "persistent");
    }
}
