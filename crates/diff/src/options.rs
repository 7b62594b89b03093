//! Caller-supplied options controlling a diff run.

use bitflags::bitflags;
use linediff::CompareFlags;

/// Binary-by-size threshold used when [`DiffOptions::max_size`] is zero.
pub const DEFAULT_MAX_SIZE: u64 = 512 * 1024 * 1024;

bitflags! {
    /// Behavior toggles for a diff run.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct DiffFlags: u32 {
        /// Skip all binary classification; treat every delta as textual.
        const FORCE_TEXT = 1 << 0;
        /// Do not skip deltas whose status is Unmodified.
        const INCLUDE_UNMODIFIED = 1 << 1;
        /// Do not skip deltas whose status is Ignored.
        const INCLUDE_IGNORED = 1 << 2;
        /// Do not skip deltas whose status is Untracked.
        const INCLUDE_UNTRACKED = 1 << 3;
    }
}

/// Options carried through a traversal or iterator.
///
/// The whitespace and hunk-shaping fields pass through opaquely to the
/// line-diff primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiffOptions {
    /// Behavior toggles.
    pub flags: DiffFlags,
    /// Binary-by-size threshold in bytes: negative disables the size
    /// classifier entirely, zero selects [`DEFAULT_MAX_SIZE`].
    pub max_size: i64,
    /// Unchanged lines shown around each hunk.
    pub context_lines: u32,
    /// Hunks separated by at most this many extra unchanged lines coalesce.
    pub interhunk_lines: u32,
    /// Whitespace handling for line comparison.
    pub compare: CompareFlags,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            flags: DiffFlags::empty(),
            max_size: 0,
            context_lines: 3,
            interhunk_lines: 0,
            compare: CompareFlags::empty(),
        }
    }
}

impl DiffOptions {
    /// Returns the effective binary-by-size threshold, or `None` when size
    /// classification is disabled.
    #[must_use]
    pub fn size_threshold(&self) -> Option<u64> {
        if self.max_size < 0 {
            None
        } else if self.max_size > 0 {
            Some(self.max_size as u64)
        } else {
            Some(DEFAULT_MAX_SIZE)
        }
    }
}
