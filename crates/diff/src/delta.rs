//! The delta data model: file sides, statuses, and delta lists.

use std::path::PathBuf;

use bitflags::bitflags;
use odb::Oid;

use crate::options::{DiffFlags, DiffOptions};

/// Tree-entry mode of a file side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FileMode {
    /// Entry is absent or unreadable.
    #[default]
    Unreadable,
    /// Directory entry.
    Tree,
    /// Regular file.
    Blob,
    /// Regular file with the executable bit.
    BlobExecutable,
    /// Symbolic link.
    Link,
    /// Submodule commit reference.
    Commit,
}

bitflags! {
    /// Per-side state accumulated while a delta is processed.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct FileFlags: u32 {
        /// The recorded oid is authoritative for the side's content.
        const VALID_OID = 1 << 0;
        /// The side has no content to load for this diff.
        const NO_DATA = 1 << 1;
        /// The side was classified as binary.
        const BINARY = 1 << 2;
        /// The side was classified as diffable text.
        const NOT_BINARY = 1 << 3;
    }
}

/// One side (old or new) of a delta.
#[derive(Clone, Debug, Default)]
pub struct DiffFile {
    /// Repository-relative path; may be empty for blob-to-blob diffs.
    pub path: PathBuf,
    /// Content address; the zero id while provisional.
    pub oid: Oid,
    /// Size in bytes; zero when not yet known.
    pub size: u64,
    /// Tree-entry mode.
    pub mode: FileMode,
    /// Processing state.
    pub flags: FileFlags,
}

impl DiffFile {
    /// Creates a side with a path and mode; the oid stays provisional.
    pub fn new(path: impl Into<PathBuf>, mode: FileMode) -> Self {
        Self {
            path: path.into(),
            mode,
            ..Self::default()
        }
    }

    /// Records an authoritative oid and size for the side.
    #[must_use]
    pub fn with_oid(mut self, oid: Oid, size: u64) -> Self {
        self.oid = oid;
        self.size = size;
        self.flags |= FileFlags::VALID_OID;
        self
    }

    /// Records a stat-derived size without an authoritative oid.
    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub(crate) fn is_binary_classified(&self) -> bool {
        self.flags
            .intersects(FileFlags::BINARY | FileFlags::NOT_BINARY)
    }
}

/// Status of a pending file change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DeltaStatus {
    /// Both sides are identical.
    #[default]
    Unmodified,
    /// The file exists only on the new side.
    Added,
    /// The file exists only on the old side.
    Deleted,
    /// Content or mode differs between the sides.
    Modified,
    /// The file moved to a new path.
    Renamed,
    /// The file was copied from another path.
    Copied,
    /// The file is ignored in the working directory.
    Ignored,
    /// The file is untracked in the working directory.
    Untracked,
    /// The entry kind changed (for example file to symlink).
    Typechange,
}

/// Three-valued binary verdict of a delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BinaryVerdict {
    /// Not yet decided.
    #[default]
    Unknown,
    /// Both sides are known textual.
    No,
    /// At least one side is binary.
    Yes,
}

/// Where one side of a delta list is iterated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// A committed tree.
    Tree,
    /// The index.
    Index,
    /// The filesystem working directory.
    WorkingDirectory,
}

/// Selector for one side of a delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DeltaSide {
    Old,
    New,
}

/// A single pending file change between two sources.
#[derive(Clone, Debug, Default)]
pub struct Delta {
    /// The old side.
    pub old: DiffFile,
    /// The new side.
    pub new: DiffFile,
    /// Change status; may be provisional until content is hashed.
    pub status: DeltaStatus,
    /// Aggregate binary verdict.
    pub binary: BinaryVerdict,
}

impl Delta {
    /// Creates a delta from its parts with an undecided binary verdict.
    #[must_use]
    pub fn new(status: DeltaStatus, old: DiffFile, new: DiffFile) -> Self {
        Self {
            old,
            new,
            status,
            binary: BinaryVerdict::Unknown,
        }
    }

    /// A Modified delta whose new side was never hashed may collapse to
    /// Unmodified once content is loaded; until then it is ambiguous.
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        self.status == DeltaStatus::Modified
            && self.new.oid.is_zero()
            && !self.new.flags.contains(FileFlags::VALID_OID)
    }

    pub(crate) fn file(&self, side: DeltaSide) -> &DiffFile {
        match side {
            DeltaSide::Old => &self.old,
            DeltaSide::New => &self.new,
        }
    }

    pub(crate) fn file_mut(&mut self, side: DeltaSide) -> &mut DiffFile {
        match side {
            DeltaSide::Old => &mut self.old,
            DeltaSide::New => &mut self.new,
        }
    }
}

/// Returns `true` when the options exclude this delta from traversal.
pub(crate) fn should_skip(options: &DiffOptions, delta: &Delta) -> bool {
    match delta.status {
        DeltaStatus::Unmodified => !options.flags.contains(DiffFlags::INCLUDE_UNMODIFIED),
        DeltaStatus::Ignored => !options.flags.contains(DiffFlags::INCLUDE_IGNORED),
        DeltaStatus::Untracked => !options.flags.contains(DiffFlags::INCLUDE_UNTRACKED),
        _ => false,
    }
}

/// A list of pending deltas plus the context they were produced under.
///
/// The list is computed by an external status or tree walk; the engine
/// only borrows it, one delta at a time, while traversing or iterating.
#[derive(Debug)]
pub struct DeltaList {
    deltas: Vec<Delta>,
    old_source: SourceKind,
    new_source: SourceKind,
    options: DiffOptions,
}

impl DeltaList {
    /// Creates an empty list for the given sources and options.
    #[must_use]
    pub fn new(old_source: SourceKind, new_source: SourceKind, options: DiffOptions) -> Self {
        Self {
            deltas: Vec::new(),
            old_source,
            new_source,
            options,
        }
    }

    /// Appends a delta.
    pub fn push(&mut self, delta: Delta) {
        self.deltas.push(delta);
    }

    /// Number of deltas, including ones the options would skip.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    /// Returns `true` when the list holds no deltas.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Read access to the deltas.
    #[must_use]
    pub fn deltas(&self) -> &[Delta] {
        &self.deltas
    }

    pub(crate) fn deltas_mut(&mut self) -> &mut [Delta] {
        &mut self.deltas
    }

    /// The options the list was produced under.
    #[must_use]
    pub const fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Source kind of the old side.
    #[must_use]
    pub const fn old_source(&self) -> SourceKind {
        self.old_source
    }

    /// Source kind of the new side.
    #[must_use]
    pub const fn new_source(&self) -> SourceKind {
        self.new_source
    }

    /// Counts deltas the options would traverse, optionally restricted to
    /// one status.
    ///
    /// The count can overstate the eventual traversal: deltas marked
    /// Modified from stat data alone may prove Unmodified once content is
    /// hashed, and that resolution only happens on load.
    #[must_use]
    pub fn entry_count(&self, filter: Option<DeltaStatus>) -> usize {
        self.deltas
            .iter()
            .filter(|delta| !should_skip(&self.options, delta))
            .filter(|delta| filter.is_none_or(|status| delta.status == status))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modified(path: &str) -> Delta {
        Delta::new(
            DeltaStatus::Modified,
            DiffFile::new(path, FileMode::Blob),
            DiffFile::new(path, FileMode::Blob),
        )
    }

    #[test]
    fn ambiguity_requires_modified_with_provisional_new_oid() {
        let delta = modified("a.txt");
        assert!(delta.is_ambiguous());

        let mut hashed = modified("a.txt");
        hashed.new.flags |= FileFlags::VALID_OID;
        assert!(!hashed.is_ambiguous());

        let mut added = modified("a.txt");
        added.status = DeltaStatus::Added;
        assert!(!added.is_ambiguous());
    }

    #[test]
    fn skip_rules_follow_the_include_flags() {
        let mut options = DiffOptions::default();
        let mut delta = modified("a.txt");

        delta.status = DeltaStatus::Unmodified;
        assert!(should_skip(&options, &delta));
        options.flags |= DiffFlags::INCLUDE_UNMODIFIED;
        assert!(!should_skip(&options, &delta));

        delta.status = DeltaStatus::Untracked;
        assert!(should_skip(&options, &delta));
        options.flags |= DiffFlags::INCLUDE_UNTRACKED;
        assert!(!should_skip(&options, &delta));

        delta.status = DeltaStatus::Modified;
        assert!(!should_skip(&options, &delta));
    }

    #[test]
    fn entry_count_honors_skip_rules_and_filter() {
        let mut list = DeltaList::new(
            SourceKind::Tree,
            SourceKind::WorkingDirectory,
            DiffOptions::default(),
        );
        list.push(modified("a.txt"));
        let mut unmodified = modified("b.txt");
        unmodified.status = DeltaStatus::Unmodified;
        list.push(unmodified);
        let mut deleted = modified("c.txt");
        deleted.status = DeltaStatus::Deleted;
        list.push(deleted);

        assert_eq!(list.len(), 3);
        assert_eq!(list.entry_count(None), 2);
        assert_eq!(list.entry_count(Some(DeltaStatus::Deleted)), 1);
        assert_eq!(list.entry_count(Some(DeltaStatus::Unmodified)), 0);
    }
}
