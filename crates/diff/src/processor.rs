//! The per-delta phase state machine: prep, load, exec, unload.

use crate::binary;
use crate::content::ContentMap;
use crate::delta::{BinaryVerdict, Delta, DeltaSide, DeltaStatus, DiffFile, FileFlags, SourceKind};
use crate::error::{DiffResult, Error};
use crate::hunk::{parse_hunk_header, HunkRange, LineOrigin};
use crate::loader;
use crate::options::DiffOptions;
use crate::repo::Repository;

/// Per-file callback: receives the delta and the traversal progress in
/// `[0, 1]`. Returning `false` aborts with [`Error::UserAbort`].
pub type FileCallback<'a> = dyn FnMut(&Delta, f32) -> bool + 'a;

/// Per-hunk callback: receives the delta, the hunk range, and the raw
/// header line. Returning `false` aborts with [`Error::UserAbort`].
pub type HunkCallback<'a> = dyn FnMut(&Delta, &HunkRange, &[u8]) -> bool + 'a;

/// Per-line callback: receives the delta, the enclosing hunk range, the
/// line origin, and the payload bytes. Returning `false` aborts with
/// [`Error::UserAbort`].
pub type LineCallback<'a> = dyn FnMut(&Delta, &HunkRange, LineOrigin, &[u8]) -> bool + 'a;

/// Drives one delta at a time through prep, load, and exec.
///
/// Phase transitions are idempotent, and `unload` restores the fresh
/// state from any of them, including after an error.
pub(crate) struct DeltaProcessor<'r> {
    repo: Option<&'r Repository>,
    options: DiffOptions,
    old_source: SourceKind,
    new_source: SourceKind,
    prepped: bool,
    loaded: bool,
    diffable: bool,
    diffed: bool,
    old_map: ContentMap,
    new_map: ContentMap,
}

impl<'r> DeltaProcessor<'r> {
    pub(crate) fn new(
        repo: Option<&'r Repository>,
        options: DiffOptions,
        old_source: SourceKind,
        new_source: SourceKind,
    ) -> Self {
        Self {
            repo,
            options,
            old_source,
            new_source,
            prepped: false,
            loaded: false,
            diffable: false,
            diffed: false,
            old_map: ContentMap::Empty,
            new_map: ContentMap::Empty,
        }
    }

    pub(crate) const fn options(&self) -> &DiffOptions {
        &self.options
    }

    pub(crate) const fn is_diffed(&self) -> bool {
        self.diffed
    }

    pub(crate) fn old_bytes(&self) -> &[u8] {
        self.old_map.as_bytes()
    }

    pub(crate) fn new_bytes(&self) -> &[u8] {
        self.new_map.as_bytes()
    }

    const fn source(&self, side: DeltaSide) -> SourceKind {
        match side {
            DeltaSide::Old => self.old_source,
            DeltaSide::New => self.new_source,
        }
    }

    fn map_mut(&mut self, side: DeltaSide) -> &mut ContentMap {
        match side {
            DeltaSide::Old => &mut self.old_map,
            DeltaSide::New => &mut self.new_map,
        }
    }

    /// Prep phase: attribute-tier binary classification.
    pub(crate) fn prep(&mut self, delta: &mut Delta) {
        if self.prepped {
            return;
        }
        binary::classify_by_attr(self.repo, &self.options, delta);
        self.prepped = true;
    }

    /// Load phase: materialize content, resolve provisional status, and
    /// decide whether the delta is worth diffing.
    pub(crate) fn load(&mut self, delta: &mut Delta) -> DiffResult<()> {
        if self.loaded {
            return Ok(());
        }
        self.prep(delta);

        if delta.binary != BinaryVerdict::Yes {
            match delta.status {
                DeltaStatus::Added => delta.old.flags |= FileFlags::NO_DATA,
                DeltaStatus::Deleted => delta.new.flags |= FileFlags::NO_DATA,
                DeltaStatus::Modified => {}
                _ => {
                    delta.old.flags |= FileFlags::NO_DATA;
                    delta.new.flags |= FileFlags::NO_DATA;
                }
            }

            // Only when both sides are loadable and neither oid is
            // authoritative can hashing reveal the delta as unchanged.
            let untouched = |file: &DiffFile| {
                !file
                    .flags
                    .intersects(FileFlags::NO_DATA | FileFlags::VALID_OID)
            };
            let check_if_unmodified = untouched(&delta.old) && untouched(&delta.new);

            // Working-directory content loads first: a filtered read may
            // briefly double its buffer, so keeping it ahead of the blob
            // loads bounds the peak overlap.
            const PLAN: [(DeltaSide, bool); 4] = [
                (DeltaSide::Old, true),
                (DeltaSide::New, true),
                (DeltaSide::Old, false),
                (DeltaSide::New, false),
            ];
            for (side, wants_workdir) in PLAN {
                if delta.file(side).flags.contains(FileFlags::NO_DATA) {
                    continue;
                }
                let from_workdir = self.source(side) == SourceKind::WorkingDirectory;
                if from_workdir != wants_workdir {
                    continue;
                }
                let repo = self.repo.ok_or(Error::MissingRepository)?;
                let map = if from_workdir {
                    loader::load_from_workdir(repo, &self.options, delta, side)?
                } else {
                    loader::load_from_blob(repo, &self.options, delta, side)?
                };
                *self.map_mut(side) = map;
                if delta.binary == BinaryVerdict::Yes {
                    break;
                }
            }

            // The oid comparison is only meaningful once both sides carry
            // an authoritative id.
            if check_if_unmodified
                && delta.old.mode == delta.new.mode
                && delta.old.flags.contains(FileFlags::VALID_OID)
                && delta.new.flags.contains(FileFlags::VALID_OID)
                && delta.old.oid == delta.new.oid
            {
                tracing::debug!(
                    path = %delta.new.path.display(),
                    "provisional delta hashed identical, now unmodified"
                );
                delta.status = DeltaStatus::Unmodified;
            }
        }

        // Last chance to settle the verdict before the diff decision.
        if delta.binary == BinaryVerdict::Unknown {
            binary::update_verdict(delta);
        }

        self.loaded = true;
        self.diffable = delta.binary != BinaryVerdict::Yes
            && delta.status != DeltaStatus::Unmodified
            && (!self.old_map.is_empty() || !self.new_map.is_empty())
            && delta.old.oid != delta.new.oid;
        Ok(())
    }

    /// Installs already-materialized content, as blob-to-blob diffs do.
    pub(crate) fn adopt_loaded(&mut self, old: ContentMap, new: ContentMap, diffable: bool) {
        self.old_map = old;
        self.new_map = new;
        self.loaded = true;
        self.diffable = diffable;
    }

    /// Exec phase: run the line-diff primitive once and demultiplex its
    /// batches into hunk and line events.
    pub(crate) fn exec(
        &mut self,
        delta: &mut Delta,
        mut hunk_cb: Option<&mut HunkCallback<'_>>,
        mut line_cb: Option<&mut LineCallback<'_>>,
    ) -> DiffResult<()> {
        if self.diffed {
            return Ok(());
        }
        self.load(delta)?;
        if !self.diffable {
            return Ok(());
        }

        let delta: &Delta = delta;
        let params = linediff::DiffParams {
            flags: self.options.compare,
        };
        let config = linediff::EmitConfig {
            context_lines: self.options.context_lines,
            interhunk_lines: self.options.interhunk_lines,
        };
        let old = self.old_map.as_bytes();
        let new = self.new_map.as_bytes();

        let mut range = HunkRange::default();
        let result = linediff::diff(old, new, &params, &config, |bufs| -> DiffResult<()> {
            match *bufs {
                [header] => {
                    range = parse_hunk_header(header)?;
                    if let Some(cb) = hunk_cb.as_mut() {
                        if !cb(delta, &range, header) {
                            return Err(Error::UserAbort);
                        }
                    }
                    Ok(())
                }
                [origin, payload] => {
                    dispatch_line(&mut line_cb, delta, &range, line_origin(origin), payload)
                }
                [origin, payload, marker] => {
                    dispatch_line(&mut line_cb, delta, &range, line_origin(origin), payload)?;
                    dispatch_line(&mut line_cb, delta, &range, eofnl_origin(origin), marker)
                }
                // The primitive never batches other arities.
                _ => Ok(()),
            }
        });

        if result.is_ok() {
            self.diffed = true;
        }
        result
    }

    /// Unload: release both sides' content and reset every phase. Safe to
    /// call repeatedly and from any state.
    pub(crate) fn unload(&mut self) {
        self.diffed = false;
        self.old_map.release();
        self.new_map.release();
        self.loaded = false;
        self.prepped = false;
        self.diffable = false;
    }
}

fn dispatch_line(
    line_cb: &mut Option<&mut LineCallback<'_>>,
    delta: &Delta,
    range: &HunkRange,
    origin: LineOrigin,
    content: &[u8],
) -> DiffResult<()> {
    if let Some(cb) = line_cb.as_mut() {
        if !cb(delta, range, origin, content) {
            return Err(Error::UserAbort);
        }
    }
    Ok(())
}

/// Origin of the payload buffer in a 2- or 3-arity batch.
fn line_origin(origin: &[u8]) -> LineOrigin {
    match origin.first() {
        Some(&b'+') => LineOrigin::Addition,
        Some(&b'-') => LineOrigin::Deletion,
        _ => LineOrigin::Context,
    }
}

/// Origin of the end-of-file-newline marker in a 3-arity batch: an added
/// final line without a newline means the old newline was dropped, a
/// deleted one means a newline appeared.
fn eofnl_origin(origin: &[u8]) -> LineOrigin {
    match origin.first() {
        Some(&b'+') => LineOrigin::DelEofnl,
        Some(&b'-') => LineOrigin::AddEofnl,
        _ => LineOrigin::Context,
    }
}
