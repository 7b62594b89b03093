//! Streaming traversal: per-delta callbacks over a delta list, and the
//! single-delta blob-to-blob variant.

use odb::Blob;

use crate::binary;
use crate::content::ContentMap;
use crate::delta::{
    should_skip, BinaryVerdict, Delta, DeltaList, DeltaSide, DeltaStatus, DiffFile, FileFlags,
    FileMode, SourceKind,
};
use crate::error::{DiffResult, Error};
use crate::processor::{DeltaProcessor, FileCallback, HunkCallback, LineCallback};
use crate::repo::Repository;

/// Walks every delta in the list, invoking the callbacks in order:
/// `file_cb` once per traversed delta with its progress, then `hunk_cb`
/// and `line_cb` for the textual diff when there is one.
///
/// Ambiguous deltas (Modified with an unhashed new side) are resolved by
/// loading before the skip decision, so a delta that hashes identical is
/// suppressed like any other Unmodified entry. Content is unloaded after
/// every delta, on success and error alike; no callback fires after the
/// first error.
pub fn foreach(
    repo: &Repository,
    list: &mut DeltaList,
    mut file_cb: Option<&mut FileCallback<'_>>,
    mut hunk_cb: Option<&mut HunkCallback<'_>>,
    mut line_cb: Option<&mut LineCallback<'_>>,
) -> DiffResult<()> {
    let total = list.len();
    let mut processor = DeltaProcessor::new(
        Some(repo),
        *list.options(),
        list.old_source(),
        list.new_source(),
    );

    for index in 0..total {
        let delta = &mut list.deltas_mut()[index];
        let step = step_delta(
            &mut processor,
            delta,
            index,
            total,
            &mut file_cb,
            &mut hunk_cb,
            &mut line_cb,
        );
        processor.unload();
        step?;
    }
    Ok(())
}

fn step_delta(
    processor: &mut DeltaProcessor<'_>,
    delta: &mut Delta,
    index: usize,
    total: usize,
    file_cb: &mut Option<&mut FileCallback<'_>>,
    hunk_cb: &mut Option<&mut HunkCallback<'_>>,
    line_cb: &mut Option<&mut LineCallback<'_>>,
) -> DiffResult<()> {
    if delta.is_ambiguous() {
        processor.load(delta)?;
    }
    if should_skip(processor.options(), delta) {
        tracing::trace!(path = %delta.new.path.display(), status = ?delta.status, "skipping delta");
        return Ok(());
    }
    processor.load(delta)?;

    if let Some(cb) = file_cb.as_mut() {
        let progress = index as f32 / total as f32;
        if !cb(delta, progress) {
            return Err(Error::UserAbort);
        }
    }

    processor.exec(
        delta,
        hunk_cb.as_mut().map(|cb| &mut **cb),
        line_cb.as_mut().map(|cb| &mut **cb),
    )
}

/// Diffs two blobs (either may be absent) as a single synthetic delta.
///
/// The status derives from which sides are present and collapses to
/// Unmodified when both ids coincide; progress reported to `file_cb` is
/// always 1.0.
pub fn foreach_blobs(
    repo: Option<&Repository>,
    old_blob: Option<&Blob>,
    new_blob: Option<&Blob>,
    options: &crate::options::DiffOptions,
    mut file_cb: Option<&mut FileCallback<'_>>,
    hunk_cb: Option<&mut HunkCallback<'_>>,
    line_cb: Option<&mut LineCallback<'_>>,
) -> DiffResult<()> {
    let mut processor =
        DeltaProcessor::new(repo, *options, SourceKind::Tree, SourceKind::Tree);
    let mut delta = Delta::default();

    let old_map = adopt_blob_side(old_blob, &mut delta.old);
    let new_map = adopt_blob_side(new_blob, &mut delta.new);
    delta.status = match (old_blob.is_some(), new_blob.is_some()) {
        (true, true) => DeltaStatus::Modified,
        (false, true) => DeltaStatus::Added,
        (true, false) => DeltaStatus::Deleted,
        (false, false) => DeltaStatus::Untracked,
    };
    if delta.old.oid == delta.new.oid {
        delta.status = DeltaStatus::Unmodified;
    }

    processor.prep(&mut delta);
    if delta.binary == BinaryVerdict::Unknown {
        binary::classify_by_content(&mut delta, DeltaSide::Old, old_map.as_bytes());
        binary::classify_by_content(&mut delta, DeltaSide::New, new_map.as_bytes());
    }
    let diffable =
        delta.binary != BinaryVerdict::Yes && delta.status != DeltaStatus::Unmodified;
    processor.adopt_loaded(old_map, new_map, diffable);

    let step = run_blob_delta(&mut processor, &mut delta, &mut file_cb, hunk_cb, line_cb);
    processor.unload();
    step
}

fn run_blob_delta(
    processor: &mut DeltaProcessor<'_>,
    delta: &mut Delta,
    file_cb: &mut Option<&mut FileCallback<'_>>,
    hunk_cb: Option<&mut HunkCallback<'_>>,
    line_cb: Option<&mut LineCallback<'_>>,
) -> DiffResult<()> {
    if let Some(cb) = file_cb.as_mut() {
        if !cb(delta, 1.0) {
            return Err(Error::UserAbort);
        }
    }
    processor.exec(delta, hunk_cb, line_cb)
}

fn adopt_blob_side(blob: Option<&Blob>, file: &mut DiffFile) -> ContentMap {
    match blob {
        Some(blob) => {
            file.oid = blob.oid();
            file.size = blob.size();
            file.mode = FileMode::Blob;
            file.flags |= FileFlags::VALID_OID;
            ContentMap::Blob(blob.clone())
        }
        None => {
            file.flags |= FileFlags::NO_DATA;
            ContentMap::Empty
        }
    }
}
