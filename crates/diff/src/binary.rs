//! Three-tier binary classification: by attribute, by size, by content.

use attrs::DiffAttr;

use crate::delta::{BinaryVerdict, Delta, DeltaSide, DiffFile, FileFlags};
use crate::options::{DiffFlags, DiffOptions};
use crate::repo::Repository;

/// How many leading bytes the content sniff inspects.
const CONTENT_SNIFF_LEN: usize = 4000;

/// Folds per-side flags into the delta's aggregate verdict.
///
/// Yes when either side is binary; No when each side is either known text
/// or has no data to judge; otherwise the verdict is left as it was.
pub(crate) fn update_verdict(delta: &mut Delta) {
    let not_binary = |file: &DiffFile| {
        file.flags
            .intersects(FileFlags::NOT_BINARY | FileFlags::NO_DATA)
    };
    if delta.old.flags.contains(FileFlags::BINARY)
        || delta.new.flags.contains(FileFlags::BINARY)
    {
        delta.binary = BinaryVerdict::Yes;
    } else if not_binary(&delta.old) && not_binary(&delta.new) {
        delta.binary = BinaryVerdict::No;
    }
}

/// Attribute tier: consult the `diff` attribute for each side's path.
pub(crate) fn classify_by_attr(
    repo: Option<&Repository>,
    options: &DiffOptions,
    delta: &mut Delta,
) {
    if options.flags.contains(DiffFlags::FORCE_TEXT) {
        delta.old.flags |= FileFlags::NOT_BINARY;
        delta.new.flags |= FileFlags::NOT_BINARY;
    } else {
        attr_classify_side(repo, &mut delta.old);
        // Carry the old side's resolution over before querying the new
        // side, so a one-sided answer still settles blob-style deltas.
        let carried = delta.old.flags & (FileFlags::BINARY | FileFlags::NOT_BINARY);
        delta.new.flags |= carried;
        attr_classify_side(repo, &mut delta.new);
    }
    update_verdict(delta);
}

fn attr_classify_side(repo: Option<&Repository>, file: &mut DiffFile) {
    // Blob-to-blob diffs have no path to look up.
    if file.path.as_os_str().is_empty() {
        return;
    }
    let Some(repo) = repo else { return };
    match repo.attributes().diff_attribute(&file.path) {
        DiffAttr::Binary => file.flags |= FileFlags::BINARY,
        DiffAttr::Text => file.flags |= FileFlags::NOT_BINARY,
        DiffAttr::Unspecified => {}
    }
}

/// Size tier: very large sides are declared binary without reading them.
pub(crate) fn classify_by_size(options: &DiffOptions, delta: &mut Delta, side: DeltaSide) {
    if delta.file(side).is_binary_classified() {
        return;
    }
    let Some(threshold) = options.size_threshold() else {
        return;
    };
    if delta.file(side).size > threshold {
        tracing::debug!(
            path = %delta.file(side).path.display(),
            size = delta.file(side).size,
            threshold,
            "side exceeds size threshold, marking binary"
        );
        delta.file_mut(side).flags |= FileFlags::BINARY;
    }
    update_verdict(delta);
}

/// Content tier: sniff loaded bytes for a NUL in the leading window.
pub(crate) fn classify_by_content(delta: &mut Delta, side: DeltaSide, bytes: &[u8]) {
    if !delta.file(side).is_binary_classified() {
        let window = &bytes[..bytes.len().min(CONTENT_SNIFF_LEN)];
        if window.contains(&0) {
            delta.file_mut(side).flags |= FileFlags::BINARY;
        } else {
            delta.file_mut(side).flags |= FileFlags::NOT_BINARY;
        }
    }
    update_verdict(delta);
}
