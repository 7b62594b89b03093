//! Shared fixtures for the diff engine integration tests.
#![allow(dead_code)]

use std::cell::RefCell;

use diff::{
    foreach, Delta, DeltaList, DeltaStatus, DiffFile, DiffOptions, DiffResult, FileMode,
    HunkRange, LineOrigin, Repository, SourceKind,
};
use odb::{MemoryOdb, Oid};

/// Builds a repository whose object database holds the given blobs,
/// returning their ids in order.
pub fn repo_with_blobs(blobs: &[&[u8]]) -> (Repository, Vec<Oid>) {
    let mut store = MemoryOdb::new();
    let oids = blobs.iter().map(|b| store.insert_blob(b.to_vec())).collect();
    (Repository::new(Box::new(store)), oids)
}

/// A tree-to-tree Modified delta between two stored blobs.
pub fn modified_delta(path: &str, old: (Oid, u64), new: (Oid, u64)) -> Delta {
    Delta::new(
        DeltaStatus::Modified,
        DiffFile::new(path, FileMode::Blob).with_oid(old.0, old.1),
        DiffFile::new(path, FileMode::Blob).with_oid(new.0, new.1),
    )
}

/// A tree-to-tree Added delta: the old side is absent.
pub fn added_delta(path: &str, new: (Oid, u64)) -> Delta {
    Delta::new(
        DeltaStatus::Added,
        DiffFile::new(path, FileMode::Unreadable),
        DiffFile::new(path, FileMode::Blob).with_oid(new.0, new.1),
    )
}

/// A tree-to-tree Deleted delta: the new side is absent.
pub fn deleted_delta(path: &str, old: (Oid, u64)) -> Delta {
    Delta::new(
        DeltaStatus::Deleted,
        DiffFile::new(path, FileMode::Blob).with_oid(old.0, old.1),
        DiffFile::new(path, FileMode::Unreadable),
    )
}

/// A tree-to-tree list over the given deltas with the given options.
pub fn tree_list(options: DiffOptions, deltas: Vec<Delta>) -> DeltaList {
    let mut list = DeltaList::new(SourceKind::Tree, SourceKind::Tree, options);
    for delta in deltas {
        list.push(delta);
    }
    list
}

/// Everything a full traversal produced, for sequence assertions.
#[derive(Debug, Default)]
pub struct EventLog {
    /// `(new path, progress, status, binary)` per `file_cb` call.
    pub files: Vec<(String, f32, DeltaStatus, diff::BinaryVerdict)>,
    /// `(range, header text)` per `hunk_cb` call.
    pub hunks: Vec<(HunkRange, String)>,
    /// `(origin char, content)` per `line_cb` call.
    pub lines: Vec<(char, String)>,
}

/// Runs `foreach` with recording callbacks.
pub fn run_foreach(repo: &Repository, list: &mut DeltaList) -> DiffResult<EventLog> {
    let log = RefCell::new(EventLog::default());
    let mut file_cb = |delta: &Delta, progress: f32| {
        log.borrow_mut().files.push((
            delta.new.path.display().to_string(),
            progress,
            delta.status,
            delta.binary,
        ));
        true
    };
    let mut hunk_cb = |_: &Delta, range: &HunkRange, header: &[u8]| {
        log.borrow_mut()
            .hunks
            .push((*range, String::from_utf8_lossy(header).into_owned()));
        true
    };
    let mut line_cb = |_: &Delta, _: &HunkRange, origin: LineOrigin, content: &[u8]| {
        log.borrow_mut()
            .lines
            .push((origin.as_char(), String::from_utf8_lossy(content).into_owned()));
        true
    };
    foreach(
        repo,
        list,
        Some(&mut file_cb),
        Some(&mut hunk_cb),
        Some(&mut line_cb),
    )?;
    Ok(log.into_inner())
}

/// Origin characters of every line event, in order.
pub fn origins(log: &EventLog) -> Vec<char> {
    log.lines.iter().map(|(origin, _)| *origin).collect()
}
