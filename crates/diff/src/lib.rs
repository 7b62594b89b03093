#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `diff` is the delta diff engine of the oxvcs workspace. Given a list of
//! pending file changes between two tree-like sources (a committed tree,
//! the index, or the working directory), it loads the right content for
//! each side, decides whether a textual line diff is meaningful, runs the
//! line-diff primitive, and surfaces the result either through streaming
//! callbacks ([`foreach`]) or a pull-style iterator ([`DeltaIter`]) that
//! caches hunks and lines per file.
//!
//! # Design
//!
//! Each delta moves through three phases — prep, load, exec — driven by an
//! internal per-delta processor that both consumption surfaces share:
//!
//! - **Prep** applies attribute-tier binary classification.
//! - **Load** materializes content (working-directory sides first, to
//!   bound peak memory when filters double a buffer), hashes sides whose
//!   oid was provisional, may rewrite a stat-only Modified delta to
//!   Unmodified, and settles the binary verdict through size and
//!   content-sniff tiers.
//! - **Exec** runs the primitive once and demultiplexes its buffer batches
//!   into hunk and line events.
//!
//! Content ownership is carried by a tagged map (owned buffer, memory map,
//! or retained blob handle), so every load is paired with exactly one
//! release and unload is idempotent on every exit path.
//!
//! # Invariants
//!
//! - A side that was loaded carries `VALID_OID` and its oid equals the
//!   hash of the loaded bytes.
//! - The delta's binary verdict is `Yes` iff either side is flagged
//!   binary, `No` when both sides are known textual (or have no data to
//!   judge), `Unknown` otherwise.
//! - `Unmodified` implies equal modes and equal oids.
//! - After unload, no maps, buffers, or blob handles remain held.
//!
//! # Errors
//!
//! [`Error`] carries the engine's failure kinds; collaborator errors
//! (object database, filters, I/O) propagate unchanged through `#[from]`
//! conversions. [`Error::UserAbort`] reports a callback that returned
//! `false`; [`Error::IterOver`] is the iterator's end sentinel.
//!
//! # Examples
//!
//! Diff one modified blob pair through the streaming surface:
//!
//! ```
//! use diff::{
//!     foreach, Delta, DeltaList, DeltaStatus, DiffFile, DiffOptions, FileMode, HunkRange,
//!     LineOrigin, Repository, SourceKind,
//! };
//! use odb::MemoryOdb;
//!
//! let mut store = MemoryOdb::new();
//! let old_oid = store.insert_blob(b"hello\n".to_vec());
//! let new_oid = store.insert_blob(b"goodbye\n".to_vec());
//! let repo = Repository::new(Box::new(store));
//!
//! let mut list = DeltaList::new(SourceKind::Tree, SourceKind::Tree, DiffOptions::default());
//! list.push(Delta::new(
//!     DeltaStatus::Modified,
//!     DiffFile::new("greeting.txt", FileMode::Blob).with_oid(old_oid, 6),
//!     DiffFile::new("greeting.txt", FileMode::Blob).with_oid(new_oid, 8),
//! ));
//!
//! let mut lines = Vec::new();
//! let mut line_cb = |_: &Delta, _: &HunkRange, origin: LineOrigin, content: &[u8]| {
//!     lines.push(format!("{}{}", origin.as_char(), String::from_utf8_lossy(content)));
//!     true
//! };
//! foreach(&repo, &mut list, None, None, Some(&mut line_cb))?;
//!
//! assert_eq!(lines, vec!["-hello\n", "+goodbye\n"]);
//! # Ok::<(), diff::Error>(())
//! ```
//!
//! # See also
//!
//! - [`linediff`] for the primitive and its batch contract.
//! - [`odb`] for object ids, blobs, and the storage trait.
//! - [`attrs`] and [`filters`] for the path-attribute and filter-pipeline
//!   collaborators.

mod binary;
mod content;
mod delta;
mod error;
mod foreach;
mod hunk;
mod iter;
mod loader;
mod options;
mod processor;
mod repo;

pub use crate::delta::{
    BinaryVerdict, Delta, DeltaList, DeltaStatus, DiffFile, FileFlags, FileMode, SourceKind,
};
pub use crate::error::{DiffResult, Error};
pub use crate::foreach::{foreach, foreach_blobs};
pub use crate::hunk::{format_hunk_header, parse_hunk_header, HunkRange, LineOrigin};
pub use crate::iter::DeltaIter;
pub use crate::options::{DiffFlags, DiffOptions, DEFAULT_MAX_SIZE};
pub use crate::processor::{FileCallback, HunkCallback, LineCallback};
pub use crate::repo::Repository;
