//! Error types surfaced by the diff engine.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::delta::FileMode;

/// Result type for diff-engine operations.
pub type DiffResult<T> = Result<T, Error>;

/// Errors surfaced by the diff engine.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O failure while reading working-directory content.
    #[error("I/O error: {0}")]
    Io(
        #[from]
        #[source]
        io::Error,
    ),
    /// Object-database failure, propagated unchanged.
    #[error("object database error: {0}")]
    Odb(
        #[from]
        #[source]
        odb::OdbError,
    ),
    /// Filter-pipeline failure, propagated unchanged.
    #[error("filter error: {0}")]
    Filter(
        #[from]
        #[source]
        filters::FilterError,
    ),
    /// An object id expected to name a blob resolved to something else.
    #[error("corrupt object {oid}: expected blob, found {kind}")]
    CorruptObject {
        /// The id that was looked up.
        oid: odb::Oid,
        /// The kind the database reported.
        kind: odb::ObjectKind,
    },
    /// The diff primitive produced a hunk header the engine cannot parse.
    #[error("malformed hunk header {0:?}")]
    MalformedHeader(String),
    /// A working-directory entry has a mode the engine cannot load.
    #[error("unsupported file mode {mode:?} for {path:?}")]
    UnsupportedMode {
        /// Path of the offending entry.
        path: PathBuf,
        /// Its recorded mode.
        mode: FileMode,
    },
    /// The repository has no working directory to load content from.
    #[error("repository has no working directory")]
    MissingWorkdir,
    /// A content load ran without a repository attached.
    #[error("operation requires a repository")]
    MissingRepository,
    /// Memory for recorded hunks or lines could not be reserved.
    #[error("out of memory while recording diff output")]
    ResourceExhaustion,
    /// A user callback asked for the traversal to stop.
    #[error("callback aborted the operation")]
    UserAbort,
    /// Sentinel: iteration reached the end.
    #[error("iteration is over")]
    IterOver,
}
