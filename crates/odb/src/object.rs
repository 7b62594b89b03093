//! Object kinds and blob handles.

use std::fmt;
use std::sync::Arc;

use crate::hash::hash_object;
use crate::oid::Oid;

/// Kind of an object stored in the database.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// File content.
    Blob,
    /// Directory listing.
    Tree,
    /// Revision record.
    Commit,
    /// Annotated tag.
    Tag,
}

impl ObjectKind {
    /// Canonical lowercase name used in the hashed object header.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
            Self::Tag => "tag",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A blob object: raw file bytes plus their content address.
///
/// Handles are cheap to clone; the content is shared and stays alive as
/// long as any handle does, which lets callers borrow blob bytes while
/// retaining the handle that guarantees their validity.
#[derive(Clone, Debug)]
pub struct Blob {
    oid: Oid,
    data: Arc<[u8]>,
}

impl Blob {
    /// Builds a blob from raw bytes, computing its id.
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        let oid = hash_object(ObjectKind::Blob, &data);
        Self {
            oid,
            data: data.into(),
        }
    }

    pub(crate) fn from_parts(oid: Oid, data: Arc<[u8]>) -> Self {
        Self { oid, data }
    }

    /// Returns the blob's content address.
    #[must_use]
    pub const fn oid(&self) -> Oid {
        self.oid
    }

    /// Returns the raw content bytes.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.data
    }

    /// Returns the content length in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}
