//! The object-database trait and the in-memory implementation.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::hash::hash_object;
use crate::object::{Blob, ObjectKind};
use crate::oid::Oid;

/// Result type for object-database operations.
pub type OdbResult<T> = Result<T, OdbError>;

/// Errors surfaced by object-database operations.
#[derive(Debug, Error)]
pub enum OdbError {
    /// No object with the requested id exists.
    #[error("object {oid} not found")]
    NotFound {
        /// The id that was looked up.
        oid: Oid,
    },
    /// The object exists but has a different kind than the caller expected.
    #[error("object {oid} is a {found}, expected {expected}")]
    UnexpectedKind {
        /// The id that was looked up.
        oid: Oid,
        /// The kind the caller asked for.
        expected: ObjectKind,
        /// The kind actually stored.
        found: ObjectKind,
    },
    /// A textual id could not be parsed.
    #[error("invalid object id {spec:?}")]
    InvalidOid {
        /// The rejected input.
        spec: String,
    },
}

/// Read access to an object database.
///
/// The trait is the seam between the diff engine and storage: the engine
/// only ever peeks headers and reads blobs, so that is all the trait
/// requires. Implementations must be consistent between the two calls --
/// the size reported by [`Odb::read_header`] is the length of the bytes
/// [`Odb::read`] returns.
pub trait Odb {
    /// Returns an object's kind and size without loading its content.
    fn read_header(&self, oid: &Oid) -> OdbResult<(ObjectKind, u64)>;

    /// Reads a blob in full.
    fn read(&self, oid: &Oid) -> OdbResult<Blob>;

    /// Returns `true` when an object with this id exists.
    fn exists(&self, oid: &Oid) -> bool;
}

/// An object database held entirely in memory.
///
/// Primarily a test and tooling backend, but a correct [`Odb`] in its own
/// right: ids are computed with [`hash_object`] on insert.
#[derive(Debug, Default)]
pub struct MemoryOdb {
    objects: FxHashMap<Oid, (ObjectKind, Arc<[u8]>)>,
}

impl MemoryOdb {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an object, returning its computed id.
    pub fn insert(&mut self, kind: ObjectKind, data: Vec<u8>) -> Oid {
        let oid = hash_object(kind, &data);
        self.objects.insert(oid, (kind, data.into()));
        oid
    }

    /// Inserts a blob, returning its computed id.
    pub fn insert_blob(&mut self, data: Vec<u8>) -> Oid {
        self.insert(ObjectKind::Blob, data)
    }

    /// Number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` when no objects are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Odb for MemoryOdb {
    fn read_header(&self, oid: &Oid) -> OdbResult<(ObjectKind, u64)> {
        self.objects
            .get(oid)
            .map(|(kind, data)| (*kind, data.len() as u64))
            .ok_or(OdbError::NotFound { oid: *oid })
    }

    fn read(&self, oid: &Oid) -> OdbResult<Blob> {
        let (kind, data) = self
            .objects
            .get(oid)
            .ok_or(OdbError::NotFound { oid: *oid })?;
        if *kind != ObjectKind::Blob {
            return Err(OdbError::UnexpectedKind {
                oid: *oid,
                expected: ObjectKind::Blob,
                found: *kind,
            });
        }
        Ok(Blob::from_parts(*oid, Arc::clone(data)))
    }

    fn exists(&self, oid: &Oid) -> bool {
        self.objects.contains_key(oid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_peek_reports_kind_and_size() {
        let mut store = MemoryOdb::new();
        let oid = store.insert_blob(b"some file content\n".to_vec());

        let (kind, size) = store.read_header(&oid).unwrap();
        assert_eq!(kind, ObjectKind::Blob);
        assert_eq!(size, 18);
    }

    #[test]
    fn read_returns_the_inserted_bytes() {
        let mut store = MemoryOdb::new();
        let oid = store.insert_blob(b"abc".to_vec());

        let blob = store.read(&oid).unwrap();
        assert_eq!(blob.content(), b"abc");
        assert_eq!(blob.oid(), oid);
    }

    #[test]
    fn reading_a_tree_as_blob_fails() {
        let mut store = MemoryOdb::new();
        let oid = store.insert(ObjectKind::Tree, b"tree bytes".to_vec());

        assert!(matches!(
            store.read(&oid),
            Err(OdbError::UnexpectedKind { .. })
        ));
        // The header peek still works for any kind.
        assert_eq!(store.read_header(&oid).unwrap().0, ObjectKind::Tree);
    }

    #[test]
    fn missing_object_is_not_found() {
        let store = MemoryOdb::new();
        let oid = Oid::from_bytes([7; crate::RAW_OID_LEN]);
        assert!(!store.exists(&oid));
        assert!(matches!(store.read(&oid), Err(OdbError::NotFound { .. })));
    }
}
