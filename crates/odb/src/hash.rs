//! Canonical object hashing.

use digest::Digest;
use sha1::Sha1;

use crate::object::ObjectKind;
use crate::oid::Oid;

/// Hashes raw bytes as an object of the given kind.
///
/// The digest covers the `"<kind> <len>\0"` header followed by the content,
/// so ids computed here match the ones a storage backend assigns on insert.
#[must_use]
pub fn hash_object(kind: ObjectKind, data: &[u8]) -> Oid {
    let mut hasher = Sha1::new();
    hasher.update(kind.name().as_bytes());
    hasher.update(b" ");
    hasher.update(data.len().to_string().as_bytes());
    hasher.update(b"\0");
    hasher.update(data);
    Oid::from_bytes(hasher.finalize().into())
}
