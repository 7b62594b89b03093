#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `odb` provides the content-addressed object model shared by the oxvcs
//! workspace: fixed-width [`Oid`] identifiers, [`Blob`] objects, the
//! [`Odb`] storage trait, and the canonical [`hash_object`] routine that
//! turns raw bytes into an id.
//!
//! # Design
//!
//! - [`Oid`] is the 20-byte id with hex parsing and rendering.
//! - [`ObjectKind`] and the cheaply cloneable [`Blob`] handle make up the
//!   object model; blob content stays alive as long as any handle does.
//! - [`Odb`] is the storage trait consumed by higher layers, with
//!   [`MemoryOdb`] as the in-memory implementation used by tests and
//!   tooling. The trait separates the header peek ([`Odb::read_header`])
//!   from the full read ([`Odb::read`]) so callers can learn an object's
//!   size without paying for its bytes.
//!
//! # Invariants
//!
//! - `hash_object(kind, data)` is a pure function of its inputs: SHA-1 over
//!   the `"<kind> <len>\0"` header followed by the content.
//! - A [`Blob`] returned by [`Odb::read`] always satisfies
//!   `blob.oid() == hash_object(ObjectKind::Blob, blob.content())`.
//!
//! # Errors
//!
//! [`OdbError`] covers missing objects, kind mismatches, and malformed hex
//! ids. Storage backends surface their own failures through the same enum.
//!
//! # Examples
//!
//! ```
//! use odb::{hash_object, MemoryOdb, ObjectKind, Odb};
//!
//! let mut store = MemoryOdb::new();
//! let oid = store.insert_blob(b"hello\n".to_vec());
//! assert_eq!(oid, hash_object(ObjectKind::Blob, b"hello\n"));
//!
//! let blob = store.read(&oid).unwrap();
//! assert_eq!(blob.content(), b"hello\n");
//! ```

mod hash;
mod object;
mod oid;
mod store;

pub use crate::hash::hash_object;
pub use crate::object::{Blob, ObjectKind};
pub use crate::oid::{Oid, RAW_OID_LEN};
pub use crate::store::{MemoryOdb, Odb, OdbError, OdbResult};
