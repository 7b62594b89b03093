#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filters` transforms file bytes between their working-tree form and the
//! canonical form stored in the object database. The classic example, and
//! the built-in implementation, is line-ending normalization: CRLF on disk,
//! LF in storage.
//!
//! # Design
//!
//! - [`ContentFilter`] is the transformation trait. Filters are direction
//!   aware: [`FilterDirection::ToObjectDatabase`] canonicalizes bytes read
//!   from the working tree, [`FilterDirection::ToWorkingTree`] undoes the
//!   canonicalization on checkout.
//! - [`FilterRegistry`] maps glob patterns to filters. Loading a chain for
//!   a path collects every matching filter in registration order; checkout
//!   chains run in reverse so round-trips compose.
//! - [`FilterChain`] is what content loaders consume: an empty chain means
//!   the bytes on disk already are canonical and may be used in place (for
//!   example through a memory map); a non-empty chain requires a
//!   read-and-transform pass.
//!
//! # Examples
//!
//! ```
//! use filters::{CrlfToLf, FilterDirection, FilterRegistry};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let mut registry = FilterRegistry::new();
//! registry.add("*.txt", Arc::new(CrlfToLf)).unwrap();
//!
//! let chain = registry.load(Path::new("notes.txt"), FilterDirection::ToObjectDatabase);
//! assert_eq!(chain.len(), 1);
//! assert_eq!(chain.apply(b"a\r\nb\r\n").unwrap(), b"a\nb\n");
//!
//! let none = registry.load(Path::new("image.png"), FilterDirection::ToObjectDatabase);
//! assert!(none.is_empty());
//! ```

mod filter;
mod registry;

use thiserror::Error;

pub use crate::filter::{ContentFilter, CrlfToLf};
pub use crate::registry::{FilterChain, FilterRegistry};

/// Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors raised by filter registration or application.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A glob pattern failed to compile.
    #[error("invalid filter pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The rejected pattern text.
        pattern: String,
        /// The underlying glob error.
        #[source]
        source: globset::Error,
    },
    /// A filter refused its input.
    #[error("filter {filter:?} failed: {reason}")]
    Apply {
        /// Name of the failing filter.
        filter: String,
        /// Human-readable cause.
        reason: String,
    },
}

/// Direction of a filter application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterDirection {
    /// Working-tree bytes into canonical storage form.
    ToObjectDatabase,
    /// Canonical bytes back into working-tree form.
    ToWorkingTree,
}
