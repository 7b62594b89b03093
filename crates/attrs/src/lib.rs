#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `attrs` answers the question higher layers keep asking about paths:
//! "how is this file marked?". Rules pair a glob pattern with an attribute
//! value; lookups walk the rules in order and the last match wins, so later
//! rules override earlier ones exactly like the attribute files they model.
//!
//! # Design
//!
//! The only attribute the workspace currently consults is the `diff`
//! attribute, represented by [`DiffAttr`]: a path can be declared binary
//! (never worth a textual diff), declared text (always diffable), or left
//! unspecified so content inspection decides. [`AttributeRules`] compiles
//! patterns once at insertion time; lookups are allocation-free.
//!
//! Patterns without a `/` are unanchored and match at any depth (an
//! implicit `**/` prefix); patterns containing a `/` match the whole
//! relative path.
//!
//! # Examples
//!
//! ```
//! use attrs::{AttributeRules, DiffAttr};
//! use std::path::Path;
//!
//! let mut rules = AttributeRules::new();
//! rules.add("*.bin", DiffAttr::Binary).unwrap();
//! rules.add("generated/*.bin", DiffAttr::Text).unwrap();
//!
//! assert_eq!(rules.diff_attribute(Path::new("a/b.bin")), DiffAttr::Binary);
//! assert_eq!(
//!     rules.diff_attribute(Path::new("generated/b.bin")),
//!     DiffAttr::Text
//! );
//! assert_eq!(
//!     rules.diff_attribute(Path::new("src/lib.rs")),
//!     DiffAttr::Unspecified
//! );
//! ```

use std::path::Path;

use globset::{Glob, GlobMatcher};
use thiserror::Error;

/// Result type for attribute-rule operations.
pub type AttrResult<T> = Result<T, AttrError>;

/// Errors raised while building attribute rules.
#[derive(Debug, Error)]
pub enum AttrError {
    /// A glob pattern failed to compile.
    #[error("invalid attribute pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The rejected pattern text.
        pattern: String,
        /// The underlying glob error.
        #[source]
        source: globset::Error,
    },
}

/// Value of the `diff` attribute for a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DiffAttr {
    /// No rule matched; content inspection decides.
    #[default]
    Unspecified,
    /// The path is declared diffable text.
    Text,
    /// The path is declared binary and never textually diffed.
    Binary,
}

#[derive(Debug)]
struct Rule {
    matcher: GlobMatcher,
    attr: DiffAttr,
}

/// An ordered set of path-pattern attribute rules.
#[derive(Debug, Default)]
pub struct AttributeRules {
    rules: Vec<Rule>,
}

impl AttributeRules {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule. Later rules override earlier ones on lookup.
    pub fn add(&mut self, pattern: &str, attr: DiffAttr) -> AttrResult<()> {
        // Bare file patterns match at any depth, like attribute files.
        let anchored = if pattern.contains('/') {
            pattern.to_owned()
        } else {
            format!("**/{pattern}")
        };
        let glob = Glob::new(&anchored).map_err(|source| AttrError::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })?;
        self.rules.push(Rule {
            matcher: glob.compile_matcher(),
            attr,
        });
        Ok(())
    }

    /// Looks up the `diff` attribute for a path; the last match wins.
    #[must_use]
    pub fn diff_attribute(&self, path: &Path) -> DiffAttr {
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.matcher.is_match(path))
            .map_or(DiffAttr::Unspecified, |rule| rule.attr)
    }

    /// Number of rules in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when no rules are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
