//! Pattern-keyed filter registration and per-path chain loading.

use std::path::Path;
use std::sync::Arc;

use globset::{Glob, GlobMatcher};

use crate::{ContentFilter, FilterDirection, FilterError, FilterResult};

#[derive(Debug)]
struct Registration {
    matcher: GlobMatcher,
    filter: Arc<dyn ContentFilter>,
}

/// Maps path patterns to content filters.
#[derive(Debug, Default)]
pub struct FilterRegistry {
    registrations: Vec<Registration>,
}

impl FilterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a filter for paths matching `pattern`.
    ///
    /// Bare file patterns match at any depth; patterns containing `/`
    /// match the whole repository-relative path.
    pub fn add(&mut self, pattern: &str, filter: Arc<dyn ContentFilter>) -> FilterResult<()> {
        let anchored = if pattern.contains('/') {
            pattern.to_owned()
        } else {
            format!("**/{pattern}")
        };
        let glob = Glob::new(&anchored).map_err(|source| FilterError::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })?;
        self.registrations.push(Registration {
            matcher: glob.compile_matcher(),
            filter,
        });
        Ok(())
    }

    /// Collects the filter chain for a path.
    ///
    /// Filters apply in registration order toward the object database and
    /// in reverse on the way back to the working tree, so a round trip
    /// composes each filter with its own inverse.
    #[must_use]
    pub fn load(&self, path: &Path, direction: FilterDirection) -> FilterChain {
        let mut filters: Vec<Arc<dyn ContentFilter>> = self
            .registrations
            .iter()
            .filter(|reg| reg.matcher.is_match(path))
            .map(|reg| Arc::clone(&reg.filter))
            .collect();
        if direction == FilterDirection::ToWorkingTree {
            filters.reverse();
        }
        if !filters.is_empty() {
            tracing::trace!(path = %path.display(), count = filters.len(), "loaded filter chain");
        }
        FilterChain { filters, direction }
    }

    /// Number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

/// The filters that apply to one path, in application order.
#[derive(Debug)]
pub struct FilterChain {
    filters: Vec<Arc<dyn ContentFilter>>,
    direction: FilterDirection,
}

impl FilterChain {
    /// Number of filters in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns `true` when no filter applies and bytes can be used as-is.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Runs the input through every filter in order.
    pub fn apply(&self, input: &[u8]) -> FilterResult<Vec<u8>> {
        let mut data = input.to_vec();
        for filter in &self.filters {
            data = filter.apply(&data, self.direction)?;
        }
        Ok(data)
    }
}
