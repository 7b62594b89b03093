//! The repository context the engine loads content through.

use std::path::{Path, PathBuf};

use attrs::AttributeRules;
use filters::FilterRegistry;
use odb::Odb;

use crate::error::{DiffResult, Error};

/// Everything the engine needs to materialize delta content: an object
/// database, an optional working directory, path attribute rules, and the
/// content filter registry.
pub struct Repository {
    odb: Box<dyn Odb>,
    workdir: Option<PathBuf>,
    attributes: AttributeRules,
    filters: FilterRegistry,
}

impl Repository {
    /// Creates a repository over an object database, with no working
    /// directory, no attribute rules, and no filters.
    #[must_use]
    pub fn new(odb: Box<dyn Odb>) -> Self {
        Self {
            odb,
            workdir: None,
            attributes: AttributeRules::new(),
            filters: FilterRegistry::new(),
        }
    }

    /// Attaches a working-directory root.
    #[must_use]
    pub fn with_workdir(mut self, root: impl Into<PathBuf>) -> Self {
        self.workdir = Some(root.into());
        self
    }

    /// Installs path attribute rules.
    #[must_use]
    pub fn with_attributes(mut self, attributes: AttributeRules) -> Self {
        self.attributes = attributes;
        self
    }

    /// Installs the content filter registry.
    #[must_use]
    pub fn with_filters(mut self, filters: FilterRegistry) -> Self {
        self.filters = filters;
        self
    }

    /// The object database.
    #[must_use]
    pub fn odb(&self) -> &dyn Odb {
        self.odb.as_ref()
    }

    /// The working-directory root, when one is attached.
    #[must_use]
    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    /// The attribute rules.
    #[must_use]
    pub const fn attributes(&self) -> &AttributeRules {
        &self.attributes
    }

    /// The filter registry.
    #[must_use]
    pub const fn filters(&self) -> &FilterRegistry {
        &self.filters
    }

    /// Resolves a repository-relative path under the working directory.
    pub(crate) fn resolve_workdir(&self, relative: &Path) -> DiffResult<PathBuf> {
        let root = self.workdir.as_deref().ok_or(Error::MissingWorkdir)?;
        Ok(root.join(relative))
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("workdir", &self.workdir)
            .field("attributes", &self.attributes)
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odb::MemoryOdb;

    #[test]
    fn workdir_resolution_requires_a_workdir() {
        let repo = Repository::new(Box::new(MemoryOdb::new()));
        assert!(matches!(
            repo.resolve_workdir(Path::new("a.txt")),
            Err(Error::MissingWorkdir)
        ));
    }

    #[test]
    fn workdir_resolution_joins_the_root() {
        let repo = Repository::new(Box::new(MemoryOdb::new())).with_workdir("/tmp/wd");
        let resolved = repo.resolve_workdir(Path::new("sub/a.txt")).unwrap();
        assert_eq!(resolved, PathBuf::from("/tmp/wd/sub/a.txt"));
    }
}
