//! Display of filenames relative to module roots.

use std::path::Path;

use indexmap::IndexMap;

/// Module name → module root, in registration order.
///
/// Used to show source files that live in a module as
/// `<module:NAME>/rest/of/path`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModulePaths {
    roots: IndexMap<String, String>,
}

impl ModulePaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. Re-registering a name keeps its position and
    /// replaces the root.
    pub fn insert(&mut self, name: impl Into<String>, root: impl AsRef<Path>) {
        let root = root.as_ref().to_string_lossy().replace('\\', "/");
        self.roots.insert(name.into(), root);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.roots.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.roots.iter().map(|(name, root)| (name.as_str(), root.as_str()))
    }

    /// Rewrite `filename` relative to the first registered module whose
    /// root is a string prefix of it. Other filenames are returned as is.
    pub fn relativize(&self, filename: &str) -> String {
        for (name, root) in &self.roots {
            if let Some(rest) = filename.strip_prefix(root.as_str()) {
                return format!("<module:{name}>{rest}");
            }
        }
        filename.to_string()
    }
}
