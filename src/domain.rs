//! Cross-reference index for board options.
//!
//! Options are registered against the page that documents them and looked
//! up by name when another page references them. Indexes built for separate
//! batches of pages merge by concatenation; lookups take the first match.

use serde::{Deserialize, Serialize};

/// Object type of every entry in the index.
pub const OPTION_TYPE: &str = "option";

/// One registered option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
    pub name: String,
    pub display_name: String,
    pub docname: String,
    pub anchor: String,
    /// Search priority; `-1` keeps options out of the full-text search.
    pub priority: i32,
}

/// Where a reference points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target<'a> {
    pub docname: &'a str,
    pub anchor: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionIndex {
    options: Vec<OptionEntry>,
}

impl OptionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `option` as documented on `docname`, anchored by its name.
    pub fn add_option(&mut self, option: &str, docname: &str) {
        self.options.push(OptionEntry {
            name: option.to_string(),
            display_name: option.to_string(),
            docname: docname.to_string(),
            anchor: option.to_string(),
            priority: -1,
        });
    }

    pub fn objects(&self) -> &[OptionEntry] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Append the entries of an index built in parallel.
    pub fn merge(&mut self, other: OptionIndex) {
        self.options.extend(other.options);
    }

    /// Resolve a reference to `target`. The first registration wins.
    pub fn resolve(&self, target: &str) -> Option<Target<'_>> {
        self.options
            .iter()
            .find(|entry| entry.name == target)
            .map(|entry| Target {
                docname: &entry.docname,
                anchor: &entry.anchor,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_first_match() {
        let mut index = OptionIndex::new();
        index.add_option("CONFIG_SERIAL", "boards/index");
        index.add_option("CONFIG_SERIAL", "other/page");

        let target = index.resolve("CONFIG_SERIAL").unwrap();
        assert_eq!(target.docname, "boards/index");
        assert_eq!(target.anchor, "CONFIG_SERIAL");
        assert!(index.resolve("CONFIG_GPIO").is_none());
    }

    #[test]
    fn test_merge_appends() {
        let mut first = OptionIndex::new();
        first.add_option("CONFIG_A", "a");
        let mut second = OptionIndex::new();
        second.add_option("CONFIG_B", "b");
        second.add_option("CONFIG_A", "b");

        first.merge(second);
        assert_eq!(first.len(), 3);
        assert_eq!(first.resolve("CONFIG_A").unwrap().docname, "a");
        assert_eq!(first.resolve("CONFIG_B").unwrap().docname, "b");
    }

    #[test]
    fn test_entry_shape() {
        let mut index = OptionIndex::new();
        index.add_option("CONFIG_A", "a");
        let entry = &index.objects()[0];
        assert_eq!(entry.display_name, "CONFIG_A");
        assert_eq!(entry.priority, -1);
    }
}
