//! Records written to the board database.

use serde::{Deserialize, Serialize};

/// One database entry: a symbol or choice as declared at one location.
///
/// Expressions are pre-rendered HTML fragments. `prompt`, `help` and
/// `dependencies` are `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// `CONFIG_` followed by the symbol or choice name.
    pub name: String,
    pub prompt: Option<String>,
    #[serde(rename = "type")]
    pub type_name: String,
    pub help: Option<String>,
    pub dependencies: Option<String>,
    pub defaults: Vec<String>,
    /// Defaults declared in `defconfig` files, across all declarations.
    pub alt_defaults: Vec<AltDefault>,
    pub selects: Vec<String>,
    pub selected_by: Vec<String>,
    pub implies: Vec<String>,
    pub implied_by: Vec<String>,
    pub ranges: Vec<String>,
    /// Member symbols, for choices.
    pub choices: Vec<String>,
    pub filename: String,
    pub linenr: u32,
    pub menupath: String,
}

/// A default from a `defconfig` file, serialized as `[value, filename]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltDefault(pub String, pub String);

impl AltDefault {
    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn filename(&self) -> &str {
        &self.1
    }
}
